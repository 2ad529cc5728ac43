//! Segment-fetch tool invocation.

use crate::fetcher::headers::sanitize_header_value;
use crate::fetcher::{FetchRequest, FetcherConfig, FetcherError, StreamFetcher};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::info;

/// Fetcher backed by an external download tool such as N_m3u8DL-RE.
///
/// The tool renders its own progress UI, so all three stdio streams are
/// inherited from the orchestrator's terminal.
pub struct CommandFetcher {
    config: FetcherConfig,
}

impl CommandFetcher {
    pub fn new(config: FetcherConfig) -> Self {
        Self { config }
    }

    /// Check that the configured binary can be executed at all. The exit
    /// status is ignored since version flags differ between tools.
    pub async fn validate(&self) -> Result<(), FetcherError> {
        Command::new(&self.config.downloader_path)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|source| spawn_error(&self.config.downloader_path, source))?;
        Ok(())
    }
}

fn spawn_error(path: &str, source: std::io::Error) -> FetcherError {
    if source.kind() == std::io::ErrorKind::NotFound {
        FetcherError::ToolNotFound {
            path: path.to_string(),
        }
    } else {
        FetcherError::Io(source)
    }
}

fn build_fetch_args(request: &FetchRequest, extra_args: &[String]) -> Vec<String> {
    let mut args = vec![
        request.manifest_url.clone(),
        "--save-name".to_string(),
        request.save_name.clone(),
        "--save-dir".to_string(),
        request.save_dir.to_string_lossy().to_string(),
        "-H".to_string(),
        format!("Cookie: {}", sanitize_header_value(&request.cookies)),
        "-H".to_string(),
        format!("Referer: {}", sanitize_header_value(&request.referer)),
        "-H".to_string(),
        format!("User-Agent: {}", sanitize_header_value(&request.user_agent)),
        "--auto-select".to_string(),
    ];
    args.extend(extra_args.iter().cloned());
    args
}

#[async_trait]
impl StreamFetcher for CommandFetcher {
    fn name(&self) -> &str {
        "command"
    }

    async fn fetch(&self, request: &FetchRequest) -> Result<(), FetcherError> {
        let args = build_fetch_args(request, &self.config.extra_args);
        info!(
            url = %request.manifest_url,
            save_name = %request.save_name,
            "Fetching streams"
        );

        let status = Command::new(&self.config.downloader_path)
            .args(&args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| spawn_error(&self.config.downloader_path, source))?;

        if !status.success() {
            return Err(FetcherError::FetchFailed {
                code: status.code(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn request() -> FetchRequest {
        FetchRequest {
            manifest_url: "https://dash.mediaset.example/e7.mpd".to_string(),
            save_name: "Show S09E07 [WEB-DL]".to_string(),
            save_dir: PathBuf::from("/tmp/downloads"),
            cookies: "session={abc}".to_string(),
            referer: "https://www.mediasetinfinity.es/".to_string(),
            user_agent: "UA".to_string(),
        }
    }

    #[test]
    fn test_build_fetch_args() {
        let args = build_fetch_args(&request(), &[]);
        assert_eq!(
            args,
            vec![
                "https://dash.mediaset.example/e7.mpd",
                "--save-name",
                "Show S09E07 [WEB-DL]",
                "--save-dir",
                "/tmp/downloads",
                "-H",
                "Cookie: session=%7Babc%7D",
                "-H",
                "Referer: https://www.mediasetinfinity.es/",
                "-H",
                "User-Agent: UA",
                "--auto-select",
            ]
        );
    }

    #[test]
    fn test_build_fetch_args_appends_extra() {
        let extra = vec!["--thread-count".to_string(), "8".to_string()];
        let args = build_fetch_args(&request(), &extra);
        assert_eq!(args[args.len() - 2], "--thread-count");
        assert_eq!(args[args.len() - 1], "8");
        // Built-in arguments stay in front of operator-supplied ones.
        assert_eq!(args[args.len() - 3], "--auto-select");
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let fetcher = CommandFetcher::new(FetcherConfig::default().with_downloader_path("true"));
        assert!(fetcher.fetch(&request()).await.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_failure_reports_code() {
        let fetcher = CommandFetcher::new(FetcherConfig::default().with_downloader_path("false"));
        let err = fetcher.fetch(&request()).await.unwrap_err();
        match err {
            FetcherError::FetchFailed { code } => assert_eq!(code, Some(1)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_tool_missing() {
        let fetcher = CommandFetcher::new(
            FetcherConfig::default().with_downloader_path("/nonexistent/N_m3u8DL-RE"),
        );
        let err = fetcher.fetch(&request()).await.unwrap_err();
        assert!(matches!(err, FetcherError::ToolNotFound { .. }));
    }

    #[tokio::test]
    async fn test_validate() {
        let fetcher = CommandFetcher::new(FetcherConfig::default().with_downloader_path("true"));
        assert!(fetcher.validate().await.is_ok());

        let fetcher = CommandFetcher::new(
            FetcherConfig::default().with_downloader_path("/nonexistent/N_m3u8DL-RE"),
        );
        assert!(matches!(
            fetcher.validate().await.unwrap_err(),
            FetcherError::ToolNotFound { .. }
        ));
    }
}
