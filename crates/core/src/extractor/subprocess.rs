//! Extractor subprocess wrapper.
//!
//! The browser session runs in a separate process so a crashed or hung
//! browser can never take the batch down with it. The child owns the session
//! and prints exactly one result object on stdout; its stderr is streamed
//! through to the parent's so the operator sees session progress live.

use crate::extractor::{ExtractionConfig, ExtractionResult, ExtractorError, ManifestExtractor};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, info};

/// Name of the extractor binary shipped next to the orchestrator.
pub const EXTRACTOR_BINARY_NAME: &str = "tentador-extract";

/// Slack added on top of the session timeout before the parent kills the
/// child. The child enforces its own deadline; this guard only fires when
/// the child itself is stuck.
const SUBPROCESS_GRACE_SECS: u64 = 60;

/// Runs extraction in a child process and parses its stdout.
pub struct SubprocessExtractor {
    program: PathBuf,
    config_path: Option<PathBuf>,
    timeout: Duration,
}

impl SubprocessExtractor {
    pub fn new(program: PathBuf, config_path: Option<PathBuf>, timeout: Duration) -> Self {
        Self {
            program,
            config_path,
            timeout,
        }
    }

    /// Build from the extraction config: explicit `command` when set,
    /// otherwise the sibling binary, with the parent-side guard derived
    /// from the session timeout.
    pub fn from_config(config: &ExtractionConfig, config_path: Option<PathBuf>) -> Self {
        let program = config
            .command
            .clone()
            .unwrap_or_else(|| sibling_binary(EXTRACTOR_BINARY_NAME));
        let timeout = Duration::from_secs(config.timeout_secs + SUBPROCESS_GRACE_SECS);
        Self::new(program, config_path, timeout)
    }
}

/// Locate a binary installed next to the current executable, falling back
/// to PATH lookup by bare name.
fn sibling_binary(name: &str) -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(name)))
        .filter(|candidate| candidate.exists())
        .unwrap_or_else(|| PathBuf::from(name))
}

fn spawn_error(program: &Path, source: std::io::Error) -> ExtractorError {
    if source.kind() == std::io::ErrorKind::NotFound {
        ExtractorError::ExtractorNotFound {
            path: program.to_path_buf(),
        }
    } else {
        ExtractorError::Io(source)
    }
}

#[async_trait]
impl ManifestExtractor for SubprocessExtractor {
    fn name(&self) -> &str {
        "subprocess"
    }

    async fn extract(
        &self,
        episode_url: &str,
        static_key_known: bool,
    ) -> Result<ExtractionResult, ExtractorError> {
        let mut command = Command::new(&self.program);
        command.arg(episode_url);
        if static_key_known {
            command.arg("--skip-key");
        }
        if let Some(config_path) = &self.config_path {
            command.arg("--config").arg(config_path);
        }
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        info!(
            url = episode_url,
            skip_key = static_key_known,
            program = %self.program.display(),
            "Starting extractor subprocess"
        );
        let mut child = command
            .spawn()
            .map_err(|source| spawn_error(&self.program, source))?;

        let stderr = child.stderr.take();
        let stderr_task = tokio::spawn(async move {
            if let Some(mut stderr) = stderr {
                let mut sink = tokio::io::stderr();
                let _ = tokio::io::copy(&mut stderr, &mut sink).await;
            }
        });

        let stdout = child.stdout.take();
        let stdout_task = tokio::spawn(async move {
            let mut buffer = String::new();
            if let Some(mut stdout) = stdout {
                let _ = stdout.read_to_string(&mut buffer).await;
            }
            buffer
        });

        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                let _ = child.kill().await;
                return Err(ExtractorError::SubprocessTimeout {
                    timeout_secs: self.timeout.as_secs(),
                });
            }
        };
        let output = stdout_task.await.unwrap_or_default();
        let _ = stderr_task.await;

        debug!(code = ?status.code(), "Extractor subprocess finished");
        if !status.success() {
            return Err(ExtractorError::SubprocessFailed {
                code: status.code(),
            });
        }

        ExtractionResult::from_mixed_output(&output).ok_or_else(|| ExtractorError::ResultParse {
            excerpt: excerpt(&output),
        })
    }
}

/// Tail of the output, for error messages. Whole sessions can log a lot;
/// only the end is diagnostic.
fn excerpt(output: &str) -> String {
    const MAX_CHARS: usize = 200;
    let trimmed = output.trim();
    let total = trimmed.chars().count();
    trimmed
        .chars()
        .skip(total.saturating_sub(MAX_CHARS))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn write_script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_extract_parses_noisy_output() {
        let dir = TempDir::new().unwrap();
        let script = write_script(
            &dir,
            "fake-extract",
            concat!(
                "echo 'session log line' 1>&2\n",
                "echo 'progress before result'\n",
                "echo '{\"manifestUrl\":\"https://dash.mediaset.example/e7.mpd\",",
                "\"cookies\":\"session=abc\",\"userAgent\":\"UA\",",
                "\"referer\":\"https://www.mediasetinfinity.es/\",\"pageTitle\":\"Programa 7\"}'",
            ),
        );

        let extractor = SubprocessExtractor::new(script, None, Duration::from_secs(10));
        let result = extractor
            .extract("https://www.mediasetinfinity.es/episode/7", false)
            .await
            .unwrap();
        assert_eq!(result.manifest_url, "https://dash.mediaset.example/e7.mpd");
        assert_eq!(result.cookies, "session=abc");
        assert_eq!(result.page_title, "Programa 7");
    }

    #[tokio::test]
    async fn test_extract_passes_skip_key_flag() {
        let dir = TempDir::new().unwrap();
        // The script echoes its arguments back inside the result so the
        // test can observe the argv it received.
        let script = write_script(
            &dir,
            "fake-extract",
            "printf '{\"manifestUrl\":\"args:%s\"}' \"$*\"",
        );

        let extractor = SubprocessExtractor::new(script.clone(), None, Duration::from_secs(10));
        let result = extractor.extract("https://e.example/7", true).await.unwrap();
        assert_eq!(result.manifest_url, "args:https://e.example/7 --skip-key");

        let extractor = SubprocessExtractor::new(script, None, Duration::from_secs(10));
        let result = extractor.extract("https://e.example/7", false).await.unwrap();
        assert_eq!(result.manifest_url, "args:https://e.example/7");
    }

    #[tokio::test]
    async fn test_extract_reports_exit_code() {
        let dir = TempDir::new().unwrap();
        let script = write_script(&dir, "fake-extract", "exit 3");

        let extractor = SubprocessExtractor::new(script, None, Duration::from_secs(10));
        let err = extractor.extract("https://e.example/7", false).await.unwrap_err();
        match err {
            ExtractorError::SubprocessFailed { code } => assert_eq!(code, Some(3)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_extract_missing_binary() {
        let extractor = SubprocessExtractor::new(
            PathBuf::from("/nonexistent/tentador-extract"),
            None,
            Duration::from_secs(10),
        );
        let err = extractor.extract("https://e.example/7", false).await.unwrap_err();
        assert!(matches!(err, ExtractorError::ExtractorNotFound { .. }));
    }

    #[tokio::test]
    async fn test_extract_times_out() {
        let dir = TempDir::new().unwrap();
        let script = write_script(&dir, "fake-extract", "sleep 30");

        let extractor = SubprocessExtractor::new(script, None, Duration::from_secs(1));
        let err = extractor.extract("https://e.example/7", false).await.unwrap_err();
        assert!(matches!(err, ExtractorError::SubprocessTimeout { .. }));
    }

    #[tokio::test]
    async fn test_extract_unparsable_output() {
        let dir = TempDir::new().unwrap();
        let script = write_script(&dir, "fake-extract", "echo 'no result today'");

        let extractor = SubprocessExtractor::new(script, None, Duration::from_secs(10));
        let err = extractor.extract("https://e.example/7", false).await.unwrap_err();
        match err {
            ExtractorError::ResultParse { excerpt } => {
                assert!(excerpt.contains("no result today"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
