//! FFmpeg-based decryptor implementation.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

use super::config::DecryptorConfig;
use super::error::DecryptorError;
use super::traits::StreamDecryptor;

enum Stage {
    Decrypt,
    Merge,
}

/// FFmpeg-based decryptor implementation.
pub struct FfmpegDecryptor {
    config: DecryptorConfig,
}

impl FfmpegDecryptor {
    /// Creates a new FFmpeg decryptor with the given configuration.
    pub fn new(config: DecryptorConfig) -> Self {
        Self { config }
    }

    /// Creates a decryptor with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(DecryptorConfig::default())
    }

    /// Builds ffmpeg arguments for a single-stream decrypt.
    fn build_decrypt_args(&self, input: &Path, output: &Path, key: &str) -> Vec<String> {
        vec![
            "-y".to_string(), // Overwrite output
            "-decryption_key".to_string(),
            key.to_string(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-c".to_string(),
            "copy".to_string(),
            "-loglevel".to_string(),
            self.config.log_level.clone(),
            output.to_string_lossy().to_string(),
        ]
    }

    /// Builds ffmpeg arguments for the stream-copy merge.
    fn build_merge_args(&self, video: &Path, audio: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            video.to_string_lossy().to_string(),
            "-i".to_string(),
            audio.to_string_lossy().to_string(),
            "-c".to_string(),
            "copy".to_string(),
            "-loglevel".to_string(),
            self.config.log_level.clone(),
            output.to_string_lossy().to_string(),
        ]
    }

    /// Runs ffmpeg with the given arguments and checks the output exists.
    async fn run_ffmpeg(
        &self,
        args: &[String],
        output_path: &Path,
        stage: Stage,
    ) -> Result<(), DecryptorError> {
        let failed = |reason: String, stderr: Option<String>| match stage {
            Stage::Decrypt => DecryptorError::decrypt_failed(reason, stderr),
            Stage::Merge => DecryptorError::merge_failed(reason, stderr),
        };

        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    DecryptorError::FfmpegNotFound {
                        path: self.config.ffmpeg_path.clone(),
                    }
                } else {
                    DecryptorError::Io(e)
                }
            })?;

        let stderr = child.stderr.take().expect("stderr should be captured");
        let mut reader = BufReader::new(stderr).lines();

        let timeout_duration = Duration::from_secs(self.config.timeout_secs);
        let result = timeout(timeout_duration, async {
            let mut error_output = String::new();
            while let Ok(Some(line)) = reader.next_line().await {
                error_output.push_str(&line);
                error_output.push('\n');
            }
            let status = child.wait().await?;
            Ok::<(std::process::ExitStatus, String), std::io::Error>((status, error_output))
        })
        .await;

        match result {
            Ok(Ok((status, error_output))) => {
                if !status.success() {
                    return Err(failed(
                        format!("FFmpeg exited with code: {:?}", status.code()),
                        if error_output.is_empty() {
                            None
                        } else {
                            Some(error_output)
                        },
                    ));
                }
            }
            Ok(Err(e)) => return Err(DecryptorError::Io(e)),
            Err(_) => {
                let _ = child.kill().await;
                return Err(DecryptorError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                });
            }
        }

        let output_meta = tokio::fs::metadata(output_path)
            .await
            .map_err(|_| failed("Output file not created".to_string(), None))?;
        debug!(
            output = %output_path.display(),
            size_bytes = output_meta.len(),
            "FFmpeg run finished"
        );
        Ok(())
    }
}

#[async_trait]
impl StreamDecryptor for FfmpegDecryptor {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn decrypt(
        &self,
        input: &Path,
        output: &Path,
        key: &str,
    ) -> Result<(), DecryptorError> {
        if !input.exists() {
            return Err(DecryptorError::InputNotFound {
                path: input.to_path_buf(),
            });
        }
        let args = self.build_decrypt_args(input, output, key);
        self.run_ffmpeg(&args, output, Stage::Decrypt).await
    }

    async fn merge(
        &self,
        video: &Path,
        audio: &Path,
        output: &Path,
    ) -> Result<(), DecryptorError> {
        for input in [video, audio] {
            if !input.exists() {
                return Err(DecryptorError::InputNotFound {
                    path: input.to_path_buf(),
                });
            }
        }
        let args = self.build_merge_args(video, audio, output);
        self.run_ffmpeg(&args, output, Stage::Merge).await
    }

    async fn validate(&self) -> Result<(), DecryptorError> {
        let result = Command::new(&self.config.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        if let Err(e) = result {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(DecryptorError::FfmpegNotFound {
                    path: self.config.ffmpeg_path.clone(),
                });
            }
            return Err(DecryptorError::Io(e));
        }
        Ok(())
    }
}
