//! Manual key capture: the interactive fallback when the store has no
//! credential for an episode.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{OperatorPrompt, ResolverConfig};

/// Opens a browser for the operator, prints capture instructions naming the
/// expected store line, and blocks on the operator gate.
pub struct ManualCapture {
    config: ResolverConfig,
    prompt: Arc<dyn OperatorPrompt>,
}

impl ManualCapture {
    pub fn new(config: ResolverConfig, prompt: Arc<dyn OperatorPrompt>) -> Self {
        Self { config, prompt }
    }

    /// Run one capture round for an episode. Returns once the operator has
    /// confirmed; the caller rereads the store afterwards.
    pub async fn run(
        &self,
        episode_url: &str,
        expected_line: u32,
        store_path: &Path,
    ) -> std::io::Result<()> {
        println!();
        println!("==========================================");
        println!("  MANUAL KEY CAPTURE");
        println!("==========================================");
        println!("  1. A browser window is opening on the episode page");
        println!("  2. Start playback and capture the decryption key");
        println!(
            "  3. Paste it at line {} of {}",
            expected_line,
            store_path.display()
        );
        println!("  4. Save the file, come back here and confirm");
        println!();

        match Command::new(&self.config.operator_browser)
            .arg(episode_url)
            .spawn()
        {
            Ok(_) => debug!(browser = %self.config.operator_browser, "Operator browser launched"),
            Err(error) => warn!(
                %error,
                browser = %self.config.operator_browser,
                url = episode_url,
                "Could not launch the operator browser; open the page manually"
            ),
        }

        tokio::time::sleep(Duration::from_secs(self.config.instruction_pause_secs)).await;

        self.prompt
            .confirm(&format!(
                "Press ENTER once line {expected_line} is saved..."
            ))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingPrompt {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl OperatorPrompt for CountingPrompt {
        async fn confirm(&self, _message: &str) -> std::io::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn fast_config(browser: &str) -> ResolverConfig {
        ResolverConfig {
            operator_browser: browser.to_string(),
            instruction_pause_secs: 0,
        }
    }

    #[tokio::test]
    async fn test_run_blocks_on_the_gate() {
        let prompt = Arc::new(CountingPrompt {
            calls: AtomicUsize::new(0),
        });
        let capture = ManualCapture::new(fast_config("true"), prompt.clone());
        capture
            .run("https://example.es/ep", 4, Path::new("keys.txt"))
            .await
            .unwrap();
        assert_eq!(prompt.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_browser_launch_failure_is_not_fatal() {
        let prompt = Arc::new(CountingPrompt {
            calls: AtomicUsize::new(0),
        });
        let capture = ManualCapture::new(
            fast_config("definitely-not-a-real-browser-tentador"),
            prompt.clone(),
        );
        capture
            .run("https://example.es/ep", 1, Path::new("keys.txt"))
            .await
            .unwrap();
        assert_eq!(prompt.calls.load(Ordering::SeqCst), 1);
    }
}
