//! The operator gate: a blocking confirmation with no timeout.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};

/// A suspend point where the run waits for the human operator. The flow
/// resumes when the operator signals readiness; there is no timeout. Behind
/// a trait so the console prompt can be swapped for another confirmation
/// channel.
#[async_trait]
pub trait OperatorPrompt: Send + Sync {
    /// Present `message` and block until the operator confirms.
    async fn confirm(&self, message: &str) -> std::io::Result<()>;
}

/// Console prompt: prints the message and waits for one line on stdin.
/// End-of-input counts as confirmation.
pub struct StdinPrompt;

#[async_trait]
impl OperatorPrompt for StdinPrompt {
    async fn confirm(&self, message: &str) -> std::io::Result<()> {
        println!("{message}");
        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[tokio::test]
    async fn test_prompt_trait_is_object_safe() {
        let prompt: Box<dyn OperatorPrompt> = Box::new(CountingPrompt {
            calls: AtomicUsize::new(0),
        });
        prompt.confirm("ready?").await.unwrap();
    }
}
