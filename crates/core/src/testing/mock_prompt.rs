//! Mock operator prompt for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::resolver::OperatorPrompt;

type ConfirmAction = Box<dyn Fn() + Send + Sync>;

/// Mock implementation of the OperatorPrompt trait.
///
/// Confirms immediately. An optional action runs on each confirmation,
/// standing in for whatever the operator would have done at the real
/// prompt, such as saving a credential line.
#[derive(Default)]
pub struct MockOperatorPrompt {
    messages: Arc<RwLock<Vec<String>>>,
    action: Arc<RwLock<Option<ConfirmAction>>>,
}

impl MockOperatorPrompt {
    /// Create a new mock prompt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run this action on every confirmation.
    pub async fn set_confirm_action(&self, action: impl Fn() + Send + Sync + 'static) {
        *self.action.write().await = Some(Box::new(action));
    }

    /// Get all prompt messages shown so far.
    pub async fn recorded_messages(&self) -> Vec<String> {
        self.messages.read().await.clone()
    }

    /// Number of confirmations seen so far.
    pub async fn confirm_count(&self) -> usize {
        self.messages.read().await.len()
    }
}

#[async_trait]
impl OperatorPrompt for MockOperatorPrompt {
    async fn confirm(&self, message: &str) -> std::io::Result<()> {
        self.messages.write().await.push(message.to_string());
        if let Some(action) = self.action.read().await.as_ref() {
            action();
        }
        Ok(())
    }
}
