use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::completion::Completion;

use super::{Task, TaskOptions};

/// Rewrites free text as a professional American English email.
pub struct EmailComposer {
    client: Arc<dyn Completion>,
}

impl EmailComposer {
    pub fn new(client: Arc<dyn Completion>) -> Self {
        Self { client }
    }

    fn build_prompt(input: &str) -> String {
        format!(
            "Please rewrite the following content as a professional email in American English:\n\n\
             {input}\n\n\
             Please maintain the original meaning, but use a formal, professional American \
             English email tone and format."
        )
    }
}

#[async_trait]
impl Task for EmailComposer {
    fn name(&self) -> &str {
        "email"
    }

    async fn execute(&self, input: &str, _options: &TaskOptions) -> Result<String> {
        self.client.complete(&Self::build_prompt(input)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::mock::MockCompletion;

    #[test]
    fn prompt_embeds_input() {
        let prompt = EmailComposer::build_prompt("need the report by friday");
        assert!(prompt.contains("\n\nneed the report by friday\n\n"));
        assert!(prompt.starts_with("Please rewrite the following content"));
        assert!(prompt.ends_with("tone and format."));
    }

    #[tokio::test]
    async fn execute_returns_raw_completion() {
        let mock = Arc::new(MockCompletion::always("  Dear team,\n\n...  "));
        let composer = EmailComposer::new(mock.clone());

        let options = TaskOptions::from([("ignored".to_string(), "x".to_string())]);
        let result = composer.execute("hi", &options).await.unwrap();

        // No post-processing, unlike the translator.
        assert_eq!(result, "  Dear team,\n\n...  ");
        assert_eq!(mock.calls(), 1);
    }
}
