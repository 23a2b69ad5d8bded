use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::completion::Completion;
use crate::consts::DEFAULT_TARGET_LANGUAGE;

use super::{TARGET_LANGUAGE, Task, TaskOptions};

const QUOTES: &[char] = &['"', '\''];

/// Translates text into a target language (English by default).
pub struct Translator {
    client: Arc<dyn Completion>,
}

impl Translator {
    pub fn new(client: Arc<dyn Completion>) -> Self {
        Self { client }
    }

    fn target_language(options: &TaskOptions) -> &str {
        options
            .get(TARGET_LANGUAGE)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_TARGET_LANGUAGE)
    }

    fn build_prompt(input: &str, target_language: &str) -> String {
        if target_language.eq_ignore_ascii_case("english") {
            format!(
                "Translate the following text into idiomatic American English. \
                 Provide only the translation without any explanations:\n\n{input}"
            )
        } else {
            format!(
                "Translate the following text from American English to {target_language}. \
                 Provide only the translation without any explanations:\n\n{input}"
            )
        }
    }
}

#[async_trait]
impl Task for Translator {
    fn name(&self) -> &str {
        "translate"
    }

    async fn execute(&self, input: &str, options: &TaskOptions) -> Result<String> {
        let prompt = Self::build_prompt(input, Self::target_language(options));
        let response = self.client.complete(&prompt).await?;
        Ok(strip_quotes(&response).to_string())
    }
}

/// Trim the model output and drop the quotes it likes to wrap
/// translations in. Applying it twice gives the same result as once.
pub fn strip_quotes(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || QUOTES.contains(&c))
}
