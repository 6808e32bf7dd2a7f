/*!
 * Core translation client implementation.
 *
 * One call translates one chunk of markup. A request is attempted up to
 * [`MAX_ATTEMPTS`] times on transport or API failure; a successful response
 * that lacks the expected fields is surfaced immediately without retrying.
 */

use std::sync::Arc;

use log::{debug, warn};

use crate::app_config::Config;
use crate::errors::TranslationError;
use crate::providers::openai::OpenAi;
use crate::providers::{ChatProvider, ChatRequest};

/// Total number of attempts for one chunk, including the first
pub const MAX_ATTEMPTS: u32 = 3;

/// System prompt describing the expected translation style
const SYSTEM_PROMPT: &str = "You are an expert in literary translation. Rather than adhering to a \
    literal, word-for-word translation, deeply consider the distinct cultural nuances, structural \
    and syntactical variations, grammatical norms, idiomatic expressions, and cultural contexts of \
    each language. Make appropriate adjustments to ensure these elements are accurately \
    represented, while still preserving the original tone and intent of the text and maintaining \
    the original HTML structure.";

/// Client that translates markup chunks through a chat-completion provider
#[derive(Debug)]
pub struct TranslationClient {
    /// The provider performing the actual requests
    provider: Arc<dyn ChatProvider>,
    /// Model name sent with each request
    model: String,
}

impl TranslationClient {
    /// Create a client backed by the OpenAI provider from the configuration
    pub fn new(config: &Config) -> Self {
        Self {
            provider: Arc::new(OpenAi::new(&config.api_key, &config.endpoint)),
            model: config.model.clone(),
        }
    }

    /// Create a client backed by an arbitrary provider.
    ///
    /// Used by tests to inject scripted providers.
    pub fn with_provider(provider: Arc<dyn ChatProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Translate one chunk of markup into the target language.
    ///
    /// The returned string is the raw translated markup from the first
    /// response choice; element boundaries are assumed preserved, not
    /// verified.
    pub async fn translate(
        &self,
        markup: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        if markup.is_empty() || target_language.is_empty() {
            return Err(TranslationError::InvalidInput(
                "markup and target language cannot be empty".to_string(),
            ));
        }

        debug!("Preparing to translate {} bytes of markup to {}", markup.len(), target_language);

        let request = ChatRequest::new(&self.model)
            .add_message("system", SYSTEM_PROMPT)
            .add_message("user", build_user_prompt(markup, target_language));

        let mut attempt: u32 = 0;
        let response = loop {
            attempt += 1;
            debug!("Sending translation request, attempt {}/{}", attempt, MAX_ATTEMPTS);

            match self.provider.complete(request.clone()).await {
                Ok(response) => break response,
                Err(e) => {
                    warn!("Translation attempt {}/{} failed: {}", attempt, MAX_ATTEMPTS, e);
                    if attempt >= MAX_ATTEMPTS {
                        return Err(TranslationError::RetriesExhausted {
                            attempts: attempt,
                            source: e,
                        });
                    }
                }
            }
        };

        if let Some(usage) = &response.usage {
            debug!(
                "Token usage: {} prompt, {} completion, {} total",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        let translated = response
            .choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
            .ok_or_else(|| {
                TranslationError::MalformedResponse(
                    "response carries no choice with message content".to_string(),
                )
            })?;

        debug!("Translation request successful after {} attempt(s)", attempt);
        Ok(translated.trim().to_string())
    }
}

// The literal markup goes after the first newline so the instruction text
// and the payload never mix.
fn build_user_prompt(markup: &str, target_language: &str) -> String {
    format!(
        "1. Translate the text into the language with code '{target_language}' with a focus on \
         distinct cultural nuances, structural and syntactical variations, grammatical norms, \
         idiomatic expressions, and cultural contexts of each language. 2. Maintain the original \
         HTML structure. 3. Do not add comments surrounding the translation. 4. Ensure the \
         translation reflects the spirit and context of the original text, beyond a literal \
         word-for-word approach so the translation feels more natural:\n{markup}"
    )
}
