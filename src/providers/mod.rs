/*!
 * Provider implementations for the translation service.
 *
 * This module contains the client seam used by the translation layer:
 * - OpenAI: chat-completions API client
 * - Mock: scripted provider for tests
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::ProviderError;

/// A chat-completion request in the OpenAI wire format
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// The model to use
    pub model: String,

    /// The messages for the conversation
    pub messages: Vec<ChatMessage>,
}

/// A single chat message
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user)
    pub role: String,

    /// Content of the message
    pub content: String,
}

impl ChatRequest {
    /// Create a new request for the given model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Content of the last user message, if any
    pub fn user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|message| message.role == "user")
            .map(|message| message.content.as_str())
    }
}

/// A chat-completion response.
///
/// Fields the service may omit are optional or defaulted: a 2xx body that
/// parses but lacks the expected fields is a malformed response for the
/// caller to surface, not a transport error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    /// The returned choices
    #[serde(default)]
    pub choices: Vec<ChatChoice>,

    /// Token usage information, when reported
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

/// One choice in a chat-completion response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatChoice {
    /// The generated message
    #[serde(default)]
    pub message: Option<ChatResponseMessage>,
}

/// The message body of a response choice
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponseMessage {
    /// The generated text
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage reported by the service
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatUsage {
    /// Number of prompt tokens
    #[serde(default)]
    pub prompt_tokens: u64,
    /// Number of completion tokens
    #[serde(default)]
    pub completion_tokens: u64,
    /// Total number of tokens
    #[serde(default)]
    pub total_tokens: u64,
}

impl ChatResponse {
    /// Build a response holding a single text choice
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![ChatChoice {
                message: Some(ChatResponseMessage {
                    content: Some(text.into()),
                }),
            }],
            usage: None,
        }
    }
}

/// Common trait for chat-completion providers
///
/// The translation client holds the provider behind this trait so that the
/// network client can be swapped for a scripted one in tests.
#[async_trait]
pub trait ChatProvider: Send + Sync + Debug {
    /// Complete a single request, without retries
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<ChatResponse, ProviderError>` - The response or the
    ///   transport/API failure of this one attempt
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;
}

pub mod mock;
pub mod openai;
