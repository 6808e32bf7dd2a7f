/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Echoes the submitted markup back, prefixed
 * - `MockProvider::failing()` - Always fails with a connection error
 * - `MockProvider::fail_then_succeed(n)` - Fails the first n requests
 * - `MockProvider::empty_choices()` - Succeeds with an unusable payload
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::{ChatProvider, ChatRequest, ChatResponse};

/// Marker prefixed to echoed markup by the working mock
pub const MOCK_TRANSLATION_MARKER: &str = "TRANSLATED:";

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds, echoing the markup part of the user message with a
    /// marker prefix
    Working,
    /// Always fails with a connection error
    Failing,
    /// Fails the first `failures` requests, then behaves like `Working`
    FailThenSucceed {
        /// Number of leading requests that fail
        failures: usize,
    },
    /// Succeeds with a response that carries no choices
    EmptyChoices,
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of requests received so far
    request_count: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that fails the first `failures` requests
    pub fn fail_then_succeed(failures: usize) -> Self {
        Self::new(MockBehavior::FailThenSucceed { failures })
    }

    /// Create a mock that succeeds with an empty choice list
    pub fn empty_choices() -> Self {
        Self::new(MockBehavior::EmptyChoices)
    }

    /// Handle to the request counter, for asserting on attempt counts
    pub fn request_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.request_count)
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    // The user prompt puts the literal markup after the first newline of the
    // user message; everything before it is instruction text.
    fn echo_response(request: &ChatRequest) -> ChatResponse {
        let user = request.user_content().unwrap_or_default();
        let markup = user
            .split_once('\n')
            .map(|(_, markup)| markup)
            .unwrap_or(user);
        ChatResponse::from_text(format!("{}{}", MOCK_TRANSLATION_MARKER, markup))
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let seen = self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Working => Ok(Self::echo_response(&request)),
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "mock provider refused the request".to_string(),
            )),
            MockBehavior::FailThenSucceed { failures } => {
                if seen < failures {
                    Err(ProviderError::RequestFailed(format!(
                        "mock failure {} of {}",
                        seen + 1,
                        failures
                    )))
                } else {
                    Ok(Self::echo_response(&request))
                }
            }
            MockBehavior::EmptyChoices => Ok(ChatResponse::default()),
        }
    }
}
