/*!
 * Mock backend implementations for testing.
 *
 * This module provides scripted backends that simulate translation
 * behavior without network access:
 * - `MockBackend::identity()` - returns every text unchanged
 * - `MockBackend::uppercase()` - returns every text uppercased
 * - `MockBackend::tagged()` - prefixes every text with the target language
 * - `MockBackend::failing(...)` - always fails with a chosen error kind
 * - `MockBackend::fail_times(...)` - fails N times, then succeeds
 * - `MockBackend::length_mismatch()` - answers with one segment too many
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::providers::TranslationBackend;

/// Failure kind a mock can produce, rebuilt fresh on every call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// 429-style rate limiting (retryable)
    RateLimited,
    /// Network-level failure (retryable)
    Connection,
    /// Malformed payload (not retryable)
    Invalid,
    /// Rejected credentials (fatal)
    Auth,
}

impl MockFailure {
    fn to_error(self) -> ProviderError {
        match self {
            Self::RateLimited => ProviderError::RateLimitExceeded("simulated rate limit".to_string()),
            Self::Connection => ProviderError::ConnectionError("simulated network failure".to_string()),
            Self::Invalid => ProviderError::InvalidResponse("simulated bad payload".to_string()),
            Self::Auth => ProviderError::AuthenticationError("simulated bad credentials".to_string()),
        }
    }
}

/// Behavior mode for the mock backend
#[derive(Debug, Clone, Copy)]
enum MockBehavior {
    /// Return texts unchanged
    Identity,
    /// Return texts uppercased
    Uppercase,
    /// Prefix texts with the target language
    Tagged,
    /// Always fail with the given kind
    Failing(MockFailure),
    /// Fail with the given kind for the first `times` calls, then succeed
    FailTimes { failure: MockFailure, times: usize },
    /// Succeed but return one extra segment
    LengthMismatch,
    /// Delay before answering (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Scripted backend for testing pipeline behavior
#[derive(Debug)]
pub struct MockBackend {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of `translate` calls made so far
    calls: Arc<AtomicUsize>,
}

impl MockBackend {
    fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Backend that translates every text to itself
    pub fn identity() -> Self {
        Self::new(MockBehavior::Identity)
    }

    /// Backend that uppercases every text
    pub fn uppercase() -> Self {
        Self::new(MockBehavior::Uppercase)
    }

    /// Backend that prefixes every text with the target language
    pub fn tagged() -> Self {
        Self::new(MockBehavior::Tagged)
    }

    /// Backend that always fails with the given kind
    pub fn failing(failure: MockFailure) -> Self {
        Self::new(MockBehavior::Failing(failure))
    }

    /// Backend that fails `times` times with the given kind, then succeeds
    pub fn fail_times(failure: MockFailure, times: usize) -> Self {
        Self::new(MockBehavior::FailTimes { failure, times })
    }

    /// Backend that answers with a segment count mismatch
    pub fn length_mismatch() -> Self {
        Self::new(MockBehavior::LengthMismatch)
    }

    /// Backend that sleeps before answering
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Number of `translate` calls made against this backend
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Clone for MockBackend {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            calls: Arc::clone(&self.calls),
        }
    }
}

#[async_trait]
impl TranslationBackend for MockBackend {
    async fn translate(
        &self,
        texts: &[String],
        _source_language: &str,
        target_language: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockBehavior::Identity => Ok(texts.to_vec()),

            MockBehavior::Uppercase => Ok(texts.iter().map(|t| t.to_uppercase()).collect()),

            MockBehavior::Tagged => Ok(texts
                .iter()
                .map(|t| format!("[{}] {}", target_language, t))
                .collect()),

            MockBehavior::Failing(failure) => Err(failure.to_error()),

            MockBehavior::FailTimes { failure, times } => {
                if call < times {
                    Err(failure.to_error())
                } else {
                    Ok(texts.to_vec())
                }
            }

            MockBehavior::LengthMismatch => {
                let mut answers = texts.to_vec();
                answers.push("unexpected extra segment".to_string());
                Ok(answers)
            }

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(texts.to_vec())
            }
        }
    }
}
