//! Text-completion service access
//!
//! The controller talks to the completion service only through the
//! [`CompletionClient`] trait; [`OpenAiClient`] is the production backend.

mod client;

use std::fmt;
use std::future::Future;

use thiserror::Error;

use crate::prompt::{RenderedPrompt, SubmitError};

pub use client::OpenAiClient;

/// Failures reported by a completion backend
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompletionError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("rate limited by the completion service: {0}")]
    RateLimit(String),
    #[error("completion service temporarily unavailable: {0}")]
    TransientNetwork(String),
    #[error("completion service error ({status}): {message}")]
    Service { status: u16, message: String },
    #[error("unexpected response from completion service: {0}")]
    MalformedResponse(String),
}

impl CompletionError {
    /// Whether pressing improve again has a reasonable chance of succeeding
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimit(_) | Self::TransientNetwork(_))
    }
}

/// Sampling temperature, guaranteed to lie in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Temperature(f32);

impl Temperature {
    pub fn new(value: f32) -> Result<Self, SubmitError> {
        // NaN fails the range check
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SubmitError::TemperatureOutOfRange(value))
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// A backend that turns a prompt into generated text.
///
/// One call is one attempt; implementations must not retry.
pub trait CompletionClient: Send + Sync {
    fn complete(
        &self,
        prompt: &RenderedPrompt,
        temperature: Temperature,
        api_key: &str,
    ) -> impl Future<Output = Result<String, CompletionError>> + Send;
}
