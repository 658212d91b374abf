//! Prompt construction for the email improver
//!
//! A [`PromptRequest`] captures the user's form inputs; [`render`] fills the
//! fixed improvement template with them.

mod template;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MAX_EMAIL_CHARS;

pub use template::{RenderedPrompt, TemplateError, render};

/// Register of English the improved email should use
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Formal,
    Informal,
}

impl Tone {
    pub const ALL: [Tone; 2] = [Tone::Formal, Tone::Informal];

    pub fn label(self) -> &'static str {
        match self {
            Self::Formal => "Formal",
            Self::Informal => "Informal",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Formal => Self::Informal,
            Self::Informal => Self::Formal,
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// English dialect variant the improved email is tailored to
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    American,
    #[default]
    British,
}

impl Dialect {
    pub const ALL: [Dialect; 2] = [Dialect::American, Dialect::British];

    pub fn label(self) -> &'static str {
        match self {
            Self::American => "American",
            Self::British => "British",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::American => Self::British,
            Self::British => Self::American,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reasons a submission is refused before any prompt is sent
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SubmitError {
    #[error("temperature {0} is outside the range 0.0 to 1.0")]
    TemperatureOutOfRange(f32),
    #[error("email is {len} characters long; the limit is {max}")]
    EmailTooLong { len: usize, max: usize },
}

/// One submission's worth of form input. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    tone: Tone,
    dialect: Dialect,
    email_body: String,
}

impl PromptRequest {
    pub fn new(
        tone: Tone,
        dialect: Dialect,
        email_body: impl Into<String>,
    ) -> Result<Self, SubmitError> {
        let email_body = email_body.into();
        let len = email_body.chars().count();
        if len > MAX_EMAIL_CHARS {
            return Err(SubmitError::EmailTooLong {
                len,
                max: MAX_EMAIL_CHARS,
            });
        }
        Ok(Self {
            tone,
            dialect,
            email_body,
        })
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn email_body(&self) -> &str {
        &self.email_body
    }
}
