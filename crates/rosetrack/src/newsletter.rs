use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use rosetrack_common::Event;
use rosetrack_common::event::category;

use crate::emitter::EventEmitter;

static EMAIL_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").ok());

/// Why a newsletter signup did not go through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupError {
    /// The address failed the shape check; nothing was submitted.
    InvalidEmail,
    /// The submission callback failed.
    Submission(String),
}

impl fmt::Display for SignupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "Please enter a valid email"),
            Self::Submission(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SignupError {}

/// Loose `local@domain.tld` shape check.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email))
}

/// Tracks the outcome of newsletter signups.
pub struct NewsletterTracker {
    emitter: Arc<EventEmitter>,
}

impl NewsletterTracker {
    pub const fn new(emitter: Arc<EventEmitter>) -> Self {
        Self { emitter }
    }

    /// Validate `email`, run `submit`, and record the outcome.
    ///
    /// The address is checked as typed, surrounding whitespace included.
    /// Invalid addresses are rejected before `submit` runs and emit nothing.
    pub fn submitted<F>(&self, email: &str, submit: F) -> Result<(), SignupError>
    where
        F: FnOnce(&str) -> anyhow::Result<()>,
    {
        if !validate_email(email) {
            return Err(SignupError::InvalidEmail);
        }
        match submit(email) {
            Ok(()) => {
                self.emitter.emit(
                    &Event::new("newsletter_signup", category::ENGAGEMENT).with_label(email),
                );
                Ok(())
            }
            Err(e) => {
                let msg = format!("{e:#}");
                tracing::warn!("newsletter signup failed: {msg}");
                self.emitter.emit(
                    &Event::new("newsletter_signup_error", category::ERROR)
                        .with_label(msg.as_str()),
                );
                Err(SignupError::Submission(msg))
            }
        }
    }
}
