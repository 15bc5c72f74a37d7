//! Why a villager could not find their words.
use std::{fmt, time::Duration};

use super::{broker::DialogueProviderKind, types::DialogueRequestId};

/// Longest back-off honoured from a provider's rate limit.
pub const MAX_RETRY_AFTER_SECS: f32 = 300.0;

fn clamp_retry_after(seconds: f32) -> f32 {
    if seconds.is_nan() {
        0.0
    } else {
        seconds.clamp(0.0, MAX_RETRY_AFTER_SECS)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogueErrorKind {
    /// The provider asked us to back off; the request is queued again.
    RateLimited { retry_after_seconds: f32 },
    ProviderFailure { message: String },
    ContextMissing { missing: DialogueContextSource },
}

impl DialogueErrorKind {
    pub fn rate_limited(retry_after_seconds: f32) -> Self {
        Self::RateLimited {
            retry_after_seconds: clamp_retry_after(retry_after_seconds),
        }
    }

    pub fn provider_failure(message: impl Into<String>) -> Self {
        Self::ProviderFailure {
            message: message.into(),
        }
    }

    pub fn context_missing(missing: DialogueContextSource) -> Self {
        Self::ContextMissing { missing }
    }

    /// Stable snake_case name used in telemetry.
    pub fn code(&self) -> &'static str {
        match self {
            Self::RateLimited { .. } => "rate_limited",
            Self::ProviderFailure { .. } => "provider_failure",
            Self::ContextMissing { .. } => "context_missing",
        }
    }
}

impl fmt::Display for DialogueErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited {
                retry_after_seconds,
            } => write!(f, "rate limited for {:.1}s", retry_after_seconds),
            Self::ProviderFailure { message } => write!(f, "provider failed: {}", message),
            Self::ContextMissing { missing } => write!(f, "request has no {}", missing),
        }
    }
}

/// Parts of the request context a provider cannot do without.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogueContextSource {
    Persona,
    SpeakerName,
}

impl DialogueContextSource {
    pub fn label(self) -> &'static str {
        match self {
            Self::Persona => "persona",
            Self::SpeakerName => "speaker name",
        }
    }
}

impl fmt::Display for DialogueContextSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone)]
pub struct DialogueError {
    pub request_id: DialogueRequestId,
    pub provider: DialogueProviderKind,
    pub kind: DialogueErrorKind,
}

impl DialogueError {
    pub fn new(
        request_id: DialogueRequestId,
        provider: DialogueProviderKind,
        kind: DialogueErrorKind,
    ) -> Self {
        Self {
            request_id,
            provider,
            kind,
        }
    }

    /// `Some` only for rate limits.
    pub fn retry_delay(&self) -> Option<Duration> {
        match self.kind {
            DialogueErrorKind::RateLimited {
                retry_after_seconds,
            } => Duration::try_from_secs_f32(clamp_retry_after(retry_after_seconds)).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for DialogueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} via {}: {}", self.request_id, self.provider, self.kind)
    }
}

impl std::error::Error for DialogueError {}
