//! Core type definitions with validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input-contract violations reported by the core.
///
/// All variants are deterministic caller errors, not transient failures;
/// retrying the same input reproduces the same error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The event log contained no events at all.
    #[error("event log contains no events")]
    EmptyInput,

    /// A subject identifier was empty or whitespace-only.
    #[error("subject ID cannot be empty")]
    EmptySubjectId,

    /// The session end precedes the earliest event in the log.
    #[error("session end {end} precedes the first event at {start}")]
    InvalidSessionBound {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// The session end precedes a subject's own last recorded event.
    #[error("session end {session_end} precedes the last event for subject {subject} at {last_event}")]
    SessionBoundTooEarly {
        subject: SubjectId,
        last_event: DateTime<Utc>,
        session_end: DateTime<Utc>,
    },

    /// A subject's events compared out of order after the stable sort.
    #[error("events for subject {subject} are out of order after sorting")]
    UnorderedEvents { subject: SubjectId },

    /// A negative step or tail delta was observed during accumulation.
    /// Negative deltas are never clamped to zero; they indicate a bug in
    /// the caller's timestamp generation.
    #[error("negative time delta of {delta_ms} ms while accumulating subject {subject}")]
    NegativeDelta { subject: SubjectId, delta_ms: i64 },

    /// A subject appeared more than once in a roster.
    #[error("duplicate subject {subject} in roster")]
    DuplicateSubject { subject: SubjectId },

    /// Invalid zone name.
    #[error("invalid zone: {value}")]
    InvalidZone { value: String },

    /// Invalid protocol name.
    #[error("invalid protocol: {value}")]
    InvalidProtocol { value: String },
}

/// A validated subject identifier.
///
/// Subject IDs must be non-empty, non-whitespace strings. They are opaque to
/// the analyzer; naming conventions (cage numbers, ear tags) belong to the
/// caller. The ordering is plain lexicographic string order, which is what
/// keeps report rows deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectId(String);

impl SubjectId {
    /// Creates a new subject ID after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptySubjectId);
        }
        Ok(Self(id))
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SubjectId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SubjectId> for String {
    fn from(id: SubjectId) -> Self {
        id.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SubjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
