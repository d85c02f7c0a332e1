//! Chamber occupancy events and the zone model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{SubjectId, ValidationError};

/// One of the three arena regions a subject can occupy.
///
/// The cardinality is fixed by the apparatus; the enum is never extended at
/// runtime. Display labels shown to operators depend on the session protocol
/// and live in [`crate::protocol`], not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Empty,
    Middle,
    Stranger,
}

impl Zone {
    /// All zones, in canonical report column order.
    pub const ALL: [Self; 3] = [Self::Empty, Self::Middle, Self::Stranger];

    /// String representation for storage and the wire format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Middle => "middle",
            Self::Stranger => "stranger",
        }
    }

    /// Canonical capitalized name used in report columns.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Middle => "Middle",
            Self::Stranger => "Stranger",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Zone {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "empty" => Ok(Self::Empty),
            "middle" => Ok(Self::Middle),
            "stranger" => Ok(Self::Stranger),
            _ => Err(ValidationError::InvalidZone {
                value: s.to_string(),
            }),
        }
    }
}

/// An immutable occupancy observation: "subject X entered zone Z at time T".
///
/// Events are produced by the capture layer and consumed read-only by the
/// analyzer. Timestamps carry at least millisecond resolution; all duration
/// arithmetic downstream happens in millisecond coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChamberEvent {
    /// The subject that moved.
    pub subject: SubjectId,

    /// The zone it entered.
    pub zone: Zone,

    /// When the entry was observed.
    pub timestamp: DateTime<Utc>,
}

impl ChamberEvent {
    #[must_use]
    pub const fn new(subject: SubjectId, zone: Zone, timestamp: DateTime<Utc>) -> Self {
        Self {
            subject,
            zone,
            timestamp,
        }
    }
}
