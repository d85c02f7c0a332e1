//! Protocol phases and zone display labels.
//!
//! The three-chamber test runs in two phases. During sociability the test
//! mouse chooses between an empty chamber and one holding a stranger; during
//! the social novelty phase the formerly empty chamber holds the now-familiar
//! mouse and the stranger chamber a novel one. The chambers themselves never
//! change, so labels are a pure lookup over `(protocol, zone)` layered on top
//! of the analyzer, which only ever sees [`Zone`] values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::event::Zone;
use crate::types::ValidationError;

/// Which phase of the three-chamber test a session ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    #[default]
    Sociability,
    SocialNovelty,
}

impl Protocol {
    /// String representation for storage and configuration.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sociability => "sociability",
            Self::SocialNovelty => "social_novelty",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Protocol {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sociability" => Ok(Self::Sociability),
            "social_novelty" => Ok(Self::SocialNovelty),
            _ => Err(ValidationError::InvalidProtocol {
                value: s.to_string(),
            }),
        }
    }
}

/// Operator-facing label for a zone under the given protocol.
#[must_use]
pub const fn zone_label(protocol: Protocol, zone: Zone) -> &'static str {
    match (protocol, zone) {
        (Protocol::Sociability, Zone::Empty) => "Empty",
        (Protocol::Sociability, Zone::Middle) | (Protocol::SocialNovelty, Zone::Middle) => {
            "Middle"
        }
        (Protocol::Sociability, Zone::Stranger) => "Stranger",
        (Protocol::SocialNovelty, Zone::Empty) => "Familiar",
        (Protocol::SocialNovelty, Zone::Stranger) => "Novel",
    }
}
