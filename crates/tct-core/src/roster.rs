//! Subject roster and key-binding grid for the capture layer.
//!
//! The recording UI maps one keyboard row per subject to the three zones.
//! The roster is built once from configuration and passed around as an
//! immutable value; the analyzer never sees it, only the opaque subject IDs
//! that end up on events.

use crate::event::Zone;
use crate::types::{SubjectId, ValidationError};

/// Keys for one subject, in [`Zone::ALL`] order (empty, middle, stranger).
pub type KeyRow = [char; 3];

/// Keyboard rows handed out to subjects in roster order. Sessions track at
/// most four subjects at a time; subjects past the grid stay unbound.
const DEFAULT_KEY_GRID: [KeyRow; 4] = [
    ['q', 'w', 'e'],
    ['a', 's', 'd'],
    ['z', 'x', 'c'],
    ['u', 'i', 'o'],
];

/// One subject's key assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub subject: SubjectId,
    pub keys: KeyRow,
}

impl Binding {
    /// The key that records an entry into `zone`.
    #[must_use]
    pub const fn key_for(&self, zone: Zone) -> char {
        match zone {
            Zone::Empty => self.keys[0],
            Zone::Middle => self.keys[1],
            Zone::Stranger => self.keys[2],
        }
    }
}

/// Immutable subject list plus derived key bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    subjects: Vec<SubjectId>,
    bindings: Vec<Binding>,
}

impl Roster {
    /// Builds a roster, assigning default key rows to the first subjects in
    /// order. Rejects empty and duplicate subject IDs.
    pub fn with_default_bindings<I, S>(subjects: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut validated: Vec<SubjectId> = Vec::new();
        for subject in subjects {
            let subject = SubjectId::new(subject)?;
            if validated.contains(&subject) {
                return Err(ValidationError::DuplicateSubject { subject });
            }
            validated.push(subject);
        }

        let bindings = validated
            .iter()
            .zip(DEFAULT_KEY_GRID)
            .map(|(subject, keys)| Binding {
                subject: subject.clone(),
                keys,
            })
            .collect();

        Ok(Self {
            subjects: validated,
            bindings,
        })
    }

    /// All subjects, in configuration order.
    #[must_use]
    pub fn subjects(&self) -> &[SubjectId] {
        &self.subjects
    }

    /// Key assignments for the bound subjects.
    #[must_use]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// The binding for one subject, if it received a key row.
    #[must_use]
    pub fn binding_for(&self, subject: &SubjectId) -> Option<&Binding> {
        self.bindings.iter().find(|b| &b.subject == subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_assigns_rows_in_order() {
        let roster = Roster::with_default_bindings(["m1", "m2"]).unwrap();

        assert_eq!(roster.subjects().len(), 2);
        assert_eq!(roster.bindings().len(), 2);
        assert_eq!(roster.bindings()[0].keys, ['q', 'w', 'e']);
        assert_eq!(roster.bindings()[1].keys, ['a', 's', 'd']);
    }

    #[test]
    fn key_for_follows_zone_order() {
        let roster = Roster::with_default_bindings(["m1"]).unwrap();
        let binding = &roster.bindings()[0];

        assert_eq!(binding.key_for(Zone::Empty), 'q');
        assert_eq!(binding.key_for(Zone::Middle), 'w');
        assert_eq!(binding.key_for(Zone::Stranger), 'e');
    }

    #[test]
    fn subjects_past_the_grid_stay_unbound() {
        let roster =
            Roster::with_default_bindings(["m1", "m2", "m3", "m4", "m5"]).unwrap();

        assert_eq!(roster.subjects().len(), 5);
        assert_eq!(roster.bindings().len(), 4);
        let m5 = SubjectId::new("m5").unwrap();
        assert!(roster.binding_for(&m5).is_none());
    }

    #[test]
    fn duplicate_subjects_are_rejected() {
        let err = Roster::with_default_bindings(["m1", "m1"]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DuplicateSubject {
                subject: SubjectId::new("m1").unwrap(),
            }
        );
    }

    #[test]
    fn empty_subject_ids_are_rejected() {
        assert_eq!(
            Roster::with_default_bindings([""]),
            Err(ValidationError::EmptySubjectId)
        );
    }
}
