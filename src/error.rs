use thiserror::Error;

/// Data-integrity failures raised while building a family graph.
///
/// Any of these aborts the load; no partially linked graph is ever handed out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FamilyDataError {
    #[error("person not found: {person_id}")]
    PersonNotFound { person_id: String },

    #[error("event {event_id} references unknown person {person_id}")]
    EventOwnerNotFound { event_id: String, person_id: String },

    #[error("duplicate person record: {person_id}")]
    DuplicatePerson { person_id: String },

    #[error("person {person_id} references itself as {relation}")]
    SelfReference {
        person_id: String,
        relation: &'static str,
    },

    #[error("person {person_id} lists the same record as mother and father")]
    IdenticalParents { person_id: String },

    #[error("duplicate event record: {event_id}")]
    DuplicateEvent { event_id: String },

    #[error("cyclic ancestry detected at person {person_id}")]
    CyclicAncestry { person_id: String },

    #[error("spouse {person_id} is also an ancestor of the user")]
    SpouseIsAncestor { person_id: String },
}

impl FamilyDataError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::PersonNotFound { .. } | Self::EventOwnerNotFound { .. } => "DATA_NOT_FOUND",
            Self::DuplicatePerson { .. } | Self::DuplicateEvent { .. } => "DUPLICATE_RECORD",
            Self::SelfReference { .. }
            | Self::IdenticalParents { .. }
            | Self::CyclicAncestry { .. } => "MALFORMED_ANCESTRY",
            Self::SpouseIsAncestor { .. } => "MALFORMED_SPOUSE",
        }
    }
}
