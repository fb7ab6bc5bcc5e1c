//! Request identity
//!
//! What the gate knows about the caller after a token validates. Lives in
//! the request extensions for the duration of one request.

use serde::Serialize;

use crate::domain::value_object::{role::Role, subject_id::SubjectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub subject_id: SubjectId,
    pub role: Role,
}

impl Identity {
    pub fn new(subject_id: SubjectId, role: Role) -> Self {
        Self { subject_id, role }
    }
}

impl Serialize for Identity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("Identity", 2)?;
        state.serialize_field("subject_id", &self.subject_id.to_string())?;
        state.serialize_field("role", &self.role)?;
        state.end()
    }
}
