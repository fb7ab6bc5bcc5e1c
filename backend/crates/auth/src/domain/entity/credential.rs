//! Credential Entity
//!
//! Email, password hash and role of one subject. Created at registration
//! and never mutated by the auth flows.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, role::Role, subject_id::SubjectId, user_password::UserPassword,
};

#[derive(Debug, Clone)]
pub struct Credential {
    pub subject_id: SubjectId,
    /// Unique among active credentials
    pub email: Email,
    pub password: UserPassword,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Credential {
    /// Create a credential for a new subject
    pub fn new(email: Email, password: UserPassword, role: Role) -> Self {
        let now = Utc::now();

        Self {
            subject_id: SubjectId::new(),
            email,
            password,
            role,
            created_at: now,
            updated_at: now,
        }
    }
}
