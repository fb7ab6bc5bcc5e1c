//! In-memory Repository
//!
//! Process-local store with the same contract as [`super::PgAuthRepository`].
//! Used by the crate tests and for running the router without a database.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use crate::domain::entity::{
    credential::Credential,
    profile::{Profile, ProfileUpdate},
};
use crate::domain::repository::{CredentialRepository, ProfileRepository};
use crate::domain::value_object::{email::Email, role::Role, subject_id::SubjectId};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct State {
    credentials: HashMap<SubjectId, Credential>,
    profiles: HashMap<SubjectId, Profile>,
    /// Soft-deleted subjects
    deleted: HashSet<SubjectId>,
}

impl State {
    fn active_credential(&self, subject_id: &SubjectId) -> Option<&Credential> {
        if self.deleted.contains(subject_id) {
            return None;
        }
        self.credentials.get(subject_id)
    }

    fn active_by_email(&self, email: &Email) -> Option<&Credential> {
        self.credentials
            .values()
            .find(|c| c.email == *email && !self.deleted.contains(&c.subject_id))
    }
}

#[derive(Default)]
pub struct InMemoryAuthRepository {
    state: RwLock<State>,
    fail_profile_writes: AtomicBool,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following profile write fail with a persistence error
    pub fn fail_profile_writes(&self, fail: bool) {
        self.fail_profile_writes.store(fail, Ordering::SeqCst);
    }

    /// Mark a subject deleted; its email becomes free again
    pub async fn soft_delete(&self, subject_id: &SubjectId) {
        self.state.write().await.deleted.insert(*subject_id);
    }

    pub async fn credential_count(&self) -> usize {
        self.state.read().await.credentials.len()
    }

    pub async fn profile_count(&self) -> usize {
        self.state.read().await.profiles.len()
    }

    fn profile_write_fault(&self) -> AuthResult<()> {
        if self.fail_profile_writes.load(Ordering::SeqCst) {
            return Err(AuthError::Persistence("injected profile write failure".to_string()));
        }
        Ok(())
    }
}

impl CredentialRepository for InMemoryAuthRepository {
    async fn create(&self, credential: &Credential, profile: &Profile) -> AuthResult<()> {
        // One write guard for the whole unit; concurrent registrations serialize here
        let mut state = self.state.write().await;

        if state.active_by_email(&credential.email).is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        state
            .credentials
            .insert(credential.subject_id, credential.clone());

        if let Err(err) = self.profile_write_fault() {
            state.credentials.remove(&credential.subject_id);
            return Err(err);
        }

        state.profiles.insert(profile.subject_id(), profile.clone());

        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Credential>> {
        Ok(self.state.read().await.active_by_email(email).cloned())
    }

    async fn find_by_id(&self, subject_id: &SubjectId) -> AuthResult<Option<Credential>> {
        Ok(self.state.read().await.active_credential(subject_id).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.state.read().await.active_by_email(email).is_some())
    }
}

impl ProfileRepository for InMemoryAuthRepository {
    async fn find_by_subject(
        &self,
        subject_id: &SubjectId,
        role: Role,
    ) -> AuthResult<Option<Profile>> {
        let state = self.state.read().await;

        if state.active_credential(subject_id).is_none() {
            return Ok(None);
        }

        Ok(state
            .profiles
            .get(subject_id)
            .filter(|p| p.role() == role)
            .cloned())
    }

    async fn update_profile(
        &self,
        subject_id: &SubjectId,
        update: ProfileUpdate,
    ) -> AuthResult<Option<Profile>> {
        self.profile_write_fault()?;

        let mut state = self.state.write().await;

        if state.active_credential(subject_id).is_none() {
            return Ok(None);
        }

        let Some(current) = state.profiles.get(subject_id).cloned() else {
            return Ok(None);
        };

        let Some(updated) = update.apply(current) else {
            return Ok(None);
        };

        state.profiles.insert(*subject_id, updated.clone());

        Ok(Some(updated))
    }
}
