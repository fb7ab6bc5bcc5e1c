//! Profile Entities
//!
//! Every credential owns exactly one role-specific profile, keyed by the
//! same subject id. Registration creates a stub carrying the name and
//! phone; masters fill in the rest later.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    display_name::DisplayName, phone::Phone, role::Role, subject_id::SubjectId,
};

#[derive(Debug, Clone)]
pub struct ClientProfile {
    pub subject_id: SubjectId,
    pub name: DisplayName,
    pub phone: Option<Phone>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct MasterProfile {
    pub subject_id: SubjectId,
    pub name: DisplayName,
    pub phone: Option<Phone>,
    pub description: String,
    pub city: String,
    pub specializations: Vec<String>,
    /// Lowest price the master quotes, in whole currency units
    pub price_from: i32,
    /// Maintained by the review flow; read-only here
    pub rating: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum Profile {
    Client(ClientProfile),
    Master(MasterProfile),
}

impl Profile {
    /// Profile created alongside a new credential
    pub fn stub(
        subject_id: SubjectId,
        role: Role,
        name: DisplayName,
        phone: Option<Phone>,
    ) -> Self {
        let now = Utc::now();

        match role {
            Role::Client => Profile::Client(ClientProfile {
                subject_id,
                name,
                phone,
                created_at: now,
                updated_at: now,
            }),
            Role::Master => Profile::Master(MasterProfile {
                subject_id,
                name,
                phone,
                description: String::new(),
                city: String::new(),
                specializations: Vec::new(),
                price_from: 0,
                rating: 0.0,
                created_at: now,
                updated_at: now,
            }),
        }
    }

    pub fn subject_id(&self) -> SubjectId {
        match self {
            Profile::Client(p) => p.subject_id,
            Profile::Master(p) => p.subject_id,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Profile::Client(_) => Role::Client,
            Profile::Master(_) => Role::Master,
        }
    }
}

/// Fields a subject may change on their own profile
#[derive(Debug, Clone)]
pub enum ProfileUpdate {
    Client {
        name: DisplayName,
        phone: Option<Phone>,
    },
    Master {
        name: DisplayName,
        description: String,
        city: String,
        specializations: Vec<String>,
        price_from: i32,
    },
}

impl ProfileUpdate {
    pub fn role(&self) -> Role {
        match self {
            ProfileUpdate::Client { .. } => Role::Client,
            ProfileUpdate::Master { .. } => Role::Master,
        }
    }

    /// Apply to a profile of the same role; `None` on a role mismatch
    pub fn apply(self, profile: Profile) -> Option<Profile> {
        let now = Utc::now();

        match (self, profile) {
            (ProfileUpdate::Client { name, phone }, Profile::Client(p)) => {
                Some(Profile::Client(ClientProfile {
                    name,
                    phone,
                    updated_at: now,
                    ..p
                }))
            }
            (
                ProfileUpdate::Master {
                    name,
                    description,
                    city,
                    specializations,
                    price_from,
                },
                Profile::Master(p),
            ) => Some(Profile::Master(MasterProfile {
                name,
                description,
                city,
                specializations,
                price_from,
                updated_at: now,
                ..p
            })),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> DisplayName {
        DisplayName::new(s).unwrap()
    }

    #[test]
    fn test_stub_follows_role() {
        let id = SubjectId::new();

        let client = Profile::stub(id, Role::Client, name("Anna"), None);
        assert_eq!(client.role(), Role::Client);
        assert_eq!(client.subject_id(), id);

        let Profile::Master(master) = Profile::stub(id, Role::Master, name("Ivan"), None) else {
            panic!("expected master profile");
        };
        assert_eq!(master.rating, 0.0);
        assert_eq!(master.price_from, 0);
        assert!(master.specializations.is_empty());
    }

    #[test]
    fn test_update_keeps_identity_and_rating() {
        let id = SubjectId::new();
        let mut stub = Profile::stub(id, Role::Master, name("Ivan"), None);
        if let Profile::Master(p) = &mut stub {
            p.rating = 4.5;
        }

        let update = ProfileUpdate::Master {
            name: name("Ivan Petrov"),
            description: "Antique chairs".into(),
            city: "Kazan".into(),
            specializations: vec!["upholstery".into()],
            price_from: 1500,
        };
        let Some(Profile::Master(updated)) = update.apply(stub) else {
            panic!("expected master profile");
        };
        assert_eq!(updated.subject_id, id);
        assert_eq!(updated.rating, 4.5);
        assert_eq!(updated.name.as_str(), "Ivan Petrov");
        assert_eq!(updated.price_from, 1500);
    }

    #[test]
    fn test_update_rejects_role_mismatch() {
        let stub = Profile::stub(SubjectId::new(), Role::Client, name("Anna"), None);
        let update = ProfileUpdate::Master {
            name: name("Anna"),
            description: String::new(),
            city: String::new(),
            specializations: Vec::new(),
            price_from: 0,
        };
        assert!(update.apply(stub).is_none());
    }
}
