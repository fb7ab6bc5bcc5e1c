//! Role Value Object
//!
//! A subject is either a client (posts restoration projects) or a master
//! (bids on them). The role is fixed at registration.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Master,
}

impl Role {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Master => "master",
        }
    }

    /// Parse a stored or transmitted role code
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "client" => Some(Role::Client),
            "master" => Some(Role::Master),
            _ => None,
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.trim() {
            "" => Err(AppError::bad_request("Role is required")
                .with_action("Choose either client or master")),
            code => Role::from_code(code).ok_or_else(|| {
                AppError::bad_request(format!("Unknown role `{}`", code))
                    .with_action("Choose either client or master")
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
