//! Value Object Module

pub mod display_name;
pub mod email;
pub mod phone;
pub mod role;
pub mod subject_id;
pub mod user_password;
