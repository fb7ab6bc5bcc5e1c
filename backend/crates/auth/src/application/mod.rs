//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod profile;
pub mod sign_in;
pub mod sign_up;
pub mod token;

// Re-exports
pub use config::AuthConfig;
pub use profile::{GetProfileUseCase, ProfileView, UpdateProfileInput, UpdateProfileUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use token::{ClaimSet, TokenService};
