//! Startup and tooling services.

pub mod admin_bootstrap;
pub mod test_profiles;

pub use admin_bootstrap::{bootstrap_admins, BootstrapError};
pub use test_profiles::{seed_test_profiles, SeedError, DEFAULT_PROFILES_PER_GENDER};
