//! Persistence layer for the Maknoon backend.
//!
//! This crate contains:
//! - Database connection management
//! - SQL migrations (`src/migrations`)
//! - Entity definitions (database row mappings)
//! - Repository implementations, including the transactional accept
//! - Query timing metrics

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
