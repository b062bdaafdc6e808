//! Shared utilities and common types for the Maknoon backend.
//!
//! This crate provides functionality used across the other crates:
//! - Identity token verification (JWT)
//! - Field validation for profiles and messages
//! - Cursor pagination for chat history

pub mod jwt;
pub mod pagination;
pub mod validation;
