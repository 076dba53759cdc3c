//! Core Module for dbconn
//!
//! Shared infrastructure used by both the stateless functions and the
//! connection manager: the error taxonomy and the database layer.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{DbConnError, Result};
