//! Database Module
//!
//! This module turns a named entry of the connection file into something a
//! database client can open, organized into focused submodules:
//!
//! ## Architecture
//!
//! - **Dialects** (`dialect.rs`): Maps declared `type` tags to a family and driver
//! - **Resolution** (`resolver.rs`): Looks a name up and validates its record
//! - **URI building** (`url.rs`): Formats the connection string
//! - **Engines** (`engine.rs`): The factory seam that hands the URI to a client library
//!
//! ## Error Handling
//!
//! All operations use the standardized `DbConnError` type and fail fast; a
//! caller either gets a fully validated value or an error, never a partial one.
pub mod dialect;
pub mod engine;
pub mod resolver;
pub mod url;

pub use dialect::*;
pub use engine::*;
pub use resolver::*;
pub use url::{build, ConnectionUrl};
