//! Dialect Module
//!
//! Maps the `type` tag declared in a connection record to a database
//! family and the client driver used to speak its wire protocol.

use crate::core::{DbConnError, Result};
use std::fmt;

/// Database vendor family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Microsoft SQL Server
    MsSql,
    /// PostgreSQL
    Postgres,
}

/// Every accepted `type` tag and the dialect it selects.
///
/// Tags are matched exactly; adding a vendor means adding a variant and
/// its rows here.
pub const DIALECT_ALIASES: &[(&str, Dialect)] = &[
    ("mssql", Dialect::MsSql),
    ("sql-server", Dialect::MsSql),
    ("postgres", Dialect::Postgres),
    ("postgresql", Dialect::Postgres),
];

impl Dialect {
    /// Looks up a declared `type` tag in [`DIALECT_ALIASES`].
    pub fn from_tag(tag: &str) -> Result<Self> {
        DIALECT_ALIASES
            .iter()
            .find(|(alias, _)| *alias == tag)
            .map(|(_, dialect)| *dialect)
            .ok_or_else(|| DbConnError::UnsupportedDialect(tag.to_string()))
    }

    /// Driver tag placed after the `+` in a connection URI.
    pub fn driver(&self) -> &'static str {
        match self {
            Dialect::MsSql => "pymssql",
            Dialect::Postgres => "psycopg2",
        }
    }

    /// Canonical tag for this family.
    pub fn canonical_tag(&self) -> &'static str {
        match self {
            Dialect::MsSql => "mssql",
            Dialect::Postgres => "postgresql",
        }
    }

    /// Tags accepted for this family, in table order.
    pub fn aliases(&self) -> impl Iterator<Item = &'static str> + '_ {
        DIALECT_ALIASES
            .iter()
            .filter(move |(_, dialect)| dialect == self)
            .map(|(alias, _)| *alias)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_tag())
    }
}
