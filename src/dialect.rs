//! Target SQL dialects
//!
//! A dialect decides three things about the generated script: how
//! identifiers are quoted, how the synthetic auto-increment primary key is
//! declared, and which type name each inferred semantic type maps to.

use std::fmt;
use std::str::FromStr;

use sqlparser::ast::Ident;

use crate::error::ConvertError;
use crate::inference::SemanticType;

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// MySQL / MariaDB
    MySql,
    /// PostgreSQL
    #[default]
    Postgres,
}

impl Dialect {
    /// Lower-case name used in configuration and in the script header
    pub fn name(self) -> &'static str {
        match self {
            Dialect::MySql => "mysql",
            Dialect::Postgres => "postgres",
        }
    }

    /// Character used to quote identifiers
    pub fn quote_char(self) -> char {
        match self {
            Dialect::MySql => '`',
            Dialect::Postgres => '"',
        }
    }

    /// Quote an identifier for this dialect
    ///
    /// Rendered through sqlparser's `Ident` so the output matches what its
    /// parser accepts for the same dialect.
    pub fn quote_ident(self, name: &str) -> String {
        Ident::with_quote(self.quote_char(), name).to_string()
    }

    /// Column definition for the synthetic auto-increment primary key
    pub fn primary_key_definition(self) -> String {
        let id = self.quote_ident("id");
        match self {
            Dialect::MySql => format!("{id} INT AUTO_INCREMENT PRIMARY KEY"),
            Dialect::Postgres => format!("{id} SERIAL PRIMARY KEY"),
        }
    }

    /// SQL type name for a semantic type
    ///
    /// Every (dialect, type) pair is spelled out; adding a variant to
    /// either enum fails to compile until it is mapped here.
    pub fn sql_type_name(self, semantic: SemanticType) -> &'static str {
        match (self, semantic) {
            (Dialect::MySql, SemanticType::Boolean) => "BOOLEAN",
            (Dialect::MySql, SemanticType::Date) => "DATE",
            (Dialect::MySql, SemanticType::Integer) => "INT",
            (Dialect::MySql, SemanticType::Float) => "FLOAT",
            (Dialect::MySql, SemanticType::Text) => "TEXT",
            (Dialect::Postgres, SemanticType::Boolean) => "BOOLEAN",
            (Dialect::Postgres, SemanticType::Date) => "DATE",
            (Dialect::Postgres, SemanticType::Integer) => "INTEGER",
            (Dialect::Postgres, SemanticType::Float) => "REAL",
            (Dialect::Postgres, SemanticType::Text) => "TEXT",
        }
    }

    /// Escape the body of a single-quoted string literal
    ///
    /// Both dialects accept a doubled single quote. Nothing else is escaped,
    /// so backslashes reach the script verbatim. MySQL scripts therefore
    /// expect the server to run with `NO_BACKSLASH_ESCAPES` when values
    /// contain `\`; PostgreSQL treats them literally with the default
    /// `standard_conforming_strings`.
    pub fn escape_string_body(self, value: &str) -> String {
        match self {
            Dialect::MySql | Dialect::Postgres => value.replace('\'', "''"),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" => Ok(Dialect::MySql),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            _ => Err(ConvertError::UnsupportedDialect(s.to_string())),
        }
    }
}
