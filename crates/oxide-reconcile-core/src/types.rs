//! Type mapping between declared type names and the PostgreSQL catalog.
//!
//! Three spellings exist for every supported type:
//!
//! - the **portable** name used in declarations and DDL (`varchar`, `int`, ...),
//! - the **catalog** name reported by `information_schema.columns.data_type`
//!   (`character varying`, `integer`, ...),
//! - the driver-native **udt** name (`varchar`, `int4`, ...), also accepted
//!   when reading the catalog.
//!
//! Host-language aliases (`string`, `int64`, ...) resolve to portable names
//! through [`host_to_portable`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Size used for sized character/bit types declared without one.
pub const DEFAULT_SIZE: &str = "255";

/// Column data types understood by the reconciliation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DataType {
    /// `character varying(n)`.
    Varchar,
    /// `character(n)`.
    Char,
    /// `bit varying(n)`.
    Varbit,
    /// `text`.
    Text,
    /// 16-bit integer.
    SmallInt,
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    BigInt,
    /// `boolean`.
    Bool,
    /// Arbitrary precision number, `numeric(p, s)`. `decimal` is an alias.
    Numeric,
    /// Single precision float.
    Float4,
    /// Double precision float.
    Float8,
    /// Calendar date.
    Date,
    /// Time of day without time zone.
    Time,
    /// Timestamp without time zone.
    Timestamp,
    /// Timestamp with time zone.
    Timestamptz,
    /// IPv4 or IPv6 host address.
    Inet,
    /// UUID.
    Uuid,
    /// Textual JSON.
    Json,
    /// Binary JSON.
    Jsonb,
    /// Binary data.
    Bytea,
}

impl DataType {
    /// Every supported type, in declaration order.
    pub const ALL: [Self; 20] = [
        Self::Varchar,
        Self::Char,
        Self::Varbit,
        Self::Text,
        Self::SmallInt,
        Self::Int,
        Self::BigInt,
        Self::Bool,
        Self::Numeric,
        Self::Float4,
        Self::Float8,
        Self::Date,
        Self::Time,
        Self::Timestamp,
        Self::Timestamptz,
        Self::Inet,
        Self::Uuid,
        Self::Json,
        Self::Jsonb,
        Self::Bytea,
    ];

    /// Returns the portable name, which is also what DDL renders.
    #[must_use]
    pub const fn portable_name(self) -> &'static str {
        match self {
            Self::Varchar => "varchar",
            Self::Char => "char",
            Self::Varbit => "varbit",
            Self::Text => "text",
            Self::SmallInt => "smallint",
            Self::Int => "int",
            Self::BigInt => "bigint",
            Self::Bool => "bool",
            Self::Numeric => "numeric",
            Self::Float4 => "float4",
            Self::Float8 => "float8",
            Self::Date => "date",
            Self::Time => "time",
            Self::Timestamp => "timestamp",
            Self::Timestamptz => "timestamptz",
            Self::Inet => "inet",
            Self::Uuid => "uuid",
            Self::Json => "json",
            Self::Jsonb => "jsonb",
            Self::Bytea => "bytea",
        }
    }

    /// Returns the spelling used by `information_schema.columns.data_type`.
    #[must_use]
    pub const fn catalog_name(self) -> &'static str {
        match self {
            Self::Varchar => "character varying",
            Self::Char => "character",
            Self::Varbit => "bit varying",
            Self::Text => "text",
            Self::SmallInt => "smallint",
            Self::Int => "integer",
            Self::BigInt => "bigint",
            Self::Bool => "boolean",
            Self::Numeric => "numeric",
            Self::Float4 => "real",
            Self::Float8 => "double precision",
            Self::Date => "date",
            Self::Time => "time without time zone",
            Self::Timestamp => "timestamp without time zone",
            Self::Timestamptz => "timestamp with time zone",
            Self::Inet => "inet",
            Self::Uuid => "uuid",
            Self::Json => "json",
            Self::Jsonb => "jsonb",
            Self::Bytea => "bytea",
        }
    }

    /// Parses a portable name. `decimal` resolves to [`DataType::Numeric`], so
    /// it maps back as `numeric` and an unsized `decimal` renders as bare
    /// `numeric`.
    #[must_use]
    pub fn from_portable(name: &str) -> Option<Self> {
        if name == "decimal" {
            return Some(Self::Numeric);
        }
        Self::ALL.into_iter().find(|t| t.portable_name() == name)
    }

    /// Parses a catalog spelling, either the `data_type` or the `udt_name`
    /// form.
    #[must_use]
    pub fn from_catalog(name: &str) -> Option<Self> {
        if let Some(t) = Self::ALL.into_iter().find(|t| t.catalog_name() == name) {
            return Some(t);
        }
        let t = match name {
            "varchar" => Self::Varchar,
            "bpchar" => Self::Char,
            "varbit" => Self::Varbit,
            "text" => Self::Text,
            "int2" => Self::SmallInt,
            "int4" => Self::Int,
            "int8" => Self::BigInt,
            "bool" => Self::Bool,
            "numeric" => Self::Numeric,
            "float4" => Self::Float4,
            "float8" => Self::Float8,
            "date" => Self::Date,
            "time" => Self::Time,
            "timestamp" => Self::Timestamp,
            "timestamptz" => Self::Timestamptz,
            "inet" => Self::Inet,
            "uuid" => Self::Uuid,
            "json" => Self::Json,
            "jsonb" => Self::Jsonb,
            "bytea" => Self::Bytea,
            _ => return None,
        };
        Some(t)
    }

    /// Resolves a host-language type alias (`string`, `int64`, ...).
    #[must_use]
    pub fn from_host(name: &str) -> Option<Self> {
        let t = match name {
            "string" => Self::Varchar,
            "int64" => Self::BigInt,
            "int" | "int8" | "int16" | "int32" => Self::Int,
            "bool" => Self::Bool,
            "float32" | "float64" => Self::Numeric,
            "ip" => Self::Inet,
            "datetime" => Self::Timestamp,
            "duration" => Self::Time,
            _ => return None,
        };
        Some(t)
    }

    /// Whether DDL renders a parenthesized length or precision for this type.
    #[must_use]
    pub const fn is_sized(self) -> bool {
        matches!(self, Self::Varchar | Self::Char | Self::Varbit | Self::Numeric)
    }

    /// Size used when a declaration does not give one. Only the character and
    /// bit types have one; an unsized `numeric` is left unconstrained.
    #[must_use]
    pub const fn default_size(self) -> Option<&'static str> {
        match self {
            Self::Varchar | Self::Char | Self::Varbit => Some(DEFAULT_SIZE),
            _ => None,
        }
    }

    /// Renders the type for DDL, with `size` in parentheses for sized types.
    #[must_use]
    pub fn render(self, size: Option<&str>) -> String {
        let name = self.portable_name();
        if !self.is_sized() {
            return name.to_string();
        }
        match size.filter(|s| !s.is_empty()).or(self.default_size()) {
            Some(size) => format!("{name}({size})"),
            None => name.to_string(),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.portable_name())
    }
}

impl FromStr for DataType {
    type Err = SchemaError;

    /// Accepts portable names first, then host aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::from_portable(&name)
            .or_else(|| Self::from_host(&name))
            .ok_or_else(|| SchemaError::UnsupportedType(s.to_string()))
    }
}

impl TryFrom<String> for DataType {
    type Error = SchemaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DataType> for String {
    fn from(value: DataType) -> Self {
        value.portable_name().to_string()
    }
}

/// Maps a portable name to its catalog spelling. `None` means unsupported.
#[must_use]
pub fn portable_to_catalog(name: &str) -> Option<&'static str> {
    DataType::from_portable(name).map(DataType::catalog_name)
}

/// Maps a catalog spelling (or udt name) to its portable name. `None` means
/// unsupported.
#[must_use]
pub fn catalog_to_portable(name: &str) -> Option<&'static str> {
    DataType::from_catalog(name).map(DataType::portable_name)
}

/// Maps a host-language alias to a portable name. `None` means unsupported.
#[must_use]
pub fn host_to_portable(name: &str) -> Option<&'static str> {
    DataType::from_host(name).map(DataType::portable_name)
}
