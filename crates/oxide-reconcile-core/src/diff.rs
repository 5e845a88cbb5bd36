//! Declared-versus-live field classification.
//!
//! [`classify`] compares the declared field list of an entity with the fields
//! introspected from its table and reports, for every declared field, whether
//! it is new, changed (and which attributes changed) or unchanged. Fields that
//! exist only in the live table are ignored: reconciliation never drops
//! columns.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::field::Field;
use crate::types::DataType;

/// Trailing `::type` cast the catalog appends to literal defaults, e.g.
/// `'draft'::character varying` or `'{}'::text[]`.
static TRAILING_CAST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"::[a-zA-Z_][a-zA-Z0-9_ ."]*(\(\s*\d+\s*(,\s*\d+\s*)?\))?(\[\])*$"#)
        .expect("valid cast pattern")
});

/// A numeric literal the catalog quoted, e.g. `'-1'` from `'-1'::integer`.
static QUOTED_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^'([+-]?\d+(\.\d+)?)'$").expect("valid quoted number pattern")
});

/// A compared column attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    /// Column type.
    DataType,
    /// Default expression.
    Default,
    /// Length or precision.
    Size,
    /// NULL / NOT NULL.
    Nullable,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DataType => "type",
            Self::Default => "default",
            Self::Size => "size",
            Self::Nullable => "nullable",
        })
    }
}

/// How a declared field relates to the live table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldStatus {
    /// No live column with this name.
    New,
    /// A live column exists and these attributes differ.
    Changed(BTreeSet<Attribute>),
    /// A live column exists and matches.
    Unchanged,
}

/// Classification result for one declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedField<'a> {
    /// The declared field.
    pub field: &'a Field,
    /// Its status against the live table.
    pub status: FieldStatus,
}

impl ChangedField<'_> {
    /// `true` if the column does not exist yet.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        matches!(self.status, FieldStatus::New)
    }

    /// `true` if the column exists and at least one attribute differs.
    #[must_use]
    pub const fn is_changed(&self) -> bool {
        matches!(self.status, FieldStatus::Changed(_))
    }

    /// Attributes that differ; empty unless [`is_changed`](Self::is_changed).
    #[must_use]
    pub fn changed_attributes(&self) -> BTreeSet<Attribute> {
        match &self.status {
            FieldStatus::Changed(attrs) => attrs.clone(),
            FieldStatus::New | FieldStatus::Unchanged => BTreeSet::new(),
        }
    }
}

/// Classifies every declared field against the live fields.
///
/// The output has one entry per declared field, in declared order. Lookup is
/// a linear scan by name; tables are small.
#[must_use]
pub fn classify<'a>(declared: &'a [Field], live: &[Field]) -> Vec<ChangedField<'a>> {
    declared
        .iter()
        .map(|field| {
            let status = match live.iter().find(|l| l.name == field.name) {
                None => FieldStatus::New,
                Some(current) => {
                    let attrs = compare(field, current);
                    if attrs.is_empty() {
                        FieldStatus::Unchanged
                    } else {
                        FieldStatus::Changed(attrs)
                    }
                }
            };
            ChangedField { field, status }
        })
        .collect()
}

/// Returns the attributes of `declared` that differ from `live`.
#[must_use]
pub fn compare(declared: &Field, live: &Field) -> BTreeSet<Attribute> {
    let mut attrs = BTreeSet::new();
    if declared.data_type != live.data_type {
        attrs.insert(Attribute::DataType);
    }
    if !defaults_match(declared, live) {
        attrs.insert(Attribute::Default);
    }
    if normalize_size(declared.data_type, declared.effective_size())
        != normalize_size(live.data_type, live.effective_size())
    {
        attrs.insert(Attribute::Size);
    }
    if declared.nullable != live.nullable {
        attrs.insert(Attribute::Nullable);
    }
    attrs
}

fn defaults_match(declared: &Field, live: &Field) -> bool {
    // Identity columns report no default and serial columns report their
    // sequence; neither is managed by ALTER COLUMN.
    if declared.auto_increment {
        return true;
    }

    let wanted = declared.default_expr().map(normalize_default);
    let current = live.default_expr().map(normalize_default);
    wanted == current
}

/// Strips whitespace and the trailing type cast the catalog adds to defaults.
///
/// Numeric literals the catalog quoted (`'-1'::integer`) are unquoted.
#[must_use]
pub fn normalize_default(expr: &str) -> String {
    let mut current = expr.trim().to_string();
    // Nested casts such as `('1'::text)::integer` are peeled one layer at a time.
    loop {
        let next = strip_wrapping_parens(TRAILING_CAST.replace(&current, "").trim()).to_string();
        if next == current || next.is_empty() {
            break;
        }
        current = next;
    }
    match QUOTED_NUMBER.captures(&current) {
        Some(caps) => caps[1].to_string(),
        None => current,
    }
}

fn strip_wrapping_parens(expr: &str) -> &str {
    let mut expr = expr;
    while expr.starts_with('(') && expr.ends_with(')') && balanced(&expr[1..expr.len() - 1]) {
        expr = expr[1..expr.len() - 1].trim();
    }
    expr
}

fn balanced(expr: &str) -> bool {
    let mut depth = 0_i32;
    for c in expr.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

fn normalize_size(data_type: DataType, size: Option<&str>) -> Option<String> {
    let size: String = size?.chars().filter(|c| !c.is_whitespace()).collect();
    if data_type == DataType::Numeric {
        if let Some(precision) = size.strip_suffix(",0") {
            return Some(precision.to_string());
        }
    }
    Some(size)
}
