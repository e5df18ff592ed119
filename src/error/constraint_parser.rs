use regex::Regex;
use std::sync::OnceLock;

/// Extracts structured details from PostgreSQL constraint violation messages.
///
/// Constraint names follow the Postgres defaults used by the migrations:
/// `<table>_<column>_key` for unique constraints, `<table>_<column>_fkey` for
/// foreign keys and `<table>_<column>_check` for check constraints.
pub struct ConstraintParser;

struct Patterns {
    key_value: Regex,
    column: Regex,
    relation: Regex,
}

static PATTERNS: OnceLock<Patterns> = OnceLock::new();

// Tables whose names contain an underscore, longest first so prefixes resolve correctly.
const KNOWN_TABLES: &[&str] = &[
    "auth_sessions",
    "diner_orders",
    "order_items",
    "menu_items",
    "user_roles",
    "franchises",
    "stores",
    "users",
];

impl ConstraintParser {
    fn patterns() -> &'static Patterns {
        PATTERNS.get_or_init(|| Patterns {
            key_value: Regex::new(r"Key \(([^)]+)\)=\(([^)]*)\)").expect("valid key/value pattern"),
            column: Regex::new(r#"column "([^"]+)""#).expect("valid column pattern"),
            relation: Regex::new(r#"(?:relation|table) "([^"]+)""#).expect("valid relation pattern"),
        })
    }

    /// Returns `(entity, field, value)` for a unique violation.
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = Self::key_value(message);

        if let Some((entity, field)) = constraint_name.and_then(|c| Self::split_constraint(c, "_key")) {
            let value = key_value
                .map(|(_, value)| value)
                .unwrap_or_else(|| "duplicate_value".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = key_value?;
        let entity = Self::relation(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Returns `(entity, field, referenced_value)` for a foreign key violation.
    pub fn parse_foreign_key_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let (field, value) = Self::key_value(message)?;
        let entity = constraint_name
            .and_then(|c| Self::split_constraint(c, "_fkey"))
            .map(|(entity, _)| entity)
            .or_else(|| Self::relation(message))
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Returns `(entity, field)` for a check violation.
    pub fn parse_check_violation(message: &str, constraint_name: Option<&str>) -> Option<(String, String)> {
        if let Some(parsed) = constraint_name.and_then(|c| Self::split_constraint(c, "_check")) {
            return Some(parsed);
        }
        let field = Self::column(message)?;
        Some((Self::relation(message).unwrap_or_else(|| "resource".to_string()), field))
    }

    /// Returns `(entity, field)` for a not-null violation.
    pub fn parse_not_null_violation(message: &str) -> Option<(String, String)> {
        let field = Self::column(message)?;
        Some((Self::relation(message).unwrap_or_else(|| "resource".to_string()), field))
    }

    fn split_constraint(constraint: &str, suffix: &str) -> Option<(String, String)> {
        let body = constraint.strip_suffix(suffix)?;
        KNOWN_TABLES.iter().find_map(|table| {
            body.strip_prefix(table)
                .and_then(|rest| rest.strip_prefix('_'))
                .filter(|field| !field.is_empty())
                .map(|field| (table.to_string(), field.to_string()))
        })
    }

    fn key_value(message: &str) -> Option<(String, String)> {
        Self::patterns()
            .key_value
            .captures(message)
            .map(|caps| (caps[1].to_string(), caps[2].to_string()))
    }

    fn column(message: &str) -> Option<String> {
        Self::patterns().column.captures(message).map(|caps| caps[1].to_string())
    }

    fn relation(message: &str) -> Option<String> {
        Self::patterns().relation.captures(message).map(|caps| caps[1].to_string())
    }
}
