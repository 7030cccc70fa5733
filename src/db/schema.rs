//! Database schema

/// SQL schema for initialization
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

/// Key holding the last check-in calendar date (`YYYY-MM-DD`)
pub const LAST_CHECK_IN_KEY: &str = "last_check_in";

/// Calendar date storage format
pub const DATE_FORMAT: &str = "%Y-%m-%d";
