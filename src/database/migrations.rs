//! Database migration logic for version upgrades
//!
//! Handles upgrades from v1 through v3

use rusqlite::Connection;
use crate::error::Result;
use super::schema;

/// Current database version
pub const CURRENT_VERSION: &str = crate::DB_VERSION;

/// Upgrade database to the latest version
pub fn upgrade_database(conn: &Connection, current_version: &str) -> Result<()> {
    let version: u32 = current_version.parse().unwrap_or(1);

    if version < 2 {
        upgrade_to_v2(conn)?;
    }
    if version < 3 {
        upgrade_to_v3(conn)?;
    }

    Ok(())
}

/// Upgrade from v1 to v2
/// Adds password and biometric flags to users
fn upgrade_to_v2(conn: &Connection) -> Result<()> {
    tracing::info!("upgrading database to v2");
    if !has_column(conn, "users", "has_password")? {
        conn.execute(
            "ALTER TABLE users ADD COLUMN has_password INTEGER NOT NULL DEFAULT 0",
            [],
        )?;
    }
    if !has_column(conn, "users", "biometric_enabled")? {
        conn.execute(
            "ALTER TABLE users ADD COLUMN biometric_enabled INTEGER NOT NULL DEFAULT 0",
            [],
        )?;
    }

    // Derive the flags from the security table where one exists
    conn.execute(
        "UPDATE users SET
            has_password = COALESCE((SELECT password_hash IS NOT NULL FROM security_settings
                                      WHERE security_settings.user_id = users.id), 0),
            biometric_enabled = COALESCE((SELECT biometric_enabled FROM security_settings
                                          WHERE security_settings.user_id = users.id), 0)",
        [],
    )?;

    Ok(())
}

/// Upgrade from v2 to v3
/// Adds expense shares and settlement payments
fn upgrade_to_v3(conn: &Connection) -> Result<()> {
    tracing::info!("upgrading database to v3");
    conn.execute(schema::CREATE_EXPENSE_SHARES_TABLE, [])?;
    conn.execute(schema::CREATE_SETTLEMENT_PAYMENTS_TABLE, [])?;
    conn.execute_batch(schema::CREATE_INDICES)?;
    Ok(())
}

/// Check whether a table has the named column
fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Check if database version is compatible
pub fn is_version_compatible(version: &str) -> bool {
    let v: u32 = version.parse().unwrap_or(0);
    v <= CURRENT_VERSION.parse::<u32>().unwrap_or(3)
}

/// Get the current database version from properties
pub fn get_database_version(conn: &Connection) -> Result<String> {
    let version: String = conn.query_row(
        "SELECT version FROM ledger_properties LIMIT 1",
        [],
        |row| row.get(0),
    ).unwrap_or_else(|_| "1".to_string());

    Ok(version)
}

/// Set the database version in properties
pub fn set_database_version(conn: &Connection, version: &str) -> Result<()> {
    conn.execute(
        "UPDATE ledger_properties SET version = ?",
        [version],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const V1_SCHEMA: &str = r#"
        CREATE TABLE ledger_properties (
            database_id TEXT PRIMARY KEY,
            version TEXT
        );
        INSERT INTO ledger_properties (database_id, version) VALUES ('test', '1');

        CREATE TABLE users (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            avatar_url TEXT,
            phone_number TEXT,
            created_at TEXT NOT NULL
        );
        CREATE TABLE security_settings (
            user_id TEXT PRIMARY KEY,
            password_hash TEXT,
            password_salt TEXT,
            biometric_enabled INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE accounts (id TEXT PRIMARY KEY);
        CREATE TABLE members (id TEXT PRIMARY KEY, account_id TEXT);
        CREATE TABLE expenses (id TEXT PRIMARY KEY, account_id TEXT);

        INSERT INTO users (id, name, email, created_at) VALUES ('u1', 'A', 'a@x', '2024-01-01 00:00:00');
        INSERT INTO users (id, name, email, created_at) VALUES ('u2', 'B', 'b@x', '2024-01-01 00:00:00');
        INSERT INTO security_settings (user_id, password_hash, password_salt, biometric_enabled)
            VALUES ('u1', 'hash', 'salt', 1);
    "#;

    #[test]
    fn test_is_version_compatible() {
        assert!(is_version_compatible("1"));
        assert!(is_version_compatible("2"));
        assert!(is_version_compatible("3"));
        assert!(!is_version_compatible("4"));
        assert!(!is_version_compatible("999"));
        assert!(is_version_compatible("invalid")); // Parses to 0
    }

    #[test]
    fn test_upgrade_database_from_v1() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(V1_SCHEMA).unwrap();

        upgrade_database(&conn, "1").unwrap();

        let (has_password, biometric): (i64, i64) = conn.query_row(
            "SELECT has_password, biometric_enabled FROM users WHERE id = 'u1'",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        ).unwrap();
        assert_eq!(has_password, 1);
        assert_eq!(biometric, 1);

        let has_password: i64 = conn.query_row(
            "SELECT has_password FROM users WHERE id = 'u2'",
            [],
            |row| row.get(0),
        ).unwrap();
        assert_eq!(has_password, 0);

        let tables: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('expense_shares', 'settlement_payments')",
            [],
            |row| row.get(0),
        ).unwrap();
        assert_eq!(tables, 2);
    }

    #[test]
    fn test_upgrade_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(V1_SCHEMA).unwrap();

        upgrade_database(&conn, "1").unwrap();
        upgrade_database(&conn, "1").unwrap();
        assert!(has_column(&conn, "users", "has_password").unwrap());
    }

    #[test]
    fn test_get_set_database_version() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(V1_SCHEMA).unwrap();

        assert_eq!(get_database_version(&conn).unwrap(), "1");

        set_database_version(&conn, "3").unwrap();
        assert_eq!(get_database_version(&conn).unwrap(), "3");
    }

    #[test]
    fn test_get_database_version_missing_table() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(get_database_version(&conn).unwrap(), "1");
    }
}
