//! SQL query operations for database access
//!
//! This module provides low-level query functions for database operations.
//! For business-level operations, use the Ledger API.

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use crate::catalog::ExpenseCategory;
use crate::error::Result;
use crate::utils::common::{DB_DATE_FORMAT, format_datetime, now};
use super::models::{
    Account, Expense, ExpenseShare, LedgerProperties, Member, PrivacyLevel, SecuritySettings,
    SettlementPayment, User, UserSettings,
};

/// Get current timestamp formatted for database
pub fn now_timestamp() -> String {
    format_datetime(&now())
}

/// Read a required timestamp column
fn get_timestamp(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(idx)?;
    NaiveDateTime::parse_from_str(&s, DB_DATE_FORMAT)
        .map(|ndt| DateTime::from_naive_utc_and_offset(ndt, Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Read a nullable timestamp column
fn get_opt_timestamp(row: &Row, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let s: Option<String> = row.get(idx)?;
    match s {
        None => Ok(None),
        Some(_) => get_timestamp(row, idx).map(Some),
    }
}

fn get_bool(row: &Row, idx: usize) -> rusqlite::Result<bool> {
    Ok(row.get::<_, i64>(idx)? != 0)
}

// ============================================================================
// Properties queries
// ============================================================================

/// Check if properties table has any rows
pub fn has_properties(conn: &Connection) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM ledger_properties",
        [],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Get all properties from the database
pub fn get_properties(conn: &Connection) -> Result<Option<LedgerProperties>> {
    conn.query_row(
        "SELECT database_id, lang, version, create_timestamp, update_timestamp
         FROM ledger_properties LIMIT 1",
        [],
        |row| {
            Ok(LedgerProperties {
                database_id: row.get(0)?,
                lang: row.get::<_, Option<String>>(1)?.unwrap_or_else(|| "en".to_string()),
                version: row.get::<_, Option<String>>(2)?.unwrap_or_else(|| "1".to_string()),
                create_timestamp: get_opt_timestamp(row, 3)?,
                update_timestamp: get_opt_timestamp(row, 4)?,
            })
        },
    ).optional().map_err(Into::into)
}

/// Set properties (insert new row)
pub fn set_properties(conn: &Connection, database_id: &str, lang: &str, version: &str) -> Result<()> {
    let now = now_timestamp();
    conn.execute(
        "INSERT INTO ledger_properties (database_id, lang, version, create_timestamp, update_timestamp)
         VALUES (?, ?, ?, ?, ?)",
        params![database_id, lang, version, now, now],
    )?;
    Ok(())
}

/// Update database version
pub fn set_db_version(conn: &Connection, version: &str) -> Result<()> {
    conn.execute(
        "UPDATE ledger_properties SET version = ?, update_timestamp = ?",
        params![version, now_timestamp()],
    )?;
    Ok(())
}

// ============================================================================
// User queries
// ============================================================================

const USER_COLUMNS: &str =
    "id, name, email, avatar_url, phone_number, created_at, has_password, biometric_enabled";

fn map_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        avatar_url: row.get(3)?,
        phone_number: row.get(4)?,
        created_at: get_timestamp(row, 5)?,
        has_password: get_bool(row, 6)?,
        biometric_enabled: get_bool(row, 7)?,
    })
}

/// Get a user by ID
pub fn get_user_by_id(conn: &Connection, user_id: &str) -> Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
        [user_id],
        map_user,
    ).optional().map_err(Into::into)
}

/// Get a user by email
pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {} FROM users WHERE email = ? LIMIT 1", USER_COLUMNS),
        [email],
        map_user,
    ).optional().map_err(Into::into)
}

/// Insert a user, replacing an existing row with the same ID
///
/// Uses an upsert rather than `INSERT OR REPLACE` so the settings rows
/// that reference the user are not cascade-deleted.
pub fn insert_user(conn: &Connection, user: &User) -> Result<()> {
    conn.execute(
        "INSERT INTO users (id, name, email, avatar_url, phone_number, created_at, has_password, biometric_enabled)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name, email = excluded.email, avatar_url = excluded.avatar_url,
            phone_number = excluded.phone_number, created_at = excluded.created_at,
            has_password = excluded.has_password, biometric_enabled = excluded.biometric_enabled",
        params![
            user.id, user.name, user.email, user.avatar_url, user.phone_number,
            format_datetime(&user.created_at), user.has_password as i32, user.biometric_enabled as i32,
        ],
    )?;
    Ok(())
}

/// Delete a user (cascades to settings)
pub fn delete_user(conn: &Connection, user_id: &str) -> Result<bool> {
    let rows = conn.execute("DELETE FROM users WHERE id = ?", [user_id])?;
    Ok(rows > 0)
}

/// Update the has_password flag
pub fn update_password_status(conn: &Connection, user_id: &str, has_password: bool) -> Result<()> {
    conn.execute(
        "UPDATE users SET has_password = ? WHERE id = ?",
        params![has_password as i32, user_id],
    )?;
    Ok(())
}

/// Update the biometric flag on the user row
pub fn update_biometric_status(conn: &Connection, user_id: &str, enabled: bool) -> Result<()> {
    conn.execute(
        "UPDATE users SET biometric_enabled = ? WHERE id = ?",
        params![enabled as i32, user_id],
    )?;
    Ok(())
}

/// Update profile fields
pub fn update_user_profile(
    conn: &Connection,
    user_id: &str,
    name: &str,
    email: &str,
    avatar_url: Option<&str>,
    phone_number: Option<&str>,
) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE users SET name = ?, email = ?, avatar_url = ?, phone_number = ? WHERE id = ?",
        params![name, email, avatar_url, phone_number, user_id],
    )?;
    Ok(rows > 0)
}

// ============================================================================
// User settings queries
// ============================================================================

/// Get settings for a user
pub fn get_user_settings(conn: &Connection, user_id: &str) -> Result<Option<UserSettings>> {
    conn.query_row(
        "SELECT user_id, notifications_enabled, email_notifications, push_notifications,
                privacy_level, auto_lock_enabled, auto_lock_timeout_minutes
         FROM user_settings WHERE user_id = ?",
        [user_id],
        |row| {
            Ok(UserSettings {
                user_id: row.get(0)?,
                notifications_enabled: get_bool(row, 1)?,
                email_notifications: get_bool(row, 2)?,
                push_notifications: get_bool(row, 3)?,
                privacy_level: PrivacyLevel::from_code(&row.get::<_, String>(4)?),
                auto_lock_enabled: get_bool(row, 5)?,
                auto_lock_timeout_minutes: row.get(6)?,
            })
        },
    ).optional().map_err(Into::into)
}

/// Insert or replace settings for a user
pub fn insert_user_settings(conn: &Connection, settings: &UserSettings) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO user_settings
            (user_id, notifications_enabled, email_notifications, push_notifications,
             privacy_level, auto_lock_enabled, auto_lock_timeout_minutes)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            settings.user_id,
            settings.notifications_enabled as i32,
            settings.email_notifications as i32,
            settings.push_notifications as i32,
            settings.privacy_level.as_str(),
            settings.auto_lock_enabled as i32,
            settings.auto_lock_timeout_minutes,
        ],
    )?;
    Ok(())
}

/// Update a single boolean column of a user's settings
fn update_user_settings_flag(conn: &Connection, column: &str, user_id: &str, enabled: bool) -> Result<bool> {
    let rows = conn.execute(
        &format!("UPDATE user_settings SET {} = ? WHERE user_id = ?", column),
        params![enabled as i32, user_id],
    )?;
    Ok(rows > 0)
}

/// Enable or disable all notifications
pub fn update_notification_settings(conn: &Connection, user_id: &str, enabled: bool) -> Result<bool> {
    update_user_settings_flag(conn, "notifications_enabled", user_id, enabled)
}

/// Enable or disable email notifications
pub fn update_email_notifications(conn: &Connection, user_id: &str, enabled: bool) -> Result<bool> {
    update_user_settings_flag(conn, "email_notifications", user_id, enabled)
}

/// Enable or disable push notifications
pub fn update_push_notifications(conn: &Connection, user_id: &str, enabled: bool) -> Result<bool> {
    update_user_settings_flag(conn, "push_notifications", user_id, enabled)
}

/// Update the privacy level
pub fn update_privacy_level(conn: &Connection, user_id: &str, level: PrivacyLevel) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE user_settings SET privacy_level = ? WHERE user_id = ?",
        params![level.as_str(), user_id],
    )?;
    Ok(rows > 0)
}

/// Update auto-lock preferences
pub fn update_auto_lock_settings(conn: &Connection, user_id: &str, enabled: bool, timeout_minutes: u32) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE user_settings SET auto_lock_enabled = ?, auto_lock_timeout_minutes = ? WHERE user_id = ?",
        params![enabled as i32, timeout_minutes, user_id],
    )?;
    Ok(rows > 0)
}

// ============================================================================
// Security settings queries
// ============================================================================

/// Get security settings for a user
pub fn get_security_settings(conn: &Connection, user_id: &str) -> Result<Option<SecuritySettings>> {
    conn.query_row(
        "SELECT user_id, password_hash, password_salt, biometric_enabled, require_password_on_startup,
                auto_lock_enabled, auto_lock_timeout_minutes, last_password_change,
                failed_login_attempts, account_locked, lockout_end_time
         FROM security_settings WHERE user_id = ?",
        [user_id],
        |row| {
            Ok(SecuritySettings {
                user_id: row.get(0)?,
                password_hash: row.get(1)?,
                password_salt: row.get(2)?,
                biometric_enabled: get_bool(row, 3)?,
                require_password_on_startup: get_bool(row, 4)?,
                auto_lock_enabled: get_bool(row, 5)?,
                auto_lock_timeout_minutes: row.get(6)?,
                last_password_change: get_opt_timestamp(row, 7)?,
                failed_login_attempts: row.get(8)?,
                account_locked: get_bool(row, 9)?,
                lockout_end_time: get_opt_timestamp(row, 10)?,
            })
        },
    ).optional().map_err(Into::into)
}

/// Insert or replace security settings for a user
pub fn insert_security_settings(conn: &Connection, settings: &SecuritySettings) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO security_settings
            (user_id, password_hash, password_salt, biometric_enabled, require_password_on_startup,
             auto_lock_enabled, auto_lock_timeout_minutes, last_password_change,
             failed_login_attempts, account_locked, lockout_end_time)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            settings.user_id,
            settings.password_hash,
            settings.password_salt,
            settings.biometric_enabled as i32,
            settings.require_password_on_startup as i32,
            settings.auto_lock_enabled as i32,
            settings.auto_lock_timeout_minutes,
            settings.last_password_change.as_ref().map(format_datetime),
            settings.failed_login_attempts,
            settings.account_locked as i32,
            settings.lockout_end_time.as_ref().map(format_datetime),
        ],
    )?;
    Ok(())
}

/// Store a new password hash and salt
pub fn update_password(conn: &Connection, user_id: &str, hash: &str, salt: &str, changed_at: &DateTime<Utc>) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE security_settings SET password_hash = ?, password_salt = ?, last_password_change = ?
         WHERE user_id = ?",
        params![hash, salt, format_datetime(changed_at), user_id],
    )?;
    Ok(rows > 0)
}

/// Clear the stored password
pub fn remove_password(conn: &Connection, user_id: &str) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE security_settings SET password_hash = NULL, password_salt = NULL, last_password_change = NULL
         WHERE user_id = ?",
        [user_id],
    )?;
    Ok(rows > 0)
}

/// Update the biometric flag on the security row
pub fn update_biometric_settings(conn: &Connection, user_id: &str, enabled: bool) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE security_settings SET biometric_enabled = ? WHERE user_id = ?",
        params![enabled as i32, user_id],
    )?;
    Ok(rows > 0)
}

/// Require the password when the app starts
pub fn update_password_on_startup(conn: &Connection, user_id: &str, required: bool) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE security_settings SET require_password_on_startup = ? WHERE user_id = ?",
        params![required as i32, user_id],
    )?;
    Ok(rows > 0)
}

/// Set the failed login counter
pub fn update_failed_login_attempts(conn: &Connection, user_id: &str, attempts: u32) -> Result<()> {
    conn.execute(
        "UPDATE security_settings SET failed_login_attempts = ? WHERE user_id = ?",
        params![attempts, user_id],
    )?;
    Ok(())
}

/// Set lock state and lockout end
pub fn update_account_lock_status(conn: &Connection, user_id: &str, locked: bool, end_time: Option<&DateTime<Utc>>) -> Result<()> {
    conn.execute(
        "UPDATE security_settings SET account_locked = ?, lockout_end_time = ? WHERE user_id = ?",
        params![locked as i32, end_time.map(format_datetime), user_id],
    )?;
    Ok(())
}

/// Check whether a password hash is stored; `None` if the user has no security row
pub fn has_password(conn: &Connection, user_id: &str) -> Result<Option<bool>> {
    conn.query_row(
        "SELECT password_hash IS NOT NULL FROM security_settings WHERE user_id = ?",
        [user_id],
        |row| get_bool(row, 0),
    ).optional().map_err(Into::into)
}

// ============================================================================
// Account queries
// ============================================================================

const ACCOUNT_COLUMNS: &str = "id, name, description, created_by, created_at, updated_at, is_active";

fn map_account(row: &Row) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_by: row.get(3)?,
        created_at: get_timestamp(row, 4)?,
        updated_at: get_timestamp(row, 5)?,
        is_active: get_bool(row, 6)?,
    })
}

/// Get all active accounts, most recently updated first
pub fn get_all_active_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM accounts WHERE is_active = 1 ORDER BY updated_at DESC, rowid DESC",
        ACCOUNT_COLUMNS
    ))?;
    let accounts = stmt.query_map([], map_account)?;
    accounts.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Get an account by ID (active or not)
pub fn get_account_by_id(conn: &Connection, account_id: &str) -> Result<Option<Account>> {
    conn.query_row(
        &format!("SELECT {} FROM accounts WHERE id = ?", ACCOUNT_COLUMNS),
        [account_id],
        map_account,
    ).optional().map_err(Into::into)
}

/// Get active accounts created by a user
pub fn get_accounts_by_user(conn: &Connection, user_id: &str) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM accounts WHERE created_by = ? AND is_active = 1 ORDER BY updated_at DESC, rowid DESC",
        ACCOUNT_COLUMNS
    ))?;
    let accounts = stmt.query_map([user_id], map_account)?;
    accounts.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Insert an account
pub fn insert_account(conn: &Connection, account: &Account) -> Result<()> {
    conn.execute(
        "INSERT INTO accounts (id, name, description, created_by, created_at, updated_at, is_active)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            account.id, account.name, account.description, account.created_by,
            format_datetime(&account.created_at), format_datetime(&account.updated_at),
            account.is_active as i32,
        ],
    )?;
    Ok(())
}

/// Update an account's editable columns
pub fn update_account(conn: &Connection, account: &Account) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE accounts SET name = ?, description = ?, updated_at = ?, is_active = ? WHERE id = ?",
        params![
            account.name, account.description, format_datetime(&account.updated_at),
            account.is_active as i32, account.id,
        ],
    )?;
    Ok(rows > 0)
}

/// Soft delete an account
pub fn delete_account(conn: &Connection, account_id: &str) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE accounts SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1",
        params![now_timestamp(), account_id],
    )?;
    Ok(rows > 0)
}

/// Hard delete an account; foreign keys cascade to members, expenses and payments
pub fn purge_account(conn: &Connection, account_id: &str) -> Result<bool> {
    let rows = conn.execute("DELETE FROM accounts WHERE id = ?", [account_id])?;
    Ok(rows > 0)
}

/// Touch an account's updated_at
pub fn touch_account(conn: &Connection, account_id: &str) -> Result<()> {
    conn.execute(
        "UPDATE accounts SET updated_at = ? WHERE id = ?",
        params![now_timestamp(), account_id],
    )?;
    Ok(())
}

/// Count active accounts
pub fn get_active_account_count(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM accounts WHERE is_active = 1",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

// ============================================================================
// Member queries
// ============================================================================

const MEMBER_COLUMNS: &str = "id, account_id, user_id, user_name, user_email, joined_at, is_active";

fn map_member(row: &Row) -> rusqlite::Result<Member> {
    Ok(Member {
        id: row.get(0)?,
        account_id: row.get(1)?,
        user_id: row.get(2)?,
        user_name: row.get(3)?,
        user_email: row.get(4)?,
        joined_at: get_timestamp(row, 5)?,
        is_active: get_bool(row, 6)?,
    })
}

/// Get active members of an account in join order
pub fn get_members_by_account(conn: &Connection, account_id: &str) -> Result<Vec<Member>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM members WHERE account_id = ? AND is_active = 1 ORDER BY joined_at, rowid",
        MEMBER_COLUMNS
    ))?;
    let members = stmt.query_map([account_id], map_member)?;
    members.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Get all members of an account, including removed ones
pub fn get_all_members_by_account(conn: &Connection, account_id: &str) -> Result<Vec<Member>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM members WHERE account_id = ? ORDER BY joined_at, rowid",
        MEMBER_COLUMNS
    ))?;
    let members = stmt.query_map([account_id], map_member)?;
    members.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Get a member by ID (active or not)
pub fn get_member_by_id(conn: &Connection, member_id: &str) -> Result<Option<Member>> {
    conn.query_row(
        &format!("SELECT {} FROM members WHERE id = ?", MEMBER_COLUMNS),
        [member_id],
        map_member,
    ).optional().map_err(Into::into)
}

/// Get active memberships of a user across accounts
pub fn get_members_by_user(conn: &Connection, user_id: &str) -> Result<Vec<Member>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM members WHERE user_id = ? AND is_active = 1 ORDER BY joined_at, rowid",
        MEMBER_COLUMNS
    ))?;
    let members = stmt.query_map([user_id], map_member)?;
    members.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Count active members of an account
pub fn get_member_count_by_account(conn: &Connection, account_id: &str) -> Result<u32> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM members WHERE account_id = ? AND is_active = 1",
        [account_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Insert a member
pub fn insert_member(conn: &Connection, member: &Member) -> Result<()> {
    conn.execute(
        "INSERT INTO members (id, account_id, user_id, user_name, user_email, joined_at, is_active)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            member.id, member.account_id, member.user_id, member.user_name, member.user_email,
            format_datetime(&member.joined_at), member.is_active as i32,
        ],
    )?;
    Ok(())
}

/// Update a member's display fields
pub fn update_member(conn: &Connection, member: &Member) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE members SET user_name = ?, user_email = ?, is_active = ? WHERE id = ?",
        params![member.user_name, member.user_email, member.is_active as i32, member.id],
    )?;
    Ok(rows > 0)
}

/// Soft delete a member
pub fn delete_member(conn: &Connection, member_id: &str) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE members SET is_active = 0 WHERE id = ? AND is_active = 1",
        [member_id],
    )?;
    Ok(rows > 0)
}

/// Get the active membership of a user in an account
pub fn get_member_by_account_and_user(conn: &Connection, account_id: &str, user_id: &str) -> Result<Option<Member>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM members WHERE account_id = ? AND user_id = ? AND is_active = 1 LIMIT 1",
            MEMBER_COLUMNS
        ),
        [account_id, user_id],
        map_member,
    ).optional().map_err(Into::into)
}

// ============================================================================
// Expense queries
// ============================================================================

const EXPENSE_COLUMNS: &str = "id, account_id, title, note, amount, currency, category, paid_by, \
    spent_at, created_at, updated_at, is_settled, is_deleted";

fn map_expense(row: &Row) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        account_id: row.get(1)?,
        title: row.get(2)?,
        note: row.get(3)?,
        amount: row.get(4)?,
        currency: row.get(5)?,
        category: ExpenseCategory::from_code(&row.get::<_, String>(6)?),
        paid_by: row.get(7)?,
        spent_at: get_timestamp(row, 8)?,
        created_at: get_timestamp(row, 9)?,
        updated_at: get_timestamp(row, 10)?,
        is_settled: get_bool(row, 11)?,
        is_deleted: get_bool(row, 12)?,
    })
}

/// Get non-deleted expenses of an account, newest first
pub fn get_expenses_by_account(conn: &Connection, account_id: &str) -> Result<Vec<Expense>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM expenses WHERE account_id = ? AND is_deleted = 0 ORDER BY created_at DESC, rowid DESC",
        EXPENSE_COLUMNS
    ))?;
    let expenses = stmt.query_map([account_id], map_expense)?;
    expenses.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Get an expense by ID (deleted or not)
pub fn get_expense_by_id(conn: &Connection, expense_id: &str) -> Result<Option<Expense>> {
    conn.query_row(
        &format!("SELECT {} FROM expenses WHERE id = ?", EXPENSE_COLUMNS),
        [expense_id],
        map_expense,
    ).optional().map_err(Into::into)
}

/// Get non-deleted expenses paid by a member
pub fn get_expenses_by_payer(conn: &Connection, member_id: &str) -> Result<Vec<Expense>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM expenses WHERE paid_by = ? AND is_deleted = 0 ORDER BY created_at DESC, rowid DESC",
        EXPENSE_COLUMNS
    ))?;
    let expenses = stmt.query_map([member_id], map_expense)?;
    expenses.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Sum of non-deleted expense amounts per currency
pub fn get_total_expense_by_account(conn: &Connection, account_id: &str) -> Result<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT currency, SUM(amount) FROM expenses
         WHERE account_id = ? AND is_deleted = 0
         GROUP BY currency ORDER BY currency",
    )?;
    let totals = stmt.query_map([account_id], |row| Ok((row.get(0)?, row.get(1)?)))?;
    totals.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Count non-deleted expenses of an account
pub fn get_expense_count_by_account(conn: &Connection, account_id: &str) -> Result<u32> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*) FROM expenses WHERE account_id = ? AND is_deleted = 0",
        [account_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Insert an expense
pub fn insert_expense(conn: &Connection, expense: &Expense) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT INTO expenses ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            EXPENSE_COLUMNS
        ),
        params![
            expense.id, expense.account_id, expense.title, expense.note, expense.amount,
            expense.currency, expense.category.code(), expense.paid_by,
            format_datetime(&expense.spent_at), format_datetime(&expense.created_at),
            format_datetime(&expense.updated_at), expense.is_settled as i32, expense.is_deleted as i32,
        ],
    )?;
    Ok(())
}

/// Update an expense's editable columns
pub fn update_expense(conn: &Connection, expense: &Expense) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE expenses SET title = ?, note = ?, amount = ?, currency = ?, category = ?, paid_by = ?,
                spent_at = ?, updated_at = ?, is_settled = ?
         WHERE id = ? AND is_deleted = 0",
        params![
            expense.title, expense.note, expense.amount, expense.currency, expense.category.code(),
            expense.paid_by, format_datetime(&expense.spent_at), format_datetime(&expense.updated_at),
            expense.is_settled as i32, expense.id,
        ],
    )?;
    Ok(rows > 0)
}

/// Soft delete an expense
pub fn delete_expense(conn: &Connection, expense_id: &str) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE expenses SET is_deleted = 1, updated_at = ? WHERE id = ? AND is_deleted = 0",
        params![now_timestamp(), expense_id],
    )?;
    Ok(rows > 0)
}

/// Set the settled flag of an expense
pub fn update_expense_settled(conn: &Connection, expense_id: &str, settled: bool) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE expenses SET is_settled = ?, updated_at = ? WHERE id = ? AND is_deleted = 0",
        params![settled as i32, now_timestamp(), expense_id],
    )?;
    Ok(rows > 0)
}

// ============================================================================
// Expense share queries
// ============================================================================

/// Replace the shares of an expense
pub fn replace_expense_shares(conn: &Connection, expense_id: &str, shares: &[(String, i64)]) -> Result<()> {
    conn.execute("DELETE FROM expense_shares WHERE expense_id = ?", [expense_id])?;
    let mut stmt = conn.prepare(
        "INSERT INTO expense_shares (expense_id, member_id, share, position) VALUES (?, ?, ?, ?)",
    )?;
    for (position, (member_id, share)) in shares.iter().enumerate() {
        stmt.execute(params![expense_id, member_id, share, position as i64])?;
    }
    Ok(())
}

/// Get the shares of an expense in the order they were given
pub fn get_expense_shares(conn: &Connection, expense_id: &str) -> Result<Vec<ExpenseShare>> {
    let mut stmt = conn.prepare(
        "SELECT expense_id, member_id, share FROM expense_shares WHERE expense_id = ? ORDER BY position",
    )?;
    let shares = stmt.query_map([expense_id], |row| {
        Ok(ExpenseShare {
            expense_id: row.get(0)?,
            member_id: row.get(1)?,
            share: row.get(2)?,
        })
    })?;
    shares.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Get the shares of every non-deleted expense in an account
pub fn get_expense_shares_by_account(conn: &Connection, account_id: &str) -> Result<Vec<ExpenseShare>> {
    let mut stmt = conn.prepare(
        "SELECT s.expense_id, s.member_id, s.share
         FROM expense_shares s JOIN expenses e ON e.id = s.expense_id
         WHERE e.account_id = ? AND e.is_deleted = 0
         ORDER BY s.expense_id, s.position",
    )?;
    let shares = stmt.query_map([account_id], |row| {
        Ok(ExpenseShare {
            expense_id: row.get(0)?,
            member_id: row.get(1)?,
            share: row.get(2)?,
        })
    })?;
    shares.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

// ============================================================================
// Settlement payment queries
// ============================================================================

fn map_payment(row: &Row) -> rusqlite::Result<SettlementPayment> {
    Ok(SettlementPayment {
        id: row.get(0)?,
        account_id: row.get(1)?,
        from_member: row.get(2)?,
        to_member: row.get(3)?,
        amount: row.get(4)?,
        currency: row.get(5)?,
        created_at: get_timestamp(row, 6)?,
    })
}

/// Insert a settlement payment
pub fn insert_settlement_payment(conn: &Connection, payment: &SettlementPayment) -> Result<()> {
    conn.execute(
        "INSERT INTO settlement_payments (id, account_id, from_member, to_member, amount, currency, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            payment.id, payment.account_id, payment.from_member, payment.to_member,
            payment.amount, payment.currency, format_datetime(&payment.created_at),
        ],
    )?;
    Ok(())
}

/// Get settlement payments of an account, oldest first
pub fn get_settlement_payments_by_account(conn: &Connection, account_id: &str) -> Result<Vec<SettlementPayment>> {
    let mut stmt = conn.prepare(
        "SELECT id, account_id, from_member, to_member, amount, currency, created_at
         FROM settlement_payments WHERE account_id = ? ORDER BY created_at, rowid",
    )?;
    let payments = stmt.query_map([account_id], map_payment)?;
    payments.collect::<std::result::Result<Vec<_>, _>>().map_err(Into::into)
}

/// Delete a settlement payment
pub fn delete_settlement_payment(conn: &Connection, payment_id: &str) -> Result<bool> {
    let rows = conn.execute("DELETE FROM settlement_payments WHERE id = ?", [payment_id])?;
    Ok(rows > 0)
}
