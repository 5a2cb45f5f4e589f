//! Database schema definitions

/// SQL to create the properties table
pub const CREATE_PROPERTIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS ledger_properties (
    database_id      CHAR(32) NOT NULL PRIMARY KEY,
    lang             VARCHAR(8),
    version          CHAR(10),
    create_timestamp TEXT,
    update_timestamp TEXT
)
"#;

/// SQL to create the users table
pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id                VARCHAR NOT NULL PRIMARY KEY,
    name              VARCHAR NOT NULL,
    email             VARCHAR NOT NULL,
    avatar_url        VARCHAR,
    phone_number      VARCHAR,
    created_at        TEXT NOT NULL,
    has_password      INTEGER NOT NULL DEFAULT 0,
    biometric_enabled INTEGER NOT NULL DEFAULT 0
)
"#;

/// SQL to create the user settings table
pub const CREATE_USER_SETTINGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS user_settings (
    user_id                   VARCHAR NOT NULL PRIMARY KEY
                              REFERENCES users(id) ON DELETE CASCADE,
    notifications_enabled     INTEGER NOT NULL DEFAULT 1,
    email_notifications       INTEGER NOT NULL DEFAULT 1,
    push_notifications        INTEGER NOT NULL DEFAULT 1,
    privacy_level             VARCHAR NOT NULL DEFAULT 'NORMAL',
    auto_lock_enabled         INTEGER NOT NULL DEFAULT 0,
    auto_lock_timeout_minutes INTEGER NOT NULL DEFAULT 5
)
"#;

/// SQL to create the security settings table
pub const CREATE_SECURITY_SETTINGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS security_settings (
    user_id                     VARCHAR NOT NULL PRIMARY KEY
                                REFERENCES users(id) ON DELETE CASCADE,
    password_hash               VARCHAR,
    password_salt               VARCHAR,
    biometric_enabled           INTEGER NOT NULL DEFAULT 0,
    require_password_on_startup INTEGER NOT NULL DEFAULT 0,
    auto_lock_enabled           INTEGER NOT NULL DEFAULT 0,
    auto_lock_timeout_minutes   INTEGER NOT NULL DEFAULT 5,
    last_password_change        TEXT,
    failed_login_attempts       INTEGER NOT NULL DEFAULT 0,
    account_locked              INTEGER NOT NULL DEFAULT 0,
    lockout_end_time            TEXT
)
"#;

/// SQL to create the accounts (groups) table
pub const CREATE_ACCOUNTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id          VARCHAR NOT NULL PRIMARY KEY,
    name        VARCHAR NOT NULL,
    description VARCHAR,
    created_by  VARCHAR NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    is_active   INTEGER NOT NULL DEFAULT 1
)
"#;

/// SQL to create the members table
pub const CREATE_MEMBERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS members (
    id         VARCHAR NOT NULL PRIMARY KEY,
    account_id VARCHAR NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    user_id    VARCHAR NOT NULL,
    user_name  VARCHAR NOT NULL,
    user_email VARCHAR,
    joined_at  TEXT NOT NULL,
    is_active  INTEGER NOT NULL DEFAULT 1
)
"#;

/// SQL to create the expenses table
pub const CREATE_EXPENSES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS expenses (
    id         VARCHAR NOT NULL PRIMARY KEY,
    account_id VARCHAR NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    title      VARCHAR NOT NULL,
    note       VARCHAR,
    amount     INTEGER NOT NULL,
    currency   VARCHAR NOT NULL,
    category   VARCHAR NOT NULL,
    paid_by    VARCHAR NOT NULL,
    spent_at   TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    is_settled INTEGER NOT NULL DEFAULT 0,
    is_deleted INTEGER NOT NULL DEFAULT 0
)
"#;

/// SQL to create the expense shares table (who owes which part of an expense)
pub const CREATE_EXPENSE_SHARES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS expense_shares (
    expense_id VARCHAR NOT NULL REFERENCES expenses(id) ON DELETE CASCADE,
    member_id  VARCHAR NOT NULL,
    share      INTEGER NOT NULL,
    position   INTEGER NOT NULL,
    PRIMARY KEY (expense_id, member_id)
)
"#;

/// SQL to create the settlement payments table
pub const CREATE_SETTLEMENT_PAYMENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS settlement_payments (
    id          VARCHAR NOT NULL PRIMARY KEY,
    account_id  VARCHAR NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    from_member VARCHAR NOT NULL,
    to_member   VARCHAR NOT NULL,
    amount      INTEGER NOT NULL,
    currency    VARCHAR NOT NULL,
    created_at  TEXT NOT NULL
)
"#;

/// Indices on foreign key columns
pub const CREATE_INDICES: &str = r#"
CREATE INDEX IF NOT EXISTS index_members_account_id ON members(account_id);
CREATE INDEX IF NOT EXISTS index_expenses_account_id ON expenses(account_id);
CREATE INDEX IF NOT EXISTS index_settlement_payments_account_id ON settlement_payments(account_id);
"#;

/// All table creation statements in order
pub const CREATE_ALL_TABLES: &[&str] = &[
    CREATE_PROPERTIES_TABLE,
    CREATE_USERS_TABLE,
    CREATE_USER_SETTINGS_TABLE,
    CREATE_SECURITY_SETTINGS_TABLE,
    CREATE_ACCOUNTS_TABLE,
    CREATE_MEMBERS_TABLE,
    CREATE_EXPENSES_TABLE,
    CREATE_EXPENSE_SHARES_TABLE,
    CREATE_SETTLEMENT_PAYMENTS_TABLE,
];
