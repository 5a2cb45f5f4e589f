//! Integration tests for splitcore
//!
//! Each test works on a fresh ledger in a temporary directory.

use std::path::Path;
use splitcore::{
    ExpenseCategory, Ledger, LedgerConfig, NewExpense, Split, SplitError, Translations, User,
    DB_VERSION,
};
use tempfile::TempDir;

fn setup_ledger() -> (Ledger, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let ledger = Ledger::create(temp_dir.path(), LedgerConfig::default()).expect("Failed to create ledger");
    (ledger, temp_dir)
}

fn new_expense(account: &str, title: &str, payer: &str, amount: i64, category: ExpenseCategory) -> NewExpense {
    NewExpense {
        account_id: account.to_string(),
        title: title.to_string(),
        note: None,
        amount,
        currency: "NT$".to_string(),
        category,
        paid_by: payer.to_string(),
        spent_at: None,
        split: Split::Equal(vec![]),
    }
}

#[test]
fn test_weekend_trip() {
    let (mut ledger, _temp_dir) = setup_ledger();
    for (id, name) in [("user1", "小明"), ("user2", "小華"), ("user3", "小美")] {
        ledger.get_or_create_user(id, name, &format!("{}@example.com", id)).unwrap();
    }

    let trip = ledger.create_account("週末旅行", Some("花蓮兩天一夜"), "user1").unwrap();
    let ming = ledger.add_member(&trip, "user1", "小明", None).unwrap();
    let hua = ledger.add_member(&trip, "user2", "小華", None).unwrap();
    let mei = ledger.add_member(&trip, "user3", "小美", None).unwrap();

    // Hua pays the hotel, Ming and Mei cover smaller costs
    ledger.add_expense(new_expense(&trip, "民宿", &hua, 240000, ExpenseCategory::Accommodation)).unwrap();
    ledger.add_expense(new_expense(&trip, "晚餐", &mei, 90000, ExpenseCategory::Food)).unwrap();
    ledger.add_expense(new_expense(&trip, "加油", &ming, 30000, ExpenseCategory::Transport)).unwrap();

    // Everyone owes 120000
    let report = ledger.get_settlement_report(&trip).unwrap();
    assert_eq!(report.account.name, "週末旅行");
    assert_eq!(report.currencies.len(), 1);
    assert_eq!(report.currencies[0].total_expenses, 360000);

    let balances: Vec<(String, i64)> = report.balances().map(|b| (b.member_id.clone(), b.balance)).collect();
    assert_eq!(balances, vec![(ming.clone(), -90000), (hua.clone(), 120000), (mei.clone(), -30000)]);

    let transfers: Vec<_> = report.transfers().cloned().collect();
    assert_eq!(transfers.len(), 2);
    assert_eq!((transfers[0].from_member_id.as_str(), transfers[0].amount), (ming.as_str(), 90000));
    assert_eq!((transfers[1].from_member_id.as_str(), transfers[1].amount), (mei.as_str(), 30000));
    assert!(transfers.iter().all(|t| t.to_member_id == hua));

    let tr = Translations::for_language("zh-TW").unwrap();
    assert_eq!(tr.describe_settlement(&transfers[0]), "小明 付給 小華 NT$ 900.00");

    for transfer in &transfers {
        ledger.record_settlement(&trip, transfer).unwrap();
    }
    let settled = ledger.get_settlement_report(&trip).unwrap();
    assert!(settled.is_settled());
    assert!(settled.balances().all(|b| b.balance == 0));
}

#[test]
fn test_password_lifecycle() {
    let (mut ledger, _temp_dir) = setup_ledger();
    ledger.insert_user(&User::new("user1", "Ming", "ming@example.com")).unwrap();

    assert!(matches!(ledger.set_password("user1", "short"), Err(SplitError::WeakPassword(_))));
    ledger.set_password("user1", "Weekend2024").unwrap();
    ledger.update_biometric_settings("user1", true).unwrap();

    assert!(ledger.verify_password("user1", "Weekend2024").unwrap());
    for _ in 0..ledger.config().max_failed_attempts {
        assert!(!ledger.verify_password("user1", "Wrong2024").unwrap());
    }
    match ledger.verify_password("user1", "Weekend2024") {
        Err(SplitError::AccountLocked { until }) => assert!(until > chrono::Utc::now()),
        other => panic!("Expected AccountLocked, got {:?}", other),
    }

    ledger.unlock_account("user1").unwrap();
    ledger.remove_password("user1").unwrap();
    let user = ledger.get_user("user1").unwrap().unwrap();
    assert!(!user.has_password);
    assert!(!user.biometric_enabled);
}

#[test]
fn test_data_survives_reopen() {
    let (mut ledger, temp_dir) = setup_ledger();
    ledger.insert_user(&User::new("user1", "Ming", "ming@example.com")).unwrap();
    ledger.set_password("user1", "Weekend2024").unwrap();
    let rent = ledger.create_account("Rent", None, "user1").unwrap();
    let ming = ledger.add_member(&rent, "user1", "Ming", None).unwrap();
    ledger.add_member(&rent, "user2", "Hua", None).unwrap();
    ledger.add_expense(new_expense(&rent, "March", &ming, 2500000, ExpenseCategory::Utilities)).unwrap();
    let before = ledger.get_settlement_report(&rent).unwrap();
    ledger.close();

    let mut reopened = Ledger::open(temp_dir.path(), LedgerConfig::default()).unwrap();
    assert!(reopened.verify_password("user1", "Weekend2024").unwrap());
    assert_eq!(reopened.get_members(&rent).unwrap().len(), 2);
    assert_eq!(reopened.get_expenses(&rent).unwrap()[0].category, ExpenseCategory::Utilities);
    assert_eq!(reopened.get_settlement_report(&rent).unwrap(), before);
}

#[test]
fn test_purge_cascades() {
    let (mut ledger, temp_dir) = setup_ledger();
    let trip = ledger.create_account("Trip", None, "user1").unwrap();
    let ming = ledger.add_member(&trip, "user1", "Ming", None).unwrap();
    let hua = ledger.add_member(&trip, "user2", "Hua", None).unwrap();
    let dinner = ledger.add_expense(new_expense(&trip, "Dinner", &ming, 1000, ExpenseCategory::Food)).unwrap();
    let transfer = ledger.get_settlement_report(&trip).unwrap().transfers().next().cloned().unwrap();
    assert_eq!(transfer.from_member_id, hua);
    ledger.record_settlement(&trip, &transfer).unwrap();

    ledger.purge_account(&trip).unwrap();
    assert!(ledger.get_account(&trip).unwrap().is_none());
    assert!(ledger.get_member(&ming).unwrap().is_none());
    assert!(ledger.get_expense(&dinner).unwrap().is_none());
    assert!(ledger.get_expense_shares(&dinner).unwrap().is_empty());
    assert!(ledger.get_settlement_payments(&trip).unwrap().is_empty());
    ledger.close();

    // Nothing left behind in the file either
    let conn = rusqlite::Connection::open(temp_dir.path().join("splitbill.db")).unwrap();
    for table in ["members", "expenses", "expense_shares", "settlement_payments"] {
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0, "rows left in {}", table);
    }
}

/// Rewind a fresh database to the version 1 layout
fn downgrade_to_v1(db_path: &Path) {
    let conn = rusqlite::Connection::open(db_path).unwrap();
    conn.execute_batch(
        "DROP TABLE expense_shares;
         DROP TABLE settlement_payments;
         ALTER TABLE users DROP COLUMN has_password;
         ALTER TABLE users DROP COLUMN biometric_enabled;
         UPDATE ledger_properties SET version = '1';",
    )
    .unwrap();
}

#[test]
fn test_open_migrates_v1_database() {
    let temp_dir = TempDir::new().unwrap();
    {
        let mut ledger = Ledger::create(temp_dir.path(), LedgerConfig::default()).unwrap();
        ledger.insert_user(&User::new("user1", "Ming", "ming@example.com")).unwrap();
        ledger.set_password("user1", "Weekend2024").unwrap();
    }
    downgrade_to_v1(&temp_dir.path().join("splitbill.db"));

    let mut ledger = Ledger::open(temp_dir.path(), LedgerConfig::default()).unwrap();
    assert_eq!(ledger.get_properties().unwrap().version, DB_VERSION);

    // The password flag is rebuilt from the security table
    let user = ledger.get_user("user1").unwrap().unwrap();
    assert!(user.has_password);
    assert!(!user.biometric_enabled);

    // Tables added in v3 are usable
    let trip = ledger.create_account("Trip", None, "user1").unwrap();
    let ming = ledger.add_member(&trip, "user1", "Ming", None).unwrap();
    let id = ledger.add_expense(new_expense(&trip, "Dinner", &ming, 500, ExpenseCategory::Food)).unwrap();
    assert_eq!(ledger.get_expense_shares(&id).unwrap().len(), 1);
}

#[test]
fn test_config_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.json");
    std::fs::write(&config_path, r#"{ "lang": "zh-TW", "default_currency": "USD" }"#).unwrap();
    let config = LedgerConfig::load(&config_path).unwrap();

    let data = temp_dir.path().join("data");
    let mut ledger = Ledger::create(&data, config).unwrap();
    assert_eq!(ledger.get_properties().unwrap().lang, "zh-TW");

    let account = ledger.create_account("Lunch", None, "user1").unwrap();
    let ming = ledger.add_member(&account, "user1", "Ming", None).unwrap();
    let mut lunch = new_expense(&account, "Lunch", &ming, 1200, ExpenseCategory::Food);
    lunch.currency = String::new();
    let id = ledger.add_expense(lunch).unwrap();
    assert_eq!(ledger.get_expense(&id).unwrap().unwrap().currency, "USD");
}
