use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const BIN_NAME: &str = "vatbook";

fn vatbook(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("VATBOOK_DATA_DIR", data_dir.path());
    cmd.env_remove("VATBOOK_LOG");
    cmd
}

fn run(data_dir: &TempDir, args: &[&str]) {
    vatbook(data_dir).args(args).assert().success();
}

#[test]
fn cli_without_command_prints_hint() {
    let dir = TempDir::new().unwrap();
    vatbook(&dir)
        .assert()
        .success()
        .stdout(contains("vatbook --help"));
}

#[test]
fn cli_add_transaction_computes_vat() {
    let dir = TempDir::new().unwrap();
    run(&dir, &["category", "add", "Office", "--type", "expense"]);

    vatbook(&dir)
        .args([
            "transaction", "add", "100", "--category", "Office", "-D", "Printer paper",
            "--date", "2026-10-01",
        ])
        .assert()
        .success()
        .stdout(contains("19,00 €").and(contains("119,00 €")));

    vatbook(&dir)
        .args(["txn", "list"])
        .assert()
        .success()
        .stdout(contains("Printer paper").and(contains("1 transaction")));

    assert!(dir.path().join("data/transactions.json").exists());
}

#[test]
fn cli_exempt_and_non_applicable_categories_carry_no_vat() {
    let dir = TempDir::new().unwrap();
    run(&dir, &["category", "add", "Insurance", "--no-vat"]);
    run(&dir, &["category", "add", "Consulting", "--type", "revenue"]);

    vatbook(&dir)
        .args(["txn", "add", "100", "-c", "Insurance", "-D", "Liability"])
        .assert()
        .success()
        .stdout(contains("Total: 100,00 €"));

    vatbook(&dir)
        .args(["txn", "add", "250", "-c", "Consulting", "-D", "Workshop", "--type", "revenue", "--exempt"])
        .assert()
        .success()
        .stdout(contains("VAT:   0,00 €"));
}

#[test]
fn cli_rejects_invalid_amount_and_wrong_category_type() {
    let dir = TempDir::new().unwrap();
    run(&dir, &["category", "add", "Sales", "--type", "revenue"]);

    vatbook(&dir)
        .args(["txn", "add", "abc", "-c", "Sales", "-D", "x", "--type", "revenue"])
        .assert()
        .failure()
        .stderr(contains("Invalid amount"));

    vatbook(&dir)
        .args(["txn", "add", "10", "-c", "Sales", "-D", "Paper"])
        .assert()
        .failure()
        .stderr(contains("cannot be used for expense transactions"));
}

#[test]
fn cli_delete_category_in_use_fails() {
    let dir = TempDir::new().unwrap();
    run(&dir, &["category", "add", "Travel"]);
    run(&dir, &["txn", "add", "80", "-c", "Travel", "-D", "Train"]);
    run(&dir, &["txn", "add", "20", "-c", "Travel", "-D", "Taxi"]);

    vatbook(&dir)
        .args(["category", "delete", "Travel"])
        .assert()
        .failure()
        .stderr(contains("has 2 transactions assigned to it"));

    vatbook(&dir)
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(contains("Travel"));
}

#[test]
fn cli_manual_vat_mode() {
    let dir = TempDir::new().unwrap();
    run(&dir, &["settings", "set", "auto_vat", "false"]);
    run(&dir, &["category", "add", "Office"]);

    vatbook(&dir)
        .args(["txn", "add", "50", "-c", "Office", "-D", "Toner", "--vat", "5"])
        .assert()
        .success()
        .stdout(contains("55,00 €"));

    vatbook(&dir)
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(contains("VAT mode:         manual"));
}

#[test]
fn cli_unknown_setting_fails() {
    let dir = TempDir::new().unwrap();
    vatbook(&dir)
        .args(["settings", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(contains("Unknown setting"));
}

#[test]
fn cli_vat_report_and_csv_export() {
    let dir = TempDir::new().unwrap();
    run(&dir, &["category", "add", "Sales", "--type", "revenue"]);
    run(&dir, &["category", "add", "Office"]);
    run(&dir, &["txn", "add", "1000", "-c", "Sales", "-D", "Invoice 1", "-t", "revenue", "-d", "2026-10-02"]);
    run(&dir, &["txn", "add", "200", "-c", "Office", "-D", "Chair", "-d", "2026-10-03"]);

    vatbook(&dir)
        .args(["report", "vat", "--date", "2026-10-19"])
        .assert()
        .success()
        .stdout(contains("VAT payable:").and(contains("152,00 €")));

    vatbook(&dir)
        .args(["report", "profit-loss", "--timeframe", "year", "--date", "2026-10-19", "-o", "-"])
        .assert()
        .success()
        .stdout(contains("2026,Total,Net profit,762.00"));

    let export = dir.path().join("transactions.csv");
    run(&dir, &["export", "--output", export.to_str().unwrap()]);
    let csv = std::fs::read_to_string(&export).unwrap();
    assert!(csv.starts_with("Date,Type,Category,Description"));
    assert!(csv.contains("2026-10-03,expense,Office,Chair,200.00,38.00,238.00,no,,no"));
}

#[test]
fn cli_edit_and_delete_transaction() {
    let dir = TempDir::new().unwrap();
    run(&dir, &["category", "add", "Office"]);
    run(&dir, &["txn", "add", "100", "-c", "Office", "-D", "Desk"]);

    let output = vatbook(&dir).args(["export"]).output().unwrap();
    assert!(String::from_utf8_lossy(&output.stdout).contains("Desk"));

    let transactions: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("data/transactions.json")).unwrap(),
    )
    .unwrap();
    let id = transactions[0]["id"].as_str().unwrap().to_string();

    vatbook(&dir)
        .args(["txn", "edit", &id, "--amount", "200"])
        .assert()
        .success()
        .stdout(contains("238,00 €"));

    run(&dir, &["txn", "delete", &id]);
    vatbook(&dir)
        .args(["txn", "list"])
        .assert()
        .success()
        .stdout(contains("No transactions found."));
}

#[test]
fn cli_mutations_create_backups() {
    let dir = TempDir::new().unwrap();
    run(&dir, &["category", "add", "Office"]);

    vatbook(&dir)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(contains("vatbook-").and(contains("1 backup(s)")));

    run(&dir, &["settings", "set", "auto_backup", "off"]);
    run(&dir, &["category", "add", "Travel"]);
    vatbook(&dir)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(contains("1 backup(s)"));
}

#[test]
fn cli_backup_restore_latest() {
    let dir = TempDir::new().unwrap();
    run(&dir, &["category", "add", "Office"]);
    run(&dir, &["settings", "set", "auto_backup", "off"]);
    run(&dir, &["category", "add", "Travel"]);

    vatbook(&dir)
        .args(["backup", "restore", "latest"])
        .assert()
        .success()
        .stdout(contains("--force"));
    vatbook(&dir)
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(contains("Travel"));

    vatbook(&dir)
        .args(["backup", "restore", "latest", "--force"])
        .assert()
        .success()
        .stdout(contains("Previous data saved to:"));
    vatbook(&dir)
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(contains("Office").and(contains("Travel").not()));
}
