#![cfg(feature = "cli")]

use predicates::prelude::*;

fn pool_json(volume_l: f64) -> serde_json::Value {
    serde_json::json!({
        "id": "p1",
        "name": "Backyard",
        "volume_l": volume_l,
        "shape": "rectangular",
        "type": "pool",
        "coating": "tile",
        "chlorine_form": "tablet"
    })
}

#[test]
fn cli_fails_without_any_input() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("poolsense_rs");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Missing input data"));
}

#[test]
fn cli_works_with_inline_json() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("poolsense_rs");
    let measurements = serde_json::json!({ "ph": 7.0, "chlorine": 0.2 }).to_string();

    cmd.arg("--json")
        .arg("--pool-json")
        .arg(pool_json(5000.0).to_string())
        .arg("--measurements-json")
        .arg(measurements);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"warning\""))
        .stdout(predicate::str::contains("Chlorine Mini Tablet (20g)"));
}

#[test]
fn cli_reads_document_from_stdin_and_keeps_edit_id() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("poolsense_rs");

    let doc = serde_json::json!({
        "pool": pool_json(20000.0),
        "measurements": { "ph": 7.4, "chlorine": 2.0 },
        "visual": { "appearance": "green" },
        "edit_id": "abc"
    })
    .to_string();

    cmd.arg("--json").arg("--input").arg("-").write_stdin(doc);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"id\": \"abc\""))
        .stdout(predicate::str::contains("\"status\": \"critical\""));
}

#[test]
fn cli_share_output() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("poolsense_rs");
    cmd.arg("--share")
        .arg("--pool-json")
        .arg(pool_json(10000.0).to_string())
        .arg("--measurements-json")
        .arg(r#"{"hardness": 600}"#);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Status: Attention needed"))
        .stdout(predicate::str::contains("check Water Replacement"));
}

#[test]
fn cli_reports_invalid_json_for_pool_json() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("poolsense_rs");
    cmd.arg("--pool-json")
        .arg("{not valid json}")
        .arg("--measurements-json")
        .arg("{}");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON for --pool-json"));
}

#[test]
fn cli_rejects_zero_volume_pool() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("poolsense_rs");
    cmd.arg("--pool-json")
        .arg(pool_json(0.0).to_string())
        .arg("--measurements-json")
        .arg("{}");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid pool"));
}

#[test]
fn cli_rejects_invalid_user_product() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("poolsense_rs");
    let products = serde_json::json!([{
        "name": "Broken",
        "category": "ph_up",
        "dose_quantity": 6.0,
        "unit": "g",
        "effect_change": 0.1,
        "volume_reference_l": 0.0
    }])
    .to_string();
    cmd.arg("--pool-json")
        .arg(pool_json(10000.0).to_string())
        .arg("--measurements-json")
        .arg("{}")
        .arg("--products-json")
        .arg(products);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid product field 'volume_reference_l'"));
}

#[test]
fn cli_reports_invalid_json_in_file() {
    use std::fs::File;
    use std::io::Write as _;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let file_path = dir.path().join("bad.json");
    let mut f = File::create(&file_path).unwrap();
    writeln!(f, "this is not json").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("poolsense_rs");
    cmd.arg("--input").arg(file_path);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON in input document"));
}

#[test]
fn cli_uses_first_user_product_of_a_category() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("poolsense_rs");
    let products = serde_json::json!([
        {
            "name": "First pH Plus",
            "category": "ph_up",
            "dose_quantity": 6.0,
            "unit": "g",
            "effect_change": 0.1,
            "volume_reference_l": 1000.0
        },
        {
            "name": "Second pH Plus",
            "category": "ph_up",
            "dose_quantity": 9.0,
            "unit": "g",
            "effect_change": 0.1,
            "volume_reference_l": 1000.0
        }
    ])
    .to_string();
    cmd.arg("--pool-json")
        .arg(pool_json(10000.0).to_string())
        .arg("--measurements-json")
        .arg(r#"{"ph": 7.0}"#)
        .arg("--products-json")
        .arg(products);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("240 g of First pH Plus"))
        .stdout(predicate::str::contains("Second pH Plus").not());
}

#[test]
fn cli_treats_empty_edit_id_as_new_analysis() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("poolsense_rs");

    let doc = serde_json::json!({
        "pool": pool_json(10000.0),
        "measurements": { "ph": 7.0 },
        "history": [{
            "id": "old",
            "date": "2024-05-01T10:00:00Z",
            "status": "warning",
            "summary": "Adjustments needed to balance the water.",
            "steps": [],
            "measurements": { "ph": 7.0 },
            "visual": { "appearance": "clear" }
        }]
    })
    .to_string();

    cmd.arg("--json")
        .arg("--edit-id")
        .arg("")
        .arg("--input")
        .arg("-")
        .write_stdin(doc);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("pH continues low"))
        .stdout(predicate::str::contains("\"id\": \"\"").not());
}
