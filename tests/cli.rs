use assert_cmd::Command;
use predicates::str::contains;

fn cmd() -> Command {
    Command::cargo_bin("ecword").unwrap()
}

#[test]
fn encode_sodium_labels() {
    cmd()
        .args(["encode", "1s=2", "2s=2", "2p=6", "3s=1"])
        .assert()
        .success()
        .stdout(contains("word    234"))
        .stdout(contains("0x00000000000000ea"));
}

#[test]
fn encode_values_json() {
    cmd()
        .args([
            "--json",
            "encode",
            "--values",
            "0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,1,6,2,2",
        ])
        .assert()
        .success()
        .stdout(contains("\"word\":234"));
}

#[test]
fn encode_arity_mismatch_fails() {
    cmd()
        .args(["encode", "--values", "2,2,6"])
        .assert()
        .failure()
        .stderr(contains("Arity mismatch"));
}

#[test]
fn encode_negative_value_fails() {
    cmd()
        .args(["encode", "1s=-1"])
        .assert()
        .failure()
        .stderr(contains("out of range"));
}

#[test]
fn decode_hex() {
    cmd()
        .args(["decode", "0xEA"])
        .assert()
        .success()
        .stdout(contains("checksum 11"))
        .stdout(contains("2p"));
}

#[test]
fn decode_unknown_layout_fails() {
    let bits = format!("11111010{}", "0".repeat(56));
    cmd()
        .args(["decode", &bits])
        .assert()
        .failure()
        .stderr(contains("Unknown layout: 250"));
}

#[test]
fn decode_strict_implausible_exit_code() {
    // Semua field nol: checksum 0 di luar [1,118]
    cmd()
        .args(["decode", "0"])
        .assert()
        .success()
        .stdout(contains("implausible checksum 0"));

    cmd().args(["decode", "--strict", "0"]).assert().code(2);
}

#[test]
fn layout_table() {
    cmd()
        .args(["layout", "0"])
        .assert()
        .success()
        .stdout(contains("layout 0 (19 fields)"))
        .stdout(contains("7p"));
}

#[test]
fn store_append_and_dump() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("words.dat");
    let path = path.to_str().unwrap();

    cmd()
        .args(["store", "append", path, "234", "0x1"])
        .assert()
        .success()
        .stdout(contains("appended 2 words"));

    cmd()
        .args(["store", "dump", path])
        .assert()
        .success()
        .stdout(contains("checksum 11"))
        .stdout(contains("checksum 1"));
}

#[test]
fn store_append_oversized_capacity_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huge.dat");
    let path = path.to_str().unwrap();

    cmd()
        .args(["store", "append", path, "234", "--capacity", "2305843009213693951"])
        .assert()
        .failure()
        .stderr(contains("Corrupt word store"));
}
