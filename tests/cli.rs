use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("fdl").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("fdl"));
}

#[test]
fn get_rejects_empty_manufacturer() {
    let mut cmd = Command::cargo_bin("fdl").unwrap();
    cmd.args(["get", "--manufacturer", "  "]);
    cmd.assert().failure();
}

// Live test (opt-in): cargo test --features online
#[cfg(feature = "online")]
#[test]
fn fetch_online_astrazeneca() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("fdl").unwrap();
    cmd.args([
        "get",
        "--manufacturer",
        "AstraZeneca",
        "--by-route",
        "--stats",
        "--delay-ms",
        "500",
        "--plot-dir",
    ]);
    cmd.arg(tmp.path());
    cmd.assert().success();
    assert!(
        tmp.path()
            .join("number_of_ingredients_per_year_per_route_line.png")
            .exists()
    );
}
