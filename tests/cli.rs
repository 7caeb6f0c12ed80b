//! End-to-end tests of the command line binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn bundler() -> Command {
    Command::cargo_bin("kodegen_bundler_addon").unwrap()
}

fn only_file_with_suffix(dir: &Path, suffix: &str) -> String {
    let names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(suffix))
        .collect();
    assert_eq!(names.len(), 1, "expected one *{suffix} in {names:?}");
    names.into_iter().next().unwrap()
}

#[test]
fn bundles_directory_of_addons() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(src.path().join("build/Release")).unwrap();
    std::fs::write(src.path().join("build/Release/addon.node"), b"native bytes").unwrap();
    std::fs::write(src.path().join("build/Release/addon.js"), b"ignored").unwrap();

    bundler()
        .current_dir(src.path())
        .arg(src.path())
        .arg("--out-dir")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("addon.node"))
        .stdout(predicate::str::contains("manifest:"));

    let addon = only_file_with_suffix(out.path(), ".node");
    assert!(addon.starts_with("addon.") && addon.len() == "addon.12345678.node".len());
    assert_eq!(std::fs::read(out.path().join(&addon)).unwrap(), b"native bytes");

    let loader = only_file_with_suffix(out.path(), ".mjs");
    assert_eq!(loader, format!("{addon}.mjs"));
    let code = std::fs::read_to_string(out.path().join(&loader)).unwrap();
    assert!(code.contains(&format!("\"{addon}\"")));

    let manifest: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(out.path().join("addon-manifest.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(manifest[&addon]["size"], 12);
}

#[test]
fn no_hash_and_cjs_format() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let addon = src.path().join("plain.node");
    std::fs::write(&addon, b"plain").unwrap();

    bundler()
        .current_dir(src.path())
        .arg(&addon)
        .args(["--no-hash", "--format", "cjs", "--out-dir"])
        .arg(out.path())
        .assert()
        .success();

    assert_eq!(std::fs::read(out.path().join("plain.node")).unwrap(), b"plain");
    let code = std::fs::read_to_string(out.path().join("plain.node.cjs")).unwrap();
    assert!(code.contains("module.exports = addon;"));
}

#[test]
fn missing_addon_warns_and_strict_fails() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let present = src.path().join("present.node");
    std::fs::write(&present, b"present").unwrap();
    let missing = src.path().join("missing.node");

    bundler()
        .current_dir(src.path())
        .arg(&present)
        .arg(&missing)
        .arg("--out-dir")
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Node addon file not found"));

    bundler()
        .current_dir(src.path())
        .arg(&present)
        .arg(&missing)
        .arg("--strict")
        .arg("--out-dir")
        .arg(out.path())
        .assert()
        .code(1);
}

#[test]
fn reads_configuration_file() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    std::fs::write(src.path().join("lib.node"), b"configured").unwrap();
    std::fs::write(
        src.path().join("addon-loader.toml"),
        "hash_length = 4\nformat = \"cjs\"\n",
    )
    .unwrap();

    bundler()
        .current_dir(src.path())
        .arg("lib.node")
        .arg("--out-dir")
        .arg(out.path())
        .assert()
        .success();

    let addon = only_file_with_suffix(out.path(), ".node");
    assert_eq!(addon.len(), "lib.abcd.node".len());
    only_file_with_suffix(out.path(), ".cjs");
}

#[test]
fn rejects_inputs_without_addons() {
    let src = tempfile::tempdir().unwrap();
    std::fs::write(src.path().join("index.js"), b"x").unwrap();

    bundler()
        .current_dir(src.path())
        .arg(src.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No native addons found"));
}
