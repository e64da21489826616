use assert_cmd::prelude::*;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture() -> PathBuf {
    let path = repo_root()
        .join("fixtures")
        .join("floorplan")
        .join("small_hall.svg");
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("rackscan-cli"));
    cmd.current_dir(repo_root()).env_remove("RACKSCAN_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("run rackscan-cli");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn scan_prints_inventory_json() {
    let v = stdout_json(cli().arg(fixture()));
    assert_eq!(v["objects"]["serverRack"].as_array().map(Vec::len), Some(4));
    assert_eq!(v["objects"]["door"][0]["extra"]["rotationDegrees"], 90.0);
    assert_eq!(v["floor"]["width"], 1160.0);
}

#[test]
fn report_writes_csv_to_out_path() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("report.csv");

    cli()
        .args([
            "report",
            "--out",
            out.to_string_lossy().as_ref(),
            fixture().to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let csv = fs::read_to_string(&out).expect("read csv");
    assert!(csv.starts_with("object_type,object_id,coordinates,width,height,rotation\n"));
    assert!(csv.contains("door,door-0,\"(700.00, 780.00)\","));
    assert!(csv.contains("\nmetric,value\n"));
    assert!(csv.contains("Total Server Racks,4\n"));
    assert!(csv.contains("Red racks,2\n"));
}

#[test]
fn konva_records_source_file_and_layers() {
    let v = stdout_json(cli().args(["konva", "--pretty"]).arg(fixture()));
    assert_eq!(v["sourceFile"], "small_hall.svg");
    assert_eq!(v["stage"]["className"], "Stage");
    assert_eq!(v["metadata"]["totalElements"], 17);
    assert_eq!(v["stage"]["children"][0]["attrs"]["id"], "floor-layer");
}

#[test]
fn fabric_lists_layer_ids() {
    let v = stdout_json(cli().arg("fabric").arg(fixture()));
    assert_eq!(v["canvas"]["version"], "5.3.0");
    assert_eq!(
        v["layers"]["cooling-tiles"],
        serde_json::json!(["cooling-tile-0", "cooling-tile-1"])
    );
}

#[test]
fn annotate_reads_stdin() {
    let svg = fs::read_to_string(fixture()).expect("read fixture");
    let mut child = cli()
        .args(["annotate", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(svg.as_bytes())
        .expect("write stdin");
    let output = child.wait_with_output().expect("wait");
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).expect("utf8");
    assert!(text.starts_with("<svg"));
    assert!(text.contains(r#"<g id="server-racks">"#));
    assert!(text.contains(r#"id="floor-shape""#));
}

#[test]
fn config_file_is_applied() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("scan.json");
    fs::write(&config, r#"{ "detectGridLabels": false }"#).expect("write config");

    let v = stdout_json(
        cli()
            .args(["--config", config.to_string_lossy().as_ref()])
            .arg(fixture()),
    );
    assert_eq!(v["gridLabels"], serde_json::json!([]));
}

#[test]
fn invalid_config_fails() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("scan.json");
    fs::write(&config, r#"{ "tilePattern": { "curves": [50, 30] } }"#).expect("write config");

    cli()
        .args(["--config", config.to_string_lossy().as_ref()])
        .arg(fixture())
        .assert()
        .code(1);
}

#[test]
fn unknown_flag_is_a_usage_error() {
    cli().args(["--bogus"]).assert().code(2);
}

#[test]
fn malformed_svg_fails() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("broken.svg");
    fs::write(&input, "<svg><g></svg>").expect("write input");

    cli().arg(&input).assert().code(1);
}

#[test]
fn fail_empty_exits_with_three() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("empty.svg");
    fs::write(&input, r#"<svg xmlns="http://www.w3.org/2000/svg"><g/></svg>"#)
        .expect("write input");

    cli().arg("--fail-empty").arg(&input).assert().code(3);
    cli().arg(&input).assert().success();
}
