use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn exe() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_fresque-docgen"))
}

fn seed(data: &Path) {
    fs::create_dir_all(data.join("fr")).unwrap();
    fs::write(
        data.join("graph_base.json"),
        r#"{
            "nodes": [
                {"id": 1, "batch": 1, "x": 0, "y": 0},
                {"id": 2, "batch": 1, "x": 1, "y": 1}
            ],
            "edges": {"major": [{"from": 1, "to": 2}], "minor": []}
        }"#,
    )
    .unwrap();

    let fr = data.join("fr");
    fs::write(fr.join("node_names.json"), r#"{"1": "Énergies fossiles", "2": "CO2"}"#).unwrap();
    for id in [1, 2] {
        fs::write(fr.join(format!("node_info_{id}.html")), "<p>info</p>").unwrap();
        fs::write(fr.join(format!("node_moreInfo_{id}.html")), "<p>50% <em>plus</em></p>").unwrap();
    }
    fs::write(fr.join("edge_info_1_2.html"), "<p>combustion</p>").unwrap();
    fs::write(fr.join("component_names.json"), r#"{"title": "La Fresque"}"#).unwrap();
}

fn base_args(root: &Path) -> Vec<String> {
    let templates = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");
    vec![
        "--data-dir".into(),
        root.join("data").to_string_lossy().into_owned(),
        "--output-dir".into(),
        root.join("out").to_string_lossy().into_owned(),
        "--templates-dir".into(),
        templates.to_string_lossy().into_owned(),
        "--language".into(),
        "fr".into(),
    ]
}

#[test]
fn cli_build_without_conversion_writes_outputs() {
    let dir = tempfile::tempdir().unwrap();
    seed(&dir.path().join("data"));

    let status = Command::new(exe())
        .arg("build")
        .arg("--no-convert")
        .args(base_args(dir.path()))
        .status()
        .unwrap();

    assert!(status.success());
    let out = dir.path().join("out");
    assert!(out.join("content/graph.json").exists());
    assert!(out.join("content/translations.json").exists());
    assert!(out.join("manifest.json").exists());

    let tex = fs::read_to_string(out.join("dl/documentation_fr.tex")).unwrap();
    assert!(tex.contains("Énergies fossiles"));
    assert!(tex.contains("50\\%  \\emph{plus}"));
    let html = fs::read_to_string(out.join("dl/documentation_fr.html")).unwrap();
    assert!(html.contains("<p>combustion</p>"));
    assert!(!out.join("dl/documentation_fr.pdf").exists());
}

#[test]
fn cli_check_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    seed(&dir.path().join("data"));

    let output = Command::new(exe())
        .arg("check")
        .args(base_args(dir.path()))
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("2 cards, 1 relations"));
    assert!(!dir.path().join("out").exists());
}

#[test]
fn cli_check_does_not_read_templates() {
    let dir = tempfile::tempdir().unwrap();
    seed(&dir.path().join("data"));

    let mut args = base_args(dir.path());
    let templates = args.iter().position(|a| a == "--templates-dir").unwrap() + 1;
    args[templates] = dir.path().join("no-templates").to_string_lossy().into_owned();

    let output = Command::new(exe()).arg("check").args(args).output().unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("2 cards, 1 relations"));
}

#[test]
fn cli_fails_on_missing_graph() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("data")).unwrap();

    let status = Command::new(exe())
        .arg("build")
        .arg("--no-convert")
        .args(base_args(dir.path()))
        .status()
        .unwrap();

    assert!(!status.success());
    assert!(!dir.path().join("out").exists());
}
