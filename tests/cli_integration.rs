// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Integration tests for the concept-atlas CLI commands

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const PAYLOAD: &str = r#"{
    "message": "Here come the visualisations...",
    "completed": true,
    "progress": 100,
    "markers": {
        "concepts": {
            "1": {"value": "A", "weight": 10, "x": 0, "y": 0, "mstEdges": [{"to": "2"}],
                  "related": [{"id": "2", "str": "0.4", "ct": "7", "pr": "3"},
                              {"id": "3", "str": "0.1", "ct": "2", "pr": "1"}]},
            "2": {"value": "B", "weight": 20, "x": 1, "y": 1, "themeId": "t1", "mstEdges": [{"to": "3"}]},
            "3": {"value": "C", "weight": 5, "x": -1, "y": 0.5, "mstEdges": [],
                  "related": [{"id": "1", "str": "0.2", "ct": "3", "pr": "2"},
                              {"id": "404", "str": "0.2", "ct": "3", "pr": "9"}]}
        },
        "themes": {"t1": {"name": "bees", "connectivity": "5"}},
        "iprom": [{"from": "2", "to": "1", "weight": 0.5}, {"from": "2", "to": "3", "weight": 0.25}]
    }
}"#;

/// A temp dir holding `payload.json` and an empty `config.toml`
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(payload: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("payload.json"), payload).unwrap();
        fs::write(dir.path().join("config.toml"), "").unwrap();
        Self { dir }
    }

    fn payload(&self) -> PathBuf {
        self.dir.path().join("payload.json")
    }

    fn config(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("concept-atlas").unwrap();
        cmd.arg("--config").arg(self.config()).arg("--no-color");
        cmd
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self
            .cmd()
            .arg("--json")
            .args(args)
            .arg(self.payload())
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).unwrap()
    }
}

#[test]
fn test_layout_json() {
    let fx = Fixture::new(PAYLOAD);
    let out = fx.json(&["layout"]);

    let words = out["words"].as_array().unwrap();
    assert_eq!(words.len(), 3);
    assert_eq!(words[0]["name"], "B");
    assert_eq!(words[0]["fontSize"], 160.0);
    assert_eq!(words[2]["name"], "C");
    assert_eq!(words[2]["fontSize"], 8.0);
    assert_eq!(out["sizeDomain"], serde_json::json!([5.0, 20.0]));
    assert_eq!(out["spanningTree"]["segments"].as_array().unwrap().len(), 2);
}

#[test]
fn test_layout_width_override() {
    let fx = Fixture::new(PAYLOAD);
    let narrow = fx.json(&["layout"]);
    let wide = fx.json(&["layout", "--width", "1800"]);

    assert_eq!(narrow["words"][2]["x"], -450.0);
    assert_eq!(wide["words"][2]["x"], -900.0);
    assert_eq!(narrow["words"][2]["y"], wide["words"][2]["y"]);
}

#[test]
fn test_layout_text() {
    let fx = Fixture::new(PAYLOAD);
    fx.cmd()
        .args(["layout", "--web"])
        .arg(fx.payload())
        .assert()
        .success()
        .stdout(predicate::str::contains("Words"))
        .stdout(predicate::str::contains("Spanning tree"))
        .stdout(predicate::str::contains("A -- B"));
}

#[test]
fn test_tree() {
    let fx = Fixture::new(PAYLOAD);
    fx.cmd()
        .arg("tree")
        .arg(fx.payload())
        .assert()
        .success()
        .stdout(predicate::str::contains("3 nodes, depth 2"))
        .stdout(predicate::str::contains("    A (0.500)"));

    let tree = fx.json(&["tree"]);
    assert_eq!(tree["name"], "B");
    assert_eq!(tree["children"].as_array().unwrap().len(), 2);
}

#[test]
fn test_tree_cycle_fails() {
    let payload = PAYLOAD.replace(
        r#""iprom": [{"from": "2", "to": "1", "weight": 0.5}, {"from": "2", "to": "3", "weight": 0.25}]"#,
        r#""iprom": [{"from": "1", "to": "2", "weight": 0.5}, {"from": "2", "to": "1", "weight": 0.25}]"#,
    );
    let fx = Fixture::new(&payload);
    fx.cmd()
        .arg("tree")
        .arg(fx.payload())
        .assert()
        .failure()
        .stderr(predicate::str::contains("root"));
}

#[test]
fn test_tree_without_prominence() {
    let payload = PAYLOAD.replace(
        r#""iprom": [{"from": "2", "to": "1", "weight": 0.5}, {"from": "2", "to": "3", "weight": 0.25}]"#,
        r#""iprom": []"#,
    );
    let fx = Fixture::new(&payload);
    fx.cmd()
        .arg("tree")
        .arg(fx.payload())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no prominence edges"));
}

#[test]
fn test_scale_modes() {
    let fx = Fixture::new(PAYLOAD);
    let sqrt = fx.json(&["scale", "--mode", "sqrt"]);
    assert_eq!(sqrt["scaling"]["exponent"], 0.5);
    assert_eq!(sqrt["mode"], "sqrt");

    let linear = fx.json(&["scale", "--mode", "linear"]);
    assert_eq!(linear["scaling"]["exponent"], 1.0);
    assert_eq!(linear["stats"]["count"], 3);
}

#[test]
fn test_wheel_link_budget() {
    let fx = Fixture::new(PAYLOAD);
    let wheel = fx.json(&["wheel", "-n", "2"]);

    let links = wheel["links"]["links"].as_array().unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0]["prominence"], 3.0);
    assert_eq!(links[1]["prominence"], 2.0);
    assert_eq!(wheel["links"]["candidates"], 3);
    assert_eq!(wheel["links"]["dropped"], 1);
    assert_eq!(wheel["radius"], 130.0);
    assert_eq!(wheel["arcs"].as_array().unwrap().len(), 1);
}

#[test]
fn test_export_dot() {
    let fx = Fixture::new(PAYLOAD);
    fx.cmd()
        .args(["export", "--format", "dot"])
        .arg(fx.payload())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("graph concepts {"))
        .stdout(predicate::str::contains("\"1\" -- \"2\";"));
}

#[test]
fn test_export_json_to_file() {
    let fx = Fixture::new(PAYLOAD);
    let out = fx.dir.path().join("views.json");
    fx.cmd()
        .args(["export", "--format", "json", "--output"])
        .arg(&out)
        .arg(fx.payload())
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported to"));

    let views: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(views["mstComponents"], 1);
    assert!(views["hierarchy"].is_object());
}

#[test]
fn test_export_unknown_format() {
    let fx = Fixture::new(PAYLOAD);
    fx.cmd()
        .args(["export", "--format", "yaml"])
        .arg(fx.payload())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown export format"));
}

#[test]
fn test_invalid_payload() {
    let fx = Fixture::new("{\"concepts\": {\"1\": {\"value\": \"A\"}}}");
    fx.cmd()
        .arg("layout")
        .arg(fx.payload())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid payload"));
}

#[test]
fn test_missing_payload_file() {
    let fx = Fixture::new(PAYLOAD);
    fx.cmd()
        .arg("layout")
        .arg(fx.dir.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read payload"));
}

#[test]
fn test_payload_from_stdin() {
    let fx = Fixture::new(PAYLOAD);
    fx.cmd()
        .args(["--json", "scale", "-"])
        .write_stdin(PAYLOAD)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"exponent\""));
}

#[test]
fn test_config_show() {
    let fx = Fixture::new(PAYLOAD);
    fs::write(fx.config(), "[layout]\nwidth = 600.0\norientation = \"messy\"\n").unwrap();
    fx.cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("width = 600.0"))
        .stdout(predicate::str::contains("orientation = \"messy\""))
        .stdout(predicate::str::contains("num_links = 200"));
}

#[test]
fn test_config_reject_unknown_theme() {
    let payload = PAYLOAD.replace("\"themeId\": \"t1\"", "\"themeId\": \"t9\"");
    let fx = Fixture::new(&payload);

    fx.cmd().arg("layout").arg(fx.payload()).assert().success();

    fs::write(fx.config(), "[themes]\nunknown = \"reject\"\n").unwrap();
    fx.cmd()
        .arg("layout")
        .arg(fx.payload())
        .assert()
        .failure()
        .stderr(predicate::str::contains("t9"));
}

#[test]
fn test_completions() {
    Command::cargo_bin("concept-atlas")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("concept-atlas"));
}
