//! Integration tests for the sf-cli binary.

#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A temp directory holding a fresh `sf init demo` level.
fn demo_level() -> (TempDir, PathBuf) {
    let parent = TempDir::new().unwrap();
    sf().args(["init", "demo"])
        .current_dir(parent.path())
        .assert()
        .success();
    let level = parent.path().join("demo/level.json");
    (parent, level)
}

/// A level whose relay calls an input its target does not have.
fn broken_level() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("level.json");
    fs::write(
        &path,
        r#"{
  "tag": "level",
  "attributes": { "name": "broken" },
  "children": [
    {
      "tag": "entities",
      "children": [
        {
          "tag": "logic_relay",
          "attributes": { "name": "a" },
          "children": [
            {
              "tag": "outputs",
              "children": [
                {
                  "tag": "output",
                  "attributes": { "trigger": "on_trigger", "target": "b", "input": "explode" }
                }
              ]
            }
          ]
        },
        { "tag": "logic_relay", "attributes": { "name": "b" } }
      ]
    }
  ]
}
"#,
    )
    .unwrap();
    (dir, path)
}

fn sf() -> Command {
    Command::cargo_bin("sf").unwrap()
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_level_directory() {
    let parent = TempDir::new().unwrap();
    sf().args(["init", "mymap"])
        .current_dir(parent.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created level 'mymap'"));

    assert!(parent.path().join("mymap/level.json").exists());
}

#[test]
fn init_fails_if_dir_exists() {
    let parent = TempDir::new().unwrap();
    fs::create_dir(parent.path().join("mymap")).unwrap();

    sf().args(["init", "mymap"])
        .current_dir(parent.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

#[test]
fn build_writes_datapack() {
    let (parent, level) = demo_level();
    let out = parent.path().join("out");
    sf().args(["build", "-l", level.to_str().unwrap(), "-o", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Compiled 'demo' successfully")
                .and(predicate::str::contains("256 blocks")),
        );

    let init = fs::read_to_string(out.join("datapack/data/demo/function/on_load/init.mcfunction"))
        .unwrap();
    assert_eq!(init, "say Welcome to demo!\n");
    let load = fs::read_to_string(out.join("datapack/data/minecraft/tags/function/load.json"))
        .unwrap();
    assert!(load.contains("\"demo:init\""));
    assert!(!out.join("regions").exists());
}

#[test]
fn build_with_regions_and_namespace() {
    let (parent, level) = demo_level();
    let out = parent.path().join("out");
    sf().args([
        "build",
        "-l",
        level.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
        "--namespace",
        "arena",
        "--regions",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("4 region snapshots"));

    assert!(out.join("datapack/data/arena/function/init.mcfunction").exists());
    assert!(out.join("regions/r.0.0.json").exists());
    assert!(out.join("regions/r.-1.-1.json").exists());
}

#[test]
fn build_fails_on_errors() {
    let (dir, level) = broken_level();
    sf().args(["build", "-l", level.to_str().unwrap()])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("compilation failed with errors"));
    assert!(!dir.path().join("build").exists());
}

#[test]
fn build_missing_level_fails() {
    let dir = TempDir::new().unwrap();
    sf().args(["build"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot load"));
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_passes_valid_level() {
    let (_parent, level) = demo_level();
    sf().args(["check", "-l", level.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("'demo' is valid (3 entities)"));
}

#[test]
fn check_reports_undeclared_input() {
    let (_dir, level) = broken_level();
    sf().args(["check", "-l", level.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("\"b\" has no input \"explode\"")
                .and(predicate::str::contains("check failed")),
        );
}

// ---------------------------------------------------------------------------
// list / show
// ---------------------------------------------------------------------------

#[test]
fn list_shows_all_entities() {
    let (_parent, level) = demo_level();
    sf().args(["list", "-l", level.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("floor")
                .and(predicate::str::contains("on_load"))
                .and(predicate::str::contains("welcome"))
                .and(predicate::str::contains("3 entities")),
        );
}

#[test]
fn list_filters_by_type() {
    let (_parent, level) = demo_level();
    sf().args(["list", "-t", "world_brush", "-l", level.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("floor")
                .and(predicate::str::contains("welcome").not())
                .and(predicate::str::contains("1 entity")),
        );
}

#[test]
fn list_no_matches() {
    let (_parent, level) = demo_level();
    sf().args(["list", "-t", "logic_timer", "-l", level.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entities found"));
}

#[test]
fn show_entity_details() {
    let (_parent, level) = demo_level();
    sf().args(["show", "on_load", "-l", level.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("logic_auto")
                .and(predicate::str::contains("on_datapack_load -> welcome.execute")),
        );
}

#[test]
fn show_lists_attributes() {
    let (_parent, level) = demo_level();
    sf().args(["show", "welcome", "-l", level.to_str().unwrap()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("command")
                .and(predicate::str::contains("string_attribute"))
                .and(predicate::str::contains("say Welcome to demo!")),
        );
}

#[test]
fn show_missing_entity() {
    let (_parent, level) = demo_level();
    sf().args(["show", "ghost", "-l", level.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("entity not found"));
}

// ---------------------------------------------------------------------------
// types / new
// ---------------------------------------------------------------------------

#[test]
fn types_lists_builtins() {
    sf().arg("types").assert().success().stdout(
        predicate::str::contains("logic_relay")
            .and(predicate::str::contains("world_static"))
            .and(predicate::str::contains("nbt_attribute"))
            .and(predicate::str::contains("trigger_scope: players, entities")),
    );
}

#[test]
fn new_adds_entity_with_free_name() {
    let (_parent, level) = demo_level();
    let path = level.to_str().unwrap();
    sf().args(["new", "logic_relay", "door", "-l", path])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added logic_relay 'door'"));
    sf().args(["new", "single_block", "door", "--at", "1,64,2", "-l", path])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added single_block 'door1' at (1, 64, 2)"));

    sf().args(["list", "-l", path])
        .assert()
        .success()
        .stdout(predicate::str::contains("door1").and(predicate::str::contains("5 entities")));
}

#[test]
fn new_rejects_unknown_type() {
    let (_parent, level) = demo_level();
    sf().args(["new", "laser", "beam", "-l", level.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown entity type 'laser'"));
}

#[test]
fn new_rejects_bad_position() {
    let (_parent, level) = demo_level();
    sf().args(["new", "single_block", "b", "--at", "1,2", "-l", level.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid position"));
}

// ---------------------------------------------------------------------------
// snbt
// ---------------------------------------------------------------------------

#[test]
fn snbt_prints_canonical_form() {
    sf().args(["snbt", "{ b: 2, a: true }"])
        .assert()
        .success()
        .stdout(predicate::str::contains("{a:1b,b:2}"));
}

#[test]
fn snbt_reports_errors() {
    sf().args(["snbt", "{a:1,,}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed SNBT").and(predicate::str::contains("invalid SNBT")));
}
