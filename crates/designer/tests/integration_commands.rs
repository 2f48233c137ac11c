//! Integration tests for the AgentCommand JSON protocol.
//!
//! Tests the full command pipeline: JSON string -> parse -> execute -> response.

use designer_lib::command::{execute_json, execute_json_batch};
use designer_lib::harness::TestHarness;
use shared::{ShapeKind, Vector3};

fn id_of(resp: &designer_lib::command::CommandResponse) -> String {
    resp.data.as_ref().unwrap()["id"].as_str().unwrap().to_string()
}

#[test]
fn test_command_add_object() {
    let mut h = TestHarness::new();

    let resp = execute_json(&mut h, r#"{"command": "add_object", "type": "octahedron"}"#).unwrap();
    assert!(resp.success);
    let id = id_of(&resp);
    assert_eq!(h.object_count(), 1);
    assert_eq!(h.object(&id).unwrap().kind, ShapeKind::Octahedron);
    assert_eq!(h.object(&id).unwrap().name, "octahedron-1");
}

#[test]
fn test_command_full_workflow_via_json_batch() {
    let mut h = TestHarness::new();

    let json = r#"[
        {"command": "add_object", "type": "box"},
        {"command": "add_object", "type": "cylinder"},
        {"command": "inspect"}
    ]"#;

    let responses = execute_json_batch(&mut h, json).unwrap();
    assert_eq!(responses.len(), 3);
    for resp in &responses {
        assert!(resp.success, "Failed: {:?}", resp.error);
    }

    let inspect_data = responses[2].data.as_ref().unwrap();
    assert_eq!(inspect_data["object_count"], 2);
    assert_eq!(inspect_data["objects"][0]["name"], "box-1");
    assert_eq!(inspect_data["objects"][1]["name"], "cylinder-2");
}

#[test]
fn test_command_invalid_json_error() {
    let mut h = TestHarness::new();
    let result = execute_json(&mut h, "not valid json");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Invalid command JSON"));
}

#[test]
fn test_command_undo_redo_via_json() {
    let mut h = TestHarness::new();
    h.add(ShapeKind::Box).unwrap();
    assert_eq!(h.object_count(), 1);

    let resp = execute_json(&mut h, r#"{"command": "undo"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.as_ref().unwrap()["undone"], true);
    assert_eq!(h.object_count(), 0);

    let resp = execute_json(&mut h, r#"{"command": "redo"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.as_ref().unwrap()["redone"], true);
    assert_eq!(h.object_count(), 1);

    // Undo again, then try undo at the baseline
    execute_json(&mut h, r#"{"command": "undo"}"#).unwrap();
    let resp = execute_json(&mut h, r#"{"command": "undo"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.as_ref().unwrap()["undone"], false);
}

#[test]
fn test_command_duplicate() {
    let mut h = TestHarness::new();
    let id = h.add(ShapeKind::Cone).unwrap();

    let cmd = serde_json::json!({ "command": "duplicate", "id": id }).to_string();
    let resp = execute_json(&mut h, &cmd).unwrap();
    assert!(resp.success);
    let copy = id_of(&resp);

    assert_ne!(copy, id);
    assert_eq!(h.object_count(), 2);
    assert_eq!(h.object(&copy).unwrap().position, Vector3::new(1.0, 1.0, 1.0));
    assert!(h.object(&copy).unwrap().name.ends_with("-copy"));
    assert_eq!(h.selected(), Some(&copy));
}

#[test]
fn test_command_delete() {
    let mut h = TestHarness::new();
    let id_a = h.add(ShapeKind::Box).unwrap();
    h.add(ShapeKind::Box).unwrap();
    assert_eq!(h.object_count(), 2);

    let delete_json = format!(r#"{{"command": "delete", "id": "{}"}}"#, id_a);
    let resp = execute_json(&mut h, &delete_json).unwrap();
    assert!(resp.success);
    assert_eq!(h.object_count(), 1);
    assert!(h.object(&id_a).is_none());
}

#[test]
fn test_command_update_then_commit() {
    let mut h = TestHarness::new();
    let id = h.add(ShapeKind::Sphere).unwrap();

    let update = serde_json::json!({
        "command": "update", "id": id,
        "patch": { "position": { "x": 2, "y": 1, "z": 0 } }
    });
    let commit = serde_json::json!({
        "command": "commit", "id": id,
        "patch": { "position": { "x": 3, "y": 1, "z": 0 }, "color": "#ff0000" }
    });
    let batch = serde_json::json!([update, commit]).to_string();
    let responses = execute_json_batch(&mut h, &batch).unwrap();
    assert!(responses.iter().all(|r| r.success));

    let object = h.object(&id).unwrap();
    assert_eq!(object.position.x, 3.0);
    assert_eq!(object.color.to_hex(), "#ff0000");

    // The live update is not its own history step
    assert!(h.undo());
    assert_eq!(h.object(&id).unwrap().position, Vector3::new(0.0, 1.0, 0.0));
}

#[test]
fn test_command_scale_clamp() {
    let mut h = TestHarness::new();
    let id = h.add(ShapeKind::Box).unwrap();
    let cmd = serde_json::json!({
        "command": "commit", "id": id,
        "patch": { "scale": { "x": 0, "y": -5, "z": 2 } }
    })
    .to_string();
    assert!(execute_json(&mut h, &cmd).unwrap().success);
    assert_eq!(h.object(&id).unwrap().scale, Vector3::new(0.1, 0.1, 2.0));
}

#[test]
fn test_command_select_and_clear_selection() {
    let mut h = TestHarness::new();
    let id1 = h.add(ShapeKind::Box).unwrap();
    h.add(ShapeKind::Box).unwrap();

    let select_json = format!(r#"{{"command": "select", "id": "{}"}}"#, id1);
    let resp = execute_json(&mut h, &select_json).unwrap();
    assert!(resp.success);
    assert_eq!(h.selected(), Some(&id1));

    let resp = execute_json(&mut h, r#"{"command": "select", "id": "nope"}"#).unwrap();
    assert!(!resp.success);
    assert_eq!(h.selected(), Some(&id1));

    let resp = execute_json(&mut h, r#"{"command": "clear_selection"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(h.selected(), None);
}

#[test]
fn test_command_add_objects_batch() {
    let mut h = TestHarness::new();
    let cmd = r##"{"command": "add_objects", "objects": [
        {"type": "box", "name": "seat", "position": {"x": 0, "y": 0.5, "z": 0}, "scale": {"x": 1, "y": 0.1, "z": 1}, "color": "#8b4513"},
        {"type": "cylinder", "name": "leg", "position": {"x": 0.4, "y": 0.25, "z": 0.4}}
    ]}"##;
    let resp = execute_json(&mut h, cmd).unwrap();
    assert!(resp.success, "{:?}", resp.error);
    assert_eq!(resp.data.unwrap()["ids"].as_array().unwrap().len(), 2);
    assert_eq!(h.object_count(), 2);

    assert!(h.undo());
    assert_eq!(h.object_count(), 0, "batch is one undo step");
}

#[test]
fn test_command_export_stl() {
    let mut h = TestHarness::new();
    h.add_box().unwrap();

    let resp = execute_json(&mut h, r#"{"command": "export_stl"}"#).unwrap();
    assert!(resp.success);
    let stl = resp.data.unwrap()["stl"].as_str().unwrap().to_string();
    assert_eq!(stl.matches("facet normal").count(), 12);
    assert_eq!(stl.matches("vertex ").count(), 36);
}

#[test]
fn test_command_share_and_import() {
    let mut h = TestHarness::new();
    let cmds = r#"[
        {"command": "add_object", "type": "ring"},
        {"command": "add_object", "type": "tube"},
        {"command": "share"}
    ]"#;
    let responses = execute_json_batch(&mut h, cmds).unwrap();
    let token = responses[2].data.as_ref().unwrap()["token"]
        .as_str()
        .unwrap()
        .to_string();

    let mut h2 = TestHarness::new();
    let import = serde_json::json!({ "command": "import", "token": token }).to_string();
    let resp = execute_json(&mut h2, &import).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["object_count"], 2);
    assert_eq!(h2.app.scene.scene, h.app.scene.scene);

    // Import is undoable
    assert!(h2.undo());
    assert_eq!(h2.object_count(), 0);
}

#[test]
fn test_command_clear() {
    let mut h = TestHarness::new();
    h.add(ShapeKind::Box).unwrap();
    h.add(ShapeKind::Torus).unwrap();
    assert_eq!(h.object_count(), 2);

    let resp = execute_json(&mut h, r#"{"command": "clear"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(h.object_count(), 0);
    assert_eq!(h.selected(), None);
}

#[test]
fn test_command_add_all_kinds() {
    let mut h = TestHarness::new();

    let cmds: Vec<serde_json::Value> = ShapeKind::all()
        .iter()
        .map(|k| serde_json::json!({ "command": "add_object", "type": k }))
        .collect();
    let responses = execute_json_batch(&mut h, &serde_json::to_string(&cmds).unwrap()).unwrap();
    for (i, resp) in responses.iter().enumerate() {
        assert!(resp.success, "Command {} failed: {:?}", i, resp.error);
    }

    // Build and verify all meshes are valid
    assert_eq!(h.build().len(), ShapeKind::all().len());
    assert!(h.errors().is_empty());
}
