//! Integration tests for TestHarness.
//!
//! Tests the headless harness API for programmatic scene manipulation.

use designer_lib::fixtures::*;
use designer_lib::harness::TestHarness;
use designer_lib::state::AppSettings;
use designer_lib::DesignError;
use shared::{AiChatResponse, ObjectPatch, ShapeKind, Vector3, MAX_OBJECTS};

#[test]
fn test_harness_add_and_build() {
    let mut h = TestHarness::new();
    let id = h.add(ShapeKind::Icosahedron).unwrap();
    h.build();

    assert_eq!(h.mesh_count(), 1);
    assert!(h.errors().is_empty());

    let v = h.validate_mesh(&id).unwrap();
    let errors = v.validate_all();
    assert!(errors.is_empty(), "Validation errors: {:?}", errors);
    assert_eq!(v.triangle_count(), 20);
}

#[test]
fn test_harness_undo_redo_cycle() {
    let mut h = TestHarness::new();
    h.add(ShapeKind::Box).unwrap();
    h.add(ShapeKind::Sphere).unwrap();
    assert_eq!(h.object_count(), 2);

    assert!(h.undo());
    assert_eq!(h.object_count(), 1);

    assert!(h.undo());
    assert_eq!(h.object_count(), 0);

    assert!(!h.undo()); // nothing to undo
    assert_eq!(h.object_count(), 0);

    assert!(h.redo());
    assert_eq!(h.object_count(), 1);

    assert!(h.redo());
    assert_eq!(h.object_count(), 2);

    assert!(!h.redo()); // nothing to redo
}

#[test]
fn test_harness_new_edit_discards_redo() {
    let mut h = TestHarness::new();
    h.add(ShapeKind::Box).unwrap();
    h.add(ShapeKind::Cone).unwrap();
    h.add(ShapeKind::Torus).unwrap();

    assert!(h.undo());
    assert!(h.undo());
    assert_eq!(h.object_count(), 1);
    assert!(h.redo());
    assert_eq!(h.object_count(), 2);

    h.add(ShapeKind::Plane).unwrap();
    assert!(!h.redo());
    let kinds: Vec<ShapeKind> = h.app.scene.scene.objects.iter().map(|o| o.kind.clone()).collect();
    assert_eq!(kinds, vec![ShapeKind::Box, ShapeKind::Cone, ShapeKind::Plane]);
}

#[test]
fn test_harness_duplicate_default_object() {
    let mut h = TestHarness::new();
    let id = h.add(ShapeKind::Box).unwrap();
    assert_eq!(h.object(&id).unwrap().position, Vector3::new(0.0, 1.0, 0.0));

    let copy = h.duplicate(&id).unwrap().unwrap();
    assert_ne!(copy, id);
    assert_eq!(h.object_count(), 2);
    let dup = h.object(&copy).unwrap();
    assert_eq!(dup.position, Vector3::new(1.0, 1.0, 1.0));
    assert_eq!(dup.name, format!("{}-copy", h.object(&id).unwrap().name));

    assert_eq!(h.duplicate("missing").unwrap(), None);
    assert_eq!(h.object_count(), 2);
}

#[test]
fn test_harness_scale_zero_clamps() {
    let mut h = TestHarness::new();
    let id = h.add(ShapeKind::Cylinder).unwrap();
    assert!(h.set_scale(&id, [0.0, -1.0, 0.0]));
    assert_eq!(h.object(&id).unwrap().scale, Vector3::new(0.1, 0.1, 0.1));

    h.build();
    let v = h.validate_mesh(&id).unwrap();
    assert!(v.validate_all().is_empty());
}

#[test]
fn test_harness_live_drag_then_commit() {
    let mut h = TestHarness::new();
    let id = h.add(ShapeKind::Box).unwrap();
    let entries = h.app.scene.history().len();

    for step in 1..=10 {
        h.update(&id, &ObjectPatch::position(Vector3::new(step as f64 * 0.1, 1.0, 0.0)));
    }
    assert_eq!(h.app.scene.history().len(), entries);
    h.commit(&id, &ObjectPatch::default());
    assert_eq!(h.app.scene.history().len(), entries + 1);
}

#[test]
fn test_harness_delete_clears_selection() {
    let mut h = TestHarness::new();
    let id_a = h.add(ShapeKind::Box).unwrap();
    assert_eq!(h.selected(), Some(&id_a));

    assert!(h.delete(&id_a));
    assert_eq!(h.selected(), None);
    assert!(!h.delete(&id_a));
}

#[test]
fn test_harness_share_round_trip() {
    let mut h = TestHarness::with_scene(AppSettings::default(), scene_all_kinds());
    let token = h.share_code().unwrap();

    let mut h2 = TestHarness::new();
    h2.import_share_code(&token).unwrap();
    assert_eq!(h2.app.scene.scene, h.app.scene.scene);

    h.clear();
    assert_eq!(h.object_count(), 0);
}

#[test]
fn test_harness_export_empty_rejected() {
    let h = TestHarness::new();
    assert!(matches!(h.export_stl(), Err(DesignError::EmptyExport)));
}

#[test]
fn test_harness_export_skips_nothing_for_all_kinds() {
    let h = TestHarness::with_scene(AppSettings::default(), scene_all_kinds());
    let stl = h.export_stl().unwrap();
    let facets = stl.matches("facet normal").count();
    let expected: usize = scene_all_kinds()
        .objects
        .iter()
        .map(|o| designer_lib::build::generate_mesh(&o.kind, o.scale).triangle_count())
        .sum();
    assert_eq!(facets, expected);
    assert_eq!(stl.matches("endfacet").count(), expected);
}

#[test]
fn test_harness_scene_full() {
    let objects = (0..MAX_OBJECTS)
        .map(|i| object_at(&format!("o{i}"), ShapeKind::Box, [0.0, 0.0, 0.0]))
        .collect();
    let mut h = TestHarness::with_scene(AppSettings::default(), scene_of(objects));

    assert!(matches!(
        h.add(ShapeKind::Box),
        Err(DesignError::SceneFull { .. })
    ));
    assert!(matches!(
        h.duplicate("o0"),
        Err(DesignError::SceneFull { .. })
    ));
    assert_eq!(h.object_count(), MAX_OBJECTS);
}

#[test]
fn test_harness_chat_reply_and_failure() {
    let mut h = TestHarness::new();

    h.app.chat.input = "build a snowman".to_string();
    let request = h.app.chat.send_message(&h.app.scene).unwrap();
    assert!(request.scene.is_empty());

    let reply = AiChatResponse {
        objects: vec![
            spec_of(ShapeKind::Sphere, "base", [0.0, 0.5, 0.0]),
            spec_of(ShapeKind::Sphere, "head", [0.0, 1.4, 0.0]),
        ],
        message: "Snowman ready.".to_string(),
    };
    assert_eq!(h.app.finish_chat(Ok(reply)).len(), 2);
    assert_eq!(h.object_count(), 2);

    h.app.chat.input = "add a hat".to_string();
    h.app.chat.send_message(&h.app.scene).unwrap();
    let added = h
        .app
        .finish_chat(Err(DesignError::ExternalService("502 Bad Gateway".into())));
    assert!(added.is_empty());
    assert_eq!(h.object_count(), 2);
    assert!(h.app.chat.messages.last().unwrap().is_error);
}

#[test]
fn test_harness_import_with_repeated_id_keeps_objects_distinct() {
    let shared_id = scene_of(vec![
        object_at("x", ShapeKind::Box, [0.0, 0.0, 0.0]),
        object_at("x", ShapeKind::Sphere, [2.0, 0.0, 0.0]),
    ]);
    let token = designer_lib::share::encode(&shared_id).unwrap();

    let mut h = TestHarness::new();
    h.import_share_code(&token).unwrap();
    assert_eq!(h.object_count(), 2);

    assert!(h.delete("x"));
    assert_eq!(h.object_count(), 1);
    assert_eq!(h.app.scene.scene.objects[0].kind, ShapeKind::Sphere);
}

#[test]
fn test_harness_export_bad_solid_name_uses_default() {
    let mut settings = AppSettings::default();
    settings.export.solid_name = "two words".to_string();
    let mut h = TestHarness::with_settings(settings);
    h.add_box().unwrap();
    let stl = h.export_stl().unwrap();
    assert!(stl.starts_with("solid design\n"));
}
