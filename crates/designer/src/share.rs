//! Share codes: the object list as JSON, encoded with standard base64.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use shared::{Scene, MAX_OBJECTS};

use crate::error::{DesignError, DesignResult};
use crate::state::scene::normalize_scene;

/// Encode the scene into a printable share token.
pub fn encode(scene: &Scene) -> DesignResult<String> {
    let json = serde_json::to_string(scene)?;
    Ok(STANDARD.encode(json))
}

/// Decode a share token. Fails without returning anything partial.
pub fn decode(token: &str) -> DesignResult<Scene> {
    let bytes = STANDARD
        .decode(token.trim())
        .map_err(|e| DesignError::Decode(format!("not base64: {e}")))?;
    let json =
        String::from_utf8(bytes).map_err(|e| DesignError::Decode(format!("not UTF-8 text: {e}")))?;
    let mut scene: Scene =
        serde_json::from_str(&json).map_err(|e| DesignError::Decode(format!("not a scene: {e}")))?;

    if scene.len() > MAX_OBJECTS {
        return Err(DesignError::SceneFull { max: MAX_OBJECTS });
    }

    let fixed = normalize_scene(&mut scene);
    if fixed > 0 {
        tracing::warn!("Share code: {} objects needed fixing", fixed);
    }
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use rand::Rng;
    use shared::{Color, ShapeKind, Vector3, MAX_SCALE, MIN_SCALE};

    #[test]
    fn test_round_trip_empty() {
        let token = encode(&empty_scene()).unwrap();
        assert_eq!(decode(&token).unwrap(), empty_scene());
    }

    #[test]
    fn test_round_trip_single() {
        let scene = scene_single_box();
        assert_eq!(decode(&encode(&scene).unwrap()).unwrap(), scene);
    }

    #[test]
    fn test_round_trip_many_with_unicode_and_extremes() {
        let mut objects = one_of_each_kind();
        objects[0].name = "Кубик 🧊 «тест»".to_string();
        objects[1].scale = Vector3::new(MIN_SCALE, MAX_SCALE, 123.5);
        objects[2].position = Vector3::new(-1e9, 0.25, 1e12);
        objects[3].rotation = Vector3::new(3.0, -0.5, 6.25);
        objects[4].color = Color::rgb(0xff, 0x00, 0x7f);
        objects[5].opacity = 0.0;
        let scene = scene_of(objects);

        let decoded = decode(&encode(&scene).unwrap()).unwrap();
        assert_eq!(decoded, scene);
    }

    #[test]
    fn test_round_trip_is_exact_for_awkward_floats() {
        for x in [
            1.0715660391465826e-75,
            -1.81996730402717e-179,
            -1.603964615428183e143,
            -9.643915712060552e-234,
            0.1 + 0.2,
            f64::MIN_POSITIVE,
            f64::MAX,
            5e-324,
        ] {
            let mut object = unit_box_at_origin("b");
            object.position.x = x;
            let scene = scene_of(vec![object]);
            assert_eq!(decode(&encode(&scene).unwrap()).unwrap(), scene, "x = {x:e}");
        }
    }

    #[test]
    fn test_round_trip_is_exact_for_random_finite_bits() {
        let mut rng = rand::thread_rng();
        let mut checked = 0;
        while checked < 2000 {
            let x = f64::from_bits(rng.gen());
            if !x.is_finite() {
                continue;
            }
            let mut object = unit_box_at_origin("b");
            object.position = Vector3::new(x, -x, x * 0.5);
            object.rotation = Vector3::new(x, 0.0, -x);
            let scene = scene_of(vec![object]);
            assert_eq!(decode(&encode(&scene).unwrap()).unwrap(), scene, "x = {x:e}");
            checked += 1;
        }
    }

    #[test]
    fn test_decode_reassigns_duplicate_ids() {
        let json = r#"[{"id":"x","type":"box","name":"a","position":{"x":0,"y":0,"z":0}},
            {"id":"x","type":"sphere","name":"b","position":{"x":1,"y":0,"z":0}}]"#;
        let scene = decode(&STANDARD.encode(json)).unwrap();
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.objects[0].id, "x");
        assert_ne!(scene.objects[1].id, "x");
        assert_eq!(scene.get("x").unwrap().kind, ShapeKind::Box);
    }

    #[test]
    fn test_decode_rejects_oversized_scene() {
        let objects = (0..=MAX_OBJECTS)
            .map(|i| unit_box_at_origin(&format!("o{i}")))
            .collect();
        let token = encode(&scene_of(objects)).unwrap();
        assert!(matches!(
            decode(&token),
            Err(DesignError::SceneFull { max: MAX_OBJECTS })
        ));
    }

    #[test]
    fn test_token_is_printable() {
        let token = encode(&scene_multiple_primitives()).unwrap();
        assert!(token.chars().all(|c| c.is_ascii_graphic()));
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        let scene = scene_single_box();
        let token = format!("  {}\n", encode(&scene).unwrap());
        assert_eq!(decode(&token).unwrap(), scene);
    }

    #[test]
    fn test_invalid_tokens_rejected() {
        assert!(matches!(decode("%%% not base64"), Err(DesignError::Decode(_))));
        // valid base64, invalid UTF-8
        assert!(matches!(decode("//79"), Err(DesignError::Decode(_))));
        // valid base64 of JSON that is not a scene
        let not_scene = STANDARD.encode(r#"{"hello":"world"}"#);
        assert!(matches!(decode(&not_scene), Err(DesignError::Decode(_))));
    }

    #[test]
    fn test_decode_sanitizes_objects() {
        let json = r##"[{"id":"a","type":"cube","name":"A","position":{"x":0,"y":0,"z":0},
            "scale":{"x":0,"y":-3,"z":5000},"opacity":7}]"##;
        let scene = decode(&STANDARD.encode(json)).unwrap();
        let object = &scene.objects[0];
        assert_eq!(object.kind, ShapeKind::Box);
        assert_eq!(object.scale, Vector3::new(MIN_SCALE, MIN_SCALE, MAX_SCALE));
        assert_eq!(object.opacity, 1.0);
    }
}
