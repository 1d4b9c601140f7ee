//! # Typed Payloads
//!
//! Rust mirrors of the built-in shapes. Field names serialize exactly as
//! the shape property names, so a value that passed validation always
//! deserializes into the matching type, and a typed value always
//! serializes into a conforming payload.

use serde::{Deserialize, Serialize};

/// Point in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Point or size in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

/// Camera orientation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Rotator {
    pub pinch: f64,
    pub yaw: f64,
    pub roll: f64,
}

/// Camera focus parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Focus {
    pub focus: Vector,
    pub rotator: Rotator,
    pub arm_length: f64,
    pub can_focus: bool,
}

/// Toggle switch widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Switch {
    pub check_img: String,
    pub check_text: String,
    pub un_check_img: String,
    pub un_check_text: String,
    pub min_size: Vector2D,
    pub font_size: f64,
}

/// `POI.Add`: create a POI without a popup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PoiAdd {
    /// Tags identifying the POI.
    pub tags: Vec<String>,
    /// Geographic location.
    pub location: Vector,
    /// Camera focus when the POI is selected.
    pub focus: Focus,
    /// Initially visible.
    pub display: bool,
    /// Switch widget parameters.
    pub switch: Switch,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ShapeRegistry;
    use serde_json::json;
    use uecall_core::DispatchKey;

    fn sample() -> PoiAdd {
        PoiAdd {
            tags: vec!["test".to_string()],
            location: Vector::default(),
            focus: Focus {
                focus: Vector::default(),
                rotator: Rotator::default(),
                arm_length: 100.0,
                can_focus: true,
            },
            display: true,
            switch: Switch {
                check_img: "test".to_string(),
                check_text: "test".to_string(),
                un_check_img: "test".to_string(),
                un_check_text: "test".to_string(),
                min_size: Vector2D::default(),
                font_size: 12.0,
            },
        }
    }

    #[test]
    fn field_names_match_shape_properties() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["Switch"]["UnCheckImg"], "test");
        assert_eq!(value["Focus"]["Rotator"]["Pinch"], 0.0);
        assert_eq!(value["Focus"]["ArmLength"], 100.0);
        assert_eq!(value["Switch"]["MinSize"], json!({ "x": 0.0, "y": 0.0 }));
    }

    #[test]
    fn typed_payload_conforms_to_shape() {
        let registry = ShapeRegistry::builtin().unwrap();
        let endpoint = registry.lookup(&DispatchKey::new("POI.Add").unwrap()).unwrap();
        let value = serde_json::to_value(sample()).unwrap();
        endpoint.check(&value).unwrap();
    }
}
