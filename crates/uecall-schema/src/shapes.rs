//! # Built-in Shapes
//!
//! The shape documents compiled into the binary and the endpoint table
//! mapping dispatch keys to their top-level shape. Sources live in the
//! repository's `schemas/` directory.

/// A shape document held in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeSource {
    /// Shape filename, also the target of relative `$ref`s.
    pub name: &'static str,
    /// Raw JSON Schema document.
    pub document: &'static str,
}

/// One row of the endpoint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointSpec {
    /// Dotted dispatch key.
    pub key: &'static str,
    /// Filename of the shape the payload must conform to.
    pub shape: &'static str,
}

/// Every shape document shipped with the crate.
pub const BUILTIN_SHAPES: &[ShapeSource] = &[
    ShapeSource {
        name: "vector.schema.json",
        document: include_str!("../../../schemas/vector.schema.json"),
    },
    ShapeSource {
        name: "vector2d.schema.json",
        document: include_str!("../../../schemas/vector2d.schema.json"),
    },
    ShapeSource {
        name: "focus.schema.json",
        document: include_str!("../../../schemas/focus.schema.json"),
    },
    ShapeSource {
        name: "switch.schema.json",
        document: include_str!("../../../schemas/switch.schema.json"),
    },
    ShapeSource {
        name: "poi.add.schema.json",
        document: include_str!("../../../schemas/poi.add.schema.json"),
    },
];

/// Dispatch key of the POI creation endpoint.
pub const POI_ADD: &str = "POI.Add";

/// Dispatch keys in declaration order.
pub const BUILTIN_ENDPOINTS: &[EndpointSpec] = &[EndpointSpec {
    key: POI_ADD,
    shape: "poi.add.schema.json",
}];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn shape_names_are_unique() {
        let names: HashSet<_> = BUILTIN_SHAPES.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), BUILTIN_SHAPES.len());
    }

    #[test]
    fn every_endpoint_names_a_builtin_shape() {
        for endpoint in BUILTIN_ENDPOINTS {
            assert!(
                BUILTIN_SHAPES.iter().any(|s| s.name == endpoint.shape),
                "endpoint {} references unknown shape {}",
                endpoint.key,
                endpoint.shape
            );
        }
    }

    #[test]
    fn shape_ids_match_filenames() {
        for shape in BUILTIN_SHAPES {
            let value: serde_json::Value = serde_json::from_str(shape.document).unwrap();
            let id = value["$id"].as_str().unwrap();
            assert!(
                id.ends_with(shape.name),
                "$id {id} does not end with {}",
                shape.name
            );
        }
    }
}
