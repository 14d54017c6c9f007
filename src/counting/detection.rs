//! Detection input produced by an external object-detection model.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

use crate::counting::rect::Rect;

/// Object class assigned by the upstream detector.
///
/// The counting core only acts on `Pile`, `Box` and `Barcode`; any other
/// class deserializes to `Other` and is ignored during scene preparation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionClass {
    Pile,
    Box,
    Barcode,
    Other,
}

impl<'de> Deserialize<'de> for DetectionClass {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(match name.as_str() {
            "pile" => Self::Pile,
            "box" => Self::Box,
            "barcode" => Self::Barcode,
            _ => Self::Other,
        })
    }
}

/// One detection from the upstream model.
///
/// Deserializes from the detector's wire format, e.g.
/// `{"cls": "box", "conf": 0.87, "x1": 10.0, "y1": 20.0, "x2": 60.0, "y2": 70.0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Object class
    #[serde(rename = "cls")]
    pub class: DetectionClass,
    /// Bounding box in corner (TLBR) format
    #[serde(flatten)]
    pub bbox: Rect,
    /// Detection confidence score in [0, 1]
    #[serde(rename = "conf")]
    pub score: f32,
}

impl Detection {
    pub fn new(class: DetectionClass, bbox: Rect, score: f32) -> Self {
        Self { class, bbox, score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_format() {
        let json = r#"{"cls": "pile", "conf": 0.92, "x1": 0.0, "y1": 0.0, "x2": 100.0, "y2": 200.0}"#;
        let det: Detection = serde_json::from_str(json).unwrap();
        assert_eq!(det.class, DetectionClass::Pile);
        assert_eq!(det.score, 0.92);
        assert_eq!(det.bbox, Rect::new(0.0, 0.0, 100.0, 200.0));
    }

    #[test]
    fn test_unknown_class_maps_to_other() {
        let json = r#"{"cls": "pallet_jack", "conf": 0.5, "x1": 0.0, "y1": 0.0, "x2": 1.0, "y2": 1.0}"#;
        let det: Detection = serde_json::from_str(json).unwrap();
        assert_eq!(det.class, DetectionClass::Other);
    }

    #[test]
    fn test_serialize_round_trip() {
        let det = Detection::new(
            DetectionClass::Barcode,
            Rect::new(1.0, 2.0, 3.0, 4.0),
            0.75,
        );
        let json = serde_json::to_string(&det).unwrap();
        let back: Detection = serde_json::from_str(&json).unwrap();
        assert_eq!(det, back);
    }
}
