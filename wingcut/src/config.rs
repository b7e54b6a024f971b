use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::store::Threshold;

/// Tunables of one editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub threshold: Threshold,
    /// Half width of the window scanned per symmetry search round.
    pub symmetry_radius: i32,
    #[serde(with = "millis")]
    pub debounce: Duration,
    /// Stroke width used when erase strokes are burned into the canvas.
    pub eliminate_thickness: f32,
    /// Stroke width of tracks on the annotated panel.
    pub track_thickness: f32,
    pub preview_max_height: usize,
    pub gutter_width: usize,
    pub checker_block: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            threshold: Threshold::default(),
            symmetry_radius: 10,
            debounce: Duration::from_millis(500),
            eliminate_thickness: 8.0,
            track_thickness: 2.0,
            preview_max_height: 800,
            gutter_width: 10,
            checker_block: 10,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
