// xrpbot Copyright (c) 2023 Evan Overman (https://an-prata.it).
// Licensed under the MIT License.
// See LICENSE file in repository root for complete license text.

use serde::{Deserialize, Serialize};

/// The numeric values published to the dashboard each tick. Serialized key
/// names are the dashboard's, not Rust's.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default)]
pub struct Telemetry {
    /// Odometry x position in inches.
    pub x: f64,

    /// Odometry y position in inches.
    pub y: f64,

    /// Odometry heading in degrees.
    #[serde(rename = "z-heading")]
    pub z_heading: f64,

    /// Rangefinder distance in meters, `NaN` (serialized as null) when the
    /// reading is unreliable.
    pub distance: f64,

    /// Left reflectance sensor in [0, 1].
    #[serde(rename = "left-reflect")]
    pub left_reflect: f64,

    /// Right reflectance sensor in [0, 1].
    #[serde(rename = "right-reflect")]
    pub right_reflect: f64,
}

#[cfg(test)]
mod tests {
    use super::Telemetry;

    #[test]
    fn dashboard_keys() {
        let json = serde_json::to_string(&Telemetry {
            x: 1f64,
            y: 2f64,
            z_heading: 90f64,
            distance: 0.25f64,
            left_reflect: 0.5f64,
            right_reflect: 0.5f64,
        })
        .unwrap();

        let keys = [
            "\"x\"",
            "\"y\"",
            "\"z-heading\"",
            "\"distance\"",
            "\"left-reflect\"",
            "\"right-reflect\"",
        ];

        for key in keys {
            assert!(json.contains(key), "missing {} in {}", key, json);
        }
    }

    #[test]
    fn nan_distance_serializes_as_null() {
        let json = serde_json::to_string(&Telemetry {
            distance: f64::NAN,
            ..Default::default()
        })
        .unwrap();

        assert!(json.contains("\"distance\":null"));
    }
}
