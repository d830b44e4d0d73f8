// xrpbot Copyright (c) 2023 Evan Overman (https://an-prata.it).
// Licensed under the MIT License.
// See LICENSE file in repository root for complete license text.

use crate::wire::Entry;

/// State of the XRP's built-in accelerometer, in g per axis, fed from bridge
/// report entries. `None` until the first report arrives.
#[derive(Debug, Default)]
pub struct Accelerometer {
    axes: Option<[f64; 3]>,
}

impl Accelerometer {
    /// Creates a new accelerometer with no readings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the readings given entries received from the bridge, taking
    /// the entry at the greatest index since reports are drained oldest
    /// first.
    pub fn update(&mut self, entries: &[Entry]) -> &Self {
        for e in entries {
            if let Entry::Accel { axes } = e {
                self.axes = Some([axes[0] as f64, axes[1] as f64, axes[2] as f64]);
            }
        }

        self
    }

    /// The acceleration along the x axis in g.
    #[must_use]
    pub fn x(&self) -> Option<f64> {
        self.axes.map(|a| a[0])
    }

    /// The acceleration along the y axis in g.
    #[must_use]
    pub fn y(&self) -> Option<f64> {
        self.axes.map(|a| a[1])
    }

    /// The acceleration along the z axis in g.
    #[must_use]
    pub fn z(&self) -> Option<f64> {
        self.axes.map(|a| a[2])
    }
}

#[cfg(test)]
mod tests {
    use super::Accelerometer;
    use crate::wire::Entry;
    use aprox_eq::assert_aprox_eq;

    #[test]
    fn reads_latest_axes() {
        let mut accel = Accelerometer::new();

        assert!(accel.z().is_none());

        accel.update(&[Entry::Accel {
            axes: [0.1f32, -0.2f32, 1f32],
        }]);

        assert_aprox_eq!(accel.x().unwrap(), 0.1f32 as f64);
        assert_aprox_eq!(accel.y().unwrap(), -0.2f32 as f64);
        assert_aprox_eq!(accel.z().unwrap(), 1f64);
    }
}
