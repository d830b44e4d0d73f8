// xrpbot Copyright (c) 2023 Evan Overman (https://an-prata.it).
// Licensed under the MIT License.
// See LICENSE file in repository root for complete license text.

use crate::wire::Entry;

/// State of the XRP's onboard three-axis gyro, fed from bridge report
/// entries. Angles and rates are in degrees and degrees per second; every
/// value is `None` until the first report arrives. The robot should be
/// powered on while sitting on a flat surface for the angles to mean much.
#[derive(Debug, Default)]
pub struct Gyro {
    /// Angle about the x axis from the most recent update.
    angle_x: Option<f64>,

    /// Angle about the y axis from the most recent update.
    angle_y: Option<f64>,

    /// Angle about the z axis from the most recent update.
    angle_z: Option<f64>,

    /// Rate about the x axis from the most recent update.
    rate_x: Option<f64>,

    /// Rate about the y axis from the most recent update.
    rate_y: Option<f64>,

    /// Rate about the z axis from the most recent update.
    rate_z: Option<f64>,

    /// Angle considered zero about the x axis.
    zero_x: f64,

    /// Angle considered zero about the y axis.
    zero_y: f64,

    /// Angle considered zero about the z axis.
    zero_z: f64,
}

impl Gyro {
    /// Creates a new gyro with no readings and zero offsets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates this struct's values given entries received from the bridge,
    /// taking the entry at the greatest index since reports are drained
    /// oldest first.
    pub fn update(&mut self, entries: &[Entry]) -> &Self {
        for e in entries {
            if let Entry::Gyro { rates, angles } = e {
                self.rate_x = Some(rates[0] as f64);
                self.rate_y = Some(rates[1] as f64);
                self.rate_z = Some(rates[2] as f64);
                self.angle_x = Some(angles[0] as f64);
                self.angle_y = Some(angles[1] as f64);
                self.angle_z = Some(angles[2] as f64);
            }
        }

        self
    }

    /// Sets the "zero" orientation of the gyro, all angles gotten after this
    /// will be relative to it. Axes with no reading yet keep their offsets.
    pub fn zero(&mut self) {
        if let Some(a) = self.angle_x {
            self.zero_x = a;
        }

        if let Some(a) = self.angle_y {
            self.zero_y = a;
        }

        if let Some(a) = self.angle_z {
            self.zero_z = a;
        }
    }

    /// Gets the angle about the x axis in degrees, relative to set zero.
    #[must_use]
    pub fn angle_x(&self) -> Option<f64> {
        self.angle_x.map(|a| a - self.zero_x)
    }

    /// Gets the angle about the y axis in degrees, relative to set zero.
    #[must_use]
    pub fn angle_y(&self) -> Option<f64> {
        self.angle_y.map(|a| a - self.zero_y)
    }

    /// Gets the angle about the z axis in degrees, relative to set zero.
    /// This is the robot's heading when it sits flat.
    #[must_use]
    pub fn angle_z(&self) -> Option<f64> {
        self.angle_z.map(|a| a - self.zero_z)
    }

    /// Gets the rate about the x axis in degrees per second.
    #[must_use]
    pub fn rate_x(&self) -> Option<f64> {
        self.rate_x
    }

    /// Gets the rate about the y axis in degrees per second.
    #[must_use]
    pub fn rate_y(&self) -> Option<f64> {
        self.rate_y
    }

    /// Gets the rate about the z axis in degrees per second.
    #[must_use]
    pub fn rate_z(&self) -> Option<f64> {
        self.rate_z
    }
}

#[cfg(test)]
mod tests {
    use super::Gyro;
    use crate::wire::Entry;
    use aprox_eq::assert_aprox_eq;

    #[test]
    fn angles_are_relative_to_zero() {
        let mut gyro = Gyro::new();

        assert!(gyro.angle_z().is_none());

        gyro.update(&[Entry::Gyro {
            rates: [0f32, 0f32, 5f32],
            angles: [1f32, 2f32, 30f32],
        }]);

        assert_aprox_eq!(gyro.angle_z().unwrap(), 30f64);
        assert_aprox_eq!(gyro.rate_z().unwrap(), 5f64);

        gyro.zero();
        assert_aprox_eq!(gyro.angle_z().unwrap(), 0f64);

        gyro.update(&[Entry::Gyro {
            rates: [0f32; 3],
            angles: [1f32, 2f32, 45f32],
        }]);

        assert_aprox_eq!(gyro.angle_z().unwrap(), 15f64);
    }

    #[test]
    fn latest_report_wins() {
        let mut gyro = Gyro::new();

        gyro.update(&[
            Entry::Gyro {
                rates: [0f32; 3],
                angles: [0f32, 0f32, 10f32],
            },
            Entry::Gyro {
                rates: [0f32; 3],
                angles: [0f32, 0f32, 20f32],
            },
        ]);

        assert_aprox_eq!(gyro.angle_z().unwrap(), 20f64);
    }
}
