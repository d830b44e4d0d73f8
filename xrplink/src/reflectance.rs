// xrpbot Copyright (c) 2023 Evan Overman (https://an-prata.it).
// Licensed under the MIT License.
// See LICENSE file in repository root for complete license text.

use crate::wire::Entry;

/// State of the XRP's two downward facing reflectance sensors, fed from
/// bridge analog entries. Values range from 0 (white) to 1 (black); `None`
/// until the first report arrives.
#[derive(Debug, Default)]
pub struct Reflectance {
    left: Option<f64>,
    right: Option<f64>,
}

impl Reflectance {
    /// Analog channel of the left sensor on the bridge.
    pub const LEFT_CHANNEL: u8 = 0;

    /// Analog channel of the right sensor on the bridge.
    pub const RIGHT_CHANNEL: u8 = 1;

    /// Creates a new reflectance sensor pair with no readings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates both readings given entries received from the bridge.
    pub fn update(&mut self, entries: &[Entry]) -> &Self {
        for e in entries {
            if let Entry::Analog { channel, value } = e {
                match *channel {
                    Self::LEFT_CHANNEL => self.left = Some(*value as f64),
                    Self::RIGHT_CHANNEL => self.right = Some(*value as f64),
                    _ => (),
                }
            }
        }

        self
    }

    /// The left sensor's reflectance in [0, 1].
    #[must_use]
    pub fn left(&self) -> Option<f64> {
        self.left
    }

    /// The right sensor's reflectance in [0, 1].
    #[must_use]
    pub fn right(&self) -> Option<f64> {
        self.right
    }
}

#[cfg(test)]
mod tests {
    use super::Reflectance;
    use crate::wire::Entry;
    use aprox_eq::assert_aprox_eq;

    #[test]
    fn channels_route_to_sides() {
        let mut reflectance = Reflectance::new();

        reflectance.update(&[
            Entry::Analog {
                channel: Reflectance::LEFT_CHANNEL,
                value: 0.25f32,
            },
            Entry::Analog {
                channel: Reflectance::RIGHT_CHANNEL,
                value: 0.75f32,
            },
            // The rangefinder's channel, not ours.
            Entry::Analog {
                channel: 2,
                value: 0.4f32,
            },
        ]);

        assert_aprox_eq!(reflectance.left().unwrap(), 0.25f64);
        assert_aprox_eq!(reflectance.right().unwrap(), 0.75f64);
    }
}
