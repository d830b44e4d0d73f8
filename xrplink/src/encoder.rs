// xrpbot Copyright (c) 2023 Evan Overman (https://an-prata.it).
// Licensed under the MIT License.
// See LICENSE file in repository root for complete license text.

use crate::wire::Entry;

/// State of one of the XRP's onboard quadrature encoders, fed from bridge
/// report entries. Counts accumulate on the robot; resets are performed here
/// by remembering the count at reset time, so a reset never races a report.
#[derive(Debug)]
pub struct Encoder {
    /// Encoder channel on the bridge.
    channel: u8,

    /// Distance travelled per count, in whatever unit the caller works in.
    distance_per_pulse: f64,

    /// Most recent raw count from the robot.
    raw: i32,

    /// Raw count captured by the last `reset()`.
    zero: i32,
}

impl Encoder {
    /// Creates a new encoder on the given channel with a distance per pulse
    /// of one, so `distance()` equals the count until configured.
    #[must_use]
    pub fn new(channel: u8) -> Self {
        Self {
            channel,
            distance_per_pulse: 1f64,
            raw: 0,
            zero: 0,
        }
    }

    /// Sets the distance travelled per encoder count, derived from wheel
    /// geometry by the caller.
    pub fn set_distance_per_pulse(&mut self, distance: f64) {
        self.distance_per_pulse = distance;
    }

    /// Updates the count from bridge entries, taking the entry at the
    /// greatest index for this channel since reports are drained oldest
    /// first.
    pub fn update(&mut self, entries: &[Entry]) -> &Self {
        for e in entries {
            if let Entry::Encoder { channel, count } = e {
                if *channel == self.channel {
                    self.raw = *count;
                }
            }
        }

        self
    }

    /// The count since the last `reset()`.
    #[inline]
    #[must_use]
    pub fn count(&self) -> i32 {
        self.raw.wrapping_sub(self.zero)
    }

    /// The distance travelled since the last `reset()`.
    #[inline]
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.count() as f64 * self.distance_per_pulse
    }

    /// Makes the current position read as zero.
    pub fn reset(&mut self) {
        self.zero = self.raw;
    }
}

#[cfg(test)]
mod tests {
    use super::Encoder;
    use crate::wire::Entry;
    use aprox_eq::assert_aprox_eq;

    #[test]
    fn counts_scale_and_reset() {
        let mut encoder = Encoder::new(0);
        encoder.set_distance_per_pulse(0.5f64);

        encoder.update(&[
            Entry::Encoder {
                channel: 1,
                count: 9999,
            },
            Entry::Encoder {
                channel: 0,
                count: 10,
            },
            Entry::Encoder {
                channel: 0,
                count: 12,
            },
        ]);

        assert_eq!(encoder.count(), 12);
        assert_aprox_eq!(encoder.distance(), 6f64);

        encoder.reset();
        assert_eq!(encoder.count(), 0);

        encoder.update(&[Entry::Encoder {
            channel: 0,
            count: 20,
        }]);

        assert_eq!(encoder.count(), 8);
        assert_aprox_eq!(encoder.distance(), 4f64);
    }
}
