// xrpbot Copyright (c) 2023 Evan Overman (https://an-prata.it).
// Licensed under the MIT License.
// See LICENSE file in repository root for complete license text.

use crate::wire::Entry;

/// State of the XRP's forward facing ultrasonic rangefinder, fed from bridge
/// analog entries. Reports distance in meters.
#[derive(Debug, Default)]
pub struct Rangefinder {
    meters: Option<f64>,
}

impl Rangefinder {
    /// Analog channel of the rangefinder on the bridge.
    pub const CHANNEL: u8 = 2;

    /// Readings at or beyond this distance are not very reliable and are
    /// replaced with `NaN` by `distance()`.
    pub const MAX_RELIABLE_METERS: f64 = 0.5f64;

    /// Creates a new rangefinder with no readings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the reading given entries received from the bridge.
    pub fn update(&mut self, entries: &[Entry]) -> &Self {
        for e in entries {
            if let Entry::Analog { channel, value } = e {
                if *channel == Self::CHANNEL {
                    self.meters = Some(*value as f64);
                }
            }
        }

        self
    }

    /// The raw reported distance in meters, unfiltered.
    #[must_use]
    pub fn raw(&self) -> Option<f64> {
        self.meters
    }

    /// Distance to the nearest obstacle in meters. Values at or beyond
    /// `MAX_RELIABLE_METERS` are replaced with `NaN`; values below pass
    /// through unchanged. Reads zero before the first report.
    #[must_use]
    pub fn distance(&self) -> f64 {
        let meters = self.meters.unwrap_or_default();

        if meters < Self::MAX_RELIABLE_METERS {
            meters
        } else {
            f64::NAN
        }
    }
}
