// xrpbot Copyright (c) 2023 Evan Overman (https://an-prata.it).
// Licensed under the MIT License.
// See LICENSE file in repository root for complete license text.

use crate::wire::Entry;
use core::fmt;
use std::error::Error;

/// A struct for interfacing with one of the XRP's servo channels. Commanded
/// in degrees over the servo's travel, sent on the wire as a [0, 1] value.
#[derive(Debug)]
pub struct Controller {
    /// Servo channel on the bridge.
    channel: u8,

    /// Set position of the servo in degrees.
    degrees: f32,
}

impl Controller {
    /// Full travel of the servo in degrees; angles outside [0, travel] are
    /// clamped within range.
    pub const TRAVEL_DEGREES: f32 = 180f32;

    /// Creates a new servo controller for the given channel.
    #[must_use]
    pub fn new(channel: u8) -> Self {
        Controller {
            channel,
            degrees: 0f32,
        }
    }

    /// Sets the desired servo angle in degrees. Returns an error if `degrees`
    /// is infinite or `NaN`, nothing goes on the wire in that case.
    pub fn set_angle(&mut self, degrees: f32) -> Result<Entry, InvalidAngleError> {
        if !degrees.is_finite() {
            return Err(InvalidAngleError);
        }

        self.degrees = degrees.clamp(0f32, Self::TRAVEL_DEGREES);
        Ok(self.entry())
    }

    /// Gets the servo's set angle in degrees.
    #[inline]
    #[must_use]
    pub fn degrees(&self) -> f32 {
        self.degrees
    }

    /// Generates a wire entry that commands the servo to its set angle.
    #[must_use]
    pub fn entry(&self) -> Entry {
        Entry::Servo {
            channel: self.channel,
            value: self.degrees / Self::TRAVEL_DEGREES,
        }
    }
}

/// An invalid angle was given to the servo.
#[derive(Debug, Clone)]
pub struct InvalidAngleError;

impl fmt::Display for InvalidAngleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid servo angle, must be a real decimal")
    }
}

impl Error for InvalidAngleError {}
