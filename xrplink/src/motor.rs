// xrpbot Copyright (c) 2023 Evan Overman (https://an-prata.it).
// Licensed under the MIT License.
// See LICENSE file in repository root for complete license text.

use crate::wire::Entry;
use core::fmt;
use std::error::Error;

/// A struct for interfacing with one of the XRP's PWM motor channels.
#[derive(Debug)]
pub struct Controller {
    /// PWM channel of the motor on the bridge.
    channel: u8,

    /// Set speed of the controller.
    speed: f32,

    /// Whether commands should be sign-flipped on the wire. The right-side
    /// motor is mounted mirrored, so it must be inverted for positive speeds
    /// to mean forward on both sides.
    inverted: bool,
}

impl Controller {
    /// Maximum speed the motor can be set to, finite numbers greator than this
    /// will be clamped within range.
    pub const MAX_SPEED: f32 = 1f32;

    /// Minimum speed the motor can be set to, finite numbers less than this
    /// will be clamped within range.
    pub const MIN_SPEED: f32 = -Self::MAX_SPEED;

    /// Creates a new motor controller for the given PWM channel.
    #[must_use]
    pub fn new(channel: u8) -> Self {
        Controller {
            channel,
            speed: 0f32,
            inverted: false,
        }
    }

    /// Inverts this motor's output on the wire without changing the sign
    /// convention of `set()` and `speed()`.
    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    /// Sets the desired motor speed. Returns an error if `speed` is infinite or
    /// `NaN` (as checked by `f32::is_finite()`), nothing goes on the wire in
    /// that case.
    pub fn set(&mut self, speed: f32) -> Result<Entry, InvalidSpeedError> {
        if !speed.is_finite() {
            return Err(InvalidSpeedError);
        }

        self.speed = speed.clamp(Self::MIN_SPEED, Self::MAX_SPEED);
        Ok(self.entry())
    }

    /// Gets the motor controller's set speed.
    #[inline]
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Whether this motor's output is inverted.
    #[inline]
    #[must_use]
    pub fn inverted(&self) -> bool {
        self.inverted
    }

    /// Generates a wire entry that commands the motor to its set speed,
    /// inversion applied.
    #[must_use]
    pub fn entry(&self) -> Entry {
        Entry::Motor {
            channel: self.channel,
            value: if self.inverted {
                -self.speed
            } else {
                self.speed
            },
        }
    }
}

/// An invalid speed was given to the motor.
#[derive(Debug, Clone)]
pub struct InvalidSpeedError;

impl fmt::Display for InvalidSpeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid speed, must be a real decimal")
    }
}

impl Error for InvalidSpeedError {}

#[cfg(test)]
mod tests {
    use super::Controller;
    use crate::wire::Entry;

    #[test]
    fn clamps_and_rejects() {
        let mut motor = Controller::new(0);

        assert!(motor.set(f32::NAN).is_err());
        assert!(motor.set(f32::INFINITY).is_err());
        assert_eq!(motor.speed(), 0f32);

        motor.set(2f32).unwrap();
        assert_eq!(motor.speed(), Controller::MAX_SPEED);

        motor.set(-2f32).unwrap();
        assert_eq!(motor.speed(), Controller::MIN_SPEED);
    }

    #[test]
    fn inversion_only_touches_the_wire() {
        let mut motor = Controller::new(1);
        motor.set_inverted(true);

        let entry = motor.set(0.5f32).unwrap();

        assert_eq!(motor.speed(), 0.5f32);
        assert_eq!(
            entry,
            Entry::Motor {
                channel: 1,
                value: -0.5f32,
            }
        );
    }
}
