// xrpbot Copyright (c) 2023 Evan Overman (https://an-prata.it).
// Licensed under the MIT License.
// See LICENSE file in repository root for complete license text.

use std::{error::Error, fmt::Display};
use xrplink::{link, servo};

/// The XRP's servo arm.
pub struct Arm {
    servo: servo::Controller,
}

impl Arm {
    /// The arm servo is wired to servo channel 4 on the bridge.
    const SERVO_CHANNEL: u8 = 4;

    /// Angle the arm rests at when stowed.
    const STOW_DEGREES: f32 = 0f32;

    #[must_use]
    pub fn new() -> Self {
        Self {
            servo: servo::Controller::new(Self::SERVO_CHANNEL),
        }
    }

    /// Commands the arm to the given angle in degrees over the servo's
    /// travel.
    pub fn set_angle(&mut self, degrees: f32, tx: &mut link::Client) -> ArmResult<()> {
        let entry = self
            .servo
            .set_angle(degrees)
            .map_err(|e| ArmError::new(e.to_string()))?;

        tx.send(entry)
            .map_err(|_| ArmError::new(String::from("link: could not send arm angle")))
    }

    /// Returns the arm to its stowed position.
    pub fn stow(&mut self, tx: &mut link::Client) -> ArmResult<()> {
        self.set_angle(Self::STOW_DEGREES, tx)
    }

    /// The arm's set angle in degrees.
    #[must_use]
    pub fn degrees(&self) -> f32 {
        self.servo.degrees()
    }
}

impl Default for Arm {
    fn default() -> Self {
        Self::new()
    }
}

pub type ArmResult<T> = Result<T, ArmError>;

#[derive(Clone, Debug)]
pub struct ArmError {
    msg: String,
}

impl ArmError {
    #[must_use]
    pub fn new(msg: String) -> Self {
        Self { msg }
    }
}

impl Error for ArmError {}

impl Display for ArmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error moving arm: {}", self.msg)
    }
}
