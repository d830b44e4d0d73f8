// xrpbot Copyright (c) 2023 Evan Overman (https://an-prata.it).
// Licensed under the MIT License.
// See LICENSE file in repository root for complete license text.

use crate::state::Telemetry;
use std::{error::Error, f64, fmt::Display};
use xrplink::{
    accel::Accelerometer,
    angle::Angle,
    drive,
    encoder::Encoder,
    gyro::Gyro,
    link, motor,
    odometry::{DiffDriveOdometry, Pose},
    rangefinder::Rangefinder,
    reflectance::Reflectance,
    wire::Entry,
};

/// The XRP's drivetrain and everything bolted to it: two motors, two
/// encoders, the gyro, accelerometer, reflectance sensors, and rangefinder,
/// with differential odometry integrated over the lot.
pub struct Drivetrain {
    left_motor: motor::Controller,
    right_motor: motor::Controller,
    left_encoder: Encoder,
    right_encoder: Encoder,
    gyro: Gyro,
    accelerometer: Accelerometer,
    reflectance: Reflectance,
    rangefinder: Rangefinder,
    odometry: DiffDriveOdometry,
}

impl Drivetrain {
    /// Encoder counts for one wheel revolution.
    const COUNTS_PER_REVOLUTION: f64 = 585f64;

    /// Wheel diameter; 60 mm expressed in inches, the unit all drivetrain
    /// distances are kept in.
    const WHEEL_DIAMETER_INCHES: f64 = 2.3622f64;

    /// The XRP has the left and right motors set to PWM channels 0 and 1
    /// respectively.
    const LEFT_MOTOR_CHANNEL: u8 = 0;
    const RIGHT_MOTOR_CHANNEL: u8 = 1;

    /// The onboard encoders are hardcoded to DIO pins 4/5 and 6/7, which the
    /// bridge reports as encoder channels 0 and 1.
    const LEFT_ENCODER_CHANNEL: u8 = 0;
    const RIGHT_ENCODER_CHANNEL: u8 = 1;

    #[must_use]
    pub fn new() -> Self {
        let left_motor = motor::Controller::new(Self::LEFT_MOTOR_CHANNEL);
        let mut right_motor = motor::Controller::new(Self::RIGHT_MOTOR_CHANNEL);

        // The right motor is mounted mirrored.
        right_motor.set_inverted(true);

        let distance_per_pulse =
            (f64::consts::PI * Self::WHEEL_DIAMETER_INCHES) / Self::COUNTS_PER_REVOLUTION;

        let mut left_encoder = Encoder::new(Self::LEFT_ENCODER_CHANNEL);
        let mut right_encoder = Encoder::new(Self::RIGHT_ENCODER_CHANNEL);
        left_encoder.set_distance_per_pulse(distance_per_pulse);
        right_encoder.set_distance_per_pulse(distance_per_pulse);

        Self {
            left_motor,
            right_motor,
            left_encoder,
            right_encoder,
            gyro: Gyro::new(),
            accelerometer: Accelerometer::new(),
            reflectance: Reflectance::new(),
            rangefinder: Rangefinder::new(),
            odometry: DiffDriveOdometry::new(Angle::default(), 0f64, 0f64),
        }
    }

    /// Drives the robot using arcade controls.
    ///
    /// # Arguments
    ///
    /// * `forward` - The commanded forward movement.
    /// * `rotation` - The commanded rotation, sign flipped to match the
    ///   gamepad's convention.
    pub fn arcade_drive(
        &mut self,
        forward: f64,
        rotation: f64,
        tx: &mut link::Client,
    ) -> DriveResult<()> {
        let speeds = drive::arcade(forward, -rotation);

        // A `NaN` input survives the mix's clamping, the motors reject it
        // here and nothing goes on the wire.
        let left = self
            .left_motor
            .set(speeds.left as f32)
            .map_err(|e| DriveError::new(e.to_string()))?;
        let right = self
            .right_motor
            .set(speeds.right as f32)
            .map_err(|e| DriveError::new(e.to_string()))?;

        tx.send(left)
            .and_then(|_| tx.send(right))
            .map_err(|_| DriveError::new(String::from("link: could not send motor speeds")))
    }

    /// Stops the drivetrain motors.
    pub fn stop(&mut self, tx: &mut link::Client) -> DriveResult<()> {
        self.arcade_drive(0f64, 0f64, tx)
    }

    /// One periodic tick: drains the link's sensor reports, updates
    /// odometry, and returns the tick's telemetry snapshot. Called once per
    /// tick, nominally 50 times per second.
    pub fn periodic(&mut self, rx: &mut link::Server) -> Telemetry {
        self.observe(&rx.drain())
    }

    /// The sensor half of `periodic()`, split out so it can be fed entries
    /// directly.
    pub fn observe(&mut self, entries: &[Entry]) -> Telemetry {
        self.left_encoder.update(entries);
        self.right_encoder.update(entries);
        self.gyro.update(entries);
        self.accelerometer.update(entries);
        self.reflectance.update(entries);
        self.rangefinder.update(entries);

        let pose = self.odometry.update(
            Angle::from_degrees(self.gyro_angle_z()),
            self.left_distance_inches(),
            self.right_distance_inches(),
        );

        Telemetry {
            x: pose.x,
            y: pose.y,
            z_heading: pose.heading.degrees(),
            distance: self.distance_to_obstacle(),
            left_reflect: self.reflectance.left().unwrap_or_default(),
            right_reflect: self.reflectance.right().unwrap_or_default(),
        }
    }

    /// Resets the drive encoders to currently read a position of 0.
    pub fn reset_encoders(&mut self) {
        self.left_encoder.reset();
        self.right_encoder.reset();
    }

    /// Makes the current orientation the gyro's zero.
    pub fn reset_gyro(&mut self) {
        self.gyro.zero();
    }

    /// Re-seeds odometry at the given pose, zeroing the gyro and encoders so
    /// the pose is exact.
    pub fn reset_odometry(&mut self, pose: Pose) {
        self.reset_gyro();
        self.reset_encoders();
        self.odometry.reset_position(
            pose,
            Angle::from_degrees(self.gyro_angle_z()),
            self.left_distance_inches(),
            self.right_distance_inches(),
        );
    }

    /// The left encoder's count since reset.
    #[must_use]
    pub fn left_encoder_count(&self) -> i32 {
        self.left_encoder.count()
    }

    /// The right encoder's count since reset.
    #[must_use]
    pub fn right_encoder_count(&self) -> i32 {
        self.right_encoder.count()
    }

    /// Distance travelled by the left wheel in inches. Encoder polarity is
    /// negated so forward motion reads positive.
    #[must_use]
    pub fn left_distance_inches(&self) -> f64 {
        -self.left_encoder.distance()
    }

    /// Distance travelled by the right wheel in inches. Encoder polarity is
    /// negated so forward motion reads positive.
    #[must_use]
    pub fn right_distance_inches(&self) -> f64 {
        -self.right_encoder.distance()
    }

    /// Gets the average distance of the TWO encoders in inches.
    #[must_use]
    pub fn average_distance_inches(&self) -> f64 {
        (self.left_distance_inches() + self.right_distance_inches()) / 2f64
    }

    /// The acceleration along the x axis in g, zero before the first report.
    #[must_use]
    pub fn accel_x(&self) -> f64 {
        self.accelerometer.x().unwrap_or_default()
    }

    /// The acceleration along the y axis in g, zero before the first report.
    #[must_use]
    pub fn accel_y(&self) -> f64 {
        self.accelerometer.y().unwrap_or_default()
    }

    /// The acceleration along the z axis in g, zero before the first report.
    #[must_use]
    pub fn accel_z(&self) -> f64 {
        self.accelerometer.z().unwrap_or_default()
    }

    /// Current angle around the x axis in degrees, zero before the first
    /// report.
    #[must_use]
    pub fn gyro_angle_x(&self) -> f64 {
        self.gyro.angle_x().unwrap_or_default()
    }

    /// Current angle around the y axis in degrees, zero before the first
    /// report.
    #[must_use]
    pub fn gyro_angle_y(&self) -> f64 {
        self.gyro.angle_y().unwrap_or_default()
    }

    /// Current angle around the z axis in degrees, zero before the first
    /// report. This is the heading odometry integrates against.
    #[must_use]
    pub fn gyro_angle_z(&self) -> f64 {
        self.gyro.angle_z().unwrap_or_default()
    }

    /// Distance to the obstacle in front in meters; readings of 0.5 m and
    /// beyond are not very reliable and are replaced with `NaN`.
    #[must_use]
    pub fn distance_to_obstacle(&self) -> f64 {
        self.rangefinder.distance()
    }

    /// The most recently integrated pose.
    #[must_use]
    pub fn pose(&self) -> Pose {
        self.odometry.pose()
    }
}

impl Default for Drivetrain {
    fn default() -> Self {
        Self::new()
    }
}

pub type DriveResult<T> = Result<T, DriveError>;

#[derive(Clone, Debug)]
pub struct DriveError {
    msg: String,
}

impl DriveError {
    #[must_use]
    pub fn new(msg: String) -> Self {
        Self { msg }
    }
}

impl Error for DriveError {}

impl Display for DriveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error driving: {}", self.msg)
    }
}
