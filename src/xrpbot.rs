// xrpbot Copyright (c) 2023 Evan Overman (https://an-prata.it).
// Licensed under the MIT License.
// See LICENSE file in repository root for complete license text.

use crate::{arm::Arm, dashboard::Dashboard, drivetrain::Drivetrain, log};
use std::{
    io,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    time::Duration,
};
use xrplink::{
    bot::{Bot, BotError, BotResult, Joystick, State},
    link, servo,
};

/// The XRP robot program: a gamepad-driven drivetrain with odometry
/// telemetry, and a servo arm.
pub struct XrpBot {
    drivetrain: Drivetrain,
    arm: Arm,
    link_tx: link::Client,
    link_rx: link::Server,
    dashboard: Dashboard,
    log: log::Logger,
}

impl XrpBot {
    /// The XRP's address on its own access point; override with `XRP_HOST` /
    /// `XRP_PORT` when the robot (or a simulator) is somewhere else.
    pub const DEFAULT_HOST: &'static str = "192.168.42.1";
    pub const DEFAULT_PORT: u16 = 3540;

    /// How often queued commands are flushed to the bridge.
    pub const LINK_CYCLE: Duration = Duration::from_millis(20);

    const DASHBOARD_PORT: u16 = 7000;

    const LOG_PATH: &'static str = "xrpbot.log";

    /// Raw joystick axes: 0 is rotation, 1 is forward, 3 runs the arm.
    const AXIS_ROTATION: usize = 0;
    const AXIS_FORWARD: usize = 1;
    const AXIS_ARM: usize = 3;

    /// Creates the robot program over an established bridge link.
    pub fn new(link_tx: link::Client, link_rx: link::Server) -> io::Result<Self> {
        let mut log = log::Logger::new(Self::LOG_PATH)?;

        let dashboard = Dashboard::new(
            SocketAddr::V4(SocketAddrV4::new(
                Ipv4Addr::new(0, 0, 0, 0),
                Self::DASHBOARD_PORT,
            )),
            log.branch(),
        )?;

        log.log(log::Line::Info(format!(
            "dashboard serving on {}",
            dashboard.addr()
        )))?;

        Ok(Self {
            drivetrain: Drivetrain::new(),
            arm: Arm::new(),
            link_tx,
            link_rx,
            dashboard,
            log,
        })
    }

    fn stop_all(&mut self) -> BotResult<()> {
        self.drivetrain
            .stop(&mut self.link_tx)
            .map_err(|e| BotError::new(e.to_string()))
    }
}

impl Bot for XrpBot {
    /// Driving and odometry run every tick no matter the mode; disabled
    /// mode overrides the drive command with zeroes afterwards, and the
    /// bridge applies the last command in a cycle.
    fn run_base(&mut self, _state: State, joystick: &Joystick) -> BotResult<()> {
        let forward = joystick.raw_axis(Self::AXIS_FORWARD);
        let rotation = joystick.raw_axis(Self::AXIS_ROTATION);

        self.drivetrain
            .arcade_drive(forward, rotation, &mut self.link_tx)
            .map_err(|e| BotError::new(e.to_string()))?;

        let telemetry = self.drivetrain.periodic(&mut self.link_rx);
        self.log.log_if_err(self.dashboard.set(telemetry));

        Ok(())
    }

    fn run_teleop(&mut self, joystick: &Joystick) -> BotResult<()> {
        // Right stick y runs the arm over its whole travel.
        let travel = servo::Controller::TRAVEL_DEGREES;
        let degrees = (joystick.raw_axis(Self::AXIS_ARM) as f32 + 1f32) / 2f32 * travel;

        self.arm
            .set_angle(degrees, &mut self.link_tx)
            .map_err(|e| BotError::new(e.to_string()))
    }

    fn run_disabled(&mut self) -> BotResult<()> {
        self.stop_all()
    }

    fn init_teleop(&mut self) -> BotResult<()> {
        self.log
            .log(log::Line::Info(String::from("mode: teleop")))
            .map_err(|e| BotError::new(e.to_string()))?;
        self.stop_all()
    }

    fn init_autonomous(&mut self) -> BotResult<()> {
        self.log
            .log(log::Line::Info(String::from("mode: autonomous")))
            .map_err(|e| BotError::new(e.to_string()))?;
        self.stop_all()
    }

    fn init_disabled(&mut self) -> BotResult<()> {
        self.log
            .log(log::Line::Info(String::from("mode: disabled")))
            .map_err(|e| BotError::new(e.to_string()))?;
        self.stop_all()
    }

    fn init_test(&mut self) -> BotResult<()> {
        self.log
            .log(log::Line::Info(String::from("mode: test")))
            .map_err(|e| BotError::new(e.to_string()))?;
        self.stop_all()?;
        self.arm
            .stow(&mut self.link_tx)
            .map_err(|e| BotError::new(e.to_string()))
    }
}
