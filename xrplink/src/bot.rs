// xrpbot Copyright (c) 2023 Evan Overman (https://an-prata.it).
// Licensed under the MIT License.
// See LICENSE file in repository root for complete license text.

use gilrs::{Axis, GamepadId, Gilrs};
use std::{
    error::Error,
    fmt::Display,
    mem,
    sync::mpsc::Receiver,
    thread,
    time::{Duration, Instant},
};

/// Manages the running of a `Bot` implementation: keeps track of the robot's
/// mode, pumps gamepad input, and paces the periodic tick.
pub struct BotRunner<T>
where
    T: Bot,
{
    state: State,
    gilrs: Gilrs,
    pad: Option<GamepadId>,
    bot: T,
}

impl<T> BotRunner<T>
where
    T: Bot,
{
    /// Creates a new `BotRunner` for running the given `Bot` implementation.
    /// The returned instance will have the state `State::Disabled` with a
    /// value of the time it was created.
    pub fn new(bot: T) -> Result<Self, gilrs::Error> {
        Ok(Self {
            state: State::Disabled(Some(Instant::now())),
            gilrs: Gilrs::new()?,
            pad: None,
            bot,
        })
    }

    /// Runs one tick of the `Bot`: pumps gamepad events, snapshots the
    /// joystick, runs `run_base`, then the current mode's method. Should be
    /// called in a loop; see `start()`.
    pub fn run(&mut self) -> BotResult<()> {
        while let Some(event) = self.gilrs.next_event() {
            self.pad = Some(event.id);
        }

        let joystick = match self.pad {
            Some(id) => Joystick::read(&self.gilrs.gamepad(id)),
            None => Joystick::default(),
        };

        self.bot.run_base(self.state, &joystick)?;

        match self.state {
            State::Teleop(_) => self.bot.run_teleop(&joystick),
            State::Autonomous(_) => self.bot.run_autonomous(&joystick),
            State::Disabled(_) => self.bot.run_disabled(),
            State::Test(_) => self.bot.run_test(&joystick),
        }
    }

    /// Sets the `Bot`'s state to the given, and if the given `State` has a
    /// parameter of `None` populates it with the current time. Entering a
    /// different mode than the current one fires that mode's `init_*` hook
    /// exactly once, before the first tick in the new mode.
    pub fn set_state(&mut self, state: State) -> BotResult<()> {
        transition(&mut self.bot, &mut self.state, state)
    }

    /// The `Bot`'s current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> State {
        self.state
    }

    /// Runs the `Bot` forever at its period, applying any mode commands
    /// queued on the given receiver before each tick. Ticks that run long
    /// simply start the next one immediately.
    pub fn start(mut self, commands: Receiver<State>) -> BotResult<()> {
        loop {
            let begin = Instant::now();

            while let Ok(state) = commands.try_recv() {
                self.set_state(state)?;
            }

            self.run()?;

            if let Some(rest) = T::PERIOD.checked_sub(begin.elapsed()) {
                thread::sleep(rest);
            }
        }
    }
}

/// Moves a `Bot` to the given state: entering a different mode than the
/// current one fires that mode's `init_*` hook, re-setting the current mode
/// does not, and a `None` entry time is stamped with the current time.
fn transition<T>(bot: &mut T, current: &mut State, state: State) -> BotResult<()>
where
    T: Bot,
{
    if mem::discriminant(&state) != mem::discriminant(current) {
        match state {
            State::Teleop(_) => bot.init_teleop()?,
            State::Autonomous(_) => bot.init_autonomous()?,
            State::Disabled(_) => bot.init_disabled()?,
            State::Test(_) => bot.init_test()?,
        }
    }

    let now_if_none = |t: Option<Instant>| t.or_else(|| Some(Instant::now()));

    *current = match state {
        State::Teleop(t) => State::Teleop(now_if_none(t)),
        State::Autonomous(t) => State::Autonomous(now_if_none(t)),
        State::Disabled(t) => State::Disabled(now_if_none(t)),
        State::Test(t) => State::Test(now_if_none(t)),
    };

    Ok(())
}

/// Represents the custom struct that holds the custom code for running a bot.
/// All default implementations of functions simply do nothing.
pub trait Bot {
    /// Time between periodic ticks; 20 ms gives the conventional 50 Hz.
    const PERIOD: Duration = Duration::from_millis(20);

    /// Runs every tick regardless of mode, before the mode's own method.
    /// Sensor draining, odometry, and telemetry belong here.
    ///
    /// # Arguments
    ///
    /// * `state` - The `Bot`'s current state with a value of the time that
    ///   state was set.
    /// * `joystick` - Snapshot of the active gamepad's axes for this tick.
    fn run_base(&mut self, _state: State, _joystick: &Joystick) -> BotResult<()> {
        Ok(())
    }

    /// Fully operational state, the bot is under driver control.
    fn run_teleop(&mut self, _joystick: &Joystick) -> BotResult<()> {
        Ok(())
    }

    /// The bot is operating under self control only.
    fn run_autonomous(&mut self, _joystick: &Joystick) -> BotResult<()> {
        Ok(())
    }

    /// May not operate physically moving devices.
    fn run_disabled(&mut self) -> BotResult<()> {
        Ok(())
    }

    /// Hardware checkout mode, under driver control.
    fn run_test(&mut self, _joystick: &Joystick) -> BotResult<()> {
        Ok(())
    }

    /// Runs once when the bot enters teleop from another mode.
    fn init_teleop(&mut self) -> BotResult<()> {
        Ok(())
    }

    /// Runs once when the bot enters autonomous from another mode.
    fn init_autonomous(&mut self) -> BotResult<()> {
        Ok(())
    }

    /// Runs once when the bot enters disabled from another mode.
    fn init_disabled(&mut self) -> BotResult<()> {
        Ok(())
    }

    /// Runs once when the bot enters test from another mode.
    fn init_test(&mut self) -> BotResult<()> {
        Ok(())
    }
}

/// Represents a potential state of a `Bot` instance. All variants hold a
/// value of `Option<time::Instant>` which will be populated with
/// `Some(time::Instant::now())` once they are used to set the state of a
/// `Bot` instance.
#[derive(Clone, Copy, Debug)]
pub enum State {
    /// Under driver control.
    Teleop(Option<Instant>),

    /// Under self control, driver input ignored.
    Autonomous(Option<Instant>),

    /// Physically moving devices must be held stopped.
    Disabled(Option<Instant>),

    /// Hardware checkout under driver control.
    Test(Option<Instant>),
}

/// A per-tick snapshot of the active gamepad's stick axes, addressed by raw
/// axis index: 0 is left stick x (rotation), 1 is left stick y (forward),
/// 2 and 3 are the right stick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Joystick {
    axes: [f64; 4],
}

impl Joystick {
    /// Gilrs axes in raw index order.
    const AXES: [Axis; 4] = [
        Axis::LeftStickX,
        Axis::LeftStickY,
        Axis::RightStickX,
        Axis::RightStickY,
    ];

    /// Builds a snapshot directly from axis values, raw index order.
    #[must_use]
    pub fn from_axes(axes: [f64; 4]) -> Self {
        Self { axes }
    }

    /// Reads a snapshot from a gamepad, axes it does not report read zero.
    #[must_use]
    fn read(gamepad: &gilrs::Gamepad) -> Self {
        let mut axes = [0f64; 4];

        for (value, axis) in axes.iter_mut().zip(Self::AXES) {
            *value = gamepad
                .axis_data(axis)
                .map(|a| a.value() as f64)
                .unwrap_or_default();
        }

        Self { axes }
    }

    /// Gets an axis value in [-1, 1] by raw index; indices this snapshot
    /// does not carry read zero.
    #[must_use]
    pub fn raw_axis(&self, axis: usize) -> f64 {
        self.axes.get(axis).copied().unwrap_or_default()
    }
}

pub type BotResult<T> = Result<T, BotError>;

#[derive(Clone, Debug)]
pub struct BotError {
    msg: String,
}

impl BotError {
    #[must_use]
    pub fn new(msg: String) -> Self {
        Self { msg }
    }
}

impl Error for BotError {}

impl Display for BotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error occured running bot: {}", self.msg)
    }
}

#[cfg(test)]
mod tests {
    use super::{transition, Bot, BotResult, Joystick, State};
    use aprox_eq::assert_aprox_eq;
    use std::time::Instant;

    #[test]
    fn raw_axis_indexing() {
        let joystick = Joystick::from_axes([0.1f64, -0.5f64, 0f64, 1f64]);

        assert_aprox_eq!(joystick.raw_axis(0), 0.1f64);
        assert_aprox_eq!(joystick.raw_axis(1), -0.5f64);
        assert_aprox_eq!(joystick.raw_axis(3), 1f64);
        assert_aprox_eq!(joystick.raw_axis(9), 0f64);
    }

    /// Counts its `init_*` calls so transitions can be checked.
    #[derive(Default)]
    struct CountingBot {
        teleop_inits: u32,
        disabled_inits: u32,
    }

    impl Bot for CountingBot {
        fn init_teleop(&mut self) -> BotResult<()> {
            self.teleop_inits += 1;
            Ok(())
        }

        fn init_disabled(&mut self) -> BotResult<()> {
            self.disabled_inits += 1;
            Ok(())
        }
    }

    #[test]
    fn mode_change_fires_init_exactly_once() {
        let mut bot = CountingBot::default();
        let mut state = State::Disabled(Some(Instant::now()));

        transition(&mut bot, &mut state, State::Teleop(None)).unwrap();

        assert_eq!(bot.teleop_inits, 1);
        assert!(matches!(state, State::Teleop(Some(_))));

        // Re-setting the current mode must not fire its hook again.
        transition(&mut bot, &mut state, State::Teleop(None)).unwrap();

        assert_eq!(bot.teleop_inits, 1);

        transition(&mut bot, &mut state, State::Disabled(None)).unwrap();

        assert_eq!(bot.disabled_inits, 1);
        assert_eq!(bot.teleop_inits, 1);
    }
}
