// xrpbot Copyright (c) 2023 Evan Overman (https://an-prata.it).
// Licensed under the MIT License.
// See LICENSE file in repository root for complete license text.

use std::{
    error, fs,
    io::{self, Write},
    sync::mpsc::{self, Receiver, Sender},
};

/// For logging messages of varying severity. Service threads log through
/// `branch()` senders; their lines are folded in whenever the owner logs.
pub struct Logger {
    displaying: Line,
    file: fs::File,
    tx: Sender<Line>,
    rx: Receiver<Line>,
}

impl Logger {
    /// Creates a new logger, returns an error on I/O errors in creating/opening
    /// the given file path for writing.
    pub fn new(file_path: &str) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();

        Ok(Self {
            displaying: Line::Info(String::new()),
            file: fs::File::create(file_path)?,
            tx,
            rx,
        })
    }

    /// Gets a sender that other threads can log lines through. Branched
    /// lines are written out on the owner's next `log()` call.
    #[must_use]
    pub fn branch(&self) -> Sender<Line> {
        self.tx.clone()
    }

    /// Outputs the given line to standard out or standard error as is
    /// appropriate and records the line in the log file assuming that the given
    /// line variant meets or exceeds the displaying severity. This file is
    /// written to directly so that in the case of a panic the log file need
    /// not be flushed in order to have relevant contents.
    pub fn log(&mut self, line: Line) -> io::Result<()> {
        while let Ok(branched) = self.rx.try_recv() {
            self.write(branched)?;
        }

        self.write(line)
    }

    /// Does nothing if the given result is `Ok`, if the result is an `Err` then
    /// it is converted to a string and logged as a `Line::Err`. Returns the `Ok`
    /// value of the result if the result was `Ok`, otherwise `None` is returned.
    #[inline]
    pub fn log_if_err<T, E>(&mut self, result: Result<T, E>) -> Option<T>
    where
        E: error::Error,
    {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                let _ = self.log(Line::from_err(&e));
                None
            }
        }
    }

    /// Set the type of log messages to display to the console through either
    /// standard error or standard out. All messages in lesser severity to the
    /// one given will also be displayed, meaning that given `Line::Warn` all
    /// `Line::Warn` and all `Line::Err` messages will be printed. This function
    /// has no effect on what is recorded to file.
    #[inline]
    pub fn display(&mut self, line_type: Line) {
        self.displaying = line_type;
    }

    fn write(&mut self, line: Line) -> io::Result<()> {
        self.file.write_all(line.to_string().as_bytes())?;
        self.file.write_all(b"\n")?;

        if self.displaying.severity() > line.severity() {
            return Ok(());
        }

        match line {
            Line::Err(_) => eprintln!("{}", line.to_string()),
            _ => println!("{}", line.to_string()),
        }

        Ok(())
    }
}

/// Represents a single line in the log, different types are displayed slightly
/// different.
#[repr(u8)]
pub enum Line {
    /// A recoverable error.
    Err(String) = 2,

    /// A warning, probably not a returned error in code.
    Warn(String) = 1,

    /// General information, should not be used repeatedly.
    Info(String) = 0,
}

impl Line {
    /// Gets the severity of the `Line` variant.
    #[inline]
    #[must_use]
    pub fn severity(&self) -> u8 {
        unsafe { *(self as *const Self as *const u8) }
    }

    /// Creates a new `Line` of variant `Err` given an `Error`.
    #[inline]
    #[must_use]
    pub fn from_err<T: error::Error>(err: &T) -> Self {
        Self::Err(err.to_string())
    }
}

impl ToString for Line {
    #[inline]
    fn to_string(&self) -> String {
        match self {
            Self::Err(s) => format!("   [Err]: {}", s),
            Self::Warn(s) => format!("  [Warn]: {}", s),
            Self::Info(s) => format!("  [Info]: {}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Line;

    #[test]
    fn severity_ordering() {
        assert!(Line::Err(String::new()).severity() > Line::Warn(String::new()).severity());
        assert!(Line::Warn(String::new()).severity() > Line::Info(String::new()).severity());
    }

    #[test]
    fn line_formatting() {
        assert!(Line::Warn(String::from("low battery"))
            .to_string()
            .contains("[Warn]: low battery"));
    }
}
