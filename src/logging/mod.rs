//! Logging statistics from simulation runs
mod cli;

pub use cli::CLILogger;

use enum_map::Enum;
use std::error::Error;
use std::fmt;

/// Simulation run events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum Event {
    /// A single agent-environment interaction.
    Step,
    /// A complete run of one agent on one environment.
    Trial,
}

/// A value that can be logged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Loggable {
    /// Nothing. No data to log.
    /// Logging Nothing data may still produce a placeholder entry for the name.
    Nothing,
    /// A scalar value. Aggregate by taking means.
    Scalar(f64),
    /// A sample from a distrbution over 0 .. (size-1)
    IndexSample { value: usize, size: usize },
}

impl From<f64> for Loggable {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

/// Log statistics from a simulation run.
pub trait Logger: Send {
    /// Log a value.
    ///
    /// # Args
    /// * `event` - The event associated with this value.
    /// * `name` - The name that identifies this value.
    /// * `value` - The value to log.
    ///
    /// # Returns
    /// May return an error if the logged value is structurally incompatible
    /// with previous values logged under the same name.
    fn log<'a>(&mut self, event: Event, name: &'a str, value: Loggable)
        -> Result<(), LogError<'a>>;

    /// Mark the end of an event.
    fn done(&mut self, event: Event);
}

/// Logger that does nothing
impl Logger for () {
    fn log<'a>(&mut self, _: Event, _: &'a str, _: Loggable) -> Result<(), LogError<'a>> {
        Ok(())
    }

    fn done(&mut self, _: Event) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogError<'a> {
    name: &'a str,
    value: Loggable,
    expected: String,
}

impl<'a> LogError<'a> {
    pub fn new(name: &'a str, value: Loggable, expected: String) -> Self {
        Self {
            name,
            value,
            expected,
        }
    }
}

impl<'a> fmt::Display for LogError<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "\"{}\": incompatible value {:?}, expected {}",
            self.name, self.value, self.expected
        )
    }
}

impl<'a> Error for LogError<'a> {}
