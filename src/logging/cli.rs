//! Command-line logger
use super::{Event, LogError, Loggable, Logger};
use crate::utils::stats::OnlineMeanVariance;
use enum_map::{enum_map, EnumMap};
use std::collections::BTreeMap;
use std::fmt::{self, Write};
use std::ops::Drop;
use std::time::{Duration, Instant};
use yansi::Paint;

/// Logger that periodically writes summaries to stdout.
#[derive(Debug)]
pub struct CLILogger {
    events: EnumMap<Event, EventLog>,

    display_period: Duration,
    last_display_time: Instant,
}

impl CLILogger {
    pub fn new(display_period: Duration) -> Self {
        Self {
            events: enum_map! { _ => EventLog::new() },
            display_period,
            last_display_time: Instant::now(),
        }
    }

    /// Display the summary and clear all stored data.
    pub fn display(&mut self) {
        print!("{}", self.take_summary());
        self.last_display_time = Instant::now();
    }

    /// Format a summary of the values aggregated since the last display then clear them.
    fn take_summary(&mut self) -> String {
        let mut out = String::new();
        for (event, event_log) in &mut self.events {
            let summary_size = event_log.index - event_log.summary_start_index;
            if summary_size == 0 {
                continue;
            }

            let _ = writeln!(
                out,
                "==== {:?}s {} - {} ====",
                event,
                event_log.summary_start_index,
                event_log.index - 1
            );
            for (name, aggregator) in &mut event_log.aggregators {
                let _ = writeln!(out, "{:<16} {}", Paint::fixed(35, name), aggregator);
                aggregator.clear()
            }
            event_log.summary_start_index = event_log.index;
        }
        out
    }
}

impl Default for CLILogger {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Logger for CLILogger {
    fn log<'a>(
        &mut self,
        event: Event,
        name: &'a str,
        value: Loggable,
    ) -> Result<(), LogError<'a>> {
        // Separate get() / insert() calls; the insert happens once per name
        // since aggregators are never removed.
        let aggregators = &mut self.events[event].aggregators;
        if let Some(aggregator) = aggregators.get_mut(name) {
            if let Err(expected) = aggregator.insert(value) {
                return Err(LogError::new(name, value, expected));
            }
        } else {
            let aggregator =
                Aggregator::new(value).map_err(|expected| LogError::new(name, value, expected))?;
            aggregators.insert(name.into(), aggregator);
        }
        Ok(())
    }

    fn done(&mut self, event: Event) {
        self.events[event].index += 1;
        if self.last_display_time.elapsed() >= self.display_period {
            self.display();
        }
    }
}

impl Drop for CLILogger {
    fn drop(&mut self) {
        // Ensure everything is flushed.
        self.display();
    }
}

#[derive(Debug)]
struct EventLog {
    /// Global index for this event
    index: u64,
    /// Value of `index` at the start of this summary period
    summary_start_index: u64,
    /// An aggregator for each log entry.
    aggregators: BTreeMap<String, Aggregator>,
}

impl EventLog {
    #[allow(clippy::missing_const_for_fn)] // BTreeMap const new not stabilized
    fn new() -> Self {
        Self {
            index: 0,
            summary_start_index: 0,
            aggregators: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Aggregator {
    /// Aggregates nothing
    Nothing,
    /// Mean and standard deviation of scalars
    Scalar(OnlineMeanVariance<f64>),
    /// Count of each index
    Index(Vec<u64>),
}

impl Aggregator {
    /// Create a new aggregator from a logged value.
    ///
    /// Returns `Err(expected)` if the value is invalid for its own kind.
    fn new(value: Loggable) -> Result<Self, String> {
        let mut aggregator = match value {
            Loggable::Nothing => Self::Nothing,
            Loggable::Scalar(_) => Self::Scalar(OnlineMeanVariance::default()),
            Loggable::IndexSample { size, .. } => Self::Index(vec![0; size]),
        };
        aggregator.insert(value)?;
        Ok(aggregator)
    }

    /// Insert a value into the aggregate.
    ///
    /// Returns `Err(expected)` if the value is incompatible with this aggregator.
    fn insert(&mut self, value: Loggable) -> Result<(), String> {
        match (self, value) {
            (Self::Nothing, Loggable::Nothing) => Ok(()),
            (Self::Scalar(stats), Loggable::Scalar(x)) => {
                stats.push(x);
                Ok(())
            }
            (Self::Index(counts), Loggable::IndexSample { value, size })
                if counts.len() == size && value < size =>
            {
                counts[value] += 1;
                Ok(())
            }
            (Self::Nothing, _) => Err("Nothing".into()),
            (Self::Scalar(_), _) => Err("Scalar".into()),
            (Self::Index(counts), _) => Err(format!("IndexSample{{size: {}}}", counts.len())),
        }
    }

    /// Clear the aggregated values.
    fn clear(&mut self) {
        match self {
            Self::Nothing => {}
            Self::Scalar(stats) => *stats = OnlineMeanVariance::default(),
            Self::Index(counts) => counts.iter_mut().for_each(|c| *c = 0),
        }
    }
}

impl fmt::Display for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Nothing => write!(f, "Nothing"),
            Self::Scalar(stats) => match stats.stddev() {
                None => write!(f, "None"),
                Some(stddev) => {
                    write!(f, "{:.4}", stats.mean())?;
                    if stats.count() > 1 {
                        write!(f, " {}", Paint::fixed(8, format!("(σ {:.4})", stddev)))?;
                    }
                    Ok(())
                }
            },
            Self::Index(counts) => {
                let total: u64 = counts.iter().sum();
                if total == 0 {
                    return write!(f, "None");
                }
                write!(f, "[")?;
                for (i, c) in counts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:.3}", (*c as f64) / (total as f64))?;
                }
                write!(f, "]")
            }
        }
    }
}
