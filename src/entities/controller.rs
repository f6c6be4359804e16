// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Controller entity driving the RTL handshake signals.
//!
//! The controller owns the `control_write` port. It builds a time-ordered
//! schedule of `reset` and `initdone` values that the RTL testbench replays
//! alongside the stimulus; consumers receive a read-only [`PortView`].

use serde::Serialize;

use crate::config::consts::DEFAULT_RS;
use crate::errors::ConfigurationError;
use crate::io::{PortView, SharedPort};
use crate::traits::entity::{positive, Entity};

/// Control signals every controller drives, in column order.
pub const CONTROL_SIGNALS: [&str; 2] = ["reset", "initdone"];

/// Values of every control signal from `time` (in picoseconds) onward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlEvent {
    pub time: u64,
    pub values: Vec<i64>,
}

/// Time-ordered schedule of control signal values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlSchedule {
    signals: Vec<String>,
    events: Vec<ControlEvent>,
}

impl ControlSchedule {
    /// All signals start deasserted at time zero.
    pub fn new(signals: &[&str]) -> Self {
        Self {
            signals: signals.iter().map(|s| s.to_string()).collect(),
            events: vec![ControlEvent {
                time: 0,
                values: vec![0; signals.len()],
            }],
        }
    }

    pub fn signals(&self) -> impl Iterator<Item = &str> {
        self.signals.iter().map(String::as_str)
    }

    pub fn has_signal(&self, name: &str) -> bool {
        self.signals.iter().any(|s| s == name)
    }

    pub fn events(&self) -> &[ControlEvent] {
        &self.events
    }

    /// Latest scheduled value of `signal`.
    pub fn current(&self, signal: &str) -> Option<i64> {
        let column = self.signals.iter().position(|s| s == signal)?;
        self.events.last().map(|e| e.values[column])
    }

    pub fn is_asserted(&self, signal: &str) -> bool {
        self.current(signal).is_some_and(|v| v != 0)
    }

    /// File rows: `time` followed by one column per signal.
    pub fn rows(&self) -> Vec<Vec<i64>> {
        self.events
            .iter()
            .map(|e| {
                let mut row = Vec::with_capacity(e.values.len() + 1);
                row.push(i64::try_from(e.time).unwrap_or(i64::MAX));
                row.extend_from_slice(&e.values);
                row
            })
            .collect()
    }

    fn set(&mut self, time: u64, signal: &str, value: i64) {
        let Some(column) = self.signals.iter().position(|s| s == signal) else {
            return;
        };
        match self.events.last_mut() {
            Some(last) if last.time == time => last.values[column] = value,
            Some(last) => {
                let mut values = last.values.clone();
                values[column] = value;
                self.events.push(ControlEvent { time, values });
            }
            None => {
                let mut values = vec![0; self.signals.len()];
                values[column] = value;
                self.events.push(ControlEvent { time, values });
            }
        }
    }
}

impl Default for ControlSchedule {
    fn default() -> Self {
        Self::new(&CONTROL_SIGNALS)
    }
}

pub struct Controller {
    name: String,
    rs: f64,
    step: u64,
    time: u64,
    control_write: SharedPort<ControlSchedule>,
}

impl Controller {
    pub fn new() -> Self {
        Self {
            name: "controller".to_string(),
            rs: DEFAULT_RS,
            step: step_ps(DEFAULT_RS),
            time: 0,
            control_write: SharedPort::new("control_write", ControlSchedule::default()),
        }
    }

    pub fn with_parent(parent: &dyn Entity) -> Result<Self, ConfigurationError> {
        let mut controller = Self::new();
        controller.copy_propval(parent)?;
        Ok(controller)
    }

    /// Pulses `reset` for one sample period.
    pub fn reset(&mut self) {
        self.control_write.write().set(self.time, "reset", 1);
        self.step_time();
        self.control_write.write().set(self.time, "reset", 0);
    }

    /// Advances the schedule clock by one sample period. The clock stops at
    /// `u64::MAX` picoseconds.
    pub fn step_time(&mut self) {
        self.time = self.time.saturating_add(self.step);
    }

    /// Asserts `initdone`, releasing the stimulus into the simulation.
    pub fn start_datafeed(&mut self) {
        self.control_write.write().set(self.time, "initdone", 1);
    }

    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn rs(&self) -> f64 {
        self.rs
    }

    pub fn control_write(&self) -> PortView<ControlSchedule> {
        self.control_write.view()
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Controller {
    fn name(&self) -> &str {
        &self.name
    }

    fn proplist(&self) -> &'static [&'static str] {
        &["rs"]
    }

    fn property(&self, name: &str) -> Option<f64> {
        match name {
            "rs" => Some(self.rs),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: f64) -> Result<(), ConfigurationError> {
        match name {
            "rs" => {
                self.rs = positive(name, value)?;
                self.step = step_ps(self.rs);
                Ok(())
            }
            _ => Err(ConfigurationError::UnknownProperty(name.to_string())),
        }
    }
}

// One sample period in picoseconds, never zero.
fn step_ps(rs: f64) -> u64 {
    ((1.0 / (rs * 1e-12)).round() as u64).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_pulses_for_one_period() {
        let mut controller = Controller::new();
        controller.reset();
        let view = controller.control_write();
        let schedule = view.snapshot();
        assert_eq!(
            schedule.rows(),
            vec![vec![0, 1, 0], vec![10_000, 0, 0]],
        );
        assert!(!schedule.is_asserted("reset"));
    }

    #[test]
    fn test_datafeed_asserts_initdone() {
        let mut controller = Controller::new();
        let view = controller.control_write();
        assert!(!view.read().is_asserted("initdone"));
        controller.reset();
        controller.start_datafeed();
        assert!(view.read().is_asserted("initdone"));
        assert_eq!(view.read().events().len(), 2);
    }

    #[test]
    fn test_rate_changes_the_step() {
        let mut controller = Controller::new();
        controller.set_property("rs", 1e9).unwrap();
        controller.step_time();
        assert_eq!(controller.time(), 1_000);
        assert!(controller.set_property("rs", 0.0).is_err());
        assert!(controller.set_property("vdd", 1.0).is_err());
    }

    #[test]
    fn test_very_slow_rate_saturates_the_clock() {
        let mut controller = Controller::new();
        controller.set_property("rs", 1e-9).unwrap();
        controller.reset();
        controller.reset();
        controller.step_time();
        assert_eq!(controller.time(), u64::MAX);
        controller.start_datafeed();
        assert!(controller.control_write().read().is_asserted("initdone"));
    }

    #[test]
    fn test_unknown_signals_are_not_scheduled() {
        let mut schedule = ControlSchedule::default();
        schedule.set(5, "enable", 1);
        assert_eq!(schedule.events().len(), 1);
        assert_eq!(schedule.current("enable"), None);
        assert!(schedule.has_signal("initdone"));
    }
}
