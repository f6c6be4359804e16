// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Entities of the self-test: the inverter under test, the controller that
//! drives its handshake signals and a source of random stimulus.

mod controller;
mod inverter;
mod signal_source;

#[cfg(test)]
mod integration_tests;

pub use controller::{ControlEvent, ControlSchedule, Controller, CONTROL_SIGNALS};
pub use inverter::Inverter;
pub use signal_source::SignalSource;
