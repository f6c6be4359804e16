// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;      // native, RTL and SPICE adapters
pub mod config;        // YAML configuration
pub mod entities;      // inverter, controller, signal source
pub mod errors;        // error handling
pub mod io;            // ports and bundles
pub mod iofile;        // stimulus/response descriptors
pub mod model;         // closed model selector
pub mod observability;
pub mod parallel;      // result channel and worker fan-out
pub mod traits;        // entity and engine abstractions

pub use entities::{Controller, Inverter, SignalSource};
pub use errors::{EntityError, EntityResult};
pub use model::Model;
pub use parallel::{result_channel, ExecutionMode, ResultChannel, RunResult};
