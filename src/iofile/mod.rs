// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Stimulus and response descriptors.
//!
//! An [`IoFile`] says how one port is handed to a backend: its sampling
//! discipline, electrical rendering, resampling trigger and handshake
//! condition. The submodules turn port payloads into engine input and engine
//! output back into payloads.

mod condition;
pub mod decode;
mod descriptor;
pub mod stimulus;
pub mod text;

pub use condition::IoCondition;
pub use descriptor::{
    DataType, Edge, Electrical, EngineClass, IoFile, IoFileBundle, IoFormat, IoType, Trigger,
};
