// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Typed ports, the bundle that owns them, and read-only shared views.

mod bundle;
mod port;
mod shared;

pub use bundle::Bundle;
pub use port::{Direction, Payload, PayloadKind, Port, SampleTrace, Timestamps, Waveform};
pub use shared::{PortView, SharedPort};
