// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// The returned artifact does not have the shape the output port expects.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Output '{port}' decoded {found} samples, expected {expected}")]
    Cardinality {
        port: String,
        expected: usize,
        found: usize,
    },

    #[error("Output '{port}' row {row} has no columns")]
    EmptyRow { port: String, row: usize },

    #[error("Output '{port}' has {width} bit slices, more than fit a 63-bit sample")]
    TooWide { port: String, width: usize },

    #[error("Output '{port}' row {row} holds {value} where a bit slice must be 0 or 1")]
    NotABit { port: String, row: usize, value: i64 },

    #[error("Output '{port}' is triggered by '{node}' which the engine did not return")]
    MissingTrigger { port: String, node: String },

    #[error("Line {line}: cannot parse '{token}'")]
    Parse { line: usize, token: String },

    #[error("Line {line}: time {time:e} is earlier than the previous sample")]
    NonMonotonicTime { line: usize, time: f64 },
}
