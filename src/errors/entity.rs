// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors surfaced by an entity before any backend is invoked.

use thiserror::Error;

use crate::io::PayloadKind;
use crate::iofile::IoType;
use crate::model::Model;

/// Configuration errors are fatal to the invocation that raised them and are
/// never recovered locally.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Model '{0}' is not supported")]
    UnsupportedModel(String),

    #[error("Port '{port}' has no payload; assign it before run")]
    MissingPayload { port: String },

    #[error("Port '{0}' does not exist in the bundle")]
    UnknownPort(String),

    #[error("Port '{0}' is already declared")]
    DuplicatePort(String),

    #[error("Port '{port}' holds {expected} payloads, got {found}")]
    PayloadKindMismatch {
        port: String,
        expected: PayloadKind,
        found: PayloadKind,
    },

    #[error("Port '{0}' is an input and cannot receive backend results")]
    NotAnOutput(String),

    #[error("IO file '{iofile}' has io type '{iotype}' which only analog engines accept")]
    AnalogOnlyIoType { iofile: String, iotype: IoType },

    #[error("IO file '{0}' is already declared")]
    DuplicateIoFile(String),

    #[error("IO file '{0}' is not declared")]
    UnknownIoFile(String),

    #[error("Analog input '{0}' needs electrical parameters to be rendered as a source")]
    MissingElectrical(String),

    #[error("Analog sample output '{0}' needs a trigger to be resampled")]
    MissingTrigger(String),

    #[error("IO condition on '{iofile}' references unknown control signal '{signal}'")]
    UnknownControlSignal { iofile: String, signal: String },

    #[error("Model '{model}' requires a {kind} engine but none is configured")]
    EngineUnavailable { model: Model, kind: &'static str },

    #[error("Model '{0}' requires a control_write port shared from a controller")]
    MissingControl(Model),

    #[error("Property '{name}' must be a positive finite number, got {value}")]
    InvalidProperty { name: String, value: f64 },

    #[error("Property '{0}' is not defined on this entity")]
    UnknownProperty(String),
}
