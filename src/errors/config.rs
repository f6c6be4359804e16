// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use thiserror::Error;

use crate::model::Model;

/// Problems found while validating a loaded configuration file.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A numeric setting must be strictly positive
    NonPositive {
        /// The offending key
        field: &'static str,
        /// The value read from the file
        value: f64,
    },
    /// The model list is empty
    NoModels,
    /// A model appears more than once in the model list
    DuplicateModel {
        /// The repeated model
        model: Model,
    },
    /// A model needs an external engine that has no command configured
    MissingEngine {
        /// The model that cannot be run
        model: Model,
    },
    /// An engine command is configured but empty
    EmptyCommand {
        /// Which engine section holds the empty command
        engine: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NonPositive { field, value } => {
                write!(f, "'{}' must be positive, got {}", field, value)
            }
            ValidationError::NoModels => write!(f, "At least one model must be listed"),
            ValidationError::DuplicateModel { model } => {
                write!(f, "Model '{}' is listed more than once", model)
            }
            ValidationError::MissingEngine { model } => {
                write!(
                    f,
                    "Model '{}' needs an external engine but no command is configured for it",
                    model
                )
            }
            ValidationError::EmptyCommand { engine } => {
                write!(f, "Engine '{}' has an empty command", engine)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while reading a configuration file from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration validation failed:\n{}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
