// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by external engine invocations.

use thiserror::Error;

/// Failure of an external simulator run. Never retried; the entity leaves its
/// output ports untouched when one of these propagates.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Engine '{engine}' could not be launched: {source}")]
    Launch {
        engine: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Engine '{engine}' exited with {status}: {stderr}")]
    NonZeroExit {
        engine: String,
        status: String,
        stderr: String,
    },

    #[error("Engine '{engine}' produced no artifact for '{artifact}'")]
    MissingArtifact { engine: String, artifact: String },

    #[error("Engine '{engine}' produced a malformed artifact '{artifact}': {reason}")]
    MalformedArtifact {
        engine: String,
        artifact: String,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
