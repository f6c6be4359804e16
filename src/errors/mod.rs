// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod backend;
mod config;
mod decode;
mod entity;

use thiserror::Error;

pub use backend::BackendError;
pub use config::{LoadError, ValidationError};
pub use decode::DecodeError;
pub use entity::ConfigurationError;

/// Everything an entity run can fail with, one variant per error family so
/// callers can tell them apart.
#[derive(Error, Debug)]
pub enum EntityError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Result channel closed before '{0}' could publish")]
    ChannelClosed(String),

    #[error("Worker running '{0}' panicked")]
    WorkerPanicked(String),
}

pub type EntityResult<T> = Result<T, EntityError>;
