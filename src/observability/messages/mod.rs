// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use tracing::Span;

pub mod backend;
pub mod entity;

/// A message that knows its log level and structured fields.
pub trait StructuredLog {
    /// Emit the message at its level with fields attached.
    fn log(&self);

    /// Open a span carrying the same fields.
    fn span(&self, name: &str) -> Span;
}
