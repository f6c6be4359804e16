// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for backend adapters and external engine processes.

use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;

use tracing::Span;

use super::StructuredLog;

/// Stimulus or response descriptor registered with a testbench.
///
/// # Log Level
/// `debug!`
pub struct IoFileDeclared<'a> {
    pub iofile: &'a str,
    pub direction: &'a str,
    pub iotype: &'a str,
}

impl Display for IoFileDeclared<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Declared {} io file '{}' of type {}",
            self.direction, self.iofile, self.iotype
        )
    }
}

impl StructuredLog for IoFileDeclared<'_> {
    fn log(&self) {
        tracing::debug!(
            iofile = self.iofile,
            direction = self.direction,
            iotype = self.iotype,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("iofile_declared", span_name = name, iofile = self.iofile)
    }
}

/// Handshake condition attached to a descriptor.
///
/// # Log Level
/// `debug!`
pub struct IoConditionApplied<'a> {
    pub iofile: &'a str,
    pub condition: &'a str,
}

impl Display for IoConditionApplied<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "IO file '{}' is gated by '{}'",
            self.iofile, self.condition
        )
    }
}

impl StructuredLog for IoConditionApplied<'_> {
    fn log(&self) {
        tracing::debug!(iofile = self.iofile, condition = self.condition, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "io_condition",
            span_name = name,
            iofile = self.iofile,
            condition = self.condition,
        )
    }
}

/// External engine launched.
///
/// # Log Level
/// `info!`
pub struct EngineInvoked<'a> {
    pub engine: &'a str,
    pub command: &'a str,
    pub work_dir: &'a Path,
}

impl Display for EngineInvoked<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Launching {} engine '{}' in {}",
            self.engine,
            self.command,
            self.work_dir.display()
        )
    }
}

impl StructuredLog for EngineInvoked<'_> {
    fn log(&self) {
        tracing::info!(
            engine = self.engine,
            command = self.command,
            work_dir = %self.work_dir.display(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "engine",
            span_name = name,
            engine = self.engine,
            command = self.command,
        )
    }
}

/// External engine exited.
///
/// # Log Level
/// `info!` on success, `error!` otherwise
pub struct EngineFinished<'a> {
    pub engine: &'a str,
    pub success: bool,
    pub duration: Duration,
}

impl Display for EngineFinished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let outcome = if self.success { "finished" } else { "failed" };
        write!(f, "{} engine {} after {:?}", self.engine, outcome, self.duration)
    }
}

impl StructuredLog for EngineFinished<'_> {
    fn log(&self) {
        if self.success {
            tracing::info!(
                engine = self.engine,
                duration_ms = self.duration.as_millis() as u64,
                "{}", self
            );
        } else {
            tracing::error!(
                engine = self.engine,
                duration_ms = self.duration.as_millis() as u64,
                "{}", self
            );
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "engine_finished",
            span_name = name,
            engine = self.engine,
            success = self.success,
        )
    }
}

/// Work directory kept on disk for debugging.
///
/// # Log Level
/// `info!`
pub struct IoFilesPreserved<'a> {
    pub engine: &'a str,
    pub work_dir: &'a Path,
}

impl Display for IoFilesPreserved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Preserving {} io files in {}",
            self.engine,
            self.work_dir.display()
        )
    }
}

impl StructuredLog for IoFilesPreserved<'_> {
    fn log(&self) {
        tracing::info!(
            engine = self.engine,
            work_dir = %self.work_dir.display(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("iofiles_preserved", span_name = name, engine = self.engine)
    }
}
