// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for entity lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Entity construction and re-initialization
//! * Property inheritance from a parent entity
//! * Run lifecycle (start, completion, failure)
//! * Publishing results onto a shared result channel

use std::fmt::{Display, Formatter};
use std::time::Duration;

use tracing::Span;

use super::StructuredLog;

/// Entity constructed.
///
/// # Log Level
/// `info!`
pub struct EntityInitialized<'a> {
    pub entity: &'a str,
    pub ports: usize,
}

impl Display for EntityInitialized<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Initializing {} with {} ports", self.entity, self.ports)
    }
}

impl StructuredLog for EntityInitialized<'_> {
    fn log(&self) {
        tracing::info!(entity = self.entity, ports = self.ports, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("entity_init", span_name = name, entity = self.entity)
    }
}

/// Property copied from a parent entity.
///
/// # Log Level
/// `debug!`
pub struct PropertyInherited<'a> {
    pub entity: &'a str,
    pub parent: &'a str,
    pub property: &'a str,
    pub value: f64,
}

impl Display for PropertyInherited<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} inherits {}={} from {}",
            self.entity, self.property, self.value, self.parent
        )
    }
}

impl StructuredLog for PropertyInherited<'_> {
    fn log(&self) {
        tracing::debug!(
            entity = self.entity,
            parent = self.parent,
            property = self.property,
            value = self.value,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "property_inherited",
            span_name = name,
            entity = self.entity,
            parent = self.parent,
        )
    }
}

/// Run dispatched to a model.
///
/// # Log Level
/// `info!`
///
/// # Example
/// ```
/// use inverter::observability::messages::entity::EntityRunStarted;
///
/// let msg = EntityRunStarted {
///     entity: "inverter",
///     model: "ngspice",
///     parallel: true,
/// };
///
/// assert_eq!(msg.to_string(), "Running inverter with model 'ngspice' (parallel)");
/// ```
pub struct EntityRunStarted<'a> {
    pub entity: &'a str,
    pub model: &'a str,
    pub parallel: bool,
}

impl Display for EntityRunStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let mode = if self.parallel { "parallel" } else { "local" };
        write!(
            f,
            "Running {} with model '{}' ({})",
            self.entity, self.model, mode
        )
    }
}

impl StructuredLog for EntityRunStarted<'_> {
    fn log(&self) {
        tracing::info!(
            entity = self.entity,
            model = self.model,
            parallel = self.parallel,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "entity_run",
            span_name = name,
            entity = self.entity,
            model = self.model,
            parallel = self.parallel,
        )
    }
}

/// Run finished and outputs were committed.
///
/// # Log Level
/// `info!`
pub struct EntityRunCompleted<'a> {
    pub entity: &'a str,
    pub model: &'a str,
    pub outputs: usize,
    pub duration: Duration,
}

impl Display for EntityRunCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} model '{}' completed: {} outputs written in {:?}",
            self.entity, self.model, self.outputs, self.duration
        )
    }
}

impl StructuredLog for EntityRunCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            entity = self.entity,
            model = self.model,
            outputs = self.outputs,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "entity_run_completed",
            span_name = name,
            entity = self.entity,
            model = self.model,
            duration = ?self.duration,
        )
    }
}

/// Run failed; outputs were left untouched.
///
/// # Log Level
/// `error!`
pub struct EntityRunFailed<'a> {
    pub entity: &'a str,
    pub model: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for EntityRunFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} model '{}' failed: {}",
            self.entity, self.model, self.error
        )
    }
}

impl StructuredLog for EntityRunFailed<'_> {
    fn log(&self) {
        tracing::error!(
            entity = self.entity,
            model = self.model,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "entity_run_failed",
            span_name = name,
            entity = self.entity,
            model = self.model,
            error = %self.error,
        )
    }
}

/// Bundle pushed onto the result channel.
///
/// # Log Level
/// `debug!`
pub struct ResultPublished<'a> {
    pub entity: &'a str,
    pub model: &'a str,
    pub ports: usize,
}

impl Display for ResultPublished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} model '{}' published {} ports to the result channel",
            self.entity, self.model, self.ports
        )
    }
}

impl StructuredLog for ResultPublished<'_> {
    fn log(&self) {
        tracing::debug!(
            entity = self.entity,
            model = self.model,
            ports = self.ports,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "result_published",
            span_name = name,
            entity = self.entity,
            model = self.model,
        )
    }
}
