// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Serialize;

use super::port::{Direction, Payload, PayloadKind, Port};
use crate::errors::ConfigurationError;

/// Insertion-ordered collection of an entity's ports with unique names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bundle {
    ports: Vec<Port>,
}

impl Bundle {
    pub fn new() -> Self {
        Self { ports: Vec::new() }
    }

    pub fn declare(&mut self, port: Port) -> Result<(), ConfigurationError> {
        if self.contains(port.name()) {
            return Err(ConfigurationError::DuplicatePort(port.name().to_string()));
        }
        self.ports.push(port);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Port> {
        self.ports.iter_mut().find(|p| p.name() == name)
    }

    /// Stores `payload` in the named port after checking its kind.
    pub fn set(&mut self, name: &str, payload: Payload) -> Result<(), ConfigurationError> {
        self.get_mut(name)
            .ok_or_else(|| ConfigurationError::UnknownPort(name.to_string()))?
            .set(payload)
    }

    /// Payload of `name`, or a `MissingPayload` error if the port is empty.
    pub fn require(&self, name: &str) -> Result<&Payload, ConfigurationError> {
        self.get(name)
            .ok_or_else(|| ConfigurationError::UnknownPort(name.to_string()))?
            .data()
            .ok_or_else(|| ConfigurationError::MissingPayload {
                port: name.to_string(),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ports.iter().map(|p| p.name())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter()
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Port> {
        self.ports
            .iter()
            .filter(|p| p.direction() == Direction::Output)
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Writes a backend's results into the output ports, all or nothing.
    ///
    /// Every payload is checked first; ports not yet present are declared as
    /// outputs of the payload's kind. Nothing is written if any check fails.
    pub fn commit(&mut self, results: Vec<(String, Payload)>) -> Result<(), ConfigurationError> {
        let mut declared: Vec<(&str, PayloadKind)> = Vec::new();
        for (name, payload) in &results {
            if let Some(port) = self.get(name) {
                if port.direction() != Direction::Output {
                    return Err(ConfigurationError::NotAnOutput(name.clone()));
                }
                port.accepts(payload)?;
            } else if let Some((_, kind)) = declared.iter().find(|(n, _)| *n == name) {
                if *kind != payload.kind() {
                    return Err(ConfigurationError::PayloadKindMismatch {
                        port: name.clone(),
                        expected: *kind,
                        found: payload.kind(),
                    });
                }
            } else {
                declared.push((name, payload.kind()));
            }
        }

        for (name, payload) in results {
            if !self.contains(&name) {
                self.ports.push(Port::output(&name, payload.kind()));
            }
            self.set(&name, payload)?;
        }
        Ok(())
    }

    /// Copy of the bundle holding only output ports.
    pub fn output_snapshot(&self) -> Bundle {
        Bundle {
            ports: self.outputs().cloned().collect(),
        }
    }

    /// Declared kind of `name`, if the port exists.
    pub fn kind_of(&self, name: &str) -> Option<PayloadKind> {
        self.get(name).map(|p| p.kind())
    }
}
