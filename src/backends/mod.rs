// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Execution backends for entity models.
//!
//! # Available Backends
//!
//! ## Native
//! In-process complement of the input samples. No engine required.
//!
//! ## RTL
//! [`rtl::RtlTestbench`] externalizes ports as integer rows with handshake
//! conditions and hands them to an [`RtlEngine`]. [`rtl::ProcessRtlEngine`]
//! runs an external HDL simulator command.
//!
//! ## SPICE
//! [`spice::SpiceTestbench`] renders stimulus into piecewise-linear sources
//! and a deck for one engine family, then resamples returned waveforms.
//! [`spice::ProcessSpiceEngine`] runs an external simulator command.
//!
//! ## Stub Backend (Test-Only)
//! Scripted engines for entity tests (only available in test builds):
//! - **RegisteredInverter**: RTL inverter with one sample of latency
//! - **IdealAnalogInverter**: node `Z` mirrors node `A` around the supply
//! - **TruncatingEngine**: returns one row too few
//! - **FailingEngine**: always fails
//!
//! # Architecture
//!
//! ```text
//! Configuration → EngineSet → Testbench + Engine → decoded payloads → Entity
//! ```

pub mod native;
pub(crate) mod process;
pub mod rtl;
pub mod spice;

#[cfg(test)]
pub mod stub;

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Config;
use crate::errors::ConfigurationError;
use crate::model::{Model, SpiceFamily};
use crate::traits::{RtlEngine, SpiceEngine};

/// The engines available to an entity, shared between entities of one run.
#[derive(Clone, Default)]
pub struct EngineSet {
    rtl: Option<Arc<dyn RtlEngine>>,
    spice: HashMap<SpiceFamily, Arc<dyn SpiceEngine>>,
}

impl EngineSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds process engines for every engine section of the configuration.
    pub fn from_config(cfg: &Config) -> Self {
        let mut engines = Self::new();
        if let Some(rtl) = &cfg.rtl {
            engines.rtl = Some(Arc::new(rtl::ProcessRtlEngine::new(rtl.clone())));
        }
        for (&family, engine) in &cfg.spice.engines {
            engines.spice.insert(
                family,
                Arc::new(spice::ProcessSpiceEngine::new(family, engine.clone())),
            );
        }
        engines
    }

    pub fn with_rtl(mut self, engine: Arc<dyn RtlEngine>) -> Self {
        self.rtl = Some(engine);
        self
    }

    pub fn with_spice(mut self, family: SpiceFamily, engine: Arc<dyn SpiceEngine>) -> Self {
        self.spice.insert(family, engine);
        self
    }

    pub fn rtl(&self, model: Model) -> Result<Arc<dyn RtlEngine>, ConfigurationError> {
        self.rtl
            .clone()
            .ok_or(ConfigurationError::EngineUnavailable { model, kind: "RTL" })
    }

    pub fn spice(&self, family: SpiceFamily) -> Result<Arc<dyn SpiceEngine>, ConfigurationError> {
        self.spice
            .get(&family)
            .cloned()
            .ok_or(ConfigurationError::EngineUnavailable {
                model: family.model(),
                kind: "SPICE",
            })
    }
}
