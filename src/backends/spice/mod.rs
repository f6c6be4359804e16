// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! SPICE-class analog testbench.
//!
//! Sample inputs become piecewise-linear voltage sources, the netlist
//! settings are rendered into a deck for the engine family, and the returned
//! node waveforms are read back according to each output io file:
//!
//! - `event` keeps the waveform as is
//! - `time` extracts threshold crossings
//! - `sample` resamples at the trigger edges, as logic levels (`dec`) or raw
//!   voltages (`volt`)

pub mod deck;
mod process;

pub use process::ProcessSpiceEngine;

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;

use crate::errors::{BackendError, ConfigurationError, DecodeError, EntityResult};
use crate::io::{Bundle, Direction, Payload, SampleTrace, Waveform};
use crate::iofile::decode::{edge_times, expect_len, sample_at_edges, voltages_at_edges};
use crate::iofile::stimulus::pwl_from_samples;
use crate::iofile::{EngineClass, IoFile, IoFileBundle, IoFormat, IoType};
use crate::model::SpiceFamily;
use crate::traits::SpiceEngine;

/// Constant voltage source between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct DcSource {
    pub name: String,
    pub value: f64,
    pub pos: String,
    pub neg: String,
    /// Probe the current drawn from this source
    pub extract: bool,
}

/// Process corner and temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct Corner {
    pub corner: String,
    pub temp: f64,
}

/// Transient analysis request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transient {
    /// Maximum time step; derived from the stimulus when absent
    pub tstep: Option<f64>,
    /// Stop time; the end of the longest stimulus when absent
    pub tstop: Option<f64>,
    /// Nodes shown by interactive viewers, in the family's own syntax
    pub plotlist: Vec<String>,
}

/// Netlist-level settings of an analog testbench.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpiceSettings {
    pub nproc: usize,
    pub options: BTreeMap<String, String>,
    pub parameters: BTreeMap<String, String>,
    pub corner: Option<Corner>,
    pub lib_file: Option<PathBuf>,
    pub dc_sources: Vec<DcSource>,
    /// Lines copied verbatim into the deck
    pub misc: Vec<String>,
    pub transient: Transient,
}

/// Everything a SPICE engine needs for one simulation.
#[derive(Debug, Clone)]
pub struct SpiceJob {
    pub entity: String,
    pub family: SpiceFamily,
    pub deck: String,
    /// Source waveform of every input node
    pub stimuli: BTreeMap<String, Waveform>,
    /// Nodes whose waveforms must come back
    pub probes: Vec<String>,
    pub nproc: usize,
    pub tstop: f64,
}

/// Node waveforms returned by a SPICE engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpiceArtifacts {
    pub nodes: HashMap<String, Waveform>,
}

pub struct SpiceTestbench {
    entity: String,
    family: SpiceFamily,
    iofiles: IoFileBundle,
    settings: SpiceSettings,
    expected_len: Option<usize>,
}

impl SpiceTestbench {
    pub fn new(entity: &str, family: SpiceFamily) -> Self {
        Self {
            entity: entity.to_string(),
            family,
            iofiles: IoFileBundle::new(),
            settings: SpiceSettings::default(),
            expected_len: None,
        }
    }

    /// Declares an io file. Sample inputs need electrical parameters and
    /// sample outputs need a trigger.
    pub fn iofile(&mut self, file: IoFile, ios: &Bundle) -> Result<(), ConfigurationError> {
        if file.iotype() == IoType::Sample {
            match file.direction() {
                Direction::Input if file.electrical().is_none() => {
                    return Err(ConfigurationError::MissingElectrical(file.name().to_string()))
                }
                Direction::Output if file.trigger().is_none() => {
                    return Err(ConfigurationError::MissingTrigger(file.name().to_string()))
                }
                _ => {}
            }
        }
        self.iofiles.declare(file, ios, EngineClass::Analog)
    }

    pub fn settings_mut(&mut self) -> &mut SpiceSettings {
        &mut self.settings
    }

    pub fn settings(&self) -> &SpiceSettings {
        &self.settings
    }

    pub fn iofiles(&self) -> &IoFileBundle {
        &self.iofiles
    }

    /// Number of samples every resampled output must hold.
    pub fn expect_samples(&mut self, len: usize) {
        self.expected_len = Some(len);
    }

    /// Renders the stimulus and the deck.
    pub fn prepare(&self, ios: &Bundle) -> Result<SpiceJob, ConfigurationError> {
        let mut stimuli = BTreeMap::new();
        for file in self.iofiles.inputs() {
            let samples = match ios.require(file.name())? {
                Payload::Samples(samples) => samples,
                other => {
                    return Err(ConfigurationError::PayloadKindMismatch {
                        port: file.name().to_string(),
                        expected: file.payload_kind(),
                        found: other.kind(),
                    })
                }
            };
            let electrical = file
                .electrical()
                .ok_or_else(|| ConfigurationError::MissingElectrical(file.name().to_string()))?;
            stimuli.insert(
                file.node().to_string(),
                pwl_from_samples(samples.aligned(), electrical),
            );
        }

        let tstop = self.settings.transient.tstop.unwrap_or_else(|| {
            stimuli
                .values()
                .filter_map(Waveform::end_time)
                .fold(0.0, f64::max)
        });

        let mut probes = BTreeSet::new();
        for file in self.iofiles.outputs() {
            probes.insert(file.node().to_string());
            if let Some(trigger) = file.trigger() {
                probes.insert(trigger.node.clone());
            }
        }
        let probes: Vec<String> = probes.into_iter().collect();

        let deck = deck::render(
            self.family,
            &self.entity,
            &self.settings,
            &stimuli,
            &probes,
            tstop,
        );

        Ok(SpiceJob {
            entity: self.entity.clone(),
            family: self.family,
            deck,
            stimuli,
            probes,
            nproc: self.settings.nproc,
            tstop,
        })
    }

    /// Reads every output io file back from the returned node waveforms.
    pub fn decode(&self, artifacts: &SpiceArtifacts, engine: &str) -> EntityResult<Vec<(String, Payload)>> {
        let node = |name: &str| {
            artifacts
                .nodes
                .get(name)
                .ok_or_else(|| BackendError::MissingArtifact {
                    engine: engine.to_string(),
                    artifact: name.to_string(),
                })
        };

        let mut results = Vec::new();
        for file in self.iofiles.outputs() {
            let signal = node(file.node())?;
            let payload = match file.iotype() {
                IoType::Event => Payload::Waveform(signal.clone()),
                IoType::Time => {
                    let (vth, edge) = file
                        .threshold()
                        .ok_or_else(|| ConfigurationError::MissingTrigger(file.name().to_string()))?;
                    Payload::Timestamps(edge_times(signal, vth, edge))
                }
                IoType::Sample => {
                    let trigger = file
                        .trigger()
                        .ok_or_else(|| ConfigurationError::MissingTrigger(file.name().to_string()))?;
                    let clock = artifacts.nodes.get(&trigger.node).ok_or_else(|| {
                        DecodeError::MissingTrigger {
                            port: file.name().to_string(),
                            node: trigger.node.clone(),
                        }
                    })?;
                    match file.ioformat() {
                        IoFormat::Dec => {
                            let values = sample_at_edges(signal, clock, trigger);
                            if let Some(expected) = self.expected_len {
                                expect_len(file.name(), expected, values.len())?;
                            }
                            Payload::Samples(SampleTrace::new(values))
                        }
                        IoFormat::Volt => Payload::Waveform(voltages_at_edges(signal, clock, trigger)),
                    }
                }
            };
            results.push((file.name().to_string(), payload));
        }
        Ok(results)
    }

    /// Prepares, simulates and decodes in one go. Nothing is written to
    /// `ios`; the caller commits the returned payloads.
    pub async fn run(&self, ios: &Bundle, engine: &dyn SpiceEngine) -> EntityResult<Vec<(String, Payload)>> {
        let job = self.prepare(ios)?;
        let artifacts = engine.simulate(&job).await?;
        self.decode(&artifacts, engine.name())
    }
}
