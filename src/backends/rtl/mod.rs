// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! RTL testbench.
//!
//! Externalizes sample ports as integer rows, gates them with handshake
//! conditions over the controller's signals and hands everything to an
//! [`RtlEngine`]. Returned rows are decoded back into sample traces carrying
//! the register latency of the model.
//!
//! # Decoding
//! | datatype | rows                 | decoded value               |
//! |----------|----------------------|-----------------------------|
//! | `sint`   | one signed column    | first column                |
//! | `int`    | bit-sliced columns   | sum of `slice[k] * 2^k`     |

mod process;

pub use process::ProcessRtlEngine;

use std::collections::{BTreeMap, HashMap};

use crate::entities::ControlSchedule;
use crate::errors::{BackendError, ConfigurationError, EntityResult};
use crate::io::{Bundle, Direction, Payload, SampleTrace};
use crate::iofile::decode::{expect_len, first_column, recombine_bit_slices};
use crate::iofile::stimulus::rows_from_columns;
use crate::iofile::{DataType, EngineClass, IoFile, IoFileBundle};
use crate::model::HdlLanguage;
use crate::observability::messages::{backend::IoConditionApplied, StructuredLog};
use crate::traits::{IoConditionHook, RtlEngine};

/// Clause every RTL output carries: the simulated design flags its outputs
/// as valid before they are committed.
pub const OUTPUTS_VALID: &str = "outputs_valid";

/// Everything an RTL engine needs for one simulation.
#[derive(Debug, Clone)]
pub struct RtlJob {
    pub entity: String,
    pub language: HdlLanguage,
    pub iofiles: IoFileBundle,
    /// Top-level generics, e.g. `g_Rs`
    pub parameters: BTreeMap<String, f64>,
    /// Rows of every input io file
    pub inputs: BTreeMap<String, Vec<Vec<i64>>>,
    pub control: ControlSchedule,
    /// Script replayed by the waveform viewer in interactive sessions
    pub interactive_control: String,
}

impl RtlJob {
    /// Number of samples every output must decode to.
    pub fn input_len(&self) -> usize {
        self.inputs.values().map(Vec::len).max().unwrap_or(0)
    }
}

/// Raw rows returned by an RTL engine, keyed by output io file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RtlArtifacts {
    pub outputs: HashMap<String, Vec<Vec<i64>>>,
}

pub struct RtlTestbench {
    entity: String,
    language: HdlLanguage,
    latency: usize,
    iofiles: IoFileBundle,
    parameters: BTreeMap<String, f64>,
    interactive_control: String,
}

impl RtlTestbench {
    pub fn new(entity: &str, language: HdlLanguage, latency: usize) -> Self {
        Self {
            entity: entity.to_string(),
            language,
            latency,
            iofiles: IoFileBundle::new(),
            parameters: BTreeMap::new(),
            interactive_control: String::new(),
        }
    }

    /// Declares an io file. Outputs receive the intrinsic
    /// [`OUTPUTS_VALID`] clause.
    pub fn iofile(&mut self, mut file: IoFile, ios: &Bundle) -> Result<(), ConfigurationError> {
        if file.direction() == Direction::Output {
            file.condition_mut().require(OUTPUTS_VALID);
        }
        self.iofiles.declare(file, ios, EngineClass::Rtl)
    }

    pub fn parameter(&mut self, name: &str, value: f64) {
        self.parameters.insert(name.to_string(), value);
    }

    pub fn interactive_control(&mut self, contents: &str) {
        self.interactive_control = contents.to_string();
    }

    pub fn iofiles(&self) -> &IoFileBundle {
        &self.iofiles
    }

    /// Applies the entity's handshake hook, checks every condition against
    /// the available control signals and collects the input rows.
    pub fn prepare(
        &mut self,
        hook: &dyn IoConditionHook,
        ios: &Bundle,
        control: &ControlSchedule,
    ) -> Result<RtlJob, ConfigurationError> {
        hook.define_io_conditions(&mut self.iofiles)?;

        for file in self.iofiles.iter() {
            if let Some(signal) = file
                .condition()
                .signals()
                .find(|s| *s != OUTPUTS_VALID && !control.has_signal(s))
            {
                return Err(ConfigurationError::UnknownControlSignal {
                    iofile: file.name().to_string(),
                    signal: signal.to_string(),
                });
            }
            IoConditionApplied {
                iofile: file.name(),
                condition: &file.condition().to_string(),
            }
            .log();
        }

        let mut inputs = BTreeMap::new();
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
            inputs.insert(
                file.name().to_string(),
                rows_from_columns(&[samples.aligned()]),
            );
        }

        Ok(RtlJob {
            entity: self.entity.clone(),
            language: self.language,
            iofiles: self.iofiles.clone(),
            parameters: self.parameters.clone(),
            inputs,
            control: control.clone(),
            interactive_control: self.interactive_control.clone(),
        })
    }

    /// Turns returned rows into sample payloads for every output io file.
    pub fn decode(
        &self,
        job: &RtlJob,
        mut artifacts: RtlArtifacts,
        engine: &str,
    ) -> EntityResult<Vec<(String, Payload)>> {
        let expected = job.input_len();
        let mut results = Vec::new();
        for file in self.iofiles.outputs() {
            let rows = artifacts
                .outputs
                .remove(file.name())
                .ok_or_else(|| BackendError::MissingArtifact {
                    engine: engine.to_string(),
                    artifact: file.name().to_string(),
                })?;
            let values = match file.datatype() {
                DataType::Sint => first_column(file.name(), &rows)?,
                DataType::Int => recombine_bit_slices(file.name(), &rows)?,
            };
            expect_len(file.name(), expected, values.len())?;
            results.push((
                file.name().to_string(),
                Payload::Samples(SampleTrace::with_latency(values, self.latency)),
            ));
        }
        Ok(results)
    }

    /// Prepares, simulates and decodes in one go. Nothing is written to
    /// `ios`; the caller commits the returned payloads.
    pub async fn run(
        mut self,
        hook: &(dyn IoConditionHook + Sync),
        ios: &Bundle,
        control: &ControlSchedule,
        engine: &dyn RtlEngine,
    ) -> EntityResult<Vec<(String, Payload)>> {
        let job = self.prepare(hook, ios, control)?;
        let artifacts = engine.simulate(&job).await?;
        self.decode(&job, artifacts, engine.name())
    }
}
