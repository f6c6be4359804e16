// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Mutex;

use async_trait::async_trait;

use super::rtl::{RtlArtifacts, RtlJob, OUTPUTS_VALID};
use super::spice::{SpiceArtifacts, SpiceJob};
use crate::errors::BackendError;
use crate::io::Waveform;
use crate::iofile::DataType;
use crate::traits::{RtlEngine, SpiceEngine};

/// Registered RTL inverter: `Z[0] = 0`, `Z[i+1] = 1 - A[i]`.
///
/// Data is only released once every input condition holds in the control
/// schedule; otherwise the outputs come back empty. `int` outputs are
/// returned as two bit slices. Every job is recorded.
#[derive(Default)]
pub struct RegisteredInverter {
    jobs: Mutex<Vec<RtlJob>>,
}

impl RegisteredInverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> Vec<RtlJob> {
        self.jobs.lock().map(|jobs| jobs.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl RtlEngine for RegisteredInverter {
    async fn simulate(&self, job: &RtlJob) -> Result<RtlArtifacts, BackendError> {
        if let Ok(mut jobs) = self.jobs.lock() {
            jobs.push(job.clone());
        }

        let released = job.iofiles.inputs().all(|file| {
            file.condition()
                .is_satisfied(|s| s == OUTPUTS_VALID || job.control.is_asserted(s))
        });
        let a: Vec<i64> = match job.inputs.values().next() {
            Some(rows) if released => rows.iter().map(|r| r[0]).collect(),
            _ => Vec::new(),
        };
        let z: Vec<i64> = a
            .iter()
            .enumerate()
            .map(|(i, _)| if i == 0 { 0 } else { 1 - a[i - 1] })
            .collect();

        let mut artifacts = RtlArtifacts::default();
        for file in job.iofiles.outputs() {
            let rows = z
                .iter()
                .map(|&v| match file.datatype() {
                    DataType::Sint => vec![v],
                    DataType::Int => vec![v & 1, (v >> 1) & 1],
                })
                .collect();
            artifacts.outputs.insert(file.name().to_string(), rows);
        }
        Ok(artifacts)
    }

    fn name(&self) -> &'static str {
        "registered"
    }
}

/// Drops the last output row.
pub struct TruncatingEngine;

#[async_trait]
impl RtlEngine for TruncatingEngine {
    async fn simulate(&self, job: &RtlJob) -> Result<RtlArtifacts, BackendError> {
        let rows = vec![vec![0]; job.input_len().saturating_sub(1)];
        let mut artifacts = RtlArtifacts::default();
        for file in job.iofiles.outputs() {
            artifacts.outputs.insert(file.name().to_string(), rows.clone());
        }
        Ok(artifacts)
    }

    fn name(&self) -> &'static str {
        "truncating"
    }
}

/// Ideal analog inverter: node `Z` mirrors node `A` around the supply.
/// Every stimulus node is returned unchanged.
pub struct IdealAnalogInverter {
    vdd: f64,
}

impl IdealAnalogInverter {
    pub fn new(vdd: f64) -> Self {
        Self { vdd }
    }
}

#[async_trait]
impl SpiceEngine for IdealAnalogInverter {
    async fn simulate(&self, job: &SpiceJob) -> Result<SpiceArtifacts, BackendError> {
        let mut artifacts = SpiceArtifacts::default();
        for (node, wave) in &job.stimuli {
            artifacts.nodes.insert(node.clone(), wave.clone());
        }
        if let Some(a) = job.stimuli.get("A") {
            let z = a.points().iter().map(|&(t, v)| (t, self.vdd - v)).collect();
            artifacts.nodes.insert("Z".to_string(), Waveform::new(z));
        }
        Ok(artifacts)
    }

    fn name(&self) -> &'static str {
        "ideal"
    }
}

/// An engine that always fails, for error propagation tests.
pub struct FailingEngine;

impl FailingEngine {
    fn error() -> BackendError {
        BackendError::NonZeroExit {
            engine: "failing".to_string(),
            status: "exit status: 1".to_string(),
            stderr: "Simulated engine failure".to_string(),
        }
    }
}

#[async_trait]
impl RtlEngine for FailingEngine {
    async fn simulate(&self, _job: &RtlJob) -> Result<RtlArtifacts, BackendError> {
        Err(Self::error())
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

#[async_trait]
impl SpiceEngine for FailingEngine {
    async fn simulate(&self, _job: &SpiceJob) -> Result<SpiceArtifacts, BackendError> {
        Err(Self::error())
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
