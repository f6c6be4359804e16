// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::backends::rtl::{RtlArtifacts, RtlJob};
use crate::backends::spice::{SpiceArtifacts, SpiceJob};
use crate::errors::BackendError;

/// An opaque register-transfer-level simulator.
///
/// Receives the sample rows of every input io file and returns the raw rows
/// of every output io file. Decoding is left to the testbench.
#[async_trait]
pub trait RtlEngine: Send + Sync {
    async fn simulate(&self, job: &RtlJob) -> Result<RtlArtifacts, BackendError>;

    fn name(&self) -> &'static str;
}

/// An opaque SPICE-class analog simulator.
///
/// Receives a rendered deck plus the source waveform of every input io file
/// and returns the waveform of every probed node.
#[async_trait]
pub trait SpiceEngine: Send + Sync {
    async fn simulate(&self, job: &SpiceJob) -> Result<SpiceArtifacts, BackendError>;

    fn name(&self) -> &'static str;
}
