// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use serde::Serialize;

use crate::errors::ConfigurationError;
use crate::iofile::Edge;

/// The kind of payload a port is declared to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    /// Integer sequence indexed at the sample rate
    Samples,
    /// Irregularly timed analog waveform
    Waveform,
    /// Extracted edge times
    Timestamps,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadKind::Samples => f.write_str("sample"),
            PayloadKind::Waveform => f.write_str("waveform"),
            PayloadKind::Timestamps => f.write_str("timestamp"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Input,
    Output,
}

/// Integer samples at the entity sample rate.
///
/// `latency` records how many leading samples a backend inserted before the
/// first valid result (a registered RTL output trails its input by one).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SampleTrace {
    values: Vec<i64>,
    latency: usize,
}

impl SampleTrace {
    pub fn new(values: Vec<i64>) -> Self {
        Self { values, latency: 0 }
    }

    pub fn with_latency(values: Vec<i64>, latency: usize) -> Self {
        Self { values, latency }
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }

    pub fn latency(&self) -> usize {
        self.latency
    }

    /// Samples with the backend latency removed, so index `i` lines up with
    /// input sample `i`.
    pub fn aligned(&self) -> &[i64] {
        let skip = self.latency.min(self.values.len());
        &self.values[skip..]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<i64>> for SampleTrace {
    fn from(values: Vec<i64>) -> Self {
        Self::new(values)
    }
}

/// Piecewise-linear analog waveform as `(time, value)` points with
/// non-decreasing time.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Waveform(pub Vec<(f64, f64)>);

impl Waveform {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn end_time(&self) -> Option<f64> {
        self.0.last().map(|(t, _)| *t)
    }

    /// Linearly interpolated value at `time`, held constant outside the
    /// simulated range.
    pub fn value_at(&self, time: f64) -> Option<f64> {
        let (first, last) = (self.0.first()?, self.0.last()?);
        if time <= first.0 {
            return Some(first.1);
        }
        if time >= last.0 {
            return Some(last.1);
        }
        let idx = self.0.partition_point(|(t, _)| *t <= time);
        let (t0, v0) = self.0[idx - 1];
        let (t1, v1) = self.0[idx];
        if t1 == t0 {
            return Some(v1);
        }
        Some(v0 + (v1 - v0) * (time - t0) / (t1 - t0))
    }

    /// Times at which the waveform crosses `threshold` in the given
    /// direction, interpolated between neighbouring points.
    pub fn crossings(&self, threshold: f64, edge: Edge) -> Vec<f64> {
        self.0
            .windows(2)
            .filter_map(|pair| {
                let (t0, v0) = pair[0];
                let (t1, v1) = pair[1];
                let rising = v0 < threshold && v1 >= threshold;
                let falling = v0 > threshold && v1 <= threshold;
                let hit = match edge {
                    Edge::Rising => rising,
                    Edge::Falling => falling,
                    Edge::Both => rising || falling,
                };
                if !hit {
                    return None;
                }
                Some(t0 + (threshold - v0) * (t1 - t0) / (v1 - v0))
            })
            .collect()
    }
}

/// Edge times in seconds.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Timestamps(pub Vec<f64>);

impl Timestamps {
    pub fn times(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Payload {
    Samples(SampleTrace),
    Waveform(Waveform),
    Timestamps(Timestamps),
}

impl Payload {
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Samples(_) => PayloadKind::Samples,
            Payload::Waveform(_) => PayloadKind::Waveform,
            Payload::Timestamps(_) => PayloadKind::Timestamps,
        }
    }

    /// Number of elements, used for log summaries.
    pub fn len(&self) -> usize {
        match self {
            Payload::Samples(s) => s.len(),
            Payload::Waveform(w) => w.len(),
            Payload::Timestamps(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single named, typed slot owned by one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Port {
    name: String,
    direction: Direction,
    kind: PayloadKind,
    data: Option<Payload>,
}

impl Port {
    pub fn input(name: &str, kind: PayloadKind) -> Self {
        Self {
            name: name.to_string(),
            direction: Direction::Input,
            kind,
            data: None,
        }
    }

    pub fn output(name: &str, kind: PayloadKind) -> Self {
        Self {
            name: name.to_string(),
            direction: Direction::Output,
            kind,
            data: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn kind(&self) -> PayloadKind {
        self.kind
    }

    pub fn data(&self) -> Option<&Payload> {
        self.data.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.data.is_some()
    }

    /// Checks that `payload` matches the declared kind without storing it.
    pub fn accepts(&self, payload: &Payload) -> Result<(), ConfigurationError> {
        if payload.kind() != self.kind {
            return Err(ConfigurationError::PayloadKindMismatch {
                port: self.name.clone(),
                expected: self.kind,
                found: payload.kind(),
            });
        }
        Ok(())
    }

    pub fn set(&mut self, payload: Payload) -> Result<(), ConfigurationError> {
        self.accepts(&payload)?;
        self.data = Some(payload);
        Ok(())
    }

    pub fn samples(&self) -> Option<&SampleTrace> {
        match &self.data {
            Some(Payload::Samples(s)) => Some(s),
            _ => None,
        }
    }

    pub fn waveform(&self) -> Option<&Waveform> {
        match &self.data {
            Some(Payload::Waveform(w)) => Some(w),
            _ => None,
        }
    }

    pub fn timestamps(&self) -> Option<&Timestamps> {
        match &self.data {
            Some(Payload::Timestamps(t)) => Some(t),
            _ => None,
        }
    }
}
