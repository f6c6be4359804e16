// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Decoding of backend artifacts back into port payloads.
//!
//! Whatever the engine, a decoded sample output is an integer sequence at the
//! entity sample rate. Two deviations are allowed and tracked by the caller:
//! a fixed sample latency, and the value decoding applied here (bit-slice
//! recombination for RTL rows, thresholding for analog waveforms).

use super::descriptor::{Edge, Trigger};
use crate::errors::DecodeError;
use crate::io::{Timestamps, Waveform};

/// Takes the first column of every row.
pub fn first_column(port: &str, rows: &[Vec<i64>]) -> Result<Vec<i64>, DecodeError> {
    rows.iter()
        .enumerate()
        .map(|(row, values)| {
            values.first().copied().ok_or_else(|| DecodeError::EmptyRow {
                port: port.to_string(),
                row,
            })
        })
        .collect()
}

/// Sums bit-sliced columns into one value per row. Column `k` carries bit
/// `k`, least significant bit first. Every slice must be 0 or 1.
pub fn recombine_bit_slices(port: &str, rows: &[Vec<i64>]) -> Result<Vec<i64>, DecodeError> {
    rows.iter()
        .enumerate()
        .map(|(row, slices)| {
            if slices.is_empty() {
                return Err(DecodeError::EmptyRow {
                    port: port.to_string(),
                    row,
                });
            }
            if slices.len() > 63 {
                return Err(DecodeError::TooWide {
                    port: port.to_string(),
                    width: slices.len(),
                });
            }
            slices
                .iter()
                .enumerate()
                .map(|(bit, &slice)| match slice {
                    0 | 1 => Ok(slice << bit),
                    value => Err(DecodeError::NotABit {
                        port: port.to_string(),
                        row,
                        value,
                    }),
                })
                .sum::<Result<i64, DecodeError>>()
        })
        .collect()
}

/// Decimal value of `signal` at every `trigger` crossing: 1 above the
/// threshold, 0 otherwise. Samples between trigger edges are discarded.
pub fn sample_at_edges(signal: &Waveform, trigger_wave: &Waveform, trigger: &Trigger) -> Vec<i64> {
    trigger_wave
        .crossings(trigger.vth, trigger.edge)
        .into_iter()
        .filter_map(|t| signal.value_at(t))
        .map(|v| i64::from(v > trigger.vth))
        .collect()
}

/// Raw voltage of `signal` at every `trigger` crossing, keyed by the crossing
/// time.
pub fn voltages_at_edges(signal: &Waveform, trigger_wave: &Waveform, trigger: &Trigger) -> Waveform {
    Waveform::new(
        trigger_wave
            .crossings(trigger.vth, trigger.edge)
            .into_iter()
            .filter_map(|t| signal.value_at(t).map(|v| (t, v)))
            .collect(),
    )
}

/// Crossing times of `signal` through `vth`.
pub fn edge_times(signal: &Waveform, vth: f64, edge: Edge) -> Timestamps {
    Timestamps(signal.crossings(vth, edge))
}

/// Fails unless a decoded output has exactly `expected` samples.
pub fn expect_len(port: &str, expected: usize, found: usize) -> Result<(), DecodeError> {
    if expected != found {
        return Err(DecodeError::Cardinality {
            port: port.to_string(),
            expected,
            found,
        });
    }
    Ok(())
}
