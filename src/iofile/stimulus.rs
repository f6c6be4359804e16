// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Rendering of discrete stimulus into the forms engines consume.

use super::descriptor::Electrical;
use crate::io::Waveform;

/// Piecewise-linear source for a sample sequence.
///
/// Sample `i` occupies `[i/rs, (i+1)/rs)`. A change of level starts at the
/// sample boundary and completes after `trise` or `tfall`. Any non-zero sample
/// is driven at `vhi`, zero at `vlo`.
pub fn pwl_from_samples(samples: &[i64], electrical: &Electrical) -> Waveform {
    let level = |s: i64| if s != 0 { electrical.vhi } else { electrical.vlo };
    let period = 1.0 / electrical.rs;

    let Some(&first) = samples.first() else {
        return Waveform::default();
    };

    let mut points = vec![(0.0, level(first))];
    for (i, pair) in samples.windows(2).enumerate() {
        let (prev, next) = (level(pair[0]), level(pair[1]));
        if prev == next {
            continue;
        }
        let t = (i + 1) as f64 * period;
        let slope = if next > prev {
            electrical.trise
        } else {
            electrical.tfall
        };
        points.push((t, prev));
        points.push((t + slope, next));
    }
    points.push((samples.len() as f64 * period, level(samples[samples.len() - 1])));
    Waveform::new(points)
}

/// Transposes per-signal columns into per-sample rows.
pub fn rows_from_columns(columns: &[&[i64]]) -> Vec<Vec<i64>> {
    let len = columns.iter().map(|c| c.len()).min().unwrap_or(0);
    (0..len)
        .map(|i| columns.iter().map(|c| c[i]).collect())
        .collect()
}
