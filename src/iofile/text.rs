// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Plain-text io file formats exchanged with process engines.
//!
//! Sample files hold one row per sample with tab-separated integer columns.
//! Waveform files hold `time value` pairs, one per line; extra columns are
//! ignored so `wrdata`-style dumps can be read directly. Blank lines and
//! lines starting with `#` or `*` are skipped in both.

use crate::errors::DecodeError;
use crate::io::Waveform;

pub fn render_rows(rows: &[Vec<i64>]) -> String {
    let mut out = String::new();
    for row in rows {
        let line = row
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("\t");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn parse_rows(text: &str) -> Result<Vec<Vec<i64>>, DecodeError> {
    data_lines(text)
        .map(|(line, content)| {
            content
                .split_whitespace()
                .map(|token| parse_int(line, token))
                .collect()
        })
        .collect()
}

/// Reads `time value` lines. Time must never decrease.
pub fn parse_waveform(text: &str) -> Result<Waveform, DecodeError> {
    let mut points: Vec<(f64, f64)> = Vec::new();
    for (line, content) in data_lines(text) {
        let mut tokens = content.split_whitespace();
        let t = parse_float(line, tokens.next().unwrap_or_default())?;
        let v = parse_float(line, tokens.next().unwrap_or_default())?;
        if matches!(points.last(), Some(&(previous, _)) if t < previous) {
            return Err(DecodeError::NonMonotonicTime { line, time: t });
        }
        points.push((t, v));
    }
    Ok(Waveform::new(points))
}

fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#') && !l.starts_with('*'))
}

// Simulators may print integer samples as `1.0`.
fn parse_int(line: usize, token: &str) -> Result<i64, DecodeError> {
    token
        .parse::<i64>()
        .or_else(|_| {
            token
                .parse::<f64>()
                .ok()
                .filter(|v| v.fract() == 0.0)
                .map(|v| v as i64)
                .ok_or(())
        })
        .map_err(|_| DecodeError::Parse {
            line,
            token: token.to_string(),
        })
}

fn parse_float(line: usize, token: &str) -> Result<f64, DecodeError> {
    token.parse::<f64>().map_err(|_| DecodeError::Parse {
        line,
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_rows_survive_rendering() {
        let rows = vec![vec![0, 1], vec![1, 1]];
        assert_eq!(render_rows(&rows), "0\t1\n1\t1\n");
        assert_eq!(parse_rows(&render_rows(&rows)).unwrap(), rows);
    }

    #[test]
    fn test_parse_rows_skips_comments_and_accepts_integral_floats() {
        let text = "# Z\n\n1.0\n0\n";
        assert_eq!(parse_rows(text).unwrap(), vec![vec![1], vec![0]]);
    }

    #[test]
    fn test_parse_rows_reports_line_of_bad_token() {
        let err = parse_rows("1\nx\n").unwrap_err();
        assert_eq!(
            err,
            DecodeError::Parse {
                line: 2,
                token: "x".to_string()
            }
        );
    }

    #[test]
    fn test_parse_waveform_takes_first_two_columns() {
        let text = "* ngspice wrdata\n0.000000e+00 1.0 0.0\n1.0e-9 0.5 0.0\n";
        let wave = parse_waveform(text).unwrap();
        assert_eq!(wave.points(), &[(0.0, 1.0), (1e-9, 0.5)]);
    }

    #[test]
    fn test_parse_waveform_rejects_missing_value() {
        assert!(matches!(
            parse_waveform("0.0\n"),
            Err(DecodeError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_parse_waveform_rejects_time_going_backwards() {
        let err = parse_waveform("0 0\n3e-9 1\n1e-9 0\n2e-9 1\n").unwrap_err();
        assert_eq!(err, DecodeError::NonMonotonicTime { line: 3, time: 1e-9 });
        // Repeated time points mark ideal steps and are kept.
        assert_eq!(parse_waveform("0 0\n1e-9 0\n1e-9 1\n").unwrap().len(), 3);
    }
}
