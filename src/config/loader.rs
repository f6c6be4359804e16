// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{DEFAULT_LENGTH, DEFAULT_NPROC, DEFAULT_RS, DEFAULT_VDD};
use crate::errors::LoadError;
use crate::model::{Model, SpiceFamily};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Self-test configuration.
///
/// Holds the entity properties, the list of models to run and how to launch
/// the external engines those models need. It is typically loaded from a
/// YAML file; every key is optional.
///
/// # Example
/// ```yaml
/// rs: 100.0e6
/// vdd: 1.0
/// length: 256
/// models: [native, sv, ngspice]
/// rtl:
///   command: ./run_rtl.sh
///   args: ["{workdir}"]
///   preserve_iofiles: true
/// spice:
///   nproc: 2
///   options:
///     eps: 1e-6
///   corner:
///     corner: top_tt
///     temp: 27
///   engines:
///     ngspice:
///       command: ngspice
///       args: ["-b", "{deck}"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_rs")]
    pub rs: f64,
    #[serde(default = "default_vdd")]
    pub vdd: f64,
    #[serde(default = "default_length")]
    pub length: usize,
    /// Seed for the stimulus generator; random when absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_models")]
    pub models: Vec<Model>,
    #[serde(default)]
    pub rtl: Option<EngineConfig>,
    #[serde(default)]
    pub spice: SpiceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rs: DEFAULT_RS,
            vdd: DEFAULT_VDD,
            length: DEFAULT_LENGTH,
            seed: None,
            models: default_models(),
            rtl: None,
            spice: SpiceConfig::default(),
        }
    }
}

/// How to launch one external engine.
///
/// `args` may contain the placeholders `{workdir}`, `{deck}` and `{nproc}`,
/// substituted right before launch.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EngineConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Parent directory for per-run work directories; the system temp dir
    /// when absent
    #[serde(default)]
    pub work_dir: Option<PathBuf>,
    /// Keep the work directory and its io files after the run
    #[serde(default)]
    pub preserve_iofiles: bool,
    /// Ask the engine for an interactive session (RTL waveform viewer)
    #[serde(default)]
    pub interactive: bool,
}

impl EngineConfig {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            args: Vec::new(),
            work_dir: None,
            preserve_iofiles: false,
            interactive: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpiceConfig {
    #[serde(default)]
    pub engines: HashMap<SpiceFamily, EngineConfig>,
    #[serde(default = "default_nproc")]
    pub nproc: usize,
    /// Simulator options merged over the entity defaults
    #[serde(default)]
    pub options: BTreeMap<String, serde_yaml::Value>,
    /// Netlist parameters merged over the entity defaults
    #[serde(default)]
    pub parameters: BTreeMap<String, serde_yaml::Value>,
    #[serde(default)]
    pub corner: Option<CornerConfig>,
    /// Model library included with the corner as its section
    #[serde(default)]
    pub lib_file: Option<PathBuf>,
}

impl Default for SpiceConfig {
    fn default() -> Self {
        Self {
            engines: HashMap::new(),
            nproc: DEFAULT_NPROC,
            options: BTreeMap::new(),
            parameters: BTreeMap::new(),
            corner: None,
            lib_file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CornerConfig {
    pub corner: String,
    pub temp: f64,
}

/// Renders a free-form option value the way it is written into a deck.
pub fn yaml_scalar(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

fn default_rs() -> f64 {
    DEFAULT_RS
}

fn default_vdd() -> f64 {
    DEFAULT_VDD
}

fn default_length() -> usize {
    DEFAULT_LENGTH
}

fn default_nproc() -> usize {
    DEFAULT_NPROC
}

fn default_models() -> Vec<Model> {
    vec![Model::Native]
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, LoadError> {
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, LoadError> {
    let cfg = load_config(path)?;
    crate::config::validate_config(&cfg).map_err(LoadError::Invalid)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
rs: 200.0e6
models: [py, sv, spectre]
rtl:
  command: ./sim.sh
  args: ["{workdir}"]
  preserve_iofiles: true
spice:
  nproc: 4
  options:
    eps: "1e-6"
    reltol: 0.001
  corner:
    corner: top_ff
    temp: -40
  engines:
    spectre:
      command: spectre
      args: ["{deck}"]
"#;

        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.rs, 200.0e6);
        assert_eq!(cfg.vdd, DEFAULT_VDD);
        assert_eq!(cfg.models, vec![Model::Native, Model::Sv, Model::Spectre]);
        assert!(cfg.rtl.as_ref().unwrap().preserve_iofiles);
        assert_eq!(cfg.spice.nproc, 4);
        assert_eq!(yaml_scalar(&cfg.spice.options["eps"]), "1e-6");
        assert_eq!(yaml_scalar(&cfg.spice.options["reltol"]), "0.001");
        assert_eq!(cfg.spice.corner.unwrap().temp, -40.0);
        assert_eq!(cfg.spice.engines[&SpiceFamily::Spectre].args, vec!["{deck}"]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg.rs, DEFAULT_RS);
        assert_eq!(cfg.length, DEFAULT_LENGTH);
        assert_eq!(cfg.models, vec![Model::Native]);
        assert_eq!(cfg.spice.nproc, DEFAULT_NPROC);
        assert!(cfg.rtl.is_none());
    }

    #[test]
    fn test_unknown_model_tag_is_a_parse_error() {
        let result: Result<Config, _> = serde_yaml::from_str("models: [verilog]");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_and_validate_reports_every_problem() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "rs: 0\nmodels: [sv, ngspice]").unwrap();

        match load_and_validate_config(file.path()) {
            Err(LoadError::Invalid(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected validation failure, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "models: [native]\nlength: 16").unwrap();

        let cfg = load_and_validate_config(file.path()).unwrap();
        assert_eq!(cfg.length, 16);
    }
}
