// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::consts::{DEFAULT_LENGTH, DEFAULT_RS};
use crate::errors::{ConfigurationError, EntityResult};
use crate::io::{Bundle, Payload, PayloadKind, Port, SampleTrace};
use crate::model::Model;
use crate::traits::entity::{positive, Entity};

/// Stimulus generator for self-tests: `length` random bits on `data` and a
/// clock at twice the data rate on `clk`.
pub struct SignalSource {
    name: String,
    rs: f64,
    length: usize,
    seed: Option<u64>,
    model: Model,
    ios: Bundle,
}

impl SignalSource {
    pub fn new() -> Self {
        let mut ios = Bundle::new();
        for port in ["data", "clk"] {
            // Names are distinct, declaration cannot fail.
            let _ = ios.declare(Port::output(port, PayloadKind::Samples));
        }
        Self {
            name: "signal_source".to_string(),
            rs: DEFAULT_RS,
            length: DEFAULT_LENGTH,
            seed: None,
            model: Model::Native,
            ios,
        }
    }

    pub fn with_parent(parent: &dyn Entity) -> Result<Self, ConfigurationError> {
        let mut source = Self::new();
        source.copy_propval(parent)?;
        Ok(source)
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    /// Fixes the generator seed so runs are reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn set_model(&mut self, tag: &str) -> Result<(), ConfigurationError> {
        self.model = tag.parse()?;
        Ok(())
    }

    pub fn ios(&self) -> &Bundle {
        &self.ios
    }

    pub fn run(&mut self) -> EntityResult<()> {
        if self.model != Model::Native {
            return Err(ConfigurationError::UnsupportedModel(self.model.to_string()).into());
        }
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let data: Vec<i64> = (0..self.length).map(|_| rng.gen_range(0..2)).collect();
        let clk: Vec<i64> = (0..2 * self.length).map(|i| (i % 2) as i64).collect();

        self.ios.commit(vec![
            ("data".to_string(), Payload::Samples(SampleTrace::new(data))),
            ("clk".to_string(), Payload::Samples(SampleTrace::new(clk))),
        ])?;
        Ok(())
    }

    pub fn data(&self) -> Option<&SampleTrace> {
        self.ios.get("data").and_then(Port::samples)
    }

    pub fn clk(&self) -> Option<&SampleTrace> {
        self.ios.get("clk").and_then(Port::samples)
    }
}

impl Default for SignalSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for SignalSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn proplist(&self) -> &'static [&'static str] {
        &["rs"]
    }

    fn property(&self, name: &str) -> Option<f64> {
        match name {
            "rs" => Some(self.rs),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: f64) -> Result<(), ConfigurationError> {
        match name {
            "rs" => {
                self.rs = positive(name, value)?;
                Ok(())
            }
            _ => Err(ConfigurationError::UnknownProperty(name.to_string())),
        }
    }
}
