// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Closed set of simulation models an entity can be dispatched to.
//!
//! The model selector used to be a free-form tag; here it is an enum so every
//! dispatch site is matched exhaustively, and an unknown tag is rejected when
//! it is parsed instead of silently falling through to the native model.
//!
//! | tag                          | backend                    | sample latency |
//! |------------------------------|----------------------------|----------------|
//! | `native` (alias `py`)        | in-process complement      | 0              |
//! | `sv`                         | RTL, SystemVerilog         | 1              |
//! | `vhdl`                       | RTL, VHDL                  | 1              |
//! | `eldo`, `spectre`, `ngspice` | SPICE-class analog         | 0              |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigurationError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Model {
    #[default]
    Native,
    Sv,
    Vhdl,
    Eldo,
    Spectre,
    Ngspice,
}

/// Hardware description language of an RTL model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HdlLanguage {
    SystemVerilog,
    Vhdl,
}

/// SPICE-class engine family. Deck syntax differs per family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpiceFamily {
    Eldo,
    Spectre,
    Ngspice,
}

/// Engine class a model is executed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Native,
    Rtl(HdlLanguage),
    Spice(SpiceFamily),
}

impl Model {
    pub const ALL: [Model; 6] = [
        Model::Native,
        Model::Sv,
        Model::Vhdl,
        Model::Eldo,
        Model::Spectre,
        Model::Ngspice,
    ];

    pub fn backend(self) -> Backend {
        match self {
            Model::Native => Backend::Native,
            Model::Sv => Backend::Rtl(HdlLanguage::SystemVerilog),
            Model::Vhdl => Backend::Rtl(HdlLanguage::Vhdl),
            Model::Eldo => Backend::Spice(SpiceFamily::Eldo),
            Model::Spectre => Backend::Spice(SpiceFamily::Spectre),
            Model::Ngspice => Backend::Spice(SpiceFamily::Ngspice),
        }
    }

    /// Fixed number of samples the decoded output trails the input by.
    pub fn latency(self) -> usize {
        match self.backend() {
            Backend::Rtl(_) => 1,
            Backend::Native | Backend::Spice(_) => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Model::Native => "native",
            Model::Sv => "sv",
            Model::Vhdl => "vhdl",
            Model::Eldo => "eldo",
            Model::Spectre => "spectre",
            Model::Ngspice => "ngspice",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = ConfigurationError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.trim().to_lowercase().as_str() {
            "native" | "py" => Ok(Model::Native),
            "sv" => Ok(Model::Sv),
            "vhdl" => Ok(Model::Vhdl),
            "eldo" => Ok(Model::Eldo),
            "spectre" => Ok(Model::Spectre),
            "ngspice" => Ok(Model::Ngspice),
            _ => Err(ConfigurationError::UnsupportedModel(tag.to_string())),
        }
    }
}

impl TryFrom<String> for Model {
    type Error = ConfigurationError;

    fn try_from(tag: String) -> Result<Self, Self::Error> {
        tag.parse()
    }
}

impl From<Model> for String {
    fn from(model: Model) -> Self {
        model.as_str().to_string()
    }
}

impl HdlLanguage {
    pub fn as_str(self) -> &'static str {
        match self {
            HdlLanguage::SystemVerilog => "sv",
            HdlLanguage::Vhdl => "vhdl",
        }
    }
}

impl SpiceFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            SpiceFamily::Eldo => "eldo",
            SpiceFamily::Spectre => "spectre",
            SpiceFamily::Ngspice => "ngspice",
        }
    }

    pub fn model(self) -> Model {
        match self {
            SpiceFamily::Eldo => Model::Eldo,
            SpiceFamily::Spectre => Model::Spectre,
            SpiceFamily::Ngspice => Model::Ngspice,
        }
    }
}

impl fmt::Display for SpiceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_is_native() {
        assert_eq!(Model::default(), Model::Native);
        assert_eq!(Model::default().latency(), 0);
    }

    #[test]
    fn test_parses_known_tags_and_legacy_alias() {
        assert_eq!("py".parse::<Model>().unwrap(), Model::Native);
        assert_eq!("native".parse::<Model>().unwrap(), Model::Native);
        assert_eq!("SV".parse::<Model>().unwrap(), Model::Sv);
        assert_eq!("ngspice".parse::<Model>().unwrap(), Model::Ngspice);
    }

    #[test]
    fn test_unknown_tag_is_a_configuration_error() {
        let err = "verilator".parse::<Model>().unwrap_err();
        assert_eq!(err, ConfigurationError::UnsupportedModel("verilator".to_string()));
    }

    #[test]
    fn test_latency_is_one_only_for_rtl_models() {
        for model in Model::ALL {
            let expected = if matches!(model, Model::Sv | Model::Vhdl) { 1 } else { 0 };
            assert_eq!(model.latency(), expected, "latency of {}", model);
        }
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for model in Model::ALL {
            assert_eq!(model.to_string().parse::<Model>().unwrap(), model);
        }
    }

    #[test]
    fn test_deserializes_from_yaml_and_rejects_unknown() {
        let models: Vec<Model> = serde_yaml::from_str("[py, vhdl, spectre]").unwrap();
        assert_eq!(models, vec![Model::Native, Model::Vhdl, Model::Spectre]);

        let err = serde_yaml::from_str::<Vec<Model>>("[xcelium]").unwrap_err();
        assert!(err.to_string().contains("xcelium"));
    }
}
