// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashSet;

use crate::config::Config;
use crate::errors::ValidationError;
use crate::model::{Backend, Model};

/// Checks a loaded configuration, collecting every problem instead of
/// stopping at the first.
pub fn validate_config(cfg: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("rs", cfg.rs),
        ("vdd", cfg.vdd),
        ("length", cfg.length as f64),
        ("spice.nproc", cfg.spice.nproc as f64),
    ] {
        if !(value.is_finite() && value > 0.0) {
            errors.push(ValidationError::NonPositive { field, value });
        }
    }

    if cfg.models.is_empty() {
        errors.push(ValidationError::NoModels);
    }

    let mut seen = HashSet::new();
    for &model in &cfg.models {
        if !seen.insert(model) {
            errors.push(ValidationError::DuplicateModel { model });
            continue;
        }
        if !engine_configured(cfg, model) {
            errors.push(ValidationError::MissingEngine { model });
        }
    }

    if let Some(rtl) = &cfg.rtl {
        if rtl.command.trim().is_empty() {
            errors.push(ValidationError::EmptyCommand {
                engine: "rtl".to_string(),
            });
        }
    }
    let mut families: Vec<_> = cfg.spice.engines.iter().collect();
    families.sort_by_key(|(family, _)| **family);
    for (family, engine) in families {
        if engine.command.trim().is_empty() {
            errors.push(ValidationError::EmptyCommand {
                engine: family.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn engine_configured(cfg: &Config, model: Model) -> bool {
    match model.backend() {
        Backend::Native => true,
        Backend::Rtl(_) => cfg.rtl.is_some(),
        Backend::Spice(family) => cfg.spice.engines.contains_key(&family),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::model::SpiceFamily;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_models_without_engines_are_reported() {
        let cfg = Config {
            models: vec![Model::Native, Model::Vhdl, Model::Eldo],
            ..Config::default()
        };
        let errors = validate_config(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::MissingEngine { model: Model::Vhdl },
                ValidationError::MissingEngine { model: Model::Eldo },
            ]
        );
    }

    #[test]
    fn test_duplicates_and_empty_commands_are_reported() {
        let mut cfg = Config {
            models: vec![Model::Sv, Model::Sv],
            rtl: Some(EngineConfig::new(" ")),
            ..Config::default()
        };
        cfg.spice
            .engines
            .insert(SpiceFamily::Ngspice, EngineConfig::new("ngspice"));

        let errors = validate_config(&cfg).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateModel { model: Model::Sv }));
        assert!(errors.contains(&ValidationError::EmptyCommand {
            engine: "rtl".to_string()
        }));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_non_positive_values_are_reported() {
        let cfg = Config {
            vdd: -1.0,
            length: 0,
            ..Config::default()
        };
        let errors = validate_config(&cfg).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(
            errors[0],
            ValidationError::NonPositive { field: "vdd", .. }
        ));
    }
}
