// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ConfigurationError;
use crate::iofile::IoFileBundle;
use crate::observability::messages::{entity::PropertyInherited, StructuredLog};

/// Common surface of every entity: a name and a set of numeric properties,
/// some of which are inherited from a parent at construction.
pub trait Entity {
    fn name(&self) -> &str;

    /// Names of the properties copied from a parent by [`Entity::copy_propval`].
    fn proplist(&self) -> &'static [&'static str] {
        &[]
    }

    fn property(&self, name: &str) -> Option<f64>;

    fn set_property(&mut self, name: &str, value: f64) -> Result<(), ConfigurationError>;

    /// Copies every property in [`Entity::proplist`] that the parent defines.
    fn copy_propval(&mut self, parent: &dyn Entity) -> Result<(), ConfigurationError> {
        for &name in self.proplist() {
            if let Some(value) = parent.property(name) {
                self.set_property(name, value)?;
                PropertyInherited {
                    entity: self.name(),
                    parent: parent.name(),
                    property: name,
                    value,
                }
                .log();
            }
        }
        Ok(())
    }
}

/// Hook the RTL testbench calls before stimulus is written, letting the
/// entity gate its io files on controller signals.
pub trait IoConditionHook {
    fn define_io_conditions(&self, iofiles: &mut IoFileBundle) -> Result<(), ConfigurationError>;
}

/// Validates a positive, finite property value.
pub fn positive(name: &str, value: f64) -> Result<f64, ConfigurationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigurationError::InvalidProperty {
            name: name.to_string(),
            value,
        })
    }
}
