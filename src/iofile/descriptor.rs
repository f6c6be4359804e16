// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use serde::Serialize;

use super::condition::IoCondition;
use crate::errors::ConfigurationError;
use crate::io::{Bundle, Direction, PayloadKind};
use crate::observability::messages::{backend::IoFileDeclared, StructuredLog};

/// Sampling discipline of an io file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IoType {
    /// Discretely indexed values at a fixed rate
    Sample,
    /// Continuous waveform with irregular time steps
    Event,
    /// Extracted threshold-crossing times
    Time,
}

impl IoType {
    /// Payload kind a port must hold to be externalized with this io type.
    pub fn payload_kind(self) -> PayloadKind {
        match self {
            IoType::Sample => PayloadKind::Samples,
            IoType::Event => PayloadKind::Waveform,
            IoType::Time => PayloadKind::Timestamps,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IoType::Sample => "sample",
            IoType::Event => "event",
            IoType::Time => "time",
        }
    }
}

impl fmt::Display for IoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Integer encoding RTL testbenches use when reading or writing a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    #[default]
    Int,
    Sint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Rising,
    Falling,
    Both,
}

/// Value format of a sample io file exchanged with an analog engine. `Dec`
/// decides logic levels against the trigger threshold, `Volt` keeps the raw
/// voltage at each sampling instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IoFormat {
    #[default]
    Dec,
    Volt,
}

/// Which engine class a testbench feeds. Event and time io files only make
/// sense for analog engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineClass {
    Rtl,
    Analog,
}

/// Electrical rendering of a sample-type analog input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Electrical {
    /// Rate at which the samples change [Hz]
    pub rs: f64,
    /// Voltage of a logic one
    pub vhi: f64,
    /// Voltage of a logic zero
    pub vlo: f64,
    /// Rise time [s]
    pub trise: f64,
    /// Fall time [s]
    pub tfall: f64,
}

/// Resampling rule turning a continuous output into discrete samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trigger {
    /// Node whose crossings mark the sampling instants
    pub node: String,
    /// Threshold for both the trigger and the decimal decision
    pub vth: f64,
    pub edge: Edge,
}

/// Describes how one port is externalized to, or read back from, a backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IoFile {
    name: String,
    direction: Direction,
    iotype: IoType,
    ionames: Vec<String>,
    datatype: DataType,
    electrical: Option<Electrical>,
    trigger: Option<Trigger>,
    threshold: Option<(f64, Edge)>,
    ioformat: IoFormat,
    condition: IoCondition,
}

impl IoFile {
    /// Sample-type io file for the port `name`, mapped onto the simulated
    /// signals `ionames` (one column per signal).
    pub fn sample(name: &str, direction: Direction, ionames: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            direction,
            iotype: IoType::Sample,
            ionames: ionames.iter().map(|s| s.to_string()).collect(),
            datatype: DataType::default(),
            electrical: None,
            trigger: None,
            threshold: None,
            ioformat: IoFormat::default(),
            condition: IoCondition::new(),
        }
    }

    /// Continuous waveform of `node` read back into the port `name`.
    pub fn event(name: &str, node: &str) -> Self {
        Self {
            iotype: IoType::Event,
            ..Self::sample(name, Direction::Output, &[node])
        }
    }

    /// Crossing times of `node` through `vth` read back into the port `name`.
    pub fn time(name: &str, node: &str, vth: f64, edge: Edge) -> Self {
        Self {
            iotype: IoType::Time,
            threshold: Some((vth, edge)),
            ..Self::sample(name, Direction::Output, &[node])
        }
    }

    pub fn with_datatype(mut self, datatype: DataType) -> Self {
        self.datatype = datatype;
        self
    }

    pub fn with_electrical(mut self, electrical: Electrical) -> Self {
        self.electrical = Some(electrical);
        self
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    pub fn with_ioformat(mut self, ioformat: IoFormat) -> Self {
        self.ioformat = ioformat;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn iotype(&self) -> IoType {
        self.iotype
    }

    pub fn ionames(&self) -> &[String] {
        &self.ionames
    }

    /// First simulated signal, the node analog io files attach to.
    pub fn node(&self) -> &str {
        self.ionames.first().map(String::as_str).unwrap_or(&self.name)
    }

    pub fn datatype(&self) -> DataType {
        self.datatype
    }

    pub fn electrical(&self) -> Option<&Electrical> {
        self.electrical.as_ref()
    }

    pub fn trigger(&self) -> Option<&Trigger> {
        self.trigger.as_ref()
    }

    pub fn threshold(&self) -> Option<(f64, Edge)> {
        self.threshold
    }

    pub fn ioformat(&self) -> IoFormat {
        self.ioformat
    }

    /// Payload kind the backing port must hold. Sample outputs read back in
    /// volts keep their sampling instants, so they land in a waveform.
    pub fn payload_kind(&self) -> PayloadKind {
        match (self.iotype, self.ioformat) {
            (IoType::Sample, IoFormat::Volt) => PayloadKind::Waveform,
            (iotype, _) => iotype.payload_kind(),
        }
    }

    pub fn condition(&self) -> &IoCondition {
        &self.condition
    }

    pub fn condition_mut(&mut self) -> &mut IoCondition {
        &mut self.condition
    }
}

/// The io files of one testbench, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IoFileBundle {
    files: Vec<IoFile>,
}

impl IoFileBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `file` after checking it against the entity's ports and the
    /// engine class it will be handed to.
    pub fn declare(
        &mut self,
        file: IoFile,
        ios: &Bundle,
        class: EngineClass,
    ) -> Result<(), ConfigurationError> {
        if self.get(file.name()).is_some() {
            return Err(ConfigurationError::DuplicateIoFile(file.name().to_string()));
        }
        let port_kind = ios
            .kind_of(file.name())
            .ok_or_else(|| ConfigurationError::UnknownPort(file.name().to_string()))?;
        if class == EngineClass::Rtl && file.iotype() != IoType::Sample {
            return Err(ConfigurationError::AnalogOnlyIoType {
                iofile: file.name().to_string(),
                iotype: file.iotype(),
            });
        }
        if port_kind != file.payload_kind() {
            return Err(ConfigurationError::PayloadKindMismatch {
                port: file.name().to_string(),
                expected: port_kind,
                found: file.payload_kind(),
            });
        }

        IoFileDeclared {
            iofile: file.name(),
            direction: match file.direction() {
                Direction::Input => "input",
                Direction::Output => "output",
            },
            iotype: file.iotype().as_str(),
        }
        .log();

        self.files.push(file);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&IoFile> {
        self.files.iter().find(|f| f.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut IoFile, ConfigurationError> {
        self.files
            .iter_mut()
            .find(|f| f.name() == name)
            .ok_or_else(|| ConfigurationError::UnknownIoFile(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &IoFile> {
        self.files.iter()
    }

    pub fn inputs(&self) -> impl Iterator<Item = &IoFile> {
        self.files
            .iter()
            .filter(|f| f.direction() == Direction::Input)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &IoFile> {
        self.files
            .iter()
            .filter(|f| f.direction() == Direction::Output)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Port;

    fn ios() -> Bundle {
        let mut ios = Bundle::new();
        ios.declare(Port::input("A", PayloadKind::Samples)).unwrap();
        ios.declare(Port::output("Z", PayloadKind::Samples)).unwrap();
        ios.declare(Port::output("Z_RISE", PayloadKind::Timestamps)).unwrap();
        ios
    }

    #[test]
    fn test_rejects_io_file_without_port() {
        let mut files = IoFileBundle::new();
        let err = files
            .declare(IoFile::sample("B", Direction::Input, &["B"]), &ios(), EngineClass::Rtl)
            .unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownPort("B".to_string()));
    }

    #[test]
    fn test_rejects_analog_io_types_on_rtl() {
        let mut files = IoFileBundle::new();
        let err = files
            .declare(IoFile::time("Z_RISE", "Z", 0.5, Edge::Rising), &ios(), EngineClass::Rtl)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::AnalogOnlyIoType {
                iofile: "Z_RISE".to_string(),
                iotype: IoType::Time,
            }
        );
        assert!(files.is_empty());
    }

    #[test]
    fn test_rejects_io_type_that_does_not_match_port_kind() {
        let mut files = IoFileBundle::new();
        let err = files
            .declare(IoFile::event("Z", "Z"), &ios(), EngineClass::Analog)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::PayloadKindMismatch {
                port: "Z".to_string(),
                expected: PayloadKind::Samples,
                found: PayloadKind::Waveform,
            }
        );
    }

    #[test]
    fn test_volt_sample_outputs_need_waveform_ports() {
        let mut ios = ios();
        ios.declare(Port::output("Z_VOLT", PayloadKind::Waveform)).unwrap();
        let mut files = IoFileBundle::new();
        let volt = IoFile::sample("Z_VOLT", Direction::Output, &["Z"]).with_ioformat(IoFormat::Volt);
        assert_eq!(volt.payload_kind(), PayloadKind::Waveform);
        files.declare(volt, &ios, EngineClass::Analog).unwrap();
        assert!(files
            .declare(
                IoFile::sample("Z", Direction::Output, &["Z"]).with_ioformat(IoFormat::Volt),
                &ios,
                EngineClass::Analog
            )
            .is_err());
    }

    #[test]
    fn test_rejects_duplicate_io_files() {
        let mut files = IoFileBundle::new();
        let a = IoFile::sample("A", Direction::Input, &["A"]);
        files.declare(a.clone(), &ios(), EngineClass::Rtl).unwrap();
        assert_eq!(
            files.declare(a, &ios(), EngineClass::Rtl).unwrap_err(),
            ConfigurationError::DuplicateIoFile("A".to_string())
        );
    }

    #[test]
    fn test_splits_inputs_and_outputs() {
        let mut files = IoFileBundle::new();
        files
            .declare(IoFile::sample("A", Direction::Input, &["A"]), &ios(), EngineClass::Analog)
            .unwrap();
        files
            .declare(IoFile::time("Z_RISE", "Z", 0.5, Edge::Rising), &ios(), EngineClass::Analog)
            .unwrap();
        assert_eq!(files.inputs().count(), 1);
        assert_eq!(files.outputs().next().unwrap().node(), "Z");
        assert!(files.get_mut("Q").is_err());
    }
}
