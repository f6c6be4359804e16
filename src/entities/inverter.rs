// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The inverter entity.
//!
//! One logical model, `Z = not A`, dispatched to whichever backend the
//! selected [`Model`] names. Every backend restores `Z` to integer samples
//! at the entity rate; RTL models report one sample of register latency,
//! analog models resample their output at the rising edges of a test clock.
//!
//! # Ports
//! | port      | direction | kind       | models            |
//! |-----------|-----------|------------|-------------------|
//! | `A`       | input     | samples    | all               |
//! | `Z`       | output    | samples    | all               |
//! | `CLK`     | input     | samples    | analog, at `2 rs` |
//! | `Z_ANA`   | output    | waveform   | analog            |
//! | `A_OUT`   | output    | waveform   | analog            |
//! | `Z_RISE`  | output    | timestamps | analog            |
//! | `A_DIG`   | output    | samples    | analog            |
//!
//! Analog output ports are declared by their first successful run.

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::Instrument;

use crate::backends::native;
use crate::backends::rtl::RtlTestbench;
use crate::backends::spice::{Corner, DcSource, SpiceSettings, SpiceTestbench};
use crate::backends::EngineSet;
use crate::config::consts::{DEFAULT_NPROC, DEFAULT_RS, DEFAULT_VDD};
use crate::config::{yaml_scalar, Config};
use crate::entities::ControlSchedule;
use crate::errors::{ConfigurationError, EntityError, EntityResult};
use crate::io::{Bundle, Direction, Payload, PayloadKind, Port, PortView, SampleTrace};
use crate::iofile::{DataType, Edge, Electrical, IoFile, IoFileBundle, Trigger};
use crate::model::{Backend, HdlLanguage, Model, SpiceFamily};
use crate::observability::messages::entity::{
    EntityInitialized, EntityRunCompleted, EntityRunFailed, EntityRunStarted, ResultPublished,
};
use crate::observability::messages::StructuredLog;
use crate::parallel::{ExecutionMode, RunResult};
use crate::traits::entity::{positive, Entity, IoConditionHook};

/// Edge timing of the analog stimulus, derived from `rs` and `vdd`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AnalogTiming {
    clk_edge: f64,
    a_edge: f64,
    vth: f64,
}

impl AnalogTiming {
    fn derive(rs: f64, vdd: f64) -> Self {
        Self {
            clk_edge: 1.0 / (8.0 * rs),
            a_edge: 1.0 / (4.0 * rs),
            vth: vdd / 2.0,
        }
    }
}

pub struct Inverter {
    name: String,
    rs: f64,
    vdd: f64,
    model: Model,
    ios: Bundle,
    control: Option<PortView<ControlSchedule>>,
    engines: EngineSet,
    analog: SpiceSettings,
    timing: AnalogTiming,
}

impl Inverter {
    pub fn new() -> Self {
        let mut ios = Bundle::new();
        for port in [
            Port::input("A", PayloadKind::Samples),
            Port::output("Z", PayloadKind::Samples),
            Port::input("CLK", PayloadKind::Samples),
        ] {
            // Names are distinct, declaration cannot fail.
            let _ = ios.declare(port);
        }

        let inverter = Self {
            name: "inverter".to_string(),
            rs: DEFAULT_RS,
            vdd: DEFAULT_VDD,
            model: Model::default(),
            ios,
            control: None,
            engines: EngineSet::new(),
            analog: default_analog_settings(),
            timing: AnalogTiming::derive(DEFAULT_RS, DEFAULT_VDD),
        };
        EntityInitialized {
            entity: &inverter.name,
            ports: inverter.ios.len(),
        }
        .log();
        inverter
    }

    /// Inverter taking `rs` from `parent`.
    pub fn with_parent(parent: &dyn Entity) -> Result<Self, ConfigurationError> {
        let mut inverter = Self::new();
        inverter.copy_propval(parent)?;
        inverter.init();
        Ok(inverter)
    }

    pub fn with_engines(mut self, engines: EngineSet) -> Self {
        self.engines = engines;
        self
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Re-derives internal state after properties change. Port payloads are
    /// left alone, so calling it twice is the same as calling it once.
    pub fn init(&mut self) {
        self.timing = AnalogTiming::derive(self.rs, self.vdd);
    }

    /// Applies entity properties and analog settings from a configuration.
    ///
    /// Nothing changes unless every property is valid.
    pub fn apply_config(&mut self, cfg: &Config) -> Result<(), ConfigurationError> {
        let rs = positive("rs", cfg.rs)?;
        let vdd = positive("vdd", cfg.vdd)?;
        self.rs = rs;
        self.vdd = vdd;
        self.analog.nproc = cfg.spice.nproc;
        for (name, value) in &cfg.spice.options {
            self.analog.options.insert(name.clone(), yaml_scalar(value));
        }
        for (name, value) in &cfg.spice.parameters {
            self.analog.parameters.insert(name.clone(), yaml_scalar(value));
        }
        if let Some(corner) = &cfg.spice.corner {
            self.analog.corner = Some(Corner {
                corner: corner.corner.clone(),
                temp: corner.temp,
            });
        }
        self.analog.lib_file = cfg.spice.lib_file.clone();
        self.init();
        Ok(())
    }

    /// Selects the model by tag. Unknown tags are rejected, the current model
    /// is kept.
    pub fn set_model(&mut self, tag: &str) -> Result<(), ConfigurationError> {
        self.model = tag.parse()?;
        Ok(())
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn rs(&self) -> f64 {
        self.rs
    }

    pub fn vdd(&self) -> f64 {
        self.vdd
    }

    /// Shares a controller's `control_write` port, read-only.
    pub fn connect_control(&mut self, control: PortView<ControlSchedule>) {
        self.control = Some(control);
    }

    pub fn ios(&self) -> &Bundle {
        &self.ios
    }

    /// Assigns integer samples to an input port.
    pub fn set_input(&mut self, port: &str, values: Vec<i64>) -> Result<(), ConfigurationError> {
        self.ios.set(port, Payload::Samples(SampleTrace::new(values)))
    }

    pub fn output(&self, port: &str) -> Option<&Port> {
        self.ios.get(port)
    }

    /// Decoded output samples.
    pub fn z(&self) -> Option<&SampleTrace> {
        self.ios.get("Z").and_then(Port::samples)
    }

    /// Runs the selected model and commits its outputs.
    ///
    /// Outputs are written all or nothing: on any error the ports keep the
    /// payloads they had before the call. In parallel mode the updated
    /// output ports are published once, after they are committed.
    pub async fn run(&mut self, mode: ExecutionMode) -> EntityResult<()> {
        let model = self.model.as_str();
        let started_msg = EntityRunStarted {
            entity: &self.name,
            model,
            parallel: matches!(mode, ExecutionMode::Parallel(_)),
        };
        started_msg.log();
        let span = started_msg.span("inverter_run");
        let started = Instant::now();

        let outcome = match self.execute().instrument(span).await {
            Ok(results) => {
                let outputs = results.len();
                self.ios
                    .commit(results)
                    .map(|_| outputs)
                    .map_err(EntityError::from)
            }
            Err(e) => Err(e),
        };
        let outcome = match (outcome, &mode) {
            (Ok(outputs), ExecutionMode::Parallel(channel)) => {
                let snapshot = self.ios.output_snapshot();
                let ports = snapshot.len();
                channel
                    .publish(RunResult {
                        entity: self.name.clone(),
                        model: self.model,
                        ios: snapshot,
                    })
                    .map(|_| {
                        ResultPublished {
                            entity: &self.name,
                            model,
                            ports,
                        }
                        .log();
                        outputs
                    })
            }
            (outcome, _) => outcome,
        };

        match outcome {
            Ok(outputs) => {
                EntityRunCompleted {
                    entity: &self.name,
                    model,
                    outputs,
                    duration: started.elapsed(),
                }
                .log();
                Ok(())
            }
            Err(e) => {
                EntityRunFailed {
                    entity: &self.name,
                    model,
                    error: &e,
                }
                .log();
                Err(e)
            }
        }
    }

    async fn execute(&self) -> EntityResult<Vec<(String, Payload)>> {
        match self.model.backend() {
            Backend::Native => {
                let a = self.input_samples("A")?;
                Ok(vec![("Z".to_string(), Payload::Samples(native::invert(a)))])
            }
            Backend::Rtl(language) => self.run_rtl(language).await,
            Backend::Spice(family) => self.run_spice(family).await,
        }
    }

    async fn run_rtl(&self, language: HdlLanguage) -> EntityResult<Vec<(String, Payload)>> {
        let engine = self.engines.rtl(self.model)?;
        let control = self
            .control
            .as_ref()
            .ok_or(ConfigurationError::MissingControl(self.model))?
            .snapshot();

        let datatype = match language {
            HdlLanguage::SystemVerilog => DataType::Sint,
            HdlLanguage::Vhdl => DataType::Int,
        };
        let mut tb = RtlTestbench::new(&self.name, language, self.model.latency());
        tb.iofile(
            IoFile::sample("A", Direction::Input, &["A"]).with_datatype(datatype),
            &self.ios,
        )?;
        tb.iofile(
            IoFile::sample("Z", Direction::Output, &["Z"]).with_datatype(datatype),
            &self.ios,
        )?;
        tb.parameter("g_Rs", self.rs);
        tb.interactive_control(&interactive_control(&self.name));

        tb.run(self, &self.ios, &control, engine.as_ref()).await
    }

    async fn run_spice(&self, family: SpiceFamily) -> EntityResult<Vec<(String, Payload)>> {
        let engine = self.engines.spice(family)?;
        let expected = self.input_samples("A")?.aligned().len();

        // Analog-only outputs live in a working copy until the run commits.
        let mut ios = self.ios.clone();
        for port in [
            Port::output("Z_ANA", PayloadKind::Waveform),
            Port::output("A_OUT", PayloadKind::Waveform),
            Port::output("Z_RISE", PayloadKind::Timestamps),
            Port::output("A_DIG", PayloadKind::Samples),
        ] {
            if !ios.contains(port.name()) {
                ios.declare(port)?;
            }
        }

        let timing = self.timing;
        let clock = Trigger {
            node: "CLK".to_string(),
            vth: timing.vth,
            edge: Edge::Rising,
        };
        let mut tb = SpiceTestbench::new(&self.name, family);
        tb.iofile(
            IoFile::sample("CLK", Direction::Input, &["CLK"]).with_electrical(Electrical {
                rs: 2.0 * self.rs,
                vhi: self.vdd,
                vlo: 0.0,
                trise: timing.clk_edge,
                tfall: timing.clk_edge,
            }),
            &ios,
        )?;
        tb.iofile(
            IoFile::sample("A", Direction::Input, &["A"]).with_electrical(Electrical {
                rs: self.rs,
                vhi: self.vdd,
                vlo: 0.0,
                trise: timing.a_edge,
                tfall: timing.a_edge,
            }),
            &ios,
        )?;
        tb.iofile(IoFile::event("Z_ANA", "Z"), &ios)?;
        tb.iofile(
            IoFile::sample("Z", Direction::Output, &["Z"]).with_trigger(clock.clone()),
            &ios,
        )?;
        tb.iofile(IoFile::event("A_OUT", "A"), &ios)?;
        tb.iofile(IoFile::time("Z_RISE", "Z", timing.vth, Edge::Rising), &ios)?;
        tb.iofile(
            IoFile::sample("A_DIG", Direction::Output, &["A"]).with_trigger(clock),
            &ios,
        )?;
        tb.expect_samples(expected);
        *tb.settings_mut() = self.analog_settings(family);

        tb.run(&ios, engine.as_ref()).await
    }

    fn analog_settings(&self, family: SpiceFamily) -> SpiceSettings {
        let mut settings = self.analog.clone();
        settings.dc_sources = vec![
            DcSource {
                name: "supply".to_string(),
                value: self.vdd,
                pos: "VDD".to_string(),
                neg: "VSS".to_string(),
                extract: true,
            },
            DcSource {
                name: "ground".to_string(),
                value: 0.0,
                pos: "VSS".to_string(),
                neg: "0".to_string(),
                extract: false,
            },
        ];
        let resistor = "Rtest VDD VSS 2000".to_string();
        settings.misc = match family {
            SpiceFamily::Spectre => vec![
                "simulator lang=spice".to_string(),
                resistor,
                "simulator lang=spectre".to_string(),
            ],
            SpiceFamily::Eldo | SpiceFamily::Ngspice => vec![resistor],
        };
        settings.transient.plotlist = match family {
            SpiceFamily::Eldo => vec!["v(A)".to_string(), "v(Z)".to_string()],
            SpiceFamily::Spectre => vec!["A".to_string(), "Z".to_string()],
            SpiceFamily::Ngspice => Vec::new(),
        };
        settings
    }

    fn input_samples(&self, port: &str) -> Result<&SampleTrace, ConfigurationError> {
        match self.ios.require(port)? {
            Payload::Samples(samples) => Ok(samples),
            other => Err(ConfigurationError::PayloadKindMismatch {
                port: port.to_string(),
                expected: PayloadKind::Samples,
                found: other.kind(),
            }),
        }
    }
}

impl Default for Inverter {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Inverter {
    fn name(&self) -> &str {
        &self.name
    }

    fn proplist(&self) -> &'static [&'static str] {
        &["rs"]
    }

    fn property(&self, name: &str) -> Option<f64> {
        match name {
            "rs" => Some(self.rs),
            "vdd" => Some(self.vdd),
            _ => None,
        }
    }

    fn set_property(&mut self, name: &str, value: f64) -> Result<(), ConfigurationError> {
        match name {
            "rs" => self.rs = positive(name, value)?,
            "vdd" => self.vdd = positive(name, value)?,
            _ => return Err(ConfigurationError::UnknownProperty(name.to_string())),
        }
        Ok(())
    }
}

impl IoConditionHook for Inverter {
    /// `A` is read once the controller raises `initdone`; `Z` is committed
    /// when the outputs are valid and `initdone` is up.
    fn define_io_conditions(&self, iofiles: &mut IoFileBundle) -> Result<(), ConfigurationError> {
        iofiles.get_mut("A")?.condition_mut().require("initdone");
        iofiles.get_mut("Z")?.condition_mut().append("&& initdone");
        Ok(())
    }
}

fn default_analog_settings() -> SpiceSettings {
    SpiceSettings {
        nproc: DEFAULT_NPROC,
        options: BTreeMap::from([("eps".to_string(), "1e-6".to_string())]),
        parameters: BTreeMap::from([("exampleparam".to_string(), "0".to_string())]),
        corner: Some(Corner {
            corner: "top_tt".to_string(),
            temp: 27.0,
        }),
        ..SpiceSettings::default()
    }
}

// Waveform viewer script replayed in interactive RTL sessions.
fn interactive_control(entity: &str) -> String {
    let tb = format!("sim/:tb_{}", entity);
    format!(
        "add wave -position insertpoint \\\n\
         {tb}:A \\\n\
         {tb}:initdone \\\n\
         {tb}:clock \\\n\
         {tb}:Z\n\
         run -all\n\
         wave zoom full\n",
        tb = tb
    )
}
