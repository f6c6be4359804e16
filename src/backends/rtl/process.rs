// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt::Write as _;
use std::path::Path;

use async_trait::async_trait;

use super::{RtlArtifacts, RtlJob};
use crate::backends::process::{create_work_dir, finish_work_dir, read_artifact, run_command};
use crate::config::EngineConfig;
use crate::errors::BackendError;
use crate::iofile::text::{parse_rows, render_rows};
use crate::traits::RtlEngine;

/// RTL engine backed by an external simulator command.
///
/// Every run gets its own work directory holding:
/// - `<iofile>.txt` for each input, one tab-separated row per sample
/// - `control_write.txt` with `time reset initdone` rows
/// - `parameters.txt` with `name value` lines
/// - `conditions.txt` with `iofile condition` lines
/// - `interactive_control.do` when the engine is interactive
///
/// The command is expected to leave `<iofile>.txt` for each output behind.
/// Arguments may use `{workdir}` and `{language}`.
pub struct ProcessRtlEngine {
    config: EngineConfig,
}

impl ProcessRtlEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    async fn write_inputs(&self, dir: &Path, job: &RtlJob) -> Result<(), BackendError> {
        for (name, rows) in &job.inputs {
            tokio::fs::write(dir.join(format!("{}.txt", name)), render_rows(rows)).await?;
        }
        tokio::fs::write(dir.join("control_write.txt"), render_rows(&job.control.rows())).await?;

        let mut parameters = String::new();
        for (name, value) in &job.parameters {
            let _ = writeln!(parameters, "{}\t{}", name, value);
        }
        tokio::fs::write(dir.join("parameters.txt"), parameters).await?;

        let mut conditions = String::new();
        for file in job.iofiles.iter() {
            let _ = writeln!(conditions, "{}\t{}", file.name(), file.condition());
        }
        tokio::fs::write(dir.join("conditions.txt"), conditions).await?;

        if self.config.interactive {
            tokio::fs::write(dir.join("interactive_control.do"), &job.interactive_control).await?;
        }
        Ok(())
    }

    async fn read_outputs(&self, dir: &Path, job: &RtlJob) -> Result<RtlArtifacts, BackendError> {
        let mut artifacts = RtlArtifacts::default();
        for file in job.iofiles.outputs() {
            let artifact = format!("{}.txt", file.name());
            let Some(text) = read_artifact(&dir.join(&artifact)).await? else {
                continue;
            };
            let rows = parse_rows(&text).map_err(|e| BackendError::MalformedArtifact {
                engine: self.name().to_string(),
                artifact,
                reason: e.to_string(),
            })?;
            artifacts.outputs.insert(file.name().to_string(), rows);
        }
        Ok(artifacts)
    }

    async fn simulate_in(&self, dir: &Path, job: &RtlJob) -> Result<RtlArtifacts, BackendError> {
        self.write_inputs(dir, job).await?;
        let substitutions = [
            ("workdir", dir.display().to_string()),
            ("language", job.language.as_str().to_string()),
        ];
        run_command(self.name(), &self.config, dir, &substitutions).await?;
        self.read_outputs(dir, job).await
    }
}

#[async_trait]
impl RtlEngine for ProcessRtlEngine {
    async fn simulate(&self, job: &RtlJob) -> Result<RtlArtifacts, BackendError> {
        let dir = create_work_dir(&self.config, &job.entity)?;
        let result = self.simulate_in(dir.path(), job).await;
        finish_work_dir(self.name(), dir, self.config.preserve_iofiles);
        result
    }

    fn name(&self) -> &'static str {
        "rtl"
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::backends::rtl::RtlTestbench;
    use crate::entities::ControlSchedule;
    use crate::errors::ConfigurationError;
    use crate::io::{Bundle, Direction, Payload, PayloadKind, Port, SampleTrace};
    use crate::iofile::{DataType, IoFile, IoFileBundle};
    use crate::model::HdlLanguage;
    use crate::traits::IoConditionHook;

    struct NoHandshake;

    impl IoConditionHook for NoHandshake {
        fn define_io_conditions(&self, _: &mut IoFileBundle) -> Result<(), ConfigurationError> {
            Ok(())
        }
    }

    fn script_engine(script: &str) -> ProcessRtlEngine {
        let mut config = EngineConfig::new("sh");
        config.args = vec!["-c".to_string(), script.to_string()];
        ProcessRtlEngine::new(config)
    }

    fn ios() -> Bundle {
        let mut ios = Bundle::new();
        ios.declare(Port::input("A", PayloadKind::Samples)).unwrap();
        ios.declare(Port::output("Z", PayloadKind::Samples)).unwrap();
        ios.set("A", Payload::Samples(SampleTrace::new(vec![1, 0, 1])))
            .unwrap();
        ios
    }

    fn testbench(ios: &Bundle) -> RtlTestbench {
        let mut tb = RtlTestbench::new("inverter", HdlLanguage::SystemVerilog, 1);
        tb.iofile(
            IoFile::sample("A", Direction::Input, &["A"]).with_datatype(DataType::Sint),
            ios,
        )
        .unwrap();
        tb.iofile(
            IoFile::sample("Z", Direction::Output, &["Z"]).with_datatype(DataType::Sint),
            ios,
        )
        .unwrap();
        tb.parameter("g_Rs", 100e6);
        tb
    }

    #[tokio::test]
    async fn test_exchanges_rows_through_files() {
        let ios = ios();
        // Registered inverter in awk: emit 0, then the complement of every
        // sample but the last.
        let engine = script_engine(
            "test -s control_write.txt && grep -q g_Rs parameters.txt && \
             awk 'BEGIN{print 0} {if (NR>1) print 1-prev; prev=$1}' A.txt > Z.txt",
        );
        let results = testbench(&ios)
            .run(&NoHandshake, &ios, &ControlSchedule::default(), &engine)
            .await
            .unwrap();
        match &results[0].1 {
            Payload::Samples(z) => {
                assert_eq!(z.values(), &[0, 0, 1]);
                assert_eq!(z.aligned(), &[0, 1]);
            }
            other => panic!("unexpected payload {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_garbage_output_is_malformed() {
        let ios = ios();
        let engine = script_engine("echo 'x y' > Z.txt");
        let mut tb = testbench(&ios);
        let job = tb
            .prepare(&NoHandshake, &ios, &ControlSchedule::default())
            .unwrap();
        assert!(matches!(
            engine.simulate(&job).await,
            Err(BackendError::MalformedArtifact { .. })
        ));
    }

    #[tokio::test]
    async fn test_silent_engine_returns_no_rows() {
        let ios = ios();
        let engine = script_engine("true");
        let mut tb = testbench(&ios);
        let job = tb
            .prepare(&NoHandshake, &ios, &ControlSchedule::default())
            .unwrap();
        let artifacts = engine.simulate(&job).await.unwrap();
        assert!(artifacts.outputs.is_empty());
    }
}
