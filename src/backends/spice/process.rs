// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::Path;

use async_trait::async_trait;

use super::{deck, SpiceArtifacts, SpiceJob};
use crate::backends::process::{create_work_dir, finish_work_dir, read_artifact, run_command};
use crate::config::EngineConfig;
use crate::errors::BackendError;
use crate::iofile::text::parse_waveform;
use crate::model::SpiceFamily;
use crate::traits::SpiceEngine;

/// SPICE engine backed by an external simulator command.
///
/// The deck is written to `<entity>.cir` (`.scs` for Spectre) in a fresh
/// work directory. Arguments may use `{workdir}`, `{deck}` and `{nproc}`.
/// The command must leave a `<node>.wave` file of `time value` lines for
/// every probed node; the ngspice deck does this itself, wrappers around
/// Eldo or Spectre convert their waveform databases.
pub struct ProcessSpiceEngine {
    family: SpiceFamily,
    config: EngineConfig,
}

impl ProcessSpiceEngine {
    pub fn new(family: SpiceFamily, config: EngineConfig) -> Self {
        Self { family, config }
    }

    async fn simulate_in(&self, dir: &Path, job: &SpiceJob) -> Result<SpiceArtifacts, BackendError> {
        let deck_path = dir.join(format!("{}.{}", job.entity, deck::extension(job.family)));
        tokio::fs::write(&deck_path, &job.deck).await?;

        let substitutions = [
            ("workdir", dir.display().to_string()),
            ("deck", deck_path.display().to_string()),
            ("nproc", job.nproc.to_string()),
        ];
        run_command(self.name(), &self.config, dir, &substitutions).await?;

        let mut artifacts = SpiceArtifacts::default();
        for node in &job.probes {
            let artifact = format!("{}.wave", node);
            let Some(text) = read_artifact(&dir.join(&artifact)).await? else {
                continue;
            };
            let wave = parse_waveform(&text).map_err(|e| BackendError::MalformedArtifact {
                engine: self.name().to_string(),
                artifact,
                reason: e.to_string(),
            })?;
            artifacts.nodes.insert(node.clone(), wave);
        }
        Ok(artifacts)
    }
}

#[async_trait]
impl SpiceEngine for ProcessSpiceEngine {
    async fn simulate(&self, job: &SpiceJob) -> Result<SpiceArtifacts, BackendError> {
        let dir = create_work_dir(&self.config, &job.entity)?;
        let result = self.simulate_in(dir.path(), job).await;
        finish_work_dir(self.name(), dir, self.config.preserve_iofiles);
        result
    }

    fn name(&self) -> &'static str {
        self.family.as_str()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn job() -> SpiceJob {
        SpiceJob {
            entity: "inverter".to_string(),
            family: SpiceFamily::Ngspice,
            deck: "* deck\n.end\n".to_string(),
            stimuli: BTreeMap::new(),
            probes: vec!["Z".to_string(), "CLK".to_string()],
            nproc: 2,
            tstop: 1e-8,
        }
    }

    fn script_engine(script: &str) -> ProcessSpiceEngine {
        let mut config = EngineConfig::new("sh");
        config.args = vec!["-c".to_string(), script.to_string(), "sh".to_string(), "{deck}".to_string()];
        ProcessSpiceEngine::new(SpiceFamily::Ngspice, config)
    }

    #[tokio::test]
    async fn test_reads_wave_files_of_probed_nodes() {
        let engine = script_engine(
            "test -f \"$1\" && printf '0 0\\n1e-9 1 extra\\n' > Z.wave",
        );
        let artifacts = engine.simulate(&job()).await.unwrap();
        assert_eq!(artifacts.nodes.len(), 1);
        assert_eq!(artifacts.nodes["Z"].points(), &[(0.0, 0.0), (1e-9, 1.0)]);
        assert_eq!(engine.name(), "ngspice");
    }

    #[tokio::test]
    async fn test_unreadable_wave_is_malformed() {
        let engine = script_engine("echo 'time value' > CLK.wave");
        assert!(matches!(
            engine.simulate(&job()).await,
            Err(BackendError::MalformedArtifact { .. })
        ));
    }

    #[tokio::test]
    async fn test_out_of_order_wave_is_malformed() {
        let engine = script_engine("printf '0 0\\n3e-9 1\\n1e-9 0\\n' > Z.wave");
        match engine.simulate(&job()).await {
            Err(BackendError::MalformedArtifact { artifact, reason, .. }) => {
                assert_eq!(artifact, "Z.wave");
                assert!(reason.contains("Line 3"), "{}", reason);
            }
            other => panic!("expected a malformed artifact, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_preserved_work_dir_keeps_the_deck() {
        let base = tempfile::tempdir().unwrap();
        let mut engine = script_engine("true");
        engine.config.work_dir = Some(base.path().to_path_buf());
        engine.config.preserve_iofiles = true;
        engine.simulate(&job()).await.unwrap();

        let kept: Vec<_> = std::fs::read_dir(base.path()).unwrap().collect();
        assert_eq!(kept.len(), 1);
        let dir = kept[0].as_ref().unwrap().path();
        assert!(dir.join("inverter.cir").exists());
    }
}
