// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Plumbing shared by the engines that run an external command.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tempfile::TempDir;
use tokio::process::Command;

use crate::config::EngineConfig;
use crate::errors::BackendError;
use crate::observability::messages::backend::{EngineFinished, EngineInvoked, IoFilesPreserved};
use crate::observability::messages::StructuredLog;

/// Creates a fresh work directory for one run, under the configured parent
/// when there is one.
pub(crate) fn create_work_dir(config: &EngineConfig, entity: &str) -> Result<TempDir, BackendError> {
    let prefix = format!("{}_", entity);
    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix);
    let dir = match &config.work_dir {
        Some(parent) => {
            std::fs::create_dir_all(parent)?;
            builder.tempdir_in(parent)?
        }
        None => builder.tempdir()?,
    };
    Ok(dir)
}

/// Removes the work directory unless the io files are to be preserved.
/// Returns the kept path.
pub(crate) fn finish_work_dir(engine: &str, dir: TempDir, preserve: bool) -> Option<PathBuf> {
    if !preserve {
        return None;
    }
    let path = dir.keep();
    IoFilesPreserved {
        engine,
        work_dir: &path,
    }
    .log();
    Some(path)
}

/// Runs the configured command inside `work_dir`, replacing `{key}`
/// placeholders in its arguments.
pub(crate) async fn run_command(
    engine: &str,
    config: &EngineConfig,
    work_dir: &Path,
    substitutions: &[(&str, String)],
) -> Result<(), BackendError> {
    let args: Vec<String> = config
        .args
        .iter()
        .map(|arg| substitute(arg, substitutions))
        .collect();
    let command_line = std::iter::once(config.command.as_str())
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");

    EngineInvoked {
        engine,
        command: &command_line,
        work_dir,
    }
    .log();

    let started = Instant::now();
    let output = Command::new(&config.command)
        .args(&args)
        .current_dir(work_dir)
        .output()
        .await
        .map_err(|source| BackendError::Launch {
            engine: engine.to_string(),
            source,
        })?;

    EngineFinished {
        engine,
        success: output.status.success(),
        duration: started.elapsed(),
    }
    .log();

    if !output.status.success() {
        return Err(BackendError::NonZeroExit {
            engine: engine.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

/// Reads an artifact the engine was expected to write. A missing file is
/// `Ok(None)` so the decoder can name the io file it belonged to.
pub(crate) async fn read_artifact(path: &Path) -> Result<Option<String>, BackendError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn substitute(arg: &str, substitutions: &[(&str, String)]) -> String {
    substitutions
        .iter()
        .fold(arg.to_string(), |acc, (key, value)| {
            acc.replace(&format!("{{{}}}", key), value)
        })
}
