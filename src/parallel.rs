// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Parallel execution of entities.
//!
//! An entity run in [`ExecutionMode::Parallel`] pushes its committed output
//! ports onto a [`ResultChannel`], exactly once per successful run. The
//! channel is an unbounded multi-producer FIFO; [`ResultCollector`] drains it
//! until every sender has been dropped. Workers are not ordered relative to
//! each other.

use serde::Serialize;
use tokio::sync::mpsc;

use crate::entities::Inverter;
use crate::errors::{EntityError, EntityResult};
use crate::io::Bundle;
use crate::model::Model;
use crate::traits::entity::Entity;

/// How an entity run hands back its results.
#[derive(Debug, Clone, Default)]
pub enum ExecutionMode {
    /// Results stay on the entity's own ports.
    #[default]
    Local,
    /// Results are committed and also published on the channel.
    Parallel(ResultChannel),
}

/// Output ports of one successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    pub entity: String,
    pub model: Model,
    pub ios: Bundle,
}

/// Producer half of the result channel. Cloned into every worker.
#[derive(Debug, Clone)]
pub struct ResultChannel {
    sender: mpsc::UnboundedSender<RunResult>,
}

impl ResultChannel {
    pub fn publish(&self, result: RunResult) -> EntityResult<()> {
        let entity = result.entity.clone();
        self.sender
            .send(result)
            .map_err(|_| EntityError::ChannelClosed(entity))
    }
}

/// Consumer half of the result channel.
#[derive(Debug)]
pub struct ResultCollector {
    receiver: mpsc::UnboundedReceiver<RunResult>,
}

impl ResultCollector {
    /// Next result, or `None` once every sender is gone and the queue is empty.
    pub async fn recv(&mut self) -> Option<RunResult> {
        self.receiver.recv().await
    }

    /// Collects results until every sender has been dropped.
    pub async fn drain(&mut self) -> Vec<RunResult> {
        let mut results = Vec::new();
        while let Some(result) = self.receiver.recv().await {
            results.push(result);
        }
        results
    }
}

pub fn result_channel() -> (ResultChannel, ResultCollector) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (ResultChannel { sender }, ResultCollector { receiver })
}

/// Outcome of [`run_all`].
pub struct Completed {
    /// Entities whose task finished, with their committed ports
    pub entities: Vec<Inverter>,
    /// Everything published on the result channel
    pub results: Vec<RunResult>,
    /// Entities that failed, by name and model
    pub failures: Vec<(String, Model, EntityError)>,
}

/// Runs every entity on its own tokio task in parallel mode and collects the
/// published results.
///
/// A failing entity does not stop the others. An entity whose task panicked
/// is lost; it shows up in `failures` as [`EntityError::WorkerPanicked`].
pub async fn run_all(inverters: Vec<Inverter>) -> Completed {
    let (channel, mut collector) = result_channel();

    let mut tasks = Vec::with_capacity(inverters.len());
    for mut inverter in inverters {
        let channel = channel.clone();
        let label = (inverter.name().to_string(), inverter.model());
        let task = tokio::spawn(async move {
            let outcome = inverter.run(ExecutionMode::Parallel(channel)).await;
            (inverter, outcome)
        });
        tasks.push((label, task));
    }
    // Workers hold the remaining senders; the collector ends when they finish.
    drop(channel);

    let results = collector.drain().await;

    let mut entities = Vec::with_capacity(tasks.len());
    let mut failures = Vec::new();
    for ((name, model), task) in tasks {
        match task.await {
            Ok((inverter, Ok(()))) => entities.push(inverter),
            Ok((inverter, Err(e))) => {
                failures.push((name, model, e));
                entities.push(inverter);
            }
            Err(_) => failures.push((name.clone(), model, EntityError::WorkerPanicked(name))),
        }
    }

    Completed {
        entities,
        results,
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{FailingEngine, RegisteredInverter};
    use crate::backends::EngineSet;
    use crate::entities::Controller;
    use crate::io::Port;
    use std::sync::Arc;

    fn inverter(a: Vec<i64>) -> Inverter {
        let mut inverter = Inverter::new();
        inverter.set_input("A", a).unwrap();
        inverter
    }

    #[tokio::test]
    async fn test_every_worker_publishes_exactly_once() {
        // Worker `i` inverts `i + 1` ones, so each result is identifiable by length.
        let inverters: Vec<Inverter> = (0..4).map(|i| inverter(vec![1; i + 1])).collect();
        let completed = run_all(inverters).await;

        assert_eq!(completed.entities.len(), 4);
        assert!(completed.failures.is_empty());
        let mut lengths: Vec<usize> = completed
            .results
            .iter()
            .map(|result| {
                let z = result.ios.get("Z").and_then(Port::samples).unwrap();
                assert!(z.values().iter().all(|&v| v == 0));
                z.len()
            })
            .collect();
        lengths.sort_unstable();
        assert_eq!(lengths, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_mixed_models_publish_their_own_outputs() {
        let mut controller = Controller::new();
        controller.reset();
        controller.start_datafeed();
        let engines = EngineSet::new().with_rtl(Arc::new(RegisteredInverter::new()));

        let mut rtl = inverter(vec![1, 0, 1, 1]).with_engines(engines).with_model(Model::Sv);
        rtl.connect_control(controller.control_write());
        let completed = run_all(vec![inverter(vec![1, 0, 1, 1]), rtl]).await;

        assert_eq!(completed.results.len(), 2);
        let mut latencies: Vec<(Model, usize)> = completed
            .results
            .iter()
            .map(|r| {
                let z = r.ios.get("Z").and_then(Port::samples).unwrap();
                (r.model, z.latency())
            })
            .collect();
        latencies.sort();
        assert_eq!(latencies, vec![(Model::Native, 0), (Model::Sv, 1)]);
    }

    #[tokio::test]
    async fn test_failures_are_reported_without_publishing() {
        let failing = inverter(vec![0, 1])
            .with_engines(EngineSet::new().with_rtl(Arc::new(FailingEngine)))
            .with_model(Model::Vhdl);
        let completed = run_all(vec![inverter(vec![0]), failing]).await;

        assert_eq!(completed.results.len(), 1);
        assert_eq!(completed.failures.len(), 1);
        let (name, model, _) = &completed.failures[0];
        assert_eq!(name, "inverter");
        assert_eq!(*model, Model::Vhdl);
        assert_eq!(completed.entities.len(), 2);
    }

    #[tokio::test]
    async fn test_collector_ends_when_senders_are_gone() {
        let (channel, mut collector) = result_channel();
        let worker = channel.clone();
        drop(channel);
        worker
            .publish(RunResult {
                entity: "inverter".to_string(),
                model: Model::Native,
                ios: Bundle::new(),
            })
            .unwrap();
        drop(worker);

        assert!(collector.recv().await.is_some());
        assert!(collector.recv().await.is_none());
    }

    #[test]
    fn test_publishing_to_a_dropped_collector_fails() {
        let (channel, collector) = result_channel();
        drop(collector);
        let err = channel
            .publish(RunResult {
                entity: "inverter".to_string(),
                model: Model::Native,
                ios: Bundle::new(),
            })
            .unwrap_err();
        assert!(matches!(err, EntityError::ChannelClosed(name) if name == "inverter"));
    }
}
