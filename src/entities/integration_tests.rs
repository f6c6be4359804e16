use std::sync::Arc;

use crate::backends::stub::{IdealAnalogInverter, RegisteredInverter};
use crate::backends::EngineSet;
use crate::config::{Config, EngineConfig};
use crate::entities::{Controller, Inverter, SignalSource};
use crate::io::Port;
use crate::model::{Model, SpiceFamily};
use crate::parallel::{run_all, ExecutionMode};
use crate::traits::entity::Entity;

/// End-to-end runs wiring a signal source and a controller into inverters.
#[cfg(test)]
mod tests {
    use super::*;

    fn stimulus(length: usize, seed: u64) -> (Vec<i64>, Vec<i64>) {
        let mut source = SignalSource::new().with_length(length).with_seed(seed);
        source.run().unwrap();
        (
            source.data().unwrap().values().to_vec(),
            source.clk().unwrap().values().to_vec(),
        )
    }

    fn started_controller() -> Controller {
        let mut controller = Controller::new();
        controller.reset();
        controller.start_datafeed();
        controller
    }

    #[tokio::test]
    async fn test_every_model_agrees_once_aligned() {
        let (a, clk) = stimulus(64, 11);
        let controller = started_controller();
        let engines = EngineSet::new()
            .with_rtl(Arc::new(RegisteredInverter::new()))
            .with_spice(SpiceFamily::Eldo, Arc::new(IdealAnalogInverter::new(1.0)))
            .with_spice(SpiceFamily::Spectre, Arc::new(IdealAnalogInverter::new(1.0)))
            .with_spice(SpiceFamily::Ngspice, Arc::new(IdealAnalogInverter::new(1.0)));

        let mut inverters = Vec::new();
        for model in Model::ALL {
            let mut inverter = Inverter::with_parent(&controller)
                .unwrap()
                .with_engines(engines.clone())
                .with_model(model);
            inverter.connect_control(controller.control_write());
            inverter.set_input("A", a.clone()).unwrap();
            inverter.set_input("CLK", clk.clone()).unwrap();
            inverters.push(inverter);
        }

        let completed = run_all(inverters).await;
        assert!(completed.failures.is_empty());
        assert_eq!(completed.results.len(), Model::ALL.len());

        let expected: Vec<i64> = a.iter().map(|x| 1 - x).collect();
        for result in &completed.results {
            let z = result.ios.get("Z").and_then(Port::samples).unwrap();
            assert_eq!(z.latency(), result.model.latency(), "{}", result.model);
            assert_eq!(
                z.aligned(),
                &expected[..expected.len() - z.latency()],
                "{}",
                result.model
            );
        }
    }

    #[tokio::test]
    async fn test_running_one_model_leaves_another_entity_alone() {
        let controller = started_controller();
        let mut native = Inverter::new();
        native.set_input("A", vec![1, 1, 0]).unwrap();
        native.run(ExecutionMode::Local).await.unwrap();
        let before = native.ios().clone();

        let mut rtl = Inverter::new()
            .with_engines(EngineSet::new().with_rtl(Arc::new(RegisteredInverter::new())))
            .with_model(Model::Vhdl);
        rtl.connect_control(controller.control_write());
        rtl.set_input("A", vec![0, 0, 1]).unwrap();
        rtl.run(ExecutionMode::Local).await.unwrap();

        assert_eq!(native.ios(), &before);
        assert_eq!(rtl.z().unwrap().values(), &[0, 1, 1]);
    }

    #[tokio::test]
    async fn test_control_changes_are_visible_to_connected_entities() {
        let mut controller = Controller::new();
        let engine = Arc::new(RegisteredInverter::new());
        let mut inverter = Inverter::new()
            .with_engines(EngineSet::new().with_rtl(engine.clone()))
            .with_model(Model::Sv);
        inverter.connect_control(controller.control_write());
        inverter.set_input("A", vec![1, 0]).unwrap();

        // Without initdone the simulated design never releases data.
        assert!(inverter.run(ExecutionMode::Local).await.is_err());
        assert!(inverter.z().is_none());

        controller.reset();
        controller.start_datafeed();
        inverter.run(ExecutionMode::Local).await.unwrap();
        assert_eq!(inverter.z().unwrap().aligned(), &[0]);
        assert!(engine.jobs()[1].control.is_asserted("initdone"));
    }

    #[tokio::test]
    async fn test_configured_properties_reach_every_model() {
        let cfg = Config {
            rs: 200e6,
            vdd: 1.2,
            ..Config::default()
        };
        let (a, clk) = stimulus(8, 5);
        let mut inverter = Inverter::new()
            .with_engines(
                EngineSet::new().with_spice(SpiceFamily::Ngspice, Arc::new(IdealAnalogInverter::new(1.2))),
            )
            .with_model(Model::Ngspice);
        inverter.apply_config(&cfg).unwrap();
        assert_eq!(inverter.property("vdd"), Some(1.2));
        inverter.set_input("A", a.clone()).unwrap();
        inverter.set_input("CLK", clk).unwrap();
        inverter.run(ExecutionMode::Local).await.unwrap();

        let expected: Vec<i64> = a.iter().map(|x| 1 - x).collect();
        assert_eq!(inverter.z().unwrap().values(), expected.as_slice());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_engine_from_configuration() {
        let mut rtl = EngineConfig::new("sh");
        rtl.args = vec![
            "-c".to_string(),
            "awk 'BEGIN{print 0} {if (NR>1) print 1-prev; prev=$1}' A.txt > Z.txt".to_string(),
        ];
        let cfg = Config {
            models: vec![Model::Native, Model::Sv],
            rtl: Some(rtl),
            ..Config::default()
        };

        let controller = started_controller();
        let engines = EngineSet::from_config(&cfg);
        let mut inverter = Inverter::new().with_engines(engines).with_model(Model::Sv);
        inverter.connect_control(controller.control_write());
        inverter.set_input("A", vec![1, 0, 0, 1]).unwrap();
        inverter.run(ExecutionMode::Local).await.unwrap();

        let z = inverter.z().unwrap();
        assert_eq!(z.values(), &[0, 0, 1, 1]);
        assert_eq!(z.aligned(), &[0, 1, 1]);
    }
}
