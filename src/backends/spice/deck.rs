// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Netlist deck rendering, one dialect per engine family.
//!
//! Eldo and ngspice share SPICE syntax (`.option`, `.param`, `pwl(...)`);
//! Spectre uses its native language. Ngspice has no waveform database the
//! process engine can read, so its deck writes every probed node to
//! `<node>.wave` from a `.control` block.

use std::collections::BTreeMap;
use std::fmt::Write;

use super::SpiceSettings;
use crate::io::Waveform;
use crate::model::SpiceFamily;

/// File extension of a deck for `family`.
pub fn extension(family: SpiceFamily) -> &'static str {
    match family {
        SpiceFamily::Eldo | SpiceFamily::Ngspice => "cir",
        SpiceFamily::Spectre => "scs",
    }
}

/// Renders the complete deck.
pub fn render(
    family: SpiceFamily,
    entity: &str,
    settings: &SpiceSettings,
    stimuli: &BTreeMap<String, Waveform>,
    probes: &[String],
    tstop: f64,
) -> String {
    let tstep = settings.transient.tstep.unwrap_or(tstop / 1000.0);
    let mut deck = String::new();
    match family {
        SpiceFamily::Spectre => {
            render_spectre(&mut deck, entity, settings, stimuli, probes, tstep, tstop)
        }
        SpiceFamily::Eldo | SpiceFamily::Ngspice => {
            render_spice(&mut deck, family, entity, settings, stimuli, probes, tstep, tstop)
        }
    }
    deck
}

#[allow(clippy::too_many_arguments)]
fn render_spice(
    deck: &mut String,
    family: SpiceFamily,
    entity: &str,
    settings: &SpiceSettings,
    stimuli: &BTreeMap<String, Waveform>,
    probes: &[String],
    tstep: f64,
    tstop: f64,
) {
    let _ = writeln!(deck, "* Testbench for {} ({})", entity, family);

    let option = if family == SpiceFamily::Eldo { ".option" } else { ".options" };
    for (name, value) in &settings.options {
        let _ = writeln!(deck, "{} {}={}", option, name, value);
    }
    for (name, value) in &settings.parameters {
        let _ = writeln!(deck, ".param {}={}", name, value);
    }
    if let Some(corner) = &settings.corner {
        let _ = writeln!(deck, ".temp {}", corner.temp);
        if let Some(lib) = &settings.lib_file {
            let _ = writeln!(deck, ".lib '{}' {}", lib.display(), corner.corner);
        }
    }

    for source in &settings.dc_sources {
        let _ = writeln!(
            deck,
            "V{} {} {} {}",
            source.name, source.pos, source.neg, source.value
        );
    }
    for (node, wave) in stimuli {
        let _ = writeln!(deck, "V{} {} 0 pwl({})", node, node, points(wave));
    }
    for line in &settings.misc {
        let _ = writeln!(deck, "{}", line);
    }

    let currents = settings
        .dc_sources
        .iter()
        .filter(|s| s.extract)
        .map(|s| (s.name.as_str(), format!("i(V{})", s.name)));

    match family {
        SpiceFamily::Eldo => {
            let _ = writeln!(deck, ".tran {:e} {:e}", tstep, tstop);
            if !settings.transient.plotlist.is_empty() {
                let _ = writeln!(deck, ".plot tran {}", settings.transient.plotlist.join(" "));
            }
            let mut printed: Vec<String> = probes.iter().map(|p| format!("v({})", p)).collect();
            printed.extend(currents.map(|(_, expr)| expr));
            if !printed.is_empty() {
                let _ = writeln!(deck, ".print tran {}", printed.join(" "));
            }
        }
        _ => {
            let _ = writeln!(deck, ".control");
            let _ = writeln!(deck, "set num_threads={}", settings.nproc);
            let _ = writeln!(deck, "tran {:e} {:e}", tstep, tstop);
            for probe in probes {
                let _ = writeln!(deck, "wrdata {}.wave v({})", probe, probe);
            }
            for (name, expr) in currents {
                let _ = writeln!(deck, "wrdata {}_current.wave {}", name, expr);
            }
            let _ = writeln!(deck, ".endc");
        }
    }
    let _ = writeln!(deck, ".end");
}

fn render_spectre(
    deck: &mut String,
    entity: &str,
    settings: &SpiceSettings,
    stimuli: &BTreeMap<String, Waveform>,
    probes: &[String],
    tstep: f64,
    tstop: f64,
) {
    let _ = writeln!(deck, "// Testbench for {} (spectre)", entity);
    let _ = writeln!(deck, "simulator lang=spectre");

    if !settings.options.is_empty() {
        let options = settings
            .options
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(deck, "simOptions options {}", options);
    }
    if !settings.parameters.is_empty() {
        let parameters = settings
            .parameters
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(deck, "parameters {}", parameters);
    }
    if let Some(corner) = &settings.corner {
        if let Some(lib) = &settings.lib_file {
            let _ = writeln!(deck, "include \"{}\" section={}", lib.display(), corner.corner);
        }
        let _ = writeln!(deck, "tempOption options temp={}", corner.temp);
    }

    for source in &settings.dc_sources {
        let _ = writeln!(
            deck,
            "V{} ({} {}) vsource type=dc dc={}",
            source.name, source.pos, source.neg, source.value
        );
    }
    for (node, wave) in stimuli {
        let _ = writeln!(deck, "V{} ({} 0) vsource type=pwl wave=[{}]", node, node, points(wave));
    }
    for line in &settings.misc {
        let _ = writeln!(deck, "{}", line);
    }

    let _ = writeln!(deck, "tran tran step={:e} stop={:e}", tstep, tstop);
    let mut saved: Vec<String> = probes.to_vec();
    for node in &settings.transient.plotlist {
        if !saved.contains(node) {
            saved.push(node.clone());
        }
    }
    saved.extend(
        settings
            .dc_sources
            .iter()
            .filter(|s| s.extract)
            .map(|s| format!("V{}:p", s.name)),
    );
    if !saved.is_empty() {
        let _ = writeln!(deck, "save {}", saved.join(" "));
    }
}

fn points(wave: &Waveform) -> String {
    wave.points()
        .iter()
        .map(|(t, v)| format!("{:e} {}", t, v))
        .collect::<Vec<_>>()
        .join(" ")
}
