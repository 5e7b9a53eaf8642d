//! Coupling decay driver for a short-baseline beam.
//!
//! Reads a ν_μ/ν̄_μ beam flux table, describes sterile decay with a single
//! scalar (or pseudoscalar) coupling between the heaviest state and m3,
//! evolves through constant-density matter, and writes the ν_μ flux before and
//! after propagation.
//!
//! Positional arguments `MASS THETA24 COUPLING` are used when at least three
//! are given (extra values are ignored); otherwise every parameter is 1.0.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use nudec_core::constants::Units;
use nudec_core::types::Basis;
use nudec_decay::CouplingType;
use nudec_flux::{read_flux_table, state_from_table};
use nudec_sim::presets::BEAM_FLUX_FILE;
use nudec_sim::{CouplingRun, RecordingEngine, Simulation};
use tracing::{info, warn};

use crate::config::DriverPaths;

/// nudec-ubflux: sterile-neutrino decay in a beam, driven by a coupling.
#[derive(Parser, Debug)]
#[command(
    name = "nudec-ubflux",
    version,
    about = "Evolve a beam ν_μ flux with a sterile state decaying through a coupling"
)]
struct Args {
    /// MASS (eV), THETA24 (rad), COUPLING; used only if at least three are given.
    #[arg(value_name = "PARAM", allow_negative_numbers = true, num_args = 0..)]
    params: Vec<f64>,

    /// Use a pseudoscalar instead of a scalar coupling.
    #[arg(long)]
    pseudoscalar: bool,

    /// Directory holding the input flux table (overrides NUDEC_FLUX_DIR).
    #[arg(long)]
    flux_dir: Option<PathBuf>,

    /// Directory receiving the output files (overrides NUDEC_OUTPUT_DIR).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Write the run configuration as JSON to this file.
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, default_value = "text")]
    log_format: String,
}

impl Args {
    fn run(&self) -> CouplingRun {
        let mut run = CouplingRun::default();
        if let [mass, theta24, coupling, extra @ ..] = self.params.as_slice() {
            run.mass = *mass;
            run.theta24 = *theta24;
            run.coupling = *coupling;
            if !extra.is_empty() {
                warn!(ignored = ?extra, "extra positional values after MASS THETA24 COUPLING");
            }
        } else if !self.params.is_empty() {
            warn!(given = self.params.len(), "expected MASS THETA24 COUPLING; using defaults");
        }
        if self.pseudoscalar {
            run.coupling_type = CouplingType::Pseudoscalar;
        }
        run
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, &args.log_format);
    info!("nudec-ubflux v{}", env!("CARGO_PKG_VERSION"));

    let paths = DriverPaths::from_env().with_overrides(args.flux_dir.clone(), args.output_dir.clone());
    let run = args.run();
    info!(
        mass = run.mass,
        theta24 = run.theta24,
        coupling = run.coupling,
        flux_dir = %paths.flux_dir.display(),
        output_dir = %paths.output_dir.display(),
        "starting"
    );

    let units = Units::natural();
    let setup = run.setup(&units).context("failed to assemble run")?;
    if let Some(path) = &args.manifest {
        setup
            .write_manifest(path)
            .with_context(|| format!("failed to write manifest {}", path.display()))?;
    }

    let flux_path = paths.flux_dir.join(BEAM_FLUX_FILE);
    let table = read_flux_table(&flux_path)
        .with_context(|| format!("failed to read flux table {}", flux_path.display()))?;

    let nodes = setup.energy_nodes.len();
    let n = setup.config.num_neutrinos;
    let neutrino_type = setup.config.neutrino_type;
    let state = state_from_table(&table, nodes, neutrino_type, n, &run.flux_columns())
        .context("flux table does not cover the energy grid")?;

    let engine = RecordingEngine::new(setup.energy_nodes.clone(), n, neutrino_type);
    let mut sim = Simulation::new(setup, engine).context("failed to configure engine")?;
    sim.set_initial_state(&state, Basis::Flavor)
        .context("failed to set initial state")?;

    let layout = run.layout();
    let initial = run.initial_name().path_in(&paths.output_dir);
    sim.write_flux(&layout, &initial)
        .with_context(|| format!("failed to write {}", initial.display()))?;

    sim.evolve().context("evolution failed")?;

    let final_path = run.final_name().path_in(&paths.output_dir);
    sim.write_final(&layout, &final_path)
        .with_context(|| format!("failed to write {}", final_path.display()))?;
    info!(path = %final_path.display(), "done");
    Ok(())
}

/// Initialize tracing subscriber with the given log level and output format.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_params_override_defaults() {
        let args = Args::try_parse_from(["nudec-ubflux", "2.5", "-0.1", "0.3"]).unwrap();
        let run = args.run();
        assert_eq!((run.mass, run.theta24, run.coupling), (2.5, -0.1, 0.3));
        assert_eq!(run.coupling_type, CouplingType::Scalar);
    }

    #[test]
    fn extra_params_are_ignored() {
        let args = Args::try_parse_from(["nudec-ubflux", "2.5", "0.1", "0.3", "7"]).unwrap();
        let run = args.run();
        assert_eq!((run.mass, run.theta24, run.coupling), (2.5, 0.1, 0.3));
    }

    #[test]
    fn partial_params_fall_back_to_defaults() {
        let args = Args::try_parse_from(["nudec-ubflux", "2.5", "0.1"]).unwrap();
        assert_eq!(args.run(), CouplingRun::default());
    }

    #[test]
    fn pseudoscalar_flag() {
        let args = Args::try_parse_from(["nudec-ubflux", "--pseudoscalar"]).unwrap();
        assert_eq!(args.run().coupling_type, CouplingType::Pseudoscalar);
    }
}
