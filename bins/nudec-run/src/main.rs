//! Partial-rates decay driver.
//!
//! Builds the four decay-rate matrices for a 3+1 model whose heaviest state
//! decays into every lighter one, configures the evolution engine for an
//! upgoing atmospheric track, evolves a pure ν_μ flux, and prints one line per
//! energy node: the energy in GeV, then the four neutrino and the four
//! antineutrino flavor fluxes.

use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::Parser;
use nudec_core::constants::Units;
use nudec_core::types::{Basis, NeutrinoType};
use nudec_flux::{pure_flavor_state, write_flux_file};
use nudec_sim::{PartialRatesRun, RecordingEngine, Simulation};
use tracing::info;

/// nudec-run: sterile-neutrino decay with explicit partial rates.
#[derive(Parser, Debug)]
#[command(
    name = "nudec-run",
    version,
    about = "Evolve an atmospheric ν_μ flux with a decaying sterile state"
)]
struct Args {
    /// Sterile mass m4 in eV.
    #[arg(long, default_value_t = 1.0)]
    sterile_mass: f64,

    /// Override one channel lifetime in all four process classes, as
    /// HEAVIER:LIGHTER=TAU with 1-based state labels (e.g. 4:2=50).
    /// May be repeated.
    #[arg(long = "lifetime", value_name = "H:L=TAU")]
    lifetimes: Vec<LifetimeOverride>,

    /// Also write the table to this file.
    #[arg(long)]
    output: Option<PathBuf>,

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

/// A `--lifetime` argument, converted to 0-based indices.
#[derive(Debug, Clone, Copy, PartialEq)]
struct LifetimeOverride {
    heavier: usize,
    lighter: usize,
    lifetime: f64,
}

impl FromStr for LifetimeOverride {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (pair, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected H:L=TAU, got {s:?}"))?;
        let (heavier, lighter) = pair
            .split_once(':')
            .ok_or_else(|| format!("expected H:L before '=', got {pair:?}"))?;
        let label = |t: &str| -> Result<usize, String> {
            match t.trim().parse::<usize>() {
                Ok(n) if n >= 1 => Ok(n - 1),
                _ => Err(format!("state labels start at 1, got {t:?}")),
            }
        };
        let lifetime = value
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("bad lifetime {value:?}: {e}"))?;
        Ok(Self {
            heavier: label(heavier)?,
            lighter: label(lighter)?,
            lifetime,
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, &args.log_format);
    info!("nudec-run v{}", env!("CARGO_PKG_VERSION"));

    let units = Units::natural();
    let mut run = PartialRatesRun::new(args.sterile_mass).context("failed to open default channels")?;
    for o in &args.lifetimes {
        if o.heavier <= o.lighter {
            bail!(
                "--lifetime {}:{}: the first label must be the heavier state",
                o.heavier + 1,
                o.lighter + 1
            );
        }
        run.lifetimes
            .set_channel_all(o.lighter, o.heavier, o.lifetime)
            .with_context(|| format!("invalid --lifetime {}:{}", o.heavier + 1, o.lighter + 1))?;
        info!(heavier = o.heavier, lighter = o.lighter, lifetime = o.lifetime, "channel lifetime overridden");
    }

    let setup = run.setup(&units).context("failed to assemble run")?;
    if let Some(path) = &args.manifest {
        setup
            .write_manifest(path)
            .with_context(|| format!("failed to write manifest {}", path.display()))?;
    }

    let nodes = setup.energy_nodes.len();
    let n = setup.config.num_neutrinos;
    let engine = RecordingEngine::new(setup.energy_nodes.clone(), n, NeutrinoType::Both);
    let mut sim = Simulation::new(setup, engine).context("failed to configure engine")?;

    let state = pure_flavor_state(nodes, NeutrinoType::Both, n, run.initial_flavor());
    sim.set_initial_state(&state, Basis::Flavor)
        .context("failed to set initial state")?;
    sim.evolve().context("evolution failed")?;

    let layout = run.layout(&units);
    let table = sim.render_final(&layout).context("failed to evaluate flux")?;
    std::io::stdout()
        .lock()
        .write_all(table.as_bytes())
        .context("failed to write to stdout")?;

    if let Some(path) = &args.output {
        write_flux_file(sim.engine(), &layout, path)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Logs go to stderr; stdout carries the flux table.
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
