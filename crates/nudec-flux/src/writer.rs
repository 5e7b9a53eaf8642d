//! Plain-text flux output: one space-separated line per energy node.
//!
//! Each line starts with the node energy (divided by the layout's energy
//! unit) followed by one value per requested `(flavor, particle)` column,
//! evaluated through the engine. No header, no versioning.

use std::fs;
use std::path::Path;

use nudec_core::error::{EngineError, FluxError, NudecError};
use nudec_core::traits::EvolutionEngine;
use nudec_core::types::{NeutrinoType, Particle};
use tracing::info;

/// One output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FluxColumn {
    pub flavor: usize,
    pub particle: Particle,
}

/// Line layout of a flux file.
#[derive(Debug, Clone, PartialEq)]
pub struct FluxLayout {
    /// Energies are written as `node / energy_unit`.
    pub energy_unit: f64,
    pub columns: Vec<FluxColumn>,
    /// Terminate each line with a space before the newline.
    pub trailing_space: bool,
}

impl FluxLayout {
    /// Every flavor of every carried particle, particle-major.
    pub fn all_flavors(num_neutrinos: usize, neutrino_type: NeutrinoType, energy_unit: f64) -> Self {
        let columns = neutrino_type
            .particles()
            .iter()
            .flat_map(|&particle| (0..num_neutrinos).map(move |flavor| FluxColumn { flavor, particle }))
            .collect();
        Self {
            energy_unit,
            columns,
            trailing_space: false,
        }
    }

    /// One flavor, neutrino then antineutrino, energies left in natural units.
    pub fn single_flavor(flavor: usize) -> Self {
        Self {
            energy_unit: 1.0,
            columns: vec![
                FluxColumn { flavor, particle: Particle::Neutrino },
                FluxColumn { flavor, particle: Particle::Antineutrino },
            ],
            trailing_space: true,
        }
    }
}

/// Shortest round-trip text for `v`, switching to exponent form outside
/// `[1e-5, 1e16)` so tiny fluxes and large energies stay compact.
fn format_value(v: f64) -> String {
    if v != 0.0 && v.is_finite() && !(1e-5..1e16).contains(&v.abs()) {
        format!("{v:e}")
    } else {
        v.to_string()
    }
}

/// Render the engine's current flux as text.
pub fn render_flux(engine: &dyn EvolutionEngine, layout: &FluxLayout) -> Result<String, EngineError> {
    let mut out = String::new();
    for (node, energy) in engine.energy_nodes().iter().enumerate() {
        let mut fields = Vec::with_capacity(layout.columns.len() + 1);
        fields.push(format_value(energy / layout.energy_unit));
        for col in &layout.columns {
            fields.push(format_value(engine.eval_flavor_at_node(col.flavor, node, col.particle)?));
        }
        out.push_str(&fields.join(" "));
        if layout.trailing_space {
            out.push(' ');
        }
        out.push('\n');
    }
    Ok(out)
}

/// Render and write the flux to `path`, creating parent directories.
///
/// Returns the number of lines written.
pub fn write_flux_file(
    engine: &dyn EvolutionEngine,
    layout: &FluxLayout,
    path: &Path,
) -> Result<usize, NudecError> {
    let text = render_flux(engine, layout)?;
    let io_err = |e: std::io::Error| FluxError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, &text).map_err(io_err)?;
    let lines = text.lines().count();
    info!(path = %path.display(), lines, "wrote flux");
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_flavors_orders_particles_first() {
        let l = FluxLayout::all_flavors(4, NeutrinoType::Both, 1e9);
        assert_eq!(l.columns.len(), 8);
        assert_eq!(l.columns[0], FluxColumn { flavor: 0, particle: Particle::Neutrino });
        assert_eq!(l.columns[3], FluxColumn { flavor: 3, particle: Particle::Neutrino });
        assert_eq!(l.columns[4], FluxColumn { flavor: 0, particle: Particle::Antineutrino });
        assert!(!l.trailing_space);
    }

    #[test]
    fn all_flavors_single_particle() {
        let l = FluxLayout::all_flavors(3, NeutrinoType::Antineutrino, 1.0);
        assert_eq!(l.columns.len(), 3);
        assert!(l.columns.iter().all(|c| c.particle == Particle::Antineutrino));
    }

    #[test]
    fn single_flavor_layout() {
        let l = FluxLayout::single_flavor(1);
        assert_eq!(l.energy_unit, 1.0);
        assert_eq!(l.columns.len(), 2);
        assert_eq!(l.columns[1].particle, Particle::Antineutrino);
        assert!(l.trailing_space);
    }

    #[test]
    fn small_and_large_values_use_exponent_form() {
        assert_eq!(format_value(1.5e-30), "1.5e-30");
        assert_eq!(format_value(-2e-7), "-2e-7");
        assert_eq!(format_value(3.2e20), "3.2e20");
        assert_eq!(format_value(0.25), "0.25");
        assert_eq!(format_value(1e11), "100000000000");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(f64::NAN), "NaN");
        let tiny = 6.62607015e-34_f64;
        assert_eq!(format_value(tiny).parse::<f64>().unwrap(), tiny);
    }
}
