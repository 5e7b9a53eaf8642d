//! Initial flavor states for the engine.

use nudec_core::error::FluxError;
use nudec_core::types::{FlavorState, NeutrinoType, Particle};

use crate::reader::FluxTable;

/// Where one table column lands in the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub column: usize,
    pub particle: Particle,
    pub flavor: usize,
}

/// Unit flux in a single flavor at every energy and for every carried particle.
pub fn pure_flavor_state(
    energies: usize,
    neutrino_type: NeutrinoType,
    num_neutrinos: usize,
    flavor: usize,
) -> FlavorState {
    let mut state = FlavorState::zeros(energies, neutrino_type.count(), num_neutrinos);
    state.fill_with(|_, _, f| if f == flavor { 1.0 } else { 0.0 });
    state
}

/// Fill a state from a flux table, row `i` feeding energy node `i`.
///
/// Entries not named by `mappings` stay zero. Mappings for particles the
/// state does not carry are ignored.
pub fn state_from_table(
    table: &FluxTable,
    energies: usize,
    neutrino_type: NeutrinoType,
    num_neutrinos: usize,
    mappings: &[ColumnMapping],
) -> Result<FlavorState, FluxError> {
    if table.rows() < energies {
        return Err(FluxError::TooFewRows {
            have: table.rows(),
            need: energies,
        });
    }
    let need_cols = mappings.iter().map(|m| m.column + 1).max().unwrap_or(0);
    if table.columns() < need_cols {
        return Err(FluxError::TooFewColumns {
            have: table.columns(),
            need: need_cols,
        });
    }

    let mut state = FlavorState::zeros(energies, neutrino_type.count(), num_neutrinos);
    for mapping in mappings {
        let Some(slot) = neutrino_type.slot(mapping.particle) else {
            continue;
        };
        if mapping.flavor >= num_neutrinos {
            continue;
        }
        for (e, value) in table.column(mapping.column).take(energies).enumerate() {
            state[(e, slot, mapping.flavor)] = value;
        }
    }
    Ok(state)
}
