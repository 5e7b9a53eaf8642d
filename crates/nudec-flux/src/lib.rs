//! # nudec-flux
//! Flux table input, initial-state assembly, and plain-text flux output.

pub mod naming;
pub mod reader;
pub mod state;
pub mod writer;

pub use naming::OutputName;
pub use reader::{parse_flux_table, read_flux_table, FluxTable};
pub use state::{pure_flavor_state, state_from_table, ColumnMapping};
pub use writer::{render_flux, write_flux_file, FluxColumn, FluxLayout};
