//! Driver directories loaded from environment variables.

use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriverPaths {
    /// Directory holding the input flux tables.
    pub flux_dir: PathBuf,
    /// Directory receiving the flux files.
    pub output_dir: PathBuf,
}

impl Default for DriverPaths {
    fn default() -> Self {
        Self {
            flux_dir: PathBuf::from("../fluxes"),
            output_dir: PathBuf::from("../output"),
        }
    }
}

impl DriverPaths {
    /// `NUDEC_FLUX_DIR` and `NUDEC_OUTPUT_DIR`, falling back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            flux_dir: lookup("NUDEC_FLUX_DIR").map(PathBuf::from).unwrap_or(defaults.flux_dir),
            output_dir: lookup("NUDEC_OUTPUT_DIR").map(PathBuf::from).unwrap_or(defaults.output_dir),
        }
    }

    /// Replace directories given on the command line.
    pub fn with_overrides(mut self, flux_dir: Option<PathBuf>, output_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = flux_dir {
            self.flux_dir = dir;
        }
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        self
    }
}
