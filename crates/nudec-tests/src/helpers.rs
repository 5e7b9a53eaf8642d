//! Shared test helpers for the integration tests.

use std::fs;
use std::path::{Path, PathBuf};

use nudec_sim::presets::BEAM_FLUX_FILE;

/// A beam flux table with `rows` lines: `E numu numubar`.
///
/// Row `i` carries ν_μ flux `i + 1` and ν̄_μ flux `(i + 1) / 10`.
pub fn beam_flux_text(rows: usize) -> String {
    let mut out = String::from("# E numu numubar\n");
    for i in 0..rows {
        let e = 0.025 + 0.05 * i as f64;
        let nu = (i + 1) as f64;
        out.push_str(&format!("{e} {nu} {}\n", nu / 10.0));
    }
    out
}

/// Write [`beam_flux_text`] under `dir` with the name the beam run expects.
pub fn write_beam_flux(dir: &Path, rows: usize) -> PathBuf {
    let path = dir.join(BEAM_FLUX_FILE);
    fs::write(&path, beam_flux_text(rows)).unwrap();
    path
}

/// Parse a whitespace-separated numeric table.
pub fn parse_rows(text: &str) -> Vec<Vec<f64>> {
    text.lines()
        .map(|l| l.split_whitespace().map(|t| t.parse().unwrap()).collect())
        .collect()
}
