//! Output file names built from a base name and numeric run parameters.
//!
//! Each parameter becomes `_<tag><value>` with the value printed in fixed
//! notation with three decimals, e.g. `ub_final_m1.000_t0.200_c0.500.dat`.

use std::path::{Path, PathBuf};

/// Extension of every flux file.
pub const FLUX_EXTENSION: &str = "dat";

/// Builder for a flux file name.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputName {
    base: String,
    params: Vec<(String, f64)>,
}

impl OutputName {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            params: Vec::new(),
        }
    }

    /// Append a `_<tag><value>` suffix.
    pub fn param(mut self, tag: impl Into<String>, value: f64) -> Self {
        self.params.push((tag.into(), value));
        self
    }

    /// File name without directory or extension.
    pub fn stem(&self) -> String {
        let mut s = self.base.clone();
        for (tag, value) in &self.params {
            s.push('_');
            s.push_str(tag);
            s.push_str(&format!("{value:.3}"));
        }
        s
    }

    /// Full path `<dir>/<stem>.dat`.
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.{FLUX_EXTENSION}", self.stem()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_only() {
        assert_eq!(OutputName::new("ub_initial").stem(), "ub_initial");
    }

    #[test]
    fn three_decimal_suffixes() {
        let n = OutputName::new("ub_final")
            .param("m", 1.0)
            .param("t", 0.2)
            .param("c", 0.12345);
        assert_eq!(n.stem(), "ub_final_m1.000_t0.200_c0.123");
    }

    #[test]
    fn large_values_keep_all_integer_digits() {
        let n = OutputName::new("x").param("m", 1234.5);
        assert_eq!(n.stem(), "x_m1234.500");
    }

    #[test]
    fn path_joins_dir_and_extension() {
        let n = OutputName::new("ub_final").param("m", 2.0);
        assert_eq!(
            n.path_in(Path::new("../output")),
            PathBuf::from("../output/ub_final_m2.000.dat")
        );
    }
}
