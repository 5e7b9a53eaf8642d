//! End-to-end test suite for the nudec drivers.
//!
//! Integration tests in `tests/` run the full pipeline (preset, setup,
//! recording engine, flux files) against temporary directories and check the
//! decay-rate invariants across crate boundaries.

pub mod helpers;
