//! Benchmark-only crate: see `benches/` for the criterion suites.
//!
//! Kept as a separate, unpublished workspace member so the library crate
//! carries no bench-only dependencies.
