//! Workspace root package. It carries the shared tooling configuration only;
//! the engine lives in `crates/fitsim-lib` and the CLI in `crates/fitsim-cli`.
