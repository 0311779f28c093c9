// Handlers for each CLI subcommand. main.rs dispatches to these after
// parsing and loading the catalog.

pub mod calc;
pub mod items;
