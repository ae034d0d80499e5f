//! Position data structures and catalog loading

mod data;
pub mod loader;

pub use data::{Position, reference_positions, MAX_MATURITY_PERIODS};
pub use loader::{load_positions, load_positions_from_reader, load_default_positions};
