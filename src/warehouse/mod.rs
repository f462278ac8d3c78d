// src/warehouse/mod.rs
//! Candidate warehouse: authoritative list, filtered projection, and the
//! operations offered on top of them

pub mod export;
pub mod filter;
pub mod stats;
pub mod view_model;

pub use export::{projection_to_csv, DEFAULT_EXPORT_FILE};
pub use filter::{apply_filters, sort_projection, FilterState, SortKey};
pub use stats::ProjectionStats;
pub use view_model::{LoadOutcome, LoadTicket, WarehouseViewModel};
