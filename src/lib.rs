pub mod api;
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod session;
pub mod types;
pub mod warehouse;

pub use api::ApiClient;
pub use config::Config;
pub use error::ApiError;
pub use pipeline::ScorePipeline;
pub use session::SessionStore;
pub use warehouse::WarehouseViewModel;
