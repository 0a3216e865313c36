pub mod app;
pub mod routes;
pub mod state;

pub use app::{build_app, run_server};
pub use state::PredictService;
