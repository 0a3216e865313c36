pub mod cli;
pub mod server;
pub mod train;

pub use cli::*;
pub use server::*;
