pub mod api;
pub mod config;
pub mod errors;
pub mod source;
pub mod template;
pub mod transactions;
pub mod vfs;

mod preview;
mod utils;

pub use api::{generate_image, preview_image, RamfsError};
pub use config::Config;
