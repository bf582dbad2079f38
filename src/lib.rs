pub mod app;
pub mod config;
pub mod error;
pub mod photos;
pub mod web_pages;

pub use app::{AppState, build_router};
pub use config::AppConfig;
pub use error::{PhotoError, PhotoResult};
