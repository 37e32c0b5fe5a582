pub mod api;
pub mod app;
pub mod config;
pub mod errors;
pub mod format;
pub mod handlers;
pub mod models;
pub mod pages;
pub mod plants;
pub mod session;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
