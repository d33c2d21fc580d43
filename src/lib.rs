pub mod activity;
pub mod admin;
pub mod app;
pub mod config;
pub mod credentials;
pub mod errors;
pub mod guard;
pub mod habits;
pub mod handlers;
pub mod journal;
pub mod models;
pub mod preferences;
pub mod repository;
pub mod saved;
pub mod session;
pub mod state;
pub mod stats;
pub mod storage;
pub mod suggestions;
pub mod timer;
pub mod ui;
pub mod workflow;

pub use app::router;
pub use config::Config;
pub use state::AppState;
