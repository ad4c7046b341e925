//! Terminal front end: owns the application state on the control thread.
mod app;
mod config;
mod effects;
mod logging;
mod persistence;
mod ui;

pub use app::run_app;
