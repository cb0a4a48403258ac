mod app;
mod config;
mod logging;
mod view;

pub use app::run_from_args;
