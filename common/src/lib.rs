pub mod app;
pub mod args;
pub mod clock;
pub mod config;
pub mod context;
pub mod exercise;
pub mod logging;
pub mod transform;
pub mod window;
