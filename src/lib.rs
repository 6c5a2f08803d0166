pub mod app;
pub mod clipboard;
pub mod core;
pub mod monitor;
pub mod queue;
pub mod store;
