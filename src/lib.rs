pub mod config;
pub mod core;
pub mod model;
pub mod report;
pub mod sim;
