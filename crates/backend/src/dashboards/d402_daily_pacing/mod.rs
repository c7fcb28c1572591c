pub mod distribution;
pub mod engine;
pub mod service;
