//! Application layer
//!
//! Service wiring and lifecycle for the two front ends.

pub mod app;

pub use app::Application;
