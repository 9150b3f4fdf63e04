//! Carnaval 2025 service-request conversion dashboard.
//!
//! The data layer (loading, filtering, slider bounds) and the aggregation
//! layer (`stats`) are pure and synchronous; the egui layer under `ui` only
//! renders what they compute, re-running the whole pipeline on every
//! interaction.

pub mod app;
pub mod color;
pub mod data;
pub mod state;
pub mod stats;
pub mod ui;
