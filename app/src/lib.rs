//! Route data, normalization and refresh logic for the Sanghiang Perkasa
//! vehicle-routing dashboard.

pub mod config;
pub mod display;
pub mod error;
pub mod normalizer;
pub mod reference;
pub mod scheduler;
pub mod source;
pub mod types;
pub mod view;
