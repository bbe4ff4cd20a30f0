//! egui dashboard for interactive predictions.

pub mod app;
pub mod charts;
pub mod controller;
pub mod style;

pub use app::{DashboardApp, LaunchError, MIN_VIEWPORT_SIZE, WINDOW_TITLE};
pub use controller::{DashboardController, StatusMessage, StatusTone};
