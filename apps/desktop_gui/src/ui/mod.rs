//! UI layer for the desktop console: the eframe app shell, panels and modals.

pub mod app;

pub use app::UserConsoleApp;
