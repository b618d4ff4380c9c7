// src/ui/mod.rs
pub mod main_window;

pub use main_window::{run_main_window, MainWindow};
