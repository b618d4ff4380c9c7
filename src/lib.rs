// src/lib.rs

pub mod bsp;
#[cfg(feature = "gui")]
pub mod ui;
