// src/lib.rs
pub mod config;
pub mod editor;
pub mod input;
pub mod ui;
