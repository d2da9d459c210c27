// src/ui/mod.rs
mod renderer;

pub use renderer::{parse_attrs, Renderer};
