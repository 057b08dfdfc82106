//! Terminal map of animal casualties along linear infrastructure.
//!
//! Casualty records are loaded from a JSON file, validated into point
//! features, filtered by animal type, infrastructure type and state, and
//! drawn as colored braille markers over a vector base map.

pub mod app;
pub mod braille;
pub mod casualty;
pub mod config;
pub mod data;
pub mod error;
pub mod filter;
pub mod map;
pub mod overlay;
pub mod style;
pub mod ui;
