//! Hookline Studio - preview window editor and hover previews for a song library

pub mod config;
pub mod library;
pub mod songs;
pub mod ui;
