// src/cli/mod.rs
pub mod helper;
pub mod repl;
pub mod ui;
