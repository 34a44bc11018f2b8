// src/llm/mod.rs
pub mod ollama;
