// src/error.rs

pub type Result<T> = anyhow::Result<T>;
