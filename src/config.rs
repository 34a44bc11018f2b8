// src/config.rs
use crate::error::Result;
use std::env;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "gemma3:12b";

#[derive(Debug, Clone)]
pub struct Config {
    pub ollama_base_url: String,
    pub model: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ollama_base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Config {
    /// Environment variables override the built-in defaults. There are no
    /// CLI flags for these; they are fixed for the lifetime of the session.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Config::default();

        if let Ok(url) = env::var("OLLAMA_BASE_URL") {
            if !url.trim().is_empty() {
                config.ollama_base_url = url.trim().trim_end_matches('/').to_string();
            }
        }
        if let Ok(model) = env::var("OLLAMA_MODEL") {
            if !model.trim().is_empty() {
                config.model = model.trim().to_string();
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_ollama() {
        let config = Config::default();
        assert_eq!(config.ollama_base_url, "http://localhost:11434");
        assert_eq!(config.model, "gemma3:12b");
    }
}
