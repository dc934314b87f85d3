use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// AssistConfig
// ---------------------------------------------------------------------------

/// Settings for the LLM text service behind the brainstorming assists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model used for single-word association.
    #[serde(default = "default_word_model")]
    pub word_model: String,
    /// Model used for concept generation.
    #[serde(default = "default_concept_model")]
    pub concept_model: String,
    #[serde(default = "default_word_temperature")]
    pub word_temperature: f32,
    #[serde(default = "default_concept_temperature")]
    pub concept_temperature: f32,
    /// Name of the environment variable holding the API key. The key itself
    /// never lands in the config file.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_word_model() -> String {
    "gpt-4o".to_string()
}

fn default_concept_model() -> String {
    "gpt-4-turbo".to_string()
}

fn default_word_temperature() -> f32 {
    0.7
}

fn default_concept_temperature() -> f32 {
    0.8
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            word_model: default_word_model(),
            concept_model: default_concept_model(),
            word_temperature: default_word_temperature(),
            concept_temperature: default_concept_temperature(),
            api_key_env: default_api_key_env(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub assist: AssistConfig,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        let data = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    /// Missing config file means defaults; a present-but-broken one is an
    /// error.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(root)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
