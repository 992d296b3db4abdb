//! Model catalog (`config/models.json`).
//!
//! Maps a friendly model name to its ids on each platform:
//!
//! ```json
//! {
//!   "Llama 3.3 70B": {
//!     "openrouter": ["meta-llama/llama-3.3-70b-instruct", "meta-llama/llama-3.3-70b-instruct:free"],
//!     "huggingface": ["meta-llama/Llama-3.3-70B-Instruct"],
//!     "iointel": "meta-llama/Llama-3.3-70B-Instruct"
//!   }
//! }
//! ```
use std::fs;
use std::path::Path;
use serde_json::{Map, Value};
use tracing::warn;
use crate::config::Platform;
use crate::error::Error;

/// Catalog entry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogEntry {
    /// Friendly name.
    pub name: String,
    /// OpenRouter ids.
    pub openrouter: Vec<String>,
    /// Hugging Face ids.
    pub huggingface: Vec<String>,
    /// io.net id.
    pub iointel: Option<String>,
}

impl CatalogEntry {
    /// Ids of the entry on a platform.
    pub fn ids(&self, platform: Platform) -> Vec<&str> {
        match platform {
            Platform::OpenRouter => self.openrouter.iter().map(String::as_str).collect(),
            Platform::HuggingFace => self.huggingface.iter().map(String::as_str).collect(),
            Platform::IoNet | Platform::IoNetLibrary => self.iointel.iter().map(String::as_str).collect(),
        }
    }

    /// First regular and first `:free` OpenRouter id.
    pub fn openrouter_variants(&self) -> (Option<&str>, Option<&str>) {
        let regular = self.openrouter.iter().find(|id| !id.ends_with(":free")).map(String::as_str);
        let free = self.openrouter.iter().find(|id| id.ends_with(":free")).map(String::as_str);
        (regular, free)
    }
}

/// Models to test, in file order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelCatalog {
    entries: Vec<CatalogEntry>,
}

fn id_list(val: Option<&Value>) -> Vec<String> {
    match val {
        Some(Value::Array(arr)) => arr.iter().filter_map(|v| v.as_str()).map(str::to_owned).collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => vec![],
    }
}

impl ModelCatalog {

    /// Read catalog file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&text)
    }

    /// Parse catalog JSON.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let root: Map<String, Value> = serde_json::from_str(text)?;

        let mut entries = Vec::with_capacity(root.len());
        for (name, platforms) in root {
            if !platforms.is_object() {
                warn!("catalog entry {name} is not an object, skipped");
                continue;
            }

            let iointel = match platforms.get("iointel") {
                Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
                Some(Value::Array(arr)) => arr.iter().find_map(|v| v.as_str()).map(str::to_owned),
                _ => None,
            };

            entries.push(CatalogEntry {
                openrouter: id_list(platforms.get("openrouter")),
                huggingface: id_list(platforms.get("huggingface")),
                iointel,
                name,
            });
        }

        Ok(ModelCatalog { entries })
    }

    /// Catalog entries.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// `(model_id, friendly_name)` pairs to test on a platform.
    pub fn targets(&self, platform: Platform) -> Vec<(String, String)> {
        self.entries.iter()
            .flat_map(|e| e.ids(platform).into_iter().map(move |id| (id.to_owned(), e.name.clone())))
            .collect()
    }

    /// Friendly name of a model id on a platform.
    pub fn friendly_name(&self, platform: Platform, model_id: &str) -> Option<&str> {
        self.entries.iter()
            .find(|e| e.ids(platform).contains(&model_id))
            .map(|e| e.name.as_str())
    }
}

/// Catalog written by `setup` when none exists.
pub const SAMPLE_CATALOG: &str = r#"{
  "Llama 3.3 70B": {
    "openrouter": [
      "meta-llama/llama-3.3-70b-instruct",
      "meta-llama/llama-3.3-70b-instruct:free"
    ],
    "huggingface": ["meta-llama/Llama-3.3-70B-Instruct"],
    "iointel": "meta-llama/Llama-3.3-70B-Instruct"
  },
  "Qwen3 235B A22B": {
    "openrouter": ["qwen/qwen3-235b-a22b", "qwen/qwen3-235b-a22b:free"],
    "huggingface": ["Qwen/Qwen3-235B-A22B"],
    "iointel": "Qwen/Qwen3-235B-A22B-FP8"
  },
  "DeepSeek V3": {
    "openrouter": ["deepseek/deepseek-chat-v3-0324"],
    "huggingface": ["deepseek-ai/DeepSeek-V3-0324"]
  }
}
"#;
