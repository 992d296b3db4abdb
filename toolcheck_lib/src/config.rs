use std::fmt::Display;
use serde_json::Value;
use crate::error::Error;

/// Platforms a model can be accessed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// OpenRouter (routes to many providers).
    OpenRouter,
    /// Hugging Face inference providers.
    HuggingFace,
    /// io.net over plain HTTP.
    IoNet,
    /// io.net through the agent client library.
    IoNetLibrary,
}

impl Platform {
    /// All platforms, in the order they are tested.
    pub const ALL: [Platform; 4] = [
        Platform::OpenRouter,
        Platform::HuggingFace,
        Platform::IoNet,
        Platform::IoNetLibrary,
    ];

    /// Command line name.
    pub fn key(&self) -> &'static str {
        match self {
            Platform::OpenRouter => "openrouter",
            Platform::HuggingFace => "huggingface",
            Platform::IoNet => "ionet",
            Platform::IoNetLibrary => "ionet-library",
        }
    }

    /// Key of the platform in models.json.
    pub fn catalog_key(&self) -> &'static str {
        match self {
            Platform::OpenRouter => "openrouter",
            Platform::HuggingFace => "huggingface",
            Platform::IoNet | Platform::IoNetLibrary => "iointel",
        }
    }

    /// Short tag used in row labels and sort keys.
    pub fn tag(&self) -> &'static str {
        match self {
            Platform::OpenRouter => "OR",
            Platform::HuggingFace => "HF",
            Platform::IoNet | Platform::IoNetLibrary => "iointel",
        }
    }

    /// Value of the `data-platform` attribute used by the dashboard filters.
    pub fn filter_key(&self) -> &'static str {
        match self {
            Platform::OpenRouter => "or",
            Platform::HuggingFace => "hf",
            Platform::IoNet | Platform::IoNetLibrary => "ionet",
        }
    }

    /// Human readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::OpenRouter => "OpenRouter",
            Platform::HuggingFace => "Hugging Face",
            Platform::IoNet => "io.net",
            Platform::IoNetLibrary => "io.net (library)",
        }
    }

    /// Result file name inside the data directory.
    pub fn results_file(&self) -> &'static str {
        match self {
            Platform::OpenRouter => "data.json",
            Platform::HuggingFace => "data_hf.json",
            Platform::IoNet => "data_ionet.json",
            Platform::IoNetLibrary => "data_ionet_iointel.json",
        }
    }

    /// Default OpenAI-compatible API base URL.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Platform::OpenRouter => "https://openrouter.ai/api/v1",
            Platform::HuggingFace => "https://router.huggingface.co/v1",
            Platform::IoNet | Platform::IoNetLibrary => "https://api.intelligence.io.solutions/api/v1",
        }
    }

    /// Environment variables holding the API key, in lookup order.
    pub fn api_key_vars(&self) -> &'static [&'static str] {
        match self {
            Platform::OpenRouter => &["OPENROUTER_API_KEY"],
            Platform::HuggingFace => &["HF_TOKEN", "HUGGINGFACE_TOKEN", "HUGGING_FACE_HUB_TOKEN"],
            Platform::IoNet | Platform::IoNetLibrary => &["IO_API_KEY"],
        }
    }
}

impl TryFrom<&str> for Platform {
    type Error = Error;

    fn try_from(val: &str) -> Result<Self, Self::Error> {
        match val {
            "openrouter" | "or" => Ok(Platform::OpenRouter),
            "huggingface" | "hf" => Ok(Platform::HuggingFace),
            "ionet" | "iointel" => Ok(Platform::IoNet),
            "ionet-library" | "iointel-library" => Ok(Platform::IoNetLibrary),
            _ => Err(Error::Error(format!("unknown platform: {val}"))),
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Connection settings of one platform.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Platform.
    pub platform: Platform,
    /// API key.
    pub api_key: String,
    /// OpenAI-compatible API base URL (without `/chat/completions`).
    pub base_url: String,
}

impl PlatformConfig {
    /// Create config with the platform's default base URL.
    pub fn new(platform: Platform, api_key: String) -> Self {
        PlatformConfig {
            platform,
            api_key,
            base_url: platform.default_base_url().to_owned(),
        }
    }

    /// Chat completions endpoint.
    pub fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Parameters of a chat completion call.
#[derive(Clone, Debug)]
pub struct ChatConfig {
    /// Model name.
    pub name: String,
    /// API key.
    pub api_key: String,
    /// Chat completions URL.
    pub api_url: String,
    /// Maximum number of tokens that will be generated.
    pub max_tokens: Option<i64>,
    /// Level of randomization when choosing tokens.
    pub temperature: Option<f64>,
    /// Requested response format (e.g. a JSON schema).
    pub response_format: Option<Value>,
    /// Provider-specific fields merged into the request body.
    pub extra_body: Option<Value>,
}

impl ChatConfig {

    /// Create minimal config using model name, API key, and API URL.
    pub fn new(name: String, api_key: String, api_url: String) -> Self {
        ChatConfig {
            name,
            api_key,
            api_url,
            max_tokens: None,
            temperature: None,
            response_format: None,
            extra_body: None,
        }
    }
}
