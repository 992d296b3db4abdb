use std::rc::Rc;
use serde_json::Value;
use crate::config::{ChatConfig, Platform, PlatformConfig};
use crate::error::Error;
use crate::probe;
use crate::request::Client;
use crate::results::TrialRecord;
use super::{http_structured_trial, http_tool_trial, Checker, ProviderInfo};

/// Hugging Face Hub API.
pub const HF_HUB_URL: &str = "https://huggingface.co";

// Providers reached without an explicit router suffix.
const DEFAULT_PROVIDERS: [&str; 2] = ["serverless", "hf-inference"];

/// Router provider name of a vendor.
fn router_provider(vendor: &str) -> String {
    let vendor = vendor.to_lowercase();
    match vendor.as_str() {
        "amazon" | "sagemaker" => "aws".to_owned(),
        "microsoft" => "azure".to_owned(),
        _ => vendor,
    }
}

fn opt_str(val: &Value, key: &str) -> Option<String> {
    val[key].as_str().filter(|s| !s.is_empty()).map(str::to_owned)
}

/// Hugging Face inference providers, reached through the OpenAI-compatible router.
pub struct HuggingFaceChecker {
    client: Rc<dyn Client>,
    config: PlatformConfig,
    hub_url: String,
}

impl HuggingFaceChecker {

    /// Create checker.
    pub fn new(client: Rc<dyn Client>, config: PlatformConfig) -> Self {
        HuggingFaceChecker {
            client,
            config,
            hub_url: HF_HUB_URL.to_owned(),
        }
    }

    /// Use another Hub API location.
    pub fn with_hub_url(mut self, hub_url: String) -> Self {
        self.hub_url = hub_url;
        self
    }

    /// Model name understood by the router for a provider.
    pub fn routed_model(model_id: &str, provider: &ProviderInfo) -> String {
        if DEFAULT_PROVIDERS.contains(&provider.name.as_str()) {
            return model_id.to_owned();
        }
        let vendor = provider.vendor.as_deref().unwrap_or(&provider.name);
        format!("{model_id}:{}", router_provider(vendor))
    }

    fn provider_from_entry(name: &str, info: &Value) -> ProviderInfo {
        ProviderInfo {
            name: name.to_owned(),
            display_name: opt_str(info, "display_name").unwrap_or_else(|| name.to_owned()),
            vendor: Some(opt_str(info, "vendor").unwrap_or_else(|| name.to_owned())),
            region: Some(opt_str(info, "region").unwrap_or_default()),
        }
    }

    fn chat_config(&self, model_id: &str, provider: &ProviderInfo, structured: bool) -> ChatConfig {
        let model = Self::routed_model(model_id, provider);
        let key = self.config.api_key.clone();
        let url = self.config.chat_url();
        if structured {
            probe::structured_probe_config(model, key, url)
        } else {
            probe::tool_probe_config(model, key, url)
        }
    }
}

impl Checker for HuggingFaceChecker {

    fn platform(&self) -> Platform {
        Platform::HuggingFace
    }

    fn list_providers(&self, model_id: &str) -> Result<Vec<ProviderInfo>, Error> {
        let url = format!("{}/api/models/{model_id}", self.hub_url.trim_end_matches('/'));
        let token = format!("Bearer {}", self.config.api_key);

        let response = self.client.get_json(
            &url,
            &[("Authorization", token.as_ref())],
            &[("expand[]", "inferenceProviderMapping")],
        )?;

        let providers = match &response["inferenceProviderMapping"] {
            Value::Object(mapping) => mapping.iter()
                .map(|(name, info)| Self::provider_from_entry(name, info))
                .collect(),
            Value::Array(entries) => entries.iter()
                .filter_map(|info| {
                    let name = info["provider"].as_str().filter(|n| !n.is_empty())?;
                    Some(Self::provider_from_entry(name, info))
                })
                .collect(),
            _ => vec![],
        };

        Ok(providers)
    }

    fn tool_trial(&self, model_id: &str, provider: &ProviderInfo) -> TrialRecord {
        let config = self.chat_config(model_id, provider, false);
        http_tool_trial(&self.client, config, model_id, &provider.name, false)
    }

    fn structured_trial(&self, model_id: &str, provider: &ProviderInfo) -> TrialRecord {
        let config = self.chat_config(model_id, provider, true);
        http_structured_trial(&self.client, config, model_id, &provider.name)
    }
}
