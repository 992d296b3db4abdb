use std::rc::Rc;
use serde_json::json;
use tracing::warn;
use crate::config::{ChatConfig, Platform, PlatformConfig};
use crate::error::Error;
use crate::probe;
use crate::request::Client;
use crate::results::TrialRecord;
use super::{http_structured_trial, http_tool_trial, Checker, ProviderInfo};

/// OpenRouter: every endpoint of a model is tested by pinning the request to its provider.
pub struct OpenRouterChecker {
    client: Rc<dyn Client>,
    config: PlatformConfig,
}

impl OpenRouterChecker {

    /// Create checker.
    pub fn new(client: Rc<dyn Client>, config: PlatformConfig) -> Self {
        OpenRouterChecker { client, config }
    }

    fn pinned(&self, mut config: ChatConfig, provider: &ProviderInfo) -> ChatConfig {
        config.extra_body = Some(json!({"provider": {"only": [provider.name]}}));
        config
    }
}

impl Checker for OpenRouterChecker {

    fn platform(&self) -> Platform {
        Platform::OpenRouter
    }

    fn list_providers(&self, model_id: &str) -> Result<Vec<ProviderInfo>, Error> {
        let (author, slug) = match model_id.split('/').collect::<Vec<_>>()[..] {
            [author, slug] => (author, slug),
            _ => {
                warn!("invalid model id format: {model_id}");
                return Ok(vec![]);
            }
        };

        let url = format!("{}/models/{author}/{slug}/endpoints", self.config.base_url.trim_end_matches('/'));
        let token = format!("Bearer {}", self.config.api_key);

        let response = self.client.get_json(&url, &[("Authorization", token.as_ref())], &[])?;

        let Some(endpoints) = response["data"]["endpoints"].as_array() else {
            return Ok(vec![]);
        };

        let providers = endpoints.iter()
            .filter_map(|endpoint| {
                let name = endpoint["provider_name"].as_str().filter(|n| !n.is_empty())?;
                Some(ProviderInfo {
                    name: name.to_owned(),
                    display_name: endpoint["name"].as_str().unwrap_or(name).to_owned(),
                    vendor: None,
                    region: None,
                })
            })
            .collect();

        Ok(providers)
    }

    fn tool_trial(&self, model_id: &str, provider: &ProviderInfo) -> TrialRecord {
        let config = probe::tool_probe_config(model_id.to_owned(), self.config.api_key.clone(), self.config.chat_url());
        http_tool_trial(&self.client, self.pinned(config, provider), model_id, &provider.name, true)
    }

    fn structured_trial(&self, model_id: &str, provider: &ProviderInfo) -> TrialRecord {
        let config = probe::structured_probe_config(model_id.to_owned(), self.config.api_key.clone(), self.config.chat_url());
        http_structured_trial(&self.client, self.pinned(config, provider), model_id, &provider.name)
    }
}
