use std::rc::Rc;
use crate::config::{Platform, PlatformConfig};
use crate::error::Error;
use crate::probe;
use crate::request::Client;
use crate::results::TrialRecord;
use super::{http_structured_trial, http_tool_trial, Checker, ProviderInfo, IONET_PROVIDER};

/// io.net over its OpenAI-compatible HTTP API; the platform is its own provider.
pub struct IoNetChecker {
    client: Rc<dyn Client>,
    config: PlatformConfig,
}

impl IoNetChecker {

    /// Create checker.
    pub fn new(client: Rc<dyn Client>, config: PlatformConfig) -> Self {
        IoNetChecker { client, config }
    }
}

impl Checker for IoNetChecker {

    fn platform(&self) -> Platform {
        Platform::IoNet
    }

    fn list_providers(&self, _model_id: &str) -> Result<Vec<ProviderInfo>, Error> {
        Ok(vec![ProviderInfo::named(IONET_PROVIDER)])
    }

    fn tool_trial(&self, model_id: &str, provider: &ProviderInfo) -> TrialRecord {
        let config = probe::tool_probe_config(model_id.to_owned(), self.config.api_key.clone(), self.config.chat_url());
        http_tool_trial(&self.client, config, model_id, &provider.name, false)
    }

    fn structured_trial(&self, model_id: &str, provider: &ProviderInfo) -> TrialRecord {
        let config = probe::structured_probe_config(model_id.to_owned(), self.config.api_key.clone(), self.config.chat_url());
        http_structured_trial(&self.client, config, model_id, &provider.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use crate::checker::Runner;
    use crate::probe::TrialStatus;
    use crate::request::stub::{Exchange, Reply, StubClient};

    #[test]
    fn test_single_provider_model() {
        let tool_reply = || Exchange::post(Reply::Json(json!({
            "model": "Qwen/Qwen3-235B-A22B-FP8",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{"id": "1", "type": "function", "function": {"name": "get_weather", "arguments": {"location": "San Francisco"}}}]
                },
                "finish_reason": "tool_calls"
            }]
        })))
        .url("https://api.intelligence.io.solutions/api/v1/chat/completions")
        .headers(&[("Authorization", "Bearer <io-key>")]);

        let client = StubClient::shared(vec![
            tool_reply(),
            Exchange::post(Reply::Status(404, "model not found".into())),
            Exchange::post(Reply::Json(json!({"choices": [{"message": {"role": "assistant", "content": null}, "finish_reason": "length"}]}))),
            Exchange::post(Reply::Status(400, "json_schema is not supported".into())),
        ]);

        let checker = IoNetChecker::new(client, PlatformConfig::new(Platform::IoNet, "<io-key>".into()));
        let model = Runner::new(&checker, 2).check_model("Qwen/Qwen3-235B-A22B-FP8", None);

        assert_eq!(model.providers_tested, 1);
        let tool = &model.providers[0];
        assert_eq!(tool.provider_name, IONET_PROVIDER);
        assert_eq!(tool.summary.success_count, 1);
        assert_eq!(tool.summary.error_count, 1);
        assert_eq!(tool.test_runs[0].tool_calls.as_ref().unwrap()[0]["function"]["arguments"], "{\"location\":\"San Francisco\"}");
        assert_eq!(tool.test_runs[1].supported, Some(false));

        let structured = &model.structured_output[0];
        assert_eq!(structured.test_runs[0].status, TrialStatus::Unclear);
        assert_eq!(structured.test_runs[1].supported, Some(false));
    }
}
