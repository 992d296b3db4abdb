//! Per-platform checkers and the trial runner.
mod openrouter;
mod huggingface;
mod ionet;
mod library;

use std::collections::HashSet;
use std::rc::Rc;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};
use crate::catalog::ModelCatalog;
use crate::config::{ChatConfig, Platform};
use crate::error::Error;
use crate::llm::get_llm_chat;
use crate::probe::{self, TrialStatus};
use crate::request::Client;
use crate::results::{ModelResult, ProviderResult, ResultsFile, SupportLevel, Summary, TrialRecord};
use crate::tools::ToolChoice;
use crate::llm::{Message, Role};

pub use openrouter::OpenRouterChecker;
pub use huggingface::{HuggingFaceChecker, HF_HUB_URL};
pub use ionet::IoNetChecker;
pub use library::LibraryChecker;

/// Default number of trials per (model, provider, probe).
pub const DEFAULT_TRIALS: usize = 3;

/// Provider name used by platforms without a provider fan-out.
pub const IONET_PROVIDER: &str = "io.net";

/// Inference provider serving a model.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProviderInfo {
    /// Provider name used for routing.
    pub name: String,
    /// Display name.
    pub display_name: String,
    /// Vendor behind the provider.
    pub vendor: Option<String>,
    /// Region.
    pub region: Option<String>,
}

impl ProviderInfo {
    /// Provider known only by name.
    pub fn named(name: &str) -> Self {
        ProviderInfo {
            name: name.to_owned(),
            display_name: name.to_owned(),
            ..Default::default()
        }
    }
}

/// Checks the models of one platform.
///
/// Trials never fail: provider errors are captured in the returned record.
pub trait Checker {
    /// Checked platform.
    fn platform(&self) -> Platform;

    /// Providers serving the model.
    fn list_providers(&self, model_id: &str) -> Result<Vec<ProviderInfo>, Error>;

    /// One tool probe request.
    fn tool_trial(&self, model_id: &str, provider: &ProviderInfo) -> TrialRecord;

    /// One structured output probe request.
    fn structured_trial(&self, model_id: &str, provider: &ProviderInfo) -> TrialRecord;
}

/// Send the tool probe over an OpenAI-compatible endpoint.
pub(crate) fn http_tool_trial(client: &Rc<dyn Client>, config: ChatConfig, model_id: &str, provider: &str, no_endpoints_rule: bool) -> TrialRecord {
    let mut chat = get_llm_chat(config, client.clone(), vec![probe::weather_tool_spec()]);
    let prompt = Message::text(Role::User, probe::TOOL_PROMPT.to_owned());

    match chat.get_inference(&[prompt], ToolChoice::Auto) {
        Ok(completion) => {
            let verdict = probe::classify_tool_completion(&completion);
            let mut record = TrialRecord::new(model_id, provider, verdict.status, verdict.supported);
            record.tool_calls = probe::tool_calls_value(&completion);
            if record.tool_calls.is_none() {
                record.response_content = completion.text();
            }
            record.finish_reason = completion.finish_reason;
            record.model_used = completion.model;
            record
        },
        Err(err) => {
            let verdict = probe::classify_tool_error(&err, no_endpoints_rule);
            let mut record = TrialRecord::new(model_id, provider, verdict.status, verdict.supported);
            record.error = Some(probe::error_text(&err));
            record
        }
    }
}

/// Send the structured output probe over an OpenAI-compatible endpoint.
pub(crate) fn http_structured_trial(client: &Rc<dyn Client>, config: ChatConfig, model_id: &str, provider: &str) -> TrialRecord {
    let mut chat = get_llm_chat(config, client.clone(), vec![]);
    let prompt = Message::text(Role::User, probe::STRUCTURED_PROMPT.to_owned());

    match chat.get_inference(&[prompt], ToolChoice::None) {
        Ok(completion) => {
            let content = completion.text();
            let verdict = probe::classify_structured_content(content.as_deref());
            let mut record = TrialRecord::new(model_id, provider, verdict.status, verdict.supported);
            record.response_content = content;
            record.finish_reason = completion.finish_reason;
            record.model_used = completion.model;
            record
        },
        Err(err) => {
            let verdict = probe::classify_structured_error(&err);
            let mut record = TrialRecord::new(model_id, provider, verdict.status, verdict.supported);
            record.error = Some(probe::error_text(&err));
            record
        }
    }
}

/// Counts of providers per support level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelCounts {
    /// All trials succeeded.
    pub full: usize,
    /// Some trials succeeded.
    pub partial: usize,
    /// No trial succeeded.
    pub none: usize,
}

impl LevelCounts {
    fn add(&mut self, summary: &Summary) {
        match summary.support() {
            SupportLevel::Full => self.full += 1,
            SupportLevel::Partial => self.partial += 1,
            SupportLevel::None => self.none += 1,
        }
    }

    /// Total number of providers counted.
    pub fn total(&self) -> usize {
        self.full + self.partial + self.none
    }
}

/// Support levels over a whole result file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Tested (model, provider) pairs.
    pub providers: usize,
    /// Tool support.
    pub tool: LevelCounts,
    /// Structured output support.
    pub structured: LevelCounts,
}

impl Tally {
    /// Count support levels of a result file.
    pub fn from_results(results: &ResultsFile) -> Self {
        let mut tally = Tally::default();
        for model in &results.models {
            for provider in &model.providers {
                tally.providers += 1;
                tally.tool.add(&provider.summary);
            }
            for provider in &model.structured_output {
                tally.structured.add(&provider.summary);
            }
        }
        tally
    }
}

/// Runs the probes of one checker over the catalog.
pub struct Runner<'a> {
    checker: &'a dyn Checker,
    trials: usize,
    pause: Duration,
}

impl<'a> Runner<'a> {

    /// Create runner.
    pub fn new(checker: &'a dyn Checker, trials: usize) -> Self {
        Runner {
            checker,
            trials: trials.max(1),
            pause: Duration::ZERO,
        }
    }

    /// Pause between models.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Test every catalog model of the platform.
    pub fn run(&self, catalog: &ModelCatalog) -> ResultsFile {
        let platform = self.checker.platform();
        let targets = catalog.targets(platform);

        info!("testing {} {} model(s), {} trial(s) each", targets.len(), platform.display_name(), self.trials);

        let mut models = Vec::with_capacity(targets.len());
        for (i, (model_id, name)) in targets.iter().enumerate() {
            if i > 0 && !self.pause.is_zero() {
                thread::sleep(self.pause);
            }
            info!("[{}/{}] checking model {model_id}", i + 1, targets.len());
            models.push(self.check_model(model_id, Some(name.clone())));
        }

        ResultsFile::new(platform.key(), models)
    }

    /// Test every provider of one model.
    pub fn check_model(&self, model_id: &str, model_name: Option<String>) -> ModelResult {
        let mut providers = match self.checker.list_providers(model_id) {
            Ok(providers) => providers,
            Err(err) => {
                warn!("failed to list providers for {model_id}: {err}");
                vec![]
            }
        };

        // Endpoints of one provider share the routing name, test them once.
        let mut seen = HashSet::new();
        providers.retain(|p| seen.insert(p.name.clone()));

        let mut result = ModelResult::empty(model_id, model_name);

        if providers.is_empty() {
            warn!("no providers found for {model_id}");
            return result;
        }

        info!("found {} provider(s) for {model_id}", providers.len());

        for provider in &providers {
            let tool_runs: Vec<TrialRecord> = (0..self.trials)
                .map(|_| self.checker.tool_trial(model_id, provider))
                .collect();
            let tool = self.provider_result(model_id, provider, tool_runs);

            let structured_runs: Vec<TrialRecord> = (0..self.trials)
                .map(|_| self.checker.structured_trial(model_id, provider))
                .collect();
            let structured = self.provider_result(model_id, provider, structured_runs);

            info!(
                provider = %provider.display_name,
                "tools {}/{}, structured output {}/{}",
                tool.summary.success_count, tool.summary.total_runs,
                structured.summary.success_count, structured.summary.total_runs,
            );

            result.providers.push(tool);
            result.structured_output.push(structured);
        }

        result.providers_tested = providers.len();
        result
    }

    fn provider_result(&self, model_id: &str, provider: &ProviderInfo, runs: Vec<TrialRecord>) -> ProviderResult {
        let errors = runs.iter().filter(|r| r.status == TrialStatus::Error).count();
        if errors > 0 {
            warn!(provider = %provider.name, "{model_id}: {errors} trial(s) failed with an error");
        }

        let mut result = ProviderResult::new(model_id, &provider.name, &provider.display_name, runs);
        result.vendor = provider.vendor.clone();
        result.region = provider.region.clone();
        result
    }
}
