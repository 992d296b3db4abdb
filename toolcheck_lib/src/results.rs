//! Result files written by the checkers and read by the dashboard generator.
use std::fs;
use std::path::Path;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::error::Error;
use crate::probe::TrialStatus;

/// Current local time in RFC 3339.
pub fn now_timestamp() -> String {
    Local::now().to_rfc3339()
}

/// Parse a result timestamp into UTC.
/// Timestamps without an offset are taken as UTC.
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| Utc.from_utc_datetime(&dt))
}

/// One probe request and its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Tested model id.
    pub model_id: String,
    /// Provider the request was routed to.
    pub provider_name: String,
    /// Outcome.
    pub status: TrialStatus,
    /// Whether the feature looks supported, `null` when unknown.
    pub supported: Option<bool>,
    /// Error text of a failed request.
    #[serde(default)]
    pub error: Option<String>,
    /// Text answer of the model.
    #[serde(default)]
    pub response_content: Option<String>,
    /// Tool calls requested by the model.
    #[serde(default)]
    pub tool_calls: Option<Value>,
    /// Finish reason reported by the provider.
    #[serde(default)]
    pub finish_reason: Option<String>,
    /// Model that served the request.
    #[serde(default)]
    pub model_used: Option<String>,
    /// Time of the trial.
    pub timestamp: String,
}

impl TrialRecord {
    /// Create record with the given outcome and no details.
    pub fn new(model_id: &str, provider_name: &str, status: TrialStatus, supported: Option<bool>) -> Self {
        TrialRecord {
            model_id: model_id.to_owned(),
            provider_name: provider_name.to_owned(),
            status,
            supported,
            error: None,
            response_content: None,
            tool_calls: None,
            finish_reason: None,
            model_used: None,
            timestamp: now_timestamp(),
        }
    }
}

/// How well a feature is supported over all trials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportLevel {
    /// Every trial succeeded.
    Full,
    /// Some trials succeeded.
    Partial,
    /// No trial succeeded.
    None,
}

/// Trial counts per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Summary {
    /// Number of trials.
    pub total_runs: usize,
    /// `success` trials.
    pub success_count: usize,
    /// `error` trials.
    pub error_count: usize,
    /// `unclear` trials.
    pub unclear_count: usize,
    /// `no_tool_call` trials.
    pub no_tool_call_count: usize,
    /// `invalid_json` and `invalid_schema` trials.
    pub invalid_count: usize,
}

impl Summary {
    /// Count trials.
    pub fn from_runs(runs: &[TrialRecord]) -> Self {
        let mut summary = Summary { total_runs: runs.len(), ..Default::default() };
        for run in runs {
            match run.status {
                TrialStatus::Success => summary.success_count += 1,
                TrialStatus::Error => summary.error_count += 1,
                TrialStatus::Unclear => summary.unclear_count += 1,
                TrialStatus::NoToolCall => summary.no_tool_call_count += 1,
                TrialStatus::InvalidJson | TrialStatus::InvalidSchema => summary.invalid_count += 1,
            }
        }
        summary
    }

    /// Support level.
    pub fn support(&self) -> SupportLevel {
        if self.total_runs > 0 && self.success_count == self.total_runs {
            SupportLevel::Full
        } else if self.success_count > 0 {
            SupportLevel::Partial
        } else {
            SupportLevel::None
        }
    }
}

/// Trials of one probe against one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResult {
    /// Tested model id.
    pub model_id: String,
    /// Provider name.
    pub provider_name: String,
    /// Display name.
    #[serde(default)]
    pub display_name: String,
    /// Vendor behind the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    /// Region of the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Trials.
    #[serde(default)]
    pub test_runs: Vec<TrialRecord>,
    /// Trial counts.
    #[serde(default)]
    pub summary: Summary,
    /// Time the provider was tested.
    #[serde(default)]
    pub timestamp: String,
}

impl ProviderResult {
    /// Build result from trials; summary is derived from them.
    pub fn new(model_id: &str, provider_name: &str, display_name: &str, test_runs: Vec<TrialRecord>) -> Self {
        ProviderResult {
            model_id: model_id.to_owned(),
            provider_name: provider_name.to_owned(),
            display_name: display_name.to_owned(),
            vendor: None,
            region: None,
            summary: Summary::from_runs(&test_runs),
            test_runs,
            timestamp: now_timestamp(),
        }
    }
}

/// All results of one model on one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResult {
    /// Model id on the platform.
    pub model_id: String,
    /// Friendly name from the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    /// Time the model was tested.
    #[serde(default)]
    pub timestamp: String,
    /// Number of providers found for the model.
    #[serde(default)]
    pub providers_tested: usize,
    /// Tool support per provider.
    #[serde(default)]
    pub providers: Vec<ProviderResult>,
    /// Structured output support per provider.
    #[serde(default)]
    pub structured_output: Vec<ProviderResult>,
}

impl ModelResult {
    /// Model with no providers.
    pub fn empty(model_id: &str, model_name: Option<String>) -> Self {
        ModelResult {
            model_id: model_id.to_owned(),
            model_name,
            timestamp: now_timestamp(),
            providers_tested: 0,
            providers: vec![],
            structured_output: vec![],
        }
    }
}

/// Content of one result file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsFile {
    /// Generation time.
    pub generated_at: String,
    /// Platform key.
    #[serde(default)]
    pub platform: String,
    /// Number of tested models.
    #[serde(default)]
    pub total_models: usize,
    /// Per-model results.
    #[serde(default)]
    pub models: Vec<ModelResult>,
}

impl ResultsFile {
    /// Create file content stamped with the current time.
    pub fn new(platform: &str, models: Vec<ModelResult>) -> Self {
        ResultsFile {
            generated_at: now_timestamp(),
            platform: platform.to_owned(),
            total_models: models.len(),
            models,
        }
    }

    /// Read results.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Read results, `None` when the file does not exist.
    pub fn load_optional(path: &Path) -> Result<Option<Self>, Error> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Write results as pretty JSON, creating the parent directory.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).map_err(|e| Error::io(path, e))
    }

    /// Whether any model carries structured output results.
    pub fn has_structured_output(&self) -> bool {
        self.models.iter().any(|m| !m.structured_output.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn runs(statuses: &[TrialStatus]) -> Vec<TrialRecord> {
        statuses.iter().map(|s| TrialRecord::new("m/x", "together", *s, None)).collect()
    }

    #[test]
    fn test_summary() {
        let summary = Summary::from_runs(&runs(&[
            TrialStatus::Success,
            TrialStatus::Error,
            TrialStatus::InvalidJson,
            TrialStatus::InvalidSchema,
            TrialStatus::NoToolCall,
            TrialStatus::Unclear,
        ]));

        assert_eq!(summary.total_runs, 6);
        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.invalid_count, 2);
        assert_eq!(summary.no_tool_call_count, 1);
        assert_eq!(summary.unclear_count, 1);
        assert_eq!(
            summary.success_count + summary.error_count + summary.unclear_count
                + summary.no_tool_call_count + summary.invalid_count,
            summary.total_runs
        );
    }

    #[test]
    fn test_support_level() {
        let full = Summary::from_runs(&runs(&[TrialStatus::Success; 3]));
        assert_eq!(full.support(), SupportLevel::Full);

        let partial = Summary::from_runs(&runs(&[TrialStatus::Success, TrialStatus::Error, TrialStatus::Error]));
        assert_eq!(partial.support(), SupportLevel::Partial);

        let none = Summary::from_runs(&runs(&[TrialStatus::NoToolCall; 3]));
        assert_eq!(none.support(), SupportLevel::None);

        assert_eq!(Summary::default().support(), SupportLevel::None);
    }

    #[test]
    fn test_save_load() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("data").join("data.json");

        let mut model = ModelResult::empty("m/x", Some("Model X".into()));
        model.providers.push(ProviderResult::new("m/x", "together", "Together", runs(&[TrialStatus::Success; 3])));
        model.providers_tested = 1;

        let results = ResultsFile::new("openrouter", vec![model]);
        results.save(&path).expect("results saved");

        let loaded = ResultsFile::load(&path).expect("results loaded");
        assert_eq!(loaded, results);
        assert!(!loaded.has_structured_output());

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"status\": \"success\""));
        assert!(text.contains("\"supported\": null"));
        assert!(!text.contains("vendor"));

        assert!(ResultsFile::load_optional(&dir.path().join("missing.json")).unwrap().is_none());
    }

    #[test]
    fn test_load_sparse_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("data_hf.json");
        fs::write(&path, r#"{
            "generated_at": "2025-05-01T10:20:30.123456",
            "models": [{"model_id": "a/b", "providers": [{"model_id": "a/b", "provider_name": "Nebius"}]}]
        }"#).unwrap();

        let loaded = ResultsFile::load(&path).expect("results loaded");
        assert_eq!(loaded.total_models, 0);
        assert_eq!(loaded.models[0].providers[0].summary, Summary::default());
        assert!(loaded.models[0].structured_output.is_empty());
    }

    #[test]
    fn test_parse_timestamp() {
        let dt = parse_timestamp("2025-05-01T10:20:30.123456").expect("naive timestamp");
        assert_eq!((dt.year(), dt.hour(), dt.minute()), (2025, 10, 20));

        let dt = parse_timestamp("2025-05-01T12:20:30+02:00").expect("rfc3339 timestamp");
        assert_eq!(dt.hour(), 10);

        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp(&now_timestamp()).is_some());
    }
}
