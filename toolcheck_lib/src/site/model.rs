//! Table rows and cell statuses of the dashboard.
use std::collections::{BTreeSet, HashMap};
use crate::catalog::ModelCatalog;
use crate::checker::IONET_PROVIDER;
use crate::config::Platform;
use crate::probe::TrialStatus;
use crate::results::{ModelResult, ProviderResult, ResultsFile};

/// Which probe a table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    /// Tool calling.
    Tool,
    /// Structured output.
    Structured,
}

/// Status of a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CellStatus {
    /// No data.
    None,
    /// No trial succeeded.
    Failure,
    /// Some trials succeeded.
    Partial,
    /// Every trial succeeded.
    Success,
}

impl CellStatus {
    /// CSS class.
    pub fn class(&self) -> &'static str {
        match self {
            CellStatus::None => "none",
            CellStatus::Failure => "failure",
            CellStatus::Partial => "partial",
            CellStatus::Success => "success",
        }
    }
}

/// Content of a table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Status.
    pub status: CellStatus,
    /// Text, e.g. `2/3`.
    pub text: String,
    /// Why trials failed.
    pub reasons: Vec<String>,
}

impl Cell {
    fn none() -> Self {
        Cell { status: CellStatus::None, text: "-".to_owned(), reasons: vec![] }
    }
}

/// Results behind a row.
#[derive(Debug, Clone)]
pub enum RowData<'a> {
    /// OpenRouter regular and `:free` variants of one catalog entry.
    Variants {
        /// Regular variant results.
        regular: Option<&'a ModelResult>,
        /// Free variant results.
        free: Option<&'a ModelResult>,
        /// Catalog lists a regular variant.
        regular_defined: bool,
        /// Catalog lists a free variant.
        free_defined: bool,
    },
    /// Results of one model id.
    Single(&'a ModelResult),
}

/// Table row.
#[derive(Debug, Clone)]
pub struct Row<'a> {
    /// Label of the row.
    pub display_name: String,
    /// Platform of the results.
    pub platform: Platform,
    /// Results.
    pub data: RowData<'a>,
    sort_key: (String, &'static str, String),
}

impl<'a> Row<'a> {
    /// Row over a single model result.
    pub fn single(display_name: String, platform: Platform, model: &'a ModelResult) -> Self {
        Row {
            sort_key: (display_name.clone(), platform.tag(), model.model_id.clone()),
            display_name,
            platform,
            data: RowData::Single(model),
        }
    }

    /// Cell of this row for a provider column.
    pub fn cell(&self, provider: &str, probe: Probe) -> Cell {
        match &self.data {
            RowData::Single(model) => model_cell(Some(model), provider, probe),
            RowData::Variants { regular, free, regular_defined, free_defined } => {
                let reg = model_cell(*regular, provider, probe);
                let free_cell = model_cell(*free, provider, probe);

                if *regular_defined && !*free_defined {
                    return reg;
                }
                if *free_defined && !*regular_defined {
                    return free_cell;
                }

                let texts: Vec<&str> = [&reg, &free_cell].iter()
                    .filter(|c| c.status != CellStatus::None)
                    .map(|c| c.text.as_str())
                    .collect();

                if texts.is_empty() {
                    return Cell::none();
                }

                let mut reasons = reg.reasons.clone();
                reasons.extend(free_cell.reasons.iter().cloned());

                Cell {
                    status: reg.status.max(free_cell.status),
                    text: texts.join(" | "),
                    reasons,
                }
            }
        }
    }
}

fn truncate(text: &str, len: usize) -> String {
    text.chars().take(len).collect()
}

fn provider_list(model: &ModelResult, probe: Probe) -> &[ProviderResult] {
    match probe {
        Probe::Tool => &model.providers,
        Probe::Structured => &model.structured_output,
    }
}

fn model_cell(model: Option<&ModelResult>, provider: &str, probe: Probe) -> Cell {
    let Some(model) = model else {
        return Cell::none();
    };

    let Some(result) = provider_list(model, probe).iter().find(|p| p.provider_name == provider) else {
        return Cell::none();
    };

    let summary = &result.summary;
    if summary.total_runs == 0 {
        return Cell {
            status: CellStatus::None,
            text: "?".to_owned(),
            reasons: vec!["Missing summary data".to_owned()],
        };
    }

    let text = format!("{}/{}", summary.success_count, summary.total_runs);

    if summary.success_count == summary.total_runs {
        return Cell { status: CellStatus::Success, text, reasons: vec![] };
    }

    let mut reasons: Vec<String> = Vec::new();

    if summary.success_count == 0 {
        for run in &result.test_runs {
            match run.status {
                TrialStatus::Error => {
                    if let Some(error) = &run.error {
                        let error = truncate(error, 100);
                        if !reasons.contains(&error) {
                            reasons.push(error);
                        }
                    }
                },
                TrialStatus::Unclear => reasons.push("Empty response".to_owned()),
                TrialStatus::NoToolCall | TrialStatus::InvalidJson | TrialStatus::InvalidSchema => {
                    match run.response_content.as_deref().filter(|c| !c.is_empty()) {
                        Some(content) => reasons.push(format!("No proper response: {}...", truncate(content, 50))),
                        None => reasons.push("No proper response (empty)".to_owned()),
                    }
                },
                TrialStatus::Success => {},
            }
        }
        if reasons.is_empty() {
            reasons.push("Unknown failure".to_owned());
        }
        Cell { status: CellStatus::Failure, text, reasons }
    } else {
        for run in &result.test_runs {
            match run.status {
                TrialStatus::Error => {
                    if let Some(error) = &run.error {
                        reasons.push(format!("Error: {}...", truncate(error, 50)));
                    }
                },
                TrialStatus::Unclear => reasons.push("Empty response".to_owned()),
                TrialStatus::NoToolCall | TrialStatus::InvalidJson | TrialStatus::InvalidSchema => {
                    reasons.push("Invalid response format".to_owned());
                },
                TrialStatus::Success => {},
            }
        }
        if reasons.is_empty() {
            reasons.push("Unknown partial failure".to_owned());
        }
        Cell { status: CellStatus::Partial, text, reasons }
    }
}

/// Lower-case provider names, `fireworks-ai` becomes `fireworks`.
pub fn normalize_provider_names(results: &mut ResultsFile) {
    for model in results.models.iter_mut() {
        for provider in model.providers.iter_mut().chain(model.structured_output.iter_mut()) {
            let mut name = provider.provider_name.to_lowercase();
            if name == "fireworks-ai" {
                name = "fireworks".to_owned();
            }
            provider.provider_name = name;
        }
    }
}

/// Rows of the HTTP tables, sorted by friendly name, platform and model id.
/// Results of models missing from the catalog are skipped.
pub fn unified_rows<'a>(
    catalog: &ModelCatalog,
    openrouter: Option<&'a ResultsFile>,
    huggingface: Option<&'a ResultsFile>,
    ionet: Option<&'a ResultsFile>,
) -> Vec<Row<'a>> {
    let mut rows = Vec::new();

    if let Some(results) = openrouter {
        let by_id: HashMap<&str, &ModelResult> = results.models.iter().map(|m| (m.model_id.as_str(), m)).collect();

        for entry in catalog.entries() {
            let (regular_id, free_id) = entry.openrouter_variants();

            let regular = regular_id.and_then(|id| by_id.get(id).copied());
            let free = free_id.and_then(|id| by_id.get(id).copied());

            let sort_id = match (regular, free) {
                (Some(m), _) | (None, Some(m)) => m.model_id.clone(),
                (None, None) => continue,
            };

            rows.push(Row {
                display_name: format!("{} (OR)", entry.name),
                platform: Platform::OpenRouter,
                data: RowData::Variants {
                    regular,
                    free,
                    regular_defined: regular_id.is_some(),
                    free_defined: free_id.is_some(),
                },
                sort_key: (entry.name.clone(), Platform::OpenRouter.tag(), sort_id),
            });
        }
    }

    let singles = [
        (huggingface, Platform::HuggingFace, "HF"),
        (ionet, Platform::IoNet, "io.net"),
    ];

    for (results, platform, suffix) in singles {
        let Some(results) = results else { continue };
        for model in &results.models {
            if let Some(name) = catalog.friendly_name(platform, &model.model_id) {
                let mut row = Row::single(format!("{name} ({suffix})"), platform, model);
                row.sort_key.0 = name.to_owned();
                rows.push(row);
            }
        }
    }

    rows.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));
    rows
}

/// Rows of the library tables, in result file order.
pub fn library_rows(library: &ResultsFile) -> Vec<Row<'_>> {
    library.models.iter()
        .map(|m| Row::single(m.model_name.clone().unwrap_or_else(|| m.model_id.clone()), Platform::IoNetLibrary, m))
        .collect()
}

/// Provider columns: sorted OpenRouter and Hugging Face providers, plus `io.net` when io.net tested any model.
pub fn provider_columns(openrouter: Option<&ResultsFile>, huggingface: Option<&ResultsFile>, ionet: Option<&ResultsFile>) -> Vec<String> {
    let mut providers: BTreeSet<String> = BTreeSet::new();

    for results in [openrouter, huggingface].into_iter().flatten() {
        for model in &results.models {
            for provider in &model.providers {
                providers.insert(provider.provider_name.clone());
            }
        }
    }

    if ionet.is_some_and(|r| !r.models.is_empty()) {
        providers.insert(IONET_PROVIDER.to_owned());
    }

    providers.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::TrialRecord;

    fn provider(model_id: &str, name: &str, statuses: &[TrialStatus]) -> ProviderResult {
        let runs = statuses.iter().map(|s| {
            let mut run = TrialRecord::new(model_id, name, *s, None);
            if *s == TrialStatus::Error {
                run.error = Some(format!("Error code: 500 - {}", "x".repeat(200)));
            }
            if *s == TrialStatus::NoToolCall {
                run.response_content = Some("I can't call tools".into());
            }
            run
        }).collect();
        ProviderResult::new(model_id, name, name, runs)
    }

    fn model(model_id: &str, providers: Vec<ProviderResult>) -> ModelResult {
        let mut model = ModelResult::empty(model_id, None);
        model.providers_tested = providers.len();
        model.providers = providers;
        model
    }

    fn catalog() -> ModelCatalog {
        ModelCatalog::parse(r#"{
            "Beta": {"openrouter": ["b/beta", "b/beta:free"], "huggingface": ["B/Beta"], "iointel": "B/Beta-io"},
            "Alpha": {"openrouter": ["a/alpha"]}
        }"#).unwrap()
    }

    #[test]
    fn test_model_cell() {
        use TrialStatus::*;

        let m = model("a/alpha", vec![
            provider("a/alpha", "together", &[Success, Success, Success]),
            provider("a/alpha", "groq", &[Success, Error, Unclear]),
            provider("a/alpha", "novita", &[Error, Error, NoToolCall]),
        ]);

        let cell = model_cell(Some(&m), "together", Probe::Tool);
        assert_eq!((cell.status, cell.text.as_str()), (CellStatus::Success, "3/3"));

        let cell = model_cell(Some(&m), "groq", Probe::Tool);
        assert_eq!(cell.status, CellStatus::Partial);
        assert_eq!(cell.reasons.len(), 2);
        assert!(cell.reasons[0].starts_with("Error: Error code: 500"));
        assert!(cell.reasons[0].ends_with("..."));
        assert_eq!(cell.reasons[1], "Empty response");

        let cell = model_cell(Some(&m), "novita", Probe::Tool);
        assert_eq!((cell.status, cell.text.as_str()), (CellStatus::Failure, "0/3"));
        assert_eq!(cell.reasons.len(), 2, "duplicate errors are reported once");
        assert_eq!(cell.reasons[0].chars().count(), 100);
        assert_eq!(cell.reasons[1], "No proper response: I can't call tools...");

        assert_eq!(model_cell(Some(&m), "fireworks", Probe::Tool), Cell::none());
        assert_eq!(model_cell(Some(&m), "together", Probe::Structured), Cell::none());
        assert_eq!(model_cell(None, "together", Probe::Tool), Cell::none());
    }

    #[test]
    fn test_variant_cells() {
        use TrialStatus::*;

        let regular = model("b/beta", vec![provider("b/beta", "together", &[Error, Error, Error])]);
        let free = model("b/beta:free", vec![
            provider("b/beta:free", "together", &[Success, NoToolCall, Success]),
            provider("b/beta:free", "chutes", &[Success, Success, Success]),
        ]);

        let row = Row {
            display_name: "Beta (OR)".into(),
            platform: Platform::OpenRouter,
            data: RowData::Variants { regular: Some(&regular), free: Some(&free), regular_defined: true, free_defined: true },
            sort_key: Default::default(),
        };

        let cell = row.cell("together", Probe::Tool);
        assert_eq!(cell.status, CellStatus::Partial);
        assert_eq!(cell.text, "0/3 | 2/3");

        let cell = row.cell("chutes", Probe::Tool);
        assert_eq!((cell.status, cell.text.as_str()), (CellStatus::Success, "3/3"));

        assert_eq!(row.cell("groq", Probe::Tool), Cell::none());

        let row = Row {
            data: RowData::Variants { regular: Some(&regular), free: None, regular_defined: true, free_defined: false },
            ..row
        };
        assert_eq!(row.cell("together", Probe::Tool).status, CellStatus::Failure);
        assert_eq!(row.cell("chutes", Probe::Tool).status, CellStatus::None);
    }

    #[test]
    fn test_unified_rows() {
        let catalog = catalog();

        let or_results = ResultsFile::new("openrouter", vec![
            model("a/alpha", vec![]),
            model("b/beta:free", vec![]),
            model("x/unknown", vec![]),
        ]);
        let hf_results = ResultsFile::new("huggingface", vec![model("B/Beta", vec![]), model("Z/Zeta", vec![])]);
        let io_results = ResultsFile::new("ionet", vec![model("B/Beta-io", vec![])]);

        let rows = unified_rows(&catalog, Some(&or_results), Some(&hf_results), Some(&io_results));
        let names: Vec<&str> = rows.iter().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, ["Alpha (OR)", "Beta (HF)", "Beta (OR)", "Beta (io.net)"]);

        match &rows[2].data {
            RowData::Variants { regular, free, regular_defined, free_defined } => {
                assert!(regular.is_none());
                assert_eq!(free.map(|m| m.model_id.as_str()), Some("b/beta:free"));
                assert!(*regular_defined && *free_defined);
            },
            _ => panic!("type mismatch"),
        }
        assert_eq!(rows[3].platform, Platform::IoNet);

        assert!(unified_rows(&catalog, None, None, None).is_empty());
    }

    #[test]
    fn test_normalize_and_columns() {
        let mut or_results = ResultsFile::new("openrouter", vec![model("a/alpha", vec![
            provider("a/alpha", "Fireworks-AI", &[TrialStatus::Success]),
            provider("a/alpha", "Together", &[TrialStatus::Success]),
        ])]);
        or_results.models[0].structured_output.push(provider("a/alpha", "DeepInfra", &[TrialStatus::Success]));
        normalize_provider_names(&mut or_results);

        assert_eq!(or_results.models[0].providers[0].provider_name, "fireworks");
        assert_eq!(or_results.models[0].structured_output[0].provider_name, "deepinfra");

        let hf_results = ResultsFile::new("huggingface", vec![model("B/Beta", vec![
            provider("B/Beta", "nebius", &[TrialStatus::Success]),
            provider("B/Beta", "together", &[TrialStatus::Success]),
        ])]);

        let ionet = ResultsFile::new("ionet", vec![model("C/Gamma", vec![])]);
        let columns = provider_columns(Some(&or_results), Some(&hf_results), Some(&ionet));
        assert_eq!(columns, ["fireworks", "io.net", "nebius", "together"]);

        let empty_ionet = ResultsFile::new("ionet", vec![]);
        assert!(provider_columns(None, None, Some(&empty_ionet)).is_empty());
        assert!(provider_columns(None, None, None).is_empty());
    }

    #[test]
    fn test_library_rows() {
        let mut named = model("B/Beta-io", vec![]);
        named.model_name = Some("Beta".into());
        let library = ResultsFile::new("ionet-library", vec![named, model("C/Gamma", vec![])]);

        let rows = library_rows(&library);
        assert_eq!(rows[0].display_name, "Beta");
        assert_eq!(rows[1].display_name, "C/Gamma");
        assert_eq!(rows[1].platform, Platform::IoNetLibrary);
    }
}
