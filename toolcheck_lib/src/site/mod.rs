//! Static dashboard generator.
//!
//! Reads the result files of every platform, merges them into one table per
//! probe, and writes a self-contained `index.html`.
mod html;
mod model;

use std::fs;
use std::path::{Path, PathBuf};
use chrono::Utc;
use tracing::{info, warn};
use crate::catalog::ModelCatalog;
use crate::config::Platform;
use crate::error::Error;
use crate::results::{parse_timestamp, ResultsFile};

pub use html::{escape_html, render, Page};
pub use model::{library_rows, normalize_provider_names, provider_columns, unified_rows, Cell, CellStatus, Probe, Row, RowData};

/// Name of the generated page.
pub const INDEX_FILE: &str = "index.html";

/// Result files of all platforms.
#[derive(Debug, Clone, Default)]
pub struct SiteData {
    /// OpenRouter results.
    pub openrouter: Option<ResultsFile>,
    /// Hugging Face results.
    pub huggingface: Option<ResultsFile>,
    /// io.net HTTP results.
    pub ionet: Option<ResultsFile>,
    /// io.net library results.
    pub library: Option<ResultsFile>,
}

impl SiteData {

    /// Load result files; missing files are skipped.
    pub fn load(data_dir: &Path) -> Result<Self, Error> {
        let load = |platform: Platform| -> Result<Option<ResultsFile>, Error> {
            let path = data_dir.join(platform.results_file());
            let results = ResultsFile::load_optional(&path)?;
            match &results {
                Some(r) => info!("loaded {} results: {} model(s)", platform.display_name(), r.models.len()),
                None => warn!("{} results file not found: {}", platform.display_name(), path.display()),
            }
            Ok(results)
        };

        let mut data = SiteData {
            openrouter: load(Platform::OpenRouter)?,
            huggingface: load(Platform::HuggingFace)?,
            ionet: load(Platform::IoNet)?,
            library: load(Platform::IoNetLibrary)?,
        };
        data.normalize();
        Ok(data)
    }

    /// Normalize provider names of every loaded file.
    pub fn normalize(&mut self) {
        for results in [&mut self.openrouter, &mut self.huggingface, &mut self.ionet, &mut self.library]
            .into_iter()
            .flatten()
        {
            normalize_provider_names(results);
        }
    }

    fn all(&self) -> impl Iterator<Item = &ResultsFile> {
        [&self.openrouter, &self.huggingface, &self.ionet, &self.library]
            .into_iter()
            .flatten()
    }
}

/// Render the dashboard page.
pub fn render_site(catalog: &ModelCatalog, data: &SiteData) -> String {
    let generated_at = data.all()
        .filter_map(|r| parse_timestamp(&r.generated_at))
        .max()
        .unwrap_or_else(Utc::now);

    let has_structured = [&data.openrouter, &data.huggingface, &data.ionet]
        .into_iter()
        .flatten()
        .any(ResultsFile::has_structured_output);

    let page = Page {
        rows: unified_rows(catalog, data.openrouter.as_ref(), data.huggingface.as_ref(), data.ionet.as_ref()),
        providers: provider_columns(data.openrouter.as_ref(), data.huggingface.as_ref(), data.ionet.as_ref()),
        has_structured,
        library_rows: data.library.as_ref().map(library_rows),
        library_has_structured: data.library.as_ref().is_some_and(ResultsFile::has_structured_output),
        generated_at,
    };

    render(&page)
}

/// Generate `index.html` in `docs_dir` from the result files in `data_dir`.
pub fn generate(catalog: &ModelCatalog, data_dir: &Path, docs_dir: &Path) -> Result<PathBuf, Error> {
    let data = SiteData::load(data_dir)?;

    let html = render_site(catalog, &data);

    fs::create_dir_all(docs_dir).map_err(|e| Error::io(docs_dir, e))?;
    let path = docs_dir.join(INDEX_FILE);
    fs::write(&path, html).map_err(|e| Error::io(&path, e))?;

    info!("website generated: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::TrialStatus;
    use crate::results::{ModelResult, ProviderResult, TrialRecord};

    fn results(platform: Platform, model_id: &str, provider: &str, generated_at: &str) -> ResultsFile {
        let runs = vec![TrialRecord::new(model_id, provider, TrialStatus::Success, Some(true))];
        let mut model = ModelResult::empty(model_id, Some("Alpha".into()));
        model.providers.push(ProviderResult::new(model_id, provider, provider, runs.clone()));
        model.structured_output.push(ProviderResult::new(model_id, provider, provider, runs));
        model.providers_tested = 1;

        let mut file = ResultsFile::new(platform.key(), vec![model]);
        file.generated_at = generated_at.to_owned();
        file
    }

    #[test]
    fn test_generate() {
        let dir = tempfile::tempdir().expect("temp dir");
        let data_dir = dir.path().join("data");
        let docs_dir = dir.path().join("docs");

        results(Platform::OpenRouter, "a/alpha", "Fireworks-AI", "2025-05-01T10:00:00")
            .save(&data_dir.join(Platform::OpenRouter.results_file())).unwrap();
        results(Platform::IoNet, "A/Alpha", "io.net", "2025-05-02T11:30:00+00:00")
            .save(&data_dir.join(Platform::IoNet.results_file())).unwrap();

        let catalog = ModelCatalog::parse(r#"{"Alpha": {"openrouter": ["a/alpha"], "iointel": "A/Alpha"}}"#).unwrap();

        let path = generate(&catalog, &data_dir, &docs_dir).expect("website generated");
        assert_eq!(path, docs_dir.join(INDEX_FILE));

        let html = fs::read_to_string(path).unwrap();
        assert!(html.contains("Alpha (OR)"));
        assert!(html.contains("Alpha (io.net)"));
        assert!(html.contains(r#"data-provider="fireworks""#));
        assert!(html.contains(r#"data-col-index="2">io.net</th>"#));
        assert!(html.contains("Structured Output"));
        assert!(html.contains("Last updated: 2025-05-02 11:30 UTC"));
        assert!(html.contains("No library test results available."));
    }

    #[test]
    fn test_load_without_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let data = SiteData::load(dir.path()).expect("empty data loaded");
        assert!(data.openrouter.is_none() && data.library.is_none());

        let html = render_site(&ModelCatalog::default(), &data);
        assert!(html.contains(r#"<table id="http-tool-support-table">"#));
        assert!(!html.contains("Structured Output</div>"));
    }

    #[test]
    fn test_library_tab() {
        let data = SiteData {
            library: Some(results(Platform::IoNetLibrary, "A/Alpha", "io.net", "2025-05-03T09:00:00")),
            ..Default::default()
        };

        let html = render_site(&ModelCatalog::default(), &data);
        assert!(html.contains(r#"id="content-library-structured""#));
        assert!(html.contains(r#"<td class="model-name-cell">Alpha</td>"#));
        assert!(html.contains("Last updated: 2025-05-03 09:00 UTC"));
    }
}
