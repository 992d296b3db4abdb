//! Console summaries.
use std::path::Path;
use std::process::ExitStatus;
use toolcheck_lib::checker::{LevelCounts, Tally};
use toolcheck_lib::results::ResultsFile;
use toolcheck_lib::Platform;
use crate::style::Styles;

fn counts_line(styles: &Styles, label: &str, counts: &LevelCounts) -> String {
    format!("  {}{label:<19}{:#} {}full {}{:#}, {}partial {}{:#}, {}none {}{:#}",
        styles.label, styles.label,
        styles.full, counts.full, styles.full,
        styles.partial, counts.partial, styles.partial,
        styles.none, counts.none, styles.none)
}

/// Summary of one platform run.
pub fn platform_summary(styles: &Styles, platform: Platform, results: &ResultsFile, path: &Path) -> String {
    let tally = Tally::from_results(results);
    let mut lines = vec![
        format!("{}{} results{:#}", styles.heading, platform.display_name(), styles.heading),
        format!("  {}{:<19}{:#} {}", styles.label, "models tested", styles.label, results.total_models),
        format!("  {}{:<19}{:#} {}", styles.label, "providers tested", styles.label, tally.providers),
        counts_line(styles, "tool calling", &tally.tool),
    ];
    if tally.structured.total() > 0 {
        lines.push(counts_line(styles, "structured output", &tally.structured));
    }
    lines.push(format!("  {}{:<19}{:#} {}", styles.label, "saved to", styles.label, path.display()));

    lines.join("\n")
}

/// Exit status of every child run.
pub fn children_summary(styles: &Styles, statuses: &[(Platform, Option<ExitStatus>)]) -> String {
    let mut out = format!("{}Platform runs{:#}", styles.heading, styles.heading);

    for (platform, status) in statuses {
        let (style, text) = match status {
            Some(s) if s.success() => (&styles.full, "ok".to_owned()),
            Some(s) => (&styles.none, match s.code() {
                Some(code) => format!("failed (exit code {code})"),
                None => "terminated".to_owned(),
            }),
            None => (&styles.none, "not started".to_owned()),
        };
        out.push_str(&format!("\n  {}{:<19}{:#} {style}{text}{style:#}", styles.label, platform.key(), styles.label));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolcheck_lib::probe::TrialStatus;
    use toolcheck_lib::results::{ModelResult, ProviderResult, TrialRecord};

    fn provider(name: &str, statuses: &[TrialStatus]) -> ProviderResult {
        let runs = statuses.iter()
            .map(|s| TrialRecord::new("a/b", name, *s, Some(*s == TrialStatus::Success)))
            .collect();
        ProviderResult::new("a/b", name, name, runs)
    }

    #[test]
    fn test_platform_summary() {
        let mut model = ModelResult::empty("a/b", Some("B".into()));
        model.providers.push(provider("p1", &[TrialStatus::Success; 3]));
        model.providers.push(provider("p2", &[TrialStatus::Success, TrialStatus::Error, TrialStatus::NoToolCall]));
        model.structured_output.push(provider("p1", &[TrialStatus::InvalidJson; 3]));
        model.providers_tested = 2;
        let results = ResultsFile::new("openrouter", vec![model, ModelResult::empty("c/d", None)]);

        let text = platform_summary(&Styles::plain(), Platform::OpenRouter, &results, Path::new("data/data.json"));

        assert!(text.starts_with("OpenRouter results\n"));
        assert!(text.contains("models tested       2"));
        assert!(text.contains("providers tested    2"));
        assert!(text.contains("tool calling        full 1, partial 1, none 0"));
        assert!(text.contains("structured output   full 0, partial 0, none 1"));
        assert!(text.ends_with("saved to            data/data.json"));
    }

    #[test]
    fn test_summary_without_structured_output() {
        let results = ResultsFile::new("ionet", vec![]);
        let text = platform_summary(&Styles::plain(), Platform::IoNet, &results, Path::new("x.json"));
        assert!(!text.contains("structured output"));
        assert!(text.contains("tool calling        full 0, partial 0, none 0"));
    }

    #[test]
    fn test_children_summary() {
        let text = children_summary(&Styles::plain(), &[(Platform::HuggingFace, None)]);
        assert_eq!(text, "Platform runs\n  huggingface         not started");
    }
}
