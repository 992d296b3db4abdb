use toml::Table;
use toml::Value;
use toolcheck_lib::Platform;
use crate::options::Options;
use crate::error::AppError;

fn get_str_val<'a>(val: &'a Value, err: &'static str) -> Result<&'a str, AppError> {
    val.as_str().ok_or(AppError::ConfigParseError(err))
}

fn get_int_val(val: &Value, min: i64, err: &'static str) -> Result<i64, AppError> {
    match val.as_integer() {
        Some(x) if x >= min => Ok(x),
        _ => Err(AppError::ConfigParseError(err)),
    }
}

/// Fill options from the settings file.
///
/// ```toml
/// [settings]
/// models = "config/models.json"
/// data_dir = "data"
/// docs_dir = "docs"
/// trials = 3
/// timeout_secs = 120
/// pause_secs = 0
///
/// [urls]
/// openrouter = "https://openrouter.ai/api/v1"
/// ```
pub fn parse_toml_config(content: &str, options: &mut Options) -> Result<(), AppError> {

    let toml_config: Table = toml::from_str(content)?;

    if let Some(settings_section) = toml_config.get("settings") {
        let settings = settings_section.as_table()
            .ok_or(AppError::ConfigParseError("settings must be a table"))?;

        if let Some(val) = settings.get("models") {
            options.models.replace(get_str_val(val, "models must be a string value")?.to_owned());
        }

        if let Some(val) = settings.get("data_dir") {
            options.data_dir.replace(get_str_val(val, "data_dir must be a string value")?.to_owned());
        }

        if let Some(val) = settings.get("docs_dir") {
            options.docs_dir.replace(get_str_val(val, "docs_dir must be a string value")?.to_owned());
        }

        if let Some(val) = settings.get("trials") {
            options.trials.replace(get_int_val(val, 1, "trials must be a positive integer value")?);
        }

        if let Some(val) = settings.get("timeout_secs") {
            options.timeout_secs.replace(get_int_val(val, 1, "timeout_secs must be a positive integer value")?);
        }

        if let Some(val) = settings.get("pause_secs") {
            options.pause_secs.replace(get_int_val(val, 0, "pause_secs must be a non-negative integer value")?);
        }
    }

    if let Some(urls_section) = toml_config.get("urls") {
        let urls = urls_section.as_table()
            .ok_or(AppError::ConfigParseError("urls must be a table"))?;

        for (key, val) in urls {
            let platform = Platform::try_from(key.as_str())
                .map_err(|_| AppError::ConfigParseError("urls keys must be platform names"))?;
            let url = get_str_val(val, "urls values must be string values")?;
            options.urls.push((platform, url.to_owned()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_parser() {
        const SAMPLE_CONTENT: &str = "
# General settings
[settings]
models = \"config/models.json\"   # Model list
data_dir = \"out/data\"
docs_dir = \"out/docs\"
trials = 5
timeout_secs = 60
pause_secs = 2

# Base URL overrides
[urls]
openrouter = \"http://localhost:8001/api/v1\"
ionet-library = \"http://localhost:8002/api/v1\"
";

        let mut options = Options::new();
        assert!(parse_toml_config(SAMPLE_CONTENT, &mut options).is_ok());

        assert_eq!(options.models, Some("config/models.json".into()));
        assert_eq!(options.data_dir, Some("out/data".into()));
        assert_eq!(options.docs_dir, Some("out/docs".into()));
        assert_eq!(options.trials, Some(5));
        assert_eq!(options.timeout_secs, Some(60));
        assert_eq!(options.pause_secs, Some(2));
        assert_eq!(options.urls.len(), 2);
        assert!(options.urls.contains(&(Platform::OpenRouter, "http://localhost:8001/api/v1".to_owned())));
        assert!(options.urls.contains(&(Platform::IoNetLibrary, "http://localhost:8002/api/v1".to_owned())));
        assert_eq!(options.task, None);
    }

    #[test]
    fn test_toml_parser_errors() {
        let mut options = Options::new();

        let result = parse_toml_config("[settings]\ntrials = 0\n", &mut options);
        assert!(matches!(result, Err(AppError::ConfigParseError(_))));

        let result = parse_toml_config("[settings]\nmodels = 12\n", &mut options);
        assert!(matches!(result, Err(AppError::ConfigParseError(_))));

        let result = parse_toml_config("[urls]\nazure = \"http://x\"\n", &mut options);
        assert!(matches!(result, Err(AppError::ConfigParseError(_))));

        let result = parse_toml_config("settings = [", &mut options);
        assert!(matches!(result, Err(AppError::TomlError(_))));
    }
}
