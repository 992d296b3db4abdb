use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use toolcheck_lib::checker::DEFAULT_TRIALS;
use toolcheck_lib::request::DEFAULT_TIMEOUT;
use toolcheck_lib::{Platform, PlatformConfig};
use crate::{error::AppError, options::{Options, Task}};

/// Default model list.
pub const DEFAULT_MODELS: &str = "config/models.json";
/// Default directory of the result files.
pub const DEFAULT_DATA_DIR: &str = "data";
/// Default directory of the website.
pub const DEFAULT_DOCS_DIR: &str = "docs";

// io.net rate limits consecutive models.
const IONET_PAUSE: Duration = Duration::from_secs(5);

/// App config
#[derive(Clone, Debug)]
pub struct Config {
    /// Command to execute.
    pub task: Task,
    /// Settings file given explicitly.
    pub config_path: Option<String>,
    /// Model list.
    pub models: PathBuf,
    /// Directory of the result files.
    pub data_dir: PathBuf,
    /// Directory of the website.
    pub docs_dir: PathBuf,
    /// Trials per model, provider and probe.
    pub trials: usize,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Pause between models, `None` for the platform default.
    pub pause: Option<Duration>,
    /// Base URL overrides.
    pub urls: HashMap<Platform, String>,
    /// Log verbosity.
    pub verbose: u8,
}

impl TryFrom<Options> for Config {
    type Error = AppError;

    fn try_from(options: Options) -> Result<Self, AppError> {
        let task = options.task.ok_or(AppError::MissingArgError("command is not specified."))?;

        let trials = match options.trials {
            Some(n) => usize::try_from(n).map_err(|_| AppError::InvalidArgError("trials must be positive"))?,
            None => DEFAULT_TRIALS,
        };

        let timeout = match options.timeout_secs {
            Some(s) => Duration::from_secs(u64::try_from(s).map_err(|_| AppError::InvalidArgError("timeout must be positive"))?),
            None => DEFAULT_TIMEOUT,
        };

        let pause = options.pause_secs
            .map(|s| u64::try_from(s).map(Duration::from_secs))
            .transpose()
            .map_err(|_| AppError::InvalidArgError("pause must be non-negative"))?;

        Ok(Config {
            task,
            config_path: options.config_path,
            models: options.models.unwrap_or_else(|| DEFAULT_MODELS.to_owned()).into(),
            data_dir: options.data_dir.unwrap_or_else(|| DEFAULT_DATA_DIR.to_owned()).into(),
            docs_dir: options.docs_dir.unwrap_or_else(|| DEFAULT_DOCS_DIR.to_owned()).into(),
            trials,
            timeout,
            pause,
            urls: options.urls.into_iter().collect(),
            verbose: options.verbose,
        })
    }
}

impl Config {

    /// Result file of a platform.
    pub fn results_path(&self, platform: Platform) -> PathBuf {
        self.data_dir.join(platform.results_file())
    }

    /// Pause between models of a platform.
    pub fn pause_for(&self, platform: Platform) -> Duration {
        self.pause.unwrap_or(match platform {
            Platform::IoNet | Platform::IoNetLibrary => IONET_PAUSE,
            _ => Duration::ZERO,
        })
    }

    /// Connection settings of a platform, the API key is taken from the environment.
    pub fn platform_config(&self, platform: Platform) -> Result<PlatformConfig, AppError> {
        self.platform_config_with(platform, |var| std::env::var(var).ok())
    }

    fn platform_config_with(&self, platform: Platform, lookup: impl Fn(&str) -> Option<String>) -> Result<PlatformConfig, AppError> {
        let api_key = platform.api_key_vars()
            .iter()
            .filter_map(|var| lookup(var))
            .find(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::MissingApiKey {
                platform: platform.display_name(),
                vars: platform.api_key_vars().join(", "),
            })?;

        let mut config = PlatformConfig::new(platform, api_key);
        if let Some(url) = self.urls.get(&platform) {
            config.base_url = url.clone();
        }
        Ok(config)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn options() -> Options {
        Options {
            task: Some(Task::Test(Platform::IoNet)),
            ..Default::default()
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::try_from(options()).expect("create from options");

        assert_eq!(config.task, Task::Test(Platform::IoNet));
        assert_eq!(config.models, PathBuf::from("config/models.json"));
        assert_eq!(config.results_path(Platform::HuggingFace), PathBuf::from("data/data_hf.json"));
        assert_eq!(config.docs_dir, PathBuf::from("docs"));
        assert_eq!(config.trials, 3);
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.pause_for(Platform::IoNet), Duration::from_secs(5));
        assert_eq!(config.pause_for(Platform::OpenRouter), Duration::ZERO);
    }

    #[test]
    fn test_config_try_from() {
        let mut options = options();
        options.models = Some("m.json".into());
        options.data_dir = Some("out".into());
        options.trials = Some(1);
        options.timeout_secs = Some(15);
        options.pause_secs = Some(0);
        options.urls = vec![(Platform::IoNet, "http://localhost:9000/v1".into())];
        options.verbose = 1;

        let config = Config::try_from(options).expect("create from options");

        assert_eq!(config.models, PathBuf::from("m.json"));
        assert_eq!(config.results_path(Platform::IoNetLibrary), PathBuf::from("out/data_ionet_iointel.json"));
        assert_eq!(config.trials, 1);
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.pause_for(Platform::IoNet), Duration::ZERO);
        assert_eq!(config.verbose, 1);

        let platform = config.platform_config_with(Platform::IoNet, |_| Some("io-key".into())).expect("platform config");
        assert_eq!(platform.api_key, "io-key");
        assert_eq!(platform.chat_url(), "http://localhost:9000/v1/chat/completions");

        assert!(Config::try_from(Options::new()).is_err());
    }

    #[test]
    fn test_api_key_lookup() {
        let config = Config::try_from(options()).expect("create from options");

        let platform = config.platform_config_with(Platform::HuggingFace, |var| match var {
            "HF_TOKEN" => Some(" ".into()),
            "HUGGING_FACE_HUB_TOKEN" => Some("hub-token".into()),
            _ => None,
        }).expect("platform config");
        assert_eq!(platform.api_key, "hub-token");
        assert_eq!(platform.base_url, "https://router.huggingface.co/v1");

        let err = config.platform_config_with(Platform::OpenRouter, |_| None).unwrap_err();
        assert!(matches!(err, AppError::MissingApiKey { .. }));
        assert!(err.to_string().contains("OPENROUTER_API_KEY"));
    }
}
