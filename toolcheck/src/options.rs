//! App initialization functions.

use anstyle::Style;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use std::ffi::OsString;
use toolcheck_lib::Platform;
use crate::error::AppError;
use crate::toml_parser::parse_toml_config;
use dirs::home_dir;

/// Name of the settings file looked up in the home directory.
pub const CONFIG_FILE_NAME: &str = ".toolcheck.toml";

/// Command to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Create directories and a sample model list.
    Setup,
    /// Test the models of one platform.
    Test(Platform),
    /// Test every platform in parallel, then generate the website.
    TestAll,
    /// Render the dashboard.
    GenerateWebsite,
    /// Remove result files and the generated page.
    Clean,
}

/// App options.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Command to execute.
    pub task: Option<Task>,
    /// Settings file given explicitly.
    pub config_path: Option<String>,
    /// Model list path.
    pub models: Option<String>,
    /// Directory of the result files.
    pub data_dir: Option<String>,
    /// Directory of the generated website.
    pub docs_dir: Option<String>,
    /// Trials per model, provider and probe.
    pub trials: Option<i64>,
    /// HTTP timeout in seconds.
    pub timeout_secs: Option<i64>,
    /// Pause between models in seconds.
    pub pause_secs: Option<i64>,
    /// Base URL overrides.
    pub urls: Vec<(Platform, String)>,
    /// Log verbosity raised by `-v`.
    pub verbose: u8,
}

macro_rules! check_and_set_int_arg {
    ($arg:literal, $m:ident, $option:expr, $min:literal) => {
        if let Some(x) = $m.get_one::<String>($arg) {
            if let Ok(val) = x.parse::<i64>() {
                if val < $min {
                    return Err(AppError::InvalidArgError(concat!($arg, " must be at least ", $min)));
                }
                $option.replace(val);
            } else {
                return Err(AppError::InvalidArgError(concat!($arg, " must be integer")));
            }
        }
    }
}

impl Options {

    /// Create new unfilled options.
    pub fn new() -> Self {
        Self::default()
    }

    fn global_arg(name: &'static str, help: &'static str, env: &'static str) -> Arg {
        Arg::new(name)
            .long(name)
            .help(help)
            .env(env)
            .global(true)
            .required(false)
    }

    fn argument_parser<T>(args: impl IntoIterator<Item = T>) -> ArgMatches where T: Into<OsString> + Clone {
        let bold_underline = Style::new().underline().bold();
        let bold = Style::new().bold();

        Command::new("toolcheck")
            .about("Toolcheck tests which LLM providers support tool calling and structured output, and renders the results as a static website.")
            .version(env!("CARGO_PKG_VERSION"))
            .subcommand_required(true)
            .arg(Self::global_arg("config", "Settings file path", "TOOLCHECK_CONFIG").short('c'))
            .arg(Self::global_arg("models", "Model list (models.json) path", "TOOLCHECK_MODELS").short('m'))
            .arg(Self::global_arg("data-dir", "Directory of the result files", "TOOLCHECK_DATA_DIR"))
            .arg(Self::global_arg("docs-dir", "Directory of the generated website", "TOOLCHECK_DOCS_DIR"))
            .arg(Self::global_arg("trials", "Number of trials per model, provider and probe", "TOOLCHECK_TRIALS").short('n'))
            .arg(Self::global_arg("timeout", "HTTP request timeout in seconds", "TOOLCHECK_TIMEOUT"))
            .arg(Self::global_arg("pause", "Pause between models in seconds", "TOOLCHECK_PAUSE"))
            .arg(
                Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Raise log level, repeat for more detail")
                .action(ArgAction::Count)
                .global(true)
            )
            .subcommand(Command::new("setup").about("Create the data and docs directories and a sample model list"))
            .subcommand(
                Command::new("test")
                .about("Test the models of one platform")
                .arg(
                    Arg::new("platform")
                    .help("One of: openrouter, huggingface, ionet, ionet-library")
                    .required(true)
                )
            )
            .subcommand(Command::new("test-all").about("Test every platform in parallel, then generate the website"))
            .subcommand(Command::new("generate-website").about("Render the website from the result files"))
            .subcommand(Command::new("clean").about("Remove the result files and the generated website"))
            .after_help(format!("{bold_underline}Example:{bold_underline:#} {bold}

    OPENROUTER_API_KEY=<your-key> toolcheck --trials=3 test openrouter{bold:#}

API keys are read from OPENROUTER_API_KEY, HF_TOKEN, and IO_API_KEY.
Toolcheck uses the configuration file .toolcheck.toml from user's home directory, or the one specified with -c option.
If it finds the configuration file it uses configuration options from the file.
The configuration options can be overridden with the command line arguments or environment variables."))
            .get_matches_from(args)
    }

    fn load_config_file(path: Option<&str>) -> Result<Option<String>, std::io::Error> {
        Ok(if let Some(p) = path {
            Some(std::fs::read_to_string(p)?)
        } else if let Some(mut p) = home_dir() {
            p.push(CONFIG_FILE_NAME);
            if std::fs::exists(p.as_path())? {
                Some(std::fs::read_to_string(p.as_path())?)
            } else {
                None
            }
        } else {
            None
        })
    }

    fn parse_task(name: &str, m: &ArgMatches) -> Result<Task, AppError> {
        Ok(match name {
            "setup" => Task::Setup,
            "test" => {
                let platform = m.get_one::<String>("platform")
                    .ok_or(AppError::MissingArgError("platform is not specified."))?;
                let platform = Platform::try_from(platform.as_str())
                    .map_err(|_| AppError::InvalidArgError("platform must be one of: openrouter, huggingface, ionet, ionet-library"))?;
                Task::Test(platform)
            },
            "test-all" => Task::TestAll,
            "generate-website" => Task::GenerateWebsite,
            "clean" => Task::Clean,
            _ => return Err(AppError::InvalidArgError("unknown command")),
        })
    }

    /// Load and validate options from env, command line arguments, config file.
    pub fn load<T>(args: impl IntoIterator<Item = T>) -> Result<Self, AppError>
        where T: Into<OsString> + Clone
    {
        let matches = Self::argument_parser(args);

        let (name, m) = matches.subcommand()
            .ok_or(AppError::MissingArgError("command is not specified."))?;

        let mut options = Options::new();

        let config_path = m.get_one("config").map(|s: &String| s.as_ref());

        if let Some(content) = Self::load_config_file(config_path)
            .map_err(|err| AppError::Error(format!("Error loading config file: {}", err)))?
        {
            parse_toml_config(&content, &mut options)?;
        }

        options.config_path = config_path.map(str::to_owned);
        options.task.replace(Self::parse_task(name, m)?);

        if let Some(x) = m.get_one::<String>("models") {
            options.models.replace(x.clone());
        }
        if let Some(x) = m.get_one::<String>("data-dir") {
            options.data_dir.replace(x.clone());
        }
        if let Some(x) = m.get_one::<String>("docs-dir") {
            options.docs_dir.replace(x.clone());
        }

        check_and_set_int_arg!("trials", m, options.trials, 1);
        check_and_set_int_arg!("timeout", m, options.timeout_secs, 1);
        check_and_set_int_arg!("pause", m, options.pause_secs, 0);

        options.verbose = m.get_count("verbose");

        Ok(options)
    }
}
