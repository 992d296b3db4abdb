//! Command implementations.
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use toolcheck_lib::catalog::{ModelCatalog, SAMPLE_CATALOG};
use toolcheck_lib::checker::{Checker, HuggingFaceChecker, IoNetChecker, LibraryChecker, OpenRouterChecker, Runner};
use toolcheck_lib::request::get_reqwest_client;
use toolcheck_lib::site::{self, INDEX_FILE};
use toolcheck_lib::Platform;
use tracing::{info, warn};
use crate::config::Config;
use crate::error::AppError;
use crate::options::Task;
use crate::report;
use crate::style::Styles;
use crate::util::run_platforms;

/// Execute the configured command.
pub fn execute(config: &Config, styles: &Styles) -> Result<(), AppError> {
    match config.task {
        Task::Setup => setup(config),
        Task::Test(platform) => test_platform(config, platform, styles),
        Task::TestAll => test_all(config, styles),
        Task::GenerateWebsite => generate_website(config),
        Task::Clean => clean(config),
    }
}

fn create_dir(path: &Path) -> Result<(), AppError> {
    fs::create_dir_all(path).map_err(|e| AppError::io(path, e))?;
    info!("directory ready: {}", path.display());
    Ok(())
}

/// Create directories and write a sample model list when none exists.
pub fn setup(config: &Config) -> Result<(), AppError> {
    create_dir(&config.data_dir)?;
    create_dir(&config.docs_dir)?;

    if config.models.exists() {
        println!("Model list found: {}", config.models.display());
    } else {
        if let Some(parent) = config.models.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir(parent)?;
        }
        fs::write(&config.models, SAMPLE_CATALOG).map_err(|e| AppError::io(&config.models, e))?;
        println!("Sample model list written to {}", config.models.display());
    }

    println!("Setup complete. Export OPENROUTER_API_KEY, HF_TOKEN, and IO_API_KEY before running the tests.");
    Ok(())
}

/// Test the catalog models of one platform and save the result file.
pub fn test_platform(config: &Config, platform: Platform, styles: &Styles) -> Result<(), AppError> {
    let platform_config = config.platform_config(platform)?;
    let catalog = ModelCatalog::load(&config.models)?;

    let client = get_reqwest_client(config.timeout)?;
    let checker: Box<dyn Checker> = match platform {
        Platform::OpenRouter => Box::new(OpenRouterChecker::new(client, platform_config)),
        Platform::HuggingFace => Box::new(HuggingFaceChecker::new(client, platform_config)),
        Platform::IoNet => Box::new(IoNetChecker::new(client, platform_config)),
        Platform::IoNetLibrary => Box::new(LibraryChecker::new(client, platform_config)),
    };

    let results = Runner::new(checker.as_ref(), config.trials)
        .with_pause(config.pause_for(platform))
        .run(&catalog);

    let path = config.results_path(platform);
    results.save(&path)?;
    info!("{} results saved to {}", platform.display_name(), path.display());

    println!("{}", report::platform_summary(styles, platform, &results, &path));
    Ok(())
}

/// Test every platform in parallel, then generate the website.
///
/// The website is generated from whatever results exist even when some runs failed.
pub fn test_all(config: &Config, styles: &Styles) -> Result<(), AppError> {
    let statuses = run_platforms(config, &Platform::ALL)?;

    println!("{}", report::children_summary(styles, &statuses));

    generate_website(config)?;

    let failed: Vec<&str> = statuses.iter()
        .filter(|(_, status)| !status.is_some_and(|s| s.success()))
        .map(|(platform, _)| platform.key())
        .collect();

    if failed.is_empty() {
        Ok(())
    } else {
        Err(AppError::ChildFailed(failed.join(", ")))
    }
}

/// Render the website from the result files.
pub fn generate_website(config: &Config) -> Result<(), AppError> {
    let catalog = ModelCatalog::load(&config.models)?;
    let path = site::generate(&catalog, &config.data_dir, &config.docs_dir)?;
    println!("Website generated: {}", path.display());
    Ok(())
}

fn remove_file(path: &Path) -> Result<bool, AppError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(AppError::io(path, e)),
    }
}

/// Remove the result files and the generated page.
pub fn clean(config: &Config) -> Result<(), AppError> {
    let mut paths: Vec<_> = Platform::ALL.iter().map(|p| config.results_path(*p)).collect();
    paths.push(config.docs_dir.join(INDEX_FILE));

    let mut removed = 0;
    for path in paths {
        if remove_file(&path)? {
            info!("removed {}", path.display());
            removed += 1;
        }
    }

    if removed == 0 {
        warn!("nothing to clean");
    }
    println!("Removed {removed} file(s).");
    Ok(())
}
