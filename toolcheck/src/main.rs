mod commands;
mod config;
mod error;
mod options;
mod report;
mod style;
mod toml_parser;
mod util;

use error::AppError;
use options::Options;
use config::Config;
use style::Styles;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("toolcheck={level},toolcheck_lib={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_toolcheck() -> Result<(), AppError> {
    let options = Options::load(std::env::args())?;
    let config: Config = options.try_into()?;

    init_logging(config.verbose);

    commands::execute(&config, &Styles::new())
}

fn main() {
    if let Err(e) = run_toolcheck() {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    }
}
