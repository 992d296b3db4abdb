//! Toolcheck-lib tracks which LLM providers support function/tool calling
//! and structured JSON output.
//!
//! It sends probe requests to OpenAI-compatible chat endpoints, records
//! every trial in JSON result files, and renders them as a static dashboard.
//!
//! ### Platforms
//!
//! - OpenRouter (every endpoint of a model)
//! - Hugging Face inference providers
//! - io.net over HTTP
//! - io.net through an agent loop that executes the requested tools
//!
//! ### Examples
//!
//! ```rust no_run
//! use std::path::Path;
//! use toolcheck_lib::catalog::ModelCatalog;
//! use toolcheck_lib::checker::{OpenRouterChecker, Runner, DEFAULT_TRIALS};
//! use toolcheck_lib::request::{get_reqwest_client, DEFAULT_TIMEOUT};
//! use toolcheck_lib::{Platform, PlatformConfig};
//!
//! let catalog = ModelCatalog::load(Path::new("config/models.json")).expect("catalog loaded");
//!
//! let client = get_reqwest_client(DEFAULT_TIMEOUT).expect("transport created");
//! let config = PlatformConfig::new(Platform::OpenRouter, "<api-key>".into());
//! let checker = OpenRouterChecker::new(client, config);
//!
//! let results = Runner::new(&checker, DEFAULT_TRIALS).run(&catalog);
//! results.save(Path::new("data/data.json")).expect("results saved");
//!
//! toolcheck_lib::site::generate(&catalog, Path::new("data"), Path::new("docs")).expect("website generated");
//! ```

#![deny(missing_docs)]
#![deny(clippy::suspicious)]
#![allow(clippy::comparison_chain)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::collapsible_if)]

mod error;
mod config;
pub mod llm;
pub mod tools;
pub mod request;
pub mod agent;
pub mod probe;
pub mod results;
pub mod catalog;
pub mod checker;
pub mod site;

pub use error::Error;
pub use config::ChatConfig;
pub use config::Platform;
pub use config::PlatformConfig;
