#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

pub use bootstrap::{CliContext, bootstrap, init_tracing, load_env};
pub use commands::{Commands, ConfigCommand, RunArgs};
pub use error::CliError;
pub use parser::Cli;
