pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{load_program, save_program, JsonFileStore};
pub use app::DashboardCli;
pub use config::DashboardConfig;
pub use crate::core::{DashboardView, ProgramSnapshot, StudyProgram};
pub use domain::{Evaluate, Goal, Module, ModuleStatus, ProgramStore};
pub use utils::error::{DashboardError, ErrorKind, Result};
