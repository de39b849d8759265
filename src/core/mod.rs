pub mod dashboard;
pub mod snapshot;

pub use crate::domain::program::{ProgramSnapshot, StudyProgram};
pub use crate::utils::error::Result;
pub use dashboard::{DashboardView, TableLayout};
