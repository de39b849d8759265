// Domain layer: study program model, goals and the storage port.

pub mod goal;
pub mod model;
pub mod ports;
pub mod program;

pub use goal::{DurationGoal, Evaluate, Goal, GpaGoal};
pub use model::{Assessment, Module, ModuleStatus, NewModule, Semester, StatusChange};
pub use ports::ProgramStore;
pub use program::{ModuleIndex, ModuleKey, ProgramSnapshot, StudyProgram};
