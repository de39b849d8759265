use crate::domain::program::StudyProgram;
use crate::utils::error::Result;

/// Where a program's full state is kept between sessions.
pub trait ProgramStore {
    /// Overwrites the stored state with `program`.
    fn save(&self, program: &StudyProgram) -> Result<()>;
    fn load(&self) -> Result<StudyProgram>;
}
