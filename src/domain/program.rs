use crate::domain::goal::Goal;
use crate::domain::model::{normalize_code, Assessment, Module, NewModule, Semester, StatusChange};
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::ensure_positive;
use std::collections::HashMap;
use std::fmt;

/// Aggregated view of a program at one point in time. Never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramSnapshot<'a> {
    pub modules: Vec<&'a Module>,
    pub completed_modules: Vec<&'a Module>,
    pub enrolled_modules: Vec<&'a Module>,
    pub planned_modules: Vec<&'a Module>,
    pub recognized_modules: Vec<&'a Module>,
    pub ects_completed: u32,
    pub ects_enrolled: u32,
    pub total_ects: u32,
    pub current_gpa: Option<f64>,
    pub completed_semesters: u32,
}

impl<'a> ProgramSnapshot<'a> {
    pub fn empty(total_ects: u32) -> Self {
        Self {
            modules: Vec::new(),
            completed_modules: Vec::new(),
            enrolled_modules: Vec::new(),
            planned_modules: Vec::new(),
            recognized_modules: Vec::new(),
            ects_completed: 0,
            ects_enrolled: 0,
            total_ects,
            current_gpa: None,
            completed_semesters: 0,
        }
    }

    /// Completed modules that carry a grade.
    pub fn graded_modules(&self) -> Vec<&'a Module> {
        self.completed_modules
            .iter()
            .copied()
            .filter(|m| m.grade().is_some())
            .collect()
    }
}

/// Identifies a module either by its numeric id or by its code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleKey {
    Id(u32),
    Code(String),
}

impl ModuleKey {
    /// All-digit input is an id, anything else a module code.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<u32>() {
            Ok(id) if raw.chars().all(|c| c.is_ascii_digit()) => ModuleKey::Id(id),
            _ => ModuleKey::Code(normalize_code(raw)),
        }
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleKey::Id(id) => write!(f, "with id {}", id),
            ModuleKey::Code(code) => f.write_str(code),
        }
    }
}

/// Lookup tables from module id to module and from code to id.
#[derive(Debug)]
pub struct ModuleIndex<'a> {
    pub by_id: HashMap<u32, &'a Module>,
    pub id_by_code: HashMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudyProgram {
    pub name: String,
    pub total_ects: u32,
    pub semesters: Vec<Semester>,
    pub goals: Vec<Goal>,
}

impl StudyProgram {
    pub fn new(name: impl Into<String>, total_ects: u32) -> Self {
        Self {
            name: name.into(),
            total_ects,
            semesters: Vec::new(),
            goals: Vec::new(),
        }
    }

    pub fn add_semester(&mut self, semester: Semester) {
        self.semesters.push(semester);
    }

    pub fn add_goal(&mut self, goal: impl Into<Goal>) {
        self.goals.push(goal.into());
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn semester(&self, number: u32) -> Option<&Semester> {
        self.semesters.iter().find(|s| s.number == number)
    }

    pub fn semester_mut(&mut self, number: u32) -> Option<&mut Semester> {
        self.semesters.iter_mut().find(|s| s.number == number)
    }

    /// Every module, semester by semester in insertion order.
    pub fn all_modules(&self) -> Vec<&Module> {
        self.semesters.iter().flat_map(|s| s.modules.iter()).collect()
    }

    pub(crate) fn all_modules_mut(&mut self) -> impl Iterator<Item = &mut Module> {
        self.semesters.iter_mut().flat_map(|s| s.modules.iter_mut())
    }

    pub fn find_module(&self, code: &str) -> Option<&Module> {
        self.semesters.iter().find_map(|s| s.get_module(code))
    }

    pub fn find_module_mut(&mut self, code: &str) -> Option<&mut Module> {
        self.semesters.iter_mut().find_map(|s| s.get_module_mut(code))
    }

    pub fn find_module_by_id(&self, id: u32) -> Option<&Module> {
        self.all_modules().into_iter().find(|m| m.id() == Some(id))
    }

    pub fn find_module_by_id_mut(&mut self, id: u32) -> Option<&mut Module> {
        self.all_modules_mut().find(|m| m.id() == Some(id))
    }

    fn max_module_id(&self) -> Option<u32> {
        self.all_modules().iter().filter_map(|m| m.id()).max()
    }

    /// One past the largest id in use, or 1 for a program without ids.
    pub fn next_module_id(&self) -> Result<u32> {
        match self.max_module_id() {
            Some(max) => max
                .checked_add(1)
                .ok_or(DashboardError::ModuleIdsExhaustedError { max }),
            None => Ok(1),
        }
    }

    /// Adds a planned module to an existing semester and returns its new id.
    pub fn add_module(&mut self, semester_number: u32, new_module: NewModule) -> Result<u32> {
        let code = normalize_code(&new_module.code);
        if code.is_empty() {
            return Err(DashboardError::validation("Module code must not be empty."));
        }
        if self.find_module(&code).is_some() {
            return Err(DashboardError::DuplicateModuleError { code });
        }
        ensure_positive(new_module.ects, "ECTS must be positive.")?;
        ensure_positive(new_module.max_points, "Maximum points must be positive.")?;

        let id = self.next_module_id()?;
        let semester = self
            .semester_mut(semester_number)
            .ok_or(DashboardError::SemesterNotFoundError {
                number: semester_number,
            })?;

        let assessment = Assessment::new(new_module.assessment_name, new_module.max_points);
        let mut module = Module::new(&code, new_module.title, new_module.ects, assessment);
        module.assign_id(id);
        semester.add_module(module);

        tracing::info!("Added module {} (id {}) to semester {}", code, id, semester_number);
        Ok(id)
    }

    /// Gives every module without an id the next free one, in flattened order.
    /// Returns the number of ids assigned.
    pub fn backfill_module_ids(&mut self) -> Result<usize> {
        // None once u32::MAX has been handed out
        let mut next_id = self.max_module_id().map_or(Some(1), |max| max.checked_add(1));
        let mut assigned = 0;
        for module in self.all_modules_mut().filter(|m| m.id().is_none()) {
            let id = next_id.ok_or(DashboardError::ModuleIdsExhaustedError { max: u32::MAX })?;
            tracing::debug!("Assigning id {} to module {}", id, module.code());
            module.assign_id(id);
            next_id = id.checked_add(1);
            assigned += 1;
        }
        Ok(assigned)
    }

    pub fn module_index(&self) -> Result<ModuleIndex<'_>> {
        let mut by_id = HashMap::new();
        let mut id_by_code = HashMap::new();
        for module in self.all_modules() {
            let id = module.id().ok_or_else(|| DashboardError::MissingModuleIdError {
                code: module.code().to_string(),
            })?;
            by_id.insert(id, module);
            id_by_code.insert(module.code().to_string(), id);
        }
        Ok(ModuleIndex { by_id, id_by_code })
    }

    /// Applies a lifecycle transition to the module identified by `key`.
    pub fn set_status(&mut self, key: &ModuleKey, change: StatusChange) -> Result<&Module> {
        let module = match key {
            ModuleKey::Id(id) => self.find_module_by_id_mut(*id),
            ModuleKey::Code(code) => self.find_module_mut(code),
        }
        .ok_or_else(|| DashboardError::ModuleNotFoundError {
            key: key.to_string(),
        })?;
        module.apply(change);
        Ok(&*module)
    }

    pub fn snapshot(&self) -> ProgramSnapshot<'_> {
        crate::core::snapshot::compute(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ModuleStatus;

    fn new_module(code: &str, ects: u32) -> NewModule {
        NewModule {
            code: code.to_string(),
            title: format!("Module {}", code),
            ects,
            assessment_name: "Exam".to_string(),
            max_points: 100.0,
        }
    }

    fn program_with_semesters(count: u32) -> StudyProgram {
        let mut program = StudyProgram::new("Computer Science", 180);
        for number in 1..=count {
            program.add_semester(Semester::new(number));
        }
        program
    }

    #[test]
    fn test_add_module_assigns_sequential_ids() {
        let mut program = program_with_semesters(2);
        assert_eq!(program.add_module(1, new_module("mat101", 5)).unwrap(), 1);
        assert_eq!(program.add_module(2, new_module("PRG201", 10)).unwrap(), 2);

        let module = program.find_module("MAT101").unwrap();
        assert_eq!(module.status(), ModuleStatus::Planned);
        assert_eq!(module.assessment().name, "Exam");
        assert_eq!(program.semester(2).unwrap().modules.len(), 1);
    }

    #[test]
    fn test_add_module_rejects_duplicate_code() {
        let mut program = program_with_semesters(2);
        program.add_module(1, new_module("MAT101", 5)).unwrap();
        let err = program.add_module(2, new_module("mat101", 5)).unwrap_err();
        assert!(matches!(err, DashboardError::DuplicateModuleError { code } if code == "MAT101"));
    }

    #[test]
    fn test_add_module_rejects_unknown_semester_and_bad_values() {
        let mut program = program_with_semesters(1);
        assert!(matches!(
            program.add_module(4, new_module("MAT101", 5)),
            Err(DashboardError::SemesterNotFoundError { number: 4 })
        ));
        assert!(matches!(
            program.add_module(1, new_module("MAT101", 0)),
            Err(DashboardError::ValidationError { .. })
        ));
        let mut zero_points = new_module("MAT101", 5);
        zero_points.max_points = 0.0;
        assert!(program.add_module(1, zero_points).is_err());
        assert!(program.all_modules().is_empty());
    }

    #[test]
    fn test_backfill_module_ids_continues_after_max() {
        let mut program = program_with_semesters(1);
        let semester = program.semester_mut(1).unwrap();
        for code in ["A", "B", "C"] {
            semester.add_module(Module::new(code, code, 5, Assessment::new("Exam", 100.0)));
        }
        semester.modules[1].assign_id(7);

        assert_eq!(program.backfill_module_ids().unwrap(), 2);
        let ids: Vec<_> = program.all_modules().iter().map(|m| m.id()).collect();
        assert_eq!(ids, vec![Some(8), Some(7), Some(9)]);
        assert_eq!(program.backfill_module_ids().unwrap(), 0);
    }

    #[test]
    fn test_ids_stop_at_u32_max() {
        let mut program = program_with_semesters(1);
        let semester = program.semester_mut(1).unwrap();
        semester.add_module(Module::new("A", "A", 5, Assessment::new("Exam", 100.0)));
        semester.modules[0].assign_id(u32::MAX);
        assert_eq!(program.backfill_module_ids().unwrap(), 0);

        let err = program.add_module(1, new_module("B", 5)).unwrap_err();
        assert!(matches!(err, DashboardError::ModuleIdsExhaustedError { max: u32::MAX }));
        assert!(err.is_recoverable());

        program
            .semester_mut(1)
            .unwrap()
            .add_module(Module::new("C", "C", 5, Assessment::new("Exam", 100.0)));
        assert!(program.backfill_module_ids().is_err());
    }

    #[test]
    fn test_backfill_can_hand_out_the_last_id() {
        let mut program = program_with_semesters(1);
        let semester = program.semester_mut(1).unwrap();
        for code in ["A", "B"] {
            semester.add_module(Module::new(code, code, 5, Assessment::new("Exam", 100.0)));
        }
        semester.modules[0].assign_id(u32::MAX - 1);

        assert_eq!(program.backfill_module_ids().unwrap(), 1);
        assert_eq!(program.find_module("B").unwrap().id(), Some(u32::MAX));
    }

    #[test]
    fn test_module_index_requires_ids() {
        let mut program = program_with_semesters(1);
        program
            .semester_mut(1)
            .unwrap()
            .add_module(Module::new("MAT101", "Maths", 5, Assessment::new("Exam", 100.0)));
        assert!(matches!(
            program.module_index(),
            Err(DashboardError::MissingModuleIdError { .. })
        ));

        program.backfill_module_ids().unwrap();
        let index = program.module_index().unwrap();
        assert_eq!(index.id_by_code["MAT101"], 1);
        assert_eq!(index.by_id[&1].code(), "MAT101");
    }

    #[test]
    fn test_set_status_by_id_and_code() {
        let mut program = program_with_semesters(1);
        program.add_module(1, new_module("MAT101", 5)).unwrap();
        program.add_module(1, new_module("PRG101", 5)).unwrap();

        let module = program
            .set_status(&ModuleKey::parse("2"), StatusChange::Complete { grade: 1.3 })
            .unwrap();
        assert_eq!(module.code(), "PRG101");
        assert_eq!(module.grade(), Some(1.3));

        program
            .set_status(&ModuleKey::parse("mat101"), StatusChange::Enroll)
            .unwrap();
        assert_eq!(program.find_module("MAT101").unwrap().status(), ModuleStatus::Enrolled);

        assert!(matches!(
            program.set_status(&ModuleKey::Id(42), StatusChange::Reset),
            Err(DashboardError::ModuleNotFoundError { .. })
        ));
    }

    #[test]
    fn test_module_key_parse() {
        assert_eq!(ModuleKey::parse(" 12 "), ModuleKey::Id(12));
        assert_eq!(ModuleKey::parse("mat101"), ModuleKey::Code("MAT101".to_string()));
        assert_eq!(ModuleKey::parse("+5"), ModuleKey::Code("+5".to_string()));
    }
}
