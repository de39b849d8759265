use crate::utils::error::DashboardError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleStatus {
    Planned,
    Enrolled,
    Completed,
    Recognized,
}

impl ModuleStatus {
    pub const ALL: [ModuleStatus; 4] = [
        ModuleStatus::Planned,
        ModuleStatus::Enrolled,
        ModuleStatus::Completed,
        ModuleStatus::Recognized,
    ];

    /// Tag used in the program file.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleStatus::Planned => "planned",
            ModuleStatus::Enrolled => "enrolled",
            ModuleStatus::Completed => "completed",
            ModuleStatus::Recognized => "recognized",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModuleStatus::Planned => "Planned",
            ModuleStatus::Enrolled => "Enrolled",
            ModuleStatus::Completed => "Completed",
            ModuleStatus::Recognized => "Recognized",
        }
    }

    /// Completed and recognized modules both count as done.
    pub fn is_done(&self) -> bool {
        matches!(self, ModuleStatus::Completed | ModuleStatus::Recognized)
    }
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleStatus {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DashboardError::InvalidValueError {
                field: "status".to_string(),
                value: s.to_string(),
                reason: "expected one of planned, enrolled, completed, recognized".to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub name: String,
    pub max_points: f64,
    passed: bool,
    grade: Option<f64>,
}

impl Assessment {
    pub fn new(name: impl Into<String>, max_points: f64) -> Self {
        Self {
            name: name.into(),
            max_points,
            passed: false,
            grade: None,
        }
    }

    /// Records an outcome. A grade is only kept for a passed assessment.
    pub fn record_result(&mut self, passed: bool, grade: Option<f64>) {
        self.passed = passed;
        self.grade = if passed { grade } else { None };
    }

    pub fn is_passed(&self) -> bool {
        self.passed
    }

    pub fn grade(&self) -> Option<f64> {
        self.grade
    }

    /// Rebuilds an assessment exactly as stored, without normalizing it.
    pub(crate) fn restore(name: String, max_points: f64, passed: bool, grade: Option<f64>) -> Self {
        Self {
            name,
            max_points,
            passed,
            grade,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    id: Option<u32>,
    code: String,
    pub title: String,
    pub ects: u32,
    assessment: Assessment,
    status: ModuleStatus,
}

impl Module {
    /// Creates a planned module without an id; ids are handed out by the program.
    pub fn new(code: &str, title: impl Into<String>, ects: u32, assessment: Assessment) -> Self {
        Self {
            id: None,
            code: normalize_code(code),
            title: title.into(),
            ects,
            assessment,
            status: ModuleStatus::Planned,
        }
    }

    pub(crate) fn restore(
        id: Option<u32>,
        code: &str,
        title: String,
        ects: u32,
        assessment: Assessment,
        status: ModuleStatus,
    ) -> Self {
        Self {
            id,
            code: normalize_code(code),
            title,
            ects,
            assessment,
            status,
        }
    }

    pub fn id(&self) -> Option<u32> {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: u32) {
        self.id = Some(id);
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn assessment(&self) -> &Assessment {
        &self.assessment
    }

    pub fn status(&self) -> ModuleStatus {
        self.status
    }

    pub fn grade(&self) -> Option<f64> {
        self.assessment.grade()
    }

    pub fn enroll(&mut self) {
        tracing::debug!("Module {} -> enrolled", self.code);
        self.status = ModuleStatus::Enrolled;
    }

    /// Marks the module completed with the given grade. The grade is not range checked here.
    pub fn complete(&mut self, grade: f64) {
        tracing::debug!("Module {} -> completed with grade {}", self.code, grade);
        self.assessment.record_result(true, Some(grade));
        self.status = ModuleStatus::Completed;
    }

    /// Transfer credit: counts towards ECTS but never carries a grade.
    pub fn recognize(&mut self) {
        tracing::debug!("Module {} -> recognized", self.code);
        self.assessment.record_result(true, None);
        self.status = ModuleStatus::Recognized;
    }

    pub fn reset(&mut self) {
        tracing::debug!("Module {} -> planned", self.code);
        self.assessment.record_result(false, None);
        self.status = ModuleStatus::Planned;
    }

    pub fn apply(&mut self, change: StatusChange) {
        match change {
            StatusChange::Reset => self.reset(),
            StatusChange::Enroll => self.enroll(),
            StatusChange::Complete { grade } => self.complete(grade),
            StatusChange::Recognize => self.recognize(),
        }
    }
}

pub(crate) fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// A lifecycle transition; every transition is legal from every state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusChange {
    Reset,
    Enroll,
    Complete { grade: f64 },
    Recognize,
}

/// Input for adding a module to a program.
#[derive(Debug, Clone, PartialEq)]
pub struct NewModule {
    pub code: String,
    pub title: String,
    pub ects: u32,
    pub assessment_name: String,
    pub max_points: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Semester {
    pub number: u32,
    pub modules: Vec<Module>,
}

impl Semester {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            modules: Vec::new(),
        }
    }

    pub fn add_module(&mut self, module: Module) {
        self.modules.push(module);
    }

    pub fn get_module(&self, code: &str) -> Option<&Module> {
        let code = normalize_code(code);
        self.modules.iter().find(|m| m.code == code)
    }

    pub fn get_module_mut(&mut self, code: &str) -> Option<&mut Module> {
        let code = normalize_code(code);
        self.modules.iter_mut().find(|m| m.code == code)
    }

    /// Non-empty and every module completed or recognized.
    pub fn is_completed(&self) -> bool {
        !self.modules.is_empty() && self.modules.iter().all(|m| m.status.is_done())
    }
}
