use crate::domain::goal::{
    DurationGoal, Goal, GpaGoal, DEFAULT_DURATION_DESCRIPTION, DEFAULT_GPA_DESCRIPTION,
};
use crate::domain::model::{Assessment, Module, ModuleStatus, Semester};
use crate::domain::ports::ProgramStore;
use crate::domain::program::StudyProgram;
use crate::utils::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
struct ProgramRecord {
    name: String,
    total_ects: u32,
    #[serde(default)]
    goals: Vec<GoalRecord>,
    semesters: Vec<SemesterRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GoalRecord {
    #[serde(rename = "type")]
    kind: Option<String>,
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    planned_semesters: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_gpa: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SemesterRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    semester: Option<u32>,
    /// Older files named the term index `number`.
    #[serde(default, skip_serializing)]
    number: Option<u32>,
    modules: Vec<ModuleRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ModuleRecord {
    #[serde(default)]
    id: Option<u32>,
    code: String,
    title: String,
    ects: u32,
    status: String,
    assessment: AssessmentRecord,
}

#[derive(Debug, Serialize, Deserialize)]
struct AssessmentRecord {
    name: String,
    max_points: f64,
    #[serde(default)]
    passed: bool,
    #[serde(default)]
    grade: Option<f64>,
}

impl From<&StudyProgram> for ProgramRecord {
    fn from(program: &StudyProgram) -> Self {
        Self {
            name: program.name.clone(),
            total_ects: program.total_ects,
            goals: program.goals.iter().map(GoalRecord::from).collect(),
            semesters: program.semesters.iter().map(SemesterRecord::from).collect(),
        }
    }
}

impl ProgramRecord {
    fn into_program(self) -> Result<StudyProgram> {
        let mut program = StudyProgram::new(self.name, self.total_ects);
        for goal in self.goals {
            program.add_goal(goal.into_goal()?);
        }
        for semester in self.semesters {
            program.add_semester(semester.into_semester()?);
        }
        Ok(program)
    }
}

impl From<&Goal> for GoalRecord {
    fn from(goal: &Goal) -> Self {
        let mut record = Self {
            kind: Some(goal.tag().to_string()),
            description: Some(goal.description().to_string()),
            planned_semesters: None,
            max_gpa: None,
        };
        match goal {
            Goal::Duration(goal) => record.planned_semesters = Some(goal.planned_semesters),
            Goal::Gpa(goal) => record.max_gpa = Some(goal.max_gpa),
        }
        record
    }
}

impl GoalRecord {
    fn into_goal(self) -> Result<Goal> {
        match self.kind.as_deref() {
            Some("duration") => {
                let planned_semesters = self.planned_semesters.ok_or_else(|| {
                    DashboardError::structure("duration goal requires 'planned_semesters'")
                })?;
                Ok(Goal::Duration(DurationGoal {
                    description: self
                        .description
                        .unwrap_or_else(|| DEFAULT_DURATION_DESCRIPTION.to_string()),
                    planned_semesters,
                }))
            }
            Some("gpa") => {
                let max_gpa = self
                    .max_gpa
                    .ok_or_else(|| DashboardError::structure("gpa goal requires 'max_gpa'"))?;
                Ok(Goal::Gpa(GpaGoal {
                    description: self
                        .description
                        .unwrap_or_else(|| DEFAULT_GPA_DESCRIPTION.to_string()),
                    max_gpa,
                }))
            }
            other => Err(DashboardError::InvalidValueError {
                field: "goal type".to_string(),
                value: other.unwrap_or("<missing>").to_string(),
                reason: "expected 'duration' or 'gpa'".to_string(),
            }),
        }
    }
}

impl From<&Semester> for SemesterRecord {
    fn from(semester: &Semester) -> Self {
        Self {
            semester: Some(semester.number),
            number: None,
            modules: semester.modules.iter().map(ModuleRecord::from).collect(),
        }
    }
}

impl SemesterRecord {
    fn into_semester(self) -> Result<Semester> {
        // current field first, then the legacy alias
        let number = self.semester.or(self.number).ok_or_else(|| {
            DashboardError::structure("semester entry needs a 'semester' (or legacy 'number') field")
        })?;
        let mut semester = Semester::new(number);
        for module in self.modules {
            semester.add_module(module.into_module()?);
        }
        Ok(semester)
    }
}

impl From<&Module> for ModuleRecord {
    fn from(module: &Module) -> Self {
        let assessment = module.assessment();
        Self {
            id: module.id(),
            code: module.code().to_string(),
            title: module.title.clone(),
            ects: module.ects,
            status: module.status().as_str().to_string(),
            assessment: AssessmentRecord {
                name: assessment.name.clone(),
                max_points: assessment.max_points,
                passed: assessment.is_passed(),
                grade: assessment.grade(),
            },
        }
    }
}

impl ModuleRecord {
    fn into_module(self) -> Result<Module> {
        let status: ModuleStatus = self.status.parse()?;
        let record = self.assessment;
        if record.grade.is_some() && !record.passed {
            tracing::warn!("Module {} has a grade but is not passed", self.code);
        }
        if status.is_done() && !record.passed {
            tracing::warn!("Module {} is {} but its assessment is not passed", self.code, status);
        }
        let assessment = Assessment::restore(record.name, record.max_points, record.passed, record.grade);
        Ok(Module::restore(
            self.id,
            &self.code,
            self.title,
            self.ects,
            assessment,
            status,
        ))
    }
}

/// Renders the full program state as pretty-printed JSON.
pub fn program_to_json(program: &StudyProgram) -> Result<String> {
    let mut json = serde_json::to_string_pretty(&ProgramRecord::from(program))?;
    json.push('\n');
    Ok(json)
}

/// Parses a program and backfills missing module ids. Fails without returning a partial program.
pub fn program_from_json(content: &str) -> Result<StudyProgram> {
    let record: ProgramRecord = serde_json::from_str(content)?;
    let mut program = record.into_program()?;
    let assigned = program
        .backfill_module_ids()
        .map_err(|e| DashboardError::structure(e.to_string()))?;
    if assigned > 0 {
        tracing::info!("Assigned ids to {} module(s) without one", assigned);
    }
    Ok(program)
}

pub fn save_program<P: AsRef<Path>>(program: &StudyProgram, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, program_to_json(program)?)?;
    tracing::info!("Saved program '{}' to {}", program.name, path.display());
    Ok(())
}

pub fn load_program<P: AsRef<Path>>(path: P) -> Result<StudyProgram> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let program = program_from_json(&content)?;
    tracing::info!(
        "Loaded program '{}' with {} module(s) from {}",
        program.name,
        program.all_modules().len(),
        path.display()
    );
    Ok(program)
}

/// Keeps the program in a single JSON file, rewritten in full on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProgramStore for JsonFileStore {
    fn save(&self, program: &StudyProgram) -> Result<()> {
        save_program(program, &self.path)
    }

    fn load(&self) -> Result<StudyProgram> {
        load_program(&self.path)
    }
}
