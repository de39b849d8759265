use crate::domain::program::ProgramSnapshot;

pub const DEFAULT_DURATION_DESCRIPTION: &str = "Finish the program within the planned time";
pub const DEFAULT_GPA_DESCRIPTION: &str = "Keep the grade point average";

/// Shared evaluation contract of all goal kinds. Evaluation never mutates state.
pub trait Evaluate {
    fn is_met(&self, snapshot: &ProgramSnapshot<'_>) -> bool;

    /// Progress towards the goal in `[0, 1]`.
    fn progress(&self, snapshot: &ProgramSnapshot<'_>) -> f64;
}

#[derive(Debug, Clone, PartialEq)]
pub struct DurationGoal {
    pub description: String,
    pub planned_semesters: u32,
}

impl DurationGoal {
    pub fn new(planned_semesters: u32) -> Self {
        Self {
            description: DEFAULT_DURATION_DESCRIPTION.to_string(),
            planned_semesters,
        }
    }
}

impl Evaluate for DurationGoal {
    fn is_met(&self, snapshot: &ProgramSnapshot<'_>) -> bool {
        snapshot.completed_semesters <= self.planned_semesters
    }

    fn progress(&self, snapshot: &ProgramSnapshot<'_>) -> f64 {
        if snapshot.completed_semesters == 0 || self.planned_semesters == 0 {
            return 0.0;
        }
        let ratio = f64::from(snapshot.completed_semesters) / f64::from(self.planned_semesters);
        ratio.clamp(0.0, 1.0)
    }
}

/// Lower grades are better, so the goal is met while the GPA stays at or below `max_gpa`.
#[derive(Debug, Clone, PartialEq)]
pub struct GpaGoal {
    pub description: String,
    pub max_gpa: f64,
}

impl GpaGoal {
    pub fn new(max_gpa: f64) -> Self {
        Self {
            description: DEFAULT_GPA_DESCRIPTION.to_string(),
            max_gpa,
        }
    }
}

impl Evaluate for GpaGoal {
    fn is_met(&self, snapshot: &ProgramSnapshot<'_>) -> bool {
        snapshot.current_gpa.is_some_and(|gpa| gpa <= self.max_gpa)
    }

    fn progress(&self, snapshot: &ProgramSnapshot<'_>) -> f64 {
        match snapshot.current_gpa {
            Some(gpa) if gpa != 0.0 => (self.max_gpa / gpa).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Goal {
    Duration(DurationGoal),
    Gpa(GpaGoal),
}

impl Goal {
    pub fn description(&self) -> &str {
        match self {
            Goal::Duration(goal) => &goal.description,
            Goal::Gpa(goal) => &goal.description,
        }
    }

    /// Tag written to the program file.
    pub fn tag(&self) -> &'static str {
        match self {
            Goal::Duration(_) => "duration",
            Goal::Gpa(_) => "gpa",
        }
    }
}

impl Evaluate for Goal {
    fn is_met(&self, snapshot: &ProgramSnapshot<'_>) -> bool {
        match self {
            Goal::Duration(goal) => goal.is_met(snapshot),
            Goal::Gpa(goal) => goal.is_met(snapshot),
        }
    }

    fn progress(&self, snapshot: &ProgramSnapshot<'_>) -> f64 {
        match self {
            Goal::Duration(goal) => goal.progress(snapshot),
            Goal::Gpa(goal) => goal.progress(snapshot),
        }
    }
}

impl From<DurationGoal> for Goal {
    fn from(goal: DurationGoal) -> Self {
        Goal::Duration(goal)
    }
}

impl From<GpaGoal> for Goal {
    fn from(goal: GpaGoal) -> Self {
        Goal::Gpa(goal)
    }
}
