use crate::domain::model::{Module, ModuleStatus};
use crate::domain::program::{ProgramSnapshot, StudyProgram};

/// Recomputes the aggregate view of `program` from scratch.
pub fn compute(program: &StudyProgram) -> ProgramSnapshot<'_> {
    let modules = program.all_modules();
    let mut snapshot = ProgramSnapshot::empty(program.total_ects);

    for &module in &modules {
        match module.status() {
            ModuleStatus::Completed => snapshot.completed_modules.push(module),
            ModuleStatus::Enrolled => snapshot.enrolled_modules.push(module),
            ModuleStatus::Planned => snapshot.planned_modules.push(module),
            ModuleStatus::Recognized => snapshot.recognized_modules.push(module),
        }
    }

    // recognized credit counts as earned even without a grade
    snapshot.ects_completed =
        sum_ects(&snapshot.completed_modules).saturating_add(sum_ects(&snapshot.recognized_modules));
    snapshot.ects_enrolled = sum_ects(&snapshot.enrolled_modules);
    snapshot.current_gpa = weighted_gpa(&snapshot.completed_modules);
    snapshot.completed_semesters = program
        .semesters
        .iter()
        .filter(|s| s.is_completed())
        .count() as u32;
    snapshot.modules = modules;

    snapshot
}

fn sum_ects(modules: &[&Module]) -> u32 {
    modules.iter().fold(0u32, |sum, m| sum.saturating_add(m.ects))
}

/// Credit-weighted mean grade of the graded modules, rounded to two decimals.
/// `None` when nothing has been graded yet.
pub fn weighted_gpa(completed: &[&Module]) -> Option<f64> {
    let (weighted_sum, ects_sum) = completed
        .iter()
        .filter_map(|m| m.grade().map(|grade| (grade, m.ects)))
        .fold((0.0, 0u64), |(sum, ects), (grade, weight)| {
            (sum + grade * f64::from(weight), ects + u64::from(weight))
        });

    if ects_sum == 0 {
        return None;
    }
    Some(round2(weighted_sum / ects_sum as f64))
}

// ties go to the even digit: 1.125 -> 1.12
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
