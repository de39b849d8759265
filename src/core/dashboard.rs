use crate::domain::goal::Evaluate;
use crate::domain::model::{Module, ModuleStatus};
use crate::domain::program::{ModuleIndex, ProgramSnapshot, StudyProgram};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub title_width: usize,
    pub code_width: usize,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            title_width: 48,
            code_width: 14,
        }
    }
}

/// Read-only presentation of a program for the terminal.
pub struct DashboardView<'a> {
    program: &'a StudyProgram,
    snapshot: ProgramSnapshot<'a>,
    layout: TableLayout,
}

impl<'a> DashboardView<'a> {
    pub fn new(program: &'a StudyProgram) -> Self {
        Self::with_layout(program, TableLayout::default())
    }

    pub fn with_layout(program: &'a StudyProgram, layout: TableLayout) -> Self {
        Self {
            program,
            snapshot: program.snapshot(),
            layout,
        }
    }

    pub fn snapshot(&self) -> &ProgramSnapshot<'a> {
        &self.snapshot
    }

    pub fn progress_bar(&self, width: usize) -> String {
        let snapshot = &self.snapshot;
        if snapshot.total_ects == 0 {
            return "[No target ECTS configured]".to_string();
        }
        let ratio = f64::from(snapshot.ects_completed) / f64::from(snapshot.total_ects);
        let filled = ((ratio * width as f64) as usize).min(width);
        format!(
            "[{}{}] {:.0}% ({}/{} ECTS)",
            "#".repeat(filled),
            "-".repeat(width - filled),
            ratio * 100.0,
            snapshot.ects_completed,
            snapshot.total_ects
        )
    }

    pub fn goal_lines(&self) -> Vec<String> {
        self.program
            .goals()
            .iter()
            .map(|goal| {
                let state = if goal.is_met(&self.snapshot) { "met" } else { "open" };
                format!(
                    "{}: {:.0}% ({})",
                    goal.description(),
                    goal.progress(&self.snapshot) * 100.0,
                    state
                )
            })
            .collect()
    }

    pub fn bucket_counts(&self) -> Vec<(&'static str, usize)> {
        let snapshot = &self.snapshot;
        vec![
            (ModuleStatus::Completed.label(), snapshot.completed_modules.len()),
            (ModuleStatus::Enrolled.label(), snapshot.enrolled_modules.len()),
            (ModuleStatus::Planned.label(), snapshot.planned_modules.len()),
            (ModuleStatus::Recognized.label(), snapshot.recognized_modules.len()),
        ]
    }

    pub fn grade_summary(&self) -> String {
        match self.snapshot.current_gpa {
            Some(gpa) => format!("Current GPA: {:.2}", gpa),
            None => "No grades recorded yet.".to_string(),
        }
    }

    /// Fixed-width table of `modules`; the ID column is shown when an index is given.
    pub fn module_table(&self, modules: &[&Module], index: Option<&ModuleIndex<'_>>) -> String {
        let code_width = self.layout.code_width;
        let title_width = self.layout.title_width;

        let mut header = format!(
            "{:<code_width$} {:<title_width$} {:>4}  {:<12} {:<5}",
            "Code", "Title", "ECTS", "Status", "Grade"
        );
        if index.is_some() {
            header = format!("{:<4} {}", "ID", header);
        }

        let mut lines = vec![header.trim_end().to_string(), "-".repeat(header.trim_end().len())];
        for module in modules {
            let grade = module
                .grade()
                .map(|g| format!("{:.1}", g))
                .unwrap_or_else(|| "-".to_string());
            let mut line = format!(
                "{:<code_width$} {:<title_width$} {:>4}  {:<12} {:<5}",
                shorten(module.code(), code_width),
                shorten(&module.title, title_width),
                module.ects,
                module.status().label(),
                grade
            );
            if let Some(index) = index {
                let id = index
                    .id_by_code
                    .get(module.code())
                    .map(|id| id.to_string())
                    .unwrap_or_default();
                line = format!("{:<4} {}", id, line);
            }
            lines.push(line.trim_end().to_string());
        }
        lines.join("\n")
    }
}

fn shorten(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}
