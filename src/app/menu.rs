use crate::config::DashboardConfig;
use crate::core::{DashboardView, TableLayout};
use crate::domain::model::{Module, NewModule, StatusChange};
use crate::domain::ports::ProgramStore;
use crate::domain::program::{ModuleIndex, ModuleKey, StudyProgram};
use crate::utils::error::{DashboardError, Result};
use crate::utils::validation::{ensure_non_empty, ensure_positive, parse_float, parse_int};
use std::io::{BufRead, Write};

const MAIN_MENU: &str = "\nChoose an action:\n [1] List modules\n [2] Change module status\n [3] Add module\n [4] Grade overview\n [0] Quit\n\nInput: ";

const DEFAULT_ASSESSMENT_NAME: &str = "Assessment";

/// Menu-driven session over one program. Every successful change is saved right away.
pub struct DashboardCli<S: ProgramStore, R: BufRead, W: Write> {
    program: StudyProgram,
    store: S,
    input: R,
    output: W,
    layout: TableLayout,
    bar_width: usize,
}

impl<S: ProgramStore, R: BufRead, W: Write> DashboardCli<S, R, W> {
    pub fn new(program: StudyProgram, store: S, input: R, output: W) -> Self {
        Self {
            program,
            store,
            input,
            output,
            layout: TableLayout::default(),
            bar_width: 30,
        }
    }

    pub fn with_config(mut self, config: &DashboardConfig) -> Self {
        self.layout = config.table_layout();
        self.bar_width = config.display.progress_bar_width;
        self
    }

    pub fn program(&self) -> &StudyProgram {
        &self.program
    }

    pub fn into_inner(self) -> (StudyProgram, W) {
        (self.program, self.output)
    }

    /// Runs until the user quits or input ends. Recoverable errors are reported and the loop continues.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.print_overview()?;
            let Some(choice) = self.read_line(MAIN_MENU)? else {
                writeln!(self.output)?;
                return Ok(());
            };

            let outcome = match choice.as_str() {
                "1" => self.list_modules(),
                "2" => self.update_module(),
                "3" => self.add_module(),
                "4" => self.show_grades(),
                "0" => {
                    writeln!(self.output, "See you soon!")?;
                    return Ok(());
                }
                other => {
                    writeln!(self.output, "Unknown action '{}'.", other)?;
                    Ok(())
                }
            };

            if let Err(e) = outcome {
                if !e.is_recoverable() {
                    return Err(e);
                }
                tracing::debug!("Recoverable error: {}", e);
                writeln!(self.output, "Warning: {}", e.user_friendly_message())?;
            }
        }
    }

    fn print_overview(&mut self) -> Result<()> {
        let view = DashboardView::with_layout(&self.program, self.layout);
        writeln!(self.output, "\n{}", "=".repeat(60))?;
        writeln!(self.output, "{}", self.program.name)?;
        writeln!(self.output, "{}", view.progress_bar(self.bar_width))?;
        writeln!(self.output, "{}", view.grade_summary())?;

        writeln!(self.output, "\nGoals:")?;
        for line in view.goal_lines() {
            writeln!(self.output, "- {}", line)?;
        }

        writeln!(self.output, "\nModule status:")?;
        for (label, count) in view.bucket_counts() {
            writeln!(self.output, "{}: {}", label, count)?;
        }
        Ok(())
    }

    fn list_modules(&mut self) -> Result<()> {
        let view = DashboardView::with_layout(&self.program, self.layout);
        let index = self.program.module_index()?;
        write_buckets(&mut self.output, &view, &index)
    }

    fn update_module(&mut self) -> Result<()> {
        self.list_modules()?;
        writeln!(self.output)?;

        let Some(raw) = self.ask("Module code OR id to update (0 = cancel): ")? else {
            return self.cancelled();
        };
        let key = ModuleKey::parse(&raw);
        let current = match &key {
            ModuleKey::Id(id) => self.program.find_module_by_id(*id),
            ModuleKey::Code(code) => self.program.find_module(code),
        }
        .ok_or_else(|| DashboardError::ModuleNotFoundError {
            key: key.to_string(),
        })?;
        let code = current.code().to_string();

        writeln!(self.output, "Current status of {}: {}", code, current.status().label())?;
        writeln!(
            self.output,
            "New status:\n [1] Planned\n [2] Enrolled\n [3] Completed\n [4] Recognized\n"
        )?;
        let Some(choice) = self.ask("Choice (1-4, 0 = cancel): ")? else {
            return self.cancelled();
        };

        let change = match choice.as_str() {
            "1" => StatusChange::Reset,
            "2" => StatusChange::Enroll,
            "3" => {
                let Some(raw_grade) = self.ask("Grade (e.g. 1.7, 0 = cancel): ")? else {
                    return self.cancelled();
                };
                StatusChange::Complete {
                    grade: parse_float(&raw_grade, "Invalid grade.")?,
                }
            }
            "4" => StatusChange::Recognize,
            _ => return Err(DashboardError::validation("Invalid choice.")),
        };

        self.program.set_status(&key, change)?;
        self.store.save(&self.program)?;
        writeln!(self.output, "Status of {} updated and saved.", code)?;
        Ok(())
    }

    fn add_module(&mut self) -> Result<()> {
        let Some(raw) = self.ask("Semester (number, e.g. 1, 0 = cancel): ")? else {
            return self.cancelled();
        };
        let semester_number = parse_int(&raw, "Invalid semester.")?;
        if self.program.semester(semester_number).is_none() {
            return Err(DashboardError::SemesterNotFoundError {
                number: semester_number,
            });
        }

        let Some(raw) = self.ask("Module code (e.g. MAT101, 0 = cancel): ")? else {
            return self.cancelled();
        };
        let code = ensure_non_empty(&raw, "Module code must not be empty.")?.to_uppercase();
        if self.program.find_module(&code).is_some() {
            return Err(DashboardError::DuplicateModuleError { code });
        }

        let Some(raw) = self.ask("Module title (0 = cancel): ")? else {
            return self.cancelled();
        };
        let title = ensure_non_empty(&raw, "Module title must not be empty.")?;

        let Some(raw) = self.ask("ECTS (0 = cancel): ")? else {
            return self.cancelled();
        };
        let ects = ensure_positive(
            parse_int(&raw, "ECTS must be a whole number.")?,
            "ECTS must be positive.",
        )?;

        let Some(raw) = self.ask("Assessment name (e.g. Exam, 0 = cancel): ")? else {
            return self.cancelled();
        };
        let assessment_name = if raw.is_empty() {
            DEFAULT_ASSESSMENT_NAME.to_string()
        } else {
            raw
        };

        let Some(raw) = self.ask("Maximum points (e.g. 100, 0 = cancel): ")? else {
            return self.cancelled();
        };
        let max_points = ensure_positive(
            parse_float(&raw, "Maximum points must be a number.")?,
            "Maximum points must be positive.",
        )?;

        let id = self.program.add_module(
            semester_number,
            NewModule {
                code: code.clone(),
                title,
                ects,
                assessment_name,
                max_points,
            },
        )?;
        self.store.save(&self.program)?;
        writeln!(
            self.output,
            "Module {} (ID {}) added to semester {} and saved.",
            code, id, semester_number
        )?;
        Ok(())
    }

    fn show_grades(&mut self) -> Result<()> {
        let view = DashboardView::with_layout(&self.program, self.layout);
        let mut modules: Vec<&Module> = view.snapshot().graded_modules();
        modules.extend(view.snapshot().recognized_modules.iter().copied());

        if modules.is_empty() {
            writeln!(self.output, "No graded or recognized modules yet.")?;
            return Ok(());
        }

        let index = self.program.module_index()?;
        writeln!(self.output, "{}", view.grade_summary())?;
        writeln!(self.output, "Grade overview (including recognized modules):")?;
        writeln!(self.output, "{}", view.module_table(&modules, Some(&index)))?;
        Ok(())
    }

    fn cancelled(&mut self) -> Result<()> {
        writeln!(self.output, "Cancelled.")?;
        Ok(())
    }

    /// Like `read_line`, but "0" cancels as well.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        Ok(self.read_line(prompt)?.filter(|answer| answer != "0"))
    }

    /// Prompts and reads one trimmed line; `None` once input is exhausted.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

fn write_buckets<W: Write>(output: &mut W, view: &DashboardView<'_>, index: &ModuleIndex<'_>) -> Result<()> {
    let snapshot = view.snapshot();
    writeln!(output, "\n--- Completed modules ---")?;
    writeln!(output, "{}", view.module_table(&snapshot.completed_modules, Some(index)))?;
    writeln!(output, "\n--- Recognized modules ---")?;
    if snapshot.recognized_modules.is_empty() {
        writeln!(output, "No recognized modules.")?;
    } else {
        writeln!(output, "{}", view.module_table(&snapshot.recognized_modules, Some(index)))?;
    }
    writeln!(output, "\n--- Enrolled modules ---")?;
    writeln!(output, "{}", view.module_table(&snapshot.enrolled_modules, Some(index)))?;
    writeln!(output, "\n--- Planned modules ---")?;
    writeln!(output, "{}", view.module_table(&snapshot.planned_modules, Some(index)))?;
    Ok(())
}
