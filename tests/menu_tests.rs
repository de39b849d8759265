use std::io::Cursor;
use study_progress::domain::{GpaGoal, NewModule, Semester};
use study_progress::{
    load_program, DashboardCli, DashboardConfig, DashboardError, JsonFileStore, ModuleStatus,
    StudyProgram,
};
use tempfile::TempDir;

fn program() -> StudyProgram {
    let mut program = StudyProgram::new("Computer Science", 30);
    program.add_semester(Semester::new(1));
    program.add_semester(Semester::new(2));
    program.add_goal(GpaGoal::new(2.0));
    for (semester, code) in [(1, "MAT101"), (1, "PRG101")] {
        program
            .add_module(
                semester,
                NewModule {
                    code: code.to_string(),
                    title: format!("Course {}", code),
                    ects: 5,
                    assessment_name: "Exam".to_string(),
                    max_points: 100.0,
                },
            )
            .unwrap();
    }
    program
}

/// Runs a scripted session and returns the final program, the printed text and the store path.
fn run_session(script: &str) -> (StudyProgram, String, std::path::PathBuf, TempDir) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("program.json");
    let store = JsonFileStore::new(&path);
    assert_eq!(store.path(), path.as_path());
    let mut cli = DashboardCli::new(program(), store, Cursor::new(script.to_string()), Vec::new());

    cli.run().unwrap();

    let (program, output) = cli.into_inner();
    (program, String::from_utf8(output).unwrap(), path, dir)
}

#[test]
fn test_quit_immediately() {
    let (program, output, path, _dir) = run_session("0\n");
    assert!(output.contains("Computer Science"));
    assert!(output.contains("No grades recorded yet."));
    assert!(output.contains("Planned: 2"));
    assert!(output.contains("See you soon!"));
    assert_eq!(program, self::program());
    assert!(!path.exists());
}

#[test]
fn test_end_of_input_ends_session() {
    let (_, output, _, _dir) = run_session("");
    assert!(output.contains("Choose an action"));
}

#[test]
fn test_complete_module_by_code_saves() {
    let (program, output, path, _dir) = run_session("2\nmat101\n3\n1,7\n0\n");

    let module = program.find_module("MAT101").unwrap();
    assert_eq!(module.status(), ModuleStatus::Completed);
    assert_eq!(module.grade(), Some(1.7));
    assert!(output.contains("Status of MAT101 updated and saved."));
    assert!(output.contains("Current GPA: 1.70"));

    let saved = load_program(&path).unwrap();
    assert_eq!(saved, program);
}

#[test]
fn test_recognize_module_by_id() {
    let (program, output, path, _dir) = run_session("2\n2\n4\n0\n");

    assert_eq!(
        program.find_module("PRG101").unwrap().status(),
        ModuleStatus::Recognized
    );
    assert!(output.contains("Current status of PRG101: Planned"));
    assert!(path.exists());
}

#[test]
fn test_invalid_grade_warns_and_keeps_state() {
    let (program, output, path, _dir) = run_session("2\nMAT101\n3\nexcellent\n0\n");

    assert!(output.contains("Warning: Invalid grade."));
    assert_eq!(
        program.find_module("MAT101").unwrap().status(),
        ModuleStatus::Planned
    );
    assert!(!path.exists());
}

#[test]
fn test_unknown_module_warns() {
    let (_, output, _, _dir) = run_session("2\n99\n0\n");
    assert!(output.contains("Warning: Module with id 99 not found"));
}

#[test]
fn test_cancel_status_change() {
    let (program, output, path, _dir) = run_session("2\nMAT101\n0\n0\n");
    assert!(output.contains("Cancelled."));
    assert_eq!(program, self::program());
    assert!(!path.exists());
}

#[test]
fn test_add_module() {
    let (program, output, path, _dir) =
        run_session("3\n2\ndbs201\nDatabases\n6\n\n80\n0\n");

    let module = program.find_module("DBS201").unwrap();
    assert_eq!(module.id(), Some(3));
    assert_eq!(module.ects, 6);
    assert_eq!(module.assessment().name, "Assessment");
    assert_eq!(module.assessment().max_points, 80.0);
    assert_eq!(program.semester(2).unwrap().modules.len(), 1);
    assert!(output.contains("Module DBS201 (ID 3) added to semester 2 and saved."));
    assert_eq!(load_program(&path).unwrap(), program);
}

#[test]
fn test_add_module_rejections() {
    let (program, output, _, _dir) = run_session("3\n7\n3\n1\nmat101\n3\n1\nNEW1\nNew\nfive\n0\n");

    assert!(output.contains("Warning: Semester 7 does not exist"));
    assert!(output.contains("Warning: A module with code MAT101 already exists"));
    assert!(output.contains("Warning: ECTS must be a whole number."));
    assert_eq!(program.all_modules().len(), 2);
}

#[test]
fn test_list_modules_and_grade_overview() {
    let (_, output, _, _dir) = run_session("1\n4\n2\n1\n4\n4\n0\n");

    assert!(output.contains("--- Planned modules ---"));
    assert!(output.contains("No recognized modules."));
    assert!(output.contains("No graded or recognized modules yet."));
    assert!(output.contains("Grade overview (including recognized modules):"));
}

#[test]
fn test_config_changes_progress_bar_width() {
    let dir = TempDir::new().unwrap();
    let config = DashboardConfig::from_toml_str("[display]\nprogress_bar_width = 10\n").unwrap();
    let store = JsonFileStore::new(dir.path().join("program.json"));
    let mut cli = DashboardCli::new(program(), store, Cursor::new("0\n"), Vec::new())
        .with_config(&config);

    cli.run().unwrap();

    let (_, output) = cli.into_inner();
    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("[----------] 0% (0/30 ECTS)"));
}

#[test]
fn test_program_is_readable_during_session() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("program.json"));
    let mut cli = DashboardCli::new(program(), store, Cursor::new("2\n1\n2\n"), Vec::new());
    assert_eq!(cli.program().all_modules().len(), 2);

    cli.run().unwrap();

    assert_eq!(
        cli.program().find_module("MAT101").unwrap().status(),
        ModuleStatus::Enrolled
    );
}

#[test]
fn test_save_failure_stops_session() {
    let dir = TempDir::new().unwrap();
    // a directory where the state file should be
    let store = JsonFileStore::new(dir.path());
    let mut cli = DashboardCli::new(program(), store, Cursor::new("2\n1\n2\n0\n"), Vec::new());

    let err = cli.run().unwrap_err();
    assert!(matches!(err, DashboardError::IoError(_)));
}
