// tests/lint_aggregate.rs

use std::error::Error;
use std::sync::Arc;

use taskwire::errors::TaskwireError;
use taskwire::fs::mock::MockFileSystem;
use taskwire::types::RunFlags;
use taskwire_test_utils::builders::{ConfigFileBuilder, standard_runner};
use taskwire_test_utils::fake_runner::FakeProcessRunner;
use taskwire_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn lint_config() -> taskwire::config::ConfigFile {
    ConfigFileBuilder::new()
        .tslint("tslint", &["-c", "tslint.json", "src/**/*.ts"])
        .stylelint("stylelint", &["src/**/*.scss", "--syntax", "scss"])
        .build()
}

#[tokio::test]
async fn lint_succeeds_when_every_linter_passes() -> TestResult {
    init_tracing();
    let fake = FakeProcessRunner::new();
    let runner = standard_runner(
        lint_config(),
        "/proj",
        RunFlags::default(),
        Arc::new(MockFileSystem::new()),
        Arc::new(fake.clone()),
    );

    runner.run("lint").await?;

    assert_eq!(
        fake.command_lines(),
        vec![
            "tslint -c tslint.json src/**/*.ts",
            "stylelint src/**/*.scss --syntax scss",
        ]
    );
    for inv in fake.invocations() {
        assert_eq!(inv.spec.cwd.as_deref(), Some(std::path::Path::new("/proj")));
    }
    Ok(())
}

#[tokio::test]
async fn one_failing_linter_fails_lint_but_the_other_still_runs() -> TestResult {
    init_tracing();
    let fake = FakeProcessRunner::new().exit_with("tslint", None, 2);
    let runner = standard_runner(
        lint_config(),
        "/proj",
        RunFlags::default(),
        Arc::new(MockFileSystem::new()),
        Arc::new(fake.clone()),
    );

    let err = runner.run("lint").await.unwrap_err();

    assert!(fake.ran("stylelint"), "stylelint should still run");
    match &err {
        TaskwireError::AggregateFailed { task, .. } => assert_eq!(task, "lint"),
        other => panic!("expected AggregateFailed, got {other:?}"),
    }
    assert_eq!(err.failed_tasks(), vec!["tslint"]);
    assert!(err.to_string().contains("status 2"));
    Ok(())
}

#[tokio::test]
async fn all_failures_are_reported() -> TestResult {
    init_tracing();
    let fake = FakeProcessRunner::new()
        .exit_with("tslint", None, 1)
        .exit_with("stylelint", None, 78);
    let runner = standard_runner(
        lint_config(),
        "/proj",
        RunFlags::default(),
        Arc::new(MockFileSystem::new()),
        Arc::new(fake.clone()),
    );

    let err = runner.run("lint").await.unwrap_err();
    assert_eq!(err.failed_tasks(), vec!["tslint", "stylelint"]);
    assert!(err.to_string().contains("status 78"));
    Ok(())
}

#[tokio::test]
async fn single_linter_task_reports_exit_code() -> TestResult {
    init_tracing();
    let fake = FakeProcessRunner::new().exit_with("stylelint", None, 3);
    let runner = standard_runner(
        lint_config(),
        "/proj",
        RunFlags::default(),
        Arc::new(MockFileSystem::new()),
        Arc::new(fake.clone()),
    );

    match runner.run("stylelint").await {
        Err(TaskwireError::ProcessFailed { command, code }) => {
            assert_eq!(code, 3);
            assert!(command.starts_with("stylelint"));
        }
        other => panic!("expected ProcessFailed, got {other:?}"),
    }
    assert!(!fake.ran("tslint"));
    Ok(())
}

#[tokio::test]
async fn unknown_task_is_reported() {
    let runner = standard_runner(
        lint_config(),
        "/proj",
        RunFlags::default(),
        Arc::new(MockFileSystem::new()),
        Arc::new(FakeProcessRunner::new()),
    );

    assert!(matches!(
        runner.run("eslint").await,
        Err(TaskwireError::TaskNotFound(name)) if name == "eslint"
    ));
}
