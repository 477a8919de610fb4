// tests/publish_package.rs

use std::env;
use std::error::Error;

use serial_test::serial;
use taskwire::errors::TaskwireError;
use taskwire::exec::{OutputMode, ProcessOutput};
use taskwire::fs::RealFileSystem;
use taskwire::publish::{PublishRequest, publish_package};
use taskwire::types::PublishOutcome;
use taskwire_test_utils::builders::ProjectFixture;
use taskwire_test_utils::fake_runner::FakeProcessRunner;
use taskwire_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn request(project: &ProjectFixture, tag: Option<&str>, dry: bool) -> PublishRequest {
    PublishRequest {
        package_dir: project.path("dist/pkg"),
        manifest: "package.json".to_string(),
        npm: "npm".to_string(),
        access: "public".to_string(),
        tag: tag.map(str::to_string),
        dry,
    }
}

fn with_manifest() -> ProjectFixture {
    let project = ProjectFixture::new();
    project.write("dist/pkg/package.json", r#"{"name":"pkg"}"#);
    project
}

#[tokio::test]
#[serial(cwd)]
async fn publishes_without_tag_and_restores_cwd() -> TestResult {
    init_tracing();
    let project = with_manifest();
    let fake = FakeProcessRunner::new();
    let before = env::current_dir()?;

    let outcome = publish_package(&request(&project, None, false), &RealFileSystem, &fake).await?;

    assert_eq!(outcome, PublishOutcome::Published);
    let invocations = fake.invocations();
    assert_eq!(invocations.len(), 1);
    let publish = &invocations[0];
    assert_eq!(publish.command_line(), "npm publish --access public");
    assert!(!publish.spec.args.iter().any(|a| a == "--tag"));
    assert_eq!(publish.mode, OutputMode::Stream);
    assert_eq!(publish.spec.cwd.as_deref(), Some(project.path("dist/pkg").as_path()));
    assert_eq!(publish.cwd_at_spawn.as_deref(), Some(project.path("dist/pkg").as_path()));
    assert_eq!(env::current_dir()?, before);
    Ok(())
}

#[tokio::test]
#[serial(cwd)]
async fn tag_is_passed_to_npm() -> TestResult {
    init_tracing();
    let project = with_manifest();
    let fake = FakeProcessRunner::new();

    publish_package(&request(&project, Some("next"), false), &RealFileSystem, &fake).await?;

    assert_eq!(
        fake.command_lines(),
        vec!["npm publish --access public --tag next"]
    );
    Ok(())
}

#[tokio::test]
#[serial(cwd)]
async fn non_zero_exit_fails_with_status_and_restores_cwd() -> TestResult {
    init_tracing();
    let project = with_manifest();
    let fake = FakeProcessRunner::new().respond(
        "npm",
        Some("publish"),
        ProcessOutput {
            code: 1,
            stdout: vec![],
            stderr: vec!["npm ERR! 403".to_string()],
        },
    );
    let before = env::current_dir()?;

    let err = publish_package(&request(&project, None, false), &RealFileSystem, &fake)
        .await
        .unwrap_err();

    assert!(matches!(err, TaskwireError::PublishFailed { code: 1 }));
    assert!(err.to_string().contains('1'));
    assert_eq!(env::current_dir()?, before);
    Ok(())
}

#[tokio::test]
#[serial(cwd)]
async fn dry_run_never_invokes_npm() -> TestResult {
    init_tracing();
    let project = with_manifest();
    let fake = FakeProcessRunner::new();
    let before = env::current_dir()?;

    let outcome =
        publish_package(&request(&project, Some("next"), true), &RealFileSystem, &fake).await?;

    assert_eq!(outcome, PublishOutcome::DryRun);
    assert!(fake.invocations().is_empty());
    assert_eq!(env::current_dir()?, before);
    Ok(())
}

#[tokio::test]
#[serial(cwd)]
async fn missing_manifest_fails_even_when_dry() -> TestResult {
    init_tracing();
    let project = ProjectFixture::new();
    project.mkdir("dist/pkg");
    let before = env::current_dir()?;

    for dry in [false, true] {
        let fake = FakeProcessRunner::new();
        let err = publish_package(&request(&project, None, dry), &RealFileSystem, &fake)
            .await
            .unwrap_err();

        match &err {
            TaskwireError::MissingManifest { dir, .. } => {
                assert_eq!(dir, &project.path("dist/pkg"))
            }
            other => panic!("expected MissingManifest, got {other:?}"),
        }
        assert!(err.to_string().contains("dist/pkg"));
        assert!(fake.invocations().is_empty());
        assert_eq!(env::current_dir()?, before);
    }
    Ok(())
}

#[tokio::test]
#[serial(cwd)]
async fn missing_package_dir_is_a_no_op() -> TestResult {
    init_tracing();
    let project = ProjectFixture::new();
    let fake = FakeProcessRunner::new();
    let before = env::current_dir()?;

    let outcome = publish_package(&request(&project, None, false), &RealFileSystem, &fake).await?;

    assert_eq!(outcome, PublishOutcome::NothingToPublish);
    assert!(fake.invocations().is_empty());
    assert_eq!(env::current_dir()?, before);
    Ok(())
}

#[tokio::test]
#[serial(cwd)]
async fn package_path_that_is_a_file_is_a_no_op() -> TestResult {
    init_tracing();
    let project = ProjectFixture::new();
    project.write("dist/pkg", "not a directory");
    let fake = FakeProcessRunner::new();

    let outcome = publish_package(&request(&project, None, false), &RealFileSystem, &fake).await?;
    assert_eq!(outcome, PublishOutcome::NothingToPublish);
    Ok(())
}

#[tokio::test]
#[serial(cwd)]
async fn unrestorable_cwd_fails_an_otherwise_clean_publish() -> TestResult {
    init_tracing();
    let project = with_manifest();
    let before = env::current_dir()?;
    let origin = tempfile::tempdir()?;
    let origin_path = origin.path().to_path_buf();
    env::set_current_dir(&origin_path)?;

    let doomed = origin_path.clone();
    let fake = FakeProcessRunner::new().on_run("npm", Some("publish"), 0, move |_spec| {
        let _ = std::fs::remove_dir_all(&doomed);
    });

    let result = publish_package(&request(&project, None, false), &RealFileSystem, &fake).await;
    env::set_current_dir(&before)?;

    assert!(fake.ran("npm publish"));
    assert!(!origin_path.exists());
    assert!(
        matches!(result, Err(TaskwireError::IoError(_))),
        "expected IoError, got {result:?}"
    );
    Ok(())
}
