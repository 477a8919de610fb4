// src/tasks/runner.rs

//! Executes registered tasks.
//!
//! Everything runs on a single logical flow: a task awaits each constituent
//! (and each child process) before starting the next, so no two external
//! commands ever overlap.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{error, info, warn};

use crate::config::model::{CommandConfig, ConfigFile};
use crate::errors::{Result, TaskwireError};
use crate::exec::{OutputMode, ProcessRunner, ProcessSpec};
use crate::fs::FileSystem;
use crate::publish::{PublishFlow, PublishRequest, publish_package};
use crate::release::{clean_dir, strip_spec_files};
use crate::tasks::command::resolve_command;
use crate::tasks::registry::{Builtin, TaskKind, TaskRegistry};
use crate::types::{PublishOutcome, RunFlags};

type TaskFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

const NOT_LOGGED_IN: &str = "You must be logged in to publish.";

/// Inputs shared by every task in one invocation.
#[derive(Debug, Clone)]
pub struct TaskContext {
    /// Absolute project root; relative config paths resolve against it.
    pub root: PathBuf,
    pub config: ConfigFile,
    pub flags: RunFlags,
}

pub struct TaskRunner {
    registry: TaskRegistry,
    ctx: TaskContext,
    fs: Arc<dyn FileSystem>,
    processes: Arc<dyn ProcessRunner>,
    /// Set by the `:publish` builtin, read back by the publish flow.
    last_publish: Mutex<Option<PublishOutcome>>,
}

impl TaskRunner {
    pub fn new(
        registry: TaskRegistry,
        ctx: TaskContext,
        fs: Arc<dyn FileSystem>,
        processes: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            registry,
            ctx,
            fs,
            processes,
            last_publish: Mutex::new(None),
        }
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    /// Run a task by name, including everything it is composed of.
    pub fn run<'a>(&'a self, name: &'a str) -> TaskFuture<'a> {
        Box::pin(async move {
            let def = self
                .registry
                .get(name)
                .ok_or_else(|| TaskwireError::TaskNotFound(name.to_string()))?;

            info!(task = name, "starting task");
            let result = match &def.kind {
                TaskKind::Exec(command) => self.run_exec(command).await,
                TaskKind::Sequence(steps) => self.run_sequence(steps).await,
                TaskKind::Aggregate(parts) => self.run_aggregate(name, parts).await,
                TaskKind::Builtin(builtin) => self.run_builtin(*builtin).await,
                TaskKind::PublishFlow {
                    auth,
                    build,
                    publish,
                } => {
                    let (_flow, result) = self.run_publish_flow(auth, build, publish).await;
                    result
                }
            };

            match &result {
                Ok(()) => info!(task = name, "finished task"),
                Err(e) => error!(task = name, error = %e, "task failed"),
            }
            result
        })
    }

    async fn run_exec(&self, command: &CommandConfig) -> Result<()> {
        let spec = resolve_command(
            command,
            &self.ctx.config.project,
            &self.ctx.root,
            self.fs.as_ref(),
        );
        let output = self.processes.run(&spec, OutputMode::Stream).await?;
        if output.success() {
            Ok(())
        } else {
            Err(TaskwireError::ProcessFailed {
                command: spec.to_string(),
                code: output.code,
            })
        }
    }

    async fn run_sequence(&self, steps: &[String]) -> Result<()> {
        for step in steps {
            self.run(step).await?;
        }
        Ok(())
    }

    async fn run_aggregate(&self, name: &str, parts: &[String]) -> Result<()> {
        let mut failures = Vec::new();
        for part in parts {
            if let Err(e) = self.run(part).await {
                failures.push((part.clone(), e.to_string()));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(TaskwireError::AggregateFailed {
                task: name.to_string(),
                failures,
            })
        }
    }

    async fn run_builtin(&self, builtin: Builtin) -> Result<()> {
        let project = &self.ctx.config.project;
        match builtin {
            Builtin::Clean => {
                clean_dir(self.fs.as_ref(), &self.ctx.root.join(&project.dist_root))?;
                Ok(())
            }
            Builtin::StripSpecFiles => {
                strip_spec_files(
                    self.fs.as_ref(),
                    &self.ctx.root,
                    &project.dist_root,
                    &self.ctx.config.release.spec_glob,
                )?;
                Ok(())
            }
            Builtin::CheckAuth => self.check_auth().await,
            Builtin::PublishPackage => {
                let outcome = self.publish().await?;
                *self
                    .last_publish
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner) = Some(outcome);
                Ok(())
            }
        }
    }

    /// `npm whoami`, silently. Any failure, including npm not starting at
    /// all, means we're not logged in.
    async fn check_auth(&self) -> Result<()> {
        let spec = ProcessSpec::new(&self.ctx.config.publish.npm, ["whoami"])
            .in_dir(&self.ctx.root);
        let output = match self.processes.run(&spec, OutputMode::Silent).await {
            Ok(output) => output,
            Err(e) => {
                warn!(command = %spec, error = %e, "could not run auth check");
                return Err(TaskwireError::NotAuthenticated {
                    message: NOT_LOGGED_IN.to_string(),
                    code: -1,
                });
            }
        };

        if !output.success() {
            return Err(TaskwireError::NotAuthenticated {
                message: NOT_LOGGED_IN.to_string(),
                code: output.code,
            });
        }

        let user = output.stdout.first().map(String::as_str).unwrap_or("");
        info!(user, "logged in to registry");
        Ok(())
    }

    async fn publish(&self) -> Result<PublishOutcome> {
        let publish = &self.ctx.config.publish;
        let tag = self.ctx.flags.tag.clone();

        match &tag {
            None => {
                info!("You can use a label with --tag=labelName.");
                info!("Publishing using the latest tag.");
            }
            Some(label) => info!("Publishing using the {label} tag."),
        }

        let req = PublishRequest {
            package_dir: self.ctx.root.join(&self.ctx.config.project.package_dir),
            manifest: publish.manifest.clone(),
            npm: publish.npm.clone(),
            access: publish.access.clone(),
            tag,
            dry: self.ctx.flags.dry,
        };

        publish_package(&req, self.fs.as_ref(), self.processes.as_ref()).await
    }

    /// Run the three publish stages in order, recording each transition.
    ///
    /// The returned flow is always terminal: `Published` when every stage
    /// succeeded, `Failed` otherwise (in which case the result carries the
    /// stage's error). On success the flow also carries the publish outcome,
    /// which tells a real publish apart from a dry run or an empty package
    /// directory.
    pub async fn run_publish_flow(
        &self,
        auth: &str,
        build: &str,
        publish: &str,
    ) -> (PublishFlow, Result<()>) {
        let mut flow = PublishFlow::new();
        self.take_last_publish();

        for stage in [auth, build, publish] {
            if let Err(e) = self.run(stage).await {
                flow.fail();
                return (flow, Err(e));
            }
            if let Err(e) = flow.advance() {
                flow.fail();
                return (flow, Err(e));
            }
        }

        if let Some(outcome) = self.take_last_publish() {
            flow.record_outcome(outcome);
        }
        (flow, Ok(()))
    }

    fn take_last_publish(&self) -> Option<PublishOutcome> {
        self.last_publish
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}
