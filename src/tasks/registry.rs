// src/tasks/registry.rs

use crate::config::model::{CommandConfig, ConfigFile};
use crate::errors::{Result, TaskwireError};
use crate::tasks::graph::validate_registry;
use crate::types::TaskName;

/// Steps implemented in-process rather than by an external command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// Remove the dist root.
    Clean,
    /// Delete test artifacts matching `release.spec_glob` from the dist root.
    StripSpecFiles,
    /// `npm whoami`; fails if the user is not logged in.
    CheckAuth,
    /// Publish the package directory with `npm publish`.
    PublishPackage,
}

/// What running a task means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    /// A single external command; fails on a non-zero exit.
    Exec(CommandConfig),
    /// Constituents run strictly in order; the first failure aborts the rest.
    Sequence(Vec<TaskName>),
    /// Every constituent runs; the task fails if any of them failed and
    /// reports all failures together.
    Aggregate(Vec<TaskName>),
    Builtin(Builtin),
    /// Auth check, build, publish, tracked as a `PublishFlow`.
    PublishFlow {
        auth: TaskName,
        build: TaskName,
        publish: TaskName,
    },
}

impl TaskKind {
    /// Tasks this one invokes, in invocation order.
    pub fn references(&self) -> Vec<&str> {
        match self {
            TaskKind::Sequence(steps) | TaskKind::Aggregate(steps) => {
                steps.iter().map(String::as_str).collect()
            }
            TaskKind::PublishFlow {
                auth,
                build,
                publish,
            } => vec![auth.as_str(), build.as_str(), publish.as_str()],
            TaskKind::Exec(_) | TaskKind::Builtin(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDef {
    pub name: TaskName,
    pub description: String,
    pub kind: TaskKind,
}

/// The set of invokable tasks, in registration order.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: Vec<TaskDef>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task. Names must be unique.
    pub fn register(
        &mut self,
        name: impl Into<TaskName>,
        description: impl Into<String>,
        kind: TaskKind,
    ) -> Result<()> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(TaskwireError::ConfigError(format!(
                "task '{name}' is registered twice"
            )));
        }
        self.tasks.push(TaskDef {
            name,
            description: description.into(),
            kind,
        });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TaskDef> {
        self.tasks.iter().find(|t| t.name == name)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &TaskDef> {
        self.tasks.iter()
    }

    /// Run the graph checks and hand the registry back.
    pub fn validated(self) -> Result<Self> {
        validate_registry(&self)?;
        Ok(self)
    }

    /// The standard task set, with commands taken from `cfg`.
    pub fn standard(cfg: &ConfigFile) -> Result<Self> {
        let mut r = Self::new();

        r.register(
            "tslint",
            "Lint TypeScript sources",
            TaskKind::Exec(cfg.lint.tslint.clone()),
        )?;
        r.register(
            "stylelint",
            "Lint SCSS sources",
            TaskKind::Exec(cfg.lint.stylelint.clone()),
        )?;
        r.register(
            "lint",
            "Run every linter and report all failures",
            TaskKind::Aggregate(names(["tslint", "stylelint"])),
        )?;

        r.register(
            "clean",
            "Remove the build output directory",
            TaskKind::Builtin(Builtin::Clean),
        )?;
        r.register(
            ":build:components:ngc",
            "Compile the distributable",
            TaskKind::Exec(cfg.release.compile.clone()),
        )?;
        r.register(
            ":build:release:clean-spec",
            "Strip test artifacts from the build output",
            TaskKind::Builtin(Builtin::StripSpecFiles),
        )?;
        r.register(
            "build:release",
            "Clean, compile and strip spec files",
            TaskKind::Sequence(names([
                "clean",
                ":build:components:ngc",
                ":build:release:clean-spec",
            ])),
        )?;

        r.register(
            ":publish:whoami",
            "Make sure we're logged in to the registry",
            TaskKind::Builtin(Builtin::CheckAuth),
        )?;
        r.register(
            ":publish",
            "Publish the package directory",
            TaskKind::Builtin(Builtin::PublishPackage),
        )?;
        r.register(
            "publish",
            "Check auth, build for release, then publish",
            TaskKind::PublishFlow {
                auth: ":publish:whoami".to_string(),
                build: "build:release".to_string(),
                publish: ":publish".to_string(),
            },
        )?;

        r.validated()
    }
}

fn names<const N: usize>(list: [&str; N]) -> Vec<TaskName> {
    list.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_exposes_cli_surface() {
        let r = TaskRegistry::standard(&ConfigFile::default()).unwrap();
        for name in ["lint", "tslint", "stylelint", "build:release", "publish"] {
            assert!(r.get(name).is_some(), "missing task {name}");
        }
    }

    #[test]
    fn release_pipeline_order_is_fixed() {
        let r = TaskRegistry::standard(&ConfigFile::default()).unwrap();
        let release = r.get("build:release").unwrap();
        assert_eq!(
            release.kind.references(),
            vec!["clean", ":build:components:ngc", ":build:release:clean-spec"]
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut r = TaskRegistry::new();
        r.register("a", "", TaskKind::Builtin(Builtin::Clean)).unwrap();
        assert!(r.register("a", "", TaskKind::Builtin(Builtin::Clean)).is_err());
    }
}
