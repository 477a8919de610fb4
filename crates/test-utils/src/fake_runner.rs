use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use taskwire::errors::{Result, TaskwireError};
use taskwire::exec::{OutputMode, ProcessOutput, ProcessRunner, ProcessSpec};
use tracing::debug;

type Effect = Arc<dyn Fn(&ProcessSpec) + Send + Sync>;

/// One recorded call to [`FakeProcessRunner::run`].
#[derive(Debug, Clone)]
pub struct Invocation {
    pub spec: ProcessSpec,
    pub mode: OutputMode,
    /// The process working directory at the moment of the call.
    pub cwd_at_spawn: Option<PathBuf>,
}

impl Invocation {
    /// `program arg1 arg2`, using only the program's file name.
    pub fn command_line(&self) -> String {
        let program = PathBuf::from(&self.spec.program)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.spec.program.clone());
        std::iter::once(program)
            .chain(self.spec.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

struct Rule {
    program: String,
    first_arg: Option<String>,
    output: ProcessOutput,
    effect: Option<Effect>,
    spawn_fails: bool,
}

impl Rule {
    fn matches(&self, spec: &ProcessSpec) -> bool {
        let program_matches = spec.program == self.program
            || PathBuf::from(&spec.program)
                .file_name()
                .is_some_and(|n| n == self.program.as_str());
        let arg_matches = match &self.first_arg {
            Some(arg) => spec.args.first() == Some(arg),
            None => true,
        };
        program_matches && arg_matches
    }
}

/// A process runner that never spawns anything.
///
/// - records every invocation (with the cwd at that moment)
/// - answers with a scripted `ProcessOutput` per program (+ first argument),
///   exit 0 with no output when nothing is scripted
/// - optionally runs a side effect, e.g. to simulate a compiler writing files
/// - can refuse to start a program, as if it were not installed
#[derive(Clone, Default)]
pub struct FakeProcessRunner {
    invocations: Arc<Mutex<Vec<Invocation>>>,
    rules: Arc<Mutex<Vec<Rule>>>,
}

impl FakeProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `program [first_arg ...]` exit with `code`.
    pub fn exit_with(self, program: &str, first_arg: Option<&str>, code: i32) -> Self {
        self.respond(
            program,
            first_arg,
            ProcessOutput {
                code,
                ..ProcessOutput::default()
            },
        )
    }

    pub fn respond(self, program: &str, first_arg: Option<&str>, output: ProcessOutput) -> Self {
        self.push_rule(program, first_arg, output, None)
    }

    /// Run `effect` whenever `program [first_arg ...]` is invoked, then exit
    /// with `code`.
    pub fn on_run<F>(self, program: &str, first_arg: Option<&str>, code: i32, effect: F) -> Self
    where
        F: Fn(&ProcessSpec) + Send + Sync + 'static,
    {
        let output = ProcessOutput {
            code,
            ..ProcessOutput::default()
        };
        self.push_rule(program, first_arg, output, Some(Arc::new(effect)))
    }

    /// Make `program [first_arg ...]` fail to start with `NotFound`.
    pub fn fail_to_spawn(self, program: &str, first_arg: Option<&str>) -> Self {
        let this = self.push_rule(program, first_arg, ProcessOutput::default(), None);
        if let Some(rule) = this.rules.lock().unwrap().last_mut() {
            rule.spawn_fails = true;
        }
        this
    }

    fn push_rule(
        self,
        program: &str,
        first_arg: Option<&str>,
        output: ProcessOutput,
        effect: Option<Effect>,
    ) -> Self {
        self.rules.lock().unwrap().push(Rule {
            program: program.to_string(),
            first_arg: first_arg.map(str::to_string),
            output,
            effect,
            spawn_fails: false,
        });
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    /// Command lines of every invocation, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.invocations()
            .iter()
            .map(Invocation::command_line)
            .collect()
    }

    /// Whether any invocation's command line starts with `prefix`.
    pub fn ran(&self, prefix: &str) -> bool {
        self.command_lines().iter().any(|c| c.starts_with(prefix))
    }
}

impl ProcessRunner for FakeProcessRunner {
    fn run<'a>(
        &'a self,
        spec: &'a ProcessSpec,
        mode: OutputMode,
    ) -> Pin<Box<dyn Future<Output = Result<ProcessOutput>> + Send + 'a>> {
        Box::pin(async move {
            self.invocations.lock().unwrap().push(Invocation {
                spec: spec.clone(),
                mode,
                cwd_at_spawn: std::env::current_dir().ok(),
            });

            let (output, effect, spawn_fails) = {
                let rules = self.rules.lock().unwrap();
                match rules.iter().find(|r| r.matches(spec)) {
                    Some(rule) => (rule.output.clone(), rule.effect.clone(), rule.spawn_fails),
                    None => (ProcessOutput::default(), None, false),
                }
            };
            debug!(command = %spec, spawn_fails, code = output.code, "fake process run");

            if spawn_fails {
                return Err(TaskwireError::IoError(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{}: command not found", spec.program),
                )));
            }

            if let Some(effect) = effect {
                effect(spec);
            }
            Ok(output)
        })
    }
}
