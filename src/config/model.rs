// src/config/model.rs

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [project]
/// dist_root = "dist"
/// package_dir = "dist/@angular/material"
///
/// [lint.tslint]
/// cmd = "tslint"
/// args = ["-c", "tslint.json", "src/**/*.ts"]
///
/// [release]
/// spec_glob = "dist/**/*.spec.*"
///
/// [publish]
/// access = "public"
/// ```
///
/// All sections are optional; an empty file is equivalent to
/// `ConfigFile::default()`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub project: ProjectSection,

    #[serde(default)]
    pub lint: LintSection,

    #[serde(default)]
    pub release: ReleaseSection,

    #[serde(default)]
    pub publish: PublishSection,
}

/// `[project]` section: where build output lives.
///
/// All paths are relative to the project root (the directory holding the
/// config file, or the current directory).
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    /// Build output removed by `clean` and scanned by the spec stripper.
    #[serde(default = "default_dist_root")]
    pub dist_root: String,

    /// The directory `npm publish` runs in.
    #[serde(default = "default_package_dir")]
    pub package_dir: String,

    /// Where `node = true` commands are looked up before falling back to `PATH`.
    #[serde(default = "default_node_bin_dir")]
    pub node_bin_dir: String,
}

fn default_dist_root() -> String {
    "dist".to_string()
}

fn default_package_dir() -> String {
    "dist/@angular/material".to_string()
}

fn default_node_bin_dir() -> String {
    "node_modules/.bin".to_string()
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            dist_root: default_dist_root(),
            package_dir: default_package_dir(),
            node_bin_dir: default_node_bin_dir(),
        }
    }
}

/// A single external command with fixed arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandConfig {
    pub cmd: String,

    #[serde(default)]
    pub args: Vec<String>,

    /// Resolve `cmd` from the project's node bin directory when present.
    #[serde(default)]
    pub node: bool,
}

impl CommandConfig {
    pub fn node<I, S>(cmd: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cmd: cmd.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            node: true,
        }
    }

    /// `cmd arg1 arg2 ...`, for logs and `--list`.
    pub fn display(&self) -> String {
        std::iter::once(self.cmd.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// `[lint]` section: the two linters `lint` fans out to.
#[derive(Debug, Clone, Deserialize)]
pub struct LintSection {
    #[serde(default = "default_tslint")]
    pub tslint: CommandConfig,

    #[serde(default = "default_stylelint")]
    pub stylelint: CommandConfig,
}

fn default_tslint() -> CommandConfig {
    CommandConfig::node("tslint", ["-c", "tslint.json", "src/**/*.ts"])
}

fn default_stylelint() -> CommandConfig {
    CommandConfig::node(
        "stylelint",
        [
            "src/**/*.scss",
            "--config",
            "stylelint-config.json",
            "--syntax",
            "scss",
        ],
    )
}

impl Default for LintSection {
    fn default() -> Self {
        Self {
            tslint: default_tslint(),
            stylelint: default_stylelint(),
        }
    }
}

/// `[release]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseSection {
    /// Compiler invocation producing the distributable.
    #[serde(default = "default_compile")]
    pub compile: CommandConfig,

    /// Glob (relative to the project root) of test artifacts stripped from
    /// the output tree.
    #[serde(default = "default_spec_glob")]
    pub spec_glob: String,
}

fn default_compile() -> CommandConfig {
    CommandConfig::node("ngc", ["-p", "src/lib/tsconfig-srcs.json"])
}

fn default_spec_glob() -> String {
    "dist/**/*.spec.*".to_string()
}

impl Default for ReleaseSection {
    fn default() -> Self {
        Self {
            compile: default_compile(),
            spec_glob: default_spec_glob(),
        }
    }
}

/// `[publish]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishSection {
    /// Package manager binary.
    #[serde(default = "default_npm")]
    pub npm: String,

    /// Value for `--access`: `"public"` or `"restricted"`.
    #[serde(default = "default_access")]
    pub access: String,

    /// Manifest file that must exist inside the package directory.
    #[serde(default = "default_manifest")]
    pub manifest: String,
}

fn default_npm() -> String {
    "npm".to_string()
}

fn default_access() -> String {
    "public".to_string()
}

fn default_manifest() -> String {
    "package.json".to_string()
}

impl Default for PublishSection {
    fn default() -> Self {
        Self {
            npm: default_npm(),
            access: default_access(),
            manifest: default_manifest(),
        }
    }
}
