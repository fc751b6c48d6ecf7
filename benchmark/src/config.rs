//! @ai:module:intent Configuration structs for the benchmark harness driver
//! @ai:module:layer infrastructure
//! @ai:module:public_api HarnessConfig, PathConfig, ScratchPattern, BuildConfig, DebuggerConfig
//! @ai:module:stateless true

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File picked up from the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "ride-bench.toml";

/// @ai:intent Main configuration for the harness driver
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub paths: PathConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub debugger: DebuggerConfig,
}

/// @ai:intent Locations of the benchmark binary, its log and its scratch files
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_binary")]
    pub binary: PathBuf,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default = "default_scratch")]
    pub scratch: Vec<ScratchPattern>,
}

/// @ai:intent A directory plus a wildcard pattern naming stale scratch entries
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScratchPattern {
    pub dir: PathBuf,
    pub pattern: String,
}

/// @ai:intent Build system invocation settings
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default = "default_build_program")]
    pub program: String,
    #[serde(default = "default_jobs")]
    pub jobs: u32,
    #[serde(default = "default_debug_arg")]
    pub debug_arg: String,
    #[serde(default = "default_clean_target")]
    pub clean_target: String,
    #[serde(default = "default_true")]
    pub run_after_build: bool,
    #[serde(default = "default_true")]
    pub clear_screen: bool,
    #[serde(default = "default_clear_program")]
    pub clear_program: String,
}

/// @ai:intent Debugger wrapping for run-with-debugger sweeps
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebuggerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_debugger_program")]
    pub program: String,
    #[serde(default = "default_debugger_args")]
    pub args: Vec<String>,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            log_file: default_log_file(),
            scratch: default_scratch(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            program: default_build_program(),
            jobs: default_jobs(),
            debug_arg: default_debug_arg(),
            clean_target: default_clean_target(),
            run_after_build: true,
            clear_screen: true,
            clear_program: default_clear_program(),
        }
    }
}

impl Default for DebuggerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: default_debugger_program(),
            args: default_debugger_args(),
        }
    }
}

fn default_binary() -> PathBuf {
    PathBuf::from("./bin/main")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("nums.txt")
}

fn default_scratch() -> Vec<ScratchPattern> {
    vec![ScratchPattern {
        dir: PathBuf::from("/mnt/pmem"),
        pattern: "${USER}*".to_string(),
    }]
}

fn default_build_program() -> String {
    "make".to_string()
}

fn default_jobs() -> u32 {
    10
}

fn default_debug_arg() -> String {
    "BUILD=debug".to_string()
}

fn default_clean_target() -> String {
    "clean".to_string()
}

fn default_clear_program() -> String {
    "clear".to_string()
}

fn default_debugger_program() -> String {
    "gdb".to_string()
}

fn default_debugger_args() -> Vec<String> {
    ["-ex", "run", "-ex", "bt", "--args"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

impl HarnessConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// @ai:intent Load the explicit file, else the working-directory default, else defaults
    /// @ai:effects fs:read
    pub fn load_or_default(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            tracing::info!("Using config file {}", fallback.display());
            return Self::load(fallback);
        }

        Ok(Self::default())
    }
}

impl BuildConfig {
    /// @ai:intent Arguments for a build in the requested configuration
    /// @ai:example (debug=false) -> ["-j10"]
    /// @ai:example (debug=true) -> ["-j10", "BUILD=debug"]
    /// @ai:effects pure
    pub fn build_args(&self, debug: bool) -> Vec<String> {
        let mut args = vec![format!("-j{}", self.jobs)];
        if debug {
            args.push(self.debug_arg.clone());
        }
        args
    }
}
