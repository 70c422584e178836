// SPDX-License-Identifier: MIT

//! Debug configuration - execution mode and YAML config loading

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::condition::{parse, Predicate};
use super::gate::ALL_AXES_ZERO;
use crate::runtime::error::{DebugError, DebugResult};
use crate::runtime::grid::GridShape;
use crate::runtime::hook::HookKind;

/// Environment variable that switches to interpreted (host) execution
pub const INTERPRET_ENV_VAR: &str = "TRITON_INTERPRET";

/// How kernels are executed for this process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Compiled for and run on the device; buffers must be device resident
    #[default]
    Device,
    /// Interpreted on the host; residency is not checked
    Interpreted,
}

impl ExecutionMode {
    /// Read `TRITON_INTERPRET` once; only `"1"` selects interpreted mode
    pub fn from_env() -> Self {
        Self::from_flag(std::env::var(INTERPRET_ENV_VAR).ok().as_deref())
    }

    fn from_flag(value: Option<&str>) -> Self {
        match value {
            Some("1") => ExecutionMode::Interpreted,
            _ => ExecutionMode::Device,
        }
    }

    pub fn enforces_residency(self) -> bool {
        self == ExecutionMode::Device
    }
}

fn default_condition() -> String {
    ALL_AXES_ZERO.to_string()
}

/// Debug session settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DebugConfig {
    /// Condition gating debug actions
    #[serde(default = "default_condition")]
    pub condition: String,
    /// Launch grid for the host harness
    #[serde(default)]
    pub grid: GridShape,
    /// Falls back to the environment when absent
    #[serde(default)]
    pub execution_mode: Option<ExecutionMode>,
    #[serde(default)]
    pub hook: HookKind,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            condition: default_condition(),
            grid: GridShape::default(),
            execution_mode: None,
            hook: HookKind::default(),
        }
    }
}

impl DebugConfig {
    /// Compile the condition, failing on a malformed one
    pub fn validate(&self) -> DebugResult<Predicate> {
        Ok(parse(&self.condition)?)
    }

    /// Configured mode, or `env_mode` when the file leaves it out
    pub fn execution_mode_or(&self, env_mode: ExecutionMode) -> ExecutionMode {
        self.execution_mode.unwrap_or(env_mode)
    }
}

/// Loads debug configs from YAML files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate a config file
    pub fn load<P: AsRef<Path>>(path: P) -> DebugResult<DebugConfig> {
        let path = path.as_ref();
        log::debug!("Loading debug config from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    /// Load `path` when given, otherwise the defaults
    pub fn load_optional<P: AsRef<Path>>(path: Option<P>) -> DebugResult<DebugConfig> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(DebugConfig::default()),
        }
    }

    /// Parse and validate a config from a YAML string
    pub fn parse_yaml(content: &str) -> DebugResult<DebugConfig> {
        let config: DebugConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::error::ValidationError;

    #[test]
    fn test_execution_mode_flag() {
        assert_eq!(ExecutionMode::from_flag(Some("1")), ExecutionMode::Interpreted);
        assert_eq!(ExecutionMode::from_flag(Some("0")), ExecutionMode::Device);
        assert_eq!(ExecutionMode::from_flag(Some("true")), ExecutionMode::Device);
        assert_eq!(ExecutionMode::from_flag(None), ExecutionMode::Device);
        assert!(ExecutionMode::default().enforces_residency());
        assert!(!ExecutionMode::Interpreted.enforces_residency());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
condition: ">1,=0"
grid: [4, 2]
execution_mode: interpreted
hook: log
"#;
        let config = ConfigLoader::parse_yaml(yaml).unwrap();
        assert_eq!(config.condition, ">1,=0");
        assert_eq!(config.grid, GridShape::new(4, 2, 1).unwrap());
        assert_eq!(config.execution_mode, Some(ExecutionMode::Interpreted));
        assert_eq!(config.hook, HookKind::Log);
        assert_eq!(
            config.execution_mode_or(ExecutionMode::Device),
            ExecutionMode::Interpreted
        );
    }

    #[test]
    fn test_defaults() {
        let config = ConfigLoader::parse_yaml("{}").unwrap();
        assert_eq!(config.condition, ALL_AXES_ZERO);
        assert_eq!(config.grid, GridShape::single());
        assert_eq!(config.execution_mode, None);
        assert_eq!(config.hook, HookKind::Stdout);
        assert_eq!(
            config.execution_mode_or(ExecutionMode::Interpreted),
            ExecutionMode::Interpreted
        );
        assert_eq!(config.validate().unwrap(), Predicate::first_invocation());
    }

    #[test]
    fn test_rejects_bad_condition() {
        let err = ConfigLoader::parse_yaml("condition: \"~1\"").unwrap_err();
        assert!(matches!(
            err,
            DebugError::Validation(ValidationError::UnknownOperator { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_grid() {
        let err = ConfigLoader::parse_yaml("grid: [0, 1]").unwrap_err();
        assert!(matches!(err, DebugError::Yaml(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ConfigLoader::load("/nonexistent/debug.yaml").unwrap_err();
        match err {
            DebugError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("Expected io error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_optional_defaults_without_path() {
        let config = ConfigLoader::load_optional(None::<&str>).unwrap();
        assert_eq!(config.execution_mode, None);
        assert_eq!(
            config.execution_mode_or(ExecutionMode::Device),
            ExecutionMode::Device
        );
    }

    #[test]
    fn test_load_optional_file_overrides_env_mode() {
        let path = std::env::temp_dir().join(format!("kernel-debug-{}.yaml", std::process::id()));
        std::fs::write(&path, "execution_mode: interpreted\n").unwrap();

        let config = ConfigLoader::load_optional(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(
            config.execution_mode_or(ExecutionMode::Device),
            ExecutionMode::Interpreted
        );
    }
}
