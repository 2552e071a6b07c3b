use crate::error::AuditError;
use serde::Deserialize;
use std::collections::HashSet;

pub const DEFAULT_GROUPS: [&str; 4] = ["Address", "Login", "UserLog", "Todo"];
pub const DEFAULT_MAX_VERIFICATION_COMMANDS: usize = 6;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub audit: GroupsConfig,
    #[serde(default)]
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_service_dir")]
    pub service_dir: String,
    #[serde(default = "default_tests_root")]
    pub tests_root: String,
    #[serde(default = "default_error_messages")]
    pub error_messages: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            service_dir: default_service_dir(),
            tests_root: default_tests_root(),
            error_messages: default_error_messages(),
        }
    }
}

fn default_service_dir() -> String {
    "src/main/java/com/example/SpringApi/Services".to_string()
}

fn default_tests_root() -> String {
    "src/test/java/com/example/SpringApi/Services/Tests".to_string()
}

fn default_error_messages() -> String {
    "src/main/java/com/example/SpringApi/ErrorMessages.java".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupsConfig {
    #[serde(default = "default_groups")]
    pub groups: Vec<String>,
    #[serde(default = "default_max_verification_commands")]
    pub max_verification_commands: usize,
}

impl Default for GroupsConfig {
    fn default() -> Self {
        Self {
            groups: default_groups(),
            max_verification_commands: default_max_verification_commands(),
        }
    }
}

fn default_groups() -> Vec<String> {
    DEFAULT_GROUPS.iter().map(|group| group.to_string()).collect()
}

fn default_max_verification_commands() -> usize {
    DEFAULT_MAX_VERIFICATION_COMMANDS
}

/// Overrides for the rule tables; unset fields keep the built-in values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesConfig {
    pub allowed_annotations: Option<Vec<String>>,
    pub stub_prefix: Option<String>,
    pub error_holder: Option<String>,
}

impl AuditConfig {
    pub fn validate(&self) -> Result<(), AuditError> {
        if self.audit.groups.is_empty() {
            return Err(AuditError::ConfigParse(
                "audit.groups must name at least one group".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for group in &self.audit.groups {
            let trimmed = group.trim();
            if trimmed.is_empty() {
                return Err(AuditError::ConfigParse(
                    "audit.groups cannot contain empty names".to_string(),
                ));
            }
            if !trimmed.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(AuditError::ConfigParse(format!(
                    "audit.groups entry is not a valid class-name prefix: {trimmed}"
                )));
            }
            if !seen.insert(trimmed.to_ascii_uppercase()) {
                return Err(AuditError::ConfigParse(format!(
                    "audit.groups contains a duplicate group (report names collide): {trimmed}"
                )));
            }
        }

        if let Some(prefix) = &self.rules.stub_prefix {
            if prefix.trim().is_empty() {
                return Err(AuditError::ConfigParse(
                    "rules.stub_prefix cannot be empty".to_string(),
                ));
            }
        }
        if let Some(holder) = &self.rules.error_holder {
            if holder.trim().is_empty() {
                return Err(AuditError::ConfigParse(
                    "rules.error_holder cannot be empty".to_string(),
                ));
            }
        }
        if let Some(annotations) = &self.rules.allowed_annotations {
            if annotations.iter().any(|name| name.trim().is_empty()) {
                return Err(AuditError::ConfigParse(
                    "rules.allowed_annotations cannot contain empty names".to_string(),
                ));
            }
        }

        Ok(())
    }
}
