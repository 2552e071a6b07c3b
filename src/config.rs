use crate::error::{AuditError, Result};
use crate::types::config::AuditConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_CONFIG_FILE: &str = "testaudit.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".testaudit/local.toml";
pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/testaudit/config.toml";

/// Loads the layered config for `root`. Without any file on disk the
/// built-in defaults are returned.
pub fn load_config(root: &Path) -> Result<AuditConfig> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(root, global.as_deref())
}

pub(crate) fn load_config_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<AuditConfig> {
    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_CONFIG_FILE))?;
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE))?;

    let cfg: AuditConfig = merged
        .try_into()
        .map_err(|e: toml::de::Error| AuditError::ConfigParse(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    tracing::debug!(path = %path.display(), "merging config layer");
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| AuditError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_config_falls_back_to_defaults_when_no_file_exists() {
        let dir = TempDir::new().expect("temp dir should be created");
        let cfg = load_config_with_global(dir.path(), None).expect("load should not fail");
        assert_eq!(cfg.audit.groups.len(), 4);
        assert_eq!(cfg.layout.service_dir, "src/main/java/com/example/SpringApi/Services");
    }

    #[test]
    fn load_config_merges_global_repo_and_local_in_order() {
        let root = TempDir::new().expect("root temp dir should be created");
        let global_root = TempDir::new().expect("global temp dir should be created");
        let global_path = global_root.path().join("config.toml");

        fs::write(
            &global_path,
            r#"
[rules]
stub_prefix = "given"

[audit]
max_verification_commands = 2
"#,
        )
        .expect("global config should write");

        fs::write(
            root.path().join(DEFAULT_CONFIG_FILE),
            r#"
[layout]
service_dir = "svc"
tests_root = "tests"

[audit]
groups = ["Address", "Todo"]
"#,
        )
        .expect("repo config should write");

        fs::create_dir_all(root.path().join(".testaudit")).expect("local dir should create");
        fs::write(
            root.path().join(DEFAULT_LOCAL_FILE),
            r#"
[audit]
groups = ["Todo"]
"#,
        )
        .expect("local override should write");

        let cfg = load_config_with_global(root.path(), Some(&global_path))
            .expect("load should succeed");

        assert_eq!(cfg.audit.groups, vec!["Todo"]);
        assert_eq!(cfg.audit.max_verification_commands, 2);
        assert_eq!(cfg.layout.service_dir, "svc");
        assert_eq!(cfg.layout.tests_root, "tests");
        assert_eq!(cfg.rules.stub_prefix.as_deref(), Some("given"));
    }

    #[test]
    fn load_config_reports_path_on_parse_error() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(root.path().join(DEFAULT_CONFIG_FILE), "[audit\n").expect("write");

        let err = load_config_with_global(root.path(), None).expect_err("parse should fail");
        assert!(err.to_string().contains(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn load_config_runs_validation() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(root.path().join(DEFAULT_CONFIG_FILE), "[audit]\ngroups = []\n")
            .expect("write");

        assert!(load_config_with_global(root.path(), None).is_err());
    }
}
