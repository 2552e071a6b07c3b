use super::filesystem::read_lines_if_exists;
use crate::error::Result;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

fn nested_class() -> &'static Regex {
    static NESTED_CLASS: OnceLock<Regex> = OnceLock::new();
    NESTED_CLASS
        .get_or_init(|| Regex::new(r"^\s*public static class (\w+)").expect("nested class pattern"))
}

fn string_constant() -> &'static Regex {
    static STRING_CONSTANT: OnceLock<Regex> = OnceLock::new();
    STRING_CONSTANT.get_or_init(|| {
        Regex::new(r#"public static final String (\w+) = "([^"]*)";"#)
            .expect("string constant pattern")
    })
}

/// Maps message literals to the qualified constants that hold them, in
/// declaration order.
#[derive(Debug, Clone, Default)]
pub struct ErrorConstantIndex {
    by_value: HashMap<String, Vec<String>>,
}

impl ErrorConstantIndex {
    /// Builds the index from a constants file. A missing file yields an
    /// empty index.
    pub fn load(path: &Path) -> Result<Self> {
        let Some(lines) = read_lines_if_exists(path)? else {
            tracing::warn!(path = %path.display(), "error constants file not found");
            return Ok(Self::default());
        };
        let holder = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("ErrorMessages");
        let index = Self::from_lines(holder, &lines);
        tracing::debug!(path = %path.display(), values = index.len(), "indexed error constants");
        Ok(index)
    }

    pub fn from_lines(holder: &str, lines: &[String]) -> Self {
        let mut by_value: HashMap<String, Vec<String>> = HashMap::new();
        let mut nesting: Vec<String> = Vec::new();

        for line in lines {
            if let Some(caps) = nested_class().captures(line) {
                nesting.push(caps[1].to_string());
                continue;
            }
            if line.trim() == "}" {
                nesting.pop();
            }
            if let Some(caps) = string_constant().captures(line) {
                let mut qualified = vec![holder.to_string()];
                qualified.extend(nesting.iter().cloned());
                qualified.push(caps[1].to_string());
                by_value
                    .entry(caps[2].to_string())
                    .or_default()
                    .push(qualified.join("."));
            }
        }

        Self { by_value }
    }

    /// First constant declared with exactly this value.
    pub fn suggest(&self, literal: &str) -> Option<&str> {
        if literal.is_empty() {
            return None;
        }
        self.by_value
            .get(literal)
            .and_then(|names| names.first())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_value.is_empty()
    }
}
