use super::braces::brace_delta;
use super::filesystem::read_lines_if_exists;
use crate::error::Result;
use crate::types::facts::PublicMethod;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

const TYPE_KEYWORDS: [&str; 3] = ["class", "interface", "enum"];

fn public_signature() -> &'static Regex {
    static PUBLIC_SIGNATURE: OnceLock<Regex> = OnceLock::new();
    PUBLIC_SIGNATURE.get_or_init(|| {
        Regex::new(r"^\s*public\s+(?:static\s+)?([\w<>\[\],.?\s]+?)\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(")
            .expect("public signature pattern")
    })
}

/// Public methods declared directly in the service class body, in
/// declaration order. A missing service file yields no methods.
pub fn parse_public_methods(service_path: &Path) -> Result<Vec<PublicMethod>> {
    let Some(lines) = read_lines_if_exists(service_path)? else {
        tracing::warn!(path = %service_path.display(), "service file not found");
        return Ok(Vec::new());
    };
    let class_name = service_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    Ok(public_methods_in(&lines, class_name))
}

pub(crate) fn public_methods_in(lines: &[String], class_name: &str) -> Vec<PublicMethod> {
    let mut methods = Vec::new();
    let mut depth: i64 = 0;
    for (index, line) in lines.iter().enumerate() {
        if depth == 1 {
            if let Some(caps) = public_signature().captures(line) {
                let return_type = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                let name = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
                let declares_type = return_type
                    .split_whitespace()
                    .next()
                    .is_some_and(|word| TYPE_KEYWORDS.contains(&word));
                if !declares_type && name != class_name {
                    methods.push(PublicMethod {
                        name: name.to_string(),
                        line: index + 1,
                    });
                }
            }
        }
        depth += brace_delta(line);
    }
    methods
}
