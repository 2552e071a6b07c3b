use crate::types::facts::{upper_first, PublicMethod};
use crate::types::violation::Violation;
use std::collections::{HashMap, HashSet};

pub fn expected_test_file(method: &str) -> String {
    format!("{}Test.java", upper_first(method))
}

/// Rule 1: one test file per public method, and no test file without a
/// method. Overloads share a file, listed where the name first appears and
/// citing the last declaration's line.
pub fn check_inventory(methods: &[PublicMethod], test_files: &[String]) -> Vec<Violation> {
    let mut expected: Vec<(String, &PublicMethod)> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    for method in methods {
        let file = expected_test_file(&method.name);
        match seen.get(&file) {
            Some(&slot) => expected[slot].1 = method,
            None => {
                seen.insert(file.clone(), expected.len());
                expected.push((file, method));
            }
        }
    }

    let actual: HashSet<&str> = test_files.iter().map(String::as_str).collect();
    let mut violations: Vec<Violation> = expected
        .iter()
        .filter(|(file, _)| !actual.contains(file.as_str()))
        .map(|(file, method)| Violation::MissingTestFile {
            method: (*method).clone(),
            expected_file: file.clone(),
        })
        .collect();

    violations.extend(
        test_files
            .iter()
            .filter(|file| !seen.contains_key(file.as_str()))
            .map(|file| Violation::ExtraTestFile { file: file.clone() }),
    );
    violations
}
