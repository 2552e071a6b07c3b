use super::GroupContext;
use crate::types::facts::{Section, TestFileFacts};
use crate::types::rules::RuleSet;
use crate::types::violation::{MethodRef, Violation};
use std::collections::BTreeMap;

/// Rule 10: Success, Failure and Permission sections exist in that order,
/// and tests inside each section are alphabetical (case-insensitive).
pub fn check(facts: &TestFileFacts, _ctx: &GroupContext, _rules: &RuleSet) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut first_seen: BTreeMap<Section, usize> = BTreeMap::new();
    for header in &facts.sections {
        first_seen.entry(header.section).or_insert(header.line);
    }

    let missing: Vec<Section> = Section::REQUIRED_ORDER
        .iter()
        .copied()
        .filter(|section| !first_seen.contains_key(section))
        .collect();
    if !missing.is_empty() {
        violations.push(Violation::MissingSections { missing });
        return violations;
    }

    let mut order: Vec<(usize, Section)> = first_seen
        .iter()
        .map(|(section, line)| (*line, *section))
        .collect();
    order.sort();
    let order: Vec<Section> = order.into_iter().map(|(_, section)| section).collect();
    if order != Section::REQUIRED_ORDER {
        violations.push(Violation::SectionOrder { order });
    }

    if facts.tests.is_empty() {
        return violations;
    }
    let mut headers = facts.sections.clone();
    headers.sort_by_key(|header| header.line);
    for section in Section::REQUIRED_ORDER {
        let names: Vec<MethodRef> = facts
            .tests
            .iter()
            .filter(|test| {
                headers
                    .iter()
                    .take_while(|header| header.line < test.annotation_line)
                    .last()
                    .is_some_and(|header| header.section == section)
            })
            .map(|test| MethodRef {
                name: test.name.clone(),
                line: test.line,
            })
            .collect();
        if names.len() > 1 && !is_alphabetical(&names) {
            violations.push(Violation::NotAlphabetical { section, names });
        }
    }
    violations
}

fn is_alphabetical(names: &[MethodRef]) -> bool {
    names
        .windows(2)
        .all(|pair| pair[0].name.to_lowercase() <= pair[1].name.to_lowercase())
}

/// Case-insensitive sorted copy of the names, for the remediation text.
pub fn sorted_names(names: &[MethodRef]) -> Vec<String> {
    let mut sorted: Vec<String> = names.iter().map(|name| name.name.clone()).collect();
    sorted.sort_by_key(|name| name.to_lowercase());
    sorted
}
