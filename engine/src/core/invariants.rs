//! Semantic checks on loaded input not expressible via JSON Schema.

use std::collections::HashMap;

use crate::core::types::{Action, State};

/// Check initial state entries:
/// - No duplicate keys
///
/// Returns one message per violation, in entry order.
pub fn validate_state_entries(entries: &[Action]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (index, entry) in entries.iter().enumerate() {
        if let Some(first) = seen.get(entry.key.as_str()) {
            errors.push(format!(
                "duplicate key '{}' at index {} (first defined at index {})",
                entry.key, index, first
            ));
            continue;
        }
        seen.insert(entry.key.as_str(), index);
    }
    errors
}

/// Build a [`State`] from entries, rejecting duplicate keys.
pub fn state_from_entries(entries: Vec<Action>) -> Result<State, Vec<String>> {
    let errors = validate_state_entries(&entries);
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(entries
        .into_iter()
        .map(|entry| (entry.key, entry.value))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::action;

    #[test]
    fn reports_each_duplicate_with_first_position() {
        let entries = vec![
            action("a", "1"),
            action("b", "2"),
            action("a", "3"),
            action("a", "4"),
        ];
        let errors = validate_state_entries(&entries);
        assert_eq!(
            errors,
            vec![
                "duplicate key 'a' at index 2 (first defined at index 0)".to_string(),
                "duplicate key 'a' at index 3 (first defined at index 0)".to_string(),
            ]
        );
    }

    #[test]
    fn state_from_entries_preserves_order() {
        let state = state_from_entries(vec![action("z", "1"), action("a", "2")]).expect("state");
        let keys: Vec<&str> = state.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn empty_entries_yield_empty_state() {
        let state = state_from_entries(Vec::new()).expect("state");
        assert!(state.is_empty());
    }
}
