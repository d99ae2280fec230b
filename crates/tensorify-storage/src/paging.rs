// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Continuation-token paging shared by the object store backends.

use tensorify_core::{ObjectEntry, ObjectPage};

/// Pages `entries` (already in ascending key order). The continuation token
/// is the last key of the previous page; entries up to and including it are
/// skipped.
pub(crate) fn page(
    entries: impl IntoIterator<Item = ObjectEntry>,
    continuation: Option<&str>,
    max_keys: usize,
) -> ObjectPage {
    let max_keys = max_keys.max(1);
    let mut remaining = entries
        .into_iter()
        .skip_while(|e| continuation.is_some_and(|token| e.key.as_str() <= token))
        .peekable();

    let entries: Vec<ObjectEntry> = remaining.by_ref().take(max_keys).collect();
    let next_token = match (remaining.peek(), entries.last()) {
        (Some(_), Some(last)) => Some(last.key.clone()),
        _ => None,
    };
    ObjectPage {
        entries,
        next_token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entries(keys: &[&str]) -> Vec<ObjectEntry> {
        keys.iter()
            .map(|k| ObjectEntry {
                key: k.to_string(),
                size: 0,
                last_modified: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn exact_fit_has_no_next_token() {
        let page = page(entries(&["a", "b"]), None, 2);
        assert_eq!(page.entries.len(), 2);
        assert!(page.next_token.is_none());
    }

    #[test]
    fn token_resumes_after_key() {
        let first = page(entries(&["a", "b", "c"]), None, 1);
        assert_eq!(first.next_token.as_deref(), Some("a"));
        let second = page(entries(&["a", "b", "c"]), first.next_token.as_deref(), 5);
        let keys: Vec<String> = second.entries.into_iter().map(|e| e.key).collect();
        assert_eq!(keys, ["b", "c"]);
    }

    #[test]
    fn zero_max_keys_still_makes_progress() {
        let page = page(entries(&["a", "b"]), None, 0);
        assert_eq!(page.entries.len(), 1);
    }
}
