//! Mapping from field-value bytes to postings lists, with a linear regex scan over
//! keys. Grounded on the original m3ninx `postingsMap` (exercised by
//! `index/segment/mem/postings_map_test.go`: `addID`, `get`, `getRegex`, the last
//! of which returns one list per matching key rather than a combined union).

use std::collections::HashMap;

use regex::Regex;

use crate::postings::{PostingsId, PostingsList};

#[derive(Debug, Clone, Default)]
pub struct PostingsMap {
    values: HashMap<Vec<u8>, PostingsList>,
}

impl PostingsMap {
    pub fn new() -> Self {
        PostingsMap { values: HashMap::new() }
    }

    /// Looks up (or creates) the postings list for `value` and inserts `id`.
    pub fn add_id(&mut self, value: &[u8], id: PostingsId) {
        self.values.entry(value.to_vec()).or_default().insert(id);
    }

    /// The postings list for `value`, or an empty (not missing) one.
    pub fn get(&self, value: &[u8]) -> PostingsList {
        self.values.get(value).cloned().unwrap_or_default()
    }

    /// The postings list for every key matching `compiled`, one entry per matching
    /// key in map-iteration order. Keys that are not valid UTF-8 never match (the
    /// regex dialect operates on text). Callers that want a single combined result
    /// union these themselves — see `TermsDictionary::match_regex`.
    pub fn get_regex(&self, compiled: &Regex) -> Vec<PostingsList> {
        let mut result = Vec::new();
        for (value, list) in &self.values {
            let Ok(text) = std::str::from_utf8(value) else { continue };
            if compiled.is_match(text) {
                result.push(list.clone());
            }
        }
        result
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
