//! Two-level mapping from field name to (field value to postings list). This is
//! the "Simple" terms dictionary permitted by `SPEC_FULL.md` §4.3 — a single map
//! with a linear regex scan over value keys, grounded on the original m3ninx
//! `termsDictSimple` (`index/segment/mem/terms_dict_simple_test.go`). The crate
//! does not implement the optional trigram-accelerated variant: it would not
//! change observable behavior, and the distilled spec marks it optional.

use std::collections::HashMap;

use regex::Regex;

use crate::doc::Field;
use crate::index::postings_map::PostingsMap;
use crate::postings::{PostingsId, PostingsList};

#[derive(Debug, Clone, Default)]
pub struct TermsDictionary {
    fields: HashMap<Vec<u8>, PostingsMap>,
}

impl TermsDictionary {
    pub fn new() -> Self {
        TermsDictionary { fields: HashMap::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        TermsDictionary { fields: HashMap::with_capacity(capacity) }
    }

    /// Indexes `field` under the given postings id.
    pub fn insert(&mut self, field: &Field, id: PostingsId) {
        self.fields.entry(field.name.clone()).or_default().add_id(&field.value, id);
    }

    /// Exact term match: the postings list for documents where `name == value`.
    pub fn match_exact(&self, name: &[u8], value: &[u8]) -> PostingsList {
        match self.fields.get(name) {
            Some(postings_map) => postings_map.get(value),
            None => PostingsList::new(),
        }
    }

    /// Regex term match: the union of postings lists for every value of `name`
    /// matching `compiled`. `pattern` is accepted alongside `compiled` for API
    /// symmetry with a future trigram-accelerated dictionary, even though this
    /// implementation performs no acceleration on it.
    pub fn match_regex(&self, name: &[u8], _pattern: &[u8], compiled: &Regex) -> PostingsList {
        let Some(postings_map) = self.fields.get(name) else {
            return PostingsList::new();
        };
        let mut result = PostingsList::new();
        for list in postings_map.get_regex(compiled) {
            result.union(&list);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_match_exact() {
        let mut dict = TermsDictionary::new();
        dict.insert(&Field::new("fruit", "apple"), 1);
        dict.insert(&Field::new("fruit", "banana"), 2);

        let pl = dict.match_exact(b"fruit", b"apple");
        assert!(pl.contains(1));
        assert!(!pl.contains(2));
    }

    #[test]
    fn match_exact_on_unknown_field_is_empty() {
        let dict = TermsDictionary::new();
        assert!(dict.match_exact(b"absent", b"value").is_empty());
    }

    #[test]
    fn regex_unions_matching_values() {
        let mut dict = TermsDictionary::new();
        dict.insert(&Field::new("fruit", "banana"), 1);
        dict.insert(&Field::new("fruit", "apple"), 2);
        dict.insert(&Field::new("fruit", "pineapple"), 3);

        let compiled = Regex::new(".*ple").unwrap();
        let pl = dict.match_regex(b"fruit", b".*ple", &compiled);
        assert!(pl.contains(2));
        assert!(pl.contains(3));
        assert!(!pl.contains(1));
    }
}
