//! Immutable snapshot view over a segment. Grounded on the original m3ninx
//! `index.Reader` interface (`MatchTerm`, `MatchRegexp`, `Docs`, `AllDocs`, `Close`)
//! and on the teacher's `reader::snapshot_reader::SnapshotReader`.

use regex::Regex;

use crate::core::error::{Error, Result};
use crate::doc::Document;
use crate::index::TermsDictionary;
use crate::postings::{PostingsIter, PostingsList};

/// A read-only snapshot of a segment's document store and terms dictionary,
/// taken at the moment [`crate::segment::Segment::reader`] was called.
pub struct Reader {
    documents: Vec<Document>,
    terms: TermsDictionary,
    closed: bool,
}

impl Reader {
    pub(crate) fn new(documents: Vec<Document>, terms: TermsDictionary) -> Self {
        Reader { documents, terms, closed: false }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::closed_segment());
        }
        Ok(())
    }

    /// The postings list for documents with an exact `(name, value)` field.
    pub fn match_term(&self, name: &[u8], value: &[u8]) -> Result<PostingsList> {
        self.ensure_open()?;
        Ok(self.terms.match_exact(name, value))
    }

    /// Compiles `pattern` and returns the postings list for every document whose
    /// `name` field matches it. Callers evaluating the same pattern repeatedly
    /// (e.g. [`crate::query::Query::regexp`]) should compile once themselves and
    /// call [`Reader::match_regexp_compiled`] instead.
    pub fn match_regexp(&self, name: &[u8], pattern: &str) -> Result<PostingsList> {
        self.ensure_open()?;
        let compiled = Regex::new(pattern)
            .map_err(|e| Error::validation(format!("invalid regex pattern {pattern:?}: {e}")))?;
        Ok(self.terms.match_regex(name, pattern.as_bytes(), &compiled))
    }

    /// Returns the postings list for every document whose `name` field matches an
    /// already-compiled pattern, avoiding recompilation on repeated evaluation.
    pub fn match_regexp_compiled(&self, name: &[u8], pattern: &str, compiled: &Regex) -> Result<PostingsList> {
        self.ensure_open()?;
        Ok(self.terms.match_regex(name, pattern.as_bytes(), compiled))
    }

    /// Iterates the given postings list, yielding the stored document at each ID
    /// in ascending order.
    pub fn docs(&self, postings: &PostingsList) -> Result<DocIterator<'_>> {
        self.ensure_open()?;
        Ok(DocIterator { documents: &self.documents, ids: postings.iter() })
    }

    /// Equivalent to [`Reader::docs`] over the full range of assigned postings IDs.
    pub fn all_docs(&self) -> Result<DocIterator<'_>> {
        self.ensure_open()?;
        let mut all = PostingsList::new();
        for id in 0..self.documents.len() as u32 {
            all.insert(id);
        }
        Ok(DocIterator { documents: &self.documents, ids: all.iter() })
    }

    /// Releases the snapshot. A reader's resources are otherwise reclaimed by
    /// ordinary `Drop`; this exists to surface use-after-close explicitly, as the
    /// distilled spec requires.
    pub fn close(&mut self) {
        self.closed = true;
    }
}

/// Iterates documents at the postings IDs of a snapshot, in ascending order.
/// Collapses the distilled spec's `{Next, Current, Err, Close}` shape into a
/// single `Iterator::next` returning `Option<Result<Document>>`: `Close` is
/// subsumed by `Drop` since the iterator holds no resource beyond borrows into
/// its `Reader`.
pub struct DocIterator<'a> {
    documents: &'a [Document],
    ids: PostingsIter,
}

impl<'a> Iterator for DocIterator<'a> {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Result<Document>> {
        let id = self.ids.next()?;
        match self.documents.get(id as usize) {
            Some(doc) => Some(Ok(doc.clone())),
            None => Some(Err(Error::not_found(format!("postings id {id} has no document slot")))),
        }
    }
}
