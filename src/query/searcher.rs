//! Stateful iteration over multiple segment readers, producing one postings list
//! per reader. Grounded on the original m3ninx `search.Searcher` interface and
//! `search/searcher/conjunction_test.go`'s `NewConjunctionSearcher`.

use crate::core::error::{Error, Result};
use crate::postings::PostingsList;
use crate::query::Query;
use crate::segment::Reader;

/// A lazy iterator over multiple readers, yielding one postings list per `next`.
pub trait Searcher {
    /// Advances to the next reader's result. Returns `false` once every reader
    /// has been consumed.
    fn next(&mut self) -> Result<bool>;

    /// The postings list produced by the most recent successful `next`. Only
    /// valid after a `next` that returned `true`.
    fn current(&self) -> &PostingsList;

    /// The number of underlying readers, fixed at construction.
    fn len(&self) -> usize;

    /// Releases any resources held by this searcher and its children.
    fn close(&mut self) -> Result<()>;
}

/// The base [`Searcher`]: evaluates one [`Query`] against each of N readers in
/// turn.
pub struct QuerySearcher<'a> {
    query: Query,
    readers: Vec<&'a Reader>,
    position: usize,
    current: Option<PostingsList>,
}

impl<'a> QuerySearcher<'a> {
    pub fn new(query: Query, readers: Vec<&'a Reader>) -> Self {
        QuerySearcher { query, readers, position: 0, current: None }
    }
}

impl<'a> Searcher for QuerySearcher<'a> {
    fn next(&mut self) -> Result<bool> {
        if self.position >= self.readers.len() {
            self.current = None;
            return Ok(false);
        }
        let result = self.query.execute(self.readers[self.position])?;
        self.current = Some(result);
        self.position += 1;
        Ok(true)
    }

    fn current(&self) -> &PostingsList {
        self.current.as_ref().expect("current() called before a successful next()")
    }

    fn len(&self) -> usize {
        self.readers.len()
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A [`Searcher`] that intersects the results of N child searchers of equal
/// length, terminating as soon as any child terminates.
pub struct ConjunctionSearcher {
    children: Vec<Box<dyn Searcher>>,
    current: Option<PostingsList>,
}

impl ConjunctionSearcher {
    /// Constructs a conjunction over `children`. Fails, closing every child, if
    /// they do not all report the same [`Searcher::len`].
    pub fn new(mut children: Vec<Box<dyn Searcher>>) -> Result<Self> {
        let expected_len = children.first().map(|c| c.len());
        if let Some(expected) = expected_len {
            if children.iter().any(|c| c.len() != expected) {
                for child in &mut children {
                    let _ = child.close();
                }
                return Err(Error::validation("conjunction searcher children have mismatched lengths"));
            }
        }
        Ok(ConjunctionSearcher { children, current: None })
    }
}

impl Searcher for ConjunctionSearcher {
    fn next(&mut self) -> Result<bool> {
        if self.children.is_empty() {
            self.current = None;
            return Ok(false);
        }

        for child in &mut self.children {
            if !child.next()? {
                self.current = None;
                return Ok(false);
            }
        }

        let mut result = self.children[0].current().clone();
        for child in &self.children[1..] {
            result.intersect(child.current());
        }
        self.current = Some(result);
        Ok(true)
    }

    fn current(&self) -> &PostingsList {
        self.current.as_ref().expect("current() called before a successful next()")
    }

    fn len(&self) -> usize {
        self.children.first().map(|c| c.len()).unwrap_or(0)
    }

    fn close(&mut self) -> Result<()> {
        for child in &mut self.children {
            child.close()?;
        }
        Ok(())
    }
}
