//! Composable query descriptions, evaluated against a single [`Reader`] into a
//! [`PostingsList`]. Grounded on the original m3ninx `search/query` package
//! (`boolean_test.go`'s `NewExactQuery`/`NewBooleanQuery`/`Execute`) and on the
//! teacher's `query::ast::{Query, BoolQuery}`, stripped of scoring/phrase/range/
//! fuzzy variants per this crate's non-goals.

pub mod searcher;

use regex::Regex;

use crate::core::error::{Error, Result};
use crate::postings::PostingsList;
use crate::segment::Reader;

/// A boolean query's must/should/must-not clauses.
#[derive(Debug, Clone)]
pub struct BooleanQuery {
    must: Vec<Query>,
    should: Vec<Query>,
    must_not: Vec<Query>,
}

/// A composable query description.
#[derive(Debug, Clone)]
pub enum Query {
    Exact { name: Vec<u8>, value: Vec<u8> },
    Regexp { name: Vec<u8>, pattern: String, compiled: CompiledRegex },
    Boolean(Box<BooleanQuery>),
}

/// A wrapper making a compiled [`Regex`] comparable/clonable/debuggable the way
/// the rest of this module's types are, without requiring `Regex` itself to
/// implement those traits beyond `Clone` (which it already does).
#[derive(Debug, Clone)]
pub struct CompiledRegex(Regex);

impl Query {
    /// Evaluates to `reader.match_term(name, value)`.
    pub fn exact(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Query {
        Query::Exact { name: name.into(), value: value.into() }
    }

    /// Compiles `pattern` once; evaluates to `reader.match_regexp(name, pattern)`.
    pub fn regexp(name: impl Into<Vec<u8>>, pattern: impl Into<String>) -> Result<Query> {
        let pattern = pattern.into();
        let compiled = Regex::new(&pattern)
            .map_err(|e| Error::validation(format!("invalid regex pattern {pattern:?}: {e}")))?;
        Ok(Query::Regexp { name: name.into(), pattern, compiled: CompiledRegex(compiled) })
    }

    /// A boolean composition of must/should/must-not child queries. Rejected at
    /// construction if all three lists are empty.
    pub fn boolean(must: Vec<Query>, should: Vec<Query>, must_not: Vec<Query>) -> Result<Query> {
        if must.is_empty() && should.is_empty() && must_not.is_empty() {
            return Err(Error::validation("boolean query must have at least one clause"));
        }
        Ok(Query::Boolean(Box::new(BooleanQuery { must, should, must_not })))
    }

    /// Evaluates this query against a single reader, producing a postings list.
    pub fn execute(&self, reader: &Reader) -> Result<PostingsList> {
        match self {
            Query::Exact { name, value } => reader.match_term(name, value),
            Query::Regexp { name, pattern, compiled } => {
                reader.match_regexp_compiled(name, pattern, &compiled.0)
            }
            Query::Boolean(bool_query) => bool_query.execute(reader),
        }
    }
}

impl BooleanQuery {
    fn execute(&self, reader: &Reader) -> Result<PostingsList> {
        let mut accumulator = if !self.must.is_empty() {
            let mut acc = self.must[0].execute(reader)?;
            for clause in &self.must[1..] {
                acc.intersect(&clause.execute(reader)?);
            }
            Some(acc)
        } else {
            None
        };

        if !self.should.is_empty() {
            let mut should_union = PostingsList::new();
            for clause in &self.should {
                should_union.union(&clause.execute(reader)?);
            }
            accumulator = Some(match accumulator {
                Some(mut acc) => {
                    acc.intersect(&should_union);
                    acc
                }
                None => should_union,
            });
        }

        let mut accumulator = accumulator.unwrap_or_default();

        for clause in &self.must_not {
            accumulator.difference(&clause.execute(reader)?);
        }

        Ok(accumulator)
    }
}
