//! End-to-end scenarios from `SPEC_FULL.md` §8, exercised against the public API
//! the way the teacher's own benches drive `Database` end-to-end, and the way
//! the original m3ninx `segment_test.go` drives `NewSegment`/`Reader`.

use termdex::core::options::Options;
use termdex::doc::{Document, ID_RESERVED_FIELD_NAME};
use termdex::query::searcher::{ConjunctionSearcher, QuerySearcher, Searcher};
use termdex::query::Query;
use termdex::segment::{Batch, Segment};

fn new_segment() -> Segment {
    let _ = env_logger::builder().is_test(true).try_init();
    Segment::new(Options::default())
}

#[test]
fn scenario_auto_id_insert_is_searchable() {
    let mut segment = new_segment();
    let id = segment.insert(Document::new().add_field("apple", "red")).unwrap();

    let reader = segment.reader().unwrap();
    let pl = reader.match_term(b"apple", b"red").unwrap();
    assert_eq!(pl.len(), 1);
    let mut docs = reader.docs(&pl).unwrap();
    let doc = docs.next().unwrap().unwrap();
    assert!(doc.has_id());

    let by_id = reader.match_term(ID_RESERVED_FIELD_NAME, &id).unwrap();
    assert_eq!(by_id.len(), 1);
    assert!(by_id.equal(&pl));
}

#[test]
fn scenario_duplicate_external_id() {
    let mut segment = new_segment();
    segment.insert(Document::with_id("123").add_field("apple", "red")).unwrap();
    let err = segment
        .insert(Document::with_id("123").add_field("apple", "red").add_field("variety", "fuji"))
        .unwrap_err();
    assert!(matches!(err.kind, termdex::ErrorKind::DuplicateId));

    let reader = segment.reader().unwrap();
    let pl = reader.match_term(ID_RESERVED_FIELD_NAME, b"123").unwrap();
    assert_eq!(pl.len(), 1);
    let mut docs = reader.docs(&pl).unwrap();
    let doc = docs.next().unwrap().unwrap();
    assert_eq!(doc.get(b"apple"), Some(b"red".as_slice()));
    assert_eq!(doc.get(b"variety"), None);
}

#[test]
fn scenario_strict_batch_rejection() {
    let mut segment = new_segment();
    let batch = Batch::new(vec![
        Document::new().add_field(b"color\xff".to_vec(), b"red".to_vec()).add_field("fruit", "apple"),
        Document::new().add_field("fruit", "banana").add_field("color", "yellow"),
    ]);

    let err = segment.insert_batch(batch).unwrap_err();
    assert!(!err.is_batch_partial());

    let reader = segment.reader().unwrap();
    assert!(reader.all_docs().unwrap().next().is_none());
}

#[test]
fn scenario_partial_batch() {
    let mut segment = new_segment();
    let batch = Batch::new(vec![
        Document::new().add_field(b"color\xff".to_vec(), b"red".to_vec()).add_field("fruit", "apple"),
        Document::new().add_field("fruit", "banana").add_field("color", "yellow"),
    ])
    .allow_partial_updates();

    let err = segment.insert_batch(batch).unwrap_err();
    assert!(err.is_batch_partial());
    assert_eq!(err.batch_partial_indices(), Some(&[0usize][..]));

    let reader = segment.reader().unwrap();
    let mut docs = reader.all_docs().unwrap();
    let doc = docs.next().unwrap().unwrap();
    assert_eq!(doc.get(b"fruit"), Some(b"banana".as_slice()));
    assert!(docs.next().is_none());
}

#[test]
fn scenario_regex_match() {
    let mut segment = new_segment();
    segment.insert(Document::new().add_field("fruit", "banana")).unwrap();
    segment.insert(Document::new().add_field("fruit", "apple")).unwrap();
    segment.insert(Document::new().add_field("fruit", "pineapple")).unwrap();

    let reader = segment.reader().unwrap();
    let pl = reader.match_regexp(b"fruit", ".*ple").unwrap();
    assert_eq!(pl.len(), 2);

    let mut fruits: Vec<Vec<u8>> =
        reader.docs(&pl).unwrap().map(|d| d.unwrap().get(b"fruit").unwrap().to_vec()).collect();
    fruits.sort();
    assert_eq!(fruits, vec![b"apple".to_vec(), b"pineapple".to_vec()]);
}

#[test]
fn scenario_boolean_must_should_must_not() {
    // PL(apple=red)={42,50,57}, PL(banana=yellow)={44,50,57},
    // PL(banana=yellow third)={39,50,61} -> Must/Should/MustNot => {57}
    let mut segment = new_segment();
    for i in 0..62u32 {
        let mut doc = Document::new();
        if [42, 50, 57].contains(&i) {
            doc = doc.add_field("apple", "red");
        }
        if [44, 50, 57].contains(&i) {
            doc = doc.add_field("banana", "yellow");
        }
        if [39, 50, 61].contains(&i) {
            doc = doc.add_field("banana_third", "yellow_third");
        }
        segment.insert(doc).unwrap();
    }

    let reader = segment.reader().unwrap();
    let q = Query::boolean(
        vec![Query::exact("apple", "red")],
        vec![Query::exact("banana", "yellow")],
        vec![Query::exact("banana_third", "yellow_third")],
    )
    .unwrap();

    let result = q.execute(&reader).unwrap();
    assert_eq!(result.len(), 1);
    assert!(result.contains(57));
}

#[test]
fn conjunction_searcher_intersects_across_two_readers() {
    let mut s1 = new_segment();
    s1.insert(Document::new().add_field("apple", "red")).unwrap();
    s1.insert(Document::new().add_field("apple", "green")).unwrap();

    let mut s2 = new_segment();
    s2.insert(Document::new().add_field("apple", "red")).unwrap();

    let r1 = s1.reader().unwrap();
    let r2 = s2.reader().unwrap();

    let a: Box<dyn Searcher> =
        Box::new(QuerySearcher::new(Query::exact("apple", "red"), vec![&r1, &r2]));
    let b: Box<dyn Searcher> =
        Box::new(QuerySearcher::new(Query::exact("apple", "red"), vec![&r1, &r2]));

    let mut conjunction = ConjunctionSearcher::new(vec![a, b]).unwrap();

    assert!(conjunction.next().unwrap());
    assert_eq!(conjunction.current().len(), 1);

    assert!(conjunction.next().unwrap());
    assert_eq!(conjunction.current().len(), 1);

    assert!(!conjunction.next().unwrap());
}
