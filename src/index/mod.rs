pub mod postings_map;
pub mod terms_dict;

pub use postings_map::PostingsMap;
pub use terms_dict::TermsDictionary;
