/// Tuning knobs for a [`crate::segment::Segment`], analogous to the teacher's
/// `core::config::Config` and to `NewOptions()` in the original m3ninx source.
///
/// Nothing here changes observable behavior; it only sizes initial allocations so a
/// segment with a known approximate shape doesn't pay for repeated `HashMap` growth.
#[derive(Debug, Clone)]
pub struct Options {
    /// Initial capacity hint for the document store.
    pub initial_doc_capacity: usize,
    /// Initial capacity hint for the terms dictionary's field-name map.
    pub initial_field_capacity: usize,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            initial_doc_capacity: 1024,
            initial_field_capacity: 16,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_doc_capacity(mut self, capacity: usize) -> Self {
        self.initial_doc_capacity = capacity;
        self
    }

    pub fn with_initial_field_capacity(mut self, capacity: usize) -> Self {
        self.initial_field_capacity = capacity;
        self
    }
}
