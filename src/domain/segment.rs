//! Segment domain type

/// A raw, tag-labelled chunk cut from the generated blob
///
/// Produced once by the segmenter and never mutated. `ordinal` preserves the
/// order in which the chunk appeared in the blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub ordinal: usize,
    pub declared_tag: Option<String>,
    pub raw_content: String,
}
