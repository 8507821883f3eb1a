//! Block segmentation of generated text
//!
//! Splits a raw blob on the fence delimiter into ordered [`Segment`]s.
//! Every non-blank chunk between fences becomes a segment, including the
//! chunks a model writes *between* its fenced files, so nothing it produced
//! is silently dropped. A blob without any fence yields no segments.
//!
//! The first line of a chunk is taken as its declared tag when it looks like
//! one (a single bare word such as `html` or `css`) and is then stripped from
//! the content. Chunks that open with anything else keep all their lines and
//! carry no tag.

use crate::domain::Segment;

/// Fence delimiter used by generative models around each file
pub const FENCE: &str = "```";

/// Longest first line still treated as a declared tag
const MAX_TAG_LEN: usize = 32;

/// Lazy, restartable iterator over the segments of a blob
///
/// Clone it before consuming, or call [`segments`] again, to walk the same
/// blob a second time. Iteration is pure.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    chunks: Option<std::str::Split<'a, &'static str>>,
    next_ordinal: usize,
}

/// Split `raw` into segments
pub fn segments(raw: &str) -> Segments<'_> {
    let chunks = raw.contains(FENCE).then(|| raw.split(FENCE));
    Segments {
        chunks,
        next_ordinal: 0,
    }
}

impl Iterator for Segments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        let chunks = self.chunks.as_mut()?;
        for chunk in chunks.by_ref() {
            let Some((declared_tag, raw_content)) = split_chunk(chunk) else {
                continue;
            };
            let segment = Segment {
                ordinal: self.next_ordinal,
                declared_tag,
                raw_content,
            };
            self.next_ordinal += 1;
            return Some(segment);
        }
        None
    }
}

/// Split one chunk into its declared tag and content.
///
/// Returns `None` for blank chunks. A chunk holding nothing but a tag gives
/// that tag with empty content.
fn split_chunk(chunk: &str) -> Option<(Option<String>, String)> {
    let trimmed = chunk.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (first_line, rest) = match trimmed.split_once('\n') {
        Some((first, rest)) => (first.trim(), rest),
        None => (trimmed, ""),
    };

    if !is_tag_like(first_line) {
        return Some((None, trimmed.to_string()));
    }

    Some((Some(first_line.to_string()), rest.to_string()))
}

/// A declared tag is a single short word such as `html`, `css`, `c++` or `js`.
fn is_tag_like(line: &str) -> bool {
    !line.is_empty()
        && line.len() <= MAX_TAG_LEN
        && line
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '#' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(raw: &str) -> Vec<Segment> {
        segments(raw).collect()
    }

    #[test]
    fn test_no_fence_yields_nothing() {
        assert!(collect("just some prose, no code here").is_empty());
        assert!(collect("").is_empty());
    }

    #[test]
    fn test_tagged_blocks() {
        let raw = "```html\n<html></html>```css\n.navbar{color:red}```";
        let segments = collect(raw);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].ordinal, 0);
        assert_eq!(segments[0].declared_tag.as_deref(), Some("html"));
        assert_eq!(segments[0].raw_content, "<html></html>");
        assert_eq!(segments[1].ordinal, 1);
        assert_eq!(segments[1].declared_tag.as_deref(), Some("css"));
        assert_eq!(segments[1].raw_content, ".navbar{color:red}");
    }

    #[test]
    fn test_blank_chunks_between_fences_are_discarded() {
        let raw = "```js\nlet a = 1;\n```\n\n   \n```css\nb{}\n```\n";
        let segments = collect(raw);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].ordinal, 1);
    }

    #[test]
    fn test_prose_chunk_keeps_content_without_tag() {
        let raw = "Here is your site:\n```html\n<p>x</p>\n```";
        let segments = collect(raw);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].declared_tag, None);
        assert_eq!(segments[0].raw_content, "Here is your site:");
    }

    #[test]
    fn test_untagged_block_keeps_first_line() {
        let raw = "```\n<!DOCTYPE html>\n<html></html>\n```";
        let segments = collect(raw);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].declared_tag, None);
        assert!(segments[0].raw_content.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_tag_only_block_is_empty_segment() {
        let segments = collect("```css\n```");
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].declared_tag.as_deref(), Some("css"));
        assert_eq!(segments[0].raw_content, "");
    }

    #[test]
    fn test_restartable() {
        let raw = "```css\na{}\n```js\nlet x;\n```";
        let iter = segments(raw);
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        assert_eq!(first, second);
        assert_eq!(segments(raw).count(), 2);
    }
}
