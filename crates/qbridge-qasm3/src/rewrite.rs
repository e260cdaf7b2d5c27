//! Span-based text rewriting.

use std::ops::Range;

/// Collects replacements against a source string and applies them in one pass.
///
/// Text outside the replaced spans is copied unchanged.
#[derive(Debug)]
pub(crate) struct Rewriter<'a> {
    source: &'a str,
    edits: Vec<(Range<usize>, String)>,
}

impl<'a> Rewriter<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self {
            source,
            edits: Vec::new(),
        }
    }

    /// Replace `span` with `text`. Spans must not overlap.
    pub(crate) fn replace(&mut self, span: Range<usize>, text: impl Into<String>) {
        self.edits.push((span, text.into()));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub(crate) fn finish(mut self) -> String {
        self.edits.sort_by_key(|(span, _)| span.start);

        let mut output = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for (span, text) in &self.edits {
            debug_assert!(span.start >= cursor, "overlapping rewrite at {span:?}");
            output.push_str(&self.source[cursor..span.start]);
            output.push_str(text);
            cursor = span.end;
        }
        output.push_str(&self.source[cursor..]);
        output
    }
}
