/// Byte range of one `open … close` span, delimiters included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Span {
    pub start: usize,
    pub end: usize,
    inner_start: usize,
    inner_end: usize,
}

impl Span {
    /// Text between the delimiters.
    pub fn inner<'a>(&self, text: &'a str) -> &'a str {
        &text[self.inner_start..self.inner_end]
    }
}

/// Find the first span opening at or after `from`, closed by the nearest `close`.
///
/// Spans are not balanced: a nested `open` inside the body is plain text.
pub(super) fn find_span(text: &str, from: usize, open: &str, close: &str) -> Option<Span> {
    let start = from + text[from..].find(open)?;
    let inner_start = start + open.len();
    let inner_end = inner_start + text[inner_start..].find(close)?;
    Some(Span {
        start,
        end: inner_end + close.len(),
        inner_start,
        inner_end,
    })
}

/// Walk every non-overlapping span left to right.
pub(super) fn spans<'a>(text: &'a str, open: &'a str, close: &'a str) -> impl Iterator<Item = Span> + 'a {
    let mut from = 0;
    std::iter::from_fn(move || {
        let span = find_span(text, from, open, close)?;
        from = span.end;
        Some(span)
    })
}

/// Copy `text` with every `open … close` span cut out.
pub(super) fn strip_spans(text: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    for span in spans(text, open, close) {
        out.push_str(&text[copied..span.start]);
        copied = span.end;
    }
    out.push_str(&text[copied..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_close_wins() {
        let text = "a [[b]] c]] d";
        let span = find_span(text, 0, "[[", "]]").expect("span");
        assert_eq!(span.inner(text), "b");
        assert_eq!(&text[span.start..span.end], "[[b]]");
    }

    #[test]
    fn unclosed_span_is_not_found() {
        assert_eq!(find_span("a [[b", 0, "[[", "]]"), None);
    }

    #[test]
    fn spans_do_not_overlap() {
        let text = "[[a]][[b\nc]]x[[d";
        let inner: Vec<_> = spans(text, "[[", "]]").map(|s| s.inner(text)).collect();
        assert_eq!(inner, vec!["a", "b\nc"]);
    }

    #[test]
    fn strip_keeps_text_between_spans() {
        assert_eq!(strip_spans("uno <<set>> dous <<run x>> tres", "<<", ">>"), "uno  dous  tres");
        assert_eq!(strip_spans("sen nada", "<<", ">>"), "sen nada");
        assert_eq!(strip_spans("aberto << só", "<<", ">>"), "aberto << só");
    }
}
