use crate::scan::tag::{MalformedReason, MalformedTag};
use memchr::{memchr, memchr2};
use std::mem;
use std::ops::ControlFlow;

/// What the [`TagScanner`] hands to its caller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScanEvent<'a> {
    /// A run of text between two tags, with source line breaks and indentation already removed. Never empty, and
    /// never whitespace-only.
    Text(&'a [u8]),
    /// A complete tag token, from its `<` to the `>` that balances it.
    Tag(&'a [u8]),
}

/// Tokens whose content may hold unbalanced brackets: they only end at their own terminator.
const LITERAL_TOKENS: [(&[u8], &[u8]); 2] = [(b"<!--", b"-->"), (b"<![CDATA[", b"]]>")];

/// A tag being accumulated. `depth` counts the `<` seen inside it that have not been balanced yet, including the
/// opening one.
#[derive(Debug, Default)]
struct TagToken {
    bytes: Vec<u8>,
    depth: usize,
}

impl TagToken {
    /// Called with the token's latest byte being a `>`.
    fn closes_at_bracket(&mut self) -> bool {
        for (start, end) in LITERAL_TOKENS {
            if self.bytes.starts_with(start) {
                return self.bytes.len() >= start.len() + end.len() && self.bytes.ends_with(end);
            }
        }
        self.depth -= 1;
        self.depth == 0
    }
}

#[derive(Debug, Default)]
enum ScanState {
    #[default]
    Idle,
    InTag(TagToken),
}

/// Splits a byte stream, fed in arbitrary chunks, into text runs and complete tag tokens.
///
/// Memory is bounded by the largest single tag or text run: nothing else is buffered across chunks.
#[derive(Debug, Default)]
pub struct TagScanner {
    state: ScanState,
    text: Vec<u8>,
    skip_whitespace: bool,
}

impl TagScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the next chunk of input, calling `handler` for each completed event.
    ///
    /// If the handler breaks, scanning stops immediately and the rest of the chunk is discarded; the break value is
    /// returned. Handler errors are propagated the same way.
    pub fn feed<F, E>(&mut self, chunk: &[u8], mut handler: F) -> Result<ControlFlow<()>, E>
    where
        F: FnMut(ScanEvent) -> Result<ControlFlow<()>, E>,
    {
        let mut pos = 0;
        while pos < chunk.len() {
            match &mut self.state {
                ScanState::Idle => {
                    let rest = &chunk[pos..];
                    let Some(offset) = memchr(b'<', rest) else {
                        self.push_text(rest);
                        break;
                    };
                    self.push_text(&rest[..offset]);
                    pos += offset + 1;
                    if let ControlFlow::Break(()) = self.flush_text(&mut handler)? {
                        return Ok(ControlFlow::Break(()));
                    }
                    self.state = ScanState::InTag(TagToken {
                        bytes: vec![b'<'],
                        depth: 1,
                    });
                }
                ScanState::InTag(token) => {
                    let rest = &chunk[pos..];
                    let Some(offset) = memchr2(b'<', b'>', rest) else {
                        token.bytes.extend_from_slice(rest);
                        break;
                    };
                    token.bytes.extend_from_slice(&rest[..=offset]);
                    pos += offset + 1;
                    if rest[offset] == b'<' {
                        token.depth += 1;
                        continue;
                    }
                    if !token.closes_at_bracket() {
                        continue;
                    }
                    let ScanState::InTag(token) = mem::take(&mut self.state) else {
                        unreachable!("state was InTag a moment ago")
                    };
                    self.skip_whitespace = true;
                    if let ControlFlow::Break(()) = handler(ScanEvent::Tag(&token.bytes))? {
                        return Ok(ControlFlow::Break(()));
                    }
                }
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Signals end of input. Any pending text is flushed; an unterminated tag is reported as malformed.
    pub fn finish<F, E>(&mut self, mut handler: F) -> Result<ControlFlow<()>, E>
    where
        F: FnMut(ScanEvent) -> Result<ControlFlow<()>, E>,
        E: From<MalformedTag>,
    {
        if let ScanState::InTag(token) = mem::take(&mut self.state) {
            return Err(MalformedTag {
                reason: MalformedReason::Unterminated,
                tag: String::from_utf8_lossy(&token.bytes).into_owned(),
            }
            .into());
        }
        self.flush_text(&mut handler)
    }

    /// Applies the whitespace policy: a line break turns on skip mode, which swallows the spaces and tabs of the
    /// following indentation; any other byte turns it off.
    fn push_text(&mut self, bytes: &[u8]) {
        for &b in bytes {
            match b {
                b'\n' | b'\r' => self.skip_whitespace = true,
                b' ' | b'\t' if self.skip_whitespace => {}
                _ => {
                    self.skip_whitespace = false;
                    self.text.push(b);
                }
            }
        }
    }

    fn flush_text<F, E>(&mut self, handler: &mut F) -> Result<ControlFlow<()>, E>
    where
        F: FnMut(ScanEvent) -> Result<ControlFlow<()>, E>,
    {
        if self.text.is_empty() {
            return Ok(ControlFlow::Continue(()));
        }
        let text = mem::take(&mut self.text);
        let trimmed = text.trim_ascii();
        if trimmed.is_empty() {
            return Ok(ControlFlow::Continue(()));
        }
        handler(ScanEvent::Text(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::utils_for_test::*;
    use indoc::indoc;

    #[derive(Debug, PartialEq, Eq)]
    enum Owned {
        Text(String),
        Tag(String),
    }

    fn scan_chunks(chunks: &[&str]) -> Result<Vec<Owned>, MalformedTag> {
        let mut scanner = TagScanner::new();
        let mut events = Vec::new();
        let mut collect = |event: ScanEvent| -> Result<ControlFlow<()>, MalformedTag> {
            events.push(match event {
                ScanEvent::Text(t) => Owned::Text(String::from_utf8_lossy(t).into_owned()),
                ScanEvent::Tag(t) => Owned::Tag(String::from_utf8_lossy(t).into_owned()),
            });
            Ok(ControlFlow::Continue(()))
        };
        for chunk in chunks {
            scanner.feed(chunk.as_bytes(), &mut collect)?;
        }
        scanner.finish(&mut collect)?;
        Ok(events)
    }

    fn tag(s: &str) -> Owned {
        Owned::Tag(s.to_string())
    }

    fn text(s: &str) -> Owned {
        Owned::Text(s.to_string())
    }

    #[test]
    fn simple_document() {
        unwrap!(scan_chunks(&["<a><b>1</b><b>2</b></a>"]), Ok(events));
        assert_eq!(
            events,
            vec![
                tag("<a>"),
                tag("<b>"),
                text("1"),
                tag("</b>"),
                tag("<b>"),
                text("2"),
                tag("</b>"),
                tag("</a>"),
            ]
        );
    }

    #[test]
    fn tags_split_across_chunks() {
        unwrap!(scan_chunks(&["<a x", "='1'><", "/a", ">"]), Ok(events));
        assert_eq!(events, vec![tag("<a x='1'>"), tag("</a>")]);
    }

    #[test]
    fn nested_brackets_stay_in_one_token() {
        unwrap!(scan_chunks(&["<!-- <b> and > --><a/>"]), Ok(events));
        assert_eq!(events, vec![tag("<!-- <b> and > -->"), tag("<a/>")]);
    }

    #[test]
    fn comment_ends_only_at_its_terminator() {
        unwrap!(scan_chunks(&["<!-- a > b -", "->", "<a/>"]), Ok(events));
        assert_eq!(events, vec![tag("<!-- a > b -->"), tag("<a/>")]);
    }

    #[test]
    fn empty_comment_is_not_closed_early() {
        unwrap!(scan_chunks(&["<!---->x<!-->-->"]), Ok(events));
        assert_eq!(events, vec![tag("<!---->"), text("x"), tag("<!-->-->")]);
    }

    #[test]
    fn cdata_with_brackets() {
        unwrap!(scan_chunks(&["<a><![CDATA[<x>]]></a>"]), Ok(events));
        assert_eq!(events, vec![tag("<a>"), tag("<![CDATA[<x>]]>"), tag("</a>")]);
    }

    #[test]
    fn cdata_with_unbalanced_bracket() {
        unwrap!(scan_chunks(&["<a><![CDATA[x > y]]></a>"]), Ok(events));
        assert_eq!(events, vec![tag("<a>"), tag("<![CDATA[x > y]]>"), tag("</a>")]);
    }

    #[test]
    fn doctype_brackets_are_balanced() {
        unwrap!(scan_chunks(&["<!DOCTYPE a [<!ENTITY e 'x'>]><a/>"]), Ok(events));
        assert_eq!(events, vec![tag("<!DOCTYPE a [<!ENTITY e 'x'>]>"), tag("<a/>")]);
    }

    #[test]
    fn source_indentation_is_dropped() {
        let xml = indoc! {r#"
            <a>
              <b>
                hello world
              </b>
            </a>"#};
        unwrap!(scan_chunks(&[xml]), Ok(events));
        assert_eq!(
            events,
            vec![tag("<a>"), tag("<b>"), text("hello world"), tag("</b>"), tag("</a>")]
        );
    }

    #[test]
    fn inner_spaces_are_kept() {
        unwrap!(scan_chunks(&["<a>one  two\tthree</a>"]), Ok(events));
        assert_eq!(events, vec![tag("<a>"), text("one  two\tthree"), tag("</a>")]);
    }

    #[test]
    fn line_breaks_inside_text_are_joined() {
        unwrap!(scan_chunks(&["<a>one\n    two</a>"]), Ok(events));
        assert_eq!(events, vec![tag("<a>"), text("onetwo"), tag("</a>")]);
    }

    #[test]
    fn trailing_text_is_flushed() {
        unwrap!(scan_chunks(&["<a/>tail"]), Ok(events));
        assert_eq!(events, vec![tag("<a/>"), text("tail")]);
    }

    #[test]
    fn unterminated_tag_is_malformed() {
        unwrap!(scan_chunks(&["<a><b"]), Err(err));
        assert_eq!(err.tag, "<b");
        assert_eq!(err.reason, MalformedReason::Unterminated);
    }

    #[test]
    fn cut_off_comment_ending_in_bracket_is_malformed() {
        unwrap!(scan_chunks(&["<a></a><!-- <b>"]), Err(err));
        assert_eq!(err.tag, "<!-- <b>");
        assert_eq!(err.reason, MalformedReason::Unterminated);
    }

    #[test]
    fn handler_break_stops_scanning() {
        let mut scanner = TagScanner::new();
        let mut seen = Vec::new();
        let flow = scanner.feed(b"<a><b/><c/></a>", |event| -> Result<_, MalformedTag> {
            if let ScanEvent::Tag(t) = event {
                seen.push(String::from_utf8_lossy(t).into_owned());
            }
            Ok(if seen.len() == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            })
        });
        unwrap!(flow, Ok(ControlFlow::Break(())));
        assert_eq!(seen, vec!["<a>", "<b/>"]);
    }
}
