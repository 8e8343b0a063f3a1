//! Attribute scanning over a completed tag's bytes.
//!
//! Values are taken verbatim: entities are not decoded, and a quote preceded by an unescaped backslash does not close
//! the value.

use memchr::memchr2;

/// One `name="value"` pair, as written in the source tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    /// The quote character (`'` or `"`) that delimited the value.
    pub quote: u8,
}

/// Scans the bytes that follow a tag's name (see [`crate::scan::Tag::attribute_bytes`]).
///
/// Each name appears at most once in the result; if a malformed tag repeats a name, the first occurrence wins.
/// Attributes without a quoted value are skipped.
pub fn scan_attributes(input: &[u8]) -> Vec<Attribute> {
    let mut attrs: Vec<Attribute> = Vec::new();
    AttributeScanner::new(input).for_each(|attr| {
        if !attrs.iter().any(|seen| seen.name == attr.name) {
            attrs.push(attr);
        }
    });
    attrs
}

/// Like [`scan_attributes`], but keeps only the names.
pub fn scan_attribute_names(input: &[u8]) -> Vec<String> {
    scan_attributes(input).into_iter().map(|attr| attr.name).collect()
}

/// Looks up a single attribute's value. Returns `None` if the attribute isn't there.
pub fn find_attribute(input: &[u8], name: &str) -> Option<String> {
    AttributeScanner::new(input)
        .find(|attr| attr.name == name)
        .map(|attr| attr.value)
}

struct AttributeScanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> AttributeScanner<'a> {
    fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() && is_whitespace(self.input[self.pos]) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Finds the closing `quote`, starting at the current position. Returns the value's end index, or `None` if the
    /// value never closes.
    fn find_closing_quote(&self, quote: u8) -> Option<usize> {
        let mut pos = self.pos;
        loop {
            let rest = self.input.get(pos..)?;
            let found = pos + memchr2(quote, b'\\', rest)?;
            if self.input[found] == quote {
                return Some(found);
            }
            // backslash: whatever follows is literal
            pos = found + 2;
        }
    }
}

impl Iterator for AttributeScanner<'_> {
    type Item = Attribute;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.skip_whitespace();
            let first = self.peek()?;
            if first == b'=' {
                // stray '=' with no name in front of it
                self.pos += 1;
                continue;
            }

            let name_start = self.pos;
            while self.pos < self.input.len() && !is_whitespace(self.input[self.pos]) && self.input[self.pos] != b'='
            {
                self.pos += 1;
            }
            let name = &self.input[name_start..self.pos];

            self.skip_whitespace();
            if self.peek() != Some(b'=') {
                continue;
            }
            self.pos += 1;
            self.skip_whitespace();

            let quote = self.peek()?;
            if quote != b'"' && quote != b'\'' {
                continue;
            }
            self.pos += 1;
            let value_start = self.pos;
            let Some(value_end) = self.find_closing_quote(quote) else {
                self.pos = self.input.len();
                return None;
            };
            self.pos = value_end + 1;

            return Some(Attribute {
                name: String::from_utf8_lossy(name).into_owned(),
                value: String::from_utf8_lossy(&self.input[value_start..value_end]).into_owned(),
                quote,
            });
        }
    }
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(name: &str, value: &str, quote: u8) -> Attribute {
        Attribute {
            name: name.to_string(),
            value: value.to_string(),
            quote,
        }
    }

    #[test]
    fn empty() {
        assert!(scan_attributes(b"").is_empty());
        assert!(scan_attributes(b"   ").is_empty());
    }

    #[test]
    fn single_quotes() {
        let attrs = scan_attributes(b" attr1='value1' attr2='value2' attr3='value3'");
        assert_eq!(
            attrs,
            vec![
                attr("attr1", "value1", b'\''),
                attr("attr2", "value2", b'\''),
                attr("attr3", "value3", b'\''),
            ]
        );
    }

    #[test]
    fn double_quotes() {
        let names = scan_attribute_names(br#" attr1="value1" attr2="value2" attr3="value3""#);
        assert_eq!(names, vec!["attr1", "attr2", "attr3"]);
    }

    #[test]
    fn other_quote_inside_value() {
        let attrs = scan_attributes(br#" a="it's" b='say "hi"'"#);
        assert_eq!(attrs, vec![attr("a", "it's", b'"'), attr("b", r#"say "hi""#, b'\'')]);
    }

    #[test]
    fn whitespace_around_equals() {
        let attrs = scan_attributes(b"\n  id  =  \"test\"\n");
        assert_eq!(attrs, vec![attr("id", "test", b'"')]);
    }

    #[test]
    fn escaped_quote_is_literal() {
        let input = br#" attr="va\"lue""#;
        let attrs = scan_attributes(input);
        assert_eq!(attrs, vec![attr("attr", r#"va\"lue"#, b'"')]);

        let found = &attrs[0];
        let quote = found.quote as char;
        let reinjected = format!(" {}={quote}{}{quote}", found.name, found.value);
        assert_eq!(reinjected.as_bytes(), input);
    }

    #[test]
    fn escaped_backslash_does_not_escape_quote() {
        let attrs = scan_attributes(br#" a="x\\" b="y""#);
        assert_eq!(attrs, vec![attr("a", r"x\\", b'"'), attr("b", "y", b'"')]);
    }

    #[test]
    fn repeated_name_keeps_first() {
        let attrs = scan_attributes(br#" a="1" a="2" b="3""#);
        assert_eq!(attrs, vec![attr("a", "1", b'"'), attr("b", "3", b'"')]);
    }

    #[test]
    fn stray_equals_are_ignored() {
        let attrs = scan_attributes(br#" = =a="1""#);
        assert_eq!(attrs, vec![attr("a", "1", b'"')]);
    }

    #[test]
    fn valueless_and_unquoted_are_skipped() {
        let attrs = scan_attributes(br#" checked x=1 y="2""#);
        assert_eq!(attrs, vec![attr("y", "2", b'"')]);
    }

    #[test]
    fn unterminated_value_is_dropped() {
        let attrs = scan_attributes(br#" a="1" b="2"#);
        assert_eq!(attrs, vec![attr("a", "1", b'"')]);
    }

    #[test]
    fn find_value() {
        let input = br#" attr1="value1" attr2="value2""#;
        assert_eq!(find_attribute(input, "attr2"), Some("value2".to_string()));
        assert_eq!(find_attribute(input, "attr3"), None);
    }
}
