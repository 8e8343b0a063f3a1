use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// The smallest well-formed tag is `<b>`.
const MIN_TAG_LEN: usize = 3;

/// Why a completed tag token was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MalformedReason {
    TooShort,
    InvalidStart,
    InvalidEnd,
    /// The input ended before the tag was closed.
    Unterminated,
}

impl Display for MalformedReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            MalformedReason::TooShort => "tag can't be less than 3 bytes",
            MalformedReason::InvalidStart => "tag must start with an open bracket",
            MalformedReason::InvalidEnd => "tag must end with a close bracket",
            MalformedReason::Unterminated => "input ended inside the tag",
        };
        f.write_str(text)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[error("malformed tag `{tag}`: {reason}")]
pub struct MalformedTag {
    pub reason: MalformedReason,
    pub tag: String,
}

/// How a completed tag participates in the document structure.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// `<!-- ... -->`, `<![CDATA[ ... ]]>`, `<!DOCTYPE ...>`, `<?xml ...?>`
    Service,
    /// `<name ...>`
    Opening,
    /// `</name>`
    Closing,
    /// `<name .../>`
    SelfClosing,
}

/// A view over the raw bytes of one completed tag token, from its `<` to its matching `>`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tag<'a> {
    bytes: &'a [u8],
    kind: TagKind,
    name_start: usize,
    name_end: usize,
}

impl<'a> Tag<'a> {
    /// Validates and classifies a completed tag token.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, MalformedTag> {
        validate(bytes)?;
        let last = bytes.len() - 1;
        let (kind, name_start) = match bytes[1] {
            b'!' | b'?' => (TagKind::Service, 1),
            b'/' => (TagKind::Closing, 2),
            _ if bytes[last - 1] == b'/' => (TagKind::SelfClosing, 1),
            _ => (TagKind::Opening, 1),
        };
        let mut name_end = name_start;
        while name_end < last && !is_name_terminator(bytes[name_end]) {
            name_end += 1;
        }
        Ok(Self {
            bytes,
            kind,
            name_start,
            name_end,
        })
    }

    pub fn kind(&self) -> TagKind {
        self.kind
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn name_bytes(&self) -> &'a [u8] {
        &self.bytes[self.name_start..self.name_end]
    }

    pub fn name(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.name_bytes())
    }

    /// Everything between the name and the closing `>`, minus the `/` of a self-closing tag.
    pub fn attribute_bytes(&self) -> &'a [u8] {
        let mut end = self.bytes.len() - 1;
        if self.kind == TagKind::SelfClosing {
            end -= 1;
        }
        if self.name_end >= end {
            return &[];
        }
        &self.bytes[self.name_end..end]
    }

    pub fn as_lossy_str(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.bytes)
    }
}

fn validate(bytes: &[u8]) -> Result<(), MalformedTag> {
    let reason = if bytes.len() < MIN_TAG_LEN {
        MalformedReason::TooShort
    } else if bytes[0] != b'<' {
        MalformedReason::InvalidStart
    } else if bytes[bytes.len() - 1] != b'>' {
        MalformedReason::InvalidEnd
    } else {
        return Ok(());
    };
    Err(MalformedTag {
        reason,
        tag: String::from_utf8_lossy(bytes).into_owned(),
    })
}

fn is_name_terminator(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b'/' | b'>')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::utils_for_test::*;

    #[test]
    fn too_short() {
        unwrap!(Tag::parse(b"<b"), Err(err));
        assert_eq!(err.reason, MalformedReason::TooShort);
        assert_eq!(err.tag, "<b");
    }

    #[test]
    fn invalid_start() {
        unwrap!(Tag::parse(b"tagName attr='value'>"), Err(err));
        assert_eq!(err.reason, MalformedReason::InvalidStart);
    }

    #[test]
    fn invalid_end() {
        unwrap!(Tag::parse(b"<tagName attr='value'"), Err(err));
        assert_eq!(err.reason, MalformedReason::InvalidEnd);
    }

    #[test]
    fn opening() {
        unwrap!(Tag::parse(b"<tagName attr='value'>"), Ok(tag));
        assert_eq!(tag.kind(), TagKind::Opening);
        assert_eq!(tag.name(), "tagName");
        assert_eq!(tag.attribute_bytes(), b" attr='value'");
    }

    #[test]
    fn closing() {
        unwrap!(Tag::parse(b"</tagName >"), Ok(tag));
        assert_eq!(tag.kind(), TagKind::Closing);
        assert_eq!(tag.name(), "tagName");
    }

    #[test]
    fn self_closing_with_and_without_space() {
        for input in [&b"<x/>"[..], b"<x />"] {
            unwrap!(Tag::parse(input), Ok(tag));
            assert_eq!(tag.kind(), TagKind::SelfClosing);
            assert_eq!(tag.name(), "x");
        }
    }

    #[test]
    fn self_closing_attributes_exclude_slash() {
        unwrap!(Tag::parse(br#"<x a="/"/>"#), Ok(tag));
        assert_eq!(tag.attribute_bytes(), br#" a="/""#);
    }

    #[test]
    fn service_tags() {
        for input in [&b"<!-- a > b -->"[..], b"<?xml version=\"1.0\"?>", b"<![CDATA[<x>]]>"] {
            unwrap!(Tag::parse(input), Ok(tag));
            assert_eq!(tag.kind(), TagKind::Service);
        }
    }

    #[test]
    fn name_ends_at_newline() {
        unwrap!(Tag::parse(b"<a\n  x='1'>"), Ok(tag));
        assert_eq!(tag.name(), "a");
    }
}
