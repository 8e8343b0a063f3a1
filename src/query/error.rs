use crate::query::PestError;
use pest::Span;
use std::fmt::{Display, Formatter};

/// A query string that couldn't be turned into a [`crate::select::Query`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParseError {
    pub(crate) inner: InnerParseError,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum InnerParseError {
    Pest(Box<PestError>),
    Other(DetachedSpan, String),
}

impl std::error::Error for ParseError {}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            InnerParseError::Pest(error) => Display::fmt(error, f),
            InnerParseError::Other(_, message) => Display::fmt(message, f),
        }
    }
}

impl ParseError {
    pub(crate) fn other(span: DetachedSpan, message: impl Into<String>) -> Self {
        Self {
            inner: InnerParseError::Other(span, message.into()),
        }
    }

    /// Renders the error against the text it came from, with a caret pointing at the problem.
    pub fn to_string(&self, query_text: &str) -> String {
        match &self.inner {
            InnerParseError::Pest(e) => format!("{e}"),
            InnerParseError::Other(span, message) => match Span::new(query_text, span.start, span.end) {
                None => message.to_string(),
                Some(span) => {
                    let pest_err = PestError::new_from_span(
                        pest::error::ErrorVariant::CustomError {
                            message: message.to_string(),
                        },
                        span,
                    );
                    pest_err.to_string()
                }
            },
        }
    }
}

impl From<PestError> for ParseError {
    fn from(err: PestError) -> Self {
        Self {
            inner: InnerParseError::Pest(Box::new(err)),
        }
    }
}

/// Like a [pest::Span], but without a reference to the underlying `&str`, and thus cheaply Copyable.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub struct DetachedSpan {
    pub start: usize,
    pub end: usize,
}

impl From<pest::Span<'_>> for DetachedSpan {
    fn from(value: pest::Span) -> Self {
        Self {
            start: value.start(),
            end: value.end(),
        }
    }
}

impl From<&crate::query::Pair<'_>> for DetachedSpan {
    fn from(value: &crate::query::Pair<'_>) -> Self {
        value.as_span().into()
    }
}
