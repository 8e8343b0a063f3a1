//! Byte-level scanning: splitting a stream into tags and text, classifying tags, and reading attributes.
mod attributes;
mod scanner;
mod tag;

pub use attributes::*;
pub use scanner::*;
pub use tag::*;
