//! The textual query syntax: `tag.tag[index]#attribute`.

mod error;
mod path_try_from;
mod pest;

pub use error::*;
pub(crate) use self::pest::*;
