//! Streaming queries over XML-like documents.
//!
//! Input is scanned a chunk at a time into tags and text runs ([`scan`]), matched against a dotted path with optional
//! sibling indexes ([`select`]), and turned into result lines ([`process`], [`output`]). Memory use is bounded by the
//! largest single tag or text run, and an indexed query stops reading once its one result is complete.
//!
//! The [`run`] module ties this together the way the `xq` binary does.

pub mod output;
pub mod process;
pub mod query;
pub mod run;
pub mod scan;
pub mod select;
mod util;
