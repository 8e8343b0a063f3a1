mod colorize;
mod palette;
mod writer;

pub(crate) use colorize::*;
pub use palette::*;
pub use writer::*;
