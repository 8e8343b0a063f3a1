mod api;
mod output_queue;
mod path;
mod sel_attr_names;
mod sel_attr_value;
mod sel_subtree;
mod sel_tag_names;
mod tracker;

pub(crate) use api::*;

pub use output_queue::*;
pub use path::*;
pub use tracker::*;
