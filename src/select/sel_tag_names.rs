use crate::scan::Tag;
use crate::select::api::ResultBuilder;
use crate::select::{OutputQueue, PathTracker};

/// Lists the distinct names of the target's direct children.
#[derive(Debug)]
pub(crate) struct TagNamesBuilder;

impl ResultBuilder for TagNamesBuilder {
    fn on_open(&mut self, tracker: &PathTracker, tag: &Tag, out: &mut OutputQueue) {
        if tracker.is_target_child() && tracker.inside_target() {
            out.push_distinct(tag.name().trim().to_string());
        }
    }
}
