use crate::scan::{scan_attribute_names, Tag};
use crate::select::api::ResultBuilder;
use crate::select::{OutputQueue, PathTracker};

/// Lists the distinct attribute names found on every target tag.
#[derive(Debug)]
pub(crate) struct AttributeNamesBuilder;

impl ResultBuilder for AttributeNamesBuilder {
    fn on_open(&mut self, tracker: &PathTracker, tag: &Tag, out: &mut OutputQueue) {
        if !(tracker.path_matches() && tracker.inside_target()) {
            return;
        }
        for name in scan_attribute_names(tag.attribute_bytes()) {
            out.push_distinct(name);
        }
    }
}
