use crate::scan::Tag;
use crate::select::api::ResultBuilder;
use crate::select::{OutputQueue, PathTracker};
use crate::util::str_utils::indented;

/// Reproduces each target's tags verbatim and its text runs, indented relative to the target.
///
/// Opening and closing tags sit at their depth below the target. Text runs and service tags (comments, CDATA,
/// declarations) don't open a level of their own, so they sit one level deeper than the tag that encloses them,
/// the same as in full-document rendering.
#[derive(Debug)]
pub(crate) struct SubtreeContentBuilder {
    indent: usize,
}

impl SubtreeContentBuilder {
    pub(crate) fn new(indent: usize) -> Self {
        Self { indent }
    }

    fn push_tag(&self, level: usize, tag: &Tag, out: &mut OutputQueue) {
        out.push(indented(self.indent, level, &tag.as_lossy_str()));
    }
}

impl ResultBuilder for SubtreeContentBuilder {
    fn on_open(&mut self, tracker: &PathTracker, tag: &Tag, out: &mut OutputQueue) {
        if tracker.inside_target() {
            self.push_tag(tracker.relative_depth(), tag, out);
        }
    }

    fn on_close(&mut self, tracker: &PathTracker, tag: &Tag, out: &mut OutputQueue) {
        if tracker.inside_target() {
            self.push_tag(tracker.relative_depth(), tag, out);
        }
    }

    fn on_service(&mut self, tracker: &PathTracker, tag: &Tag, out: &mut OutputQueue) {
        if tracker.inside_target() {
            self.push_tag(tracker.relative_depth() + 1, tag, out);
        }
    }

    fn on_text(&mut self, tracker: &PathTracker, text: &[u8], out: &mut OutputQueue) {
        if tracker.inside_target() {
            let level = tracker.relative_depth() + 1;
            out.push(indented(self.indent, level, &String::from_utf8_lossy(text)));
        }
    }
}
