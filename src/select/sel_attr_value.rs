use crate::scan::{find_attribute, Tag};
use crate::select::api::ResultBuilder;
use crate::select::{OutputQueue, PathTracker};

/// Emits one attribute's value from every target tag that has it. A missing or empty value produces nothing.
#[derive(Debug)]
pub(crate) struct AttributeValueBuilder {
    attribute: String,
}

impl AttributeValueBuilder {
    pub(crate) fn new(attribute: &str) -> Self {
        Self {
            attribute: attribute.to_string(),
        }
    }
}

impl ResultBuilder for AttributeValueBuilder {
    fn on_open(&mut self, tracker: &PathTracker, tag: &Tag, out: &mut OutputQueue) {
        if !(tracker.path_matches() && tracker.inside_target()) {
            return;
        }
        match find_attribute(tag.attribute_bytes(), &self.attribute) {
            Some(value) if !value.is_empty() => out.push(value),
            _ => {}
        }
    }
}
