use crate::scan::Tag;
use crate::select::sel_attr_names::AttributeNamesBuilder;
use crate::select::sel_attr_value::AttributeValueBuilder;
use crate::select::sel_subtree::SubtreeContentBuilder;
use crate::select::sel_tag_names::TagNamesBuilder;
use crate::select::{OutputQueue, PathTracker, SearchType};
use paste::paste;

/// Turns tracker-annotated scan events into results.
///
/// Each method is called after the tracker has taken the event into account, except [`Self::on_close`], which sees
/// the tracker while the closing tag is still open. A self-closing tag only gets [`Self::on_open`].
pub(crate) trait ResultBuilder {
    fn on_open(&mut self, _tracker: &PathTracker, _tag: &Tag, _out: &mut OutputQueue) {}

    fn on_close(&mut self, _tracker: &PathTracker, _tag: &Tag, _out: &mut OutputQueue) {}

    /// Comments, CDATA, declarations and processing instructions.
    fn on_service(&mut self, _tracker: &PathTracker, _tag: &Tag, _out: &mut OutputQueue) {}

    fn on_text(&mut self, _tracker: &PathTracker, _text: &[u8], _out: &mut OutputQueue) {}
}

macro_rules! builders {
    { $($name:ident),+ $(,)? } => {
        paste! {
            /// The one [`ResultBuilder`] that's active for a query, picked by its [`SearchType`].
            #[derive(Debug)]
            pub(crate) enum BuilderAdapter {
                $(
                $name([<$name Builder>]),
                )+
            }

            impl ResultBuilder for BuilderAdapter {
                fn on_open(&mut self, tracker: &PathTracker, tag: &Tag, out: &mut OutputQueue) {
                    match self {
                        $(Self::$name(builder) => builder.on_open(tracker, tag, out),)+
                    }
                }

                fn on_close(&mut self, tracker: &PathTracker, tag: &Tag, out: &mut OutputQueue) {
                    match self {
                        $(Self::$name(builder) => builder.on_close(tracker, tag, out),)+
                    }
                }

                fn on_service(&mut self, tracker: &PathTracker, tag: &Tag, out: &mut OutputQueue) {
                    match self {
                        $(Self::$name(builder) => builder.on_service(tracker, tag, out),)+
                    }
                }

                fn on_text(&mut self, tracker: &PathTracker, text: &[u8], out: &mut OutputQueue) {
                    match self {
                        $(Self::$name(builder) => builder.on_text(tracker, text, out),)+
                    }
                }
            }
        }
    };
}

builders! {
    TagNames,
    SubtreeContent,
    AttributeNames,
    AttributeValue,
}

impl BuilderAdapter {
    pub(crate) fn new(search_type: &SearchType, indent: usize) -> Self {
        match search_type {
            SearchType::TagNames => Self::TagNames(TagNamesBuilder),
            SearchType::SubtreeContent => Self::SubtreeContent(SubtreeContentBuilder::new(indent)),
            SearchType::AttributeNames => Self::AttributeNames(AttributeNamesBuilder),
            SearchType::AttributeValue(attribute) => Self::AttributeValue(AttributeValueBuilder::new(attribute)),
        }
    }
}
