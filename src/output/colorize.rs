use crate::output::Palette;
use crate::scan::{scan_attributes, Tag, TagKind};
use crate::select::{OutputQueue, PathTracker, ResultBuilder};
use crate::util::str_utils::indented;

/// Re-indents and colors the whole document.
///
/// This runs against a tracker with an empty path, so the tracker's depth is the document depth. Openings are seen
/// after the tracker pushes and closings before it pops, which is why both render one level up from it.
#[derive(Debug)]
pub(crate) struct Renderer {
    indent: usize,
    palette: Palette,
}

impl Renderer {
    pub(crate) fn new(indent: usize, palette: Palette) -> Self {
        Self { indent, palette }
    }

    fn render_opening(&self, tag: &Tag) -> String {
        let mut line = String::with_capacity(tag.bytes().len() + 16);
        line.push('<');
        self.palette.push_tag_name(&mut line, &tag.name());
        for attr in scan_attributes(tag.attribute_bytes()) {
            let quote = attr.quote as char;
            line.push(' ');
            self.palette.push_attribute_name(&mut line, &attr.name);
            line.push('=');
            line.push(quote);
            line.push_str(&attr.value);
            line.push(quote);
        }
        if tag.kind() == TagKind::SelfClosing {
            line.push('/');
        }
        line.push('>');
        line
    }

    fn render_closing(&self, tag: &Tag) -> String {
        let mut line = String::from("</");
        self.palette.push_tag_name(&mut line, &tag.name());
        line.push('>');
        line
    }
}

impl ResultBuilder for Renderer {
    fn on_open(&mut self, tracker: &PathTracker, tag: &Tag, out: &mut OutputQueue) {
        let level = tracker.depth().saturating_sub(1);
        out.push(indented(self.indent, level, &self.render_opening(tag)));
    }

    fn on_close(&mut self, tracker: &PathTracker, tag: &Tag, out: &mut OutputQueue) {
        let level = tracker.depth().saturating_sub(1);
        out.push(indented(self.indent, level, &self.render_closing(tag)));
    }

    fn on_service(&mut self, tracker: &PathTracker, tag: &Tag, out: &mut OutputQueue) {
        out.push(indented(self.indent, tracker.depth(), &tag.as_lossy_str()));
    }

    fn on_text(&mut self, tracker: &PathTracker, text: &[u8], out: &mut OutputQueue) {
        out.push(indented(self.indent, tracker.depth(), &String::from_utf8_lossy(text)));
    }
}
