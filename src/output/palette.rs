/// The escape sequences wrapped around the colored parts of a rendered tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Palette {
    pub tag_name: &'static str,
    pub attribute_name: &'static str,
    pub reset: &'static str,
}

impl Palette {
    /// Bold red tag names and bold green attribute names.
    pub const ANSI: Palette = Palette {
        tag_name: "\x1b[01;31m",
        attribute_name: "\x1b[01;32m",
        reset: "\x1b[00m",
    };

    pub const PLAIN: Palette = Palette {
        tag_name: "",
        attribute_name: "",
        reset: "",
    };

    pub(crate) fn push_tag_name(&self, out: &mut String, name: &str) {
        Self::push_colored(out, self.tag_name, name, self.reset);
    }

    pub(crate) fn push_attribute_name(&self, out: &mut String, name: &str) {
        Self::push_colored(out, self.attribute_name, name, self.reset);
    }

    fn push_colored(out: &mut String, color: &str, text: &str, reset: &str) {
        out.push_str(color);
        out.push_str(text);
        out.push_str(reset);
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::PLAIN
    }
}
