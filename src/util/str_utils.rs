/// Prefixes `content` with `indent * level` spaces.
pub(crate) fn indented(indent: usize, level: usize, content: &str) -> String {
    let padding = indent * level;
    let mut result = String::with_capacity(padding + content.len());
    (0..padding).for_each(|_| result.push(' '));
    result.push_str(content);
    result
}
