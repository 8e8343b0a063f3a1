use std::collections::{HashSet, VecDeque};

/// Results waiting to be handed to the consumer, in production order.
#[derive(Debug, Default)]
pub struct OutputQueue {
    lines: VecDeque<String>,
    seen: HashSet<String>,
}

impl OutputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: String) {
        self.lines.push_back(line);
    }

    /// Pushes `line` unless an equal line was pushed through this method before, even if that one has since been
    /// drained.
    pub fn push_distinct(&mut self, line: String) {
        if self.seen.insert(line.clone()) {
            self.lines.push_back(line);
        }
    }

    pub fn drain(&mut self) -> impl Iterator<Item = String> + '_ {
        self.lines.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_survives_draining() {
        let mut queue = OutputQueue::new();
        queue.push_distinct("a".to_string());
        queue.push_distinct("b".to_string());
        queue.push_distinct("a".to_string());
        assert_eq!(queue.drain().collect::<Vec<_>>(), vec!["a", "b"]);

        queue.push_distinct("b".to_string());
        queue.push_distinct("c".to_string());
        assert_eq!(queue.drain().collect::<Vec<_>>(), vec!["c"]);
        assert_eq!(queue.drain().count(), 0);
    }

    #[test]
    fn plain_push_keeps_duplicates() {
        let mut queue = OutputQueue::new();
        queue.push("v".to_string());
        queue.push("v".to_string());
        assert_eq!(queue.drain().collect::<Vec<_>>(), vec!["v", "v"]);
    }
}
