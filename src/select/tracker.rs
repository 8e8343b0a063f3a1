use crate::select::PathStep;
use tracing::debug;

/// A closing tag that doesn't close the innermost open tag.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[error("incorrect xml structure: {}", describe_mismatch(.expected, .actual))]
pub struct StructureMismatch {
    /// The innermost open tag, or `None` if nothing was open.
    pub expected: Option<String>,
    pub actual: String,
}

fn describe_mismatch(expected: &Option<String>, actual: &str) -> String {
    match expected {
        Some(expected) => format!("the last open tag is {expected}, but close tag is {actual}"),
        None => format!("close tag {actual} has no open tag"),
    }
}

/// Where an indexed step is in its count of matching siblings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum IndexCursor {
    /// This many more matching siblings must go by before one is selected.
    Skipping(usize),
    /// The most recent matching sibling is the selected one.
    Selected,
    /// A sibling after the selected one has opened; this step can't match anything else.
    Exhausted,
}

impl IndexCursor {
    fn advance(&mut self) {
        *self = match *self {
            IndexCursor::Skipping(0) => IndexCursor::Selected,
            IndexCursor::Skipping(n) => IndexCursor::Skipping(n - 1),
            IndexCursor::Selected | IndexCursor::Exhausted => IndexCursor::Exhausted,
        }
    }
}

#[derive(Debug)]
struct TrackedStep {
    step: PathStep,
    cursor: Option<IndexCursor>,
}

impl TrackedStep {
    fn admits(&self, name: &str) -> bool {
        self.step.name == name && self.cursor.map_or(true, |c| c == IndexCursor::Selected)
    }
}

/// Follows the ancestry of the scan position and relates it to a query path.
///
/// Index counters only count siblings whose ancestors are all on the queried lineage: a same-named tag one level
/// deeper, or one under a non-selected ancestor, never consumes a counter.
#[derive(Debug)]
pub struct PathTracker {
    steps: Vec<TrackedStep>,
    ancestry: Vec<String>,
    /// The depth of the deepest indexed step: once its selected element closes, nothing else can match.
    last_indexed_depth: Option<usize>,
    inside_target: bool,
    stop: bool,
}

impl PathTracker {
    pub fn new(path: Vec<PathStep>) -> Self {
        let last_indexed_depth = path.iter().rposition(|step| step.index.is_some()).map(|pos| pos + 1);
        let steps = path
            .into_iter()
            .map(|step| TrackedStep {
                cursor: step.index.map(IndexCursor::Skipping),
                step,
            })
            .collect();
        let mut tracker = Self {
            steps,
            ancestry: Vec::new(),
            last_indexed_depth,
            inside_target: false,
            stop: false,
        };
        tracker.refresh_inside_target();
        tracker
    }

    pub fn on_opening_tag(&mut self, name: &str) {
        let depth = self.ancestry.len();
        let on_lineage = self.steps.get(depth).is_some_and(|s| s.step.name == name) && self.lineage_selected(depth);
        if on_lineage {
            if let Some(cursor) = self.steps[depth].cursor.as_mut() {
                cursor.advance();
                if *cursor == IndexCursor::Exhausted {
                    debug!(step = %self.steps[depth].step, "indexed step has no more candidates; stopping");
                    self.stop = true;
                }
            }
        }
        self.ancestry.push(name.to_string());
        self.refresh_inside_target();
    }

    /// Checks that `name` closes the innermost open tag, without changing any state.
    pub fn check_closing_tag(&self, name: &str) -> Result<(), StructureMismatch> {
        match self.ancestry.last() {
            Some(top) if top == name => Ok(()),
            top => Err(StructureMismatch {
                expected: top.cloned(),
                actual: name.to_string(),
            }),
        }
    }

    pub fn on_closing_tag(&mut self, name: &str) -> Result<(), StructureMismatch> {
        self.check_closing_tag(name)?;
        let closing_selected = self
            .last_indexed_depth
            .is_some_and(|depth| self.ancestry.len() == depth && self.lineage_selected(depth));
        self.ancestry.pop();
        self.refresh_inside_target();
        if closing_selected {
            debug!("last indexed element closed; stopping");
            self.stop = true;
        }
        Ok(())
    }

    /// An opening tag and its closing tag, at the same instant. `while_open` sees the tracker with the tag pushed.
    pub fn on_self_closing_tag(
        &mut self,
        name: &str,
        while_open: impl FnOnce(&Self),
    ) -> Result<(), StructureMismatch> {
        self.on_opening_tag(name);
        while_open(self);
        self.on_closing_tag(name)
    }

    /// Whether the open tags are exactly the query path, by name.
    pub fn path_matches(&self) -> bool {
        self.ancestry.len() == self.steps.len() && self.names_match_prefix()
    }

    /// Whether the open tags start with the query path, by name: the scan is at the target or somewhere inside it.
    pub fn is_within_query_path(&self) -> bool {
        self.ancestry.len() >= self.steps.len() && self.names_match_prefix()
    }

    /// Whether the innermost open tag is a direct child of a query path match.
    pub fn is_target_child(&self) -> bool {
        self.ancestry.len() == self.steps.len() + 1 && self.names_match_prefix()
    }

    /// Whether the scan is within the query path, with every indexed step on its selected occurrence.
    pub fn inside_target(&self) -> bool {
        self.inside_target
    }

    /// Whether nothing more can be produced, so the rest of the input may be skipped.
    pub fn should_stop(&self) -> bool {
        self.stop
    }

    pub fn ancestry(&self) -> &[String] {
        &self.ancestry
    }

    pub fn depth(&self) -> usize {
        self.ancestry.len()
    }

    /// How many levels the scan is below the query path.
    pub fn relative_depth(&self) -> usize {
        self.ancestry.len().saturating_sub(self.steps.len())
    }

    fn names_match_prefix(&self) -> bool {
        self.steps.iter().zip(&self.ancestry).all(|(s, name)| s.step.name == *name)
    }

    /// Whether the first `depth` open tags are on the queried lineage.
    fn lineage_selected(&self, depth: usize) -> bool {
        self.ancestry.len() >= depth && self.steps[..depth].iter().zip(&self.ancestry).all(|(s, name)| s.admits(name))
    }

    fn refresh_inside_target(&mut self) {
        self.inside_target = self.is_within_query_path()
            && self.steps.iter().all(|s| s.cursor.map_or(true, |c| c == IndexCursor::Selected));
    }
}
