use crate::output::{Palette, Renderer};
use crate::process::Error;
use crate::scan::{ScanEvent, Tag, TagKind, TagScanner};
use crate::select::{BuilderAdapter, OutputQueue, PathTracker, Query, ResultBuilder};
use std::ops::ControlFlow;
use tracing::{debug, warn};

/// Knobs for how results are laid out.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EngineOptions {
    /// Spaces per level of indentation.
    pub indent: usize,
    /// Only used when rendering the whole document.
    pub palette: Palette,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            palette: Palette::PLAIN,
        }
    }
}

#[derive(Debug)]
enum Handler {
    Render(Renderer),
    Select(BuilderAdapter),
}

impl Handler {
    fn as_builder(&mut self) -> &mut dyn ResultBuilder {
        match self {
            Handler::Render(renderer) => renderer,
            Handler::Select(builder) => builder,
        }
    }
}

/// The synchronous core: feed it chunks, then take the lines it produced.
///
/// An empty query path renders the whole document; anything else runs the builder for the query's search type.
#[derive(Debug)]
pub struct Engine {
    scanner: TagScanner,
    tracker: PathTracker,
    handler: Handler,
    lines: OutputQueue,
    stopped: bool,
}

impl Engine {
    pub fn new(query: Query, options: EngineOptions) -> Self {
        let handler = if query.is_full_document() {
            debug!(indent = options.indent, "rendering full document");
            Handler::Render(Renderer::new(options.indent, options.palette))
        } else {
            debug!(query = %query, search = ?query.search_type, "selecting");
            Handler::Select(BuilderAdapter::new(&query.search_type, options.indent))
        };
        Self {
            scanner: TagScanner::new(),
            tracker: PathTracker::new(query.path),
            handler,
            lines: OutputQueue::new(),
            stopped: false,
        }
    }

    /// Processes one chunk of input. Does nothing once the engine has stopped, which includes after any error.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), Error> {
        if self.stopped {
            return Ok(());
        }
        let Self {
            scanner,
            tracker,
            handler,
            lines,
            ..
        } = self;
        let builder = handler.as_builder();
        let flow = scanner.feed(chunk, |event| handle_event(tracker, builder, lines, event));
        self.stopped = !matches!(flow, Ok(ControlFlow::Continue(())));
        flow.map(|_| ())
    }

    /// Signals end of input, flushing any trailing text.
    pub fn finish(&mut self) -> Result<(), Error> {
        if self.stopped {
            return Ok(());
        }
        let Self {
            scanner,
            tracker,
            handler,
            lines,
            ..
        } = self;
        let builder = handler.as_builder();
        let finished = scanner.finish(|event| handle_event(tracker, builder, lines, event));
        if finished.is_ok() && tracker.depth() > 0 {
            warn!(open = ?tracker.ancestry(), "input ended with tags still open");
        }
        self.stopped = true;
        finished.map(|_| ())
    }

    /// Whether the rest of the input can be skipped, either because the query's sole result is complete or because
    /// [`Engine::finish`] was called.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Takes the lines produced so far, in order.
    pub fn drain_lines(&mut self) -> impl Iterator<Item = String> + '_ {
        self.lines.drain()
    }
}

fn handle_event(
    tracker: &mut PathTracker,
    builder: &mut dyn ResultBuilder,
    out: &mut OutputQueue,
    event: ScanEvent,
) -> Result<ControlFlow<()>, Error> {
    match event {
        ScanEvent::Text(text) => builder.on_text(tracker, text, out),
        ScanEvent::Tag(bytes) => {
            let tag = Tag::parse(bytes)?;
            match tag.kind() {
                TagKind::Service => builder.on_service(tracker, &tag, out),
                TagKind::Opening => {
                    tracker.on_opening_tag(&tag.name());
                    builder.on_open(tracker, &tag, out);
                }
                TagKind::Closing => {
                    let name = tag.name();
                    tracker.check_closing_tag(&name)?;
                    builder.on_close(tracker, &tag, out);
                    tracker.on_closing_tag(&name)?;
                }
                TagKind::SelfClosing => {
                    tracker.on_self_closing_tag(&tag.name(), |tracker| builder.on_open(tracker, &tag, out))?;
                }
            }
        }
    }
    Ok(if tracker.should_stop() {
        ControlFlow::Break(())
    } else {
        ControlFlow::Continue(())
    })
}
