use crate::process::{Engine, EngineOptions, Error};
use crate::select::Query;
use std::io::{ErrorKind, Read};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::thread;
use tracing::{debug, trace};

/// Bytes read per producer iteration, unless configured otherwise.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StreamOptions {
    pub engine: EngineOptions,
    /// Must be greater than zero.
    pub chunk_size: usize,
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self {
            engine: EngineOptions::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

type Item = Result<String, Error>;

/// The consumer's end of a [`stream`]: result lines in order, with at most one error, which is always last.
///
/// Dropping this before it's exhausted tells the producer to stop at its next send.
#[derive(Debug)]
pub struct ResultStream {
    rx: Receiver<Item>,
}

impl Iterator for ResultStream {
    type Item = Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.rx.recv().ok()
    }
}

/// Processes `reader` on a producer thread, handing each line over as soon as the consumer asks for it.
///
/// The channel between the two has no buffer, so at most one line is in flight at a time.
pub fn stream<R>(reader: R, query: Query, options: StreamOptions) -> Result<ResultStream, Error>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = sync_channel(0);
    let engine = Engine::new(query, options.engine);
    let chunk_size = options.chunk_size.max(1);
    thread::Builder::new()
        .name("xq-producer".to_string())
        .spawn(move || produce(reader, engine, chunk_size, tx))?;
    Ok(ResultStream { rx })
}

enum Halt {
    /// The consumer dropped its end.
    Disconnected,
    Failed(Error),
}

impl From<Error> for Halt {
    fn from(err: Error) -> Self {
        Halt::Failed(err)
    }
}

fn produce<R: Read>(mut reader: R, mut engine: Engine, chunk_size: usize, tx: SyncSender<Item>) {
    match pump(&mut reader, &mut engine, chunk_size, &tx) {
        Ok(()) => debug!("input processed"),
        Err(Halt::Disconnected) => debug!("consumer went away; stopped reading"),
        Err(Halt::Failed(err)) => {
            debug!(%err, "processing failed");
            if tx.send(Err(err)).is_err() {
                debug!("consumer went away before the error was delivered");
            }
        }
    }
}

fn pump<R: Read>(reader: &mut R, engine: &mut Engine, chunk_size: usize, tx: &SyncSender<Item>) -> Result<(), Halt> {
    let mut buf = vec![0u8; chunk_size];
    loop {
        let read = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(Error::Io(err).into()),
        };
        trace!(bytes = read, "read chunk");
        let fed = engine.feed(&buf[..read]);
        send_lines(engine, tx)?;
        fed?;
        if engine.is_stopped() {
            debug!("query satisfied; skipping the rest of the input");
            return Ok(());
        }
    }
    let finished = engine.finish();
    send_lines(engine, tx)?;
    Ok(finished?)
}

fn send_lines(engine: &mut Engine, tx: &SyncSender<Item>) -> Result<(), Halt> {
    for line in engine.drain_lines() {
        tx.send(Ok(line)).map_err(|_| Halt::Disconnected)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::{PathStep, SearchType};
    use crate::util::utils_for_test::*;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn options(chunk_size: usize) -> StreamOptions {
        StreamOptions {
            chunk_size,
            ..StreamOptions::default()
        }
    }

    /// Serves `data` in small reads and counts how many bytes were handed out.
    struct CountingReader {
        data: Vec<u8>,
        pos: usize,
        served: Arc<AtomicUsize>,
    }

    impl Read for CountingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            self.served.fetch_add(n, Ordering::SeqCst);
            Ok(n)
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::BrokenPipe, "gone"))
        }
    }

    #[test]
    fn lines_arrive_in_order() {
        let input = io::Cursor::new(b"<a><b>1</b><b>2</b></a>".to_vec());
        unwrap!(stream(input, Query::full_document(), options(3)), Ok(results));
        let lines: Result<Vec<_>, _> = results.collect();
        unwrap!(lines, Ok(lines));
        assert_eq!(lines, vec!["<a>", "  <b>", "    1", "  </b>", "  <b>", "    2", "  </b>", "</a>"]);
    }

    #[test]
    fn error_is_the_last_item() {
        let input = io::Cursor::new(b"<a><b></a>".to_vec());
        unwrap!(stream(input, Query::full_document(), options(4)), Ok(results));
        let items: Vec<_> = results.collect();
        assert_eq!(items.len(), 3);
        unwrap!(&items[0], Ok(first));
        assert_eq!(first, "<a>");
        unwrap!(&items[2], Err(Error::StructureMismatch(_)));
    }

    #[test]
    fn read_error_is_reported() {
        unwrap!(stream(FailingReader, Query::full_document(), options(4)), Ok(mut results));
        unwrap!(results.next(), Some(Err(Error::Io(_))));
        assert!(results.next().is_none());
    }

    #[test]
    fn indexed_query_skips_the_rest() {
        let mut data = b"<a><b>first</b>".to_vec();
        data.extend(std::iter::repeat(b"<b>more</b>").take(1000).flatten());
        data.extend(b"</a>");
        let total = data.len();
        let served = Arc::new(AtomicUsize::new(0));
        let reader = CountingReader {
            data,
            pos: 0,
            served: Arc::clone(&served),
        };
        let query = Query::new(vec![PathStep::new("a"), PathStep::indexed("b", 0)], SearchType::SubtreeContent);
        unwrap!(stream(reader, query, options(16)), Ok(results));
        let lines: Vec<_> = results.map(|item| item.unwrap()).collect();
        assert_eq!(lines, vec!["<b>", "  first", "</b>"]);
        assert!(served.load(Ordering::SeqCst) < total);
    }

    #[test]
    fn dropping_the_stream_stops_the_producer() {
        let data = std::iter::repeat(b"<b/>").take(10_000).flatten().copied().collect::<Vec<u8>>();
        let served = Arc::new(AtomicUsize::new(0));
        let reader = CountingReader {
            data,
            pos: 0,
            served: Arc::clone(&served),
        };
        unwrap!(stream(reader, Query::full_document(), options(8)), Ok(mut results));
        unwrap!(results.next(), Some(Ok(first)));
        assert_eq!(first, "<b/>");
        drop(results);
        // the producer can read at most one more chunk before its blocked send fails
        thread::sleep(std::time::Duration::from_millis(50));
        assert!(served.load(Ordering::SeqCst) <= 24);
    }
}
