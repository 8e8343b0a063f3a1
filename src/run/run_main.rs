use crate::output::{LineWriter, Palette};
use crate::process;
use crate::process::{EngineOptions, StreamOptions};
use crate::query::ParseError;
use crate::run::cli::ColorMode;
use crate::run::RunOptions;
use crate::select::{Query, SearchType};
use std::fmt::{Display, Formatter};
use std::io::{Read, Write};
use std::{env, io};
use tracing::debug;

/// A readable input, as handed out by an [`OsFacade`].
pub type InputReader = Box<dyn Read + Send>;

/// The run's overall possible error.
#[derive(Debug)]
pub enum Error {
    /// User provided an invalid query string.
    ///
    /// This comes from [`Query::parse`].
    QueryParse(QueryParseError),

    /// The options are individually valid, but not together.
    InvalidOptions(String),

    /// Couldn't open an input file.
    FileRead(Input, io::Error),

    /// The input couldn't be processed.
    Processing(process::Error),

    /// Couldn't write the results.
    Write(io::Error),
}

impl std::error::Error for Error {}

/// Returned when the query string is not valid.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryParseError {
    query_string: String,
    error: ParseError,
}

impl std::error::Error for QueryParseError {}

impl Display for QueryParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.error.to_string(&self.query_string))
    }
}

/// Stdin or an input file by path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Input {
    Stdin,
    FilePath(String),
}

impl Error {
    pub(crate) fn from_io_error(error: io::Error, file: Input) -> Self {
        Error::FileRead(file, error)
    }
}

impl Display for Input {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Stdin => f.write_str("stdin"),
            Input::FilePath(file) => write!(f, "file {file:?}"),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::QueryParse(err) => {
                writeln!(f, "Syntax error in query:")?;
                writeln!(f, "{err}")
            }
            Error::InvalidOptions(message) => writeln!(f, "Invalid options: {message}"),
            Error::FileRead(file, err) => {
                if env::var("XQ_PORTABLE_ERRORS").unwrap_or_default().is_empty() {
                    writeln!(f, "{err} while reading {file}")
                } else {
                    writeln!(f, "{} while reading {file}", err.kind())
                }
            }
            Error::Processing(err) => writeln!(f, "{err}"),
            Error::Write(err) => writeln!(f, "{err} while writing output"),
        }
    }
}

/// A simple facade for handling I/O.
///
/// This trait lets you do "I/O-y stuff" like mocking out stdin or reading files. The [`run`] method uses it.
pub trait OsFacade {
    /// Open stdin (or your mock of it) for reading.
    fn open_stdin(&self) -> io::Result<InputReader>;

    /// Open a file path (or your mock of one) for reading.
    fn open_file(&self, path: &str) -> io::Result<InputReader>;

    /// Get a writer for stdout (or your mock of it).
    fn stdout(&mut self) -> impl Write;

    /// Whether stdout is an interactive terminal. This decides [`ColorMode::Auto`].
    fn stdout_is_terminal(&self) -> bool;

    /// Handle an error.
    fn write_error(&mut self, err: Error);

    /// Open a slice of file paths as a single, concatenated reader.
    ///
    /// The default implementation (which you should feel free to use) treats the file path `"-"` as stdin. The first
    /// `"-"` reads all of stdin (via [`Self::open_stdin`]), and subsequent `"-"`s get silently ignored. Every file is
    /// opened before anything is read, so a missing file is reported before any output.
    fn open_all(&self, xml_file_paths: &[String]) -> Result<InputReader, Error> {
        if xml_file_paths.is_empty() {
            return self.open_stdin().map_err(|err| Error::from_io_error(err, Input::Stdin));
        }
        let mut combined: InputReader = Box::new(io::empty());
        let mut have_read_stdin = false;
        for path in xml_file_paths {
            let next = if path == "-" {
                if have_read_stdin {
                    continue;
                }
                have_read_stdin = true;
                self.open_stdin().map_err(|err| Error::from_io_error(err, Input::Stdin))?
            } else {
                self.open_file(path)
                    .map_err(|err| Error::from_io_error(err, Input::FilePath(path.to_string())))?
            };
            combined = Box::new(combined.chain(next));
        }
        Ok(combined)
    }
}

/// Runs xq end to end.
///
/// This parses [`RunOptions::query`], streams the inputs from [`RunOptions::xml_file_paths`] through it, and writes
/// each result line to the given [`OsFacade`] in the format specified by [`RunOptions::output`]. Returns whether
/// anything was found; any error is passed to [`OsFacade::write_error`] and makes this return `false`.
pub fn run(cli: &RunOptions, os: &mut impl OsFacade) -> bool {
    match run_or_error(cli, os) {
        Ok(ok) => ok,
        Err(err) => {
            os.write_error(err);
            false
        }
    }
}

fn run_or_error(cli: &RunOptions, os: &mut impl OsFacade) -> Result<bool, Error> {
    let query = build_query(cli)?;
    if cli.chunk_size == 0 {
        return Err(Error::InvalidOptions("chunk size must be at least 1".to_string()));
    }
    let palette = match cli.color {
        ColorMode::Always => Palette::ANSI,
        ColorMode::Never => Palette::PLAIN,
        ColorMode::Auto if os.stdout_is_terminal() => Palette::ANSI,
        ColorMode::Auto => Palette::PLAIN,
    };

    let input = os.open_all(&cli.xml_file_paths)?;
    let options = StreamOptions {
        engine: EngineOptions {
            indent: cli.indent,
            palette,
        },
        chunk_size: cli.chunk_size,
    };
    let mut results = process::stream(input, query, options).map_err(Error::Processing)?;

    if cli.quiet {
        // Dropping the stream stops the producer, so nothing past the first result is read.
        return match results.next() {
            Some(Ok(_)) => Ok(true),
            Some(Err(err)) => Err(Error::Processing(err)),
            None => Ok(false),
        };
    }

    let mut stdout = os.stdout();
    let mut writer = LineWriter::new(&mut stdout, cli.output);
    for item in results {
        match item {
            Ok(line) => writer.write_line(&line).map_err(Error::Write)?,
            Err(err) => {
                // leave stdout well-formed: a JSON array still gets its closing bracket
                writer.finish().map_err(Error::Write)?;
                return Err(Error::Processing(err));
            }
        }
    }
    let found_any = writer.written() > 0;
    debug!(lines = writer.written(), "done");
    writer.finish().map_err(Error::Write)?;
    Ok(found_any)
}

fn build_query(cli: &RunOptions) -> Result<Query, Error> {
    let mut query = Query::parse(&cli.query).map_err(|error| {
        Error::QueryParse(QueryParseError {
            query_string: cli.query.to_string(),
            error,
        })
    })?;
    let (listing, flag) = match (cli.tags, cli.attrs) {
        (false, false) => return Ok(query),
        (true, false) => (SearchType::TagNames, "--tags"),
        (false, true) => (SearchType::AttributeNames, "--attrs"),
        (true, true) => {
            return Err(Error::InvalidOptions("--tags and --attrs can't be used together".to_string()));
        }
    };
    if query.is_full_document() {
        return Err(Error::InvalidOptions(format!("{flag} needs a path")));
    }
    if let SearchType::AttributeValue(attr) = &query.search_type {
        return Err(Error::InvalidOptions(format!("{flag} can't be used with an attribute (#{attr})")));
    }
    query.search_type = listing;
    Ok(query)
}
