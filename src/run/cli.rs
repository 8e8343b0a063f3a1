use crate::output::OutputFormat;
use crate::process::DEFAULT_CHUNK_SIZE;
use clap::builder::RangedU64ValueParser;
use clap::{Parser, ValueEnum};
use derive_builder::Builder;
use std::fmt::{Display, Formatter};

macro_rules! create_options_structs {
    (
        $(
            $(#[$meta:meta])*
            clap $clap:tt
            pub $name:ident : $ty:ty
        ),* $(,)?
    ) => {
        #[derive(Clone, Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Parser)]
        #[command(version, about, long_about = None)]
        #[doc(hidden)]
        pub struct CliOptions {
            $(
            $(#[$meta])*
            #[arg$clap]
            pub(crate) $name: $ty,
            )*

            // clap-only stuff:

            /// How much to log to stderr.
            #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
            pub(crate) log_level: LogLevel,

            /// The query: a dot-separated path of tag names, each optionally followed by a 0-based `[index]`, and
            /// optionally ending in `#attribute`.
            ///
            /// For example, `catalog.book[2]` selects the third `book` under `catalog`, and `catalog.book#id` prints
            /// every book's `id` attribute. A query of `.` renders the whole document.
            #[arg(value_name = "query")]
            pub(crate) query: Option<String>,

            /// An optional list of XML files to read, by path. If not provided, standard input will be used.
            ///
            /// Files are streamed one after the other, in the order given, as if they were a single document. A path
            /// of "-" represents standard input; all but the first "-" are ignored.
            #[arg()]
            pub(crate) xml_file_paths: Vec<String>,
        }

        /// Options analogous to the xq CLI's switches.
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Builder)]
        pub struct RunOptions {
            $(
            $(#[$meta])*
            pub $name: $ty,
            )*

            pub query: String,

            pub xml_file_paths: Vec<String>,
        }

        impl From<CliOptions> for RunOptions {
            fn from(value: CliOptions) -> Self {
                Self {
                    $($name: value.$name,)*
                    query: value.query.unwrap_or_else(|| ".".to_string()),
                    xml_file_paths: value.xml_file_paths,
                }
            }
        }
    };
}

create_options_structs! {
    /// List the distinct names of the target's direct children, instead of the target's content.
    clap(long, short, conflicts_with = "attrs")
    pub tags: bool,

    /// List the distinct attribute names of the target, instead of the target's content.
    clap(long, short)
    pub attrs: bool,

    /// Spaces per level of indentation.
    clap(long, default_value_t = 2)
    pub indent: usize,

    /// When to color tag and attribute names. Only the full-document rendering (`.`) is colored.
    clap(long, value_enum, default_value_t = ColorMode::Auto)
    pub color: ColorMode,

    /// Specifies the output format.
    clap(long, short, value_enum, default_value_t = OutputFormat::Plain)
    pub output: OutputFormat,

    /// How many bytes to read from the input at a time.
    clap(long, default_value_t = DEFAULT_CHUNK_SIZE, value_parser = RangedU64ValueParser::<usize>::new().range(1..))
    pub chunk_size: usize,

    /// Quiet: do not print anything to stdout. The exit code will still be 0 if anything matched, and non-0 if not.
    clap(long, short)
    pub quiet: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            tags: false,
            attrs: false,
            indent: 2,
            color: ColorMode::Auto,
            output: OutputFormat::Plain,
            chunk_size: DEFAULT_CHUNK_SIZE,
            quiet: false,
            query: ".".to_string(),
            xml_file_paths: vec![],
        }
    }
}

impl CliOptions {
    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }
}

/// When to color the rendered document, analogous to `--color` in the CLI.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum ColorMode {
    /// Color only if stdout is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl Display for ColorMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let self_str = match self {
            ColorMode::Auto => "auto",
            ColorMode::Always => "always",
            ColorMode::Never => "never",
        };
        f.write_str(self_str)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
