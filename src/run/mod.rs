//! End-to-end runs.
//!
//! This module combines the [`crate::query`], [`crate::process`], and [`crate::output`] mods into a single workflow.
//! It's useful for building functionality like the CLI's, but running it within-process.
//!
//! ## Example
//!
//! ```
//! # use xq::run;
//!
//! // First, let's define a mocked I/O. Replace this with whatever you need.
//! #[derive(Default)]
//! struct MockIo {
//!     stdout: Vec<u8>,
//! }
//!
//! impl run::OsFacade for MockIo {
//!     fn open_stdin(&self) -> std::io::Result<run::InputReader> {
//!         Ok(Box::new(&b"<a><b>1</b><b>2</b></a>"[..]))
//!     }
//!
//!     fn open_file(&self, path: &str) -> std::io::Result<run::InputReader> {
//!         Err(std::io::Error::new(std::io::ErrorKind::NotFound, path.to_string()))
//!     }
//!
//!     fn stdout(&mut self) -> impl std::io::Write {
//!         &mut self.stdout
//!     }
//!
//!     fn stdout_is_terminal(&self) -> bool {
//!         false
//!     }
//!
//!     fn write_error(&mut self, err: run::Error) {
//!         eprintln!("{err}")
//!     }
//! }
//!
//! // Now, use it:
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//!
//! // Use the default options, but select the second <b> under <a>.
//! let mut run_options = run::RunOptions::default();
//! run_options.query = "a.b[1]".to_string();
//!
//! let mut os_facade = MockIo::default();
//! let found_any = run::run(&run_options, &mut os_facade);
//! let stdout_text = String::from_utf8(os_facade.stdout)?;
//!
//! assert_eq!(found_any, true);
//! assert_eq!(stdout_text, "<b>\n  2\n</b>\n");
//! #
//! #     Ok(())
//! # }
//! ```
mod cli;
mod run_main;

pub use cli::*;
pub use run_main::*;
