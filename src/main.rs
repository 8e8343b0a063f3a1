use clap::Parser;
use std::fs::File;
use std::io;
use std::io::{stdin, stdout, IsTerminal};
use std::process::ExitCode;
use xq::run::{CliOptions, Error, InputReader, OsFacade};

struct RealOs;

#[doc(hidden)]
impl OsFacade for RealOs {
    fn open_stdin(&self) -> io::Result<InputReader> {
        Ok(Box::new(stdin()))
    }

    fn open_file(&self, path: &str) -> io::Result<InputReader> {
        Ok(Box::new(File::open(path)?))
    }

    fn stdout(&mut self) -> impl io::Write {
        io::BufWriter::new(stdout().lock())
    }

    fn stdout_is_terminal(&self) -> bool {
        stdout().is_terminal()
    }

    fn write_error(&mut self, err: Error) {
        eprint!("{err}")
    }
}

fn main() -> ExitCode {
    let cli = CliOptions::parse();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(cli.log_level()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    if xq::run::run(&cli.into(), &mut RealOs) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
