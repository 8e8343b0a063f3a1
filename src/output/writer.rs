use clap::ValueEnum;
use std::io;
use std::io::Write;

/// How result lines are written out.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum OutputFormat {
    /// One result per line.
    #[default]
    Plain,
    /// A single JSON array of strings.
    Json,
}

/// Writes result lines as they arrive. Call [`LineWriter::finish`] once all lines are in.
pub struct LineWriter<W: Write> {
    out: W,
    format: OutputFormat,
    written: usize,
}

impl<W: Write> LineWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            written: 0,
        }
    }

    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        match self.format {
            OutputFormat::Plain => {
                self.out.write_all(line.as_bytes())?;
                self.out.write_all(b"\n")?;
            }
            OutputFormat::Json => {
                self.out.write_all(if self.written == 0 { b"[" } else { b"," })?;
                serde_json::to_writer(&mut self.out, line)?;
            }
        }
        self.written += 1;
        Ok(())
    }

    /// How many lines have been written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn finish(mut self) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            if self.written == 0 {
                self.out.write_all(b"[")?;
            }
            self.out.write_all(b"]\n")?;
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_all(format: OutputFormat, lines: &[&str]) -> String {
        let mut bytes = Vec::new();
        let mut writer = LineWriter::new(&mut bytes, format);
        for line in lines {
            writer.write_line(line).unwrap();
        }
        assert_eq!(writer.written(), lines.len());
        writer.finish().unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn plain() {
        assert_eq!(write_all(OutputFormat::Plain, &["<b>", "  2", "</b>"]), "<b>\n  2\n</b>\n");
        assert_eq!(write_all(OutputFormat::Plain, &[]), "");
    }

    #[test]
    fn json() {
        assert_eq!(
            write_all(OutputFormat::Json, &["<b>", r#"say "hi""#]),
            "[\"<b>\",\"say \\\"hi\\\"\"]\n"
        );
    }

    #[test]
    fn json_empty() {
        assert_eq!(write_all(OutputFormat::Json, &[]), "[]\n");
    }
}
