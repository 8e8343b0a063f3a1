use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::DirEntry;
use std::path::Path;
use std::{env, fs};

const XML_CASES_PATH: &str = "tests/xml_cases/";
const CASES_WRITE: &str = "tests/integ_test_cases.rs";

fn main() -> Result<(), String> {
    println!("cargo::rerun-if-changed={XML_CASES_PATH}");
    let out_dir = env::var("OUT_DIR").map_err(|e| format!("OUT_DIR: {e}"))?;

    generate_integ_test_cases(&out_dir)?;

    Ok(())
}

fn generate_integ_test_cases(out_dir: &str) -> Result<(), String> {
    let mut entries = fs::read_dir(XML_CASES_PATH)
        .map_err(|e| format!("{XML_CASES_PATH}: {e}"))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;
    entries.sort_by_key(DirEntry::file_name);

    let mut out = Writer::new();
    for entry in entries {
        let case_file = CaseFile::new(entry);
        if !case_file.run(DirEntry::file_type)?.is_file() {
            return Err(case_file.err_string("not a regular file"));
        }
        let contents = case_file.run(|f| fs::read_to_string(f.path()))?;
        let parsed: TestCaseFile = toml::from_str(&contents).map_err(|e| case_file.err_string(e))?;

        out.writes(&["mod ", &case_file.mod_name()?, " {"]);
        out.with_indent(|out| {
            out.write("use super::*;").nl().nl();

            out.write("const XML: &str = indoc::indoc! {r#\"");
            out.with_indent(|out| {
                let mut iter = parsed.given.xml.trim().split('\n').peekable();
                while let Some(line) = iter.next() {
                    out.nl().write(line);
                    if iter.peek().is_none() {
                        out.writeln("\"#};");
                    }
                }
            });

            let files = parsed.given.files.unwrap_or_default();
            out.write(&format!("const FILES: [(&str, &str); {}] = [", files.len()));
            if !files.is_empty() {
                out.with_indent(|out| {
                    for (file_name, file_content) in &files {
                        out.writeln(&format!("({file_name:?}, {file_content:?}),"));
                    }
                });
            }
            out.writeln("];");

            for (case_name, expect) in parsed.expect {
                Case::new(case_name, expect).write_test_fn_to(out);
            }
        });
        out.writeln("}");
    }

    let out_path = Path::new(out_dir).join(CASES_WRITE);
    let parent = out_path.parent().ok_or_else(|| "no parent dir found".to_string())?;
    fs::create_dir_all(parent).map_err(|e| format!("mkdirs on {}: {}", parent.to_string_lossy(), e))?;
    fs::write(&out_path, out.get()).map_err(|e| format!("writing to {}: {}", out_path.to_string_lossy(), e))?;

    Ok(())
}

struct CaseFile {
    dir_entry: DirEntry,
    path_lossy: String,
}

impl CaseFile {
    fn new(dir_entry: DirEntry) -> Self {
        let path_lossy = dir_entry.path().to_string_lossy().to_string();
        Self { dir_entry, path_lossy }
    }

    fn mod_name(&self) -> Result<String, String> {
        let file_name = self.dir_entry.file_name();
        Path::new(file_name.as_os_str())
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .ok_or_else(|| self.err_string("no file stem"))
    }

    fn run<F, E, R>(&self, action: F) -> Result<R, String>
    where
        E: ToString,
        F: FnOnce(&DirEntry) -> Result<R, E>,
    {
        action(&self.dir_entry).map_err(|e| self.err_string(e))
    }

    fn err_string<E: ToString>(&self, e: E) -> String {
        format!("{}: {}", self.path_lossy, e.to_string())
    }
}

#[derive(Deserialize)]
struct TestCaseFile {
    given: TestGiven,
    expect: BTreeMap<String, TestExpect>,
}

#[derive(Deserialize)]
struct TestGiven {
    xml: String,
    files: Option<BTreeMap<String, String>>,
}

#[derive(Deserialize)]
struct TestExpect {
    cli_args: Vec<String>,
    output: String,
    output_json: Option<bool>,
    expect_success: Option<bool>,
    ignore: Option<String>,
    output_err: Option<String>,
}

#[derive(Debug)]
struct Case {
    case_name: String,
    ignored: bool,
    cli_args: Vec<String>,
    expect_output: String,
    expect_error: String,
    output_json: bool,
    expect_success: bool,
}

impl Case {
    fn new(case_name: String, expect: TestExpect) -> Self {
        Self {
            case_name,
            ignored: expect.ignore.is_some(),
            cli_args: expect.cli_args,
            expect_output: expect.output,
            expect_error: expect.output_err.unwrap_or_default(),
            output_json: expect.output_json.unwrap_or(false),
            expect_success: expect.expect_success.unwrap_or(true),
        }
    }

    fn write_test_fn_to(&self, out: &mut Writer) {
        let fn_name = self
            .case_name
            .replace(|ch: char| !(ch.is_alphanumeric() || ch.is_whitespace()), "")
            .replace(|ch: char| ch.is_whitespace(), "_");
        if self.ignored {
            // split across two writes, so that a grep for ignored tests doesn't trip on this file
            out.write("#[ign");
            out.writeln("ore]");
        }
        out.writeln("#[test]");
        out.writes(&["fn ", &fn_name, "() {"]);
        out.with_indent(|out| {
            out.write("Case {");
            out.with_indent(|out| {
                out.writeln(&format!("cli_args: {:?},", &self.cli_args));
                out.writeln(&format!("expect_output_json: {},", self.output_json));
                Self::write_text_field(out, "expect_output", &self.expect_output);
                Self::write_text_field(out, "expect_error", &self.expect_error);
                out.writeln(&format!("expect_success: {},", self.expect_success));
                out.writeln("xml: XML,");
                out.write("files: &FILES,");
            });
            out.write("}.check();");
        });
        out.write("}").nl().nl();
    }

    fn write_text_field(out: &mut Writer, field: &str, text: &str) {
        if text.is_empty() {
            out.writeln(&format!("{field}: \"\","));
            return;
        }
        out.writes(&[field, ": indoc::indoc! {r#\""]);
        out.with_indent(|out| {
            let mut iter = text.split('\n').peekable();
            while let Some(line) = iter.next() {
                out.write(line);
                if iter.peek().is_some() {
                    out.nl();
                } else {
                    out.write("\"#},");
                }
            }
        });
    }
}

struct Writer {
    out: String,
    indent_level: usize,
}

impl Writer {
    fn new() -> Self {
        Self {
            out: String::with_capacity(512),
            indent_level: 0,
        }
    }

    fn with_indent<F>(&mut self, block: F)
    where
        F: FnOnce(&mut Self),
    {
        self.indent_level += 1;
        self.write("\n");
        block(self);
        self.indent_level -= 1;
        self.write("\n");
    }

    fn write(&mut self, text: &str) -> &mut Self {
        let mut iter = text.split('\n').peekable();
        while let Some(line) = iter.next() {
            self.out.push_str(line);
            if iter.peek().is_some() {
                self.out.push('\n');
                for _ in 0..self.indent_level {
                    self.out.push_str("    ");
                }
            }
        }
        self
    }

    fn writes(&mut self, items: &[&str]) -> &mut Self {
        for item in items {
            self.write(item);
        }
        self
    }

    fn writeln(&mut self, text: &str) {
        self.write(text);
        self.write("\n");
    }

    fn nl(&mut self) -> &mut Self {
        self.write("\n");
        self
    }

    fn get(&self) -> &str {
        &self.out
    }
}
