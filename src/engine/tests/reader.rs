//! Reads an .sql file that contains our integration tests.
//!
//! These files contain multiple tests that look like this:
//! ```sql
//! --       v______________________v--- this is the builder script
//! -- Test: from: users | s: users.id
//! SELECT
//!   id
//! FROM
//!   users;
//! ```
//! All tests start with "-- Test:" followed by the script on the same line. The next lines
//! until a blank line are the expected output. Every test starts from an empty query.
//!
//! The catalog is given as "CREATE TABLE" statements before the first test, each one ending
//! in a ";".
use crate::engine::catalog::Catalog;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::iter::{Enumerate, Peekable};
use std::ops::Range;
use std::path::PathBuf;

mod setup_parser;

type TestLineIterator = Peekable<Enumerate<Lines<BufReader<File>>>>;

pub struct SqlTestFileReader {
    pub file_path: PathBuf,
    /// The same catalog is used for all tests in the same .sql file.
    pub catalog: Catalog,
    lines: TestLineIterator,
}

impl Iterator for SqlTestFileReader {
    type Item = Result<Test, crate::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        for (line_nr, line_res) in self.lines.by_ref() {
            match line_res {
                Ok(line) if line.starts_with("-- Test: ") => {
                    return Some(self.create_test(line_nr, line));
                }
                Ok(_) => {
                    // Ignore this line: any line not in a -- Test: block is ignored.
                }
                Err(err) => {
                    return Some(Err(err.into()));
                }
            }
        }

        None
    }
}

impl SqlTestFileReader {
    pub fn new(file_path: PathBuf) -> Result<Self, crate::Error> {
        let file = File::open(&file_path)?;
        let reader = BufReader::new(file);

        let mut lines = reader.lines().enumerate().peekable();
        let catalog = setup_parser::read_catalog(&mut lines)?;

        Ok(SqlTestFileReader {
            lines,
            file_path,
            catalog,
        })
    }

    /// The script is on the "-- Test: " line itself, the following lines (until a blank line)
    /// are the expected output.
    fn create_test(&mut self, line_nr: usize, input_line: String) -> Result<Test, crate::Error> {
        let input_range = "-- Test: ".len()..input_line.len();
        let mut content = vec![input_line];

        for (_, line_res) in self.lines.by_ref() {
            let line = line_res?;

            if line.trim().is_empty() {
                // Empty line => end of test
                break;
            }

            content.push(line);
        }

        let content = content.join("\n");
        let output_start = (input_range.end + 1).min(content.len());

        Ok(Test {
            file: self.file_path.display().to_string(),
            line_nr: line_nr + 1, // they don't start at 0
            output_range: output_start..content.len(),
            content,
            input: input_range,
        })
    }
}

/// One of our integration tests.
pub struct Test {
    pub file: String,
    pub line_nr: usize,
    content: String,
    input: Range<usize>,
    output_range: Range<usize>,
}

impl Test {
    pub fn input(&self) -> &str {
        &self.content[self.input.clone()]
    }

    pub fn expected(&self) -> &str {
        &self.content[self.output_range.clone()]
    }
}
