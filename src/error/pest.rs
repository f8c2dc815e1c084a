use crate::error::{ErrorKind, PestError};
use ::pest::error::LineColLocation;
use colored::Colorize;
use std::fmt::{Display, Formatter};
use thiserror::Error;

#[derive(Debug, Error)]
pub struct WrappedPestError(PestError);

impl Display for WrappedPestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let error = &self.0;

        write!(
            f,
            "{line}\n\
             {underline} {message}\n\
             ",
            line = error.line(),
            underline = self.underline().red().bold(),
            message = error.variant.message().bold().red(),
        )?;

        Ok(())
    }
}

impl WrappedPestError {
    fn underline(&self) -> String {
        let line = self.0.line();

        // Columns are 1-based and counted in chars.
        match self.0.line_col {
            LineColLocation::Pos((_, column)) => {
                format!("{blank_indent}^", blank_indent = blank(line, column))
            }
            LineColLocation::Span((start_line, start), (end_line, end)) => {
                let width = if start_line == end_line && end > start {
                    end - start
                } else {
                    1
                };

                format!(
                    "{blank_indent}{underline}",
                    blank_indent = blank(line, start),
                    underline = "^".repeat(width),
                )
            }
        }
    }
}

fn blank(line: &str, column: usize) -> String {
    line.chars()
        .take(column.saturating_sub(1))
        // Tabs stay tabs, so the marker lines up with the line above.
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect()
}

impl From<PestError> for ErrorKind {
    fn from(value: PestError) -> Self {
        WrappedPestError(value).into()
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::syntax::parse_script;

    #[test]
    fn test_underline_points_at_the_error() {
        colored::control::set_override(false);

        let error = parse_script("from: users | nope").unwrap_err();
        let message = error.to_string();
        let mut lines = message.lines().skip(1);

        assert_eq!(lines.next(), Some("from: users | nope"));
        let underline = lines.next().unwrap_or_default();
        assert!(underline.starts_with(&format!("{}^ expected", " ".repeat(14))));
    }
}
