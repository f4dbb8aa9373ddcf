//! Statement results.

use tessera_common::{DbError, StatusCode};
use tessera_types::Value;

/// Outcome of one statement as reported to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    status: StatusCode,
    message: Option<String>,
    affected_rows: Option<usize>,
    header: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Default for SqlResult {
    fn default() -> Self {
        Self::success()
    }
}

impl SqlResult {
    /// A success without a row count.
    pub fn success() -> Self {
        Self {
            status: StatusCode::Success,
            message: None,
            affected_rows: None,
            header: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// A mutation that touched `rows` rows.
    pub fn affected(rows: usize) -> Self {
        Self {
            affected_rows: Some(rows),
            ..Self::success()
        }
    }

    /// A query result.
    pub fn query(header: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            affected_rows: Some(rows.len()),
            header,
            rows,
            ..Self::success()
        }
    }

    /// A failed statement. Carries no rows.
    pub fn failure(error: &DbError) -> Self {
        Self {
            status: error.code(),
            message: Some(error.to_string()),
            affected_rows: None,
            header: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Status code.
    #[inline]
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns true on success.
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Error message of a failed statement.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Rows inserted, updated, deleted or returned.
    #[inline]
    #[must_use]
    pub fn affected_rows(&self) -> Option<usize> {
        self.affected_rows
    }

    /// Column names of a query result.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Rows of a query result.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Renders the result as text.
    pub fn display(&self) -> String {
        if !self.is_success() {
            return match &self.message {
                Some(message) => format!("FAILURE {}: {message}", self.status),
                None => format!("FAILURE {}", self.status),
            };
        }
        if self.header.is_empty() {
            return match self.affected_rows {
                Some(n) => format!("SUCCESS ({n} rows)"),
                None => "SUCCESS".to_string(),
            };
        }

        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(Value::to_string).collect())
            .collect();
        let mut widths: Vec<usize> = self.header.iter().map(String::len).collect();
        for row in &rendered {
            for (i, cell) in row.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.len());
                }
            }
        }

        let mut output = String::new();
        push_line(&mut output, &self.header, &widths);
        for (i, width) in widths.iter().enumerate() {
            if i > 0 {
                output.push_str("-+-");
            }
            output.push_str(&"-".repeat(*width));
        }
        output.push('\n');
        for row in &rendered {
            push_line(&mut output, row, &widths);
        }
        output.push_str(&format!("({} rows)\n", self.rows.len()));
        output
    }
}

fn push_line(output: &mut String, cells: &[String], widths: &[usize]) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            output.push_str(" | ");
        }
        let width = widths.get(i).copied().unwrap_or(0);
        output.push_str(&format!("{cell:width$}"));
    }
    output.push('\n');
}
