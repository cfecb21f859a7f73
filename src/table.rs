//! Plain-text tables built from `(header, extractor)` columns.
//!
//! List tools render their results with a [`Table`] so a reader sees the same
//! display forms (formatted CPF, phone, currency, dates) as on screen.

use unicode_width::UnicodeWidthStr;

/// Horizontal alignment of a column's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// One column: a header and a function producing the cell text for a row.
pub struct Column<T> {
    pub header: String,
    pub extract: Box<dyn Fn(&T) -> String + Send + Sync>,
    pub align: Align,
}

impl<T> Column<T> {
    pub fn new(
        header: impl Into<String>,
        extract: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            header: header.into(),
            extract: Box::new(extract),
            align: Align::Left,
        }
    }

    /// Right-aligned column, for amounts and counts.
    pub fn right(
        header: impl Into<String>,
        extract: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            align: Align::Right,
            ..Self::new(header, extract)
        }
    }
}

/// A table definition, reusable across row sets.
pub struct Table<T> {
    columns: Vec<Column<T>>,
    empty_message: String,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Table<T> {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            empty_message: "Nenhum registro encontrado.".to_string(),
        }
    }

    pub fn column(mut self, column: Column<T>) -> Self {
        self.columns.push(column);
        self
    }

    /// Text rendered instead of a table when there are no rows.
    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    /// Cell text for every row, without layout.
    pub fn cells(&self, rows: &[T]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| sanitize(&(c.extract)(row)))
                    .collect()
            })
            .collect()
    }

    /// Render rows as a box-drawn table.
    pub fn render(&self, rows: &[T]) -> String {
        if rows.is_empty() || self.columns.is_empty() {
            return self.empty_message.clone();
        }

        let cells = self.cells(rows);
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                cells
                    .iter()
                    .map(|row| row[i].width())
                    .chain(std::iter::once(col.header.width()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&border(&widths, '┌', '┬', '┐'));
        let headers: Vec<String> = self.columns.iter().map(|c| c.header.clone()).collect();
        let header_align = vec![Align::Left; widths.len()];
        out.push_str(&line(&headers, &widths, &header_align));
        out.push_str(&border(&widths, '├', '┼', '┤'));

        let aligns: Vec<Align> = self.columns.iter().map(|c| c.align).collect();
        for row in &cells {
            out.push_str(&line(row, &widths, &aligns));
        }
        out.push_str(&border(&widths, '└', '┴', '┘'));
        out
    }
}

/// Cells are single-line.
fn sanitize(cell: &str) -> String {
    cell.trim().replace(['\n', '\r'], " ")
}

fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let mut s = String::new();
    s.push(left);
    for (i, w) in widths.iter().enumerate() {
        s.push_str(&"─".repeat(w + 2));
        if i + 1 < widths.len() {
            s.push(mid);
        }
    }
    s.push(right);
    s.push('\n');
    s
}

fn line(cells: &[String], widths: &[usize], aligns: &[Align]) -> String {
    let mut s = String::from("│");
    for ((cell, width), align) in cells.iter().zip(widths).zip(aligns) {
        let padding = " ".repeat(width.saturating_sub(cell.width()));
        match align {
            Align::Left => s.push_str(&format!(" {}{} │", cell, padding)),
            Align::Right => s.push_str(&format!(" {}{} │", padding, cell)),
        }
    }
    s.push('\n');
    s
}
