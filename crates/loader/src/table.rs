/// One data row exactly as read from the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    row: usize,
    cells: Vec<String>,
}

impl RawRow {
    pub fn new(row: usize, cells: Vec<String>) -> Self {
        Self { row, cells }
    }

    /// 1-based data row number (the header is not counted).
    pub fn row(&self) -> usize {
        self.row
    }

    /// The cell at `index`, or `None` if the row is too short.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }
}

/// An ordered, untyped table: header names and rows of string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first header equal to `name` (case-sensitive).
    pub fn position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}
