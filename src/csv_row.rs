/// Spaces and tabs: a cell made only of them holds no value
pub(crate) fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// One record of a CSV file
///
/// Empty and absent cells are both `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvRow {
    line_number: u64,
    cells: Vec<Option<String>>,
}

impl CsvRow {
    pub fn new(line_number: u64, cells: Vec<Option<String>>) -> Self {
        CsvRow { line_number, cells }
    }

    /// 1-based line on which the record starts. The header is on line 1
    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    pub fn column_count(&self) -> usize {
        self.cells.len()
    }

    /// Raw value of the cell, `None` when empty or out of range
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }

    /// A row made of a single empty cell, what a blank line turns into
    pub fn is_blank(&self) -> bool {
        self.cells.len() == 1 && self.cells[0].is_none()
    }
}
