use rustc_hash::FxHashMap;

/// Column names of a CSV file, as read from its first record
///
/// A column can only be resolved by name when its name appears exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvHeader {
    columns: Vec<String>,
    // `None` marks a name that appears more than once
    index: FxHashMap<String, Option<usize>>,
}

impl CsvHeader {
    /// Builds a header from nullable column names. Absent names become `""`
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns
            .into_iter()
            .map(|c| c.map(Into::into).unwrap_or_default())
            .collect();
        let mut index = FxHashMap::default();
        for (i, name) in columns.iter().enumerate() {
            index
                .entry(name.clone())
                .and_modify(|e| *e = None)
                .or_insert(Some(i));
        }
        CsvHeader { columns, index }
    }

    /// Builds a header where every column has a name
    pub fn from_names<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(columns.into_iter().map(Some))
    }

    /// Index of the column, if the name appears exactly once
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied().flatten()
    }

    /// Name of the column at `index`
    pub fn column_name(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(String::as_str)
    }

    /// Whether the name appears at least once, even if it cannot be resolved
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_unique_names() {
        let header = CsvHeader::from_names(["stop_id", "stop_name", "stop_code"]);
        assert_eq!(Some(1), header.column_index("stop_name"));
        assert_eq!(None, header.column_index("agency_id"));
        assert_eq!(Some("stop_code"), header.column_name(2));
        assert_eq!(None, header.column_name(3));
        assert_eq!(3, header.column_count());
    }

    #[test]
    fn duplicated_names_do_not_resolve() {
        let header = CsvHeader::new([None, Some("")]);
        assert_eq!(None, header.column_index(""));
        assert!(header.has_column(""));
        assert_eq!(2, header.column_count());

        let header = CsvHeader::from_names(["a", "b", "a"]);
        assert_eq!(None, header.column_index("a"));
        assert_eq!(Some(1), header.column_index("b"));
    }

    #[test]
    fn empty_header() {
        let header = CsvHeader::default();
        assert!(header.is_empty());
        assert_eq!(None, header.column_index(""));
    }
}
