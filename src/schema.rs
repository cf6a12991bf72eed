//! Description of a GTFS file, from which the generic loader builds its entities
use crate::row_parser::RowParser;
use crate::types::KeyValue;
use crate::value_cache::ValueCache;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// How much a value is expected, which sets the severity of its absence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldLevel {
    Required,
    Recommended,
    Optional,
}

/// Constraint on the sign of a number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumberBounds {
    NonNegative,
    NonZero,
    Positive,
}

impl NumberBounds {
    /// Human readable form, used in notices
    pub fn description(&self) -> &'static str {
        match self {
            NumberBounds::NonNegative => ">= 0",
            NumberBounds::NonZero => "!= 0",
            NumberBounds::Positive => "> 0",
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        match self {
            NumberBounds::NonNegative => value >= 0.0,
            NumberBounds::NonZero => value != 0.0,
            NumberBounds::Positive => value > 0.0,
        }
    }

    pub fn contains_decimal(&self, value: &Decimal) -> bool {
        match self {
            NumberBounds::NonNegative => !value.is_sign_negative() || value.is_zero(),
            NumberBounds::NonZero => !value.is_zero(),
            NumberBounds::Positive => value.is_sign_positive() && !value.is_zero(),
        }
    }
}

/// Column of a table, as described by the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: &'static str,
    /// The header must contain the column
    pub header_required: bool,
    /// The header should contain the column
    pub header_recommended: bool,
    pub field_level: FieldLevel,
    pub bounds: Option<NumberBounds>,
    /// Values are interned in the [ValueCache] of the load
    pub cached: bool,
    /// Values are names that should not be written all in upper or lower case
    pub mixed_case: bool,
}

impl ColumnDescriptor {
    /// A column whose presence in the header follows its field level
    pub fn new(name: &'static str, field_level: FieldLevel) -> Self {
        ColumnDescriptor {
            name,
            header_required: field_level == FieldLevel::Required,
            header_recommended: field_level == FieldLevel::Recommended,
            field_level,
            bounds: None,
            cached: false,
            mixed_case: false,
        }
    }

    pub fn required(name: &'static str) -> Self {
        Self::new(name, FieldLevel::Required)
    }

    pub fn recommended(name: &'static str) -> Self {
        Self::new(name, FieldLevel::Recommended)
    }

    pub fn optional(name: &'static str) -> Self {
        Self::new(name, FieldLevel::Optional)
    }

    pub fn bounds(mut self, bounds: NumberBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn cached(mut self) -> Self {
        self.cached = true;
        self
    }

    pub fn mixed_case(mut self) -> Self {
        self.mixed_case = true;
        self
    }

    /// The column must be in the header even though its values may be empty
    pub fn header_required(mut self) -> Self {
        self.header_required = true;
        self
    }
}

/// An entity built from one row
pub trait GtfsEntity {
    /// Line of the row the entity was built from
    fn csv_row_number(&self) -> u64;

    /// Value of a column used in a key, `None` when the value is missing
    fn key_value(&self, column: &str) -> Option<KeyValue>;
}

/// Receives the values of one row and turns them into an entity
pub trait EntityBuilder: Default {
    type Entity: GtfsEntity;

    fn set_csv_row_number(&mut self, csv_row_number: u64);

    /// Returns the entity and leaves the builder ready for the next row
    fn build(&mut self) -> Self::Entity;

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Parses the value of one column and stores it in the builder
pub type FieldLoader<B> =
    fn(&mut RowParser<'_>, usize, &ColumnDescriptor, &mut ValueCache<Arc<str>>, &mut B);

/// A non-unique index over one or more columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDescriptor {
    pub name: &'static str,
    pub columns: Vec<&'static str>,
}

/// Columns identifying an entity from translations.txt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationKey {
    pub record_id: &'static str,
    pub record_sub_id: Option<&'static str>,
}

/// Everything the loader needs to know about one file
///
/// ```
/// use gtfs_tables::{ColumnDescriptor, TableSchema, Stop};
///
/// let schema = TableSchema::<Stop>::new("stops.txt")
///     .required_file()
///     .field(ColumnDescriptor::required("stop_id"), |parser, i, column, cache, stop| {
///         stop.stop_id = cache.intern_text(column, parser.as_id(i, column));
///     })
///     .primary_key(&["stop_id"]);
/// assert_eq!(&["stop_id"], schema.primary_key_columns());
/// ```
pub struct TableSchema<B> {
    filename: &'static str,
    columns: Vec<ColumnDescriptor>,
    field_loaders: FxHashMap<&'static str, FieldLoader<B>>,
    new_builder: fn() -> B,
    required: bool,
    recommended: bool,
    max_chars_per_column: Option<usize>,
    primary_key: Vec<&'static str>,
    indices: Vec<IndexDescriptor>,
    translation_key: Option<TranslationKey>,
}

impl<B: EntityBuilder> TableSchema<B> {
    /// An optional file without columns
    pub fn new(filename: &'static str) -> Self {
        TableSchema {
            filename,
            columns: Vec::new(),
            field_loaders: FxHashMap::default(),
            new_builder: B::default,
            required: false,
            recommended: false,
            max_chars_per_column: None,
            primary_key: Vec::new(),
            indices: Vec::new(),
            translation_key: None,
        }
    }

    pub fn with_builder_factory(mut self, new_builder: fn() -> B) -> Self {
        self.new_builder = new_builder;
        self
    }

    pub fn required_file(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn recommended_file(mut self) -> Self {
        self.recommended = true;
        self
    }

    pub fn with_max_chars_per_column(mut self, limit: Option<usize>) -> Self {
        self.max_chars_per_column = limit;
        self
    }

    /// Adds a column and the function loading its values
    pub fn field(mut self, column: ColumnDescriptor, loader: FieldLoader<B>) -> Self {
        debug_assert!(
            !self.field_loaders.contains_key(column.name),
            "column {} declared twice in {}",
            column.name,
            self.filename
        );
        self.field_loaders.insert(column.name, loader);
        self.columns.push(column);
        self
    }

    /// Unique key; later entities with the same key are reported as duplicates
    pub fn primary_key(mut self, columns: &[&'static str]) -> Self {
        debug_assert!(columns.iter().all(|c| self.field_loaders.contains_key(c)));
        self.primary_key = columns.to_vec();
        self
    }

    /// Non-unique key
    pub fn index(mut self, name: &'static str, columns: &[&'static str]) -> Self {
        debug_assert!(columns.iter().all(|c| self.field_loaders.contains_key(c)));
        self.indices.push(IndexDescriptor {
            name,
            columns: columns.to_vec(),
        });
        self
    }

    pub fn translation_key(
        mut self,
        record_id: &'static str,
        record_sub_id: Option<&'static str>,
    ) -> Self {
        self.translation_key = Some(TranslationKey {
            record_id,
            record_sub_id,
        });
        self
    }

    pub fn filename(&self) -> &'static str {
        self.filename
    }

    /// Columns in declaration order
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn column_descriptor(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn field_loader(&self, name: &str) -> Option<FieldLoader<B>> {
        self.field_loaders.get(name).copied()
    }

    pub fn new_builder(&self) -> B {
        (self.new_builder)()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_recommended(&self) -> bool {
        self.recommended
    }

    pub fn max_chars_per_column(&self) -> Option<usize> {
        self.max_chars_per_column
    }

    pub fn primary_key_columns(&self) -> &[&'static str] {
        &self.primary_key
    }

    pub fn indices(&self) -> &[IndexDescriptor] {
        &self.indices
    }

    pub fn translation_key_columns(&self) -> Option<TranslationKey> {
        self.translation_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds() {
        assert!(NumberBounds::NonNegative.contains(0.0));
        assert!(!NumberBounds::NonNegative.contains(-0.5));
        assert!(!NumberBounds::NonZero.contains(0.0));
        assert!(NumberBounds::NonZero.contains(-3.0));
        assert!(!NumberBounds::Positive.contains(0.0));

        let zero = Decimal::ZERO;
        let negative = Decimal::new(-150, 2);
        assert!(NumberBounds::NonNegative.contains_decimal(&zero));
        assert!(NumberBounds::NonNegative.contains_decimal(&-zero));
        assert!(!NumberBounds::NonNegative.contains_decimal(&negative));
        assert!(!NumberBounds::Positive.contains_decimal(&zero));
        assert!(NumberBounds::Positive.contains_decimal(&Decimal::new(1, 3)));
        assert!(!NumberBounds::NonZero.contains_decimal(&zero));
    }

    #[test]
    fn descriptor_levels() {
        let required = ColumnDescriptor::required("stop_id");
        assert!(required.header_required);
        assert!(!required.header_recommended);

        let recommended = ColumnDescriptor::recommended("stop_desc");
        assert!(!recommended.header_required);
        assert!(recommended.header_recommended);

        let transfers = ColumnDescriptor::optional("transfers").header_required();
        assert!(transfers.header_required);
        assert_eq!(FieldLevel::Optional, transfers.field_level);
    }
}
