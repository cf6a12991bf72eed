use crate::schema::ColumnDescriptor;
use rustc_hash::FxHashSet;
use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;

/// Interning store for parsed values
///
/// Structurally equal values collapse to the first stored instance. A cache lives
/// for one table load; there is no eviction.
#[derive(Debug)]
pub struct ValueCache<T> {
    values: FxHashSet<T>,
    call_count: usize,
}

impl<T> Default for ValueCache<T> {
    fn default() -> Self {
        ValueCache {
            values: FxHashSet::default(),
            call_count: 0,
        }
    }
}

impl<T: Eq + Hash + Clone> ValueCache<T> {
    /// Returns the stored instance equal to `value`, storing `value` first if there is none
    pub fn intern(&mut self, value: T) -> T {
        self.call_count += 1;
        if let Some(stored) = self.values.get(&value) {
            return stored.clone();
        }
        self.values.insert(value.clone());
        value
    }

    /// Same as [ValueCache::intern] but only builds the value when it is not stored yet
    pub fn intern_with<Q>(&mut self, key: &Q, make: impl FnOnce(&Q) -> T) -> T
    where
        T: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.call_count += 1;
        if let Some(stored) = self.values.get(key) {
            return stored.clone();
        }
        let value = make(key);
        self.values.insert(value.clone());
        value
    }

    /// Number of distinct values stored
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Number of calls to the intern functions
    pub fn call_count(&self) -> usize {
        self.call_count
    }
}

impl ValueCache<Arc<str>> {
    /// Converts a parsed text value, interning it only if the column asks for it
    pub fn intern_text(
        &mut self,
        column: &ColumnDescriptor,
        value: Option<String>,
    ) -> Option<Arc<str>> {
        value.map(|v| {
            if column.cached {
                self.intern_with(v.as_str(), |s| Arc::from(s))
            } else {
                Arc::from(v)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldLevel;

    #[test]
    fn returns_first_instance() {
        let mut cache: ValueCache<Arc<str>> = ValueCache::default();
        let first: Arc<str> = Arc::from("s1");
        let second: Arc<str> = Arc::from(String::from("s1"));
        assert!(!Arc::ptr_eq(&first, &second));

        let a = cache.intern(first.clone());
        let b = cache.intern(second);
        let c = cache.intern_with("s1", |s| Arc::from(s));
        assert!(Arc::ptr_eq(&a, &first));
        assert!(Arc::ptr_eq(&b, &first));
        assert!(Arc::ptr_eq(&c, &first));
        assert_eq!(1, cache.size());
        assert_eq!(3, cache.call_count());
    }

    #[test]
    fn counts_distinct_values() {
        let mut cache = ValueCache::default();
        assert_eq!(4, cache.intern(4));
        assert_eq!(5, cache.intern(5));
        assert_eq!(4, cache.intern(4));
        assert_eq!(2, cache.size());
        assert_eq!(3, cache.call_count());
    }

    #[test]
    fn interns_only_cached_columns() {
        let mut cache: ValueCache<Arc<str>> = ValueCache::default();
        let plain = ColumnDescriptor::new("stop_name", FieldLevel::Optional);
        let cached = ColumnDescriptor::new("zone_id", FieldLevel::Optional).cached();

        let a = cache.intern_text(&plain, Some("z".to_owned())).unwrap();
        let b = cache.intern_text(&cached, Some("z".to_owned())).unwrap();
        let c = cache.intern_text(&cached, Some("z".to_owned())).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&b, &c));
        assert_eq!(None, cache.intern_text(&cached, None));
        assert_eq!(2, cache.call_count());
    }
}
