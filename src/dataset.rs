//! The normalized, read-only sales table.
//!
//! A [`Dataset`] is built once by the loader and then shared (by reference or
//! behind an `Arc`) with every query. Nothing in the crate mutates it after
//! construction, so concurrent read-only use needs no locking.

use crate::types::TransactionRecord;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<TransactionRecord>,
}

impl Dataset {
    pub fn new(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Calendar years present in the table, ascending. Feeds the year dropdown.
    pub fn years(&self) -> BTreeSet<i32> {
        self.records.iter().map(|r| r.year).collect()
    }

    /// County names for the county multi-select.
    pub fn counties(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.county.as_str()).collect()
    }

    /// Item descriptions for the product multi-select.
    pub fn products(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.item_description.as_str()).collect()
    }

    pub fn n_categories(&self) -> usize {
        self.distinct(|r| r.category_name.as_str())
    }

    pub fn n_stores(&self) -> usize {
        self.distinct(|r| r.store_name.as_str())
    }

    pub fn n_counties(&self) -> usize {
        self.distinct(|r| r.county.as_str())
    }

    fn distinct<'a, F>(&'a self, f: F) -> usize
    where
        F: Fn(&'a TransactionRecord) -> &'a str,
    {
        self.records.iter().map(f).collect::<BTreeSet<_>>().len()
    }
}

#[cfg(test)]
mod tests {
    use crate::test::fixture;

    #[test]
    fn option_lists_are_sorted_and_unique() {
        let ds = fixture();
        assert_eq!(ds.years().into_iter().collect::<Vec<_>>(), vec![2021]);
        assert_eq!(
            ds.counties().into_iter().collect::<Vec<_>>(),
            vec!["LINN", "POLK"]
        );
        assert_eq!(ds.n_counties(), 2);
        assert_eq!(ds.n_stores(), 3);
        assert_eq!(ds.n_categories(), 2);
        assert_eq!(ds.products().len(), 3);
    }
}
