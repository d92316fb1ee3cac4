use serde::Serialize;

use super::ParameterRecord;

/// A year-ordered table of parameter records for one scenario.
///
/// Records are sorted ascending by year on construction and years are unique:
/// when the source contains the same year twice, the first record read is kept.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioTable {
    /// Name of the source this table was parsed from
    pub name: String,
    records: Vec<ParameterRecord>,
}

impl ScenarioTable {
    /// Build a table from records in any order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndvi_scenario_simulator::{ParameterRecord, ScenarioTable};
    ///
    /// let table = ScenarioTable::new(
    ///     "up",
    ///     vec![
    ///         ParameterRecord::new(2021, 1.0, 0.1, 1.0, 0.3),
    ///         ParameterRecord::new(2019, 1.0, 0.1, 1.0, 0.3),
    ///         ParameterRecord::new(2020, 1.0, 0.1, 1.0, 0.3),
    ///     ],
    /// );
    /// assert_eq!(table.years(), vec![2019, 2020, 2021]);
    /// ```
    pub fn new(name: impl Into<String>, mut records: Vec<ParameterRecord>) -> Self {
        let name = name.into();
        records.sort_by_key(|r| r.year);
        records.dedup_by(|later, kept| {
            let duplicate = later.year == kept.year;
            if duplicate {
                tracing::warn!(
                    source = %name,
                    year = later.year,
                    "duplicate year, keeping the first record"
                );
            }
            duplicate
        });
        Self { name, records }
    }

    pub fn records(&self) -> &[ParameterRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParameterRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&ParameterRecord> {
        self.records.first()
    }

    /// Years in table order.
    pub fn years(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.year).collect()
    }

    /// Row index of `year`, found by binary search over the sorted records.
    pub fn index_of_year(&self, year: i32) -> Option<usize> {
        self.records.binary_search_by_key(&year, |r| r.year).ok()
    }

    /// Record for `year`, if present.
    pub fn get(&self, year: i32) -> Option<&ParameterRecord> {
        self.index_of_year(year).map(|i| &self.records[i])
    }
}

impl<'a> IntoIterator for &'a ScenarioTable {
    type Item = &'a ParameterRecord;
    type IntoIter = std::slice::Iter<'a, ParameterRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(year: i32, forcing: f64) -> ParameterRecord {
        ParameterRecord::new(year, forcing, 0.1, 1.0, 0.5)
    }

    #[test]
    fn test_sorted_on_construction() {
        let table = ScenarioTable::new("t", vec![rec(2021, 1.0), rec(2019, 2.0), rec(2020, 3.0)]);
        assert_eq!(table.years(), vec![2019, 2020, 2021]);
        assert_eq!(table.records()[0].forcing, 2.0);
    }

    #[test]
    fn test_duplicate_year_keeps_first_seen() {
        let table = ScenarioTable::new(
            "t",
            vec![rec(2020, 1.0), rec(2019, 9.0), rec(2020, 2.0), rec(2020, 3.0)],
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(2020).unwrap().forcing, 1.0);
    }

    #[test]
    fn test_index_of_year() {
        let table = ScenarioTable::new("t", vec![rec(2030, 0.0), rec(2010, 0.0), rec(2020, 0.0)]);
        assert_eq!(table.index_of_year(2010), Some(0));
        assert_eq!(table.index_of_year(2020), Some(1));
        assert_eq!(table.index_of_year(2030), Some(2));
        assert_eq!(table.index_of_year(2025), None);
    }

    #[test]
    fn test_empty_table() {
        let table = ScenarioTable::new("empty", vec![]);
        assert!(table.is_empty());
        assert!(table.first().is_none());
        assert!(table.get(2020).is_none());
    }

    #[test]
    fn test_iterates_in_year_order() {
        let table = ScenarioTable::new("t", vec![rec(2002, 0.0), rec(2001, 0.0)]);
        let years: Vec<i32> = (&table).into_iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2001, 2002]);
    }
}
