//! Wide → long reshaping for trend charts.
//!
//! `melt` walks the table year by year (column-major), yielding one record per
//! cell without copying any data. `entity_series` regroups those records into
//! one line per entity, which is what the chart front-ends draw.

use std::collections::HashMap;

use crate::domain::{LongRecord, Table, TrendSeries};

/// Lazy iterator over the long form of a table.
#[derive(Debug, Clone)]
pub struct Melt<'a> {
    table: &'a Table,
    col: usize,
    row: usize,
}

/// Reshape `table` into `(entity, year, value)` records.
///
/// Yields exactly `rows × (columns − 1)` records: every row of the first year
/// column, then every row of the second, and so on.
pub fn melt(table: &Table) -> Melt<'_> {
    Melt { table, col: 0, row: 0 }
}

impl<'a> Iterator for Melt<'a> {
    type Item = LongRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let n_rows = self.table.n_rows();
        if n_rows == 0 {
            return None;
        }
        let column = self.table.columns().get(self.col)?;
        let record = LongRecord {
            entity: &self.table.entities()[self.row],
            year: &column.name,
            value: column.values[self.row],
        };

        self.row += 1;
        if self.row == n_rows {
            self.row = 0;
            self.col += 1;
        }
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n_rows = self.table.n_rows();
        let remaining_cols = self.table.columns().len().saturating_sub(self.col);
        let n = if n_rows == 0 {
            0
        } else {
            (remaining_cols * n_rows).saturating_sub(self.row)
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for Melt<'_> {}

/// Group the long records into one series per entity (first-seen order).
///
/// Rows sharing an entity name end up in the same series, in row order within
/// each year.
pub fn entity_series(table: &Table) -> Vec<TrendSeries> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut series: Vec<TrendSeries> = Vec::new();

    for entity in table.entities() {
        if !index.contains_key(entity.as_str()) {
            index.insert(entity.as_str(), series.len());
            series.push(TrendSeries {
                entity: entity.clone(),
                points: Vec::new(),
            });
        }
    }

    // Year-major traversal keeps each series' points sorted by column order.
    for record in melt(table) {
        if let Some(&slot) = index.get(record.entity) {
            series[slot]
                .points
                .push((record.year.to_string(), record.value));
        }
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NumericColumn;

    fn table() -> Table {
        Table::new(
            "Provinsi",
            vec!["Aceh".into(), "Bali".into(), "Aceh".into()],
            vec![
                NumericColumn::new("1993", vec![Some(1.0), Some(2.0), Some(3.0)]),
                NumericColumn::new("1994", vec![None, Some(5.0), Some(6.0)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn melt_yields_rows_times_year_columns() {
        let table = table();
        let records: Vec<_> = melt(&table).collect();
        assert_eq!(records.len(), table.n_rows() * (table.n_columns() - 1));
        assert_eq!(melt(&table).len(), 6);
    }

    #[test]
    fn melt_is_year_major() {
        let table = table();
        let records: Vec<_> = melt(&table).collect();
        assert_eq!(
            records[0],
            LongRecord { entity: "Aceh", year: "1993", value: Some(1.0) }
        );
        assert_eq!(records[2].entity, "Aceh");
        assert_eq!(records[2].year, "1993");
        assert_eq!(
            records[3],
            LongRecord { entity: "Aceh", year: "1994", value: None }
        );
    }

    #[test]
    fn melt_of_empty_table_is_empty() {
        let table = Table::new("id", Vec::new(), vec![NumericColumn::new("1993", Vec::new())]).unwrap();
        assert_eq!(melt(&table).count(), 0);
    }

    #[test]
    fn series_follow_first_seen_entity_order() {
        let series = entity_series(&table());
        let names: Vec<_> = series.iter().map(|s| s.entity.as_str()).collect();
        assert_eq!(names, vec!["Aceh", "Bali"]);

        assert_eq!(
            series[0].points,
            vec![
                ("1993".to_string(), Some(1.0)),
                ("1993".to_string(), Some(3.0)),
                ("1994".to_string(), None),
                ("1994".to_string(), Some(6.0)),
            ]
        );
        assert_eq!(
            series[1].points,
            vec![("1993".to_string(), Some(2.0)), ("1994".to_string(), Some(5.0))]
        );
    }
}
