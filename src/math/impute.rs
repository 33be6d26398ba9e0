//! Median imputation of missing feature values.

use crate::math::median;

/// A column with every missing cell replaced by the column median.
#[derive(Debug, Clone, PartialEq)]
pub struct ImputedColumn {
    pub values: Vec<f64>,
    /// Median of the non-missing input values (the fill value).
    pub median: f64,
    /// How many cells were filled.
    pub filled: usize,
}

/// Fill missing cells with the median of the present ones.
///
/// The median is computed once over the whole column, so every filled cell
/// gets the same value. Returns `None` if the column has no values at all.
pub fn impute_median(values: &[Option<f64>]) -> Option<ImputedColumn> {
    let median = median(values.iter().filter_map(|v| *v))?;
    let mut filled = 0;
    let values = values
        .iter()
        .map(|v| {
            v.unwrap_or_else(|| {
                filled += 1;
                median
            })
        })
        .collect();
    Some(ImputedColumn {
        values,
        median,
        filled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_missing_with_pre_imputation_median() {
        let col = impute_median(&[Some(1.0), None, Some(5.0), Some(3.0), None]).unwrap();
        assert_eq!(col.median, 3.0);
        assert_eq!(col.values, vec![1.0, 3.0, 5.0, 3.0, 3.0]);
        assert_eq!(col.filled, 2);
    }

    #[test]
    fn complete_column_is_unchanged() {
        let col = impute_median(&[Some(2.0), Some(4.0)]).unwrap();
        assert_eq!(col.values, vec![2.0, 4.0]);
        assert_eq!(col.filled, 0);
    }

    #[test]
    fn all_missing_column_cannot_be_imputed() {
        assert!(impute_median(&[None, None]).is_none());
    }
}
