//! Dirichlet border values and the order in which they are imposed.
//!
//! The four border regions overlap at the corners. Assignments are applied as
//! unconditional overwrites in a fixed order, so each corner ends up holding
//! the value of the last region that covers it.

use crate::field::TemperatureField;
use serde::{Deserialize, Serialize};

/// Constant temperature held on each side of the plate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BorderValues {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Default for BorderValues {
    fn default() -> Self {
        BorderValues::from((100.0, 70.0, 20.0, 10.0))
    }
}

/// `(top, left, bottom, right)`
impl From<(f64, f64, f64, f64)> for BorderValues {
    fn from((top, left, bottom, right): (f64, f64, f64, f64)) -> Self {
        BorderValues {
            top,
            left,
            bottom,
            right,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    /// Row `n - 1`, every column.
    TopRow,
    /// Column 0, every row.
    LeftColumn,
    /// Row 0, columns `1..n`.
    BottomRowFromSecondColumn,
    /// Column `n - 1`, every row.
    RightColumn,
}

impl Region {
    pub fn contains(self, row: usize, column: usize, size: usize) -> bool {
        let last = size - 1;
        match self {
            Region::TopRow => row == last,
            Region::LeftColumn => column == 0,
            Region::BottomRowFromSecondColumn => row == 0 && column >= 1,
            Region::RightColumn => column == last,
        }
    }
}

/// Ordered border assignments: top, left, bottom, right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BorderPlan {
    steps: [(Region, f64); 4],
}

impl BorderPlan {
    pub fn new(values: BorderValues) -> Self {
        BorderPlan {
            steps: [
                (Region::TopRow, values.top),
                (Region::LeftColumn, values.left),
                (Region::BottomRowFromSecondColumn, values.bottom),
                (Region::RightColumn, values.right),
            ],
        }
    }

    pub fn steps(&self) -> &[(Region, f64)] {
        &self.steps
    }

    /// Applies every assignment, in order, to all layers of `field`.
    pub fn apply(&self, field: &mut TemperatureField) {
        let n = field.size();
        for &(region, value) in &self.steps {
            field.fill_where_all_layers(value, |i, j| region.contains(i, j, n));
        }
    }

    /// Value a border cell holds after [`apply`](Self::apply), or `None` for
    /// interior cells.
    pub fn value_at(&self, row: usize, column: usize, size: usize) -> Option<f64> {
        self.steps
            .iter()
            .rev()
            .find(|(region, _)| region.contains(row, column, size))
            .map(|&(_, value)| value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_plan() -> BorderPlan {
        BorderPlan::new(BorderValues::from((100.0, 70.0, 20.0, 10.0)))
    }

    #[test]
    fn order_is_top_left_bottom_right() {
        let regions: Vec<Region> = reference_plan().steps().iter().map(|s| s.0).collect();
        assert_eq!(
            regions,
            vec![
                Region::TopRow,
                Region::LeftColumn,
                Region::BottomRowFromSecondColumn,
                Region::RightColumn
            ]
        );
    }

    #[test]
    fn corners_belong_to_last_writer() {
        let plan = reference_plan();
        let n = 5;
        assert_eq!(plan.value_at(0, 0, n), Some(70.0));
        assert_eq!(plan.value_at(0, n - 1, n), Some(10.0));
        assert_eq!(plan.value_at(n - 1, 0, n), Some(70.0));
        assert_eq!(plan.value_at(n - 1, n - 1, n), Some(10.0));
        assert_eq!(plan.value_at(0, 2, n), Some(20.0));
        assert_eq!(plan.value_at(n - 1, 2, n), Some(100.0));
        assert_eq!(plan.value_at(2, 2, n), None);
    }

    #[test]
    fn apply_matches_value_at_on_every_layer() {
        let plan = reference_plan();
        let mut field = TemperatureField::filled(3, 6, -1.0);
        plan.apply(&mut field);
        for k in 0..3 {
            for i in 0..6 {
                for j in 0..6 {
                    let expected = plan.value_at(i, j, 6).unwrap_or(-1.0);
                    assert_eq!(field.get(k, i, j), expected, "cell ({k}, {i}, {j})");
                }
            }
        }
    }
}
