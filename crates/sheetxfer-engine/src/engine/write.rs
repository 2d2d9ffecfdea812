//! Single-cell writes.

use std::sync::Arc;

use super::cell::{CellValue, Grid, Row};

/// Return a copy of `grid` with `(row, col)` set to `value`.
///
/// Missing rows are appended as empty rows and the target row alone is padded
/// with `Empty` cells up to `col`. Every other cell keeps its value and
/// position. The input grid is never modified; untouched rows are shared with
/// the result.
pub fn write_cell(grid: &Grid, row: usize, col: usize, value: CellValue) -> Grid {
    let mut out = grid.clone();
    let rows = out.rows_mut();

    if rows.len() <= row {
        rows.resize_with(row + 1, || Arc::new(Row::new()));
    }

    let target = Arc::make_mut(&mut rows[row]);
    if target.len() <= col {
        target.resize(col + 1, CellValue::Empty);
    }
    target[col] = value;

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn text(s: &str) -> CellValue {
        CellValue::text(s)
    }

    #[test]
    fn test_write_pads_rows_and_columns() {
        let grid = Grid::from_rows(vec![vec![text("H1"), text("H2")]]);
        let out = write_cell(&grid, 2, 3, CellValue::Number(15.0));
        assert_eq!(
            out.to_rows(),
            vec![
                vec![text("H1"), text("H2")],
                vec![],
                vec![
                    CellValue::Empty,
                    CellValue::Empty,
                    CellValue::Empty,
                    CellValue::Number(15.0)
                ],
            ]
        );
    }

    #[test]
    fn test_write_leaves_input_untouched() {
        let grid = Grid::from_rows(vec![vec![text("a"), text("b")], vec![text("c")]]);
        let before = grid.to_rows();
        let out = write_cell(&grid, 0, 1, CellValue::Number(1.0));
        assert_eq!(grid.to_rows(), before);
        assert_eq!(out.cell(0, 1), Some(&CellValue::Number(1.0)));
    }

    #[test]
    fn test_write_copies_only_target_row() {
        let grid = Grid::from_rows(vec![vec![text("a")], vec![text("b")], vec![text("c")]]);
        let out = write_cell(&grid, 1, 0, CellValue::Number(2.0));
        assert!(out.shares_row_with(&grid, 0));
        assert!(!out.shares_row_with(&grid, 1));
        assert!(out.shares_row_with(&grid, 2));
    }

    #[test]
    fn test_write_does_not_widen_other_rows() {
        let grid = Grid::from_rows(vec![vec![text("a")], vec![text("b")]]);
        let out = write_cell(&grid, 0, 4, CellValue::Number(9.0));
        assert_eq!(out.row(0).map(|r| r.len()), Some(5));
        assert_eq!(out.row(1).map(|r| r.len()), Some(1));
    }

    #[test]
    fn test_write_into_empty_grid() {
        let out = write_cell(&Grid::new(), 0, 0, text("x"));
        assert_eq!(out.to_rows(), vec![vec![text("x")]]);
    }

    #[test]
    fn test_write_replaces_existing_cell() {
        let grid = Grid::from_rows(vec![vec![text("a"), text("b"), text("c")]]);
        let out = write_cell(&grid, 0, 1, CellValue::Number(3.0));
        assert_eq!(
            out.to_rows(),
            vec![vec![text("a"), CellValue::Number(3.0), text("c")]]
        );
    }

    fn arb_cell() -> impl Strategy<Value = CellValue> {
        prop_oneof![
            Just(CellValue::Empty),
            (-1000.0f64..1000.0).prop_map(CellValue::Number),
            "[a-z]{0,4}".prop_map(CellValue::Text),
        ]
    }

    fn arb_grid() -> impl Strategy<Value = Vec<Vec<CellValue>>> {
        proptest::collection::vec(proptest::collection::vec(arb_cell(), 0..5), 0..6)
    }

    proptest! {
        #[test]
        fn prop_write_sets_target_and_preserves_others(
            rows in arb_grid(),
            r in 0usize..8,
            c in 0usize..8,
            v in -1000.0f64..1000.0,
        ) {
            let grid = Grid::from_rows(rows.clone());
            let out = write_cell(&grid, r, c, CellValue::Number(v));

            prop_assert_eq!(out.cell(r, c), Some(&CellValue::Number(v)));
            for (i, row) in rows.iter().enumerate() {
                for (j, cell) in row.iter().enumerate() {
                    if (i, j) != (r, c) {
                        prop_assert_eq!(out.cell(i, j), Some(cell));
                    }
                }
                if i != r {
                    prop_assert_eq!(out.row(i).map(|x| x.len()), Some(row.len()));
                }
            }
            prop_assert_eq!(grid.to_rows(), rows);
        }

        #[test]
        fn prop_write_is_idempotent(
            rows in arb_grid(),
            r in 0usize..8,
            c in 0usize..8,
            v in arb_cell(),
        ) {
            let grid = Grid::from_rows(rows);
            let once = write_cell(&grid, r, c, v.clone());
            let twice = write_cell(&once, r, c, v);
            prop_assert_eq!(once, twice);
        }
    }
}
