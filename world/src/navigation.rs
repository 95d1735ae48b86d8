//! Breadth-first distance fields used to project mobile unit paths.

use std::collections::VecDeque;

use rampart_core::CellCoord;

/// Marker for cells that cannot reach any exit.
const UNREACHABLE: u32 = u32::MAX;

/// Step distance from every cell of a grid to the nearest exit cell.
#[derive(Clone, Debug, Default)]
pub(crate) struct DistanceField {
    width: u32,
    height: u32,
    steps: Vec<u32>,
}

impl DistanceField {
    /// Floods outward from `exits`, never entering cells for which
    /// `is_blocked` holds. Blocked exits are ignored.
    pub(crate) fn flood<F>(width: u32, height: u32, exits: &[CellCoord], is_blocked: F) -> Self
    where
        F: Fn(CellCoord) -> bool,
    {
        let mut field = Self {
            width,
            height,
            steps: vec![UNREACHABLE; (width as usize) * (height as usize)],
        };

        let mut frontier = VecDeque::new();
        for &exit in exits {
            let Some(slot) = field.slot(exit) else {
                continue;
            };
            if is_blocked(exit) || field.steps[slot] == 0 {
                continue;
            }
            field.steps[slot] = 0;
            frontier.push_back((exit, 0));
        }

        while let Some((cell, steps)) = frontier.pop_front() {
            for next in adjacent(width, height, cell) {
                let Some(slot) = field.slot(next) else {
                    continue;
                };
                if field.steps[slot] != UNREACHABLE || is_blocked(next) {
                    continue;
                }
                field.steps[slot] = steps + 1;
                frontier.push_back((next, steps + 1));
            }
        }

        field
    }

    /// Steps from `cell` to the nearest exit, or `None` when it cannot get there.
    pub(crate) fn steps(&self, cell: CellCoord) -> Option<u32> {
        self.slot(cell)
            .map(|slot| self.steps[slot])
            .filter(|&steps| steps != UNREACHABLE)
    }

    /// Walks downhill from `start` until an exit is reached.
    ///
    /// The path begins with `start`. Among equally good moves the first in
    /// the order down, right, up, left is taken.
    pub(crate) fn trace_from(&self, start: CellCoord) -> Option<Vec<CellCoord>> {
        let mut remaining = self.steps(start)?;
        let mut path = Vec::with_capacity(remaining as usize + 1);
        let mut cell = start;
        path.push(cell);

        while remaining > 0 {
            let (next, steps) = adjacent(self.width, self.height, cell)
                .filter_map(|next| self.steps(next).map(|steps| (next, steps)))
                .find(|&(_, steps)| steps < remaining)?;
            cell = next;
            remaining = steps;
            path.push(cell);
        }

        Some(path)
    }

    fn slot(&self, cell: CellCoord) -> Option<usize> {
        (cell.column() < self.width && cell.row() < self.height)
            .then(|| cell.row() as usize * self.width as usize + cell.column() as usize)
    }
}

/// In-bounds orthogonal neighbours of `cell` in tie-break order.
fn adjacent(width: u32, height: u32, cell: CellCoord) -> impl Iterator<Item = CellCoord> {
    let (column, row) = (cell.column(), cell.row());
    [
        row.checked_sub(1).map(|row| CellCoord::new(column, row)),
        column.checked_add(1).map(|column| CellCoord::new(column, row)),
        row.checked_add(1).map(|row| CellCoord::new(column, row)),
        column.checked_sub(1).map(|column| CellCoord::new(column, row)),
    ]
    .into_iter()
    .flatten()
    .filter(move |next| next.column() < width && next.row() < height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_grow_away_from_the_exit() {
        let field = DistanceField::flood(3, 4, &[CellCoord::new(1, 2)], |_| false);

        assert_eq!(field.steps(CellCoord::new(1, 2)), Some(0));
        assert_eq!(field.steps(CellCoord::new(1, 1)), Some(1));
        assert_eq!(field.steps(CellCoord::new(0, 0)), Some(3));
        assert_eq!(field.steps(CellCoord::new(9, 9)), None);
    }

    #[test]
    fn neighbours_stay_inside_the_grid() {
        let corner: Vec<_> = adjacent(3, 3, CellCoord::new(2, 0)).collect();
        assert_eq!(corner, vec![CellCoord::new(2, 1), CellCoord::new(1, 0)]);

        let centre: Vec<_> = adjacent(3, 3, CellCoord::new(1, 1)).collect();
        assert_eq!(
            centre,
            vec![
                CellCoord::new(1, 0),
                CellCoord::new(2, 1),
                CellCoord::new(1, 2),
                CellCoord::new(0, 1),
            ]
        );
    }

    #[test]
    fn flood_fills_every_open_cell_of_a_larger_grid() {
        let field = DistanceField::flood(8, 8, &[CellCoord::new(0, 0)], |_| false);

        assert_eq!(field.steps(CellCoord::new(7, 7)), Some(14));
        assert_eq!(field.steps(CellCoord::new(3, 5)), Some(8));
    }

    #[test]
    fn blocked_cells_force_a_detour() {
        let wall = CellCoord::new(1, 1);
        let field = DistanceField::flood(3, 4, &[CellCoord::new(1, 2)], |cell| cell == wall);

        assert_eq!(field.steps(wall), None);
        assert_eq!(field.steps(CellCoord::new(1, 0)), Some(4));
        assert_eq!(field.steps(CellCoord::new(0, 1)), Some(2));
    }

    #[test]
    fn trace_prefers_lower_rows_then_higher_columns() {
        let field = DistanceField::flood(3, 3, &[CellCoord::new(2, 2)], |_| false);

        let path = field.trace_from(CellCoord::new(0, 0)).expect("reachable");

        assert_eq!(
            path,
            vec![
                CellCoord::new(0, 0),
                CellCoord::new(1, 0),
                CellCoord::new(2, 0),
                CellCoord::new(2, 1),
                CellCoord::new(2, 2),
            ]
        );
    }

    #[test]
    fn sealed_start_has_no_trace() {
        let wall = [
            CellCoord::new(1, 0),
            CellCoord::new(1, 1),
            CellCoord::new(1, 2),
        ];
        let field =
            DistanceField::flood(3, 3, &[CellCoord::new(2, 2)], |cell| wall.contains(&cell));

        assert!(field.trace_from(CellCoord::new(0, 0)).is_none());
        assert!(field.trace_from(CellCoord::new(5, 5)).is_none());
    }
}
