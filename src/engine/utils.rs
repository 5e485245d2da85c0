use crate::types::{Cell, Direction};

pub(super) fn step(cell: Cell, dir: Direction) -> Cell {
    let (dr, dc) = dir.delta();
    cell.offset(dr, dc)
}
