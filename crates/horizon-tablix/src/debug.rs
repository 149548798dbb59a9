//! Text dump of the realized grid.

use std::collections::HashMap;
use std::fmt;

use crate::grid::{Axis, Grid, ItemId, ItemRole};

/// Displays a grid as one line per row followed by its anchored cells.
///
/// ```text
/// row 0 #level0 pos=0 size=20
///   col 0 Corner "Region" 1x1
/// ```
pub struct GridDebug<'a> {
    grid: &'a Grid,
}

impl<'a> GridDebug<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }

    pub fn dump(&self) -> String {
        self.to_string()
    }
}

fn role_label(role: &ItemRole) -> &'static str {
    match role {
        ItemRole::Header { .. } => "header",
        ItemRole::Leaf { .. } => "leaf",
        ItemRole::Footer => "footer",
    }
}

fn ordinals(axis: &Axis) -> HashMap<ItemId, usize> {
    axis.ordered().into_iter().enumerate().map(|(i, id)| (id, i)).collect()
}

impl fmt::Display for GridDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.grid.rows();
        let columns = self.grid.columns();
        let column_ordinals = ordinals(columns);
        let window = rows.window();
        writeln!(
            f,
            "grid rows={} columns={} cells={} window={}..{}",
            rows.ordered().len(),
            columns.ordered().len(),
            self.grid.cell_count(),
            window.start,
            window.end
        )?;

        let mut by_row: HashMap<ItemId, Vec<_>> = HashMap::new();
        for cell in self.grid.cells() {
            by_row.entry(cell.row()).or_default().push(cell);
        }

        for (ordinal, id) in rows.ordered().into_iter().enumerate() {
            let Some(item) = rows.get(id) else {
                continue;
            };
            writeln!(
                f,
                "row {} {} {} pos={} size={}",
                ordinal,
                role_label(item.role()),
                item.key(),
                item.position(),
                item.size()
            )?;
            let mut cells = by_row.remove(&id).unwrap_or_default();
            cells.sort_by_key(|cell| column_ordinals.get(&cell.column()).copied().unwrap_or(usize::MAX));
            for cell in cells {
                let column = column_ordinals.get(&cell.column()).copied().unwrap_or(usize::MAX);
                writeln!(
                    f,
                    "  col {} {:?} {:?} {}x{}",
                    column,
                    cell.kind(),
                    cell.text(),
                    cell.row_span(),
                    cell.col_span()
                )?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for GridDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
