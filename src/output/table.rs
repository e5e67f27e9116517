//! Rounded-grid console table for duplicate groups.
//!
//! One row per group: an index, the comparison key (hex digest or decimal
//! size) and the group's paths, one per line. The first path is the one kept
//! by deletion and is marked `(keep)`.
//!
//! ```text
//! ╭───┬──────────────────────────────────┬──────────────────╮
//! │ # │ MD5 hash                         │ File paths       │
//! ├───┼──────────────────────────────────┼──────────────────┤
//! │ 0 │ 02129bb861061d1a052c592e2dc6b383 │ ./a.txt (keep)   │
//! │   │                                  │ ./b.txt          │
//! ╰───┴──────────────────────────────────┴──────────────────╯
//! ```

use std::io::{self, Write};

use yansi::Paint;

use crate::duplicates::DuplicateTable;
use crate::scanner::Strategy;

const KEEP_MARK: &str = " (keep)";

/// Console table formatter.
pub struct TableOutput<'a> {
    table: &'a DuplicateTable,
    strategy: Strategy,
    color: bool,
}

struct Row {
    index: String,
    key: String,
    paths: Vec<String>,
}

impl<'a> TableOutput<'a> {
    /// Create a formatter for `table`, labelling keys for `strategy`.
    #[must_use]
    pub fn new(table: &'a DuplicateTable, strategy: Strategy) -> Self {
        Self {
            table,
            strategy,
            color: false,
        }
    }

    /// Enable or disable ANSI colors.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn rows(&self) -> Vec<Row> {
        self.table
            .groups()
            .iter()
            .enumerate()
            .map(|(idx, group)| Row {
                index: idx.to_string(),
                key: group.key.to_string(),
                paths: group
                    .paths
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        let shown = p.to_string_lossy();
                        if i == 0 {
                            format!("{shown}{KEEP_MARK}")
                        } else {
                            shown.into_owned()
                        }
                    })
                    .collect(),
            })
            .collect()
    }

    /// Render the table to a string.
    #[must_use]
    pub fn render(&self) -> String {
        let headers = ["#", self.strategy.key_label(), "File paths"];
        let rows = self.rows();

        let mut widths = headers.map(width);
        for row in &rows {
            widths[0] = widths[0].max(width(&row.index));
            widths[1] = widths[1].max(width(&row.key));
            for path in &row.paths {
                widths[2] = widths[2].max(width(path));
            }
        }

        let mut out = String::new();
        out.push_str(&rule(&widths, '╭', '┬', '╮'));

        let header_cells: Vec<String> = headers
            .iter()
            .zip(widths)
            .map(|(h, w)| self.paint_header(&pad(h, w)))
            .collect();
        out.push_str(&line(&header_cells));
        out.push_str(&rule(&widths, '├', '┼', '┤'));

        for (r, row) in rows.iter().enumerate() {
            for (i, path) in row.paths.iter().enumerate() {
                let (index, key) = if i == 0 {
                    (row.index.as_str(), row.key.as_str())
                } else {
                    ("", "")
                };
                let cells = [
                    pad(index, widths[0]),
                    self.paint_key(&pad(key, widths[1])),
                    self.paint_path(&pad(path, widths[2]), i == 0),
                ];
                out.push_str(&line(&cells));
            }
            if r + 1 < rows.len() {
                out.push_str(&rule(&widths, '├', '┼', '┤'));
            }
        }

        out.push_str(&rule(&widths, '╰', '┴', '╯'));
        out
    }

    /// Write the rendered table.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(self.render().as_bytes())
    }

    fn paint_header(&self, cell: &str) -> String {
        if self.color {
            cell.bold().to_string()
        } else {
            cell.to_string()
        }
    }

    fn paint_key(&self, cell: &str) -> String {
        if self.color {
            cell.cyan().to_string()
        } else {
            cell.to_string()
        }
    }

    fn paint_path(&self, cell: &str, survivor: bool) -> String {
        match (self.color, survivor) {
            (false, _) => cell.to_string(),
            (true, true) => cell.green().to_string(),
            (true, false) => cell.red().to_string(),
        }
    }
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad(s: &str, w: usize) -> String {
    format!("{s}{}", " ".repeat(w.saturating_sub(width(s))))
}

fn rule(widths: &[usize; 3], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}\n", segments.join(&mid.to_string()))
}

fn line(cells: &[String]) -> String {
    format!("│ {} │\n", cells.join(" │ "))
}
