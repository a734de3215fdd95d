//! CSV export of the tidy fact table

use crate::aggregate::FactTables;
use crate::selection::Mode;
use std::io::{self, Write};

/// One row per (view, genre, score) cell, zero cells included.
pub fn write<W: Write>(writer: &mut W, facts: &FactTables) -> io::Result<()> {
    writeln!(writer, "view,genre,score,count")?;
    for (name, mode) in [("primary", Mode::Primary), ("secondary", Mode::Secondary)] {
        for row in facts.table(mode).rows() {
            writeln!(
                writer,
                "{},{},{:.1},{}",
                name,
                escape(row.genre),
                row.score,
                row.count
            )?;
        }
    }
    Ok(())
}

fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
