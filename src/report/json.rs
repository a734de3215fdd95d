//! JSON export of the full derived state

use crate::aggregate::{FactRow, FactTables, LabelTiers};
use crate::data::LabelStat;
use crate::selection::Mode;
use serde::Serialize;
use std::io::{self, Write};

use super::Summary;

#[derive(Serialize)]
struct Export<'a> {
    summary: Summary,
    tiers: &'a crate::aggregate::GenreTiers,
    primary_rows: Vec<FactRow<'a>>,
    secondary_rows: Vec<FactRow<'a>>,
    labels_primary: &'a [LabelStat],
    labels_secondary: &'a [LabelStat],
}

pub fn write<W: Write>(
    writer: &mut W,
    facts: &FactTables,
    labels: &LabelTiers,
) -> io::Result<()> {
    let export = Export {
        summary: Summary::from_tables(facts, labels),
        tiers: &facts.tiers,
        primary_rows: facts.table(Mode::Primary).rows().collect(),
        secondary_rows: facts.table(Mode::Secondary).rows().collect(),
        labels_primary: labels.visible(Mode::Primary),
        labels_secondary: labels.visible(Mode::Secondary),
    };
    serde_json::to_writer_pretty(&mut *writer, &export)?;
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Review;
    use chrono::NaiveDate;

    // ==========================================================================
    // JSON EXPORT TESTS
    // ==========================================================================

    fn review(score: f64, genres: &[&str]) -> Review {
        Review {
            score,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            publish_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            release_year: None,
            labels: vec![],
            artists: vec![],
            album: String::new(),
            href: String::new(),
            artwork: String::new(),
            bnm: false,
        }
    }

    #[test]
    fn test_export_round_trips_as_json() {
        let facts = FactTables::build(&[review(7.5, &["Rock"]), review(2.0, &["Pop"])], 6);
        let labels = LabelTiers::build(&[], 5, 6);
        let mut out = Vec::new();
        write(&mut out, &facts, &labels).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["summary"]["reviews"], 2);
        assert!(value["primary_rows"].as_array().unwrap().len() > 0);
        assert_eq!(value["tiers"]["primary"][0], "Pop");
    }
}
