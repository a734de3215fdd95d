use clap::{Parser, Subcommand};
use needledrop::aggregate::{FactTables, LabelTiers, VARIOUS};
use needledrop::palette::PALETTE_SIZE;
use needledrop::report::{self, Summary};
use needledrop::selection::Mode;
use needledrop::{data, serve};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "needledrop")]
#[command(author, version, about = "Explore album review scores and record-label statistics")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Directory holding reviews.json, labels.json and end_date.txt
    data_dir: Option<PathBuf>,

    /// Drop labels with fewer reviews than this
    #[arg(long, default_value = "5")]
    count_cutoff: u32,

    /// Only show headline numbers
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive dashboard in a browser
    Serve {
        /// Directory holding the dataset files
        data_dir: PathBuf,

        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,

        /// Drop labels with fewer reviews than this
        #[arg(long, default_value = "5")]
        count_cutoff: u32,
    },

    /// Export the aggregated tables (.json, .csv)
    Export {
        /// Directory holding the dataset files
        data_dir: PathBuf,

        /// Output file; format follows the extension
        #[arg(short, long)]
        output: PathBuf,

        /// Drop labels with fewer reviews than this
        #[arg(long, default_value = "5")]
        count_cutoff: u32,
    },
}

fn main() {
    let args = Args::parse();

    if let Some(cmd) = args.command {
        match cmd {
            Command::Serve {
                data_dir,
                port,
                count_cutoff,
            } => {
                if let Err(e) = serve::start(port, data_dir, count_cutoff) {
                    eprintln!("Server error: {}", e);
                    std::process::exit(1);
                }
            }
            Command::Export {
                data_dir,
                output,
                count_cutoff,
            } => export(&data_dir, &output, count_cutoff),
        }
        return;
    }

    let Some(data_dir) = args.data_dir else {
        eprintln!("Usage: needledrop <DATA_DIR>");
        eprintln!("Run 'needledrop --help' for more options.");
        std::process::exit(1);
    };

    let (facts, labels, end_date) = load_or_exit(&data_dir, args.count_cutoff);
    let summary = Summary::from_tables(&facts, &labels);

    eprintln!("\x1b[1mNeedledrop - Review Score Explorer\x1b[0m");
    eprintln!("{}", "─".repeat(60));
    eprintln!(
        "  Reviews:  {} ({} rejected)",
        summary.reviews, summary.rejected_reviews
    );
    eprintln!(
        "  Labels:   {} shown, {} under the count cutoff",
        summary.labels, summary.dropped_labels
    );
    eprintln!(
        "  Genres:   {} primary, {} condensed into \"{}\"",
        summary.primary_genres, summary.secondary_genres, VARIOUS
    );
    if let Some(end_date) = end_date {
        eprintln!("  Through:  {}", end_date);
    }

    if !args.quiet {
        eprintln!("\n\x1b[1mPrimary view:\x1b[0m");
        let table = facts.table(Mode::Primary);
        let total = table.total().max(1.0);
        for genre in table.genres() {
            let count = table.genre_total(genre);
            let share = count / total * 100.0;
            let bar = "█".repeat((share / 2.0).round() as usize);
            eprintln!("  {:<24} {:>8.1}  {:>5.1}%  {}", genre, count, share, bar);
        }
    }
}

fn load_or_exit(data_dir: &Path, count_cutoff: u32) -> (FactTables, LabelTiers, Option<String>) {
    let sources = data::load_dir(data_dir);

    let facts = match sources.reviews {
        Ok(loaded) => {
            let mut facts = FactTables::build(&loaded.records, PALETTE_SIZE);
            facts.rejected += loaded.rejected;
            facts
        }
        Err(e) => {
            eprintln!("Failed to load reviews: {}", e);
            std::process::exit(1);
        }
    };

    let labels = match sources.labels {
        Ok(loaded) => LabelTiers::build(&loaded.records, count_cutoff, PALETTE_SIZE),
        Err(e) => {
            eprintln!("\x1b[33mLabels unavailable:\x1b[0m {}", e);
            LabelTiers::build(&[], count_cutoff, PALETTE_SIZE)
        }
    };

    (facts, labels, sources.end_date.ok())
}

fn export(data_dir: &Path, output: &Path, count_cutoff: u32) {
    let (facts, labels, _) = load_or_exit(data_dir, count_cutoff);
    if let Err(e) = report::generate(output, &facts, &labels) {
        eprintln!("Failed to write export: {}", e);
        std::process::exit(1);
    }
    eprintln!("\x1b[32mExport saved: {}\x1b[0m", output.display());
}
