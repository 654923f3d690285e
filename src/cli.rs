/// CLI argument definitions for the `cplx` command.
///
/// Defines the flags, their defaults, and the long help text using the
/// `clap` derive macros. Flag resolution that needs scoring knowledge
/// (penalty fallbacks, threshold defaults) lives with the consumers.
use std::path::PathBuf;

use clap::Parser;

/// Procedure complexity scorer for C source.
#[derive(Parser)]
#[command(name = "cplx", version, about = "Score the complexity of C procedures")]
#[command(long_about = "\
Score the complexity of C procedures.

Each procedure definition found in the input files gets a score that
grows with statement count, line span, nesting depth, and tangled
expressions. Scores are scaled so that roughly one point corresponds
to one 'unit of attention'; the default report lists every procedure
scoring at least the threshold, lowest first.

Rules of thumb for scaled scores:
  0-9     trivially understood
  10-29   reasonable procedures
  30-99   takes effort to follow
  100+    strong candidates for rewriting

Examples:
  cplx src/main.c src/util.c    # score two files
  cplx src/                     # walk a directory for C-like files
  cplx --histogram src/         # distribution instead of a table
  cplx -t 0 one.c               # report every procedure
  cplx --json src/ | jq .       # machine-readable output")]
pub struct Cli {
    /// Source files to score; directories are walked for C-like files
    pub paths: Vec<PathBuf>,

    /// Read the list of input files from this file, one per line
    #[arg(long, conflicts_with = "paths")]
    pub input: Option<PathBuf>,

    /// Report only procedures scoring at least this much (default: 30,
    /// or 0 with --histogram)
    #[arg(short, long)]
    pub threshold: Option<u32>,

    /// Exit with status 2 when any procedure scores above this
    #[arg(long, default_value = "100")]
    pub horrid_threshold: u32,

    /// Penalty multiplier for nested blocks (values under 1.0 fall
    /// back to the default)
    #[arg(short = 'n', long, default_value = "2.0")]
    pub nesting_penalty: f64,

    /// Penalty for parenthesized subexpressions (default: square root
    /// of the nesting penalty)
    #[arg(short = 'd', long)]
    pub demi_nesting_penalty: Option<f64>,

    /// Divisor applied to raw scores
    #[arg(short, long, default_value = "20")]
    pub scale: f64,

    /// Print a histogram of scores over non-comment lines
    #[arg(short = 'H', long)]
    pub histogram: bool,

    /// Print the score table (on by default unless --histogram)
    #[arg(long, overrides_with = "no_scores")]
    pub scores: bool,

    /// Suppress the score table
    #[arg(long, overrides_with = "scores")]
    pub no_scores: bool,

    /// Omit report headers and trailers
    #[arg(long)]
    pub no_header: bool,

    /// Procedure name to skip; repeat for several
    #[arg(short, long, value_name = "NAME")]
    pub ignore: Vec<String>,

    /// Write a scoring trace to this file
    #[arg(long, value_name = "FILE")]
    pub trace: Option<PathBuf>,

    /// Argument to pass to the preprocessor filter; repeat for several
    #[arg(short = 'U', long = "unifdef-arg", value_name = "ARG")]
    pub unifdef_args: Vec<String>,

    /// Preprocessor filter executable
    #[arg(long, default_value = "unifdef")]
    pub unif_exe: String,

    /// Emit the sorted records as JSON instead of the text reports
    #[arg(long)]
    pub json: bool,
}
