//! Procedure scoring and per-run aggregation.
//!
//! `score_proc` (in `engine`) measures one procedure body; `ScoreSet`
//! drives it over every definition in a file and accumulates the
//! records and roll-up counters the reports need. `run` ties input
//! loading, scoring, and reporting together for the whole invocation.
mod engine;
mod mix;
pub(crate) mod report;

use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::lex::{Scanner, find_proc_end, find_proc_start};
use crate::source;
use engine::ProcMeasure;
use report::ReportOpts;

/// Scores at or beyond this value mark a procedure as unscoreable.
pub const MAX_SCORE: f64 = 999_999.0;

/// Fallback nesting penalty when the requested one is out of range.
pub const DEFAULT_PENALTY: f64 = 2.0;

/// Knobs that shape a procedure's score.
#[derive(Clone, Copy, Debug)]
pub struct ScoreParams {
    /// Multiplier applied to nested blocks and control-structure bodies.
    pub penalty: f64,
    /// Milder multiplier for parenthesized subexpressions.
    pub demi_penalty: f64,
    /// Reciprocal of the scale divisor, applied to raw scores.
    pub scaling: f64,
}

impl ScoreParams {
    /// Resolve the command-line knobs. A nesting penalty under one
    /// falls back to the default; an absent or under-one demi penalty
    /// becomes the square root of the nesting penalty.
    pub fn new(penalty: f64, demi_penalty: Option<f64>, scale: f64) -> ScoreParams {
        let penalty = if penalty < 1.0 { DEFAULT_PENALTY } else { penalty };
        let demi_penalty = match demi_penalty {
            Some(d) if d >= 1.0 => d,
            _ => penalty.sqrt(),
        };
        ScoreParams {
            penalty,
            demi_penalty,
            scaling: 1.0 / scale,
        }
    }
}

/// Per-run scoring configuration.
pub struct ScoreOptions {
    pub params: ScoreParams,
    /// Records scoring under this are dropped without a trace. Kept a
    /// half below the requested integer so equal scores survive.
    pub threshold: f64,
    /// Procedure names to skip outright.
    pub ignore: Vec<String>,
}

/// One scored procedure, ready for reporting.
#[derive(Debug, Serialize)]
pub struct ProcScore {
    pub file: String,
    /// Line of the opening brace.
    pub line: u32,
    pub name: String,
    pub score: u32,
    pub line_ct: u32,
    pub nc_line_ct: u32,
}

/// Every record a run kept, plus the counters the summary needs.
#[derive(Debug, Default)]
pub struct ScoreSet {
    pub procs: Vec<ProcScore>,
    /// Sum of score times nc-line count over the kept records.
    pub score_ttl: f64,
    /// Total nc-line count over the kept records.
    pub nc_line_ttl: u32,
    /// Procedures dropped for hitting the score ceiling.
    pub unscore_ct: u32,
    pub high_score: u32,
    /// "name() in file" for the highest scorer.
    pub high_label: Option<String>,
}

impl ScoreSet {
    /// Scan one file's text and score every procedure definition in it.
    pub fn score_file(
        &mut self,
        file_name: &str,
        text: Vec<u8>,
        opts: &ScoreOptions,
        mut trace: Option<&mut dyn Write>,
    ) {
        if let Some(w) = trace.as_deref_mut() {
            let _ = writeln!(w, "\nLoading file {file_name}");
        }
        let mut scan = Scanner::new(file_name, text);
        while let Some(start) = find_proc_start(&mut scan) {
            let Some(end) = find_proc_end(&scan) else {
                // No close brace ahead of the cursor. Drop the
                // candidate and keep scanning from here.
                continue;
            };
            if opts.ignore.iter().any(|name| *name == start.name) {
                scan.seek_to(end);
                continue;
            }
            let measure = engine::score_proc(
                &mut scan,
                &opts.params,
                &start.name,
                start.line,
                end,
                trace.as_deref_mut(),
            );
            if !self.admit(measure, &start.name, file_name, start.line, opts.threshold) {
                scan.seek_to(end);
            }
        }
    }

    /// Keep or drop one measured procedure, maintaining the roll-up
    /// counters either way. Dropping happens silently under the
    /// reporting threshold and with a diagnostic at the score ceiling.
    fn admit(
        &mut self,
        measure: ProcMeasure,
        name: &str,
        file: &str,
        line: u32,
        threshold: f64,
    ) -> bool {
        if threshold > measure.score {
            return false;
        }
        if measure.score >= MAX_SCORE {
            eprintln!("unscored: {name} in {file} on line {line}");
            self.unscore_ct += 1;
            return false;
        }

        let mut score = measure.score as u32;
        if score > self.high_score {
            self.high_score = score;
            self.high_label = Some(format!("{name}() in {file}"));
        }

        // A body with no countable lines reports a zero score and
        // stays out of the weighted-mean accumulators.
        if measure.nc_line_ct == 0 {
            score = 0;
        } else {
            self.score_ttl += measure.score * f64::from(measure.nc_line_ct);
            self.nc_line_ttl += measure.nc_line_ct;
        }

        self.procs.push(ProcScore {
            file: file.to_owned(),
            line,
            name: name.to_owned(),
            score,
            line_ct: measure.line_ct,
            nc_line_ct: measure.nc_line_ct,
        });
        true
    }

    /// Report order: score, then nc-line count, then line span.
    fn sort(&mut self) {
        self.procs
            .sort_by_key(|p| (p.score, p.nc_line_ct, p.line_ct));
    }
}

/// Score every input file and print the configured reports. Returns
/// true when some procedure scored above the horrid threshold.
pub fn run(
    files: &[PathBuf],
    opts: &ScoreOptions,
    horrid_threshold: u32,
    report: &ReportOpts,
    filter: Option<&source::FilterCmd>,
    trace_path: Option<&Path>,
) -> Result<bool, Box<dyn Error>> {
    let mut trace = match trace_path {
        Some(path) => {
            let file = File::create(path)
                .map_err(|err| format!("cannot write trace file {}: {err}", path.display()))?;
            Some(BufWriter::new(file))
        }
        None => None,
    };

    let mut set = ScoreSet::default();
    for path in files {
        let text = source::load(path, filter)
            .map_err(|err| format!("{}: {err}", path.display()))?;
        set.score_file(
            &path.display().to_string(),
            text,
            opts,
            trace.as_mut().map(|w| w as &mut dyn Write),
        );
    }
    if let Some(w) = trace.as_mut() {
        w.flush()?;
    }

    report::print_summary(&mut set, report)?;
    Ok(set.high_score > horrid_threshold)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
