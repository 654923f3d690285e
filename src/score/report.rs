//! Report formatters for a scoring run.
//!
//! Three output modes: the classic score table, a score histogram with
//! distribution statistics, and JSON. The table and histogram follow
//! the layout long-established for this kind of report, so downstream
//! scripts can keep parsing it; JSON replaces both when requested.
use std::error::Error;
use std::io::{self, Write};

use super::ScoreSet;

/// Which summary pieces to print, resolved from the command line.
pub struct ReportOpts {
    /// Print the per-procedure score table.
    pub scores: bool,
    /// Print the histogram and the statistics block.
    pub histogram: bool,
    /// Drop headers and the nc-line trailer.
    pub no_header: bool,
    /// Emit the sorted records as JSON instead of any text report.
    pub json: bool,
}

/// Sort the records and print the configured summary to stdout.
pub fn print_summary(set: &mut ScoreSet, opts: &ReportOpts) -> Result<(), Box<dyn Error>> {
    set.sort();
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&set.procs)?);
        return Ok(());
    }
    let mut out = io::stdout().lock();
    write_summary(set, opts, &mut out)?;
    Ok(())
}

fn write_summary(set: &ScoreSet, opts: &ReportOpts, out: &mut dyn Write) -> io::Result<()> {
    if opts.scores {
        if !opts.no_header {
            write!(
                out,
                "Complexity Scores\nScore | ln-ct | nc-lns| file-name(line): proc-name\n"
            )?;
        }
        for p in &set.procs {
            writeln!(
                out,
                "{:5}  {:6}  {:6}   {}({}): {}",
                p.score, p.line_ct, p.nc_line_ct, p.file, p.line, p.name
            )?;
        }
    }
    if opts.histogram {
        write_histogram(set, opts, out)?;
        write_stats(set, out)?;
    } else if !opts.no_header {
        writeln!(out, "total nc-lns {:8}", set.nc_line_ttl)?;
    }
    Ok(())
}

/// Histogram bucket for a score: one bucket under 10, tens up to 99,
/// hundreds up to 999, thousands beyond.
fn score_bucket(score: u32) -> usize {
    let sc = score as usize;
    if sc < 10 {
        0
    } else if sc < 100 {
        sc / 10
    } else if sc < 1000 {
        9 + sc / 100
    } else {
        18 + sc / 1000
    }
}

/// Decide whether a zero-count row extends or opens a skipped run.
/// A zero row prints normally unless the next bucket is zero too.
fn check_skip(counts: &[u32], ix: usize, skipping: bool) -> bool {
    if skipping {
        return true;
    }
    match counts.get(ix + 1) {
        Some(&next) => next == 0,
        None => false,
    }
}

fn write_histogram(set: &ScoreSet, opts: &ReportOpts, out: &mut dyn Write) -> io::Result<()> {
    const STAR_CT: u64 = 60;

    let Some(last) = set.procs.last() else {
        return Ok(());
    };
    let bucket_lim = score_bucket(last.score) + 1;

    let mut lines_scoring = vec![0u32; bucket_lim];
    let mut max_ct = 0u32;
    for p in &set.procs {
        let ix = score_bucket(p.score);
        lines_scoring[ix] += p.nc_line_ct;
        max_ct = max_ct.max(lines_scoring[ix]);
    }

    if !opts.no_header {
        if opts.scores {
            writeln!(out)?;
        }
        write!(out, "Complexity Histogram\nScore-Range  Lin-Ct\n")?;
    }

    let mut min_score: u32 = 0;
    let mut score_inc: u32 = 10;
    let mut hi_score: u32 = 9;
    let mut skipping = true;
    let mut first_line = true;

    for (ix, &ct) in lines_scoring.iter().enumerate() {
        let mut put_nl = false;
        match min_score {
            // The bucket width steps up after these two rows; an empty
            // line marks the seam.
            90 => {
                score_inc = 100;
                put_nl = true;
            }
            900 => {
                score_inc = 1000;
                put_nl = true;
            }
            _ => {}
        }

        let skip_row = ct == 0 && {
            skipping = check_skip(&lines_scoring, ix, skipping);
            skipping
        };
        if !skip_row {
            if skipping {
                // Leaving a skipped run; mark it unless nothing has
                // printed yet.
                if !first_line {
                    writeln!(out, "**********")?;
                }
                skipping = false;
            }
            first_line = false;

            // max_ct is nonzero here: a printable row is either itself
            // nonzero or sits next to a nonzero bucket.
            let width = (STAR_CT * u64::from(ct) + u64::from(max_ct / 2)) / u64::from(max_ct);
            if width > 0 {
                writeln!(
                    out,
                    "{:5}-{:<5} {:7} {}",
                    min_score,
                    hi_score,
                    ct,
                    "*".repeat(width as usize)
                )?;
            } else {
                writeln!(out, "{:5}-{:<5} {:7}", min_score, hi_score, ct)?;
            }
            if put_nl {
                writeln!(out)?;
            }
        }

        min_score = hi_score + 1;
        hi_score += score_inc;
    }
    Ok(())
}

fn write_stats(set: &ScoreSet, out: &mut dyn Write) -> io::Result<()> {
    if set.nc_line_ttl == 0 {
        return Ok(());
    }
    let av_score = set.score_ttl / f64::from(set.nc_line_ttl);

    // Quartile scores, weighted by nc-line count over the ascending
    // records.
    let mut pctile = [0u32; 3];
    let mut pct_ix = 0;
    let mut counter: u32 = 0;
    let pct_ct = set.nc_line_ttl / 4;
    let mut pct_thresh = pct_ct;

    for p in &set.procs {
        counter += p.nc_line_ct;
        if counter >= pct_thresh && pct_ix < pctile.len() {
            pctile[pct_ix] = p.score;
            pct_ix += 1;
            pct_thresh += pct_ct;
        }
    }

    writeln!(out)?;
    writeln!(out, "Scored procedure ct:  {:7}", set.procs.len())?;
    writeln!(out, "Non-comment line ct:  {:7}", set.nc_line_ttl)?;
    writeln!(out, "Average line score:   {:7}", (av_score + 0.5) as u32)?;
    writeln!(
        out,
        "25%-ile score:        {:7} (75% in higher score procs)",
        pctile[0]
    )?;
    writeln!(
        out,
        "50%-ile score:        {:7} (half in higher score procs)",
        pctile[1]
    )?;
    writeln!(
        out,
        "75%-ile score:        {:7} (25% in higher score procs)",
        pctile[2]
    )?;
    writeln!(
        out,
        "Highest score:        {:7} ({})",
        set.high_score,
        set.high_label.as_deref().unwrap_or("")
    )?;
    if set.unscore_ct > 0 {
        writeln!(out, "Unscored procedures:  {:7}", set.unscore_ct)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
