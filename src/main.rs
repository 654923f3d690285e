mod cli;
mod lex;
mod score;
mod source;

use clap::Parser;

use cli::Cli;
use score::report::ReportOpts;
use score::{ScoreOptions, ScoreParams};
use source::FilterCmd;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version land here too, with success status.
        Err(err) => {
            let failed = err.use_stderr();
            let _ = err.print();
            std::process::exit(if failed { 1 } else { 0 });
        }
    };

    let files = match source::collect(&cli.paths, cli.input.as_deref()) {
        Ok(files) => files,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    // Scores default on, except under a bare --histogram. A histogram
    // without an explicit threshold reports everything.
    let scores_requested = cli.scores || cli.no_scores;
    let scores = cli.scores || (!cli.no_scores && !cli.histogram);
    let threshold = match cli.threshold {
        Some(t) => t,
        None if cli.histogram && !scores_requested => 0,
        None => 30,
    };

    let opts = ScoreOptions {
        params: ScoreParams::new(cli.nesting_penalty, cli.demi_nesting_penalty, cli.scale),
        // Half a point under the requested value, so equal scores pass.
        threshold: f64::from(threshold) - 0.5,
        ignore: cli.ignore,
    };
    let report = ReportOpts {
        scores,
        histogram: cli.histogram,
        no_header: cli.no_header,
        json: cli.json,
    };
    let filter = (!cli.unifdef_args.is_empty()).then(|| FilterCmd {
        exe: cli.unif_exe,
        args: cli.unifdef_args,
    });

    match score::run(
        &files,
        &opts,
        cli.horrid_threshold,
        &report,
        filter.as_ref(),
        cli.trace.as_deref(),
    ) {
        Ok(over_horrid) => {
            if over_horrid {
                std::process::exit(2);
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
