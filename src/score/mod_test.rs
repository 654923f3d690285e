use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;

use super::*;

const TWO_PROCS: &str = "int alpha(void)\n{\n    a();\n    b();\n    c();\n}\n\n\
                         static int beta(int x)\n{\n    d();\n    e();\n}\n";

fn raw_opts() -> ScoreOptions {
    ScoreOptions {
        params: ScoreParams {
            penalty: 2.0,
            demi_penalty: std::f64::consts::SQRT_2,
            scaling: 1.0,
        },
        threshold: -0.5,
        ignore: Vec::new(),
    }
}

fn scored(src: &str, opts: &ScoreOptions) -> ScoreSet {
    let mut set = ScoreSet::default();
    set.score_file("test.c", src.as_bytes().to_vec(), opts, None);
    set
}

// --- parameter resolution ---

#[test]
fn params_invert_the_scale() {
    let p = ScoreParams::new(2.0, None, 20.0);
    assert_eq!(p.penalty, 2.0);
    assert_eq!(p.demi_penalty, 2.0f64.sqrt());
    assert_eq!(p.scaling, 0.05);
}

#[test]
fn out_of_range_penalties_fall_back() {
    let p = ScoreParams::new(0.5, Some(0.9), 1.0);
    assert_eq!(p.penalty, DEFAULT_PENALTY);
    assert_eq!(p.demi_penalty, DEFAULT_PENALTY.sqrt());

    let p = ScoreParams::new(9.0, Some(3.0), 1.0);
    assert_eq!(p.demi_penalty, 3.0);
}

// --- per-file scoring ---

#[test]
fn every_definition_becomes_a_record() {
    let set = scored(TWO_PROCS, &raw_opts());

    assert_eq!(set.procs.len(), 2);
    let alpha = &set.procs[0];
    assert_eq!(alpha.name, "alpha");
    assert_eq!(alpha.file, "test.c");
    assert_eq!(alpha.line, 2);
    assert_eq!(alpha.score, 3);
    assert_eq!(alpha.line_ct, 3);
    assert_eq!(alpha.nc_line_ct, 3);

    let beta = &set.procs[1];
    assert_eq!(beta.name, "beta");
    assert_eq!(beta.line, 9);
    assert_eq!(beta.score, 2);
    assert_eq!(beta.nc_line_ct, 2);
}

#[test]
fn accumulators_weight_scores_by_lines() {
    let set = scored(TWO_PROCS, &raw_opts());

    assert_eq!(set.nc_line_ttl, 5);
    assert_eq!(set.score_ttl, 3.0 * 3.0 + 2.0 * 2.0);
    assert_eq!(set.high_score, 3);
    assert_eq!(set.high_label.as_deref(), Some("alpha() in test.c"));
    assert_eq!(set.unscore_ct, 0);
}

#[test]
fn threshold_drops_low_scores_silently() {
    let mut opts = raw_opts();
    opts.threshold = 2.5;
    let set = scored(TWO_PROCS, &opts);

    // beta scores 2 and vanishes without touching any counter.
    assert_eq!(set.procs.len(), 1);
    assert_eq!(set.procs[0].name, "alpha");
    assert_eq!(set.nc_line_ttl, 3);
    assert_eq!(set.unscore_ct, 0);
}

#[test]
fn threshold_keeps_equal_scores() {
    // A requested threshold of 3 resolves to 2.5, keeping scores of 3.
    let mut opts = raw_opts();
    opts.threshold = 3.0 - 0.5;
    let set = scored(TWO_PROCS, &opts);
    assert_eq!(set.procs.len(), 1);
    assert_eq!(set.procs[0].score, 3);
}

#[test]
fn ignored_names_are_skipped() {
    let mut opts = raw_opts();
    opts.ignore.push("alpha".to_string());
    let set = scored(TWO_PROCS, &opts);

    assert_eq!(set.procs.len(), 1);
    assert_eq!(set.procs[0].name, "beta");
    assert_eq!(set.nc_line_ttl, 2);
}

#[test]
fn unscoreable_procedures_count_but_never_join() {
    let src = "void broken(void)\n{\n    = 5;\n}\n\nint gamma(void)\n{\n    ok();\n}\n";
    let set = scored(src, &raw_opts());

    assert_eq!(set.unscore_ct, 1);
    assert_eq!(set.procs.len(), 1);
    assert_eq!(set.procs[0].name, "gamma");
}

#[test]
fn empty_bodies_record_a_zero_score() {
    let set = scored("int nop(void)\n{\n}\n", &raw_opts());

    assert_eq!(set.procs.len(), 1);
    assert_eq!(set.procs[0].score, 0);
    assert_eq!(set.procs[0].nc_line_ct, 0);
    assert_eq!(set.nc_line_ttl, 0);
    assert_eq!(set.score_ttl, 0.0);
    assert!(set.high_label.is_none());
}

#[test]
fn bodies_without_a_close_brace_are_abandoned() {
    let set = scored("int bad(void)\n{\n    x();\n", &raw_opts());
    assert!(set.procs.is_empty());
}

#[test]
fn scoring_accumulates_across_files() {
    let opts = raw_opts();
    let mut set = ScoreSet::default();
    set.score_file("a.c", b"int f(void)\n{\n    x();\n}\n".to_vec(), &opts, None);
    set.score_file("b.c", b"int g(void)\n{\n    y();\n}\n".to_vec(), &opts, None);

    assert_eq!(set.procs.len(), 2);
    assert_eq!(set.procs[0].file, "a.c");
    assert_eq!(set.procs[1].file, "b.c");
    assert_eq!(set.nc_line_ttl, 2);
}

#[test]
fn trace_output_announces_each_file() {
    let mut buf = Vec::new();
    let mut set = ScoreSet::default();
    set.score_file(
        "t.c",
        b"int f(void)\n{\n    a();\n}\n".to_vec(),
        &raw_opts(),
        Some(&mut buf),
    );

    let text = String::from_utf8(buf).unwrap();
    assert!(text.starts_with("\nLoading file t.c\n"));
    assert!(text.contains("score"));
}

// --- whole runs ---

#[test]
fn run_flags_scores_over_the_horrid_threshold() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("one.c");
    fs::write(&path, "int main(void)\n{\n    a();\n    b();\n    c();\n}\n").unwrap();

    let report = report::ReportOpts {
        scores: true,
        histogram: false,
        no_header: true,
        json: false,
    };
    let files = vec![path];
    assert!(run(&files, &raw_opts(), 2, &report, None, None).unwrap());
    assert!(!run(&files, &raw_opts(), 100, &report, None, None).unwrap());
}

#[test]
fn run_reports_unreadable_inputs() {
    let report = report::ReportOpts {
        scores: false,
        histogram: false,
        no_header: true,
        json: false,
    };
    let missing = vec![PathBuf::from("no/such/file.c")];
    let err = run(&missing, &raw_opts(), 100, &report, None, None).unwrap_err();
    assert!(err.to_string().contains("no/such/file.c"));
}

#[test]
fn run_writes_the_trace_file() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("one.c");
    fs::write(&src, "int main(void)\n{\n    a();\n}\n").unwrap();
    let trace = dir.path().join("trace.txt");

    let report = report::ReportOpts {
        scores: false,
        histogram: false,
        no_header: true,
        json: false,
    };
    run(
        &[src],
        &raw_opts(),
        100,
        &report,
        None,
        Some(trace.as_path()),
    )
    .unwrap();

    let text = fs::read_to_string(&trace).unwrap();
    assert!(text.contains("Loading file"));
}
