use std::fs;

use tempfile::tempdir;

use super::*;

#[test]
fn named_files_pass_through_untouched() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("notes.txt");
    let b = dir.path().join("b.c");
    fs::write(&a, "x").unwrap();
    fs::write(&b, "y").unwrap();

    let files = collect(&[a.clone(), b.clone()], None).unwrap();
    assert_eq!(files, vec![a, b]);
}

#[test]
fn missing_named_files_are_still_listed() {
    // Unreadable inputs fail at load time, not collection time.
    let ghost = PathBuf::from("missing/thing.c");
    let files = collect(&[ghost.clone()], None).unwrap();
    assert_eq!(files, vec![ghost]);
}

#[test]
fn input_list_lines_become_paths() {
    let dir = tempdir().unwrap();
    let list = dir.path().join("inputs");
    fs::write(&list, "one.c\n\n  two.c  \n").unwrap();

    let files = collect(&[], Some(&list)).unwrap();
    assert_eq!(files, vec![PathBuf::from("one.c"), PathBuf::from("two.c")]);
}

#[test]
fn unreadable_input_list_is_an_error() {
    let err = collect(&[], Some(Path::new("no/such/list"))).unwrap_err();
    assert!(err.to_string().contains("no/such/list"));
}

#[test]
fn no_inputs_at_all_is_an_error() {
    let err = collect(&[], None).unwrap_err();
    assert!(err.to_string().contains("no input files"));
}

#[test]
fn directories_are_walked_for_c_like_sources() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("main.c"), "").unwrap();
    fs::write(dir.path().join("README.md"), "").unwrap();
    fs::write(dir.path().join("LOUD.C"), "").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/util.cpp"), "").unwrap();
    fs::write(dir.path().join("sub/notes.txt"), "").unwrap();

    let files = collect(&[dir.path().to_path_buf()], None).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| {
            p.strip_prefix(dir.path())
                .unwrap()
                .display()
                .to_string()
        })
        .collect();
    assert_eq!(names, ["LOUD.C", "main.c", "sub/util.cpp"]);
}

#[test]
fn load_reads_plain_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("x.c");
    fs::write(&path, b"int x;\n").unwrap();

    assert_eq!(load(&path, None).unwrap(), b"int x;\n");
}

#[test]
fn load_runs_the_filter_and_takes_its_stdout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("x.c");
    fs::write(&path, b"filtered text\n").unwrap();

    let filter = FilterCmd {
        exe: "cat".to_string(),
        args: Vec::new(),
    };
    assert_eq!(load(&path, Some(&filter)).unwrap(), b"filtered text\n");
}

#[test]
fn unspawnable_filters_are_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("x.c");
    fs::write(&path, b"text").unwrap();

    let filter = FilterCmd {
        exe: "no-such-preprocessor-filter".to_string(),
        args: Vec::new(),
    };
    assert!(load(&path, Some(&filter)).is_err());
}
