//! Input discovery and source loading.
//!
//! Resolves the run's file list from positional arguments and the
//! `--input` list file, walking directories for C-like sources, and
//! reads each file either directly or through the configured
//! preprocessor filter.
use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use ignore::WalkBuilder;

/// External preprocessor filter, `unifdef` unless overridden.
pub struct FilterCmd {
    pub exe: String,
    pub args: Vec<String>,
}

/// Extensions picked up when walking a directory argument.
const SOURCE_EXTENSIONS: &[&str] = &["c", "h", "cc", "hh", "cpp", "hpp", "cxx", "hxx"];

/// Resolve the input list: positional paths plus the optional list
/// file, with directory arguments walked for C-like sources. An empty
/// resolution is an error.
pub fn collect(paths: &[PathBuf], input: Option<&Path>) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut named: Vec<PathBuf> = paths.to_vec();
    if let Some(list) = input {
        let text = fs::read_to_string(list)
            .map_err(|err| format!("cannot read input list {}: {err}", list.display()))?;
        named.extend(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(PathBuf::from),
        );
    }
    if named.is_empty() {
        return Err("no input files specified".into());
    }

    let mut files = Vec::new();
    for path in named {
        if path.is_dir() {
            files.extend(walk_sources(&path));
        } else {
            // Named files are taken as-is, whatever their extension.
            files.push(path);
        }
    }
    Ok(files)
}

/// Walk one directory, honoring `.gitignore` and skipping `.git`,
/// collecting files with a C-like extension in path order.
fn walk_sources(dir: &Path) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(dir)
        .hidden(false)
        .follow_links(false)
        .filter_entry(|entry| {
            if entry.file_type().is_some_and(|ft| ft.is_dir()) && entry.file_name() == ".git" {
                return false;
            }
            true
        })
        .build();

    let mut found: Vec<PathBuf> = walker
        .flatten()
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .filter(|path| has_source_extension(path))
        .collect();
    found.sort();
    found
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Read one source file, optionally through the preprocessor filter.
/// The filter's stdout becomes the text; its exit status is not
/// consulted.
pub fn load(path: &Path, filter: Option<&FilterCmd>) -> io::Result<Vec<u8>> {
    match filter {
        Some(cmd) => {
            let output = Command::new(&cmd.exe).args(&cmd.args).arg(path).output()?;
            Ok(output.stdout)
        }
        None => fs::read(path),
    }
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
