//! Interactive CSV picker.
//!
//! This is intentionally kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the picker provides the "run `ptrend` and choose a CSV" UX
//!
//! The picker searches for `*.csv` files under the current working directory.
//! Finding nothing (or getting no answer) is not an error: the caller shows the
//! idle prompt and exits cleanly.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::AppError;

/// Shown when no input file is available.
pub const IDLE_PROMPT: &str = "Please provide a CSV file to begin.";

/// Default directory recursion depth for finding CSV files.
const DEFAULT_SEARCH_DEPTH: usize = 4;

/// Prompt the user to select a CSV file from the current directory tree.
///
/// Behavior:
/// - list discovered `*.csv` files
/// - accept either a number (from the list) or an explicit path
/// - `q`, end of input, or an empty listing yield `None`
pub fn prompt_for_csv_path() -> Result<Option<PathBuf>, AppError> {
    let files = discover_csv_files();
    if files.is_empty() {
        debug!("no csv files under the working directory");
        return Ok(None);
    }

    println!("Found {} CSV file(s):", files.len());
    for (idx, path) in files.iter().enumerate() {
        println!("{:>3}) {}", idx + 1, pretty_path(path));
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock();
    loop {
        print!("Select a file by number (1-{}) or type a path (q to quit): ", files.len());
        io::stdout()
            .flush()
            .map_err(|e| AppError::new(4, format!("Failed to write prompt: {e}")))?;

        let mut input = String::new();
        let bytes = lines
            .read_line(&mut input)
            .map_err(|e| AppError::new(4, format!("Failed to read input: {e}")))?;
        if bytes == 0 {
            println!();
            return Ok(None);
        }

        match choose(&files, input.trim()) {
            Choice::Quit => return Ok(None),
            Choice::Path(path) => return Ok(Some(path)),
            Choice::Retry(msg) => println!("{msg}"),
        }
    }
}

#[derive(Debug, PartialEq)]
enum Choice {
    Quit,
    Path(PathBuf),
    Retry(String),
}

fn choose(files: &[PathBuf], input: &str) -> Choice {
    if input.eq_ignore_ascii_case("q") {
        return Choice::Quit;
    }
    if input.is_empty() {
        return Choice::Retry(String::new());
    }

    if let Ok(choice) = input.parse::<usize>() {
        if (1..=files.len()).contains(&choice) {
            return Choice::Path(files[choice - 1].clone());
        }
        return Choice::Retry(format!(
            "Invalid choice: {choice}. Enter a number between 1 and {}.",
            files.len()
        ));
    }

    match validate_csv_path(Path::new(input)) {
        Ok(path) => Choice::Path(path),
        Err(err) => Choice::Retry(err.to_string()),
    }
}

/// Validate the provided path points to a `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::new(
            4,
            format!("CSV file not found: {}", path.display()),
        ));
    }
    if path.is_dir() {
        return Err(AppError::new(
            4,
            format!("Expected a file, got a directory: {}", path.display()),
        ));
    }
    if !has_csv_extension(path) {
        return Err(AppError::new(
            2,
            format!(
                "Expected a .csv file (got: {}). Use -f to pass a CSV path.",
                path.display()
            ),
        ));
    }

    Ok(path.to_path_buf())
}

/// Discover `*.csv` files under the current directory (deterministic order).
pub fn discover_csv_files() -> Vec<PathBuf> {
    find_csv_files(Path::new("."), DEFAULT_SEARCH_DEPTH)
}

fn find_csv_files(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut out = Vec::new();
    find_csv_files_inner(root, 0, max_depth, &mut out);
    out.sort_by(|a, b| pretty_path(a).cmp(&pretty_path(b)));
    out
}

fn find_csv_files_inner(root: &Path, depth: usize, max_depth: usize, out: &mut Vec<PathBuf>) {
    if depth > max_depth {
        return;
    }

    let Ok(entries) = fs::read_dir(root) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if !should_skip_dir(&path) {
                find_csv_files_inner(&path, depth + 1, max_depth, out);
            }
        } else if file_type.is_file() && has_csv_extension(&path) {
            out.push(path);
        }
    }
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn should_skip_dir(path: &Path) -> bool {
    let name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
    name.starts_with('.') || matches!(name, "target" | "node_modules")
}

/// Path relative to the working directory, for listings.
pub fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files() -> Vec<PathBuf> {
        vec![PathBuf::from("./a.csv"), PathBuf::from("./data/b.csv")]
    }

    #[test]
    fn numeric_choice_selects_listed_file() {
        assert_eq!(choose(&files(), "2"), Choice::Path(PathBuf::from("./data/b.csv")));
        assert!(matches!(choose(&files(), "3"), Choice::Retry(_)));
    }

    #[test]
    fn q_quits_in_either_case() {
        assert_eq!(choose(&files(), "q"), Choice::Quit);
        assert_eq!(choose(&files(), "Q"), Choice::Quit);
    }

    #[test]
    fn missing_path_asks_again() {
        let Choice::Retry(msg) = choose(&files(), "no/such/file.csv") else {
            panic!("expected retry");
        };
        assert!(msg.starts_with("CSV file not found"));
    }

    #[test]
    fn hidden_and_build_dirs_are_skipped() {
        assert!(should_skip_dir(Path::new("./.git")));
        assert!(should_skip_dir(Path::new("./target")));
        assert!(!should_skip_dir(Path::new("./data")));
        assert_eq!(pretty_path(Path::new("./data/b.csv")), "data/b.csv");
    }

    #[test]
    fn discovery_finds_nested_csv_files_in_order() {
        let root = std::env::temp_dir().join(format!("ptrend-picker-{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("nested")).unwrap();
        fs::create_dir_all(root.join(".cache")).unwrap();
        fs::write(root.join("b.csv"), "x\n").unwrap();
        fs::write(root.join("nested").join("a.CSV"), "x\n").unwrap();
        fs::write(root.join(".cache").join("c.csv"), "x\n").unwrap();
        fs::write(root.join("notes.txt"), "x\n").unwrap();

        let found = find_csv_files(&root, DEFAULT_SEARCH_DEPTH);
        let names: Vec<String> = found
            .iter()
            .map(|p| p.strip_prefix(&root).unwrap().display().to_string())
            .collect();
        fs::remove_dir_all(&root).unwrap();

        assert_eq!(names.len(), 2, "{names:?}");
        assert!(names.contains(&"b.csv".to_string()));
        assert!(names.iter().any(|n| n.ends_with("a.CSV")));
    }
}
