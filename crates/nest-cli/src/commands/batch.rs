use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use ignore::WalkBuilder;
use nest_config::NestConfig;
use nest_engine::{ConversionStats, Converter};
use rayon::prelude::*;
use serde::Serialize;

use crate::cli::{BatchArgs, GlobalFlags};
use crate::commands::convert::read_stylesheet;
use crate::output::output;
use crate::progress::Progress;

/// Outcome of converting one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<ConversionStats>,
}

impl FileOutcome {
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-directory summary printed after a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub files: Vec<FileOutcome>,
}

impl BatchReport {
    fn from_outcomes(files: Vec<FileOutcome>) -> Self {
        let succeeded = files.iter().filter(|f| f.succeeded()).count();
        Self {
            total: files.len(),
            succeeded,
            failed: files.len() - succeeded,
            files,
        }
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for file in &self.files {
            match (&file.output, &file.error) {
                (_, Some(error)) => writeln!(f, "FAILED {}: {error}", file.input)?,
                (Some(out), None) => writeln!(f, "ok     {} -> {out}", file.input)?,
                (None, None) => writeln!(f, "ok     {}", file.input)?,
            }
        }
        write!(
            f,
            "Converted {} of {} files ({} failed)",
            self.succeeded, self.total, self.failed
        )
    }
}

/// Handle `cssnest batch`.
///
/// Per-file failures are reported and never abort the run; only a missing
/// input directory is fatal.
pub fn handle(args: &BatchArgs, config: &NestConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = run(args, config)?;
    if report.failed > 0 {
        tracing::warn!(failed = report.failed, "some files failed to convert");
    }
    if !flags.quiet || report.failed > 0 {
        output(&report, flags.format)?;
    }
    Ok(())
}

/// Convert every stylesheet under `args.dir` in parallel.
pub fn run(args: &BatchArgs, config: &NestConfig) -> anyhow::Result<BatchReport> {
    if !args.dir.is_dir() {
        bail!("input directory '{}' does not exist", args.dir.display());
    }

    let files = collect_stylesheets(&args.dir, args.recursive);
    tracing::debug!(dir = %args.dir.display(), files = files.len(), "collected stylesheets");

    let progress = Progress::bar(files.len() as u64, "converting");
    let outcomes: Vec<FileOutcome> = files
        .par_iter()
        .map(|path| {
            if let Some(name) = path.file_name() {
                progress.set_message(&name.to_string_lossy());
            }
            let outcome = convert_file(path, &args.dir, args.out_dir.as_deref(), config);
            progress.inc(1);
            outcome
        })
        .collect();
    progress.finish_clear();

    Ok(BatchReport::from_outcomes(outcomes))
}

/// `.css` files under `dir`, sorted. Hidden and git-ignored entries are
/// skipped.
fn collect_stylesheets(dir: &Path, recursive: bool) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkBuilder::new(dir)
        .max_depth(if recursive { None } else { Some(1) })
        .build()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
        .map(ignore::DirEntry::into_path)
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("css"))
        })
        .collect();
    files.sort();
    files
}

fn convert_file(path: &Path, root: &Path, out_dir: Option<&Path>, config: &NestConfig) -> FileOutcome {
    let input = path.display().to_string();
    match try_convert_file(path, root, out_dir, config) {
        Ok((out_path, stats)) => FileOutcome {
            input,
            output: Some(out_path.display().to_string()),
            error: None,
            stats: Some(stats),
        },
        Err(error) => {
            tracing::debug!(file = %input, error = %format!("{error:#}"), "conversion failed");
            FileOutcome {
                input,
                output: None,
                error: Some(format!("{error:#}")),
                stats: None,
            }
        }
    }
}

fn try_convert_file(
    path: &Path,
    root: &Path,
    out_dir: Option<&Path>,
    config: &NestConfig,
) -> anyhow::Result<(PathBuf, ConversionStats)> {
    let source = read_stylesheet(path)?;
    let conversion = Converter::new(config).convert(&source)?;

    let out_path = output_path(path, root, out_dir);
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&out_path, &conversion.output)
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    Ok((out_path, conversion.stats))
}

/// `a/b.css` → `a/b.scss`, or mirrored under `out_dir` when given.
fn output_path(path: &Path, root: &Path, out_dir: Option<&Path>) -> PathBuf {
    let target = match out_dir {
        Some(out) => out.join(path.strip_prefix(root).unwrap_or(path)),
        None => path.to_path_buf(),
    };
    target.with_extension("scss")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn args(dir: &Path, out_dir: Option<PathBuf>, recursive: bool) -> BatchArgs {
        BatchArgs {
            dir: dir.to_path_buf(),
            out_dir,
            recursive,
        }
    }

    #[test]
    fn converts_siblings_and_collects_failures() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.css", ".a { color: red; }");
        write(dir.path(), "broken.css", ".b { color: red;");
        write(dir.path(), "notes.txt", "not css");
        write(dir.path(), "nested/c.css", ".c { margin: 0; }");

        let report = run(&args(dir.path(), None, false), &NestConfig::default()).unwrap();

        assert_eq!(report.total, 2);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("a.scss")).unwrap(),
            ".a {\n  color: red;\n}\n"
        );
        assert!(!dir.path().join("broken.scss").exists());
        let failure = report.files.iter().find(|f| !f.succeeded()).unwrap();
        assert!(failure.input.ends_with("broken.css"));
    }

    #[test]
    fn recursive_run_mirrors_into_out_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        write(dir.path(), "a.css", ".a { color: red; }");
        write(dir.path(), "nested/c.css", ".c { margin: 0; }");

        let report = run(
            &args(dir.path(), Some(out.path().to_path_buf()), true),
            &NestConfig::default(),
        )
        .unwrap();

        assert_eq!(report.succeeded, 2);
        assert!(out.path().join("a.scss").is_file());
        assert!(out.path().join("nested/c.scss").is_file());
        assert!(!dir.path().join("a.scss").exists());
    }

    #[test]
    fn missing_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(run(&args(&missing, None, false), &NestConfig::default()).is_err());
    }

    #[test]
    fn text_report_summarizes_counts() {
        let report = BatchReport::from_outcomes(vec![
            FileOutcome {
                input: "a.css".into(),
                output: Some("a.scss".into()),
                error: None,
                stats: Some(ConversionStats::default()),
            },
            FileOutcome {
                input: "b.css".into(),
                output: None,
                error: Some("Parse failed at line 1: expected `}`".into()),
                stats: None,
            },
        ]);
        assert_eq!(
            report.to_string(),
            "ok     a.css -> a.scss\nFAILED b.css: Parse failed at line 1: expected `}`\nConverted 1 of 2 files (1 failed)"
        );
    }

    #[test]
    fn output_path_swaps_extension() {
        assert_eq!(
            output_path(Path::new("/s/x/y.css"), Path::new("/s"), Some(Path::new("/o"))),
            PathBuf::from("/o/x/y.scss")
        );
        assert_eq!(
            output_path(Path::new("/s/y.css"), Path::new("/s"), None),
            PathBuf::from("/s/y.scss")
        );
    }
}
