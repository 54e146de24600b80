//! Extract command: run the filter chain over report files.

use crate::cli::Cli;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use anyhow::Context;
use encoding_rs::Encoding;
use infozilla_filters::{normalize_newlines, ExtractOptions, ExtractionResult, FilterChain};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Extraction result for one input file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Input path as given
    pub file: PathBuf,

    /// Everything found in the file
    pub result: ExtractionResult,
}

/// Execute the extract command with the effective configuration.
pub async fn execute_extract(
    cli: &Cli,
    config: &Config,
    formatter: &Formatter,
) -> anyhow::Result<()> {
    let encoding = resolve_charset(&config.settings.charset)?;
    let filters = &config.filters;
    let chain = FilterChain::from_config(filters).context("failed to build filter chain")?;

    let reports = extract_all(
        Arc::new(chain),
        filters.options,
        encoding,
        cli.files.clone(),
        filters.max_concurrency,
        cli.write,
    )
    .await?;

    if cli.summary {
        for report in &reports {
            println!("{}", formatter.summary_record(report));
        }
    } else {
        let output = formatter.format_reports(&reports)?;
        if !output.is_empty() {
            println!("{}", output);
        }
    }

    if cli.write {
        eprintln!(
            "{}",
            formatter.success(&format!("Wrote results for {} file(s)", reports.len()))
        );
    }
    Ok(())
}

/// Process `files` with at most `jobs` running at once.
///
/// Reports come back in input order. The first failing file aborts the batch.
pub async fn extract_all(
    chain: Arc<FilterChain>,
    options: ExtractOptions,
    encoding: &'static Encoding,
    files: Vec<PathBuf>,
    jobs: usize,
    write: bool,
) -> anyhow::Result<Vec<FileReport>> {
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let mut handles = Vec::with_capacity(files.len());

    for path in files {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .context("worker pool closed")?;
        let chain = Arc::clone(&chain);

        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let outcome = process_file(&chain, &options, encoding, &path).and_then(|report| {
                if write {
                    write_outputs(&report, encoding)?;
                }
                Ok(report)
            });
            (path, outcome)
        }));
    }

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        let (path, outcome) = handle.await.map_err(CliError::from)?;
        let report = outcome.with_context(|| format!("failed to process {}", path.display()))?;
        reports.push(report);
    }

    info!(files = reports.len(), "Batch finished");
    Ok(reports)
}

/// Resolve a WHATWG encoding label such as `utf-8`, `latin1` or `windows-1252`.
pub fn resolve_charset(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| CliError::InvalidInput(format!("unknown charset '{}'", label)))
}

/// Read one file in `encoding` and run the chain over it.
///
/// A byte order mark overrides `encoding`. Malformed sequences are replaced
/// with U+FFFD, and line endings are normalized to `\n` before extraction.
pub fn process_file(
    chain: &FilterChain,
    options: &ExtractOptions,
    encoding: &'static Encoding,
    path: &Path,
) -> Result<FileReport> {
    let bytes = fs::read(path)?;
    let (decoded, used, had_errors) = encoding.decode(&bytes);
    if had_errors {
        warn!(file = %path.display(), charset = used.name(), "Replaced malformed input bytes");
    }

    let text = normalize_newlines(&decoded);
    let result = chain.extract(&text, options);

    debug!(
        file = %path.display(),
        patches = result.patches.len(),
        traces = result.stack_traces.len(),
        regions = result.code_regions.len(),
        "Processed file"
    );
    Ok(FileReport {
        file: path.to_path_buf(),
        result,
    })
}

/// Write `<file>.cleaned` in `encoding` and `<file>.result.json` (always UTF-8)
/// next to the input.
pub fn write_outputs(
    report: &FileReport,
    encoding: &'static Encoding,
) -> Result<(PathBuf, PathBuf)> {
    if report.file.file_name().is_none() {
        return Err(CliError::InvalidInput(format!(
            "'{}' does not name a file",
            report.file.display()
        )));
    }

    let cleaned = with_suffix(&report.file, ".cleaned");
    let json = with_suffix(&report.file, ".result.json");

    let (bytes, used, unmappable) = encoding.encode(&report.result.cleaned_text);
    if unmappable {
        debug!(charset = used.name(), "Cleaned text has characters outside the charset");
    }
    fs::write(&cleaned, bytes)?;
    fs::write(&json, serde_json::to_string_pretty(&report.result)?)?;

    debug!(cleaned = %cleaned.display(), json = %json.display(), "Wrote outputs");
    Ok((cleaned, json))
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::UTF_8;

    const REPORT: &str = "Steps:\r\n1. open the editor\r\n2. press save\r\n\r\nIt hangs.";

    #[test]
    fn test_with_suffix() {
        assert_eq!(
            with_suffix(Path::new("dir/bug 42.txt"), ".cleaned"),
            PathBuf::from("dir/bug 42.txt.cleaned")
        );
    }

    #[test]
    fn test_resolve_charset() {
        assert_eq!(resolve_charset("utf-8").unwrap(), UTF_8);
        assert_eq!(resolve_charset(" UTF8 ").unwrap(), UTF_8);
        assert_eq!(resolve_charset("latin1").unwrap().name(), "windows-1252");
        assert!(matches!(
            resolve_charset("klingon"),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_process_file_normalizes_newlines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bug.txt");
        fs::write(&path, REPORT).unwrap();

        let chain = FilterChain::java().unwrap();
        let report = process_file(&chain, &ExtractOptions::eclipse(), UTF_8, &path).unwrap();

        assert_eq!(report.file, path);
        assert_eq!(report.result.enumerations.len(), 1);
        assert_eq!(report.result.cleaned_text, "Steps:\n\nIt hangs.");
    }

    #[test]
    fn test_latin1_report_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        fs::write(&path, b"caf\xe9 crashed").unwrap();

        let latin1 = resolve_charset("latin1").unwrap();
        let chain = FilterChain::java().unwrap();
        let report = process_file(&chain, &ExtractOptions::none(), latin1, &path).unwrap();
        assert_eq!(report.result.cleaned_text, "caf\u{e9} crashed");

        let (cleaned, json) = write_outputs(&report, latin1).unwrap();
        assert_eq!(fs::read(cleaned).unwrap(), b"caf\xe9 crashed");
        assert!(fs::read_to_string(json).unwrap().contains("caf\u{e9} crashed"));
    }

    #[test]
    fn test_malformed_utf8_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        fs::write(&path, b"caf\xe9 crashed").unwrap();

        let chain = FilterChain::java().unwrap();
        let report = process_file(&chain, &ExtractOptions::none(), UTF_8, &path).unwrap();
        assert_eq!(report.result.cleaned_text, "caf\u{fffd} crashed");
    }

    #[test]
    fn test_process_missing_file() {
        let chain = FilterChain::java().unwrap();
        let result = process_file(
            &chain,
            &ExtractOptions::eclipse(),
            UTF_8,
            Path::new("/no/such/bug.txt"),
        );
        assert!(matches!(result, Err(CliError::Io(_))));
    }

    #[test]
    fn test_write_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bug.txt");
        fs::write(&path, REPORT).unwrap();

        let chain = FilterChain::java().unwrap();
        let report = process_file(&chain, &ExtractOptions::eclipse(), UTF_8, &path).unwrap();
        let (cleaned, json) = write_outputs(&report, UTF_8).unwrap();

        assert_eq!(fs::read_to_string(cleaned).unwrap(), "Steps:\n\nIt hangs.");
        let parsed: ExtractionResult =
            serde_json::from_str(&fs::read_to_string(json).unwrap()).unwrap();
        assert_eq!(parsed, report.result);
    }

    #[tokio::test]
    async fn test_extract_all_keeps_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let files: Vec<PathBuf> = (0..6)
            .map(|i| {
                let path = dir.path().join(format!("bug{}.txt", i));
                fs::write(&path, "x\n".repeat(i)).unwrap();
                path
            })
            .collect();

        let chain = Arc::new(FilterChain::java().unwrap());
        let reports = extract_all(chain, ExtractOptions::none(), UTF_8, files.clone(), 2, false)
            .await
            .unwrap();

        let order: Vec<PathBuf> = reports.into_iter().map(|r| r.file).collect();
        assert_eq!(order, files);
    }

    #[tokio::test]
    async fn test_extract_all_reports_failing_file() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.txt");
        fs::write(&good, "fine").unwrap();
        let missing = dir.path().join("missing.txt");

        let chain = Arc::new(FilterChain::java().unwrap());
        let files = vec![good, missing.clone()];
        let err = extract_all(chain, ExtractOptions::eclipse(), UTF_8, files, 4, false)
            .await
            .unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("failed to process"));
        assert!(message.contains(&missing.display().to_string()));
    }
}
