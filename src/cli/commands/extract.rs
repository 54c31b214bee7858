//! Extract command - Replace delimited strings with translation calls.
//!
//! Every matched string becomes a call of the configured accessor, the needed
//! import and acquisition statements are added, and the extracted values are
//! merged into the output JSON file.
//!
//! Use `--apply` to actually rewrite files (default is dry-run mode).

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use super::super::{
    args::ExtractCommand,
    exit_status::ExitStatus,
    report::{self, ExtractSummary},
};
use crate::{
    batch::{load_known_translations, process_files},
    config::load_config,
    core::{Change, ExtractedString, KnownTranslations},
    scanner::scan_files,
    writer::ExtractedWriter,
};

pub fn extract(cmd: ExtractCommand, verbose: bool) -> Result<ExitStatus> {
    let source_root = cmd
        .common
        .source_root
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let config = load_config(&source_root)?.config;
    let (options, warnings) = config.to_options()?;

    report::print_config_warnings_to(&warnings, &mut io::stderr().lock());

    let known = match &config.existing_translations {
        Some(path) => load_known_translations(&source_root.join(path))?,
        None => KnownTranslations::new(),
    };

    let scan = scan_files(
        &source_root,
        &config.includes,
        &config.ignores,
        config.ignore_test_files,
    );
    let outcomes = process_files(&scan.files, &options, &known);

    // locked only after the pool is done, workers log to stderr
    let mut stderr = io::stderr().lock();
    let mut stdout = io::stdout().lock();
    let mut summary = ExtractSummary {
        files_scanned: scan.files.len(),
        is_apply: cmd.apply,
        ..Default::default()
    };
    let mut extracted: Vec<ExtractedString> = Vec::new();

    for outcome in outcomes {
        let output = match outcome.result {
            Ok(output) => output,
            Err(err) => {
                summary.errors += 1;
                report::print_file_error_to(&outcome.file_path, &format!("{:#}", err), &mut stderr);
                continue;
            }
        };
        if let Some(err) = &output.error {
            summary.errors += 1;
            let message = if verbose {
                format!("{} [{}]", err, err.code())
            } else {
                err.to_string()
            };
            report::print_file_error_to(&outcome.file_path, &message, &mut stderr);
            continue;
        }
        if !output.is_modified() {
            continue;
        }

        summary.files_changed += 1;
        summary.changes += output.changes.len();
        summary.reused += output.used_existing_keys_list.len();

        if cmd.apply {
            fs::write(&outcome.file_path, &output.code)
                .with_context(|| format!("Failed to write file: {}", outcome.file_path))?;
        } else {
            preview(&outcome.file_path, &output.changes, &mut stdout);
        }
        extracted.extend(output.extracted_strings);
    }

    let output_path = output_path(&cmd, &source_root, &config.output_path);
    let mut writer = ExtractedWriter::open_or_create(&output_path)?;
    summary.extracted = writer.add_all(&extracted);
    if cmd.apply && summary.extracted > 0 {
        writer.save()?;
    }

    report::print_summary_to(&summary, &output_path.to_string_lossy(), &mut stdout);
    let _ = stdout.flush();

    if summary.errors > 0 {
        Ok(ExitStatus::Error)
    } else if summary.changes > 0 && !cmd.apply {
        Ok(ExitStatus::Failure)
    } else {
        Ok(ExitStatus::Success)
    }
}

fn output_path(cmd: &ExtractCommand, source_root: &Path, configured: &str) -> PathBuf {
    match &cmd.output {
        Some(path) => path.clone(),
        None => source_root.join(configured),
    }
}

fn preview<W: Write>(file_path: &str, changes: &[Change], writer: &mut W) {
    let content = fs::read_to_string(file_path).unwrap_or_default();
    let lines: Vec<&str> = content.lines().collect();

    for change in changes {
        let source_line = lines
            .get(change.line.saturating_sub(1))
            .copied()
            .unwrap_or("");
        report::print_change_to(change, source_line, writer);
    }
}
