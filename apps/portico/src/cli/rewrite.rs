//! The `rewrite` command: walk the inputs and run the import rule on each file

use anyhow::{Context, Result};
use portico_config::AppConfig;
use portico_foundation::{RewriteError, UnitResult};
use portico_rules::{ImportRewriter, RewriteOptions};
use portico_workspace::{DiskFileStore, MarkerModuleResolver, OverlayFileStore};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Directory names never descended into
const SKIPPED_DIRS: &[&str] = &["node_modules"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Commit every rewritten file to disk
    Write,
    /// Report rewrites, write nothing
    DryRun,
    /// Report rewrites, write nothing, fail when anything would change
    Check,
}

/// Outcome of one `rewrite` run
#[derive(Debug, Default)]
pub struct RunReport {
    pub scanned: usize,
    pub rewritten: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, RewriteError)>,
}

/// Run the rule over every file reachable from `paths`
///
/// All writes are staged first. A file whose rewrite fails is never staged,
/// so the other files of the run still get committed.
pub fn run(config: &AppConfig, paths: &[PathBuf], mode: RunMode) -> Result<RunReport> {
    let files = collect_files(config, paths)?;
    let root = workspace_root(config)?;
    info!(files = files.len(), workspace = %root.display(), ?mode, "Starting import rewrite");

    let overlay = OverlayFileStore::new(DiskFileStore::new());
    let resolver = MarkerModuleResolver::new(&overlay)
        .with_marker_suffix(config.rules.module_marker_suffix.as_str())
        .with_excluded_suffixes(config.rules.excluded_marker_suffixes.iter().cloned());
    let rewriter = ImportRewriter::new(&overlay, &resolver).with_options(RewriteOptions {
        container_segment: config.rules.container_segment.clone(),
        workspace_root: Some(root),
        on_layout_mismatch: config.rules.on_layout_mismatch,
    });

    let mut report = RunReport {
        scanned: files.len(),
        ..RunReport::default()
    };
    for file in files {
        match rewriter.rewrite_imports(&file) {
            Ok(UnitResult::Rewritten(_)) => report.rewritten.push(file),
            Ok(UnitResult::Unchanged) => {}
            Err(e) => report.failed.push((file, e)),
        }
    }

    match mode {
        RunMode::Write => {
            overlay
                .commit()
                .context("Failed to write rewritten files")?;
        }
        RunMode::DryRun | RunMode::Check => {
            overlay.discard();
        }
    }
    Ok(report)
}

/// Directory the container segment is anchored to: `rules.workspace_root`,
/// or the working directory when unset. Canonical, like the collected files.
pub fn workspace_root(config: &AppConfig) -> Result<PathBuf> {
    let root = match &config.rules.workspace_root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("Cannot determine working directory")?,
    };
    fs::canonicalize(&root)
        .with_context(|| format!("Cannot access workspace root {}", root.display()))
}

/// Absolute, sorted, de-duplicated list of files to process
///
/// Files named explicitly are always included. Files found by walking a
/// directory are included when their extension is configured.
pub fn collect_files(config: &AppConfig, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in paths {
        let input = fs::canonicalize(input)
            .with_context(|| format!("Cannot access {}", input.display()))?;

        if input.is_file() {
            files.push(input);
            continue;
        }

        for entry in WalkDir::new(&input)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e.path()))
        {
            let entry = entry.with_context(|| format!("Failed to walk {}", input.display()))?;
            if entry.file_type().is_file() && config.handles_file(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }
    files.sort();
    files.dedup();
    debug!(count = files.len(), "Collected files");
    Ok(files)
}

fn is_skipped_dir(path: &Path) -> bool {
    if !path.is_dir() {
        return false;
    }
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.starts_with('.') || SKIPPED_DIRS.contains(&name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn relative(root: &Path, files: Vec<PathBuf>) -> Vec<String> {
        let root = fs::canonicalize(root).unwrap();
        files
            .iter()
            .map(|f| f.strip_prefix(&root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_collect_files_skips_hidden_and_node_modules() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "projects/a/a.module.ts", "");
        write(tmp.path(), "projects/a/src/main.ts", "");
        write(tmp.path(), "projects/a/src/view.html", "");
        write(tmp.path(), "node_modules/pkg/index.ts", "");
        write(tmp.path(), ".cache/stale.ts", "");

        let files = collect_files(&AppConfig::default(), &[tmp.path().to_path_buf()]).unwrap();
        assert_eq!(
            relative(tmp.path(), files),
            vec!["projects/a/a.module.ts", "projects/a/src/main.ts"]
        );
    }

    #[test]
    fn test_collect_files_deduplicates_overlapping_inputs() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "src/main.ts", "");
        write(tmp.path(), "src/notes.md", "");

        let files = collect_files(
            &AppConfig::default(),
            &[tmp.path().to_path_buf(), tmp.path().join("src/main.ts"), tmp.path().join("src/notes.md")],
        )
        .unwrap();
        // Explicit files are kept whatever their extension
        assert_eq!(relative(tmp.path(), files), vec!["src/main.ts", "src/notes.md"]);
    }

    #[test]
    fn test_collect_files_missing_input() {
        let tmp = TempDir::new().unwrap();
        let err = collect_files(&AppConfig::default(), &[tmp.path().join("missing")]).unwrap_err();
        assert!(err.to_string().contains("Cannot access"));
    }

    #[test]
    fn test_workspace_under_projects_directory() {
        let tmp = TempDir::new().unwrap();
        let ws = tmp.path().join("projects/acme-ws");
        write(&ws, "projects/lib-a/lib-a.module.ts", "");
        write(&ws, "projects/lib-a/src/a.ts", "import { B } from '../../lib-b/src/b';\n");
        write(&ws, "projects/lib-b/lib-b.module.ts", "");

        let mut config = AppConfig::default();
        config.rules.workspace_root = Some(ws.clone());
        run(&config, &[ws.join("projects")], RunMode::Write).unwrap();

        assert_eq!(
            fs::read_to_string(ws.join("projects/lib-a/src/a.ts")).unwrap(),
            "import { B } from 'lib-b';\n"
        );
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let source = "import { B } from '../../lib-b/src/b';\n";
        write(tmp.path(), "projects/lib-a/lib-a.module.ts", "");
        write(tmp.path(), "projects/lib-a/src/a.ts", source);
        write(tmp.path(), "projects/lib-b/lib-b.module.ts", "");

        let mut config = AppConfig::default();
        config.rules.workspace_root = Some(tmp.path().to_path_buf());

        let report = run(&config, &[tmp.path().to_path_buf()], RunMode::DryRun).unwrap();
        assert_eq!(report.scanned, 3);
        assert_eq!(report.rewritten.len(), 1);
        assert!(report.failed.is_empty());
        assert_eq!(
            fs::read_to_string(tmp.path().join("projects/lib-a/src/a.ts")).unwrap(),
            source
        );

        run(&config, &[tmp.path().to_path_buf()], RunMode::Write).unwrap();
        assert_eq!(
            fs::read_to_string(tmp.path().join("projects/lib-a/src/a.ts")).unwrap(),
            "import { B } from 'lib-b';\n"
        );
    }
}
