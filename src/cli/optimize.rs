//! `pagetune optimize`: run the pipeline over HTML files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use jwalk::WalkDir;
use pagetune::logger::ProgressLine;
use pagetune::{PagetuneConfig, Pipeline, debug, log};
use rayon::prelude::*;

use super::args::OptimizeArgs;

/// One page to rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Job {
    input: PathBuf,
    output: PathBuf,
}

pub fn run_optimize(args: &OptimizeArgs, config: &PagetuneConfig) -> Result<()> {
    let config = with_page_preload(config, args.page_preload.as_deref());
    let pipeline = Pipeline::from_config(&config);
    let jobs = collect_jobs(&args.paths, args.output.as_deref())?;

    if args.dry {
        let [job] = jobs.as_slice() else {
            bail!("--dry takes exactly one html file, got {}", jobs.len());
        };
        let html = read_page(&job.input)?;
        print!("{}", pipeline.run(html, &config));
        return Ok(());
    }

    if jobs.is_empty() {
        log!("optimize"; "no html files found");
        return Ok(());
    }
    if pipeline.is_empty() {
        log!("optimize"; "no stage enabled, pages are left as they are");
    }

    let progress = ProgressLine::new(&[("pages", jobs.len())]);
    let results: Vec<Result<bool>> = jobs
        .par_iter()
        .map(|job| {
            let result = process_page(job, &pipeline, &config);
            progress.inc("pages");
            result
        })
        .collect();
    progress.finish();

    let mut changed = 0;
    let mut failed = 0;
    for (job, result) in jobs.iter().zip(results) {
        match result {
            Ok(true) => changed += 1,
            Ok(false) => {}
            Err(e) => {
                failed += 1;
                log!("error"; "{}: {:#}", job.input.display(), e);
            }
        }
    }

    log!("optimize"; "rewrote {} of {} page(s)", changed, jobs.len());
    if failed > 0 {
        bail!("{failed} page(s) failed");
    }
    Ok(())
}

/// Config with per-page preloads from the command line, if any.
fn with_page_preload(config: &PagetuneConfig, page_preload: Option<&str>) -> PagetuneConfig {
    let mut config = config.clone();
    if let Some(list) = page_preload {
        config.hints.page_preload = list.to_string();
    }
    config
}

fn read_page(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Rewrite one page. Returns whether the content changed.
fn process_page(job: &Job, pipeline: &Pipeline, config: &PagetuneConfig) -> Result<bool> {
    let html = read_page(&job.input)?;
    let rewritten = pipeline.run(html.clone(), config);
    let changed = rewritten != html;

    if !changed && job.output == job.input {
        debug!("optimize"; "unchanged: {}", job.input.display());
        return Ok(false);
    }

    if let Some(parent) = job.output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&job.output, rewritten)
        .with_context(|| format!("failed to write {}", job.output.display()))?;
    Ok(changed)
}

/// Expand `paths` into pages, pairing each with its destination.
///
/// Files map to `output/<file name>`, directories keep their layout under
/// `output`. Without an output directory pages are rewritten in place.
fn collect_jobs(paths: &[PathBuf], output: Option<&Path>) -> Result<Vec<Job>> {
    let mut jobs = Vec::new();

    for path in paths {
        if path.is_dir() {
            jobs.extend(collect_pages(path).into_iter().map(|input| {
                let output = match output {
                    Some(dir) => dir.join(input.strip_prefix(path).unwrap_or(&input)),
                    None => input.clone(),
                };
                Job { input, output }
            }));
        } else if path.is_file() {
            let output = match (output, path.file_name()) {
                (Some(dir), Some(name)) => dir.join(name),
                _ => path.clone(),
            };
            jobs.push(Job {
                input: path.clone(),
                output,
            });
        } else {
            bail!("no such file or directory: {}", path.display());
        }
    }

    Ok(jobs)
}

/// Every HTML file below `dir`, in path order.
fn collect_pages(dir: &Path) -> Vec<PathBuf> {
    let mut pages: Vec<_> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|path| is_html(path))
        .collect();
    pages.sort();
    pages
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PAGE: &str = "<html><head>\
        <link rel=\"stylesheet\" href=\"https://fonts.googleapis.com/css?family=Roboto\">\
        <link rel=\"stylesheet\" href=\"/a.css\"></head><body></body></html>";

    fn args(paths: Vec<PathBuf>, output: Option<PathBuf>) -> OptimizeArgs {
        OptimizeArgs {
            paths,
            output,
            page_preload: None,
            dry: false,
        }
    }

    fn remove_fonts() -> PagetuneConfig {
        PagetuneConfig::from_str("[fonts]\nmode = \"remove\"").unwrap()
    }

    #[test]
    fn test_collect_jobs_directory_layout() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("posts")).unwrap();
        fs::write(dir.path().join("index.html"), "").unwrap();
        fs::write(dir.path().join("posts/a.HTM"), "").unwrap();
        fs::write(dir.path().join("style.css"), "").unwrap();

        let out = Path::new("/out");
        let jobs = collect_jobs(&[dir.path().to_path_buf()], Some(out)).unwrap();
        let outputs: Vec<_> = jobs.iter().map(|j| j.output.clone()).collect();
        assert_eq!(outputs, vec![out.join("index.html"), out.join("posts/a.HTM")]);
    }

    #[test]
    fn test_collect_jobs_missing_path() {
        let err = collect_jobs(&[PathBuf::from("/nonexistent/page.html")], None).unwrap_err();
        assert!(err.to_string().contains("no such file"));
    }

    #[test]
    fn test_optimize_in_place() {
        let dir = TempDir::new().unwrap();
        let page = dir.path().join("index.html");
        fs::write(&page, PAGE).unwrap();

        run_optimize(&args(vec![page.clone()], None), &remove_fonts()).unwrap();

        let out = fs::read_to_string(&page).unwrap();
        assert!(!out.contains("fonts.googleapis.com"));
        assert!(out.contains("/a.css"));
    }

    #[test]
    fn test_optimize_into_output_dir() {
        let src = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("blog")).unwrap();
        fs::write(src.path().join("blog/index.html"), PAGE).unwrap();

        run_optimize(
            &args(vec![src.path().to_path_buf()], Some(out.path().to_path_buf())),
            &remove_fonts(),
        )
        .unwrap();

        // Source untouched, result written below the output dir
        assert_eq!(fs::read_to_string(src.path().join("blog/index.html")).unwrap(), PAGE);
        let written = fs::read_to_string(out.path().join("blog/index.html")).unwrap();
        assert!(!written.contains("fonts.googleapis.com"));
    }

    #[test]
    fn test_dry_requires_single_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.html"), PAGE).unwrap();
        fs::write(dir.path().join("b.html"), PAGE).unwrap();

        let mut args = args(vec![dir.path().to_path_buf()], None);
        args.dry = true;
        assert!(run_optimize(&args, &remove_fonts()).is_err());
        // Nothing written
        assert_eq!(fs::read_to_string(dir.path().join("a.html")).unwrap(), PAGE);
    }

    #[test]
    fn test_page_preload_override() {
        let config = with_page_preload(&PagetuneConfig::default(), Some("https://x.com/a.webp"));
        assert_eq!(config.hints.page_preload, "https://x.com/a.webp");
        assert_eq!(Pipeline::from_config(&config).names(), vec!["preload"]);
    }
}
