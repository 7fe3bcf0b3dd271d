//! DiskTidy: disk usage survey and cache/temp cleanup.
//!
//! Thin binary entry point. All logic lives in the `disktidy-core` crate;
//! this file only parses arguments and prints results.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use disktidy_core::analysis::{collect_leaves, duplicate_candidates, find_stale_files, top_n_by_size};
use disktidy_core::catalog::{BaseDirs, Catalog, Whitelist};
use disktidy_core::config::EngineConfig;
use disktidy_core::export::{export_summary_csv, write_leaves_csv};
use disktidy_core::model::size::{format_bytes, format_count, format_duration};
use disktidy_core::model::{Category, Node, Summary, Target};
use disktidy_core::remediate::{progress_channel, RemediationProgress, Remediator, Strategy};
use disktidy_core::scanner::survey;
use disktidy_core::task::{builtin_tasks, run_tasks};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "disktidy", version, about = "Disk usage survey and cleanup")]
struct Cli {
    /// Enable debug logging.
    #[arg(long, global = true)]
    verbose: bool,

    /// JSON engine configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Survey disk usage under a path.
    Analyze {
        path: PathBuf,
        /// Maximum depth to expand.
        #[arg(short, long)]
        depth: Option<usize>,
        /// Include dot-named files and folders.
        #[arg(long)]
        hidden: bool,
        /// Drop subtrees smaller than this many bytes.
        #[arg(long)]
        min_size: Option<u64>,
        /// Number of largest files to list.
        #[arg(long, default_value_t = 10)]
        top: usize,
        /// List same-size file groups (candidates only, contents are not compared).
        #[arg(long)]
        duplicates: bool,
        /// List files not modified in this many days.
        #[arg(long)]
        stale_days: Option<u64>,
        /// Write every surveyed file to a CSV file.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Discover and remove temporary files, caches and logs.
    Clean {
        /// Categories to include (temp,cache,logs,browser,updates,...). Default: all.
        #[arg(long, value_delimiter = ',')]
        categories: Vec<Category>,
        /// Report what would be freed without deleting anything.
        #[arg(long)]
        dry_run: bool,
        /// Delete file by file, leaving locked files behind.
        #[arg(long)]
        best_effort: bool,
        /// JSON whitelist of protected paths.
        #[arg(long)]
        whitelist: Option<PathBuf>,
        /// Write the per-target results to a CSV file.
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Run the built-in filesystem maintenance tasks.
    Tasks {
        /// List the tasks without running them.
        #[arg(long)]
        dry_run: bool,
    },
    /// Manage a whitelist file of protected paths.
    Whitelist {
        file: PathBuf,
        #[command(subcommand)]
        action: WhitelistAction,
    },
}

#[derive(Subcommand)]
enum WhitelistAction {
    List,
    Add { path: PathBuf },
    Remove { path: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Analyze {
            path,
            depth,
            hidden,
            min_size,
            top,
            duplicates,
            stale_days,
            export,
        } => {
            let mut survey_config = config.survey.clone();
            if let Some(depth) = depth {
                survey_config.max_depth = depth;
            }
            if let Some(min_size) = min_size {
                survey_config.min_size = min_size;
            }
            survey_config.show_hidden |= hidden;

            let root = survey(&path, &survey_config)?;
            print_tree_summary(&root);
            print_top_files(&root, top);
            if duplicates {
                print_duplicates(&root);
            }
            if let Some(days) = stale_days {
                print_stale(&root, days, top);
            }
            if let Some(out) = export {
                let file = std::fs::File::create(&out)
                    .with_context(|| format!("cannot create {}", out.display()))?;
                write_leaves_csv(&collect_leaves(&root), file)?;
                println!("\nWrote {}", out.display());
            }
        }
        Command::Clean {
            categories,
            dry_run,
            best_effort,
            whitelist,
            export,
        } => {
            let protected = config.whitelist();
            if let Some(file) = whitelist {
                for path in load_whitelist(&file)?.paths() {
                    protected.protect(Path::new(&path));
                }
            }
            let catalog = Catalog::new(BaseDirs::from_env(), Arc::new(protected));
            let targets = catalog.discover(&categories);
            if targets.is_empty() {
                println!("Nothing to clean.");
                return Ok(());
            }

            println!("Discovered targets:");
            for t in &targets {
                let lock = if t.protected { " [protected]" } else { "" };
                println!(
                    "  {:<26} {:>10}  {:>8} files  {}{}",
                    t.name,
                    format_bytes(t.size),
                    format_count(t.item_count),
                    t.category,
                    lock
                );
            }

            let mut remediator = Remediator::from_config(&config.remediation, dry_run);
            if best_effort {
                remediator = remediator.with_strategy(Strategy::BestEffort);
            }
            let summary = run_with_progress(remediator, &targets);
            print_summary(&summary, dry_run);
            if let Some(out) = export {
                export_summary_csv(&summary, &out)?;
                println!("Wrote {}", out.display());
            }
        }
        Command::Tasks { dry_run } => {
            let tasks = builtin_tasks(&BaseDirs::from_env());
            for task in &tasks {
                println!(
                    "  {:<18} {:<8} {:?}  {}",
                    task.name, task.category, task.impact, task.description
                );
            }
            let report = run_tasks(&tasks, dry_run, config.remediation.retry_policy());
            println!(
                "\n{} of {} task(s) completed, {} failed",
                report.successful, report.total, report.failed
            );
            for (description, error) in &report.failed_tasks {
                println!("  failed: {description}: {error}");
            }
        }
        Command::Whitelist { file, action } => {
            let wl = load_whitelist(&file)?;
            match action {
                WhitelistAction::List => {}
                WhitelistAction::Add { path } => {
                    wl.protect(&path);
                    wl.save(&file)?;
                }
                WhitelistAction::Remove { path } => {
                    wl.unprotect(&path);
                    wl.save(&file)?;
                }
            }
            for path in wl.paths() {
                println!("{path}");
            }
        }
    }

    Ok(())
}

fn load_whitelist(file: &Path) -> Result<Whitelist> {
    if !file.exists() {
        return Ok(Whitelist::new());
    }
    Whitelist::load(file).with_context(|| format!("failed to load whitelist {}", file.display()))
}

/// Run remediation while a second thread prints progress lines.
fn run_with_progress(remediator: Remediator, targets: &[Target]) -> Summary {
    let (tx, rx) = progress_channel();
    let remediator = remediator.with_progress(tx);
    std::thread::scope(|s| {
        s.spawn(move || {
            for message in rx {
                if let RemediationProgress::Processing { index, total, name } = message {
                    println!("[{index}/{total}] {name}");
                }
            }
        });
        let summary = remediator.run(targets);
        // Closing the channel ends the printer thread.
        drop(remediator);
        summary
    })
}

fn print_tree_summary(root: &Node) {
    println!(
        "{}  {}  ({} files, {} large)",
        root.path.display(),
        format_bytes(root.size),
        format_count(root.item_count),
        root.large_file_count
    );
    for child in &root.children {
        let percent = if root.size > 0 {
            child.size as f64 / root.size as f64 * 100.0
        } else {
            0.0
        };
        let marker = if child.is_dir { "/" } else { "" };
        println!(
            "  {:>10}  {:>5.1}%  {}{}",
            format_bytes(child.size),
            percent,
            child.name,
            marker
        );
    }
}

fn print_top_files(root: &Node, n: usize) {
    let top = top_n_by_size(root, n);
    if top.is_empty() {
        return;
    }
    println!("\nLargest files:");
    for file in top {
        println!("  {:>10}  {}", format_bytes(file.size), file.path.display());
    }
}

fn print_duplicates(root: &Node) {
    let groups = duplicate_candidates(root);
    println!("\nSame-size groups (candidates only, contents not compared):");
    for group in groups.iter().take(20) {
        println!(
            "  {} x {} (up to {} reclaimable)",
            group.files.len(),
            format_bytes(group.size),
            format_bytes(group.reclaimable())
        );
        for file in &group.files {
            println!("      {}", file.path.display());
        }
    }
}

fn print_stale(root: &Node, days: u64, n: usize) {
    println!("\nFiles untouched for {days}+ days:");
    for stale in find_stale_files(root, days, n) {
        println!(
            "  {:>10}  {:>5}d  {}",
            format_bytes(stale.node.size),
            stale.age_days,
            stale.node.path.display()
        );
    }
}

fn print_summary(summary: &Summary, dry_run: bool) {
    let verb = if dry_run { "Would free" } else { "Freed" };
    println!(
        "\n{} {} across {} files ({} succeeded, {} failed) in {}",
        verb,
        format_bytes(summary.total_space_freed),
        format_count(summary.total_files_removed),
        summary.success_count,
        summary.failure_count,
        format_duration(summary.duration)
    );
    if summary.total_files_skipped > 0 {
        println!("{} locked file(s) left in place", format_count(summary.total_files_skipped));
    }
    for outcome in summary.results.iter().filter(|o| !o.success) {
        println!(
            "  failed: {}: {}",
            outcome.target.name,
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }
}
