use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use chrono::Local;
use uplift_catalog::{read_refresh_stamp, refresh_catalog, Catalog, CatalogLayout};
use uplift_core::{PackageStore, UpgradeCandidate};
use uplift_engine::{
    resolve_candidates, run_batch_with_observer, should_refresh, BatchReport, ScheduleSpec,
    SelectionSession,
};
use uplift_inventory::{
    default_state_root, read_installed_packages, FsPackageStore, InventoryLayout,
};

use crate::config::{load_config, UpliftConfig};
use crate::interactive::run_selection_view;
use crate::render::{
    current_output_style, format_batch_summary, format_candidate_lines, render_status_line,
    start_batch_progress,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitStatus {
    Clean,
    PartialFailure,
}

/// Everything one command invocation operates on. Each invocation opens
/// its own context; nothing is shared across invocations.
#[derive(Debug)]
pub(crate) struct CommandContext {
    pub config: UpliftConfig,
    pub catalog_layout: CatalogLayout,
    pub inventory_layout: InventoryLayout,
}

pub(crate) fn open_context(state_root: Option<PathBuf>) -> Result<CommandContext> {
    let root = match state_root {
        Some(root) => root,
        None => default_state_root()?,
    };
    let config = load_config(&root)?;
    Ok(CommandContext {
        config,
        catalog_layout: CatalogLayout::new(&root),
        inventory_layout: InventoryLayout::new(&root),
    })
}

pub(crate) fn run_check_command(
    context: &CommandContext,
    include_vc: bool,
) -> Result<ExitStatus> {
    let store = FsPackageStore::open(context.inventory_layout.clone());
    let candidates = resolve_current_candidates(context, &store, include_vc)?;

    if candidates.is_empty() {
        println!("All packages are up to date");
    } else {
        for line in format_candidate_lines(&candidates) {
            println!("{line}");
        }
    }
    Ok(ExitStatus::Clean)
}

pub(crate) fn run_upgrade_all_command(
    context: &CommandContext,
    include_vc: bool,
) -> Result<ExitStatus> {
    let mut store = FsPackageStore::open(context.inventory_layout.clone());
    let candidates = resolve_current_candidates(context, &store, include_vc)?;

    if candidates.is_empty() {
        println!("All packages are up to date");
        return Ok(ExitStatus::Clean);
    }

    let indices = (0..candidates.len()).collect::<Vec<_>>();
    let report = execute_batch(&mut store, &candidates, &indices)?;
    print_batch_summary(&report);
    Ok(exit_status_for(&report))
}

pub(crate) fn run_interactive_command(
    context: &CommandContext,
    include_vc: bool,
) -> Result<ExitStatus> {
    refresh_after_prompt_if_stale(context)?;

    let mut store = FsPackageStore::open(context.inventory_layout.clone());
    let candidates = resolve_current_candidates(context, &store, include_vc)?;

    if candidates.is_empty() {
        println!("All packages are up to date");
        return Ok(ExitStatus::Clean);
    }

    // A single candidate gets a direct confirmation instead of the list.
    if candidates.len() == 1 {
        if !confirm(&format!("Upgrade {}?", candidates[0].describe()))? {
            println!("Nothing upgraded");
            return Ok(ExitStatus::Clean);
        }
        let report = execute_batch(&mut store, &candidates, &[0])?;
        print_batch_summary(&report);
        return Ok(exit_status_for(&report));
    }

    let mut session = SelectionSession::new(candidates);
    let Some(indices) = run_selection_view(&mut session)? else {
        println!("Selection cancelled; nothing upgraded");
        return Ok(ExitStatus::Clean);
    };

    let report = execute_batch(&mut store, session.candidates(), &indices)?;
    print_batch_summary(&report);
    Ok(exit_status_for(&report))
}

pub(crate) fn run_schedule_command(context: &CommandContext, time: &str) -> Result<ExitStatus> {
    // Reject a bad spec before any timer is armed.
    let spec: ScheduleSpec = time.parse()?;
    println!("Scheduled daily upgrade check at {spec}");

    loop {
        let now = Local::now();
        let next = spec.next_occurrence_after(now);
        println!("Next run at {}", next.format("%Y-%m-%d %H:%M"));
        std::thread::sleep((next - now).to_std().unwrap_or_default());

        print_status("step", "running scheduled upgrade check");
        if let Err(err) = run_scheduled_firing(context) {
            eprintln!("scheduled run failed: {err:#}");
        }
    }
}

/// One unattended firing: non-strict staleness check, refresh without a
/// prompt, then the upgrade-all flow.
pub(crate) fn run_scheduled_firing(context: &CommandContext) -> Result<ExitStatus> {
    if let Some(source) = &context.config.catalog_source {
        let stamp = read_refresh_stamp(&context.catalog_layout);
        let due = should_refresh(
            stamp,
            current_unix_timestamp(),
            context.config.refresh_interval_days,
            false,
        );
        if due {
            let outcome = refresh_catalog(&context.catalog_layout, source)?;
            print_status(
                "ok",
                &format!("catalog refreshed ({} packages)", outcome.package_count),
            );
        }
    }

    run_upgrade_all_command(context, false)
}

pub(crate) fn run_refresh_command(context: &CommandContext) -> Result<ExitStatus> {
    let source = context
        .config
        .catalog_source
        .as_deref()
        .context("no catalog_source configured in config.toml")?;
    let outcome = refresh_catalog(&context.catalog_layout, source)?;
    print_status(
        "ok",
        &format!("catalog refreshed ({} packages)", outcome.package_count),
    );
    Ok(ExitStatus::Clean)
}

pub(crate) fn run_list_command(context: &CommandContext) -> Result<ExitStatus> {
    let installed = read_installed_packages(&context.inventory_layout)?;
    if installed.is_empty() {
        println!("No installed packages");
        return Ok(ExitStatus::Clean);
    }

    for package in installed {
        match &package.version {
            Some(version) => println!("{} {version}", package.name),
            None => println!("{} (vc)", package.name),
        }
    }
    Ok(ExitStatus::Clean)
}

/// Resolve the current candidate set against the cached catalog. The
/// config's `include_vc` is a default the flag can only widen.
pub(crate) fn resolve_current_candidates(
    context: &CommandContext,
    store: &FsPackageStore,
    include_vc_flag: bool,
) -> Result<Vec<UpgradeCandidate>> {
    let include_vc = include_vc_flag || context.config.include_vc;
    let installed = read_installed_packages(&context.inventory_layout)?;
    let catalog = load_cached_catalog(&context.catalog_layout)?;
    resolve_candidates(&installed, include_vc, store.supports_vc(), |name| {
        catalog.get(name).cloned()
    })
}

/// A catalog that was never cached resolves as empty rather than failing:
/// upgrades simply have nothing to offer until the first refresh.
fn load_cached_catalog(layout: &CatalogLayout) -> Result<Catalog> {
    let path = layout.catalog_path();
    if !path.exists() {
        return Ok(Catalog::default());
    }
    Catalog::load(&path)
}

fn refresh_after_prompt_if_stale(context: &CommandContext) -> Result<()> {
    let Some(source) = &context.config.catalog_source else {
        return Ok(());
    };

    let stamp = read_refresh_stamp(&context.catalog_layout);
    let due = should_refresh(
        stamp,
        current_unix_timestamp(),
        context.config.refresh_interval_days,
        true,
    );
    if !due {
        return Ok(());
    }

    if confirm("Package catalog is stale; refresh now?")? {
        let outcome = refresh_catalog(&context.catalog_layout, source)?;
        print_status(
            "ok",
            &format!("catalog refreshed ({} packages)", outcome.package_count),
        );
    }
    Ok(())
}

/// Drive the batch with a progress bar in rich mode. Per-item outcomes
/// land in the report; the summary prints them after the bar is gone.
pub(crate) fn execute_batch(
    store: &mut dyn PackageStore,
    candidates: &[UpgradeCandidate],
    indices: &[usize],
) -> Result<BatchReport> {
    let progress = start_batch_progress(current_output_style(), indices.len() as u64);
    let report = run_batch_with_observer(store, candidates, indices, |_| {
        if let Some(progress_bar) = &progress {
            progress_bar.inc(1);
        }
    })?;
    if let Some(progress_bar) = progress {
        progress_bar.finish_and_clear();
    }
    Ok(report)
}

fn print_batch_summary(report: &BatchReport) {
    for line in format_batch_summary(report) {
        println!("{line}");
    }
}

fn print_status(status: &str, message: &str) {
    println!(
        "{}",
        render_status_line(current_output_style(), status, message)
    );
}

fn exit_status_for(report: &BatchReport) -> ExitStatus {
    if report.all_succeeded() {
        ExitStatus::Clean
    } else {
        ExitStatus::PartialFailure
    }
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush().context("failed to flush prompt")?;

    let mut answer = String::new();
    io::stdin()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}

pub(crate) fn current_unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
