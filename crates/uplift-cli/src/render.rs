use std::io::IsTerminal;
use std::time::Duration;

use anstyle::{AnsiColor, Effects, Style};
use indicatif::{ProgressBar, ProgressStyle};
use uplift_core::UpgradeCandidate;
use uplift_engine::{BatchReport, SelectionSession};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn current_output_style() -> OutputStyle {
    if std::env::var_os("NO_COLOR").is_some() {
        return OutputStyle::Plain;
    }
    if std::io::stdout().is_terminal() {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

/// Rows reserved above the candidate list. Row numbering is part of the
/// list protocol: data rows start at row 5, so index 0 renders on row 5.
pub(crate) const SELECTION_HEADER_ROWS: usize = 4;

pub(crate) fn format_candidate_lines(candidates: &[UpgradeCandidate]) -> Vec<String> {
    candidates
        .iter()
        .map(UpgradeCandidate::describe)
        .collect()
}

/// The selection list: four header rows, then one row per candidate with
/// a one-character marker column (`S` selected, space unselected).
pub(crate) fn format_selection_lines(session: &SelectionSession) -> Vec<String> {
    let mut lines = vec![
        format!("Upgradeable packages ({})", session.len()),
        "Marker: S = selected for upgrade".to_string(),
        "Keys: j/k move, s select, u unselect, a all, n none, space toggle, x commit, q quit"
            .to_string(),
        "-".repeat(72),
    ];
    for (index, candidate) in session.candidates().iter().enumerate() {
        let marker = if session.is_selected(index) { 'S' } else { ' ' };
        lines.push(format!("{marker} {}", candidate.describe()));
    }
    lines
}

/// Per-item outcome lines plus a closing tally; failures are reported by
/// name, never just as a count.
pub(crate) fn format_batch_summary(report: &BatchReport) -> Vec<String> {
    if report.is_empty() {
        return vec!["No packages selected; nothing to do".to_string()];
    }

    let mut lines = Vec::new();
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(()) => lines.push(format!("upgraded {}", outcome.name)),
            Err(failure) => lines.push(format!(
                "failed {} ({}): {}",
                outcome.name,
                failure.kind.as_str(),
                failure.message
            )),
        }
    }

    let total = report.outcomes.len();
    let failed = report.failure_count();
    if failed == 0 {
        lines.push(format!("{total} package(s) upgraded"));
    } else {
        lines.push(format!("{} package(s) upgraded, {failed} failed", total - failed));
        lines.push(format!("failed: {}", report.failed_names().join(", ")));
    }
    lines
}

pub(crate) fn render_status_line(style: OutputStyle, status: &str, message: &str) -> String {
    match style {
        OutputStyle::Plain => format!("[{status}] {message}"),
        OutputStyle::Rich => format!("{} {message}", colorize(status_style(status), status)),
    }
}

pub(crate) fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}

pub(crate) fn cursor_style() -> Style {
    Style::new().effects(Effects::INVERT)
}

fn status_style(status: &str) -> Style {
    match status {
        "ok" => Style::new()
            .fg_color(Some(AnsiColor::Green.into()))
            .effects(Effects::BOLD),
        "failed" => Style::new()
            .fg_color(Some(AnsiColor::Red.into()))
            .effects(Effects::BOLD),
        _ => Style::new().fg_color(Some(AnsiColor::BrightBlue.into())),
    }
}

pub(crate) fn start_batch_progress(style: OutputStyle, total: u64) -> Option<ProgressBar> {
    if style != OutputStyle::Rich || total == 0 {
        return None;
    }

    let progress_bar = ProgressBar::new(total);
    if let Ok(template) = ProgressStyle::with_template(
        "{spinner:.cyan.bold} {msg:<8} [{bar:20.cyan/blue}] {pos:>3}/{len:3}",
    ) {
        progress_bar.set_style(template.progress_chars("=>-"));
    }
    progress_bar.set_message("upgrade");
    progress_bar.enable_steady_tick(Duration::from_millis(80));
    Some(progress_bar)
}
