use std::collections::{BTreeMap, BTreeSet};

use anyhow::bail;
use chrono::{DateTime, Local, TimeZone};
use uplift_core::{
    AvailablePackage, InstalledPackage, PackageStore, ReleaseVersion, UpgradeCandidate,
};

use super::*;

#[derive(Debug, Default)]
struct ScriptedStore {
    installed: BTreeMap<String, Vec<ReleaseVersion>>,
    vc_supported: bool,
    fail_installs: BTreeSet<String>,
    fail_vc_syncs: BTreeSet<String>,
    calls: Vec<String>,
}

impl ScriptedStore {
    fn new() -> Self {
        Self {
            vc_supported: true,
            ..Self::default()
        }
    }

    fn with_installed(mut self, name: &str, release: &str) -> Self {
        self.installed
            .entry(name.to_string())
            .or_default()
            .push(version(release));
        self
    }

    fn failing_install(mut self, name: &str) -> Self {
        self.fail_installs.insert(name.to_string());
        self
    }

    fn failing_vc_sync(mut self, name: &str) -> Self {
        self.fail_vc_syncs.insert(name.to_string());
        self
    }

    fn releases(&self, name: &str) -> Vec<String> {
        self.installed
            .get(name)
            .map(|releases| releases.iter().map(ToString::to_string).collect())
            .unwrap_or_default()
    }
}

impl PackageStore for ScriptedStore {
    fn supports_vc(&self) -> bool {
        self.vc_supported
    }

    fn install(&mut self, package: &AvailablePackage) -> anyhow::Result<()> {
        self.calls
            .push(format!("install {} {}", package.name, package.version));
        if self.fail_installs.contains(&package.name) {
            bail!("simulated install failure for '{}'", package.name);
        }
        self.installed
            .entry(package.name.clone())
            .or_default()
            .push(package.version.clone());
        Ok(())
    }

    fn installed_version(&self, name: &str) -> anyhow::Result<Option<ReleaseVersion>> {
        Ok(self
            .installed
            .get(name)
            .and_then(|releases| releases.iter().max())
            .cloned())
    }

    fn remove(&mut self, name: &str, release: &ReleaseVersion) -> anyhow::Result<()> {
        self.calls.push(format!("remove {name} {release}"));
        if let Some(releases) = self.installed.get_mut(name) {
            releases.retain(|existing| existing != release);
        }
        Ok(())
    }

    fn vc_sync(&mut self, name: &str) -> anyhow::Result<()> {
        self.calls.push(format!("vc-sync {name}"));
        if self.fail_vc_syncs.contains(name) {
            bail!("simulated vc sync failure for '{name}'");
        }
        Ok(())
    }
}

fn version(input: &str) -> ReleaseVersion {
    input.parse().expect("version must parse")
}

fn installed(name: &str, release: &str) -> InstalledPackage {
    InstalledPackage {
        name: name.to_string(),
        version: Some(version(release)),
        vc_tracked: false,
    }
}

fn vc_installed(name: &str, release: Option<&str>) -> InstalledPackage {
    InstalledPackage {
        name: name.to_string(),
        version: release.map(version),
        vc_tracked: true,
    }
}

fn available(name: &str, release: &str) -> AvailablePackage {
    AvailablePackage {
        name: name.to_string(),
        version: version(release),
        summary: None,
    }
}

fn catalog(entries: &[(&str, &str)]) -> BTreeMap<String, AvailablePackage> {
    entries
        .iter()
        .map(|(name, release)| (name.to_string(), available(name, release)))
        .collect()
}

fn local(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid local time")
}

#[test]
fn resolver_includes_strictly_newer_pairs_only() {
    let entries = catalog(&[("newer", "1.1"), ("equal", "2.0"), ("older", "0.9")]);
    let installed_set = vec![
        installed("newer", "1.0"),
        installed("equal", "2.0"),
        installed("older", "1.0"),
        installed("absent", "1.0"),
    ];

    let candidates = resolve_candidates(&installed_set, false, false, |name| {
        entries.get(name).cloned()
    })
    .expect("must resolve");

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].name(), "newer");
    assert_eq!(candidates[0].describe(), "newer (1.0) => (1.1)");
}

#[test]
fn resolver_emits_vc_packages_iff_vc_mode_enabled() {
    let entries = catalog(&[("beads", "9.9")]);
    let installed_set = vec![vc_installed("beads", Some("2.0"))];

    let without_vc = resolve_candidates(&installed_set, false, true, |name| {
        entries.get(name).cloned()
    })
    .expect("must resolve");
    assert!(without_vc.is_empty());

    let with_vc = resolve_candidates(&installed_set, true, true, |name| {
        entries.get(name).cloned()
    })
    .expect("must resolve");
    assert_eq!(with_vc.len(), 1);
    assert!(with_vc[0].is_vc());
    assert!(
        with_vc[0].available().is_none(),
        "vc candidates bypass the catalog even when an entry exists"
    );
}

#[test]
fn resolver_rejects_vc_mode_before_any_lookup() {
    let installed_set = vec![installed("tool", "1.0"), vc_installed("beads", None)];
    let mut lookups = 0;

    let err = resolve_candidates(&installed_set, true, false, |_| {
        lookups += 1;
        None
    })
    .expect_err("must reject vc mode without support");

    assert!(err.to_string().starts_with("unsupported-mode:"));
    assert_eq!(lookups, 0, "mode check happens before the scan begins");
}

#[test]
fn resolver_preserves_input_ordering() {
    let entries = catalog(&[("zeta", "2.0"), ("alpha", "2.0"), ("mid", "2.0")]);
    let installed_set = vec![
        installed("zeta", "1.0"),
        vc_installed("checkout", None),
        installed("alpha", "1.0"),
        installed("mid", "1.0"),
    ];

    let candidates = resolve_candidates(&installed_set, true, true, |name| {
        entries.get(name).cloned()
    })
    .expect("must resolve");

    let names = candidates
        .iter()
        .map(UpgradeCandidate::name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["zeta", "checkout", "alpha", "mid"]);
}

#[test]
fn missing_stamp_always_refreshes() {
    assert!(should_refresh(None, 0, 7, true));
    assert!(should_refresh(None, 0, 7, false));
}

#[test]
fn strict_threshold_is_the_full_interval() {
    let last = 1_000_000;
    assert!(!should_refresh(
        Some(last),
        last + 6 * SECONDS_PER_DAY,
        7,
        true
    ));
    assert!(should_refresh(
        Some(last),
        last + 7 * SECONDS_PER_DAY,
        7,
        true
    ));
}

#[test]
fn non_strict_threshold_is_one_day_less_than_strict() {
    let last = 1_000_000;
    for interval in 1..=10_u32 {
        for elapsed_days in 0..=12_u64 {
            let now = last + elapsed_days * SECONDS_PER_DAY;
            let strict = should_refresh(Some(last), now, interval, true);
            let relaxed = should_refresh(Some(last), now, interval, false);
            assert_eq!(
                relaxed,
                elapsed_days >= u64::from(interval).saturating_sub(1),
                "interval {interval}, elapsed {elapsed_days}"
            );
            if strict {
                assert!(relaxed, "non-strict can only be more eager than strict");
            }
        }
    }
}

#[test]
fn staleness_is_monotonic_in_elapsed_days() {
    let last = 5_000;
    let mut seen_true = false;
    for elapsed_days in 0..30_u64 {
        let due = should_refresh(Some(last), last + elapsed_days * SECONDS_PER_DAY, 7, true);
        if seen_true {
            assert!(due, "once due, staying due at elapsed {elapsed_days}");
        }
        seen_true |= due;
    }
    assert!(seen_true);
}

fn sample_candidates() -> Vec<UpgradeCandidate> {
    vec![
        UpgradeCandidate::versioned(installed("alpha", "1.0"), available("alpha", "1.1")),
        UpgradeCandidate::versioned(installed("bravo", "2.0"), available("bravo", "2.1")),
        UpgradeCandidate::versioned(installed("charlie", "3.0"), available("charlie", "3.1")),
    ]
}

#[test]
fn session_starts_with_everything_selected() {
    let session = SelectionSession::new(sample_candidates());
    assert_eq!(session.selected_indices(), vec![0, 1, 2]);
    assert!(!session.is_selection_empty());
}

#[test]
fn select_all_then_unselect_excludes_exactly_that_index() {
    let mut session = SelectionSession::new(sample_candidates());
    session.select_all();
    session.unselect(1).expect("index must be valid");

    assert_eq!(session.selected_indices(), vec![0, 2]);
    assert!(session.is_selected(0));
    assert!(!session.is_selected(1));
    assert!(session.is_selected(2));
}

#[test]
fn selection_operations_are_idempotent() {
    let mut session = SelectionSession::new(sample_candidates());
    session.unselect(2).expect("index must be valid");
    session.unselect(2).expect("unselect is idempotent");
    session.select(0).expect("select is idempotent");
    assert_eq!(session.selected_indices(), vec![0, 1]);

    session.toggle(2).expect("index must be valid");
    assert_eq!(session.selected_indices(), vec![0, 1, 2]);
}

#[test]
fn unselect_all_empties_the_selection() {
    let mut session = SelectionSession::new(sample_candidates());
    session.unselect_all();
    assert!(session.is_selection_empty());
    assert!(session.selected_indices().is_empty());
}

#[test]
fn out_of_range_selection_index_is_rejected() {
    let mut session = SelectionSession::new(sample_candidates());
    let err = session.select(3).expect_err("index 3 must be rejected");
    assert!(err
        .to_string()
        .starts_with("selection-index-out-of-range:"));
}

#[test]
fn successful_upgrade_installs_then_removes_exactly_once() {
    let mut store = ScriptedStore::new().with_installed("tool", "1.0");
    let candidate =
        UpgradeCandidate::versioned(installed("tool", "1.0"), available("tool", "1.1"));

    upgrade_candidate(&mut store, &candidate).expect("upgrade must succeed");

    assert_eq!(store.calls, vec!["install tool 1.1", "remove tool 1.0"]);
    assert_eq!(store.releases("tool"), vec!["1.1".to_string()]);
}

#[test]
fn failed_install_leaves_old_release_and_issues_no_remove() {
    let mut store = ScriptedStore::new()
        .with_installed("tool", "1.0")
        .failing_install("tool");
    let candidate =
        UpgradeCandidate::versioned(installed("tool", "1.0"), available("tool", "1.1"));

    let failure = upgrade_candidate(&mut store, &candidate).expect_err("upgrade must fail");

    assert_eq!(failure.kind, UpgradeFailureKind::InstallFailed);
    assert_eq!(failure.name, "tool");
    assert_eq!(store.calls, vec!["install tool 1.1"]);
    assert_eq!(store.releases("tool"), vec!["1.0".to_string()]);
}

#[test]
fn vc_candidate_syncs_without_install_or_remove() {
    let mut store = ScriptedStore::new();
    let candidate = UpgradeCandidate::vc(vc_installed("beads", Some("2.0")));

    upgrade_candidate(&mut store, &candidate).expect("sync must succeed");
    assert_eq!(store.calls, vec!["vc-sync beads"]);
}

#[test]
fn failed_vc_sync_reports_vc_kind() {
    let mut store = ScriptedStore::new().failing_vc_sync("beads");
    let candidate = UpgradeCandidate::vc(vc_installed("beads", None));

    let failure = upgrade_candidate(&mut store, &candidate).expect_err("sync must fail");
    assert_eq!(failure.kind, UpgradeFailureKind::VcSyncFailed);
    assert_eq!(failure.name, "beads");
}

#[test]
fn batch_attempts_every_index_despite_a_failure_in_the_middle() {
    let mut store = ScriptedStore::new()
        .with_installed("alpha", "1.0")
        .with_installed("bravo", "2.0")
        .with_installed("charlie", "3.0")
        .failing_install("bravo");

    let report =
        run_batch(&mut store, &sample_candidates(), &[0, 1, 2]).expect("batch must run");

    assert_eq!(report.outcomes.len(), 3);
    assert!(report.outcomes[0].result.is_ok());
    assert!(report.outcomes[1].result.is_err());
    assert!(report.outcomes[2].result.is_ok());
    assert_eq!(report.failed_names(), vec!["bravo"]);
    assert!(!report.all_succeeded());
    assert_eq!(report.failure_count(), 1);

    assert_eq!(store.releases("alpha"), vec!["1.1".to_string()]);
    assert_eq!(store.releases("bravo"), vec!["2.0".to_string()]);
    assert_eq!(store.releases("charlie"), vec!["3.1".to_string()]);
}

#[test]
fn batch_routes_versioned_and_vc_candidates_independently() {
    let mut store = ScriptedStore::new().with_installed("alpha", "1.0");
    let candidates = vec![
        UpgradeCandidate::versioned(installed("alpha", "1.0"), available("alpha", "1.1")),
        UpgradeCandidate::vc(vc_installed("beads", Some("2.0"))),
    ];

    let report = run_batch(&mut store, &candidates, &[0, 1]).expect("batch must run");

    assert!(report.all_succeeded());
    assert_eq!(
        store.calls,
        vec!["install alpha 1.1", "remove alpha 1.0", "vc-sync beads"]
    );
}

#[test]
fn empty_batch_is_a_no_op_report() {
    let mut store = ScriptedStore::new();
    let report = run_batch(&mut store, &sample_candidates(), &[]).expect("batch must run");
    assert!(report.is_empty());
    assert!(report.all_succeeded());
    assert!(store.calls.is_empty());
}

#[test]
fn batch_rejects_bad_indices_before_touching_the_store() {
    let mut store = ScriptedStore::new();
    let err = run_batch(&mut store, &sample_candidates(), &[0, 7])
        .expect_err("bad index must be rejected");
    assert!(err
        .to_string()
        .starts_with("selection-index-out-of-range:"));
    assert!(store.calls.is_empty(), "no mutation before validation");
}

#[test]
fn batch_observer_sees_outcomes_in_commit_order() {
    let mut store = ScriptedStore::new()
        .with_installed("alpha", "1.0")
        .with_installed("bravo", "2.0")
        .with_installed("charlie", "3.0");
    let mut seen = Vec::new();

    run_batch_with_observer(&mut store, &sample_candidates(), &[0, 2], |outcome| {
        seen.push(outcome.index);
    })
    .expect("batch must run");

    assert_eq!(seen, vec![0, 2]);
}

#[test]
fn schedule_parses_24_hour_and_12_hour_forms() {
    let cases = [
        ("07:30", 7, 30),
        ("7:30", 7, 30),
        ("23:05", 23, 5),
        ("7:30pm", 19, 30),
        ("7:30AM", 7, 30),
        ("12:05am", 0, 5),
        ("12:05pm", 12, 5),
        (" 9:00 pm ", 21, 0),
    ];
    for (input, hour, minute) in cases {
        let spec: ScheduleSpec = input.parse().expect("schedule must parse");
        assert_eq!((spec.hour(), spec.minute()), (hour, minute), "input {input:?}");
    }
}

#[test]
fn schedule_rejects_unparsable_time_specs() {
    for input in ["", "noon", "25:00", "7:60", "13:00pm", "0:30am", "7", "7:", ":30"] {
        let err = input
            .parse::<ScheduleSpec>()
            .expect_err("must reject bad spec");
        assert!(
            err.to_string().starts_with("invalid-schedule:"),
            "unexpected error for {input:?}: {err}"
        );
    }
}

#[test]
fn next_occurrence_is_later_today_when_still_ahead() {
    let spec: ScheduleSpec = "11:00".parse().expect("schedule must parse");
    let now = local(2026, 8, 7, 10, 0);
    assert_eq!(spec.next_occurrence_after(now), local(2026, 8, 7, 11, 0));
}

#[test]
fn next_occurrence_rolls_to_tomorrow_once_passed() {
    let spec: ScheduleSpec = "09:00".parse().expect("schedule must parse");
    let now = local(2026, 8, 7, 10, 0);
    assert_eq!(spec.next_occurrence_after(now), local(2026, 8, 8, 9, 0));
}

#[test]
fn next_occurrence_is_strictly_after_now() {
    let spec: ScheduleSpec = "10:00".parse().expect("schedule must parse");
    let now = local(2026, 8, 7, 10, 0);
    assert_eq!(spec.next_occurrence_after(now), local(2026, 8, 8, 10, 0));
}
