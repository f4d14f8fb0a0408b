use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use triage::classify_run;
use triage::types::{Outcome, RunArtifact};

fn known(messages: &[&str]) -> BTreeSet<String> {
    messages.iter().map(|m| m.to_string()).collect()
}

#[test]
fn panic_with_known_message_is_known_true_positive() {
    let run = RunArtifact::new("", "Panic: out of memory", 1);
    assert_eq!(
        classify_run(&run, &known(&["out of memory"])),
        Outcome::KnownTruePositive
    );
}

#[test]
fn not_yet_implemented_wins_over_true_positive() {
    let run = RunArtifact::new("", "not yet implemented: CTE", 1);
    assert_eq!(
        classify_run(&run, &known(&["CTE"])),
        Outcome::FalsePositive
    );

    let shouting = RunArtifact::new("thread panicked", "NOT YET IMPLEMENTED: window functions", 101);
    assert_eq!(classify_run(&shouting, &known(&[])), Outcome::FalsePositive);
}

#[test]
fn clean_run_is_negative() {
    let run = RunArtifact::new("", "", 0);
    assert_eq!(classify_run(&run, &known(&["anything"])), Outcome::Negative);

    let chatty = RunArtifact::new("all 42 queries ok", "warning: slow query", 0);
    assert_eq!(classify_run(&chatty, &known(&[])), Outcome::Negative);
}

#[test]
fn nonzero_exit_without_known_message_is_unknown() {
    let run = RunArtifact::new("", "segfault", 139);
    assert_eq!(classify_run(&run, &known(&[])), Outcome::UnknownTruePositive);

    let other = RunArtifact::new("", "segfault", 139);
    assert_eq!(
        classify_run(&other, &known(&["out of memory"])),
        Outcome::UnknownTruePositive
    );
}

#[test]
fn panic_or_simulation_failure_counts_as_bug_with_zero_exit() {
    let panic_on_stdout = RunArtifact::new("thread 'main' PANICKED at src/lib.rs", "", 0);
    assert_eq!(
        classify_run(&panic_on_stdout, &known(&[])),
        Outcome::UnknownTruePositive
    );

    let sim_failed = RunArtifact::new("", "Simulation Failed: integrity check", 0);
    assert_eq!(
        classify_run(&sim_failed, &known(&["integrity CHECK"])),
        Outcome::KnownTruePositive
    );
}

#[test]
fn known_message_may_appear_on_stdout() {
    let run = RunArtifact::new("assertion failed: cell_count > 0", "", 2);
    assert_eq!(
        classify_run(&run, &known(&["unrelated", "Assertion failed: cell_count"])),
        Outcome::KnownTruePositive
    );
}

#[test]
fn not_yet_implemented_on_stdout_is_not_a_false_positive() {
    // Only stderr is checked for unimplemented features
    let run = RunArtifact::new("not yet implemented", "", 1);
    assert_eq!(classify_run(&run, &known(&[])), Outcome::UnknownTruePositive);
}
