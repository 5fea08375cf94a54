use std::sync::Arc;

use dioxus::prelude::ReadableExt;
use detective_core::model::Address;
use tokio::sync::Notify;

use super::test_harness::{StubContract, ViewKind, drive_dom, setup_view_harness};
use crate::views::ViewError;
use crate::vm::QuizIntent;

fn correct_index(harness: &super::test_harness::ViewHarness) -> usize {
    let handles = harness.quiz_handles.clone().expect("quiz handles");
    harness
        .dom
        .in_runtime(|| {
            handles
                .vm()
                .read()
                .as_ref()
                .and_then(|vm| vm.session().current_question().map(|q| q.correct_index))
        })
        .expect("current question")
}

fn dispatch(harness: &super::test_harness::ViewHarness, intent: QuizIntent) {
    let handles = harness.quiz_handles.clone().expect("quiz handles");
    harness.dom.in_runtime(|| handles.dispatch().call(intent));
}

#[tokio::test(flavor = "current_thread")]
async fn about_view_smoke_renders_case() {
    let mut harness = setup_view_harness(ViewKind::About, StubContract::new(Vec::new()));
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("About Base Detective"), "missing title in {html}");
    assert!(html.contains("Active case: #1"), "missing case id in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_first_question() {
    let mut harness = setup_view_harness(ViewKind::Home, StubContract::new(Vec::new()));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("The Vanishing Vault"), "missing title in {html}");
    assert!(html.contains("Question 1 of 1"), "missing progress in {html}");
    assert!(html.contains("The flash loan"), "missing option in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_records_a_flawless_run() {
    let mut harness = setup_view_harness(ViewKind::Home, StubContract::new(Vec::new()));
    harness.settle().await;

    let correct = correct_index(&harness);
    dispatch(&harness, QuizIntent::Select(correct));
    drive_dom(&mut harness.dom);
    let html = harness.render();
    assert!(html.contains("Perfect Investigation"), "missing verdict in {html}");
    assert!(html.contains("Record on-chain"), "missing record button in {html}");

    dispatch(&harness, QuizIntent::Record);
    for _ in 0..4 {
        harness.drive_async().await;
    }
    assert_eq!(*harness.contract.results.lock().unwrap(), vec![1]);
    let html = harness.render();
    assert!(html.contains("Recorded on-chain: 0xc0ffee"), "missing receipt in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_keeps_result_visible_while_recording() {
    let gate = Arc::new(Notify::new());
    let mut contract = StubContract::new(Vec::new());
    contract.write_gate = Some(gate.clone());
    let mut harness = setup_view_harness(ViewKind::Home, contract);
    harness.settle().await;

    let correct = correct_index(&harness);
    dispatch(&harness, QuizIntent::Select(correct));
    drive_dom(&mut harness.dom);
    dispatch(&harness, QuizIntent::Record);
    for _ in 0..2 {
        harness.drive_async().await;
    }
    let html = harness.render();
    assert!(html.contains("Recording result on-chain..."), "missing pending text in {html}");
    assert!(html.contains("The Vanishing Vault"), "case header dropped in {html}");
    assert!(!html.contains("Opening the case file"), "fell back to loading in {html}");
    assert!(harness.contract.results.lock().unwrap().is_empty());

    gate.notify_one();
    for _ in 0..4 {
        harness.drive_async().await;
    }
    let html = harness.render();
    assert!(html.contains("Recorded on-chain: 0xc0ffee"), "missing receipt in {html}");
    assert!(!html.contains("Recording result on-chain..."), "pending text stuck in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_shows_wrong_guess_feedback() {
    let mut harness = setup_view_harness(ViewKind::Home, StubContract::new(Vec::new()));
    harness.settle().await;

    let wrong = 1 - correct_index(&harness);
    dispatch(&harness, QuizIntent::Select(wrong));
    drive_dom(&mut harness.dom);
    let html = harness.render();
    assert!(html.contains("Not quite"), "missing feedback in {html}");
    assert!(html.contains("1 wrong guess"), "missing tally in {html}");
    assert!(html.contains("Question 1 of 1"), "step should not advance in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_surfaces_failed_record() {
    let mut contract = StubContract::new(Vec::new());
    contract.fail_writes = true;
    let mut harness = setup_view_harness(ViewKind::Home, contract);
    harness.settle().await;

    let correct = correct_index(&harness);
    dispatch(&harness, QuizIntent::Select(correct));
    drive_dom(&mut harness.dom);
    dispatch(&harness, QuizIntent::Record);
    for _ in 0..4 {
        harness.drive_async().await;
    }
    let html = harness.render();
    assert!(
        html.contains(ViewError::ProviderUnavailable.message()),
        "missing provider error in {html}"
    );
    assert!(html.contains("Try again"), "missing restart in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn leaderboard_view_smoke_renders_ranked_rows() {
    let leader = Address::from_bytes([0xab; 20]);
    let other = Address::from_bytes([0xcd; 20]);
    let mut harness = setup_view_harness(
        ViewKind::Leaderboard,
        StubContract::new(vec![other, leader, leader]),
    );
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("2 cases closed"), "missing count in {html}");
    assert!(html.contains(&leader.short()), "missing leader in {html}");
    let leader_at = html.find(&leader.short()).expect("leader row");
    let other_at = html.find(&other.short()).expect("other row");
    assert!(leader_at < other_at, "leader should rank first in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn leaderboard_view_smoke_renders_error_state() {
    let mut contract = StubContract::new(Vec::new());
    contract.fail_reads = true;
    let mut harness = setup_view_harness(ViewKind::Leaderboard, contract);
    harness.settle().await;
    let html = harness.render();
    let expected = ViewError::from_chain(&services::ChainError::Reverted("paused".into())).message();
    assert!(html.contains(expected), "missing error in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn playground_view_smoke_renders_challenge() {
    let mut harness = setup_view_harness(ViewKind::Playground, StubContract::new(Vec::new()));
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Reentrancy"), "missing challenge in {html}");
    assert!(html.contains("Easy"), "missing difficulty in {html}");
    assert!(html.contains("Next challenge"), "missing next button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn tools_view_smoke_renders_form() {
    let mut harness = setup_view_harness(ViewKind::Tools, StubContract::new(Vec::new()));
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Address Analyzer"), "missing title in {html}");
    assert!(html.contains("Analyze"), "missing button in {html}");
    assert!(harness.opener.opened.lock().unwrap().is_empty());
}
