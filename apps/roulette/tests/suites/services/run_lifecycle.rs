use roulette::domain::{Phase, RoundOutcome, SummarySubmission};
use roulette::{RunCheck, SessionConfig};

use crate::support::flow::{submit_all, to_summary};
use crate::support::session::TestSession;

#[tokio::test]
async fn waits_for_every_participant() {
    let s = TestSession::with_config(2, SessionConfig::default().with_seed(8).with_alive_per_run(1)).await;
    let owner = s.owner();
    to_summary(&s.flow, &owner, RoundOutcome::Loss).await;
    let first = owner.participant(&s.ids()[0]).unwrap();
    let played = first.alive_resources.iter().next().cloned().unwrap();

    // first participant is now eliminated, but the second has not reported
    let check = s
        .flow
        .submit_summary(
            &owner,
            &first.id,
            SummarySubmission::loss(first.main_role.unwrap(), played),
        )
        .await
        .unwrap();

    assert_eq!(check, RunCheck::NotReady);
    assert_eq!(owner.phase(), Some(Phase::Summary));
    assert!(!owner.all_submitted());
}

#[tokio::test]
async fn continues_when_nobody_is_eliminated() {
    let s = TestSession::new(3).await;
    let owner = s.owner();
    to_summary(&s.flow, &owner, RoundOutcome::Loss).await;

    let check = submit_all(&s.flow, &owner, RoundOutcome::Loss).await.unwrap();

    assert_eq!(check, RunCheck::Continuing);
    assert!(owner.all_submitted());
    assert_eq!(owner.phase(), Some(Phase::Summary));
    assert_eq!(owner.round(), Some(1));
    for p in owner.participants().unwrap() {
        assert_eq!(p.alive_resources.len(), 2);
        assert_eq!(p.grave_resources.len(), 1);
    }
}

#[tokio::test]
async fn elimination_resets_the_run() {
    let config = SessionConfig::default().with_seed(8).with_alive_per_run(1);
    let s = TestSession::with_config(2, config).await;
    let owner = s.owner();
    to_summary(&s.flow, &owner, RoundOutcome::Loss).await;
    let before = owner.run_stats().unwrap();

    let check = submit_all(&s.flow, &owner, RoundOutcome::Loss).await.unwrap();

    let RunCheck::Reset {
        eliminated,
        run_counter,
    } = check
    else {
        panic!("expected a reset, got {check:?}");
    };
    assert_eq!(eliminated.len(), 2);
    assert_eq!(run_counter, before.run_counter + 1);

    let state = owner.session_state().unwrap();
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.round, 0);
    assert_eq!(state.outcome, None);

    let stats = owner.run_stats().unwrap();
    assert_eq!((stats.wins, stats.losses), (0, 0));
    assert_eq!(stats.cumulative_losses, before.cumulative_losses);

    for p in owner.participants().unwrap() {
        assert!(p.alive_resources.is_empty());
        assert!(p.grave_resources.is_empty());
        assert_eq!(p.main_role, None);
        assert_eq!(p.secondary_role, None);
        assert!(!p.locked_in);
        assert_eq!(p.last_summary, None);
        assert_eq!(p.submitted_round, None);
        // lifetime stats survive the reset
        assert_eq!(p.stats.losses, 1);
    }
}

#[tokio::test]
async fn reset_lands_in_a_single_commit() {
    let config = SessionConfig::default().with_seed(8).with_alive_per_run(1);
    let s = TestSession::with_config(3, config).await;
    let owner = s.owner();
    to_summary(&s.flow, &owner, RoundOutcome::Loss).await;
    let member = s.member(1);
    let before = s.channel.commits();

    let check = submit_all(&s.flow, &owner, RoundOutcome::Loss).await.unwrap();

    assert!(check.is_reset());
    // three summaries, one reset batch
    assert_eq!(s.channel.commits(), before + 4);
    assert_eq!(member.phase(), Some(Phase::Idle));
    assert!(member.me().unwrap().alive_resources.is_empty());
}

#[tokio::test]
async fn new_run_can_start_after_reset() {
    let config = SessionConfig::default().with_seed(8).with_alive_per_run(1);
    let s = TestSession::with_config(1, config).await;
    let owner = s.owner();
    to_summary(&s.flow, &owner, RoundOutcome::Loss).await;
    assert!(submit_all(&s.flow, &owner, RoundOutcome::Loss).await.unwrap().is_reset());

    s.flow.start_run(&owner).await.unwrap();

    assert_eq!(owner.phase(), Some(Phase::Rolling));
    assert_eq!(owner.me().unwrap().alive_resources.len(), 1);
    assert_eq!(owner.run_stats().unwrap().run_counter, 1);
}

#[tokio::test]
async fn check_is_a_no_op_outside_summary() {
    let s = TestSession::new(2).await;
    let owner = s.owner();
    s.flow.start_run(&owner).await.unwrap();
    let before = s.channel.commits();

    assert_eq!(s.flow.check_run_over(&owner).await.unwrap(), RunCheck::NotReady);
    assert_eq!(s.channel.commits(), before);
}
