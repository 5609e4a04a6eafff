use roulette::domain::{Phase, ResourceId, Role, RoundOutcome, SummarySubmission};
use roulette::{ChannelError, ErrorCode, RunCheck, SessionConfig, SessionError};

use crate::support::flow::{summary_for, to_summary};
use crate::support::session::TestSession;

#[tokio::test]
async fn loss_moves_played_resource_to_grave() {
    let s = TestSession::new(2).await;
    let owner = s.owner();
    to_summary(&s.flow, &owner, RoundOutcome::Loss).await;
    let me = owner.me().unwrap();
    let played = me.alive_resources.iter().next().cloned().unwrap();

    let check = s
        .flow
        .submit_summary(&owner, &me.id, SummarySubmission::loss(Role::Top, played.clone()))
        .await
        .unwrap();

    let me = owner.me().unwrap();
    assert!(!me.alive_resources.contains(&played));
    assert!(me.grave_resources.contains(&played));
    assert!(me.alive_resources.is_disjoint(&me.grave_resources));
    assert_eq!(me.submitted_round, Some(1));
    assert_eq!(me.last_summary.unwrap().played_resource, Some(played));
    assert_eq!(check, RunCheck::NotReady);
}

#[tokio::test]
async fn repeated_gain_is_idempotent() {
    let s = TestSession::new(1).await;
    let owner = s.owner();
    to_summary(&s.flow, &owner, RoundOutcome::Win).await;
    let id = owner.me().unwrap().id;
    let gained = ResourceId::new("bonus-token");
    let submission = SummarySubmission::win(Role::Mid).with_gain(gained.clone());

    s.flow.submit_summary(&owner, &id, submission.clone()).await.unwrap();
    s.flow.submit_summary(&owner, &id, submission).await.unwrap();

    let me = owner.me().unwrap();
    assert_eq!(me.alive_resources.iter().filter(|r| **r == gained).count(), 1);
    assert_eq!(me.alive_resources.len(), 4);
}

#[tokio::test]
async fn resubmission_does_not_double_count_stats() {
    let s = TestSession::new(2).await;
    let owner = s.owner();
    to_summary(&s.flow, &owner, RoundOutcome::Win).await;
    let me = owner.me().unwrap();

    s.flow
        .submit_summary(&owner, &me.id, SummarySubmission::win(Role::Jungle))
        .await
        .unwrap();
    s.flow
        .submit_summary(&owner, &me.id, SummarySubmission::win(Role::Jungle))
        .await
        .unwrap();

    let stats = owner.me().unwrap().stats;
    assert_eq!(stats.rounds_played, 1);
    assert_eq!(stats.wins, 1);
    assert_eq!(stats.lane_counts.get(&Role::Jungle), Some(&1));
}

#[tokio::test]
async fn loss_without_played_resource_is_malformed() {
    let s = TestSession::new(2).await;
    let owner = s.owner();
    to_summary(&s.flow, &owner, RoundOutcome::Loss).await;
    let before = s.channel.commits();
    let submission = SummarySubmission {
        outcome: RoundOutcome::Loss,
        reported_lane: Some(Role::Adc),
        kill_participation: false,
        gained_resource: None,
        played_resource: Some(ResourceId::new("   ")),
    };

    let err = s
        .flow
        .submit_summary(&owner, &s.ids()[0], submission)
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::MalformedSummary);
    assert_eq!(s.channel.commits(), before);
}

#[tokio::test]
async fn missing_lane_is_malformed() {
    let s = TestSession::new(1).await;
    let owner = s.owner();
    to_summary(&s.flow, &owner, RoundOutcome::Win).await;
    let mut submission = SummarySubmission::win(Role::Support);
    submission.reported_lane = None;

    let err = s
        .flow
        .submit_summary(&owner, &s.ids()[0], submission)
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::MalformedSummary { .. }));
}

#[tokio::test]
async fn unknown_participant_is_missing_state() {
    let s = TestSession::new(1).await;
    let owner = s.owner();
    to_summary(&s.flow, &owner, RoundOutcome::Win).await;

    let err = s
        .flow
        .submit_summary(
            &owner,
            &roulette::domain::ParticipantId::new("ghost"),
            SummarySubmission::win(Role::Mid),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::MissingState);
}

#[tokio::test]
async fn failed_write_leaves_participant_untouched() {
    let s = TestSession::new(2).await;
    let owner = s.owner();
    to_summary(&s.flow, &owner, RoundOutcome::Loss).await;
    let before = owner.me().unwrap();
    s.channel
        .fail_next_write(ChannelError::Unavailable("offline".into()));

    let err = s
        .flow
        .submit_summary(&owner, &before.id, summary_for(&before, RoundOutcome::Loss))
        .await
        .unwrap_err();

    assert!(err.is_channel());
    assert_eq!(err.code(), ErrorCode::ChannelUnavailable);
    assert_eq!(owner.me().unwrap(), before);
}

#[tokio::test]
async fn loss_on_a_resource_not_held_is_malformed() {
    let s = TestSession::new(2).await;
    let owner = s.owner();
    to_summary(&s.flow, &owner, RoundOutcome::Loss).await;
    let before = owner.me().unwrap();
    let stranger = ResourceId::new("never-dealt");
    assert!(!before.alive_resources.contains(&stranger));

    let err = s
        .flow
        .submit_summary(
            &owner,
            &before.id,
            SummarySubmission::loss(before.main_role.unwrap(), stranger),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::MalformedSummary);
    assert_eq!(owner.me().unwrap(), before);
}

#[tokio::test]
async fn repeating_a_loss_keeps_the_resource_buried() {
    let s = TestSession::new(2).await;
    let owner = s.owner();
    to_summary(&s.flow, &owner, RoundOutcome::Loss).await;
    let me = owner.me().unwrap();
    let submission = summary_for(&me, RoundOutcome::Loss);

    s.flow.submit_summary(&owner, &me.id, submission.clone()).await.unwrap();
    s.flow.submit_summary(&owner, &me.id, submission.clone()).await.unwrap();

    let after = owner.me().unwrap();
    let played = submission.played_resource.unwrap();
    assert!(after.grave_resources.contains(&played));
    assert_eq!(after.stats.losses, 1);
}

#[tokio::test]
async fn failed_reset_after_a_committed_summary_is_reported_separately() {
    let s = TestSession::with_config(1, SessionConfig::default().with_seed(5).with_alive_per_run(1)).await;
    let owner = s.owner();
    to_summary(&s.flow, &owner, RoundOutcome::Loss).await;
    let me = owner.me().unwrap();
    // the summary write goes through, the reset batch after it does not
    s.channel
        .fail_write_after(1, ChannelError::Unavailable("offline".into()));

    let check = s
        .flow
        .submit_summary(&owner, &me.id, summary_for(&me, RoundOutcome::Loss))
        .await
        .unwrap();

    let RunCheck::CheckFailed { error } = check else {
        panic!("expected a failed run check, got {check:?}");
    };
    assert_eq!(error.code(), ErrorCode::ChannelUnavailable);
    let after = owner.me().unwrap();
    assert_eq!(after.submitted_round, Some(1));
    assert!(after.alive_resources.is_empty());
    assert_eq!(owner.phase(), Some(Phase::Summary));

    let retried = s.flow.check_run_over(&owner).await.unwrap();
    assert!(retried.is_reset());
    assert_eq!(owner.phase(), Some(Phase::Idle));
}
