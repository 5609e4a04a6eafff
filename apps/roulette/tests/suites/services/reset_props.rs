//! Properties of the elimination check and reset over random histories.

use proptest::prelude::*;
use roulette::domain::{Phase, RoundOutcome};
use roulette::{RunCheck, SessionConfig};

use crate::common::proptest_prelude::proptest_prelude_config;
use crate::support::flow::{submit_all, to_summary};
use crate::support::session::TestSession;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("tokio runtime")
}

fn outcome() -> impl Strategy<Value = RoundOutcome> {
    prop_oneof![Just(RoundOutcome::Win), Just(RoundOutcome::Loss)]
}

proptest! {
    #![proptest_config(proptest_prelude_config())]

    /// Whatever happened before, a reset bumps `runCounter` by one, zeroes
    /// the run tallies and keeps the cumulative ones.
    #[test]
    fn reset_accounting(
        participants in 1usize..=5,
        alive in 1usize..=3,
        wins_first in prop::collection::vec(any::<bool>(), 0..4),
        seed in any::<u64>(),
    ) {
        runtime().block_on(async {
            let config = SessionConfig::default().with_seed(seed).with_alive_per_run(alive);
            let s = TestSession::with_config(participants, config).await;
            let owner = s.owner();
            s.flow.start_run(&owner).await.unwrap();

            for win in &wins_first {
                let outcome = if *win { RoundOutcome::Win } else { RoundOutcome::Loss };
                s.flow.start_round(&owner).await.unwrap();
                s.flow.end_round(&owner, outcome).await.unwrap();
            }

            let before = owner.run_stats().unwrap();
            s.flow.start_round(&owner).await.unwrap();
            s.flow.end_round(&owner, RoundOutcome::Loss).await.unwrap();

            let mut check = RunCheck::NotReady;
            while !check.is_reset() {
                check = submit_all(&s.flow, &owner, RoundOutcome::Loss).await.unwrap();
                if !check.is_reset() {
                    s.flow.start_round(&owner).await.unwrap();
                    s.flow.end_round(&owner, RoundOutcome::Loss).await.unwrap();
                }
            }

            let after = owner.run_stats().unwrap();
            prop_assert_eq!(after.run_counter, before.run_counter + 1);
            prop_assert_eq!((after.wins, after.losses), (0, 0));
            prop_assert_eq!(after.cumulative_wins, before.cumulative_wins);
            prop_assert!(after.cumulative_losses >= before.cumulative_losses + 1);
            prop_assert_eq!(owner.phase(), Some(Phase::Idle));
            for p in owner.participants().unwrap() {
                prop_assert!(p.alive_resources.is_empty() && p.grave_resources.is_empty());
                prop_assert!(p.main_role.is_none() && p.last_summary.is_none());
            }
            Ok::<(), TestCaseError>(())
        })?;
    }

    /// The check never writes unless the round is complete.
    #[test]
    fn check_is_inert_until_everyone_reports(
        participants in 2usize..=5,
        reporting in 0usize..5,
        round_outcome in outcome(),
    ) {
        runtime().block_on(async {
            let s = TestSession::new(participants).await;
            let owner = s.owner();
            to_summary(&s.flow, &owner, round_outcome).await;

            let reporters = reporting.min(participants - 1);
            for p in owner.participants().unwrap().into_iter().take(reporters) {
                let summary = crate::support::flow::summary_for(&p, round_outcome);
                let check = s.flow.submit_summary(&owner, &p.id, summary).await.unwrap();
                prop_assert_eq!(check, RunCheck::NotReady);
            }

            let commits = s.channel.commits();
            prop_assert_eq!(s.flow.check_run_over(&owner).await.unwrap(), RunCheck::NotReady);
            prop_assert_eq!(s.channel.commits(), commits);
            Ok::<(), TestCaseError>(())
        })?;
    }
}
