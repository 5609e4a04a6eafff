//! Property tests for inventory movement driven by round summaries.

use proptest::prelude::*;
use time::macros::datetime;

use crate::domain::summary::{apply_summary, check_played_resource, SummarySubmission};
use crate::domain::test_gens;
use crate::domain::test_prelude;
use crate::domain::{MembershipRole, Participant, ParticipantId, RoundOutcome};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Any sequence of accepted summaries keeps alive and grave disjoint, and
    /// a LOSS always leaves the played resource in the grave unless the same
    /// summary earned it back. A LOSS on a resource not held is refused.
    #[test]
    fn prop_alive_and_grave_stay_disjoint(
        start in proptest::collection::btree_set(test_gens::resource(), 0..5),
        reports in proptest::collection::vec(
            (test_gens::outcome(), test_gens::role(), test_gens::resource(),
             proptest::option::of(test_gens::resource())),
            1..12,
        ),
    ) {
        let mut p = Participant::new(ParticipantId::new("p"), MembershipRole::Member);
        p.alive_resources = start;

        for (round, (outcome, lane, played, gained)) in reports.into_iter().enumerate() {
            let mut sub = match outcome {
                RoundOutcome::Win => SummarySubmission::win(lane),
                RoundOutcome::Loss => SummarySubmission::loss(lane, played.clone()),
            };
            if let Some(g) = gained.clone() {
                sub = sub.with_gain(g);
            }
            let summary = sub
                .into_summary(round as u32 + 1, datetime!(2026-03-01 00:00 UTC))
                .unwrap();
            if check_played_resource(&p, &summary).is_err() {
                prop_assert_eq!(outcome, RoundOutcome::Loss);
                prop_assert!(!p.alive_resources.contains(&played));
                continue;
            }
            apply_summary(&mut p, summary);

            prop_assert!(p.inventory_is_disjoint());
            if outcome == RoundOutcome::Loss && gained.as_ref() != Some(&played) {
                prop_assert!(p.grave_resources.contains(&played));
                prop_assert!(!p.alive_resources.contains(&played));
            }
            if let Some(g) = &gained {
                prop_assert!(p.alive_resources.contains(g));
            }
        }
    }
}
