//! Drives whole runs against an in-memory channel.
//!
//! Every participant gets its own `SessionContext`, as separate clients
//! would. The owner drives the phases; everyone locks in and reports.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use roulette::domain::{
    ParticipantId, ResourceId, Role, RoundOutcome, SessionId, SummarySubmission,
};
use roulette::{
    InMemoryChannel, RunCheck, SessionConfig, SessionContext, SessionError, SessionFlowService,
    SessionSeed,
};
use tracing::{debug, warn};

use crate::types::RunResult;

/// Chance that a participant reports kill participation in a round.
const KILL_PARTICIPATION_RATE: f64 = 0.3;

pub struct Simulator {
    participants: usize,
    max_rounds: u32,
    win_rate: f64,
    pool: Vec<ResourceId>,
    rng: StdRng,
}

impl Simulator {
    pub fn new(participants: usize, max_rounds: u32, win_rate: f64, seed: u64) -> Self {
        Self {
            participants,
            max_rounds,
            win_rate: win_rate.clamp(0.0, 1.0),
            pool: SessionConfig::default().resource_pool,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub async fn simulate_run(&mut self, run: u32) -> Result<RunResult, SessionError> {
        let started = Instant::now();
        let seed: u64 = self.rng.random();
        let flow = SessionFlowService::new(SessionConfig::default().with_seed(seed))?;

        let channel = Arc::new(InMemoryChannel::new());
        let mut session = SessionSeed::new(SessionId::new(format!("sim-{run}")));
        for i in 0..self.participants {
            session = session.member(ParticipantId::new(format!("p{i}")), None);
        }
        session.write(channel.as_ref()).await?;

        let contexts = session
            .roster()
            .iter()
            .map(|id| session.enroll_as(channel.clone(), id))
            .collect::<Result<Vec<SessionContext>, SessionError>>()?;
        let owner = &contexts[0];

        flow.start_run(owner).await?;

        let mut result = RunResult {
            run,
            seed,
            participants: self.participants,
            run_counter: 0,
            rounds: 0,
            wins: 0,
            losses: 0,
            reset: false,
            eliminated: Vec::new(),
            duration_ms: 0.0,
        };

        while result.rounds < self.max_rounds {
            flow.start_round(owner).await?;
            result.rounds += 1;
            for ctx in &contexts {
                flow.lock_in(ctx).await?;
            }

            let outcome = if self.rng.random_bool(self.win_rate) {
                result.wins += 1;
                RoundOutcome::Win
            } else {
                result.losses += 1;
                RoundOutcome::Loss
            };
            flow.end_round(owner, outcome).await?;

            let mut check = RunCheck::NotReady;
            for ctx in &contexts {
                let me = ctx.me()?;
                let submission = self.random_summary(outcome, me.main_role, &me.alive_resources);
                check = flow.submit_summary(ctx, &me.id, submission).await?;
            }
            if let RunCheck::CheckFailed { error } = &check {
                warn!(run, round = result.rounds, %error, "Run check failed, retrying");
                check = flow.check_run_over(owner).await?;
            }

            debug!(run, round = result.rounds, check = ?check, "Round simulated");
            if let RunCheck::Reset {
                eliminated,
                run_counter,
            } = check
            {
                result.reset = true;
                result.run_counter = run_counter;
                result.eliminated = eliminated.iter().map(ToString::to_string).collect();
                break;
            }
        }

        if !result.reset {
            result.run_counter = owner.run_stats()?.run_counter;
        }
        for ctx in contexts {
            ctx.leave();
        }

        result.duration_ms = started.elapsed().as_secs_f64() * 1000.0;
        Ok(result)
    }

    fn random_summary(
        &mut self,
        outcome: RoundOutcome,
        main_role: Option<Role>,
        alive: &BTreeSet<ResourceId>,
    ) -> SummarySubmission {
        let lane = main_role.unwrap_or(Role::Mid);
        let mut submission = match outcome {
            RoundOutcome::Win => SummarySubmission::win(lane),
            RoundOutcome::Loss => SummarySubmission {
                outcome,
                reported_lane: Some(lane),
                kill_participation: false,
                gained_resource: None,
                played_resource: alive.iter().choose(&mut self.rng).cloned(),
            },
        };

        if self.rng.random_bool(KILL_PARTICIPATION_RATE) {
            let gained = self
                .pool
                .iter()
                .filter(|r| !alive.contains(*r))
                .choose(&mut self.rng)
                .cloned();
            if let Some(gained) = gained {
                submission = submission.with_gain(gained);
            }
        }
        submission
    }
}
