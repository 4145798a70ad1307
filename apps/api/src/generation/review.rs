//! Round bookkeeping for the critique stage: round counter, best-candidate
//! retention and the regression guard.
//!
//! Pure and synchronous so every branch can be pinned down without a generator.

use std::str::FromStr;

use tracing::{info, warn};

use crate::generation::state::{BestCandidate, Critique, ReviewUpdate, WorkflowState};

/// How later rounds may replace the best snapshot taken in round 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BestTracking {
    /// A later round that scores strictly higher than the best becomes the new best.
    #[default]
    RefreshOnImprovement,
    /// Only round 1 seeds the best snapshot. A later improvement stays visible as
    /// the current artifacts but never becomes the baseline for later rounds.
    SeedOnce,
}

impl FromStr for BestTracking {
    type Err = String;

    /// Accepts `refresh_on_improvement` or `seed_once`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "refresh_on_improvement" => Ok(BestTracking::RefreshOnImprovement),
            "seed_once" => Ok(BestTracking::SeedOnce),
            other => Err(format!(
                "unknown best tracking policy '{other}' (expected refresh_on_improvement or seed_once)"
            )),
        }
    }
}

/// Folds a critique into the round state.
///
/// `state` holds the artifacts the critique judged. The returned update always
/// bumps `review_round` by one.
pub fn review_round(state: &WorkflowState, critique: Critique, policy: BestTracking) -> ReviewUpdate {
    let match_score = critique.match_score();
    let review_round = state.review_round + 1;

    let candidate = BestCandidate {
        match_score,
        ..state.current_candidate()
    };

    let (best, restore) = match &state.best {
        // First round, or a state that somehow lost its snapshot: seed unconditionally.
        None => (Some(candidate), None),
        Some(_) if review_round == 1 => (Some(candidate), None),
        Some(best) if match_score < best.match_score => {
            warn!(
                "Round {review_round} scored {match_score} below best {}; keeping best artifacts",
                best.match_score
            );
            (None, Some(best.clone()))
        }
        Some(best)
            if match_score > best.match_score && policy == BestTracking::RefreshOnImprovement =>
        {
            info!(
                "Round {review_round} improved best score {} -> {match_score}",
                best.match_score
            );
            (Some(candidate), None)
        }
        Some(_) => (None, None),
    };

    ReviewUpdate {
        critique,
        match_score,
        review_round,
        best,
        restore,
    }
}
