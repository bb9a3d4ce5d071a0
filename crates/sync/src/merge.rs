//! Deterministic pairwise reconciliation of divergent game snapshots.
//!
//! Two serving instances never coordinate directly; each mutates its own
//! cached copy and persists it. Whenever a process reloads the durable copy,
//! this module folds it into the cached one so that independently-made,
//! non-overlapping claims all survive. Overlapping claims cannot both
//! survive: the higher-revision snapshot keeps its claim and the other
//! claimant's update is dropped, which is the accepted, narrow class of lost
//! updates in this design.

use std::collections::BTreeSet;

use squares_core::{GameState, Square};

/// Result of merging two snapshots of the same game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeOutcome {
    pub state: GameState,
    /// True when both sides claimed the same square for different names; the
    /// merged revision was bumped past both inputs so the losing side cannot
    /// overwrite the result with a stale persist.
    pub conflict: bool,
}

/// Merges `other` into `base`, returning the reconciled snapshot.
///
/// The snapshot with the greater revision is the *primary*; ties favor
/// `base`, the copy already held in cache. The primary contributes every
/// atomic field (`locked`, axis numbers, `admin_id`) wholesale. Square claims
/// are unioned, with the primary winning any same-square disagreement; users
/// are unioned keeping the freshest `last_seen`; colors are unioned with the
/// primary winning collisions. The merged revision is the max of the inputs,
/// plus one only when a claim disagreement was detected.
///
/// Merging is commutative for a single pair but **not** associative: with
/// three or more simultaneously divergent replicas, different merge orders
/// can produce different results. The system only ever merges pairwise
/// (cache vs. durable copy), so an N-way merge is deliberately not provided.
pub fn merge_states(base: &GameState, other: &GameState) -> MergeOutcome {
    let (primary, secondary) = if base.revision_id >= other.revision_id {
        (base, other)
    } else {
        (other, base)
    };

    let mut merged = primary.clone();
    let mut conflict = false;

    let all_squares: BTreeSet<Square> = primary
        .squares
        .keys()
        .chain(secondary.squares.keys())
        .copied()
        .collect();

    merged.squares.clear();
    for square in all_squares {
        match (primary.squares.get(&square), secondary.squares.get(&square)) {
            (Some(name), None) | (None, Some(name)) => {
                merged.squares.insert(square, name.clone());
            }
            (Some(primary_name), Some(secondary_name)) => {
                if primary_name != secondary_name {
                    conflict = true;
                    tracing::warn!(
                        game_id = %primary.game_id,
                        %square,
                        kept = %primary_name,
                        dropped = %secondary_name,
                        "divergent claims on one square; keeping the primary's"
                    );
                }
                merged.squares.insert(square, primary_name.clone());
            }
            (None, None) => {}
        }
    }

    for (name, user) in &secondary.users {
        let freshest = match merged.users.get(name) {
            Some(existing) => user.last_seen.unwrap_or(0) > existing.last_seen.unwrap_or(0),
            None => true,
        };
        if freshest {
            merged.users.insert(name.clone(), user.clone());
        }
    }

    for (name, color) in &secondary.user_colors {
        merged
            .user_colors
            .entry(name.clone())
            .or_insert_with(|| color.clone());
    }

    let max_revision = base.revision_id.max(other.revision_id);
    merged.revision_id = if conflict {
        max_revision + 1
    } else {
        max_revision
    };

    MergeOutcome {
        state: merged,
        conflict,
    }
}
