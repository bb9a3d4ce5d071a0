//! End-to-end coverage of the coordinator against a single instance.

use std::sync::Arc;

use async_trait::async_trait;

use squares_core::{
    BOARD_COLS, BOARD_ROWS, ClaimError, ExecuteError, GameState, INITIAL_REVISION, ResetError,
    TransitionPhase, TransitionPhaseError, UnclaimError, is_permutation,
};
use squares_sync::store::Result as StoreResult;
use squares_sync::{DurableStore, GameService, InMemoryStore, StoreError, SyncError};

fn service_with_store() -> (GameService, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let service = GameService::builder().store(store.clone()).build();
    (service, store)
}

#[tokio::test]
async fn first_join_creates_the_game_and_crowns_the_admin() {
    let (service, _store) = service_with_store();

    let outcome = service
        .join("g1", "Alice", "token-a")
        .await
        .expect("join should succeed");
    assert!(outcome.created);
    assert_eq!(outcome.state.revision_id, INITIAL_REVISION + 1);
    assert!(outcome.state.users.contains_key("Alice"));
    assert!(outcome.state.user_colors.contains_key("Alice"));

    let outcome = service
        .join("g1", "Bob", "token-b")
        .await
        .expect("join should succeed");
    assert!(!outcome.created);

    assert!(service.is_admin("g1", "token-a").await);
    assert!(!service.is_admin("g1", "token-b").await);
}

#[tokio::test]
async fn rejected_join_does_not_leave_a_half_created_game() {
    let (service, _store) = service_with_store();

    let err = service
        .join("g1", "   ", "token-a")
        .await
        .expect_err("blank names are rejected");
    assert!(matches!(err, SyncError::Rejected(_)));
    assert!(service.snapshot("g1").await.is_none());
    assert!(!service.ensure_loaded("g1").await);
}

#[tokio::test]
async fn every_square_can_be_claimed_and_reads_back() {
    let (service, _store) = service_with_store();
    service
        .join("g1", "Alice", "token-a")
        .await
        .expect("join should succeed");

    for row in 0..BOARD_ROWS {
        for col in 0..BOARD_COLS {
            service
                .claim_square("g1", "Alice", row, col, None)
                .await
                .expect("empty squares are claimable");
        }
    }

    let state = service.snapshot("g1").await.expect("game exists");
    assert_eq!(state.squares.len(), usize::from(BOARD_ROWS) * usize::from(BOARD_COLS));
    assert!(state.squares.values().all(|name| name == "Alice"));
}

#[tokio::test]
async fn second_claim_on_the_same_square_fails_with_already_taken() {
    let (service, _store) = service_with_store();
    service
        .join("g1", "Alice", "token-a")
        .await
        .expect("join should succeed");
    service
        .claim_square("g1", "Alice", 0, 0, None)
        .await
        .expect("first claim should succeed");

    let err = service
        .claim_square("g1", "Bob", 0, 0, None)
        .await
        .expect_err("square is taken");
    match err {
        SyncError::Rejected(ExecuteError::Claim(TransitionPhaseError {
            phase: TransitionPhase::PreValidate,
            error: ClaimError::AlreadyTaken { .. },
        })) => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unclaim_restores_the_square_and_is_owner_only() {
    let (service, _store) = service_with_store();
    service
        .join("g1", "Alice", "token-a")
        .await
        .expect("join should succeed");
    service
        .claim_square("g1", "Alice", 4, 4, None)
        .await
        .expect("claim should succeed");

    let err = service
        .unclaim_square("g1", "Bob", 4, 4, None)
        .await
        .expect_err("only the claimant may vacate");
    assert!(matches!(
        err,
        SyncError::Rejected(ExecuteError::Unclaim(TransitionPhaseError {
            error: UnclaimError::NotOwner { .. },
            ..
        }))
    ));

    service
        .unclaim_square("g1", "Alice", 4, 4, None)
        .await
        .expect("owner may unclaim");
    let state = service.snapshot("g1").await.expect("game exists");
    assert!(state.squares.is_empty());
}

#[tokio::test]
async fn out_of_bounds_coordinates_are_rejected_before_the_engine() {
    let (service, _store) = service_with_store();
    service
        .join("g1", "Alice", "token-a")
        .await
        .expect("join should succeed");

    let err = service
        .claim_square("g1", "Alice", 10, 0, None)
        .await
        .expect_err("row 10 is off the board");
    assert!(matches!(err, SyncError::InvalidSquare(_)));

    let err = service
        .unclaim_square("g1", "Alice", 0, 255, None)
        .await
        .expect_err("col 255 is off the board");
    assert!(matches!(err, SyncError::InvalidSquare(_)));
}

#[tokio::test]
async fn mutations_on_unknown_games_report_not_found() {
    let (service, _store) = service_with_store();

    assert!(matches!(
        service.claim_square("ghost", "Alice", 0, 0, None).await,
        Err(SyncError::NotFound { .. })
    ));
    assert!(matches!(
        service.reset_game("ghost").await,
        Err(SyncError::NotFound { .. })
    ));
    assert!(matches!(
        service.populate_numbers("ghost").await,
        Err(SyncError::NotFound { .. })
    ));
    assert!(matches!(
        service.set_locked("ghost", true).await,
        Err(SyncError::NotFound { .. })
    ));
    assert!(service.snapshot("ghost").await.is_none());
}

#[tokio::test]
async fn reset_clears_the_board_and_bumps_exactly_once() {
    let (service, _store) = service_with_store();
    service
        .join("g1", "Alice", "token-a")
        .await
        .expect("join should succeed");
    service
        .claim_square("g1", "Alice", 1, 2, None)
        .await
        .expect("claim should succeed");
    service
        .populate_numbers("g1")
        .await
        .expect("populate should succeed");

    let before = service.snapshot("g1").await.expect("game exists");
    let after = service.reset_game("g1").await.expect("reset should succeed");

    assert_eq!(after.revision_id, before.revision_id + 1);
    assert!(after.squares.is_empty());
    assert!(after.users.is_empty());
    assert!(after.user_colors.is_empty());
    assert!(after.row_numbers.is_none());
    assert!(after.col_numbers.is_none());
}

#[tokio::test]
async fn populated_numbers_are_always_permutations() {
    let (service, _store) = service_with_store();
    service
        .join("g1", "Alice", "token-a")
        .await
        .expect("join should succeed");

    for _ in 0..5 {
        let state = service
            .populate_numbers("g1")
            .await
            .expect("populate should succeed");
        assert!(is_permutation(&state.row_numbers.expect("rows assigned")));
        assert!(is_permutation(&state.col_numbers.expect("cols assigned")));
    }
}

#[tokio::test]
async fn locking_gates_mutations_but_not_joins() {
    let (service, _store) = service_with_store();
    service
        .join("g1", "Alice", "token-a")
        .await
        .expect("join should succeed");
    service
        .set_locked("g1", true)
        .await
        .expect("locking should succeed");

    assert!(matches!(
        service.claim_square("g1", "Alice", 0, 0, None).await,
        Err(SyncError::Rejected(ExecuteError::Claim(
            TransitionPhaseError {
                error: ClaimError::Locked,
                ..
            }
        )))
    ));
    assert!(matches!(
        service.unclaim_square("g1", "Alice", 0, 0, None).await,
        Err(SyncError::Rejected(ExecuteError::Unclaim(
            TransitionPhaseError {
                error: UnclaimError::Locked,
                ..
            }
        )))
    ));
    assert!(matches!(
        service.reset_game("g1").await,
        Err(SyncError::Rejected(ExecuteError::Reset(
            TransitionPhaseError {
                error: ResetError::Locked,
                ..
            }
        )))
    ));
    assert!(service.populate_numbers("g1").await.is_err());

    service
        .join("g1", "Bob", "token-b")
        .await
        .expect("joins pass through the lock");

    service
        .set_locked("g1", false)
        .await
        .expect("unlocking should succeed");
    service
        .claim_square("g1", "Alice", 0, 0, None)
        .await
        .expect("unlocked board accepts claims again");
}

#[tokio::test]
async fn stale_revisions_are_reported_but_never_enforced() {
    let (service, _store) = service_with_store();
    service
        .join("g1", "Alice", "token-a")
        .await
        .expect("join should succeed");

    let applied = service
        .claim_square("g1", "Alice", 0, 0, Some(999))
        .await
        .expect("empty square is claimable regardless of echoed revision");
    assert!(applied.receipt.stale_revision);

    let current = applied.state.revision_id;
    let applied = service
        .unclaim_square("g1", "Alice", 0, 0, Some(current))
        .await
        .expect("matching revision unclaims");
    assert!(!applied.receipt.stale_revision);
}

#[tokio::test]
async fn color_assignment_is_idempotent_and_silent_for_unknown_games() {
    let (service, _store) = service_with_store();

    // No game yet: nothing happens, nothing panics.
    service.assign_user_color("ghost", "Alice").await;
    assert!(service.snapshot("ghost").await.is_none());

    service
        .join("g1", "Alice", "token-a")
        .await
        .expect("join should succeed");
    let first = service.snapshot("g1").await.expect("game exists").user_colors["Alice"].clone();

    service.assign_user_color("g1", "Alice").await;
    let state = service.snapshot("g1").await.expect("game exists");
    assert_eq!(state.user_colors["Alice"], first);
}

#[tokio::test]
async fn memory_only_service_works_without_a_store() {
    let service = GameService::default();

    service
        .join("g1", "Alice", "token-a")
        .await
        .expect("join should succeed");
    service
        .claim_square("g1", "Alice", 3, 3, None)
        .await
        .expect("claim should succeed");

    let state = service.snapshot("g1").await.expect("game exists");
    assert_eq!(state.squares.len(), 1);
}

/// Store whose writes always fail; loads serve the last successful save.
struct WriteBrokenStore;

#[async_trait]
impl DurableStore for WriteBrokenStore {
    async fn load(&self, _game_id: &str) -> StoreResult<Option<GameState>> {
        Ok(None)
    }

    async fn save(&self, _game_id: &str, _state: &GameState) -> StoreResult<()> {
        Err(StoreError::Io(std::io::Error::other("disk on fire")))
    }
}

#[tokio::test]
async fn persist_failures_never_fail_the_mutation() {
    let service = GameService::builder()
        .store(Arc::new(WriteBrokenStore))
        .build();

    service
        .join("g1", "Alice", "token-a")
        .await
        .expect("join should succeed despite the broken store");
    let applied = service
        .claim_square("g1", "Alice", 0, 0, None)
        .await
        .expect("claim should succeed despite the broken store");
    assert_eq!(applied.state.squares.len(), 1);

    let state = service.snapshot("g1").await.expect("memory copy survives");
    assert_eq!(state.squares.len(), 1);
}

#[tokio::test]
async fn public_view_hides_the_admin_token() {
    let (service, _store) = service_with_store();
    service
        .join("g1", "Alice", "token-a")
        .await
        .expect("join should succeed");

    let admin_view = service
        .public_view("g1", Some("token-a"))
        .await
        .expect("game exists");
    assert!(admin_view.is_admin);

    let guest_view = service.public_view("g1", None).await.expect("game exists");
    assert!(!guest_view.is_admin);
    assert_eq!(guest_view.revision_id, admin_view.revision_id);
}
