//! Tests for the SQLite match journal.

use std::sync::Arc;
use tempfile::NamedTempFile;

use strictly_arena::{GameAuthority, MatchId, MatchRepository, MatchStatus, PlayerId};
use strictly_shougi::SoldierId;

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
fn setup_test_db() -> (NamedTempFile, MatchRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = MatchRepository::new(db_path).expect("Failed to create repository");
    repo.migrate().expect("Migrations failed");
    (db_file, repo)
}

fn journaled(repo: &MatchRepository) -> GameAuthority {
    GameAuthority::default().with_journal(Arc::new(repo.clone()))
}

#[test]
fn test_empty_path_rejected() {
    assert!(MatchRepository::new(String::new()).is_err());
}

#[test]
fn test_migrate_is_idempotent() {
    let (_db, repo) = setup_test_db();
    repo.migrate().expect("Second migration run failed");
    assert!(repo.load_all().expect("Load failed").is_empty());
}

#[test]
fn test_load_missing_match() {
    let (_db, repo) = setup_test_db();
    let found = repo.load_match(MatchId(99)).expect("Query failed");
    assert!(found.is_none());
}

#[test]
fn test_every_commit_is_journaled() {
    let (_db, repo) = setup_test_db();
    let authority = journaled(&repo);
    let host = PlayerId::from("host");
    let challenger = PlayerId::from("challenger");

    authority
        .propose(MatchId(1), host.clone(), 250)
        .expect("Propose failed");
    let stored = repo
        .load_match(MatchId(1))
        .expect("Query failed")
        .expect("Match not journaled");
    assert_eq!(stored.game().status(), MatchStatus::Proposing);

    authority
        .accept(MatchId(1), challenger.clone(), 250)
        .expect("Accept failed");
    authority
        .submit_move(MatchId(1), &challenger, SoldierId(0), 1, 3)
        .expect("Move failed");

    let stored = repo
        .load_match(MatchId(1))
        .expect("Query failed")
        .expect("Match not journaled");
    assert_eq!(
        stored.snapshot(),
        authority.get_board(MatchId(1)).expect("Board failed")
    );
    assert_eq!(*stored.escrow().challenger_deposit(), 250);
}

#[test]
fn test_rejected_operation_not_journaled() {
    let (_db, repo) = setup_test_db();
    let authority = journaled(&repo);
    authority
        .propose(MatchId(1), PlayerId::from("host"), 250)
        .expect("Propose failed");
    let before = repo.load_match(MatchId(1)).expect("Query failed");

    let result = authority.accept(MatchId(1), PlayerId::from("challenger"), 1);
    assert!(result.is_err());
    assert_eq!(repo.load_match(MatchId(1)).expect("Query failed"), before);
}

#[test]
fn test_restore_reproduces_boards() {
    let (_db, repo) = setup_test_db();
    let host = PlayerId::from("host");
    let challenger = PlayerId::from("challenger");

    let original = journaled(&repo);
    for id in [1, 2] {
        original
            .propose(MatchId(id), host.clone(), 10)
            .expect("Propose failed");
    }
    original
        .accept(MatchId(2), challenger.clone(), 10)
        .expect("Accept failed");
    original
        .submit_move(MatchId(2), &challenger, SoldierId(3), 2, 2)
        .expect("Move failed");

    let restored = GameAuthority::default();
    let count = restored.restore(repo.load_all().expect("Load failed"));
    assert_eq!(count, 2);
    assert_eq!(restored.match_ids(), vec![MatchId(1), MatchId(2)]);
    for id in [MatchId(1), MatchId(2)] {
        assert_eq!(
            restored.get_board(id).expect("Board failed"),
            original.get_board(id).expect("Board failed")
        );
    }

    // Play continues where it stopped.
    restored
        .submit_move(MatchId(2), &host, SoldierId(0), 3, 2)
        .expect("Host move after restore failed");
}

#[test]
fn test_match_ids_by_status() {
    let (_db, repo) = setup_test_db();
    let authority = journaled(&repo);
    authority
        .propose(MatchId(1), PlayerId::from("a"), 10)
        .expect("Propose failed");
    authority
        .propose(MatchId(2), PlayerId::from("b"), 10)
        .expect("Propose failed");
    authority
        .accept(MatchId(2), PlayerId::from("c"), 10)
        .expect("Accept failed");

    let active = repo
        .match_ids_with_status("Active")
        .expect("Query failed");
    assert_eq!(active, vec![MatchId(2)]);
}
