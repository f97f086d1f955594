//! Concurrent access to the game authority.

use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;
use strictly_arena::{
    AuthorityError, DbError, GameAuthority, MatchId, MatchJournal, MatchRecord, MatchStatus,
    PlayerId,
};
use strictly_shougi::{Side, SoldierId};

fn start(authority: &GameAuthority, id: MatchId, host: &PlayerId, challenger: &PlayerId) {
    authority
        .propose(id, host.clone(), 100)
        .expect("Propose failed");
    authority
        .accept(id, challenger.clone(), 100)
        .expect("Accept failed");
}

#[test]
fn test_racing_submissions_apply_one_move_per_turn() {
    let authority = Arc::new(GameAuthority::default());
    let host = PlayerId::from("host");
    let challenger = PlayerId::from("challenger");
    start(&authority, MatchId(1), &host, &challenger);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let authority = Arc::clone(&authority);
            let challenger = challenger.clone();
            thread::spawn(move || {
                authority.submit_move(MatchId(1), &challenger, SoldierId(0), 1, 3)
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("Thread panicked"))
        .collect();

    let accepted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(accepted, 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, AuthorityError::NotYourTurn(_)))
    );

    let board = authority.get_board(MatchId(1)).expect("Board failed");
    assert_eq!(*board.turn(), Some(Side::Host));
}

#[test]
fn test_both_players_racing() {
    let authority = Arc::new(GameAuthority::default());
    let host = PlayerId::from("host");
    let challenger = PlayerId::from("challenger");
    start(&authority, MatchId(1), &host, &challenger);

    let host_thread = {
        let authority = Arc::clone(&authority);
        thread::spawn(move || authority.submit_move(MatchId(1), &host, SoldierId(2), 1, 2))
    };
    let challenger_thread = {
        let authority = Arc::clone(&authority);
        thread::spawn(move || authority.submit_move(MatchId(1), &challenger, SoldierId(2), 3, 3))
    };

    let host_result = host_thread.join().expect("Thread panicked");
    let challenger_result = challenger_thread.join().expect("Thread panicked");

    // Challenger always moves first; the host only succeeds if it came second.
    assert!(challenger_result.is_ok());
    let expected_turn = match host_result {
        Ok(_) => Side::Challenger,
        Err(AuthorityError::NotYourTurn(_)) => Side::Host,
        Err(other) => panic!("Unexpected error: {other}"),
    };
    let board = authority.get_board(MatchId(1)).expect("Board failed");
    assert_eq!(*board.turn(), Some(expected_turn));
}

#[test]
fn test_distinct_matches_progress_in_parallel() {
    let authority = Arc::new(GameAuthority::default());

    let handles: Vec<_> = (0..16u64)
        .map(|n| {
            let authority = Arc::clone(&authority);
            thread::spawn(move || {
                let id = MatchId(n);
                let host = PlayerId::new(format!("host-{n}"));
                let challenger = PlayerId::new(format!("challenger-{n}"));
                start(&authority, id, &host, &challenger);
                authority
                    .submit_move(id, &challenger, SoldierId(3), 2, 2)
                    .expect("Move failed");
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let ids = authority.match_ids();
    assert_eq!(ids.len(), 16);
    for id in ids {
        assert_eq!(
            authority.game_status(id).expect("Status failed"),
            MatchStatus::Active
        );
    }
}

#[test]
fn test_racing_proposals_create_one_match() {
    let authority = Arc::new(GameAuthority::default());

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let authority = Arc::clone(&authority);
            thread::spawn(move || authority.propose(MatchId(5), PlayerId::new(format!("p{n}")), 10))
        })
        .collect();

    let accepted = handles
        .into_iter()
        .map(|h| h.join().expect("Thread panicked"))
        .filter(|r| r.is_ok())
        .count();
    assert_eq!(accepted, 1);
}

/// Journal that parks every write for one match until released.
struct GatedJournal {
    gated: MatchId,
    entered: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl MatchJournal for GatedJournal {
    fn persist(&self, record: &MatchRecord) -> Result<(), DbError> {
        if record.match_id() == self.gated {
            let _ = self.entered.lock().expect("sender lock").send(());
            let _ = self.release.lock().expect("receiver lock").recv();
        }
        Ok(())
    }
}

#[test]
fn test_slow_proposal_does_not_stall_other_matches() {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let journal = GatedJournal {
        gated: MatchId(1),
        entered: Mutex::new(entered_tx),
        release: Mutex::new(release_rx),
    };
    let authority = Arc::new(GameAuthority::default().with_journal(Arc::new(journal)));

    let slow = {
        let authority = Arc::clone(&authority);
        thread::spawn(move || authority.propose(MatchId(1), PlayerId::from("slow"), 10))
    };
    entered_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("Proposal never reached the journal");

    let (done_tx, done_rx) = mpsc::channel();
    let other = {
        let authority = Arc::clone(&authority);
        thread::spawn(move || {
            let host = PlayerId::from("host");
            let challenger = PlayerId::from("challenger");
            start(&authority, MatchId(2), &host, &challenger);
            let board = authority.get_board(MatchId(2)).expect("Board failed");
            let _ = done_tx.send(*board.status());
        })
    };
    let status = done_rx.recv_timeout(Duration::from_secs(5));

    release_tx.send(()).expect("Gate closed");
    slow.join().expect("Thread panicked").expect("Slow propose failed");
    other.join().expect("Thread panicked");

    assert_eq!(status, Ok(MatchStatus::Active));
    assert_eq!(authority.match_ids(), vec![MatchId(1), MatchId(2)]);
}

#[test]
fn test_id_being_proposed_is_not_visible_yet() {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let journal = GatedJournal {
        gated: MatchId(1),
        entered: Mutex::new(entered_tx),
        release: Mutex::new(release_rx),
    };
    let authority = Arc::new(GameAuthority::default().with_journal(Arc::new(journal)));

    let slow = {
        let authority = Arc::clone(&authority);
        thread::spawn(move || authority.propose(MatchId(1), PlayerId::from("slow"), 10))
    };
    entered_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("Proposal never reached the journal");

    // A rival proposal for the same id loses whether or not it overlaps.
    let rival = {
        let authority = Arc::clone(&authority);
        thread::spawn(move || authority.propose(MatchId(1), PlayerId::from("rival"), 10))
    };

    release_tx.send(()).expect("Gate closed");
    slow.join().expect("Thread panicked").expect("Slow propose failed");
    let rival = rival.join().expect("Thread panicked");
    assert!(matches!(rival, Err(AuthorityError::DuplicateMatch(_))));

    let board = authority.get_board(MatchId(1)).expect("Board failed");
    assert_eq!(board.host(), &PlayerId::from("slow"));
}
