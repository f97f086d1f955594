//! The game authority: single entry point for every match operation.
//!
//! The authority owns a registry of per-id slots. The registry lock is held
//! only to find or create a slot; operations on one match are serialized by
//! the slot's own lock, so distinct matches proceed in parallel.
//! Every write computes the next record on a clone, hands it to the journal
//! and only then swaps it in, so a rejected or failed operation leaves no
//! trace.

use crate::error::AuthorityError;
use crate::events::{Ack, GameEvent};
use crate::identity::{MatchId, PlayerId};
use crate::journal::MatchJournal;
use crate::matches::{MatchStatus, ShougiMatch};
use crate::record::{BoardSnapshot, MatchRecord};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use strictly_shougi::{RuleSet, Side, SoldierId, Square};
use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

/// Capacity of the event fan-out channel.
const EVENT_CAPACITY: usize = 256;

/// Record for one match id. Empty while a first proposal is in flight.
type Slot = Arc<Mutex<Option<MatchRecord>>>;

/// Records are only ever replaced wholesale, so a poisoned lock still guards
/// a consistent value.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Authoritative owner of all match state.
pub struct GameAuthority {
    rules: RuleSet,
    registry: Mutex<HashMap<MatchId, Slot>>,
    journal: Option<Arc<dyn MatchJournal>>,
    events: broadcast::Sender<GameEvent>,
}

impl std::fmt::Debug for GameAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameAuthority")
            .field("matches", &lock(&self.registry).len())
            .field("journal", &self.journal.is_some())
            .finish()
    }
}

impl Default for GameAuthority {
    fn default() -> Self {
        Self::new(RuleSet::default())
    }
}

impl GameAuthority {
    /// Creates an authority that proposes new matches under `rules`.
    #[instrument(skip(rules))]
    pub fn new(rules: RuleSet) -> Self {
        info!("Creating game authority");
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            rules,
            registry: Mutex::new(HashMap::new()),
            journal: None,
            events,
        }
    }

    /// Persists every committed record through `journal`.
    pub fn with_journal(mut self, journal: Arc<dyn MatchJournal>) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Rule set applied to new proposals.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Loads previously journaled records. Later records replace earlier
    /// ones with the same id. Returns the number loaded.
    #[instrument(skip(self, records))]
    pub fn restore(&self, records: impl IntoIterator<Item = MatchRecord>) -> usize {
        let mut registry = lock(&self.registry);
        let mut count = 0;
        for record in records {
            debug!(match_id = %record.match_id(), status = %record.game().status(), "Restoring match");
            registry.insert(record.match_id(), Arc::new(Mutex::new(Some(record))));
            count += 1;
        }
        info!(count, "Matches restored");
        count
    }

    /// Receives every event committed after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    // ─────────────────────────────────────────────────────────────
    //  Write operations
    // ─────────────────────────────────────────────────────────────

    /// Opens a match and deposits the host's stake.
    ///
    /// An id may be reused once its previous match concluded and was claimed.
    ///
    /// # Errors
    ///
    /// [`AuthorityError::DuplicateMatch`], [`AuthorityError::ZeroStake`] or
    /// [`AuthorityError::Storage`].
    #[instrument(skip(self), fields(match_id = %match_id, caller = %caller))]
    pub fn propose(
        &self,
        match_id: MatchId,
        caller: PlayerId,
        stake: u64,
    ) -> Result<Ack, AuthorityError> {
        let slot = Arc::clone(lock(&self.registry).entry(match_id).or_default());

        let mut current = lock(&slot);
        if current.as_ref().is_some_and(MatchRecord::is_live) {
            warn!("Match id in use");
            return Err(AuthorityError::DuplicateMatch(match_id));
        }

        let opened = ShougiMatch::propose(match_id, caller.clone(), stake, self.rules.clone())
            .map(MatchRecord::open)
            .and_then(|record| self.persist(&record).map(|()| record));
        let record = match opened {
            Ok(record) => record,
            Err(e) => {
                drop(current);
                self.discard_if_empty(match_id, &slot);
                return Err(e);
            }
        };
        *current = Some(record);

        let events = vec![GameEvent::ProposeGame {
            match_id,
            host: caller,
            stake,
        }];
        self.publish(&events);
        info!(stake, "Match proposed");
        Ok(Ack::new(match_id, events))
    }

    /// Seats the challenger, deposits the matching stake and starts play.
    ///
    /// # Errors
    ///
    /// [`AuthorityError::NoSuchMatch`], [`AuthorityError::AlreadyStarted`],
    /// [`AuthorityError::SelfChallenge`], [`AuthorityError::StakeMismatch`] or
    /// [`AuthorityError::Storage`].
    #[instrument(skip(self), fields(match_id = %match_id, caller = %caller))]
    pub fn accept(
        &self,
        match_id: MatchId,
        caller: PlayerId,
        stake: u64,
    ) -> Result<Ack, AuthorityError> {
        self.update(match_id, |record| {
            record.game_mut().accept(caller.clone(), stake)?;
            record.escrow_mut().deposit(Side::Challenger, stake);
            Ok(vec![GameEvent::AcceptGame {
                match_id,
                challenger: caller,
            }])
        })
    }

    /// Moves `caller`'s soldier to `(x, y)`.
    ///
    /// # Errors
    ///
    /// [`AuthorityError::NoSuchMatch`], [`AuthorityError::NotActive`],
    /// [`AuthorityError::NotYourTurn`], [`AuthorityError::NoSuchSoldier`],
    /// [`AuthorityError::InvalidDestination`] (checked in that order) or
    /// [`AuthorityError::Storage`].
    #[instrument(skip(self), fields(match_id = %match_id, caller = %caller))]
    pub fn submit_move(
        &self,
        match_id: MatchId,
        caller: &PlayerId,
        soldier: SoldierId,
        x: u8,
        y: u8,
    ) -> Result<Ack, AuthorityError> {
        self.update(match_id, |record| {
            let report = record
                .game_mut()
                .submit_move(caller, soldier, Square::new(x, y))?;

            let mut events = vec![GameEvent::moved(match_id, report.applied())];
            if let Some(outcome) = report.outcome() {
                let winner = record
                    .game()
                    .player(outcome.winner())
                    .cloned()
                    .ok_or_else(|| {
                        AuthorityError::InvariantViolation("Winning side has no player".into())
                    })?;
                events.push(GameEvent::GameConcluded {
                    match_id,
                    winner,
                    side: outcome.winner(),
                    reason: outcome.reason(),
                });
            }
            Ok(events)
        })
    }

    /// Pays both deposits to the winner, exactly once.
    ///
    /// # Errors
    ///
    /// [`AuthorityError::NoSuchMatch`], [`AuthorityError::NotConcluded`],
    /// [`AuthorityError::NotWinner`], [`AuthorityError::AlreadyClaimed`] or
    /// [`AuthorityError::Storage`].
    #[instrument(skip(self), fields(match_id = %match_id, caller = %caller))]
    pub fn claim(&self, match_id: MatchId, caller: &PlayerId) -> Result<Ack, AuthorityError> {
        self.update(match_id, |record| {
            let winner = record.game().winner().cloned();
            let payout = record
                .escrow_mut()
                .claim(match_id, winner.as_ref(), caller)?;
            Ok(vec![GameEvent::LootClaimed {
                match_id,
                winner: payout.winner().clone(),
                amount: *payout.amount(),
            }])
        })
    }

    // ─────────────────────────────────────────────────────────────
    //  Queries
    // ─────────────────────────────────────────────────────────────

    /// Read-only view of a match.
    ///
    /// # Errors
    ///
    /// [`AuthorityError::NoSuchMatch`].
    #[instrument(skip(self))]
    pub fn get_board(&self, match_id: MatchId) -> Result<BoardSnapshot, AuthorityError> {
        let slot = self.slot(match_id)?;
        let current = lock(&slot);
        current
            .as_ref()
            .map(MatchRecord::snapshot)
            .ok_or(AuthorityError::NoSuchMatch(match_id))
    }

    /// Lifecycle status of a match.
    ///
    /// # Errors
    ///
    /// [`AuthorityError::NoSuchMatch`].
    #[instrument(skip(self))]
    pub fn game_status(&self, match_id: MatchId) -> Result<MatchStatus, AuthorityError> {
        let slot = self.slot(match_id)?;
        let current = lock(&slot);
        current
            .as_ref()
            .map(|record| record.game().status())
            .ok_or(AuthorityError::NoSuchMatch(match_id))
    }

    /// Every known match id, ascending.
    #[instrument(skip(self))]
    pub fn match_ids(&self) -> Vec<MatchId> {
        let slots: Vec<(MatchId, Slot)> = lock(&self.registry)
            .iter()
            .map(|(id, slot)| (*id, Arc::clone(slot)))
            .collect();
        let mut ids: Vec<_> = slots
            .into_iter()
            .filter(|(_, slot)| lock(slot).is_some())
            .map(|(id, _)| id)
            .collect();
        ids.sort();
        debug!(count = ids.len(), "Listed matches");
        ids
    }

    // ─────────────────────────────────────────────────────────────
    //  Internals
    // ─────────────────────────────────────────────────────────────

    fn slot(&self, match_id: MatchId) -> Result<Slot, AuthorityError> {
        lock(&self.registry)
            .get(&match_id)
            .cloned()
            .ok_or(AuthorityError::NoSuchMatch(match_id))
    }

    /// Runs `op` on a copy of the record under its lock and commits the copy
    /// once the journal has accepted it.
    fn update<F>(&self, match_id: MatchId, op: F) -> Result<Ack, AuthorityError>
    where
        F: FnOnce(&mut MatchRecord) -> Result<Vec<GameEvent>, AuthorityError>,
    {
        let slot = self.slot(match_id)?;
        let mut current = lock(&slot);

        let mut next = current
            .clone()
            .ok_or(AuthorityError::NoSuchMatch(match_id))?;
        let events = op(&mut next).inspect_err(|e| {
            debug!(error = %e, code = e.code(), "Operation rejected");
        })?;
        self.persist(&next)?;
        *current = Some(next);

        self.publish(&events);
        Ok(Ack::new(match_id, events))
    }

    /// Drops a slot left empty by a failed first proposal. Only the registry
    /// and this caller may hold it, or another caller could still fill it.
    fn discard_if_empty(&self, match_id: MatchId, slot: &Slot) {
        let mut registry = lock(&self.registry);
        if Arc::strong_count(slot) == 2 && lock(slot).is_none() {
            registry.remove(&match_id);
            debug!(%match_id, "Discarded empty slot");
        }
    }

    fn persist(&self, record: &MatchRecord) -> Result<(), AuthorityError> {
        if let Some(journal) = &self.journal {
            journal.persist(record).inspect_err(|e| {
                warn!(match_id = %record.match_id(), error = %e, "Journal write failed");
            })?;
        }
        Ok(())
    }

    fn publish(&self, events: &[GameEvent]) {
        for event in events {
            info!(event = event.name(), match_id = %event.match_id(), "Event");
            if self.events.send(event.clone()).is_err() {
                debug!("No event subscribers");
            }
        }
    }
}
