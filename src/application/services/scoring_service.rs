/// Scoring Service - Match Lifecycle Orchestration
///
/// Holds the matches currently being scored and the store they are saved
/// to. Every mutating operation runs the domain engine against the
/// in-memory match and then saves the whole match.
///
/// ## Dependency Injection
/// The service is generic over any `MatchStore`, enabling:
/// - In-memory stores in tests and dry runs
/// - The JSON file store in the CLI
/// - Failing stores to exercise persistence errors
///
/// ## Persistence failures
/// A save error does not roll back the in-memory match. It is logged,
/// counted, and returned as `ServiceError::Persistence`; the match keeps
/// the new state and any pending prompt.
///
/// ## Usage
/// ```rust,ignore
/// use cricket_scorer::application::ScoringService;
/// use cricket_scorer::infrastructure::persistence::InMemoryMatchStore;
///
/// let mut service = ScoringService::new(InMemoryMatchStore::new());
/// let id = service.create_match(setup)?;
/// service.start_match(id, "Lions", PlayerId(1), PlayerId(2), PlayerId(12))?;
/// let result = service.record_delivery(id, &Outcome::Runs(4))?;
/// ```

use crate::application::dto::{ScoringCommand, ScoringReply, UndoOutcome};
use crate::application::error::ServiceError;
use crate::domain::{
    DeliveryResult, Match, MatchSetup, MatchValidator, Outcome, Scorecard, ScoringEngine, ScoringError,
};
use crate::infrastructure::persistence::MatchStore;
use crate::shared::ids::{MatchId, PlayerId};
use crate::shared::metrics::METRICS;
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

/// Scores any number of matches against one store
///
/// # Type Parameters
/// * `S` - MatchStore implementation
pub struct ScoringService<S: MatchStore> {
    store: S,
    matches: HashMap<MatchId, Match>,
    validator: MatchValidator,
}

impl<S: MatchStore> ScoringService<S> {
    /// Creates a service with the default creation limits
    pub fn new(store: S) -> Self {
        Self::with_validator(store, MatchValidator::new())
    }

    /// Creates a service with custom creation limits
    pub fn with_validator(store: S, validator: MatchValidator) -> Self {
        Self {
            store,
            matches: HashMap::new(),
            validator,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates the definition, creates the match and saves it
    pub fn create_match(&mut self, setup: MatchSetup) -> Result<MatchId, ServiceError> {
        if let Err(e) = self.validator.validate(&setup) {
            warn!(error = %e, "match creation refused");
            METRICS.errors_total.with_label_values(&["validation"]).inc();
            return Err(e.into());
        }

        let id = MatchId::new();
        let state = Match::new(id, &setup);
        info!(
            match_id = %id,
            teams = %format!("{} vs {}", state.teams[0].name, state.teams[1].name),
            overs = setup.overs,
            team_size = setup.team_size,
            "match created"
        );
        self.matches.insert(id, state);
        self.persist(id)?;
        Ok(id)
    }

    pub fn start_match(
        &mut self,
        id: MatchId,
        batting_first: &str,
        striker: PlayerId,
        non_striker: PlayerId,
        bowler: PlayerId,
    ) -> Result<(), ServiceError> {
        self.mutate(id, "start_match", |engine| {
            engine.start(batting_first, striker, non_striker, bowler)
        })?;
        info!(match_id = %id, batting_first, "match started");
        Ok(())
    }

    /// Records one delivery; the flags tell the caller which prompt comes next
    pub fn record_delivery(&mut self, id: MatchId, outcome: &Outcome) -> Result<DeliveryResult, ServiceError> {
        let result = self.mutate(id, "record_delivery", |engine| engine.record(outcome))?;

        METRICS.deliveries_total.with_label_values(&[outcome.kind()]).inc();
        if result.over_completed {
            METRICS.overs_completed_total.inc();
        }
        if result.innings_completed {
            METRICS.innings_completed_total.inc();
        }
        debug!(match_id = %id, kind = outcome.kind(), ?result, "delivery recorded");
        Ok(result)
    }

    /// Undoes the last delivery of the current over. A refusal leaves the
    /// match untouched and is not saved.
    pub fn undo_last_delivery(&mut self, id: MatchId) -> Result<UndoOutcome, ServiceError> {
        let state = self.match_mut(id)?;
        let undone = ScoringEngine::new(state).undo();
        match undone {
            Ok(delivery) => {
                METRICS.undo_total.with_label_values(&["undone"]).inc();
                debug!(match_id = %id, outcome = %delivery.outcome, "delivery undone");
                self.persist(id)?;
                Ok(UndoOutcome::Undone(delivery))
            }
            Err(refusal) => {
                METRICS.undo_total.with_label_values(&["refused"]).inc();
                warn!(match_id = %id, reason = %refusal, "undo refused");
                Ok(UndoOutcome::Refused(refusal))
            }
        }
    }

    pub fn change_bowler(&mut self, id: MatchId, bowler: PlayerId) -> Result<(), ServiceError> {
        self.mutate(id, "change_bowler", |engine| engine.change_bowler(bowler))?;
        debug!(match_id = %id, bowler = %bowler, "bowler changed");
        Ok(())
    }

    pub fn switch_innings(
        &mut self,
        id: MatchId,
        striker: PlayerId,
        non_striker: PlayerId,
        bowler: PlayerId,
    ) -> Result<(), ServiceError> {
        self.mutate(id, "switch_innings", |engine| {
            engine.switch_innings(striker, non_striker, bowler)
        })?;
        info!(match_id = %id, "innings switched");
        Ok(())
    }

    /// Confirms the result and returns it
    pub fn complete_match(&mut self, id: MatchId) -> Result<String, ServiceError> {
        let result = self.mutate(id, "complete_match", |engine| engine.complete())?;
        METRICS.matches_completed_total.inc();
        info!(match_id = %id, result = %result, "match completed");
        Ok(result)
    }

    /// Drops the match from memory and from the store
    pub fn delete_match(&mut self, id: MatchId) -> Result<(), ServiceError> {
        let known = self.matches.remove(&id).is_some() || self.store.exists(id)?;
        if !known {
            return Err(ServiceError::MatchNotFound(id));
        }
        self.store.delete(id)?;
        info!(match_id = %id, "match deleted");
        Ok(())
    }

    /// Re-reads a match from the store, replacing any in-memory copy
    pub fn load_match(&mut self, id: MatchId) -> Result<&Match, ServiceError> {
        let state = self.store.load(id)?.ok_or(ServiceError::MatchNotFound(id))?;
        debug!(match_id = %id, "match loaded");
        self.matches.insert(id, state);
        self.match_ref(id)
    }

    /// The match, loading it from the store if it is not in memory
    pub fn get(&mut self, id: MatchId) -> Result<&Match, ServiceError> {
        self.match_mut(id)?;
        self.match_ref(id)
    }

    pub fn scorecard(&mut self, id: MatchId) -> Result<Scorecard, ServiceError> {
        Ok(Scorecard::from_match(self.get(id)?))
    }

    /// Ids of every stored match
    pub fn list_matches(&self) -> Result<Vec<MatchId>, ServiceError> {
        Ok(self.store.list()?)
    }

    /// Dispatches one command
    pub fn execute(&mut self, command: ScoringCommand) -> Result<ScoringReply, ServiceError> {
        let reply = match command {
            ScoringCommand::CreateMatch { setup } => ScoringReply::Created(self.create_match(setup)?),
            ScoringCommand::StartMatch {
                match_id,
                batting_first,
                striker,
                non_striker,
                bowler,
            } => {
                self.start_match(match_id, &batting_first, striker, non_striker, bowler)?;
                ScoringReply::Done
            }
            ScoringCommand::RecordDelivery { match_id, outcome } => {
                ScoringReply::Delivery(self.record_delivery(match_id, &outcome)?)
            }
            ScoringCommand::UndoLastDelivery { match_id } => {
                ScoringReply::Undo(self.undo_last_delivery(match_id)?)
            }
            ScoringCommand::ChangeBowler { match_id, bowler } => {
                self.change_bowler(match_id, bowler)?;
                ScoringReply::Done
            }
            ScoringCommand::SwitchInnings {
                match_id,
                striker,
                non_striker,
                bowler,
            } => {
                self.switch_innings(match_id, striker, non_striker, bowler)?;
                ScoringReply::Done
            }
            ScoringCommand::CompleteMatch { match_id } => {
                ScoringReply::Completed(self.complete_match(match_id)?)
            }
            ScoringCommand::DeleteMatch { match_id } => {
                self.delete_match(match_id)?;
                ScoringReply::Done
            }
            ScoringCommand::LoadMatch { match_id } => {
                ScoringReply::Match(Box::new(self.load_match(match_id)?.clone()))
            }
            ScoringCommand::GetMatch { match_id } => {
                ScoringReply::Match(Box::new(self.get(match_id)?.clone()))
            }
            ScoringCommand::Scorecard { match_id } => {
                ScoringReply::Scorecard(Box::new(self.scorecard(match_id)?))
            }
            ScoringCommand::ListMatches => ScoringReply::Matches(self.list_matches()?),
        };
        Ok(reply)
    }

    fn match_ref(&self, id: MatchId) -> Result<&Match, ServiceError> {
        self.matches.get(&id).ok_or(ServiceError::MatchNotFound(id))
    }

    fn match_mut(&mut self, id: MatchId) -> Result<&mut Match, ServiceError> {
        if !self.matches.contains_key(&id) {
            let loaded = self.store.load(id)?.ok_or(ServiceError::MatchNotFound(id))?;
            debug!(match_id = %id, "match loaded on demand");
            self.matches.insert(id, loaded);
        }
        self.matches.get_mut(&id).ok_or(ServiceError::MatchNotFound(id))
    }

    /// Runs one engine operation, then saves the match if it succeeded
    fn mutate<T>(
        &mut self,
        id: MatchId,
        operation: &'static str,
        op: impl FnOnce(&mut ScoringEngine<'_>) -> Result<T, ScoringError>,
    ) -> Result<T, ServiceError> {
        let state = self.match_mut(id)?;
        let outcome = op(&mut ScoringEngine::new(state));
        let value = match outcome {
            Ok(value) => value,
            Err(e) => {
                warn!(match_id = %id, operation, reason = %e, "operation refused");
                METRICS.errors_total.with_label_values(&[e.label()]).inc();
                return Err(e.into());
            }
        };
        self.persist(id)?;
        Ok(value)
    }

    fn persist(&self, id: MatchId) -> Result<(), ServiceError> {
        let Some(state) = self.matches.get(&id) else {
            return Ok(());
        };
        self.store.save(state).map_err(|source| {
            error!(match_id = %id, error = %source, "failed to save match");
            METRICS.errors_total.with_label_values(&["persistence"]).inc();
            ServiceError::Persistence { id, source }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::match_state::tests::setup;
    use crate::domain::{PendingAction, UndoRefusal};
    use crate::infrastructure::persistence::{InMemoryMatchStore, StoreError};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Store whose saves fail once `broken` is set
    #[derive(Default, Clone)]
    struct FlakyStore {
        inner: Arc<InMemoryMatchStore>,
        broken: Arc<AtomicBool>,
    }

    impl MatchStore for FlakyStore {
        fn save(&self, state: &Match) -> crate::infrastructure::persistence::Result<()> {
            if self.broken.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("disk full".to_string()));
            }
            self.inner.save(state)
        }

        fn load(&self, id: MatchId) -> crate::infrastructure::persistence::Result<Option<Match>> {
            self.inner.load(id)
        }

        fn delete(&self, id: MatchId) -> crate::infrastructure::persistence::Result<()> {
            self.inner.delete(id)
        }

        fn list(&self) -> crate::infrastructure::persistence::Result<Vec<MatchId>> {
            self.inner.list()
        }
    }

    fn started_service() -> (ScoringService<InMemoryMatchStore>, MatchId) {
        let mut service = ScoringService::new(InMemoryMatchStore::new());
        let id = service.create_match(setup(2, 4)).unwrap();
        service
            .start_match(id, "Lions", PlayerId(1), PlayerId(2), PlayerId(5))
            .unwrap();
        (service, id)
    }

    #[test]
    fn test_create_match_saves() {
        let mut service = ScoringService::new(InMemoryMatchStore::new());
        let id = service.create_match(setup(2, 4)).unwrap();
        assert!(service.store().exists(id).unwrap());
        assert!(!service.get(id).unwrap().started);
    }

    #[test]
    fn test_create_match_validation() {
        let mut service = ScoringService::new(InMemoryMatchStore::new());
        let result = service.create_match(setup(0, 4));
        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert!(service.store().is_empty());
    }

    #[test]
    fn test_every_mutation_is_saved() {
        let (mut service, id) = started_service();
        service.record_delivery(id, &Outcome::Runs(4)).unwrap();

        let saved = service.store().load(id).unwrap().unwrap();
        assert_eq!(&saved, service.get(id).unwrap());
        assert_eq!(saved.batting_team().unwrap().runs, 4);
    }

    #[test]
    fn test_unknown_match() {
        let mut service = ScoringService::new(InMemoryMatchStore::new());
        let id = MatchId::new();
        assert!(matches!(
            service.record_delivery(id, &Outcome::Runs(1)),
            Err(ServiceError::MatchNotFound(missing)) if missing == id
        ));
        assert!(matches!(service.delete_match(id), Err(ServiceError::MatchNotFound(_))));
    }

    #[test]
    fn test_lazy_load_from_store() {
        let (mut first, id) = started_service();
        first.record_delivery(id, &Outcome::Runs(2)).unwrap();

        // a fresh service over the same store picks the match up on first use
        let mut second = ScoringService::new(first.store);
        second.record_delivery(id, &Outcome::Runs(1)).unwrap();
        let state = second.get(id).unwrap();
        assert_eq!(state.batting_team().unwrap().runs, 3);
        assert_eq!(state.current_over.len(), 2);
    }

    #[test]
    fn test_undo_refusal_is_reported() {
        let (mut service, id) = started_service();
        assert_eq!(
            service.undo_last_delivery(id).unwrap(),
            UndoOutcome::Refused(UndoRefusal::EmptyLog)
        );
        service.record_delivery(id, &Outcome::Wide(0)).unwrap();
        assert!(service.undo_last_delivery(id).unwrap().is_undone());
        assert_eq!(service.get(id).unwrap().batting_team().unwrap().runs, 0);
    }

    #[test]
    fn test_refusal_does_not_save() {
        let (mut service, id) = started_service();
        let result = service.change_bowler(id, PlayerId(6));
        assert!(matches!(
            result,
            Err(ServiceError::Scoring(ScoringError::NothingPending))
        ));
    }

    #[test]
    fn test_persistence_failure_keeps_memory_state() {
        let store = FlakyStore::default();
        let mut service = ScoringService::new(store.clone());
        let id = service.create_match(setup(1, 4)).unwrap();
        service
            .start_match(id, "Lions", PlayerId(1), PlayerId(2), PlayerId(5))
            .unwrap();

        store.broken.store(true, Ordering::SeqCst);
        let result = service.record_delivery(id, &Outcome::Runs(6));
        assert!(matches!(result, Err(ServiceError::Persistence { .. })));

        // memory moved on, the store did not
        assert_eq!(service.get(id).unwrap().batting_team().unwrap().runs, 6);
        let saved = store.load(id).unwrap().unwrap();
        assert_eq!(saved.batting_team().unwrap().runs, 0);

        store.broken.store(false, Ordering::SeqCst);
        service.record_delivery(id, &Outcome::Runs(1)).unwrap();
        let saved = store.load(id).unwrap().unwrap();
        assert_eq!(saved.batting_team().unwrap().runs, 7);
    }

    #[test]
    fn test_full_lifecycle_through_execute() {
        let mut service = ScoringService::new(InMemoryMatchStore::new());
        let id = match service.execute(ScoringCommand::CreateMatch { setup: setup(1, 2) }).unwrap() {
            ScoringReply::Created(id) => id,
            other => panic!("unexpected reply {:?}", other),
        };
        service
            .execute(ScoringCommand::StartMatch {
                match_id: id,
                batting_first: "Tigers".to_string(),
                striker: PlayerId(3),
                non_striker: PlayerId(4),
                bowler: PlayerId(1),
            })
            .unwrap();

        let reply = service
            .execute(ScoringCommand::RecordDelivery {
                match_id: id,
                outcome: Outcome::Wicket(crate::domain::Dismissal {
                    mode: crate::domain::DismissalMode::Bowled,
                    next_batter: None,
                }),
            })
            .unwrap();
        assert_eq!(
            reply,
            ScoringReply::Delivery(DeliveryResult {
                over_completed: false,
                innings_completed: true,
                match_completed: false,
            })
        );
        assert_eq!(service.get(id).unwrap().pending, Some(PendingAction::SwitchInnings));

        service
            .execute(ScoringCommand::SwitchInnings {
                match_id: id,
                striker: PlayerId(1),
                non_striker: PlayerId(2),
                bowler: PlayerId(3),
            })
            .unwrap();
        service.record_delivery(id, &Outcome::Runs(1)).unwrap();
        let completed = service.execute(ScoringCommand::CompleteMatch { match_id: id }).unwrap();
        assert_eq!(completed, ScoringReply::Completed("Lions won by 1 wicket!".to_string()));

        service.execute(ScoringCommand::DeleteMatch { match_id: id }).unwrap();
        assert_eq!(
            service.execute(ScoringCommand::ListMatches).unwrap(),
            ScoringReply::Matches(vec![])
        );
    }
}
