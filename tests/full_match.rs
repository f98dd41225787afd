use cricket_scorer::application::{ScoringActor, ScoringCommand, ScoringReply, ScoringService, ServiceError, UndoOutcome};
use cricket_scorer::domain::{
    Dismissal, DismissalMode, MatchSetup, Outcome, PendingAction, ScoringError, TeamSetup, UndoRefusal,
};
use cricket_scorer::infrastructure::{InMemoryMatchStore, JsonFileMatchStore};
use cricket_scorer::interfaces::cli::{load_script, replay};
use cricket_scorer::shared::ids::{MatchId, PlayerId};

fn team(name: &str, size: u32) -> TeamSetup {
    TeamSetup {
        name: name.to_string(),
        players: (1..=size).map(|i| format!("{} {}", name, i)).collect(),
    }
}

/// Lions are ids 1..=size, Tigers size+1..=2*size
fn setup(overs: u32, size: u32) -> MatchSetup {
    MatchSetup {
        overs,
        team_size: size,
        teams: [team("Lions", size), team("Tigers", size)],
    }
}

fn bowled(next: u32) -> Outcome {
    Outcome::Wicket(Dismissal {
        mode: DismissalMode::Bowled,
        next_batter: Some(PlayerId(next)),
    })
}

fn record_all<S>(service: &mut ScoringService<S>, id: MatchId, balls: &[Outcome])
where
    S: cricket_scorer::infrastructure::MatchStore,
{
    for ball in balls {
        service.record_delivery(id, ball).unwrap();
    }
}

/// One-over, three-a-side match with the Lions' innings of 12 already in
fn one_over_chase() -> (ScoringService<InMemoryMatchStore>, MatchId) {
    let mut service = ScoringService::new(InMemoryMatchStore::new());
    let id = service.create_match(setup(1, 3)).unwrap();
    service.start_match(id, "Lions", PlayerId(1), PlayerId(2), PlayerId(4)).unwrap();
    record_all(&mut service, id, &vec![Outcome::Runs(2); 6]);
    assert_eq!(service.get(id).unwrap().pending, Some(PendingAction::SwitchInnings));
    service.switch_innings(id, PlayerId(4), PlayerId(5), PlayerId(1)).unwrap();
    (service, id)
}

#[test]
fn test_first_over_with_wicket() {
    let mut service = ScoringService::new(InMemoryMatchStore::new());
    let id = service.create_match(setup(2, 4)).unwrap();
    service.start_match(id, "Lions", PlayerId(1), PlayerId(2), PlayerId(5)).unwrap();

    record_all(&mut service, id, &[Outcome::Runs(1), Outcome::Runs(4)]);
    service.record_delivery(id, &bowled(3)).unwrap();
    service.record_delivery(id, &Outcome::Runs(0)).unwrap();
    service.record_delivery(id, &Outcome::Runs(0)).unwrap();
    let last = service.record_delivery(id, &Outcome::Runs(0)).unwrap();
    assert!(last.over_completed);
    assert!(!last.innings_completed);

    let state = service.get(id).unwrap();
    let lions = state.batting_team().unwrap();
    assert_eq!(lions.runs, 5);
    assert_eq!(lions.wickets_lost, 1);
    assert_eq!(state.deliveries_bowled_that_count, 6);
    // 交换场地后 1 号回到击球位
    assert_eq!(state.striker, Some(PlayerId(1)));
    assert_eq!(state.non_striker, Some(PlayerId(3)));
    assert_eq!(state.bowler, None);
    assert_eq!(state.previous_bowler, Some(PlayerId(5)));
    assert_eq!(state.pending, Some(PendingAction::SelectBowler));
    assert!(state.current_over.is_empty());

    let out = lions.player(PlayerId(2)).unwrap();
    assert_eq!(out.batting.runs, 4);
    assert_eq!(out.batting.balls_faced, 2);
    assert_eq!(out.batting.fours, 1);
    assert_eq!(out.out_description, "b Tigers 1");
    assert_eq!(lions.player(PlayerId(3)).unwrap().batting_position, 3);

    let bowler = state.bowling_team().unwrap().player(PlayerId(5)).unwrap();
    assert_eq!(bowler.bowling.balls_bowled, 6);
    assert_eq!(bowler.bowling.runs_conceded, 5);
    assert_eq!(bowler.bowling.wickets, 1);

    // 同一投球手不能连续两轮
    let err = service.change_bowler(id, PlayerId(5)).unwrap_err();
    assert!(matches!(err, ServiceError::Scoring(ScoringError::ConsecutiveOvers(_))));
    service.change_bowler(id, PlayerId(6)).unwrap();
    assert_eq!(service.get(id).unwrap().pending, None);
}

#[test]
fn test_undo_refused_after_over_boundary() {
    let mut service = ScoringService::new(InMemoryMatchStore::new());
    let id = service.create_match(setup(2, 4)).unwrap();
    service.start_match(id, "Lions", PlayerId(1), PlayerId(2), PlayerId(5)).unwrap();
    record_all(&mut service, id, &vec![Outcome::Runs(1); 6]);
    service.change_bowler(id, PlayerId(6)).unwrap();

    let outcome = service.undo_last_delivery(id).unwrap();
    assert_eq!(outcome, UndoOutcome::Refused(UndoRefusal::EmptyLog));
    assert_eq!(service.get(id).unwrap().batting_team().unwrap().runs, 6);
}

#[test]
fn test_tie() {
    let (mut service, id) = one_over_chase();
    let results: Vec<_> = vec![Outcome::Runs(2); 6]
        .iter()
        .map(|ball| service.record_delivery(id, ball).unwrap())
        .collect();
    assert!(results[..5].iter().all(|r| !r.innings_completed));
    assert!(results[5].match_completed);

    assert_eq!(service.complete_match(id).unwrap(), "Match tied!");
    assert!(service.get(id).unwrap().completed);
}

#[test]
fn test_defended_by_one_run() {
    let (mut service, id) = one_over_chase();
    record_all(&mut service, id, &vec![Outcome::Runs(2); 5]);
    service.record_delivery(id, &Outcome::Runs(1)).unwrap();
    assert_eq!(service.complete_match(id).unwrap(), "Lions won by 1 run!");
}

#[test]
fn test_defended_by_several_runs() {
    let (mut service, id) = one_over_chase();
    record_all(&mut service, id, &vec![Outcome::Runs(2); 4]);
    record_all(&mut service, id, &[Outcome::Runs(0), Outcome::Runs(0)]);
    assert_eq!(service.complete_match(id).unwrap(), "Lions won by 4 runs!");
}

#[test]
fn test_chase_won_by_one_wicket() {
    let (mut service, id) = one_over_chase();
    service.record_delivery(id, &bowled(6)).unwrap();
    record_all(&mut service, id, &[Outcome::Runs(6), Outcome::Runs(6)]);
    let winning = service.record_delivery(id, &Outcome::Runs(1)).unwrap();
    assert!(winning.innings_completed);
    assert!(winning.match_completed);

    // 比赛结束前不能继续记分
    let err = service.record_delivery(id, &Outcome::Runs(1)).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Scoring(ScoringError::Pending(PendingAction::CompleteMatch))
    ));

    assert_eq!(service.complete_match(id).unwrap(), "Tigers won by 1 wicket!");
    let err = service.record_delivery(id, &Outcome::Runs(1)).unwrap_err();
    assert!(matches!(err, ServiceError::Scoring(ScoringError::MatchCompleted)));
}

#[test]
fn test_resume_from_json_files() {
    let dir = tempfile::tempdir().unwrap();

    let id = {
        let mut service = ScoringService::new(JsonFileMatchStore::new(dir.path()).unwrap());
        let id = service.create_match(setup(2, 4)).unwrap();
        service.start_match(id, "Lions", PlayerId(1), PlayerId(2), PlayerId(5)).unwrap();
        record_all(&mut service, id, &[Outcome::Runs(4), Outcome::Runs(1)]);
        id
    };

    let mut service = ScoringService::new(JsonFileMatchStore::new(dir.path()).unwrap());
    assert_eq!(service.list_matches().unwrap(), vec![id]);

    service.record_delivery(id, &Outcome::Runs(2)).unwrap();
    let state = service.get(id).unwrap();
    assert_eq!(state.batting_team().unwrap().runs, 7);
    assert_eq!(state.striker, Some(PlayerId(2)));
    assert_eq!(state.current_over.len(), 3);

    // 撤销也能跨越重启
    assert!(service.undo_last_delivery(id).unwrap().is_undone());
    let reloaded = ScoringService::new(JsonFileMatchStore::new(dir.path()).unwrap())
        .scorecard(id)
        .unwrap();
    assert_eq!(reloaded.innings[0].runs, 5);
    assert_eq!(reloaded.this_over, vec!["4", "1"]);

    service.delete_match(id).unwrap();
    assert!(service.list_matches().unwrap().is_empty());
}

#[tokio::test]
async fn test_demo_script_through_actor() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/two_over_match.json");
    let script = load_script(&path).unwrap();
    let (handle, worker) = ScoringActor::spawn(ScoringService::new(InMemoryMatchStore::new()));

    let id = replay(&handle, script).await.unwrap();
    let card = match handle.execute(ScoringCommand::Scorecard { match_id: id }).await.unwrap() {
        ScoringReply::Scorecard(card) => card,
        other => panic!("unexpected reply {:?}", other),
    };

    assert_eq!(card.result.as_deref(), Some("Tigers won by 3 wickets!"));
    assert!(card.chase.is_none());
    assert_eq!(card.innings.len(), 2);

    let lions = &card.innings[0];
    assert_eq!((lions.runs, lions.wickets, lions.extras), (16, 2, 2));
    assert_eq!(lions.overs, "2.0");
    let asha = &lions.batting[0];
    assert_eq!(asha.name, "Asha");
    assert_eq!((asha.runs, asha.balls, asha.sixes), (9, 6, 1));
    assert_eq!(asha.dismissal, "c Gus b Fin");
    assert_eq!(lions.batting[1].dismissal, "b Eve");

    let tigers = &card.innings[1];
    assert_eq!((tigers.runs, tigers.wickets, tigers.extras), (17, 0, 1));
    assert_eq!(tigers.overs, "0.4");
    let asha_bowling = &tigers.bowling[0];
    assert_eq!(asha_bowling.name, "Asha");
    assert_eq!((asha_bowling.overs.as_str(), asha_bowling.runs), ("0.4", 17));

    drop(handle);
    let service = worker.await.unwrap();
    assert_eq!(service.store().len(), 1);
}
