use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use cricket_scorer::domain::{Match, MatchSetup, Outcome, Scorecard, ScoringEngine, TeamSetup};
use cricket_scorer::shared::ids::{MatchId, PlayerId};

const OPENING_BOWLER: PlayerId = PlayerId(12);
const CHANGE_BOWLER: PlayerId = PlayerId(13);

fn squad(prefix: &str) -> TeamSetup {
    TeamSetup {
        name: prefix.to_string(),
        players: (1..=11).map(|i| format!("{} {}", prefix, i)).collect(),
    }
}

// 20 轮、每队 11 人的已开赛比赛
fn started_t20() -> Match {
    let setup = MatchSetup {
        overs: 20,
        team_size: 11,
        teams: [squad("Lions"), squad("Tigers")],
    };
    let mut state = Match::new(MatchId::new(), &setup);
    ScoringEngine::new(&mut state)
        .start("Lions", PlayerId(1), PlayerId(2), OPENING_BOWLER)
        .unwrap();
    state
}

// 每球 1 分打满一局，每轮结束后两名投球手轮换
fn play_innings(state: &mut Match) {
    let mut engine = ScoringEngine::new(state);
    let mut bowler = OPENING_BOWLER;
    loop {
        let result = engine.record(black_box(&Outcome::Runs(1))).unwrap();
        if result.innings_completed {
            break;
        }
        if result.over_completed {
            bowler = if bowler == OPENING_BOWLER { CHANGE_BOWLER } else { OPENING_BOWLER };
            engine.change_bowler(bowler).unwrap();
        }
    }
}

fn scoring_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("Ball-by-ball Scoring");

    let master = started_t20();

    group.bench_function("Record a full 20-over innings", |b| {
        b.iter_batched(
            || master.clone(),
            |mut state| play_innings(&mut state),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("Record then undo a delivery", |b| {
        b.iter_batched(
            || master.clone(),
            |mut state| {
                let mut engine = ScoringEngine::new(&mut state);
                for outcome in [Outcome::Runs(3), Outcome::Wide(1), Outcome::LegBye(2)] {
                    engine.record(black_box(&outcome)).unwrap();
                    engine.undo().unwrap();
                }
            },
            BatchSize::SmallInput,
        );
    });

    let mut finished = master.clone();
    play_innings(&mut finished);
    group.bench_function("Build scorecard after one innings", |b| {
        b.iter(|| Scorecard::from_match(black_box(&finished)));
    });

    group.finish();
}

criterion_group!(benches, scoring_benchmark);
criterion_main!(benches);
