// Integration tests for guess-number
// These tests verify that the bot, the engine, the host client and the
// session layer work together correctly

use guess_number::client::GameHostClient;
use guess_number::records;
use guess_number::session::NullView;
use guess_number::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn options(min: i64, max: i64) -> BotOptions {
    BotOptions {
        initial_range: Range::new(min, max).unwrap(),
        ..BotOptions::default()
    }
}

fn receipt(result: &str, attempts: u32) -> serde_json::Value {
    let completed = result == "correct";
    json!({
        "result": result,
        "status": if completed { "completed" } else { "active" },
        "attempts": attempts,
        "lastGuessAt": "2024-05-01T12:00:00.000Z",
        "finishedAt": if completed { json!("2024-05-01T12:00:00.000Z") } else { json!(null) },
    })
}

#[test]
fn test_end_to_end_binary_scenario() {
    // Target 42 on [1, 100]: 50 high, 25 low, 37 low, 43 high, 40 low, 41 low, 42 correct
    let mut engine = GameEngine::new();
    let game_id = engine.create(Some(42)).id().to_string();
    let mut bot = GuessBot::new(engine, Box::new(BinarySearch), options(1, 100));

    let result = bot.play(&game_id).unwrap();

    let expected = [
        (50, GuessResult::High),
        (25, GuessResult::Low),
        (37, GuessResult::Low),
        (43, GuessResult::High),
        (40, GuessResult::Low),
        (41, GuessResult::Low),
        (42, GuessResult::Correct),
    ];
    let actual: Vec<(i64, GuessResult)> = result.history.iter().map(|r| (r.guess, r.result)).collect();
    assert_eq!(actual, expected);
    assert_eq!(result.status, PlayStatus::Completed);
    assert_eq!(result.attempts, 7);

    let game = bot.authority().game(&game_id).unwrap();
    assert_eq!(game.status(), GameStatus::Completed);
    assert_eq!(game.attempts(), 7);
}

#[test]
fn test_binary_bound_over_full_range() {
    // Exhaustive over a stride of targets; the bisection depth never exceeds 15
    for target in (1..=10_000).step_by(37).chain([10_000]) {
        let mut engine = GameEngine::new();
        let id = engine.create(Some(target)).id().to_string();
        let mut bot = GuessBot::new(engine, Box::new(BinarySearch), BotOptions::default());
        let result = bot.play(&id).unwrap();
        assert_eq!(result.status, PlayStatus::Completed);
        assert!(result.attempts <= 15, "target {target}: {} guesses", result.attempts);
    }
}

#[test]
fn test_exponential_then_binary_session() {
    let mut engine = GameEngine::new();
    let id = engine.create(Some(6)).id().to_string();
    let mut bot = GuessBot::new(engine, Box::new(ExponentialSearch::new()), options(1, 10_000));

    let result = bot.play(&id).unwrap();

    // Probes step away from the lower bound: 1+1, 3+2, 6+4
    let guesses: Vec<i64> = result.history.iter().map(|r| r.guess).collect();
    assert_eq!(guesses[0], 2);
    assert_eq!(guesses[1], 5);
    assert_eq!(guesses[2], 10);
    assert_eq!(result.history[2].result, GuessResult::High);
    // After the overshoot at 10 the range is [6, 9]; binary picks 7, then 6
    assert_eq!(&guesses[3..], &[7, 6]);
    assert_eq!(result.status, PlayStatus::Completed);
}

#[test]
fn test_fibonacci_session_stays_in_range() {
    let mut engine = GameEngine::new();
    let id = engine.create(Some(5)).id().to_string();
    let mut bot = GuessBot::new(engine, Box::new(FibonacciSearch), options(5, 7));

    let result = bot.play(&id).unwrap();

    assert_eq!(result.history[0].guess, 6);
    assert_eq!(result.status, PlayStatus::Completed);
    assert!(result.history.iter().all(|r| (5..=7).contains(&r.guess)));
}

#[test]
fn test_session_records_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sessions.jsonl");

    for kind in [StrategyKind::Binary, StrategyKind::Fibonacci, StrategyKind::Binary] {
        let options = SessionOptions {
            strategy: kind,
            ..SessionOptions::default()
        };
        let report = run_session(GameEngine::new(), &options, &mut NullView).unwrap();
        records::append(&path, &report.to_record()).unwrap();
    }

    let saved = records::load(&path).unwrap();
    assert_eq!(saved.len(), 3);
    assert!(saved.iter().all(|r| r.status == PlayStatus::Completed));

    let summaries = records::summarize(&saved);
    assert_eq!(summaries["binary"].games, 2);
    assert_eq!(summaries["fibonacci"].games, 1);
    assert!(summaries["binary"].mean_attempts.unwrap() <= 15.0);
}

#[test]
fn test_strategy_selection_by_name() {
    for name in ["binary", "random", "exponential", "fibonacci"] {
        let kind: StrategyKind = name.parse().unwrap();
        let options = SessionOptions {
            strategy: kind,
            seed: Some(99),
            ..SessionOptions::default()
        };
        let report = run_session(GameEngine::with_target(777), &options, &mut NullView).unwrap();
        assert!(report.is_completed(), "{name}");
        assert_eq!(report.result.history.last().unwrap().guess, 777);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remote_host_full_game() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/games"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "game-1",
            "status": "active",
            "attempts": 0,
            "startedAt": "2024-05-01T12:00:00.000Z",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let script = [
        (50, "high"),
        (25, "low"),
        (37, "low"),
        (43, "high"),
        (40, "low"),
        (41, "low"),
        (42, "correct"),
    ];
    for (i, (value, result)) in script.iter().enumerate() {
        Mock::given(method("POST"))
            .and(path("/games/game-1/guess"))
            .and(body_json(json!({ "value": value })))
            .respond_with(ResponseTemplate::new(200).set_body_json(receipt(result, i as u32 + 1)))
            .expect(1)
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/games/game-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "game-1",
            "status": "completed",
            "attempts": 7,
            "startedAt": "2024-05-01T12:00:00.000Z",
            "finishedAt": "2024-05-01T12:00:01.000Z",
            "lastGuessAt": "2024-05-01T12:00:01.000Z",
        })))
        .mount(&server)
        .await;

    let uri = server.uri();
    let report = tokio::task::spawn_blocking(move || {
        let client = GameHostClient::new(uri, "secret-token")?;
        let session = SessionOptions {
            bot: options(1, 100),
            ..SessionOptions::default()
        };
        run_session(client, &session, &mut NullView)
    })
    .await
    .unwrap()
    .unwrap();

    assert!(report.is_completed());
    assert_eq!(report.info.game_id, "game-1");
    assert_eq!(report.result.attempts, 7);
    assert_eq!(report.host_game.attempts, 7);
    assert_eq!(report.host_game.status, GameStatus::Completed);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remote_auth_failure_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/games/game-1/guess"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid token" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = tokio::task::spawn_blocking(move || {
        let client = GameHostClient::new(uri, "expired").unwrap();
        let mut bot = GuessBot::new(client, Box::new(BinarySearch), BotOptions::default());
        let err = bot.play("game-1").unwrap_err();
        assert!(bot.history().is_empty());
        err
    })
    .await
    .unwrap();

    match err {
        Error::Api { status, message } => {
            assert_eq!(status, Some(401));
            assert_eq!(message, "Invalid token");
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remote_error_field_and_plain_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/games/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Game not found" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/games/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let uri = server.uri();
    let (missing, broken) = tokio::task::spawn_blocking(move || {
        let mut client = GameHostClient::new(uri, "token").unwrap();
        (
            client.get_game("missing").unwrap_err(),
            client.get_game("broken").unwrap_err(),
        )
    })
    .await
    .unwrap();

    assert!(matches!(
        missing,
        Error::Api { status: Some(404), ref message } if message == "Game not found"
    ));
    assert!(matches!(
        broken,
        Error::Api { status: Some(500), ref message } if message == "Internal Server Error"
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remote_guess_on_completed_game() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/games/done/guess"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Game already completed" })),
        )
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = tokio::task::spawn_blocking(move || {
        let mut client = GameHostClient::new(uri, "token").unwrap();
        client.submit_guess("done", 5).unwrap_err()
    })
    .await
    .unwrap();

    assert!(matches!(err, Error::Api { status: Some(400), .. }));
}

#[test]
fn test_manual_game_saved_alongside_bot_sessions() {
    use guess_number::manual::ManualGame;
    use std::io::Cursor;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sessions.jsonl");

    let mut game = ManualGame::new(Cursor::new("5000\nnope\n2500\n1234\n"), Vec::new(), Range::default());
    let manual = game.play(GameEngine::with_target(1234)).unwrap();
    records::append(&path, &manual.to_record()).unwrap();

    let bot = run_session(GameEngine::with_target(1234), &SessionOptions::default(), &mut NullView).unwrap();
    records::append(&path, &bot.to_record()).unwrap();

    let summaries = records::summarize(&records::load(&path).unwrap());
    assert_eq!(summaries[records::MANUAL_KEY].games, 1);
    assert_eq!(summaries[records::MANUAL_KEY].mean_attempts, Some(3.0));
    assert_eq!(summaries["binary"].completed, 1);
}

#[test]
fn test_seeded_random_bench_is_a_real_search() {
    let report = guess_number::bench::run(StrategyKind::Random, 200, BotOptions::default(), Some(42)).unwrap();
    assert_eq!(report.completed, 200);
    assert!(report.min_attempts < report.max_attempts);
    assert!(report.mean_attempts > 5.0);
}
