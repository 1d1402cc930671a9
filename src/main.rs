use guess_number::bench;
use guess_number::cli::{self, BotArgs, Command, ConsoleView, FeedbackPrompt, parse_cli};
use guess_number::client::GameHostClient;
use guess_number::engine::GameEngine;
use guess_number::error::{Error, Result};
use guess_number::manual::ManualGame;
use guess_number::range::Range;
use guess_number::records::{self, SessionRecord};
use guess_number::session::run_session;
use guess_number::strategy::StrategyKind;
use guess_number::tui::TuiView;
use guess_number::{info_log, logging};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    let cli = parse_cli();
    logging::init(cli.verbose, cli.uses_tui());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: cli::Cli) -> Result<()> {
    let records_path = cli.records_path.clone().or_else(records::default_path);
    let save_to = if cli.no_save { None } else { records_path.clone() };

    match cli.command {
        Command::Play {
            bot,
            target,
            tui,
            delay_ms,
        } => {
            let options = bot.session_options()?;
            if let Some(target) = target
                && !options.bot.initial_range.contains(target)
            {
                return Err(Error::config(format!(
                    "target {target} is outside {}",
                    options.bot.initial_range
                )));
            }
            let engine = match target {
                Some(target) => GameEngine::with_target(target),
                None => random_target_engine(&bot),
            };
            let report = if tui {
                let mut view = TuiView::new(Duration::from_millis(delay_ms))?;
                run_session(engine, &options, &mut view)?
            } else {
                run_session(engine, &options, &mut ConsoleView)?
            };
            save(save_to.as_ref(), &report.to_record())
        }
        Command::Remote {
            bot,
            host,
            token,
            timeout_ms,
        } => {
            let host = host.ok_or_else(|| Error::config("missing --host or GAME_HOST"))?;
            let token = token.ok_or_else(|| Error::config("missing --token or GAME_HOST_TOKEN"))?;
            let client =
                GameHostClient::with_timeout(host, token, Duration::from_millis(timeout_ms))?;
            let report = run_session(client, &bot.session_options()?, &mut ConsoleView)?;
            save(save_to.as_ref(), &report.to_record())
        }
        Command::Manual {
            target,
            host,
            token,
            timeout_ms,
        } => {
            let bounds = Range::default();
            let stdin = io::stdin();
            let mut game = ManualGame::new(stdin.lock(), io::stdout(), bounds);
            let report = match host {
                Some(host) => {
                    let token =
                        token.ok_or_else(|| Error::config("missing --token or GAME_HOST_TOKEN"))?;
                    let client =
                        GameHostClient::with_timeout(host, token, Duration::from_millis(timeout_ms))?;
                    game.play(client)?
                }
                None => {
                    if let Some(target) = target
                        && !bounds.contains(target)
                    {
                        return Err(Error::config(format!("target {target} is outside {bounds}")));
                    }
                    game.play(target.map_or_else(GameEngine::new, GameEngine::with_target))?
                }
            };
            save(save_to.as_ref(), &report.to_record())
        }
        Command::Assist { bot } => {
            let options = bot.session_options()?;
            println!(
                "Think of a whole number in {} and answer each guess.",
                options.bot.initial_range
            );
            let stdin = io::stdin();
            let prompt = FeedbackPrompt::new(stdin.lock(), io::stdout());
            let report = run_session(prompt, &options, &mut ConsoleView)?;
            save(save_to.as_ref(), &report.to_record())
        }
        Command::Bench { bot, rounds, all } => {
            let options = bot.bot_options()?;
            let kinds: Vec<StrategyKind> = if all {
                StrategyKind::ALL.to_vec()
            } else {
                vec![bot.strategy]
            };
            let reports = kinds
                .into_iter()
                .map(|kind| bench::run(kind, rounds, options, bot.seed))
                .collect::<Result<Vec<_>>>()?;
            cli::display_bench(&reports);
            Ok(())
        }
        Command::History => {
            let path = records_path
                .ok_or_else(|| Error::config("no records location; pass --records"))?;
            let summaries = records::summarize(&records::load(&path)?);
            cli::display_history(&summaries);
            Ok(())
        }
    }
}

/// The engine draws from `[1, 10000]`; custom ranges need their own target.
fn random_target_engine(bot: &BotArgs) -> GameEngine {
    use rand::Rng;

    if bot.min == guess_number::range::DEFAULT_MIN && bot.max == guess_number::range::DEFAULT_MAX {
        GameEngine::new()
    } else {
        GameEngine::with_target(rand::thread_rng().gen_range(bot.min..=bot.max))
    }
}

fn save(path: Option<&PathBuf>, record: &SessionRecord) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    records::append(path, record)?;
    info_log!("Saved session to {}", path.display());
    Ok(())
}
