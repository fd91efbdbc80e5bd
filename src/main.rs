use levelnine::config::Config;
use levelnine::display_terminal::TerminalDisplay;
use levelnine::input::StdinInput;
use levelnine::interpreter::Interpreter;
use levelnine::random::GameRand;
use levelnine::vm::{Game, VM};
use log::{debug, info};
use std::env;
use std::process;

fn main() {
    // Initialize logging; RUST_LOG overrides the default
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("levelnine - interpreter for Level 9 game-logic images");
        eprintln!();
        eprintln!("Usage: {} <game_file>", args[0]);
        eprintln!();
        eprintln!("Settings are read from $LEVELNINE_CONFIG or ./levelnine.toml");
        process::exit(1);
    }

    let game_path = &args[1];
    if let Err(e) = run(game_path) {
        eprintln!("\nError: {e}");
        process::exit(1);
    }
}

fn run(game_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    debug!("Loading game: {}", game_path);
    let game_data = std::fs::read(game_path)
        .map_err(|e| format!("cannot read game file '{game_path}': {e}"))?;
    let game = Game::from_memory(game_data)?;
    info!("{}", game.header);
    let vm = VM::new(game);

    let rand = match config.game.seed {
        Some(seed) => GameRand::new_predictable(seed),
        None => GameRand::from_clock(),
    };
    let mut interpreter = Interpreter::new(
        vm,
        Box::new(TerminalDisplay::new(config.game.wrap_width)),
        Box::new(StdinInput::new()),
    )
    .with_rand(rand)
    .with_text_format(config.game.text_format);

    interpreter.run_with_limit(config.game.instruction_limit)?;
    debug!(
        "Game ended normally after {} instructions",
        interpreter.instruction_count()
    );
    Ok(())
}
