//! Junker Run entry point
//!
//! The browser build is driven from `junker_run::web`; natively this runs a
//! headless autopilot session and can talk to the global leaderboard.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result, anyhow};
    use clap::Parser;

    use junker_run::consts::SIM_DT_MS;
    use junker_run::leaderboard::{Leaderboard, LeaderboardClient, MAX_ENTRIES, now_ms};
    use junker_run::sim::{Character, GameEvent, GameState, TickInput, TokenKind, tick};
    use junker_run::tuning::Tuning;

    #[derive(Parser, Debug)]
    #[command(name = "junker-run")]
    #[command(about = "Headless Junker Run session with an autopilot player")]
    pub struct Cli {
        /// Run seed (defaults to the current time)
        #[arg(long)]
        seed: Option<u64>,
        /// geartickler or kyle
        #[arg(long, default_value = "geartickler")]
        character: String,
        /// Stop after this much simulated time if the run is still going
        #[arg(long, default_value_t = 120.0)]
        seconds: f32,
        /// Tuning JSON (missing fields take defaults)
        #[arg(long)]
        tuning: Option<PathBuf>,
        /// Write the default tuning to this path and exit
        #[arg(long)]
        dump_tuning: Option<PathBuf>,
        /// Print the global top 10 after the run
        #[arg(long)]
        leaderboard: bool,
        /// Submit the final score under these initials
        #[arg(long)]
        submit: Option<String>,
        #[arg(long, default_value = junker_run::leaderboard::DEFAULT_ENDPOINT)]
        endpoint: String,
    }

    #[derive(Debug, Default)]
    struct RunSummary {
        platforms: usize,
        failed_placements: usize,
        tokens: [usize; 3],
        obstacles: usize,
        hits: usize,
        absorbed: usize,
    }

    impl RunSummary {
        fn record(&mut self, event: &GameEvent) {
            match event {
                GameEvent::PlatformPlaced { .. } => self.platforms += 1,
                GameEvent::PlacementFailed { .. } => self.failed_placements += 1,
                GameEvent::TokenCollected { kind, .. } => {
                    let slot = match kind {
                        TokenKind::Basic => 0,
                        TokenKind::Bonus => 1,
                        TokenKind::Invincibility => 2,
                    };
                    self.tokens[slot] += 1;
                }
                GameEvent::ObstacleSpawned { .. } => self.obstacles += 1,
                GameEvent::ObstacleStruck {
                    while_invincible, ..
                } => {
                    if *while_invincible {
                        self.absorbed += 1;
                    } else {
                        self.hits += 1;
                    }
                }
                _ => {}
            }
        }
    }

    pub async fn run(cli: Cli) -> Result<()> {
        if let Some(path) = &cli.dump_tuning {
            Tuning::default()
                .save_to_path(path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Default tuning written to {}", path.display());
            return Ok(());
        }

        let tuning = match &cli.tuning {
            Some(path) => Tuning::load_from_path(path)
                .with_context(|| format!("loading tuning from {}", path.display()))?,
            None => Tuning::default(),
        };
        let character = Character::from_name(&cli.character)
            .ok_or_else(|| anyhow!("unknown character {:?}", cli.character))?;
        let seed = cli.seed.unwrap_or_else(now_ms);

        let mut state = GameState::with_tuning(seed, character, tuning);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut summary = RunSummary::default();
        let max_ticks = (cli.seconds * 1000.0 / SIM_DT_MS).ceil() as u64;

        while !state.is_over() && state.time_ticks < max_ticks {
            tick(&mut state, &input, SIM_DT_MS);
            for event in state.drain_events() {
                log::debug!("t={} {event:?}", state.time_ticks);
                summary.record(&event);
            }
        }

        println!("Seed:       {seed}");
        println!("Character:  {}", character.as_str());
        println!(
            "Survived:   {:.1}s ({} ticks){}",
            state.clock_ms / 1000.0,
            state.time_ticks,
            if state.is_over() { "" } else { ", time limit" }
        );
        println!("Score:      {}", state.score);
        println!("Lives left: {}", state.lives);
        println!(
            "Platforms:  {} placed, {} skipped",
            summary.platforms, summary.failed_placements
        );
        println!(
            "Tokens:     {} basic, {} bonus, {} invincibility",
            summary.tokens[0], summary.tokens[1], summary.tokens[2]
        );
        println!(
            "Obstacles:  {} spawned, {} hits taken, {} smashed",
            summary.obstacles, summary.hits, summary.absorbed
        );

        if !cli.leaderboard && cli.submit.is_none() {
            return Ok(());
        }

        let client = LeaderboardClient::new(cli.endpoint.clone());
        // Snapshot before submitting so the local insert doesn't double count
        let mut board = client.fetch_top().await;
        match &cli.submit {
            Some(initials) => {
                let entry = client
                    .submit(initials, state.score)
                    .await
                    .context("submitting score")?;
                println!("Submitted {} - {}", entry.initials, entry.score);
                match board.insert(entry) {
                    Some(rank) => println!("Placed #{rank} on the global board"),
                    None => println!("Outside the global top {MAX_ENTRIES}"),
                }
            }
            None => {
                if let Some(rank) = board.potential_rank(state.score) {
                    println!("This run would place #{rank}");
                }
            }
        }
        if cli.leaderboard {
            print_board(&board);
        }
        Ok(())
    }

    fn print_board(board: &Leaderboard) {
        println!("\nGlobal Leaderboard:");
        if board.is_empty() {
            println!("  No scores yet");
        }
        for (i, entry) in board.entries.iter().enumerate() {
            println!("  {:>2}. {} - {}", i + 1, entry.initials, entry.score);
        }
        if let Some(best) = board.top_score() {
            println!("Best: {best}");
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = headless::Cli::parse();
    headless::run(cli).await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is junker_run::web::start, this is just to satisfy the compiler
}
