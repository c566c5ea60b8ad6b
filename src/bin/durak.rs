//! Headless Durak: a random human stand-in against the policy-driven opponent.

use clap::{Parser, ValueEnum};
use durak_rs::agents::{Action, OpponentProfile, PlayerAgent, PolicyAgent, RandomAgent};
use durak_rs::game::{Opening, Outcome, Phase, Seat};
use durak_rs::policy::{ScoringPolicy, UniformPolicy};
use durak_rs::session::{LogPresenter, Session, SessionConfig};
use std::time::{Duration, Instant};

/// Upper bound on steps per game before it is abandoned.
const STEP_CAP: usize = 10_000;

#[derive(Parser, Debug)]
#[command(name = "durak")]
#[command(about = "Play headless Durak games against the automated opponent")]
#[command(version = durak_rs::VERSION)]
struct Args {
    /// Number of games to play
    #[arg(short, long, default_value_t = 1)]
    games: u32,

    /// Base seed; game i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Pause before each automated step, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Who attacks first
    #[arg(long, value_enum, default_value_t = OpeningArg::Human)]
    opening: OpeningArg,

    /// Scoring policy for the opponent
    #[arg(long, value_enum, default_value_t = PolicyArg::Uniform)]
    policy: PolicyArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OpeningArg {
    Human,
    Automated,
    LowestTrump,
}

impl From<OpeningArg> for Opening {
    fn from(arg: OpeningArg) -> Self {
        match arg {
            OpeningArg::Human => Opening::Human,
            OpeningArg::Automated => Opening::Automated,
            OpeningArg::LowestTrump => Opening::LowestTrump,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Uniform,
    None,
}

#[derive(Debug, Default)]
struct Tally {
    human: u32,
    automated: u32,
    draws: u32,
    abandoned: u32,
}

impl Tally {
    fn record(&mut self, result: Option<Outcome>) {
        match result {
            Some(Outcome::Winner(Seat::Human)) => self.human += 1,
            Some(Outcome::Winner(Seat::Automated)) => self.automated += 1,
            Some(Outcome::Draw) => self.draws += 1,
            None => self.abandoned += 1,
        }
    }
}

fn opponent(args: &Args, seed: Option<u64>) -> Box<dyn PlayerAgent> {
    let policy: Option<Box<dyn ScoringPolicy>> = match args.policy {
        PolicyArg::Uniform => Some(Box::new(UniformPolicy)),
        PolicyArg::None => None,
    };
    let mut profile = OpponentProfile::default();
    if let Some(s) = seed {
        profile = profile.with_seed(s);
    }
    Box::new(PolicyAgent::new(profile, policy))
}

/// Drive one game to the end, sleeping until each continuation is due.
fn play(session: &mut Session<LogPresenter>, human: &mut RandomAgent) -> Option<Outcome> {
    for _ in 0..STEP_CAP {
        if let Some(outcome) = session.game().outcome() {
            return Some(outcome);
        }
        if let Some(due) = session.next_due() {
            std::thread::sleep(due.saturating_duration_since(Instant::now()));
            session.tick(Instant::now());
            continue;
        }
        let decision = human.decide(&session.game().view(Seat::Human));
        if let Err(e) = session.submit(decision.action, Instant::now()) {
            let fallback = match session.game().phase() {
                Phase::Attacking => Action::Pass,
                Phase::Defending => Action::Take,
            };
            log::warn!("human move {:?} rejected ({e}); trying {fallback:?}", decision.action);
            if let Err(e) = session.submit(fallback, Instant::now()) {
                log::error!("human stand-in stuck: {e}");
                return None;
            }
        }
    }
    log::error!("game abandoned after {STEP_CAP} steps");
    None
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let seed_for = |i: u32| args.seed.map(|s| s.wrapping_add(u64::from(i)));
    let mut config = SessionConfig::default()
        .with_delay(Duration::from_millis(args.delay_ms))
        .with_opening(args.opening.into());
    if let Some(s) = args.seed {
        config = config.with_seed(s);
    }

    let mut tally = Tally::default();
    let mut session = Session::new(config, opponent(&args, seed_for(0)), LogPresenter, Instant::now());
    for i in 0..args.games {
        if i > 0 {
            session.new_game(opponent(&args, seed_for(i)), Instant::now());
        }
        let mut human = RandomAgent::new(seed_for(i).map(|s| s ^ 0x5eed));
        let result = play(&mut session, &mut human);
        match result {
            Some(Outcome::Winner(seat)) => log::info!("game {}: {seat} wins", i + 1),
            Some(Outcome::Draw) => log::info!("game {}: draw", i + 1),
            None => log::warn!("game {}: abandoned", i + 1),
        }
        tally.record(result);
    }

    println!(
        "games: {}  human: {}  automated: {}  draws: {}  abandoned: {}",
        args.games, tally.human, tally.automated, tally.draws, tally.abandoned
    );
}
