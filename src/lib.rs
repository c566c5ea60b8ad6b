//! durak-rs: rules engine and automated opponent for two-player Durak
//!
//! Goals:
//! - 36-card deck with a trump suit fixed by the bottom card
//! - Attack / defend / pass / take state machine with win detection
//! - An opponent that consults an external scoring policy and always has a
//!   legal fallback when the policy is missing or misbehaves
//! - No panics for illegal moves; use `Result` and leave state untouched
//!
//! ## Quick start: play a round against the opponent
//! ```
//! use std::time::{Duration, Instant};
//! use durak_rs::agents::{Action, OpponentProfile, PolicyAgent};
//! use durak_rs::game::Seat;
//! use durak_rs::policy::UniformPolicy;
//! use durak_rs::session::{NullPresenter, Session, SessionConfig};
//!
//! let config = SessionConfig::default().with_seed(7).with_delay(Duration::ZERO);
//! let opponent = PolicyAgent::new(OpponentProfile::default(), Some(Box::new(UniformPolicy)));
//! let now = Instant::now();
//! let mut session = Session::new(config, Box::new(opponent), NullPresenter, now);
//!
//! let card = session.game().legal_attacks(Seat::Human)[0];
//! session.submit(Action::Attack(card), now).unwrap();
//! session.settle(now);
//! assert!(session.game().audit().is_ok());
//! ```
//!
//! ## Headless self-play
//! ```sh
//! RUST_LOG=info cargo run --bin durak -- --seed 1 --games 3
//! ```

pub mod agents;
pub mod cards;
pub mod deck;
pub mod features;
pub mod game;
pub mod hand;
pub mod policy;
pub mod session;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
