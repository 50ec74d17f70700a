// SPDX-License-Identifier: MIT
//
// Game state.
//
// A `Game` is one secret code and everything that happened while guessing
// it. `Games` is the session: every game played since launch, the high
// score, and the random source for new secrets.
//
//   Games ──▶ [Game, Game, ..., Game]   last one is the current game
//                                        (unless it is already over)
//
// Scoring rewards speed and leftover attempts:
//
//   secs  = elapsed / attempts used, capped at 60
//   s     = secs² / 180 − secs · 13/20 + 20        (1 ≤ s ≤ 20)
//   score = floor(s · 10) · min(attempts left, 19) · 10
//
// Games finished by the AI score 0.

use std::fmt;
use std::time::{Duration, Instant};

use bz_solver::{CODE_LEN, CandidateSet, Code, Feedback, SPACE_SIZE, SolverError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Attempt cost of `.remains`.
pub const REMAINS_COST: u64 = 2;

/// Attempt cost of `.buy` and `.bai`.
pub const BUY_COST: u64 = 5;

/// Attempts left above this don't raise the score.
const SCORE_ATTEMPTS_CAP: u64 = 19;

/// Seconds per attempt above this don't lower the score further.
const SCORE_SECS_CAP: f64 = 60.0;

// ─── Outcome ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    /// Marker used in the game list.
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            Self::InProgress => '@',
            Self::Won => 'W',
            Self::Lost => 'L',
        }
    }
}

/// Score for a won game.
#[must_use]
pub fn score(elapsed: Duration, attempts_used: u64, attempts_left: u64) -> u64 {
    #[allow(clippy::cast_precision_loss)]
    let secs = (elapsed.as_secs_f64() / attempts_used.max(1) as f64).min(SCORE_SECS_CAP);
    let s = secs.powi(2) / 180.0 - secs * 13.0 / 20.0 + 20.0;
    // s stays within 1..=20, so the cast can't truncate or wrap.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let base = (s * 10.0).floor() as u64;
    base * attempts_left.min(SCORE_ATTEMPTS_CAP) * 10
}

// ─── Game ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Game {
    secret: Code,
    attempts: u64,
    attempts_left: u64,
    guesses: Vec<Code>,
    feedbacks: Vec<Feedback>,
    candidates: CandidateSet,
    outcome: Outcome,
    ai: bool,
    /// Attempts stay at `u64::MAX` and are never spent.
    unlimited: bool,
    log: Vec<String>,
    started: Instant,
    score: u64,
}

impl Game {
    #[must_use]
    pub fn new(secret: Code, attempts: u64) -> Self {
        Self {
            secret,
            attempts,
            attempts_left: attempts,
            guesses: Vec::new(),
            feedbacks: Vec::new(),
            candidates: CandidateSet::full(),
            outcome: Outcome::InProgress,
            ai: false,
            unlimited: false,
            log: vec![format!("Game started with {attempts} attempts")],
            started: Instant::now(),
            score: 0,
        }
    }

    #[must_use]
    pub const fn secret(&self) -> Code {
        self.secret
    }

    #[must_use]
    pub const fn attempts_left(&self) -> u64 {
        self.attempts_left
    }

    #[must_use]
    pub fn guesses(&self) -> &[Code] {
        &self.guesses
    }

    #[must_use]
    pub const fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome != Outcome::InProgress
    }

    #[must_use]
    pub const fn is_ai(&self) -> bool {
        self.ai
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Everything that happened, one line per event.
    #[must_use]
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Play `guess`. Costs one attempt.
    pub fn guess(&mut self, guess: Code) -> Feedback {
        let feedback = bz_solver::score(&self.secret, &guess);
        self.log.push(format!("{}> {guess} {feedback}", attempts_label(self.attempts_left)));
        self.guesses.push(guess);
        self.feedbacks.push(feedback);
        self.consume(1);

        if feedback.is_win() {
            self.win();
        } else if self.attempts_left == 0 {
            self.lose();
        }
        feedback
    }

    fn win(&mut self) {
        self.outcome = Outcome::Won;
        self.score = if self.ai {
            0
        } else {
            let used = self.attempts.saturating_sub(self.attempts_left);
            score(self.started.elapsed(), used, self.attempts_left)
        };
        self.log.push(format!("Won with score {}", self.score));
        info!(secret = %self.secret, score = self.score, ai = self.ai, "game won");
    }

    fn lose(&mut self) {
        self.outcome = Outcome::Lost;
        self.score = 0;
        self.log.push(format!("Lost, the code was {}", self.secret));
        info!(secret = %self.secret, ai = self.ai, "game lost");
    }

    /// Spend `cost` attempts on a store item. Running out loses the game.
    fn spend(&mut self, cost: u64) {
        self.consume(cost);
        if self.attempts_left == 0 {
            self.lose();
        }
    }

    fn consume(&mut self, cost: u64) {
        if !self.unlimited {
            self.attempts_left = self.attempts_left.saturating_sub(cost);
        }
    }

    /// Give up. The game is lost.
    pub fn quit(&mut self) {
        self.log.push("The player gave up".to_owned());
        self.lose();
    }

    /// Abandoned for a new game.
    pub fn abandon(&mut self) {
        self.log.push("The player started a new game".to_owned());
        self.lose();
    }

    /// Replace the secret.
    pub fn set_secret(&mut self, secret: Code) {
        self.log.push("The secret code was changed".to_owned());
        self.secret = secret;
    }

    /// Attempts become unlimited for the rest of the game.
    pub fn unlimited(&mut self) {
        self.log.push("The player took unlimited attempts".to_owned());
        self.unlimited = true;
        self.attempts_left = u64::MAX;
    }

    /// Count the codes still consistent with the feedback. Costs 2 attempts.
    ///
    /// # Errors
    ///
    /// See [`bz_solver::reduce`].
    pub fn remains(&mut self) -> Result<usize, SolverError> {
        let count = bz_solver::reduce(&mut self.candidates, &self.guesses, &self.feedbacks)?;
        self.log.push(format!(
            "{count} possible solutions remained, using up {REMAINS_COST} attempts"
        ));
        self.spend(REMAINS_COST);
        Ok(count)
    }

    /// Reveal the secret symbol at `pos` and drop every candidate without
    /// it. Costs 5 attempts. Returns the revealed pattern, e.g. `_C__`.
    pub fn buy(&mut self, pos: usize) -> String {
        let pos = pos % CODE_LEN;
        let symbol = self.secret.symbol(pos);
        self.candidates.retain_symbol_at(pos, symbol);

        let pattern: String = (0..CODE_LEN)
            .map(|i| if i == pos { bz_solver::code::symbol_char(symbol) } else { '_' })
            .collect();
        self.log.push(format!("The player bought {pattern}, using up {BUY_COST} attempts"));
        self.spend(BUY_COST);
        pattern
    }

    /// The solver's next guess, without playing it. Costs 5 attempts.
    ///
    /// # Errors
    ///
    /// See [`bz_solver::best_guess`].
    pub fn hint(&mut self) -> Result<Code, SolverError> {
        let guess = self.next_guess()?;
        self.log.push(format!("The player bought the guess {guess}, using up {BUY_COST} attempts"));
        self.spend(BUY_COST);
        Ok(guess)
    }

    /// Hand the game to the solver.
    pub fn enable_ai(&mut self) {
        if !self.ai {
            self.ai = true;
            self.log.push("The player activated the AI".to_owned());
        }
    }

    /// The solver's next guess. Free.
    ///
    /// # Errors
    ///
    /// See [`bz_solver::best_guess`].
    pub fn next_guess(&mut self) -> Result<Code, SolverError> {
        bz_solver::best_guess(&mut self.candidates, &self.guesses, &self.feedbacks)
    }
}

// ─── Games ──────────────────────────────────────────────────────────────────

/// Every game of this session.
#[derive(Debug)]
pub struct Games {
    games: Vec<Game>,
    high_score: u64,
    attempts: u64,
    rng: StdRng,
}

impl Games {
    /// A session with one fresh game. `seed` makes the secrets reproducible.
    #[must_use]
    pub fn new(attempts: u64, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let mut games = Self {
            games: Vec::new(),
            high_score: 0,
            attempts,
            rng,
        };
        games.start_new();
        games
    }

    /// Start a new game with a random secret.
    pub fn start_new(&mut self) -> &mut Game {
        let secret = Code::from_index(self.rng.gen_range(0..SPACE_SIZE));
        info!(number = self.games.len() + 1, "new game");
        self.games.push(Game::new(secret, self.attempts));
        let last = self.games.len() - 1;
        &mut self.games[last]
    }

    /// The game being played (the most recent one).
    #[must_use]
    pub fn current(&self) -> &Game {
        &self.games[self.games.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut Game {
        let last = self.games.len() - 1;
        &mut self.games[last]
    }

    /// Game by 1-based number.
    #[must_use]
    pub fn get(&self, number: usize) -> Option<&Game> {
        number.checked_sub(1).and_then(|i| self.games.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Game> {
        self.games.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    #[must_use]
    pub const fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Book the current game's result. Returns whether it set a new high
    /// score.
    pub fn record_current(&mut self) -> bool {
        let game = self.current();
        if game.outcome() == Outcome::Won && !game.is_ai() && game.score() > self.high_score {
            self.high_score = game.score();
            return true;
        }
        false
    }

    /// A random code position, for `.buy`.
    pub fn random_position(&mut self) -> usize {
        self.rng.gen_range(0..CODE_LEN)
    }
}

/// One line of the game list: marker, code (hidden while playing),
/// attempts left and score.
pub struct Summary<'a> {
    pub number: usize,
    pub game: &'a Game,
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let game = self.game;
        let code = if game.is_over() {
            game.secret().to_string()
        } else {
            "____".to_owned()
        };
        write!(
            f,
            "{:>3}) {} {code} | {} | {}",
            self.number,
            game.outcome().marker(),
            attempts_label(game.attempts_left()),
            game.score(),
        )
    }
}

/// Attempts for display; unlimited shows as `∞`.
#[must_use]
pub fn attempts_label(attempts: u64) -> String {
    if attempts == u64::MAX {
        "∞".to_owned()
    } else {
        attempts.to_string()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
