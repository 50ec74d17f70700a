// SPDX-License-Identifier: MIT
//
// The game loop — connects the input session to the editor, the command
// table and the game state.
//
// Every key flows through:
//
//   channel → queue → dispatcher ─┬─ global map  → Close / NewGame
//                                 └─ mode map    → EditorAction → LineEditor
//                                                     │
//                                      submitted line ┤
//                                                     ├─ ".…" → commands::execute
//                                                     └─ else → Game::guess
//
// After each action the editor re-derives its mode. A change hands the
// dispatcher the other mode's keymap right away, so the next key of the
// same pass (".h" typed in one burst) already uses it.

use std::io::{self, Write};
use std::sync::Arc;
use std::thread;

use bz_editor::command::{self, COMMAND_PREFIX};
use bz_editor::{EditorAction, LineEditor, ModeKeymaps, RenderModel};
use bz_solver::Code;
use bz_term::ansi::{self, Color, CursorShape};
use bz_term::dispatch::KeyMap;
use bz_term::keys::{self, Key, KeySequence, Modifiers, chord_label};
use bz_term::{Session, terminal};
use tracing::{debug, error, info, warn};

use crate::commands::{self, Context, Flow, SPECS};
use crate::config::Config;
use crate::error::InputError;
use crate::game::{Games, Outcome, attempts_label};
use crate::render::Painter;

// ─── Actions ────────────────────────────────────────────────────────────────

/// Everything a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Edit(EditorAction),
    Close,
    NewGame,
}

impl From<EditorAction> for Action {
    fn from(action: EditorAction) -> Self {
        Self::Edit(action)
    }
}

/// A key that works in every mode.
pub struct GlobalBinding {
    pub key: Key,
    pub modifiers: Modifiers,
    pub action: Action,
    pub description: &'static str,
}

pub const GLOBAL_BINDINGS: [GlobalBinding; 2] = [
    GlobalBinding {
        key: Key::Letter('q'),
        modifiers: Modifiers::CTRL,
        action: Action::Close,
        description: "Close the game",
    },
    GlobalBinding {
        key: Key::Letter('n'),
        modifiers: Modifiers::CTRL,
        action: Action::NewGame,
        description: "Start a new game",
    },
];

/// The map checked before the mode map.
#[must_use]
pub fn global_keymap() -> KeyMap<Action> {
    let mut map = KeyMap::new();
    for binding in &GLOBAL_BINDINGS {
        map.bind_key(binding.key, binding.modifiers, binding.action);
    }
    map
}

// ─── App ────────────────────────────────────────────────────────────────────

/// A line the player entered that was rejected, kept on screen until the
/// next key.
struct Rejected {
    line: String,
    message: String,
}

pub struct App<W: Write> {
    out: W,
    editor: LineEditor,
    keymaps: ModeKeymaps<Action>,
    games: Games,
    config: Config,
    rejected: Option<Rejected>,
    /// First write error hit inside a dispatch pass.
    failure: Option<io::Error>,
    exit: bool,
}

impl<W: Write> App<W> {
    #[must_use]
    pub fn new(out: W, config: Config, games: Games) -> Self {
        Self {
            out,
            editor: LineEditor::new(&SPECS),
            keymaps: ModeKeymaps::new(),
            games,
            config,
            rejected: None,
            failure: None,
            exit: false,
        }
    }

    /// The keymap for the editor's current mode.
    #[must_use]
    pub fn keymap(&self) -> Arc<KeyMap<Action>> {
        self.keymaps.for_mode(self.editor.mode())
    }

    #[must_use]
    pub const fn should_exit(&self) -> bool {
        self.exit
    }

    #[cfg(test)]
    pub const fn games(&self) -> &Games {
        &self.games
    }

    #[cfg(test)]
    pub const fn editor(&self) -> &LineEditor {
        &self.editor
    }

    #[cfg(test)]
    pub const fn writer(&self) -> &W {
        &self.out
    }

    const fn painter(&self) -> Painter {
        Painter::new(self.config.color)
    }

    fn prompt(&self) -> String {
        format!("{}> ", attempts_label(self.games.current().attempts_left()))
    }

    /// Welcome text and the first prompt.
    pub fn greet(&mut self) -> io::Result<()> {
        let painter = self.painter();
        ansi::set_cursor_shape(&mut self.out, self.config.cursor_shape())?;
        painter.message(&mut self.out, "Guess the secret code!", Color::Cyan)?;
        painter.message(
            &mut self.out,
            "Type .help for the commands or .rules for the rules.",
            Color::Indexed(241),
        )?;
        self.redraw()
    }

    /// Repaint the prompt line.
    pub fn redraw(&mut self) -> io::Result<()> {
        let prompt = self.prompt();
        let painter = self.painter();
        match &self.rejected {
            Some(rejected) => {
                let model = RenderModel {
                    cursor_column: prompt.chars().count() + rejected.line.len(),
                    prompt,
                    text: rejected.line.clone(),
                    selection: None,
                    suggestion: None,
                };
                painter.prompt(&mut self.out, &model, Some(&rejected.message))
            }
            None => {
                let model = self.editor.render_model(&prompt);
                painter.prompt(&mut self.out, &model, None)
            }
        }
    }

    /// Restore the cursor and say goodbye.
    pub fn farewell(&mut self) -> io::Result<()> {
        let painter = self.painter();
        ansi::erase_line(&mut self.out)?;
        ansi::set_cursor_shape(&mut self.out, CursorShape::Default)?;
        painter.message(&mut self.out, "See you soon!", Color::Cyan)?;
        self.out.flush()
    }

    /// Dispatcher callback: run one action, then report a keymap swap if
    /// the editor changed mode.
    pub fn handle(&mut self, action: Action) -> Option<Arc<KeyMap<Action>>> {
        if self.exit {
            return None;
        }
        if let Err(err) = self.on_action(action) {
            error!(%err, "terminal write failed");
            self.failure.get_or_insert(err);
            self.exit = true;
        }
        self.editor.sync_mode().map(|mode| self.keymaps.for_mode(mode))
    }

    /// The write error that stopped the loop, if any.
    pub fn take_failure(&mut self) -> Option<io::Error> {
        self.failure.take()
    }

    fn on_action(&mut self, action: Action) -> io::Result<()> {
        self.rejected = None;
        match action {
            Action::Close => {
                info!("close requested");
                self.exit = true;
            }
            Action::NewGame => {
                ansi::erase_line(&mut self.out)?;
                self.run_with_context(|ctx| {
                    commands::start_new_game(ctx);
                    Ok(Flow::Continue)
                })?;
            }
            Action::Edit(edit) => {
                if let Some(line) = self.editor.apply(edit) {
                    self.submit(line)?;
                }
            }
        }
        Ok(())
    }

    // ── Submitted lines ───────────────────────────────────────────────────

    fn submit(&mut self, line: String) -> io::Result<()> {
        if line.starts_with(COMMAND_PREFIX) {
            self.submit_command(line)
        } else {
            self.submit_guess(line)
        }
    }

    fn reject(&mut self, line: String, err: &InputError) {
        debug!(%err, line = %line, "input rejected");
        let line = if line.starts_with(COMMAND_PREFIX) { line } else { line.to_ascii_uppercase() };
        self.rejected = Some(Rejected { line, message: err.to_string() });
    }

    fn submit_guess(&mut self, line: String) -> io::Result<()> {
        let parsed = if line.is_empty() {
            Err(InputError::Empty)
        } else {
            line.parse::<Code>().map_err(InputError::from)
        };
        let guess = match parsed {
            Ok(guess) => guess,
            Err(err) => {
                self.reject(line, &err);
                return Ok(());
            }
        };

        let prompt = self.prompt();
        let feedback = self.games.current_mut().guess(guess);
        debug!(%guess, %feedback, "guess played");
        self.painter()
            .committed(&mut self.out, &prompt, &guess.to_string(), &feedback.to_string())?;
        self.finish_if_over()
    }

    fn submit_command(&mut self, line: String) -> io::Result<()> {
        let Some(parsed) = command::parse(&line) else {
            return Ok(());
        };
        let prompt = self.prompt();
        let painter = self.painter();

        let mut ctx = Context::new(&mut self.games, &mut self.config);
        let result = commands::execute(&mut ctx, &parsed);
        let lines = ctx.into_lines();

        match result {
            Err(err) => {
                self.reject(line, &err);
                Ok(())
            }
            Ok(flow) => {
                painter.echo(&mut self.out, &prompt, &line)?;
                for out_line in &lines {
                    painter.line(&mut self.out, out_line)?;
                }
                // `.cursor` may have changed it.
                ansi::set_cursor_shape(&mut self.out, self.config.cursor_shape())?;
                match flow {
                    Flow::Continue => {}
                    Flow::Exit => self.exit = true,
                    Flow::AutoPlay => self.auto_play()?,
                }
                self.finish_if_over()
            }
        }
    }

    /// Run `f` against the game state and print what it says.
    fn run_with_context(
        &mut self,
        f: impl FnOnce(&mut Context<'_>) -> Result<Flow, InputError>,
    ) -> io::Result<()> {
        let painter = self.painter();
        let mut ctx = Context::new(&mut self.games, &mut self.config);
        let result = f(&mut ctx);
        for line in ctx.into_lines() {
            painter.line(&mut self.out, &line)?;
        }
        if let Err(err) = result {
            warn!(%err, "game action failed");
        }
        Ok(())
    }

    // ── AI ────────────────────────────────────────────────────────────────

    /// Let the solver play until the game ends. Blocks the loop; the guess
    /// is typed out one character at a time with the cursor hidden.
    fn auto_play(&mut self) -> io::Result<()> {
        info!("solver takes over");
        ansi::cursor_hide(&mut self.out)?;
        let played = self.solver_turns();
        ansi::cursor_show(&mut self.out)?;
        played
    }

    fn solver_turns(&mut self) -> io::Result<()> {
        let painter = self.painter();
        let delay = self.config.ai_delay();

        while !self.games.current().is_over() {
            if terminal::termination_requested() {
                info!("solver interrupted");
                break;
            }
            let prompt = self.prompt();
            painter.ai_prompt(&mut self.out, &prompt)?;

            let guess = match self.games.current_mut().next_guess() {
                Ok(guess) => guess,
                Err(err) => {
                    error!(%err, "solver gave up");
                    painter.message(&mut self.out, &err.to_string(), Color::Red)?;
                    break;
                }
            };
            for ch in guess.to_string().chars() {
                thread::sleep(delay);
                write!(self.out, "{ch}")?;
                self.out.flush()?;
            }
            thread::sleep(delay);

            let feedback = self.games.current_mut().guess(guess);
            write!(self.out, " {feedback}")?;
            ansi::newline(&mut self.out)?;
        }
        Ok(())
    }

    // ── Game over ─────────────────────────────────────────────────────────

    /// Announce a finished game and start the next one.
    fn finish_if_over(&mut self) -> io::Result<()> {
        if !self.games.current().is_over() {
            return Ok(());
        }
        let new_high = self.games.record_current();
        let game = self.games.current();
        let high = self.games.high_score();
        let secret = game.secret();

        let (text, color) = match (game.outcome(), game.is_ai()) {
            (Outcome::Won, false) => (
                format!("Congratulations, score is {} (high score: {high})", game.score()),
                Color::Green,
            ),
            (Outcome::Won, true) => (
                format!("The AI cracked {secret} in {} guesses", game.guesses().len()),
                Color::Yellow,
            ),
            (Outcome::Lost, false) => (format!("You lost! The secret code was {secret}."), Color::Red),
            (Outcome::Lost, true) => (
                format!("Not even the AI could save you. The secret code was {secret}."),
                Color::Red,
            ),
            (Outcome::InProgress, _) => return Ok(()),
        };

        let painter = self.painter();
        painter.message(&mut self.out, &text, color)?;
        if new_high {
            painter.message(&mut self.out, "New high score!", Color::Yellow)?;
        }
        self.run_with_context(|ctx| {
            commands::start_new_game(ctx);
            Ok(Flow::Continue)
        })
    }
}

// ─── Loops ──────────────────────────────────────────────────────────────────

/// Run the game until it is closed, input ends or a signal arrives.
///
/// # Errors
///
/// A failed terminal write.
pub fn run<W: Write>(app: &mut App<W>, session: &mut Session<Action>) -> io::Result<()> {
    app.greet()?;

    while !app.should_exit() {
        if terminal::termination_requested() {
            info!("termination requested");
            break;
        }

        let fired = session.poll(|action| app.handle(*action));
        if let Some(err) = app.take_failure() {
            return Err(err);
        }
        if fired {
            if !app.should_exit() {
                app.redraw()?;
            }
            continue;
        }

        if !session.is_running() && session.queue().is_empty() {
            info!("input closed");
            break;
        }
        session.wait();
    }

    app.farewell()
}

/// Print what every key press decodes to, until Ctrl+Q.
///
/// Reads the queue directly so unknown sequences show up too.
///
/// # Errors
///
/// A failed terminal write.
pub fn run_key_debug<W: Write>(out: &mut W, session: &mut Session<Action>) -> io::Result<()> {
    let quit = Key::Letter('q').entry().sequence(Modifiers::CTRL);
    ansi::erase_line(out)?;
    write!(out, "Press keys to see how they decode. Ctrl+Q quits.")?;
    ansi::newline(out)?;
    out.flush()?;

    loop {
        if terminal::termination_requested() {
            break;
        }
        let pending = session.queue().drain();
        if pending.is_empty() {
            if !session.is_running() {
                break;
            }
            session.wait();
            continue;
        }
        for sequence in pending {
            if quit.as_ref() == Some(&sequence) {
                return Ok(());
            }
            write!(out, "{}", describe_sequence(&sequence))?;
            ansi::newline(out)?;
        }
        out.flush()?;
    }
    Ok(())
}

/// `1b 5b 44    Left` style line for the key debugger.
fn describe_sequence(sequence: &KeySequence) -> String {
    let bytes: Vec<String> = sequence.as_bytes().iter().map(|b| format!("{b:02x}")).collect();
    let label = keys::describe(sequence)
        .map_or_else(|| "(unknown)".to_owned(), |(key, mods)| chord_label(key, mods));
    format!("{:<24}{label}", bytes.join(" "))
}

// ─── Tests ──────────────────────────────────────────────────────────────────
