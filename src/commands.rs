// SPDX-License-Identifier: MIT
//
// Command table — every `.name` the game understands.
//
// The table is static and ordered; the order is what completion and `.help`
// walk. Each entry is a spec (names, usage, summary), a help category and a
// handler:
//
//   ".h -s" ──▶ parse ──▶ find("h") ──▶ help(ctx, ["-s"]) ──▶ Flow
//
// Handlers never write to the terminal. They push lines into the
// `Context` and the app prints them, so the whole table is testable
// without a tty.

use std::sync::LazyLock;

use bz_editor::command::{CommandSpec, ParsedCommand};
use bz_solver::Code;
use bz_term::ansi::CursorShape;
use bz_term::keys::chord_label;
use regex::Regex;
use tracing::info;

use crate::app::GLOBAL_BINDINGS;
use crate::config::Config;
use crate::error::InputError;
use crate::game::{Game, Games, Summary, attempts_label};

/// A valid `.setcode` argument once its length is right.
static NEW_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Fa-f]+$").expect("code pattern is valid"));

// ─── Types ──────────────────────────────────────────────────────────────────

/// Help section a command is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Basic,
    InGame,
    Store,
    /// Only listed by `.help -s`.
    Secret,
}

impl Category {
    pub const ALL: [Self; 4] = [Self::Basic, Self::InGame, Self::Store, Self::Secret];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::InGame => "IN GAME",
            Self::Store => "STORE",
            Self::Secret => "SECRET",
        }
    }
}

/// What the app should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Leave the program.
    Exit,
    /// Let the solver play out the current game.
    AutoPlay,
}

/// How an output line is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Heading,
    Muted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub tone: Tone,
    pub text: String,
}

/// Everything a handler may touch.
pub struct Context<'a> {
    pub games: &'a mut Games,
    pub config: &'a mut Config,
    lines: Vec<Line>,
}

impl<'a> Context<'a> {
    pub const fn new(games: &'a mut Games, config: &'a mut Config) -> Self {
        Self { games, config, lines: Vec::new() }
    }

    pub fn say(&mut self, text: impl Into<String>) {
        self.push(Tone::Plain, text);
    }

    pub fn heading(&mut self, text: impl Into<String>) {
        self.push(Tone::Heading, text);
    }

    pub fn muted(&mut self, text: impl Into<String>) {
        self.push(Tone::Muted, text);
    }

    fn push(&mut self, tone: Tone, text: impl Into<String>) {
        self.lines.push(Line { tone, text: text.into() });
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<Line> {
        self.lines
    }

    /// The current game, if it is still being played.
    fn playing(&mut self) -> Result<&mut Game, InputError> {
        let game = self.games.current_mut();
        if game.is_over() {
            return Err(InputError::GameOver);
        }
        Ok(game)
    }
}

pub type Handler = fn(&mut Context<'_>, &[String]) -> Result<Flow, InputError>;

#[derive(Clone, Copy)]
pub struct Command {
    pub spec: CommandSpec,
    pub category: Category,
    pub handler: Handler,
}

const fn command(
    long: &'static str,
    short: &'static str,
    usage: &'static str,
    summary: &'static str,
    category: Category,
    handler: Handler,
) -> Command {
    Command {
        spec: CommandSpec { long, short, usage, summary },
        category,
        handler,
    }
}

// ─── Table ──────────────────────────────────────────────────────────────────

const TABLE: [Command; 15] = [
    command("help", "h", "[-s]", "Show the commands (-s includes secret ones)", Category::Basic, help),
    command("keys", "k", "", "Show the key bindings", Category::Basic, keys),
    command("p", "p", "", "Reveal the code", Category::Secret, reveal),
    command("setcode", "S", "CODE", "Set the secret code", Category::Secret, set_code),
    command("remains", "R", "", "Count the codes still possible. Costs 2 attempts", Category::Store, remains),
    command("buy", "b", "", "Reveal one letter of the code in place. Costs 5 attempts", Category::Store, buy),
    command("quit", "q", "", "Give up and reveal the code", Category::Basic, quit),
    command("new", "n", "", "Abandon this game and start a new one", Category::InGame, new_game),
    command("history", "H", "[N]", "List the games played, or show game N", Category::InGame, history),
    command("rules", "r", "", "Explain the rules", Category::Basic, rules),
    command("close", "c", "", "Exit the game", Category::Basic, close),
    command("bai", "B", "", "Ask the solver for an optimal guess. Costs 5 attempts", Category::Store, buy_ai),
    command("ai", "a", "", "Let the solver play this game for you", Category::Store, ai),
    command("unlimited", "u", "", "Take (almost) unlimited attempts", Category::Secret, unlimited),
    command("cursor", "C", "[0-6]", "Change the cursor shape", Category::Basic, cursor),
];

/// Every command, in completion order.
pub static COMMANDS: [Command; 15] = TABLE;

/// The specs of [`COMMANDS`], for the line editor.
pub static SPECS: [CommandSpec; 15] = specs_of(&TABLE);

const fn specs_of<const N: usize>(table: &[Command; N]) -> [CommandSpec; N] {
    let mut out = [table[0].spec; N];
    let mut i = 0;
    while i < N {
        out[i] = table[i].spec;
        i += 1;
    }
    out
}

/// The command `name` selects: short name exact, long name any case.
#[must_use]
pub fn find(name: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|c| c.spec.matches(name))
}

/// Run a parsed command line.
///
/// # Errors
///
/// [`InputError::UnknownCommand`] for a name not in the table, otherwise
/// whatever the handler rejects.
pub fn execute(ctx: &mut Context<'_>, parsed: &ParsedCommand) -> Result<Flow, InputError> {
    let Some(command) = find(&parsed.name) else {
        return Err(InputError::UnknownCommand { name: parsed.name.clone() });
    };
    info!(command = command.spec.long, args = ?parsed.args, "command");
    (command.handler)(ctx, &parsed.args)
}

// ─── Handlers: information ──────────────────────────────────────────────────

/// Width of the `.h | .help` column.
const NAME_COLUMN: usize = 18;

fn help(ctx: &mut Context<'_>, args: &[String]) -> Result<Flow, InputError> {
    let show_secret = match args.first().map(String::as_str) {
        None => false,
        Some("-s") => true,
        Some(other) => return Err(InputError::InvalidArgument(other.to_owned())),
    };

    for category in Category::ALL {
        if category == Category::Secret && !show_secret {
            continue;
        }
        ctx.heading(category.title());
        for command in COMMANDS.iter().filter(|c| c.category == category) {
            let spec = &command.spec;
            let mut names = format!(".{} | .{}", spec.short, spec.long);
            if !spec.usage.is_empty() {
                names.push(' ');
                names.push_str(spec.usage);
            }
            ctx.say(format!("{names:<NAME_COLUMN$} {}", spec.summary));
        }
        ctx.say("");
    }
    ctx.muted(concat!("bzguess ", env!("CARGO_PKG_VERSION")));
    Ok(Flow::Continue)
}

fn keys(ctx: &mut Context<'_>, _args: &[String]) -> Result<Flow, InputError> {
    ctx.heading("GLOBAL");
    for binding in &GLOBAL_BINDINGS {
        let chord = chord_label(binding.key, binding.modifiers);
        ctx.say(format!("    {chord:<10}{}", binding.description));
    }
    ctx.say("");
    ctx.heading("EDITING");
    for (keys, what) in [
        ("Left/Right", "move by character (Shift selects)"),
        ("Ctrl+Arrows", "move by word"),
        ("Alt+Arrows", "jump to the start or end"),
        ("Home/End", "jump to the start or end"),
        ("Ctrl+Bksp/Del", "delete a word"),
        ("Up/Down", "cycle the input history (Shift: oldest/newest)"),
        ("Tab", "accept the suggestion"),
    ] {
        ctx.say(format!("    {keys:<14}{what}"));
    }
    Ok(Flow::Continue)
}

fn rules(ctx: &mut Context<'_>, _args: &[String]) -> Result<Flow, InputError> {
    let attempts = ctx.config.attempts;
    ctx.heading("RULES");
    ctx.say("Guess the secret code.");
    ctx.say("");
    ctx.say("- The code is 4 letters from A, B, C, D, E and F.");
    ctx.say("- A letter can appear zero to four times.");
    ctx.say(format!("- You have {attempts} attempts."));
    ctx.say("- Each guess is answered with:");
    ctx.say("    X  a right letter in the right place");
    ctx.say("    -  a right letter in the wrong place");
    ctx.say("");
    ctx.say("Commands start with a '.': 'HELP' is a guess, '.help' is a command.");
    Ok(Flow::Continue)
}

fn history(ctx: &mut Context<'_>, args: &[String]) -> Result<Flow, InputError> {
    match args {
        [] => {
            ctx.heading("  #  ? code | attempts | score");
            let lines: Vec<String> = ctx
                .games
                .iter()
                .enumerate()
                .map(|(i, game)| Summary { number: i + 1, game }.to_string())
                .collect();
            for line in lines {
                ctx.say(line);
            }
            ctx.muted(format!("High score: {}", ctx.games.high_score()));
        }
        [n] => {
            let number: usize = n
                .parse()
                .map_err(|_| InputError::InvalidArgument(n.clone()))?;
            let log = ctx
                .games
                .get(number)
                .ok_or(InputError::NoSuchGame(number))?
                .log()
                .to_vec();
            ctx.heading(format!("GAME {number}"));
            for line in log {
                ctx.say(line);
            }
        }
        _ => return Err(InputError::TooManyArguments),
    }
    Ok(Flow::Continue)
}

fn cursor(ctx: &mut Context<'_>, args: &[String]) -> Result<Flow, InputError> {
    match args {
        [] => {
            let current = ctx.config.cursor_style;
            for shape in CursorShape::ALL {
                let marker = if shape.index() == current { '>' } else { ' ' };
                ctx.say(format!("{marker} {}  {}", shape.index(), shape.name()));
            }
            ctx.muted("Use .cursor N to pick one");
        }
        [n] => {
            let shape = n
                .parse::<u8>()
                .ok()
                .and_then(CursorShape::from_index)
                .ok_or(InputError::CursorStyle)?;
            ctx.config.cursor_style = shape.index();
            ctx.say(format!("Cursor set to {}", shape.name()));
        }
        _ => return Err(InputError::TooManyArguments),
    }
    Ok(Flow::Continue)
}

fn close(_ctx: &mut Context<'_>, _args: &[String]) -> Result<Flow, InputError> {
    Ok(Flow::Exit)
}

// ─── Handlers: the current game ─────────────────────────────────────────────

fn quit(ctx: &mut Context<'_>, _args: &[String]) -> Result<Flow, InputError> {
    ctx.playing()?.quit();
    Ok(Flow::Continue)
}

fn new_game(ctx: &mut Context<'_>, _args: &[String]) -> Result<Flow, InputError> {
    start_new_game(ctx);
    Ok(Flow::Continue)
}

/// Abandon the current game (if still running) and start the next one.
pub fn start_new_game(ctx: &mut Context<'_>) {
    let current = ctx.games.current_mut();
    if !current.is_over() {
        current.abandon();
        let secret = current.secret();
        ctx.say(format!("Game abandoned, the code was {secret}"));
    }
    ctx.games.start_new();
    let number = ctx.games.len();
    ctx.say(format!("Game {number} started"));
}

fn remains(ctx: &mut Context<'_>, _args: &[String]) -> Result<Flow, InputError> {
    let count = ctx.playing()?.remains()?;
    ctx.say(format!("Based on the feedback so far, {count} codes are still possible."));
    Ok(Flow::Continue)
}

fn buy(ctx: &mut Context<'_>, _args: &[String]) -> Result<Flow, InputError> {
    ctx.playing()?;
    let pos = ctx.games.random_position();
    let pattern = ctx.games.current_mut().buy(pos);
    ctx.say(pattern);
    Ok(Flow::Continue)
}

fn buy_ai(ctx: &mut Context<'_>, _args: &[String]) -> Result<Flow, InputError> {
    let guess = ctx.playing()?.hint()?;
    ctx.say(format!("Here is an optimal guess: {guess}"));
    Ok(Flow::Continue)
}

fn ai(ctx: &mut Context<'_>, _args: &[String]) -> Result<Flow, InputError> {
    ctx.playing()?.enable_ai();
    Ok(Flow::AutoPlay)
}

// ─── Handlers: secret ───────────────────────────────────────────────────────

fn reveal(ctx: &mut Context<'_>, _args: &[String]) -> Result<Flow, InputError> {
    let secret = ctx.games.current().secret();
    ctx.say(format!("Code is {secret}"));
    Ok(Flow::Continue)
}

fn set_code(ctx: &mut Context<'_>, args: &[String]) -> Result<Flow, InputError> {
    let arg = match args {
        [] => return Err(InputError::MissingArgument),
        [arg] => arg,
        _ => return Err(InputError::TooManyArguments),
    };
    let code = parse_new_code(arg)?;
    ctx.playing()?.set_secret(code);
    ctx.say("The secret code has been updated");
    Ok(Flow::Continue)
}

fn parse_new_code(arg: &str) -> Result<Code, InputError> {
    if arg.chars().count() != bz_solver::CODE_LEN {
        return Err(InputError::NewCodeLength);
    }
    if !NEW_CODE.is_match(arg) {
        return Err(InputError::NewCodeSymbols);
    }
    arg.parse().map_err(|_| InputError::NewCodeSymbols)
}

fn unlimited(ctx: &mut Context<'_>, _args: &[String]) -> Result<Flow, InputError> {
    ctx.playing()?.unlimited();
    ctx.say(format!("Attempts left: {}", attempts_label(u64::MAX)));
    Ok(Flow::Continue)
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bz_editor::command;
    use pretty_assertions::assert_eq;

    struct Fixture {
        games: Games,
        config: Config,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                games: Games::new(20, Some(11)),
                config: Config::default(),
            }
        }

        fn run(&mut self, line: &str) -> (Result<Flow, InputError>, Vec<Line>) {
            let parsed = command::parse(line).unwrap();
            let mut ctx = Context::new(&mut self.games, &mut self.config);
            let result = execute(&mut ctx, &parsed);
            (result, ctx.into_lines())
        }

        fn text(&mut self, line: &str) -> Vec<String> {
            let (result, lines) = self.run(line);
            assert!(result.is_ok(), "{line}: {result:?}");
            lines.into_iter().map(|l| l.text).collect()
        }
    }

    #[test]
    fn table_order_and_names() {
        let names: Vec<(&str, &str)> = SPECS.iter().map(|s| (s.long, s.short)).collect();
        assert_eq!(
            names,
            vec![
                ("help", "h"),
                ("keys", "k"),
                ("p", "p"),
                ("setcode", "S"),
                ("remains", "R"),
                ("buy", "b"),
                ("quit", "q"),
                ("new", "n"),
                ("history", "H"),
                ("rules", "r"),
                ("close", "c"),
                ("bai", "B"),
                ("ai", "a"),
                ("unlimited", "u"),
                ("cursor", "C"),
            ]
        );
    }

    #[test]
    fn specs_match_table() {
        for (spec, command) in SPECS.iter().zip(COMMANDS.iter()) {
            assert_eq!(*spec, command.spec);
        }
    }

    #[test]
    fn lookup_rules() {
        assert_eq!(find("h").map(|c| c.spec.long), Some("help"));
        assert_eq!(find("HELP").map(|c| c.spec.long), Some("help"));
        assert_eq!(find("S").map(|c| c.spec.long), Some("setcode"));
        // Short names are case-sensitive: `s` is not `S`.
        assert!(find("s").is_none());
        assert_eq!(find("B").map(|c| c.spec.long), Some("bai"));
        assert_eq!(find("b").map(|c| c.spec.long), Some("buy"));
    }

    #[test]
    fn unknown_command() {
        let mut fx = Fixture::new();
        let (result, _) = fx.run(".frobnicate");
        assert_eq!(result, Err(InputError::UnknownCommand { name: "frobnicate".into() }));
        assert_eq!(
            InputError::UnknownCommand { name: String::new() }.to_string(),
            "Unknown command"
        );
    }

    #[test]
    fn help_hides_secret_commands() {
        let mut fx = Fixture::new();
        let text = fx.text(".help").join("\n");
        assert!(text.contains("BASIC"));
        assert!(text.contains(".h | .help"));
        assert!(!text.contains("SECRET"));
        assert!(!text.contains(".setcode"));

        let text = fx.text(".h -s").join("\n");
        assert!(text.contains("SECRET"));
        assert!(text.contains(".S | .setcode CODE"));
    }

    #[test]
    fn help_rejects_unknown_flag() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run(".help -x").0, Err(InputError::InvalidArgument("-x".into())));
    }

    #[test]
    fn keys_lists_global_bindings() {
        let mut fx = Fixture::new();
        let text = fx.text(".keys").join("\n");
        assert!(text.contains("Ctrl+Q"));
        assert!(text.contains("Ctrl+N"));
    }

    #[test]
    fn rules_mention_configured_attempts() {
        let mut fx = Fixture::new();
        fx.config.attempts = 12;
        assert!(fx.text(".r").iter().any(|l| l.contains("12 attempts")));
    }

    #[test]
    fn reveal_and_setcode() {
        let mut fx = Fixture::new();
        assert_eq!(fx.text(".S cafe"), vec!["The secret code has been updated"]);
        assert_eq!(fx.text(".p"), vec!["Code is CAFE"]);
    }

    #[test]
    fn setcode_validation() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run(".setcode").0, Err(InputError::MissingArgument));
        assert_eq!(fx.run(".setcode ABCD ABCD").0, Err(InputError::TooManyArguments));
        assert_eq!(fx.run(".setcode ABC").0, Err(InputError::NewCodeLength));
        assert_eq!(fx.run(".setcode ABCG").0, Err(InputError::NewCodeSymbols));
    }

    #[test]
    fn remains_counts_and_costs() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.text(".R"),
            vec!["Based on the feedback so far, 1296 codes are still possible."]
        );
        assert_eq!(fx.games.current().attempts_left(), 18);
    }

    #[test]
    fn buy_reveals_one_letter() {
        let mut fx = Fixture::new();
        let lines = fx.text(".buy");
        let pattern = &lines[0];
        assert_eq!(pattern.chars().count(), 4);
        assert_eq!(pattern.chars().filter(|&c| c == '_').count(), 3);
        assert_eq!(fx.games.current().attempts_left(), 15);
        assert_eq!(fx.games.current().candidates().len(), 216);
    }

    #[test]
    fn bai_costs_five() {
        let mut fx = Fixture::new();
        let lines = fx.text(".bai");
        assert_eq!(lines, vec!["Here is an optimal guess: AABB"]);
        assert_eq!(fx.games.current().attempts_left(), 15);
    }

    #[test]
    fn quit_loses_the_game() {
        let mut fx = Fixture::new();
        fx.text(".q");
        assert!(fx.games.current().is_over());
        // Nothing left to quit.
        assert_eq!(fx.run(".q").0, Err(InputError::GameOver));
    }

    #[test]
    fn new_abandons_and_starts() {
        let mut fx = Fixture::new();
        let lines = fx.text(".new");
        assert!(lines[0].starts_with("Game abandoned, the code was "));
        assert_eq!(lines[1], "Game 2 started");
        assert_eq!(fx.games.len(), 2);
        assert!(fx.games.get(1).unwrap().is_over());
        assert!(!fx.games.current().is_over());
    }

    #[test]
    fn history_list_and_detail() {
        let mut fx = Fixture::new();
        fx.text(".S ABCD");
        fx.games.current_mut().guess("AABB".parse().unwrap());
        fx.text(".n");

        let list = fx.text(".H");
        assert_eq!(list[1], "  1) L ABCD | 19 | 0");
        assert_eq!(list[2], "  2) @ ____ | 20 | 0");
        assert_eq!(list[3], "High score: 0");

        let detail = fx.text(".history 1");
        assert_eq!(detail[0], "GAME 1");
        assert!(detail.contains(&"20> AABB X-".to_owned()));
    }

    #[test]
    fn history_argument_errors() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run(".H x").0, Err(InputError::InvalidArgument("x".into())));
        assert_eq!(fx.run(".H 9").0, Err(InputError::NoSuchGame(9)));
        assert_eq!(fx.run(".H 1 2").0, Err(InputError::TooManyArguments));
    }

    #[test]
    fn cursor_lists_and_sets() {
        let mut fx = Fixture::new();
        let list = fx.text(".cursor");
        assert_eq!(list.len(), 8);
        assert_eq!(list[5], "> 5  blinking bar");

        assert_eq!(fx.text(".C 2"), vec!["Cursor set to steady block"]);
        assert_eq!(fx.config.cursor_style, 2);
        assert_eq!(fx.run(".C 7").0, Err(InputError::CursorStyle));
        assert_eq!(fx.run(".C bar").0, Err(InputError::CursorStyle));
    }

    #[test]
    fn flow_commands() {
        let mut fx = Fixture::new();
        assert_eq!(fx.run(".ai").0, Ok(Flow::AutoPlay));
        assert!(fx.games.current().is_ai());
        assert_eq!(fx.run(".close").0, Ok(Flow::Exit));
    }

    #[test]
    fn unlimited_attempts() {
        let mut fx = Fixture::new();
        fx.text(".u");
        assert_eq!(fx.games.current().attempts_left(), u64::MAX);
    }
}
