//! Command lines — the `.name arg ...` syntax.
//!
//! A line that starts with `.` is a command. The text after the dot is split
//! on spaces: the first piece is the command name, the rest are arguments.
//!
//! | Input              | Name      | Args        |
//! |--------------------|-----------|-------------|
//! | `.help`            | `help`    | `[]`        |
//! | `.h -s`            | `h`       | `["-s"]`    |
//! | `.setcode  ABCD`   | `setcode` | `["ABCD"]`  |
//! | `.`                | ``        | `[]`        |
//!
//! Every command has a long name and a short name. Lookup matches the short
//! name exactly (`.S` and `.s` are different commands) and the long name
//! case-insensitively (`.HELP` works).
//!
//! # Completion
//!
//! The editor suggests the rest of the first long name that extends what has
//! been typed (case-sensitive, table order). An empty line suggests
//! [`DEFAULT_SUGGESTION`].

/// What an empty line suggests.
pub const DEFAULT_SUGGESTION: &str = ".help";

/// The leading character of a command line.
pub const COMMAND_PREFIX: char = '.';

// ---------------------------------------------------------------------------
// CommandSpec
// ---------------------------------------------------------------------------

/// Static description of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub long: &'static str,
    pub short: &'static str,
    /// Argument synopsis for help output, e.g. `"[N]"`.
    pub usage: &'static str,
    pub summary: &'static str,
}

impl CommandSpec {
    /// Does `name` select this command?
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.short == name || self.long.eq_ignore_ascii_case(name)
    }
}

/// First command in `specs` that `name` selects.
#[must_use]
pub fn lookup<'a>(specs: &'a [CommandSpec], name: &str) -> Option<&'a CommandSpec> {
    specs.iter().find(|spec| spec.matches(name))
}

// ---------------------------------------------------------------------------
// ParsedCommand
// ---------------------------------------------------------------------------

/// A command line split into name and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
}

/// Split a command line. Returns `None` if `line` is not a command.
///
/// Empty pieces from repeated spaces are dropped.
#[must_use]
pub fn parse(line: &str) -> Option<ParsedCommand> {
    let body = line.strip_prefix(COMMAND_PREFIX)?;
    let mut pieces = body.split(' ').filter(|p| !p.is_empty());
    let name = pieces.next().unwrap_or_default().to_owned();
    let args = pieces.map(str::to_owned).collect();
    Some(ParsedCommand { name, args })
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// The suggestion for `text`, or `None`.
///
/// Empty text suggests [`DEFAULT_SUGGESTION`]. A command line suggests the
/// remaining characters of the first long name in `specs` that is strictly
/// longer than the typed remainder and starts with it.
#[must_use]
pub fn suggest<'a>(specs: &'a [CommandSpec], text: &str) -> Option<&'a str> {
    if text.is_empty() {
        return Some(DEFAULT_SUGGESTION);
    }
    let typed = text.strip_prefix(COMMAND_PREFIX)?;
    specs
        .iter()
        .find(|spec| spec.long.len() > typed.len() && spec.long.starts_with(typed))
        .map(|spec| &spec.long[typed.len()..])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SPECS: &[CommandSpec] = &[
        CommandSpec { long: "help", short: "h", usage: "[-s]", summary: "" },
        CommandSpec { long: "history", short: "H", usage: "[N]", summary: "" },
        CommandSpec { long: "setcode", short: "S", usage: "CODE", summary: "" },
        CommandSpec { long: "remains", short: "R", usage: "", summary: "" },
        CommandSpec { long: "rules", short: "r", usage: "", summary: "" },
    ];

    fn parsed(name: &str, args: &[&str]) -> ParsedCommand {
        ParsedCommand {
            name: name.to_owned(),
            args: args.iter().map(|a| (*a).to_owned()).collect(),
        }
    }

    // -- parse --------------------------------------------------------------

    #[test]
    fn parse_name_only() {
        assert_eq!(parse(".help"), Some(parsed("help", &[])));
    }

    #[test]
    fn parse_with_args() {
        assert_eq!(parse(".history 3"), Some(parsed("history", &["3"])));
        assert_eq!(parse(".h -s"), Some(parsed("h", &["-s"])));
    }

    #[test]
    fn parse_drops_empty_pieces() {
        assert_eq!(parse(".setcode   ABCD "), Some(parsed("setcode", &["ABCD"])));
    }

    #[test]
    fn parse_bare_dot() {
        assert_eq!(parse("."), Some(parsed("", &[])));
    }

    #[test]
    fn parse_rejects_guesses() {
        assert_eq!(parse("ABCD"), None);
        assert_eq!(parse(""), None);
    }

    // -- lookup -------------------------------------------------------------

    #[test]
    fn short_names_are_case_sensitive() {
        assert_eq!(lookup(SPECS, "h").map(|s| s.long), Some("help"));
        assert_eq!(lookup(SPECS, "H").map(|s| s.long), Some("history"));
        assert_eq!(lookup(SPECS, "r").map(|s| s.long), Some("rules"));
        assert_eq!(lookup(SPECS, "R").map(|s| s.long), Some("remains"));
    }

    #[test]
    fn long_names_are_case_insensitive() {
        assert_eq!(lookup(SPECS, "HELP").map(|s| s.long), Some("help"));
        assert_eq!(lookup(SPECS, "SetCode").map(|s| s.long), Some("setcode"));
    }

    #[test]
    fn unknown_name() {
        assert_eq!(lookup(SPECS, "nope"), None);
        assert_eq!(lookup(SPECS, ""), None);
    }

    // -- suggest ------------------------------------------------------------

    #[test]
    fn empty_text_suggests_help() {
        assert_eq!(suggest(SPECS, ""), Some(".help"));
    }

    #[test]
    fn first_match_in_table_order() {
        assert_eq!(suggest(SPECS, ".h"), Some("elp"));
        assert_eq!(suggest(SPECS, ".hi"), Some("story"));
        assert_eq!(suggest(SPECS, ".r"), Some("emains"));
        assert_eq!(suggest(SPECS, ".ru"), Some("les"));
    }

    #[test]
    fn bare_dot_suggests_first_command() {
        assert_eq!(suggest(SPECS, "."), Some("help"));
    }

    #[test]
    fn complete_name_suggests_nothing() {
        assert_eq!(suggest(SPECS, ".help"), None);
        assert_eq!(suggest(SPECS, ".rules"), None);
    }

    #[test]
    fn suggestion_is_case_sensitive() {
        assert_eq!(suggest(SPECS, ".H"), None);
    }

    #[test]
    fn guesses_get_no_suggestion() {
        assert_eq!(suggest(SPECS, "AB"), None);
    }

    #[test]
    fn text_after_arguments_gets_no_suggestion() {
        assert_eq!(suggest(SPECS, ".history 3"), None);
    }
}
