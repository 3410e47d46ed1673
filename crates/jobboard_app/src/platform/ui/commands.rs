//! Line-oriented intent parsing for the terminal front end.
use thiserror::Error;

pub const HELP: &str = "\
Commands:
  /s <text>     search titles (empty clears)
  /f <location> filter by location (no argument clears)
  n | p         next / previous page
  *<n>          toggle favourite for row #n
  r             refresh
  u <url>       switch to another feed
  h             show this help
  q             quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Facet(Option<String>),
    NextPage,
    PreviousPage,
    ToggleFavourite(usize),
    Refresh,
    ChangeUrl(String),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (h for help)")]
    Unknown(String),
    #[error("expected a row number, got `{0}`")]
    BadRowNumber(String),
    #[error("`u` needs a URL")]
    MissingUrl,
    #[error("no row #{0} on this page")]
    RowNotVisible(usize),
}

/// Parses one input line. Blank lines parse to `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim_end_matches(&['\r', '\n'][..]);
    if line.trim().is_empty() {
        return Ok(None);
    }

    if let Some(text) = slash_argument(line, "/s") {
        return Ok(Some(Command::Search(text.to_string())));
    }
    if let Some(facet) = slash_argument(line, "/f") {
        return Ok(Some(Command::Facet(
            (!facet.is_empty()).then(|| facet.to_string()),
        )));
    }
    if let Some(rest) = line.trim().strip_prefix('*') {
        return row_number(rest).map(|n| Some(Command::ToggleFavourite(n)));
    }

    let trimmed = line.trim();
    let (word, rest) = trimmed
        .split_once(char::is_whitespace)
        .map_or((trimmed, ""), |(word, rest)| (word, rest.trim()));

    let command = match word {
        "n" | "next" => Command::NextPage,
        "p" | "prev" => Command::PreviousPage,
        "r" | "refresh" => Command::Refresh,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        "fav" => return row_number(rest).map(|n| Some(Command::ToggleFavourite(n))),
        "u" | "url" if rest.is_empty() => return Err(CommandError::MissingUrl),
        "u" | "url" => Command::ChangeUrl(rest.to_string()),
        _ => return Err(CommandError::Unknown(trimmed.to_string())),
    };
    Ok(Some(command))
}

/// Text after a `/x` prefix: one separating space is dropped, the rest is kept verbatim.
fn slash_argument<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix(' ')
    }
}

fn row_number(raw: &str) -> Result<usize, CommandError> {
    let raw = raw.trim();
    raw.parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| CommandError::BadRowNumber(raw.to_string()))
}
