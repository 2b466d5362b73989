//! Line commands typed at the console prompt.

use std::path::PathBuf;

use shared::domain::RfpId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    List,
    Next,
    Prev,
    Page { page: u32 },
    Filter { query: String },
    ClearFilter,
    Refresh,
    Saved,
    Save { rfp_id: RfpId },
    Remove { rfp_id: RfpId },
    Open { rfp_id: RfpId },
    Close,
    Upload { path: PathBuf },
    Note { text: String },
    Document { name: String, out: Option<PathBuf> },
    Seed,
    Health,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  list | next | prev | page <n>      browse opportunities (pages start at 1)
  filter <text> | clear              quick filter by title, summary or agency
  refresh                            re-ingest opportunities on the server
  saved | save <id> | remove <id>    manage saved opportunities
  open <id> | close                  show or hide a saved item's details
  upload <path> | note <text>        attach to the open saved item
  doc <name> [out]                   download a document of the open item
  seed | health | help | quit";

/// Parses one input line; blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<ConsoleCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "list" | "ls" => ConsoleCommand::List,
        "next" | "n" => ConsoleCommand::Next,
        "prev" | "p" => ConsoleCommand::Prev,
        "page" => {
            let page: u32 = rest
                .parse()
                .map_err(|_| "usage: page <n> (n starts at 1)".to_string())?;
            if page == 0 {
                return Err("usage: page <n> (n starts at 1)".into());
            }
            ConsoleCommand::Page { page: page - 1 }
        }
        "filter" | "f" => {
            if rest.is_empty() {
                ConsoleCommand::ClearFilter
            } else {
                ConsoleCommand::Filter {
                    query: rest.to_string(),
                }
            }
        }
        "clear" => ConsoleCommand::ClearFilter,
        "refresh" | "r" => ConsoleCommand::Refresh,
        "saved" => ConsoleCommand::Saved,
        "save" => ConsoleCommand::Save {
            rfp_id: parse_id(rest, "save <id>")?,
        },
        "remove" | "rm" => ConsoleCommand::Remove {
            rfp_id: parse_id(rest, "remove <id>")?,
        },
        "open" => ConsoleCommand::Open {
            rfp_id: parse_id(rest, "open <id>")?,
        },
        "close" => ConsoleCommand::Close,
        "upload" => {
            if rest.is_empty() {
                return Err("usage: upload <path>".into());
            }
            ConsoleCommand::Upload {
                path: PathBuf::from(rest),
            }
        }
        "note" => {
            if rest.is_empty() {
                return Err("usage: note <text>".into());
            }
            ConsoleCommand::Note {
                text: rest.to_string(),
            }
        }
        "doc" => {
            let mut parts = rest.split_whitespace();
            let name = parts
                .next()
                .ok_or_else(|| "usage: doc <name> [out]".to_string())?;
            ConsoleCommand::Document {
                name: name.to_string(),
                out: parts.next().map(PathBuf::from),
            }
        }
        "seed" => ConsoleCommand::Seed,
        "health" => ConsoleCommand::Health,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" | "q" => ConsoleCommand::Quit,
        other => return Err(format!("unknown command '{other}'; type 'help'")),
    };
    Ok(Some(command))
}

fn parse_id(raw: &str, usage: &str) -> Result<RfpId, String> {
    raw.parse::<i64>()
        .map(RfpId)
        .map_err(|_| format!("usage: {usage}"))
}
