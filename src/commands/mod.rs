mod ask;
mod config;
mod search;
mod sources;

use std::io::Write;
use std::ops::ControlFlow;

use anyhow::Result;

use crate::state::AppState;

pub const HELP: &str = "\nAvailable commands:
  help                - Show this help message
  list                - List all indexed pages
  search [term]       - Search for specific terms in the content
  config [param val]  - Show or change context_size / top_k
  exit                - Exit the program

For any other input, the assistant will try to answer your question.";

/// One line of shell input.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    List,
    Search(String),
    Config {
        param: Option<String>,
        value: Option<String>,
    },
    Exit,
    Ask(String),
    Empty,
}

impl Command {
    /// Keywords are case-insensitive; anything that is not a keyword is a question.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return Command::Empty;
        }

        let lower = input.to_lowercase();
        match lower.as_str() {
            "exit" | "quit" => return Command::Exit,
            "help" => return Command::Help,
            "list" => return Command::List,
            _ => {}
        }

        if let Some(term) = strip_keyword(input, "search ") {
            return Command::Search(term.trim().to_string());
        }

        if let Some(rest) = strip_keyword(input, "config ").or((lower == "config").then_some("")) {
            let mut args = rest.split_whitespace().map(str::to_string);
            return Command::Config {
                param: args.next(),
                value: args.next(),
            };
        }

        Command::Ask(input.to_string())
    }
}

/// `input` without a leading ASCII keyword, matched case-insensitively.
fn strip_keyword<'a>(input: &'a str, keyword: &str) -> Option<&'a str> {
    let head = input.get(..keyword.len())?;
    head.eq_ignore_ascii_case(keyword)
        .then(|| &input[keyword.len()..])
}

/// Run one command, writing its output to `out`.
pub async fn execute(
    state: &mut AppState,
    command: Command,
    out: &mut impl Write,
) -> Result<ControlFlow<()>> {
    match command {
        Command::Empty => {}
        Command::Exit => return Ok(ControlFlow::Break(())),
        Command::Help => writeln!(out, "{}", HELP)?,
        Command::List => write!(out, "{}", sources::list(&state.index))?,
        Command::Search(term) => write!(out, "{}", search::search(&state.index, &term))?,
        Command::Config { param, value } => {
            let reply = config::config(&mut state.config, param.as_deref(), value.as_deref());
            writeln!(out, "{}", reply)?;
        }
        Command::Ask(question) => ask::ask(state, &question, out).await?,
    }
    out.flush()?;
    Ok(ControlFlow::Continue(()))
}
