use std::io::{self, BufRead};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Context as ReadlineContext, Editor, Helper,
};

use super::context::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use super::output;

/// Environment variable that switches the shell to reading commands from stdin.
pub const SCRIPT_ENV: &str = "EXPENSE_LEDGER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        colored::control::set_override(false);
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => {
            let terminal = Terminal::new(context.command_names())?;
            output::info("Type `help` to list commands.");
            drive(&mut context, terminal)
        }
        CliMode::Script => drive(&mut context, Piped::new(io::stdin().lock())),
    }
}

/// One read from whatever feeds the shell.
enum Input {
    Line(String),
    Interrupted,
    Closed,
}

trait LineSource {
    fn read(&mut self, prompt: &str) -> Result<Input, CliError>;
}

fn drive(context: &mut ShellContext, mut source: impl LineSource) -> Result<(), CliError> {
    while context.running {
        match source.read(&context.prompt())? {
            Input::Line(line) => {
                if let Err(err) = execute(context, &line) {
                    context.report_error(err);
                }
            }
            Input::Interrupted => {
                if context.confirm_exit()? {
                    break;
                }
            }
            Input::Closed => break,
        }
    }
    Ok(())
}

fn execute(context: &mut ShellContext, line: &str) -> Result<(), CommandError> {
    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(err);
            return Ok(());
        }
    };
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(());
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    if context.dispatch(&raw.to_lowercase(), raw, &args)? == LoopControl::Exit {
        context.running = false;
    }
    Ok(())
}

/// Line editor with history and command-name completion.
struct Terminal {
    editor: Editor<CommandNames, DefaultHistory>,
}

impl Terminal {
    fn new(names: Vec<&'static str>) -> Result<Self, CliError> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(CommandNames::new(names)));
        Ok(Self { editor })
    }
}

impl LineSource for Terminal {
    fn read(&mut self, prompt: &str) -> Result<Input, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    self.editor.add_history_entry(trimmed).ok();
                }
                Ok(Input::Line(trimmed.to_string()))
            }
            Err(ReadlineError::Interrupted) => Ok(Input::Interrupted),
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                Ok(Input::Closed)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Newline-separated commands from a non-interactive reader such as stdin.
struct Piped<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> Piped<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> LineSource for Piped<R> {
    fn read(&mut self, _prompt: &str) -> Result<Input, CliError> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(Input::Closed);
        }
        let line = String::from_utf8_lossy(&self.buf);
        Ok(Input::Line(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

struct CommandNames(Vec<&'static str>);

impl CommandNames {
    fn new(mut names: Vec<&'static str>) -> Self {
        names.sort_unstable();
        names.dedup();
        Self(names)
    }
}

impl Helper for CommandNames {}
impl Hinter for CommandNames {
    type Hint = String;
}
impl Highlighter for CommandNames {}
impl Validator for CommandNames {}

impl Completer for CommandNames {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let head = &line[..pos];
        let word = head.trim_start();
        // Arguments are free text; only the command word completes.
        if word.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let needle = word.to_ascii_lowercase();
        let candidates = self
            .0
            .iter()
            .filter(|name| name.starts_with(needle.as_str()))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();
        Ok((head.len() - word.len(), candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piped_input_yields_lines_then_closes() {
        let mut source = Piped::new(&b"login ann pw\r\nshow\nbad \xff byte"[..]);
        let mut lines = Vec::new();
        while let Input::Line(line) = source.read("").unwrap() {
            lines.push(line);
        }
        assert_eq!(lines, ["login ann pw", "show", "bad \u{FFFD} byte"]);
    }

    #[test]
    fn command_names_are_sorted_and_unique() {
        let names = CommandNames::new(vec!["show", "add", "show", "exit"]);
        assert_eq!(names.0, ["add", "exit", "show"]);
    }

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = shell_words::split(r#"add "Movie night" 2024-01-05 Fun 12"#).unwrap();
        assert_eq!(tokens, ["add", "Movie night", "2024-01-05", "Fun", "12"]);
        assert!(shell_words::split(r#"add "broken"#).is_err());
    }
}
