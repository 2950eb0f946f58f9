use std::io;

use chrono::Local;
use dialoguer::{theme::ColorfulTheme, Confirm, Password};
use rustyline::error::ReadlineError;
use strsim::levenshtein;

use crate::{
    config::ConfigManager,
    core::{ExpenseTracker, Session},
    errors::LedgerError,
    ledger::{SortKey, DATE_FORMAT},
};

use super::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

struct CommandSpec {
    name: &'static str,
    usage: &'static str,
    summary: &'static str,
}

const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "help",
        usage: "help",
        summary: "List available commands",
    },
    CommandSpec {
        name: "register",
        usage: "register <username> <password>",
        summary: "Create a new user",
    },
    CommandSpec {
        name: "login",
        usage: "login <username> [password]",
        summary: "Log in and load your expenses",
    },
    CommandSpec {
        name: "logout",
        usage: "logout",
        summary: "Close the current session",
    },
    CommandSpec {
        name: "whoami",
        usage: "whoami",
        summary: "Show the logged-in user",
    },
    CommandSpec {
        name: "add",
        usage: "add <description> <YYYY-MM-DD|today> <category> <amount>",
        summary: "Record an expense",
    },
    CommandSpec {
        name: "delete",
        usage: "delete <id|description text>",
        summary: "Delete one expense",
    },
    CommandSpec {
        name: "ids",
        usage: "ids",
        summary: "List expenses with their ids",
    },
    CommandSpec {
        name: "sort",
        usage: "sort <date|amount|category>",
        summary: "Reorder expenses",
    },
    CommandSpec {
        name: "filter",
        usage: "filter <category>",
        summary: "Keep only one category in view (until reload)",
    },
    CommandSpec {
        name: "reload",
        usage: "reload",
        summary: "Re-read expenses from disk",
    },
    CommandSpec {
        name: "show",
        usage: "show",
        summary: "Print the expense report",
    },
    CommandSpec {
        name: "totals",
        usage: "totals",
        summary: "Print the totals file as saved",
    },
    CommandSpec {
        name: "paths",
        usage: "paths",
        summary: "Show data file locations",
    },
    CommandSpec {
        name: "version",
        usage: "version",
        summary: "Show build information",
    },
    CommandSpec {
        name: "exit",
        usage: "exit",
        summary: "Leave the shell",
    },
];

pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) running: bool,
    tracker: ExpenseTracker,
    session: Option<Session>,
    theme: ColorfulTheme,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let manager = ConfigManager::new()?;
        let tracker = ExpenseTracker::from_config_manager(&manager)?;
        Ok(Self::with_tracker(mode, tracker))
    }

    pub fn with_tracker(mode: CliMode, tracker: ExpenseTracker) -> Self {
        Self {
            mode,
            running: true,
            tracker,
            session: None,
            theme: ColorfulTheme::default(),
        }
    }

    pub fn prompt(&self) -> String {
        match &self.session {
            Some(session) => format!("expense-ledger [{}]> ", session.username()),
            None => "expense-ledger> ".to_string(),
        }
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        COMMANDS.iter().map(|spec| spec.name).collect()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        match command {
            "help" | "?" => self.cmd_help(),
            "register" => self.cmd_register(args)?,
            "login" => self.cmd_login(args)?,
            "logout" => self.cmd_logout(),
            "whoami" => self.cmd_whoami(),
            "add" => self.cmd_add(args)?,
            "delete" => self.cmd_delete(args)?,
            "ids" => self.cmd_ids()?,
            "sort" => self.cmd_sort(args)?,
            "filter" => self.cmd_filter(args)?,
            "reload" => self.cmd_reload()?,
            "show" => self.cmd_show()?,
            "totals" => self.cmd_totals(),
            "paths" => self.cmd_paths(),
            "version" => self.cmd_version(),
            "exit" | "quit" => return Ok(LoopControl::Exit),
            _ => self.suggest_command(raw),
        }
        Ok(LoopControl::Continue)
    }

    fn cmd_help(&self) {
        output::section("Commands");
        for spec in COMMANDS {
            println!("  {:<58} {}", spec.usage, spec.summary);
        }
    }

    fn cmd_register(&self, args: &[&str]) -> Result<(), CommandError> {
        let [username, password] = args else {
            return Err(usage("register"));
        };
        self.tracker.register(username, password)?;
        output::success("Registration successful! You can now log in with your new credentials.");
        Ok(())
    }

    fn cmd_login(&mut self, args: &[&str]) -> Result<(), CommandError> {
        let (username, password) = match args {
            [username, password] => (username.to_string(), password.to_string()),
            [username] if self.mode == CliMode::Interactive => {
                let password = Password::with_theme(&self.theme)
                    .with_prompt("Password")
                    .allow_empty_password(true)
                    .interact()?;
                (username.to_string(), password)
            }
            _ => return Err(usage("login")),
        };

        let mut session = self.tracker.login(&username, &password);
        if session.is_none() && self.offer_registration(&username, &password)? {
            self.tracker.register(&username, &password)?;
            output::success("Registration successful!");
            session = self.tracker.login(&username, &password);
        }

        match session {
            Some(session) => {
                output::success(format!(
                    "Logged in as {} ({} expenses).",
                    session.username(),
                    session.ledger().len()
                ));
                output::report(session.view());
                self.session = Some(session);
                Ok(())
            }
            None => Err(CommandError::Message("Invalid username or password".into())),
        }
    }

    fn offer_registration(&self, username: &str, password: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script
            || username.is_empty()
            || password.is_empty()
            || self.tracker.user_exists(username)
        {
            return Ok(false);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt("User not found. Do you want to register as a new user?")
            .default(false)
            .interact()?)
    }

    fn cmd_logout(&mut self) {
        match self.session.take() {
            Some(session) => output::info(format!("Logged out {}.", session.username())),
            None => output::warning("No user is logged in."),
        }
    }

    fn cmd_whoami(&self) {
        match &self.session {
            Some(session) => output::info(session.username()),
            None => output::info("Not logged in."),
        }
    }

    fn cmd_add(&mut self, args: &[&str]) -> Result<(), CommandError> {
        let [description, date, category, amount] = args else {
            return Err(usage("add"));
        };
        let date = resolve_date(date);
        let session = self.session.as_mut().ok_or(CommandError::NotLoggedIn)?;
        self.tracker.add_expense(session, description, &date, category, amount)?;
        output::success("Expense added.");
        output::report(session.view());
        Ok(())
    }

    fn cmd_delete(&mut self, args: &[&str]) -> Result<(), CommandError> {
        if args.is_empty() {
            return Err(usage("delete"));
        }
        let selection = args.join(" ");
        let session = self.session.as_mut().ok_or(CommandError::NotLoggedIn)?;
        if self.tracker.delete_expense(session, &selection) {
            output::success("Expense deleted.");
            output::report(session.view());
        } else {
            output::warning("No matching expense found.");
        }
        Ok(())
    }

    fn cmd_ids(&self) -> Result<(), CommandError> {
        let session = self.session.as_ref().ok_or(CommandError::NotLoggedIn)?;
        if session.ledger().is_empty() {
            output::info("No expenses recorded.");
        }
        for entry in session.ledger().entries() {
            println!("{}  {}", entry.short_id(), entry.record);
        }
        Ok(())
    }

    fn cmd_sort(&mut self, args: &[&str]) -> Result<(), CommandError> {
        let [key] = args else {
            return Err(usage("sort"));
        };
        let key: SortKey = key.parse()?;
        let session = self.session.as_mut().ok_or(CommandError::NotLoggedIn)?;
        self.tracker.sort_ledger(session, key);
        output::report(session.view());
        Ok(())
    }

    fn cmd_filter(&mut self, args: &[&str]) -> Result<(), CommandError> {
        if args.is_empty() {
            return Err(usage("filter"));
        }
        let category = args.join(" ");
        let session = self.session.as_mut().ok_or(CommandError::NotLoggedIn)?;
        self.tracker.filter_ledger(session, &category);
        output::info("Filter applied. Use `reload` to bring back other categories.");
        output::report(session.view());
        Ok(())
    }

    fn cmd_reload(&mut self) -> Result<(), CommandError> {
        let session = self.session.as_mut().ok_or(CommandError::NotLoggedIn)?;
        self.tracker.reload_ledger(session);
        output::report(session.view());
        Ok(())
    }

    fn cmd_show(&mut self) -> Result<(), CommandError> {
        let session = self.session.as_mut().ok_or(CommandError::NotLoggedIn)?;
        let text = self.tracker.render_report(session);
        output::report(&text);
        Ok(())
    }

    fn cmd_totals(&self) {
        match self.tracker.loaded_totals() {
            Some(text) => output::report(&text),
            None => output::warning("No totals file found."),
        }
    }

    fn cmd_paths(&self) {
        let paths = self.tracker.paths();
        output::info(format!("Data directory: {}", paths.root.display()));
        output::info(format!("Credentials:    {}", paths.credentials.display()));
        output::info(format!("Totals:         {}", paths.totals.display()));
        if let Some(session) = &self.session {
            output::info(format!(
                "Expenses:       {}",
                session.expense_path().display()
            ));
        }
    }

    fn cmd_version(&self) {
        output::info(format!(
            "expense_ledger {} ({}, built {})",
            env!("CARGO_PKG_VERSION"),
            env!("EXPENSE_LEDGER_BUILD_HASH"),
            env!("EXPENSE_LEDGER_BUILD_TIMESTAMP"),
        ));
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let best = COMMANDS
            .iter()
            .map(|spec| (levenshtein(spec.name, &input.to_lowercase()), spec.name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt("Exit shell?")
            .default(true)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        if let CommandError::Ledger(inner) = &err {
            if !inner.is_user_facing() {
                tracing::error!(error = %inner, "command failed");
            }
        }
        output::error(err);
    }
}

fn resolve_date(input: &str) -> String {
    match input.to_ascii_lowercase().as_str() {
        "today" | "-" => Local::now().date_naive().format(DATE_FORMAT).to_string(),
        _ => input.to_string(),
    }
}

fn usage(command: &str) -> CommandError {
    let usage = COMMANDS
        .iter()
        .find(|spec| spec.name == command)
        .map(|spec| spec.usage)
        .unwrap_or(command);
    CommandError::InvalidArguments(format!("usage: {usage}"))
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Please log in first")]
    NotLoggedIn,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::tempdir;

    fn script_context(root: &std::path::Path) -> ShellContext {
        ShellContext::with_tracker(
            CliMode::Script,
            ExpenseTracker::new(&Config::default(), root),
        )
    }

    #[test]
    fn commands_require_a_session() {
        let dir = tempdir().unwrap();
        let mut context = script_context(dir.path());
        let err = context.dispatch("show", "show", &[]).unwrap_err();
        assert!(matches!(err, CommandError::NotLoggedIn));
    }

    #[test]
    fn login_in_script_mode_needs_password() {
        let dir = tempdir().unwrap();
        let mut context = script_context(dir.path());
        let err = context.dispatch("login", "login", &["amy"]).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
    }

    #[test]
    fn register_login_and_add_flow() {
        let dir = tempdir().unwrap();
        let mut context = script_context(dir.path());
        context
            .dispatch("register", "register", &["amy", "pw"])
            .unwrap();
        context.dispatch("login", "login", &["amy", "pw"]).unwrap();
        assert_eq!(context.prompt(), "expense-ledger [amy]> ");
        context
            .dispatch("add", "add", &["Soup", "2024-02-02", "Food", "6"])
            .unwrap();
        let saved = std::fs::read_to_string(dir.path().join("expenses_amy")).unwrap();
        assert_eq!(saved, "Soup,2024-02-02,Food,6.0\n");
    }

    #[test]
    fn exit_stops_the_loop() {
        let dir = tempdir().unwrap();
        let mut context = script_context(dir.path());
        assert_eq!(
            context.dispatch("exit", "exit", &[]).unwrap(),
            LoopControl::Exit
        );
    }

    #[test]
    fn today_resolves_to_an_iso_date() {
        let resolved = resolve_date("today");
        assert!(chrono::NaiveDate::parse_from_str(&resolved, DATE_FORMAT).is_ok());
        assert_eq!(resolve_date("2024-01-09"), "2024-01-09");
    }
}
