//! A line-oriented budgeting session.
//!
//! Each line is one command. Adds and deletes go through the `Controller`; `show` writes the
//! current page. A line that cannot be parsed, or input the controller rejects, is logged and
//! skipped; the session carries on.

use crate::commands::Out;
use crate::controller::{parse_value, Controller, Input, Update};
use crate::model::Kind;
use crate::render::Renderer;
use crate::{Config, Result};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use serde::Serialize;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace, warn};

const HELP: &str = "\
Commands:
  add <income|expense> <value> <description>   e.g. add expense 12.50 Lunch
  delete <income|expense>-<id>                 e.g. delete expense-0
  show                                         print the budget
  help                                         print this message
  quit                                         end the session
";

/// One parsed line of input.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Line {
    /// Blank or a `#` comment.
    Skip,
    Add(Input),
    Delete(String),
    Show,
    Help,
    Quit,
}

impl FromStr for Line {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.starts_with('#') {
            return Ok(Line::Skip);
        }
        let (command, rest) = next_word(s);
        let line = match command.to_lowercase().as_str() {
            "add" => {
                let (kind, rest) = next_word(rest);
                let (value, description) = next_word(rest);
                let kind = Kind::from_str(kind).map_err(|_| {
                    anyhow::anyhow!("Unknown kind '{kind}', use income or expense")
                })?;
                Line::Add(Input::new(kind, description, parse_value(value)?))
            }
            "delete" | "del" | "rm" => {
                let (selector, extra) = next_word(rest);
                if selector.is_empty() || !extra.is_empty() {
                    bail!("delete takes exactly one selector, e.g. 'delete income-0'");
                }
                Line::Delete(selector.to_string())
            }
            "show" => Line::Show,
            "help" | "?" => Line::Help,
            "quit" | "exit" => Line::Quit,
            _ => bail!("Unknown command '{command}', try 'help'"),
        };
        Ok(line)
    }
}

/// Splits off the first whitespace-delimited word. The remainder is trimmed.
fn next_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(ix) => (&s[..ix], s[ix..].trim()),
        None => (s, ""),
    }
}

/// Counts reported at the end of a session.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
pub struct Summary {
    pub lines: usize,
    pub applied: usize,
    pub rejected: usize,
}

/// Holds the controller for the lifetime of one session along with how to present it.
#[derive(Debug)]
pub struct Session {
    controller: Controller,
    renderer: Renderer,
    json: bool,
    today: NaiveDate,
    /// The view as of the last change, which is what `show` presents.
    last: Update,
    summary: Summary,
}

enum Step {
    Continue,
    Quit,
}

impl Session {
    pub fn new(config: &Config, json: bool, today: NaiveDate) -> Self {
        let controller = Controller::new(config.id_policy());
        let last = controller.init();
        Self {
            controller,
            renderer: Renderer::new(config.currency_symbol()),
            json,
            today,
            last,
            summary: Summary::default(),
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Reads commands from `reader` until it ends or a `quit` line, writing anything the user asked
    /// to see to `writer`.
    pub async fn run<R, W>(&mut self, reader: R, writer: &mut W) -> Result<Summary>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await.context("Unable to read input")? {
            self.summary.lines += 1;
            let number = self.summary.lines;
            trace!("line {number}: {line}");
            match self.handle(&line, writer).await {
                Ok(Step::Continue) => {}
                Ok(Step::Quit) => break,
                Err(e) => {
                    self.summary.rejected += 1;
                    warn!("Line {number} was not applied: {e:#}");
                }
            }
        }
        writer.flush().await.context("Unable to flush output")?;
        debug!("Session finished: {:?}", self.summary);
        Ok(self.summary)
    }

    async fn handle<W>(&mut self, line: &str, writer: &mut W) -> Result<Step>
    where
        W: AsyncWrite + Unpin,
    {
        match Line::from_str(line)? {
            Line::Skip => {}
            Line::Add(input) => {
                let update = self.controller.add_item(input)?;
                self.applied(update, "Added");
            }
            Line::Delete(selector) => {
                let update = self.controller.delete_item(&selector)?;
                if update.entry().is_some() {
                    self.applied(update, "Deleted");
                } else {
                    Out::<()>::new_message(format!("Nothing to delete for {selector}")).print();
                    self.last = update;
                }
            }
            Line::Show => {
                let text = self.show()?;
                write(writer, &text).await?;
            }
            Line::Help => write(writer, HELP).await?,
            Line::Quit => return Ok(Step::Quit),
        }
        Ok(Step::Continue)
    }

    /// The current page, or its JSON form.
    pub fn show(&self) -> Result<String> {
        if self.json {
            let mut json = serde_json::to_string_pretty(&self.last)
                .context("Unable to serialize the budget")?;
            json.push('\n');
            Ok(json)
        } else {
            let page = self
                .renderer
                .page(self.last.budget(), self.controller.store(), self.today);
            Ok(page.to_string())
        }
    }

    fn applied(&mut self, update: Update, verb: &str) {
        self.summary.applied += 1;
        let message = match update.entry() {
            Some(entry) => format!(
                "{verb} {} '{}' {}",
                entry.item_ref(),
                entry.description(),
                self.renderer.format_number(entry.amount(), entry.kind())
            ),
            None => verb.to_string(),
        };
        Out::new(message, update.clone()).print();
        self.last = update;
    }
}

async fn write<W>(writer: &mut W, text: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(text.as_bytes())
        .await
        .context("Unable to write output")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Percentage;
    use crate::store::IdPolicy;
    use crate::test::TestEnv;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    async fn run_script(session: &mut Session, script: &str) -> (Summary, String) {
        let mut out: Vec<u8> = Vec::new();
        let summary = session.run(script.as_bytes(), &mut out).await.unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_add() {
        let line = Line::from_str("add expense $1,200.00  Rent for   October ").unwrap();
        let Line::Add(input) = line else {
            panic!("expected an add line");
        };
        assert_eq!(input.kind(), Kind::Expense);
        assert_eq!(input.description(), "Rent for   October");
        assert_eq!(input.value().value(), rust_decimal::Decimal::from(1200));
    }

    #[test]
    fn test_parse_add_without_description() {
        let Line::Add(input) = Line::from_str("add inc 5").unwrap() else {
            panic!("expected an add line");
        };
        assert_eq!(input.kind(), Kind::Income);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(Line::from_str("add savings 5 x").is_err());
        assert!(Line::from_str("add income five x").is_err());
        assert!(Line::from_str("add income").is_err());
        assert!(Line::from_str("delete").is_err());
        assert!(Line::from_str("delete income-0 income-1").is_err());
        assert!(Line::from_str("withdraw 5").is_err());
    }

    #[test]
    fn test_parse_simple() {
        assert_eq!(Line::from_str("   ").unwrap(), Line::Skip);
        assert_eq!(Line::from_str("# note").unwrap(), Line::Skip);
        assert_eq!(Line::from_str("SHOW").unwrap(), Line::Show);
        assert_eq!(Line::from_str("exit").unwrap(), Line::Quit);
        assert_eq!(
            Line::from_str("rm expense-3").unwrap(),
            Line::Delete("expense-3".to_string())
        );
    }

    #[tokio::test]
    async fn test_session_script() {
        let env = TestEnv::new().await;
        let mut session = Session::new(&env.config(), false, today());
        let script = "\
# October
add income 100 Salary
add income 200 Bonus
add expense 50 Rent
show
";
        let (summary, out) = run_script(&mut session, script).await;
        assert_eq!(summary.lines, 5);
        assert_eq!(summary.applied, 3);
        assert_eq!(summary.rejected, 0);
        assert!(out.starts_with("Available Budget in October 2026:\n+ $250.00\n"));
        assert!(out.contains("17%"));
    }

    #[tokio::test]
    async fn test_session_rejections_continue() {
        let env = TestEnv::new().await;
        let mut session = Session::new(&env.config(), false, today());
        let script = "\
add income 0 Nothing
add income 10
bogus
delete income-x
add income 10 Gift
";
        let (summary, _) = run_script(&mut session, script).await;
        assert_eq!(summary.rejected, 4);
        assert_eq!(summary.applied, 1);
        assert_eq!(session.controller().store().len(), 1);
    }

    #[tokio::test]
    async fn test_session_rejects_doubled_sign() {
        let env = TestEnv::new().await;
        let mut session = Session::new(&env.config(), false, today());
        let script = "add income --5 x\nadd income -$-5 y\n";
        let (summary, _) = run_script(&mut session, script).await;
        assert_eq!(summary.rejected, 2);
        assert_eq!(summary.applied, 0);
        assert!(session.controller().store().is_empty());
    }

    #[tokio::test]
    async fn test_session_quit_stops_reading() {
        let env = TestEnv::new().await;
        let mut session = Session::new(&env.config(), false, today());
        let (summary, _) = run_script(&mut session, "add income 1 a\nquit\nadd income 1 b\n").await;
        assert_eq!(summary.lines, 2);
        assert_eq!(session.controller().store().len(), 1);
    }

    #[tokio::test]
    async fn test_session_delete_and_json() {
        let env = TestEnv::new().await;
        let mut session = Session::new(&env.config(), true, today());
        let script = "\
add income 200 Salary
add expense 50 Food
add expense 150 Rent
delete expense-0
delete expense-7
show
";
        let (summary, out) = run_script(&mut session, script).await;
        assert_eq!(summary.applied, 4);
        assert_eq!(summary.rejected, 0);
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["budget"]["percentage"], 75);
        assert_eq!(json["percentages"], serde_json::json!([75]));
        assert!(json["entry"].is_null());
    }

    #[tokio::test]
    async fn test_session_show_before_changes() {
        let env = TestEnv::new().await;
        let session = Session::new(&env.config(), true, today());
        let json: serde_json::Value = serde_json::from_str(&session.show().unwrap()).unwrap();
        assert_eq!(json["budget"]["percentage"], 0);
        let session = Session::new(&env.config(), false, today());
        let page = session.show().unwrap();
        assert!(page.contains("- $0.00"));
        assert!(page.contains("---"));
    }

    #[tokio::test]
    async fn test_session_id_policy_from_config() {
        let env = TestEnv::with_id_policy(IdPolicy::Monotonic).await;
        let mut session = Session::new(&env.config(), false, today());
        let script = "add income 1 a\nadd income 1 b\ndelete income-1\nadd income 1 c\n";
        run_script(&mut session, script).await;
        let ids: Vec<u64> = session
            .controller()
            .store()
            .incomes()
            .iter()
            .map(|i| i.id())
            .collect();
        assert_eq!(ids, vec![0, 2]);
        assert!(session
            .controller()
            .store()
            .percentages()
            .iter()
            .all(Percentage::is_unset));
    }
}
