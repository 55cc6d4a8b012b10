//! These structs provide the CLI interface for the expenses CLI.

use crate::model::{Amount, CategoryFilter, ExpenseId, Period};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// expenses: A command-line tool for keeping track of personal expenses.
///
/// Each user has their own list of expenses along with an income and a monthly budget. Log in
/// once with `expenses login <username>` and every other command works on that user's data, or
/// pass --user to act as someone else for a single command.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and its configuration file.
    ///
    /// This is the first command you should run. By default, the data directory is
    /// $HOME/expenses. Pass --expenses-home or set EXPENSES_HOME to put it somewhere else.
    Init(InitArgs),
    /// Remember a user so that later commands act on their expenses.
    Login(LoginArgs),
    /// Forget the logged-in user.
    Logout,
    /// Add an expense.
    Add(AddArgs),
    /// Change an existing expense. Fields that are not given keep their current values.
    Edit(EditArgs),
    /// Delete one or more expenses by ID.
    Delete(DeleteArgs),
    /// List expenses, optionally filtered by category and period.
    List(ListArgs),
    /// Show income, total expense, savings, budget and the per-category breakdown.
    Summary(SummaryArgs),
    /// Set the income and/or the budget limit. A budget of 0 means no budget.
    SetIncome(SetIncomeArgs),
    /// Write a JSON snapshot of the user's expenses to the backups directory.
    Backup,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where expenses data and configuration is held. Defaults to ~/expenses
    #[arg(long, env = "EXPENSES_HOME", default_value_t = default_expenses_home())]
    expenses_home: DisplayPath,

    /// Act as this user instead of the logged-in user.
    #[arg(long, env = "EXPENSES_USER")]
    user: Option<String>,
}

impl Common {
    pub fn new(log_level: LevelFilter, expenses_home: PathBuf, user: Option<String>) -> Self {
        Self {
            log_level,
            expenses_home: expenses_home.into(),
            user,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn expenses_home(&self) -> &DisplayPath {
        &self.expenses_home
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }
}

/// Args for the `expenses init` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct InitArgs {
    /// The symbol printed before amounts. Defaults to ₹.
    #[arg(long)]
    currency: Option<String>,
}

impl InitArgs {
    pub fn new(currency: Option<String>) -> Self {
        Self { currency }
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }
}

/// Args for the `expenses login` command.
#[derive(Debug, Parser, Clone)]
pub struct LoginArgs {
    username: String,
}

impl LoginArgs {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Args for the `expenses add` command. Values are checked the same way the expense form checks
/// them, so they are taken as text here.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    #[arg(long)]
    name: String,

    /// A positive amount, e.g. 250, 1,200.50 or ₹99
    #[arg(long)]
    amount: String,

    /// Food, Transport, Entertainment, Shopping, Other, or any other name
    #[arg(long)]
    category: String,

    /// YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<String>,
}

impl AddArgs {
    pub fn new(
        name: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
        date: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            category: category.into(),
            date,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

/// Args for the `expenses edit` command.
#[derive(Debug, Parser, Clone)]
pub struct EditArgs {
    /// The ID of the expense, as shown by `expenses list`
    id: ExpenseId,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    amount: Option<String>,

    #[arg(long)]
    category: Option<String>,

    /// YYYY-MM-DD
    #[arg(long)]
    date: Option<String>,
}

impl EditArgs {
    pub fn new(id: ExpenseId) -> Self {
        Self {
            id,
            name: None,
            amount: None,
            category: None,
            date: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn id(&self) -> ExpenseId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

/// Args for the `expenses delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// One or more expense IDs
    #[arg(required = true)]
    ids: Vec<ExpenseId>,
}

impl DeleteArgs {
    pub fn new(ids: Vec<ExpenseId>) -> Self {
        Self { ids }
    }

    pub fn ids(&self) -> &[ExpenseId] {
        &self.ids
    }
}

/// How `expenses list` prints its rows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// An aligned, human-readable table.
    #[default]
    Table,
    /// A JSON array of expense objects.
    Json,
    /// CSV with a header row.
    Csv,
}

serde_plain::derive_display_from_serialize!(OutputFormat);
serde_plain::derive_fromstr_from_deserialize!(OutputFormat);

/// Args for the `expenses list` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ListArgs {
    /// "All" or a category name. Matching is exact and case-sensitive.
    #[arg(long, default_value_t = CategoryFilter::All)]
    category: CategoryFilter,

    #[arg(long, value_enum, default_value_t = Period::All)]
    period: Period,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// The day that monthly and weekly periods are measured from, YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

impl ListArgs {
    pub fn new(
        category: CategoryFilter,
        period: Period,
        format: OutputFormat,
        date: Option<NaiveDate>,
    ) -> Self {
        Self {
            category,
            period,
            format,
            date,
        }
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

/// Args for the `expenses summary` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct SummaryArgs {
    /// Also report the spending for the month and week containing this day, YYYY-MM-DD. Defaults
    /// to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

impl SummaryArgs {
    pub fn new(date: Option<NaiveDate>) -> Self {
        Self { date }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }
}

/// Args for the `expenses set-income` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct SetIncomeArgs {
    #[arg(long)]
    income: Option<Amount>,

    #[arg(long)]
    budget: Option<Amount>,
}

impl SetIncomeArgs {
    pub fn new(income: Option<Amount>, budget: Option<Amount>) -> Self {
        Self { income, budget }
    }

    pub fn income(&self) -> Option<Amount> {
        self.income
    }

    pub fn budget(&self) -> Option<Amount> {
        self.budget
    }
}

fn default_expenses_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("expenses"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --expenses-home or EXPENSES_HOME instead of relying on the \
                default home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("expenses")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["expenses", "--expenses-home", "/tmp/expenses-test"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_add() {
        let args = parse(&["add", "--name", "Lunch", "--amount", "12.50", "--category", "Food"]);
        let Command::Add(add) = args.command() else {
            panic!("expected add, got {:?}", args.command());
        };
        assert_eq!(add.name(), "Lunch");
        assert_eq!(add.amount(), "12.50");
        assert_eq!(add.date(), None);
        assert_eq!(args.common().log_level(), LevelFilter::INFO);
    }

    #[test]
    fn test_parse_list() {
        let args = parse(&[
            "--user", "asha", "list", "--category", "Food", "--period", "weekly", "--format",
            "csv", "--date", "2025-03-12",
        ]);
        assert_eq!(args.common().user(), Some("asha"));
        let Command::List(list) = args.command() else {
            panic!("expected list, got {:?}", args.command());
        };
        assert_eq!(list.category(), &CategoryFilter::named("Food"));
        assert_eq!(list.period(), Period::Weekly);
        assert_eq!(list.format(), OutputFormat::Csv);
        assert_eq!(list.date(), NaiveDate::from_ymd_opt(2025, 3, 12));
    }

    #[test]
    fn test_parse_list_defaults() {
        let Command::List(list) = parse(&["list"]).command().clone() else {
            panic!("expected list");
        };
        assert_eq!(list.category(), &CategoryFilter::All);
        assert_eq!(list.period(), Period::All);
        assert_eq!(list.format(), OutputFormat::Table);
    }

    #[test]
    fn test_parse_delete_and_set_income() {
        let Command::Delete(delete) = parse(&["delete", "1", "22"]).command().clone() else {
            panic!("expected delete");
        };
        assert_eq!(delete.ids(), &[ExpenseId::new(1), ExpenseId::new(22)]);
        assert!(Args::try_parse_from(["expenses", "delete"]).is_err());

        let Command::SetIncome(set) = parse(&["set-income", "--income", "5,000"]).command().clone()
        else {
            panic!("expected set-income");
        };
        assert_eq!(set.income(), Some(Amount::from_str("5000").unwrap()));
        assert_eq!(set.budget(), None);
        assert!(Args::try_parse_from(["expenses", "set-income", "--budget", "abc"]).is_err());
    }
}
