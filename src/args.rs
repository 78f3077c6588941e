//! These structs provide the CLI interface for the fintrack CLI.

use crate::error::{Error, Result};
use crate::form::FormFields;
use crate::model::taxonomy::OTHER;
use crate::model::{Month, TransactionType, MAX_RECENT_MONTHS};
use crate::storage::StorageKind;
use chrono::NaiveDate;
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// fintrack: A personal finance ledger for the command line.
///
/// Record income and expense transactions against accounts and categories, then view monthly
/// totals, per-account breakdowns and chart series. Money lent to people ('Credit Given') and
/// crypto purchases ('Crypto Investment') are tracked separately and never count against net
/// earnings.
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
    /// Create the home directory, the configuration file and an empty data file.
    ///
    /// This is the first command you should run. By default the home directory is
    /// $HOME/fintrack; pass --home or set FINTRACK_HOME to put it somewhere else.
    Init(InitArgs),
    /// Record a new transaction.
    Add(AddArgs),
    /// Change an existing transaction. Fields that are not given keep their current values.
    Edit(EditArgs),
    /// Delete a transaction.
    Delete(DeleteArgs),
    /// Show the totals, breakdowns, chart series and transactions for one month.
    View(ViewArgs),
    /// List the category choices for income and expense transactions.
    Categories(CategoriesArgs),
    /// List the months offered by the month filter.
    Months(MonthsArgs),
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

    /// The directory where fintrack data and configuration is held. Defaults to ~/fintrack
    #[arg(long, env = "FINTRACK_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `fintrack init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// Where to keep transactions.
    #[arg(long, value_enum, default_value_t = StorageKind::Sqlite)]
    storage: StorageKind,

    /// The currency label shown in front of amounts.
    #[arg(long, default_value = crate::config::DEFAULT_CURRENCY)]
    currency: String,
}

impl InitArgs {
    pub fn new(storage: StorageKind, currency: impl Into<String>) -> Self {
        Self {
            storage,
            currency: currency.into(),
        }
    }

    pub fn storage(&self) -> StorageKind {
        self.storage
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }
}

/// Args for the `fintrack add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// Whether money came in or went out.
    #[arg(long = "type", value_enum)]
    transaction_type: TransactionType,

    /// The amount, e.g. 1250.50 or 1,250.50. Must be positive.
    #[arg(long)]
    amount: String,

    /// The account, e.g. Cash or Bank.
    #[arg(long)]
    account: String,

    /// One of the choices listed by `fintrack categories`. Use Other together with
    /// --other-category for anything else.
    #[arg(long)]
    category: String,

    /// The category text to use when --category is Other. Rejected with any other category.
    #[arg(long)]
    other_category: Option<String>,

    /// Who the money was lent to. Required when --category is 'Credit Given'.
    #[arg(long)]
    person_name: Option<String>,

    /// The date of the transaction as YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

impl AddArgs {
    pub fn new(
        transaction_type: TransactionType,
        amount: impl Into<String>,
        account: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            transaction_type,
            amount: amount.into(),
            account: account.into(),
            category: category.into(),
            other_category: None,
            person_name: None,
            date: None,
        }
    }

    pub fn with_other_category(mut self, other_category: impl Into<String>) -> Self {
        self.other_category = Some(other_category.into());
        self
    }

    pub fn with_person_name(mut self, person_name: impl Into<String>) -> Self {
        self.person_name = Some(person_name.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// The form these arguments fill in.
    ///
    /// # Errors
    /// Returns a `Validation` error if `--other-category` is given with a category other than
    /// `Other`.
    pub fn form(&self) -> Result<FormFields> {
        check_other_category(&self.category, self.other_category.as_deref())?;
        Ok(FormFields {
            transaction_type: self.transaction_type,
            amount: self.amount.clone(),
            account: self.account.clone(),
            category: self.category.clone(),
            other_category: self.other_category.clone().unwrap_or_default(),
            person_name: self.person_name.clone().unwrap_or_default(),
            date: self.date,
        })
    }
}

/// Args for the `fintrack edit` command.
#[derive(Debug, Parser, Clone)]
pub struct EditArgs {
    /// The id of the transaction to change, as shown by `fintrack view`.
    id: String,

    #[arg(long = "type", value_enum)]
    transaction_type: Option<TransactionType>,

    #[arg(long)]
    amount: Option<String>,

    #[arg(long)]
    account: Option<String>,

    #[arg(long)]
    category: Option<String>,

    /// The category text to use when the category is Other. Rejected when the edited
    /// transaction's category is anything else.
    #[arg(long)]
    other_category: Option<String>,

    /// Who the money was lent to, for 'Credit Given' transactions.
    #[arg(long)]
    person_name: Option<String>,

    #[arg(long)]
    date: Option<NaiveDate>,
}

impl EditArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            transaction_type: None,
            amount: None,
            account: None,
            category: None,
            other_category: None,
            person_name: None,
            date: None,
        }
    }

    pub fn with_transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
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

    pub fn with_other_category(mut self, other_category: impl Into<String>) -> Self {
        self.other_category = Some(other_category.into());
        self
    }

    pub fn with_person_name(mut self, person_name: impl Into<String>) -> Self {
        self.person_name = Some(person_name.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Overwrites the fields of `form` that were given on the command line.
    ///
    /// # Errors
    /// Returns a `Validation` error if `--other-category` is given but the resulting category is
    /// not `Other`.
    pub fn apply_to(&self, mut form: FormFields) -> Result<FormFields> {
        if let Some(t) = self.transaction_type {
            form.transaction_type = t;
        }
        if let Some(amount) = &self.amount {
            form.amount = amount.clone();
        }
        if let Some(account) = &self.account {
            form.account = account.clone();
        }
        if let Some(category) = &self.category {
            form.category = category.clone();
        }
        if let Some(other_category) = &self.other_category {
            form.other_category = other_category.clone();
        }
        if let Some(person_name) = &self.person_name {
            form.person_name = person_name.clone();
        }
        if let Some(date) = self.date {
            form.date = Some(date);
        }
        check_other_category(&form.category, self.other_category.as_deref())?;
        Ok(form)
    }
}

fn check_other_category(category: &str, other_category: Option<&str>) -> Result<()> {
    match other_category {
        Some(_) if category.trim() != OTHER => Err(Error::validation(format!(
            "--other-category only applies when the category is '{OTHER}', not '{}'",
            category.trim()
        ))),
        _ => Ok(()),
    }
}

/// Args for the `fintrack delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The id of the transaction to delete.
    id: String,
}

impl DeleteArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Args for the `fintrack view` command.
#[derive(Debug, Parser, Clone)]
pub struct ViewArgs {
    /// The month to show as YYYY-MM. Defaults to the current month.
    #[arg(long)]
    month: Option<Month>,

    /// Only show income or only show expense transactions.
    #[arg(long = "type", value_enum)]
    transaction_type: Option<TransactionType>,

    /// Only show transactions on this account.
    #[arg(long)]
    account: Option<String>,

    /// Only show transactions in this category.
    #[arg(long)]
    category: Option<String>,

    /// Print the whole view as JSON instead of a report.
    #[arg(long)]
    json: bool,
}

impl ViewArgs {
    pub fn new(month: Option<Month>) -> Self {
        Self {
            month,
            transaction_type: None,
            account: None,
            category: None,
            json: false,
        }
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn month(&self) -> Option<Month> {
        self.month
    }

    pub fn transaction_type(&self) -> Option<TransactionType> {
        self.transaction_type
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn json(&self) -> bool {
        self.json
    }
}

/// Args for the `fintrack categories` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct CategoriesArgs {
    /// Only list the choices for this type.
    #[arg(long = "type", value_enum)]
    transaction_type: Option<TransactionType>,
}

impl CategoriesArgs {
    pub fn new(transaction_type: Option<TransactionType>) -> Self {
        Self { transaction_type }
    }

    pub fn transaction_type(&self) -> Option<TransactionType> {
        self.transaction_type
    }
}

/// Args for the `fintrack months` command.
#[derive(Debug, Parser, Clone)]
pub struct MonthsArgs {
    /// How many months to list, counting the current one. At most 1200.
    #[arg(
        long,
        default_value_t = crate::filter::RECENT_MONTHS,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_RECENT_MONTHS as u64),
    )]
    count: usize,
}

impl MonthsArgs {
    pub fn new(count: usize) -> Self {
        Self { count }
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("fintrack"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or FINTRACK_HOME instead of relying on the default \
                fintrack home directory. If you continue using the program right now, you may \
                have problems!",
            );
            PathBuf::from("fintrack")
        }
    })
}

/// A `PathBuf` that implements `Display` so that clap can show it as a default value.
#[derive(Debug, Clone, PartialEq, Eq)]
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
        write!(f, "{}", self.0.display())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
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

    #[test]
    fn test_parse_add() {
        let args = Args::try_parse_from([
            "fintrack",
            "--home",
            "/tmp/ft",
            "add",
            "--type",
            "expense",
            "--amount",
            "1,250.50",
            "--account",
            "Cash",
            "--category",
            "Other",
            "--other-category",
            "Rent",
            "--date",
            "2024-03-05",
        ])
        .unwrap();
        assert_eq!(args.common().home().path(), Path::new("/tmp/ft"));
        let Command::Add(add) = args.command() else {
            panic!("expected add, got {:?}", args.command());
        };
        let form = add.form().unwrap();
        assert_eq!(form.transaction_type, TransactionType::Expense);
        assert_eq!(form.category, OTHER);
        assert_eq!(form.other_category, "Rent");
        assert_eq!(form.date, NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn test_parse_view() {
        let args = Args::try_parse_from([
            "fintrack", "view", "--month", "2024-03", "--type", "income", "--json",
        ])
        .unwrap();
        let Command::View(view) = args.command() else {
            panic!("expected view");
        };
        assert_eq!(view.month().unwrap().to_string(), "2024-03");
        assert_eq!(view.transaction_type(), Some(TransactionType::Income));
        assert!(view.json());
        assert_eq!(view.account(), None);
    }

    #[test]
    fn test_parse_rejects_bad_month() {
        assert!(Args::try_parse_from(["fintrack", "view", "--month", "March"]).is_err());
    }

    #[test]
    fn test_parse_init_defaults() {
        let args = Args::try_parse_from(["fintrack", "init"]).unwrap();
        let Command::Init(init) = args.command() else {
            panic!("expected init");
        };
        assert_eq!(init.storage(), StorageKind::Sqlite);
        assert_eq!(init.currency(), "MAD");
        assert_eq!(args.common().log_level(), LevelFilter::INFO);
    }

    #[test]
    fn test_edit_apply_to_only_given_fields() {
        let form = FormFields::new(TransactionType::Expense, "30.00", "Bank", "Leisure");
        let edit = EditArgs::new("txn-1").with_amount("35");
        let edited = edit.apply_to(form.clone()).unwrap();
        assert_eq!(edited.amount, "35");
        assert_eq!(edited.account, form.account);
        assert_eq!(edited.category, form.category);
    }

    #[test]
    fn test_other_category_needs_other() {
        let leisure = FormFields::new(TransactionType::Expense, "30.00", "Bank", "Leisure");
        let edit = EditArgs::new("txn-1").with_other_category("Rent");
        assert!(edit.apply_to(leisure.clone()).unwrap_err().is_validation());

        let edited = edit.with_category(OTHER).apply_to(leisure).unwrap();
        assert_eq!(edited.other_category, "Rent");

        let add = AddArgs::new(TransactionType::Expense, "5", "Cash", "Leisure")
            .with_other_category("Rent");
        assert!(add.form().unwrap_err().is_validation());
    }

    #[test]
    fn test_months_count_is_bounded() {
        assert!(Args::try_parse_from(["fintrack", "months", "--count", "0"]).is_err());
        assert!(Args::try_parse_from(["fintrack", "months", "--count", "1201"]).is_err());
        let args = Args::try_parse_from(["fintrack", "months", "--count", "1200"]).unwrap();
        let Command::Months(months) = args.command() else {
            panic!("expected months");
        };
        assert_eq!(months.count(), MAX_RECENT_MONTHS);
    }
}
