//! CLI argument definitions using clap derive

use crate::cache::{ResourceId, TransactionKind};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Tally - personal finance from the terminal
///
/// Keeps a session against a finance API and works with its categories,
/// transactions and balance summary.
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "TALLY_CONFIG")]
    pub config: Option<PathBuf>,

    /// API base URL, overriding api.base_url
    #[arg(long, global = true, env = "TALLY_API_URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and load your data
    Login(LoginArgs),

    /// Create an account, then log in
    Register(LoginArgs),

    /// End the session and forget the stored token
    Logout,

    /// Show session and configuration state
    Status,

    /// Re-fetch categories, transactions and summary
    Sync,

    /// Show balance, income and expense totals
    Summary(FormatArgs),

    /// Manage categories
    #[command(alias = "cat")]
    Categories(CategoriesArgs),

    /// Manage transactions
    #[command(alias = "tx")]
    Transactions(TransactionsArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Print shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Account email (prompted when omitted)
    #[arg(short, long)]
    pub email: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,
}

#[derive(Parser, Debug, Clone, Copy)]
pub struct FormatArgs {
    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub action: CategoryAction,
}

#[derive(Subcommand, Debug)]
pub enum CategoryAction {
    /// List categories
    List(FormatArgs),

    /// Create a category
    Add {
        name: String,

        /// Hex colour, e.g. "#e74c3c"
        #[arg(long)]
        color: Option<String>,
    },

    /// Rename or recolour a category
    Update {
        id: ResourceId,

        name: String,

        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a category that no transaction uses
    Delete {
        id: ResourceId,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Parser, Debug)]
pub struct TransactionsArgs {
    #[command(subcommand)]
    pub action: TransactionAction,
}

#[derive(Subcommand, Debug)]
pub enum TransactionAction {
    /// List transactions
    List(FormatArgs),

    /// Record a transaction
    Add(TransactionFields),

    /// Replace a transaction's fields
    Update {
        id: ResourceId,

        #[command(flatten)]
        fields: TransactionFields,
    },

    /// Delete a transaction
    Delete {
        id: ResourceId,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct TransactionFields {
    pub description: String,

    /// Positive amount; the direction comes from --type
    #[arg(value_parser = parse_amount)]
    pub amount: f64,

    /// Income or expense
    #[arg(short = 't', long = "type", default_value = "expense")]
    pub kind: KindArg,

    /// Category id
    #[arg(long)]
    pub category: ResourceId,
}

/// Transaction direction as accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Income,
    Expense,
}

impl From<KindArg> for TransactionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Income => TransactionKind::Income,
            KindArg::Expense => TransactionKind::Expense,
        }
    }
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., api.base_url)
        key: String,
        /// Value to set
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Tab-separated, one record per line
    Plain,
}

fn parse_amount(s: &str) -> Result<f64, String> {
    let amount: f64 = s
        .parse()
        .map_err(|_| format!("invalid amount '{s}'"))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(format!("amount must be a positive number, got '{s}'"));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_amount_accepts_decimals() {
        assert_eq!(parse_amount("12.50").unwrap(), 12.5);
    }

    #[test]
    fn parse_amount_rejects_non_positive() {
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("inf").is_err());
    }

    #[test]
    fn cli_parses_login() {
        let cli = Cli::parse_from(["tally", "login", "--email", "a@b.com", "--password-stdin"]);
        match cli.command {
            Commands::Login(args) => {
                assert_eq!(args.email.as_deref(), Some("a@b.com"));
                assert!(args.password_stdin);
            }
            _ => panic!("expected Login command"),
        }
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["tally", "sync", "-vv", "--api-url", "http://api.test"]);
        assert!(matches!(cli.command, Commands::Sync));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.api_url.as_deref(), Some("http://api.test"));
    }

    #[test]
    fn cli_parses_category_delete() {
        let cli = Cli::parse_from(["tally", "categories", "delete", "5", "--yes"]);
        match cli.command {
            Commands::Categories(CategoriesArgs {
                action: CategoryAction::Delete { id, yes },
            }) => {
                assert_eq!(id, 5);
                assert!(yes);
            }
            _ => panic!("expected categories delete"),
        }
    }

    #[test]
    fn cli_parses_transaction_add() {
        let cli = Cli::parse_from([
            "tally", "tx", "add", "Salary", "1000", "--type", "income", "--category", "1",
        ]);
        match cli.command {
            Commands::Transactions(TransactionsArgs {
                action: TransactionAction::Add(fields),
            }) => {
                assert_eq!(fields.description, "Salary");
                assert_eq!(fields.amount, 1000.0);
                assert_eq!(TransactionKind::from(fields.kind), TransactionKind::Income);
                assert_eq!(fields.category, 1);
            }
            _ => panic!("expected transactions add"),
        }
    }

    #[test]
    fn cli_transaction_kind_defaults_to_expense() {
        let cli = Cli::parse_from(["tally", "transactions", "add", "Lunch", "9.5", "--category", "2"]);
        match cli.command {
            Commands::Transactions(TransactionsArgs {
                action: TransactionAction::Add(fields),
            }) => assert_eq!(fields.kind, KindArg::Expense),
            _ => panic!("expected transactions add"),
        }
    }

    #[test]
    fn cli_rejects_negative_amount() {
        let result = Cli::try_parse_from(["tally", "tx", "add", "Lunch", "-5", "--category", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parses_summary_format() {
        let cli = Cli::parse_from(["tally", "summary", "--format", "json"]);
        match cli.command {
            Commands::Summary(args) => assert_eq!(args.format, OutputFormat::Json),
            _ => panic!("expected Summary command"),
        }
    }

    #[test]
    fn cli_verifies() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
