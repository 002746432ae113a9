use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use arus::cli::{
    handle_expense, handle_income, handle_report, handle_rules_command, handle_statement,
    handle_user_command, EntryArgs, ReportArgs, RulesCommands, StatementArgs, UserCommands,
};
use arus::config::{ArusPaths, Settings};
use arus::logging::{init_logging, resolve_level};
use arus::services::FinanceService;
use arus::storage::JsonUserRepository;

#[derive(Parser)]
#[command(
    name = "arus",
    version,
    about = "Personal budgeting ledger with income allocation rules",
    long_about = "arus splits each income across Expense, Emergency and Savings \
                  categories by your allocation rules, and pays expenses from \
                  Expense first, then Emergency, then Savings."
)]
struct Cli {
    /// Log filter (e.g. "debug", "arus=info")
    #[arg(long, global = true, env = "ARUS_LOG")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and settings
    Init,

    /// Show current configuration and paths
    Config,

    /// User management commands
    #[command(subcommand)]
    User(UserCommands),

    /// Allocation rule commands
    #[command(subcommand)]
    Rules(RulesCommands),

    /// Record an income and allocate it across categories
    Income(EntryArgs),

    /// Record an expense and deduct it through the waterfall
    Expense(EntryArgs),

    /// Import a bank statement CSV and deduct its expenses
    Statement(StatementArgs),

    /// Summarize income and expenses for a period
    Report(ReportArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = ArusPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    init_logging(&resolve_level(cli.log_level.as_deref(), &settings));
    debug!(base_dir = %paths.base_dir().display(), "paths resolved");

    let repo = JsonUserRepository::open(paths.users_file())?;
    let service = FinanceService::with_settings(&repo, &settings);

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing arus at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'arus user create <id>' to create a user.");
        }
        Some(Commands::Config) => {
            println!("arus Configuration");
            println!("==================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Users file:      {}", paths.users_file().display());
            println!("Initialized:     {}", paths.is_initialized());
            println!();
            println!("Settings:");
            println!("  Default currency: {}", settings.default_currency);
            println!("  Deduction policy: {}", settings.deduction_policy);
            println!("  Log level:        {}", settings.log_level);
            println!("  Date format:      {}", settings.date_format);
        }
        Some(Commands::User(cmd)) => handle_user_command(&service, cmd)?,
        Some(Commands::Rules(cmd)) => handle_rules_command(&service, cmd)?,
        Some(Commands::Income(args)) => handle_income(&service, &settings, args)?,
        Some(Commands::Expense(args)) => handle_expense(&service, &settings, args)?,
        Some(Commands::Statement(args)) => handle_statement(&service, args)?,
        Some(Commands::Report(args)) => handle_report(&service, &settings, args)?,
        None => {
            println!("arus - personal budgeting ledger");
            println!();
            println!("Run 'arus --help' for usage information.");
        }
    }

    Ok(())
}
