//! User CLI commands

use clap::Subcommand;

use crate::display::format_user;
use crate::error::LedgerResult;
use crate::models::Currency;
use crate::services::FinanceService;
use crate::storage::UserRepository;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user with the Expense, Emergency and Savings categories
    Create {
        /// User ID
        id: String,
        /// Currency code (defaults to the configured currency)
        #[arg(short, long)]
        currency: Option<String>,
    },

    /// Show a user's category balances
    Show {
        /// User ID
        id: String,
    },

    /// List all users
    List,
}

/// Handle a user command
pub fn handle_user_command<R: UserRepository + ?Sized>(
    service: &FinanceService<'_, R>,
    cmd: UserCommands,
) -> LedgerResult<()> {
    match cmd {
        UserCommands::Create { id, currency } => {
            let user = service.create_user(&id, currency.map(Currency::new))?;
            println!("Created user: {}", user.id);
            println!("  Currency: {}", user.currency);
            println!("  Categories: Expense, Emergency, Savings");
            println!();
            println!("Run 'arus rules set {}' to plan how income is allocated.", user.id);
        }

        UserCommands::Show { id } => {
            let user = service.get_user(&id)?;
            print!("{}", format_user(&user)?);
        }

        UserCommands::List => {
            let ids = service.list_users()?;
            if ids.is_empty() {
                println!("No users found.");
            } else {
                for id in ids {
                    println!("{}", id);
                }
            }
        }
    }

    Ok(())
}
