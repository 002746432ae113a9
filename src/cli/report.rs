//! Report CLI command

use chrono::Local;
use clap::Args;

use crate::config::Settings;
use crate::display::format_period_summary;
use crate::error::LedgerResult;
use crate::models::Period;
use crate::services::FinanceService;
use crate::storage::UserRepository;

/// Arguments for `report`
#[derive(Args)]
pub struct ReportArgs {
    /// User ID
    pub user: String,
    /// Period: "YYYY-MM" or "YYYY-MM-DD..YYYY-MM-DD" (defaults to this month)
    #[arg(short, long)]
    pub period: Option<String>,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Summarize a period and report whether income covered expenses
pub fn handle_report<R: UserRepository + ?Sized>(
    service: &FinanceService<'_, R>,
    settings: &Settings,
    args: ReportArgs,
) -> LedgerResult<()> {
    let period = match args.period.as_deref() {
        Some(s) => Period::parse(s)?,
        None => Period::month_of(Local::now().date_naive()),
    };

    let summary = service.period_summary(&args.user, &period)?;
    let status = service.income_status(&args.user, &period)?;

    if args.json {
        let report = serde_json::json!({
            "summary": summary,
            "net": summary.net()?,
            "reserves_drawn": summary.reserves_drawn(),
            "status": status,
            "message": status.to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!(
            "{}",
            format_period_summary(&summary, &status, &settings.date_format)?
        );
    }
    Ok(())
}
