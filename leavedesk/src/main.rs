//! leavedesk command-line shell.
//!
//! Each invocation loads the store, runs one command through the
//! [`LeaveController`], prints the outcome, and exits with a stable code
//! (see [`leavedesk::exit_codes`]).

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};

use leavedesk::controller::LeaveController;
use leavedesk::core::catalog::LeaveCatalog;
use leavedesk::core::error::LeaveError;
use leavedesk::core::ledger::{LeaveApplication, ReviewDecision};
use leavedesk::core::types::{Balances, LeaveType, Outcome};
use leavedesk::exit_codes;
use leavedesk::io::config::load_config;
use leavedesk::io::init::{InitOptions, init_store};
use leavedesk::io::store::{FileBackend, RecordStore, StoreError};
use leavedesk::logging;

#[derive(Parser)]
#[command(
    name = "leavedesk",
    version,
    about = "Leave requests, approvals, and balance accounting"
)]
struct Cli {
    /// Config file (TOML). A missing file means built-in defaults.
    #[arg(long, global = true, default_value = "leavedesk.toml")]
    config: PathBuf,

    /// Store document to operate on (overrides `store_path` from config).
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an empty store document (and config file if missing).
    Init {
        /// Overwrite an existing store.
        #[arg(short, long)]
        force: bool,
    },
    #[command(flatten)]
    Ledger(LedgerCommand),
}

#[derive(Subcommand)]
enum LedgerCommand {
    /// Register a new employee. Built-in balances default to 0.
    Register {
        name: String,
        #[command(flatten)]
        balances: BalanceArgs,
        /// Grant manager rights (bulk approval).
        #[arg(long)]
        manager: bool,
    },
    /// Update balances and/or manager status. Unspecified balances keep their value.
    Edit {
        name: String,
        #[command(flatten)]
        balances: BalanceArgs,
        #[arg(long, value_name = "BOOL")]
        manager: Option<bool>,
    },
    /// Remove an employee together with their leave history.
    Remove { name: String },
    /// Manage holidays (dates on which leave cannot start).
    Holiday {
        #[command(subcommand)]
        action: HolidayCommand,
    },
    /// List registered employees.
    Employees,
    /// Show remaining balances.
    Balance {
        name: String,
        #[arg(long = "type")]
        leave_type: Option<String>,
    },
    /// Submit a leave request; days are deducted immediately.
    Request {
        name: String,
        #[arg(long = "type")]
        leave_type: Option<String>,
        #[arg(long)]
        days: Option<String>,
        /// First day of leave (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,
    },
    /// Cancel a pending or approved request and refund its days.
    Cancel {
        name: String,
        #[arg(long = "type")]
        leave_type: Option<String>,
        #[arg(long)]
        start: Option<String>,
    },
    /// Show every request of an employee.
    History { name: String },
    /// Manager approval of all pending requests of TARGET.
    Approve { actor: String, target: String },
    /// List employees awaiting review, or the pending requests of one employee.
    Pending { name: Option<String> },
    /// Approve or deny one request by its number (see `pending NAME`).
    Review {
        name: String,
        number: usize,
        decision: Decision,
    },
}

#[derive(Subcommand)]
enum HolidayCommand {
    /// Register a holiday (YYYY-MM-DD, today or later).
    Add { date: String },
    /// List registered holidays.
    List,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Decision {
    Approve,
    Deny,
}

impl From<Decision> for ReviewDecision {
    fn from(value: Decision) -> Self {
        match value {
            Decision::Approve => ReviewDecision::Approve,
            Decision::Deny => ReviewDecision::Deny,
        }
    }
}

#[derive(Args, Debug, Default, Clone)]
struct BalanceArgs {
    #[arg(long, value_name = "DAYS")]
    sick: Option<u32>,
    #[arg(long, value_name = "DAYS")]
    annual: Option<u32>,
    #[arg(long, value_name = "DAYS")]
    maternity: Option<u32>,
    /// Balance for any recognized type, as `TYPE=DAYS` (repeatable).
    #[arg(long = "leave", value_name = "TYPE=DAYS")]
    leave: Vec<String>,
}

impl BalanceArgs {
    fn is_empty(&self) -> bool {
        self.sick.is_none()
            && self.annual.is_none()
            && self.maternity.is_none()
            && self.leave.is_empty()
    }

    /// Overlay the given balances on `base`.
    fn apply(&self, mut base: Balances, catalog: &LeaveCatalog) -> Result<Balances, LeaveError> {
        let built_in = [
            (LeaveType::Sick, self.sick),
            (LeaveType::Annual, self.annual),
            (LeaveType::Maternity, self.maternity),
        ];
        for (kind, days) in built_in {
            if let Some(days) = days {
                base.insert(kind, days);
            }
        }
        for entry in &self.leave {
            let (name, days) = entry
                .rsplit_once('=')
                .ok_or_else(|| LeaveError::InvalidDays {
                    input: entry.clone(),
                })?;
            let kind = catalog
                .resolve(name)
                .ok_or_else(|| LeaveError::UnknownLeaveType {
                    input: name.trim().to_string(),
                })?;
            let days = days
                .trim()
                .parse::<u32>()
                .map_err(|_| LeaveError::InvalidDays {
                    input: days.trim().to_string(),
                })?;
            base.insert(kind, days);
        }
        Ok(base)
    }
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            if err.downcast_ref::<StoreError>().is_some() {
                exit_codes::STORE_UNREADABLE
            } else {
                exit_codes::INVALID
            }
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    let cfg = load_config(&cli.config)?;
    let base = cli
        .config
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let mut paths = cfg.store_paths(base);
    if let Some(store) = cli.store {
        paths.store_path = store;
    }

    let command = match cli.command {
        Command::Init { force } => {
            init_store(&paths, &cli.config, &cfg, &InitOptions { force })?;
            println!("Initialized {}", paths.store_path.display());
            return Ok(exit_codes::OK);
        }
        Command::Ledger(command) => command,
    };

    let mut store = RecordStore::load(&paths)?;
    let mut controller = LeaveController::new(&mut store, cfg.catalog());
    let outcome = dispatch(&mut controller, command)?;
    Ok(report(&outcome))
}

fn dispatch(controller: &mut LeaveController<'_, FileBackend>, command: LedgerCommand) -> Result<Outcome> {
    let outcome = match command {
        LedgerCommand::Register {
            name,
            balances,
            manager,
        } => {
            let base = LeaveType::BUILT_IN.into_iter().map(|kind| (kind, 0)).collect();
            match balances.apply(base, controller.catalog()) {
                Ok(initial) => controller.register(&name, initial, manager)?,
                Err(err) => Outcome::Rejected(err),
            }
        }
        LedgerCommand::Edit {
            name,
            balances,
            manager,
        } => {
            let new_balances = if balances.is_empty() {
                Ok(None)
            } else {
                let current = controller
                    .store()
                    .document()
                    .employees
                    .get(&name)
                    .map(|employee| employee.leave_balance.clone())
                    .unwrap_or_default();
                balances.apply(current, controller.catalog()).map(Some)
            };
            match new_balances {
                Ok(new_balances) => controller.edit(&name, new_balances, manager)?,
                Err(err) => Outcome::Rejected(err),
            }
        }
        LedgerCommand::Remove { name } => controller.remove(&name)?,
        LedgerCommand::Holiday { action } => match action {
            HolidayCommand::Add { date } => controller.add_holiday(&date)?,
            HolidayCommand::List => controller.list_holidays(),
        },
        LedgerCommand::Employees => controller.list_employees(),
        LedgerCommand::Balance { name, leave_type } => {
            controller.check_balance(&name, leave_type.as_deref())
        }
        LedgerCommand::Request {
            name,
            leave_type,
            days,
            start,
        } => controller.request_leave(
            &name,
            LeaveApplication {
                leave_type: leave_type.as_deref(),
                days: days.as_deref(),
                start_date: start.as_deref(),
            },
        )?,
        LedgerCommand::Cancel {
            name,
            leave_type,
            start,
        } => controller.cancel_leave(&name, leave_type.as_deref(), start.as_deref())?,
        LedgerCommand::History { name } => controller.view_history(&name),
        LedgerCommand::Approve { actor, target } => controller.approve_leave(&actor, &target)?,
        LedgerCommand::Pending { name } => match name {
            Some(name) => controller.pending_requests(&name),
            None => controller.pending_queue(),
        },
        LedgerCommand::Review {
            name,
            number,
            decision,
        } => controller.review_request(&name, number, decision.into())?,
    };
    Ok(outcome)
}

fn report(outcome: &Outcome) -> i32 {
    match outcome {
        Outcome::Success(message) => {
            println!("{message}");
            exit_codes::OK
        }
        Outcome::Rejected(err) => {
            eprintln!("{err}");
            exit_codes::REJECTED
        }
    }
}
