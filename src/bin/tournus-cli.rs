#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::time::Duration;
use tournus::{
    calendar::expand_month,
    io,
    scheduler::{ConsistencyRule, Policy, RosterRequest, Scheduler, SolveOptions},
    solver::SatBackend,
    views::{day_view, render_day_view, worker_view, Locale},
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification mensuelle des roulements
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ConsistencyArg {
    /// Poste reconduit sur les 3 jours suivants
    Block,
    /// Même poste sur deux jours travaillés consécutifs
    Adjacent,
}

impl From<ConsistencyArg> for ConsistencyRule {
    fn from(arg: ConsistencyArg) -> Self {
        match arg {
            ConsistencyArg::Block => ConsistencyRule::BlockLock,
            ConsistencyArg::Adjacent => ConsistencyRule::AdjacentDay,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Générer le roster d'un mois
    Plan {
        #[arg(long, required_unless_present = "request")]
        year: Option<i32>,
        #[arg(long, required_unless_present = "request")]
        month: Option<u32>,
        #[arg(long, default_value_t = 4)]
        workers: usize,
        #[arg(long, default_value_t = 1)]
        per_shift: usize,
        #[arg(long, default_value_t = 1)]
        min_weekly: usize,
        #[arg(long, default_value_t = 7)]
        max_weekly: usize,
        /// Bornes hebdomadaires au lieu du motif strict 4/2
        #[arg(long)]
        flexible: bool,
        /// Règle de cohérence (déduite du mode sinon)
        #[arg(long, value_enum)]
        consistency: Option<ConsistencyArg>,
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
        /// Demande complète au format JSON (remplace les options ci-dessus)
        #[arg(long)]
        request: Option<String>,
        /// en | pt
        #[arg(long, default_value = "en")]
        locale: String,
        #[arg(long)]
        out_days: Option<String>,
        #[arg(long)]
        out_workers: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
    },

    /// Afficher l'horizon d'un mois
    Calendar {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Plan {
            year,
            month,
            workers,
            per_shift,
            min_weekly,
            max_weekly,
            flexible,
            consistency,
            timeout_secs,
            request,
            locale,
            out_days,
            out_workers,
            out_json,
        } => {
            let locale: Locale = locale.parse().map_err(anyhow::Error::msg)?;
            let request = match request {
                Some(path) => io::load_request_json(path)?,
                None => {
                    let mut policy =
                        Policy::new(workers, per_shift, min_weekly, max_weekly, !flexible);
                    if let Some(rule) = consistency {
                        policy = policy.with_consistency(rule.into());
                    }
                    RosterRequest {
                        year: year.context("--year is required")?,
                        month: month.context("--month is required")?,
                        policy,
                    }
                }
            };

            let scheduler = Scheduler::new(SatBackend::new()).with_options(SolveOptions {
                time_budget: Duration::from_secs(timeout_secs),
            });
            let outcome = scheduler.plan(&request)?;

            if let Some(path) = out_json {
                io::export_outcome_json(path, &outcome)?;
            }

            println!("status: {}", outcome.status);
            match &outcome.assignment {
                Some(assignment) => {
                    let catalog = scheduler.catalog();
                    let days = day_view(&outcome.horizon, catalog, assignment);
                    if let Some(path) = out_days {
                        io::export_day_view_csv(path, &days, catalog, locale)?;
                    }
                    if let Some(path) = out_workers {
                        let rows = worker_view(&outcome.horizon, assignment);
                        io::export_worker_view_csv(path, &rows, catalog, locale)?;
                    }
                    print!("{}", render_day_view(&days, catalog, locale));
                    0
                }
                None => {
                    // Code 2 = roster introuvable (infaisable ou budget écoulé)
                    eprintln!(
                        "no roster for {}-{:02}: {}",
                        request.year, request.month, outcome.status
                    );
                    2
                }
            }
        }
        Commands::Calendar { year, month } => {
            let horizon = expand_month(year, month)?;
            for day in horizon.days() {
                println!(
                    "{:>2} | {} | {:?}{}",
                    day.index,
                    day.date,
                    day.weekday(),
                    if day.restricted { " | restricted" } else { "" }
                );
            }
            0
        }
    };

    std::process::exit(code);
}
