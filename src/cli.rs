use crate::commands;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use substitute_roster::config::AppConfig;
use substitute_roster::error::AppError;
use substitute_roster::reports::ReportArchive;
use substitute_roster::{telemetry, Database, ReportKind, VacancyStatus};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "roster",
    about = "Manage substitute professors, institutions and vacancies, and generate reports",
    version
)]
pub(crate) struct Cli {
    /// Override the configured SQLite store file
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Register and maintain substitute professors
    Professor {
        #[command(subcommand)]
        command: ProfessorCommand,
    },
    /// Register and maintain teaching institutions
    Institution {
        #[command(subcommand)]
        command: InstitutionCommand,
    },
    /// Open, assign and close vacancies
    Vacancy {
        #[command(subcommand)]
        command: VacancyCommand,
    },
    /// Render a report to stdout, optionally saving it
    Report(ReportArgs),
}

#[derive(Subcommand, Debug)]
pub(crate) enum ProfessorCommand {
    Add(ProfessorAddArgs),
    List,
    Show { id: i64 },
    Update(ProfessorUpdateArgs),
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub(crate) enum InstitutionCommand {
    Add(InstitutionAddArgs),
    List,
    Show { id: i64 },
    Update(InstitutionUpdateArgs),
    Delete { id: i64 },
}

#[derive(Subcommand, Debug)]
pub(crate) enum VacancyCommand {
    Add(VacancyAddArgs),
    List,
    Show { id: i64 },
    Update(VacancyUpdateArgs),
    Delete { id: i64 },
    /// Link a professor to the vacancy; omit the professor to unassign
    Assign { id: i64, professor: Option<i64> },
    /// Move the vacancy to Open, Filled or Cancelled
    Status { id: i64, status: VacancyStatus },
}

#[derive(Args, Debug)]
pub(crate) struct ProfessorAddArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) cpf: String,
    #[arg(long, default_value = "")]
    pub(crate) email: String,
    #[arg(long, default_value = "")]
    pub(crate) phone: String,
    #[arg(long, default_value = "")]
    pub(crate) specialty: String,
}

#[derive(Args, Debug)]
pub(crate) struct ProfessorUpdateArgs {
    pub(crate) id: i64,
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long)]
    pub(crate) cpf: Option<String>,
    #[arg(long)]
    pub(crate) email: Option<String>,
    #[arg(long)]
    pub(crate) phone: Option<String>,
    #[arg(long)]
    pub(crate) specialty: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct InstitutionAddArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) cnpj: String,
    #[arg(long, default_value = "")]
    pub(crate) address: String,
    #[arg(long, default_value = "")]
    pub(crate) city: String,
    #[arg(long, default_value = "")]
    pub(crate) state: String,
}

#[derive(Args, Debug)]
pub(crate) struct InstitutionUpdateArgs {
    pub(crate) id: i64,
    #[arg(long)]
    pub(crate) name: Option<String>,
    #[arg(long)]
    pub(crate) cnpj: Option<String>,
    #[arg(long)]
    pub(crate) address: Option<String>,
    #[arg(long)]
    pub(crate) city: Option<String>,
    #[arg(long)]
    pub(crate) state: Option<String>,
}

/// Numeric fields stay raw text so the intake form can report what was typed.
#[derive(Args, Debug)]
pub(crate) struct VacancyAddArgs {
    #[arg(long)]
    pub(crate) institution: String,
    #[arg(long)]
    pub(crate) subject: String,
    #[arg(long, default_value = "")]
    pub(crate) workload: String,
    #[arg(long, default_value = "")]
    pub(crate) salary: String,
    #[arg(long, default_value = "")]
    pub(crate) description: String,
}

/// Edits go back through the intake form, so raw text is kept here too.
#[derive(Args, Debug)]
pub(crate) struct VacancyUpdateArgs {
    pub(crate) id: i64,
    #[arg(long)]
    pub(crate) institution: Option<String>,
    #[arg(long)]
    pub(crate) subject: Option<String>,
    #[arg(long)]
    pub(crate) workload: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub(crate) salary: Option<String>,
    #[arg(long)]
    pub(crate) description: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// professores, instituicoes, vagas, completo, demanda, aging or salarios
    pub(crate) kind: ReportKind,
    /// Output format: text or csv
    #[arg(long, default_value = "text")]
    pub(crate) format: String,
    /// Vacancy report only: keep vacancies with this status
    #[arg(long)]
    pub(crate) status: Option<VacancyStatus>,
    /// Demand report only: count open vacancies
    #[arg(long)]
    pub(crate) open_only: bool,
    /// Also write the text report into the output directory
    #[arg(long)]
    pub(crate) save: bool,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let db_path = cli.db.unwrap_or(config.storage.db_path);
    debug!(environment = ?config.environment, path = %db_path.display(), "starting roster");
    let db = Database::open(&db_path)?;

    match cli.command {
        Command::Professor { command } => commands::professor(&db, command),
        Command::Institution { command } => commands::institution(&db, command),
        Command::Vacancy { command } => commands::vacancy(&db, command),
        Command::Report(args) => {
            let archive = ReportArchive::new(config.reports.output_dir);
            commands::report(&db, &archive, args)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn report_flags_parse_into_typed_values() {
        let cli = Cli::try_parse_from([
            "roster",
            "--db",
            "data/roster.db",
            "report",
            "vagas",
            "--format",
            "csv",
            "--status",
            "preenchida",
            "--save",
        ])
        .expect("valid invocation");

        assert_eq!(cli.db, Some(PathBuf::from("data/roster.db")));
        match cli.command {
            Command::Report(args) => {
                assert_eq!(args.kind, ReportKind::Vacancies);
                assert_eq!(args.format, "csv");
                assert_eq!(args.status, Some(VacancyStatus::Filled));
                assert!(args.save);
                assert!(!args.open_only);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_report_kind_is_rejected() {
        assert!(Cli::try_parse_from(["roster", "report", "relatorio"]).is_err());
    }

    #[test]
    fn assign_without_professor_means_unassign() {
        let cli = Cli::try_parse_from(["roster", "vacancy", "assign", "3"])
            .expect("valid invocation");
        assert!(matches!(
            cli.command,
            Command::Vacancy {
                command: VacancyCommand::Assign {
                    id: 3,
                    professor: None
                }
            }
        ));
    }
}
