use crate::cli::{
    InstitutionCommand, ProfessorCommand, ReportArgs, VacancyCommand, VacancyUpdateArgs,
};
use serde_json::{Map, Value};
use substitute_roster::error::AppError;
use substitute_roster::forms::{InstitutionForm, ProfessorForm, VacancyForm};
use substitute_roster::reports::{report_file_name, ReportArchive, ReportOptions};
use substitute_roster::store::Entity;
use substitute_roster::{
    Database, Institution, Professor, ReportFormat, ReportGenerator, Repository, Vacancy,
};
use tracing::warn;

fn print_row(fields: Map<String, Value>) {
    println!("{}", Value::Object(fields));
}

fn print_record(fields: Map<String, Value>) {
    match serde_json::to_string_pretty(&fields) {
        Ok(text) => println!("{text}"),
        Err(_) => print_row(fields),
    }
}

fn require<E: Entity>(repository: &Repository<'_, E>, id: i64) -> Result<E, AppError> {
    repository.get(id)?.ok_or(AppError::NotFound {
        entity: E::KIND,
        id,
    })
}

fn delete<E: Entity>(repository: Repository<'_, E>, id: i64) -> Result<(), AppError> {
    if !repository.delete(id)? {
        return Err(AppError::NotFound {
            entity: E::KIND,
            id,
        });
    }
    println!("{} {id} removed", E::KIND);
    Ok(())
}

fn save<E: Entity>(repository: &Repository<'_, E>, entity: &E) -> Result<(), AppError> {
    let id = entity.id().unwrap_or_default();
    if !repository.update(entity)? {
        return Err(AppError::NotFound {
            entity: E::KIND,
            id,
        });
    }
    println!("{} {id} updated", E::KIND);
    Ok(())
}

pub(crate) fn professor(db: &Database, command: ProfessorCommand) -> Result<(), AppError> {
    let professors = db.professors();
    match command {
        ProfessorCommand::Add(args) => {
            let professor = ProfessorForm {
                name: args.name,
                cpf: args.cpf,
                email: args.email,
                phone: args.phone,
                specialty: args.specialty,
            }
            .into_professor()?;
            let id = professors.insert(&professor)?;
            println!("professor {id} registered");
        }
        ProfessorCommand::List => {
            for professor in professors.list()? {
                print_row(professor.fields());
            }
        }
        ProfessorCommand::Show { id } => print_record(require(&professors, id)?.fields()),
        ProfessorCommand::Update(args) => {
            let stored = require(&professors, args.id)?;
            let mut form = ProfessorForm::from(&stored);
            if let Some(name) = args.name {
                form.name = name;
            }
            if let Some(cpf) = args.cpf {
                form.cpf = cpf;
            }
            if let Some(email) = args.email {
                form.email = email;
            }
            if let Some(phone) = args.phone {
                form.phone = phone;
            }
            if let Some(specialty) = args.specialty {
                form.specialty = specialty;
            }
            let professor = Professor {
                id: stored.id,
                ..form.into_professor()?
            };
            save(&professors, &professor)?;
        }
        ProfessorCommand::Delete { id } => delete(professors, id)?,
    }
    Ok(())
}

pub(crate) fn institution(db: &Database, command: InstitutionCommand) -> Result<(), AppError> {
    let institutions = db.institutions();
    match command {
        InstitutionCommand::Add(args) => {
            let institution = InstitutionForm {
                name: args.name,
                cnpj: args.cnpj,
                address: args.address,
                city: args.city,
                state: args.state,
            }
            .into_institution()?;
            let id = institutions.insert(&institution)?;
            println!("institution {id} registered");
        }
        InstitutionCommand::List => {
            for institution in institutions.list()? {
                print_row(institution.fields());
            }
        }
        InstitutionCommand::Show { id } => print_record(require(&institutions, id)?.fields()),
        InstitutionCommand::Update(args) => {
            let stored = require(&institutions, args.id)?;
            let mut form = InstitutionForm::from(&stored);
            if let Some(name) = args.name {
                form.name = name;
            }
            if let Some(cnpj) = args.cnpj {
                form.cnpj = cnpj;
            }
            if let Some(address) = args.address {
                form.address = address;
            }
            if let Some(city) = args.city {
                form.city = city;
            }
            if let Some(state) = args.state {
                form.state = state;
            }
            let institution = Institution {
                id: stored.id,
                ..form.into_institution()?
            };
            save(&institutions, &institution)?;
        }
        InstitutionCommand::Delete { id } => delete(institutions, id)?,
    }
    Ok(())
}

pub(crate) fn vacancy(db: &Database, command: VacancyCommand) -> Result<(), AppError> {
    let vacancies = db.vacancies();
    match command {
        VacancyCommand::Add(args) => {
            let vacancy = VacancyForm {
                institution_id: args.institution,
                subject: args.subject,
                workload_hours: args.workload,
                salary: args.salary,
                description: args.description,
            }
            .into_vacancy()?;
            if db.institutions().get(vacancy.institution_id)?.is_none() {
                warn!(
                    institution_id = vacancy.institution_id,
                    "vacancy references an unknown institution"
                );
            }
            let id = vacancies.insert(&vacancy)?;
            println!("vacancy {id} opened");
        }
        VacancyCommand::List => {
            for vacancy in vacancies.list()? {
                print_row(vacancy.fields());
            }
        }
        VacancyCommand::Show { id } => print_record(require(&vacancies, id)?.fields()),
        VacancyCommand::Update(args) => {
            let vacancy = apply_update(require(&vacancies, args.id)?, args)?;
            save(&vacancies, &vacancy)?;
        }
        VacancyCommand::Delete { id } => delete(vacancies, id)?,
        VacancyCommand::Assign { id, professor } => {
            let mut vacancy = require(&vacancies, id)?;
            if let Some(professor_id) = professor {
                require(&db.professors(), professor_id)?;
            }
            vacancy.professor_id = professor;
            save(&vacancies, &vacancy)?;
        }
        VacancyCommand::Status { id, status } => {
            let vacancy = require(&vacancies, id)?.with_status(status);
            save(&vacancies, &vacancy)?;
        }
    }
    Ok(())
}

/// Revalidates the edited fields; status, assignment and stamp are kept.
fn apply_update(stored: Vacancy, args: VacancyUpdateArgs) -> Result<Vacancy, AppError> {
    let mut form = VacancyForm::from(&stored);
    if let Some(institution_id) = args.institution {
        form.institution_id = institution_id;
    }
    if let Some(subject) = args.subject {
        form.subject = subject;
    }
    if let Some(workload) = args.workload {
        form.workload_hours = workload;
    }
    if let Some(salary) = args.salary {
        form.salary = salary;
    }
    if let Some(description) = args.description {
        form.description = description;
    }

    Ok(Vacancy {
        id: stored.id,
        status: stored.status,
        professor_id: stored.professor_id,
        created_at: stored.created_at,
        ..form.into_vacancy()?
    })
}

pub(crate) fn report(
    db: &Database,
    archive: &ReportArchive,
    args: ReportArgs,
) -> Result<(), AppError> {
    let generator = ReportGenerator::new(db);
    let options = ReportOptions {
        status: args.status,
        open_only: args.open_only,
    };

    let output = generator.generate(args.kind, &args.format, options)?;
    if output.is_empty() {
        warn!(format = %args.format, "nothing rendered; expected text or csv");
    } else {
        println!("{output}");
    }

    if args.save {
        let body = if ReportFormat::from_selector(&args.format) == Some(ReportFormat::Text) {
            output
        } else {
            generator.render(args.kind, ReportFormat::Text, options)?
        };
        let file_name = report_file_name(args.kind, generator.generated_at());
        match archive.save(&body, &file_name) {
            Ok(path) => println!("Relatório salvo em: {}", path.display()),
            Err(err) => warn!(error = %err, "report was not saved"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ProfessorUpdateArgs;
    use substitute_roster::forms::FormError;
    use substitute_roster::{FixedClock, VacancyStatus};

    fn store() -> Database {
        let now = chrono::NaiveDate::from_ymd_opt(2025, 11, 3)
            .and_then(|date| date.and_hms_opt(9, 0, 0))
            .expect("valid timestamp");
        Database::open_in_memory()
            .expect("in-memory store")
            .with_clock(FixedClock(now))
    }

    #[test]
    fn assigning_unknown_professor_is_not_found() {
        let db = store();
        let id = db
            .vacancies()
            .insert(&Vacancy::new(1, "Matematica", 20, 3500.0))
            .expect("insert vacancy");

        let err = vacancy(
            &db,
            VacancyCommand::Assign {
                id,
                professor: Some(9),
            },
        )
        .expect_err("professor 9 does not exist");
        assert!(matches!(
            err,
            AppError::NotFound {
                entity: "professor",
                id: 9
            }
        ));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn assign_and_status_change_persist() {
        let db = store();
        let ana = db
            .professors()
            .insert(&Professor::new("Ana Silva", "11122233344"))
            .expect("insert professor");
        let id = db
            .vacancies()
            .insert(&Vacancy::new(1, "Matematica", 20, 3500.0))
            .expect("insert vacancy");

        vacancy(
            &db,
            VacancyCommand::Assign {
                id,
                professor: Some(ana),
            },
        )
        .expect("assign");
        vacancy(
            &db,
            VacancyCommand::Status {
                id,
                status: VacancyStatus::Filled,
            },
        )
        .expect("fill");

        let stored = db.vacancies().get(id).expect("get").expect("present");
        assert_eq!(stored.professor_id, Some(ana));
        assert_eq!(stored.status, VacancyStatus::Filled);
        assert_eq!(stored.created_at.as_deref(), Some("2025-11-03 09:00:00"));
    }

    #[test]
    fn update_keeps_untouched_fields() {
        let db = store();
        let school = db
            .institutions()
            .insert(&Institution::new("Escola A", "1"))
            .expect("insert institution");
        let id = db
            .vacancies()
            .insert(&Vacancy::new(school, "Matematica", 20, 3500.0))
            .expect("insert vacancy");

        vacancy(
            &db,
            VacancyCommand::Update(VacancyUpdateArgs {
                id,
                institution: None,
                subject: None,
                workload: None,
                salary: Some("3900".to_string()),
                description: None,
            }),
        )
        .expect("update");

        let stored = db.vacancies().get(id).expect("get").expect("present");
        assert_eq!(stored.salary, 3900.0);
        assert_eq!(stored.subject, "Matematica");
        assert_eq!(stored.institution_id, school);
    }

    #[test]
    fn update_rejects_blank_identity_fields() {
        let db = store();
        let id = db
            .professors()
            .insert(&Professor::new("Ana Silva", "11122233344"))
            .expect("insert professor");

        let err = professor(
            &db,
            ProfessorCommand::Update(ProfessorUpdateArgs {
                id,
                name: Some("   ".to_string()),
                cpf: Some(String::new()),
                email: None,
                phone: None,
                specialty: None,
            }),
        )
        .expect_err("blank name");
        assert!(matches!(err, AppError::Form(FormError::MissingField("name"))));
        assert_eq!(err.exit_code(), 2);

        let stored = db.professors().get(id).expect("get").expect("present");
        assert_eq!(stored.name, "Ana Silva");
        assert_eq!(stored.cpf, "11122233344");
    }

    #[test]
    fn vacancy_update_revalidates_and_keeps_lifecycle_fields() {
        let db = store();
        let ana = db
            .professors()
            .insert(&Professor::new("Ana Silva", "11122233344"))
            .expect("insert professor");
        let mut filled =
            Vacancy::new(1, "Matematica", 20, 3500.0).with_status(VacancyStatus::Filled);
        filled.professor_id = Some(ana);
        let id = db.vacancies().insert(&filled).expect("insert vacancy");

        let rejected = vacancy(
            &db,
            VacancyCommand::Update(VacancyUpdateArgs {
                id,
                institution: Some("0".to_string()),
                subject: Some(String::new()),
                workload: None,
                salary: Some("-50".to_string()),
                description: None,
            }),
        )
        .expect_err("invalid edit");
        assert_eq!(rejected.exit_code(), 2);

        vacancy(
            &db,
            VacancyCommand::Update(VacancyUpdateArgs {
                id,
                institution: None,
                subject: Some("  Fisica ".to_string()),
                workload: None,
                salary: None,
                description: None,
            }),
        )
        .expect("valid edit");

        let stored = db.vacancies().get(id).expect("get").expect("present");
        assert_eq!(stored.subject, "Fisica");
        assert_eq!(stored.salary, 3500.0);
        assert_eq!(stored.status, VacancyStatus::Filled);
        assert_eq!(stored.professor_id, Some(ana));
        assert_eq!(stored.created_at.as_deref(), Some("2025-11-03 09:00:00"));
    }

    #[test]
    fn deleting_missing_record_is_not_found() {
        let db = store();
        let err = institution(&db, InstitutionCommand::Delete { id: 42 })
            .expect_err("nothing to delete");
        assert_eq!(err.to_string(), "institution 42 not found");
    }

    #[test]
    fn saved_report_is_written_even_for_csv_requests() {
        let db = store();
        let root = tempfile::tempdir().expect("temp dir");
        let archive = ReportArchive::new(root.path().join("output"));

        report(
            &db,
            &archive,
            ReportArgs {
                kind: substitute_roster::ReportKind::Full,
                format: "csv".to_string(),
                status: None,
                open_only: false,
                save: true,
            },
        )
        .expect("report");

        let saved = root
            .path()
            .join("output")
            .join("relatorio_completo_20251103_090000.txt");
        let body = std::fs::read_to_string(saved).expect("saved report");
        assert!(body.contains("RELATÓRIO COMPLETO DO SISTEMA"));
    }
}
