mod aggregate;
mod archive;
mod tabular;
mod text;
pub mod views;

pub use archive::{report_file_name, ArchiveError, ReportArchive};

use crate::domain::{Institution, Professor, Vacancy, VacancyStatus};
use crate::store::{Database, StoreError};
use chrono::NaiveDateTime;
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use views::{
    AgingEntry, SalaryBand, SubjectDemand, SystemOverview, VacancyLine, MISSING_REFERENCE,
};

/// Output flavour of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Csv,
}

impl ReportFormat {
    /// Recognizes exactly `text` and `csv`.
    pub fn from_selector(selector: &str) -> Option<Self> {
        match selector {
            "text" => Some(Self::Text),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Every report the generator can produce, keyed by its file slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Professors,
    Institutions,
    Vacancies,
    Full,
    Demand,
    Aging,
    Salaries,
}

impl ReportKind {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Professors,
            Self::Institutions,
            Self::Vacancies,
            Self::Full,
            Self::Demand,
            Self::Aging,
            Self::Salaries,
        ]
    }

    /// Name used in `relatorio_<slug>_<stamp>.txt`.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Professors => "professores",
            Self::Institutions => "instituicoes",
            Self::Vacancies => "vagas",
            Self::Full => "completo",
            Self::Demand => "demanda",
            Self::Aging => "aging",
            Self::Salaries => "salarios",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown report '{0}'")]
pub struct UnknownReport(pub String);

impl FromStr for ReportKind {
    type Err = UnknownReport;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ordered()
            .into_iter()
            .find(|kind| kind.slug() == wanted)
            .ok_or_else(|| UnknownReport(value.to_string()))
    }
}

/// Filters that only some reports honour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Vacancy report: keep only this status.
    pub status: Option<VacancyStatus>,
    /// Demand report: count open vacancies only.
    pub open_only: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("report is not valid utf-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Builds reports from a snapshot of the store taken at call time.
#[derive(Debug)]
pub struct ReportGenerator<'a> {
    db: &'a Database,
    now: NaiveDateTime,
}

impl<'a> ReportGenerator<'a> {
    /// Generator stamped with the store clock's current time.
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            now: db.clock().now(),
        }
    }

    /// Overrides the instant used for headers and aging.
    pub fn at(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    pub fn generated_at(&self) -> NaiveDateTime {
        self.now
    }

    /// Renders `kind` for a raw format selector.
    ///
    /// Selectors other than `text` and `csv` produce an empty string rather
    /// than an error.
    pub fn generate(
        &self,
        kind: ReportKind,
        selector: &str,
        options: ReportOptions,
    ) -> Result<String, ReportError> {
        match ReportFormat::from_selector(selector) {
            Some(format) => self.render(kind, format, options),
            None => {
                debug!(%kind, selector, "unrecognized report format, returning empty output");
                Ok(String::new())
            }
        }
    }

    pub fn render(
        &self,
        kind: ReportKind,
        format: ReportFormat,
        options: ReportOptions,
    ) -> Result<String, ReportError> {
        debug!(%kind, ?format, "rendering report");
        match kind {
            ReportKind::Professors => self.professors(format),
            ReportKind::Institutions => self.institutions(format),
            ReportKind::Vacancies => self.vacancies(format, options.status),
            ReportKind::Full => self.full(format),
            ReportKind::Demand => self.demand_by_subject(format, options.open_only),
            ReportKind::Aging => self.open_vacancy_aging(format),
            ReportKind::Salaries => self.salary_by_subject(format),
        }
    }

    pub fn professors(&self, format: ReportFormat) -> Result<String, ReportError> {
        let professors: Vec<Professor> = self.db.professors().list()?;
        match format {
            ReportFormat::Text => Ok(text::professors(&professors, self.now)),
            ReportFormat::Csv => tabular::professors(&professors),
        }
    }

    pub fn institutions(&self, format: ReportFormat) -> Result<String, ReportError> {
        let institutions: Vec<Institution> = self.db.institutions().list()?;
        match format {
            ReportFormat::Text => Ok(text::institutions(&institutions, self.now)),
            ReportFormat::Csv => tabular::institutions(&institutions),
        }
    }

    pub fn vacancies(
        &self,
        format: ReportFormat,
        status: Option<VacancyStatus>,
    ) -> Result<String, ReportError> {
        let rows = self.vacancy_lines(status)?;
        match format {
            ReportFormat::Text => Ok(text::vacancies(&rows, status, self.now)),
            ReportFormat::Csv => tabular::vacancies(&rows),
        }
    }

    pub fn full(&self, format: ReportFormat) -> Result<String, ReportError> {
        let overview = self.overview()?;
        match format {
            ReportFormat::Text => Ok(text::overview(&overview, self.now)),
            ReportFormat::Csv => tabular::overview(&overview),
        }
    }

    pub fn demand_by_subject(
        &self,
        format: ReportFormat,
        open_only: bool,
    ) -> Result<String, ReportError> {
        let entries = self.subject_demand(open_only)?;
        match format {
            ReportFormat::Text => Ok(text::demand(&entries, open_only, self.now)),
            ReportFormat::Csv => tabular::demand(&entries),
        }
    }

    pub fn open_vacancy_aging(&self, format: ReportFormat) -> Result<String, ReportError> {
        let entries = self.aging_entries()?;
        match format {
            ReportFormat::Text => Ok(text::aging(&entries, self.now)),
            ReportFormat::Csv => tabular::aging(&entries),
        }
    }

    pub fn salary_by_subject(&self, format: ReportFormat) -> Result<String, ReportError> {
        let bands = self.salary_bands()?;
        match format {
            ReportFormat::Text => Ok(text::salaries(&bands, self.now)),
            ReportFormat::Csv => tabular::salaries(&bands),
        }
    }

    /// Vacancies with institution and professor names resolved.
    pub fn vacancy_lines(
        &self,
        status: Option<VacancyStatus>,
    ) -> Result<Vec<VacancyLine>, ReportError> {
        let institutions = self.db.institutions();
        let professors = self.db.professors();

        self.db
            .vacancies()
            .list()?
            .into_iter()
            .filter(|vacancy| status.map_or(true, |wanted| vacancy.status == wanted))
            .map(|vacancy| -> Result<VacancyLine, ReportError> {
                let institution_name = institutions
                    .get(vacancy.institution_id)?
                    .map(|institution| institution.name)
                    .unwrap_or_else(|| MISSING_REFERENCE.to_string());
                let professor_name = match vacancy.professor_id {
                    Some(id) => Some(
                        professors
                            .get(id)?
                            .map(|professor| professor.name)
                            .unwrap_or_else(|| MISSING_REFERENCE.to_string()),
                    ),
                    None => None,
                };
                Ok(VacancyLine {
                    vacancy,
                    institution_name,
                    professor_name,
                })
            })
            .collect()
    }

    pub fn overview(&self) -> Result<SystemOverview, ReportError> {
        let vacancies = self.db.vacancies().list()?;
        Ok(SystemOverview {
            professors: self.db.professors().count()?,
            institutions: self.db.institutions().count()?,
            vacancies: vacancies.len(),
            by_status: aggregate::status_counts(&vacancies),
            open_by_subject: aggregate::demand_by_subject(
                vacancies.iter().filter(|vacancy| vacancy.is_open()),
            ),
        })
    }

    pub fn subject_demand(&self, open_only: bool) -> Result<Vec<SubjectDemand>, ReportError> {
        let vacancies = self.db.vacancies().list()?;
        Ok(aggregate::demand_by_subject(
            vacancies
                .iter()
                .filter(|vacancy| !open_only || vacancy.is_open()),
        ))
    }

    pub fn aging_entries(&self) -> Result<Vec<AgingEntry>, ReportError> {
        let vacancies: Vec<Vacancy> = self.db.vacancies().list()?;
        Ok(aggregate::open_vacancy_aging(&vacancies, self.now))
    }

    pub fn salary_bands(&self) -> Result<Vec<SalaryBand>, ReportError> {
        let vacancies = self.db.vacancies().list()?;
        Ok(aggregate::salary_by_subject(&vacancies))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    fn moment(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 11, day)
            .and_then(|date| date.and_hms_opt(8, 15, 0))
            .expect("valid timestamp")
    }

    fn seeded() -> Database {
        let db = Database::open_in_memory()
            .expect("in-memory store")
            .with_clock(FixedClock(moment(1)));

        let school = db
            .institutions()
            .insert(&Institution::new("Escola A", "12.345.678/0001-00"))
            .expect("insert institution");
        let ana = db
            .professors()
            .insert(&Professor::new("Ana Silva", "11122233344"))
            .expect("insert professor");

        db.vacancies()
            .insert(&Vacancy::new(school, "Matematica", 20, 3500.0))
            .expect("insert open vacancy");
        let mut filled =
            Vacancy::new(school, "Fisica", 12, 2800.0).with_status(VacancyStatus::Filled);
        filled.professor_id = Some(ana);
        db.vacancies().insert(&filled).expect("insert filled vacancy");
        db
    }

    #[test]
    fn report_kinds_round_trip_through_slugs() {
        for kind in ReportKind::ordered() {
            assert_eq!(kind.slug().parse::<ReportKind>(), Ok(kind));
        }
        assert!("relatorio".parse::<ReportKind>().is_err());
    }

    #[test]
    fn unknown_selector_yields_empty_output() {
        let db = seeded();
        let generator = ReportGenerator::new(&db);

        for kind in ReportKind::ordered() {
            let output = generator
                .generate(kind, "pdf", ReportOptions::default())
                .expect("no error for unknown format");
            assert!(output.is_empty(), "{kind} should be empty");
        }
        assert!(!generator
            .generate(ReportKind::Professors, "csv", ReportOptions::default())
            .expect("csv renders")
            .is_empty());
    }

    #[test]
    fn text_reports_embed_generation_time() {
        let db = seeded();
        let generator = ReportGenerator::new(&db).at(moment(9));

        for kind in ReportKind::ordered() {
            let output = generator
                .render(kind, ReportFormat::Text, ReportOptions::default())
                .expect("renders");
            assert!(
                output.contains("Data: 09/11/2025 08:15:00"),
                "{kind} is missing its timestamp"
            );
        }
    }

    #[test]
    fn csv_reports_start_with_their_header_and_have_no_trailing_newline() {
        let db = seeded();
        let generator = ReportGenerator::new(&db);

        let expectations = [
            (ReportKind::Professors, tabular::PROFESSOR_HEADER.join(",")),
            (ReportKind::Institutions, tabular::INSTITUTION_HEADER.join(",")),
            (ReportKind::Vacancies, tabular::VACANCY_HEADER.join(",")),
            (ReportKind::Full, tabular::OVERVIEW_HEADER.join(",")),
            (ReportKind::Demand, tabular::DEMAND_HEADER.join(",")),
            (ReportKind::Aging, tabular::AGING_HEADER.join(",")),
            (ReportKind::Salaries, tabular::SALARY_HEADER.join(",")),
        ];

        for (kind, header) in expectations {
            let output = generator
                .render(kind, ReportFormat::Csv, ReportOptions::default())
                .expect("renders");
            assert_eq!(output.lines().next(), Some(header.as_str()), "{kind}");
            assert!(!output.ends_with('\n'), "{kind} ends with a newline");
            assert!(!output.contains("Data:"), "{kind} leaks a timestamp");
        }
    }

    #[test]
    fn vacancy_report_resolves_names_and_filters_by_status() {
        let db = seeded();
        let generator = ReportGenerator::new(&db);

        let all = generator
            .vacancies(ReportFormat::Text, None)
            .expect("renders");
        assert!(all.contains("RELATÓRIO DE VAGAS\n"));
        assert!(all.contains("Instituição: Escola A"));
        assert!(all.contains("Professor: Ana Silva"));
        assert!(all.contains("Salário: R$ 3500.00"));

        let filled = generator
            .vacancies(ReportFormat::Text, Some(VacancyStatus::Filled))
            .expect("renders");
        assert!(filled.contains("RELATÓRIO DE VAGAS - FILLED"));
        assert!(filled.contains("Total de vagas: 1"));
        assert!(!filled.contains("Matematica"));

        let csv = generator
            .vacancies(ReportFormat::Csv, Some(VacancyStatus::Open))
            .expect("renders");
        let rows: Vec<&str> = csv.lines().skip(1).collect();
        assert_eq!(rows, ["1,1,Matematica,20,3500.00,Open,,2025-11-01 08:15:00"]);
    }

    #[test]
    fn dangling_references_render_placeholder() {
        let db = seeded();
        db.institutions().delete(1).expect("delete institution");
        db.professors().delete(1).expect("delete professor");

        let lines = ReportGenerator::new(&db)
            .vacancy_lines(None)
            .expect("lines resolve");
        assert_eq!(lines.len(), 2);
        assert!(lines
            .iter()
            .all(|line| line.institution_name == MISSING_REFERENCE));
        assert_eq!(lines[1].professor_name.as_deref(), Some(MISSING_REFERENCE));
        assert_eq!(lines[0].professor_name, None);
    }

    #[test]
    fn malformed_creation_stamp_ages_zero_days() {
        let db = seeded();
        db.connection()
            .execute(
                "UPDATE vagas SET data_cadastro = 'not a date' WHERE id = 1",
                [],
            )
            .expect("corrupt stamp");

        let entries = ReportGenerator::new(&db)
            .at(moment(30))
            .aging_entries()
            .expect("aging");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].days_open, 0);
    }

    #[test]
    fn full_report_counts_statuses_and_open_subjects() {
        let db = seeded();
        let generator = ReportGenerator::new(&db);

        let overview = generator.overview().expect("overview");
        assert_eq!(overview.professors, 1);
        assert_eq!(overview.institutions, 1);
        assert_eq!(overview.vacancies, 2);
        assert_eq!(overview.status_count(VacancyStatus::Open), 1);
        assert_eq!(overview.status_count(VacancyStatus::Filled), 1);
        assert_eq!(overview.status_count(VacancyStatus::Cancelled), 0);

        let csv = generator.full(ReportFormat::Csv).expect("renders");
        assert!(csv.contains("status,Filled,1"));
        assert!(csv.ends_with("disciplina_aberta,Matematica,1"));
    }
}
