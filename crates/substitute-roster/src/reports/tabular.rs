use super::views::{AgingEntry, SalaryBand, SubjectDemand, SystemOverview, VacancyLine};
use super::ReportError;
use crate::domain::{Institution, Professor};

pub(crate) const PROFESSOR_HEADER: [&str; 6] =
    ["ID", "Nome", "CPF", "Email", "Telefone", "Especialidade"];
pub(crate) const INSTITUTION_HEADER: [&str; 6] =
    ["ID", "Nome", "CNPJ", "Endereco", "Cidade", "Estado"];
pub(crate) const VACANCY_HEADER: [&str; 8] = [
    "ID",
    "Instituicao_ID",
    "Disciplina",
    "Carga_Horaria",
    "Salario",
    "Status",
    "Professor_ID",
    "Data_Cadastro",
];
pub(crate) const DEMAND_HEADER: [&str; 2] = ["Disciplina", "Quantidade"];
pub(crate) const AGING_HEADER: [&str; 4] =
    ["Vaga_ID", "Disciplina", "Instituicao_ID", "Dias_Aberta"];
pub(crate) const SALARY_HEADER: [&str; 5] = [
    "Disciplina",
    "Qtd",
    "Salario_Min",
    "Salario_Medio",
    "Salario_Max",
];
pub(crate) const OVERVIEW_HEADER: [&str; 3] = ["Secao", "Item", "Quantidade"];

fn optional_id(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

/// Writes a header plus rows and drops the final line terminator.
fn render<I, R>(header: &[&str], rows: I) -> Result<String, ReportError>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ReportError::Io(err.into_error()))?;
    let mut output = String::from_utf8(bytes)?;
    while output.ends_with('\n') {
        output.pop();
    }
    Ok(output)
}

pub(crate) fn professors(professors: &[Professor]) -> Result<String, ReportError> {
    render(
        &PROFESSOR_HEADER,
        professors.iter().map(|professor| {
            [
                optional_id(professor.id),
                professor.name.clone(),
                professor.cpf.clone(),
                professor.email.clone(),
                professor.phone.clone(),
                professor.specialty.clone(),
            ]
        }),
    )
}

pub(crate) fn institutions(institutions: &[Institution]) -> Result<String, ReportError> {
    render(
        &INSTITUTION_HEADER,
        institutions.iter().map(|institution| {
            [
                optional_id(institution.id),
                institution.name.clone(),
                institution.cnpj.clone(),
                institution.address.clone(),
                institution.city.clone(),
                institution.state.clone(),
            ]
        }),
    )
}

pub(crate) fn vacancies(rows: &[VacancyLine]) -> Result<String, ReportError> {
    render(
        &VACANCY_HEADER,
        rows.iter().map(|row| {
            let vacancy = &row.vacancy;
            [
                optional_id(vacancy.id),
                vacancy.institution_id.to_string(),
                vacancy.subject.clone(),
                vacancy.workload_hours.to_string(),
                money(vacancy.salary),
                vacancy.status.label().to_string(),
                optional_id(vacancy.professor_id),
                vacancy.created_at.clone().unwrap_or_default(),
            ]
        }),
    )
}

pub(crate) fn overview(overview: &SystemOverview) -> Result<String, ReportError> {
    let totals = [
        ("Professores", overview.professors),
        ("Instituicoes", overview.institutions),
        ("Vagas", overview.vacancies),
    ]
    .into_iter()
    .map(|(item, count)| ["total".to_string(), item.to_string(), count.to_string()]);

    let statuses = overview.by_status.iter().map(|entry| {
        [
            "status".to_string(),
            entry.status.label().to_string(),
            entry.count.to_string(),
        ]
    });

    let subjects = overview.open_by_subject.iter().map(|entry| {
        [
            "disciplina_aberta".to_string(),
            entry.subject.clone(),
            entry.count.to_string(),
        ]
    });

    render(&OVERVIEW_HEADER, totals.chain(statuses).chain(subjects))
}

pub(crate) fn demand(entries: &[SubjectDemand]) -> Result<String, ReportError> {
    render(
        &DEMAND_HEADER,
        entries
            .iter()
            .map(|entry| [entry.subject.clone(), entry.count.to_string()]),
    )
}

pub(crate) fn aging(entries: &[AgingEntry]) -> Result<String, ReportError> {
    render(
        &AGING_HEADER,
        entries.iter().map(|entry| {
            [
                optional_id(entry.vacancy_id),
                entry.subject.clone(),
                entry.institution_id.to_string(),
                entry.days_open.to_string(),
            ]
        }),
    )
}

pub(crate) fn salaries(bands: &[SalaryBand]) -> Result<String, ReportError> {
    render(
        &SALARY_HEADER,
        bands.iter().map(|band| {
            [
                band.subject.clone(),
                band.count.to_string(),
                money(band.min),
                money(band.mean),
                money(band.max),
            ]
        }),
    )
}
