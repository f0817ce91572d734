use super::views::{AgingEntry, SalaryBand, SubjectDemand, SystemOverview, VacancyLine};
use crate::domain::{Institution, Professor, VacancyStatus};
use chrono::NaiveDateTime;

const RULE_WIDTH: usize = 80;
const HEADER_DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn header(title: &str, now: NaiveDateTime) -> Vec<String> {
    vec![
        rule(),
        title.to_string(),
        format!("Data: {}", now.format(HEADER_DATE_FORMAT)),
        rule(),
    ]
}

pub(crate) fn professors(professors: &[Professor], now: NaiveDateTime) -> String {
    let mut lines = header("RELATÓRIO DE PROFESSORES SUBSTITUTOS", now);
    lines.push(String::new());
    lines.push(format!(
        "Total de professores cadastrados: {}",
        professors.len()
    ));
    lines.push(String::new());

    for (position, professor) in professors.iter().enumerate() {
        lines.push(format!("{}. Professor: {}", position + 1, professor.name));
        lines.push(format!("   CPF: {}", professor.cpf));
        lines.push(format!("   Email: {}", professor.email));
        lines.push(format!("   Telefone: {}", professor.phone));
        lines.push(format!("   Especialidade: {}", professor.specialty));
        lines.push(String::new());
    }

    lines.push(rule());
    lines.join("\n")
}

pub(crate) fn institutions(institutions: &[Institution], now: NaiveDateTime) -> String {
    let mut lines = header("RELATÓRIO DE INSTITUIÇÕES DE ENSINO", now);
    lines.push(String::new());
    lines.push(format!(
        "Total de instituições cadastradas: {}",
        institutions.len()
    ));
    lines.push(String::new());

    for (position, institution) in institutions.iter().enumerate() {
        lines.push(format!(
            "{}. Instituição: {}",
            position + 1,
            institution.name
        ));
        lines.push(format!("   CNPJ: {}", institution.cnpj));
        lines.push(format!("   Endereço: {}", institution.address));
        lines.push(format!(
            "   Cidade/Estado: {}/{}",
            institution.city, institution.state
        ));
        lines.push(String::new());
    }

    lines.push(rule());
    lines.join("\n")
}

pub(crate) fn vacancies(
    rows: &[VacancyLine],
    status: Option<VacancyStatus>,
    now: NaiveDateTime,
) -> String {
    let title = match status {
        Some(status) => format!("RELATÓRIO DE VAGAS - {}", status.label().to_uppercase()),
        None => "RELATÓRIO DE VAGAS".to_string(),
    };

    let mut lines = header(&title, now);
    lines.push(String::new());
    lines.push(format!("Total de vagas: {}", rows.len()));
    lines.push(String::new());

    for (position, row) in rows.iter().enumerate() {
        let vacancy = &row.vacancy;
        lines.push(format!("{}. Vaga: {}", position + 1, vacancy.subject));
        lines.push(format!("   Instituição: {}", row.institution_name));
        lines.push(format!("   Carga Horária: {}h", vacancy.workload_hours));
        lines.push(format!("   Salário: R$ {:.2}", vacancy.salary));
        lines.push(format!("   Status: {}", vacancy.status));
        if let Some(professor) = &row.professor_name {
            lines.push(format!("   Professor: {professor}"));
        }
        lines.push(format!("   Descrição: {}", vacancy.description));
        lines.push(format!(
            "   Data de Cadastro: {}",
            vacancy.created_at.as_deref().unwrap_or_default()
        ));
        lines.push(String::new());
    }

    lines.push(rule());
    lines.join("\n")
}

pub(crate) fn overview(overview: &SystemOverview, now: NaiveDateTime) -> String {
    let mut lines = header("RELATÓRIO COMPLETO DO SISTEMA", now);
    lines.push(String::new());
    lines.push("ESTATÍSTICAS GERAIS:".to_string());
    lines.push(format!("  - Total de Professores: {}", overview.professors));
    lines.push(format!("  - Total de Instituições: {}", overview.institutions));
    lines.push(format!("  - Total de Vagas: {}", overview.vacancies));
    lines.push(format!(
        "  - Vagas Abertas: {}",
        overview.status_count(VacancyStatus::Open)
    ));
    lines.push(format!(
        "  - Vagas Preenchidas: {}",
        overview.status_count(VacancyStatus::Filled)
    ));
    lines.push(format!(
        "  - Vagas Canceladas: {}",
        overview.status_count(VacancyStatus::Cancelled)
    ));
    lines.push(String::new());

    if !overview.open_by_subject.is_empty() {
        lines.push("DISCIPLINAS COM VAGAS ABERTAS:".to_string());
        for entry in &overview.open_by_subject {
            lines.push(format!("  - {}: {} vaga(s)", entry.subject, entry.count));
        }
        lines.push(String::new());
    }

    lines.push(rule());
    lines.join("\n")
}

pub(crate) fn demand(entries: &[SubjectDemand], open_only: bool, now: NaiveDateTime) -> String {
    let title = if open_only {
        "RESUMO DE DEMANDA POR DISCIPLINA - APENAS VAGAS ABERTAS"
    } else {
        "RESUMO DE DEMANDA POR DISCIPLINA"
    };

    let mut lines = header(title, now);
    lines.extend(
        entries
            .iter()
            .map(|entry| format!("- {}: {} vaga(s)", entry.subject, entry.count)),
    );
    lines.join("\n")
}

pub(crate) fn aging(entries: &[AgingEntry], now: NaiveDateTime) -> String {
    let mut lines = header("AGING DE VAGAS ABERTAS (dias abertas)", now);
    lines.extend(entries.iter().map(|entry| {
        format!(
            "Vaga {} | {} | Inst {} | {} dia(s)",
            entry.vacancy_id.map(|id| id.to_string()).unwrap_or_default(),
            entry.subject,
            entry.institution_id,
            entry.days_open
        )
    }));
    lines.join("\n")
}

pub(crate) fn salaries(bands: &[SalaryBand], now: NaiveDateTime) -> String {
    let mut lines = header("SALÁRIOS POR DISCIPLINA (min/médio/máx)", now);
    lines.extend(bands.iter().map(|band| {
        format!(
            "- {}: qtd={}, min=R$ {:.2}, médio=R$ {:.2}, máx=R$ {:.2}",
            band.subject, band.count, band.min, band.mean, band.max
        )
    }));
    lines.join("\n")
}
