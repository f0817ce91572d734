use super::views::{AgingEntry, SalaryBand, StatusCount, SubjectDemand};
use crate::domain::{Vacancy, VacancyStatus, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use std::collections::HashMap;

/// Groups values by key, keeping groups in first-encounter order.
fn group_by_subject<'v, T>(
    vacancies: impl IntoIterator<Item = &'v Vacancy>,
    value: impl Fn(&Vacancy) -> T,
) -> Vec<(String, Vec<T>)> {
    let mut index: HashMap<&'v str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<T>)> = Vec::new();

    for vacancy in vacancies {
        let slot = *index.entry(vacancy.subject.as_str()).or_insert_with(|| {
            groups.push((vacancy.subject.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(value(vacancy));
    }

    groups
}

/// Vacancy count per subject, most demanded first.
///
/// Ties keep first-encounter order only because the sort is stable.
pub(crate) fn demand_by_subject<'v>(
    vacancies: impl IntoIterator<Item = &'v Vacancy>,
) -> Vec<SubjectDemand> {
    let mut demand: Vec<SubjectDemand> = group_by_subject(vacancies, |_| ())
        .into_iter()
        .map(|(subject, hits)| SubjectDemand {
            subject,
            count: hits.len(),
        })
        .collect();
    demand.sort_by(|a, b| b.count.cmp(&a.count));
    demand
}

pub(crate) fn status_counts(vacancies: &[Vacancy]) -> Vec<StatusCount> {
    VacancyStatus::ordered()
        .into_iter()
        .map(|status| StatusCount {
            status,
            count: vacancies
                .iter()
                .filter(|vacancy| vacancy.status == status)
                .count(),
        })
        .collect()
}

/// Whole days between `created_at` and `now`, never negative.
///
/// Missing or malformed stamps count as zero days.
pub(crate) fn days_open(created_at: Option<&str>, now: NaiveDateTime) -> i64 {
    created_at
        .and_then(|raw| NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).ok())
        .map_or(0, |created| (now - created).num_days().max(0))
}

/// Open vacancies with their age, oldest first.
pub(crate) fn open_vacancy_aging(vacancies: &[Vacancy], now: NaiveDateTime) -> Vec<AgingEntry> {
    let mut entries: Vec<AgingEntry> = vacancies
        .iter()
        .filter(|vacancy| vacancy.is_open())
        .map(|vacancy| AgingEntry {
            vacancy_id: vacancy.id,
            subject: vacancy.subject.clone(),
            institution_id: vacancy.institution_id,
            days_open: days_open(vacancy.created_at.as_deref(), now),
        })
        .collect();
    entries.sort_by(|a, b| b.days_open.cmp(&a.days_open));
    entries
}

/// Salary min/mean/max per subject, highest ceiling first.
pub(crate) fn salary_by_subject(vacancies: &[Vacancy]) -> Vec<SalaryBand> {
    let mut bands: Vec<SalaryBand> = group_by_subject(vacancies, |vacancy| vacancy.salary)
        .into_iter()
        .filter(|(_, salaries)| !salaries.is_empty())
        .map(|(subject, salaries)| {
            let min = salaries.iter().copied().fold(f64::INFINITY, f64::min);
            let max = salaries.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = salaries.iter().sum::<f64>() / salaries.len() as f64;
            SalaryBand {
                subject,
                count: salaries.len(),
                min,
                mean,
                max,
            }
        })
        .collect();
    bands.sort_by(|a, b| b.max.total_cmp(&a.max));
    bands
}
