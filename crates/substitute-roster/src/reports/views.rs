use crate::domain::{Vacancy, VacancyStatus};
use serde::Serialize;

/// Placeholder rendered when a referenced record no longer exists.
pub const MISSING_REFERENCE: &str = "N/A";

/// A vacancy with its references resolved for display.
#[derive(Debug, Clone, Serialize)]
pub struct VacancyLine {
    #[serde(flatten)]
    pub vacancy: Vacancy,
    pub institution_name: String,
    /// Present only when the vacancy has a professor id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professor_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectDemand {
    pub subject: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: VacancyStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgingEntry {
    pub vacancy_id: Option<i64>,
    pub subject: String,
    pub institution_id: i64,
    pub days_open: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryBand {
    pub subject: String,
    pub count: usize,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

/// Totals shown in the full system report.
#[derive(Debug, Clone, Serialize)]
pub struct SystemOverview {
    pub professors: usize,
    pub institutions: usize,
    pub vacancies: usize,
    pub by_status: Vec<StatusCount>,
    pub open_by_subject: Vec<SubjectDemand>,
}

impl SystemOverview {
    pub fn status_count(&self, status: VacancyStatus) -> usize {
        self.by_status
            .iter()
            .find(|entry| entry.status == status)
            .map_or(0, |entry| entry.count)
    }
}
