//! Raw user input for new records, checked before it reaches the store.
//!
//! The store only enforces CPF/CNPJ uniqueness; presence checks and numeric
//! parsing live here with the callers that collect the text.

use crate::domain::{Institution, Professor, Vacancy};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} must be a non-negative number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },
}

fn required(field: &'static str, value: &str) -> Result<String, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FormError::MissingField(field));
    }
    Ok(value.to_string())
}

/// Blank input counts as zero.
fn number<T>(field: &'static str, value: &str) -> Result<T, FormError>
where
    T: FromStr + Default,
{
    let value = value.trim();
    if value.is_empty() {
        return Ok(T::default());
    }
    value.parse().map_err(|_| FormError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

#[derive(Debug, Clone, Default)]
pub struct ProfessorForm {
    pub name: String,
    pub cpf: String,
    pub email: String,
    pub phone: String,
    pub specialty: String,
}

/// Prefills a form from a stored record, for edits.
impl From<&Professor> for ProfessorForm {
    fn from(professor: &Professor) -> Self {
        Self {
            name: professor.name.clone(),
            cpf: professor.cpf.clone(),
            email: professor.email.clone(),
            phone: professor.phone.clone(),
            specialty: professor.specialty.clone(),
        }
    }
}

impl ProfessorForm {
    pub fn into_professor(self) -> Result<Professor, FormError> {
        Ok(Professor {
            id: None,
            name: required("name", &self.name)?,
            cpf: required("cpf", &self.cpf)?,
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            specialty: self.specialty.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct InstitutionForm {
    pub name: String,
    pub cnpj: String,
    pub address: String,
    pub city: String,
    pub state: String,
}

impl From<&Institution> for InstitutionForm {
    fn from(institution: &Institution) -> Self {
        Self {
            name: institution.name.clone(),
            cnpj: institution.cnpj.clone(),
            address: institution.address.clone(),
            city: institution.city.clone(),
            state: institution.state.clone(),
        }
    }
}

impl InstitutionForm {
    pub fn into_institution(self) -> Result<Institution, FormError> {
        Ok(Institution {
            id: None,
            name: required("name", &self.name)?,
            cnpj: required("cnpj", &self.cnpj)?,
            address: self.address.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct VacancyForm {
    pub institution_id: String,
    pub subject: String,
    pub workload_hours: String,
    pub salary: String,
    pub description: String,
}

impl From<&Vacancy> for VacancyForm {
    fn from(vacancy: &Vacancy) -> Self {
        Self {
            institution_id: vacancy.institution_id.to_string(),
            subject: vacancy.subject.clone(),
            workload_hours: vacancy.workload_hours.to_string(),
            salary: vacancy.salary.to_string(),
            description: vacancy.description.clone(),
        }
    }
}

impl VacancyForm {
    /// Builds an open, unassigned vacancy.
    pub fn into_vacancy(self) -> Result<Vacancy, FormError> {
        let institution_id: i64 = number("institution id", &self.institution_id)?;
        if institution_id < 0 {
            return Err(FormError::InvalidNumber {
                field: "institution id",
                value: self.institution_id.trim().to_string(),
            });
        }
        let workload_hours: u32 = number("workload", &self.workload_hours)?;
        let salary: f64 = number("salary", &self.salary)?;
        if !salary.is_finite() || salary < 0.0 {
            return Err(FormError::InvalidNumber {
                field: "salary",
                value: self.salary.trim().to_string(),
            });
        }

        let subject = required("subject", &self.subject)?;
        if institution_id == 0 {
            return Err(FormError::MissingField("institution id"));
        }

        let mut vacancy = Vacancy::new(institution_id, subject, workload_hours, salary);
        vacancy.description = self.description.trim().to_string();
        Ok(vacancy)
    }
}
