use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Storage format of [`Vacancy::created_at`].
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
    pub id: Option<i64>,
    pub name: String,
    pub cpf: String,
    pub email: String,
    pub phone: String,
    pub specialty: String,
}

impl Professor {
    pub fn new(name: impl Into<String>, cpf: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cpf: cpf.into(),
            ..Self::default()
        }
    }

    /// Canonical column-keyed projection of the record.
    pub fn fields(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".into(), self.id.into());
        map.insert("nome".into(), self.name.clone().into());
        map.insert("cpf".into(), self.cpf.clone().into());
        map.insert("email".into(), self.email.clone().into());
        map.insert("telefone".into(), self.phone.clone().into());
        map.insert("especialidade".into(), self.specialty.clone().into());
        map
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institution {
    pub id: Option<i64>,
    pub name: String,
    pub cnpj: String,
    pub address: String,
    pub city: String,
    pub state: String,
}

impl Institution {
    pub fn new(name: impl Into<String>, cnpj: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cnpj: cnpj.into(),
            ..Self::default()
        }
    }

    pub fn fields(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".into(), self.id.into());
        map.insert("nome".into(), self.name.clone().into());
        map.insert("cnpj".into(), self.cnpj.clone().into());
        map.insert("endereco".into(), self.address.clone().into());
        map.insert("cidade".into(), self.city.clone().into());
        map.insert("estado".into(), self.state.clone().into());
        map
    }
}

/// Lifecycle of a teaching position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VacancyStatus {
    #[default]
    Open,
    Filled,
    Cancelled,
}

impl VacancyStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Open, Self::Filled, Self::Cancelled]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Filled => "Filled",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for VacancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown vacancy status '{0}' (expected Open, Filled or Cancelled)")]
pub struct UnknownStatus(pub String);

impl FromStr for VacancyStatus {
    type Err = UnknownStatus;

    // Portuguese names are what databases from the previous desktop build contain.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" | "aberta" => Ok(Self::Open),
            "filled" | "preenchida" => Ok(Self::Filled),
            "cancelled" | "canceled" | "cancelada" => Ok(Self::Cancelled),
            _ => Err(UnknownStatus(value.to_string())),
        }
    }
}

/// A substitute teaching position offered by an institution.
///
/// `status` and `professor_id` are set independently; assigning a professor
/// does not change the status and vice versa.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vacancy {
    pub id: Option<i64>,
    pub institution_id: i64,
    pub subject: String,
    pub workload_hours: u32,
    pub salary: f64,
    pub description: String,
    pub status: VacancyStatus,
    pub professor_id: Option<i64>,
    /// Stamped by the store on insert, `YYYY-MM-DD HH:MM:SS`. Kept as text so
    /// malformed legacy values still load.
    pub created_at: Option<String>,
}

impl Vacancy {
    pub fn new(
        institution_id: i64,
        subject: impl Into<String>,
        workload_hours: u32,
        salary: f64,
    ) -> Self {
        Self {
            institution_id,
            subject: subject.into(),
            workload_hours,
            salary,
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: VacancyStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_open(&self) -> bool {
        self.status == VacancyStatus::Open
    }

    pub fn fields(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".into(), self.id.into());
        map.insert("instituicao_id".into(), self.institution_id.into());
        map.insert("disciplina".into(), self.subject.clone().into());
        map.insert("carga_horaria".into(), self.workload_hours.into());
        map.insert("salario".into(), self.salary.into());
        map.insert("descricao".into(), self.description.clone().into());
        map.insert("status".into(), self.status.label().into());
        map.insert("professor_id".into(), self.professor_id.into());
        map.insert("data_cadastro".into(), self.created_at.clone().into());
        map
    }
}
