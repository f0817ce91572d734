use crate::domain::{Institution, Professor, Vacancy, VacancyStatus, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, Value, ValueRef};
use rusqlite::Row;

/// Table mapping for a record type persisted by [`super::Repository`].
pub trait Entity: Sized {
    /// Human-readable name used in logs and errors.
    const KIND: &'static str;
    const TABLE: &'static str;
    /// Columns written on insert, in the order of [`Entity::insert_values`].
    const INSERT_COLUMNS: &'static [&'static str];
    /// Columns rewritten on update, in the order of [`Entity::update_values`].
    const UPDATE_COLUMNS: &'static [&'static str];
    /// Column carrying the table's UNIQUE constraint, if any.
    const UNIQUE_FIELD: Option<&'static str>;

    fn id(&self) -> Option<i64>;
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
    fn insert_values(&self, now: NaiveDateTime) -> Vec<Value>;
    fn update_values(&self) -> Vec<Value>;
}

fn text(row: &Row<'_>, column: &str) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
}

impl Entity for Professor {
    const KIND: &'static str = "professor";
    const TABLE: &'static str = "professores";
    const INSERT_COLUMNS: &'static [&'static str] =
        &["nome", "cpf", "email", "telefone", "especialidade"];
    const UPDATE_COLUMNS: &'static [&'static str] = Self::INSERT_COLUMNS;
    const UNIQUE_FIELD: Option<&'static str> = Some("cpf");

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            name: text(row, "nome")?,
            cpf: text(row, "cpf")?,
            email: text(row, "email")?,
            phone: text(row, "telefone")?,
            specialty: text(row, "especialidade")?,
        })
    }

    fn insert_values(&self, _now: NaiveDateTime) -> Vec<Value> {
        self.update_values()
    }

    fn update_values(&self) -> Vec<Value> {
        vec![
            self.name.clone().into(),
            self.cpf.clone().into(),
            self.email.clone().into(),
            self.phone.clone().into(),
            self.specialty.clone().into(),
        ]
    }
}

impl Entity for Institution {
    const KIND: &'static str = "institution";
    const TABLE: &'static str = "instituicoes";
    const INSERT_COLUMNS: &'static [&'static str] =
        &["nome", "cnpj", "endereco", "cidade", "estado"];
    const UPDATE_COLUMNS: &'static [&'static str] = Self::INSERT_COLUMNS;
    const UNIQUE_FIELD: Option<&'static str> = Some("cnpj");

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: Some(row.get("id")?),
            name: text(row, "nome")?,
            cnpj: text(row, "cnpj")?,
            address: text(row, "endereco")?,
            city: text(row, "cidade")?,
            state: text(row, "estado")?,
        })
    }

    fn insert_values(&self, _now: NaiveDateTime) -> Vec<Value> {
        self.update_values()
    }

    fn update_values(&self) -> Vec<Value> {
        vec![
            self.name.clone().into(),
            self.cnpj.clone().into(),
            self.address.clone().into(),
            self.city.clone().into(),
            self.state.clone().into(),
        ]
    }
}

impl Entity for Vacancy {
    const KIND: &'static str = "vacancy";
    const TABLE: &'static str = "vagas";
    const INSERT_COLUMNS: &'static [&'static str] = &[
        "instituicao_id",
        "disciplina",
        "carga_horaria",
        "salario",
        "descricao",
        "status",
        "professor_id",
        "data_cadastro",
    ];
    // data_cadastro is written once on insert.
    const UPDATE_COLUMNS: &'static [&'static str] = &[
        "instituicao_id",
        "disciplina",
        "carga_horaria",
        "salario",
        "descricao",
        "status",
        "professor_id",
    ];
    const UNIQUE_FIELD: Option<&'static str> = None;

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let workload = row.get::<_, Option<i64>>("carga_horaria")?.unwrap_or(0);
        Ok(Self {
            id: Some(row.get("id")?),
            institution_id: row.get::<_, Option<i64>>("instituicao_id")?.unwrap_or(0),
            subject: text(row, "disciplina")?,
            workload_hours: u32::try_from(workload).unwrap_or(0),
            salary: row.get::<_, Option<f64>>("salario")?.unwrap_or(0.0),
            description: text(row, "descricao")?,
            status: row
                .get::<_, Option<VacancyStatus>>("status")?
                .unwrap_or_default(),
            professor_id: row.get("professor_id")?,
            created_at: row.get("data_cadastro")?,
        })
    }

    fn insert_values(&self, now: NaiveDateTime) -> Vec<Value> {
        let mut values = self.update_values();
        values.push(now.format(TIMESTAMP_FORMAT).to_string().into());
        values
    }

    fn update_values(&self) -> Vec<Value> {
        vec![
            self.institution_id.into(),
            self.subject.clone().into(),
            self.workload_hours.into(),
            self.salary.into(),
            self.description.clone().into(),
            self.status.label().to_string().into(),
            self.professor_id.into(),
        ]
    }
}

impl FromSql for VacancyStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}
