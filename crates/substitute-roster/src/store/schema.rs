use super::StoreError;
use rusqlite::Connection;

// Foreign keys are declared for documentation only. Enforcement is switched
// off per connection so deletes never cascade or fail on dangling references.
const SQL: &str = r#"
        CREATE TABLE IF NOT EXISTS professores (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          nome TEXT NOT NULL,
          cpf TEXT UNIQUE NOT NULL,
          email TEXT,
          telefone TEXT,
          especialidade TEXT
        );

        CREATE TABLE IF NOT EXISTS instituicoes (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          nome TEXT NOT NULL,
          cnpj TEXT UNIQUE NOT NULL,
          endereco TEXT,
          cidade TEXT,
          estado TEXT
        );

        CREATE TABLE IF NOT EXISTS vagas (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          instituicao_id INTEGER,
          disciplina TEXT NOT NULL,
          carga_horaria INTEGER,
          salario REAL,
          descricao TEXT,
          status TEXT DEFAULT 'Open',
          professor_id INTEGER,
          data_cadastro TEXT,
          FOREIGN KEY (instituicao_id) REFERENCES instituicoes(id),
          FOREIGN KEY (professor_id) REFERENCES professores(id)
        );
"#;

/// Must run on every connection: the foreign key setting is not persisted.
pub(super) fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.pragma_update(None, "foreign_keys", false)?;
    conn.execute_batch(SQL)?;
    Ok(())
}
