//! Destination table definitions.
//!
//! Each table carries a unique index over the columns that identify one
//! observation, which is what makes insert-or-ignore uploads idempotent.
//! Key columns are indexed through `COALESCE(col, '')` so a null key cell
//! still collides with itself on re-upload.

use tracing::info;

use erc_model::Result;

use crate::gateway::{WriteMode, classify_sqlite_error, quote_identifier};
use crate::registry::StorageHandle;

/// Destination table name, its DDL and its observation key.
#[derive(Debug, Clone, Copy)]
pub struct DestinationTable {
    pub name: &'static str,
    pub ddl: &'static str,
    /// Columns identifying one observation; every non-measure column.
    pub key: &'static [&'static str],
}

impl DestinationTable {
    /// `CREATE UNIQUE INDEX` statement over the null-safe key.
    pub fn key_index_sql(&self) -> String {
        let columns: Vec<String> = self
            .key
            .iter()
            .map(|column| format!("COALESCE({}, '')", quote_identifier(column)))
            .collect();
        format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {} ({})",
            quote_identifier(&format!("{}_key", self.name)),
            quote_identifier(self.name),
            columns.join(", ")
        )
    }
}

pub static DESTINATION_TABLES: [DestinationTable; 4] = [
    DestinationTable {
        name: "visitas_turismo",
        ddl: r#"
            CREATE TABLE IF NOT EXISTS visitas_turismo (
                anio         INTEGER,
                mes          INTEGER,
                codigo_pais  TEXT,
                pais         TEXT,
                flujo        TEXT,
                viajeros     REAL
            );
        "#,
        key: &["anio", "mes", "codigo_pais", "pais", "flujo"],
    },
    DestinationTable {
        name: "ban_rep_inversion",
        ddl: r#"
            CREATE TABLE IF NOT EXISTS ban_rep_inversion (
                pais         TEXT,
                pais_banrep  TEXT,
                cod_pais     TEXT,
                pais_aladi   TEXT,
                flujo        TEXT,
                valor        REAL,
                fecha        INTEGER,
                tipo_dato    TEXT
            );
        "#,
        key: &[
            "pais",
            "pais_banrep",
            "cod_pais",
            "pais_aladi",
            "flujo",
            "fecha",
            "tipo_dato",
        ],
    },
    DestinationTable {
        name: "emces_servicios",
        ddl: r#"
            CREATE TABLE IF NOT EXISTS emces_servicios (
                flujo_comercial   TEXT,
                periodo_mes       TEXT,
                codigo_cabps      TEXT,
                cod_pais          TEXT,
                cod_depto         TEXT,
                millones_dolares  REAL
            );
        "#,
        key: &[
            "flujo_comercial",
            "periodo_mes",
            "codigo_cabps",
            "cod_pais",
            "cod_depto",
        ],
    },
    DestinationTable {
        name: "comercio_bienes",
        ddl: r#"
            CREATE TABLE IF NOT EXISTS comercio_bienes (
                cod_pais              TEXT,
                pais                  TEXT,
                nandina               TEXT,
                descripcion_resumida  TEXT,
                ambito                TEXT,
                mineros_no_mineros    TEXT,
                departamento          TEXT,
                flujo                 TEXT,
                periodo               TEXT,
                valor                 REAL,
                anio                  INTEGER,
                es_preliminar         INTEGER
            );
        "#,
        key: &[
            "cod_pais",
            "pais",
            "nandina",
            "descripcion_resumida",
            "ambito",
            "mineros_no_mineros",
            "departamento",
            "flujo",
            "periodo",
            "anio",
            "es_preliminar",
        ],
    },
];

pub fn destination_table(name: &str) -> Option<&'static DestinationTable> {
    DESTINATION_TABLES.iter().find(|table| table.name == name)
}

/// Creates any destination table that does not exist yet.
pub fn ensure_destination_tables(handle: &StorageHandle) -> Result<()> {
    let conn = handle.connection()?;
    for table in &DESTINATION_TABLES {
        conn.execute_batch(table.ddl)
            .map_err(|err| classify_sqlite_error(&err, WriteMode::InsertOrIgnore))?;
        conn.execute_batch(&table.key_index_sql())
            .map_err(|err| classify_sqlite_error(&err, WriteMode::InsertOrIgnore))?;
    }
    info!(
        alias = handle.alias(),
        tables = DESTINATION_TABLES.len(),
        "destination tables ready"
    );
    Ok(())
}
