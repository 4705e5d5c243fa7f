//! SQLite persistence: connection provider and one repository per entity.

mod connection;

pub mod alerta_repository;
pub mod cultivo_repository;
pub mod geografia_repository;
pub mod informe_repository;
pub mod inspeccion_repository;
pub mod lote_repository;
pub mod lugar_produccion_repository;
pub mod plaga_repository;
pub mod predio_repository;
pub mod resultado_repository;
pub mod usuario_repository;

pub use alerta_repository::SqliteAlertaRepository;
pub use connection::Database;
pub use cultivo_repository::SqliteCultivoRepository;
pub use geografia_repository::{
    SqliteDepartamentoRepository, SqliteMunicipioRepository, SqliteVeredaRepository,
};
pub use informe_repository::SqliteInformeRepository;
pub use inspeccion_repository::SqliteInspeccionRepository;
pub use lote_repository::SqliteLoteRepository;
pub use lugar_produccion_repository::SqliteLugarProduccionRepository;
pub use plaga_repository::SqlitePlagaRepository;
pub use predio_repository::SqlitePredioRepository;
pub use resultado_repository::SqliteResultadoRepository;
pub use usuario_repository::{
    SqliteAsistenteTecnicoRepository, SqliteProductorRepository, SqlitePropietarioRepository,
    SqliteUsuarioRepository,
};

use domain::DomainError;
use sqlx::error::ErrorKind;
use sqlx::sqlite::{SqliteQueryResult, SqliteRow};
use sqlx::SqlitePool;
use tracing::{error, warn};

pub(crate) type RowMapper<T> = fn(&SqliteRow) -> Result<T, sqlx::Error>;

/// Maps an sqlx failure on `entity`/`key` to the domain error taxonomy.
pub(crate) fn db_err(
    entity: &'static str,
    key: impl Into<String>,
) -> impl FnOnce(sqlx::Error) -> DomainError {
    let key = key.into();
    move |err| match &err {
        sqlx::Error::Database(db) => match db.kind() {
            ErrorKind::UniqueViolation => {
                warn!(entity, key = %key, "Unique constraint rejected write");
                DomainError::already_exists(entity, key)
            }
            ErrorKind::ForeignKeyViolation
            | ErrorKind::CheckViolation
            | ErrorKind::NotNullViolation => {
                warn!(entity, key = %key, error = %db, "Constraint rejected write");
                DomainError::ConstraintViolation(format!("{} {}: {}", entity, key, db.message()))
            }
            _ => {
                error!(entity, key = %key, error = %err, "Database error");
                DomainError::Storage(format!("Database error: {}", err))
            }
        },
        sqlx::Error::Decode(_) | sqlx::Error::ColumnDecode { .. } => {
            error!(entity, key = %key, error = %err, "Stored row does not decode");
            DomainError::InvalidData(format!("{} {}: {}", entity, key, err))
        }
        _ => {
            error!(entity, key = %key, error = %err, "Database error");
            DomainError::Storage(format!("Database error: {}", err))
        }
    }
}

/// Turns a domain parse failure inside a row mapper into a decode error.
pub(crate) fn decode_err(err: DomainError) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}

/// Writes that target a single row by id must touch it.
pub(crate) fn expect_affected(
    result: SqliteQueryResult,
    entity: &'static str,
    key: &str,
) -> Result<(), DomainError> {
    if result.rows_affected() == 0 {
        return Err(DomainError::not_found(entity, key));
    }
    Ok(())
}

pub(crate) async fn fetch_one_by<T>(
    pool: &SqlitePool,
    sql: &str,
    key: &str,
    entity: &'static str,
    map: RowMapper<T>,
) -> Result<Option<T>, DomainError> {
    let row = sqlx::query(sql)
        .bind(key)
        .fetch_optional(pool)
        .await
        .map_err(db_err(entity, key))?;

    row.as_ref()
        .map(map)
        .transpose()
        .map_err(db_err(entity, key))
}

pub(crate) async fn fetch_all_by<T>(
    pool: &SqlitePool,
    sql: &str,
    key: &str,
    entity: &'static str,
    map: RowMapper<T>,
) -> Result<Vec<T>, DomainError> {
    let rows = sqlx::query(sql)
        .bind(key)
        .fetch_all(pool)
        .await
        .map_err(db_err(entity, key))?;

    rows.iter()
        .map(map)
        .collect::<Result<Vec<_>, _>>()
        .map_err(db_err(entity, key))
}

pub(crate) async fn fetch_all<T>(
    pool: &SqlitePool,
    sql: &str,
    entity: &'static str,
    map: RowMapper<T>,
) -> Result<Vec<T>, DomainError> {
    let rows = sqlx::query(sql)
        .fetch_all(pool)
        .await
        .map_err(db_err(entity, "*"))?;

    rows.iter()
        .map(map)
        .collect::<Result<Vec<_>, _>>()
        .map_err(db_err(entity, "*"))
}

/// Inserts a row into a two-column link table; linking twice is a no-op.
pub(crate) async fn link(
    pool: &SqlitePool,
    table: &'static str,
    columns: (&'static str, &'static str),
    ids: (&str, &str),
) -> Result<(), DomainError> {
    let sql = format!(
        "INSERT OR IGNORE INTO {} ({}, {}) VALUES (?, ?)",
        table, columns.0, columns.1
    );
    sqlx::query(&sql)
        .bind(ids.0)
        .bind(ids.1)
        .execute(pool)
        .await
        .map_err(db_err(table, format!("{}/{}", ids.0, ids.1)))?;
    Ok(())
}

pub(crate) async fn unlink(
    pool: &SqlitePool,
    table: &'static str,
    columns: (&'static str, &'static str),
    ids: (&str, &str),
) -> Result<(), DomainError> {
    let sql = format!("DELETE FROM {} WHERE {} = ? AND {} = ?", table, columns.0, columns.1);
    let key = format!("{}/{}", ids.0, ids.1);
    let result = sqlx::query(&sql)
        .bind(ids.0)
        .bind(ids.1)
        .execute(pool)
        .await
        .map_err(db_err(table, key.clone()))?;
    expect_affected(result, table, &key)
}
