use super::lote_repository::{SELECT_LOTE, lote_from_row};
use super::{db_err, expect_affected, fetch_all, fetch_all_by, fetch_one_by};
use async_trait::async_trait;
use domain::predio::LugarProduccionRepository;
use domain::{DomainError, Lote, LugarProduccion, Referencia, ref_id};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

pub(crate) const SELECT_LUGAR: &str = "SELECT lp.id, lp.codigo_ica, lp.id_predio, \
     lp.id_productor, lp.id_asistente_tecnico, p.codigo_ica AS codigo_ica_predio, \
     up.nombre AS nombre_productor, ua.nombre AS nombre_asistente \
     FROM lugares_produccion lp \
     LEFT JOIN predios p ON p.id = lp.id_predio \
     LEFT JOIN usuarios up ON up.id = lp.id_productor \
     LEFT JOIN usuarios ua ON ua.id = lp.id_asistente_tecnico";

pub(crate) fn lugar_from_row(row: &SqliteRow) -> Result<LugarProduccion, sqlx::Error> {
    Ok(LugarProduccion {
        id: row.try_get("id")?,
        codigo_ica: row.try_get("codigo_ica")?,
        predio: Referencia::from_columns(
            row.try_get("id_predio")?,
            row.try_get("codigo_ica_predio")?,
        ),
        productor: Referencia::from_columns(
            row.try_get("id_productor")?,
            row.try_get("nombre_productor")?,
        ),
        asistente_tecnico: Referencia::from_columns(
            row.try_get("id_asistente_tecnico")?,
            row.try_get("nombre_asistente")?,
        ),
    })
}

#[derive(Clone)]
pub struct SqliteLugarProduccionRepository {
    pool: SqlitePool,
}

impl SqliteLugarProduccionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LugarProduccionRepository for SqliteLugarProduccionRepository {
    async fn insert(&self, lugar: &LugarProduccion) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO lugares_produccion (id, codigo_ica, id_predio, id_productor, \
             id_asistente_tecnico) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&lugar.id)
        .bind(&lugar.codigo_ica)
        .bind(ref_id(&lugar.predio))
        .bind(ref_id(&lugar.productor))
        .bind(ref_id(&lugar.asistente_tecnico))
        .execute(&self.pool)
        .await
        .map_err(db_err("LugarProduccion", &lugar.id))?;
        Ok(())
    }

    async fn update(&self, lugar: &LugarProduccion) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE lugares_produccion SET codigo_ica = ?, id_predio = ?, id_productor = ?, \
             id_asistente_tecnico = ? WHERE id = ?",
        )
        .bind(&lugar.codigo_ica)
        .bind(ref_id(&lugar.predio))
        .bind(ref_id(&lugar.productor))
        .bind(ref_id(&lugar.asistente_tecnico))
        .bind(&lugar.id)
        .execute(&self.pool)
        .await
        .map_err(db_err("LugarProduccion", &lugar.id))?;
        expect_affected(result, "LugarProduccion", &lugar.id)
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM lugares_produccion WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("LugarProduccion", id))?;
        expect_affected(result, "LugarProduccion", id)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<LugarProduccion>, DomainError> {
        let sql = format!("{} WHERE lp.id = ?", SELECT_LUGAR);
        fetch_one_by(&self.pool, &sql, id, "LugarProduccion", lugar_from_row).await
    }

    async fn find_by_codigo_ica(
        &self,
        codigo_ica: &str,
    ) -> Result<Option<LugarProduccion>, DomainError> {
        let sql = format!("{} WHERE lp.codigo_ica = ?", SELECT_LUGAR);
        fetch_one_by(&self.pool, &sql, codigo_ica, "LugarProduccion", lugar_from_row).await
    }

    async fn find_all(&self) -> Result<Vec<LugarProduccion>, DomainError> {
        let sql = format!("{} ORDER BY lp.codigo_ica", SELECT_LUGAR);
        fetch_all(&self.pool, &sql, "LugarProduccion", lugar_from_row).await
    }

    async fn find_by_predio(&self, predio_id: &str) -> Result<Vec<LugarProduccion>, DomainError> {
        let sql = format!("{} WHERE lp.id_predio = ? ORDER BY lp.codigo_ica", SELECT_LUGAR);
        fetch_all_by(&self.pool, &sql, predio_id, "LugarProduccion", lugar_from_row).await
    }

    async fn find_by_productor(
        &self,
        productor_id: &str,
    ) -> Result<Vec<LugarProduccion>, DomainError> {
        let sql = format!("{} WHERE lp.id_productor = ? ORDER BY lp.codigo_ica", SELECT_LUGAR);
        fetch_all_by(&self.pool, &sql, productor_id, "LugarProduccion", lugar_from_row).await
    }

    async fn find_by_asistente(
        &self,
        asistente_id: &str,
    ) -> Result<Vec<LugarProduccion>, DomainError> {
        let sql = format!(
            "{} WHERE lp.id_asistente_tecnico = ? ORDER BY lp.codigo_ica",
            SELECT_LUGAR
        );
        fetch_all_by(&self.pool, &sql, asistente_id, "LugarProduccion", lugar_from_row).await
    }

    async fn find_lotes(&self, id: &str) -> Result<Vec<Lote>, DomainError> {
        let sql = format!("{} WHERE l.id_lugar_produccion = ? ORDER BY l.id", SELECT_LOTE);
        fetch_all_by(&self.pool, &sql, id, "Lote", lote_from_row).await
    }
}
