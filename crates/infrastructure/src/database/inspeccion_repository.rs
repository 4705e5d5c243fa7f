use super::lote_repository::{SELECT_LOTE, lote_from_row};
use super::resultado_repository::{SELECT_RESULTADO, resultado_from_row};
use super::{db_err, expect_affected, fetch_all, fetch_all_by, fetch_one_by, link};
use async_trait::async_trait;
use chrono::NaiveDate;
use domain::inspeccion::InspeccionRepository;
use domain::{DomainError, InspeccionFitosanitaria, Lote, Referencia, ResultadoTecnico, ref_id};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

pub(crate) const SELECT_INSPECCION: &str = "SELECT i.id, i.codigo_ica, i.fecha_inspeccion, \
     i.id_asistente_tecnico, ua.nombre AS nombre_asistente \
     FROM inspecciones_fitosanitarias i \
     LEFT JOIN usuarios ua ON ua.id = i.id_asistente_tecnico";

pub(crate) fn inspeccion_from_row(row: &SqliteRow) -> Result<InspeccionFitosanitaria, sqlx::Error> {
    Ok(InspeccionFitosanitaria {
        id: row.try_get("id")?,
        codigo_ica: row.try_get("codigo_ica")?,
        fecha_inspeccion: row.try_get("fecha_inspeccion")?,
        asistente_tecnico: Referencia::from_columns(
            row.try_get("id_asistente_tecnico")?,
            row.try_get("nombre_asistente")?,
        ),
    })
}

#[derive(Clone)]
pub struct SqliteInspeccionRepository {
    pool: SqlitePool,
}

impl SqliteInspeccionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InspeccionRepository for SqliteInspeccionRepository {
    async fn insert(&self, inspeccion: &InspeccionFitosanitaria) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO inspecciones_fitosanitarias (id, codigo_ica, fecha_inspeccion, \
             id_asistente_tecnico) VALUES (?, ?, ?, ?)",
        )
        .bind(&inspeccion.id)
        .bind(&inspeccion.codigo_ica)
        .bind(inspeccion.fecha_inspeccion)
        .bind(ref_id(&inspeccion.asistente_tecnico))
        .execute(&self.pool)
        .await
        .map_err(db_err("InspeccionFitosanitaria", &inspeccion.id))?;
        Ok(())
    }

    async fn update(&self, inspeccion: &InspeccionFitosanitaria) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE inspecciones_fitosanitarias SET codigo_ica = ?, fecha_inspeccion = ?, \
             id_asistente_tecnico = ? WHERE id = ?",
        )
        .bind(&inspeccion.codigo_ica)
        .bind(inspeccion.fecha_inspeccion)
        .bind(ref_id(&inspeccion.asistente_tecnico))
        .bind(&inspeccion.id)
        .execute(&self.pool)
        .await
        .map_err(db_err("InspeccionFitosanitaria", &inspeccion.id))?;
        expect_affected(result, "InspeccionFitosanitaria", &inspeccion.id)
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let entity = "InspeccionFitosanitaria";
        let mut tx = self.pool.begin().await.map_err(db_err(entity, id))?;

        for sql in [
            "DELETE FROM inspeccion_lote WHERE id_inspeccion = ?",
            "UPDATE resultados_tecnicos SET id_inspeccion = NULL WHERE id_inspeccion = ?",
        ] {
            sqlx::query(sql)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_err(entity, id))?;
        }

        let result = sqlx::query("DELETE FROM inspecciones_fitosanitarias WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err(entity, id))?;
        expect_affected(result, entity, id)?;

        tx.commit().await.map_err(db_err(entity, id))?;
        debug!(id = %id, "Inspeccion deleted");
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<InspeccionFitosanitaria>, DomainError> {
        let sql = format!("{} WHERE i.id = ?", SELECT_INSPECCION);
        fetch_one_by(&self.pool, &sql, id, "InspeccionFitosanitaria", inspeccion_from_row).await
    }

    async fn find_by_codigo_ica(
        &self,
        codigo_ica: &str,
    ) -> Result<Option<InspeccionFitosanitaria>, DomainError> {
        let sql = format!(
            "{} WHERE i.codigo_ica = ? ORDER BY i.fecha_inspeccion DESC LIMIT 1",
            SELECT_INSPECCION
        );
        fetch_one_by(&self.pool, &sql, codigo_ica, "InspeccionFitosanitaria", inspeccion_from_row)
            .await
    }

    async fn find_all(&self) -> Result<Vec<InspeccionFitosanitaria>, DomainError> {
        let sql = format!("{} ORDER BY i.fecha_inspeccion DESC", SELECT_INSPECCION);
        fetch_all(&self.pool, &sql, "InspeccionFitosanitaria", inspeccion_from_row).await
    }

    async fn find_by_asistente(
        &self,
        asistente_id: &str,
    ) -> Result<Vec<InspeccionFitosanitaria>, DomainError> {
        let sql = format!(
            "{} WHERE i.id_asistente_tecnico = ? ORDER BY i.fecha_inspeccion DESC",
            SELECT_INSPECCION
        );
        fetch_all_by(&self.pool, &sql, asistente_id, "InspeccionFitosanitaria", inspeccion_from_row)
            .await
    }

    async fn find_by_rango_fechas(
        &self,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<Vec<InspeccionFitosanitaria>, DomainError> {
        let sql = format!(
            "{} WHERE i.fecha_inspeccion BETWEEN ? AND ? ORDER BY i.fecha_inspeccion DESC",
            SELECT_INSPECCION
        );
        let key = format!("{}..{}", desde, hasta);
        let rows = sqlx::query(&sql)
            .bind(desde)
            .bind(hasta)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("InspeccionFitosanitaria", key.clone()))?;

        rows.iter()
            .map(inspeccion_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err("InspeccionFitosanitaria", key))
    }

    async fn find_lotes(&self, id: &str) -> Result<Vec<Lote>, DomainError> {
        let sql = format!(
            "{} JOIN inspeccion_lote il ON il.id_lote = l.id WHERE il.id_inspeccion = ? ORDER BY l.id",
            SELECT_LOTE
        );
        fetch_all_by(&self.pool, &sql, id, "Lote", lote_from_row).await
    }

    async fn asociar_lote(&self, inspeccion_id: &str, lote_id: &str) -> Result<(), DomainError> {
        link(
            &self.pool,
            "inspeccion_lote",
            ("id_inspeccion", "id_lote"),
            (inspeccion_id, lote_id),
        )
        .await
    }

    async fn find_resultados(&self, id: &str) -> Result<Vec<ResultadoTecnico>, DomainError> {
        let sql = format!("{} WHERE r.id_inspeccion = ? ORDER BY r.id", SELECT_RESULTADO);
        fetch_all_by(&self.pool, &sql, id, "ResultadoTecnico", resultado_from_row).await
    }
}
