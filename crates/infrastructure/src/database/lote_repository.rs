use super::cultivo_repository::{SELECT_CULTIVO, cultivo_from_row};
use super::inspeccion_repository::{SELECT_INSPECCION, inspeccion_from_row};
use super::{db_err, expect_affected, fetch_all, fetch_all_by, fetch_one_by, link, unlink};
use async_trait::async_trait;
use domain::predio::LoteRepository;
use domain::{Cultivo, DomainError, InspeccionFitosanitaria, Lote, Referencia, ref_id};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

pub(crate) const SELECT_LOTE: &str = "SELECT l.id, l.descripcion, l.extension, \
     l.id_lugar_produccion, lp.codigo_ica AS codigo_ica_lugar \
     FROM lotes l LEFT JOIN lugares_produccion lp ON lp.id = l.id_lugar_produccion";

pub(crate) fn lote_from_row(row: &SqliteRow) -> Result<Lote, sqlx::Error> {
    Ok(Lote {
        id: row.try_get("id")?,
        descripcion: row.try_get("descripcion")?,
        extension: row.try_get("extension")?,
        lugar_produccion: Referencia::from_columns(
            row.try_get("id_lugar_produccion")?,
            row.try_get("codigo_ica_lugar")?,
        ),
    })
}

#[derive(Clone)]
pub struct SqliteLoteRepository {
    pool: SqlitePool,
}

impl SqliteLoteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoteRepository for SqliteLoteRepository {
    async fn insert(&self, lote: &Lote) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO lotes (id, descripcion, extension, id_lugar_produccion) VALUES (?, ?, ?, ?)",
        )
        .bind(&lote.id)
        .bind(&lote.descripcion)
        .bind(lote.extension)
        .bind(ref_id(&lote.lugar_produccion))
        .execute(&self.pool)
        .await
        .map_err(db_err("Lote", &lote.id))?;
        Ok(())
    }

    async fn update(&self, lote: &Lote) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE lotes SET descripcion = ?, extension = ?, id_lugar_produccion = ? WHERE id = ?",
        )
        .bind(&lote.descripcion)
        .bind(lote.extension)
        .bind(ref_id(&lote.lugar_produccion))
        .bind(&lote.id)
        .execute(&self.pool)
        .await
        .map_err(db_err("Lote", &lote.id))?;
        expect_affected(result, "Lote", &lote.id)
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_err("Lote", id))?;

        for sql in [
            "DELETE FROM lote_cultivo WHERE id_lote = ?",
            "DELETE FROM inspeccion_lote WHERE id_lote = ?",
        ] {
            sqlx::query(sql)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_err("Lote", id))?;
        }

        let result = sqlx::query("DELETE FROM lotes WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Lote", id))?;
        expect_affected(result, "Lote", id)?;

        tx.commit().await.map_err(db_err("Lote", id))?;
        debug!(id = %id, "Lote deleted");
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Lote>, DomainError> {
        let sql = format!("{} WHERE l.id = ?", SELECT_LOTE);
        fetch_one_by(&self.pool, &sql, id, "Lote", lote_from_row).await
    }

    async fn find_all(&self) -> Result<Vec<Lote>, DomainError> {
        let sql = format!("{} ORDER BY l.id", SELECT_LOTE);
        fetch_all(&self.pool, &sql, "Lote", lote_from_row).await
    }

    async fn find_by_lugar_produccion(&self, lugar_id: &str) -> Result<Vec<Lote>, DomainError> {
        let sql = format!("{} WHERE l.id_lugar_produccion = ? ORDER BY l.id", SELECT_LOTE);
        fetch_all_by(&self.pool, &sql, lugar_id, "Lote", lote_from_row).await
    }

    async fn find_cultivos(&self, id: &str) -> Result<Vec<Cultivo>, DomainError> {
        let sql = format!(
            "{} JOIN lote_cultivo lc ON lc.id_cultivo = c.id WHERE lc.id_lote = ? \
             ORDER BY c.nombre_variedad",
            SELECT_CULTIVO
        );
        fetch_all_by(&self.pool, &sql, id, "Cultivo", cultivo_from_row).await
    }

    async fn asociar_cultivo(&self, lote_id: &str, cultivo_id: &str) -> Result<(), DomainError> {
        link(
            &self.pool,
            "lote_cultivo",
            ("id_lote", "id_cultivo"),
            (lote_id, cultivo_id),
        )
        .await
    }

    async fn desasociar_cultivo(
        &self,
        lote_id: &str,
        cultivo_id: &str,
    ) -> Result<(), DomainError> {
        unlink(
            &self.pool,
            "lote_cultivo",
            ("id_lote", "id_cultivo"),
            (lote_id, cultivo_id),
        )
        .await
    }

    async fn find_inspecciones(
        &self,
        id: &str,
    ) -> Result<Vec<InspeccionFitosanitaria>, DomainError> {
        let sql = format!(
            "{} JOIN inspeccion_lote il ON il.id_inspeccion = i.id WHERE il.id_lote = ? \
             ORDER BY i.fecha_inspeccion DESC",
            SELECT_INSPECCION
        );
        fetch_all_by(&self.pool, &sql, id, "InspeccionFitosanitaria", inspeccion_from_row).await
    }
}
