use super::lote_repository::{SELECT_LOTE, lote_from_row};
use super::plaga_repository::{SELECT_PLAGA, plaga_from_row};
use super::resultado_repository::{SELECT_RESULTADO, resultado_from_row};
use super::{db_err, expect_affected, fetch_all, fetch_all_by, fetch_one_by, link, unlink};
use async_trait::async_trait;
use domain::cultivo::CultivoRepository;
use domain::{Cultivo, DomainError, Lote, Plaga, ResultadoTecnico};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

pub(crate) const SELECT_CULTIVO: &str = "SELECT c.id, c.nombre_variedad, c.nombre_cultivo, \
     c.especie_vegetal, c.descripcion FROM cultivos c";

pub(crate) fn cultivo_from_row(row: &SqliteRow) -> Result<Cultivo, sqlx::Error> {
    Ok(Cultivo {
        id: row.try_get("id")?,
        nombre_variedad: row.try_get("nombre_variedad")?,
        nombre_cultivo: row.try_get("nombre_cultivo")?,
        especie_vegetal: row.try_get("especie_vegetal")?,
        descripcion: row.try_get("descripcion")?,
    })
}

#[derive(Clone)]
pub struct SqliteCultivoRepository {
    pool: SqlitePool,
}

impl SqliteCultivoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CultivoRepository for SqliteCultivoRepository {
    async fn insert(&self, cultivo: &Cultivo) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO cultivos (id, nombre_variedad, nombre_cultivo, especie_vegetal, descripcion) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&cultivo.id)
        .bind(&cultivo.nombre_variedad)
        .bind(&cultivo.nombre_cultivo)
        .bind(&cultivo.especie_vegetal)
        .bind(&cultivo.descripcion)
        .execute(&self.pool)
        .await
        .map_err(db_err("Cultivo", &cultivo.id))?;
        Ok(())
    }

    async fn update(&self, cultivo: &Cultivo) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE cultivos SET nombre_variedad = ?, nombre_cultivo = ?, especie_vegetal = ?, \
             descripcion = ? WHERE id = ?",
        )
        .bind(&cultivo.nombre_variedad)
        .bind(&cultivo.nombre_cultivo)
        .bind(&cultivo.especie_vegetal)
        .bind(&cultivo.descripcion)
        .bind(&cultivo.id)
        .execute(&self.pool)
        .await
        .map_err(db_err("Cultivo", &cultivo.id))?;
        expect_affected(result, "Cultivo", &cultivo.id)
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_err("Cultivo", id))?;

        for sql in [
            "DELETE FROM cultivo_plaga WHERE id_cultivo = ?",
            "DELETE FROM lote_cultivo WHERE id_cultivo = ?",
            "DELETE FROM resultado_cultivo WHERE id_cultivo = ?",
        ] {
            sqlx::query(sql)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_err("Cultivo", id))?;
        }

        let result = sqlx::query("DELETE FROM cultivos WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Cultivo", id))?;
        expect_affected(result, "Cultivo", id)?;

        tx.commit().await.map_err(db_err("Cultivo", id))?;
        debug!(id = %id, "Cultivo deleted");
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Cultivo>, DomainError> {
        let sql = format!("{} WHERE c.id = ?", SELECT_CULTIVO);
        fetch_one_by(&self.pool, &sql, id, "Cultivo", cultivo_from_row).await
    }

    async fn find_all(&self) -> Result<Vec<Cultivo>, DomainError> {
        let sql = format!("{} ORDER BY c.nombre_variedad", SELECT_CULTIVO);
        fetch_all(&self.pool, &sql, "Cultivo", cultivo_from_row).await
    }

    async fn find_by_nombre(&self, nombre: &str) -> Result<Vec<Cultivo>, DomainError> {
        let sql = format!(
            "{} WHERE c.nombre_cultivo LIKE '%' || ?1 || '%' \
             OR c.nombre_variedad LIKE '%' || ?1 || '%' ORDER BY c.nombre_variedad",
            SELECT_CULTIVO
        );
        fetch_all_by(&self.pool, &sql, nombre, "Cultivo", cultivo_from_row).await
    }

    async fn find_lotes(&self, id: &str) -> Result<Vec<Lote>, DomainError> {
        let sql = format!(
            "{} JOIN lote_cultivo lc ON lc.id_lote = l.id WHERE lc.id_cultivo = ? ORDER BY l.id",
            SELECT_LOTE
        );
        fetch_all_by(&self.pool, &sql, id, "Lote", lote_from_row).await
    }

    async fn find_plagas(&self, id: &str) -> Result<Vec<Plaga>, DomainError> {
        let sql = format!(
            "{} JOIN cultivo_plaga cp ON cp.id_plaga = pl.id WHERE cp.id_cultivo = ? \
             ORDER BY pl.nombre_comun",
            SELECT_PLAGA
        );
        fetch_all_by(&self.pool, &sql, id, "Plaga", plaga_from_row).await
    }

    async fn asociar_plaga(&self, cultivo_id: &str, plaga_id: &str) -> Result<(), DomainError> {
        link(
            &self.pool,
            "cultivo_plaga",
            ("id_cultivo", "id_plaga"),
            (cultivo_id, plaga_id),
        )
        .await
    }

    async fn desasociar_plaga(&self, cultivo_id: &str, plaga_id: &str) -> Result<(), DomainError> {
        unlink(
            &self.pool,
            "cultivo_plaga",
            ("id_cultivo", "id_plaga"),
            (cultivo_id, plaga_id),
        )
        .await
    }

    async fn find_resultados(&self, id: &str) -> Result<Vec<ResultadoTecnico>, DomainError> {
        let sql = format!(
            "{} JOIN resultado_cultivo rc ON rc.id_resultado = r.id WHERE rc.id_cultivo = ? \
             ORDER BY r.id",
            SELECT_RESULTADO
        );
        fetch_all_by(&self.pool, &sql, id, "ResultadoTecnico", resultado_from_row).await
    }
}
