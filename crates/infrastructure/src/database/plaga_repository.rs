use super::cultivo_repository::{SELECT_CULTIVO, cultivo_from_row};
use super::resultado_repository::{SELECT_RESULTADO, resultado_from_row};
use super::{db_err, expect_affected, fetch_all, fetch_all_by, fetch_one_by};
use async_trait::async_trait;
use domain::cultivo::PlagaRepository;
use domain::{Cultivo, DomainError, Plaga, ResultadoTecnico};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

pub(crate) const SELECT_PLAGA: &str =
    "SELECT pl.id, pl.nombre_comun, pl.nombre_cientifico, pl.descripcion FROM plagas pl";

pub(crate) fn plaga_from_row(row: &SqliteRow) -> Result<Plaga, sqlx::Error> {
    Ok(Plaga {
        id: row.try_get("id")?,
        nombre_comun: row.try_get("nombre_comun")?,
        nombre_cientifico: row.try_get("nombre_cientifico")?,
        descripcion: row.try_get("descripcion")?,
    })
}

#[derive(Clone)]
pub struct SqlitePlagaRepository {
    pool: SqlitePool,
}

impl SqlitePlagaRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlagaRepository for SqlitePlagaRepository {
    async fn insert(&self, plaga: &Plaga) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO plagas (id, nombre_comun, nombre_cientifico, descripcion) VALUES (?, ?, ?, ?)",
        )
        .bind(&plaga.id)
        .bind(&plaga.nombre_comun)
        .bind(&plaga.nombre_cientifico)
        .bind(&plaga.descripcion)
        .execute(&self.pool)
        .await
        .map_err(db_err("Plaga", &plaga.id))?;
        Ok(())
    }

    async fn update(&self, plaga: &Plaga) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE plagas SET nombre_comun = ?, nombre_cientifico = ?, descripcion = ? WHERE id = ?",
        )
        .bind(&plaga.nombre_comun)
        .bind(&plaga.nombre_cientifico)
        .bind(&plaga.descripcion)
        .bind(&plaga.id)
        .execute(&self.pool)
        .await
        .map_err(db_err("Plaga", &plaga.id))?;
        expect_affected(result, "Plaga", &plaga.id)
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_err("Plaga", id))?;

        for sql in [
            "DELETE FROM cultivo_plaga WHERE id_plaga = ?",
            "DELETE FROM resultado_plaga WHERE id_plaga = ?",
        ] {
            sqlx::query(sql)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_err("Plaga", id))?;
        }

        let result = sqlx::query("DELETE FROM plagas WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Plaga", id))?;
        expect_affected(result, "Plaga", id)?;

        tx.commit().await.map_err(db_err("Plaga", id))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Plaga>, DomainError> {
        let sql = format!("{} WHERE pl.id = ?", SELECT_PLAGA);
        fetch_one_by(&self.pool, &sql, id, "Plaga", plaga_from_row).await
    }

    async fn find_all(&self) -> Result<Vec<Plaga>, DomainError> {
        let sql = format!("{} ORDER BY pl.nombre_comun", SELECT_PLAGA);
        fetch_all(&self.pool, &sql, "Plaga", plaga_from_row).await
    }

    async fn find_by_nombre_comun(&self, nombre: &str) -> Result<Vec<Plaga>, DomainError> {
        let sql = format!(
            "{} WHERE pl.nombre_comun LIKE '%' || ? || '%' ORDER BY pl.nombre_comun",
            SELECT_PLAGA
        );
        fetch_all_by(&self.pool, &sql, nombre, "Plaga", plaga_from_row).await
    }

    async fn find_by_nombre_cientifico(&self, nombre: &str) -> Result<Vec<Plaga>, DomainError> {
        let sql = format!(
            "{} WHERE pl.nombre_cientifico LIKE '%' || ? || '%' ORDER BY pl.nombre_cientifico",
            SELECT_PLAGA
        );
        fetch_all_by(&self.pool, &sql, nombre, "Plaga", plaga_from_row).await
    }

    async fn find_cultivos_afectados(&self, id: &str) -> Result<Vec<Cultivo>, DomainError> {
        let sql = format!(
            "{} JOIN cultivo_plaga cp ON cp.id_cultivo = c.id WHERE cp.id_plaga = ? \
             ORDER BY c.nombre_variedad",
            SELECT_CULTIVO
        );
        fetch_all_by(&self.pool, &sql, id, "Cultivo", cultivo_from_row).await
    }

    async fn find_resultados(&self, id: &str) -> Result<Vec<ResultadoTecnico>, DomainError> {
        let sql = format!(
            "{} JOIN resultado_plaga rp ON rp.id_resultado = r.id WHERE rp.id_plaga = ? \
             ORDER BY r.id",
            SELECT_RESULTADO
        );
        fetch_all_by(&self.pool, &sql, id, "ResultadoTecnico", resultado_from_row).await
    }

    async fn count_detecciones(&self, id: &str) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM resultado_plaga WHERE id_plaga = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Plaga", id))
    }
}
