use super::cultivo_repository::{SELECT_CULTIVO, cultivo_from_row};
use super::plaga_repository::{SELECT_PLAGA, plaga_from_row};
use super::{db_err, expect_affected, fetch_all, fetch_all_by, fetch_one_by, link};
use async_trait::async_trait;
use domain::inspeccion::ResultadoRepository;
use domain::{Cultivo, DomainError, Plaga, Referencia, ResultadoTecnico, ref_id};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

pub(crate) const SELECT_RESULTADO: &str = "SELECT r.id, r.total_plantas_evaluadas, \
     r.plantas_afectadas, r.observaciones, r.id_inspeccion, r.id_informe, \
     i.codigo_ica AS codigo_ica_inspeccion, inf.codigo_ica AS codigo_ica_informe \
     FROM resultados_tecnicos r \
     LEFT JOIN inspecciones_fitosanitarias i ON i.id = r.id_inspeccion \
     LEFT JOIN informes_fitosanitarios inf ON inf.id = r.id_informe";

pub(crate) fn resultado_from_row(row: &SqliteRow) -> Result<ResultadoTecnico, sqlx::Error> {
    Ok(ResultadoTecnico {
        id: row.try_get("id")?,
        total_plantas_evaluadas: row.try_get("total_plantas_evaluadas")?,
        plantas_afectadas: row.try_get("plantas_afectadas")?,
        observaciones: row.try_get("observaciones")?,
        inspeccion: Referencia::from_columns(
            row.try_get("id_inspeccion")?,
            row.try_get("codigo_ica_inspeccion")?,
        ),
        informe: Referencia::from_columns(
            row.try_get("id_informe")?,
            row.try_get("codigo_ica_informe")?,
        ),
    })
}

#[derive(Clone)]
pub struct SqliteResultadoRepository {
    pool: SqlitePool,
}

impl SqliteResultadoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultadoRepository for SqliteResultadoRepository {
    async fn insert(&self, resultado: &ResultadoTecnico) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO resultados_tecnicos (id, total_plantas_evaluadas, plantas_afectadas, \
             observaciones, id_inspeccion, id_informe) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&resultado.id)
        .bind(resultado.total_plantas_evaluadas)
        .bind(resultado.plantas_afectadas)
        .bind(&resultado.observaciones)
        .bind(ref_id(&resultado.inspeccion))
        .bind(ref_id(&resultado.informe))
        .execute(&self.pool)
        .await
        .map_err(db_err("ResultadoTecnico", &resultado.id))?;
        Ok(())
    }

    async fn update(&self, resultado: &ResultadoTecnico) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE resultados_tecnicos SET total_plantas_evaluadas = ?, plantas_afectadas = ?, \
             observaciones = ?, id_inspeccion = ?, id_informe = ? WHERE id = ?",
        )
        .bind(resultado.total_plantas_evaluadas)
        .bind(resultado.plantas_afectadas)
        .bind(&resultado.observaciones)
        .bind(ref_id(&resultado.inspeccion))
        .bind(ref_id(&resultado.informe))
        .bind(&resultado.id)
        .execute(&self.pool)
        .await
        .map_err(db_err("ResultadoTecnico", &resultado.id))?;
        expect_affected(result, "ResultadoTecnico", &resultado.id)
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_err("ResultadoTecnico", id))?;

        for sql in [
            "DELETE FROM resultado_cultivo WHERE id_resultado = ?",
            "DELETE FROM resultado_plaga WHERE id_resultado = ?",
        ] {
            sqlx::query(sql)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_err("ResultadoTecnico", id))?;
        }

        let result = sqlx::query("DELETE FROM resultados_tecnicos WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err("ResultadoTecnico", id))?;
        expect_affected(result, "ResultadoTecnico", id)?;

        tx.commit().await.map_err(db_err("ResultadoTecnico", id))?;
        debug!(id = %id, "ResultadoTecnico deleted");
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ResultadoTecnico>, DomainError> {
        let sql = format!("{} WHERE r.id = ?", SELECT_RESULTADO);
        fetch_one_by(&self.pool, &sql, id, "ResultadoTecnico", resultado_from_row).await
    }

    async fn find_all(&self) -> Result<Vec<ResultadoTecnico>, DomainError> {
        let sql = format!("{} ORDER BY r.id", SELECT_RESULTADO);
        fetch_all(&self.pool, &sql, "ResultadoTecnico", resultado_from_row).await
    }

    async fn find_by_inspeccion(
        &self,
        inspeccion_id: &str,
    ) -> Result<Vec<ResultadoTecnico>, DomainError> {
        let sql = format!("{} WHERE r.id_inspeccion = ? ORDER BY r.id", SELECT_RESULTADO);
        fetch_all_by(&self.pool, &sql, inspeccion_id, "ResultadoTecnico", resultado_from_row).await
    }

    async fn find_by_informe(
        &self,
        informe_id: &str,
    ) -> Result<Vec<ResultadoTecnico>, DomainError> {
        let sql = format!("{} WHERE r.id_informe = ? ORDER BY r.id", SELECT_RESULTADO);
        fetch_all_by(&self.pool, &sql, informe_id, "ResultadoTecnico", resultado_from_row).await
    }

    async fn find_cultivos(&self, id: &str) -> Result<Vec<Cultivo>, DomainError> {
        let sql = format!(
            "{} JOIN resultado_cultivo rc ON rc.id_cultivo = c.id WHERE rc.id_resultado = ? \
             ORDER BY c.nombre_variedad",
            SELECT_CULTIVO
        );
        fetch_all_by(&self.pool, &sql, id, "Cultivo", cultivo_from_row).await
    }

    async fn asociar_cultivo(
        &self,
        resultado_id: &str,
        cultivo_id: &str,
    ) -> Result<(), DomainError> {
        link(
            &self.pool,
            "resultado_cultivo",
            ("id_resultado", "id_cultivo"),
            (resultado_id, cultivo_id),
        )
        .await
    }

    async fn find_plagas(&self, id: &str) -> Result<Vec<Plaga>, DomainError> {
        let sql = format!(
            "{} JOIN resultado_plaga rp ON rp.id_plaga = pl.id WHERE rp.id_resultado = ? \
             ORDER BY pl.nombre_comun",
            SELECT_PLAGA
        );
        fetch_all_by(&self.pool, &sql, id, "Plaga", plaga_from_row).await
    }

    async fn asociar_plaga(&self, resultado_id: &str, plaga_id: &str) -> Result<(), DomainError> {
        link(
            &self.pool,
            "resultado_plaga",
            ("id_resultado", "id_plaga"),
            (resultado_id, plaga_id),
        )
        .await
    }
}
