use super::alerta_repository::{SELECT_ALERTA, alerta_from_row};
use super::resultado_repository::{SELECT_RESULTADO, resultado_from_row};
use super::{db_err, expect_affected, fetch_all, fetch_all_by, fetch_one_by};
use async_trait::async_trait;
use chrono::NaiveDate;
use domain::informe::InformeRepository;
use domain::{Alerta, DomainError, InformeFitosanitario, ResultadoTecnico};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

const SELECT_INFORME: &str = "SELECT inf.id, inf.codigo_ica, inf.total_plantas_evaluadas, \
     inf.nivel_incidencia, inf.observaciones, inf.fecha_informe \
     FROM informes_fitosanitarios inf";

fn informe_from_row(row: &SqliteRow) -> Result<InformeFitosanitario, sqlx::Error> {
    Ok(InformeFitosanitario {
        id: row.try_get("id")?,
        codigo_ica: row.try_get("codigo_ica")?,
        total_plantas_evaluadas: row.try_get("total_plantas_evaluadas")?,
        nivel_incidencia: row.try_get("nivel_incidencia")?,
        observaciones: row.try_get("observaciones")?,
        fecha_informe: row.try_get("fecha_informe")?,
    })
}

#[derive(Clone)]
pub struct SqliteInformeRepository {
    pool: SqlitePool,
}

impl SqliteInformeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InformeRepository for SqliteInformeRepository {
    async fn insert(&self, informe: &InformeFitosanitario) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO informes_fitosanitarios (id, codigo_ica, total_plantas_evaluadas, \
             nivel_incidencia, observaciones, fecha_informe) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&informe.id)
        .bind(&informe.codigo_ica)
        .bind(informe.total_plantas_evaluadas)
        .bind(informe.nivel_incidencia)
        .bind(&informe.observaciones)
        .bind(informe.fecha_informe)
        .execute(&self.pool)
        .await
        .map_err(db_err("InformeFitosanitario", &informe.id))?;
        Ok(())
    }

    async fn update(&self, informe: &InformeFitosanitario) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE informes_fitosanitarios SET codigo_ica = ?, total_plantas_evaluadas = ?, \
             nivel_incidencia = ?, observaciones = ?, fecha_informe = ? WHERE id = ?",
        )
        .bind(&informe.codigo_ica)
        .bind(informe.total_plantas_evaluadas)
        .bind(informe.nivel_incidencia)
        .bind(&informe.observaciones)
        .bind(informe.fecha_informe)
        .bind(&informe.id)
        .execute(&self.pool)
        .await
        .map_err(db_err("InformeFitosanitario", &informe.id))?;
        expect_affected(result, "InformeFitosanitario", &informe.id)
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let entity = "InformeFitosanitario";
        let mut tx = self.pool.begin().await.map_err(db_err(entity, id))?;

        for sql in [
            "DELETE FROM alertas WHERE id_informe = ?",
            "UPDATE resultados_tecnicos SET id_informe = NULL WHERE id_informe = ?",
        ] {
            sqlx::query(sql)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_err(entity, id))?;
        }

        let result = sqlx::query("DELETE FROM informes_fitosanitarios WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err(entity, id))?;
        expect_affected(result, entity, id)?;

        tx.commit().await.map_err(db_err(entity, id))?;
        debug!(id = %id, "Informe deleted");
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<InformeFitosanitario>, DomainError> {
        let sql = format!("{} WHERE inf.id = ?", SELECT_INFORME);
        fetch_one_by(&self.pool, &sql, id, "InformeFitosanitario", informe_from_row).await
    }

    async fn find_by_codigo_ica(
        &self,
        codigo_ica: &str,
    ) -> Result<Option<InformeFitosanitario>, DomainError> {
        let sql = format!(
            "{} WHERE inf.codigo_ica = ? ORDER BY inf.fecha_informe DESC LIMIT 1",
            SELECT_INFORME
        );
        fetch_one_by(&self.pool, &sql, codigo_ica, "InformeFitosanitario", informe_from_row).await
    }

    async fn find_all(&self) -> Result<Vec<InformeFitosanitario>, DomainError> {
        let sql = format!("{} ORDER BY inf.fecha_informe DESC", SELECT_INFORME);
        fetch_all(&self.pool, &sql, "InformeFitosanitario", informe_from_row).await
    }

    async fn find_by_rango_fechas(
        &self,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<Vec<InformeFitosanitario>, DomainError> {
        let sql = format!(
            "{} WHERE inf.fecha_informe BETWEEN ? AND ? ORDER BY inf.fecha_informe DESC",
            SELECT_INFORME
        );
        let key = format!("{}..{}", desde, hasta);
        let rows = sqlx::query(&sql)
            .bind(desde)
            .bind(hasta)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("InformeFitosanitario", key.clone()))?;

        rows.iter()
            .map(informe_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err("InformeFitosanitario", key))
    }

    async fn find_by_nivel_minimo(
        &self,
        nivel_minimo: f64,
    ) -> Result<Vec<InformeFitosanitario>, DomainError> {
        let sql = format!(
            "{} WHERE inf.nivel_incidencia >= ? ORDER BY inf.nivel_incidencia DESC",
            SELECT_INFORME
        );
        let key = nivel_minimo.to_string();
        let rows = sqlx::query(&sql)
            .bind(nivel_minimo)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("InformeFitosanitario", key.clone()))?;

        rows.iter()
            .map(informe_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err("InformeFitosanitario", key))
    }

    async fn find_resultados(&self, id: &str) -> Result<Vec<ResultadoTecnico>, DomainError> {
        let sql = format!("{} WHERE r.id_informe = ? ORDER BY r.id", SELECT_RESULTADO);
        fetch_all_by(&self.pool, &sql, id, "ResultadoTecnico", resultado_from_row).await
    }

    async fn find_alertas(&self, id: &str) -> Result<Vec<Alerta>, DomainError> {
        let sql = format!("{} WHERE a.id_informe = ? ORDER BY a.id", SELECT_ALERTA);
        fetch_all_by(&self.pool, &sql, id, "Alerta", alerta_from_row).await
    }

    async fn promedio_incidencia(&self) -> Result<f64, DomainError> {
        let promedio: Option<f64> =
            sqlx::query_scalar("SELECT AVG(nivel_incidencia) FROM informes_fitosanitarios")
                .fetch_one(&self.pool)
                .await
                .map_err(db_err("InformeFitosanitario", "*"))?;
        Ok(promedio.unwrap_or(0.0))
    }

    async fn total_plantas_evaluadas(&self) -> Result<i64, DomainError> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_plantas_evaluadas), 0) FROM informes_fitosanitarios",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("InformeFitosanitario", "*"))
    }
}
