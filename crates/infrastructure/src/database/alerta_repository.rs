use super::{db_err, decode_err, expect_affected, fetch_all, fetch_all_by, fetch_one_by};
use async_trait::async_trait;
use domain::informe::{AlertaRepository, EstadisticaNivel, InformeResumen};
use domain::{Alerta, DomainError, NivelRiesgo};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

pub(crate) const SELECT_ALERTA: &str = "SELECT a.id, a.nivel_riesgo, a.id_informe, \
     inf.codigo_ica AS codigo_ica_informe, inf.nivel_incidencia, inf.fecha_informe \
     FROM alertas a LEFT JOIN informes_fitosanitarios inf ON inf.id = a.id_informe";

pub(crate) fn alerta_from_row(row: &SqliteRow) -> Result<Alerta, sqlx::Error> {
    let nivel: String = row.try_get("nivel_riesgo")?;
    Ok(Alerta {
        id: row.try_get("id")?,
        nivel_riesgo: nivel.parse::<NivelRiesgo>().map_err(decode_err)?,
        informe: InformeResumen {
            id: row.try_get("id_informe")?,
            codigo_ica: row.try_get("codigo_ica_informe")?,
            nivel_incidencia: row.try_get("nivel_incidencia")?,
            fecha_informe: row.try_get("fecha_informe")?,
        },
    })
}

fn estadistica_from_row(row: &SqliteRow) -> Result<EstadisticaNivel, sqlx::Error> {
    let nivel: String = row.try_get("nivel_riesgo")?;
    Ok(EstadisticaNivel {
        nivel_riesgo: nivel.parse::<NivelRiesgo>().map_err(decode_err)?,
        total: row.try_get("total")?,
    })
}

#[derive(Clone)]
pub struct SqliteAlertaRepository {
    pool: SqlitePool,
}

impl SqliteAlertaRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertaRepository for SqliteAlertaRepository {
    async fn insert(&self, alerta: &Alerta) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO alertas (id, nivel_riesgo, id_informe) VALUES (?, ?, ?)")
            .bind(&alerta.id)
            .bind(alerta.nivel_riesgo.as_str())
            .bind(&alerta.informe.id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Alerta", &alerta.id))?;
        Ok(())
    }

    async fn update(&self, alerta: &Alerta) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE alertas SET nivel_riesgo = ?, id_informe = ? WHERE id = ?")
            .bind(alerta.nivel_riesgo.as_str())
            .bind(&alerta.informe.id)
            .bind(&alerta.id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Alerta", &alerta.id))?;
        expect_affected(result, "Alerta", &alerta.id)
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM alertas WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Alerta", id))?;
        expect_affected(result, "Alerta", id)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Alerta>, DomainError> {
        let sql = format!("{} WHERE a.id = ?", SELECT_ALERTA);
        fetch_one_by(&self.pool, &sql, id, "Alerta", alerta_from_row).await
    }

    async fn find_all(&self) -> Result<Vec<Alerta>, DomainError> {
        let sql = format!("{} ORDER BY inf.fecha_informe DESC, a.id", SELECT_ALERTA);
        fetch_all(&self.pool, &sql, "Alerta", alerta_from_row).await
    }

    async fn find_by_nivel(&self, nivel: NivelRiesgo) -> Result<Vec<Alerta>, DomainError> {
        let sql = format!(
            "{} WHERE a.nivel_riesgo = ? ORDER BY inf.fecha_informe DESC, a.id",
            SELECT_ALERTA
        );
        fetch_all_by(&self.pool, &sql, nivel.as_str(), "Alerta", alerta_from_row).await
    }

    async fn find_by_informe(&self, informe_id: &str) -> Result<Vec<Alerta>, DomainError> {
        let sql = format!("{} WHERE a.id_informe = ? ORDER BY a.id", SELECT_ALERTA);
        fetch_all_by(&self.pool, &sql, informe_id, "Alerta", alerta_from_row).await
    }

    async fn find_activas(&self) -> Result<Vec<Alerta>, DomainError> {
        let sql = format!(
            "{} WHERE a.nivel_riesgo IN ('Alto', 'Crítico') ORDER BY inf.fecha_informe DESC, a.id",
            SELECT_ALERTA
        );
        fetch_all(&self.pool, &sql, "Alerta", alerta_from_row).await
    }

    async fn count_by_nivel(&self, nivel: NivelRiesgo) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM alertas WHERE nivel_riesgo = ?")
            .bind(nivel.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Alerta", nivel.as_str()))
    }

    async fn estadisticas_por_nivel(&self) -> Result<Vec<EstadisticaNivel>, DomainError> {
        fetch_all(
            &self.pool,
            "SELECT nivel_riesgo, COUNT(*) AS total FROM alertas \
             GROUP BY nivel_riesgo ORDER BY total DESC, nivel_riesgo",
            "Alerta",
            estadistica_from_row,
        )
        .await
    }
}
