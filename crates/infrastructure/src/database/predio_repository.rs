use super::lugar_produccion_repository::{SELECT_LUGAR, lugar_from_row};
use super::{db_err, expect_affected, fetch_all, fetch_all_by, fetch_one_by};
use async_trait::async_trait;
use domain::predio::PredioRepository;
use domain::{DomainError, LugarProduccion, Predio, Referencia, ref_id};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

pub(crate) const SELECT_PREDIO: &str = "SELECT p.id, p.codigo_ica, p.direccion, p.area, \
     p.latitud, p.longitud, p.id_propietario, p.id_vereda, p.cod_lugar_produccion, \
     u.nombre AS nombre_propietario, v.nombre AS nombre_vereda \
     FROM predios p \
     LEFT JOIN usuarios u ON u.id = p.id_propietario \
     LEFT JOIN vereda v ON v.id = p.id_vereda";

pub(crate) fn predio_from_row(row: &SqliteRow) -> Result<Predio, sqlx::Error> {
    Ok(Predio {
        id: row.try_get("id")?,
        codigo_ica: row.try_get("codigo_ica")?,
        direccion: row.try_get("direccion")?,
        area: row.try_get("area")?,
        latitud: row.try_get("latitud")?,
        longitud: row.try_get("longitud")?,
        propietario: Referencia::from_columns(
            row.try_get("id_propietario")?,
            row.try_get("nombre_propietario")?,
        ),
        vereda: Referencia::from_columns(row.try_get("id_vereda")?, row.try_get("nombre_vereda")?),
        cod_lugar_produccion: row.try_get("cod_lugar_produccion")?,
    })
}

#[derive(Clone)]
pub struct SqlitePredioRepository {
    pool: SqlitePool,
}

impl SqlitePredioRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PredioRepository for SqlitePredioRepository {
    async fn insert(&self, predio: &Predio) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO predios (id, codigo_ica, direccion, area, latitud, longitud, \
             id_propietario, id_vereda, cod_lugar_produccion) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&predio.id)
        .bind(&predio.codigo_ica)
        .bind(&predio.direccion)
        .bind(predio.area)
        .bind(predio.latitud)
        .bind(predio.longitud)
        .bind(ref_id(&predio.propietario))
        .bind(ref_id(&predio.vereda))
        .bind(&predio.cod_lugar_produccion)
        .execute(&self.pool)
        .await
        .map_err(db_err("Predio", &predio.id))?;
        Ok(())
    }

    async fn update(&self, predio: &Predio) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE predios SET codigo_ica = ?, direccion = ?, area = ?, latitud = ?, \
             longitud = ?, id_propietario = ?, id_vereda = ?, cod_lugar_produccion = ? \
             WHERE id = ?",
        )
        .bind(&predio.codigo_ica)
        .bind(&predio.direccion)
        .bind(predio.area)
        .bind(predio.latitud)
        .bind(predio.longitud)
        .bind(ref_id(&predio.propietario))
        .bind(ref_id(&predio.vereda))
        .bind(&predio.cod_lugar_produccion)
        .bind(&predio.id)
        .execute(&self.pool)
        .await
        .map_err(db_err("Predio", &predio.id))?;
        expect_affected(result, "Predio", &predio.id)
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM predios WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Predio", id))?;
        expect_affected(result, "Predio", id)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Predio>, DomainError> {
        let sql = format!("{} WHERE p.id = ?", SELECT_PREDIO);
        fetch_one_by(&self.pool, &sql, id, "Predio", predio_from_row).await
    }

    async fn find_by_codigo_ica(&self, codigo_ica: &str) -> Result<Option<Predio>, DomainError> {
        let sql = format!("{} WHERE p.codigo_ica = ?", SELECT_PREDIO);
        fetch_one_by(&self.pool, &sql, codigo_ica, "Predio", predio_from_row).await
    }

    async fn find_all(&self) -> Result<Vec<Predio>, DomainError> {
        let sql = format!("{} ORDER BY p.codigo_ica", SELECT_PREDIO);
        fetch_all(&self.pool, &sql, "Predio", predio_from_row).await
    }

    async fn find_by_propietario(&self, propietario_id: &str) -> Result<Vec<Predio>, DomainError> {
        let sql = format!("{} WHERE p.id_propietario = ? ORDER BY p.codigo_ica", SELECT_PREDIO);
        fetch_all_by(&self.pool, &sql, propietario_id, "Predio", predio_from_row).await
    }

    async fn find_by_vereda(&self, vereda_id: &str) -> Result<Vec<Predio>, DomainError> {
        let sql = format!("{} WHERE p.id_vereda = ? ORDER BY p.codigo_ica", SELECT_PREDIO);
        fetch_all_by(&self.pool, &sql, vereda_id, "Predio", predio_from_row).await
    }

    async fn find_lugares_produccion(
        &self,
        id: &str,
    ) -> Result<Vec<LugarProduccion>, DomainError> {
        let sql = format!("{} WHERE lp.id_predio = ? ORDER BY lp.codigo_ica", SELECT_LUGAR);
        fetch_all_by(&self.pool, &sql, id, "LugarProduccion", lugar_from_row).await
    }
}
