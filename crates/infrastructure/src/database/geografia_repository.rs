use super::predio_repository::{SELECT_PREDIO, predio_from_row};
use super::{db_err, expect_affected, fetch_all, fetch_all_by, fetch_one_by};
use async_trait::async_trait;
use domain::geografia::{DepartamentoRepository, MunicipioRepository, VeredaRepository};
use domain::{Departamento, DomainError, Municipio, Predio, Referencia, Vereda, ref_id};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;

const SELECT_DEPARTAMENTO: &str = "SELECT d.id, d.nombre FROM departamento d";

const SELECT_MUNICIPIO: &str = "SELECT m.id, m.nombre, m.id_departamento, \
                                d.nombre AS nombre_departamento \
                                FROM municipio m LEFT JOIN departamento d ON d.id = m.id_departamento";

const SELECT_VEREDA: &str = "SELECT v.id, v.nombre, v.id_municipio, m.nombre AS nombre_municipio \
                             FROM vereda v LEFT JOIN municipio m ON m.id = v.id_municipio";

fn departamento_from_row(row: &SqliteRow) -> Result<Departamento, sqlx::Error> {
    Ok(Departamento {
        id: row.try_get("id")?,
        nombre: row.try_get("nombre")?,
        municipios: Vec::new(),
    })
}

fn municipio_from_row(row: &SqliteRow) -> Result<Municipio, sqlx::Error> {
    Ok(Municipio {
        id: row.try_get("id")?,
        nombre: row.try_get("nombre")?,
        departamento: Referencia::from_columns(
            row.try_get("id_departamento")?,
            row.try_get("nombre_departamento")?,
        ),
    })
}

fn vereda_from_row(row: &SqliteRow) -> Result<Vereda, sqlx::Error> {
    Ok(Vereda {
        id: row.try_get("id")?,
        nombre: row.try_get("nombre")?,
        municipio: Referencia::from_columns(
            row.try_get("id_municipio")?,
            row.try_get("nombre_municipio")?,
        ),
    })
}

#[derive(Clone)]
pub struct SqliteDepartamentoRepository {
    pool: SqlitePool,
}

impl SqliteDepartamentoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DepartamentoRepository for SqliteDepartamentoRepository {
    async fn insert(&self, departamento: &Departamento) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO departamento (id, nombre) VALUES (?, ?)")
            .bind(&departamento.id)
            .bind(&departamento.nombre)
            .execute(&self.pool)
            .await
            .map_err(db_err("Departamento", &departamento.id))?;
        Ok(())
    }

    async fn update(&self, departamento: &Departamento) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE departamento SET nombre = ? WHERE id = ?")
            .bind(&departamento.nombre)
            .bind(&departamento.id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Departamento", &departamento.id))?;
        expect_affected(result, "Departamento", &departamento.id)
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM departamento WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Departamento", id))?;
        expect_affected(result, "Departamento", id)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Departamento>, DomainError> {
        let sql = format!("{} WHERE d.id = ?", SELECT_DEPARTAMENTO);
        fetch_one_by(&self.pool, &sql, id, "Departamento", departamento_from_row).await
    }

    async fn find_all(&self) -> Result<Vec<Departamento>, DomainError> {
        let sql = format!("{} ORDER BY d.nombre", SELECT_DEPARTAMENTO);
        fetch_all(&self.pool, &sql, "Departamento", departamento_from_row).await
    }

    async fn find_all_with_municipios(&self) -> Result<Vec<Departamento>, DomainError> {
        let mut departamentos = self.find_all().await?;

        let sql = format!("{} ORDER BY m.nombre", SELECT_MUNICIPIO);
        let municipios = fetch_all(&self.pool, &sql, "Municipio", municipio_from_row).await?;

        let mut by_departamento: HashMap<String, Vec<Municipio>> = HashMap::new();
        for municipio in municipios {
            if let Some(parent) = ref_id(&municipio.departamento) {
                by_departamento
                    .entry(parent.to_string())
                    .or_default()
                    .push(municipio);
            }
        }

        for departamento in &mut departamentos {
            departamento.municipios = by_departamento
                .remove(&departamento.id)
                .unwrap_or_default();
        }
        Ok(departamentos)
    }
}

#[derive(Clone)]
pub struct SqliteMunicipioRepository {
    pool: SqlitePool,
}

impl SqliteMunicipioRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MunicipioRepository for SqliteMunicipioRepository {
    async fn insert(&self, municipio: &Municipio) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO municipio (id, nombre, id_departamento) VALUES (?, ?, ?)")
            .bind(&municipio.id)
            .bind(&municipio.nombre)
            .bind(ref_id(&municipio.departamento))
            .execute(&self.pool)
            .await
            .map_err(db_err("Municipio", &municipio.id))?;
        Ok(())
    }

    async fn update(&self, municipio: &Municipio) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE municipio SET nombre = ?, id_departamento = ? WHERE id = ?")
            .bind(&municipio.nombre)
            .bind(ref_id(&municipio.departamento))
            .bind(&municipio.id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Municipio", &municipio.id))?;
        expect_affected(result, "Municipio", &municipio.id)
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM municipio WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Municipio", id))?;
        expect_affected(result, "Municipio", id)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Municipio>, DomainError> {
        let sql = format!("{} WHERE m.id = ?", SELECT_MUNICIPIO);
        fetch_one_by(&self.pool, &sql, id, "Municipio", municipio_from_row).await
    }

    async fn find_all(&self) -> Result<Vec<Municipio>, DomainError> {
        let sql = format!("{} ORDER BY m.nombre", SELECT_MUNICIPIO);
        fetch_all(&self.pool, &sql, "Municipio", municipio_from_row).await
    }

    async fn find_by_departamento(
        &self,
        departamento_id: &str,
    ) -> Result<Vec<Municipio>, DomainError> {
        let sql = format!("{} WHERE m.id_departamento = ? ORDER BY m.nombre", SELECT_MUNICIPIO);
        fetch_all_by(&self.pool, &sql, departamento_id, "Municipio", municipio_from_row).await
    }
}

#[derive(Clone)]
pub struct SqliteVeredaRepository {
    pool: SqlitePool,
}

impl SqliteVeredaRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VeredaRepository for SqliteVeredaRepository {
    async fn insert(&self, vereda: &Vereda) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO vereda (id, nombre, id_municipio) VALUES (?, ?, ?)")
            .bind(&vereda.id)
            .bind(&vereda.nombre)
            .bind(ref_id(&vereda.municipio))
            .execute(&self.pool)
            .await
            .map_err(db_err("Vereda", &vereda.id))?;
        Ok(())
    }

    async fn update(&self, vereda: &Vereda) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE vereda SET nombre = ?, id_municipio = ? WHERE id = ?")
            .bind(&vereda.nombre)
            .bind(ref_id(&vereda.municipio))
            .bind(&vereda.id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Vereda", &vereda.id))?;
        expect_affected(result, "Vereda", &vereda.id)
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM vereda WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Vereda", id))?;
        expect_affected(result, "Vereda", id)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Vereda>, DomainError> {
        let sql = format!("{} WHERE v.id = ?", SELECT_VEREDA);
        fetch_one_by(&self.pool, &sql, id, "Vereda", vereda_from_row).await
    }

    async fn find_all(&self) -> Result<Vec<Vereda>, DomainError> {
        let sql = format!("{} ORDER BY v.nombre", SELECT_VEREDA);
        fetch_all(&self.pool, &sql, "Vereda", vereda_from_row).await
    }

    async fn find_by_municipio(&self, municipio_id: &str) -> Result<Vec<Vereda>, DomainError> {
        let sql = format!("{} WHERE v.id_municipio = ? ORDER BY v.nombre", SELECT_VEREDA);
        fetch_all_by(&self.pool, &sql, municipio_id, "Vereda", vereda_from_row).await
    }

    async fn find_predios(&self, id: &str) -> Result<Vec<Predio>, DomainError> {
        let sql = format!("{} WHERE p.id_vereda = ? ORDER BY p.codigo_ica", SELECT_PREDIO);
        fetch_all_by(&self.pool, &sql, id, "Predio", predio_from_row).await
    }
}
