use super::{db_err, decode_err, expect_affected, fetch_all, fetch_all_by, fetch_one_by};
use super::inspeccion_repository::{SELECT_INSPECCION, inspeccion_from_row};
use super::lugar_produccion_repository::{SELECT_LUGAR, lugar_from_row};
use super::predio_repository::{SELECT_PREDIO, predio_from_row};
use async_trait::async_trait;
use domain::inspeccion::InspeccionFitosanitaria;
use domain::predio::{LugarProduccion, Predio};
use domain::usuario::{
    AsistenteTecnicoRepository, ConUsuario, ProductorRepository, PropietarioRepository,
    UsuarioRepository,
};
use domain::{AsistenteTecnico, DomainError, Productor, Propietario, Rol, Usuario};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::collections::HashMap;
use tracing::debug;

const USUARIO_COLUMNS: &str = "u.id, u.rol, u.numero_identificacion, u.nombre, \
                               u.telefono_contacto, u.correo_electronico";

fn usuario_from_row(row: &SqliteRow) -> Result<Usuario, sqlx::Error> {
    let rol: String = row.try_get("rol")?;
    Ok(Usuario {
        id: row.try_get("id")?,
        rol: rol.parse::<Rol>().map_err(decode_err)?,
        permisos: Vec::new(),
        numero_identificacion: row.try_get("numero_identificacion")?,
        nombre: row.try_get("nombre")?,
        telefono_contacto: row.try_get("telefono_contacto")?,
        correo_electronico: row.try_get("correo_electronico")?,
    })
}

async fn permisos_of(pool: &SqlitePool, id: &str) -> Result<Vec<String>, DomainError> {
    sqlx::query_scalar(
        "SELECT permiso FROM permisos_usuario WHERE id_usuario = ? ORDER BY orden",
    )
    .bind(id)
    .fetch_all(pool)
    .await
    .map_err(db_err("Usuario", id))
}

/// Fills `permisos` on a single user read.
async fn with_permisos<T: ConUsuario>(
    pool: &SqlitePool,
    item: Option<T>,
) -> Result<Option<T>, DomainError> {
    match item {
        Some(mut item) => {
            let id = item.usuario().id.clone();
            item.usuario_mut().permisos = permisos_of(pool, &id).await?;
            Ok(Some(item))
        }
        None => Ok(None),
    }
}

/// Fills `permisos` on a list read with one query for all users.
async fn with_all_permisos<T: ConUsuario>(
    pool: &SqlitePool,
    mut items: Vec<T>,
) -> Result<Vec<T>, DomainError> {
    if items.is_empty() {
        return Ok(items);
    }

    let rows = sqlx::query("SELECT id_usuario, permiso FROM permisos_usuario ORDER BY orden")
        .fetch_all(pool)
        .await
        .map_err(db_err("Usuario", "*"))?;

    let mut by_user: HashMap<String, Vec<String>> = HashMap::new();
    for row in rows {
        let id: String = row.try_get(0).map_err(db_err("Usuario", "*"))?;
        let permiso: String = row.try_get(1).map_err(db_err("Usuario", "*"))?;
        by_user.entry(id).or_default().push(permiso);
    }

    for item in &mut items {
        let usuario = item.usuario_mut();
        usuario.permisos = by_user.remove(&usuario.id).unwrap_or_default();
    }
    Ok(items)
}

async fn insert_permisos(
    conn: &mut SqliteConnection,
    usuario: &Usuario,
) -> Result<(), DomainError> {
    for permiso in &usuario.permisos {
        sqlx::query("INSERT OR IGNORE INTO permisos_usuario (id_usuario, permiso) VALUES (?, ?)")
            .bind(&usuario.id)
            .bind(permiso)
            .execute(&mut *conn)
            .await
            .map_err(db_err("Usuario", &usuario.id))?;
    }
    Ok(())
}

/// Base row plus permissions. The caller writes the role row in the same transaction.
async fn insert_usuario(
    conn: &mut SqliteConnection,
    usuario: &Usuario,
    rol: Rol,
) -> Result<(), DomainError> {
    sqlx::query(
        "INSERT INTO usuarios (id, rol, numero_identificacion, nombre, telefono_contacto, correo_electronico) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&usuario.id)
    .bind(rol.as_str())
    .bind(&usuario.numero_identificacion)
    .bind(&usuario.nombre)
    .bind(&usuario.telefono_contacto)
    .bind(&usuario.correo_electronico)
    .execute(&mut *conn)
    .await
    .map_err(db_err("Usuario", &usuario.id))?;

    insert_permisos(conn, usuario).await
}

/// Updates the base row and replaces the permission list.
async fn update_usuario(
    conn: &mut SqliteConnection,
    usuario: &Usuario,
    rol: Rol,
) -> Result<(), DomainError> {
    let result = sqlx::query(
        "UPDATE usuarios SET rol = ?, numero_identificacion = ?, nombre = ?, \
         telefono_contacto = ?, correo_electronico = ? WHERE id = ?",
    )
    .bind(rol.as_str())
    .bind(&usuario.numero_identificacion)
    .bind(&usuario.nombre)
    .bind(&usuario.telefono_contacto)
    .bind(&usuario.correo_electronico)
    .bind(&usuario.id)
    .execute(&mut *conn)
    .await
    .map_err(db_err("Usuario", &usuario.id))?;
    expect_affected(result, "Usuario", &usuario.id)?;

    sqlx::query("DELETE FROM permisos_usuario WHERE id_usuario = ?")
        .bind(&usuario.id)
        .execute(&mut *conn)
        .await
        .map_err(db_err("Usuario", &usuario.id))?;

    insert_permisos(conn, usuario).await
}

/// Role row, then permissions, then the base row.
async fn delete_usuario(
    conn: &mut SqliteConnection,
    role_table: &'static str,
    entity: &'static str,
    id: &str,
) -> Result<(), DomainError> {
    let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", role_table))
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(db_err(entity, id))?;
    expect_affected(result, entity, id)?;

    sqlx::query("DELETE FROM permisos_usuario WHERE id_usuario = ?")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(db_err(entity, id))?;

    sqlx::query("DELETE FROM usuarios WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(db_err(entity, id))?;
    Ok(())
}

/// Read-only view over `usuarios`, whatever the role.
#[derive(Clone)]
pub struct SqliteUsuarioRepository {
    pool: SqlitePool,
}

impl SqliteUsuarioRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<Usuario>, DomainError> {
        let sql = format!("SELECT {} FROM usuarios u WHERE u.{} = ?", USUARIO_COLUMNS, column);
        let usuario = fetch_one_by(&self.pool, &sql, value, "Usuario", usuario_from_row).await?;
        match usuario {
            Some(mut u) => {
                u.permisos = permisos_of(&self.pool, &u.id).await?;
                Ok(Some(u))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UsuarioRepository for SqliteUsuarioRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Usuario>, DomainError> {
        self.find_one("id", id).await
    }

    async fn find_by_numero_identificacion(
        &self,
        numero: &str,
    ) -> Result<Option<Usuario>, DomainError> {
        self.find_one("numero_identificacion", numero).await
    }
}

// Propietario

fn select_propietario() -> String {
    format!(
        "SELECT {}, r.direccion FROM usuarios u JOIN propietario r ON r.id = u.id",
        USUARIO_COLUMNS
    )
}

fn propietario_from_row(row: &SqliteRow) -> Result<Propietario, sqlx::Error> {
    Ok(Propietario {
        usuario: usuario_from_row(row)?,
        direccion: row.try_get("direccion")?,
    })
}

#[derive(Clone)]
pub struct SqlitePropietarioRepository {
    pool: SqlitePool,
}

impl SqlitePropietarioRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PropietarioRepository for SqlitePropietarioRepository {
    async fn insert(&self, propietario: &Propietario) -> Result<(), DomainError> {
        let id = &propietario.usuario.id;
        let mut tx = self.pool.begin().await.map_err(db_err("Propietario", id))?;

        insert_usuario(&mut *tx, &propietario.usuario, Rol::Propietario).await?;
        sqlx::query("INSERT INTO propietario (id, direccion) VALUES (?, ?)")
            .bind(id)
            .bind(&propietario.direccion)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Propietario", id))?;

        tx.commit().await.map_err(db_err("Propietario", id))?;
        debug!(id = %id, "Propietario inserted");
        Ok(())
    }

    async fn update(&self, propietario: &Propietario) -> Result<(), DomainError> {
        let id = &propietario.usuario.id;
        let mut tx = self.pool.begin().await.map_err(db_err("Propietario", id))?;

        update_usuario(&mut *tx, &propietario.usuario, Rol::Propietario).await?;
        let result = sqlx::query("UPDATE propietario SET direccion = ? WHERE id = ?")
            .bind(&propietario.direccion)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Propietario", id))?;
        expect_affected(result, "Propietario", id)?;

        tx.commit().await.map_err(db_err("Propietario", id))?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_err("Propietario", id))?;
        delete_usuario(&mut *tx, "propietario", "Propietario", id).await?;
        tx.commit().await.map_err(db_err("Propietario", id))?;
        debug!(id = %id, "Propietario deleted");
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Propietario>, DomainError> {
        let sql = format!("{} WHERE u.id = ?", select_propietario());
        let found = fetch_one_by(&self.pool, &sql, id, "Propietario", propietario_from_row).await?;
        with_permisos(&self.pool, found).await
    }

    async fn find_by_numero_identificacion(
        &self,
        numero: &str,
    ) -> Result<Option<Propietario>, DomainError> {
        let sql = format!("{} WHERE u.numero_identificacion = ?", select_propietario());
        let found =
            fetch_one_by(&self.pool, &sql, numero, "Propietario", propietario_from_row).await?;
        with_permisos(&self.pool, found).await
    }

    async fn find_all(&self) -> Result<Vec<Propietario>, DomainError> {
        let sql = format!("{} ORDER BY u.nombre", select_propietario());
        let all = fetch_all(&self.pool, &sql, "Propietario", propietario_from_row).await?;
        with_all_permisos(&self.pool, all).await
    }

    async fn find_predios(&self, id: &str) -> Result<Vec<Predio>, DomainError> {
        let sql = format!("{} WHERE p.id_propietario = ? ORDER BY p.codigo_ica", SELECT_PREDIO);
        fetch_all_by(&self.pool, &sql, id, "Predio", predio_from_row).await
    }
}

// Productor

fn select_productor() -> String {
    format!(
        "SELECT {} FROM usuarios u JOIN productores r ON r.id = u.id",
        USUARIO_COLUMNS
    )
}

fn productor_from_row(row: &SqliteRow) -> Result<Productor, sqlx::Error> {
    Ok(Productor {
        usuario: usuario_from_row(row)?,
    })
}

#[derive(Clone)]
pub struct SqliteProductorRepository {
    pool: SqlitePool,
}

impl SqliteProductorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductorRepository for SqliteProductorRepository {
    async fn insert(&self, productor: &Productor) -> Result<(), DomainError> {
        let id = &productor.usuario.id;
        let mut tx = self.pool.begin().await.map_err(db_err("Productor", id))?;

        insert_usuario(&mut *tx, &productor.usuario, Rol::Productor).await?;
        sqlx::query("INSERT INTO productores (id) VALUES (?)")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err("Productor", id))?;

        tx.commit().await.map_err(db_err("Productor", id))?;
        debug!(id = %id, "Productor inserted");
        Ok(())
    }

    async fn update(&self, productor: &Productor) -> Result<(), DomainError> {
        let id = &productor.usuario.id;
        let mut tx = self.pool.begin().await.map_err(db_err("Productor", id))?;

        let exists: Option<String> = sqlx::query_scalar("SELECT id FROM productores WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_err("Productor", id))?;
        if exists.is_none() {
            return Err(DomainError::not_found("Productor", id.as_str()));
        }
        update_usuario(&mut *tx, &productor.usuario, Rol::Productor).await?;

        tx.commit().await.map_err(db_err("Productor", id))?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_err("Productor", id))?;
        delete_usuario(&mut *tx, "productores", "Productor", id).await?;
        tx.commit().await.map_err(db_err("Productor", id))?;
        debug!(id = %id, "Productor deleted");
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Productor>, DomainError> {
        let sql = format!("{} WHERE u.id = ?", select_productor());
        let found = fetch_one_by(&self.pool, &sql, id, "Productor", productor_from_row).await?;
        with_permisos(&self.pool, found).await
    }

    async fn find_by_numero_identificacion(
        &self,
        numero: &str,
    ) -> Result<Option<Productor>, DomainError> {
        let sql = format!("{} WHERE u.numero_identificacion = ?", select_productor());
        let found = fetch_one_by(&self.pool, &sql, numero, "Productor", productor_from_row).await?;
        with_permisos(&self.pool, found).await
    }

    async fn find_all(&self) -> Result<Vec<Productor>, DomainError> {
        let sql = format!("{} ORDER BY u.nombre", select_productor());
        let all = fetch_all(&self.pool, &sql, "Productor", productor_from_row).await?;
        with_all_permisos(&self.pool, all).await
    }

    async fn find_lugares_produccion(
        &self,
        id: &str,
    ) -> Result<Vec<LugarProduccion>, DomainError> {
        let sql = format!("{} WHERE lp.id_productor = ? ORDER BY lp.codigo_ica", SELECT_LUGAR);
        fetch_all_by(&self.pool, &sql, id, "LugarProduccion", lugar_from_row).await
    }
}

// Asistente técnico

fn select_asistente() -> String {
    format!(
        "SELECT {}, r.numero_tarjeta_profesional FROM usuarios u \
         JOIN asistentes_tecnicos r ON r.id = u.id",
        USUARIO_COLUMNS
    )
}

fn asistente_from_row(row: &SqliteRow) -> Result<AsistenteTecnico, sqlx::Error> {
    Ok(AsistenteTecnico {
        usuario: usuario_from_row(row)?,
        numero_tarjeta_profesional: row.try_get("numero_tarjeta_profesional")?,
    })
}

#[derive(Clone)]
pub struct SqliteAsistenteTecnicoRepository {
    pool: SqlitePool,
}

impl SqliteAsistenteTecnicoRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find_one(
        &self,
        filter: &str,
        value: &str,
    ) -> Result<Option<AsistenteTecnico>, DomainError> {
        let sql = format!("{} WHERE {} = ?", select_asistente(), filter);
        let found =
            fetch_one_by(&self.pool, &sql, value, "AsistenteTecnico", asistente_from_row).await?;
        with_permisos(&self.pool, found).await
    }
}

#[async_trait]
impl AsistenteTecnicoRepository for SqliteAsistenteTecnicoRepository {
    async fn insert(&self, asistente: &AsistenteTecnico) -> Result<(), DomainError> {
        let id = &asistente.usuario.id;
        let mut tx = self.pool.begin().await.map_err(db_err("AsistenteTecnico", id))?;

        insert_usuario(&mut *tx, &asistente.usuario, Rol::AsistenteTecnico).await?;
        sqlx::query("INSERT INTO asistentes_tecnicos (id, numero_tarjeta_profesional) VALUES (?, ?)")
            .bind(id)
            .bind(&asistente.numero_tarjeta_profesional)
            .execute(&mut *tx)
            .await
            .map_err(db_err("AsistenteTecnico", id))?;

        tx.commit().await.map_err(db_err("AsistenteTecnico", id))?;
        debug!(id = %id, "AsistenteTecnico inserted");
        Ok(())
    }

    async fn update(&self, asistente: &AsistenteTecnico) -> Result<(), DomainError> {
        let id = &asistente.usuario.id;
        let mut tx = self.pool.begin().await.map_err(db_err("AsistenteTecnico", id))?;

        update_usuario(&mut *tx, &asistente.usuario, Rol::AsistenteTecnico).await?;
        let result =
            sqlx::query("UPDATE asistentes_tecnicos SET numero_tarjeta_profesional = ? WHERE id = ?")
                .bind(&asistente.numero_tarjeta_profesional)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_err("AsistenteTecnico", id))?;
        expect_affected(result, "AsistenteTecnico", id)?;

        tx.commit().await.map_err(db_err("AsistenteTecnico", id))?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_err("AsistenteTecnico", id))?;
        delete_usuario(&mut *tx, "asistentes_tecnicos", "AsistenteTecnico", id).await?;
        tx.commit().await.map_err(db_err("AsistenteTecnico", id))?;
        debug!(id = %id, "AsistenteTecnico deleted");
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<AsistenteTecnico>, DomainError> {
        self.find_one("u.id", id).await
    }

    async fn find_by_numero_identificacion(
        &self,
        numero: &str,
    ) -> Result<Option<AsistenteTecnico>, DomainError> {
        self.find_one("u.numero_identificacion", numero).await
    }

    async fn find_by_tarjeta_profesional(
        &self,
        numero_tarjeta: &str,
    ) -> Result<Option<AsistenteTecnico>, DomainError> {
        self.find_one("r.numero_tarjeta_profesional", numero_tarjeta)
            .await
    }

    async fn find_all(&self) -> Result<Vec<AsistenteTecnico>, DomainError> {
        let sql = format!("{} ORDER BY u.nombre", select_asistente());
        let all = fetch_all(&self.pool, &sql, "AsistenteTecnico", asistente_from_row).await?;
        with_all_permisos(&self.pool, all).await
    }

    async fn find_lugares_produccion(
        &self,
        id: &str,
    ) -> Result<Vec<LugarProduccion>, DomainError> {
        let sql = format!(
            "{} WHERE lp.id_asistente_tecnico = ? ORDER BY lp.codigo_ica",
            SELECT_LUGAR
        );
        fetch_all_by(&self.pool, &sql, id, "LugarProduccion", lugar_from_row).await
    }

    async fn find_inspecciones(
        &self,
        id: &str,
    ) -> Result<Vec<InspeccionFitosanitaria>, DomainError> {
        let sql = format!(
            "{} WHERE i.id_asistente_tecnico = ? ORDER BY i.fecha_inspeccion DESC",
            SELECT_INSPECCION
        );
        fetch_all_by(&self.pool, &sql, id, "InspeccionFitosanitaria", inspeccion_from_row).await
    }
}
