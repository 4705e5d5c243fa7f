//! Executes one parsed command against the managers and renders the result.

use crate::cli::{AccionCredenciales, Comando, Entidad};
use anyhow::{Context, Result, bail};
use application::{Repositorios, SistemaFitosanitario};
use domain::DomainError;
use infrastructure::{
    AppConfig, CredentialStore, Database, SqliteAlertaRepository,
    SqliteAsistenteTecnicoRepository, SqliteCultivoRepository, SqliteDepartamentoRepository,
    SqliteInformeRepository, SqliteInspeccionRepository, SqliteLoteRepository,
    SqliteLugarProduccionRepository, SqliteMunicipioRepository, SqlitePlagaRepository,
    SqlitePredioRepository, SqliteProductorRepository, SqlitePropietarioRepository,
    SqliteResultadoRepository, SqliteUsuarioRepository, SqliteVeredaRepository,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Wires every SQLite repository to the shared pool.
pub fn repositorios(db: &Database) -> Repositorios {
    let pool = db.pool();
    Repositorios {
        usuarios: Arc::new(SqliteUsuarioRepository::new(pool.clone())),
        propietarios: Arc::new(SqlitePropietarioRepository::new(pool.clone())),
        productores: Arc::new(SqliteProductorRepository::new(pool.clone())),
        asistentes: Arc::new(SqliteAsistenteTecnicoRepository::new(pool.clone())),
        departamentos: Arc::new(SqliteDepartamentoRepository::new(pool.clone())),
        municipios: Arc::new(SqliteMunicipioRepository::new(pool.clone())),
        veredas: Arc::new(SqliteVeredaRepository::new(pool.clone())),
        predios: Arc::new(SqlitePredioRepository::new(pool.clone())),
        lugares_produccion: Arc::new(SqliteLugarProduccionRepository::new(pool.clone())),
        lotes: Arc::new(SqliteLoteRepository::new(pool.clone())),
        cultivos: Arc::new(SqliteCultivoRepository::new(pool.clone())),
        plagas: Arc::new(SqlitePlagaRepository::new(pool.clone())),
        inspecciones: Arc::new(SqliteInspeccionRepository::new(pool.clone())),
        resultados: Arc::new(SqliteResultadoRepository::new(pool.clone())),
        informes: Arc::new(SqliteInformeRepository::new(pool.clone())),
        alertas: Arc::new(SqliteAlertaRepository::new(pool)),
    }
}

fn parse<T: DeserializeOwned>(entidad: Entidad, json: &str) -> Result<T> {
    serde_json::from_str(json).with_context(|| format!("Invalid JSON for {:?}", entidad))
}

fn to_json<T: Serialize + ?Sized>(valor: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(valor)?)
}

fn encontrado<T: Serialize>(valor: Option<T>, entidad: &'static str, clave: &str) -> Result<String> {
    match valor {
        Some(v) => to_json(&v),
        None => Err(DomainError::not_found(entidad, clave).into()),
    }
}

pub struct Consola {
    db: Database,
    sistema: SistemaFitosanitario,
    credenciales: PathBuf,
}

impl Consola {
    /// Opens the configured database and brings its schema up to date.
    pub async fn abrir(config: &AppConfig) -> Result<Self> {
        let db = Database::connect(&config.database).await?;
        db.migrate().await?;
        let sistema = SistemaFitosanitario::new(repositorios(&db));
        Ok(Self {
            db,
            sistema,
            credenciales: PathBuf::from(&config.credentials.path),
        })
    }

    pub fn sistema(&self) -> &SistemaFitosanitario {
        &self.sistema
    }

    pub async fn cerrar(self) {
        self.db.close().await;
    }

    pub async fn ejecutar(&self, comando: Comando) -> Result<String> {
        match comando {
            Comando::Migrar => {
                self.db.migrate().await?;
                Ok("Schema up to date".to_string())
            }
            Comando::Credenciales { accion } => self.credenciales(accion),
            Comando::Registrar { entidad, json } => {
                self.registrar(entidad, &json).await?;
                Ok(format!("{:?} registered", entidad))
            }
            Comando::Actualizar { entidad, json } => {
                self.actualizar(entidad, &json).await?;
                Ok(format!("{:?} updated", entidad))
            }
            Comando::Eliminar { entidad, clave } => {
                self.eliminar(entidad, &clave).await?;
                Ok(format!("{:?} {} deleted", entidad, clave))
            }
            Comando::Consultar { entidad, clave } => self.consultar(entidad, &clave).await,
            Comando::Listar { entidad } => self.listar(entidad).await,
            Comando::AlertasActivas => {
                to_json(&self.sistema.alertas.listar_alertas_activas().await?)
            }
            Comando::Porcentaje { resultado } => {
                let porcentaje = self.sistema.resultados.porcentaje_afectacion(&resultado).await?;
                Ok(format!("{:.2}", porcentaje))
            }
            Comando::ConsolidarInforme { informe } => {
                to_json(&self.sistema.informes.consolidar(&informe).await?)
            }
        }
    }

    fn credenciales(&self, accion: AccionCredenciales) -> Result<String> {
        let mut store = CredentialStore::load(&self.credenciales)?;
        match accion {
            AccionCredenciales::Agregar {
                usuario,
                clave,
                rol,
            } => {
                store.save_credential(&usuario, &clave, &rol)?;
                info!(usuario = %usuario, "Credential stored");
                Ok(format!("Credential saved for {}", usuario))
            }
            AccionCredenciales::Validar { usuario, clave } => {
                if !store.validate(&usuario, &clave) {
                    bail!("Invalid credentials for {}", usuario);
                }
                Ok(store.role(&usuario).unwrap_or_default().to_string())
            }
        }
    }

    async fn registrar(&self, entidad: Entidad, json: &str) -> Result<()> {
        let s = &self.sistema;
        match entidad {
            Entidad::Propietario => s.propietarios.registrar(parse(entidad, json)?).await?,
            Entidad::Productor => s.productores.registrar(parse(entidad, json)?).await?,
            Entidad::Asistente => s.asistentes.registrar(parse(entidad, json)?).await?,
            Entidad::Departamento => s.departamentos.registrar(parse(entidad, json)?).await?,
            Entidad::Municipio => s.municipios.registrar(parse(entidad, json)?).await?,
            Entidad::Vereda => s.veredas.registrar(parse(entidad, json)?).await?,
            Entidad::Predio => s.predios.registrar(parse(entidad, json)?).await?,
            Entidad::LugarProduccion => {
                s.lugares_produccion.registrar(parse(entidad, json)?).await?
            }
            Entidad::Lote => s.lotes.registrar(parse(entidad, json)?).await?,
            Entidad::Cultivo => s.cultivos.registrar(parse(entidad, json)?).await?,
            Entidad::Plaga => s.plagas.registrar(parse(entidad, json)?).await?,
            Entidad::Inspeccion => s.inspecciones.registrar(parse(entidad, json)?).await?,
            Entidad::Resultado => s.resultados.registrar(parse(entidad, json)?).await?,
            Entidad::Informe => s.informes.registrar(parse(entidad, json)?).await?,
            Entidad::Alerta => s.alertas.registrar(parse(entidad, json)?).await?,
        }
        Ok(())
    }

    async fn actualizar(&self, entidad: Entidad, json: &str) -> Result<()> {
        let s = &self.sistema;
        match entidad {
            Entidad::Propietario => s.propietarios.actualizar(parse(entidad, json)?).await?,
            Entidad::Productor => s.productores.actualizar(parse(entidad, json)?).await?,
            Entidad::Asistente => s.asistentes.actualizar(parse(entidad, json)?).await?,
            Entidad::Departamento => s.departamentos.actualizar(parse(entidad, json)?).await?,
            Entidad::Municipio => s.municipios.actualizar(parse(entidad, json)?).await?,
            Entidad::Vereda => s.veredas.actualizar(parse(entidad, json)?).await?,
            Entidad::Predio => s.predios.actualizar(parse(entidad, json)?).await?,
            Entidad::LugarProduccion => {
                s.lugares_produccion.actualizar(parse(entidad, json)?).await?
            }
            Entidad::Lote => s.lotes.actualizar(parse(entidad, json)?).await?,
            Entidad::Cultivo => s.cultivos.actualizar(parse(entidad, json)?).await?,
            Entidad::Plaga => s.plagas.actualizar(parse(entidad, json)?).await?,
            Entidad::Inspeccion => s.inspecciones.actualizar(parse(entidad, json)?).await?,
            Entidad::Resultado => s.resultados.actualizar(parse(entidad, json)?).await?,
            Entidad::Informe => s.informes.actualizar(parse(entidad, json)?).await?,
            Entidad::Alerta => s.alertas.actualizar(parse(entidad, json)?).await?,
        }
        Ok(())
    }

    async fn eliminar(&self, entidad: Entidad, clave: &str) -> Result<()> {
        let s = &self.sistema;
        match entidad {
            Entidad::Propietario => s.propietarios.eliminar(clave).await?,
            Entidad::Productor => s.productores.eliminar(clave).await?,
            Entidad::Asistente => s.asistentes.eliminar(clave).await?,
            Entidad::Departamento => s.departamentos.eliminar(clave).await?,
            Entidad::Municipio => s.municipios.eliminar(clave).await?,
            Entidad::Vereda => s.veredas.eliminar(clave).await?,
            Entidad::Predio => s.predios.eliminar(clave).await?,
            Entidad::LugarProduccion => s.lugares_produccion.eliminar(clave).await?,
            Entidad::Lote => s.lotes.eliminar(clave).await?,
            Entidad::Cultivo => s.cultivos.eliminar(clave).await?,
            Entidad::Plaga => s.plagas.eliminar(clave).await?,
            Entidad::Inspeccion => s.inspecciones.eliminar(clave).await?,
            Entidad::Resultado => s.resultados.eliminar(clave).await?,
            Entidad::Informe => s.informes.eliminar(clave).await?,
            Entidad::Alerta => s.alertas.eliminar(clave).await?,
        }
        Ok(())
    }

    async fn consultar(&self, entidad: Entidad, clave: &str) -> Result<String> {
        let s = &self.sistema;
        match entidad {
            Entidad::Propietario => {
                encontrado(s.propietarios.consultar(clave).await?, "Propietario", clave)
            }
            Entidad::Productor => {
                encontrado(s.productores.consultar(clave).await?, "Productor", clave)
            }
            Entidad::Asistente => {
                encontrado(s.asistentes.consultar(clave).await?, "AsistenteTecnico", clave)
            }
            Entidad::Departamento => {
                encontrado(s.departamentos.consultar(clave).await?, "Departamento", clave)
            }
            Entidad::Municipio => {
                encontrado(s.municipios.consultar(clave).await?, "Municipio", clave)
            }
            Entidad::Vereda => encontrado(s.veredas.consultar(clave).await?, "Vereda", clave),
            Entidad::Predio => encontrado(s.predios.consultar(clave).await?, "Predio", clave),
            Entidad::LugarProduccion => encontrado(
                s.lugares_produccion.consultar(clave).await?,
                "LugarProduccion",
                clave,
            ),
            Entidad::Lote => encontrado(s.lotes.consultar(clave).await?, "Lote", clave),
            Entidad::Cultivo => encontrado(s.cultivos.consultar(clave).await?, "Cultivo", clave),
            Entidad::Plaga => encontrado(s.plagas.consultar(clave).await?, "Plaga", clave),
            Entidad::Inspeccion => encontrado(
                s.inspecciones.consultar(clave).await?,
                "InspeccionFitosanitaria",
                clave,
            ),
            Entidad::Resultado => {
                encontrado(s.resultados.consultar(clave).await?, "ResultadoTecnico", clave)
            }
            Entidad::Informe => encontrado(
                s.informes.consultar(clave).await?,
                "InformeFitosanitario",
                clave,
            ),
            Entidad::Alerta => encontrado(s.alertas.consultar(clave).await?, "Alerta", clave),
        }
    }

    async fn listar(&self, entidad: Entidad) -> Result<String> {
        let s = &self.sistema;
        match entidad {
            Entidad::Propietario => to_json(&s.propietarios.listar().await?),
            Entidad::Productor => to_json(&s.productores.listar().await?),
            Entidad::Asistente => to_json(&s.asistentes.listar().await?),
            Entidad::Departamento => to_json(&s.departamentos.listar_con_municipios().await?),
            Entidad::Municipio => to_json(&s.municipios.listar().await?),
            Entidad::Vereda => to_json(&s.veredas.listar().await?),
            Entidad::Predio => to_json(&s.predios.listar().await?),
            Entidad::LugarProduccion => to_json(&s.lugares_produccion.listar().await?),
            Entidad::Lote => to_json(&s.lotes.listar().await?),
            Entidad::Cultivo => to_json(&s.cultivos.listar().await?),
            Entidad::Plaga => to_json(&s.plagas.listar().await?),
            Entidad::Inspeccion => to_json(&s.inspecciones.listar().await?),
            Entidad::Resultado => to_json(&s.resultados.listar().await?),
            Entidad::Informe => to_json(&s.informes.listar().await?),
            Entidad::Alerta => to_json(&s.alertas.listar().await?),
        }
    }
}
