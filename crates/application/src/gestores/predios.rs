use crate::validacion::{no_negativo, referencia_opcional, requerido};
use domain::predio::{LoteRepository, LugarProduccionRepository, PredioRepository};
use domain::{Cultivo, DomainError, InspeccionFitosanitaria, LugarProduccion, Lote, Predio};
use std::sync::Arc;
use tracing::{info, warn};

pub struct GestorPredios {
    repo: Arc<dyn PredioRepository>,
}

impl GestorPredios {
    pub fn new(repo: Arc<dyn PredioRepository>) -> Self {
        Self { repo }
    }

    fn validar(predio: &Predio) -> Result<(), DomainError> {
        requerido("id", &predio.id)?;
        requerido("codigo_ica", &predio.codigo_ica)?;
        no_negativo("area", predio.area)?;
        if !predio.coordenadas_validas() {
            warn!(id = %predio.id, latitud = predio.latitud, longitud = predio.longitud, "Coordinates out of range");
            return Err(DomainError::validation(format!(
                "Coordinates out of range: ({}, {})",
                predio.latitud, predio.longitud
            )));
        }
        referencia_opcional("propietario", &predio.propietario)?;
        referencia_opcional("vereda", &predio.vereda)
    }

    /// The ICA code may only be held by the predio with this id.
    async fn codigo_disponible(&self, predio: &Predio) -> Result<(), DomainError> {
        match self.repo.find_by_codigo_ica(&predio.codigo_ica).await? {
            Some(otro) if otro.id != predio.id => {
                warn!(codigo_ica = %predio.codigo_ica, "ICA code already registered");
                Err(DomainError::already_exists("Predio", predio.codigo_ica.clone()))
            }
            _ => Ok(()),
        }
    }

    pub async fn registrar(&self, predio: Predio) -> Result<(), DomainError> {
        Self::validar(&predio)?;
        if self.repo.find_by_id(&predio.id).await?.is_some() {
            return Err(DomainError::already_exists("Predio", predio.id));
        }
        self.codigo_disponible(&predio).await?;
        self.repo.insert(&predio).await?;
        info!(id = %predio.id, codigo_ica = %predio.codigo_ica, "Predio registered");
        Ok(())
    }

    pub async fn actualizar(&self, predio: Predio) -> Result<(), DomainError> {
        if self.repo.find_by_id(&predio.id).await?.is_none() {
            return Err(DomainError::not_found("Predio", predio.id));
        }
        Self::validar(&predio)?;
        self.codigo_disponible(&predio).await?;
        self.repo.update(&predio).await
    }

    pub async fn eliminar(&self, id: &str) -> Result<(), DomainError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Predio", id));
        }
        self.repo.delete(id).await?;
        info!(id, "Predio deleted");
        Ok(())
    }

    pub async fn consultar(&self, id: &str) -> Result<Option<Predio>, DomainError> {
        self.repo.find_by_id(id).await
    }

    pub async fn consultar_por_codigo_ica(&self, codigo_ica: &str) -> Result<Option<Predio>, DomainError> {
        self.repo.find_by_codigo_ica(codigo_ica).await
    }

    pub async fn listar(&self) -> Result<Vec<Predio>, DomainError> {
        self.repo.find_all().await
    }

    pub async fn por_propietario(&self, propietario_id: &str) -> Result<Vec<Predio>, DomainError> {
        self.repo.find_by_propietario(propietario_id).await
    }

    pub async fn por_vereda(&self, vereda_id: &str) -> Result<Vec<Predio>, DomainError> {
        self.repo.find_by_vereda(vereda_id).await
    }

    pub async fn lugares_produccion(&self, id: &str) -> Result<Vec<LugarProduccion>, DomainError> {
        self.repo.find_lugares_produccion(id).await
    }
}

pub struct GestorLugaresProduccion {
    repo: Arc<dyn LugarProduccionRepository>,
}

impl GestorLugaresProduccion {
    pub fn new(repo: Arc<dyn LugarProduccionRepository>) -> Self {
        Self { repo }
    }

    fn validar(lugar: &LugarProduccion) -> Result<(), DomainError> {
        requerido("id", &lugar.id)?;
        requerido("codigo_ica", &lugar.codigo_ica)?;
        referencia_opcional("predio", &lugar.predio)?;
        referencia_opcional("productor", &lugar.productor)?;
        referencia_opcional("asistente_tecnico", &lugar.asistente_tecnico)
    }

    async fn codigo_disponible(&self, lugar: &LugarProduccion) -> Result<(), DomainError> {
        match self.repo.find_by_codigo_ica(&lugar.codigo_ica).await? {
            Some(otro) if otro.id != lugar.id => {
                warn!(codigo_ica = %lugar.codigo_ica, "ICA code already registered");
                Err(DomainError::already_exists(
                    "LugarProduccion",
                    lugar.codigo_ica.clone(),
                ))
            }
            _ => Ok(()),
        }
    }

    pub async fn registrar(&self, lugar: LugarProduccion) -> Result<(), DomainError> {
        Self::validar(&lugar)?;
        if self.repo.find_by_id(&lugar.id).await?.is_some() {
            return Err(DomainError::already_exists("LugarProduccion", lugar.id));
        }
        self.codigo_disponible(&lugar).await?;
        self.repo.insert(&lugar).await?;
        info!(id = %lugar.id, codigo_ica = %lugar.codigo_ica, "Lugar de producción registered");
        Ok(())
    }

    pub async fn actualizar(&self, lugar: LugarProduccion) -> Result<(), DomainError> {
        if self.repo.find_by_id(&lugar.id).await?.is_none() {
            return Err(DomainError::not_found("LugarProduccion", lugar.id));
        }
        Self::validar(&lugar)?;
        self.codigo_disponible(&lugar).await?;
        self.repo.update(&lugar).await
    }

    pub async fn eliminar(&self, id: &str) -> Result<(), DomainError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("LugarProduccion", id));
        }
        self.repo.delete(id).await?;
        info!(id, "Lugar de producción deleted");
        Ok(())
    }

    pub async fn consultar(&self, id: &str) -> Result<Option<LugarProduccion>, DomainError> {
        self.repo.find_by_id(id).await
    }

    pub async fn consultar_por_codigo_ica(
        &self,
        codigo_ica: &str,
    ) -> Result<Option<LugarProduccion>, DomainError> {
        self.repo.find_by_codigo_ica(codigo_ica).await
    }

    pub async fn listar(&self) -> Result<Vec<LugarProduccion>, DomainError> {
        self.repo.find_all().await
    }

    pub async fn por_predio(&self, predio_id: &str) -> Result<Vec<LugarProduccion>, DomainError> {
        self.repo.find_by_predio(predio_id).await
    }

    pub async fn por_productor(&self, productor_id: &str) -> Result<Vec<LugarProduccion>, DomainError> {
        self.repo.find_by_productor(productor_id).await
    }

    pub async fn por_asistente(&self, asistente_id: &str) -> Result<Vec<LugarProduccion>, DomainError> {
        self.repo.find_by_asistente(asistente_id).await
    }

    pub async fn lotes(&self, id: &str) -> Result<Vec<Lote>, DomainError> {
        self.repo.find_lotes(id).await
    }
}

pub struct GestorLotes {
    repo: Arc<dyn LoteRepository>,
}

impl GestorLotes {
    pub fn new(repo: Arc<dyn LoteRepository>) -> Self {
        Self { repo }
    }

    fn validar(lote: &Lote) -> Result<(), DomainError> {
        requerido("id", &lote.id)?;
        no_negativo("extension", lote.extension)?;
        referencia_opcional("lugar_produccion", &lote.lugar_produccion)
    }

    pub async fn registrar(&self, lote: Lote) -> Result<(), DomainError> {
        Self::validar(&lote)?;
        if self.repo.find_by_id(&lote.id).await?.is_some() {
            return Err(DomainError::already_exists("Lote", lote.id));
        }
        self.repo.insert(&lote).await?;
        info!(id = %lote.id, extension = lote.extension, "Lote registered");
        Ok(())
    }

    pub async fn actualizar(&self, lote: Lote) -> Result<(), DomainError> {
        if self.repo.find_by_id(&lote.id).await?.is_none() {
            return Err(DomainError::not_found("Lote", lote.id));
        }
        Self::validar(&lote)?;
        self.repo.update(&lote).await
    }

    pub async fn eliminar(&self, id: &str) -> Result<(), DomainError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Lote", id));
        }
        self.repo.delete(id).await?;
        info!(id, "Lote deleted");
        Ok(())
    }

    pub async fn consultar(&self, id: &str) -> Result<Option<Lote>, DomainError> {
        self.repo.find_by_id(id).await
    }

    pub async fn listar(&self) -> Result<Vec<Lote>, DomainError> {
        self.repo.find_all().await
    }

    pub async fn por_lugar_produccion(&self, lugar_id: &str) -> Result<Vec<Lote>, DomainError> {
        self.repo.find_by_lugar_produccion(lugar_id).await
    }

    pub async fn cultivos(&self, id: &str) -> Result<Vec<Cultivo>, DomainError> {
        self.repo.find_cultivos(id).await
    }

    pub async fn asociar_cultivo(&self, lote_id: &str, cultivo_id: &str) -> Result<(), DomainError> {
        requerido("lote", lote_id)?;
        requerido("cultivo", cultivo_id)?;
        self.repo.asociar_cultivo(lote_id, cultivo_id).await?;
        info!(lote_id, cultivo_id, "Cultivo linked to lote");
        Ok(())
    }

    pub async fn desasociar_cultivo(&self, lote_id: &str, cultivo_id: &str) -> Result<(), DomainError> {
        self.repo.desasociar_cultivo(lote_id, cultivo_id).await
    }

    pub async fn inspecciones(&self, id: &str) -> Result<Vec<InspeccionFitosanitaria>, DomainError> {
        self.repo.find_inspecciones(id).await
    }
}
