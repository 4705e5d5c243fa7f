use crate::validacion::{coincide, requerido};
use domain::cultivo::{CultivoRepository, PlagaRepository};
use domain::{Cultivo, DomainError, Lote, Plaga, ResultadoTecnico};
use std::sync::Arc;
use tracing::{info, warn};

pub struct GestorCultivos {
    repo: Arc<dyn CultivoRepository>,
}

impl GestorCultivos {
    pub fn new(repo: Arc<dyn CultivoRepository>) -> Self {
        Self { repo }
    }

    fn validar(cultivo: &Cultivo) -> Result<(), DomainError> {
        requerido("id", &cultivo.id)?;
        requerido("nombre_variedad", &cultivo.nombre_variedad)
    }

    pub async fn registrar(&self, cultivo: Cultivo) -> Result<(), DomainError> {
        Self::validar(&cultivo)?;
        if self.repo.find_by_id(&cultivo.id).await?.is_some() {
            warn!(id = %cultivo.id, "Cultivo already exists");
            return Err(DomainError::already_exists("Cultivo", cultivo.id));
        }
        self.repo.insert(&cultivo).await?;
        info!(id = %cultivo.id, nombre = cultivo.nombre(), "Cultivo registered");
        Ok(())
    }

    pub async fn actualizar(&self, cultivo: Cultivo) -> Result<(), DomainError> {
        if self.repo.find_by_id(&cultivo.id).await?.is_none() {
            return Err(DomainError::not_found("Cultivo", cultivo.id));
        }
        Self::validar(&cultivo)?;
        self.repo.update(&cultivo).await
    }

    pub async fn eliminar(&self, id: &str) -> Result<(), DomainError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Cultivo", id));
        }
        self.repo.delete(id).await?;
        info!(id, "Cultivo deleted");
        Ok(())
    }

    pub async fn consultar(&self, id: &str) -> Result<Option<Cultivo>, DomainError> {
        self.repo.find_by_id(id).await
    }

    pub async fn listar(&self) -> Result<Vec<Cultivo>, DomainError> {
        self.repo.find_all().await
    }

    /// Matches the display name or the variety.
    pub async fn buscar_por_nombre(&self, consulta: &str) -> Result<Vec<Cultivo>, DomainError> {
        let todos = self.repo.find_all().await?;
        Ok(todos
            .into_iter()
            .filter(|c| coincide(c.nombre(), consulta) || coincide(&c.nombre_variedad, consulta))
            .collect())
    }

    pub async fn lotes(&self, id: &str) -> Result<Vec<Lote>, DomainError> {
        self.repo.find_lotes(id).await
    }

    pub async fn plagas(&self, id: &str) -> Result<Vec<Plaga>, DomainError> {
        self.repo.find_plagas(id).await
    }

    pub async fn asociar_plaga(&self, cultivo_id: &str, plaga_id: &str) -> Result<(), DomainError> {
        requerido("cultivo", cultivo_id)?;
        requerido("plaga", plaga_id)?;
        self.repo.asociar_plaga(cultivo_id, plaga_id).await?;
        info!(cultivo_id, plaga_id, "Plaga linked to cultivo");
        Ok(())
    }

    pub async fn desasociar_plaga(&self, cultivo_id: &str, plaga_id: &str) -> Result<(), DomainError> {
        self.repo.desasociar_plaga(cultivo_id, plaga_id).await
    }

    pub async fn resultados(&self, id: &str) -> Result<Vec<ResultadoTecnico>, DomainError> {
        self.repo.find_resultados(id).await
    }
}

pub struct GestorPlagas {
    repo: Arc<dyn PlagaRepository>,
}

impl GestorPlagas {
    pub fn new(repo: Arc<dyn PlagaRepository>) -> Self {
        Self { repo }
    }

    fn validar(plaga: &Plaga) -> Result<(), DomainError> {
        requerido("id", &plaga.id)?;
        requerido("nombre_comun", &plaga.nombre_comun)
    }

    pub async fn registrar(&self, plaga: Plaga) -> Result<(), DomainError> {
        Self::validar(&plaga)?;
        if self.repo.find_by_id(&plaga.id).await?.is_some() {
            warn!(id = %plaga.id, "Plaga already exists");
            return Err(DomainError::already_exists("Plaga", plaga.id));
        }
        self.repo.insert(&plaga).await?;
        info!(id = %plaga.id, nombre = %plaga.nombre_comun, "Plaga registered");
        Ok(())
    }

    pub async fn actualizar(&self, plaga: Plaga) -> Result<(), DomainError> {
        if self.repo.find_by_id(&plaga.id).await?.is_none() {
            return Err(DomainError::not_found("Plaga", plaga.id));
        }
        Self::validar(&plaga)?;
        self.repo.update(&plaga).await
    }

    pub async fn eliminar(&self, id: &str) -> Result<(), DomainError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Plaga", id));
        }
        self.repo.delete(id).await?;
        info!(id, "Plaga deleted");
        Ok(())
    }

    pub async fn consultar(&self, id: &str) -> Result<Option<Plaga>, DomainError> {
        self.repo.find_by_id(id).await
    }

    pub async fn listar(&self) -> Result<Vec<Plaga>, DomainError> {
        self.repo.find_all().await
    }

    /// Matches common or scientific name.
    pub async fn buscar_por_nombre(&self, consulta: &str) -> Result<Vec<Plaga>, DomainError> {
        let todos = self.repo.find_all().await?;
        Ok(todos
            .into_iter()
            .filter(|p| {
                coincide(&p.nombre_comun, consulta)
                    || p.nombre_cientifico
                        .as_deref()
                        .is_some_and(|n| coincide(n, consulta))
            })
            .collect())
    }

    pub async fn por_nombre_comun(&self, nombre: &str) -> Result<Vec<Plaga>, DomainError> {
        self.repo.find_by_nombre_comun(nombre).await
    }

    pub async fn por_nombre_cientifico(&self, nombre: &str) -> Result<Vec<Plaga>, DomainError> {
        self.repo.find_by_nombre_cientifico(nombre).await
    }

    pub async fn cultivos_afectados(&self, id: &str) -> Result<Vec<Cultivo>, DomainError> {
        self.repo.find_cultivos_afectados(id).await
    }

    pub async fn resultados(&self, id: &str) -> Result<Vec<ResultadoTecnico>, DomainError> {
        self.repo.find_resultados(id).await
    }

    pub async fn detecciones(&self, id: &str) -> Result<i64, DomainError> {
        self.repo.count_detecciones(id).await
    }
}
