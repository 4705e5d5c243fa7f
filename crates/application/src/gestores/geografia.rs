use crate::validacion::{coincide, referencia_opcional, requerido};
use domain::geografia::{DepartamentoRepository, MunicipioRepository, VeredaRepository};
use domain::{Departamento, DomainError, Municipio, Predio, Vereda};
use std::sync::Arc;
use tracing::{info, warn};

pub struct GestorDepartamentos {
    repo: Arc<dyn DepartamentoRepository>,
}

impl GestorDepartamentos {
    pub fn new(repo: Arc<dyn DepartamentoRepository>) -> Self {
        Self { repo }
    }

    fn validar(departamento: &Departamento) -> Result<(), DomainError> {
        requerido("id", &departamento.id)?;
        requerido("nombre", &departamento.nombre)
    }

    pub async fn registrar(&self, departamento: Departamento) -> Result<(), DomainError> {
        Self::validar(&departamento)?;
        if self.repo.find_by_id(&departamento.id).await?.is_some() {
            warn!(id = %departamento.id, "Departamento already exists");
            return Err(DomainError::already_exists("Departamento", departamento.id));
        }
        self.repo.insert(&departamento).await?;
        info!(id = %departamento.id, "Departamento registered");
        Ok(())
    }

    pub async fn actualizar(&self, departamento: Departamento) -> Result<(), DomainError> {
        if self.repo.find_by_id(&departamento.id).await?.is_none() {
            return Err(DomainError::not_found("Departamento", departamento.id));
        }
        Self::validar(&departamento)?;
        self.repo.update(&departamento).await
    }

    pub async fn eliminar(&self, id: &str) -> Result<(), DomainError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Departamento", id));
        }
        self.repo.delete(id).await?;
        info!(id, "Departamento deleted");
        Ok(())
    }

    pub async fn consultar(&self, id: &str) -> Result<Option<Departamento>, DomainError> {
        self.repo.find_by_id(id).await
    }

    pub async fn listar(&self) -> Result<Vec<Departamento>, DomainError> {
        self.repo.find_all().await
    }

    /// Every departamento with its municipios attached
    pub async fn listar_con_municipios(&self) -> Result<Vec<Departamento>, DomainError> {
        self.repo.find_all_with_municipios().await
    }

    pub async fn buscar_por_nombre(&self, consulta: &str) -> Result<Vec<Departamento>, DomainError> {
        let todos = self.repo.find_all().await?;
        Ok(todos
            .into_iter()
            .filter(|d| coincide(&d.nombre, consulta))
            .collect())
    }
}

pub struct GestorMunicipios {
    repo: Arc<dyn MunicipioRepository>,
}

impl GestorMunicipios {
    pub fn new(repo: Arc<dyn MunicipioRepository>) -> Self {
        Self { repo }
    }

    fn validar(municipio: &Municipio) -> Result<(), DomainError> {
        requerido("id", &municipio.id)?;
        requerido("nombre", &municipio.nombre)?;
        referencia_opcional("departamento", &municipio.departamento)
    }

    pub async fn registrar(&self, municipio: Municipio) -> Result<(), DomainError> {
        Self::validar(&municipio)?;
        if self.repo.find_by_id(&municipio.id).await?.is_some() {
            warn!(id = %municipio.id, "Municipio already exists");
            return Err(DomainError::already_exists("Municipio", municipio.id));
        }
        self.repo.insert(&municipio).await?;
        info!(id = %municipio.id, "Municipio registered");
        Ok(())
    }

    pub async fn actualizar(&self, municipio: Municipio) -> Result<(), DomainError> {
        if self.repo.find_by_id(&municipio.id).await?.is_none() {
            return Err(DomainError::not_found("Municipio", municipio.id));
        }
        Self::validar(&municipio)?;
        self.repo.update(&municipio).await
    }

    pub async fn eliminar(&self, id: &str) -> Result<(), DomainError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Municipio", id));
        }
        self.repo.delete(id).await?;
        info!(id, "Municipio deleted");
        Ok(())
    }

    pub async fn consultar(&self, id: &str) -> Result<Option<Municipio>, DomainError> {
        self.repo.find_by_id(id).await
    }

    pub async fn listar(&self) -> Result<Vec<Municipio>, DomainError> {
        self.repo.find_all().await
    }

    pub async fn por_departamento(&self, departamento_id: &str) -> Result<Vec<Municipio>, DomainError> {
        self.repo.find_by_departamento(departamento_id).await
    }

    pub async fn buscar_por_nombre(&self, consulta: &str) -> Result<Vec<Municipio>, DomainError> {
        let todos = self.repo.find_all().await?;
        Ok(todos
            .into_iter()
            .filter(|m| coincide(&m.nombre, consulta))
            .collect())
    }
}

pub struct GestorVeredas {
    repo: Arc<dyn VeredaRepository>,
}

impl GestorVeredas {
    pub fn new(repo: Arc<dyn VeredaRepository>) -> Self {
        Self { repo }
    }

    fn validar(vereda: &Vereda) -> Result<(), DomainError> {
        requerido("id", &vereda.id)?;
        requerido("nombre", &vereda.nombre)?;
        referencia_opcional("municipio", &vereda.municipio)
    }

    pub async fn registrar(&self, vereda: Vereda) -> Result<(), DomainError> {
        Self::validar(&vereda)?;
        if self.repo.find_by_id(&vereda.id).await?.is_some() {
            warn!(id = %vereda.id, "Vereda already exists");
            return Err(DomainError::already_exists("Vereda", vereda.id));
        }
        self.repo.insert(&vereda).await?;
        info!(id = %vereda.id, "Vereda registered");
        Ok(())
    }

    pub async fn actualizar(&self, vereda: Vereda) -> Result<(), DomainError> {
        if self.repo.find_by_id(&vereda.id).await?.is_none() {
            return Err(DomainError::not_found("Vereda", vereda.id));
        }
        Self::validar(&vereda)?;
        self.repo.update(&vereda).await
    }

    pub async fn eliminar(&self, id: &str) -> Result<(), DomainError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Vereda", id));
        }
        self.repo.delete(id).await?;
        info!(id, "Vereda deleted");
        Ok(())
    }

    pub async fn consultar(&self, id: &str) -> Result<Option<Vereda>, DomainError> {
        self.repo.find_by_id(id).await
    }

    pub async fn listar(&self) -> Result<Vec<Vereda>, DomainError> {
        self.repo.find_all().await
    }

    pub async fn por_municipio(&self, municipio_id: &str) -> Result<Vec<Vereda>, DomainError> {
        self.repo.find_by_municipio(municipio_id).await
    }

    pub async fn predios(&self, id: &str) -> Result<Vec<Predio>, DomainError> {
        self.repo.find_predios(id).await
    }

    pub async fn buscar_por_nombre(&self, consulta: &str) -> Result<Vec<Vereda>, DomainError> {
        let todos = self.repo.find_all().await?;
        Ok(todos
            .into_iter()
            .filter(|v| coincide(&v.nombre, consulta))
            .collect())
    }
}
