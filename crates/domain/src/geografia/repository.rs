use super::{Departamento, Municipio, Vereda};
use crate::DomainError;
use crate::predio::Predio;
use async_trait::async_trait;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait DepartamentoRepository: Send + Sync {
    async fn insert(&self, departamento: &Departamento) -> Result<(), DomainError>;
    async fn update(&self, departamento: &Departamento) -> Result<(), DomainError>;
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Departamento>, DomainError>;
    async fn find_all(&self) -> Result<Vec<Departamento>, DomainError>;

    /// Every departamento with its municipios loaded one level deep
    async fn find_all_with_municipios(&self) -> Result<Vec<Departamento>, DomainError>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait MunicipioRepository: Send + Sync {
    async fn insert(&self, municipio: &Municipio) -> Result<(), DomainError>;
    async fn update(&self, municipio: &Municipio) -> Result<(), DomainError>;
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Municipio>, DomainError>;
    async fn find_all(&self) -> Result<Vec<Municipio>, DomainError>;
    async fn find_by_departamento(
        &self,
        departamento_id: &str,
    ) -> Result<Vec<Municipio>, DomainError>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait VeredaRepository: Send + Sync {
    async fn insert(&self, vereda: &Vereda) -> Result<(), DomainError>;
    async fn update(&self, vereda: &Vereda) -> Result<(), DomainError>;
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Vereda>, DomainError>;
    async fn find_all(&self) -> Result<Vec<Vereda>, DomainError>;
    async fn find_by_municipio(&self, municipio_id: &str) -> Result<Vec<Vereda>, DomainError>;
    async fn find_predios(&self, id: &str) -> Result<Vec<Predio>, DomainError>;
}
