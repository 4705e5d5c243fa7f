use super::{AsistenteTecnico, Productor, Propietario, Usuario};
use crate::DomainError;
use crate::inspeccion::InspeccionFitosanitaria;
use crate::predio::{LugarProduccion, Predio};
use async_trait::async_trait;

/// Lookups over the shared `usuarios` table, regardless of role.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait UsuarioRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Usuario>, DomainError>;

    /// Identification numbers are unique across every role.
    async fn find_by_numero_identificacion(
        &self,
        numero: &str,
    ) -> Result<Option<Usuario>, DomainError>;
}

/// Repository interface for property owners
///
/// Writes touch `usuarios`, `propietario` and `permisos_usuario` together.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait PropietarioRepository: Send + Sync {
    async fn insert(&self, propietario: &Propietario) -> Result<(), DomainError>;

    /// Fails with `NotFound` when no row has the propietario's id.
    async fn update(&self, propietario: &Propietario) -> Result<(), DomainError>;

    /// Removes the role row and permissions before the base user row.
    async fn delete(&self, id: &str) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Propietario>, DomainError>;

    async fn find_by_numero_identificacion(
        &self,
        numero: &str,
    ) -> Result<Option<Propietario>, DomainError>;

    async fn find_all(&self) -> Result<Vec<Propietario>, DomainError>;

    /// Predios owned by the given propietario id
    async fn find_predios(&self, id: &str) -> Result<Vec<Predio>, DomainError>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ProductorRepository: Send + Sync {
    async fn insert(&self, productor: &Productor) -> Result<(), DomainError>;
    async fn update(&self, productor: &Productor) -> Result<(), DomainError>;
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Productor>, DomainError>;
    async fn find_by_numero_identificacion(
        &self,
        numero: &str,
    ) -> Result<Option<Productor>, DomainError>;
    async fn find_all(&self) -> Result<Vec<Productor>, DomainError>;
    async fn find_lugares_produccion(&self, id: &str)
    -> Result<Vec<LugarProduccion>, DomainError>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait AsistenteTecnicoRepository: Send + Sync {
    async fn insert(&self, asistente: &AsistenteTecnico) -> Result<(), DomainError>;
    async fn update(&self, asistente: &AsistenteTecnico) -> Result<(), DomainError>;
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<AsistenteTecnico>, DomainError>;
    async fn find_by_numero_identificacion(
        &self,
        numero: &str,
    ) -> Result<Option<AsistenteTecnico>, DomainError>;
    async fn find_by_tarjeta_profesional(
        &self,
        numero_tarjeta: &str,
    ) -> Result<Option<AsistenteTecnico>, DomainError>;
    async fn find_all(&self) -> Result<Vec<AsistenteTecnico>, DomainError>;
    async fn find_lugares_produccion(&self, id: &str)
    -> Result<Vec<LugarProduccion>, DomainError>;
    async fn find_inspecciones(&self, id: &str)
    -> Result<Vec<InspeccionFitosanitaria>, DomainError>;
}
