use super::{LugarProduccion, Lote, Predio};
use crate::DomainError;
use crate::cultivo::Cultivo;
use crate::inspeccion::InspeccionFitosanitaria;
use async_trait::async_trait;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait PredioRepository: Send + Sync {
    async fn insert(&self, predio: &Predio) -> Result<(), DomainError>;
    async fn update(&self, predio: &Predio) -> Result<(), DomainError>;
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Predio>, DomainError>;
    async fn find_by_codigo_ica(&self, codigo_ica: &str) -> Result<Option<Predio>, DomainError>;
    async fn find_all(&self) -> Result<Vec<Predio>, DomainError>;
    async fn find_by_propietario(&self, propietario_id: &str)
    -> Result<Vec<Predio>, DomainError>;
    async fn find_by_vereda(&self, vereda_id: &str) -> Result<Vec<Predio>, DomainError>;
    async fn find_lugares_produccion(&self, id: &str)
    -> Result<Vec<LugarProduccion>, DomainError>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait LugarProduccionRepository: Send + Sync {
    async fn insert(&self, lugar: &LugarProduccion) -> Result<(), DomainError>;
    async fn update(&self, lugar: &LugarProduccion) -> Result<(), DomainError>;
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<LugarProduccion>, DomainError>;
    async fn find_by_codigo_ica(
        &self,
        codigo_ica: &str,
    ) -> Result<Option<LugarProduccion>, DomainError>;
    async fn find_all(&self) -> Result<Vec<LugarProduccion>, DomainError>;
    async fn find_by_predio(&self, predio_id: &str) -> Result<Vec<LugarProduccion>, DomainError>;
    async fn find_by_productor(
        &self,
        productor_id: &str,
    ) -> Result<Vec<LugarProduccion>, DomainError>;
    async fn find_by_asistente(
        &self,
        asistente_id: &str,
    ) -> Result<Vec<LugarProduccion>, DomainError>;
    async fn find_lotes(&self, id: &str) -> Result<Vec<Lote>, DomainError>;
}

/// Lots and their `lote_cultivo` associations
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait LoteRepository: Send + Sync {
    async fn insert(&self, lote: &Lote) -> Result<(), DomainError>;
    async fn update(&self, lote: &Lote) -> Result<(), DomainError>;

    /// Clears `lote_cultivo` and `inspeccion_lote` rows before the lot itself.
    async fn delete(&self, id: &str) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Lote>, DomainError>;
    async fn find_all(&self) -> Result<Vec<Lote>, DomainError>;
    async fn find_by_lugar_produccion(&self, lugar_id: &str) -> Result<Vec<Lote>, DomainError>;
    async fn find_cultivos(&self, id: &str) -> Result<Vec<Cultivo>, DomainError>;
    async fn asociar_cultivo(&self, lote_id: &str, cultivo_id: &str) -> Result<(), DomainError>;
    async fn desasociar_cultivo(&self, lote_id: &str, cultivo_id: &str)
    -> Result<(), DomainError>;
    async fn find_inspecciones(&self, id: &str)
    -> Result<Vec<InspeccionFitosanitaria>, DomainError>;
}
