use super::{Cultivo, Plaga};
use crate::DomainError;
use crate::inspeccion::ResultadoTecnico;
use crate::predio::Lote;
use async_trait::async_trait;

/// Crops and their `cultivo_plaga` associations
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait CultivoRepository: Send + Sync {
    async fn insert(&self, cultivo: &Cultivo) -> Result<(), DomainError>;
    async fn update(&self, cultivo: &Cultivo) -> Result<(), DomainError>;

    /// Clears `cultivo_plaga`, `lote_cultivo` and `resultado_cultivo` rows
    /// before the crop itself.
    async fn delete(&self, id: &str) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Cultivo>, DomainError>;
    async fn find_all(&self) -> Result<Vec<Cultivo>, DomainError>;

    /// Substring match on the crop name or variety
    async fn find_by_nombre(&self, nombre: &str) -> Result<Vec<Cultivo>, DomainError>;

    async fn find_lotes(&self, id: &str) -> Result<Vec<Lote>, DomainError>;
    async fn find_plagas(&self, id: &str) -> Result<Vec<Plaga>, DomainError>;
    async fn asociar_plaga(&self, cultivo_id: &str, plaga_id: &str) -> Result<(), DomainError>;
    async fn desasociar_plaga(&self, cultivo_id: &str, plaga_id: &str)
    -> Result<(), DomainError>;
    async fn find_resultados(&self, id: &str) -> Result<Vec<ResultadoTecnico>, DomainError>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait PlagaRepository: Send + Sync {
    async fn insert(&self, plaga: &Plaga) -> Result<(), DomainError>;
    async fn update(&self, plaga: &Plaga) -> Result<(), DomainError>;
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Plaga>, DomainError>;
    async fn find_all(&self) -> Result<Vec<Plaga>, DomainError>;
    async fn find_by_nombre_comun(&self, nombre: &str) -> Result<Vec<Plaga>, DomainError>;
    async fn find_by_nombre_cientifico(&self, nombre: &str) -> Result<Vec<Plaga>, DomainError>;
    async fn find_cultivos_afectados(&self, id: &str) -> Result<Vec<Cultivo>, DomainError>;
    async fn find_resultados(&self, id: &str) -> Result<Vec<ResultadoTecnico>, DomainError>;

    /// Number of technical results that recorded this pest
    async fn count_detecciones(&self, id: &str) -> Result<i64, DomainError>;
}
