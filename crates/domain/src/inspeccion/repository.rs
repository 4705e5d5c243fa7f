use super::{InspeccionFitosanitaria, ResultadoTecnico};
use crate::DomainError;
use crate::cultivo::{Cultivo, Plaga};
use crate::predio::Lote;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Inspections; lists come back newest first.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait InspeccionRepository: Send + Sync {
    async fn insert(&self, inspeccion: &InspeccionFitosanitaria) -> Result<(), DomainError>;
    async fn update(&self, inspeccion: &InspeccionFitosanitaria) -> Result<(), DomainError>;

    /// Clears `inspeccion_lote` rows and detaches results before deleting.
    async fn delete(&self, id: &str) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<InspeccionFitosanitaria>, DomainError>;
    async fn find_by_codigo_ica(
        &self,
        codigo_ica: &str,
    ) -> Result<Option<InspeccionFitosanitaria>, DomainError>;
    async fn find_all(&self) -> Result<Vec<InspeccionFitosanitaria>, DomainError>;
    async fn find_by_asistente(
        &self,
        asistente_id: &str,
    ) -> Result<Vec<InspeccionFitosanitaria>, DomainError>;

    /// Inclusive on both ends
    async fn find_by_rango_fechas(
        &self,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<Vec<InspeccionFitosanitaria>, DomainError>;

    async fn find_lotes(&self, id: &str) -> Result<Vec<Lote>, DomainError>;
    async fn asociar_lote(&self, inspeccion_id: &str, lote_id: &str) -> Result<(), DomainError>;
    async fn find_resultados(&self, id: &str) -> Result<Vec<ResultadoTecnico>, DomainError>;
}

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait ResultadoRepository: Send + Sync {
    async fn insert(&self, resultado: &ResultadoTecnico) -> Result<(), DomainError>;
    async fn update(&self, resultado: &ResultadoTecnico) -> Result<(), DomainError>;

    /// Clears `resultado_cultivo` and `resultado_plaga` rows before the result.
    async fn delete(&self, id: &str) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<ResultadoTecnico>, DomainError>;
    async fn find_all(&self) -> Result<Vec<ResultadoTecnico>, DomainError>;
    async fn find_by_inspeccion(
        &self,
        inspeccion_id: &str,
    ) -> Result<Vec<ResultadoTecnico>, DomainError>;
    async fn find_by_informe(&self, informe_id: &str)
    -> Result<Vec<ResultadoTecnico>, DomainError>;
    async fn find_cultivos(&self, id: &str) -> Result<Vec<Cultivo>, DomainError>;
    async fn asociar_cultivo(&self, resultado_id: &str, cultivo_id: &str)
    -> Result<(), DomainError>;
    async fn find_plagas(&self, id: &str) -> Result<Vec<Plaga>, DomainError>;
    async fn asociar_plaga(&self, resultado_id: &str, plaga_id: &str) -> Result<(), DomainError>;
}
