use super::{Alerta, EstadisticaNivel, InformeFitosanitario, NivelRiesgo};
use crate::DomainError;
use crate::inspeccion::ResultadoTecnico;
use async_trait::async_trait;
use chrono::NaiveDate;

#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait InformeRepository: Send + Sync {
    async fn insert(&self, informe: &InformeFitosanitario) -> Result<(), DomainError>;
    async fn update(&self, informe: &InformeFitosanitario) -> Result<(), DomainError>;

    /// Deletes the report's alerts and detaches its results first.
    async fn delete(&self, id: &str) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<InformeFitosanitario>, DomainError>;
    async fn find_by_codigo_ica(
        &self,
        codigo_ica: &str,
    ) -> Result<Option<InformeFitosanitario>, DomainError>;

    /// Newest first
    async fn find_all(&self) -> Result<Vec<InformeFitosanitario>, DomainError>;

    async fn find_by_rango_fechas(
        &self,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<Vec<InformeFitosanitario>, DomainError>;

    /// Reports at or above the given incidence, highest first
    async fn find_by_nivel_minimo(
        &self,
        nivel_minimo: f64,
    ) -> Result<Vec<InformeFitosanitario>, DomainError>;

    async fn find_resultados(&self, id: &str) -> Result<Vec<ResultadoTecnico>, DomainError>;
    async fn find_alertas(&self, id: &str) -> Result<Vec<Alerta>, DomainError>;

    /// 0.0 when there are no reports
    async fn promedio_incidencia(&self) -> Result<f64, DomainError>;
    async fn total_plantas_evaluadas(&self) -> Result<i64, DomainError>;
}

/// Alerts; lists are ordered by the linked report's date, newest first.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait AlertaRepository: Send + Sync {
    async fn insert(&self, alerta: &Alerta) -> Result<(), DomainError>;
    async fn update(&self, alerta: &Alerta) -> Result<(), DomainError>;
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Alerta>, DomainError>;
    async fn find_all(&self) -> Result<Vec<Alerta>, DomainError>;
    async fn find_by_nivel(&self, nivel: NivelRiesgo) -> Result<Vec<Alerta>, DomainError>;
    async fn find_by_informe(&self, informe_id: &str) -> Result<Vec<Alerta>, DomainError>;

    /// Alto and Crítico alerts only
    async fn find_activas(&self) -> Result<Vec<Alerta>, DomainError>;

    async fn count_by_nivel(&self, nivel: NivelRiesgo) -> Result<i64, DomainError>;

    /// Counts per level, largest first
    async fn estadisticas_por_nivel(&self) -> Result<Vec<EstadisticaNivel>, DomainError>;
}
