use crate::validacion::{referencia_opcional, requerido};
use chrono::NaiveDate;
use domain::inspeccion::{InspeccionRepository, ResultadoRepository};
use domain::{Cultivo, DomainError, InspeccionFitosanitaria, Lote, Plaga, ResultadoTecnico};
use std::sync::Arc;
use tracing::{info, warn};

pub struct GestorInspecciones {
    repo: Arc<dyn InspeccionRepository>,
}

impl GestorInspecciones {
    pub fn new(repo: Arc<dyn InspeccionRepository>) -> Self {
        Self { repo }
    }

    fn validar(inspeccion: &InspeccionFitosanitaria) -> Result<(), DomainError> {
        requerido("id", &inspeccion.id)?;
        requerido("codigo_ica", &inspeccion.codigo_ica)?;
        referencia_opcional("asistente_tecnico", &inspeccion.asistente_tecnico)
    }

    pub async fn registrar(&self, inspeccion: InspeccionFitosanitaria) -> Result<(), DomainError> {
        Self::validar(&inspeccion)?;
        if self.repo.find_by_id(&inspeccion.id).await?.is_some() {
            warn!(id = %inspeccion.id, "Inspección already exists");
            return Err(DomainError::already_exists("InspeccionFitosanitaria", inspeccion.id));
        }
        self.repo.insert(&inspeccion).await?;
        info!(
            id = %inspeccion.id,
            codigo_ica = %inspeccion.codigo_ica,
            fecha = %inspeccion.fecha_inspeccion,
            "Inspección registered"
        );
        Ok(())
    }

    pub async fn actualizar(&self, inspeccion: InspeccionFitosanitaria) -> Result<(), DomainError> {
        if self.repo.find_by_id(&inspeccion.id).await?.is_none() {
            return Err(DomainError::not_found("InspeccionFitosanitaria", inspeccion.id));
        }
        Self::validar(&inspeccion)?;
        self.repo.update(&inspeccion).await
    }

    pub async fn eliminar(&self, id: &str) -> Result<(), DomainError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("InspeccionFitosanitaria", id));
        }
        self.repo.delete(id).await?;
        info!(id, "Inspección deleted");
        Ok(())
    }

    pub async fn consultar(&self, id: &str) -> Result<Option<InspeccionFitosanitaria>, DomainError> {
        self.repo.find_by_id(id).await
    }

    pub async fn consultar_por_codigo_ica(
        &self,
        codigo_ica: &str,
    ) -> Result<Option<InspeccionFitosanitaria>, DomainError> {
        self.repo.find_by_codigo_ica(codigo_ica).await
    }

    pub async fn listar(&self) -> Result<Vec<InspeccionFitosanitaria>, DomainError> {
        self.repo.find_all().await
    }

    pub async fn por_asistente(
        &self,
        asistente_id: &str,
    ) -> Result<Vec<InspeccionFitosanitaria>, DomainError> {
        self.repo.find_by_asistente(asistente_id).await
    }

    pub async fn por_rango_fechas(
        &self,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<Vec<InspeccionFitosanitaria>, DomainError> {
        if desde > hasta {
            warn!(%desde, %hasta, "Inverted date range");
            return Err(DomainError::validation(format!(
                "Date range starts after it ends: {} > {}",
                desde, hasta
            )));
        }
        self.repo.find_by_rango_fechas(desde, hasta).await
    }

    pub async fn lotes(&self, id: &str) -> Result<Vec<Lote>, DomainError> {
        self.repo.find_lotes(id).await
    }

    pub async fn asociar_lote(&self, inspeccion_id: &str, lote_id: &str) -> Result<(), DomainError> {
        requerido("inspeccion", inspeccion_id)?;
        requerido("lote", lote_id)?;
        self.repo.asociar_lote(inspeccion_id, lote_id).await?;
        info!(inspeccion_id, lote_id, "Lote linked to inspección");
        Ok(())
    }

    pub async fn resultados(&self, id: &str) -> Result<Vec<ResultadoTecnico>, DomainError> {
        self.repo.find_resultados(id).await
    }
}

pub struct GestorResultados {
    repo: Arc<dyn ResultadoRepository>,
}

impl GestorResultados {
    pub fn new(repo: Arc<dyn ResultadoRepository>) -> Self {
        Self { repo }
    }

    fn validar(resultado: &ResultadoTecnico) -> Result<(), DomainError> {
        requerido("id", &resultado.id)?;
        resultado.validar_conteos()?;
        referencia_opcional("inspeccion", &resultado.inspeccion)?;
        referencia_opcional("informe", &resultado.informe)
    }

    pub async fn registrar(&self, resultado: ResultadoTecnico) -> Result<(), DomainError> {
        Self::validar(&resultado)?;
        if self.repo.find_by_id(&resultado.id).await?.is_some() {
            warn!(id = %resultado.id, "Resultado already exists");
            return Err(DomainError::already_exists("ResultadoTecnico", resultado.id));
        }
        self.repo.insert(&resultado).await?;
        info!(
            id = %resultado.id,
            evaluadas = resultado.total_plantas_evaluadas,
            afectadas = resultado.plantas_afectadas,
            "Resultado técnico registered"
        );
        Ok(())
    }

    pub async fn actualizar(&self, resultado: ResultadoTecnico) -> Result<(), DomainError> {
        if self.repo.find_by_id(&resultado.id).await?.is_none() {
            return Err(DomainError::not_found("ResultadoTecnico", resultado.id));
        }
        Self::validar(&resultado)?;
        self.repo.update(&resultado).await
    }

    pub async fn eliminar(&self, id: &str) -> Result<(), DomainError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("ResultadoTecnico", id));
        }
        self.repo.delete(id).await?;
        info!(id, "Resultado técnico deleted");
        Ok(())
    }

    pub async fn consultar(&self, id: &str) -> Result<Option<ResultadoTecnico>, DomainError> {
        self.repo.find_by_id(id).await
    }

    pub async fn listar(&self) -> Result<Vec<ResultadoTecnico>, DomainError> {
        self.repo.find_all().await
    }

    pub async fn por_inspeccion(&self, inspeccion_id: &str) -> Result<Vec<ResultadoTecnico>, DomainError> {
        self.repo.find_by_inspeccion(inspeccion_id).await
    }

    pub async fn por_informe(&self, informe_id: &str) -> Result<Vec<ResultadoTecnico>, DomainError> {
        self.repo.find_by_informe(informe_id).await
    }

    /// Affected plants as a percentage of those evaluated; 0.0 for an empty sample.
    pub async fn porcentaje_afectacion(&self, id: &str) -> Result<f64, DomainError> {
        let resultado = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("ResultadoTecnico", id))?;
        Ok(resultado.porcentaje_afectacion())
    }

    pub async fn cultivos(&self, id: &str) -> Result<Vec<Cultivo>, DomainError> {
        self.repo.find_cultivos(id).await
    }

    pub async fn asociar_cultivo(&self, resultado_id: &str, cultivo_id: &str) -> Result<(), DomainError> {
        requerido("resultado", resultado_id)?;
        requerido("cultivo", cultivo_id)?;
        self.repo.asociar_cultivo(resultado_id, cultivo_id).await
    }

    pub async fn plagas(&self, id: &str) -> Result<Vec<Plaga>, DomainError> {
        self.repo.find_plagas(id).await
    }

    pub async fn asociar_plaga(&self, resultado_id: &str, plaga_id: &str) -> Result<(), DomainError> {
        requerido("resultado", resultado_id)?;
        requerido("plaga", plaga_id)?;
        self.repo.asociar_plaga(resultado_id, plaga_id).await
    }
}
