use crate::validacion::{no_negativo, requerido};
use chrono::NaiveDate;
use domain::informe::{AlertaRepository, EstadisticaNivel, InformeRepository};
use domain::{Alerta, DomainError, InformeFitosanitario, NivelRiesgo, ResultadoTecnico};
use std::sync::Arc;
use tracing::{info, warn};

pub struct GestorInformes {
    repo: Arc<dyn InformeRepository>,
}

impl GestorInformes {
    pub fn new(repo: Arc<dyn InformeRepository>) -> Self {
        Self { repo }
    }

    fn validar(informe: &InformeFitosanitario) -> Result<(), DomainError> {
        requerido("id", &informe.id)?;
        requerido("codigo_ica", &informe.codigo_ica)?;
        no_negativo("nivel_incidencia", informe.nivel_incidencia)
    }

    pub async fn registrar(&self, informe: InformeFitosanitario) -> Result<(), DomainError> {
        Self::validar(&informe)?;
        if self.repo.find_by_id(&informe.id).await?.is_some() {
            warn!(id = %informe.id, "Informe already exists");
            return Err(DomainError::already_exists("InformeFitosanitario", informe.id));
        }
        self.repo.insert(&informe).await?;
        info!(id = %informe.id, codigo_ica = %informe.codigo_ica, "Informe registered");
        Ok(())
    }

    pub async fn actualizar(&self, informe: InformeFitosanitario) -> Result<(), DomainError> {
        if self.repo.find_by_id(&informe.id).await?.is_none() {
            return Err(DomainError::not_found("InformeFitosanitario", informe.id));
        }
        Self::validar(&informe)?;
        self.repo.update(&informe).await
    }

    /// Also removes the report's alerts.
    pub async fn eliminar(&self, id: &str) -> Result<(), DomainError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("InformeFitosanitario", id));
        }
        self.repo.delete(id).await?;
        info!(id, "Informe deleted");
        Ok(())
    }

    pub async fn consultar(&self, id: &str) -> Result<Option<InformeFitosanitario>, DomainError> {
        self.repo.find_by_id(id).await
    }

    pub async fn consultar_por_codigo_ica(
        &self,
        codigo_ica: &str,
    ) -> Result<Option<InformeFitosanitario>, DomainError> {
        self.repo.find_by_codigo_ica(codigo_ica).await
    }

    pub async fn listar(&self) -> Result<Vec<InformeFitosanitario>, DomainError> {
        self.repo.find_all().await
    }

    pub async fn por_rango_fechas(
        &self,
        desde: NaiveDate,
        hasta: NaiveDate,
    ) -> Result<Vec<InformeFitosanitario>, DomainError> {
        if desde > hasta {
            warn!(%desde, %hasta, "Inverted date range");
            return Err(DomainError::validation(format!(
                "Date range starts after it ends: {} > {}",
                desde, hasta
            )));
        }
        self.repo.find_by_rango_fechas(desde, hasta).await
    }

    pub async fn por_nivel_minimo(&self, nivel: f64) -> Result<Vec<InformeFitosanitario>, DomainError> {
        no_negativo("nivel_minimo", nivel)?;
        self.repo.find_by_nivel_minimo(nivel).await
    }

    pub async fn resultados(&self, id: &str) -> Result<Vec<ResultadoTecnico>, DomainError> {
        self.repo.find_resultados(id).await
    }

    pub async fn alertas(&self, id: &str) -> Result<Vec<Alerta>, DomainError> {
        self.repo.find_alertas(id).await
    }

    /// Recomputes plant total and incidence from the linked results and
    /// stores them.
    pub async fn consolidar(&self, id: &str) -> Result<InformeFitosanitario, DomainError> {
        let mut informe = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("InformeFitosanitario", id))?;

        let resultados = self.repo.find_resultados(id).await?;
        if let Err(err) = informe.consolidar(&resultados) {
            warn!(id, error = %err, "Informe could not be consolidated");
            return Err(err);
        }
        self.repo.update(&informe).await?;

        info!(
            id,
            resultados = resultados.len(),
            total = informe.total_plantas_evaluadas,
            incidencia = informe.nivel_incidencia,
            "Informe consolidated"
        );
        Ok(informe)
    }

    pub async fn promedio_incidencia(&self) -> Result<f64, DomainError> {
        self.repo.promedio_incidencia().await
    }

    pub async fn total_plantas_evaluadas(&self) -> Result<i64, DomainError> {
        self.repo.total_plantas_evaluadas().await
    }
}

pub struct GestorAlertas {
    repo: Arc<dyn AlertaRepository>,
    informes: Arc<dyn InformeRepository>,
}

impl GestorAlertas {
    pub fn new(repo: Arc<dyn AlertaRepository>, informes: Arc<dyn InformeRepository>) -> Self {
        Self { repo, informes }
    }

    async fn validar(&self, alerta: &Alerta) -> Result<(), DomainError> {
        requerido("id", &alerta.id)?;
        requerido("informe", &alerta.informe.id)?;
        if self.informes.find_by_id(&alerta.informe.id).await?.is_none() {
            warn!(id = %alerta.id, informe = %alerta.informe.id, "Alert points to a missing report");
            return Err(DomainError::not_found(
                "InformeFitosanitario",
                alerta.informe.id.clone(),
            ));
        }
        Ok(())
    }

    pub async fn registrar(&self, alerta: Alerta) -> Result<(), DomainError> {
        self.validar(&alerta).await?;
        if self.repo.find_by_id(&alerta.id).await?.is_some() {
            warn!(id = %alerta.id, "Alerta already exists");
            return Err(DomainError::already_exists("Alerta", alerta.id));
        }
        self.repo.insert(&alerta).await?;
        info!(id = %alerta.id, nivel = %alerta.nivel_riesgo, "Alerta registered");
        Ok(())
    }

    pub async fn actualizar(&self, alerta: Alerta) -> Result<(), DomainError> {
        if self.repo.find_by_id(&alerta.id).await?.is_none() {
            return Err(DomainError::not_found("Alerta", alerta.id));
        }
        self.validar(&alerta).await?;
        self.repo.update(&alerta).await
    }

    pub async fn eliminar(&self, id: &str) -> Result<(), DomainError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Alerta", id));
        }
        self.repo.delete(id).await?;
        info!(id, "Alerta deleted");
        Ok(())
    }

    pub async fn consultar(&self, id: &str) -> Result<Option<Alerta>, DomainError> {
        self.repo.find_by_id(id).await
    }

    pub async fn listar(&self) -> Result<Vec<Alerta>, DomainError> {
        self.repo.find_all().await
    }

    pub async fn por_nivel(&self, nivel: NivelRiesgo) -> Result<Vec<Alerta>, DomainError> {
        self.repo.find_by_nivel(nivel).await
    }

    pub async fn por_informe(&self, informe_id: &str) -> Result<Vec<Alerta>, DomainError> {
        self.repo.find_by_informe(informe_id).await
    }

    /// Alto and Crítico alerts, newest report first.
    pub async fn listar_alertas_activas(&self) -> Result<Vec<Alerta>, DomainError> {
        let activas = self.repo.find_activas().await?;
        Ok(activas.into_iter().filter(Alerta::is_activa).collect())
    }

    pub async fn contar_por_nivel(&self, nivel: NivelRiesgo) -> Result<i64, DomainError> {
        self.repo.count_by_nivel(nivel).await
    }

    pub async fn estadisticas(&self) -> Result<Vec<EstadisticaNivel>, DomainError> {
        self.repo.estadisticas_por_nivel().await
    }
}
