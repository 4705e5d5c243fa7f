use super::NivelRiesgo;
use crate::DomainError;
use crate::inspeccion::ResultadoTecnico;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Report aggregating technical results for a site and date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InformeFitosanitario {
    pub id: String,
    pub codigo_ica: String,
    #[serde(default)]
    pub total_plantas_evaluadas: u32,
    /// Percentage of affected plants
    #[serde(default)]
    pub nivel_incidencia: f64,
    #[serde(default)]
    pub observaciones: Option<String>,
    pub fecha_informe: NaiveDate,
}

impl InformeFitosanitario {
    pub fn new(id: impl Into<String>, codigo_ica: impl Into<String>, fecha_informe: NaiveDate) -> Self {
        Self {
            id: id.into(),
            codigo_ica: codigo_ica.into(),
            total_plantas_evaluadas: 0,
            nivel_incidencia: 0.0,
            observaciones: None,
            fecha_informe,
        }
    }

    /// Recomputes the plant total and incidence from the report's results.
    ///
    /// A total that does not fit the stored count leaves the report untouched.
    pub fn consolidar(&mut self, resultados: &[ResultadoTecnico]) -> Result<(), DomainError> {
        let total: u64 = resultados
            .iter()
            .map(|r| u64::from(r.total_plantas_evaluadas))
            .sum();
        let afectadas: u64 = resultados.iter().map(|r| u64::from(r.plantas_afectadas)).sum();

        self.total_plantas_evaluadas = u32::try_from(total).map_err(|_| {
            DomainError::InvalidData(format!(
                "InformeFitosanitario {}: {} evaluated plants exceed the stored count",
                self.id, total
            ))
        })?;
        self.nivel_incidencia = if total == 0 {
            0.0
        } else {
            afectadas as f64 * 100.0 / total as f64
        };
        Ok(())
    }
}

/// The report an alert belongs to, as read back through the join
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InformeResumen {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codigo_ica: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nivel_incidencia: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fecha_informe: Option<NaiveDate>,
}

impl InformeResumen {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            codigo_ica: None,
            nivel_incidencia: None,
            fecha_informe: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alerta {
    pub id: String,
    pub nivel_riesgo: NivelRiesgo,
    pub informe: InformeResumen,
}

impl Alerta {
    pub fn new(id: impl Into<String>, nivel_riesgo: NivelRiesgo, informe_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nivel_riesgo,
            informe: InformeResumen::new(informe_id),
        }
    }

    pub fn is_activa(&self) -> bool {
        self.nivel_riesgo.is_activo()
    }
}

/// Alert count for one risk level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstadisticaNivel {
    pub nivel_riesgo: NivelRiesgo,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fecha() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_consolidar() {
        let mut informe = InformeFitosanitario::new("INF-1", "ICA-1", fecha());
        informe.consolidar(&[
            ResultadoTecnico::new("R-1", 60, 6),
            ResultadoTecnico::new("R-2", 40, 14),
        ])
        .unwrap();
        assert_eq!(informe.total_plantas_evaluadas, 100);
        assert_eq!(informe.nivel_incidencia, 20.0);
    }

    #[test]
    fn test_consolidar_without_results() {
        let mut informe = InformeFitosanitario::new("INF-1", "ICA-1", fecha());
        informe.nivel_incidencia = 12.0;
        informe.consolidar(&[]).unwrap();
        assert_eq!(informe.total_plantas_evaluadas, 0);
        assert_eq!(informe.nivel_incidencia, 0.0);
    }

    #[test]
    fn test_consolidar_overflow_is_rejected() {
        let mut informe = InformeFitosanitario::new("INF-1", "ICA-1", fecha());
        informe.total_plantas_evaluadas = 7;
        let err = informe
            .consolidar(&[
                ResultadoTecnico::new("R-1", u32::MAX, 0),
                ResultadoTecnico::new("R-2", 1, 0),
            ])
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidData(_)));
        assert_eq!(informe.total_plantas_evaluadas, 7);
    }

    #[test]
    fn test_alerta_from_json_needs_only_informe_id() {
        let a: Alerta = serde_json::from_str(
            r#"{"id":"AL-1","nivel_riesgo":"Crítico","informe":{"id":"INF-1"}}"#,
        )
        .unwrap();
        assert!(a.is_activa());
        assert_eq!(a.informe, InformeResumen::new("INF-1"));
    }
}
