use crate::{DomainError, Referencia};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspeccionFitosanitaria {
    pub id: String,
    pub codigo_ica: String,
    pub fecha_inspeccion: NaiveDate,
    /// Label is the assistant's name.
    #[serde(default)]
    pub asistente_tecnico: Option<Referencia>,
}

impl InspeccionFitosanitaria {
    pub fn new(
        id: impl Into<String>,
        codigo_ica: impl Into<String>,
        fecha_inspeccion: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            codigo_ica: codigo_ica.into(),
            fecha_inspeccion,
            asistente_tecnico: None,
        }
    }
}

/// Plant counts recorded during an inspection, optionally rolled into a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultadoTecnico {
    pub id: String,
    pub total_plantas_evaluadas: u32,
    #[serde(default)]
    pub plantas_afectadas: u32,
    #[serde(default)]
    pub observaciones: Option<String>,
    /// Label is the inspection's ICA code.
    #[serde(default)]
    pub inspeccion: Option<Referencia>,
    /// Label is the report's ICA code.
    #[serde(default)]
    pub informe: Option<Referencia>,
}

impl ResultadoTecnico {
    pub fn new(id: impl Into<String>, total_plantas_evaluadas: u32, plantas_afectadas: u32) -> Self {
        Self {
            id: id.into(),
            total_plantas_evaluadas,
            plantas_afectadas,
            observaciones: None,
            inspeccion: None,
            informe: None,
        }
    }

    /// Affected plants as a percentage of evaluated plants; 0 when nothing
    /// was evaluated.
    pub fn porcentaje_afectacion(&self) -> f64 {
        if self.total_plantas_evaluadas == 0 {
            return 0.0;
        }
        f64::from(self.plantas_afectadas) * 100.0 / f64::from(self.total_plantas_evaluadas)
    }

    pub fn validar_conteos(&self) -> Result<(), DomainError> {
        if self.plantas_afectadas > self.total_plantas_evaluadas {
            return Err(DomainError::validation(format!(
                "plantas_afectadas ({}) exceeds total_plantas_evaluadas ({})",
                self.plantas_afectadas, self.total_plantas_evaluadas
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_porcentaje_afectacion() {
        assert_eq!(ResultadoTecnico::new("R-1", 0, 0).porcentaje_afectacion(), 0.0);
        assert_eq!(ResultadoTecnico::new("R-2", 50, 10).porcentaje_afectacion(), 20.0);
        assert_eq!(ResultadoTecnico::new("R-3", 4, 4).porcentaje_afectacion(), 100.0);
    }

    #[test]
    fn test_validar_conteos() {
        assert!(ResultadoTecnico::new("R-1", 10, 10).validar_conteos().is_ok());
        assert!(matches!(
            ResultadoTecnico::new("R-2", 10, 11).validar_conteos(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_inspeccion_date_serializes_as_iso() {
        let fecha = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let i = InspeccionFitosanitaria::new("INS-1", "ICA-9", fecha);
        let json = serde_json::to_value(&i).unwrap();
        assert_eq!(json["fecha_inspeccion"], "2024-03-15");
    }
}
