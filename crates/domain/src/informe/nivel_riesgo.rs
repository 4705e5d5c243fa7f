use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Risk level carried by an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NivelRiesgo {
    #[default]
    Bajo,
    Medio,
    Alto,
    #[serde(rename = "Crítico")]
    Critico,
}

impl NivelRiesgo {
    pub const ALL: [NivelRiesgo; 4] = [Self::Bajo, Self::Medio, Self::Alto, Self::Critico];

    /// Text stored in `alertas.nivel_riesgo`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bajo => "Bajo",
            Self::Medio => "Medio",
            Self::Alto => "Alto",
            Self::Critico => "Crítico",
        }
    }

    /// Alto and Crítico alerts are the active ones.
    pub fn is_activo(&self) -> bool {
        matches!(self, Self::Alto | Self::Critico)
    }
}

impl fmt::Display for NivelRiesgo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NivelRiesgo {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|n| n.as_str() == s.trim())
            .ok_or_else(|| DomainError::InvalidData(format!("Unknown risk level: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_text() {
        assert_eq!("Crítico".parse::<NivelRiesgo>().unwrap(), NivelRiesgo::Critico);
        assert_eq!(" Alto ".parse::<NivelRiesgo>().unwrap(), NivelRiesgo::Alto);
        assert!("critico".parse::<NivelRiesgo>().is_err());
        assert!("".parse::<NivelRiesgo>().is_err());
    }

    #[test]
    fn test_activo() {
        let activos: Vec<_> = NivelRiesgo::ALL.iter().filter(|n| n.is_activo()).collect();
        assert_eq!(activos, vec![&NivelRiesgo::Alto, &NivelRiesgo::Critico]);
    }

    #[test]
    fn test_serde_uses_stored_text() {
        let json = serde_json::to_string(&NivelRiesgo::Critico).unwrap();
        assert_eq!(json, "\"Crítico\"");
    }
}
