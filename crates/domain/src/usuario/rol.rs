use crate::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Role tag stored in `usuarios.rol`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rol {
    Propietario,
    Productor,
    AsistenteTecnico,
}

impl Rol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Propietario => "Propietario",
            Self::Productor => "Productor",
            Self::AsistenteTecnico => "Asistente Tecnico",
        }
    }
}

impl FromStr for Rol {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .replace('é', "e")
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect();

        match normalized.as_str() {
            "propietario" => Ok(Self::Propietario),
            "productor" => Ok(Self::Productor),
            "asistentetecnico" | "asistente" => Ok(Self::AsistenteTecnico),
            _ => Err(DomainError::InvalidData(format!("Unknown rol: {s}"))),
        }
    }
}

impl std::fmt::Display for Rol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_storage_text() {
        for rol in [Rol::Propietario, Rol::Productor, Rol::AsistenteTecnico] {
            assert_eq!(rol.as_str().parse::<Rol>().unwrap(), rol);
        }
    }

    #[test]
    fn test_lenient_parsing() {
        assert_eq!("PROPIETARIO".parse::<Rol>().unwrap(), Rol::Propietario);
        assert_eq!(
            "Asistente Técnico".parse::<Rol>().unwrap(),
            Rol::AsistenteTecnico
        );
        assert_eq!(
            "asistente_tecnico".parse::<Rol>().unwrap(),
            Rol::AsistenteTecnico
        );
    }

    #[test]
    fn test_unknown_rol() {
        assert!(matches!(
            "administrador".parse::<Rol>(),
            Err(DomainError::InvalidData(_))
        ));
    }
}
