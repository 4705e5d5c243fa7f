use serde::{Deserialize, Serialize};

/// A crop variety grown in lots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cultivo {
    pub id: String,
    pub nombre_variedad: String,
    #[serde(default)]
    pub nombre_cultivo: Option<String>,
    #[serde(default)]
    pub especie_vegetal: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
}

impl Cultivo {
    pub fn new(id: impl Into<String>, nombre_variedad: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nombre_variedad: nombre_variedad.into(),
            nombre_cultivo: None,
            especie_vegetal: None,
            descripcion: None,
        }
    }

    /// Name shown in listings: the crop name when set, the variety otherwise.
    pub fn nombre(&self) -> &str {
        self.nombre_cultivo
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.nombre_variedad)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plaga {
    pub id: String,
    pub nombre_comun: String,
    #[serde(default)]
    pub nombre_cientifico: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
}

impl Plaga {
    pub fn new(id: impl Into<String>, nombre_comun: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nombre_comun: nombre_comun.into(),
            nombre_cientifico: None,
            descripcion: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nombre_falls_back_to_variedad() {
        let mut c = Cultivo::new("C-1", "Castillo");
        assert_eq!(c.nombre(), "Castillo");

        c.nombre_cultivo = Some("Café".into());
        assert_eq!(c.nombre(), "Café");

        c.nombre_cultivo = Some("  ".into());
        assert_eq!(c.nombre(), "Castillo");
    }
}
