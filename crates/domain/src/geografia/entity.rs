use crate::Referencia;
use serde::{Deserialize, Serialize};

/// Top of the geographic hierarchy.
///
/// `municipios` is only filled by the "with municipios" read; every other
/// read leaves it empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Departamento {
    pub id: String,
    pub nombre: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub municipios: Vec<Municipio>,
}

impl Departamento {
    pub fn new(id: impl Into<String>, nombre: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nombre: nombre.into(),
            municipios: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Municipio {
    pub id: String,
    pub nombre: String,
    /// Parent departamento; label is its name.
    #[serde(default)]
    pub departamento: Option<Referencia>,
}

impl Municipio {
    pub fn new(
        id: impl Into<String>,
        nombre: impl Into<String>,
        departamento_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            nombre: nombre.into(),
            departamento: Some(Referencia::new(departamento_id)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vereda {
    pub id: String,
    pub nombre: String,
    /// Parent municipio; label is its name.
    #[serde(default)]
    pub municipio: Option<Referencia>,
}

impl Vereda {
    pub fn new(
        id: impl Into<String>,
        nombre: impl Into<String>,
        municipio_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            nombre: nombre.into(),
            municipio: Some(Referencia::new(municipio_id)),
        }
    }
}
