use crate::Referencia;
use serde::{Deserialize, Serialize};

/// A registered farm or land parcel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Predio {
    pub id: String,
    pub codigo_ica: String,
    #[serde(default)]
    pub direccion: Option<String>,
    /// Hectares
    #[serde(default)]
    pub area: f64,
    #[serde(default)]
    pub latitud: f64,
    #[serde(default)]
    pub longitud: f64,
    /// Owner; label is the owner's name.
    #[serde(default)]
    pub propietario: Option<Referencia>,
    /// Location; label is the vereda name.
    #[serde(default)]
    pub vereda: Option<Referencia>,
    #[serde(default)]
    pub cod_lugar_produccion: Option<String>,
}

impl Predio {
    pub fn new(id: impl Into<String>, codigo_ica: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            codigo_ica: codigo_ica.into(),
            direccion: None,
            area: 0.0,
            latitud: 0.0,
            longitud: 0.0,
            propietario: None,
            vereda: None,
            cod_lugar_produccion: None,
        }
    }

    /// Latitude and longitude within their valid ranges
    pub fn coordenadas_validas(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitud) && (-180.0..=180.0).contains(&self.longitud)
    }
}

/// Production site inside a predio, run by one productor and followed by one
/// asistente técnico.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LugarProduccion {
    pub id: String,
    pub codigo_ica: String,
    /// Label is the predio's ICA code.
    #[serde(default)]
    pub predio: Option<Referencia>,
    /// Label is the producer's name.
    #[serde(default)]
    pub productor: Option<Referencia>,
    /// Label is the assistant's name.
    #[serde(default)]
    pub asistente_tecnico: Option<Referencia>,
}

impl LugarProduccion {
    pub fn new(id: impl Into<String>, codigo_ica: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            codigo_ica: codigo_ica.into(),
            predio: None,
            productor: None,
            asistente_tecnico: None,
        }
    }
}

/// Sub-plot of a production site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lote {
    pub id: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    /// Hectares
    #[serde(default)]
    pub extension: f64,
    /// Label is the site's ICA code.
    #[serde(default)]
    pub lugar_produccion: Option<Referencia>,
}

impl Lote {
    pub fn new(id: impl Into<String>, extension: f64) -> Self {
        Self {
            id: id.into(),
            descripcion: None,
            extension,
            lugar_produccion: None,
        }
    }
}
