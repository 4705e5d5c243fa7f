//! Phytosanitary reports and the alerts raised from them

mod entity;
mod nivel_riesgo;
mod repository;

pub use entity::{Alerta, EstadisticaNivel, InformeFitosanitario, InformeResumen};
pub use nivel_riesgo::NivelRiesgo;
#[cfg(any(test, feature = "mocks"))]
pub use repository::{MockAlertaRepository, MockInformeRepository};
pub use repository::{AlertaRepository, InformeRepository};
