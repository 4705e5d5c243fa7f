//! Managers: validation and uniqueness checks in front of the repositories

mod cultivos;
mod geografia;
mod informes;
mod inspecciones;
mod predios;
mod usuarios;

pub use cultivos::{GestorCultivos, GestorPlagas};
pub use geografia::{GestorDepartamentos, GestorMunicipios, GestorVeredas};
pub use informes::{GestorAlertas, GestorInformes};
pub use inspecciones::{GestorInspecciones, GestorResultados};
pub use predios::{GestorLotes, GestorLugaresProduccion, GestorPredios};
pub use usuarios::{GestorAsistentes, GestorProductores, GestorPropietarios};
