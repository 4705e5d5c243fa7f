//! Predios, production sites and lots

mod entity;
mod repository;

pub use entity::{LugarProduccion, Lote, Predio};
#[cfg(any(test, feature = "mocks"))]
pub use repository::{MockLoteRepository, MockLugarProduccionRepository, MockPredioRepository};
pub use repository::{LoteRepository, LugarProduccionRepository, PredioRepository};
