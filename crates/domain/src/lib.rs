//! Domain layer - Pure business logic with no external dependencies
//!
//! This crate contains:
//! - Entities (users by role, geography, predios, crops, inspections, reports)
//! - Value Objects (Rol, NivelRiesgo, Referencia)
//! - Repository interfaces (traits)
//!
//! Principles:
//! - No dependencies on infrastructure
//! - Business rules enforced at domain level
//! - Testable in isolation

pub mod cultivo;
pub mod error;
pub mod geografia;
pub mod informe;
pub mod inspeccion;
pub mod predio;
pub mod referencia;
pub mod usuario;

// Re-export commonly used types
pub use cultivo::{Cultivo, Plaga};
pub use error::DomainError;
pub use geografia::{Departamento, Municipio, Vereda};
pub use informe::{Alerta, InformeFitosanitario, NivelRiesgo};
pub use inspeccion::{InspeccionFitosanitaria, ResultadoTecnico};
pub use predio::{LugarProduccion, Lote, Predio};
pub use referencia::{Referencia, ref_id};
pub use usuario::{AsistenteTecnico, Productor, Propietario, Rol, Usuario};
