mod entity;
mod repository;
mod rol;

pub use entity::{AsistenteTecnico, ConUsuario, Productor, Propietario, Usuario};
#[cfg(any(test, feature = "mocks"))]
pub use repository::{
    MockAsistenteTecnicoRepository, MockProductorRepository, MockPropietarioRepository,
    MockUsuarioRepository,
};
pub use repository::{
    AsistenteTecnicoRepository, ProductorRepository, PropietarioRepository, UsuarioRepository,
};
pub use rol::Rol;
