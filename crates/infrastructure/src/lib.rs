//! Infrastructure layer - SQLite persistence, configuration and credentials

pub mod config;
pub mod credentials;
pub mod database;

pub use config::AppConfig;
pub use credentials::CredentialStore;
pub use database::{
    Database, SqliteAlertaRepository, SqliteAsistenteTecnicoRepository, SqliteCultivoRepository,
    SqliteDepartamentoRepository, SqliteInformeRepository, SqliteInspeccionRepository,
    SqliteLoteRepository, SqliteLugarProduccionRepository, SqliteMunicipioRepository,
    SqlitePlagaRepository, SqlitePredioRepository, SqliteProductorRepository,
    SqlitePropietarioRepository, SqliteResultadoRepository, SqliteUsuarioRepository,
    SqliteVeredaRepository,
};
