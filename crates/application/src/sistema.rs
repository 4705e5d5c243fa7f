use crate::gestores::{
    GestorAlertas, GestorAsistentes, GestorCultivos, GestorDepartamentos, GestorInformes,
    GestorInspecciones, GestorLotes, GestorLugaresProduccion, GestorMunicipios, GestorPlagas,
    GestorPredios, GestorProductores, GestorPropietarios, GestorResultados, GestorVeredas,
};
use domain::cultivo::{CultivoRepository, PlagaRepository};
use domain::geografia::{DepartamentoRepository, MunicipioRepository, VeredaRepository};
use domain::informe::{AlertaRepository, InformeRepository};
use domain::inspeccion::{InspeccionRepository, ResultadoRepository};
use domain::predio::{LoteRepository, LugarProduccionRepository, PredioRepository};
use domain::usuario::{
    AsistenteTecnicoRepository, ProductorRepository, PropietarioRepository, UsuarioRepository,
};
use std::sync::Arc;
use tracing::info;

/// One handle per repository, shared by the managers built from it
#[derive(Clone)]
pub struct Repositorios {
    pub usuarios: Arc<dyn UsuarioRepository>,
    pub propietarios: Arc<dyn PropietarioRepository>,
    pub productores: Arc<dyn ProductorRepository>,
    pub asistentes: Arc<dyn AsistenteTecnicoRepository>,
    pub departamentos: Arc<dyn DepartamentoRepository>,
    pub municipios: Arc<dyn MunicipioRepository>,
    pub veredas: Arc<dyn VeredaRepository>,
    pub predios: Arc<dyn PredioRepository>,
    pub lugares_produccion: Arc<dyn LugarProduccionRepository>,
    pub lotes: Arc<dyn LoteRepository>,
    pub cultivos: Arc<dyn CultivoRepository>,
    pub plagas: Arc<dyn PlagaRepository>,
    pub inspecciones: Arc<dyn InspeccionRepository>,
    pub resultados: Arc<dyn ResultadoRepository>,
    pub informes: Arc<dyn InformeRepository>,
    pub alertas: Arc<dyn AlertaRepository>,
}

/// Front door for the presentation layer: every manager in one place.
pub struct SistemaFitosanitario {
    pub propietarios: GestorPropietarios,
    pub productores: GestorProductores,
    pub asistentes: GestorAsistentes,
    pub departamentos: GestorDepartamentos,
    pub municipios: GestorMunicipios,
    pub veredas: GestorVeredas,
    pub predios: GestorPredios,
    pub lugares_produccion: GestorLugaresProduccion,
    pub lotes: GestorLotes,
    pub cultivos: GestorCultivos,
    pub plagas: GestorPlagas,
    pub inspecciones: GestorInspecciones,
    pub resultados: GestorResultados,
    pub informes: GestorInformes,
    pub alertas: GestorAlertas,
}

impl SistemaFitosanitario {
    pub fn new(repos: Repositorios) -> Self {
        info!("Building managers");
        Self {
            propietarios: GestorPropietarios::new(repos.propietarios, repos.usuarios.clone()),
            productores: GestorProductores::new(repos.productores, repos.usuarios.clone()),
            asistentes: GestorAsistentes::new(repos.asistentes, repos.usuarios),
            departamentos: GestorDepartamentos::new(repos.departamentos),
            municipios: GestorMunicipios::new(repos.municipios),
            veredas: GestorVeredas::new(repos.veredas),
            predios: GestorPredios::new(repos.predios),
            lugares_produccion: GestorLugaresProduccion::new(repos.lugares_produccion),
            lotes: GestorLotes::new(repos.lotes),
            cultivos: GestorCultivos::new(repos.cultivos),
            plagas: GestorPlagas::new(repos.plagas),
            inspecciones: GestorInspecciones::new(repos.inspecciones),
            resultados: GestorResultados::new(repos.resultados),
            informes: GestorInformes::new(repos.informes.clone()),
            alertas: GestorAlertas::new(repos.alertas, repos.informes),
        }
    }
}
