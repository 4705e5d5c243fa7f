//! Repository tests against an in-memory SQLite database carrying the real
//! schema migrations.

use chrono::NaiveDate;
use domain::cultivo::{CultivoRepository, PlagaRepository};
use domain::geografia::{DepartamentoRepository, MunicipioRepository, VeredaRepository};
use domain::informe::{AlertaRepository, InformeRepository, InformeResumen};
use domain::inspeccion::{InspeccionRepository, ResultadoRepository};
use domain::predio::{LoteRepository, LugarProduccionRepository, PredioRepository};
use domain::usuario::{
    AsistenteTecnicoRepository, ProductorRepository, PropietarioRepository, UsuarioRepository,
};
use domain::{
    Alerta, AsistenteTecnico, Cultivo, Departamento, DomainError, InformeFitosanitario,
    InspeccionFitosanitaria, Lote, LugarProduccion, Municipio, NivelRiesgo, Plaga, Predio,
    Productor, Propietario, Referencia, ResultadoTecnico, Rol, Vereda,
};
use infrastructure::config::DatabaseConfig;
use infrastructure::*;
use sqlx::SqlitePool;

async fn setup() -> Database {
    let db = Database::connect(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to open in-memory database");
    db.migrate().await.expect("Failed to apply migrations");
    db
}

async fn count(pool: &SqlitePool, sql: &str, id: &str) -> i64 {
    sqlx::query_scalar(sql)
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("count query failed")
}

fn fecha(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn propietario_de_prueba() -> Propietario {
    let mut p = Propietario::new("P-1", "1001", "Ana Ruiz");
    p.direccion = Some("Vereda El Tambo, km 3".to_string());
    p.usuario.telefono_contacto = Some("300-123-4567".to_string());
    p.usuario.correo_electronico = Some("ana@finca.co".to_string());
    p.usuario.agregar_permiso("predios:leer");
    p.usuario.agregar_permiso("predios:editar");
    p.usuario.agregar_permiso("alertas:leer");
    p
}

#[tokio::test]
async fn test_propietario_round_trip_keeps_permission_order() {
    let db = setup().await;
    let repo = SqlitePropietarioRepository::new(db.pool());

    let original = propietario_de_prueba();
    repo.insert(&original).await.unwrap();

    let leido = repo.find_by_id("P-1").await.unwrap().expect("propietario");
    assert_eq!(leido, original);
    assert_eq!(
        leido.usuario.permisos,
        vec!["predios:leer", "predios:editar", "alertas:leer"]
    );

    let por_numero = SqliteUsuarioRepository::new(db.pool())
        .find_by_numero_identificacion("1001")
        .await
        .unwrap()
        .expect("usuario");
    assert_eq!(por_numero.rol, Rol::Propietario);
    assert_eq!(por_numero.permisos.len(), 3);
}

#[tokio::test]
async fn test_delete_propietario_removes_permissions_and_base_row() {
    let db = setup().await;
    let pool = db.pool();
    let repo = SqlitePropietarioRepository::new(pool.clone());
    repo.insert(&propietario_de_prueba()).await.unwrap();

    repo.delete("P-1").await.unwrap();

    assert!(repo.find_by_id("P-1").await.unwrap().is_none());
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM permisos_usuario WHERE id_usuario = ?", "P-1").await,
        0
    );
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM usuarios WHERE id = ?", "P-1").await, 0);
    assert!(repo.delete("P-1").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_update_replaces_permissions() {
    let db = setup().await;
    let repo = SqlitePropietarioRepository::new(db.pool());
    let mut p = propietario_de_prueba();
    repo.insert(&p).await.unwrap();

    p.usuario.nombre = "Ana María Ruiz".to_string();
    p.usuario.permisos = vec!["informes:leer".to_string()];
    p.direccion = None;
    repo.update(&p).await.unwrap();

    let leido = repo.find_by_id("P-1").await.unwrap().expect("propietario");
    assert_eq!(leido.usuario.nombre, "Ana María Ruiz");
    assert_eq!(leido.usuario.permisos, vec!["informes:leer"]);
    assert!(leido.direccion.is_none());
}

#[tokio::test]
async fn test_duplicate_numero_identificacion_is_already_exists() {
    let db = setup().await;
    let repo = SqlitePropietarioRepository::new(db.pool());
    repo.insert(&propietario_de_prueba()).await.unwrap();

    let otro = Propietario::new("P-2", "1001", "Otra Persona");
    let err = repo.insert(&otro).await.unwrap_err();
    assert!(matches!(err, DomainError::AlreadyExists { .. }));

    // Transaction rolled back: nothing of P-2 remains
    assert!(repo.find_by_id("P-2").await.unwrap().is_none());
    let nombre = repo.find_by_id("P-1").await.unwrap().unwrap().usuario.nombre;
    assert_eq!(nombre, "Ana Ruiz");
}

#[tokio::test]
async fn test_update_missing_row_is_not_found() {
    let db = setup().await;
    let repo = SqliteCultivoRepository::new(db.pool());

    let err = repo.update(&Cultivo::new("C-404", "Castilla")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_geography_and_predio_references() {
    let db = setup().await;
    let pool = db.pool();

    SqliteDepartamentoRepository::new(pool.clone())
        .insert(&Departamento::new("05", "Antioquia"))
        .await
        .unwrap();
    SqliteMunicipioRepository::new(pool.clone())
        .insert(&Municipio::new("05001", "Medellín", "05"))
        .await
        .unwrap();
    let veredas = SqliteVeredaRepository::new(pool.clone());
    veredas
        .insert(&Vereda::new("V-1", "Santa Elena", "05001"))
        .await
        .unwrap();
    SqlitePropietarioRepository::new(pool.clone())
        .insert(&propietario_de_prueba())
        .await
        .unwrap();

    let predios = SqlitePredioRepository::new(pool.clone());
    let mut predio = Predio::new("PR-1", "ICA-0001");
    predio.area = 12.5;
    predio.latitud = 6.21;
    predio.longitud = -75.5;
    predio.propietario = Some(Referencia::new("P-1"));
    predio.vereda = Some(Referencia::new("V-1"));
    predios.insert(&predio).await.unwrap();

    let leido = predios.find_by_codigo_ica("ICA-0001").await.unwrap().expect("predio");
    assert_eq!(leido.area, 12.5);
    assert_eq!(
        leido.propietario,
        Some(Referencia::con_etiqueta("P-1", "Ana Ruiz"))
    );
    assert_eq!(
        leido.vereda,
        Some(Referencia::con_etiqueta("V-1", "Santa Elena"))
    );

    let de_vereda = veredas.find_predios("V-1").await.unwrap();
    assert_eq!(de_vereda.len(), 1);

    let con_municipios = SqliteDepartamentoRepository::new(pool)
        .find_all_with_municipios()
        .await
        .unwrap();
    assert_eq!(con_municipios[0].municipios[0].nombre, "Medellín");
}

#[tokio::test]
async fn test_foreign_key_violation_is_constraint_violation() {
    let db = setup().await;
    let predios = SqlitePredioRepository::new(db.pool());

    let mut predio = Predio::new("PR-1", "ICA-0001");
    predio.vereda = Some(Referencia::new("NO-EXISTE"));
    let err = predios.insert(&predio).await.unwrap_err();
    assert!(matches!(err, DomainError::ConstraintViolation(_)));
}

#[tokio::test]
async fn test_delete_cultivo_clears_link_rows() {
    let db = setup().await;
    let pool = db.pool();
    let cultivos = SqliteCultivoRepository::new(pool.clone());
    let plagas = SqlitePlagaRepository::new(pool.clone());
    let lotes = SqliteLoteRepository::new(pool.clone());
    let resultados = SqliteResultadoRepository::new(pool.clone());

    let mut cafe = Cultivo::new("C-1", "Castillo");
    cafe.nombre_cultivo = Some("Café".to_string());
    cultivos.insert(&cafe).await.unwrap();
    plagas
        .insert(&Plaga::new("PL-1", "Broca del café"))
        .await
        .unwrap();
    lotes.insert(&Lote::new("L-1", 1.5)).await.unwrap();
    resultados
        .insert(&ResultadoTecnico::new("R-1", 100, 7))
        .await
        .unwrap();

    cultivos.asociar_plaga("C-1", "PL-1").await.unwrap();
    cultivos.asociar_plaga("C-1", "PL-1").await.unwrap();
    lotes.asociar_cultivo("L-1", "C-1").await.unwrap();
    resultados.asociar_cultivo("R-1", "C-1").await.unwrap();

    assert_eq!(cultivos.find_plagas("C-1").await.unwrap().len(), 1);
    assert_eq!(plagas.find_cultivos_afectados("PL-1").await.unwrap()[0].nombre(), "Café");

    cultivos.delete("C-1").await.unwrap();

    for sql in [
        "SELECT COUNT(*) FROM cultivo_plaga WHERE id_cultivo = ?",
        "SELECT COUNT(*) FROM lote_cultivo WHERE id_cultivo = ?",
        "SELECT COUNT(*) FROM resultado_cultivo WHERE id_cultivo = ?",
    ] {
        assert_eq!(count(&pool, sql, "C-1").await, 0, "{}", sql);
    }
    assert!(cultivos.find_by_id("C-1").await.unwrap().is_none());
    assert!(plagas.find_by_id("PL-1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_inspeccion_date_range_and_results() {
    let db = setup().await;
    let pool = db.pool();
    let inspecciones = SqliteInspeccionRepository::new(pool.clone());
    let resultados = SqliteResultadoRepository::new(pool.clone());

    for (id, dia) in [("I-1", 1), ("I-2", 15), ("I-3", 28)] {
        inspecciones
            .insert(&InspeccionFitosanitaria::new(id, "ICA-0001", fecha(2025, 2, dia)))
            .await
            .unwrap();
    }

    let rango = inspecciones
        .find_by_rango_fechas(fecha(2025, 2, 1), fecha(2025, 2, 15))
        .await
        .unwrap();
    let ids: Vec<_> = rango.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["I-2", "I-1"]);

    let mut resultado = ResultadoTecnico::new("R-1", 50, 10);
    resultado.inspeccion = Some(Referencia::new("I-2"));
    resultado.observaciones = Some("Broca en bordes".to_string());
    resultados.insert(&resultado).await.unwrap();

    let leido = resultados.find_by_id("R-1").await.unwrap().expect("resultado");
    assert_eq!(leido.plantas_afectadas, 10);
    assert_eq!(leido.porcentaje_afectacion(), 20.0);
    assert_eq!(inspecciones.find_resultados("I-2").await.unwrap().len(), 1);

    inspecciones.delete("I-2").await.unwrap();
    let huerfano = resultados.find_by_id("R-1").await.unwrap().expect("resultado");
    assert!(huerfano.inspeccion.is_none());
}

#[tokio::test]
async fn test_alertas_activas_newest_report_first() {
    let db = setup().await;
    let pool = db.pool();
    let informes = SqliteInformeRepository::new(pool.clone());
    let alertas = SqliteAlertaRepository::new(pool.clone());

    assert_eq!(informes.promedio_incidencia().await.unwrap(), 0.0);

    for (id, dia, incidencia) in [("INF-1", 3, 10.0), ("INF-2", 20, 40.0), ("INF-3", 11, 25.0)] {
        let mut informe = InformeFitosanitario::new(id, "ICA-0001", fecha(2025, 3, dia));
        informe.nivel_incidencia = incidencia;
        informe.total_plantas_evaluadas = 100;
        informes.insert(&informe).await.unwrap();
    }

    alertas.insert(&Alerta::new("A-1", NivelRiesgo::Alto, "INF-1")).await.unwrap();
    alertas.insert(&Alerta::new("A-2", NivelRiesgo::Critico, "INF-2")).await.unwrap();
    alertas.insert(&Alerta::new("A-3", NivelRiesgo::Bajo, "INF-3")).await.unwrap();
    alertas.insert(&Alerta::new("A-4", NivelRiesgo::Medio, "INF-2")).await.unwrap();

    let activas = alertas.find_activas().await.unwrap();
    let ids: Vec<_> = activas.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["A-2", "A-1"]);
    assert_eq!(activas[0].informe.fecha_informe, Some(fecha(2025, 3, 20)));

    assert_eq!(alertas.count_by_nivel(NivelRiesgo::Critico).await.unwrap(), 1);
    assert_eq!(informes.total_plantas_evaluadas().await.unwrap(), 300);
    assert!((informes.promedio_incidencia().await.unwrap() - 25.0).abs() < 1e-9);

    let altos = informes.find_by_nivel_minimo(25.0).await.unwrap();
    let ids: Vec<_> = altos.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["INF-2", "INF-3"]);

    informes.delete("INF-2").await.unwrap();
    assert!(alertas.find_by_informe("INF-2").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_alerta_for_missing_informe_is_rejected() {
    let db = setup().await;
    let alertas = SqliteAlertaRepository::new(db.pool());

    let err = alertas
        .insert(&Alerta::new("A-1", NivelRiesgo::Alto, "INF-404"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ConstraintViolation(_)));
}

#[tokio::test]
async fn test_productor_round_trip() {
    let db = setup().await;
    let repo = SqliteProductorRepository::new(db.pool());

    let mut original = Productor::new("U-2", "2002", "Luis Pérez");
    original.usuario.telefono_contacto = Some("(604) 555 1234".to_string());
    original.usuario.correo_electronico = Some("luis@finca.co".to_string());
    original.usuario.agregar_permiso("lugares:leer");
    original.usuario.agregar_permiso("lotes:editar");
    repo.insert(&original).await.unwrap();

    let leido = repo.find_by_id("U-2").await.unwrap().expect("productor");
    assert_eq!(leido, original);
    assert_eq!(leido.usuario.rol, Rol::Productor);
    assert_eq!(repo.find_all().await.unwrap(), vec![original]);
}

#[tokio::test]
async fn test_asistente_round_trip_and_card_lookup() {
    let db = setup().await;
    let repo = SqliteAsistenteTecnicoRepository::new(db.pool());

    let mut original = AsistenteTecnico::new("U-3", "3003", "Marta Gil", "TP-77");
    original.usuario.correo_electronico = Some("marta@agro.gov.co".to_string());
    original.usuario.agregar_permiso("inspecciones:editar");
    repo.insert(&original).await.unwrap();

    let leido = repo.find_by_id("U-3").await.unwrap().expect("asistente");
    assert_eq!(leido, original);

    let por_tarjeta = repo
        .find_by_tarjeta_profesional("TP-77")
        .await
        .unwrap()
        .expect("asistente por tarjeta");
    assert_eq!(por_tarjeta, original);
}

#[tokio::test]
async fn test_lugar_produccion_and_lote_round_trip() {
    let db = setup().await;
    let pool = db.pool();

    SqlitePredioRepository::new(pool.clone())
        .insert(&Predio::new("PR-1", "ICA-0001"))
        .await
        .unwrap();
    SqliteProductorRepository::new(pool.clone())
        .insert(&Productor::new("U-2", "2002", "Luis Pérez"))
        .await
        .unwrap();
    SqliteAsistenteTecnicoRepository::new(pool.clone())
        .insert(&AsistenteTecnico::new("U-3", "3003", "Marta Gil", "TP-77"))
        .await
        .unwrap();

    let lugares = SqliteLugarProduccionRepository::new(pool.clone());
    let mut lugar = LugarProduccion::new("LP-1", "LP-ICA-01");
    lugar.predio = Some(Referencia::con_etiqueta("PR-1", "ICA-0001"));
    lugar.productor = Some(Referencia::con_etiqueta("U-2", "Luis Pérez"));
    lugar.asistente_tecnico = Some(Referencia::con_etiqueta("U-3", "Marta Gil"));
    lugares.insert(&lugar).await.unwrap();

    assert_eq!(lugares.find_by_id("LP-1").await.unwrap(), Some(lugar.clone()));
    assert_eq!(
        lugares.find_by_codigo_ica("LP-ICA-01").await.unwrap(),
        Some(lugar.clone())
    );

    let lotes = SqliteLoteRepository::new(pool);
    let mut lote = Lote::new("L-1", 2.75);
    lote.descripcion = Some("Ladera norte".to_string());
    lote.lugar_produccion = Some(Referencia::con_etiqueta("LP-1", "LP-ICA-01"));
    lotes.insert(&lote).await.unwrap();

    assert_eq!(lotes.find_by_id("L-1").await.unwrap(), Some(lote.clone()));
    assert_eq!(lugares.find_lotes("LP-1").await.unwrap(), vec![lote]);
}

#[tokio::test]
async fn test_plaga_round_trip() {
    let db = setup().await;
    let repo = SqlitePlagaRepository::new(db.pool());

    let mut original = Plaga::new("PL-1", "Broca del café");
    original.nombre_cientifico = Some("Hypothenemus hampei".to_string());
    original.descripcion = Some("Perfora el grano".to_string());
    repo.insert(&original).await.unwrap();

    assert_eq!(repo.find_by_id("PL-1").await.unwrap(), Some(original.clone()));
    assert_eq!(
        repo.find_by_nombre_cientifico("hampei").await.unwrap(),
        vec![original]
    );
}

#[tokio::test]
async fn test_informe_and_alerta_round_trip() {
    let db = setup().await;
    let pool = db.pool();
    let informes = SqliteInformeRepository::new(pool.clone());
    let alertas = SqliteAlertaRepository::new(pool);

    let mut informe = InformeFitosanitario::new("INF-1", "ICA-0001", fecha(2025, 4, 9));
    informe.total_plantas_evaluadas = 250;
    informe.nivel_incidencia = 12.5;
    informe.observaciones = Some("Foco en lote 3".to_string());
    informes.insert(&informe).await.unwrap();

    assert_eq!(informes.find_by_id("INF-1").await.unwrap(), Some(informe));

    alertas
        .insert(&Alerta::new("A-1", NivelRiesgo::Critico, "INF-1"))
        .await
        .unwrap();

    let esperada = Alerta {
        id: "A-1".to_string(),
        nivel_riesgo: NivelRiesgo::Critico,
        informe: InformeResumen {
            id: "INF-1".to_string(),
            codigo_ica: Some("ICA-0001".to_string()),
            nivel_incidencia: Some(12.5),
            fecha_informe: Some(fecha(2025, 4, 9)),
        },
    };
    assert_eq!(alertas.find_by_id("A-1").await.unwrap(), Some(esperada));
}

#[tokio::test]
async fn test_delete_lote_clears_cultivo_and_inspeccion_links() {
    let db = setup().await;
    let pool = db.pool();
    let lotes = SqliteLoteRepository::new(pool.clone());
    let cultivos = SqliteCultivoRepository::new(pool.clone());
    let inspecciones = SqliteInspeccionRepository::new(pool.clone());

    lotes.insert(&Lote::new("L-1", 1.0)).await.unwrap();
    cultivos.insert(&Cultivo::new("C-1", "Castillo")).await.unwrap();
    inspecciones
        .insert(&InspeccionFitosanitaria::new("I-1", "ICA-0001", fecha(2025, 2, 3)))
        .await
        .unwrap();
    lotes.asociar_cultivo("L-1", "C-1").await.unwrap();
    inspecciones.asociar_lote("I-1", "L-1").await.unwrap();
    assert_eq!(lotes.find_inspecciones("L-1").await.unwrap().len(), 1);

    lotes.delete("L-1").await.unwrap();

    for sql in [
        "SELECT COUNT(*) FROM lote_cultivo WHERE id_lote = ?",
        "SELECT COUNT(*) FROM inspeccion_lote WHERE id_lote = ?",
    ] {
        assert_eq!(count(&pool, sql, "L-1").await, 0, "{}", sql);
    }
    assert!(lotes.find_by_id("L-1").await.unwrap().is_none());
    assert!(cultivos.find_by_id("C-1").await.unwrap().is_some());
    assert!(inspecciones.find_lotes("I-1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_plaga_and_resultado_clear_link_rows() {
    let db = setup().await;
    let pool = db.pool();
    let plagas = SqlitePlagaRepository::new(pool.clone());
    let cultivos = SqliteCultivoRepository::new(pool.clone());
    let resultados = SqliteResultadoRepository::new(pool.clone());

    plagas.insert(&Plaga::new("PL-1", "Roya")).await.unwrap();
    cultivos.insert(&Cultivo::new("C-1", "Castillo")).await.unwrap();
    resultados
        .insert(&ResultadoTecnico::new("R-1", 80, 4))
        .await
        .unwrap();
    resultados
        .insert(&ResultadoTecnico::new("R-2", 20, 2))
        .await
        .unwrap();
    cultivos.asociar_plaga("C-1", "PL-1").await.unwrap();
    resultados.asociar_plaga("R-1", "PL-1").await.unwrap();
    resultados.asociar_plaga("R-2", "PL-1").await.unwrap();
    resultados.asociar_cultivo("R-2", "C-1").await.unwrap();
    assert_eq!(plagas.count_detecciones("PL-1").await.unwrap(), 2);

    resultados.delete("R-2").await.unwrap();
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM resultado_cultivo WHERE id_resultado = ?", "R-2").await,
        0
    );
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM resultado_plaga WHERE id_resultado = ?", "R-2").await,
        0
    );
    assert_eq!(plagas.count_detecciones("PL-1").await.unwrap(), 1);

    plagas.delete("PL-1").await.unwrap();
    for sql in [
        "SELECT COUNT(*) FROM cultivo_plaga WHERE id_plaga = ?",
        "SELECT COUNT(*) FROM resultado_plaga WHERE id_plaga = ?",
    ] {
        assert_eq!(count(&pool, sql, "PL-1").await, 0, "{}", sql);
    }
    assert!(plagas.find_by_id("PL-1").await.unwrap().is_none());
    assert!(resultados.find_by_id("R-1").await.unwrap().is_some());
    assert!(cultivos.find_plagas("C-1").await.unwrap().is_empty());
}
