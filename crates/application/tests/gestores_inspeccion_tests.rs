use application::gestores::{
    GestorAlertas, GestorInformes, GestorInspecciones, GestorPredios, GestorResultados,
};
use chrono::NaiveDate;
use domain::informe::{MockAlertaRepository, MockInformeRepository};
use domain::inspeccion::{MockInspeccionRepository, MockResultadoRepository};
use domain::predio::MockPredioRepository;
use domain::{
    Alerta, DomainError, InformeFitosanitario, InspeccionFitosanitaria, NivelRiesgo, Predio,
    Referencia, ResultadoTecnico,
};
use std::sync::Arc;

fn fecha(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn alerta(id: &str, nivel: NivelRiesgo, informe: &str, dia: u32) -> Alerta {
    let mut a = Alerta::new(id, nivel, informe);
    a.informe.fecha_informe = Some(fecha(2025, 3, dia));
    a
}

#[tokio::test]
async fn test_porcentaje_afectacion() {
    let mut repo = MockResultadoRepository::new();
    repo.expect_find_by_id()
        .withf(|id| id == "R-1")
        .returning(|_| Ok(Some(ResultadoTecnico::new("R-1", 50, 10))));
    repo.expect_find_by_id()
        .withf(|id| id == "R-0")
        .returning(|_| Ok(Some(ResultadoTecnico::new("R-0", 0, 0))));
    repo.expect_find_by_id()
        .withf(|id| id == "R-X")
        .returning(|_| Ok(None));

    let gestor = GestorResultados::new(Arc::new(repo));
    assert_eq!(gestor.porcentaje_afectacion("R-1").await.unwrap(), 20.0);
    assert_eq!(gestor.porcentaje_afectacion("R-0").await.unwrap(), 0.0);
    assert!(gestor.porcentaje_afectacion("R-X").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_resultado_with_more_affected_than_evaluated_is_rejected() {
    let mut repo = MockResultadoRepository::new();
    repo.expect_insert().never();

    let gestor = GestorResultados::new(Arc::new(repo));
    let err = gestor
        .registrar(ResultadoTecnico::new("R-1", 10, 11))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_inspeccion_requires_codigo_ica() {
    let mut repo = MockInspeccionRepository::new();
    repo.expect_insert().never();

    let gestor = GestorInspecciones::new(Arc::new(repo));
    let inspeccion = InspeccionFitosanitaria::new("I-1", " ", fecha(2025, 3, 1));
    let err = gestor.registrar(inspeccion).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_inspeccion_duplicate_id_is_rejected() {
    let mut repo = MockInspeccionRepository::new();
    repo.expect_find_by_id()
        .returning(|id| Ok(Some(InspeccionFitosanitaria::new(id, "ICA-1", fecha(2025, 1, 1)))));
    repo.expect_insert().never();

    let gestor = GestorInspecciones::new(Arc::new(repo));
    let err = gestor
        .registrar(InspeccionFitosanitaria::new("I-1", "ICA-1", fecha(2025, 3, 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AlreadyExists { .. }));
}

#[tokio::test]
async fn test_inverted_date_range_is_rejected() {
    let mut repo = MockInspeccionRepository::new();
    repo.expect_find_by_rango_fechas().never();

    let gestor = GestorInspecciones::new(Arc::new(repo));
    let err = gestor
        .por_rango_fechas(fecha(2025, 5, 1), fecha(2025, 4, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_consolidar_recomputes_and_stores() {
    let mut repo = MockInformeRepository::new();
    repo.expect_find_by_id()
        .withf(|id| id == "INF-1")
        .returning(|_| Ok(Some(InformeFitosanitario::new("INF-1", "ICA-9", fecha(2025, 3, 10)))));
    repo.expect_find_resultados().returning(|_| {
        Ok(vec![
            ResultadoTecnico::new("R-1", 60, 6),
            ResultadoTecnico::new("R-2", 40, 14),
        ])
    });
    repo.expect_update()
        .withf(|i| i.total_plantas_evaluadas == 100 && (i.nivel_incidencia - 20.0).abs() < 1e-9)
        .times(1)
        .returning(|_| Ok(()));

    let gestor = GestorInformes::new(Arc::new(repo));
    let informe = gestor.consolidar("INF-1").await.unwrap();

    assert_eq!(informe.total_plantas_evaluadas, 100);
    assert!((informe.nivel_incidencia - 20.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_consolidar_missing_informe() {
    let mut repo = MockInformeRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));
    repo.expect_update().never();

    let gestor = GestorInformes::new(Arc::new(repo));
    assert!(gestor.consolidar("INF-X").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_listar_alertas_activas_only_alto_and_critico() {
    let mut repo = MockAlertaRepository::new();
    repo.expect_find_activas().returning(|| {
        Ok(vec![
            alerta("A-3", NivelRiesgo::Critico, "INF-3", 20),
            alerta("A-1", NivelRiesgo::Alto, "INF-1", 12),
            alerta("A-9", NivelRiesgo::Bajo, "INF-9", 5),
        ])
    });

    let gestor = GestorAlertas::new(Arc::new(repo), Arc::new(MockInformeRepository::new()));
    let activas = gestor.listar_alertas_activas().await.unwrap();

    let ids: Vec<_> = activas.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["A-3", "A-1"]);
    assert!(activas.iter().all(Alerta::is_activa));
}

#[tokio::test]
async fn test_alerta_needs_existing_informe() {
    let mut informes = MockInformeRepository::new();
    informes.expect_find_by_id().returning(|_| Ok(None));
    let mut repo = MockAlertaRepository::new();
    repo.expect_insert().never();

    let gestor = GestorAlertas::new(Arc::new(repo), Arc::new(informes));
    let err = gestor
        .registrar(Alerta::new("A-1", NivelRiesgo::Alto, "INF-404"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_predio_codigo_ica_taken_by_other_predio() {
    let mut repo = MockPredioRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));
    repo.expect_find_by_codigo_ica()
        .withf(|codigo| codigo == "ICA-100")
        .returning(|_| Ok(Some(Predio::new("PR-OTRO", "ICA-100"))));
    repo.expect_insert().never();

    let gestor = GestorPredios::new(Arc::new(repo));
    let err = gestor
        .registrar(Predio::new("PR-1", "ICA-100"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::AlreadyExists { .. }));
}

#[tokio::test]
async fn test_predio_negative_area_and_bad_reference() {
    let gestor = GestorPredios::new(Arc::new(MockPredioRepository::new()));

    let mut negativo = Predio::new("PR-1", "ICA-1");
    negativo.area = -3.0;
    assert!(matches!(
        gestor.registrar(negativo).await.unwrap_err(),
        DomainError::Validation(_)
    ));

    let mut sin_vereda = Predio::new("PR-2", "ICA-2");
    sin_vereda.vereda = Some(Referencia::new(""));
    assert!(matches!(
        gestor.registrar(sin_vereda).await.unwrap_err(),
        DomainError::Validation(_)
    ));
}

#[tokio::test]
async fn test_consolidar_overflowing_total_is_not_stored() {
    let mut repo = MockInformeRepository::new();
    repo.expect_find_by_id()
        .returning(|_| Ok(Some(InformeFitosanitario::new("INF-1", "ICA-9", fecha(2025, 3, 10)))));
    repo.expect_find_resultados().returning(|_| {
        Ok(vec![
            ResultadoTecnico::new("R-1", u32::MAX, 0),
            ResultadoTecnico::new("R-2", 5, 1),
        ])
    });
    repo.expect_update().never();

    let gestor = GestorInformes::new(Arc::new(repo));
    let err = gestor.consolidar("INF-1").await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidData(_)));
}

#[tokio::test]
async fn test_actualizar_missing_alerta_reports_not_found_before_field_checks() {
    let mut repo = MockAlertaRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));
    repo.expect_update().never();
    let mut informes = MockInformeRepository::new();
    informes.expect_find_by_id().never();

    let gestor = GestorAlertas::new(Arc::new(repo), Arc::new(informes));
    let err = gestor
        .actualizar(Alerta::new("A-404", NivelRiesgo::Medio, "  "))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound { entity: "Alerta", .. }
    ));
}

#[tokio::test]
async fn test_actualizar_missing_resultado_reports_not_found_before_field_checks() {
    let mut repo = MockResultadoRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));
    repo.expect_update().never();

    let gestor = GestorResultados::new(Arc::new(repo));
    let err = gestor
        .actualizar(ResultadoTecnico::new("R-404", 10, 11))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
