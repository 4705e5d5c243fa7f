use application::gestores::{GestorAsistentes, GestorPropietarios};
use domain::usuario::{
    MockAsistenteTecnicoRepository, MockPropietarioRepository, MockUsuarioRepository,
};
use domain::{AsistenteTecnico, DomainError, Propietario, Rol, Usuario};
use std::sync::Arc;

fn propietario(id: &str, numero: &str, nombre: &str) -> Propietario {
    let mut p = Propietario::new(id, numero, nombre);
    p.direccion = Some("Calle 10 # 4-21".to_string());
    p
}

fn gestor_propietarios(
    repo: MockPropietarioRepository,
    usuarios: MockUsuarioRepository,
) -> GestorPropietarios {
    GestorPropietarios::new(Arc::new(repo), Arc::new(usuarios))
}

#[tokio::test]
async fn test_registrar_duplicate_numero_is_rejected() {
    let mut usuarios = MockUsuarioRepository::new();
    usuarios
        .expect_find_by_numero_identificacion()
        .withf(|numero| numero == "1001")
        .returning(|_| Ok(Some(Usuario::new("U-9", Rol::Productor, "1001", "Otro"))));

    let mut repo = MockPropietarioRepository::new();
    repo.expect_insert().never();

    let gestor = gestor_propietarios(repo, usuarios);
    let err = gestor
        .registrar(propietario("P-1", "1001", "Ana Ruiz"))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::AlreadyExists { .. }));
}

#[tokio::test]
async fn test_registrar_forces_role_and_inserts() {
    let mut usuarios = MockUsuarioRepository::new();
    usuarios
        .expect_find_by_numero_identificacion()
        .returning(|_| Ok(None));

    let mut repo = MockPropietarioRepository::new();
    repo.expect_insert()
        .withf(|p| p.usuario.id == "P-1" && p.usuario.rol == Rol::Propietario)
        .times(1)
        .returning(|_| Ok(()));

    let mut nuevo = propietario("P-1", "1001", "Ana Ruiz");
    nuevo.usuario.rol = Rol::Productor;

    let gestor = gestor_propietarios(repo, usuarios);
    gestor.registrar(nuevo).await.unwrap();
}

#[tokio::test]
async fn test_registrar_rejects_bad_email_before_touching_storage() {
    let mut usuarios = MockUsuarioRepository::new();
    usuarios.expect_find_by_numero_identificacion().never();
    let mut repo = MockPropietarioRepository::new();
    repo.expect_insert().never();

    let mut nuevo = propietario("P-1", "1001", "Ana Ruiz");
    nuevo.usuario.correo_electronico = Some("ana@finca".to_string());

    let gestor = gestor_propietarios(repo, usuarios);
    let err = gestor.registrar(nuevo).await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_registrar_rejects_blank_nombre() {
    let gestor = gestor_propietarios(MockPropietarioRepository::new(), MockUsuarioRepository::new());
    let err = gestor
        .registrar(propietario("P-1", "1001", "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn test_actualizar_missing_numero_is_not_found() {
    let mut repo = MockPropietarioRepository::new();
    repo.expect_find_by_numero_identificacion()
        .returning(|_| Ok(None));
    repo.expect_update().never();

    let gestor = gestor_propietarios(repo, MockUsuarioRepository::new());
    let err = gestor
        .actualizar(propietario("P-1", "2002", "Ana Ruiz"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_actualizar_keeps_stored_id() {
    let mut repo = MockPropietarioRepository::new();
    repo.expect_find_by_numero_identificacion()
        .withf(|numero| numero == "1001")
        .returning(|_| Ok(Some(propietario("P-1", "1001", "Ana Ruiz"))));
    repo.expect_update()
        .withf(|p| p.usuario.id == "P-1" && p.usuario.nombre == "Ana María Ruiz")
        .times(1)
        .returning(|_| Ok(()));

    let gestor = gestor_propietarios(repo, MockUsuarioRepository::new());
    gestor
        .actualizar(propietario("OTRO-ID", "1001", "Ana María Ruiz"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_eliminar_looks_up_by_numero_and_deletes_by_id() {
    let mut repo = MockPropietarioRepository::new();
    repo.expect_find_by_numero_identificacion()
        .withf(|numero| numero == "1001")
        .returning(|_| Ok(Some(propietario("P-77", "1001", "Ana Ruiz"))));
    repo.expect_delete()
        .withf(|id| id == "P-77")
        .times(1)
        .returning(|_| Ok(()));

    let gestor = gestor_propietarios(repo, MockUsuarioRepository::new());
    gestor.eliminar("1001").await.unwrap();
}

#[tokio::test]
async fn test_eliminar_missing_is_not_found() {
    let mut repo = MockPropietarioRepository::new();
    repo.expect_find_by_numero_identificacion()
        .returning(|_| Ok(None));
    repo.expect_delete().never();

    let gestor = gestor_propietarios(repo, MockUsuarioRepository::new());
    assert!(gestor.eliminar("404").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_buscar_por_nombre_is_case_insensitive() {
    let mut repo = MockPropietarioRepository::new();
    repo.expect_find_all().returning(|| {
        Ok(vec![
            propietario("P-1", "1001", "Ana Ruiz"),
            propietario("P-2", "1002", "Carlos Peña"),
            propietario("P-3", "1003", "Mariana Gómez"),
        ])
    });

    let gestor = gestor_propietarios(repo, MockUsuarioRepository::new());

    let encontrados = gestor.buscar_por_nombre("ANA").await.unwrap();
    let ids: Vec<_> = encontrados.iter().map(|p| p.usuario.id.as_str()).collect();
    assert_eq!(ids, vec!["P-1", "P-3"]);

    assert_eq!(gestor.buscar_por_nombre("").await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_asistente_card_held_by_someone_else_is_rejected() {
    let mut usuarios = MockUsuarioRepository::new();
    usuarios
        .expect_find_by_numero_identificacion()
        .returning(|_| Ok(None));

    let mut repo = MockAsistenteTecnicoRepository::new();
    repo.expect_find_by_tarjeta_profesional()
        .withf(|tarjeta| tarjeta == "TP-55")
        .returning(|_| Ok(Some(AsistenteTecnico::new("A-1", "3001", "Luis Mora", "TP-55"))));
    repo.expect_insert().never();

    let gestor = GestorAsistentes::new(Arc::new(repo), Arc::new(usuarios));
    let err = gestor
        .registrar(AsistenteTecnico::new("A-2", "3002", "Sara León", "TP-55"))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::AlreadyExists { .. }));
}

#[tokio::test]
async fn test_asistente_requires_card_number() {
    let gestor = GestorAsistentes::new(
        Arc::new(MockAsistenteTecnicoRepository::new()),
        Arc::new(MockUsuarioRepository::new()),
    );
    let err = gestor
        .registrar(AsistenteTecnico::new("A-2", "3002", "Sara León", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}
