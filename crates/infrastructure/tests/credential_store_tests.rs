use infrastructure::CredentialStore;
use std::path::PathBuf;

fn temp_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("fito-cred-{}", uuid::Uuid::new_v4()))
        .join("credenciales.properties")
}

#[test]
fn test_saved_credential_survives_reload() {
    let path = temp_path();

    let mut store = CredentialStore::load(&path).unwrap();
    assert!(!store.exists_user("ana"));
    store.save_credential("ana", "s3creta", "Propietario").unwrap();
    store
        .save_credential("luis mora", "clave=1", "Asistente Técnico")
        .unwrap();

    let reloaded = CredentialStore::load(&path).unwrap();
    assert!(reloaded.exists_user("ana"));
    assert!(reloaded.validate("ana", "s3creta"));
    assert!(!reloaded.validate("ana", "otra"));
    assert_eq!(reloaded.role("ana"), Some("Propietario"));

    assert!(reloaded.validate("luis mora", "clave=1"));
    assert_eq!(reloaded.role("luis mora"), Some("Asistente Técnico"));

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("#credentials"));

    if let Some(dir) = path.parent() {
        let _ = std::fs::remove_dir_all(dir);
    }
}

#[test]
fn test_unknown_user_does_not_validate() {
    let store = CredentialStore::load(temp_path()).unwrap();
    assert!(!store.validate("nadie", ""));
    assert_eq!(store.role("nadie"), None);
}

#[test]
fn test_password_with_colon_is_rejected() {
    let path = temp_path();
    let mut store = CredentialStore::load(&path).unwrap();
    assert!(store.save_credential("ana", "a:b", "Productor").is_err());
    assert!(!path.exists());
}
