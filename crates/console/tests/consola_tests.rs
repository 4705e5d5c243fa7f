use fitosanitario::cli::AccionCredenciales;
use fitosanitario::{Comando, Consola, Entidad};
use infrastructure::AppConfig;
use infrastructure::config::DatabaseConfig;

async fn consola() -> Consola {
    let mut config = AppConfig::default();
    config.database = DatabaseConfig::in_memory();
    config.credentials.path = std::env::temp_dir()
        .join(format!("fito-console-{}.properties", uuid::Uuid::new_v4()))
        .display()
        .to_string();
    Consola::abrir(&config).await.expect("console")
}

fn registrar(entidad: Entidad, json: &str) -> Comando {
    Comando::Registrar {
        entidad,
        json: json.to_string(),
    }
}

#[tokio::test]
async fn test_register_and_query_propietario_as_json() {
    let consola = consola().await;

    consola
        .ejecutar(registrar(
            Entidad::Propietario,
            r#"{"id":"P-1","rol":"Propietario","numero_identificacion":"1001",
                "nombre":"Ana Ruiz","correo_electronico":"ana@finca.co","direccion":"Km 3"}"#,
        ))
        .await
        .unwrap();

    let salida = consola
        .ejecutar(Comando::Consultar {
            entidad: Entidad::Propietario,
            clave: "1001".to_string(),
        })
        .await
        .unwrap();
    let valor: serde_json::Value = serde_json::from_str(&salida).unwrap();
    assert_eq!(valor["nombre"], "Ana Ruiz");
    assert_eq!(valor["direccion"], "Km 3");

    let err = consola
        .ejecutar(Comando::Consultar {
            entidad: Entidad::Propietario,
            clave: "9999".to_string(),
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn test_invalid_json_is_reported() {
    let consola = consola().await;
    let err = consola
        .ejecutar(registrar(Entidad::Cultivo, "{not json"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Invalid JSON"));
}

#[tokio::test]
async fn test_report_flow() {
    let consola = consola().await;

    consola
        .ejecutar(registrar(
            Entidad::Informe,
            r#"{"id":"INF-1","codigo_ica":"ICA-1","fecha_informe":"2025-03-10"}"#,
        ))
        .await
        .unwrap();
    consola
        .ejecutar(registrar(
            Entidad::Resultado,
            r#"{"id":"R-1","total_plantas_evaluadas":50,"plantas_afectadas":10,
                "informe":{"id":"INF-1"}}"#,
        ))
        .await
        .unwrap();
    consola
        .ejecutar(registrar(
            Entidad::Alerta,
            r#"{"id":"A-1","nivel_riesgo":"Crítico","informe":{"id":"INF-1"}}"#,
        ))
        .await
        .unwrap();

    let porcentaje = consola
        .ejecutar(Comando::Porcentaje {
            resultado: "R-1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(porcentaje, "20.00");

    let informe = consola
        .ejecutar(Comando::ConsolidarInforme {
            informe: "INF-1".to_string(),
        })
        .await
        .unwrap();
    let valor: serde_json::Value = serde_json::from_str(&informe).unwrap();
    assert_eq!(valor["total_plantas_evaluadas"], 50);
    assert_eq!(valor["nivel_incidencia"], 20.0);

    let activas = consola.ejecutar(Comando::AlertasActivas).await.unwrap();
    let valor: serde_json::Value = serde_json::from_str(&activas).unwrap();
    assert_eq!(valor[0]["id"], "A-1");
    assert_eq!(valor[0]["nivel_riesgo"], "Crítico");
}

#[tokio::test]
async fn test_credentials_round_trip() {
    let consola = consola().await;

    consola
        .ejecutar(Comando::Credenciales {
            accion: AccionCredenciales::Agregar {
                usuario: "ana".to_string(),
                clave: "s3creta".to_string(),
                rol: "Propietario".to_string(),
            },
        })
        .await
        .unwrap();

    let rol = consola
        .ejecutar(Comando::Credenciales {
            accion: AccionCredenciales::Validar {
                usuario: "ana".to_string(),
                clave: "s3creta".to_string(),
            },
        })
        .await
        .unwrap();
    assert_eq!(rol, "Propietario");

    assert!(
        consola
            .ejecutar(Comando::Credenciales {
                accion: AccionCredenciales::Validar {
                    usuario: "ana".to_string(),
                    clave: "otra".to_string(),
                },
            })
            .await
            .is_err()
    );
}
