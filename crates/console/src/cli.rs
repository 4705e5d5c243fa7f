use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about = "Phytosanitary inspection records", long_about = None)]
pub struct Args {
    /// Path to config directory
    #[arg(long, default_value = "config")]
    pub config_dir: String,

    /// Override the database URL from config
    #[arg(long)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub comando: Comando,
}

#[derive(Subcommand, Debug)]
pub enum Comando {
    /// Apply pending schema migrations
    Migrar,

    /// Manage the local credentials file
    Credenciales {
        #[command(subcommand)]
        accion: AccionCredenciales,
    },

    /// Register a record given as JSON
    Registrar { entidad: Entidad, json: String },

    /// Update a record given as JSON
    Actualizar { entidad: Entidad, json: String },

    /// Delete by key (identification number for users, id otherwise)
    Eliminar { entidad: Entidad, clave: String },

    Consultar { entidad: Entidad, clave: String },

    Listar { entidad: Entidad },

    /// Alerts at Alto or Crítico level, newest report first
    AlertasActivas,

    /// Affected-plant percentage of a technical result
    Porcentaje { resultado: String },

    /// Recompute a report's totals from its technical results
    ConsolidarInforme { informe: String },
}

#[derive(Subcommand, Debug)]
pub enum AccionCredenciales {
    Agregar {
        usuario: String,
        clave: String,
        rol: String,
    },
    Validar {
        usuario: String,
        clave: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entidad {
    Propietario,
    Productor,
    Asistente,
    Departamento,
    Municipio,
    Vereda,
    Predio,
    LugarProduccion,
    Lote,
    Cultivo,
    Plaga,
    Inspeccion,
    Resultado,
    Informe,
    Alerta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_registrar() {
        let args = Args::try_parse_from([
            "fitosanitario",
            "registrar",
            "lugar-produccion",
            r#"{"id":"LP-1","codigo_ica":"ICA-77"}"#,
        ])
        .unwrap();

        assert_eq!(args.config_dir, "config");
        match args.comando {
            Comando::Registrar { entidad, json } => {
                assert_eq!(entidad, Entidad::LugarProduccion);
                assert!(json.contains("ICA-77"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_credenciales() {
        let args = Args::try_parse_from([
            "fitosanitario",
            "--config-dir",
            "/etc/fito",
            "credenciales",
            "validar",
            "ana",
            "s3creta",
        ])
        .unwrap();

        assert_eq!(args.config_dir, "/etc/fito");
        assert!(matches!(
            args.comando,
            Comando::Credenciales {
                accion: AccionCredenciales::Validar { .. }
            }
        ));
    }

    #[test]
    fn test_unknown_entity_is_rejected() {
        assert!(Args::try_parse_from(["fitosanitario", "listar", "tractor"]).is_err());
    }
}
