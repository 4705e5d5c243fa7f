use super::Rol;
use serde::{Deserialize, Serialize};

/// Fields shared by every system user, persisted in `usuarios`.
///
/// Concrete roles embed this struct and add their own columns, which live in
/// a separate table keyed by the same `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Usuario {
    pub id: String,
    pub rol: Rol,
    /// Ordered as inserted; order carries no meaning.
    #[serde(default)]
    pub permisos: Vec<String>,
    pub numero_identificacion: String,
    pub nombre: String,
    #[serde(default)]
    pub telefono_contacto: Option<String>,
    #[serde(default)]
    pub correo_electronico: Option<String>,
}

impl Usuario {
    pub fn new(
        id: impl Into<String>,
        rol: Rol,
        numero_identificacion: impl Into<String>,
        nombre: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            rol,
            permisos: Vec::new(),
            numero_identificacion: numero_identificacion.into(),
            nombre: nombre.into(),
            telefono_contacto: None,
            correo_electronico: None,
        }
    }

    pub fn with_contacto(
        mut self,
        telefono: Option<String>,
        correo: Option<String>,
    ) -> Self {
        self.telefono_contacto = telefono;
        self.correo_electronico = correo;
        self
    }

    /// Adds a permission unless it is already granted.
    pub fn agregar_permiso(&mut self, permiso: impl Into<String>) {
        let permiso = permiso.into();
        if !self.permisos.contains(&permiso) {
            self.permisos.push(permiso);
        }
    }

    pub fn tiene_permiso(&self, permiso: &str) -> bool {
        self.permisos.iter().any(|p| p == permiso)
    }
}

/// Read access to the embedded [`Usuario`] of any role.
pub trait ConUsuario {
    fn usuario(&self) -> &Usuario;
    fn usuario_mut(&mut self) -> &mut Usuario;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Propietario {
    #[serde(flatten)]
    pub usuario: Usuario,
    #[serde(default)]
    pub direccion: Option<String>,
}

impl Propietario {
    pub fn new(
        id: impl Into<String>,
        numero_identificacion: impl Into<String>,
        nombre: impl Into<String>,
    ) -> Self {
        Self {
            usuario: Usuario::new(id, Rol::Propietario, numero_identificacion, nombre),
            direccion: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Productor {
    #[serde(flatten)]
    pub usuario: Usuario,
}

impl Productor {
    pub fn new(
        id: impl Into<String>,
        numero_identificacion: impl Into<String>,
        nombre: impl Into<String>,
    ) -> Self {
        Self {
            usuario: Usuario::new(id, Rol::Productor, numero_identificacion, nombre),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsistenteTecnico {
    #[serde(flatten)]
    pub usuario: Usuario,
    pub numero_tarjeta_profesional: String,
}

impl AsistenteTecnico {
    pub fn new(
        id: impl Into<String>,
        numero_identificacion: impl Into<String>,
        nombre: impl Into<String>,
        numero_tarjeta_profesional: impl Into<String>,
    ) -> Self {
        Self {
            usuario: Usuario::new(id, Rol::AsistenteTecnico, numero_identificacion, nombre),
            numero_tarjeta_profesional: numero_tarjeta_profesional.into(),
        }
    }
}

macro_rules! impl_con_usuario {
    ($($ty:ty),*) => {
        $(
            impl ConUsuario for $ty {
                fn usuario(&self) -> &Usuario {
                    &self.usuario
                }
                fn usuario_mut(&mut self) -> &mut Usuario {
                    &mut self.usuario
                }
            }
        )*
    };
}

impl_con_usuario!(Propietario, Productor, AsistenteTecnico);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_propietario_creation() {
        let p = Propietario::new("PROP-1", "123456789", "Juan Pérez García");
        assert_eq!(p.usuario.rol, Rol::Propietario);
        assert_eq!(p.usuario.numero_identificacion, "123456789");
        assert!(p.usuario.permisos.is_empty());
        assert_eq!(p.direccion, None);
    }

    #[test]
    fn test_agregar_permiso_keeps_order_and_skips_duplicates() {
        let mut u = Usuario::new("U-1", Rol::Productor, "1", "Ana");
        u.agregar_permiso("editar_predios");
        u.agregar_permiso("acceso_predios");
        u.agregar_permiso("editar_predios");
        assert_eq!(u.permisos, vec!["editar_predios", "acceso_predios"]);
        assert!(u.tiene_permiso("acceso_predios"));
        assert!(!u.tiene_permiso("borrar"));
    }

    #[test]
    fn test_json_shape_is_flat() {
        let mut a = AsistenteTecnico::new("AT-1", "555", "Luisa", "TP-99");
        a.usuario.correo_electronico = Some("luisa@ica.gov.co".into());
        let value = serde_json::to_value(&a).unwrap();
        assert_eq!(value["numero_identificacion"], "555");
        assert_eq!(value["numero_tarjeta_profesional"], "TP-99");
        assert_eq!(value["rol"], "AsistenteTecnico");

        let back: AsistenteTecnico = serde_json::from_value(value).unwrap();
        assert_eq!(back, a);
    }
}
