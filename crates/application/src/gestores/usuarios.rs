//! Managers for the three user roles.
//!
//! Users are addressed by `numero_identificacion`, which is unique across
//! roles; the stored `id` never changes once registered.

use crate::validacion::{coincide, correo_opcional, requerido, telefono_opcional};
use domain::usuario::{
    AsistenteTecnicoRepository, ProductorRepository, PropietarioRepository, UsuarioRepository,
};
use domain::{
    AsistenteTecnico, DomainError, InspeccionFitosanitaria, LugarProduccion, Predio, Productor,
    Propietario, Rol, Usuario,
};
use std::sync::Arc;
use tracing::{info, warn};

fn validar_usuario(usuario: &Usuario) -> Result<(), DomainError> {
    requerido("id", &usuario.id)?;
    requerido("numero_identificacion", &usuario.numero_identificacion)?;
    requerido("nombre", &usuario.nombre)?;
    correo_opcional(usuario.correo_electronico.as_deref())?;
    telefono_opcional(usuario.telefono_contacto.as_deref())?;
    Ok(())
}

/// Fails when any user, whatever the role, already holds `numero`.
async fn numero_disponible(
    usuarios: &dyn UsuarioRepository,
    numero: &str,
) -> Result<(), DomainError> {
    if usuarios.find_by_numero_identificacion(numero).await?.is_some() {
        warn!(numero, "Identification number already registered");
        return Err(DomainError::already_exists("Usuario", numero));
    }
    Ok(())
}

fn no_encontrado(entity: &'static str, numero: &str) -> DomainError {
    warn!(entity, numero, "User not found");
    DomainError::not_found(entity, numero)
}

pub struct GestorPropietarios {
    repo: Arc<dyn PropietarioRepository>,
    usuarios: Arc<dyn UsuarioRepository>,
}

impl GestorPropietarios {
    pub fn new(repo: Arc<dyn PropietarioRepository>, usuarios: Arc<dyn UsuarioRepository>) -> Self {
        Self { repo, usuarios }
    }

    pub async fn registrar(&self, mut propietario: Propietario) -> Result<(), DomainError> {
        validar_usuario(&propietario.usuario)?;
        numero_disponible(self.usuarios.as_ref(), &propietario.usuario.numero_identificacion)
            .await?;

        propietario.usuario.rol = Rol::Propietario;
        self.repo.insert(&propietario).await?;
        info!(numero = %propietario.usuario.numero_identificacion, "Propietario registered");
        Ok(())
    }

    /// Replaces the record holding the same `numero_identificacion`.
    pub async fn actualizar(&self, mut propietario: Propietario) -> Result<(), DomainError> {
        let numero = propietario.usuario.numero_identificacion.clone();
        requerido("numero_identificacion", &numero)?;
        let existente = self
            .repo
            .find_by_numero_identificacion(&numero)
            .await?
            .ok_or_else(|| no_encontrado("Propietario", &numero))?;

        propietario.usuario.id = existente.usuario.id;
        propietario.usuario.rol = Rol::Propietario;
        validar_usuario(&propietario.usuario)?;
        self.repo.update(&propietario).await?;
        info!(numero = %numero, "Propietario updated");
        Ok(())
    }

    pub async fn eliminar(&self, numero: &str) -> Result<(), DomainError> {
        requerido("numero_identificacion", numero)?;
        let existente = self
            .repo
            .find_by_numero_identificacion(numero)
            .await?
            .ok_or_else(|| no_encontrado("Propietario", numero))?;

        self.repo.delete(&existente.usuario.id).await?;
        info!(numero, "Propietario deleted");
        Ok(())
    }

    pub async fn consultar(&self, numero: &str) -> Result<Option<Propietario>, DomainError> {
        self.repo.find_by_numero_identificacion(numero).await
    }

    pub async fn listar(&self) -> Result<Vec<Propietario>, DomainError> {
        self.repo.find_all().await
    }

    pub async fn buscar_por_nombre(&self, consulta: &str) -> Result<Vec<Propietario>, DomainError> {
        let todos = self.repo.find_all().await?;
        Ok(todos
            .into_iter()
            .filter(|p| coincide(&p.usuario.nombre, consulta))
            .collect())
    }

    /// Predios owned by the propietario with this identification number
    pub async fn predios(&self, numero: &str) -> Result<Vec<Predio>, DomainError> {
        let existente = self
            .repo
            .find_by_numero_identificacion(numero)
            .await?
            .ok_or_else(|| no_encontrado("Propietario", numero))?;
        self.repo.find_predios(&existente.usuario.id).await
    }
}

pub struct GestorProductores {
    repo: Arc<dyn ProductorRepository>,
    usuarios: Arc<dyn UsuarioRepository>,
}

impl GestorProductores {
    pub fn new(repo: Arc<dyn ProductorRepository>, usuarios: Arc<dyn UsuarioRepository>) -> Self {
        Self { repo, usuarios }
    }

    pub async fn registrar(&self, mut productor: Productor) -> Result<(), DomainError> {
        validar_usuario(&productor.usuario)?;
        numero_disponible(self.usuarios.as_ref(), &productor.usuario.numero_identificacion)
            .await?;

        productor.usuario.rol = Rol::Productor;
        self.repo.insert(&productor).await?;
        info!(numero = %productor.usuario.numero_identificacion, "Productor registered");
        Ok(())
    }

    pub async fn actualizar(&self, mut productor: Productor) -> Result<(), DomainError> {
        let numero = productor.usuario.numero_identificacion.clone();
        requerido("numero_identificacion", &numero)?;
        let existente = self
            .repo
            .find_by_numero_identificacion(&numero)
            .await?
            .ok_or_else(|| no_encontrado("Productor", &numero))?;

        productor.usuario.id = existente.usuario.id;
        productor.usuario.rol = Rol::Productor;
        validar_usuario(&productor.usuario)?;
        self.repo.update(&productor).await?;
        info!(numero = %numero, "Productor updated");
        Ok(())
    }

    pub async fn eliminar(&self, numero: &str) -> Result<(), DomainError> {
        requerido("numero_identificacion", numero)?;
        let existente = self
            .repo
            .find_by_numero_identificacion(numero)
            .await?
            .ok_or_else(|| no_encontrado("Productor", numero))?;

        self.repo.delete(&existente.usuario.id).await?;
        info!(numero, "Productor deleted");
        Ok(())
    }

    pub async fn consultar(&self, numero: &str) -> Result<Option<Productor>, DomainError> {
        self.repo.find_by_numero_identificacion(numero).await
    }

    pub async fn listar(&self) -> Result<Vec<Productor>, DomainError> {
        self.repo.find_all().await
    }

    pub async fn buscar_por_nombre(&self, consulta: &str) -> Result<Vec<Productor>, DomainError> {
        let todos = self.repo.find_all().await?;
        Ok(todos
            .into_iter()
            .filter(|p| coincide(&p.usuario.nombre, consulta))
            .collect())
    }

    pub async fn lugares_produccion(&self, numero: &str) -> Result<Vec<LugarProduccion>, DomainError> {
        let existente = self
            .repo
            .find_by_numero_identificacion(numero)
            .await?
            .ok_or_else(|| no_encontrado("Productor", numero))?;
        self.repo.find_lugares_produccion(&existente.usuario.id).await
    }
}

pub struct GestorAsistentes {
    repo: Arc<dyn AsistenteTecnicoRepository>,
    usuarios: Arc<dyn UsuarioRepository>,
}

impl GestorAsistentes {
    pub fn new(
        repo: Arc<dyn AsistenteTecnicoRepository>,
        usuarios: Arc<dyn UsuarioRepository>,
    ) -> Self {
        Self { repo, usuarios }
    }

    fn validar(asistente: &AsistenteTecnico) -> Result<(), DomainError> {
        validar_usuario(&asistente.usuario)?;
        requerido(
            "numero_tarjeta_profesional",
            &asistente.numero_tarjeta_profesional,
        )
    }

    /// A professional card number belongs to one assistant only.
    async fn tarjeta_disponible(&self, asistente: &AsistenteTecnico) -> Result<(), DomainError> {
        let tarjeta = &asistente.numero_tarjeta_profesional;
        match self.repo.find_by_tarjeta_profesional(tarjeta).await? {
            Some(otro) if otro.usuario.id != asistente.usuario.id => {
                warn!(tarjeta = %tarjeta, "Professional card already registered");
                Err(DomainError::already_exists("AsistenteTecnico", tarjeta.as_str()))
            }
            _ => Ok(()),
        }
    }

    pub async fn registrar(&self, mut asistente: AsistenteTecnico) -> Result<(), DomainError> {
        Self::validar(&asistente)?;
        numero_disponible(self.usuarios.as_ref(), &asistente.usuario.numero_identificacion)
            .await?;
        self.tarjeta_disponible(&asistente).await?;

        asistente.usuario.rol = Rol::AsistenteTecnico;
        self.repo.insert(&asistente).await?;
        info!(numero = %asistente.usuario.numero_identificacion, "AsistenteTecnico registered");
        Ok(())
    }

    pub async fn actualizar(&self, mut asistente: AsistenteTecnico) -> Result<(), DomainError> {
        let numero = asistente.usuario.numero_identificacion.clone();
        requerido("numero_identificacion", &numero)?;
        let existente = self
            .repo
            .find_by_numero_identificacion(&numero)
            .await?
            .ok_or_else(|| no_encontrado("AsistenteTecnico", &numero))?;

        asistente.usuario.id = existente.usuario.id;
        asistente.usuario.rol = Rol::AsistenteTecnico;
        Self::validar(&asistente)?;
        self.tarjeta_disponible(&asistente).await?;
        self.repo.update(&asistente).await?;
        info!(numero = %numero, "AsistenteTecnico updated");
        Ok(())
    }

    pub async fn eliminar(&self, numero: &str) -> Result<(), DomainError> {
        requerido("numero_identificacion", numero)?;
        let existente = self
            .repo
            .find_by_numero_identificacion(numero)
            .await?
            .ok_or_else(|| no_encontrado("AsistenteTecnico", numero))?;

        self.repo.delete(&existente.usuario.id).await?;
        info!(numero, "AsistenteTecnico deleted");
        Ok(())
    }

    pub async fn consultar(&self, numero: &str) -> Result<Option<AsistenteTecnico>, DomainError> {
        self.repo.find_by_numero_identificacion(numero).await
    }

    pub async fn consultar_por_tarjeta(
        &self,
        tarjeta: &str,
    ) -> Result<Option<AsistenteTecnico>, DomainError> {
        self.repo.find_by_tarjeta_profesional(tarjeta).await
    }

    pub async fn listar(&self) -> Result<Vec<AsistenteTecnico>, DomainError> {
        self.repo.find_all().await
    }

    pub async fn buscar_por_nombre(
        &self,
        consulta: &str,
    ) -> Result<Vec<AsistenteTecnico>, DomainError> {
        let todos = self.repo.find_all().await?;
        Ok(todos
            .into_iter()
            .filter(|a| coincide(&a.usuario.nombre, consulta))
            .collect())
    }

    pub async fn lugares_produccion(&self, numero: &str) -> Result<Vec<LugarProduccion>, DomainError> {
        let existente = self
            .repo
            .find_by_numero_identificacion(numero)
            .await?
            .ok_or_else(|| no_encontrado("AsistenteTecnico", numero))?;
        self.repo.find_lugares_produccion(&existente.usuario.id).await
    }

    pub async fn inspecciones(
        &self,
        numero: &str,
    ) -> Result<Vec<InspeccionFitosanitaria>, DomainError> {
        let existente = self
            .repo
            .find_by_numero_identificacion(numero)
            .await?
            .ok_or_else(|| no_encontrado("AsistenteTecnico", numero))?;
        self.repo.find_inspecciones(&existente.usuario.id).await
    }
}
