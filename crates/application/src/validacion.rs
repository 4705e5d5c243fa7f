//! Field checks shared by every manager.

use domain::{DomainError, Referencia};
use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

static RE_CORREO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email pattern compiles")
});

// ASCII whitespace only.
static RE_TELEFONO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9 \t\n\x0B\f\r\-\(\)]{7,15}$").expect("phone pattern compiles")
});

pub fn es_correo_valido(correo: &str) -> bool {
    RE_CORREO.is_match(correo)
}

pub fn es_telefono_valido(telefono: &str) -> bool {
    RE_TELEFONO.is_match(telefono)
}

/// Rejects a missing or blank required field.
pub fn requerido(campo: &str, valor: &str) -> Result<(), DomainError> {
    if valor.trim().is_empty() {
        warn!(campo, "Required field is empty");
        return Err(DomainError::validation(format!("{} is required", campo)));
    }
    Ok(())
}

/// Optional email: checked only when present and non-blank. The stored value
/// is matched as is, padding included.
pub fn correo_opcional(correo: Option<&str>) -> Result<(), DomainError> {
    match correo.filter(|c| !c.trim().is_empty()) {
        Some(c) if !es_correo_valido(c) => {
            warn!(correo = c, "Rejected email");
            Err(DomainError::validation(format!("Invalid email: {}", c)))
        }
        _ => Ok(()),
    }
}

pub fn telefono_opcional(telefono: Option<&str>) -> Result<(), DomainError> {
    match telefono.filter(|t| !t.trim().is_empty()) {
        Some(t) if !es_telefono_valido(t) => {
            warn!(telefono = t, "Rejected phone number");
            Err(DomainError::validation(format!("Invalid phone number: {}", t)))
        }
        _ => Ok(()),
    }
}

pub fn no_negativo(campo: &str, valor: f64) -> Result<(), DomainError> {
    if !valor.is_finite() || valor < 0.0 {
        warn!(campo, valor, "Negative or non-finite value");
        return Err(DomainError::validation(format!(
            "{} must be a non-negative number",
            campo
        )));
    }
    Ok(())
}

/// A reference, when given, must name an id.
pub fn referencia_opcional(campo: &str, referencia: &Option<Referencia>) -> Result<(), DomainError> {
    match referencia {
        Some(r) if r.id.trim().is_empty() => {
            warn!(campo, "Reference without id");
            Err(DomainError::validation(format!("{} reference needs an id", campo)))
        }
        _ => Ok(()),
    }
}

/// Case-insensitive substring match; an empty query matches everything.
pub fn coincide(texto: &str, consulta: &str) -> bool {
    let consulta = consulta.trim();
    consulta.is_empty() || texto.to_lowercase().contains(&consulta.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correo() {
        assert!(es_correo_valido("a@b.co"));
        assert!(es_correo_valido("ana.perez+ica@agro.gov.co"));
        assert!(!es_correo_valido("a@b"));
        assert!(!es_correo_valido("@b.com"));
        assert!(!es_correo_valido("a.b.com"));
    }

    #[test]
    fn test_telefono() {
        assert!(es_telefono_valido("300-123-4567"));
        assert!(es_telefono_valido("(601) 555 1234"));
        assert!(!es_telefono_valido("abc1234567"));
        assert!(!es_telefono_valido("123"));
    }

    #[test]
    fn test_opcionales_ignore_blank() {
        assert!(correo_opcional(None).is_ok());
        assert!(correo_opcional(Some("  ")).is_ok());
        assert!(correo_opcional(Some("malo")).is_err());
        assert!(telefono_opcional(Some("")).is_ok());
        assert!(telefono_opcional(Some("12")).is_err());
    }

    #[test]
    fn test_correo_con_espacios_rechazado() {
        assert!(correo_opcional(Some(" a@b.co ")).is_err());
        assert!(correo_opcional(Some("a@b.co")).is_ok());
    }

    #[test]
    fn test_telefono_solo_espacios_ascii() {
        assert!(telefono_opcional(Some("300\u{00A0}1234567")).is_err());
        assert!(telefono_opcional(Some("300\u{2003}1234567")).is_err());
        assert!(telefono_opcional(Some("300 1234567")).is_ok());
        assert!(telefono_opcional(Some("300\t1234567")).is_ok());
    }

    #[test]
    fn test_requerido() {
        assert!(requerido("nombre", "Ana").is_ok());
        assert!(matches!(
            requerido("nombre", "   "),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_referencia_opcional() {
        assert!(referencia_opcional("vereda", &None).is_ok());
        assert!(referencia_opcional("vereda", &Some(Referencia::new("V-1"))).is_ok());
        assert!(referencia_opcional("vereda", &Some(Referencia::new(" "))).is_err());
    }

    #[test]
    fn test_coincide() {
        assert!(coincide("María Gómez", "maría"));
        assert!(coincide("Cualquiera", ""));
        assert!(!coincide("Pedro", "ana"));
    }
}
