//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! usadas por los `#[validate(custom = ...)]` de los DTOs.

use rust_decimal::Decimal;
use validator::ValidationError;

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Validar que un importe sea estrictamente positivo
pub fn validate_positive_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor (odómetro, combustible) no sea negativo
pub fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de número de registro (matrícula)
pub fn validate_registration_number(value: &str) -> Result<(), ValidationError> {
    let clean_plate: String = value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .collect();
    if clean_plate.len() < 4
        || clean_plate.len() > 16
        || !clean_plate.chars().all(|c| c.is_alphanumeric())
    {
        let mut error = ValidationError::new("registration_number");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono (básico)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    if !(7..=15).contains(&digits) {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Ana").is_ok());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn test_validate_amounts() {
        assert!(validate_positive_amount(&dec!(0.01)).is_ok());
        assert!(validate_positive_amount(&dec!(0)).is_err());
        assert!(validate_positive_amount(&dec!(-5)).is_err());

        assert!(validate_non_negative(&dec!(0)).is_ok());
        assert!(validate_non_negative(&dec!(12500.5)).is_ok());
        assert!(validate_non_negative(&dec!(-0.1)).is_err());
    }

    #[test]
    fn test_validate_registration_number() {
        assert!(validate_registration_number("BA 2 PA 4521").is_ok());
        assert!(validate_registration_number("AB-123-CD").is_ok());
        assert!(validate_registration_number("A1").is_err());
        assert!(validate_registration_number("AB#123").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+977 9812345678").is_ok());
        assert!(validate_phone("123").is_err());
    }
}
