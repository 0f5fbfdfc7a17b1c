//! Validation utilities for the Sales & Inventory Management Platform

use rust_decimal::Decimal;

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate product code format (2-20 alphanumeric, dashes allowed)
pub fn validate_product_code(code: &str) -> Result<(), &'static str> {
    if code.len() < 2 {
        return Err("Product code must be at least 2 characters");
    }
    if code.len() > 20 {
        return Err("Product code must be at most 20 characters");
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err("Product code must be alphanumeric");
    }
    Ok(())
}

/// Validate a monetary amount is not negative
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    Ok(())
}

/// Validate a movement or order line quantity
pub fn validate_quantity(quantity: i64) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate password strength (minimum 8 characters)
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_email() {
        assert!(validate_email("shop@example.com").is_ok());
        assert!(validate_email("nope").is_err());
    }

    #[test]
    fn rejects_short_code() {
        assert!(validate_product_code("A").is_err());
        assert!(validate_product_code("SP-001").is_ok());
    }

    #[test]
    fn rejects_negative_price() {
        assert!(validate_price(Decimal::from(-1)).is_err());
        assert!(validate_price(Decimal::ZERO).is_ok());
    }

    #[test]
    fn rejects_zero_quantity() {
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(3).is_ok());
    }
}
