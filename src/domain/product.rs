//! Product DTOs exposed over the API.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::config::{MAX_STOCK, MIN_STOCK};

/// Largest price representable by a `decimal(10,2)` column
const MAX_PRICE: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

/// Product as sent and received by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    #[serde(default)]
    #[schema(example = 1)]
    pub id: i32,
    #[validate(length(min = 1, max = 80, message = "O nome deve ter entre 1 e 80 caracteres"))]
    #[schema(example = "Coca Cola Diet")]
    pub name: String,
    #[validate(length(min = 1, max = 300, message = "A descrição deve ter entre 1 e 300 caracteres"))]
    #[schema(example = "Refrigerante de cola 350ml")]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = f64, example = 5.45)]
    pub price: Decimal,
    #[validate(length(min = 1, max = 300, message = "A URL da imagem deve ter entre 1 e 300 caracteres"))]
    #[schema(example = "cocacola.jpg")]
    pub image_url: String,
    #[schema(example = 1)]
    pub category_id: i32,
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() || *price > MAX_PRICE {
        let mut error = ValidationError::new("price");
        error.message = Some(Cow::from("O preço deve estar entre 0 e 99999999.99"));
        return Err(error);
    }
    Ok(())
}

/// Fields a partial update may change
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdateRequest {
    #[schema(example = 25.0)]
    pub stock: Option<f32>,
    pub register_date: Option<DateTime<Utc>>,
}

impl ProductUpdateRequest {
    pub fn is_empty(&self) -> bool {
        self.stock.is_none() && self.register_date.is_none()
    }

    /// Validate against an explicit "today" so the date rule is testable.
    pub fn validate_on(&self, today: NaiveDate) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.is_empty() {
            errors.add("stock", rule_error("required", "Informe stock ou registerDate"));
        }

        if let Some(stock) = self.stock {
            if !(MIN_STOCK..=MAX_STOCK).contains(&stock) {
                errors.add("stock", rule_error("range", "Estoque deve estar entre 1 e 9999"));
            }
        }

        if let Some(date) = self.register_date {
            if date.date_naive() <= today {
                errors.add(
                    "registerDate",
                    rule_error("future", "A data de cadastro deve ser maior que a data atual"),
                );
            }
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Validate for ProductUpdateRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.validate_on(Utc::now().date_naive())
    }
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::from(message));
    error
}

/// Full product returned after a partial update
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdateResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub image_url: String,
    pub stock: f32,
    pub register_date: DateTime<Utc>,
    pub category_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::str::FromStr;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 10).unwrap()
    }

    #[test]
    fn test_price_round_trips_as_number() {
        let dto: ProductDto = serde_json::from_str(
            r#"{"name":"Suco","description":"Suco de uva","price":7.9,"imageUrl":"suco.jpg","categoryId":2}"#,
        )
        .unwrap();
        assert_eq!(dto.price, Decimal::from_str("7.9").unwrap());
        assert!(serde_json::to_value(&dto).unwrap()["price"].is_number());
    }

    #[test]
    fn test_negative_price_rejected() {
        let dto = ProductDto {
            id: 0,
            name: "Suco".to_string(),
            description: "Suco de uva".to_string(),
            price: Decimal::from_str("-1").unwrap(),
            image_url: "suco.jpg".to_string(),
            category_id: 1,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_requires_a_field() {
        assert!(ProductUpdateRequest::default().validate_on(today()).is_err());
    }

    #[test]
    fn test_update_stock_range() {
        let ok = ProductUpdateRequest {
            stock: Some(9999.0),
            register_date: None,
        };
        assert!(ok.validate_on(today()).is_ok());

        let too_low = ProductUpdateRequest {
            stock: Some(0.5),
            register_date: None,
        };
        assert!(too_low.validate_on(today()).is_err());
    }

    #[test]
    fn test_update_date_must_be_after_today() {
        let midday = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();

        let same_day = ProductUpdateRequest {
            stock: None,
            register_date: Some(midday),
        };
        assert!(same_day.validate_on(today()).is_err());

        let tomorrow = ProductUpdateRequest {
            stock: None,
            register_date: Some(midday + Duration::days(1)),
        };
        assert!(tomorrow.validate_on(today()).is_ok());
    }
}
