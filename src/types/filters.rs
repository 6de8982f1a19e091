//! Query-string filters for list endpoints.
//!
//! The pagination fields are repeated rather than flattened because
//! `serde(flatten)` loses the numeric types of url-encoded values.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::IntoParams;

use super::pagination::{default_page, default_page_size, PaginationParams};
use crate::errors::{AppError, AppResult};

/// Category name substring filter
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CategoriesFilterName {
    #[serde(default = "default_page")]
    pub page_number: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Substring to match; empty means no filter
    pub name: Option<String>,
}

impl CategoriesFilterName {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page_number, self.page_size)
    }
}

/// Comparison selected by the `priceRequirements` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceCriterion {
    /// `maior`
    GreaterThan,
    /// `menor`
    LessThan,
    /// `igual`
    EqualTo,
}

impl FromStr for PriceCriterion {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "maior" => Ok(Self::GreaterThan),
            "menor" => Ok(Self::LessThan),
            "igual" => Ok(Self::EqualTo),
            other => Err(AppError::bad_request(format!(
                "priceRequirements inválido: '{}'. Use maior, menor ou igual",
                other
            ))),
        }
    }
}

/// Product price comparison filter
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductFilterPrice {
    #[serde(default = "default_page")]
    pub page_number: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// Reference price, e.g. `5.45`
    pub price: Option<String>,
    /// One of `maior`, `menor`, `igual`
    pub price_requirements: Option<String>,
}

impl ProductFilterPrice {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page_number, self.page_size)
    }

    /// The comparison to apply, or `None` unless both price and flag are given.
    pub fn price_filter(&self) -> AppResult<Option<(Decimal, PriceCriterion)>> {
        let price = self.price.as_deref().map(str::trim).filter(|p| !p.is_empty());
        let flag = self
            .price_requirements
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty());

        match (price, flag) {
            (Some(price), Some(flag)) => {
                let price = Decimal::from_str(price)
                    .map_err(|_| AppError::bad_request(format!("Preço inválido: '{}'", price)))?;
                Ok(Some((price, flag.parse()?)))
            }
            _ => Ok(None),
        }
    }
}
