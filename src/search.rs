//! Vehicle search predicate
//!
//! Turns the optional query-string parameters of `GET /api/v1/vehicles` into a
//! [`Filter`]. Empty parameters are ignored; `brand` and `province` also accept
//! the sentinel `all`.

use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

use crate::error::ValidationError;
use crate::models::vehicle::fields;
use crate::models::{FuelType, Transmission};
use crate::store::Filter;

const ALL: &str = "all";

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VehicleSearchParams {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    /// Fuel type; Spanish spellings are accepted
    pub fuel: Option<String>,
    pub transmission: Option<String>,
    #[serde(rename = "mileage-from")]
    pub mileage_from: Option<String>,
    #[serde(rename = "mileage-to")]
    pub mileage_to: Option<String>,
    #[serde(rename = "year-from")]
    pub year_from: Option<String>,
    #[serde(rename = "year-to")]
    pub year_to: Option<String>,
    #[serde(rename = "horsepower-from")]
    pub horsepower_from: Option<String>,
    #[serde(rename = "horsepower-to")]
    pub horsepower_to: Option<String>,
    #[serde(rename = "price-from")]
    pub price_from: Option<String>,
    #[serde(rename = "price-to")]
    pub price_to: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_int(param: &'static str, value: &Option<String>) -> Result<Option<Value>, ValidationError> {
    present(value)
        .map(|raw| {
            raw.parse::<i64>()
                .map(Value::from)
                .map_err(|_| ValidationError::InvalidFilterValue {
                    field: param,
                    value: raw.to_string(),
                })
        })
        .transpose()
}

fn parse_decimal(
    param: &'static str,
    value: &Option<String>,
) -> Result<Option<Value>, ValidationError> {
    present(value)
        .map(|raw| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::from)
                .ok_or_else(|| ValidationError::InvalidFilterValue {
                    field: param,
                    value: raw.to_string(),
                })
        })
        .transpose()
}

fn with_range(filter: Filter, field: &str, gte: Option<Value>, lte: Option<Value>) -> Filter {
    if gte.is_none() && lte.is_none() {
        return filter;
    }
    filter.and_range(field, gte, lte)
}

impl VehicleSearchParams {
    pub fn build_filter(&self) -> Result<Filter, ValidationError> {
        let mut filter = Filter::all();

        if let Some(brand) = present(&self.brand).filter(|b| *b != ALL) {
            filter = filter.and_eq(fields::BRAND, brand);
        }
        if let Some(model) = present(&self.model) {
            filter = filter.and_eq(fields::MODEL, model);
        }
        if let Some(province) = present(&self.province).filter(|p| *p != ALL) {
            filter = filter.and_eq(fields::PROVINCE, province);
        }
        if let Some(city) = present(&self.city) {
            filter = filter.and_eq(fields::CITY, city);
        }
        if let Some(fuel) = present(&self.fuel) {
            let value = FuelType::parse(fuel).map_or(fuel, |f| f.as_str());
            filter = filter.and_eq(fields::FUEL_TYPE, value);
        }
        if let Some(gearbox) = present(&self.transmission) {
            let value = Transmission::parse(gearbox).map_or(gearbox, |t| t.as_str());
            filter = filter.and_eq(fields::TRANSMISSION, value);
        }

        filter = with_range(
            filter,
            fields::MILEAGE,
            parse_int("mileage-from", &self.mileage_from)?,
            parse_int("mileage-to", &self.mileage_to)?,
        );
        filter = with_range(
            filter,
            fields::YEAR,
            parse_int("year-from", &self.year_from)?,
            parse_int("year-to", &self.year_to)?,
        );
        filter = with_range(
            filter,
            fields::HORSEPOWER,
            parse_int("horsepower-from", &self.horsepower_from)?,
            parse_int("horsepower-to", &self.horsepower_to)?,
        );
        filter = with_range(
            filter,
            fields::PRICE,
            parse_decimal("price-from", &self.price_from)?,
            parse_decimal("price-to", &self.price_to)?,
        );

        Ok(filter)
    }
}
