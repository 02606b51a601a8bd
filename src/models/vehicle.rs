//! Vehicle listings
//!
//! - [`Vehicle`]: stored listing, keyed by `plate`
//! - [`VehicleDraft`]: create request, every field optional so missing ones can
//!   be reported by name
//! - [`VehiclePatch`]: merge-patch request
//! - [`VehicleLimits`]: numeric bounds, injected from configuration

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValidationError;
use crate::store::{Document, StoreError, to_document};

/// Stored field names
pub mod fields {
    pub const PLATE: &str = "plate";
    pub const BRAND: &str = "brand";
    pub const MODEL: &str = "model";
    pub const YEAR: &str = "year";
    pub const MILEAGE: &str = "mileage";
    pub const PRICE: &str = "price";
    pub const CITY: &str = "city";
    pub const PROVINCE: &str = "province";
    pub const FUEL_TYPE: &str = "fuelType";
    pub const TRANSMISSION: &str = "transmission";
    pub const HORSEPOWER: &str = "horsepower";
    pub const IMAGES: &str = "images";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum FuelType {
    #[serde(alias = "Gasolina")]
    Gasoline,
    #[serde(alias = "Diésel")]
    Diesel,
    #[serde(alias = "Eléctrico")]
    Electric,
    #[serde(alias = "Híbrido")]
    Hybrid,
}

impl FuelType {
    /// Accepts canonical names and the Spanish spellings used by older clients
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Gasoline" | "Gasolina" => Some(FuelType::Gasoline),
            "Diesel" | "Diésel" => Some(FuelType::Diesel),
            "Electric" | "Eléctrico" => Some(FuelType::Electric),
            "Hybrid" | "Híbrido" => Some(FuelType::Hybrid),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FuelType::Gasoline => "Gasoline",
            FuelType::Diesel => "Diesel",
            FuelType::Electric => "Electric",
            FuelType::Hybrid => "Hybrid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Transmission {
    Manual,
    #[serde(alias = "Automático")]
    Automatic,
}

impl Transmission {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Manual" => Some(Transmission::Manual),
            "Automatic" | "Automático" => Some(Transmission::Automatic),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Transmission::Manual => "Manual",
            Transmission::Automatic => "Automatic",
        }
    }
}

/// Inclusive numeric bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy + Into<f64>> Bounds<T> {
    fn check(&self, field: &'static str, value: T) -> Result<T, ValidationError> {
        if value < self.min || value > self.max {
            return Err(ValidationError::OutOfRange {
                field,
                min: self.min.into(),
                max: self.max.into(),
                actual: value.into(),
            });
        }
        Ok(value)
    }
}

/// Accepted ranges for numeric vehicle attributes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleLimits {
    pub year: Bounds<i32>,
    pub mileage: Bounds<i32>,
    pub horsepower: Bounds<i32>,
    pub price: Bounds<f64>,
}

impl Default for VehicleLimits {
    fn default() -> Self {
        Self {
            year: Bounds { min: 1980, max: 2024 },
            mileage: Bounds { min: 0, max: 300_000 },
            horsepower: Bounds { min: 50, max: 500 },
            price: Bounds {
                min: 0.0,
                max: 200_000.0,
            },
        }
    }
}

/// Stored vehicle listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[schema(example = "1234ABC")]
    pub plate: String,
    #[schema(example = "Seat")]
    pub brand: String,
    #[schema(example = "Ibiza")]
    pub model: String,
    #[schema(example = 2018)]
    pub year: i32,
    #[schema(example = 85000)]
    pub mileage: i32,
    #[schema(example = 9500.0)]
    pub price: f64,
    pub city: String,
    pub province: String,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    #[schema(example = 110)]
    pub horsepower: i32,
    pub images: Vec<String>,
}

/// A numeric attribute as sent by the client. Numeric strings are accepted;
/// anything else is reported as an invalid format on that field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl From<i32> for NumericInput {
    fn from(value: i32) -> Self {
        NumericInput::Int(value.into())
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        NumericInput::Float(value)
    }
}

fn invalid_number(field: &'static str, reason: &str) -> ValidationError {
    ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

impl NumericInput {
    /// Whole number fitting an `i32`; `2018`, `2018.0` and `"2018"` all qualify
    pub fn to_int(&self, field: &'static str) -> Result<i32, ValidationError> {
        let whole = match self {
            NumericInput::Int(i) => *i,
            NumericInput::Float(f) if f.is_finite() && f.fract() == 0.0 => *f as i64,
            NumericInput::Text(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|_| invalid_number(field, "must be a whole number"))?,
            _ => return Err(invalid_number(field, "must be a whole number")),
        };
        i32::try_from(whole).map_err(|_| invalid_number(field, "is too large"))
    }

    pub fn to_float(&self, field: &'static str) -> Result<f64, ValidationError> {
        match self {
            NumericInput::Int(i) => Ok(*i as f64),
            NumericInput::Float(f) => Ok(*f),
            NumericInput::Text(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| invalid_number(field, "must be a number")),
            NumericInput::Other(_) => Err(invalid_number(field, "must be a number")),
        }
    }
}

/// Vehicle create request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDraft {
    pub plate: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    #[schema(value_type = Option<i32>)]
    pub year: Option<NumericInput>,
    #[schema(value_type = Option<i32>)]
    pub mileage: Option<NumericInput>,
    #[schema(value_type = Option<f64>)]
    pub price: Option<NumericInput>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    #[schema(value_type = Option<i32>)]
    pub horsepower: Option<NumericInput>,
    pub images: Option<Vec<String>>,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::MissingField { field })
}

fn non_empty(value: String, field: &'static str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(value)
}

fn fuel(raw: &str) -> Result<FuelType, ValidationError> {
    FuelType::parse(raw).ok_or_else(|| ValidationError::InvalidEnum {
        field: fields::FUEL_TYPE,
        value: raw.to_string(),
    })
}

fn transmission(raw: &str) -> Result<Transmission, ValidationError> {
    Transmission::parse(raw).ok_or_else(|| ValidationError::InvalidEnum {
        field: fields::TRANSMISSION,
        value: raw.to_string(),
    })
}

impl VehicleDraft {
    /// Check presence of every field, then values, reporting the first problem
    pub fn validate(self, limits: &VehicleLimits) -> Result<Vehicle, ValidationError> {
        let plate = required(self.plate, fields::PLATE)?;
        let brand = required(self.brand, fields::BRAND)?;
        let model = required(self.model, fields::MODEL)?;
        let year = required(self.year, fields::YEAR)?;
        let mileage = required(self.mileage, fields::MILEAGE)?;
        let price = required(self.price, fields::PRICE)?;
        let city = required(self.city, fields::CITY)?;
        let province = required(self.province, fields::PROVINCE)?;
        let fuel_type = required(self.fuel_type, fields::FUEL_TYPE)?;
        let gearbox = required(self.transmission, fields::TRANSMISSION)?;
        let horsepower = required(self.horsepower, fields::HORSEPOWER)?;
        let images = required(self.images, fields::IMAGES)?;

        let plate = non_empty(plate, fields::PLATE)?;
        let year = limits.year.check(fields::YEAR, year.to_int(fields::YEAR)?)?;
        let mileage = limits
            .mileage
            .check(fields::MILEAGE, mileage.to_int(fields::MILEAGE)?)?;
        let horsepower = limits
            .horsepower
            .check(fields::HORSEPOWER, horsepower.to_int(fields::HORSEPOWER)?)?;
        let price = check_price(limits, price.to_float(fields::PRICE)?)?;
        let province = non_empty(province, fields::PROVINCE)?;
        let city = non_empty(city, fields::CITY)?;

        Ok(Vehicle {
            plate,
            brand,
            model,
            year,
            mileage,
            price,
            city,
            province,
            fuel_type: fuel(&fuel_type)?,
            transmission: transmission(&gearbox)?,
            horsepower,
            images,
        })
    }
}

fn check_price(limits: &VehicleLimits, price: f64) -> Result<f64, ValidationError> {
    if !price.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: fields::PRICE.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }
    limits.price.check(fields::PRICE, price)
}

/// Vehicle merge-patch request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePatch {
    pub plate: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    #[schema(value_type = Option<i32>)]
    pub year: Option<NumericInput>,
    #[schema(value_type = Option<i32>)]
    pub mileage: Option<NumericInput>,
    #[schema(value_type = Option<f64>)]
    pub price: Option<NumericInput>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    #[schema(value_type = Option<i32>)]
    pub horsepower: Option<NumericInput>,
    pub images: Option<Vec<String>>,
}

/// Validated patch, serialized as the `$set` document
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mileage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<FuelType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmission: Option<Transmission>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horsepower: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl VehiclePatch {
    /// Apply the create-time rules to every supplied field
    pub fn validate(self, limits: &VehicleLimits) -> Result<VehicleChanges, ValidationError> {
        Ok(VehicleChanges {
            plate: self.plate.map(|p| non_empty(p, fields::PLATE)).transpose()?,
            brand: self.brand,
            model: self.model,
            year: self
                .year
                .map(|y| limits.year.check(fields::YEAR, y.to_int(fields::YEAR)?))
                .transpose()?,
            mileage: self
                .mileage
                .map(|m| limits.mileage.check(fields::MILEAGE, m.to_int(fields::MILEAGE)?))
                .transpose()?,
            horsepower: self
                .horsepower
                .map(|h| {
                    limits
                        .horsepower
                        .check(fields::HORSEPOWER, h.to_int(fields::HORSEPOWER)?)
                })
                .transpose()?,
            price: self
                .price
                .map(|p| check_price(limits, p.to_float(fields::PRICE)?))
                .transpose()?,
            province: self
                .province
                .map(|p| non_empty(p, fields::PROVINCE))
                .transpose()?,
            city: self.city.map(|c| non_empty(c, fields::CITY)).transpose()?,
            fuel_type: self.fuel_type.as_deref().map(fuel).transpose()?,
            transmission: self.transmission.as_deref().map(transmission).transpose()?,
            images: self.images,
        })
    }
}

impl VehicleChanges {
    pub fn to_document(&self) -> Result<Document, StoreError> {
        to_document(self)
    }
}
