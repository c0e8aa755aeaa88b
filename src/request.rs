//! Mapping between the external yield request/response shape and the
//! optimizer's typed inputs.

use axum::http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::error::GeometryError;
use crate::profile::{MarginOverrides, ProfileCatalog, resolve_margins};
use crate::sheet::{MIN_CUSTOM_SIDE_MM, SheetSpec, StandardSize};
use crate::solver::compute_yield;
use crate::types::{Dimension, ItemSpec, Orientation, YieldReport};

/// Smallest item side accepted from callers, in millimeters.
pub const MIN_ITEM_SIDE_MM: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum SheetType {
    #[serde(alias = "a4")]
    A4,
    #[serde(alias = "a3")]
    A3,
    #[serde(rename = "custom", alias = "Custom")]
    Custom,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct YieldRequest {
    pub sheet_type: SheetType,
    #[serde(default, deserialize_with = "deserialize_opt_f64_from_number")]
    pub width_mm: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_opt_f64_from_number")]
    pub height_mm: Option<f64>,
    #[serde(deserialize_with = "deserialize_f64_from_number")]
    pub item_width_mm: f64,
    #[serde(deserialize_with = "deserialize_f64_from_number")]
    pub item_height_mm: f64,
    #[serde(default, deserialize_with = "deserialize_opt_f64_from_number")]
    pub margin_top_mm: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_opt_f64_from_number")]
    pub margin_bottom_mm: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_opt_f64_from_number")]
    pub margin_left_mm: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_opt_f64_from_number")]
    pub margin_right_mm: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_opt_f64_from_number")]
    pub bleed_mm: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_opt_f64_from_number")]
    pub spacing_mm: Option<f64>,
    #[serde(default)]
    pub printer_profile_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldResponse {
    pub orientation: Orientation,
    pub columns: u32,
    pub rows: u32,
    pub quantity: u64,
    pub occupied_width_mm: f64,
    pub occupied_height_mm: f64,
    pub leftover_width_mm: f64,
    pub leftover_height_mm: f64,
    pub usable_area_width_mm: f64,
    pub usable_area_height_mm: f64,
    pub waste_percentage: f64,
    pub item_effective_width_mm: f64,
    pub item_effective_height_mm: f64,
}

impl From<&YieldReport> for YieldResponse {
    fn from(report: &YieldReport) -> Self {
        let p = &report.packing;
        Self {
            orientation: p.orientation,
            columns: p.columns,
            rows: p.rows,
            quantity: p.quantity,
            occupied_width_mm: p.occupied_width_mm,
            occupied_height_mm: p.occupied_height_mm,
            leftover_width_mm: p.leftover_width_mm,
            leftover_height_mm: p.leftover_height_mm,
            usable_area_width_mm: report.usable_area.width,
            usable_area_height_mm: report.usable_area.height,
            waste_percentage: report.waste_percentage,
            item_effective_width_mm: report.item_effective_size.width,
            item_effective_height_mm: report.item_effective_size.height,
        }
    }
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("{0} is required for custom sheets")]
    MissingDimension(&'static str),
    #[error("{field} must be at least {min} mm, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("printer profile {0} not found")]
    UnknownProfile(u64),
}

impl RequestError {
    /// Missing and out-of-range fields are the request-level form of an
    /// invalid dimension.
    pub fn is_invalid_dimension(&self) -> bool {
        matches!(
            self,
            RequestError::MissingDimension(_)
                | RequestError::OutOfRange { .. }
                | RequestError::Geometry(GeometryError::InvalidDimension { .. })
        )
    }

    pub fn status(&self) -> StatusCode {
        match self {
            _ if self.is_invalid_dimension() => StatusCode::BAD_REQUEST,
            RequestError::UnknownProfile(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

fn ensure_min(field: &'static str, value: f64, min: f64) -> Result<f64, RequestError> {
    if !value.is_finite() || value < min {
        return Err(RequestError::OutOfRange { field, min, value });
    }
    Ok(value)
}

fn ensure_min_opt(field: &'static str, value: Option<f64>) -> Result<Option<f64>, RequestError> {
    value.map(|v| ensure_min(field, v, 0.0)).transpose()
}

impl YieldRequest {
    pub fn margin_overrides(&self) -> Result<MarginOverrides, RequestError> {
        Ok(MarginOverrides {
            top: ensure_min_opt("margin_top_mm", self.margin_top_mm)?,
            bottom: ensure_min_opt("margin_bottom_mm", self.margin_bottom_mm)?,
            left: ensure_min_opt("margin_left_mm", self.margin_left_mm)?,
            right: ensure_min_opt("margin_right_mm", self.margin_right_mm)?,
        })
    }

    pub fn into_specs(&self, catalog: &ProfileCatalog) -> Result<(SheetSpec, ItemSpec), RequestError> {
        let referenced = match self.printer_profile_id {
            Some(id) => match catalog.get(id) {
                Some(profile) => Some(profile),
                None => {
                    tracing::warn!(profile = id, "request references unknown printer profile");
                    return Err(RequestError::UnknownProfile(id));
                }
            },
            None => None,
        };
        let margins = resolve_margins(self.margin_overrides()?, referenced, catalog.tenant_default());
        margins.validate()?;

        let sheet = match self.sheet_type {
            SheetType::A4 => SheetSpec::standard(StandardSize::A4, margins),
            SheetType::A3 => SheetSpec::standard(StandardSize::A3, margins),
            SheetType::Custom => {
                let width = self.width_mm.ok_or(RequestError::MissingDimension("width_mm"))?;
                let height = self.height_mm.ok_or(RequestError::MissingDimension("height_mm"))?;
                SheetSpec::custom(
                    ensure_min("width_mm", width, MIN_CUSTOM_SIDE_MM)?,
                    ensure_min("height_mm", height, MIN_CUSTOM_SIDE_MM)?,
                    margins,
                )?
            }
        };

        let size = Dimension::new(
            ensure_min("item_width_mm", self.item_width_mm, MIN_ITEM_SIDE_MM)?,
            ensure_min("item_height_mm", self.item_height_mm, MIN_ITEM_SIDE_MM)?,
        );
        let item = ItemSpec::new(size)
            .with_bleed(ensure_min_opt("bleed_mm", self.bleed_mm)?.unwrap_or(0.0))
            .with_spacing(ensure_min_opt("spacing_mm", self.spacing_mm)?.unwrap_or(0.0));
        item.validate()?;

        Ok((sheet, item))
    }
}

/// Resolves margins, runs the optimizer and maps the winning grid.
pub fn compute_for_request(
    req: &YieldRequest,
    catalog: &ProfileCatalog,
) -> Result<YieldResponse, RequestError> {
    let (sheet, item) = req.into_specs(catalog)?;
    let report = compute_yield(sheet, item)?;
    Ok(YieldResponse::from(&report))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

impl NumberOrString {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("invalid number '{}'", s))),
        }
    }
}

/// Accepts `12.5` as well as `"12.5"`.
pub fn deserialize_f64_from_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrString::deserialize(deserializer)?.into_f64()
}

pub fn deserialize_opt_f64_from_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        Some(NumberOrString::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => value.into_f64().map(Some),
        None => Ok(None),
    }
}
