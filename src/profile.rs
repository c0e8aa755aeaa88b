//! Printer profiles and the margin fallback chain.
//!
//! Margins for a request are resolved per edge: an explicit request value,
//! else the referenced profile, else the tenant's default profile, else zero.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::Margins;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrinterProfile {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub margin_top_mm: f64,
    #[serde(default)]
    pub margin_bottom_mm: f64,
    #[serde(default)]
    pub margin_left_mm: f64,
    #[serde(default)]
    pub margin_right_mm: f64,
    #[serde(default)]
    pub is_default: bool,
}

impl PrinterProfile {
    pub fn margins(&self) -> Margins {
        Margins::new(
            self.margin_top_mm,
            self.margin_bottom_mm,
            self.margin_left_mm,
            self.margin_right_mm,
        )
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ProfileCatalog {
    profiles: Vec<PrinterProfile>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read printer profiles: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse printer profiles: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ProfileCatalog {
    pub fn new(profiles: Vec<PrinterProfile>) -> Self {
        let defaults = profiles.iter().filter(|p| p.is_default).count();
        if defaults > 1 {
            tracing::warn!(defaults, "several default printer profiles, using the first");
        }
        Self { profiles }
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let profiles: Vec<PrinterProfile> = serde_json::from_str(json)?;
        Ok(Self::new(profiles))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn get(&self, id: u64) -> Option<&PrinterProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn tenant_default(&self) -> Option<&PrinterProfile> {
        self.profiles.iter().find(|p| p.is_default)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Per-edge margins given directly on a request.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarginOverrides {
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

impl MarginOverrides {
    pub fn is_complete(&self) -> bool {
        self.top.is_some() && self.bottom.is_some() && self.left.is_some() && self.right.is_some()
    }
}

/// A referenced profile replaces the tenant default outright; the two are
/// never mixed edge by edge.
pub fn resolve_margins(
    overrides: MarginOverrides,
    referenced: Option<&PrinterProfile>,
    tenant_default: Option<&PrinterProfile>,
) -> Margins {
    let fallback = referenced
        .or(tenant_default)
        .map(PrinterProfile::margins)
        .unwrap_or_default();

    Margins::new(
        overrides.top.unwrap_or(fallback.top),
        overrides.bottom.unwrap_or(fallback.bottom),
        overrides.left.unwrap_or(fallback.left),
        overrides.right.unwrap_or(fallback.right),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        {"id": 1, "name": "Laser", "margin_top_mm": 5, "margin_bottom_mm": 5,
         "margin_left_mm": 4, "margin_right_mm": 4},
        {"id": 2, "name": "Offset", "margin_top_mm": 10, "margin_bottom_mm": 12,
         "margin_left_mm": 8, "margin_right_mm": 8, "is_default": true}
    ]"#;

    #[test]
    fn test_parse_catalog() {
        let catalog = ProfileCatalog::from_json_str(CATALOG).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).unwrap().name, "Laser");
        assert!(catalog.get(3).is_none());
        assert_eq!(catalog.tenant_default().unwrap().id, 2);
    }

    #[test]
    fn test_first_default_wins() {
        let catalog = ProfileCatalog::from_json_str(
            r#"[{"id": 4, "name": "A", "is_default": true},
                {"id": 5, "name": "B", "is_default": true}]"#,
        )
        .unwrap();
        assert_eq!(catalog.tenant_default().map(|p| p.id), Some(4));
    }

    #[test]
    fn test_bad_catalog() {
        assert!(matches!(
            ProfileCatalog::from_json_str("{\"id\": 1}"),
            Err(CatalogError::Parse(_))
        ));
        assert!(matches!(
            ProfileCatalog::load("/nonexistent/profiles.json"),
            Err(CatalogError::Io(_))
        ));
    }

    #[test]
    fn test_explicit_margins_win() {
        let catalog = ProfileCatalog::from_json_str(CATALOG).unwrap();
        let overrides = MarginOverrides {
            top: Some(1.0),
            bottom: Some(2.0),
            left: Some(3.0),
            right: Some(4.0),
        };
        assert!(overrides.is_complete());
        let m = resolve_margins(overrides, catalog.get(1), catalog.tenant_default());
        assert_eq!(m, Margins::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn test_referenced_profile_beats_default() {
        let catalog = ProfileCatalog::from_json_str(CATALOG).unwrap();
        let overrides = MarginOverrides {
            top: Some(0.0),
            ..Default::default()
        };
        let m = resolve_margins(overrides, catalog.get(1), catalog.tenant_default());
        assert_eq!(m, Margins::new(0.0, 5.0, 4.0, 4.0));
    }

    #[test]
    fn test_tenant_default_then_zero() {
        let catalog = ProfileCatalog::from_json_str(CATALOG).unwrap();
        let m = resolve_margins(MarginOverrides::default(), None, catalog.tenant_default());
        assert_eq!(m, Margins::new(10.0, 12.0, 8.0, 8.0));

        let m = resolve_margins(MarginOverrides::default(), None, None);
        assert_eq!(m, Margins::default());
    }
}
