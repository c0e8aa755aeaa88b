use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::types::{Dimension, Margins};

/// Smallest side accepted for a custom sheet, in millimeters.
pub const MIN_CUSTOM_SIDE_MM: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardSize {
    A4,
    A3,
}

impl StandardSize {
    pub fn dimensions(self) -> Dimension {
        match self {
            StandardSize::A4 => Dimension::new(210.0, 297.0),
            StandardSize::A3 => Dimension::new(297.0, 420.0),
        }
    }
}

impl std::str::FromStr for StandardSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A4" => Ok(StandardSize::A4),
            "A3" => Ok(StandardSize::A3),
            _ => Err(format!("unknown sheet size '{}', expected A4 or A3", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SheetKind {
    Standard(StandardSize),
    Custom(Dimension),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetSpec {
    pub kind: SheetKind,
    pub margins: Margins,
}

impl SheetSpec {
    pub fn standard(size: StandardSize, margins: Margins) -> Self {
        Self {
            kind: SheetKind::Standard(size),
            margins,
        }
    }

    pub fn custom(width: f64, height: f64, margins: Margins) -> Result<Self, GeometryError> {
        let size = Dimension::new(width, height);
        size.ensure_at_least(MIN_CUSTOM_SIDE_MM, "custom sheet size")?;
        Ok(Self {
            kind: SheetKind::Custom(size),
            margins,
        })
    }

    /// Physical size of the sheet. Custom sizes are re-checked since the
    /// variant can be built directly.
    pub fn resolve_size(&self) -> Result<Dimension, GeometryError> {
        match self.kind {
            SheetKind::Standard(size) => Ok(size.dimensions()),
            SheetKind::Custom(size) => {
                size.ensure_at_least(MIN_CUSTOM_SIDE_MM, "custom sheet size")?;
                Ok(size)
            }
        }
    }
}
