use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// Tolerance used when comparing millimeter values.
pub const EPSILON_MM: f64 = 1e-6;

/// A width/height pair in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub width: f64,
    pub height: f64,
}

impl Dimension {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn rotated(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    pub fn is_square(&self) -> bool {
        (self.width - self.height).abs() <= EPSILON_MM
    }

    /// Rejects non-finite sides and sides below `min`.
    pub fn ensure_at_least(&self, min: f64, what: &'static str) -> Result<(), GeometryError> {
        for value in [self.width, self.height] {
            if !value.is_finite() || value < min || value <= 0.0 {
                return Err(GeometryError::InvalidDimension { what, value });
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Printer margins in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Margins {
    pub fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    pub fn uniform(mm: f64) -> Self {
        Self::new(mm, mm, mm, mm)
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        for value in [self.top, self.bottom, self.left, self.right] {
            if !value.is_finite() || value < 0.0 {
                return Err(GeometryError::InvalidDimension {
                    what: "margin",
                    value,
                });
            }
        }
        Ok(())
    }
}

/// One item to impose on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub size: Dimension,
    #[serde(default)]
    pub bleed_mm: f64,
    #[serde(default)]
    pub spacing_mm: f64,
}

impl ItemSpec {
    pub fn new(size: Dimension) -> Self {
        Self {
            size,
            bleed_mm: 0.0,
            spacing_mm: 0.0,
        }
    }

    pub fn with_bleed(self, bleed_mm: f64) -> Self {
        Self { bleed_mm, ..self }
    }

    pub fn with_spacing(self, spacing_mm: f64) -> Self {
        Self { spacing_mm, ..self }
    }

    pub fn validate(&self) -> Result<(), GeometryError> {
        self.size.ensure_at_least(0.0, "item size")?;
        for (what, value) in [("bleed", self.bleed_mm), ("spacing", self.spacing_mm)] {
            if !value.is_finite() || value < 0.0 {
                return Err(GeometryError::InvalidDimension { what, value });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Normal,
    Rotated,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Normal => Orientation::Rotated,
            Orientation::Rotated => Orientation::Normal,
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Normal => f.write_str("normal"),
            Orientation::Rotated => f.write_str("rotated"),
        }
    }
}

/// The grid obtained for one orientation of the item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PackingResult {
    pub orientation: Orientation,
    pub columns: u32,
    pub rows: u32,
    pub quantity: u64,
    pub occupied_width_mm: f64,
    pub occupied_height_mm: f64,
    pub leftover_width_mm: f64,
    pub leftover_height_mm: f64,
}

/// Position of one packed footprint, relative to the usable area's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YieldReport {
    pub packing: PackingResult,
    pub usable_area: Dimension,
    pub waste_percentage: f64,
    pub item_effective_size: Dimension,
    pub spacing_mm: f64,
}

impl YieldReport {
    pub fn quantity(&self) -> u64 {
        self.packing.quantity
    }

    pub fn orientation(&self) -> Orientation {
        self.packing.orientation
    }

    /// False when the item fits in neither orientation.
    pub fn is_feasible(&self) -> bool {
        self.packing.quantity > 0
    }

    /// Footprint size as packed, i.e. after applying the winning orientation.
    pub fn placed_size(&self) -> Dimension {
        match self.packing.orientation {
            Orientation::Normal => self.item_effective_size,
            Orientation::Rotated => self.item_effective_size.rotated(),
        }
    }

    /// Every footprint of the winning grid, row-major from the top-left.
    /// Lazy, since a grid of tiny items can hold billions of cells.
    pub fn placements(&self) -> impl Iterator<Item = Placement> + '_ {
        let size = self.placed_size();
        let pitch_x = size.width + self.spacing_mm;
        let pitch_y = size.height + self.spacing_mm;
        let columns = self.packing.columns;
        (0..self.packing.rows).flat_map(move |row| {
            (0..columns).map(move |col| Placement {
                x: col as f64 * pitch_x,
                y: row as f64 * pitch_y,
                width: size.width,
                height: size.height,
            })
        })
    }
}
