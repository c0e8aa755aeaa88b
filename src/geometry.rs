//! Millimeter rectangle math shared by the packer and the optimizer.

use crate::error::GeometryError;
use crate::sheet::SheetSpec;
use crate::types::{Dimension, ItemSpec};

/// Sheet area left after margins.
pub type UsableArea = Dimension;

/// Item footprint including bleed on all four edges.
pub fn effective_item_size(item: &ItemSpec) -> Dimension {
    Dimension::new(
        item.size.width + 2.0 * item.bleed_mm,
        item.size.height + 2.0 * item.bleed_mm,
    )
}

pub fn usable_area(sheet: &SheetSpec) -> Result<UsableArea, GeometryError> {
    let size = sheet.resolve_size()?;
    sheet.margins.validate()?;

    let width = size.width - sheet.margins.left - sheet.margins.right;
    let height = size.height - sheet.margins.top - sheet.margins.bottom;
    if width <= 0.0 || height <= 0.0 {
        return Err(GeometryError::NonPositiveArea { width, height });
    }
    Ok(Dimension::new(width, height))
}
