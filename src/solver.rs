use crate::error::GeometryError;
use crate::geometry::{UsableArea, effective_item_size, usable_area};
use crate::grid;
use crate::sheet::SheetSpec;
use crate::types::{ItemSpec, Orientation, PackingResult, YieldReport};

/// Chooses the better of the two axis-aligned grids for one item on one sheet.
pub struct Solver {
    sheet: SheetSpec,
    item: ItemSpec,
}

impl Solver {
    pub fn new(sheet: SheetSpec, item: ItemSpec) -> Self {
        Self { sheet, item }
    }

    pub fn solve(&self) -> Result<YieldReport, GeometryError> {
        self.item.validate()?;
        let usable = usable_area(&self.sheet)?;
        let footprint = effective_item_size(&self.item);
        let spacing = self.item.spacing_mm;

        let normal = grid::pack(&usable, footprint, spacing, Orientation::Normal)?;
        let rotated = grid::pack(&usable, footprint.rotated(), spacing, Orientation::Rotated)?;
        let best = Self::select(normal, rotated);

        tracing::debug!(
            square = footprint.is_square(),
            normal = normal.quantity,
            rotated = rotated.quantity,
            chosen = %best.orientation,
            "compared orientations"
        );

        Ok(YieldReport {
            packing: best,
            usable_area: usable,
            waste_percentage: waste_percentage(&usable, &best),
            item_effective_size: footprint,
            spacing_mm: spacing,
        })
    }

    /// Higher quantity wins; any tie, including zero yield in both, keeps
    /// the item as given.
    fn select(normal: PackingResult, rotated: PackingResult) -> PackingResult {
        if rotated.quantity > normal.quantity {
            rotated
        } else {
            normal
        }
    }
}

/// Single entry point used by the CLI and the HTTP layer.
pub fn compute_yield(sheet: SheetSpec, item: ItemSpec) -> Result<YieldReport, GeometryError> {
    Solver::new(sheet, item).solve()
}

fn waste_percentage(usable: &UsableArea, packing: &PackingResult) -> f64 {
    let total = usable.area();
    if total <= 0.0 {
        return 100.0;
    }
    let used = packing.occupied_width_mm * packing.occupied_height_mm;
    let percent = ((total - used) / total * 100.0).clamp(0.0, 100.0);
    (percent * 100.0).round() / 100.0
}
