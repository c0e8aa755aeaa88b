use clap::Parser;
use sheet_yield::render;
use sheet_yield::request::{MIN_ITEM_SIDE_MM, YieldResponse};
use sheet_yield::sheet::{SheetSpec, StandardSize};
use sheet_yield::solver::compute_yield;
use sheet_yield::types::{Dimension, ItemSpec, Margins};

#[derive(Parser)]
#[command(
    name = "sheet_yield",
    about = "How many copies of an item fit on a print sheet"
)]
struct Cli {
    /// Sheet: A4, A3 or custom WxH in mm (e.g. 320x450)
    #[arg(long, default_value = "A4")]
    sheet: String,

    /// Item size WxH in mm (e.g. 90x50)
    #[arg(long)]
    item: String,

    /// Margin applied to every edge, in mm
    #[arg(long, default_value_t = 0.0)]
    margin: f64,

    /// Top margin in mm (overrides --margin)
    #[arg(long)]
    margin_top: Option<f64>,

    /// Bottom margin in mm (overrides --margin)
    #[arg(long)]
    margin_bottom: Option<f64>,

    /// Left margin in mm (overrides --margin)
    #[arg(long)]
    margin_left: Option<f64>,

    /// Right margin in mm (overrides --margin)
    #[arg(long)]
    margin_right: Option<f64>,

    /// Bleed added to every edge of the item, in mm
    #[arg(long, default_value_t = 0.0)]
    bleed: f64,

    /// Gap between neighbouring items, in mm
    #[arg(long, default_value_t = 0.0)]
    spacing: f64,

    /// Show ASCII layout of the sheet
    #[arg(long)]
    layout: bool,

    /// Print the response payload as JSON
    #[arg(long)]
    json: bool,

    /// Log optimizer decisions to stderr
    #[arg(long)]
    verbose: bool,
}

fn parse_dimensions(s: &str) -> Result<Dimension, String> {
    let parts: Vec<&str> = s.split(['x', 'X']).collect();
    if parts.len() != 2 {
        return Err(format!("invalid dimensions '{}', expected WxH", s));
    }
    let width = parts[0]
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid width in '{}'", s))?;
    let height = parts[1]
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid height in '{}'", s))?;
    Ok(Dimension::new(width, height))
}

fn parse_sheet(s: &str, margins: Margins) -> Result<SheetSpec, String> {
    if let Ok(size) = s.parse::<StandardSize>() {
        return Ok(SheetSpec::standard(size, margins));
    }
    let size = parse_dimensions(s)?;
    SheetSpec::custom(size.width, size.height, margins).map_err(|e| e.to_string())
}

fn run(cli: &Cli) -> Result<(), String> {
    let margins = Margins::new(
        cli.margin_top.unwrap_or(cli.margin),
        cli.margin_bottom.unwrap_or(cli.margin),
        cli.margin_left.unwrap_or(cli.margin),
        cli.margin_right.unwrap_or(cli.margin),
    );
    let sheet = parse_sheet(&cli.sheet, margins)?;
    let size = parse_dimensions(&cli.item)?;
    size.ensure_at_least(MIN_ITEM_SIDE_MM, "item size")
        .map_err(|e| e.to_string())?;
    let item = ItemSpec::new(size)
        .with_bleed(cli.bleed)
        .with_spacing(cli.spacing);

    let report = compute_yield(sheet, item).map_err(|e| e.to_string())?;

    if cli.json {
        let body = serde_json::to_string_pretty(&YieldResponse::from(&report))
            .map_err(|e| e.to_string())?;
        println!("{}", body);
        return Ok(());
    }

    let p = &report.packing;
    println!(
        "Usable area: {:.2} x {:.2} mm",
        report.usable_area.width, report.usable_area.height
    );
    println!(
        "Item footprint: {} mm ({})",
        report.placed_size(),
        p.orientation
    );
    println!("Grid: {} columns x {} rows", p.columns, p.rows);
    println!(
        "Occupied: {:.2} x {:.2} mm, leftover {:.2} x {:.2} mm",
        p.occupied_width_mm, p.occupied_height_mm, p.leftover_width_mm, p.leftover_height_mm
    );
    if cli.layout {
        print!("{}", render::render_layout(&report));
    }
    println!();

    if report.is_feasible() {
        println!(
            "Summary: {} cop{} per sheet, {:.2}% waste",
            p.quantity,
            if p.quantity == 1 { "y" } else { "ies" },
            report.waste_percentage,
        );
    } else {
        println!("Summary: item does not fit on this sheet in either orientation");
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dimensions() {
        assert_eq!(parse_dimensions("90x50"), Ok(Dimension::new(90.0, 50.0)));
        assert_eq!(parse_dimensions("85.5X54"), Ok(Dimension::new(85.5, 54.0)));
        assert!(parse_dimensions("90").is_err());
        assert!(parse_dimensions("axb").is_err());
    }

    #[test]
    fn test_parse_sheet() {
        let m = Margins::default();
        assert_eq!(
            parse_sheet("a3", m).unwrap(),
            SheetSpec::standard(StandardSize::A3, m)
        );
        assert!(parse_sheet("320x450", m).is_ok());
        assert!(parse_sheet("0x450", m).is_err());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "sheet_yield",
            "--sheet",
            "A4",
            "--item",
            "70x99",
            "--margin",
            "2",
            "--margin-top",
            "0",
        ]);
        assert_eq!(cli.margin_top, Some(0.0));
        assert!(run(&cli).is_ok());
    }

    #[test]
    fn test_item_below_minimum_rejected() {
        let cli = Cli::parse_from(["sheet_yield", "--item", "0.001x0.001", "--layout"]);
        let err = run(&cli).unwrap_err();
        assert!(err.contains("item size"), "{err}");
    }
}
