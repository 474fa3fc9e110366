/// Basic example: build a density table with the built-in font and draw a test image
///
/// This needs no font file and no input image
use ascdraw::{AsciiConfig, AsciiRenderer, BuiltinRasterizer, DensityIndex, DensityTable, ScoringPolicy};
use image::{GrayImage, Luma};

fn main() -> ascdraw::Result<()> {
    println!("ascdraw - Basic Example");
    println!("=======================\n");

    let report = DensityTable::build(&BuiltinRasterizer, 32..127);
    println!(
        "Scored {} glyphs ({} skipped)",
        report.table.len(),
        report.failures.len()
    );
    let index = DensityIndex::from_table(report.table)?;

    // 120x64 gradient with a bright disc in the middle
    let width = 120;
    let height = 64;
    let mut img = GrayImage::new(width, height);
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;

    for y in 0..height {
        for x in 0..width {
            let dx = x as f32 - center_x;
            let dy = (y as f32 - center_y) * 2.0;
            let value = if (dx * dx + dy * dy).sqrt() < 40.0 {
                255
            } else {
                (x * 255 / width) as u8
            };
            img.put_pixel(x, y, Luma([value]));
        }
    }

    let config = AsciiConfig {
        target_height: None,
        ..Default::default()
    };

    for policy in [ScoringPolicy::Mean, ScoringPolicy::Relative] {
        let renderer = AsciiRenderer::new(index.clone(), policy, config.clone())?;
        println!("\n{} policy:", policy);
        print!("{}", renderer.render_to_string(img.clone())?);
    }

    Ok(())
}
