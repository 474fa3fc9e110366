use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::{GrayImage, imageops};

use crate::config::{AsciiConfig, ScoringPolicy};
use crate::error::Result;
use crate::index::DensityIndex;
use crate::render::{AsciiRenderer, Stage};

/// Decode an image file into an 8-bit grayscale intensity matrix
pub fn load_intensity_matrix(path: &Path) -> Result<GrayImage> {
    let img = image::open(path)?.to_luma8();
    log::debug!(
        "stage: {} ({}x{} from {})",
        Stage::Loaded,
        img.width(),
        img.height(),
        path.display()
    );
    Ok(img)
}

/// Resize so the height becomes `target_height`, keeping the aspect ratio
///
/// # Arguments
/// * `input` - The grayscale image to resize
/// * `target_height` - Height of the result
///
/// # Returns
/// The resized image, and `false` when the input is returned as an unchanged
/// copy because it is already `target_height` tall or has no pixels
///
/// # Note
/// Width is scaled by the same factor and rounded, never below 1. Shrinking
/// averages every source pixel into the target pixel covering it; growing
/// uses linear interpolation.
pub fn resize_to_height(input: &GrayImage, target_height: u32) -> (GrayImage, bool) {
    let (width, height) = input.dimensions();

    if height == target_height || width == 0 || height == 0 {
        return (input.clone(), false);
    }

    let scale = target_height as f64 / height as f64;
    let target_width = ((width as f64 * scale).round() as u32).max(1);

    let resized = if target_height < height {
        imageops::thumbnail(input, target_width, target_height)
    } else {
        imageops::resize(
            input,
            target_width,
            target_height,
            imageops::FilterType::Triangle,
        )
    };
    (resized, true)
}

/// Converts an image file to a text file
///
/// This runs the whole conversion:
/// 1. Load and sort the density table
/// 2. Decode the image to grayscale
/// 3. Resize to `config.target_height`, if set
/// 4. Binarize (relative policy only)
/// 5. Scan cells and write one character per cell
///
/// # Arguments
/// * `input` - Image to convert
/// * `output` - Text file to write, replaced if it exists
/// * `policy` - Cell scoring policy
/// * `table` - Density table file
/// * `config` - Pipeline constants
///
/// # Note
/// The output file is only created once the table and the image have both
/// loaded, so a failed load leaves nothing behind.
pub fn convert(
    input: &Path,
    output: &Path,
    policy: ScoringPolicy,
    table: &Path,
    config: &AsciiConfig,
) -> Result<()> {
    let index = DensityIndex::load(table)?;
    let renderer = AsciiRenderer::new(index, policy, config.clone())?;

    let mut img = load_intensity_matrix(input)?;

    if let Some(target_height) = config.target_height {
        let (resized, was_resized) = resize_to_height(&img, target_height);
        if was_resized {
            log::debug!(
                "stage: {} ({}x{})",
                Stage::Resized,
                resized.width(),
                resized.height()
            );
        }
        img = resized;
    }

    let mut out = BufWriter::new(File::create(output)?);
    renderer.render_to(img, &mut out)?;
    log::info!("wrote {} ({} policy)", output.display(), policy);
    Ok(())
}
