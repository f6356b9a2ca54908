//! In-process backend built on resvg and the image crate.
//!
//! Useful where `rsvg-convert` and ImageMagick are not installed. It renders
//! the same catalog, though anti-aliasing differs slightly from the external
//! tools.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, Rgba, RgbaImage};
use palette::Srgb;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use super::Rasterizer;
use crate::catalog::SizePx;
use crate::error::{Error, Result};

/// Renders with resvg, encodes with the image crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Builtin;

impl Builtin {
    pub fn new() -> Self {
        Self
    }
}

impl Rasterizer for Builtin {
    fn name(&self) -> &str {
        "builtin"
    }

    fn preflight(&self) -> Result<()> {
        Ok(())
    }

    fn rasterize(&self, svg: &Path, size: SizePx, out: &Path) -> Result<()> {
        let svg_data = fs::read_to_string(svg)?;
        let image = render_svg(&svg_data, size, svg.parent())?;
        image.save(out)?;
        Ok(())
    }

    fn bundle(&self, pngs: &[&Path], out: &Path) -> Result<()> {
        let frames = pngs
            .iter()
            .map(|png| {
                let image = image::open(png)?.to_rgba8();
                IcoFrame::as_png(
                    image.as_raw(),
                    image.width(),
                    image.height(),
                    ExtendedColorType::Rgba8,
                )
            })
            .collect::<image::ImageResult<Vec<_>>>()?;

        let writer = BufWriter::new(File::create(out)?);
        IcoEncoder::new(writer).encode_images(&frames)?;
        Ok(())
    }

    fn compose(
        &self,
        foreground: &Path,
        canvas: SizePx,
        background: &str,
        out: &Path,
    ) -> Result<()> {
        let foreground = image::open(foreground)?.to_rgba8();
        let mut base = RgbaImage::from_pixel(canvas.width, canvas.height, parse_color(background)?);

        let x = (canvas.width as i32 - foreground.width() as i32) / 2;
        let y = (canvas.height as i32 - foreground.height() as i32) / 2;
        composite_over(&mut base, &foreground, x, y);

        base.save(out)?;
        Ok(())
    }

    fn flatten(&self, image: &Path, background: &str, quality: u8, out: &Path) -> Result<()> {
        let source = image::open(image)?.to_rgba8();
        let Rgba([r, g, b, _]) = parse_color(background)?;
        let mut base = RgbaImage::from_pixel(source.width(), source.height(), Rgba([r, g, b, 255]));
        composite_over(&mut base, &source, 0, 0);

        let rgb = DynamicImage::ImageRgba8(base).to_rgb8();
        let mut writer = BufWriter::new(File::create(out)?);
        JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100)).encode_image(&rgb)?;
        Ok(())
    }
}

// ============================================================================
// Colors
// ============================================================================

/// Parses a background color: `#rgb`, `#rrggbb`, a CSS color name, or
/// `none`/`transparent`.
pub fn parse_color(color: &str) -> Result<Rgba<u8>> {
    let color = color.trim();
    if color.eq_ignore_ascii_case("none") || color.eq_ignore_ascii_case("transparent") {
        return Ok(Rgba([0, 0, 0, 0]));
    }

    let parsed: Option<Srgb<u8>> = palette::named::from_str(&color.to_ascii_lowercase())
        .or_else(|| color.parse::<Srgb<u8>>().ok());

    parsed
        .map(|rgb| Rgba([rgb.red, rgb.green, rgb.blue, 255]))
        .ok_or_else(|| Error::Render(format!("unsupported background color `{color}`")))
}

// ============================================================================
// SVG Rendering
// ============================================================================

/// Renders SVG markup to an RGBA image of exactly `size` pixels.
///
/// The drawing is scaled to fit while preserving its aspect ratio and is
/// centered on a transparent canvas. `resources_dir` resolves relative
/// references inside the document.
pub fn render_svg(svg_data: &str, size: SizePx, resources_dir: Option<&Path>) -> Result<RgbaImage> {
    let opts = Options {
        resources_dir: resources_dir.map(Path::to_path_buf),
        ..Options::default()
    };
    let tree = Tree::from_str(svg_data, &opts).map_err(|err| Error::Render(err.to_string()))?;

    // Calculate scale to fit within the target size
    let svg_size = tree.size();
    let scale = (size.width as f32 / svg_size.width()).min(size.height as f32 / svg_size.height());
    let offset_x = (size.width as f32 - svg_size.width() * scale) / 2.0;
    let offset_y = (size.height as f32 - svg_size.height() * scale) / 2.0;

    let mut pixmap = Pixmap::new(size.width, size.height)
        .ok_or_else(|| Error::Render(format!("cannot allocate a {size} canvas")))?;
    let transform = Transform::from_row(scale, 0.0, 0.0, scale, offset_x, offset_y);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let height = pixmap.height();

    // tiny_skia uses premultiplied alpha, we need to unpremultiply
    RgbaImage::from_fn(width, height, |x, y| {
        pixmap
            .pixel(x, y)
            .map(|p| Rgba(unpremultiply(p.red(), p.green(), p.blue(), p.alpha())))
            .unwrap_or(Rgba([0, 0, 0, 0]))
    })
}

/// Unpremultiplies a premultiplied alpha pixel.
fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> [u8; 4] {
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let a_f = a as f32 / 255.0;
    let channel = |c: u8| (c as f32 / a_f).round().min(255.0) as u8;
    [channel(r), channel(g), channel(b), a]
}

// ============================================================================
// Compositing
// ============================================================================

/// Draws `src` over `dest` with its top-left corner at (`x`, `y`).
///
/// Source-over blending on straight (non-premultiplied) alpha. Parts of `src`
/// outside `dest` are clipped.
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let (width, height) = dest.dimensions();

    for (sx, sy, &Rgba(top)) in src.enumerate_pixels() {
        let (Ok(dx), Ok(dy)) = (u32::try_from(x + sx as i32), u32::try_from(y + sy as i32)) else {
            continue;
        };
        if dx >= width || dy >= height {
            continue;
        }

        let Rgba(bottom) = *dest.get_pixel(dx, dy);
        let top_alpha = f32::from(top[3]) / 255.0;
        let bottom_alpha = f32::from(bottom[3]) / 255.0 * (1.0 - top_alpha);
        let alpha = top_alpha + bottom_alpha;

        let blended = if alpha <= 0.0 {
            [0; 4]
        } else {
            let channel = |i: usize| {
                let mixed = f32::from(top[i]) * top_alpha + f32::from(bottom[i]) * bottom_alpha;
                (mixed / alpha).round() as u8
            };
            [channel(0), channel(1), channel(2), (alpha * 255.0).round() as u8]
        };
        dest.put_pixel(dx, dy, Rgba(blended));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::Direction;
    use crate::paint::PaintAssignment;
    use crate::style::resolve;
    use crate::template::MasterTemplate;

    const SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100"><rect class="fill" width="100" height="100"/><style>.fill{fill:#ff0000}</style></svg>"##;

    fn red_logo() -> String {
        let fragment = resolve(&PaintAssignment::uniform("#ff0000"), Direction::Diagonal, None);
        MasterTemplate::bundled()
            .derive_themed(&fragment)
            .unwrap()
            .into_string()
    }

    #[test]
    fn render_fills_exact_size() {
        let img = render_svg(SQUARE_SVG, SizePx::new(40, 20), None).unwrap();
        assert_eq!(img.dimensions(), (40, 20));
        // Aspect ratio is kept, so the square sits in the middle.
        assert_eq!(img.get_pixel(0, 10)[3], 0);
        assert_eq!(img.get_pixel(20, 10).0, [255, 0, 0, 255]);
    }

    #[test]
    fn class_styles_are_honored() {
        let img = render_svg(&red_logo(), SizePx::square(64), None).unwrap();
        let reddish = img
            .pixels()
            .filter(|p| p[3] == 255 && p[0] > 200 && p[1] < 50 && p[2] < 50)
            .count();
        assert!(reddish > 0, "injected fill should reach the rendered pixels");
    }

    #[test]
    fn unparsable_svg_is_a_render_error() {
        let err = render_svg("<not-svg", SizePx::square(8), None).unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }

    #[test]
    fn colors_parse_from_hex_and_names() {
        assert_eq!(parse_color("#ffffff").unwrap(), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_color("#000").unwrap(), Rgba([0, 0, 0, 255]));
        assert_eq!(parse_color("White").unwrap(), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_color("transparent").unwrap(), Rgba([0, 0, 0, 0]));
        assert!(parse_color("#zzzzzz").is_err());
    }

    #[test]
    fn composite_simple() {
        let mut dest = RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]));
        let src = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]));

        composite_over(&mut dest, &src, 3, 3);

        assert_eq!(dest.get_pixel(5, 5).0, [0, 0, 255, 255]);
        assert_eq!(dest.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn translucent_source_mixes_with_destination() {
        let mut dest = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        let src = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 128]));

        composite_over(&mut dest, &src, 0, 0);

        assert_eq!(dest.get_pixel(0, 0).0, [128, 128, 128, 255]);
        assert_eq!(dest.get_pixel(1, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn transparent_over_transparent_stays_clear() {
        let mut dest = RgbaImage::new(1, 1);
        composite_over(&mut dest, &RgbaImage::new(1, 1), 0, 0);
        assert_eq!(dest.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn composite_clips_at_edges() {
        let mut dest = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let src = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));

        composite_over(&mut dest, &src, -2, 2);

        assert_eq!(dest.get_pixel(1, 3).0, [255, 255, 255, 255]);
        assert_eq!(dest.get_pixel(3, 3).0, [0, 0, 0, 255]);
        assert_eq!(dest.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn full_pipeline_writes_readable_files() {
        let dir = tempfile::tempdir().unwrap();
        let svg = dir.path().join("logo.svg");
        fs::write(&svg, red_logo()).unwrap();
        let backend = Builtin::new();
        backend.preflight().unwrap();

        let mut pngs = Vec::new();
        for edge in [16, 32] {
            let png = dir.path().join(format!("{edge}.png"));
            backend.rasterize(&svg, SizePx::square(edge), &png).unwrap();
            assert_eq!(image::open(&png).unwrap().width(), edge);
            pngs.push(png);
        }

        let ico = dir.path().join("favicon.ico");
        let refs: Vec<&Path> = pngs.iter().map(|p| p.as_path()).collect();
        backend.bundle(&refs, &ico).unwrap();
        // The decoder picks the largest entry.
        assert_eq!(image::open(&ico).unwrap().width(), 32);

        let canvas = dir.path().join("canvas.png");
        backend
            .compose(&pngs[0], SizePx::new(64, 32), "#0000ff", &canvas)
            .unwrap();
        let composed = image::open(&canvas).unwrap().to_rgba8();
        assert_eq!(composed.dimensions(), (64, 32));
        assert_eq!(composed.get_pixel(0, 0).0, [0, 0, 255, 255]);

        let jpg = dir.path().join("flat.jpg");
        backend.flatten(&canvas, "#ffffff", 80, &jpg).unwrap();
        assert_eq!(image::open(&jpg).unwrap().width(), 64);
    }
}
