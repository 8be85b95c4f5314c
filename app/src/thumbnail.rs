
use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageOutputFormat, Rgba, RgbaImage};

use gif_muxer::{GifError, GifResult, Thumbnailer};



const BLACK: Rgba<u8> = Rgba { data: [0x00, 0x00, 0x00, 0xFF] };
const WHITE: Rgba<u8> = Rgba { data: [0xFF, 0xFF, 0xFF, 0xFF] };


/// Square thumbnails framed like a strip of film
#[derive(Clone, Copy, Debug, Default)]
pub struct FilmStrip;


impl Thumbnailer for FilmStrip {
    fn square_gif(&self, still: &Path, size: u32, index: usize, count: usize) -> GifResult<Vec<u8>> {
        let source = image::open(still).map_err(upstream)?;
        let mut canvas = square(&source, size);
        draw_film_border(&mut canvas, index, count);

        let mut result = vec![];
        DynamicImage::ImageRgba8(canvas).write_to(&mut result, ImageOutputFormat::GIF).map_err(upstream)?;
        Ok(result)
    }
}


/// Crops the longer axis around the center and scales to `size`x`size`
pub fn square(source: &DynamicImage, size: u32) -> RgbaImage {
    let (width, height) = source.dimensions();
    let side = width.min(height);
    let cropped = source.clone().crop((width - side) / 2, (height - side) / 2, side, side);
    cropped.resize_exact(size, size, FilterType::Triangle).to_rgba()
}

/// Black bands on both sides with white sprocket holes that move down with `index`.
pub fn draw_film_border(canvas: &mut RgbaImage, index: usize, count: usize) {
    let size = i64::from(canvas.width());
    let band = size / 15;
    let hole = band * 2 / 3;
    let margin = (band - hole) / 2;

    fill_rect(canvas, 0, 0, band, size, BLACK);
    fill_rect(canvas, size - band, 0, size, size, BLACK);

    let step = size / count.max(1) as i64;
    let mut y = index as i64 - step;
    for _ in 0 .. count + 2 {
        fill_rect(canvas, margin, y, margin + hole, y + hole, WHITE);
        fill_rect(canvas, size - hole - margin, y, size - margin, y + hole, WHITE);
        y += step;
    }
}

/// Fills the inclusive rectangle, clipped to the canvas
fn fill_rect(canvas: &mut RgbaImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgba<u8>) {
    let (width, height) = (i64::from(canvas.width()), i64::from(canvas.height()));
    for y in y0.max(0) ..= y1.min(height - 1) {
        for x in x0.max(0) ..= x1.min(width - 1) {
            canvas.put_pixel(x as u32, y as u32, color);
        }
    }
}

fn upstream(error: image::ImageError) -> GifError {
    GifError::UpstreamFailure(error.to_string())
}
