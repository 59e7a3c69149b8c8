use image::{DynamicImage, Pixel, Rgba, RgbaImage};

/// Default height in pixels of the translucent wall strip under the face.
pub const DEFAULT_WALL_HEIGHT: u32 = 50;

/// Alpha of the wall strip, out of 255.
const WALL_ALPHA: u8 = 80;

/// Skew a flat texture into an isometric top-face preview.
///
/// The canvas is `(w + h)` wide and `(w + h) / 2 + wall_height` tall. Source
/// pixels are visited in raster order and mapped through a 30 degree
/// projection; on collision the later pixel wins. Fully transparent source
/// pixels are skipped, and a translucent black strip is blended over the
/// bottom `wall_height` rows to fake a front wall.
pub fn project(image: &DynamicImage, wall_height: u32) -> RgbaImage {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let out_width = width + height;
    let out_height = (width + height) / 2 + wall_height;
    let mut canvas = RgbaImage::new(out_width, out_height);

    let cos30 = 30_f32.to_radians().cos();
    let sin30 = 30_f32.to_radians().sin();

    for (x, y, pixel) in rgba.enumerate_pixels() {
        if pixel.0[3] == 0 {
            continue;
        }
        let dest_x = ((x as f32 - y as f32) * cos30 + height as f32).round() as i64;
        let dest_y = ((x as f32 + y as f32) * sin30).round() as i64;
        // Rounding can push a corner pixel one row past the face when
        // width + height is odd.
        if (0..i64::from(out_width)).contains(&dest_x) && (0..i64::from(out_height)).contains(&dest_y)
        {
            canvas.put_pixel(dest_x as u32, dest_y as u32, *pixel);
        }
    }

    let wall = Rgba([0, 0, 0, WALL_ALPHA]);
    for y in out_height.saturating_sub(wall_height)..out_height {
        for x in 0..out_width {
            let mut blended = *canvas.get_pixel(x, y);
            blended.blend(&wall);
            canvas.put_pixel(x, y, blended);
        }
    }

    canvas
}
