use image::{DynamicImage, Rgb, RgbaImage};

/// Default temperature sample point for foliage and grass tinting.
pub const DEFAULT_TEMPERATURE: u8 = 95;

/// Default humidity sample point.
pub const DEFAULT_HUMIDITY: u8 = 80;

/// Pick the tint for a (temperature, humidity) pair.
///
/// Temperature indexes columns and humidity rows; both clamp to the colormap
/// edge when it is smaller than the 0-255 slider range.
pub fn sample(colormap: &DynamicImage, temperature: u8, humidity: u8) -> Rgb<u8> {
    let rgb = colormap.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        // An empty colormap tints nothing.
        return Rgb([255, 255, 255]);
    }

    let x = u32::from(temperature).min(rgb.width() - 1);
    let y = u32::from(humidity).min(rgb.height() - 1);
    *rgb.get_pixel(x, y)
}

/// Multiply a grayscale texture by the sampled tint.
///
/// Each color channel becomes `texture * tint / 255`, rounded to nearest;
/// alpha passes through untouched.
pub fn apply(
    texture: &DynamicImage,
    colormap: &DynamicImage,
    temperature: u8,
    humidity: u8,
) -> RgbaImage {
    let tint = sample(colormap, temperature, humidity);
    tint_with(texture, tint)
}

/// Multiply a grayscale texture by an already-chosen tint color.
pub fn tint_with(texture: &DynamicImage, tint: Rgb<u8>) -> RgbaImage {
    let mut rgba = texture.to_rgba8();
    for pixel in rgba.pixels_mut() {
        for channel in 0..3 {
            let scaled = f32::from(pixel.0[channel]) * f32::from(tint.0[channel]) / 255.0;
            pixel.0[channel] = scaled.round().clamp(0.0, 255.0) as u8;
        }
    }
    rgba
}
