//! # Output Module
//!
//! Writes the accumulated radiance buffer to disk. Presentation is a host
//! concern; this is what the command-line host uses in place of a window:
//! - PNG export with clamping and sRGB gamma (8-bit)
//! - EXR export of the linear HDR values

use std::path::Path;

use exr::prelude::write_rgb_file;
use image::{ImageBuffer, Rgb};
use log::{info, warn};

use toypath::{Color, Error};

/// sRGB transfer function with the linear toe for very dark values.
fn linear_to_gamma(linear: f32) -> f32 {
    if linear <= 0.0 {
        0.0
    } else if linear <= 0.0031308 {
        12.92 * linear
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// Quantize one linear channel to 8 bits.
fn to_u8(linear: f32) -> u8 {
    (linear_to_gamma(linear.clamp(0.0, 1.0)) * 255.0).round() as u8
}

/// Save a row-major radiance buffer as an 8-bit sRGB PNG.
///
/// Values outside [0, 1] are clamped; NaN maps to black.
pub fn save_image_as_png(pixels: &[Color], output_path: &str, width: u32, height: u32) -> Result<(), Error> {
    let u8_image: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(width, height, |x, y| {
        let pixel = pixels[(y * width + x) as usize];
        Rgb([to_u8(pixel.x), to_u8(pixel.y), to_u8(pixel.z)])
    });

    match u8_image.save(output_path) {
        Ok(_) => {
            info!("Image saved as {}", output_path);
            Ok(())
        }
        Err(e) => {
            warn!("Failed to save image: {}", e);
            Err(Error::Output { path: output_path.to_string(), reason: e.to_string() })
        }
    }
}

/// Save a row-major radiance buffer as a linear 32-bit float EXR.
pub fn save_image_as_exr(pixels: &[Color], output_path: &str, width: u32, height: u32) -> Result<(), Error> {
    let width = width as usize;
    let result = write_rgb_file(output_path, width, height as usize, |x, y| {
        let pixel = pixels[y * width + x];
        (pixel.x, pixel.y, pixel.z)
    });

    match result {
        Ok(_) => {
            info!("HDR image saved as EXR: {}", output_path);
            Ok(())
        }
        Err(e) => {
            warn!("Failed to save EXR image: {}", e);
            Err(Error::Output { path: output_path.to_string(), reason: e.to_string() })
        }
    }
}

/// Pick the writer from the file extension.
pub fn save_image(pixels: &[Color], output_path: &str, width: u32, height: u32) -> Result<(), Error> {
    let extension = Path::new(output_path)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

    match extension.as_deref() {
        Some("exr") => save_image_as_exr(pixels, output_path, width, height),
        Some("png") => save_image_as_png(pixels, output_path, width, height),
        other => Err(Error::Output {
            path: output_path.to_string(),
            reason: format!(
                "unsupported extension '{}', only .png and .exr are supported",
                other.unwrap_or_default()
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3A;

    fn gradient(width: u32, height: u32) -> Vec<Color> {
        (0..width * height)
            .map(|i| Vec3A::new(i as f32 / (width * height) as f32, 0.5, 2.0))
            .collect()
    }

    #[test]
    fn gamma_curve_endpoints() {
        assert_eq!(to_u8(-1.0), 0);
        assert_eq!(to_u8(0.0), 0);
        assert_eq!(to_u8(1.0), 255);
        assert_eq!(to_u8(5.0), 255);
        assert_eq!(to_u8(f32::NAN), 0);
        // Mid grey is brightened by the sRGB curve
        assert!(to_u8(0.5) > 128);
    }

    #[test]
    fn writes_png_with_expected_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let path = path.to_str().unwrap();
        save_image(&gradient(6, 4), path, 6, 4).unwrap();

        let decoded = image::open(path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (6, 4));
        assert_eq!(decoded.get_pixel(0, 0)[2], 255);
    }

    #[test]
    fn writes_exr() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.exr");
        let path = path.to_str().unwrap();
        save_image(&gradient(5, 3), path, 5, 3).unwrap();
        assert!(std::fs::metadata(path).unwrap().len() > 0);
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = save_image(&gradient(2, 2), "frame.bmp", 2, 2).unwrap_err();
        assert!(matches!(err, Error::Output { .. }));
    }
}
