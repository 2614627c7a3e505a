// External Dependencies ------------------------------------------------------
use image::{DynamicImage, Rgb, RgbImage};


// Internal Dependencies ------------------------------------------------------
use super::BitmapError;


// Transparency Flattening ----------------------------------------------------
/// Composites a decoded source image onto an opaque canvas of the given
/// background color, using the alpha channel as a mask. Opaque sources pass
/// through converted to RGB. Source formats that cannot be represented as
/// 8-bit RGB abort the conversion.
pub fn flatten(image: DynamicImage, background: [u8; 3]) -> Result<RgbImage, BitmapError> {
    match image {
        DynamicImage::ImageRgb8(rgb) => Ok(rgb),
        DynamicImage::ImageLuma8(_) => Ok(image.to_rgb8()),
        DynamicImage::ImageRgba8(rgba) => {
            let mut target = RgbImage::from_pixel(
                rgba.width(),
                rgba.height(),
                Rgb(background)
            );
            for (x, y, pixel) in rgba.enumerate_pixels() {
                let alpha = u16::from(pixel[3]);
                let mut out = [0; 3];
                for c in 0..3 {
                    let fg = u16::from(pixel[c]) * alpha;
                    let bg = u16::from(background[c]) * (255 - alpha);
                    out[c] = ((fg + bg + 127) / 255) as u8;
                }
                target.put_pixel(x, y, Rgb(out));
            }
            Ok(target)
        },
        DynamicImage::ImageLumaA8(_) => {
            flatten(DynamicImage::ImageRgba8(image.to_rgba8()), background)
        },
        other => Err(BitmapError::UnsupportedFormat(format!("{:?}", other.color())))
    }
}


// Tests ----------------------------------------------------------------------
#[cfg(test)]
mod test {

    use image::{DynamicImage, Rgba, RgbaImage};

    use super::{flatten, BitmapError};

    #[test]
    fn test_opaque_passthrough() {
        let rgba = RgbaImage::from_pixel(2, 2, Rgba([10, 20, 30, 255]));
        let flat = flatten(DynamicImage::ImageRgba8(rgba), [255, 255, 255]).unwrap();
        assert_eq!(flat.get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[test]
    fn test_fully_transparent_becomes_background() {
        let rgba = RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 0]));
        let flat = flatten(DynamicImage::ImageRgba8(rgba), [200, 100, 50]).unwrap();
        assert_eq!(flat.get_pixel(0, 0).0, [200, 100, 50]);
    }

    #[test]
    fn test_half_transparent_blend() {
        let rgba = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128]));
        let flat = flatten(DynamicImage::ImageRgba8(rgba), [255, 255, 255]).unwrap();
        // 255 * 127 / 255 rounded
        assert_eq!(flat.get_pixel(0, 0).0, [127, 127, 127]);
    }

    #[test]
    fn test_wide_formats_rejected() {
        let image = DynamicImage::new_rgb16(2, 2);
        assert!(matches!(
            flatten(image, [255, 255, 255]),
            Err(BitmapError::UnsupportedFormat(_))
        ));
    }
}
