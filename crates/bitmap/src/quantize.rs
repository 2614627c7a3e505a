// STD Dependencies -----------------------------------------------------------
use std::collections::BTreeMap;


// External Dependencies ------------------------------------------------------
use image::RgbImage;


// Constants ------------------------------------------------------------------
/// Effective DPI thresholds at which body text earns an additional palette
/// color, ranging from 2 colors below the first band up to 7 at the last.
const DPI_COLOR_BANDS: [u32; 5] = [64, 72, 80, 96, 112];


// Indexed Image --------------------------------------------------------------
/// A palette mapped image: one byte per pixel indexing into `palette`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indexed {
    pub width: u32,
    pub height: u32,
    pub palette: Vec<[u8; 3]>,
    pub pixels: Vec<u8>
}


// Color Budget ---------------------------------------------------------------
/// The palette budget for body text rendered at the given effective DPI,
/// capped by the board color budget. Lower DPI text has fewer shades of
/// anti-aliasing worth keeping.
pub fn text_color_budget(dpi: u32, board_max: u32) -> u32 {
    let banded = 2 + DPI_COLOR_BANDS.iter().filter(|&&band| dpi >= band).count() as u32;
    banded.min(board_max).max(2)
}


// Adaptive Palette Quantization ----------------------------------------------
/// Quantizes an RGB image into an adaptive palette of at most `max_colors`
/// entries using median cut over the histogram of distinct colors.
pub fn quantize(image: &RgbImage, max_colors: usize) -> Indexed {
    let max_colors = max_colors.clamp(1, 256);

    // Histogram over distinct colors; BTreeMap keeps the color order stable
    // so repeated runs produce identical palettes.
    let mut histogram: BTreeMap<[u8; 3], u32> = BTreeMap::new();
    for pixel in image.pixels() {
        *histogram.entry(pixel.0).or_insert(0) += 1;
    }

    let palette = if histogram.len() <= max_colors {
        histogram.keys().copied().collect()

    } else {
        median_cut(histogram.iter().map(|(&c, &n)| (c, n)).collect(), max_colors)
    };

    let pixels = image.pixels().map(|pixel| {
        nearest(&palette, pixel.0)

    }).collect();

    Indexed {
        width: image.width(),
        height: image.height(),
        palette,
        pixels
    }
}

fn median_cut(colors: Vec<([u8; 3], u32)>, max_colors: usize) -> Vec<[u8; 3]> {
    let mut buckets = vec![colors];
    while buckets.len() < max_colors {
        // Split the bucket with the widest channel range
        let widest = buckets
            .iter()
            .enumerate()
            .map(|(index, bucket)| {
                let (channel, range) = widest_channel(bucket);
                (range, index, channel)
            })
            .max();

        match widest {
            Some((range, index, channel)) if range > 0 => {
                let bucket = buckets.swap_remove(index);
                let (a, b) = split_bucket(bucket, channel);
                buckets.push(a);
                buckets.push(b);
            },
            // Every remaining bucket is a single color
            _ => break
        }
    }

    let mut palette: Vec<[u8; 3]> = buckets.into_iter().map(|bucket| {
        average(&bucket)

    }).collect();
    palette.sort();
    palette.dedup();
    palette
}

fn widest_channel(bucket: &[([u8; 3], u32)]) -> (usize, u8) {
    let mut best = (0, 0);
    for channel in 0..3 {
        let min = bucket.iter().map(|(c, _)| c[channel]).min().unwrap_or(0);
        let max = bucket.iter().map(|(c, _)| c[channel]).max().unwrap_or(0);
        if max - min > best.1 {
            best = (channel, max - min);
        }
    }
    best
}

fn split_bucket(mut bucket: Vec<([u8; 3], u32)>, channel: usize) -> (Vec<([u8; 3], u32)>, Vec<([u8; 3], u32)>) {
    bucket.sort_by_key(|(color, _)| color[channel]);
    let total: u64 = bucket.iter().map(|(_, n)| u64::from(*n)).sum();

    // Split at the weighted median, always leaving at least one color on
    // each side.
    let mut weight = 0;
    let mut split = 1;
    for (index, (_, count)) in bucket.iter().enumerate() {
        weight += u64::from(*count);
        if weight * 2 >= total && index + 1 < bucket.len() {
            split = index + 1;
            break;
        }
    }
    let rest = bucket.split_off(split);
    (bucket, rest)
}

fn average(bucket: &[([u8; 3], u32)]) -> [u8; 3] {
    let total: u64 = bucket.iter().map(|(_, n)| u64::from(*n)).sum::<u64>().max(1);
    let mut sums = [0u64; 3];
    for (color, count) in bucket {
        for channel in 0..3 {
            sums[channel] += u64::from(color[channel]) * u64::from(*count);
        }
    }
    [
        ((sums[0] + total / 2) / total) as u8,
        ((sums[1] + total / 2) / total) as u8,
        ((sums[2] + total / 2) / total) as u8
    ]
}

fn nearest(palette: &[[u8; 3]], color: [u8; 3]) -> u8 {
    let mut best = (0, u32::MAX);
    for (index, entry) in palette.iter().enumerate() {
        let mut distance = 0;
        for channel in 0..3 {
            let d = i32::from(entry[channel]) - i32::from(color[channel]);
            distance += (d * d) as u32;
        }
        if distance < best.1 {
            best = (index, distance);
        }
    }
    best.0 as u8
}


// Tests ----------------------------------------------------------------------
#[cfg(test)]
mod test {

    use image::{Rgb, RgbImage};

    use super::{quantize, text_color_budget};

    #[test]
    fn test_exact_colors_kept() {
        let mut image = RgbImage::from_pixel(4, 1, Rgb([0, 0, 0]));
        image.put_pixel(1, 0, Rgb([255, 255, 255]));
        image.put_pixel(2, 0, Rgb([255, 0, 0]));

        let indexed = quantize(&image, 128);
        assert_eq!(indexed.palette.len(), 3);
        // Every pixel maps back to its own color
        for (pixel, index) in image.pixels().zip(indexed.pixels.iter()) {
            assert_eq!(indexed.palette[*index as usize], pixel.0);
        }
    }

    #[test]
    fn test_palette_capped() {
        // A 16x16 gradient with 256 distinct colors
        let image = RgbImage::from_fn(16, 16, |x, y| {
            Rgb([(x * 16 + y) as u8, x as u8, y as u8])
        });
        let indexed = quantize(&image, 7);
        assert!(indexed.palette.len() <= 7);
        assert!(indexed.pixels.iter().all(|&p| (p as usize) < indexed.palette.len()));
    }

    #[test]
    fn test_deterministic() {
        let image = RgbImage::from_fn(8, 8, |x, y| {
            Rgb([(x * 31) as u8, (y * 29) as u8, ((x + y) * 13) as u8])
        });
        assert_eq!(quantize(&image, 5), quantize(&image, 5));
    }

    #[test]
    fn test_text_color_bands() {
        assert_eq!(text_color_budget(40, 128), 2);
        assert_eq!(text_color_budget(64, 128), 3);
        assert_eq!(text_color_budget(72, 128), 4);
        assert_eq!(text_color_budget(80, 128), 5);
        assert_eq!(text_color_budget(96, 128), 6);
        assert_eq!(text_color_budget(112, 128), 7);
        assert_eq!(text_color_budget(300, 128), 7);
        // Board budget caps the band value
        assert_eq!(text_color_budget(112, 5), 5);
        // But never below two colors
        assert_eq!(text_color_budget(112, 1), 2);
    }
}
