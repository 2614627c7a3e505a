// Internal Dependencies ------------------------------------------------------
use super::quantize::Indexed;
use super::BitmapError;


// Constants ------------------------------------------------------------------
/// Byte offset of the line count marker inside the BMP file header.
///
/// The four bytes at offset 6 are reserved and unused by every known BMP
/// reader; the runtime renderer repurposes the first of them to learn how
/// many wrapped text lines a bitmap contains without any format change.
pub const LINE_COUNT_OFFSET: usize = 6;

const FILE_HEADER_SIZE: u32 = 14;
const INFO_HEADER_SIZE: u32 = 40;

// 72 DPI expressed in pixels per meter, the conventional resolution field
const PIXELS_PER_METER: u32 = 2835;


// BMP Encoding ---------------------------------------------------------------
/// Encodes an indexed image as a standard 8-bit paletted BMP
/// (BITMAPINFOHEADER, bottom-up rows, rows padded to four bytes).
pub fn encode(image: &Indexed) -> Vec<u8> {
    let stride = (image.width as usize + 3) & !3;
    let data_size = (stride * image.height as usize) as u32;
    let palette_size = image.palette.len() as u32 * 4;
    let data_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE + palette_size;
    let file_size = data_offset + data_size;

    let mut bytes = Vec::with_capacity(file_size as usize);

    // File header
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&data_offset.to_le_bytes());

    // Info header
    bytes.extend_from_slice(&INFO_HEADER_SIZE.to_le_bytes());
    bytes.extend_from_slice(&(image.width as i32).to_le_bytes());
    bytes.extend_from_slice(&(image.height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&8u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&data_size.to_le_bytes());
    bytes.extend_from_slice(&PIXELS_PER_METER.to_le_bytes());
    bytes.extend_from_slice(&PIXELS_PER_METER.to_le_bytes());
    bytes.extend_from_slice(&(image.palette.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    // Palette entries are stored as BGR0
    for color in &image.palette {
        bytes.extend_from_slice(&[color[2], color[1], color[0], 0]);
    }

    // Pixel rows, bottom-up
    for y in (0..image.height as usize).rev() {
        let row = &image.pixels[y * image.width as usize..(y + 1) * image.width as usize];
        bytes.extend_from_slice(row);
        bytes.resize(bytes.len() + stride - image.width as usize, 0);
    }
    bytes
}


// BMP Decoding ---------------------------------------------------------------
/// Decodes an 8-bit paletted BMP produced by `encode`, used by the final
/// width validation pass to re-open emitted bitmaps.
pub fn decode(bytes: &[u8]) -> Result<Indexed, BitmapError> {
    if bytes.len() < (FILE_HEADER_SIZE + INFO_HEADER_SIZE) as usize {
        return Err(BitmapError::MalformedBitmap("file shorter than headers".to_string()));
    }
    if &bytes[0..2] != b"BM" {
        return Err(BitmapError::MalformedBitmap("missing BM signature".to_string()));
    }

    let data_offset = read_u32(bytes, 10) as usize;
    let width = read_u32(bytes, 18) as i32;
    let height = read_u32(bytes, 22) as i32;
    let bit_count = u16::from_le_bytes([bytes[28], bytes[29]]);
    if bit_count != 8 {
        return Err(BitmapError::MalformedBitmap(format!(
            "expected 8 bits per pixel, found {}",
            bit_count
        )));
    }
    if width <= 0 || height <= 0 {
        return Err(BitmapError::MalformedBitmap("non-positive dimensions".to_string()));
    }
    let (width, height) = (width as usize, height as usize);

    let mut colors = read_u32(bytes, 46) as usize;
    if colors == 0 {
        colors = 256;
    }
    let palette_offset = (FILE_HEADER_SIZE + INFO_HEADER_SIZE) as usize;
    if palette_offset + colors * 4 > bytes.len() {
        return Err(BitmapError::MalformedBitmap("palette exceeds file size".to_string()));
    }
    let palette = (0..colors).map(|index| {
        let entry = &bytes[palette_offset + index * 4..];
        [entry[2], entry[1], entry[0]]

    }).collect();

    let stride = (width + 3) & !3;
    if data_offset + stride * height > bytes.len() {
        return Err(BitmapError::MalformedBitmap("pixel data exceeds file size".to_string()));
    }
    let mut pixels = vec![0; width * height];
    for y in 0..height {
        let row = &bytes[data_offset + (height - 1 - y) * stride..];
        pixels[y * width..(y + 1) * width].copy_from_slice(&row[..width]);
    }

    Ok(Indexed {
        width: width as u32,
        height: height as u32,
        palette,
        pixels
    })
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}


// Line Count Marker ----------------------------------------------------------
/// Overwrites the reserved header byte with the wrapped line count.
pub fn patch_line_count(bytes: &mut [u8], line_count: u8) {
    bytes[LINE_COUNT_OFFSET] = line_count;
}

/// Reads back the line count marker from an encoded bitmap.
pub fn line_count(bytes: &[u8]) -> Result<u8, BitmapError> {
    if bytes.len() <= LINE_COUNT_OFFSET || &bytes[0..2] != b"BM" {
        return Err(BitmapError::MalformedBitmap("missing BM signature".to_string()));
    }
    Ok(bytes[LINE_COUNT_OFFSET])
}


// Tests ----------------------------------------------------------------------
#[cfg(test)]
mod test {

    use super::super::quantize::Indexed;
    use super::{decode, encode, line_count, patch_line_count, LINE_COUNT_OFFSET};

    fn sample() -> Indexed {
        Indexed {
            width: 3,
            height: 2,
            palette: vec![[0, 0, 0], [255, 0, 0], [0, 255, 255]],
            pixels: vec![0, 1, 2, 2, 1, 0]
        }
    }

    #[test]
    fn test_round_trip() {
        let image = sample();
        let decoded = decode(&encode(&image)).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn test_row_padding() {
        let image = sample();
        let bytes = encode(&image);
        // 3px rows pad to 4 bytes: 14 + 40 + 3*4 + 2*4
        assert_eq!(bytes.len(), 14 + 40 + 12 + 8);
    }

    #[test]
    fn test_line_count_patch() {
        let mut bytes = encode(&sample());
        assert_eq!(line_count(&bytes).unwrap(), 0);

        patch_line_count(&mut bytes, 3);
        assert_eq!(bytes[LINE_COUNT_OFFSET], 3);
        assert_eq!(line_count(&bytes).unwrap(), 3);

        // The marker lives in a reserved byte and must not disturb decoding
        assert_eq!(decode(&bytes).unwrap(), sample());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(decode(b"not a bitmap").is_err());
        assert!(line_count(b"xx").is_err());
    }
}
