// Internal Dependencies ------------------------------------------------------
use super::BitmapError;


// Constants ------------------------------------------------------------------
/// Fixed point base for image sizes: 1000 corresponds to 100.0% of the
/// square drawing canvas. These values are kept in sync with the runtime
/// renderer to avoid additional runtime scaling, which makes images blurry.
pub const SCALE_BASE: u32 = 1000;


// Scale Descriptor -----------------------------------------------------------
/// Target size of an image in thousandths of the canvas size. An axis of 0
/// is derived from the source aspect ratio; at most one axis is normally
/// forced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale {
    pub x: u32,
    pub y: u32
}


// Board Drawing Geometry -----------------------------------------------------
/// Screen geometry of one board: the square drawing canvas and the panel
/// stretch correction used to pre-shrink images for displays whose physical
/// aspect ratio differs from their resolution.
#[derive(Debug, Clone)]
pub struct Geometry {
    canvas_px: u32,
    stretch: (u64, u64)
}

impl Geometry {

    pub fn new(screen: (u32, u32), panel: Option<(u32, u32)>) -> Result<Self, BitmapError> {
        let mut stretch = (1, 1);
        if let Some(panel) = panel {
            stretch = (
                u64::from(screen.0) * u64::from(panel.1),
                u64::from(screen.1) * u64::from(panel.0)
            );
            // Only shrink correction is supported. A stretch factor above 1
            // would expand images horizontally and the runtime renderer has
            // no counterpart for that.
            if stretch.0 > stretch.1 {
                return Err(BitmapError::StretchedPanel {
                    screen,
                    panel
                });
            }
        }
        Ok(Self {
            canvas_px: screen.0.min(screen.1),
            stretch
        })
    }

    /// The square drawing area, defined as the lesser of the screen axes.
    pub fn canvas_px(&self) -> u32 {
        self.canvas_px
    }

    /// Calculates the pixel size of an image scaled onto this geometry.
    ///
    /// This imitates the runtime renderer function of the same name. The
    /// forced axes are taken from `scale`, the free axis preserves the
    /// source aspect ratio and the horizontal result is then corrected by
    /// the panel stretch factor.
    pub fn calculate_dimension(
        &self,
        original: (u32, u32),
        scale: Scale

    ) -> Result<(u32, u32), BitmapError> {
        if scale.x == 0 && scale.y == 0 {
            return Err(BitmapError::InvalidScale(scale.x, scale.y));
        }

        let canvas = u64::from(self.canvas_px);
        let (org_width, org_height) = (u64::from(original.0), u64::from(original.1));

        let mut width = 0;
        let mut height = 0;
        if scale.x > 0 {
            width = canvas * u64::from(scale.x) / u64::from(SCALE_BASE);
        }
        if scale.y > 0 {
            height = canvas * u64::from(scale.y) / u64::from(SCALE_BASE);
        }
        if scale.x == 0 {
            width = org_width * height / org_height;
        }
        if scale.y == 0 {
            height = org_height * width / org_width;
        }

        width = width * self.stretch.0 / self.stretch.1;

        if width == 0 || height == 0 {
            return Err(BitmapError::ZeroDimension {
                scale: (scale.x, scale.y),
                size: original
            });
        }
        Ok((width as u32, height as u32))
    }

}


// Runtime Width Calculation --------------------------------------------------
/// The width in canvas pixels at which the runtime renderer will draw an
/// image of the given aspect ratio when scaling it to `height_scale`
/// thousandths of the canvas per line of text.
pub fn runtime_width_px(
    image_size: (u32, u32),
    height_scale: u32,
    line_count: u8,
    canvas_px: u32

) -> u32 {
    let height = u64::from(canvas_px)
        * u64::from(height_scale)
        * u64::from(line_count)
        / u64::from(SCALE_BASE);
    (u64::from(image_size.0) * height / u64::from(image_size.1)) as u32
}

/// A max_width style value converted into canvas pixels.
pub fn max_width_px(max_width: u32, canvas_px: u32) -> u32 {
    (u64::from(canvas_px) * u64::from(max_width) / u64::from(SCALE_BASE)) as u32
}
