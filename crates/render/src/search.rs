// Internal Dependencies ------------------------------------------------------
use super::RenderError;


// DPI Bisection --------------------------------------------------------------
/// Finds the largest integer DPI in `[1, ceiling]` whose one-line rendered
/// height does not exceed `budget` pixels. Rendered height is non-strictly
/// increasing in DPI.
///
/// Some fonts have a height floor: even DPI 1 renders taller than small
/// budgets. In that case the search instead minimizes the overshoot by
/// bisecting against the floor height, still preferring the largest DPI.
pub fn fit_dpi<F>(budget: u32, ceiling: u32, mut height_at: F) -> Result<u32, RenderError>
where F: FnMut(u32) -> Result<u32, RenderError> {

    let ceiling = ceiling.max(1);
    let floor_height = height_at(1)?;
    let target = floor_height.max(budget);

    let mut lo = 1;
    let mut hi = ceiling;
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if height_at(mid)? <= target {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Ok(lo)
}


// Width Parameter Bisection --------------------------------------------------
/// Finds the maximal width parameter whose rendered runtime width does not
/// exceed `budget` pixels, starting from `seed`. The parameter is doubled
/// until the rendered width meets or exceeds the budget, then bisected
/// downwards.
///
/// If the rendered width stops growing below the budget the text fits at
/// any width and the current parameter is returned as-is. If even the
/// smallest parameter overshoots, 1 is returned; the final width validation
/// pass reports the real violation.
pub fn fit_width<F>(budget: u32, seed: u32, mut width_at: F) -> Result<u32, RenderError>
where F: FnMut(u32) -> Result<u32, RenderError> {

    let mut lo = 1;
    let mut hi = seed.max(1);
    let mut rendered = width_at(hi)?;

    while rendered < budget {
        let next = hi.saturating_mul(2);
        let next_rendered = width_at(next)?;
        if next_rendered <= rendered {
            return Ok(next);
        }
        lo = hi;
        hi = next;
        rendered = next_rendered;
    }

    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        if width_at(mid)? <= budget {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    Ok(lo)
}
