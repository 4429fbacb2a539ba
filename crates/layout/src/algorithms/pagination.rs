pub struct BreakAnalysis {
    pub should_break: bool,
    pub remaining_height: f32,
}

/// Decides whether `needed` more height fits below `cursor_y`.
///
/// * `cursor_y`: the current write position on the page.
/// * `needed`: the height of the line or image about to be written.
/// * `limit`: the lowest position the cursor may reach.
/// * `at_top`: the page is fresh; breaking again would only add a blank page.
pub fn check_fit(cursor_y: f32, needed: f32, limit: f32, at_top: bool) -> BreakAnalysis {
    BreakAnalysis {
        should_break: !at_top && cursor_y + needed > limit,
        remaining_height: (limit - cursor_y).max(0.0),
    }
}
