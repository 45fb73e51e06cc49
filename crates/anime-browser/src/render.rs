//! Outbound render seam between the session controller and a front-end.

use crate::paginate::PaginationMeta;
use crate::present::{CardProjection, DetailProjection};

/// A front-end that draws what the session controller hands it.
///
/// The controller calls `render_list` or `render_empty` after every load that
/// completes and `render_list` after every page change.
pub trait Renderer {
    fn render_list(&mut self, cards: &[CardProjection], meta: &PaginationMeta);

    fn render_empty(&mut self, message: &str);

    fn render_detail(&mut self, detail: &DetailProjection);

    fn render_loading(&mut self, loading: bool);

    /// Hint sent after each rendered page. Front-ends without scrolling ignore it.
    fn scroll_to_top(&mut self) {}
}
