//! Print page tiling.

use crate::store::touches;
use schemacanvas_core::{Rect, Size};
use schemacanvas_settings::{PageSettings, PrintSettings};

/// Pages to print, in row-major order, plus the page grid dimensions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrintLayout {
    pub pages: Vec<Rect>,
    pub h_page_count: u32,
    pub v_page_count: u32,
    /// Column and row of the first page, `None` when nothing is printed.
    pub first_page: Option<(u32, u32)>,
}

impl PrintLayout {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// Splits the canvas into page-sized tiles and keeps the contiguous block
/// of tiles that holds content.
#[derive(Debug, Clone)]
pub struct PrintPaginator {
    paint_size: Size,
    print: PrintSettings,
}

impl PrintPaginator {
    pub fn new(page: &PageSettings, print: &PrintSettings) -> Self {
        Self {
            paint_size: page.paint_rect_points().size(),
            print: print.clone(),
        }
    }

    /// Page size in canvas units at `scale` (clamped to the print range).
    pub fn page_size(&self, scale: f64) -> Size {
        let scale = self.print.clamp_scale(scale);
        Size::new(self.paint_size.width / scale, self.paint_size.height / scale)
    }

    /// Tiles `canvas` (anchored at the origin) and returns the pages
    /// spanning every tile touched by one of `footprints`.
    ///
    /// The first pass over-tiles the whole canvas to find the touched range;
    /// the second re-tiles from the first touched column/row up to the
    /// furthest touched extent.
    pub fn paginate(&self, canvas: Rect, footprints: &[Rect], scale: f64) -> PrintLayout {
        let page = self.page_size(scale);
        if page.is_empty() || footprints.is_empty() {
            return PrintLayout::default();
        }
        let (pw, ph) = (page.width, page.height);

        let h_cnt = (canvas.right().max(0.0) / pw).round() as u32 + 1;
        let v_cnt = (canvas.bottom().max(0.0) / ph).round() as u32 + 1;

        let mut start: Option<(u32, u32)> = None;
        let (mut max_w, mut max_h) = (0.0f64, 0.0f64);

        for v in 0..v_cnt {
            for h in 0..h_cnt {
                let tile = tile_rect(h, v, page);
                if !footprints.iter().any(|fp| touches(&tile, fp)) {
                    continue;
                }
                start = Some(match start {
                    Some((sh, sv)) => (sh.min(h), sv.min(v)),
                    None => (h, v),
                });
                max_w = max_w.max(tile.right());
                max_h = max_h.max(tile.bottom());
            }
        }

        let Some((start_h, start_v)) = start else {
            tracing::debug!("Nothing to print on a {}x{} page grid", h_cnt, v_cnt);
            return PrintLayout::default();
        };

        let h_page_count = (max_w / pw).round() as u32;
        let v_page_count = (max_h / ph).round() as u32;

        let pages = (start_v..v_page_count)
            .flat_map(|v| (start_h..h_page_count).map(move |h| tile_rect(h, v, page)))
            .collect::<Vec<_>>();

        tracing::debug!(
            "Paginated canvas into {} page(s), grid {}x{}",
            pages.len(),
            h_page_count,
            v_page_count
        );

        PrintLayout {
            pages,
            h_page_count,
            v_page_count,
            first_page: Some((start_h, start_v)),
        }
    }
}

fn tile_rect(h: u32, v: u32, page: Size) -> Rect {
    Rect::new(
        f64::from(h) * page.width,
        f64::from(v) * page.height,
        page.width,
        page.height,
    )
}
