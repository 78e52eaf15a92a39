//! PDF rendering through `printpdf`.
//!
//! The document embeds the configured TrueType font so ingredient names in
//! any script render. Lines are laid out top-down and spill onto new pages
//! once the bottom margin is reached.

use printpdf::{IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::domain::ShoppingList;
use crate::domain::ports::RenderError;

use super::config::{PageGeometry, RenderConfig};
use super::body_lines;

/// Lines taken by the title block on the first page.
const TITLE_LINES: usize = 2;

/// Split `lines` into pages, reserving room for the title on the first one.
fn paginate(lines: &[String], per_page: usize) -> Vec<&[String]> {
    let first_capacity = per_page.saturating_sub(TITLE_LINES).max(1);
    let split = first_capacity.min(lines.len());
    let (first, rest) = lines.split_at(split);
    let mut pages = vec![first];
    pages.extend(rest.chunks(per_page.max(1)));
    pages
}

struct PageWriter<'a> {
    layer: PdfLayerReference,
    font: &'a IndirectFontRef,
    geometry: &'a PageGeometry,
    row: usize,
}

impl PageWriter<'_> {
    fn write(&mut self, text: &str, size_pt: f32) {
        let geometry = self.geometry;
        let y = geometry.height_mm
            - geometry.margin_mm
            - geometry.line_height_mm * (self.row as f32 + 1.0);
        self.layer
            .use_text(text, size_pt, Mm(geometry.margin_mm), Mm(y), self.font);
        self.row += 1;
    }
}

/// Render `list` as a PDF document.
pub(super) fn render(list: &ShoppingList, config: &RenderConfig) -> Result<Vec<u8>, RenderError> {
    let font_bytes = config
        .font()
        .ok_or_else(|| RenderError::unavailable("no PDF font configured"))?;
    let geometry = config.geometry();
    let width = Mm(geometry.width_mm);
    let height = Mm(geometry.height_mm);

    let (document, page, layer) = PdfDocument::new(config.title(), width, height, "Page 1");
    let font = document
        .add_external_font(font_bytes)
        .map_err(|err| RenderError::render(format!("font: {err}")))?;

    let lines = body_lines(list);
    for (index, chunk) in paginate(&lines, geometry.lines_per_page())
        .into_iter()
        .enumerate()
    {
        let layer = if index == 0 {
            document.get_page(page).get_layer(layer)
        } else {
            let page_name = format!("Page {}", index + 1);
            let (next_page, next_layer) = document.add_page(width, height, page_name);
            document.get_page(next_page).get_layer(next_layer)
        };
        let mut writer = PageWriter {
            layer,
            font: &font,
            geometry,
            row: 0,
        };
        if index == 0 {
            writer.write(config.title(), geometry.title_size_pt);
            writer.row = TITLE_LINES;
        }
        for line in chunk {
            writer.write(line, geometry.font_size_pt);
        }
    }

    document
        .save_to_bytes()
        .map_err(|err| RenderError::render(err.to_string()))
}
