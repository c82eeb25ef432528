use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const TAB_CELLS: usize = 4;
const ELLIPSIS: char = '\u{2026}';

/// Terminal cells taken by `s`; a tab counts as four.
/// Tabs are measured apart since unicode-width gives them one cell.
pub fn display_width(s: &str) -> usize {
    let mut parts = s.split('\t');
    let first = parts.next().map_or(0, UnicodeWidthStr::width);
    parts.fold(first, |width, part| {
        width + TAB_CELLS + UnicodeWidthStr::width(part)
    })
}

/// Cut `s` to at most `max_cells` cells, ending in `…` when anything was dropped.
/// Never splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }

    let budget = max_cells - 1;
    let mut used = 0;
    let mut out = String::with_capacity(s.len().min(max_cells * 4));
    for grapheme in s.graphemes(true) {
        let width = display_width(grapheme);
        if used + width > budget {
            break;
        }
        used += width;
        out.push_str(grapheme);
    }
    out.push(ELLIPSIS);
    out
}

/// Byte offset of the grapheme boundary after `offset`, or None at the end
pub fn next_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    let rest = s.get(offset..).filter(|r| !r.is_empty())?;
    let step = rest.graphemes(true).next().map_or(rest.len(), str::len);
    Some(offset + step)
}

/// Byte offset of the grapheme boundary before `offset`, or None at the start
pub fn prev_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    let head = s.get(..offset).filter(|h| !h.is_empty())?;
    let step = head.graphemes(true).next_back().map_or(head.len(), str::len);
    Some(offset - step)
}
