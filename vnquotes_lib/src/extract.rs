//! Row and cell extraction from the HNX report HTML.
//!
//! The extractor knows nothing about what the cells mean. It walks every
//! `<tr>` in document order, skips rows holding a `<th>` at any depth and rows
//! without data cells, and returns the cleaned text of each row's own `<td>`
//! children.
//!
//! It never fails: malformed markup yields whatever rows the parser could
//! recover, possibly none.

use scraper::{ElementRef, Html, Selector};

/// The ordered cell texts of one table row.
pub type CellRow = Vec<String>;

/// Extracts data rows from an HTML document or fragment.
pub fn extract_rows(html: &str) -> Vec<CellRow> {
    let document = parse(html);
    let Ok(row_selector) = Selector::parse("tr") else {
        return Vec::new();
    };

    document
        .select(&row_selector)
        .filter_map(|row| {
            if contains_header_cell(row) {
                return None;
            }
            let texts: CellRow = row_cells(row)
                .into_iter()
                .filter(|c| c.value().name() == "td")
                .map(cell_text)
                .collect();
            if texts.is_empty() {
                None
            } else {
                Some(texts)
            }
        })
        .collect()
}

/// HNX answers with a bare fragment that may start directly with `<tr>`.
/// Tree construction drops table rows outside a table, so such fragments
/// get an enclosing `<table>`.
fn parse(html: &str) -> Html {
    let lower = html.to_ascii_lowercase();
    if lower.contains("<tr") && !lower.contains("<table") {
        Html::parse_document(&format!("<table>{}</table>", html))
    } else {
        Html::parse_document(html)
    }
}

/// A row is a header row when a `<th>` appears anywhere inside it, nested
/// markup included.
fn contains_header_cell(row: ElementRef<'_>) -> bool {
    row.descendants()
        .filter_map(ElementRef::wrap)
        .any(|el| el.value().name() == "th")
}

/// Direct `<td>`/`<th>` children of a row. Cells of nested tables belong to
/// their own rows and are not returned here.
fn row_cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .collect()
}

/// All descendant text with tags stripped, non-breaking spaces turned into
/// plain spaces, and surrounding whitespace trimmed.
fn cell_text(cell: ElementRef<'_>) -> String {
    let raw: String = cell.text().collect();
    raw.replace('\u{a0}', " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_row_is_dropped() {
        let html = "<tr><th>H</th></tr><tr><td>1</td><td>AAA</td><td>x</td><td>10,000</td></tr>";
        let rows = extract_rows(html);
        assert_eq!(rows, vec![vec!["1", "AAA", "x", "10,000"]]);
    }

    #[test]
    fn tags_are_stripped_and_entities_decoded() {
        let html = "<table><tr><td><a href=\"#\"><b>AAA</b></a></td>\
                    <td>&nbsp;10,000&nbsp;</td><td>Gi&#225; &#227; &amp; co</td></tr></table>";
        let rows = extract_rows(html);
        assert_eq!(rows, vec![vec!["AAA", "10,000", "Gi\u{e1} \u{e3} & co"]]);
    }

    #[test]
    fn multiline_cells_and_attributes() {
        let html = "<table>\n<tr class=\"odd\">\n  <td class=\"col_a\">\n    1\n  </td>\n  <td>\n AAA\n</td>\n</tr>\n</table>";
        let rows = extract_rows(html);
        assert_eq!(rows, vec![vec!["1", "AAA"]]);
    }

    #[test]
    fn mixed_header_and_data_row_is_dropped() {
        let html = "<table><tr><th>STT</th><td>1</td></tr><tr><td>2</td></tr></table>";
        let rows = extract_rows(html);
        assert_eq!(rows, vec![vec!["2"]]);
    }

    #[test]
    fn nested_header_cell_drops_outer_row() {
        let html = "<table>\
                    <tr><td>1</td><td><table><tr><th>x</th></tr></table></td><td>10</td></tr>\
                    <tr><td>2</td><td>BBB</td></tr>\
                    </table>";
        let rows = extract_rows(html);
        assert_eq!(rows, vec![vec!["2", "BBB"]]);
    }

    #[test]
    fn rows_without_cells_are_dropped() {
        let html = "<table><tr></tr><tr><td>1</td></tr></table>";
        assert_eq!(extract_rows(html), vec![vec!["1"]]);
    }

    #[test]
    fn empty_cells_are_kept_in_position() {
        let html = "<table><tr><td>1</td><td></td><td>AAA</td></tr></table>";
        assert_eq!(extract_rows(html), vec![vec!["1", "", "AAA"]]);
    }

    #[test]
    fn nested_table_does_not_split_outer_cells() {
        let html = "<table><tr><td>1</td><td>AAA<table><tr><td>inner</td></tr></table></td>\
                    <td>10,000</td></tr></table>";
        let rows = extract_rows(html);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["1", "AAAinner", "10,000"]);
        assert_eq!(rows[1], vec!["inner"]);
    }

    #[test]
    fn malformed_markup_never_panics() {
        for html in [
            "",
            "no markup at all",
            "<tr><td>unterminated",
            "<table><tr><td>1</td><td>AAA",
            "</td></tr></table>",
            "<<<>>><tr<td>",
        ] {
            let _ = extract_rows(html);
        }
        assert_eq!(
            extract_rows("<table><tr><td>1</td><td>AAA"),
            vec![vec!["1", "AAA"]]
        );
    }

    #[test]
    fn fixture_rows_in_document_order() {
        let html = include_str!("../../vnquotes_api/tests/fixtures/hnx_listed.html");
        let rows = extract_rows(html);
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0][1], "AAA");
        assert_eq!(rows[0].len(), 8);
        assert_eq!(rows[1][3], "20,500");
        assert_eq!(rows[4], vec!["T\u{1ed5}ng"]);
        assert_eq!(rows[5][1], "DXG");
    }
}
