//! Plain-text shopping list.

use crate::domain::ShoppingList;

use super::body_lines;

/// Title, blank line, then one line per item (or the empty notice).
pub(super) fn render(list: &ShoppingList, title: &str) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push_str("\n\n");
    for line in body_lines(list) {
        out.push_str(&line);
        out.push('\n');
    }
    out
}
