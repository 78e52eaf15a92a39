//! Aggregated shopping lists and their export formats.

use std::collections::BTreeMap;
use std::str::FromStr;

/// One line of a shopping list: an ingredient and the total to buy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingItem {
    pub name: String,
    pub measurement_unit: String,
    pub total: i64,
}

impl ShoppingItem {
    /// One line totalling `total` of `name` in `measurement_unit`.
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>, total: i64) -> Self {
        Self {
            name: name.into(),
            measurement_unit: measurement_unit.into(),
            total,
        }
    }
}

/// Ingredient totals for every recipe in a user's cart.
///
/// ## Invariants
/// - At most one item per `(name, measurement_unit)`; grouping is exact, so
///   `Flour` and `flour` stay apart.
/// - Items are ordered by lowercased name, then lowercased unit, with exact
///   text breaking ties. Database collation plays no part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    items: Vec<ShoppingItem>,
}

impl ShoppingList {
    /// Group rows by `(name, unit)` and sum their amounts.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::{ShoppingItem, ShoppingList};
    ///
    /// let list = ShoppingList::aggregate([
    ///     ShoppingItem::new("flour", "g", 200),
    ///     ShoppingItem::new("egg", "pcs", 2),
    ///     ShoppingItem::new("flour", "g", 100),
    /// ]);
    /// assert_eq!(list.items()[1], ShoppingItem::new("flour", "g", 300));
    /// ```
    pub fn aggregate(rows: impl IntoIterator<Item = ShoppingItem>) -> Self {
        let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
        for row in rows {
            *totals.entry((row.name, row.measurement_unit)).or_default() += row.total;
        }
        let mut items: Vec<ShoppingItem> = totals
            .into_iter()
            .map(|((name, measurement_unit), total)| ShoppingItem {
                name,
                measurement_unit,
                total,
            })
            .collect();
        // Stable, so equal folded keys keep the map's exact-text order.
        items.sort_by_cached_key(|item| {
            (item.name.to_lowercase(), item.measurement_unit.to_lowercase())
        });
        Self { items }
    }

    /// Items in canonical order.
    pub fn items(&self) -> &[ShoppingItem] {
        &self.items
    }

    /// Whether the cart held no ingredients at all.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Output format of the downloadable shopping list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Text,
    Pdf,
}

/// Raised when a `format` parameter names no known format.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported export format `{0}`; expected txt or pdf")]
pub struct UnknownExportFormat(pub String);

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Pdf => "pdf",
        }
    }

    /// `Content-Type` of the rendered document.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Text => "text/plain; charset=utf-8",
            Self::Pdf => "application/pdf",
        }
    }

    /// Attachment file name offered to the client.
    pub fn file_name(self) -> String {
        format!("shopping_list.{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = UnknownExportFormat;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(Self::Text),
            "pdf" => Ok(Self::Pdf),
            _ => Err(UnknownExportFormat(raw.to_owned())),
        }
    }
}
