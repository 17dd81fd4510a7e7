//! Extraction of domain values from the site's HTML pages.
//!
//! Every routine is written against exactly one page shape and fails with
//! [`DominosError::Parse`] when that shape is not found. Markup changes on
//! the site should surface as errors here, never as silently partial data.

mod expiry;
mod promotions;
mod store;
mod token;

pub use expiry::parse_expiry;
pub use promotions::{extract_promotions, ListedPromotion};
pub use store::{extract_store, extract_store_listing};
pub use token::{extract_token, TOKEN_FIELD};

use scraper::{ElementRef, Selector};

use crate::error::DominosError;

/// Parses a selector that is a compile-time constant.
fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid CSS selector")
}

/// Concatenated text of an element and its descendants.
fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Drops a fixed-width label prefix (counted in characters) and trims.
///
/// Fails when nothing is left, which means the label or the layout changed.
fn strip_label(text: &str, prefix_chars: usize, context: &str) -> Result<String, DominosError> {
    let value: String = text.chars().skip(prefix_chars).collect();
    let value = value.trim();
    if value.is_empty() {
        return Err(DominosError::parse(
            context,
            format!("nothing left after dropping {prefix_chars}-char label from {text:?}"),
        ));
    }
    Ok(value.to_owned())
}

fn required_attr<'a>(
    element: ElementRef<'a>,
    name: &str,
    context: &str,
) -> Result<&'a str, DominosError> {
    element
        .value()
        .attr(name)
        .ok_or_else(|| DominosError::parse(context, format!("missing attribute {name}")))
}
