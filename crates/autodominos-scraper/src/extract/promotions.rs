use chrono::NaiveDate;
use scraper::Html;

use super::expiry::parse_expiry;
use super::{required_attr, selector, text_of};
use crate::error::DominosError;

const CONTEXT: &str = "promotion list";

/// A promotion entry as listed on the promotions page, before it is tied to
/// an order type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedPromotion {
    pub description: String,
    pub expires: NaiveDate,
}

/// Extracts every `li.code--promotion` entry from the promotions page, in
/// page order.
///
/// Only called after the server accepted a code, so an empty list is an
/// error.
///
/// # Errors
///
/// Returns [`DominosError::Parse`] if no entries are found, an entry lacks
/// its `data-name` or `small.small` expiry, or the expiry is not a date.
pub fn extract_promotions(html: &str) -> Result<Vec<ListedPromotion>, DominosError> {
    let document = Html::parse_document(html);
    let expiry_selector = selector("small.small");

    let mut promotions = Vec::new();
    for entry in document.select(&selector("li.code--promotion")) {
        let description = required_attr(entry, "data-name", CONTEXT)?.trim().to_owned();

        let expiry = entry
            .select(&expiry_selector)
            .next()
            .map(text_of)
            .ok_or_else(|| {
                DominosError::parse(CONTEXT, format!("promotion {description:?} has no expiry"))
            })?;
        let expires = parse_expiry(&expiry).ok_or_else(|| {
            DominosError::parse(CONTEXT, format!("unparseable expiry {expiry:?}"))
        })?;

        promotions.push(ListedPromotion {
            description,
            expires,
        });
    }

    if promotions.is_empty() {
        return Err(DominosError::parse(
            CONTEXT,
            "no li.code--promotion entries after an accepted code",
        ));
    }

    Ok(promotions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, expiry: &str) -> String {
        format!(
            r#"<li class="code--promotion item" data-name="{name}"><span>{name}</span><small class="small">{expiry}</small></li>"#
        )
    }

    #[test]
    fn extracts_entries_in_page_order() {
        let page = format!(
            "<ul>{}{}</ul>",
            entry("10% off", "Válido hasta el 31/12/2024."),
            entry("2x1 martes", "Caduca el 5 de marzo de 2025.")
        );
        let promotions = extract_promotions(&page).unwrap();
        assert_eq!(
            promotions,
            vec![
                ListedPromotion {
                    description: "10% off".to_owned(),
                    expires: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
                },
                ListedPromotion {
                    description: "2x1 martes".to_owned(),
                    expires: NaiveDate::from_ymd_opt(2025, 3, 5).unwrap(),
                },
            ]
        );
    }

    #[test]
    fn empty_page_fails() {
        let result = extract_promotions("<html><body><ul></ul></body></html>");
        assert!(matches!(result, Err(DominosError::Parse { .. })), "got: {result:?}");
    }

    #[test]
    fn missing_expiry_fails() {
        let page = r#"<li class="code--promotion" data-name="Gratis"></li>"#;
        assert!(matches!(
            extract_promotions(page),
            Err(DominosError::Parse { .. })
        ));
    }

    #[test]
    fn garbage_expiry_fails() {
        let page = entry("Gratis", "Sin fecha");
        assert!(matches!(
            extract_promotions(&page),
            Err(DominosError::Parse { .. })
        ));
    }

    #[test]
    fn missing_name_fails() {
        let page = r#"<li class="code--promotion"><small class="small">31/12/2024</small></li>"#;
        assert!(matches!(
            extract_promotions(page),
            Err(DominosError::Parse { .. })
        ));
    }
}
