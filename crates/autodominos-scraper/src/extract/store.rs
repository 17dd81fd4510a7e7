use autodominos_core::{Coords, OrderType, Store};
use scraper::{ElementRef, Html};

use super::{required_attr, selector, strip_label, text_of};
use crate::error::DominosError;

/// Leading characters of the `<h5>` title before the store name.
const TITLE_PREFIX_CHARS: usize = 7;
/// Length of the `Teléfono: ` label in the first paragraph.
const PHONE_PREFIX_CHARS: usize = 10;
/// Length of the `Horario: ` label in the second paragraph.
const SCHEDULE_PREFIX_CHARS: usize = 9;

const CONTEXT: &str = "store listing";

/// Extracts the first store from a store-search result page.
///
/// Returns `Ok(None)` when the result list is present but empty.
///
/// # Errors
///
/// Returns [`DominosError::Parse`] if the page has no `ul.listTiendas`, or
/// if the first entry does not have the expected layout.
pub fn extract_store_listing(html: &str) -> Result<Option<Store>, DominosError> {
    let document = Html::parse_document(html);
    let list = document
        .select(&selector("ul.listTiendas"))
        .next()
        .ok_or_else(|| DominosError::parse(CONTEXT, "no ul.listTiendas on page"))?;

    list.select(&selector("li"))
        .next()
        .map(store_from_element)
        .transpose()
}

/// Extracts a store from an HTML fragment holding one store listing entry.
///
/// # Errors
///
/// Returns [`DominosError::Parse`] if the entry or any expected element or
/// attribute is absent or malformed.
pub fn extract_store(fragment: &str) -> Result<Store, DominosError> {
    let document = Html::parse_fragment(fragment);
    let item = document
        .select(&selector("[data-idtienda]"))
        .next()
        .ok_or_else(|| DominosError::parse(CONTEXT, "no element with data-idtienda"))?;
    store_from_element(item)
}

fn store_from_element(item: ElementRef<'_>) -> Result<Store, DominosError> {
    let id = parse_attr::<u32>(item, "data-idtienda")?;

    let container = item
        .select(&selector(".fl.w50"))
        .next()
        .ok_or_else(|| DominosError::parse(CONTEXT, "missing .fl.w50 container"))?;

    let title = container
        .select(&selector("h5"))
        .next()
        .ok_or_else(|| DominosError::parse(CONTEXT, "missing h5 title"))?;
    let name = strip_label(&text_of(title), TITLE_PREFIX_CHARS, "store title")?;

    let paragraphs: Vec<ElementRef<'_>> = container.select(&selector("p")).collect();
    let [phone_p, schedule_p, ..] = paragraphs.as_slice() else {
        return Err(DominosError::parse(
            CONTEXT,
            format!("expected phone and schedule paragraphs, found {}", paragraphs.len()),
        ));
    };

    let phone_text = strip_label(&text_of(*phone_p), PHONE_PREFIX_CHARS, "store phone")?;
    let phone = phone_text
        .split_whitespace()
        .collect::<String>()
        .parse::<u64>()
        .map_err(|e| DominosError::parse("store phone", format!("{phone_text:?}: {e}")))?;

    let schedule = strip_label(&text_of(*schedule_p), SCHEDULE_PREFIX_CHARS, "store schedule")?;

    let mut types = Vec::new();
    for button in item.select(&selector("button")) {
        let token = required_attr(button, "name", "store order-type button")?;
        let order_type = OrderType::from_token(token).ok_or_else(|| {
            DominosError::parse("store order-type button", format!("unknown name {token:?}"))
        })?;
        if !types.contains(&order_type) {
            types.push(order_type);
        }
    }

    let coords = Coords {
        lat: parse_attr::<f64>(item, "data-latitude")?,
        long: parse_attr::<f64>(item, "data-longitude")?,
    };

    Ok(Store {
        id,
        name,
        phone,
        schedule,
        types,
        coords,
    })
}

fn parse_attr<T>(item: ElementRef<'_>, name: &str) -> Result<T, DominosError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = required_attr(item, name, CONTEXT)?;
    raw.trim()
        .parse::<T>()
        .map_err(|e| DominosError::parse(CONTEXT, format!("attribute {name}={raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing_item(id: &str, buttons: &str) -> String {
        format!(
            r#"<li data-idtienda="{id}" data-latitude="40.4" data-longitude="-3.7">
  <div class="fl w50"><h5>Tienda Example Store</h5><p>Teléfono: 910 000 000</p><p>Horario: L-D 12:00-24:00</p></div>
  <div class="fr">{buttons}</div>
</li>"#
        )
    }

    const BOTH_BUTTONS: &str =
        r#"<button name="recoger">Recoger</button><button name="domicilio">A domicilio</button>"#;

    #[test]
    fn extracts_every_field_from_fragment() {
        let store = extract_store(&listing_item("42", BOTH_BUTTONS)).unwrap();
        assert_eq!(store.id, 42);
        assert_eq!(store.name, "Example Store");
        assert_eq!(store.phone, 910_000_000);
        assert_eq!(store.schedule, "L-D 12:00-24:00");
        assert_eq!(store.types, vec![OrderType::PickUp, OrderType::Delivery]);
        assert!((store.coords.lat - 40.4).abs() < f64::EPSILON);
        assert!((store.coords.long - -3.7).abs() < f64::EPSILON);
    }

    #[test]
    fn listing_page_returns_first_store() {
        let page = format!(
            "<html><body><ul class=\"listTiendas\">{}{}</ul></body></html>",
            listing_item("7", BOTH_BUTTONS),
            listing_item("8", BOTH_BUTTONS)
        );
        let store = extract_store_listing(&page).unwrap().unwrap();
        assert_eq!(store.id, 7);
    }

    #[test]
    fn empty_listing_is_none() {
        let page = "<html><body><ul class=\"listTiendas\"></ul></body></html>";
        assert!(extract_store_listing(page).unwrap().is_none());
    }

    #[test]
    fn page_without_listing_fails() {
        let result = extract_store_listing("<html><body><p>Mantenimiento</p></body></html>");
        assert!(matches!(result, Err(DominosError::Parse { .. })), "got: {result:?}");
    }

    #[test]
    fn missing_container_fails() {
        let fragment = r#"<li data-idtienda="1" data-latitude="1" data-longitude="2"><h5>Tienda X</h5></li>"#;
        assert!(matches!(
            extract_store(fragment),
            Err(DominosError::Parse { .. })
        ));
    }

    #[test]
    fn missing_schedule_paragraph_fails() {
        let fragment = r#"<li data-idtienda="1" data-latitude="1" data-longitude="2">
<div class="fl w50"><h5>Tienda X</h5><p>Teléfono: 910000000</p></div></li>"#;
        let result = extract_store(fragment);
        assert!(
            matches!(result, Err(DominosError::Parse { ref reason, .. }) if reason.contains("found 1")),
            "got: {result:?}"
        );
    }

    #[test]
    fn unknown_order_type_button_fails() {
        let fragment = listing_item("3", r#"<button name="llevar">Llevar</button>"#);
        assert!(matches!(
            extract_store(&fragment),
            Err(DominosError::Parse { .. })
        ));
    }

    #[test]
    fn non_numeric_coordinates_fail() {
        let fragment = listing_item("3", BOTH_BUTTONS).replace("40.4", "north");
        assert!(matches!(
            extract_store(&fragment),
            Err(DominosError::Parse { .. })
        ));
    }

    #[test]
    fn store_with_single_order_type() {
        let store =
            extract_store(&listing_item("5", r#"<button name="recoger">Recoger</button>"#))
                .unwrap();
        assert_eq!(store.types, vec![OrderType::PickUp]);
    }
}
