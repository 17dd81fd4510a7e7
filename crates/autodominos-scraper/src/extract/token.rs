use scraper::Html;

use super::selector;
use crate::error::DominosError;

/// Form on the promotions page that carries the anti-forgery token.
const TOKEN_FORM: &str = r#"form[name="frmCodigoPromocional"]"#;

/// Hidden input name, also the form field the token is echoed back under.
pub const TOKEN_FIELD: &str = "__RequestVerificationToken";

const CONTEXT: &str = "anti-forgery token";

/// Reads the anti-forgery token from the promotions page.
///
/// # Errors
///
/// Returns [`DominosError::Parse`] if the promo-code form is missing, or it
/// has no non-empty token input.
pub fn extract_token(html: &str) -> Result<String, DominosError> {
    let document = Html::parse_document(html);
    let form = document
        .select(&selector(TOKEN_FORM))
        .next()
        .ok_or_else(|| DominosError::parse(CONTEXT, format!("no {TOKEN_FORM} on page")))?;

    let input_selector = selector(&format!(r#"input[name="{TOKEN_FIELD}"]"#));
    let input = form
        .select(&input_selector)
        .next()
        .ok_or_else(|| DominosError::parse(CONTEXT, format!("form has no {TOKEN_FIELD} input")))?;

    match input.value().attr("value").map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_owned()),
        _ => Err(DominosError::parse(CONTEXT, "token input has no value")),
    }
}
