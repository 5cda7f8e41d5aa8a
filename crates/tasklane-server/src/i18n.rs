//! Localized message lookup.

use std::collections::HashMap;

/// Locale used when the configured one has no entry for a key.
pub const FALLBACK_LOCALE: &str = "en";

const CATALOG: &[(&str, &str, &str)] = &[
    ("en", "messages.server_error", "Something went wrong. Please try again later."),
    ("en", "messages.not_found", "Not found"),
    ("en", "messages.bad_request", "Malformed request body"),
    ("es", "messages.server_error", "Algo salió mal. Por favor, inténtelo de nuevo más tarde."),
    ("es", "messages.not_found", "No encontrado"),
    ("es", "messages.bad_request", "Cuerpo de la solicitud mal formado"),
];

/// Resolves message keys for one locale.
#[derive(Debug, Clone)]
pub struct Translator {
    locale: String,
    messages: HashMap<(String, String), String>,
}

impl Translator {
    /// Create a translator for `locale` backed by the built-in catalog.
    pub fn new(locale: impl Into<String>) -> Self {
        let messages = CATALOG
            .iter()
            .map(|(locale, key, text)| {
                ((locale.to_string(), key.to_string()), text.to_string())
            })
            .collect();
        Self {
            locale: locale.into(),
            messages,
        }
    }

    /// Look up `key` in the configured locale, then the fallback locale.
    /// Unknown keys resolve to themselves.
    pub fn get(&self, key: &str) -> String {
        [self.locale.as_str(), FALLBACK_LOCALE]
            .iter()
            .find_map(|locale| {
                self.messages
                    .get(&(locale.to_string(), key.to_string()))
            })
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(FALLBACK_LOCALE)
    }
}
