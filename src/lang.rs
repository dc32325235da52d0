// SPDX-License-Identifier: PMPL-1.0-or-later

//! Language tags for translation files.
//!
//! A configured language becomes a file name (`i18n/<tag>.json`), so a tag
//! is only checked for being a safe, BCP 47 shaped name: a lowercase primary
//! subtag of two or three letters, then any number of alphanumeric subtags
//! separated by `-` or `_` (`pt-BR`, `es-419`, `zh-Hant`). Registry lookups
//! are not performed. The `*` wildcard used in schema extension blocks is
//! never a valid tag.

const MAX_SUBTAG_LEN: usize = 8;

/// Returns `true` when `tag` can name a translation file.
///
/// # Examples
/// ```
/// assert!(model_sync::lang::is_valid_tag("es-419"));
/// assert!(!model_sync::lang::is_valid_tag("../en"));
/// ```
pub fn is_valid_tag(tag: &str) -> bool {
    let mut subtags = tag.split(['-', '_']);
    let primary = subtags.next().unwrap_or_default();
    if !(2..=3).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_lowercase()) {
        return false;
    }
    subtags.all(|subtag| {
        (1..=MAX_SUBTAG_LEN).contains(&subtag.len())
            && subtag.chars().all(|c| c.is_ascii_alphanumeric())
    })
}

/// English display name for the primary subtag, when known.
pub fn language_name(tag: &str) -> Option<&'static str> {
    let primary = tag.split(['-', '_']).next()?;
    match primary {
        "en" => Some("English"),
        "es" => Some("Spanish"),
        "fr" => Some("French"),
        "de" => Some("German"),
        "ja" => Some("Japanese"),
        "pt" => Some("Portuguese"),
        "zh" => Some("Chinese"),
        "ko" => Some("Korean"),
        "it" => Some("Italian"),
        "ru" => Some("Russian"),
        "ar" => Some("Arabic"),
        "nl" => Some("Dutch"),
        "pl" => Some("Polish"),
        _ => None,
    }
}
