use std::fmt;

/// A locale code that is known to be present in the message catalog.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Locale(String);

impl Locale {
    pub(crate) fn new(code: &str) -> Self {
        Self(code.to_ascii_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pick the response locale for a request.
///
/// Header negotiation wins; the explicit `lang` field is only consulted when the
/// header yields nothing. Both must name a supported locale, otherwise `None`
/// is returned and the caller rejects the request.
pub fn resolve_locale(
    accept_language: Option<&str>,
    explicit: Option<&str>,
    supported: &[String],
) -> Option<Locale> {
    if let Some(locale) = accept_language.and_then(|x| negotiate_accept_language(x, supported)) {
        return Some(locale);
    }
    explicit.and_then(|x| match_tag(x.trim(), supported))
}

/// Negotiate an `Accept-Language` header value against the supported locales.
///
/// Entries are ranked by their `q` weight (stable for equal weights), `q=0`
/// entries are ignored and `*` selects the first supported locale.
pub fn negotiate_accept_language(header: &str, supported: &[String]) -> Option<Locale> {
    let mut ranked: Vec<(&str, f32)> = vec![];
    for part in header.split(',') {
        let mut components = part.split(';');
        let tag = components.next().unwrap_or_default().trim();
        if tag.is_empty() {
            continue;
        }
        let mut quality = 1.0_f32;
        for param in components {
            if let Some(value) = param.trim().strip_prefix("q=") {
                quality = value.trim().parse::<f32>().unwrap_or(0.0);
            }
        }
        if quality > 0.0 {
            ranked.push((tag, quality));
        }
    }
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    for (tag, _) in ranked {
        if tag == "*" {
            if let Some(first) = supported.first() {
                return Some(Locale::new(first));
            }
            continue;
        }
        if let Some(locale) = match_tag(tag, supported) {
            return Some(locale);
        }
    }
    None
}

fn match_tag(tag: &str, supported: &[String]) -> Option<Locale> {
    if tag.is_empty() {
        return None;
    }
    if let Some(exact) = supported.iter().find(|x| x.eq_ignore_ascii_case(tag)) {
        return Some(Locale::new(exact));
    }
    let primary = tag.split(['-', '_']).next().unwrap_or(tag);
    supported
        .iter()
        .find(|x| x.eq_ignore_ascii_case(primary))
        .map(|x| Locale::new(x))
}
