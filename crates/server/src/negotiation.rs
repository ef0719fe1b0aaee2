//! Content and locale negotiation.
//!
//! Normalizes what the transport hands us into the per-request record the
//! controllers consume: the requested format token and the resolved locale,
//! with the raw client string kept alongside the resolution.

use mf::mime::{APPLICATION_JSON, APPLICATION_LD_JSON, TEXT_HTML};
use std::str::FromStr;

/// The format tokens the server understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON, the default.
    Json,

    /// HTML.
    Html,

    /// JSON-LD.
    JsonLd,
}

/// The known media types, in negotiation order: the first `Accept`
/// fragment equal to one of these wins.
const MEDIA_TYPES: [(&str, Format); 3] = [
    (TEXT_HTML, Format::Html),
    (APPLICATION_LD_JSON, Format::JsonLd),
    (APPLICATION_JSON, Format::Json),
];

impl Format {
    /// Returns this format's short token.
    pub fn token(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Html => "html",
            Format::JsonLd => "jsonld",
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Format, String> {
        match s {
            "json" => Ok(Format::Json),
            "html" => Ok(Format::Html),
            "jsonld" => Ok(Format::JsonLd),
            _ => Err(s.to_string()),
        }
    }
}

/// The normalized negotiation record for one request.
#[derive(Debug, Clone)]
pub struct Negotiation {
    /// The requested format token, unvalidated: `?f=` wins verbatim, else
    /// the first known media type in `Accept`, else empty.
    pub format: Option<String>,

    /// The resolved locale, always one of the supported list.
    pub locale: String,

    /// What the client actually sent, before resolution.
    pub raw_locale: Option<String>,
}

impl Negotiation {
    /// Negotiates format and locale from the request's query parameters
    /// and headers.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf_server::Negotiation;
    ///
    /// let negotiation = Negotiation::negotiate(
    ///     None,
    ///     None,
    ///     Some("text/html;q=0.9,application/json"),
    ///     Some("en-US,en;q=0.5"),
    ///     &["en".to_string(), "ja".to_string()],
    /// );
    /// assert_eq!(negotiation.format.as_deref(), Some("html"));
    /// assert_eq!(negotiation.locale, "en");
    /// ```
    pub fn negotiate(
        f: Option<&str>,
        lang: Option<&str>,
        accept: Option<&str>,
        accept_language: Option<&str>,
        supported_locales: &[String],
    ) -> Negotiation {
        let format = negotiate_format(f, accept);
        let (locale, raw_locale) = negotiate_locale(lang, accept_language, supported_locales);
        Negotiation {
            format,
            locale,
            raw_locale,
        }
    }

    /// Parses the negotiated token into a [Format], or reports the
    /// offending token. An absent token means the default, JSON.
    pub fn format(&self) -> Result<Format, String> {
        match self.format.as_deref() {
            None | Some("") => Ok(Format::Json),
            Some(token) => token.parse(),
        }
    }
}

/// A present, non-empty `?f=` wins verbatim, even when unrecognized;
/// validity is decided downstream. Otherwise the `Accept` header is
/// walked fragment by fragment, ignoring quality parameters.
fn negotiate_format(f: Option<&str>, accept: Option<&str>) -> Option<String> {
    if let Some(f) = f {
        if !f.is_empty() {
            return Some(f.to_string());
        }
    }
    for fragment in accept.unwrap_or_default().split(',') {
        let media_type = fragment.split(';').next().unwrap_or_default().trim();
        for (known, format) in MEDIA_TYPES {
            if media_type == known {
                return Some(format.token().to_string());
            }
        }
    }
    None
}

/// `?lang=` is scanned first, then `Accept-Language`; the best match from
/// the supported list wins, the first supported locale is the fallback.
fn negotiate_locale(
    lang: Option<&str>,
    accept_language: Option<&str>,
    supported: &[String],
) -> (String, Option<String>) {
    let raw = lang
        .filter(|lang| !lang.is_empty())
        .or(accept_language)
        .map(ToString::to_string);
    let mut candidates = Vec::new();
    if let Some(lang) = lang {
        candidates.push(lang.trim());
    }
    for fragment in accept_language.unwrap_or_default().split(',') {
        candidates.push(fragment.split(';').next().unwrap_or_default().trim());
    }
    for candidate in candidates {
        if candidate.is_empty() {
            continue;
        }
        let primary = candidate.split('-').next().unwrap_or(candidate);
        for locale in supported {
            if locale.eq_ignore_ascii_case(candidate) || locale.eq_ignore_ascii_case(primary) {
                return (locale.clone(), raw);
            }
        }
    }
    (
        supported.first().cloned().unwrap_or_else(|| "en".to_string()),
        raw,
    )
}
