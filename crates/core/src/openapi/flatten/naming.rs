//! Name derivation for promoted values.
//!
//! Names depend only on where a value sits in the document. Collisions are
//! settled later by [`OrderedMap::unique_name`](crate::openapi::OrderedMap::unique_name).

use crate::openapi::spec::{is_key_char, MediaRange, Method, StatusCode};

/// Words rendered fully upper-cased in PascalCase names.
const INITIALISMS: &[&str] = &[
    "ACL", "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID",
    "IP", "JSON", "LHS", "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SQL", "SSH", "TCP", "TLS",
    "TTL", "UDP", "UI", "UID", "UUID", "URI", "URL", "UTF8", "VM", "XML", "XMPP", "XSRF", "XSS",
];

/// Which kind of entity owns a content map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    /// A request body.
    RequestBody,
    /// A response.
    Response,
}

impl Owner {
    const fn suffix(self) -> &'static str {
        match self {
            Self::RequestBody => "RequestBody",
            Self::Response => "Response",
        }
    }
}

/// Converts free text to PascalCase the way Go identifiers are written.
///
/// Splits on anything that is not a letter or digit, on lower-to-upper case
/// changes, and before the last capital of an acronym run (`HTMLFile` is
/// `HTML` + `File`). Known initialisms stay upper-cased.
pub fn to_go_pascal(text: &str) -> String {
    split_words(text)
        .iter()
        .map(|word| capitalize_word(word))
        .collect()
}

fn split_words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some(prev) = current.chars().last() {
            let next_is_lower = chars.get(i + 1).is_some_and(|next| next.is_lowercase());
            let boundary = (prev.is_lowercase() && ch.is_uppercase())
                || (prev.is_uppercase() && ch.is_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(ch);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize_word(word: &str) -> String {
    let upper = word.to_uppercase();
    if INITIALISMS.contains(&upper.as_str()) {
        return upper;
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Turns a candidate name into a valid registry key.
///
/// Characters outside `[A-Za-z0-9._-]` become `_`; an empty candidate becomes `Unnamed`.
pub fn sanitize_key(candidate: &str) -> String {
    if candidate.is_empty() {
        return "Unnamed".to_string();
    }
    candidate
        .chars()
        .map(|ch| if is_key_char(ch) { ch } else { '_' })
        .collect()
}

/// Stand-in operation id for operations that lack one, e.g. `getWidgetsID`
/// for `GET /widgets/{id}`.
pub fn fallback_operation_id(method: Method, path: &str) -> String {
    format!("{}{}", method.field(), to_go_pascal(path))
}

/// `<opId>RequestBody`, keeping the operation id's case.
pub fn request_body_name(operation_id: &str) -> String {
    format!("{operation_id}RequestBody")
}

/// `<opId> <status text> Response` in PascalCase, using the raw code when it has no text.
pub fn response_name(operation_id: &str, code: StatusCode<'_>) -> String {
    let text: Option<&str> = code.status_text();
    let text = text.unwrap_or(code.as_str());
    to_go_pascal(&format!("{operation_id} {text} Response"))
}

/// Name for the value of `property` inside the type named `prefix`.
pub fn property_name(prefix: &str, property: &str) -> String {
    to_go_pascal(&format!("{prefix} {property}"))
}

/// Short label for a media range: `JSON`, `HTML`, or `Unknown`.
pub fn media_range_label(range: &str) -> &'static str {
    match MediaRange::new(range).essence().as_deref() {
        Some(MediaRange::JSON) => "JSON",
        Some(MediaRange::HTML) => "HTML",
        _ => "Unknown",
    }
}

/// Name for the schema of one media type: the owner's name minus its kind
/// suffix, then the media label, then the suffix again.
pub fn media_type_name(owner_name: &str, range: &str, owner: Owner) -> String {
    let suffix = owner.suffix();
    let base = owner_name.strip_suffix(suffix).unwrap_or(owner_name);
    to_go_pascal(&format!("{base} {} {suffix}", media_range_label(range)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_to_go_pascal() {
        assert_eq!(to_go_pascal("getWidget OK Response"), "GetWidgetOkResponse");
        assert_eq!(to_go_pascal("user_name"), "UserName");
        assert_eq!(to_go_pascal("HTMLFile"), "HTMLFile");
        assert_eq!(to_go_pascal("html file"), "HTMLFile");
        assert_eq!(to_go_pascal("widget id"), "WidgetID");
        assert_eq!(to_go_pascal("/widgets/{id}"), "WidgetsID");
        assert_eq!(to_go_pascal("OAuth"), "OAuth");
        assert_eq!(to_go_pascal(""), "");
    }

    #[test]
    fn test_to_go_pascal_is_stable_on_its_output() {
        for name in ["GetWidgetOkJSONResponse", "CreateUserRequestBody", "WidgetID"] {
            assert_eq!(to_go_pascal(name), name);
        }
    }

    #[test]
    fn test_response_name() {
        assert_eq!(
            response_name("getWidget", StatusCode::new("200")),
            "GetWidgetOkResponse"
        );
        assert_eq!(
            response_name("getWidget", StatusCode::new("404")),
            "GetWidgetNotFoundResponse"
        );
        assert_eq!(
            response_name("getWidget", StatusCode::new("default")),
            "GetWidgetDefaultResponse"
        );
        assert_eq!(
            response_name("getWidget", StatusCode::new("2XX")),
            "GetWidget2xxResponse"
        );
    }

    #[test]
    fn test_media_type_name() {
        assert_eq!(
            media_type_name("GetWidgetOkResponse", "application/json", Owner::Response),
            "GetWidgetOkJSONResponse"
        );
        assert_eq!(
            media_type_name("createWidgetRequestBody", "text/html; charset=utf-8", Owner::RequestBody),
            "CreateWidgetHTMLRequestBody"
        );
        assert_eq!(
            media_type_name("GetWidgetOkResponse2", "image/png", Owner::Response),
            "GetWidgetOkResponse2UnknownResponse"
        );
    }

    #[test]
    fn test_property_name() {
        assert_eq!(property_name("Widget", "owner"), "WidgetOwner");
        assert_eq!(property_name("Widget", "created_at"), "WidgetCreatedAt");
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("Widget"), "Widget");
        assert_eq!(sanitize_key("my widget/v2"), "my_widget_v2");
        assert_eq!(sanitize_key("a.b-c_d"), "a.b-c_d");
        assert_eq!(sanitize_key(""), "Unnamed");
    }

    #[test]
    fn test_fallback_operation_id() {
        assert_eq!(fallback_operation_id(Method::Get, "/widgets/{id}"), "getWidgetsID");
        assert_eq!(fallback_operation_id(Method::Post, "/"), "post");
    }
}
