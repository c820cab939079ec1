//! HTTP 103 Early Hints records.

use serde::Serialize;

/// One preload hint, to be sent as a `Link` header before the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EarlyHint {
    pub rel: String,
    pub href: String,
    #[serde(rename = "as")]
    pub as_: String,
}

impl EarlyHint {
    pub fn preload_script(href: impl Into<String>) -> Self {
        EarlyHint {
            rel: "preload".to_string(),
            href: href.into(),
            as_: "script".to_string(),
        }
    }

    /// `</chunk.js>; rel=preload; as=script`
    pub fn to_link_header(&self) -> String {
        format!("<{}>; rel={}; as={}", self.href, self.rel, self.as_)
    }
}

/// Join hints into a single `Link` header value.
pub fn link_header_value(hints: &[EarlyHint]) -> String {
    hints
        .iter()
        .map(EarlyHint::to_link_header)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_header_format() {
        let hint = EarlyHint::preload_script("/chunk.js");
        assert_eq!(hint.to_link_header(), "</chunk.js>; rel=preload; as=script");
    }

    #[test]
    fn joined_header() {
        let hints = [
            EarlyHint::preload_script("/a.js"),
            EarlyHint::preload_script("/b.js"),
        ];
        assert_eq!(
            link_header_value(&hints),
            "</a.js>; rel=preload; as=script, </b.js>; rel=preload; as=script"
        );
        assert_eq!(link_header_value(&[]), "");
    }

    #[test]
    fn serializes_as_field() {
        let json = serde_json::to_string(&EarlyHint::preload_script("/a.js")).unwrap();
        assert_eq!(json, r#"{"rel":"preload","href":"/a.js","as":"script"}"#);
    }
}
