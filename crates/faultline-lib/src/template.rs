//! Named-placeholder message templates.
//!
//! Templates reference runtime values as `{name}`. Literal braces are written
//! doubled (`{{`, `}}`). Names are ASCII identifiers; positional (`{}`) and
//! placeholders with format specifiers are rejected.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};

enum Piece<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

fn walk<'a>(template: &'a str, mut visit: impl FnMut(Piece<'a>) -> Result<()>) -> Result<()> {
    let bytes = template.as_bytes();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                visit(Piece::Literal(&template[start..i]))?;
                if bytes.get(i + 1) == Some(&b'{') {
                    visit(Piece::Literal("{"))?;
                    i += 2;
                    start = i;
                    continue;
                }

                let rest = &template[i + 1..];
                match rest.find(['{', '}']) {
                    Some(offset) if rest.as_bytes()[offset] == b'}' => {
                        let name = &rest[..offset];
                        validate_name(name, i)?;
                        visit(Piece::Placeholder(name))?;
                        i += offset + 2;
                        start = i;
                    }
                    _ => {
                        return Err(Error::MalformedTemplate {
                            position: i,
                            reason: "unclosed '{'",
                        })
                    }
                }
            }
            b'}' => {
                visit(Piece::Literal(&template[start..i]))?;
                if bytes.get(i + 1) != Some(&b'}') {
                    return Err(Error::MalformedTemplate {
                        position: i,
                        reason: "single '}' outside a placeholder",
                    });
                }
                visit(Piece::Literal("}"))?;
                i += 2;
                start = i;
            }
            _ => i += 1,
        }
    }

    visit(Piece::Literal(&template[start..]))
}

fn validate_name(name: &str, position: usize) -> Result<()> {
    if name.is_empty() {
        return Err(Error::MalformedTemplate {
            position,
            reason: "empty placeholder",
        });
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::MalformedTemplate {
            position,
            reason: "placeholder names must be identifiers",
        });
    }
    Ok(())
}

/// Names of all placeholders referenced by `template`.
pub fn placeholders(template: &str) -> Result<BTreeSet<&str>> {
    let mut names = BTreeSet::new();
    walk(template, |piece| {
        if let Piece::Placeholder(name) = piece {
            names.insert(name);
        }
        Ok(())
    })?;
    Ok(names)
}

/// Substitute every placeholder in `template` with its value.
///
/// Values not referenced by the template are ignored here; callers that must
/// reject unused values check them against [`placeholders`] first.
pub fn render(template: &str, values: &BTreeMap<String, String>) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    walk(template, |piece| {
        match piece {
            Piece::Literal(text) => out.push_str(text),
            Piece::Placeholder(name) => match values.get(name) {
                Some(value) => out.push_str(value),
                None => {
                    return Err(Error::MissingPlaceholderValue {
                        name: name.to_string(),
                    })
                }
            },
        }
        Ok(())
    })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_substitutes_named_values() {
        let rendered = render("{ip} is invalid.", &values(&[("ip", "10.0.0.1")])).unwrap();
        assert_eq!(rendered, "10.0.0.1 is invalid.");
    }

    #[test]
    fn test_render_repeated_placeholder() {
        let rendered = render("{a}-{b}-{a}", &values(&[("a", "x"), ("b", "y")])).unwrap();
        assert_eq!(rendered, "x-y-x");
    }

    #[test]
    fn test_render_escaped_braces() {
        let rendered = render("{{literal}} {name}", &values(&[("name", "v")])).unwrap();
        assert_eq!(rendered, "{literal} v");
    }

    #[test]
    fn test_render_missing_value() {
        let err = render("invalid IP : {ip}", &BTreeMap::new()).unwrap_err();
        assert_eq!(
            err,
            Error::MissingPlaceholderValue {
                name: "ip".to_string()
            }
        );
    }

    #[test]
    fn test_render_without_placeholders_is_identity() {
        let rendered = render("Token Expired", &BTreeMap::new()).unwrap();
        assert_eq!(rendered, "Token Expired");
    }

    #[test]
    fn test_placeholders_collects_names() {
        let names = placeholders("{b} and {a} and {b} {{c}}").unwrap();
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_malformed_templates() {
        assert!(matches!(
            placeholders("open {ip"),
            Err(Error::MalformedTemplate { position: 5, .. })
        ));
        assert!(matches!(
            placeholders("stray } brace"),
            Err(Error::MalformedTemplate { position: 6, .. })
        ));
        assert!(matches!(
            placeholders("positional {}"),
            Err(Error::MalformedTemplate { .. })
        ));
        assert!(matches!(
            placeholders("padded {ip:>10}"),
            Err(Error::MalformedTemplate { .. })
        ));
        assert!(matches!(
            placeholders("nested {a{b}}"),
            Err(Error::MalformedTemplate { .. })
        ));
    }

    #[test]
    fn test_render_handles_multibyte_text() {
        let rendered = render("é {name} ü", &values(&[("name", "ß")])).unwrap();
        assert_eq!(rendered, "é ß ü");
    }
}
