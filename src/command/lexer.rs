//! Quote-aware splitting of a raw command line into tokens

/// Split a command line on whitespace, keeping single or double quoted spans
/// inside one token together with their quote characters.
///
/// Escaped quotes are not recognised: a backslash is an ordinary character.
pub fn lex(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(open) => {
                current.push(ch);
                if ch == open {
                    quote = None;
                }
            }
            None => match ch {
                '\'' | '"' => {
                    quote = Some(ch);
                    current.push(ch);
                }
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                }
                c => current.push(c),
            },
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Strip one layer of matching surrounding quotes
pub fn unquote(token: &str) -> &str {
    match surrounding_quote(token) {
        Some(_) => &token[1..token.len() - 1],
        None => token,
    }
}

/// Replace a token's content while keeping the quoting it was written with
pub fn requote(original: &str, replacement: &str) -> String {
    match surrounding_quote(original) {
        Some(q) => format!("{q}{replacement}{q}"),
        None => replacement.to_string(),
    }
}

/// Quote a rendered value when it would not survive re-lexing as one token
pub fn quote_if_needed(value: &str) -> String {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        if value.contains('"') {
            format!("'{value}'")
        } else {
            format!("\"{value}\"")
        }
    } else {
        value.to_string()
    }
}

/// Join tokens with single spaces
pub fn join_tokens<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

fn surrounding_quote(token: &str) -> Option<char> {
    let first = token.chars().next()?;
    if token.len() >= 2 && (first == '"' || first == '\'') && token.ends_with(first) {
        Some(first)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_splits_on_whitespace() {
        assert_eq!(
            lex("ffmpeg  -i in.mp4\t-c:v libx264   out.mp4"),
            vec!["ffmpeg", "-i", "in.mp4", "-c:v", "libx264", "out.mp4"]
        );
    }

    #[test]
    fn test_lex_keeps_quoted_spans_with_quotes() {
        assert_eq!(
            lex(r#"ffmpeg -i "my file.mp4" -metadata title='A B' out.mp4"#),
            vec!["ffmpeg", "-i", "\"my file.mp4\"", "-metadata", "title='A B'", "out.mp4"]
        );
    }

    #[test]
    fn test_lex_empty_input() {
        assert!(lex("").is_empty());
        assert!(lex("   \t ").is_empty());
    }

    #[test]
    fn test_lex_does_not_support_escaped_quotes() {
        // The backslash does not escape: the quote closes the span.
        assert_eq!(lex(r#""a\" b""#), vec![r#""a\""#, "b\""]);
    }

    #[test]
    fn test_unquote_and_requote() {
        assert_eq!(unquote("\"in file.mp4\""), "in file.mp4");
        assert_eq!(unquote("'x'"), "x");
        assert_eq!(unquote("\"unterminated"), "\"unterminated");
        assert_eq!(unquote("\""), "\"");
        assert_eq!(requote("\"in file.mp4\"", "INPUT"), "\"INPUT\"");
        assert_eq!(requote("'a'", "OUTPUT"), "'OUTPUT'");
        assert_eq!(requote("plain.mp4", "OUTPUT"), "OUTPUT");
    }

    #[test]
    fn test_quote_if_needed() {
        assert_eq!(quote_if_needed("scale=1280:-2"), "scale=1280:-2");
        assert_eq!(quote_if_needed("title=My Movie"), "\"title=My Movie\"");
        assert_eq!(quote_if_needed("a \"b\""), "'a \"b\"'");
    }
}
