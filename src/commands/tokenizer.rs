//! Command tokenizer
//!
//! Turns `/verb arg "quoted arg" ...` into a lower-cased verb and an ordered,
//! quote-aware argument list.

use crate::error::TokenizeError;
use serde::Serialize;

pub const DEFAULT_PREFIX: char = '/';

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub verb: String,
    pub args: Vec<String>,
}

/// True for text starting with two prefix characters (`//like this`).
///
/// Escaped text is ordinary chat with one prefix stripped, never a command.
pub fn is_escaped(text: &str, prefix: char) -> bool {
    let mut chars = text.chars();
    chars.next() == Some(prefix) && chars.next() == Some(prefix)
}

/// Split `text` into a verb and its arguments.
///
/// Whitespace runs separate tokens. A token opening with `"` swallows the
/// following tokens, joined by single spaces, until one closes with `"`.
/// Argument case is preserved; the verb is lower-cased.
pub fn tokenize(text: &str, prefix: char) -> Result<Invocation, TokenizeError> {
    let mut parts = text.split_whitespace();

    let verb = parts
        .next()
        .and_then(|first| first.strip_prefix(prefix))
        .ok_or(TokenizeError::MissingPrefix(prefix))?;
    if verb.is_empty() {
        return Err(TokenizeError::EmptyVerb);
    }

    let mut args = Vec::new();
    while let Some(part) = parts.next() {
        let Some(opened) = part.strip_prefix('"') else {
            args.push(part.to_string());
            continue;
        };

        // Single-word quote: "word"
        if let Some(inner) = opened.strip_suffix('"') {
            args.push(inner.to_string());
            continue;
        }

        let mut arg = opened.to_string();
        loop {
            let next = parts.next().ok_or(TokenizeError::UnterminatedQuote)?;
            arg.push(' ');
            if let Some(inner) = next.strip_suffix('"') {
                arg.push_str(inner);
                break;
            }
            arg.push_str(next);
        }
        args.push(arg);
    }

    Ok(Invocation {
        verb: verb.to_lowercase(),
        args,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_arguments() {
        let inv = tokenize("/Say a b \"c d\" e", '/').unwrap();
        assert_eq!(inv.verb, "say");
        assert_eq!(inv.args, vec!["a", "b", "c d", "e"]);
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        let inv = tokenize("/kick   \"Big   Bob\"\tnow", '/').unwrap();
        assert_eq!(inv.verb, "kick");
        assert_eq!(inv.args, vec!["Big Bob", "now"]);
    }

    #[test]
    fn test_single_word_quote_and_case() {
        let inv = tokenize("/INVITE \"Alice\" MiXeD", '/').unwrap();
        assert_eq!(inv.verb, "invite");
        assert_eq!(inv.args, vec!["Alice", "MiXeD"]);
    }

    #[test]
    fn test_no_arguments() {
        let inv = tokenize("/help", '/').unwrap();
        assert_eq!(inv.verb, "help");
        assert!(inv.args.is_empty());
    }

    #[test]
    fn test_unterminated_quote_fails() {
        assert_eq!(
            tokenize("/say a \"unterminated", '/'),
            Err(TokenizeError::UnterminatedQuote)
        );
        assert_eq!(
            tokenize("/say \"never closed here", '/'),
            Err(TokenizeError::UnterminatedQuote)
        );
        // A lone quote opens but cannot close itself
        assert_eq!(tokenize("/say \"", '/'), Err(TokenizeError::UnterminatedQuote));
    }

    #[test]
    fn test_empty_verb_fails() {
        assert_eq!(tokenize("/", '/'), Err(TokenizeError::EmptyVerb));
        assert_eq!(tokenize("/ invite 1", '/'), Err(TokenizeError::EmptyVerb));
    }

    #[test]
    fn test_missing_prefix_fails() {
        assert_eq!(tokenize("hello", '/'), Err(TokenizeError::MissingPrefix('/')));
        assert_eq!(tokenize("", '/'), Err(TokenizeError::MissingPrefix('/')));
    }

    #[test]
    fn test_custom_prefix() {
        let inv = tokenize("!roll 2d6", '!').unwrap();
        assert_eq!(inv.verb, "roll");
        assert_eq!(inv.args, vec!["2d6"]);
        assert!(tokenize("/roll", '!').is_err());
    }

    #[test]
    fn test_escape_detection() {
        assert!(is_escaped("//foo", '/'));
        assert!(!is_escaped("/foo", '/'));
        assert!(!is_escaped("foo", '/'));
        assert!(!is_escaped("/", '/'));
        assert!(is_escaped("!!x", '!'));
    }
}
