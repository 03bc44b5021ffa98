use futures::future::BoxFuture;

use crate::commands::{failure_reply, Invocation};
use crate::store::QuoteStore;

/// `.match <pattern>` - list keys matching a glob pattern.
///
/// Users write `*` and `?` wildcards; a bare word is treated as a
/// substring search (`ello` behaves like `*ello*`). The store itself only
/// speaks SQL `LIKE`, so the translation happens here.
pub fn matches<'a>(store: &'a QuoteStore, invocation: &'a Invocation) -> BoxFuture<'a, String> {
    Box::pin(async move {
        let raw = invocation.args.as_deref().map(str::trim).unwrap_or("");
        if raw.is_empty() {
            return "This command requires arguments.".to_string();
        }

        let pattern = glob_to_like(raw);

        match store.match_keys(&pattern).await {
            Ok(keys) if keys.is_empty() => format!("No keys matching {}.", raw),
            Ok(keys) => format!("Keys matching {}: ({})", raw, keys.join(", ")),
            Err(e) => {
                tracing::error!(err = ?e, pattern = %pattern, "an error occurred when matching keys");
                failure_reply(&e)
            }
        }
    })
}

/// Translates the user-facing glob convention into a `LIKE` pattern:
/// `*` becomes `%`, `?` becomes `_`, literal `%`/`_`/`\` are escaped, and
/// a pattern with no wildcards at all is wrapped in `%...%`.
fn glob_to_like(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 2);
    let mut has_wildcard = false;

    for c in glob.chars() {
        match c {
            '*' => {
                has_wildcard = true;
                out.push('%');
            }
            '?' => {
                has_wildcard = true;
                out.push('_');
            }
            '%' | '_' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }

    if has_wildcard {
        out
    } else {
        format!("%{}%", out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stars_become_percent_signs() {
        assert_eq!(glob_to_like("hel*"), "hel%");
        assert_eq!(glob_to_like("*ello*"), "%ello%");
    }

    #[test]
    fn question_marks_become_underscores() {
        assert_eq!(glob_to_like("hel?o"), "hel_o");
    }

    #[test]
    fn bare_words_search_as_substrings() {
        assert_eq!(glob_to_like("ello"), "%ello%");
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(glob_to_like("50%*"), "50\\%%");
        assert_eq!(glob_to_like("a_b"), "%a\\_b%");
    }
}
