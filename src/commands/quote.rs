use futures::future::BoxFuture;

use crate::commands::{failure_reply, format_quote, Invocation};
use crate::store::{AddOutcome, QuoteStore};

/// `.quote` - view a random quote, look one up, or add one.
///
/// No arguments picks a random quote. `key = value` adds a quote under
/// that key. Anything else is an exact lookup.
pub fn quote<'a>(store: &'a QuoteStore, invocation: &'a Invocation) -> BoxFuture<'a, String> {
    Box::pin(async move {
        let args = invocation.args.as_deref().map(str::trim).unwrap_or("");

        if args.is_empty() {
            return random_quote(store).await;
        }

        match split_assignment(args) {
            Some((key, value)) => add_quote(store, key, value, &invocation.nick).await,
            None => lookup_quote(store, args).await,
        }
    })
}

async fn random_quote(store: &QuoteStore) -> String {
    match store.random().await {
        Ok(Some(record)) => format_quote(&record),
        Ok(None) => "There are no quotes yet.".to_string(),
        Err(e) => {
            tracing::error!(err = ?e, "an error occurred when fetching a random quote");
            failure_reply(&e)
        }
    }
}

async fn lookup_quote(store: &QuoteStore, key: &str) -> String {
    match store.search(key).await {
        Ok(Some(record)) => format_quote(&record),
        Ok(None) => "Sorry, I couldn't find anything for that.".to_string(),
        Err(e) => {
            tracing::error!(err = ?e, key, "an error occurred when fetching quote");
            failure_reply(&e)
        }
    }
}

async fn add_quote(store: &QuoteStore, key: &str, value: &str, nick: &str) -> String {
    match store.add(key, value, nick).await {
        Ok(AddOutcome::Added) => "Added quote.".to_string(),
        Ok(AddOutcome::AlreadyExists) => "Quote already exists.".to_string(),
        Err(e) => {
            tracing::error!(err = ?e, key, "an error occurred when adding quote");
            failure_reply(&e)
        }
    }
}

/// Splits `key = value` on the first `=`, trimming both halves. Returns
/// `None` when there is no `=`, which makes the argument a lookup instead.
fn split_assignment(args: &str) -> Option<(&str, &str)> {
    let (key, value) = args.split_once('=')?;
    Some((key.trim(), value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_splits_on_first_equals() {
        assert_eq!(
            split_assignment("hello = a = b"),
            Some(("hello", "a = b"))
        );
    }

    #[test]
    fn assignment_trims_both_halves() {
        assert_eq!(split_assignment("  hello =  world  "), Some(("hello", "world")));
    }

    #[test]
    fn plain_words_are_not_assignments() {
        assert_eq!(split_assignment("hello world"), None);
    }
}
