use std::collections::HashMap;

use futures::future::BoxFuture;

use crate::error::StoreError;
use crate::models::quotes::QuoteRecord;
use crate::store::QuoteStore;

pub mod delete;
pub mod matches;
pub mod quote;

/// One triggered command as the host bot hands it over: who said it and
/// everything after the command word, if anything.
#[derive(Clone, Debug)]
pub struct Invocation {
    pub nick: String,
    pub args: Option<String>,
}

pub type Handler = for<'a> fn(&'a QuoteStore, &'a Invocation) -> BoxFuture<'a, String>;

/// Routing table from command names to handlers, built once at startup.
pub struct Router {
    routes: HashMap<&'static str, Handler>,
}

impl Router {
    pub fn new() -> Self {
        let mut routes: HashMap<&'static str, Handler> = HashMap::new();
        routes.insert("quote", quote::quote);
        routes.insert("match", matches::matches);
        routes.insert("delete", delete::delete);

        Self { routes }
    }

    /// Runs the named command and returns its reply line, or `None` if the
    /// command is not one of ours.
    pub async fn dispatch(
        &self,
        command: &str,
        store: &QuoteStore,
        invocation: &Invocation,
    ) -> Option<String> {
        let handler = self.routes.get(command)?;
        Some(handler(store, invocation).await)
    }

    pub fn commands(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.routes.keys().copied()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn format_quote(record: &QuoteRecord) -> String {
    format!(
        "{} = {}  [added by {}]",
        record.key.to_uppercase(),
        record.value,
        record.author
    )
}

pub(crate) fn failure_reply(err: &StoreError) -> String {
    match err {
        StoreError::Validation { field, limit, .. } => {
            format!("Sorry, your {} is too long (max {} characters).", field, limit)
        }
        _ => "Sorry, the quote database is unavailable. Try again later.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_replies_uppercase_the_key() {
        let record = QuoteRecord {
            id: 1,
            key: "hello".to_string(),
            value: "world".to_string(),
            author: "alice".to_string(),
            active: true,
        };
        assert_eq!(format_quote(&record), "HELLO = world  [added by alice]");
    }

    #[test]
    fn validation_failures_name_the_field() {
        let err = StoreError::Validation {
            field: "key",
            len: 97,
            limit: 96,
        };
        assert_eq!(
            failure_reply(&err),
            "Sorry, your key is too long (max 96 characters)."
        );
    }

    #[test]
    fn router_knows_its_three_commands() {
        let router = Router::new();
        let mut names: Vec<_> = router.commands().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["delete", "match", "quote"]);
    }
}
