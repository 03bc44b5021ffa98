use futures::future::BoxFuture;

use crate::commands::{failure_reply, Invocation};
use crate::store::QuoteStore;

/// `.delete <key>` - soft-delete the quote under a key.
///
/// Deleting a key that has no active quote is reported as not found rather
/// than pretending something was removed.
pub fn delete<'a>(store: &'a QuoteStore, invocation: &'a Invocation) -> BoxFuture<'a, String> {
    Box::pin(async move {
        let key = invocation.args.as_deref().map(str::trim).unwrap_or("");
        if key.is_empty() {
            return "This command requires arguments.".to_string();
        }

        match store.delete(key).await {
            Ok(0) => "Sorry, I couldn't find anything for that.".to_string(),
            Ok(_) => "Deleted quote.".to_string(),
            Err(e) => {
                tracing::error!(err = ?e, key, "an error occurred when deleting quote");
                failure_reply(&e)
            }
        }
    })
}
