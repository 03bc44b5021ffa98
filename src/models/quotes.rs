/// One row of the quotes table.
///
/// `active` is a soft-delete flag: deleted quotes stay in the table for
/// history but are invisible to every read path.
#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct QuoteRecord {
    pub id: u64,
    pub key: String,
    pub value: String,
    pub author: String,
    pub active: bool,
}
