use super::prelude::*;
use crate::services::TransactionFilter;

#[derive(Default)]
pub struct TransactionQueries;

#[Object]
impl TransactionQueries {
    /// Order transactions matching every given filter field
    #[graphql(guard = "AuthGuard")]
    async fn transactions(
        &self,
        ctx: &Context<'_>,
        filter: Option<TransactionFilterInput>,
        page: Option<PageInput>,
    ) -> Result<Vec<Transaction>> {
        let services = ctx.data_unchecked::<Services>();
        let args = filter.map(FilterArgs::from).unwrap_or_default();

        let query = TransactionFilter
            .query(args)
            .map_err(|e| app_error("transactions", e))?;
        let transactions = services
            .db
            .transactions()
            .filter(&paginate(query, page))
            .await
            .map_err(|e| app_error("transactions", e))?;

        Ok(transactions.into_iter().map(Transaction::from).collect())
    }
}
