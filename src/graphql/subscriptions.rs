//! GraphQL subscriptions for admin lifecycle events

use async_graphql::{Context, Subscription};
use futures::Stream;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use crate::services::Services;

use super::auth::AuthGuard;
use super::types::AdminLifecycleEvent;

pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Admin create/update/delete events, in the order they were emitted.
    /// Events missed by a lagging client are skipped.
    #[graphql(guard = "AuthGuard")]
    async fn admin_events<'ctx>(
        &self,
        ctx: &Context<'ctx>,
    ) -> impl Stream<Item = AdminLifecycleEvent> + 'ctx {
        let services = ctx.data_unchecked::<Services>();
        let receiver = services.events.subscribe();

        BroadcastStream::new(receiver).filter_map(|result| match result {
            Ok(event) => Some(AdminLifecycleEvent::from(event)),
            Err(e) => {
                tracing::warn!(error = %e, "Admin event subscriber lagged");
                None
            }
        })
    }
}
