use stripe::{Client, Subscription, SubscriptionId};

use crate::error::{AppError, Res};

pub fn create_client(secret_key: &str) -> Client {
    Client::new(secret_key)
}

/// Retrieves a subscription by its external identifier. Used when a checkout
/// session completes and the event only references the subscription id.
pub async fn retrieve_subscription(client: &Client, subscription_id: &str) -> Res<Subscription> {
    let id = subscription_id.parse::<SubscriptionId>().map_err(|e| {
        AppError::BadRequest(format!(
            "Invalid subscription id: {}. {}",
            subscription_id, e
        ))
    })?;
    Subscription::retrieve(client, &id, &[])
        .await
        .map_err(AppError::from)
}
