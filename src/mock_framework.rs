//! # Mock Framework
//!
//! Stand-ins for catalog actors, so a component that talks to the catalog
//! can be driven request by request.
//!
//! Use [`create_mock_client`] to get a client and the receiving end of its
//! channel, then [`expect_get`] and friends to answer each request.

use crate::actor_framework::{Entity, Response, ResourceClient, ResourceRequest};
use tokio::sync::mpsc;

/// Creates a client whose requests arrive on the returned receiver instead of a `ResourceActor`.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Returns the next request if it is a Create.
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreatePayload, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { payload, respond_to }) => Some((payload, respond_to)),
        _ => None,
    }
}

/// Returns the next request if it is a Get.
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Returns the next request if it is an Action.
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MenuItem, MenuItemCreate, MenuItemId, Money, RestaurantId};

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<MenuItem>(10);

        let create_task = tokio::spawn(async move {
            client
                .create(MenuItemCreate::new("restaurant_1", "Pad Thai", "Mains", Money::from_cents(1250)))
                .await
        });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.name, "Pad Thai");
        let item = MenuItem {
            id: MenuItemId::from("item_1"),
            restaurant_id: RestaurantId::from("restaurant_1"),
            name: payload.name,
            category: payload.category,
            price: payload.price,
            is_available: true,
        };
        responder.send(Ok(item.clone())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(item));
    }
}
