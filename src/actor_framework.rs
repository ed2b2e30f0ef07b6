use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Payloads, and Actions)
// =============================================================================

/// Trait that any catalog entity must implement to be managed by ResourceActor
pub trait Entity: Clone + Send + Sync + 'static {
    /// Short lowercase name used in logs and not-found messages.
    const KIND: &'static str;

    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreatePayload: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;

    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;

    fn id(&self) -> &Self::Id;

    /// Construct the full Entity from the minted ID and the payload
    fn from_create(id: Self::Id, payload: Self::CreatePayload) -> Result<Self, String>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), String> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), String>;
    fn on_delete(&self) -> Result<(), String> {
        Ok(())
    }

    // --- Action Handler ---

    /// Handle a custom domain-specific action
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, String>;
}

/// Failures of the generic resource protocol.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("Rejected: {0}")]
    Rejected(String),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        payload: T::CreatePayload,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        let client = ResourceClient { sender };
        (actor, client)
    }

    /// Serves requests until every client has been dropped.
    pub async fn run(mut self) {
        info!(kind = T::KIND, "ResourceActor starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { payload, respond_to } => {
                    let _ = respond_to.send(self.handle_create(payload));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let _ = respond_to.send(self.handle_update(id, patch));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.handle_delete(id));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let _ = respond_to.send(self.handle_action(id, action));
                }
            }
        }

        info!(kind = T::KIND, "ResourceActor stopped");
    }

    fn handle_create(&mut self, payload: T::CreatePayload) -> Result<T, FrameworkError> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create(id.clone(), payload).map_err(FrameworkError::Rejected)?;
        item.on_create().map_err(FrameworkError::Rejected)?;
        debug!(kind = T::KIND, id = %id, "Entity created");
        self.store.insert(id, item.clone());
        Ok(item)
    }

    fn handle_update(&mut self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        let item = self.store.get_mut(&id).ok_or_else(|| not_found::<T>(&id))?;
        // Hooks validate before mutating, so a rejected patch leaves the item as it was.
        item.on_update(patch).map_err(|e| {
            warn!(kind = T::KIND, id = %id, error = %e, "Update rejected");
            FrameworkError::Rejected(e)
        })?;
        Ok(item.clone())
    }

    fn handle_delete(&mut self, id: T::Id) -> Result<(), FrameworkError> {
        let item = self.store.get(&id).ok_or_else(|| not_found::<T>(&id))?;
        item.on_delete().map_err(FrameworkError::Rejected)?;
        self.store.remove(&id);
        Ok(())
    }

    fn handle_action(&mut self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        let item = self.store.get_mut(&id).ok_or_else(|| not_found::<T>(&id))?;
        item.handle_action(action).map_err(FrameworkError::Rejected)
    }
}

fn not_found<T: Entity>(id: &T::Id) -> FrameworkError {
    FrameworkError::NotFound { kind: T::KIND, id: id.to_string() }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

// Manual impl: a derive would demand `T: Clone` on top of the channel.
impl<T: Entity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self { sender: self.sender.clone() }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn create(&self, payload: T::CreatePayload) -> Result<T, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Create { payload, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Get { id, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Update { id, patch, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Delete { id, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Action { id, action, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}

/// Returns an id generator yielding `make(1)`, `make(2)`, ...
pub fn sequential_ids<I>(make: fn(u64) -> I) -> impl Fn() -> I + Send + Sync + 'static
where
    I: 'static,
{
    let counter = std::sync::atomic::AtomicU64::new(1);
    move || make(counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst))
}

// =============================================================================
// 5. TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MenuItem, MenuItemCreate, MenuItemId, MenuItemPatch, Money};
    use crate::catalog::{MenuItemAction, MenuItemActionResult};

    fn spawn_menu() -> ResourceClient<MenuItem> {
        let (actor, client) = ResourceActor::<MenuItem>::new(10, sequential_ids(MenuItemId::sequential));
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn test_resource_actor_with_actions() {
        let client = spawn_menu();

        let item = client
            .create(MenuItemCreate::new("restaurant_1", "Pad Thai", "Mains", Money::from_cents(1250)))
            .await
            .unwrap();
        assert_eq!(item.id, MenuItemId::from("item_1"));
        assert!(item.is_available);

        let changed = client
            .perform_action(item.id.clone(), MenuItemAction::SetAvailability(false))
            .await
            .unwrap();
        assert!(matches!(changed, MenuItemActionResult::Availability { changed: true, is_available: false }));

        let stored = client.get(item.id.clone()).await.unwrap().unwrap();
        assert!(!stored.is_available);

        let unchanged = client
            .perform_action(item.id.clone(), MenuItemAction::SetAvailability(false))
            .await
            .unwrap();
        assert!(matches!(unchanged, MenuItemActionResult::Availability { changed: false, .. }));
    }

    #[tokio::test]
    async fn rejected_create_and_missing_ids_are_reported() {
        let client = spawn_menu();

        let err = client
            .create(MenuItemCreate::new("restaurant_1", "Free lunch", "Mains", Money::ZERO))
            .await
            .unwrap_err();
        assert!(matches!(err, FrameworkError::Rejected(_)));

        let err = client
            .update(MenuItemId::from("item_404"), MenuItemPatch::default())
            .await
            .unwrap_err();
        assert_eq!(err, FrameworkError::NotFound { kind: "menu item", id: "item_404".to_string() });

        assert_eq!(client.get(MenuItemId::from("item_404")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_removes_entity() {
        let client = spawn_menu();
        let item = client
            .create(MenuItemCreate::new("restaurant_1", "Soup", "Starters", Money::from_cents(600)))
            .await
            .unwrap();

        client.delete(item.id.clone()).await.unwrap();
        assert_eq!(client.get(item.id.clone()).await.unwrap(), None);
        assert!(matches!(client.delete(item.id).await, Err(FrameworkError::NotFound { .. })));
    }
}
