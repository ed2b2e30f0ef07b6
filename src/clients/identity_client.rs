use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::domain::{Actor, Credentials, User, UserCreate, UserId};
use crate::identity::IdentityError;
use crate::messages::IdentityRequest;

/// Client for the identity provider.
#[derive(Clone)]
pub struct IdentityClient {
    sender: mpsc::Sender<IdentityRequest>,
}

impl IdentityClient {
    pub fn new(sender: mpsc::Sender<IdentityRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), String> {
        debug!("Sending shutdown request");
        self.sender
            .send(IdentityRequest::Shutdown)
            .await
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

client_method!(IdentityClient => fn register(user: UserCreate) -> User
    as IdentityRequest::Register, Error = IdentityError);
client_method!(IdentityClient => fn authenticate(credentials: Credentials) -> Actor
    as IdentityRequest::Authenticate, Error = IdentityError);
client_method!(IdentityClient => fn get_user(id: UserId) -> Option<User>
    as IdentityRequest::GetUser, Error = IdentityError);

#[cfg(test)]
client_method!(IdentityClient => fn get_user_count() -> usize
    as IdentityRequest::GetUserCount, Error = IdentityError);
