use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use super::password;
use super::IdentityError;
use crate::clients::IdentityClient;
use crate::domain::{Actor, Credentials, User, UserCreate, UserId};
use crate::messages::{IdentityRequest, ServiceResponse};

/// User registry actor. Owns every account and answers credential checks.
pub struct IdentityService {
    receiver: mpsc::Receiver<IdentityRequest>,
    users: HashMap<UserId, User>,
    next_id: u64,
}

impl IdentityService {
    pub fn new(buffer_size: usize) -> (Self, IdentityClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            users: HashMap::new(),
            next_id: 1,
        };
        let client = IdentityClient::new(sender);
        (service, client)
    }

    #[instrument(name = "identity_service", skip(self))]
    pub async fn run(mut self) {
        info!("IdentityService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                IdentityRequest::Register { user, respond_to } => {
                    self.handle_register(user, respond_to);
                }
                IdentityRequest::Authenticate { credentials, respond_to } => {
                    self.handle_authenticate(credentials, respond_to);
                }
                IdentityRequest::GetUser { id, respond_to } => {
                    self.handle_get_user(id, respond_to);
                }
                IdentityRequest::Shutdown => {
                    info!("IdentityService shutting down");
                    break;
                }
                #[cfg(test)]
                IdentityRequest::GetUserCount { respond_to } => {
                    let _ = respond_to.send(Ok(self.users.len()));
                }
            }
        }

        info!("IdentityService stopped");
    }

    #[instrument(fields(username = %user.username, role = %user.role), skip(self, user, respond_to))]
    fn handle_register(&mut self, user: UserCreate, respond_to: ServiceResponse<User, IdentityError>) {
        debug!("Processing register request");
        let result = self.register(user);
        match &result {
            Ok(user) => info!(user_id = %user.id, "User registered"),
            Err(e) => warn!(error = %e, "Registration rejected"),
        }
        let _ = respond_to.send(result);
    }

    fn register(&mut self, user: UserCreate) -> Result<User, IdentityError> {
        let username = user.username.trim();
        let email = user.email.trim();
        if username.is_empty() || email.is_empty() || user.password.is_empty() {
            return Err(IdentityError::ValidationError(
                "username, email and password are required".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(IdentityError::ValidationError(format!("invalid email: {email}")));
        }
        if self.users.values().any(|u| u.username == username) {
            return Err(IdentityError::AlreadyExists(format!("username {username}")));
        }
        if self.users.values().any(|u| u.email.eq_ignore_ascii_case(email)) {
            return Err(IdentityError::AlreadyExists(format!("email {email}")));
        }

        let id = UserId::sequential(self.next_id);
        self.next_id += 1;
        let registered = User {
            id: id.clone(),
            username: username.to_string(),
            email: email.to_string(),
            role: user.role,
            password_hash: password::hash(&user.password),
        };
        self.users.insert(id, registered.clone());
        Ok(registered)
    }

    #[instrument(fields(username = %credentials.username), skip(self, credentials, respond_to))]
    fn handle_authenticate(&self, credentials: Credentials, respond_to: ServiceResponse<Actor, IdentityError>) {
        debug!("Processing authenticate request");

        let result = self
            .users
            .values()
            .find(|u| u.username == credentials.username.trim())
            .filter(|u| password::verify(&credentials.password, &u.password_hash))
            .map(User::actor)
            .ok_or(IdentityError::InvalidCredentials);

        match &result {
            Ok(actor) => info!(user_id = %actor.id, role = %actor.role, "Authenticated"),
            Err(_) => warn!("Authentication failed"),
        }
        let _ = respond_to.send(result);
    }

    #[instrument(fields(user_id = %id), skip(self, respond_to))]
    fn handle_get_user(&self, id: UserId, respond_to: ServiceResponse<Option<User>, IdentityError>) {
        debug!("Processing get_user request");
        let _ = respond_to.send(Ok(self.users.get(&id).cloned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    fn spawn() -> IdentityClient {
        let (service, client) = IdentityService::new(10);
        tokio::spawn(service.run());
        client
    }

    #[tokio::test]
    async fn register_then_authenticate() {
        let client = spawn();
        let user = client
            .register(UserCreate::new("alice", "alice@example.com", "pw", Role::Customer))
            .await
            .unwrap();
        assert_eq!(user.id, UserId::from("user_1"));
        assert_ne!(user.password_hash, "pw");
        assert!(user.password_hash.contains('$'));

        let actor = client.authenticate(Credentials::new("alice", "pw")).await.unwrap();
        assert_eq!(actor, Actor::customer("user_1"));

        assert_eq!(
            client.authenticate(Credentials::new("alice", "nope")).await,
            Err(IdentityError::InvalidCredentials)
        );
        assert_eq!(
            client.authenticate(Credentials::new("mallory", "pw")).await,
            Err(IdentityError::InvalidCredentials)
        );
    }

    #[tokio::test]
    async fn duplicates_and_blank_fields_are_rejected() {
        let client = spawn();
        client
            .register(UserCreate::new("bob", "bob@example.com", "pw", Role::RestaurantOwner))
            .await
            .unwrap();

        let dup_name = client
            .register(UserCreate::new("bob", "other@example.com", "pw", Role::Customer))
            .await;
        assert!(matches!(dup_name, Err(IdentityError::AlreadyExists(_))));

        let dup_email = client
            .register(UserCreate::new("robert", "BOB@example.com", "pw", Role::Customer))
            .await;
        assert!(matches!(dup_email, Err(IdentityError::AlreadyExists(_))));

        let blank = client.register(UserCreate::new("", "x@example.com", "pw", Role::Customer)).await;
        assert!(matches!(blank, Err(IdentityError::ValidationError(_))));

        assert_eq!(client.get_user_count().await, Ok(1));
        client.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn get_user_by_id() {
        let client = spawn();
        let registered = client
            .register(UserCreate::new("carol", "carol@example.com", "pw", Role::RestaurantOwner))
            .await
            .unwrap();

        let found = client.get_user(registered.id.clone()).await.unwrap();
        assert_eq!(found.as_ref().map(User::actor), Some(Actor::owner(registered.id.clone())));
        assert_eq!(found, Some(registered));
        assert_eq!(client.get_user(UserId::from("user_404")).await, Ok(None));
    }
}
