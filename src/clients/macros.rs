/// Generates read methods for a client wrapping a `ResourceClient`.
///
/// `get_<entity>` returns `Option`; `require_<entity>` turns absence into the
/// error type's `NotFound` (via `From<FrameworkError>`).
macro_rules! impl_client_methods {
    ($client_name:ident, $entity:ty, $id:ty, $error:ty, $entity_name_snake:ident) => {
        paste::paste! {
            impl $client_name {
                #[tracing::instrument(skip(self))]
                pub async fn [<get_ $entity_name_snake>](&self, id: $id) -> Result<Option<$entity>, $error> {
                    tracing::debug!("Sending request");
                    self.inner.get(id).await.map_err(<$error>::from)
                }

                #[tracing::instrument(skip(self))]
                pub async fn [<require_ $entity_name_snake>](&self, id: $id) -> Result<$entity, $error> {
                    tracing::debug!("Sending request");
                    match self.inner.get(id.clone()).await? {
                        Some(entity) => Ok(entity),
                        None => Err($crate::actor_framework::FrameworkError::NotFound {
                            kind: <$entity as $crate::actor_framework::Entity>::KIND,
                            id: id.to_string(),
                        }
                        .into()),
                    }
                }
            }
        }
    };
}

macro_rules! impl_client_new {
    ($client_name:ident, $entity:ty) => {
        impl $client_name {
            pub fn new(inner: $crate::actor_framework::ResourceClient<$entity>) -> Self {
                Self { inner }
            }
        }
    };
}

macro_rules! impl_basic_client {
    ($client_name:ident, $entity:ty, $id:ty, $error:ty, $entity_name_snake:ident) => {
        impl_client_new!($client_name, $entity);
        impl_client_methods!($client_name, $entity, $id, $error, $entity_name_snake);
    };
}

/// Generates a client method for a hand-written service actor: builds the
/// request variant from the parameters plus a oneshot reply channel.
macro_rules! client_method {
    (
        $client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty
        as $request:ident::$variant:ident, Error = $error_type:ty
    ) => {
        impl $client {
            #[tracing::instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, $error_type> {
                tracing::debug!("Sending request");
                let (respond_to, response) = tokio::sync::oneshot::channel();
                self.sender.send($request::$variant {
                    $($param,)*
                    respond_to,
                }).await.map_err(|_| <$error_type>::ActorCommunicationError("Actor closed".to_string()))?;

                response.await.map_err(|_| <$error_type>::ActorCommunicationError("Actor dropped".to_string()))?
            }
        }
    };
}
