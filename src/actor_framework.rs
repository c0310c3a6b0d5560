use std::collections::BTreeMap;
use std::fmt::{Debug, Display};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, trace};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Actions and Commands)
// =============================================================================

/// Trait that any domain entity must implement to be managed by ResourceActor.
///
/// Entities live in an ordered store keyed by `Id`. Besides the per-entity
/// `Action`s, an entity type may declare `Command`s that operate on the shared
/// `Context` owned by the actor (state that belongs to no single entity but
/// must change atomically with them).
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Ord + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;

    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;

    type Command: Send + Sync + Debug;
    type CommandResult: Send + Sync + Debug;

    type Context: Send + 'static;
    type Event: Clone + Send + Sync + Debug + 'static;
    type Error: Clone + Send + Sync + Debug + Display + 'static;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    /// Construct the full Entity from the ID and creation parameters.
    ///
    /// A rejected creation does not consume the ID.
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, Self::Error>;

    /// The error reported when `id` does not name a stored entity.
    fn not_found(id: &Self::Id) -> Self::Error;

    // --- Lifecycle Hooks ---

    fn on_create(&self) -> Vec<Self::Event> {
        Vec::new()
    }

    // --- Action and Command Handlers ---

    /// Handle a domain-specific action on one entity.
    ///
    /// The actor runs the action against a draft copy and only commits the
    /// draft on success. Context changes must happen after every check passed.
    fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &mut Self::Context,
    ) -> Result<Receipt<Self::ActionResult, Self::Event>, Self::Error>;

    /// Handle a command against the shared context.
    fn handle_command(
        ctx: &mut Self::Context,
        command: Self::Command,
    ) -> Result<Receipt<Self::CommandResult, Self::Event>, Self::Error>;
}

/// Output of a successful mutation together with the events it emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt<R, E> {
    pub output: R,
    pub events: Vec<E>,
}

impl<R, E> Receipt<R, E> {
    pub fn new(output: R, events: Vec<E>) -> Self {
        Self { output, events }
    }

    /// A receipt for an operation that emitted nothing.
    pub fn quiet(output: R) -> Self {
        Self { output, events: Vec::new() }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError<E> {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
    #[error("{0}")]
    Entity(E),
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T, E> = oneshot::Sender<Result<T, FrameworkError<E>>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<Receipt<T, T::Event>, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<T, T::Error>,
    },
    List {
        respond_to: Response<Vec<T>, T::Error>,
    },
    Count {
        respond_to: Response<u64, T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<Receipt<T::ActionResult, T::Event>, T::Error>,
    },
    Command {
        command: T::Command,
        respond_to: Response<Receipt<T::CommandResult, T::Event>, T::Error>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    context: T::Context,
    created: u64,
    next_id_fn: Box<dyn Fn(u64) -> T::Id + Send + Sync>,
    events: broadcast::Sender<T::Event>,
    feed: watch::Sender<Vec<T>>,
}

impl<T: Entity> ResourceActor<T> {
    /// Build the actor and its client.
    ///
    /// `next_id_fn` maps the 1-based creation sequence number to an ID; it is
    /// only called for creations that succeed.
    pub fn new(
        buffer_size: usize,
        event_capacity: usize,
        context: T::Context,
        next_id_fn: impl Fn(u64) -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (events, _) = broadcast::channel(event_capacity);
        let (feed, feed_rx) = watch::channel(Vec::new());
        let client = ResourceClient::new(sender, events.clone(), feed_rx);
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            context,
            created: 0,
            next_id_fn: Box::new(next_id_fn),
            events,
            feed,
        };
        (actor, client)
    }

    pub async fn run(mut self) {
        debug!(entity = std::any::type_name::<T>(), "ResourceActor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.handle_create(params));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self
                        .store
                        .get(&id)
                        .cloned()
                        .ok_or_else(|| FrameworkError::Entity(T::not_found(&id)));
                    let _ = respond_to.send(item);
                }
                ResourceRequest::List { respond_to } => {
                    let _ = respond_to.send(Ok(self.store.values().cloned().collect()));
                }
                ResourceRequest::Count { respond_to } => {
                    let _ = respond_to.send(Ok(self.created));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let _ = respond_to.send(self.handle_action(id, action));
                }
                ResourceRequest::Command { command, respond_to } => {
                    let _ = respond_to.send(self.handle_command(command));
                }
            }
        }
        debug!(entity = std::any::type_name::<T>(), "ResourceActor stopped");
    }

    fn handle_create(
        &mut self,
        params: T::CreateParams,
    ) -> Result<Receipt<T, T::Event>, FrameworkError<T::Error>> {
        let sequence = self.created + 1;
        let id = (self.next_id_fn)(sequence);
        let item = T::from_create_params(id, params).map_err(FrameworkError::Entity)?;
        let events = item.on_create();

        self.store.insert(item.id().clone(), item.clone());
        self.created = sequence;
        self.publish(&events);
        self.refresh_feed();
        Ok(Receipt::new(item, events))
    }

    fn handle_action(
        &mut self,
        id: T::Id,
        action: T::Action,
    ) -> Result<Receipt<T::ActionResult, T::Event>, FrameworkError<T::Error>> {
        let item = self
            .store
            .get_mut(&id)
            .ok_or_else(|| FrameworkError::Entity(T::not_found(&id)))?;

        let mut draft = item.clone();
        let receipt = draft
            .handle_action(action, &mut self.context)
            .map_err(FrameworkError::Entity)?;
        *item = draft;

        self.publish(&receipt.events);
        self.refresh_feed();
        Ok(receipt)
    }

    fn handle_command(
        &mut self,
        command: T::Command,
    ) -> Result<Receipt<T::CommandResult, T::Event>, FrameworkError<T::Error>> {
        let receipt = T::handle_command(&mut self.context, command).map_err(FrameworkError::Entity)?;
        self.publish(&receipt.events);
        Ok(receipt)
    }

    fn publish(&self, events: &[T::Event]) {
        for event in events {
            // No subscribers is not an error.
            if self.events.send(event.clone()).is_err() {
                trace!(?event, "Event dropped, no subscribers");
            }
        }
    }

    fn refresh_feed(&self) {
        self.feed.send_replace(self.store.values().cloned().collect());
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
    events: broadcast::Sender<T::Event>,
    feed: watch::Receiver<Vec<T>>,
}

type ClientResult<R, T> = Result<R, FrameworkError<<T as Entity>::Error>>;

impl<T: Entity> ResourceClient<T> {
    pub fn new(
        sender: mpsc::Sender<ResourceRequest<T>>,
        events: broadcast::Sender<T::Event>,
        feed: watch::Receiver<Vec<T>>,
    ) -> Self {
        Self { sender, events, feed }
    }

    async fn request<R>(
        &self,
        make: impl FnOnce(Response<R, T::Error>) -> ResourceRequest<T>,
    ) -> ClientResult<R, T> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> ClientResult<Receipt<T, T::Event>, T> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> ClientResult<T, T> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    pub async fn list(&self) -> ClientResult<Vec<T>, T> {
        self.request(|respond_to| ResourceRequest::List { respond_to })
            .await
    }

    pub async fn count(&self) -> ClientResult<u64, T> {
        self.request(|respond_to| ResourceRequest::Count { respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> ClientResult<Receipt<T::ActionResult, T::Event>, T> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to })
            .await
    }

    pub async fn execute(
        &self,
        command: T::Command,
    ) -> ClientResult<Receipt<T::CommandResult, T::Event>, T> {
        self.request(|respond_to| ResourceRequest::Command { command, respond_to })
            .await
    }

    /// Every event committed after this call, in commit order.
    pub fn subscribe(&self) -> broadcast::Receiver<T::Event> {
        self.events.subscribe()
    }

    /// The latest ordered snapshot of the store, refreshed after each mutation.
    pub fn feed(&self) -> watch::Receiver<Vec<T>> {
        self.feed.clone()
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
