//! Marketplace wiring shared by integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use taskpanda::acceptance::{
    adapters::memory::InMemoryAcceptanceRepository, ports::AcceptanceRepository,
    services::AcceptanceCoordinator,
};
use taskpanda::chat::{
    adapters::memory::InMemoryChatRepository, ports::ChatRepository, services::ChatService,
};
use taskpanda::notification::adapters::LoggingNotificationSink;
use taskpanda::offer::{
    adapters::memory::InMemoryOfferRepository,
    ports::OfferRepository,
    services::{CreateOfferRequest, OfferService, PlacedOffer},
};
use taskpanda::profile::{
    adapters::memory::InMemoryProfileDirectory,
    domain::{Profile, ProfileId, ProfileRole},
    ports::ProfileDirectory,
};
use taskpanda::store::InMemoryStore;
use taskpanda::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::Task,
    ports::TaskRepository,
    services::{CreateTaskRequest, TaskLifecycleService},
};

/// Boxed error type used by fallible helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Every marketplace service wired over one set of adapters.
pub struct Marketplace<T, O, Ch, A, D>
where
    T: TaskRepository,
    O: OfferRepository,
    Ch: ChatRepository,
    A: AcceptanceRepository,
    D: ProfileDirectory + 'static,
{
    pub tasks: TaskLifecycleService<T, D, LoggingNotificationSink<D>, DefaultClock>,
    pub offers: OfferService<O, T, D, DefaultClock>,
    pub chats: ChatService<Ch, D, DefaultClock>,
    pub acceptance: AcceptanceCoordinator<A, O, T, D, DefaultClock>,
    pub directory: Arc<D>,
}

/// Marketplace over the shared in-memory tables.
pub type InMemoryMarketplace = Marketplace<
    InMemoryTaskRepository,
    InMemoryOfferRepository,
    InMemoryChatRepository,
    InMemoryAcceptanceRepository,
    InMemoryProfileDirectory,
>;

impl<T, O, Ch, A, D> Marketplace<T, O, Ch, A, D>
where
    T: TaskRepository,
    O: OfferRepository,
    Ch: ChatRepository,
    A: AcceptanceRepository,
    D: ProfileDirectory + 'static,
{
    /// Wires the services over the given adapters.
    pub fn wire(
        tasks: Arc<T>,
        offers: Arc<O>,
        chats: Arc<Ch>,
        acceptance: Arc<A>,
        directory: Arc<D>,
    ) -> Self {
        let clock = Arc::new(DefaultClock);
        let notifier = Arc::new(LoggingNotificationSink::new(Arc::clone(&directory)));
        Self {
            tasks: TaskLifecycleService::new(
                Arc::clone(&tasks),
                Arc::clone(&directory),
                notifier,
                Arc::clone(&clock),
            ),
            offers: OfferService::new(
                Arc::clone(&offers),
                Arc::clone(&tasks),
                Arc::clone(&directory),
                Arc::clone(&clock),
            ),
            chats: ChatService::new(chats, Arc::clone(&directory), Arc::clone(&clock)),
            acceptance: AcceptanceCoordinator::new(
                acceptance,
                offers,
                tasks,
                Arc::clone(&directory),
                clock,
            ),
            directory,
        }
    }

    /// Registers a profile and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error when the profile is invalid or cannot be stored.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        role: ProfileRole,
    ) -> Result<ProfileId, BoxError> {
        let profile = Profile::new(name, email, role, &DefaultClock)?;
        self.directory.register(&profile).await?;
        Ok(profile.id())
    }

    /// Posts an open task for `customer`.
    ///
    /// # Errors
    ///
    /// Returns an error when task creation fails.
    pub async fn post_task(
        &self,
        customer: ProfileId,
        title: &str,
        budget: &str,
    ) -> Result<Task, BoxError> {
        let task = self
            .tasks
            .create(CreateTaskRequest {
                category: "cleaning".to_owned(),
                title: title.to_owned(),
                description: "Two-bedroom flat, end of tenancy".to_owned(),
                budget: budget.to_owned(),
                location: "Leeds".to_owned(),
                date: "2026-11-20".to_owned(),
                created_by: customer,
            })
            .await?;
        Ok(task)
    }

    /// Places an offer on `task` from `provider`.
    ///
    /// # Errors
    ///
    /// Returns an error when offer placement fails.
    pub async fn bid(
        &self,
        task: &Task,
        provider: ProfileId,
        price: &str,
        note: &str,
    ) -> Result<PlacedOffer, BoxError> {
        let placed = self
            .offers
            .create(CreateOfferRequest {
                task_id: task.id(),
                provider_id: provider,
                price: price.to_owned(),
                message: note.to_owned(),
            })
            .await?;
        Ok(placed)
    }
}

impl InMemoryMarketplace {
    /// Creates a marketplace over a fresh in-memory store.
    pub fn in_memory() -> Self {
        let store = InMemoryStore::new();
        Self::wire(
            Arc::new(InMemoryTaskRepository::new(store.clone())),
            Arc::new(InMemoryOfferRepository::new(store.clone())),
            Arc::new(InMemoryChatRepository::new(store.clone())),
            Arc::new(InMemoryAcceptanceRepository::new(store.clone())),
            Arc::new(InMemoryProfileDirectory::new(store)),
        )
    }
}
