//! External provider seams.
//!
//! Everything the session needs from the outside world comes through these
//! traits: the player's physical location, walkable patrol routes, the
//! game's reference collections, a key-value store, and a sink for floating
//! feedback. Async providers return boxed futures so implementations can be
//! plain structs without a macro dependency; the synchronous ones are
//! expected to be cheap.

use std::future::Future;
use std::pin::Pin;

use rq_core::LatLng;
use rq_core::ability::Ability;
use rq_core::item::Item;
use rq_core::reference::{Ancestry, Background, ClassDef, ReferenceData, Skill};
use rq_simulation::FloatingFeedback;

use crate::error::ProviderError;

/// A boxed future returned by an async provider method.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Shorthand for the result of one reference-collection fetch.
type FetchResult<T> = Result<Vec<T>, ProviderError>;

/// Produces walkable patrol routes through the requested waypoints.
pub trait RouteProvider: Send + Sync {
    /// Fetch a closed walking route visiting the given waypoints, in
    /// order. The returned path may contain many more points than were
    /// requested.
    fn fetch_route(
        &self,
        waypoints: Vec<LatLng>,
    ) -> ProviderFuture<'_, Result<Vec<LatLng>, ProviderError>>;
}

/// Reports the player's physical position.
pub trait LocationSource: Send + Sync {
    /// The player's current position.
    ///
    /// Returns [`ProviderError::PermissionDenied`] if the platform refused
    /// location access; at session startup that error is fatal.
    fn current_position(&self) -> ProviderFuture<'_, Result<LatLng, ProviderError>>;
}

/// Fetches the read-mostly game reference collections.
///
/// Each collection is fetched independently; see [`load_reference_data`]
/// for the fail-soft aggregation.
pub trait EntityRepository: Send + Sync {
    /// All known abilities.
    fn abilities(&self) -> ProviderFuture<'_, FetchResult<Ability>>;
    /// All known ancestries.
    fn ancestries(&self) -> ProviderFuture<'_, FetchResult<Ancestry>>;
    /// The item catalog.
    fn items(&self) -> ProviderFuture<'_, FetchResult<Item>>;
    /// All known skills.
    fn skills(&self) -> ProviderFuture<'_, FetchResult<Skill>>;
    /// All known backgrounds.
    fn backgrounds(&self) -> ProviderFuture<'_, FetchResult<Background>>;
    /// All known classes.
    fn classes(&self) -> ProviderFuture<'_, FetchResult<ClassDef>>;
}

/// Durable key-value storage for the session identifier.
pub trait PersistentStore: Send + Sync {
    /// Load the value stored under `key`, if any.
    fn load(&self, key: &str) -> Result<Option<String>, ProviderError>;

    /// Store `value` under `key`, replacing any existing value.
    fn save(&self, key: &str, value: &str) -> Result<(), ProviderError>;
}

/// Receives floating feedback records for display.
pub trait FeedbackSink: Send + Sync {
    /// Publish a batch of new records. Each record is delivered at most
    /// once; delivery order follows creation order.
    fn publish(&self, records: &[FloatingFeedback]);
}

/// Storage key for the session identifier.
pub const SESSION_ID_KEY: &str = "roamquest.session";

/// Fetch every reference collection, degrading each one independently.
///
/// A failed fetch logs a warning and leaves that collection empty; the
/// others are unaffected. Reference tables enrich the session but are never
/// required to run it.
pub async fn load_reference_data(repo: &dyn EntityRepository) -> ReferenceData {
    ReferenceData {
        abilities: fetch_or_empty("abilities", repo.abilities()).await,
        ancestries: fetch_or_empty("ancestries", repo.ancestries()).await,
        items: fetch_or_empty("items", repo.items()).await,
        skills: fetch_or_empty("skills", repo.skills()).await,
        backgrounds: fetch_or_empty("backgrounds", repo.backgrounds()).await,
        classes: fetch_or_empty("classes", repo.classes()).await,
    }
}

async fn fetch_or_empty<T>(
    collection: &str,
    fetch: ProviderFuture<'_, FetchResult<T>>,
) -> Vec<T> {
    match fetch.await {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(collection, %err, "reference fetch failed, collection left empty");
            Vec::new()
        }
    }
}
