//! The async session driver.
//!
//! [`Session::start`] verifies location access, builds a simulation around
//! the player, and hands the whole thing to a background task. That task
//! multiplexes four event sources with `tokio::select!`: the fixed tick
//! interval, the slow route-fetch interval, completed route fetches, and
//! player commands. Route fetches run as spawned tasks so a slow provider
//! never delays a tick; a failed fetch costs one spawn cycle and a warning,
//! nothing more.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use uuid::Uuid;

use rq_core::ability::Ability;
use rq_core::entity::Character;
use rq_core::geo::{self, LatLng};
use rq_core::profile::{AbilityScores, CombatProfile, Vitals};
use rq_core::reference::ReferenceData;
use rq_mechanics::{FibonacciProgression, FlatProgression, ProgressionPolicy};
use rq_simulation::{SimConfig, Simulation};

use crate::error::{ProviderError, SessionError, SessionResult};
use crate::providers::{
    EntityRepository, FeedbackSink, LocationSource, PersistentStore, RouteProvider,
    SESSION_ID_KEY, load_reference_data,
};

/// The external services a session runs against.
#[derive(Clone)]
pub struct Providers {
    /// Patrol route source.
    pub routes: Arc<dyn RouteProvider>,
    /// Player position source.
    pub location: Arc<dyn LocationSource>,
    /// Reference collection source.
    pub entities: Arc<dyn EntityRepository>,
    /// Durable key-value storage.
    pub store: Arc<dyn PersistentStore>,
    /// Display sink for floating feedback.
    pub feedback: Arc<dyn FeedbackSink>,
}

/// Which leveling policy the session runs with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Leveling {
    /// Fibonacci thresholds with +1/+1 resource growth.
    #[default]
    Fibonacci,
    /// Flat 100-per-level thresholds with +20/+10 resource growth.
    Flat,
}

impl Leveling {
    fn policy(self) -> Box<dyn ProgressionPolicy> {
        match self {
            Self::Fibonacci => Box::new(FibonacciProgression),
            Self::Flat => Box::new(FlatProgression),
        }
    }
}

/// Session-level configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Simulation parameters.
    pub sim: SimConfig,
    /// The player's combat profile.
    pub profile: CombatProfile,
    /// The leveling policy to install.
    pub leveling: Leveling,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sim: SimConfig::default(),
            profile: CombatProfile::new(
                "Adventurer",
                AbilityScores::default(),
                Vitals::new(100, 50),
            )
            .with_speed(30.0),
            leveling: Leveling::default(),
        }
    }
}

/// A player command delivered to the running session.
#[derive(Debug, Clone)]
pub enum Command {
    /// The player's physical position changed.
    PlayerMoved(LatLng),
    /// The player used an ability.
    PlayerAttack(Ability),
}

/// A running session.
///
/// Dropping the handle without calling [`Session::stop`] ends the driver
/// task and discards the simulation.
pub struct Session {
    id: Uuid,
    commands: mpsc::Sender<Command>,
    shutdown: watch::Sender<bool>,
    driver: JoinHandle<SessionResult<Simulation>>,
    reference: ReferenceData,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("running", &!self.driver.is_finished())
            .finish()
    }
}

impl Session {
    /// Start a session.
    ///
    /// Resolves the player's position first; a denied location permission
    /// is the one fatal startup error. Reference data and session-id
    /// persistence degrade with a warning.
    pub async fn start(
        providers: Providers,
        config: SessionConfig,
    ) -> SessionResult<Self> {
        let position = providers.location.current_position().await?;

        let id = Uuid::new_v4();
        if let Err(err) = providers.store.save(SESSION_ID_KEY, &id.to_string()) {
            tracing::warn!(%err, "session id not persisted");
        }
        let reference = load_reference_data(providers.entities.as_ref()).await;

        let mut sim = Simulation::with_default_systems(config.sim);
        sim.set_policy(config.leveling.policy());
        sim.store_mut()
            .set_character(Character::new(config.profile, position));

        let (command_tx, command_rx) = mpsc::channel(32);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let driver = tokio::spawn(drive(sim, providers, command_rx, shutdown_rx));

        Ok(Self {
            id,
            commands: command_tx,
            shutdown: shutdown_tx,
            driver,
            reference,
        })
    }

    /// The session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Reference tables loaded at startup.
    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Report a player position change.
    pub async fn player_moved(&self, position: LatLng) -> SessionResult<()> {
        self.send(Command::PlayerMoved(position)).await
    }

    /// Use an ability against the nearest enemy.
    pub async fn player_attack(&self, ability: Ability) -> SessionResult<()> {
        self.send(Command::PlayerAttack(ability)).await
    }

    async fn send(&self, command: Command) -> SessionResult<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::DriverGone)
    }

    /// Stop the session and return the final simulation state.
    pub async fn stop(self) -> SessionResult<Simulation> {
        let _ = self.shutdown.send(true);
        self.driver.await.map_err(|_| SessionError::DriverGone)?
    }
}

/// The driver loop. Runs until shutdown or a simulation error.
async fn drive(
    mut sim: Simulation,
    providers: Providers,
    mut commands: mpsc::Receiver<Command>,
    mut shutdown: watch::Receiver<bool>,
) -> SessionResult<Simulation> {
    let millis = sim.config().millis_per_tick;
    let spawn_millis = sim.config().enemy_spawn_ticks * millis;
    let patrol_radius = sim.config().patrol_radius_m;
    let waypoints = sim.config().patrol_waypoints;

    let mut tick_interval = tokio::time::interval(Duration::from_millis(millis));
    tick_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut spawn_interval = tokio::time::interval(Duration::from_millis(spawn_millis));
    let mut fetches: JoinSet<Result<Vec<LatLng>, ProviderError>> = JoinSet::new();

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                sim.tick()?;
                let records = sim.drain_feedback();
                if !records.is_empty() {
                    providers.feedback.publish(&records);
                }
            }
            _ = spawn_interval.tick() => {
                let Some(center) = sim.store().character().map(|c| c.position) else {
                    continue;
                };
                let routes = Arc::clone(&providers.routes);
                let ring = geo::circle_points(center, patrol_radius, waypoints);
                fetches.spawn(async move { routes.fetch_route(ring).await });
            }
            Some(fetched) = fetches.join_next() => {
                match fetched {
                    Ok(Ok(route)) => {
                        sim.push_route(route);
                    }
                    Ok(Err(err)) => {
                        tracing::warn!(%err, "route fetch failed, skipping spawn cycle");
                    }
                    Err(err) => {
                        tracing::warn!(%err, "route fetch task failed");
                    }
                }
            }
            Some(command) = commands.recv() => {
                match command {
                    Command::PlayerMoved(position) => {
                        if let Some(c) = sim.store_mut().character_mut() {
                            c.position = position;
                        }
                    }
                    Command::PlayerAttack(ability) => {
                        sim.player_attack(&ability)?;
                    }
                }
            }
            _ = shutdown.changed() => {
                fetches.abort_all();
                break;
            }
        }
    }

    let records = sim.drain_feedback();
    if !records.is_empty() {
        providers.feedback.publish(&records);
    }
    Ok(sim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use rq_simulation::{FeedbackKind, FloatingFeedback};

    use crate::providers::ProviderFuture;

    const ORIGIN: LatLng = LatLng {
        lat: 52.52,
        lng: 13.405,
    };

    struct StubRoutes {
        available: bool,
    }

    impl RouteProvider for StubRoutes {
        fn fetch_route(
            &self,
            waypoints: Vec<LatLng>,
        ) -> ProviderFuture<'_, Result<Vec<LatLng>, ProviderError>> {
            let available = self.available;
            Box::pin(async move {
                if available {
                    Ok(waypoints)
                } else {
                    Err(ProviderError::RouteUnavailable)
                }
            })
        }
    }

    struct StubLocation {
        granted: bool,
    }

    impl LocationSource for StubLocation {
        fn current_position(&self) -> ProviderFuture<'_, Result<LatLng, ProviderError>> {
            let granted = self.granted;
            Box::pin(async move {
                if granted {
                    Ok(ORIGIN)
                } else {
                    Err(ProviderError::PermissionDenied)
                }
            })
        }
    }

    /// A repository with nothing in it; every fetch succeeds empty.
    struct EmptyRepo;

    impl EntityRepository for EmptyRepo {
        fn abilities(&self) -> ProviderFuture<'_, Result<Vec<Ability>, ProviderError>> {
            Box::pin(async { Ok(Vec::new()) })
        }
        fn ancestries(
            &self,
        ) -> ProviderFuture<'_, Result<Vec<rq_core::reference::Ancestry>, ProviderError>> {
            Box::pin(async { Ok(Vec::new()) })
        }
        fn items(
            &self,
        ) -> ProviderFuture<'_, Result<Vec<rq_core::item::Item>, ProviderError>> {
            Box::pin(async { Ok(Vec::new()) })
        }
        fn skills(
            &self,
        ) -> ProviderFuture<'_, Result<Vec<rq_core::reference::Skill>, ProviderError>> {
            Box::pin(async { Ok(Vec::new()) })
        }
        fn backgrounds(
            &self,
        ) -> ProviderFuture<'_, Result<Vec<rq_core::reference::Background>, ProviderError>> {
            Box::pin(async { Ok(Vec::new()) })
        }
        fn classes(
            &self,
        ) -> ProviderFuture<'_, Result<Vec<rq_core::reference::ClassDef>, ProviderError>> {
            Box::pin(async { Ok(Vec::new()) })
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        entries: Mutex<HashMap<String, String>>,
    }

    impl PersistentStore for MemoryStore {
        fn load(&self, key: &str) -> Result<Option<String>, ProviderError> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }
        fn save(&self, key: &str, value: &str) -> Result<(), ProviderError> {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[derive(Default)]
    struct CollectingSink {
        records: Mutex<Vec<FloatingFeedback>>,
    }

    impl FeedbackSink for CollectingSink {
        fn publish(&self, records: &[FloatingFeedback]) {
            self.records.lock().unwrap().extend_from_slice(records);
        }
    }

    fn providers(routes_available: bool, location_granted: bool) -> (Providers, Arc<CollectingSink>) {
        let sink = Arc::new(CollectingSink::default());
        let providers = Providers {
            routes: Arc::new(StubRoutes {
                available: routes_available,
            }),
            location: Arc::new(StubLocation {
                granted: location_granted,
            }),
            entities: Arc::new(EmptyRepo),
            store: Arc::new(MemoryStore::default()),
            feedback: sink.clone(),
        };
        (providers, sink)
    }

    #[tokio::test(start_paused = true)]
    async fn permission_denied_is_fatal() {
        let (providers, _sink) = providers(true, false);
        let result = Session::start(providers, SessionConfig::default()).await;
        assert!(matches!(
            result,
            Err(SessionError::Provider(ProviderError::PermissionDenied))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn session_ticks_and_spawns() {
        let (providers, sink) = providers(true, true);
        let store = providers.store.clone();
        let session = Session::start(providers, SessionConfig::default())
            .await
            .unwrap();

        // Long enough for the immediate route fetch to land and several
        // ticks to run.
        tokio::time::sleep(Duration::from_secs(2)).await;
        let sim = session.stop().await.unwrap();

        assert!(sim.current_tick() > 0);
        assert_eq!(sim.store().enemy_count(), 3);
        assert!(store.load(SESSION_ID_KEY).unwrap().is_some());
        let spawns = sink
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.kind == FeedbackKind::Spawn)
            .count();
        assert_eq!(spawns, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn unavailable_routes_degrade_to_no_spawns() {
        let (providers, sink) = providers(false, true);
        let session = Session::start(providers, SessionConfig::default())
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_secs(2)).await;
        let sim = session.stop().await.unwrap();

        // The session kept ticking; it just never got enemies.
        assert!(sim.current_tick() > 0);
        assert_eq!(sim.store().enemy_count(), 0);
        assert!(sink.records.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn player_commands_reach_the_simulation() {
        let (providers, _sink) = providers(true, true);
        let session = Session::start(providers, SessionConfig::default())
            .await
            .unwrap();

        let moved = geo::offset_meters(ORIGIN, 500.0, 0.0);
        session.player_moved(moved).await.unwrap();
        session
            .player_attack(Ability::melee("Strike", 6, 5.0, 2000))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        let sim = session.stop().await.unwrap();
        assert_eq!(sim.store().character().unwrap().position, moved);
        // The swing found no one in reach: one miss record was produced.
        assert!(
            sim.feedback()
                .active()
                .iter()
                .any(|r| r.kind == FeedbackKind::Miss)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_session_returns_final_state() {
        let (providers, _sink) = providers(true, true);
        let session = Session::start(providers, SessionConfig::default())
            .await
            .unwrap();
        let id = session.id();
        let sim = session.stop().await.unwrap();
        assert!(!id.is_nil());
        assert_eq!(sim.store().enemy_count() % 3, 0);
    }
}
