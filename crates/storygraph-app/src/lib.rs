use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use storygraph_api::{
    ApiError, AppEventPayload, EdgeType, EventId, EventSummary, GraphEdgeDto, GraphNodeDto,
    GraphRequest, GraphResponse, NodeType, ObjectId, OpenEventRequest, StorageStatsDto,
};
use storygraph_core::IdSet;
use storygraph_graph::{SeedSet, StoryGraph, StoryGraphEngine};
use storygraph_storage::{Storage, StorageStats};
use tracing::info;

mod graph_builders;
mod settings;

pub use settings::StoryGraphSettings;

fn no_database_error() -> ApiError {
    ApiError::invalid_argument("No event database open. Call open_event_database first.")
}

fn clamp_i64_to_u32(v: i64) -> u32 {
    if v <= 0 {
        0
    } else if v > u32::MAX as i64 {
        u32::MAX
    } else {
        v as u32
    }
}

struct AppState {
    storage_path: Option<PathBuf>,
    settings: StoryGraphSettings,
}

/// Headless entry point for the story graph.
///
/// A web handler or the CLI calls methods on this controller and may
/// subscribe to `AppEventPayload`. Every graph request opens its own
/// read-only connection and runs on freshly allocated engine state.
#[derive(Clone)]
pub struct AppController {
    state: Arc<Mutex<AppState>>,
    events_tx: Sender<AppEventPayload>,
    events_rx: Receiver<AppEventPayload>,
}

impl Default for AppController {
    fn default() -> Self {
        Self::new()
    }
}

impl AppController {
    pub fn new() -> Self {
        Self::with_settings(StoryGraphSettings::default())
    }

    pub fn with_settings(settings: StoryGraphSettings) -> Self {
        let (events_tx, events_rx) = unbounded();
        Self {
            state: Arc::new(Mutex::new(AppState {
                storage_path: None,
                settings,
            })),
            events_tx,
            events_rx,
        }
    }

    /// Subscribe to backend events. Intended to be consumed by a single pump
    /// that forwards to the active runtime.
    pub fn events(&self) -> Receiver<AppEventPayload> {
        self.events_rx.clone()
    }

    pub fn settings(&self) -> StoryGraphSettings {
        self.state.lock().settings.clone()
    }

    pub fn set_settings(&self, settings: StoryGraphSettings) {
        self.state.lock().settings = settings;
    }

    fn require_storage_path(&self) -> Result<PathBuf, ApiError> {
        self.state
            .lock()
            .storage_path
            .clone()
            .ok_or_else(no_database_error)
    }

    fn open_storage(&self) -> Result<Storage, ApiError> {
        let path = self.require_storage_path()?;
        Storage::open_read_only(&path)
            .map_err(|e| ApiError::internal(format!("Failed to open storage: {e}")))
    }

    pub fn open_event_database(&self, req: OpenEventRequest) -> Result<EventSummary, ApiError> {
        let path = PathBuf::from(req.path);
        if !path.exists() {
            return Err(ApiError::not_found(format!(
                "Event database does not exist: {}",
                path.display()
            )));
        }
        if path.is_dir() {
            return Err(ApiError::invalid_argument(format!(
                "Event database path is a directory: {}",
                path.display()
            )));
        }

        let storage = Storage::open_read_only(&path)
            .map_err(|e| ApiError::internal(format!("Failed to open storage: {e}")))?;
        let stats = storage
            .get_stats()
            .map_err(|e| ApiError::internal(format!("Failed to query stats: {e}")))?;
        let events = storage
            .get_event_ids()
            .map_err(|e| ApiError::internal(format!("Failed to list events: {e}")))?;

        self.state.lock().storage_path = Some(path.clone());
        info!(
            path = %path.display(),
            events = events.len(),
            objects = stats.object_count,
            "Opened event database"
        );
        let _ = self.events_tx.send(AppEventPayload::StatusUpdate {
            message: "Event database opened.".to_string(),
        });

        Ok(EventSummary {
            path: path.to_string_lossy().to_string(),
            events: events.into_iter().map(EventId::from).collect(),
            stats: graph_builders::stats_dto(&stats),
        })
    }

    pub fn stats(&self) -> Result<StorageStatsDto, ApiError> {
        let storage = self.open_storage()?;
        let stats = storage
            .get_stats()
            .map_err(|e| ApiError::internal(format!("Failed to query stats: {e}")))?;
        Ok(graph_builders::stats_dto(&stats))
    }

    pub fn story_graph(&self, req: GraphRequest) -> Result<GraphResponse, ApiError> {
        let scope = req.scope.to_core()?;
        let seeds = graph_builders::seed_set(&req)?;
        let options = self.settings().engine;
        let storage = self.open_storage()?;

        let started_at = Instant::now();
        let graph = StoryGraphEngine::with_options(&storage, &storage, options)
            .compute_graph(scope, &seeds)
            .map_err(|e| ApiError::internal(format!("Failed to compute graph: {e}")))?;
        let duration_ms = started_at.elapsed().as_millis().min(u32::MAX as u128) as u32;

        let summary = graph.summary();
        info!(
            scope = scope.0,
            seeds = seeds.len(),
            nodes = summary.node_count,
            edges = summary.edge_count,
            duration_ms,
            "Story graph computed"
        );
        let _ = self.events_tx.send(AppEventPayload::GraphComputed {
            scope: req.scope.clone(),
            node_count: summary.node_count.min(u32::MAX as usize) as u32,
            edge_count: summary.edge_count.min(u32::MAX as usize) as u32,
            duration_ms,
        });

        Ok(graph_builders::graph_response(graph))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storygraph_core::{
        Character, EventId as CoreEventId, Faction, StoryObject, StoryObjectBase, StoryObjectId,
    };
    use tempfile::{TempDir, tempdir};

    fn base(id: i64, title: &str) -> StoryObjectBase {
        StoryObjectBase {
            id: StoryObjectId(id),
            event_id: CoreEventId(1),
            title: title.to_string(),
            description: None,
        }
    }

    fn seeded_database() -> anyhow::Result<(TempDir, PathBuf)> {
        let dir = tempdir()?;
        let path = dir.path().join("event.db");
        let mut storage = Storage::open(&path)?;
        storage.insert_objects_batch(&[
            StoryObject::Faction(Faction {
                base: base(1, "Night Watch"),
                members: vec![StoryObjectId(2), StoryObjectId(3)],
                ..Default::default()
            }),
            StoryObject::Character(Character {
                base: base(2, "Mara"),
                ..Default::default()
            }),
            StoryObject::Character(Character {
                base: base(3, "Tobin"),
                ..Default::default()
            }),
        ])?;
        Ok((dir, path))
    }

    fn request(factions: &[&str]) -> GraphRequest {
        GraphRequest {
            scope: EventId("1".to_string()),
            thread_ids: Vec::new(),
            character_ids: Vec::new(),
            faction_ids: factions.iter().map(|id| ObjectId(id.to_string())).collect(),
        }
    }

    #[test]
    fn test_graph_requires_open_database() {
        let controller = AppController::new();
        let err = controller
            .story_graph(request(&[]))
            .expect_err("no database open");
        assert_eq!(err.code, "invalid_argument");
    }

    #[test]
    fn test_open_missing_database_is_not_found() {
        let controller = AppController::new();
        let err = controller
            .open_event_database(OpenEventRequest {
                path: "/definitely/not/here.db".to_string(),
            })
            .expect_err("missing file");
        assert_eq!(err.code, "not_found");
    }

    #[test]
    fn test_open_directory_is_rejected() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let err = AppController::new()
            .open_event_database(OpenEventRequest {
                path: dir.path().to_string_lossy().to_string(),
            })
            .expect_err("directory");
        assert_eq!(err.code, "invalid_argument");
        Ok(())
    }

    #[test]
    fn test_open_then_graph_emits_events() -> anyhow::Result<()> {
        let (_dir, path) = seeded_database()?;
        let controller = AppController::new();
        let events = controller.events();

        let summary = controller.open_event_database(OpenEventRequest {
            path: path.to_string_lossy().to_string(),
        })?;
        assert_eq!(summary.events, vec![EventId("1".to_string())]);
        assert_eq!(summary.stats.object_count, 3);
        assert!(matches!(
            events.try_recv(),
            Ok(AppEventPayload::StatusUpdate { .. })
        ));

        let response = controller.story_graph(request(&["1"]))?;
        assert_eq!(response.nodes.len(), 3);
        assert_eq!(response.edges.len(), 2);
        assert!(
            response
                .nodes
                .iter()
                .all(|node| node.group_id == Some(ObjectId("1".to_string())))
        );
        assert!(matches!(
            events.try_recv(),
            Ok(AppEventPayload::GraphComputed {
                node_count: 3,
                edge_count: 2,
                ..
            })
        ));
        Ok(())
    }

    #[test]
    fn test_settings_flow_into_engine() -> anyhow::Result<()> {
        let (_dir, path) = seeded_database()?;
        let mut settings = StoryGraphSettings::default();
        settings.engine.annotate_groups = false;
        let controller = AppController::with_settings(settings);
        controller.open_event_database(OpenEventRequest {
            path: path.to_string_lossy().to_string(),
        })?;

        let response = controller.story_graph(request(&[]))?;
        assert_eq!(response.nodes.len(), 3);
        assert!(response.nodes.iter().all(|node| node.group_id.is_none()));
        Ok(())
    }

    #[test]
    fn test_database_removed_after_open_is_internal_error() -> anyhow::Result<()> {
        let (_dir, path) = seeded_database()?;
        let controller = AppController::new();
        controller.open_event_database(OpenEventRequest {
            path: path.to_string_lossy().to_string(),
        })?;

        std::fs::remove_file(&path)?;
        for suffix in ["-wal", "-shm"] {
            let mut sidecar = path.clone().into_os_string();
            sidecar.push(suffix);
            let _ = std::fs::remove_file(sidecar);
        }

        let err = controller
            .story_graph(request(&[]))
            .expect_err("database is gone");
        assert_eq!(err.code, "internal");
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn test_malformed_scope_is_invalid_argument() -> anyhow::Result<()> {
        let (_dir, path) = seeded_database()?;
        let controller = AppController::new();
        controller.open_event_database(OpenEventRequest {
            path: path.to_string_lossy().to_string(),
        })?;
        let mut req = request(&[]);
        req.scope = EventId("first".to_string());
        let err = controller.story_graph(req).expect_err("bad scope");
        assert_eq!(err.code, "invalid_argument");
        Ok(())
    }
}
