//! Retargetable lineage view.
//!
//! Every `retarget` runs a fresh traversal. Traversals are not cancelled when
//! a newer one starts; instead each carries a generation number and only the
//! newest one issued may commit. Older results are dropped at commit time.

use crate::cards::RouteBuilder;
use crate::config::LineageConfig;
use crate::history::TargetHistory;
use crate::layout::LineageLayout;
use crate::loader::{GraphLoader, LineageGraph};
use crate::store::MetadataStore;
use lineage_core::{Artifact, ArtifactId, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

/// Committed state as observed by subscribers.
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    /// Generation of the traversal that produced `graph`. 0 before the first commit.
    pub generation: u64,
    pub graph: Option<Arc<LineageGraph>>,
}

/// Outcome of a target change.
#[derive(Debug)]
pub enum Retarget {
    /// This traversal committed; here is the new layout.
    Applied(LineageLayout),
    /// A newer traversal was started while this one was in flight.
    Superseded,
    /// The artifact is not in a selectable column of the current layout.
    NotSelectable,
}

impl Retarget {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

pub struct LineageView {
    loader: GraphLoader,
    routes: Arc<dyn RouteBuilder>,
    config: LineageConfig,
    history: Option<Mutex<Box<dyn TargetHistory>>>,
    issued: AtomicU64,
    state: watch::Sender<ViewState>,
}

impl LineageView {
    pub fn new(
        store: Arc<dyn MetadataStore>,
        routes: Arc<dyn RouteBuilder>,
        config: LineageConfig,
    ) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        Self {
            loader: GraphLoader::new(store),
            routes,
            config,
            history: None,
            issued: AtomicU64::new(0),
            state,
        }
    }

    pub fn with_history(mut self, history: Box<dyn TargetHistory>) -> Self {
        self.history = Some(Mutex::new(history));
        self
    }

    /// Targets recorded by the installed history, oldest first. Empty without one.
    pub async fn history(&self) -> Vec<Artifact> {
        match &self.history {
            Some(history) => history.lock().await.visited(),
            None => Vec::new(),
        }
    }

    /// Watch committed state. Each change is one whole traversal.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> Option<Arc<LineageGraph>> {
        self.state.borrow().graph.clone()
    }

    pub fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    pub fn layout(&self) -> Option<LineageLayout> {
        self.current().map(|graph| self.layout_for(&graph))
    }

    fn layout_for(&self, graph: &LineageGraph) -> LineageLayout {
        LineageLayout::build(graph, self.routes.as_ref(), &self.config)
    }

    /// Make `artifact_id` the target and load its lineage.
    ///
    /// On error the previously committed state stays in place.
    pub async fn retarget(&self, artifact_id: ArtifactId) -> Result<Retarget> {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(artifact_id, generation, "traversal started");

        let graph = match self.loader.load(artifact_id).await {
            Ok(graph) => Arc::new(graph),
            Err(e) => {
                warn!(artifact_id, generation, error = %e, "traversal failed");
                return Err(e);
            }
        };

        let issued = &self.issued;
        let committed = self.state.send_if_modified(|state| {
            if issued.load(Ordering::SeqCst) != generation {
                return false;
            }
            state.generation = generation;
            state.graph = Some(graph.clone());
            true
        });

        if !committed {
            debug!(artifact_id, generation, "dropping stale traversal result");
            return Ok(Retarget::Superseded);
        }
        info!(artifact_id, generation, "lineage target committed");
        Ok(Retarget::Applied(self.layout_for(&graph)))
    }

    /// A card in the input or output artifact column was clicked.
    pub async fn select_from_card(&self, artifact: &Artifact) -> Result<Retarget> {
        let selectable = self
            .layout()
            .map(|layout| layout.is_selectable(artifact.id))
            .unwrap_or(false);
        if !selectable {
            debug!(artifact_id = artifact.id, "ignoring selection outside artifact columns");
            return Ok(Retarget::NotSelectable);
        }
        if let Some(history) = &self.history {
            history.lock().await.push(artifact);
        }
        self.retarget(artifact.id).await
    }

    /// The history bar picked a previous target; history is left as is.
    pub async fn select_from_history(&self, artifact: &Artifact) -> Result<Retarget> {
        self.retarget(artifact.id).await
    }
}
