//! Navigation history: where the user has been, for a back/breadcrumb bar.

use lineage_core::Artifact;

/// Receives every artifact the user picks from a lineage card.
pub trait TargetHistory: Send {
    fn push(&mut self, artifact: &Artifact);

    /// Visited targets, oldest first.
    fn visited(&self) -> Vec<Artifact>;
}

/// Ordered trail of visited targets.
#[derive(Debug, Default, Clone)]
pub struct Breadcrumbs {
    entries: Vec<Artifact>,
}

impl Breadcrumbs {
    pub fn new(initial: Artifact) -> Self {
        Self {
            entries: vec![initial],
        }
    }
}

impl TargetHistory for Breadcrumbs {
    fn push(&mut self, artifact: &Artifact) {
        if self.entries.last().map(|a| a.id) == Some(artifact.id) {
            return;
        }
        self.entries.push(artifact.clone());
    }

    fn visited(&self) -> Vec<Artifact> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(history: &impl TargetHistory) -> Vec<i64> {
        history.visited().iter().map(|a| a.id).collect()
    }

    #[test]
    fn push_appends_in_order() {
        let mut crumbs = Breadcrumbs::new(Artifact::new(1, 1));
        crumbs.push(&Artifact::new(2, 1));
        crumbs.push(&Artifact::new(3, 2));
        assert_eq!(ids(&crumbs), vec![1, 2, 3]);
    }

    #[test]
    fn repeated_push_of_head_is_ignored() {
        let mut crumbs = Breadcrumbs::default();
        assert!(crumbs.visited().is_empty());
        crumbs.push(&Artifact::new(5, 1));
        crumbs.push(&Artifact::new(5, 1));
        assert_eq!(ids(&crumbs), vec![5]);
    }

    #[test]
    fn revisiting_an_older_target_appends_again() {
        let mut crumbs = Breadcrumbs::new(Artifact::new(1, 1));
        crumbs.push(&Artifact::new(2, 1));
        crumbs.push(&Artifact::new(1, 1));
        assert_eq!(ids(&crumbs), vec![1, 2, 1]);
    }
}
