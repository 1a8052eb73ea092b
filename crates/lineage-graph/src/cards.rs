//! Card Grouper — flat resource lists into one card per type.
//!
//! Grouping is stable: cards appear in the order their type was first seen,
//! rows keep their order within a card. Nothing is sorted.

use lineage_core::{Artifact, Execution, LineageResource, ResourceKind, TypeId, TypeNames};
use serde::Serialize;

/// Maps a resource to its details page. Supplied by whoever owns routing.
pub trait RouteBuilder: Send + Sync {
    fn resource_details_route(&self, resource: &LineageResource, type_name: &str) -> String;
}

impl<F> RouteBuilder for F
where
    F: Fn(&LineageResource, &str) -> String + Send + Sync,
{
    fn resource_details_route(&self, resource: &LineageResource, type_name: &str) -> String {
        self(resource, type_name)
    }
}

/// What the target card needs to know about its neighbours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TargetContext {
    pub has_input_executions: bool,
    pub has_output_executions: bool,
}

/// Whether a row draws a connector on its left (`prev`) and right (`next`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Adjacency {
    pub prev: bool,
    pub next: bool,
}

impl Adjacency {
    pub const BOTH: Self = Self {
        prev: true,
        next: true,
    };

    /// Only the target artifact looks at its neighbours; every other row,
    /// and every execution row, connects on both sides.
    pub fn for_row(kind: ResourceKind, target: Option<TargetContext>) -> Self {
        match (kind, target) {
            (ResourceKind::Artifact, Some(ctx)) => Self {
                prev: ctx.has_input_executions,
                next: ctx.has_output_executions,
            },
            _ => Self::BOTH,
        }
    }
}

/// One row inside a card.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RowDescriptor {
    pub resource: LineageResource,
    pub route: String,
    pub prev: bool,
    pub next: bool,
}

/// One card: every resource of a single type within a column.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CardGroup {
    pub title: String,
    pub type_id: TypeId,
    pub kind: ResourceKind,
    pub is_target: bool,
    pub rows: Vec<RowDescriptor>,
}

/// Stable group-by: first-seen key order, insertion order within a key.
pub fn group_by_type<T>(items: Vec<T>, type_of: impl Fn(&T) -> TypeId) -> Vec<(TypeId, Vec<T>)> {
    let mut groups: Vec<(TypeId, Vec<T>)> = Vec::new();
    for item in items {
        let type_id = type_of(&item);
        match groups.iter_mut().find(|(id, _)| *id == type_id) {
            Some((_, members)) => members.push(item),
            None => groups.push((type_id, vec![item])),
        }
    }
    groups
}

pub struct CardGrouper<'a> {
    artifact_types: &'a TypeNames,
    execution_types: &'a TypeNames,
    routes: &'a dyn RouteBuilder,
}

impl<'a> CardGrouper<'a> {
    pub fn new(
        artifact_types: &'a TypeNames,
        execution_types: &'a TypeNames,
        routes: &'a dyn RouteBuilder,
    ) -> Self {
        Self {
            artifact_types,
            execution_types,
            routes,
        }
    }

    /// `target` is `Some` only when building the target column.
    pub fn artifact_cards(
        &self,
        artifacts: &[Artifact],
        target: Option<TargetContext>,
    ) -> Vec<CardGroup> {
        let resources = artifacts.iter().cloned().map(LineageResource::from).collect();
        self.build(resources, self.artifact_types, target)
    }

    pub fn execution_cards(&self, executions: &[Execution]) -> Vec<CardGroup> {
        let resources = executions.iter().cloned().map(LineageResource::from).collect();
        self.build(resources, self.execution_types, None)
    }

    fn build(
        &self,
        resources: Vec<LineageResource>,
        names: &TypeNames,
        target: Option<TargetContext>,
    ) -> Vec<CardGroup> {
        group_by_type(resources, LineageResource::type_id)
            .into_iter()
            .map(|(type_id, members)| {
                let title = names.name_or_placeholder(type_id);
                let kind = members
                    .first()
                    .map(LineageResource::kind)
                    .unwrap_or(ResourceKind::Artifact);
                let rows = members
                    .into_iter()
                    .map(|resource| {
                        let adjacency = Adjacency::for_row(resource.kind(), target);
                        RowDescriptor {
                            route: self.routes.resource_details_route(&resource, &title),
                            resource,
                            prev: adjacency.prev,
                            next: adjacency.next,
                        }
                    })
                    .collect();
                CardGroup {
                    title,
                    type_id,
                    kind,
                    is_target: target.is_some() && kind == ResourceKind::Artifact,
                    rows,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(resource: &LineageResource, type_name: &str) -> String {
        format!("/{}/{}/{}", resource.kind(), type_name, resource.id())
    }

    #[test]
    fn group_by_type_is_stable() {
        let grouped = group_by_type(vec![(1, 'a'), (2, 'b'), (1, 'c')], |(t, _)| *t);
        assert_eq!(grouped, vec![(1, vec![(1, 'a'), (1, 'c')]), (2, vec![(2, 'b')])]);
    }

    #[test]
    fn group_by_type_empty() {
        let grouped = group_by_type(Vec::<(i64, char)>::new(), |(t, _)| *t);
        assert!(grouped.is_empty());
    }

    #[test]
    fn adjacency_rules() {
        let ctx = TargetContext {
            has_input_executions: false,
            has_output_executions: true,
        };
        assert_eq!(
            Adjacency::for_row(ResourceKind::Artifact, Some(ctx)),
            Adjacency {
                prev: false,
                next: true
            }
        );
        assert_eq!(Adjacency::for_row(ResourceKind::Artifact, None), Adjacency::BOTH);
        assert_eq!(Adjacency::for_row(ResourceKind::Execution, Some(ctx)), Adjacency::BOTH);
    }

    #[test]
    fn rows_carry_routes_with_resolved_type_name() {
        let artifact_types: TypeNames = [(1, "Dataset")].into_iter().collect();
        let execution_types = TypeNames::new();
        let grouper = CardGrouper::new(&artifact_types, &execution_types, &route);

        let cards = grouper.artifact_cards(&[Artifact::new(7, 1)], None);
        assert_eq!(cards[0].rows[0].route, "/artifact/Dataset/7");

        let cards = grouper.execution_cards(&[Execution::new(9, 3)]);
        assert_eq!(cards[0].title, "(unknown type 3)");
        assert_eq!(cards[0].rows[0].route, "/execution/(unknown type 3)/9");
        assert!(!cards[0].is_target);
    }
}
