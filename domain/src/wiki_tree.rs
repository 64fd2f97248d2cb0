//! Wiki tree builder.
//!
//! Assembles the flat wiki_entries rows of a campaign into the nested tree the
//! sidebar renders. Pure and deterministic; runs on every wiki read.

use entity::wiki_entries;
use entity::Id;
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

/// One node of the rendered wiki tree: the entry plus its ordered children.
#[derive(Debug, Serialize, ToSchema)]
pub struct WikiTreeNode {
    #[serde(flatten)]
    pub entry: wiki_entries::Model,
    pub children: Vec<WikiTreeNode>,
}

/// Build the nested tree from a campaign's entries.
///
/// Two passes over an id-indexed arena: index every entry, then link children
/// to parents. An entry whose parent id is not in the input set is placed at
/// the root instead of being dropped. Every sibling list is stably sorted
/// ascending by sibling_order, ties keeping input enumeration order.
pub fn build_tree(entries: Vec<wiki_entries::Model>) -> Vec<WikiTreeNode> {
    let index: HashMap<Id, usize> = entries
        .iter()
        .enumerate()
        .map(|(position, entry)| (entry.id, position))
        .collect();

    let mut child_indices: Vec<Vec<usize>> = vec![Vec::new(); entries.len()];
    let mut root_indices: Vec<usize> = Vec::new();

    for (position, entry) in entries.iter().enumerate() {
        match entry.parent_id.and_then(|parent_id| index.get(&parent_id)) {
            Some(&parent_position) => child_indices[parent_position].push(position),
            // Roots proper, and orphans whose parent is missing from the set
            None => root_indices.push(position),
        }
    }

    let mut arena: Vec<Option<wiki_entries::Model>> = entries.into_iter().map(Some).collect();

    sort_siblings(&mut root_indices, &arena);
    root_indices
        .into_iter()
        .map(|position| assemble(position, &child_indices, &mut arena))
        .collect()
}

fn sort_siblings(indices: &mut [usize], arena: &[Option<wiki_entries::Model>]) {
    indices.sort_by_key(|&position| {
        arena[position]
            .as_ref()
            .map(|entry| entry.sibling_order)
            .unwrap_or_default()
    });
}

fn assemble(
    position: usize,
    child_indices: &[Vec<usize>],
    arena: &mut Vec<Option<wiki_entries::Model>>,
) -> WikiTreeNode {
    let mut children_positions = child_indices[position].clone();
    sort_siblings(&mut children_positions, arena);

    let children = children_positions
        .into_iter()
        .map(|child_position| assemble(child_position, child_indices, arena))
        .collect();

    WikiTreeNode {
        // Each position is assembled exactly once; the slot is always occupied here
        entry: arena[position].take().expect("entry already taken"),
        children,
    }
}
