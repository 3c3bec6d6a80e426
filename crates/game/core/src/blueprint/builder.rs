//! Validation and ordering of raw definitions into a [`Blueprint`].

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::{Blueprint, BlueprintEntry, GlobalActionCost, GroupDefinition, ResourceDefinition};
use crate::error::{ResourceError, ResourceResult};

/// A member of a group, with its resolved sort position.
struct Member {
    id: String,
    sort_key: i32,
    declared: usize,
}

/// A top-level presentation block.
enum Block<'a> {
    Standalone(&'a ResourceDefinition),
    Group(&'a GroupDefinition),
}

pub(super) fn build(
    resources: Vec<ResourceDefinition>,
    groups: Vec<GroupDefinition>,
) -> ResourceResult<Blueprint> {
    let groups_by_id = register_groups(&groups)?;
    validate_resources(&resources, &groups_by_id)?;
    validate_nesting(&groups, &groups_by_id)?;

    // Nested group parents are declared after every plain resource.
    let mut members: HashMap<&str, Vec<Member>> = HashMap::new();
    for (declared, def) in resources.iter().enumerate() {
        if let Some(membership) = &def.group {
            members
                .entry(membership.group.as_str())
                .or_default()
                .push(Member {
                    id: def.id.clone(),
                    sort_key: membership.order.unwrap_or(def.order),
                    declared,
                });
        }
    }
    for (index, group) in groups.iter().enumerate() {
        if let Some(membership) = &group.parent.group {
            members
                .entry(membership.group.as_str())
                .or_default()
                .push(Member {
                    id: group.parent.id.clone(),
                    sort_key: membership.order.unwrap_or(group.parent.order),
                    declared: resources.len() + index,
                });
        }
    }
    for list in members.values_mut() {
        list.sort_by_key(|member| (member.sort_key, member.declared));
    }

    let mut parent_children: HashMap<String, Vec<String>> = HashMap::new();
    let mut child_parent: HashMap<String, String> = HashMap::new();
    for group in &groups {
        let children: Vec<String> = members
            .get(group.id.as_str())
            .map(|list| list.iter().map(|member| member.id.clone()).collect())
            .unwrap_or_default();
        for child in &children {
            child_parent.insert(child.clone(), group.parent.id.clone());
        }
        parent_children.insert(group.parent.id.clone(), children);
    }

    // Standalone resources and whole top-level group blocks share one
    // ordering; ties keep declaration order with resources first.
    let mut blocks: Vec<(i32, usize, Block<'_>)> = Vec::new();
    for (declared, def) in resources.iter().enumerate() {
        if def.group.is_none() {
            blocks.push((def.order, declared, Block::Standalone(def)));
        }
    }
    for (index, group) in groups.iter().enumerate() {
        if group.parent.group.is_none() {
            blocks.push((
                group.parent.order,
                resources.len() + index,
                Block::Group(group),
            ));
        }
    }
    blocks.sort_by_key(|(order, declared, _)| (*order, *declared));

    let group_of_parent: HashMap<&str, &str> = groups
        .iter()
        .map(|group| (group.parent.id.as_str(), group.id.as_str()))
        .collect();

    let mut ordered_ids = Vec::with_capacity(resources.len() + groups.len());
    let mut recompute_order = Vec::with_capacity(groups.len());
    for (_, _, block) in &blocks {
        match block {
            Block::Standalone(def) => ordered_ids.push(def.id.clone()),
            Block::Group(group) => expand_group(
                group,
                &groups_by_id,
                &group_of_parent,
                &members,
                &mut ordered_ids,
                &mut recompute_order,
            ),
        }
    }

    let mut costs: Vec<(i32, usize, GlobalActionCost)> = resources
        .iter()
        .enumerate()
        .filter_map(|(declared, def)| {
            def.global_action_cost.map(|amount| {
                (
                    def.order,
                    declared,
                    GlobalActionCost {
                        resource_id: def.id.clone(),
                        amount,
                    },
                )
            })
        })
        .collect();
    costs.sort_by_key(|(order, declared, _)| (*order, *declared));
    let global_action_costs = costs.into_iter().map(|(_, _, cost)| cost).collect();

    let limited_ids: HashSet<String> = groups.iter().map(|g| g.parent.id.clone()).collect();

    let resource_count = resources.len();
    let group_count = groups.len();

    let mut entries = HashMap::with_capacity(resource_count + group_count);
    for def in resources {
        entries.insert(def.id.clone(), BlueprintEntry::Child(def));
    }
    for group in groups {
        entries.insert(
            group.parent.id.clone(),
            BlueprintEntry::GroupParent {
                group: group.id,
                parent: group.parent,
            },
        );
    }

    debug!(
        target: "resource_core::blueprint",
        resources = resource_count,
        groups = group_count,
        "built resource blueprint"
    );

    Ok(Blueprint {
        entries,
        ordered_ids,
        parent_children,
        child_parent,
        limited_ids,
        recompute_order,
        global_action_costs,
    })
}

fn register_groups(groups: &[GroupDefinition]) -> ResourceResult<HashMap<&str, &GroupDefinition>> {
    let mut by_id = HashMap::with_capacity(groups.len());
    let mut parent_ids = HashSet::with_capacity(groups.len());
    for group in groups {
        if by_id.insert(group.id.as_str(), group).is_some() {
            return Err(ResourceError::DuplicateDefinition(group.id.clone()));
        }
        if !parent_ids.insert(group.parent.id.as_str()) {
            return Err(ResourceError::DuplicateDefinition(group.parent.id.clone()));
        }
    }
    Ok(by_id)
}

fn validate_resources(
    resources: &[ResourceDefinition],
    groups_by_id: &HashMap<&str, &GroupDefinition>,
) -> ResourceResult<()> {
    let parent_ids: HashSet<&str> = groups_by_id
        .values()
        .map(|group| group.parent.id.as_str())
        .collect();
    let mut seen = HashSet::with_capacity(resources.len());
    for def in resources {
        if parent_ids.contains(def.id.as_str()) {
            return Err(ResourceError::GroupParentCollision(def.id.clone()));
        }
        if !seen.insert(def.id.as_str()) {
            return Err(ResourceError::DuplicateDefinition(def.id.clone()));
        }
        if let Some(membership) = &def.group
            && !groups_by_id.contains_key(membership.group.as_str())
        {
            return Err(ResourceError::UnknownGroup {
                resource: def.id.clone(),
                group: membership.group.clone(),
            });
        }
    }
    Ok(())
}

fn validate_nesting(
    groups: &[GroupDefinition],
    groups_by_id: &HashMap<&str, &GroupDefinition>,
) -> ResourceResult<()> {
    for group in groups {
        if let Some(membership) = &group.parent.group
            && !groups_by_id.contains_key(membership.group.as_str())
        {
            return Err(ResourceError::UnknownGroup {
                resource: group.parent.id.clone(),
                group: membership.group.clone(),
            });
        }
    }

    for group in groups {
        let mut visited = HashSet::new();
        let mut current = Some(group.id.as_str());
        while let Some(group_id) = current {
            if !visited.insert(group_id) {
                return Err(ResourceError::GroupCycle(group_id.to_string()));
            }
            current = groups_by_id
                .get(group_id)
                .and_then(|g| g.parent.group.as_ref())
                .map(|membership| membership.group.as_str());
        }
    }
    Ok(())
}

/// Appends a group's block (parent, then members) to `ordered_ids`, and its
/// parent to `recompute_order` after every nested parent.
fn expand_group(
    group: &GroupDefinition,
    groups_by_id: &HashMap<&str, &GroupDefinition>,
    group_of_parent: &HashMap<&str, &str>,
    members: &HashMap<&str, Vec<Member>>,
    ordered_ids: &mut Vec<String>,
    recompute_order: &mut Vec<String>,
) {
    ordered_ids.push(group.parent.id.clone());
    for member in members.get(group.id.as_str()).into_iter().flatten() {
        let nested = group_of_parent
            .get(member.id.as_str())
            .and_then(|group_id| groups_by_id.get(group_id));
        match nested {
            Some(nested) => expand_group(
                nested,
                groups_by_id,
                group_of_parent,
                members,
                ordered_ids,
                recompute_order,
            ),
            None => ordered_ids.push(member.id.clone()),
        }
    }
    recompute_order.push(group.parent.id.clone());
}
