//! Structural unification of mapping fragments into a working tree
//!
//! `merge` walks a parsed mini-fragment in pre-order and unifies each of
//! its nodes with the working tree: an existing node with the same tag
//! and the same attributes is merged into (empty text is filled in, a
//! conflicting text forces a repeated sibling), anything missing is
//! appended. Merging the same fragment with the same values twice leaves
//! the tree unchanged; merging with different values grows an ordered
//! run of same-tag siblings.

use crate::xml::Element;

/// Merge one fragment subtree into `tree`.
///
/// The insertion point starts at the tree root; fragment nodes whose tag
/// equals the current insertion point's own tag are wrapper tags and are
/// skipped rather than matched.
pub fn merge(tree: &mut Element, fragment: &Element) {
    // Iterative pre-order walk: (fragment node, insertion-point path).
    let mut stack: Vec<(&Element, Vec<usize>)> = vec![(fragment, Vec::new())];

    while let Some((frag, base_path)) = stack.pop() {
        let Some(resolved) = resolve(tree, frag, &base_path) else {
            continue;
        };
        for child in frag.children.iter().rev() {
            stack.push((child, resolved.clone()));
        }
    }
}

/// Unify a single fragment node below the insertion point at `base_path`
/// and return the path of the node that becomes the next insertion point.
fn resolve(tree: &mut Element, frag: &Element, base_path: &[usize]) -> Option<Vec<usize>> {
    let base = node_mut(tree, base_path)?;

    // A fragment tag equal to the insertion point's own tag would search
    // for the root below itself; skip the node and keep the base.
    if frag.name == base.name {
        return Some(base_path.to_vec());
    }

    let matched = base
        .children
        .iter()
        .position(|c| c.name == frag.name && c.attributes == frag.attributes);

    let resolved_index = match matched {
        Some(index) => {
            let candidate_text = base.children.get(index)?.text_trimmed().to_string();
            let fragment_text = frag.text_trimmed().to_string();

            if candidate_text.is_empty() {
                if !fragment_text.is_empty() {
                    if let Some(candidate) = base.children.get_mut(index) {
                        candidate.text = frag.text.clone();
                    }
                }
                index
            } else if !fragment_text.is_empty() && fragment_text != candidate_text {
                // Same path, different value: repeat the node as a new
                // sibling just after the run of same-tag siblings.
                let insert_at = repeat_insert_index(&base.children, &frag.name);
                base.children.insert(insert_at, frag.clone());
                insert_at
            } else {
                index
            }
        }
        None => {
            // Nothing to merge into: append the whole subtree.
            base.children.push(frag.clone());
            base.children.len() - 1
        }
    };

    let mut resolved = base_path.to_vec();
    resolved.push(resolved_index);
    Some(resolved)
}

/// Index just past the first contiguous run of `tag` siblings.
///
/// Counts leading non-matching children, then the matching run, and
/// stops at the first different tag after the run. A second, disjoint
/// run further right is not considered.
fn repeat_insert_index(children: &[Element], tag: &str) -> usize {
    let mut index = 0;
    let mut in_run = false;
    for node in children {
        if node.name == tag {
            in_run = true;
            index += 1;
        } else if in_run {
            break;
        } else {
            index += 1;
        }
    }
    index
}

/// Walk `path` down from `root` through child indices
fn node_mut<'t>(root: &'t mut Element, path: &[usize]) -> Option<&'t mut Element> {
    let mut node = root;
    for &index in path {
        node = node.children.get_mut(index)?;
    }
    Some(node)
}

/// Remove empty leaves directly under the root.
///
/// Deeper empty branches stay; only the first level is populated
/// straight from column mappings and needs cleanup.
pub fn prune_empty_leaves(root: &mut Element) {
    root.children.retain(|child| !child.is_empty_leaf());
}
