use super::types::Device;
use crate::cluster::TreeNode;
use crate::error::ReweightError;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

/// Resolves bucket names to the OSDs beneath them.
///
/// Each bucket is walked at most once per pass; nested lookups reuse the
/// resolved sets of buckets already visited.
pub(crate) struct BucketIndex<'a> {
    nodes: HashMap<i32, &'a TreeNode>,
    by_name: HashMap<&'a str, i32>,
    resolved: HashMap<i32, BTreeSet<i32>>,
}

impl<'a> BucketIndex<'a> {
    pub(crate) fn new(tree: &'a [TreeNode]) -> Self {
        Self {
            nodes: tree.iter().map(|n| (n.id, n)).collect(),
            by_name: tree.iter().map(|n| (n.name.as_str(), n.id)).collect(),
            resolved: HashMap::new(),
        }
    }

    /// All OSD ids under the named bucket (or the OSD itself for `osd.N`).
    pub(crate) fn osds_in(&mut self, name: &str) -> Result<&BTreeSet<i32>, ReweightError> {
        let id = *self
            .by_name
            .get(name)
            .ok_or_else(|| ReweightError::InvalidParameter(format!("unknown bucket '{name}'")))?;
        self.resolve(id);
        self.resolved
            .get(&id)
            .ok_or_else(|| ReweightError::Computation(format!("bucket '{name}' did not resolve")))
    }

    /// Depth-first walk from `root`, post-order so every bucket on the way is cached.
    fn resolve(&mut self, root: i32) {
        if self.resolved.contains_key(&root) {
            return;
        }

        let mut stack = vec![(root, false)];
        let mut on_path = HashSet::new();

        while let Some((id, children_done)) = stack.pop() {
            if self.resolved.contains_key(&id) {
                continue;
            }
            let Some(node) = self.nodes.get(&id).copied() else {
                // Dangling child reference
                self.resolved.insert(id, BTreeSet::new());
                continue;
            };

            if node.is_device() {
                self.resolved.insert(id, BTreeSet::from([id]));
                continue;
            }

            if children_done {
                let osds = node
                    .children
                    .iter()
                    .filter_map(|c| self.resolved.get(c))
                    .flatten()
                    .copied()
                    .collect();
                on_path.remove(&id);
                self.resolved.insert(id, osds);
                continue;
            }

            on_path.insert(id);
            stack.push((id, true));
            for child in &node.children {
                if !self.resolved.contains_key(child) && !on_path.contains(child) {
                    stack.push((*child, false));
                }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn resolved_count(&self) -> usize {
        self.resolved.len()
    }
}

/// OSD ids tagged with the given device class.
pub(crate) fn osds_with_class(tree: &[TreeNode], class: &str) -> BTreeSet<i32> {
    tree.iter()
        .filter(|n| n.is_device() && n.device_class.as_deref() == Some(class))
        .map(|n| n.id)
        .collect()
}

/// Restrict candidates to the union of the requested buckets and device classes.
///
/// Returns `None` when no filter was requested, so the caller keeps the
/// unfiltered average.
pub(crate) fn restrict(
    candidates: &[Device],
    tree: &[TreeNode],
    buckets: &[String],
    device_classes: &[String],
) -> Result<Option<Vec<Device>>, ReweightError> {
    if buckets.is_empty() && device_classes.is_empty() {
        return Ok(None);
    }

    let mut allowed = BTreeSet::new();
    let mut index = BucketIndex::new(tree);
    for bucket in buckets {
        allowed.extend(index.osds_in(bucket)?.iter().copied());
    }
    for class in device_classes {
        allowed.extend(osds_with_class(tree, class));
    }

    let filtered: Vec<Device> =
        candidates.iter().filter(|d| allowed.contains(&d.id)).copied().collect();

    debug!(
        "Found {} OSDs after filtering by {} bucket(s) and {} device class(es)",
        filtered.len(),
        buckets.len(),
        device_classes.len()
    );

    Ok(Some(filtered))
}
