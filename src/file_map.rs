/*!
 * Arena-backed, index-aware file map
 *
 * Every node lives in one vector and refers to its parent and children by
 * [`NodeId`]. The nested view (top-level entries, then each directory's
 * children) is a traversal over that vector.
 */

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Index;

use crate::error::{FileMapError, Result};
use crate::path::{join_path_parts, path_to_path_parts};
use crate::types::{FileMapItem, NodeId};

/// Resolved file map
#[derive(Debug, Clone)]
pub struct FileMap<T> {
    nodes: Vec<FileMapItem<T>>,
    roots: BTreeMap<String, NodeId>,
}

impl<T> Default for FileMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FileMap<T> {
    /// Create an empty map
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            roots: BTreeMap::new(),
        }
    }

    /// Total number of nodes at every depth
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the map has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level entries keyed by name
    pub fn roots(&self) -> &BTreeMap<String, NodeId> {
        &self.roots
    }

    /// Node for a handle, if it belongs to this map
    pub fn get(&self, id: NodeId) -> Option<&FileMapItem<T>> {
        self.nodes.get(id.0)
    }

    /// Mutable access to the data of a node
    pub fn data_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id.0).map(|node| &mut node.data)
    }

    /// Parent node, `None` for top-level entries
    pub fn parent(&self, id: NodeId) -> Option<&FileMapItem<T>> {
        self.get(id)
            .and_then(|node| node.parent)
            .and_then(|parent| self.get(parent))
    }

    /// Children of a node keyed by name, `None` for files
    pub fn children(&self, id: NodeId) -> Option<&BTreeMap<String, NodeId>> {
        self.get(id).and_then(|node| node.children.as_ref())
    }

    /// Find a node by `/`-separated path; whitespace and stray slashes are ignored
    pub fn get_by_path(&self, path: &str) -> Option<NodeId> {
        self.get_by_path_parts(&path_to_path_parts(path))
    }

    /// Find a node by path segments
    pub fn get_by_path_parts<S: AsRef<str>>(&self, parts: &[S]) -> Option<NodeId> {
        let (first, rest) = parts.split_first()?;
        let mut current = *self.roots.get(first.as_ref().trim())?;
        for part in rest {
            current = *self.children(current)?.get(part.as_ref().trim())?;
        }
        Some(current)
    }

    /// Node ids in pre-order, siblings in name order
    pub fn preorder(&self) -> Preorder<'_, T> {
        Preorder {
            map: self,
            stack: self.roots.values().rev().copied().collect(),
        }
    }

    /// Copy of the map with every node's data converted by `f`
    pub fn map_data<U, F>(&self, mut f: F) -> FileMap<U>
    where
        F: FnMut(&T) -> U,
    {
        match self.try_map_data(|data| Ok::<_, std::convert::Infallible>(f(data))) {
            Ok(map) => map,
            Err(never) => match never {},
        }
    }

    /// Like [`FileMap::map_data`], stopping at the first error of `f`
    pub fn try_map_data<U, E, F>(&self, mut f: F) -> std::result::Result<FileMap<U>, E>
    where
        F: FnMut(&T) -> std::result::Result<U, E>,
    {
        let nodes = self
            .nodes
            .iter()
            .map(|node| -> std::result::Result<FileMapItem<U>, E> {
                Ok(FileMapItem {
                    path_parts: node.path_parts.clone(),
                    path: node.path.clone(),
                    data: f(&node.data)?,
                    parent: node.parent,
                    children: node.children.clone(),
                })
            })
            .collect::<std::result::Result<Vec<_>, E>>()?;
        Ok(FileMap {
            nodes,
            roots: self.roots.clone(),
        })
    }

    /// First data in pre-order that satisfies `predicate`
    pub fn find<P>(&self, mut predicate: P) -> Option<&T>
    where
        P: FnMut(&T) -> bool,
    {
        self.preorder()
            .map(|id| &self.nodes[id.0].data)
            .find(|data| predicate(*data))
    }

    /// Whether any node's data satisfies `predicate`
    pub fn any<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.find(predicate).is_some()
    }

    /// Rename every node with `f(current_name, node)`, top-down
    ///
    /// A child's new path is built from its already renamed parent. Keys in
    /// the parent's children map change with the names. Fails if a name
    /// becomes empty or two siblings end up with the same name; the map is
    /// left untouched on failure.
    pub fn transform_names<F>(&mut self, f: F) -> Result<()>
    where
        F: Fn(&str, &FileMapItem<T>) -> String,
    {
        let mut new_names = vec![String::new(); self.nodes.len()];
        self.plan_level(&self.roots, None, &f, &mut new_names)?;

        let order: Vec<NodeId> = self.preorder().collect();
        for id in order {
            let name = std::mem::take(&mut new_names[id.0]);
            let path_parts = self.child_path_parts(self.nodes[id.0].parent, &name);
            let node = &mut self.nodes[id.0];
            node.path = join_path_parts(&path_parts);
            node.path_parts = path_parts;
        }

        let roots = std::mem::take(&mut self.roots);
        self.roots = self.rekey(roots);
        for index in 0..self.nodes.len() {
            if let Some(children) = self.nodes[index].children.take() {
                self.nodes[index].children = Some(self.rekey(children));
            }
        }
        Ok(())
    }

    /// Compute and validate the new name of every node below `level`
    fn plan_level<F>(
        &self,
        level: &BTreeMap<String, NodeId>,
        parent: Option<NodeId>,
        f: &F,
        new_names: &mut [String],
    ) -> Result<()>
    where
        F: Fn(&str, &FileMapItem<T>) -> String,
    {
        let mut seen = BTreeSet::new();
        for (name, id) in level {
            let node = &self.nodes[id.0];
            let new_name = f(name.as_str(), node).trim().to_string();
            if new_name.is_empty() {
                return Err(FileMapError::InvalidName(node.path.clone()));
            }
            if !seen.insert(new_name.clone()) {
                return Err(FileMapError::NameCollision {
                    directory: self.directory_label(parent),
                    name: new_name,
                });
            }
            new_names[id.0] = new_name;

            if let Some(children) = &node.children {
                self.plan_level(children, Some(*id), f, new_names)?;
            }
        }
        Ok(())
    }

    /// Re-key a sibling map by the current names of its nodes
    fn rekey(&self, level: BTreeMap<String, NodeId>) -> BTreeMap<String, NodeId> {
        level
            .into_values()
            .map(|id| (self.nodes[id.0].name().to_string(), id))
            .collect()
    }

    /// Append a node and link it under `parent` with key `name`
    pub(crate) fn insert(
        &mut self,
        parent: Option<NodeId>,
        name: String,
        item: FileMapItem<T>,
    ) -> Result<NodeId> {
        let id = NodeId(self.nodes.len());
        let siblings = match parent {
            None => &mut self.roots,
            Some(p) => self.nodes[p.0]
                .children
                .get_or_insert_with(BTreeMap::new),
        };
        if siblings.contains_key(&name) {
            return Err(FileMapError::NameCollision {
                directory: self.directory_label(parent),
                name,
            });
        }
        siblings.insert(name, id);
        self.nodes.push(item);
        Ok(id)
    }

    /// Path segments for a new child of `parent`
    pub(crate) fn child_path_parts(&self, parent: Option<NodeId>, name: &str) -> Vec<String> {
        let mut parts = parent
            .map(|p| self.nodes[p.0].path_parts.clone())
            .unwrap_or_default();
        parts.push(name.to_string());
        parts
    }

    fn directory_label(&self, parent: Option<NodeId>) -> String {
        parent
            .map(|p| self.nodes[p.0].path.clone())
            .unwrap_or_else(|| "/".to_string())
    }

    fn subtree_eq(&self, id: NodeId, other: &FileMap<T>, other_id: NodeId) -> bool
    where
        T: PartialEq,
    {
        let (a, b) = (&self.nodes[id.0], &other.nodes[other_id.0]);
        if a.path_parts != b.path_parts || a.path != b.path || a.data != b.data {
            return false;
        }
        match (&a.children, &b.children) {
            (None, None) => true,
            (Some(x), Some(y)) => level_eq(self, x, other, y),
            _ => false,
        }
    }
}

fn level_eq<T: PartialEq>(
    left: &FileMap<T>,
    a: &BTreeMap<String, NodeId>,
    right: &FileMap<T>,
    b: &BTreeMap<String, NodeId>,
) -> bool {
    a.len() == b.len()
        && a.iter().all(|(name, id)| match b.get(name) {
            Some(other_id) => left.subtree_eq(*id, right, *other_id),
            None => false,
        })
}

/// Structural equality: same names, paths, data and nesting, regardless of
/// arena layout
impl<T: PartialEq> PartialEq for FileMap<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && level_eq(self, &self.roots, other, &other.roots)
    }
}

impl<T> Index<NodeId> for FileMap<T> {
    type Output = FileMapItem<T>;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

/// Pre-order iterator over a [`FileMap`]
pub struct Preorder<'a, T> {
    map: &'a FileMap<T>,
    stack: Vec<NodeId>,
}

impl<T> Iterator for Preorder<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        if let Some(children) = self.map.children(id) {
            self.stack.extend(children.values().rev().copied());
        }
        Some(id)
    }
}
