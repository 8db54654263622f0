//! DOM Tree (arena-based allocation)

use crate::{ElementData, Node, NodeId, SimpleSelector};

/// Arena-based DOM tree
///
/// Index 0 always holds the document node.
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// Root (document) node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Element data of a node, if it is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Push a detached node into the arena
    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached element with attributes
    pub fn create_element_with_attrs(&mut self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut node = Node::element(tag);
        if let Some(elem) = node.as_element_mut() {
            for (name, value) in attrs {
                elem.set_attr(name, value);
            }
        }
        self.push(node)
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::text(text.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.push(Node::comment(text.to_string()))
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.get(parent).is_none() || self.get(child).is_none() {
            return;
        }
        self.remove(child);

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
    }

    /// Detach a node from its parent; the subtree stays intact
    pub fn remove(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Iterate direct children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let first = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        Children { tree: self, next: first }
    }

    /// Iterate `id` and its ancestors up to the root
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        let next = if self.get(id).is_some() { id } else { NodeId::NONE };
        Ancestors { tree: self, next }
    }

    /// All descendants of `id` in document (pre-)order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).map(|(c, _)| c).collect();
        stack.reverse();
        while let Some(current) = stack.pop() {
            out.push(current);
            let start = stack.len();
            stack.extend(self.children(current).map(|(c, _)| c));
            stack[start..].reverse();
        }
        out
    }

    /// Whether `node` is `ancestor` or lies inside it
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|id| id == ancestor)
    }

    /// Whether the element at `id` matches `selector`
    pub fn matches(&self, id: NodeId, selector: &SimpleSelector) -> bool {
        self.element(id).is_some_and(|e| selector.matches(e))
    }

    /// Closest inclusive ancestor matching `selector`
    pub fn closest(&self, id: NodeId, selector: &SimpleSelector) -> Option<NodeId> {
        self.ancestors(id).find(|&a| self.matches(a, selector))
    }

    /// First descendant matching `selector`
    pub fn query_first(&self, root: NodeId, selector: &SimpleSelector) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|&id| self.matches(id, selector))
    }

    /// All descendants matching `selector`, in document order
    pub fn query_all(&self, root: NodeId, selector: &SimpleSelector) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&id| self.matches(id, selector))
            .collect()
    }

    /// Find the first element in the tree carrying `id`
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.descendants(self.root())
            .into_iter()
            .find(|&n| self.element(n).and_then(ElementData::id) == Some(id))
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .into_iter()
            .filter_map(|n| self.get(n).and_then(Node::as_text))
            .collect()
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Iterator from a node up to the root (inclusive)
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.next.is_valid() {
            return None;
        }
        let id = self.next;
        self.next = self.tree.get(id).map_or(NodeId::NONE, |n| n.parent);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_tree() -> (DomTree, NodeId, Vec<NodeId>) {
        let mut tree = DomTree::new();
        let ul = tree.create_element("ul");
        tree.append_child(tree.root(), ul);
        let items: Vec<NodeId> = (0..3)
            .map(|i| {
                let index = i.to_string();
                let li = tree.create_element_with_attrs("li", &[("class", "item"), ("data-index", index.as_str())]);
                tree.append_child(ul, li);
                li
            })
            .collect();
        (tree, ul, items)
    }

    #[test]
    fn test_append_and_siblings() {
        let (tree, ul, items) = list_tree();
        let children: Vec<NodeId> = tree.children(ul).map(|(id, _)| id).collect();
        assert_eq!(children, items);
        assert_eq!(tree.get(items[1]).unwrap().prev_sibling, items[0]);
        assert_eq!(tree.get(items[1]).unwrap().next_sibling, items[2]);
    }

    #[test]
    fn test_remove_relinks_siblings() {
        let (mut tree, ul, items) = list_tree();
        tree.remove(items[1]);
        let children: Vec<NodeId> = tree.children(ul).map(|(id, _)| id).collect();
        assert_eq!(children, vec![items[0], items[2]]);
        assert!(!tree.get(items[1]).unwrap().parent.is_valid());
    }

    #[test]
    fn test_descendants_document_order() {
        let (mut tree, ul, items) = list_tree();
        let span = tree.create_element("span");
        tree.append_child(items[0], span);
        assert_eq!(tree.descendants(ul), vec![items[0], span, items[1], items[2]]);
    }

    #[test]
    fn test_query_and_closest() {
        let (mut tree, ul, items) = list_tree();
        let span = tree.create_element("span");
        tree.append_child(items[2], span);

        let sel = SimpleSelector::parse(".item").unwrap();
        assert_eq!(tree.query_all(ul, &sel), items);
        assert_eq!(tree.closest(span, &sel), Some(items[2]));

        let by_attr = SimpleSelector::parse("[data-index=\"1\"]").unwrap();
        assert_eq!(tree.query_first(tree.root(), &by_attr), Some(items[1]));
        assert!(tree.contains(ul, span));
        assert!(!tree.contains(items[0], span));
    }
}
