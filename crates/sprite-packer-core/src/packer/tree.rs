use super::Packer;
use crate::model::{Placement, Rect, Size};

/// Binary-tree packer.
///
/// Each used node splits into a `right` child (beside the placed rectangle,
/// as tall as it) and a `down` child (full node width, below it). Lookup is a
/// depth-first walk, `right` before `down`; the first free node that fits wins.
/// There is no rotation and no best-fit scoring.
pub struct TreePacker {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    rect: Rect,
    used: bool,
    right: Option<usize>,
    down: Option<usize>,
}

impl Node {
    fn free(rect: Rect) -> Self {
        Self {
            rect,
            used: false,
            right: None,
            down: None,
        }
    }
}

impl TreePacker {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            nodes: vec![Node::free(Rect::new(0, 0, width, height))],
        }
    }

    pub fn bin(&self) -> Size {
        let root = self.nodes[0].rect;
        Size::new(root.w, root.h)
    }

    fn find(&self, w: u32, h: u32) -> Option<usize> {
        let mut stack = vec![0usize];
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            if node.used {
                // pushed in reverse so `right` is visited first
                if let Some(d) = node.down {
                    stack.push(d);
                }
                if let Some(r) = node.right {
                    stack.push(r);
                }
            } else if w <= node.rect.w && h <= node.rect.h {
                return Some(idx);
            }
        }
        None
    }

    fn split(&mut self, idx: usize, w: u32, h: u32) {
        let r = self.nodes[idx].rect;
        let down = Node::free(Rect::new(r.x, r.y + h, r.w, r.h - h));
        let right = Node::free(Rect::new(r.x + w, r.y, r.w - w, h));
        self.nodes.push(down);
        self.nodes.push(right);
        let n = self.nodes.len();
        let node = &mut self.nodes[idx];
        node.used = true;
        node.down = Some(n - 2);
        node.right = Some(n - 1);
    }
}

impl<K> Packer<K> for TreePacker {
    fn can_pack(&self, size: Size) -> bool {
        self.find(size.w, size.h).is_some()
    }

    fn pack(&mut self, key: K, size: Size) -> Option<Placement<K>> {
        let idx = self.find(size.w, size.h)?;
        let at = self.nodes[idx].rect;
        self.split(idx, size.w, size.h);
        Some(Placement {
            key,
            x: at.x,
            y: at.y,
            w: size.w,
            h: size.h,
        })
    }
}
