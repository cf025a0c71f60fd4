//! Two-sided joins producing nested pair results.

use super::{Node, NodeKind};
use crate::Value;

/// Which input of a join a side adapter feeds.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

impl<'r> Node<'r> {
    /// Handle an item arriving on one side of a join.
    ///
    /// The item is stored on its side and paired with every item
    /// currently stored on the other side, in insertion order. Pairs
    /// carry the left component first, regardless of which side fired;
    /// cascaded joins therefore produce right-nested pairs.
    pub(crate) fn receive_side(&self, side: Side, item: &Value) {
        let (left, right) = match self.kind() {
            NodeKind::Join { left, right } => (left, right),
            _ => panic!("side adapter feeds non-join node {}", self.label()),
        };
        let (mine, theirs) = match side {
            Side::Left => (left, right),
            Side::Right => (right, left),
        };
        mine.borrow_mut().push(item.clone());
        let others: Vec<Value> = theirs.borrow().clone();
        for other in others {
            let pair = match side {
                Side::Left => Value::seq(vec![item.clone(), other]),
                Side::Right => Value::seq(vec![other, item.clone()]),
            };
            self.emit(&pair);
        }
    }
}
