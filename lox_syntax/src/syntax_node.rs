use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};

pub use lox_derive::*;

pub type Ptr<T> = Box<T>;

static ID: AtomicUsize = AtomicUsize::new(0);

/// Process-unique identity of an AST node, assigned at construction.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(usize);

impl NodeId {
    pub fn next() -> Self {
        let result = ID.fetch_add(1, Ordering::Relaxed);
        if result == usize::MAX {
            panic!("NodeId overflow");
        }
        Self(result)
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub trait SyntaxNode {
    fn id(&self) -> NodeId;
}
