mod kavl;

pub use kavl::{InOrder, Insertion, KAvlTree, Node, PreOrder, Removal, Search};
