//! Structural elements module

mod member;
mod node;
mod support;

pub use member::FrameElement;
pub use node::{FrameNode, NodeId};
pub use support::{restrained_dofs, SupportKind};
