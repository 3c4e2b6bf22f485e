//! Load types

mod distributed;
mod node_load;
mod point_load;

pub use distributed::DistributedLoad;
pub use node_load::NodeLoad;
pub use point_load::PointLoad;
