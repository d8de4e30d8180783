pub mod layout;
pub mod partition;
pub mod spec;

pub use layout::{GridLayout, TileRect};
pub use partition::{partition, Tile};
pub use spec::GridSpec;
