pub mod mapper;
pub mod search;
pub mod types;

pub use mapper::{map_to_tiles, tiles_for_box, TextMapping};
pub use search::{
    filter_confident, find_text, sort_reading_order, text_changes, tiles_containing,
    TextChanges, DEFAULT_MIN_CONFIDENCE,
};
pub use types::{BoundingBox, TextMatch};
