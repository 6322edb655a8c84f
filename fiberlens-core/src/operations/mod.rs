pub mod inspect_block;

pub use inspect_block::{
    BlockLocation, BlockReport, InspectBlockOperation, InspectBlockResult,
};
