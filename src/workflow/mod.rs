pub mod reorder_ctx;
pub mod reorder_flow;

pub use reorder_ctx::ReorderCtx;
pub use reorder_flow::{
    RawPagePosition, ReorderFlow, ReorderOutcome, ReorderRequest, CONFLICT_MESSAGE,
};
