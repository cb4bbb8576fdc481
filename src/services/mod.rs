pub mod change_order_service;
pub mod page_order;

pub use change_order_service::{ChangeOrderService, MoveDirection};
pub use page_order::{
    parse_requested_position, positions_from_order, resolve_page_order, PagePosition,
};
