//! Domain models
//!
//! Plain data types shared between the cart, checkout and order
//! subsystems. All types serialize to the JSON shapes the backend
//! data service consumes and emits.

pub mod cart;
pub mod order;
pub mod product;

pub use cart::CartItem;
pub use order::{
    IdentityKey, OrderItem, OrderPayload, OrderRecord, OrderStatus, PaymentMethod, PaymentStatus,
    ShippingAddress, UserIdentity,
};
pub use product::{Product, ProductFilter};
