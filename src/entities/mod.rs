//! Storefront entities
pub mod cart;
pub mod cart_item;
pub mod checkout_session;
pub mod customer_address;
pub mod order;
pub mod order_item;
pub mod product;
pub mod product_variant;

// Re-export entities
pub use cart::{Entity as Cart, Model as CartModel};
pub use cart_item::{Entity as CartItem, Model as CartItemModel};
pub use checkout_session::{
    Entity as CheckoutSession, Model as CheckoutSessionModel, PaymentMethod, SessionStatus,
};
pub use customer_address::{Entity as CustomerAddress, Model as CustomerAddressModel};
pub use order::{DeliveryStatus, Entity as Order, Model as OrderModel, OrderStatus};
pub use order_item::{Entity as OrderItem, Model as OrderItemModel};
pub use product::{Entity as Product, Model as ProductModel};
pub use product_variant::{Entity as ProductVariant, Model as ProductVariantModel};
