pub mod admin;
pub mod audit_log;
pub mod category;
pub mod product;
pub mod product_image;
pub mod provider;
pub mod site_content;
pub mod tag;

pub use admin::Admin;
pub use audit_log::AuditLog;
pub use category::Category;
pub use product::{NamedRef, Product, ProductDetail};
pub use product_image::ProductImage;
pub use provider::Provider;
pub use site_content::SiteContent;
pub use tag::Tag;
