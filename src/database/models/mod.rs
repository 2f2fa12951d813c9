pub mod attribute;
pub mod category;
pub mod department;
pub mod product;
pub mod review;

pub use attribute::{Attribute, AttributeValue, ProductAttribute};
pub use category::{Category, ProductCategory};
pub use department::Department;
pub use product::{Product, ProductAttributeValue, ProductAttributeValueRow, ProductDetail};
pub use review::{NewReview, Review, ReviewReceipt, ANONYMOUS_CUSTOMER_ID};
