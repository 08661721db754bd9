pub mod cashfree;
pub mod storefront;
