//! # product-match CLI
//!
//! Command-line interface for the product photo matcher.
//!
//! ## Usage
//! ```bash
//! product-match compare reference_product.jpg current_product.jpg
//! product-match compare reference.dng current.jpg --output json
//! ```

mod cli;

use product_match::Result;

fn main() -> Result<()> {
    product_match::init_tracing();
    cli::run()
}
