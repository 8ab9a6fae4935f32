//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod orders;

use clap::{Args, Subcommand};

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart and its totals.
    Show,
    /// Add a catalog product to the cart.
    Add {
        /// Product ID.
        product_id: String,
        /// Quantity to add.
        #[arg(short, long, default_value_t = 1)]
        quantity: i64,
    },
    /// Remove a product from the cart.
    Remove {
        /// Product ID.
        product_id: String,
    },
    /// Set a product's quantity (0 removes it).
    Set {
        /// Product ID.
        product_id: String,
        /// New quantity.
        quantity: i64,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Change the display currency.
    Currency {
        /// EUR or USD.
        code: String,
    },
}

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// List products.
    List {
        /// Only active products in this category.
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one product.
    Show {
        /// Product ID.
        product_id: String,
    },
    /// Add a product.
    Add {
        /// Product name.
        #[arg(long)]
        name: String,
        /// Unit price, e.g. 899.99.
        #[arg(long)]
        price: f64,
        /// Category (rings, necklaces, earrings, ...).
        #[arg(long, default_value = "other")]
        category: String,
        /// Units in stock.
        #[arg(long, default_value_t = 0)]
        stock: i64,
        /// Description.
        #[arg(long, default_value = "")]
        description: String,
        /// Image files to embed.
        #[arg(long)]
        image: Vec<String>,
    },
    /// Delete a product.
    Delete {
        /// Product ID.
        product_id: String,
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Store-wide counts and revenue.
    Stats {
        /// Number of recent orders to show.
        #[arg(short, long, default_value_t = 5)]
        recent: usize,
    },
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Customer name.
    #[arg(long)]
    pub name: String,

    /// Customer email.
    #[arg(long)]
    pub email: String,

    /// Customer user ID.
    #[arg(long, default_value = "guest")]
    pub user: String,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List orders.
    List {
        /// Only this customer's orders, newest first.
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Move an order to a new status.
    Status {
        /// Order ID.
        order_id: String,
        /// pending, processing, shipped, completed or cancelled.
        status: String,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Write a default jewel.toml.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}
