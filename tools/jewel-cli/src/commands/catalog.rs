//! Catalog administration commands.

use anyhow::{anyhow, Context as _, Result};
use dialoguer::Confirm;
use jewel_commerce::catalog::{Product, ProductCategory};
use jewel_commerce::Money;
use jewel_db::{DashboardService, DataUrlImageStore, ImageStore, NewProduct, ProductService};

use super::{CatalogArgs, CatalogCommand};
use crate::context::Context;
use crate::output::{status_badge, truncate};

/// Run the catalog command.
pub async fn run(args: CatalogArgs, ctx: &Context) -> Result<()> {
    let store = ctx.catalog().await?;
    let products = ProductService::new(store.clone());

    match args.command {
        CatalogCommand::List { category } => {
            let list = match category {
                Some(c) => products.list_by_category(ProductCategory::parse(&c)).await?,
                None => products.list_all().await?,
            };
            print_products(&list, ctx);
            Ok(())
        }
        CatalogCommand::Show { product_id } => {
            let product = products
                .get_by_id(&product_id)
                .await?
                .ok_or_else(|| anyhow!("Product not found: {}", product_id))?;
            print_product(&product, ctx);
            Ok(())
        }
        CatalogCommand::Add {
            name,
            price,
            category,
            stock,
            description,
            image,
        } => {
            let price = Money::from_decimal(price)
                .ok_or_else(|| anyhow!("Invalid price: {}", price))?;
            let mut product = NewProduct::new(name, price)
                .with_category(ProductCategory::parse(&category))
                .with_stock(stock);
            product.description = description;
            product.images = upload_images(&image, ctx).await?;

            let id = products.create(&product).await?;
            if ctx.output.is_json() {
                ctx.output.json(&serde_json::json!({ "id": id }));
            } else {
                ctx.output.success(&format!("Created {} ({})", product.name, id));
            }
            Ok(())
        }
        CatalogCommand::Delete { product_id, yes } => {
            let product = products
                .get_by_id(&product_id)
                .await?
                .ok_or_else(|| anyhow!("Product not found: {}", product_id))?;
            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete {}?", product.name))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    ctx.output.warn("Nothing deleted");
                    return Ok(());
                }
            }
            products.delete(&product_id).await?;
            ctx.output.success(&format!("Deleted {}", product.name));
            Ok(())
        }
        CatalogCommand::Stats { recent } => {
            let dashboard = DashboardService::new(store);
            let stats = dashboard.stats().await?;
            let orders = dashboard.recent_orders(recent).await?;

            if ctx.output.is_json() {
                ctx.output
                    .json(&serde_json::json!({ "stats": stats, "recentOrders": orders }));
                return Ok(());
            }

            ctx.output.header("Store");
            ctx.output.kv("Products", &stats.total_products.to_string());
            ctx.output.kv("Low stock", &stats.low_stock_count.to_string());
            ctx.output.kv("Orders", &stats.total_orders.to_string());
            ctx.output.kv("Customers", &stats.total_customers.to_string());
            ctx.output.kv("Revenue", &stats.total_revenue.display_amount());

            if !orders.is_empty() {
                ctx.output.header("Recent orders");
                super::orders::print_orders(&orders, ctx);
            }
            Ok(())
        }
    }
}

async fn upload_images(paths: &[String], ctx: &Context) -> Result<Vec<String>> {
    let uploader = DataUrlImageStore;
    let mut urls = Vec::with_capacity(paths.len());
    for path in paths {
        let full = ctx.resolve_path(path);
        let bytes = tokio::fs::read(&full)
            .await
            .with_context(|| format!("Failed to read image {}", full.display()))?;
        let url = uploader.upload(&bytes, path).await?;
        ctx.output.debug(&format!("Embedded {} ({} bytes)", path, bytes.len()));
        urls.push(url);
    }
    Ok(urls)
}

fn print_products(products: &[Product], ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&products);
        return;
    }
    if products.is_empty() {
        ctx.output.info("No products");
        return;
    }

    let widths = [20, 28, 10, 12, 6, 10];
    ctx.output.table_row(
        &["ID", "NAME", "CATEGORY", "PRICE", "STOCK", "STATUS"],
        &widths,
    );
    for p in products {
        ctx.output.table_row(
            &[
                p.id.to_string(),
                truncate(&p.name, widths[1]),
                p.category.as_str().to_string(),
                p.price.display(p.currency),
                p.stock.to_string(),
                status_badge(p.status.as_str()),
            ],
            &widths,
        );
    }
}

fn print_product(product: &Product, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(product);
        return;
    }

    ctx.output.header(&product.name);
    ctx.output.kv("ID", product.id.as_str());
    ctx.output.kv("Price", &product.price.display(product.currency));
    ctx.output.kv("Category", product.category.as_str());
    ctx.output.kv("Stock", &product.stock.to_string());
    ctx.output.kv("Status", &status_badge(product.status.as_str()));
    if !product.description.is_empty() {
        ctx.output.kv("Description", &product.description);
    }
    if !product.materials.is_empty() {
        ctx.output.kv("Materials", &product.materials.join(", "));
    }
    for gem in &product.gemstones {
        let carat = gem.carat.map(|c| format!(" {c}ct")).unwrap_or_default();
        ctx.output.kv("Gemstone", &format!("{} ({}){}", gem.kind, gem.color, carat));
    }
    if !product.images.is_empty() {
        ctx.output.kv("Images", &product.images.len().to_string());
    }
    if product.is_low_stock() {
        ctx.output.warn("Low stock");
    }
    if let Err(e) = product.validate_for_cart() {
        ctx.output.warn(&format!("Cannot be added to a cart: {}", e));
    }
}
