//! Place an order from the saved cart.

use anyhow::{Context as _, Result};
use chrono::Local;
use dialoguer::Confirm;
use jewel_commerce::checkout::{Customer, NewOrder};
use jewel_db::OrderService;

use super::CheckoutArgs;
use crate::context::Context;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.cart().await?;
    let customer = Customer::new(args.user, args.name, args.email);
    let order = NewOrder::from_cart(cart.state(), customer).context("Cannot place order")?;

    if !args.yes && !ctx.output.is_json() {
        super::cart::print_cart(cart.state(), ctx);
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Place order for {}?",
                order.total.display(order.currency)
            ))
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.warn("Checkout cancelled");
            return Ok(());
        }
    }

    let orders = OrderService::new(ctx.catalog().await?);
    let spinner = ctx.output.spinner("Placing order...");
    let created = orders.create(&order).await;
    spinner.finish_and_clear();
    let id = created?;

    cart.clear_cart();
    cart.flush().await;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "id": id,
            "total": order.total,
            "currency": order.currency,
        }));
        return Ok(());
    }

    ctx.output.success(&format!("Order {} placed", id));
    ctx.output.kv("Items", &order.item_count().to_string());
    ctx.output.kv("Total", &order.total.display(order.currency));
    ctx.output.kv("Placed", &Local::now().format("%Y-%m-%d %H:%M").to_string());
    ctx.output
        .info(&format!("A confirmation will be sent to {}", order.customer_email));
    Ok(())
}
