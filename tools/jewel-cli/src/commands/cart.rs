//! Shopping cart commands.

use anyhow::{anyhow, bail, Result};
use dialoguer::Confirm;
use jewel_commerce::cart::{CartState, FREE_SHIPPING_THRESHOLD, TAX_RATE};
use jewel_commerce::{CartEngine, Currency};
use jewel_db::ProductService;

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::{format_shipping, truncate};

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let mut cart = ctx.cart().await?;

    let result = match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => Ok(()),
        CartCommand::Add {
            product_id,
            quantity,
        } => add(&mut cart, &product_id, quantity, ctx).await,
        CartCommand::Remove { product_id } => {
            if cart.item_quantity(&product_id) == 0 {
                ctx.output.warn(&format!("{} is not in the cart", product_id));
            }
            cart.remove_item(&product_id);
            Ok(())
        }
        CartCommand::Set {
            product_id,
            quantity,
        } => set(&mut cart, &product_id, quantity, ctx),
        CartCommand::Clear { yes } => clear(&mut cart, yes, ctx),
        CartCommand::Currency { code } => {
            let currency = Currency::from_code(&code)
                .ok_or_else(|| anyhow!("Unsupported currency: {} (use EUR or USD)", code))?;
            cart.update_currency(currency);
            Ok(())
        }
    };

    cart.flush().await;
    result?;

    if let Some(error) = cart.state().error.clone() {
        bail!(error);
    }

    print_cart(cart.state(), ctx);
    Ok(())
}

async fn add(cart: &mut CartEngine, product_id: &str, quantity: i64, ctx: &Context) -> Result<()> {
    if quantity <= 0 {
        bail!("Quantity must be at least 1");
    }

    let products = ProductService::new(ctx.catalog().await?);
    let product = products.get_by_id(product_id).await?;
    match &product {
        Some(p) if !p.is_listed() => ctx.output.warn(&format!("{} is not listed", p.name)),
        Some(p) if exceeds_stock(p.stock, cart.item_quantity(product_id), quantity) => ctx
            .output
            .warn(&format!("Only {} of {} in stock", p.stock, p.name)),
        Some(_) => {}
        None => ctx.output.debug(&format!("No product with id {}", product_id)),
    }

    cart.add_item(product.as_ref(), quantity);
    if cart.state().error.is_none() {
        if let Some(p) = &product {
            ctx.output.success(&format!("Added {} × {}", quantity, p.name));
        }
    }
    Ok(())
}

/// True when adding `quantity` on top of `in_cart` goes past `stock`.
fn exceeds_stock(stock: i64, in_cart: i64, quantity: i64) -> bool {
    in_cart.saturating_add(quantity) > stock
}

fn set(cart: &mut CartEngine, product_id: &str, quantity: i64, ctx: &Context) -> Result<()> {
    if quantity < 0 {
        bail!("Quantity cannot be negative");
    }
    if cart.item_quantity(product_id) == 0 {
        bail!("{} is not in the cart", product_id);
    }
    cart.update_quantity(product_id, quantity);
    if quantity == 0 {
        ctx.output.success(&format!("Removed {}", product_id));
    }
    Ok(())
}

fn clear(cart: &mut CartEngine, yes: bool, ctx: &Context) -> Result<()> {
    if cart.state().is_empty() {
        ctx.output.info("Cart is already empty");
        return Ok(());
    }
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} items from the cart?", cart.state().item_count()))
            .default(false)
            .interact()?;
        if !confirmed {
            ctx.output.warn("Cart left unchanged");
            return Ok(());
        }
    }
    cart.clear_cart();
    ctx.output.success("Cart cleared");
    Ok(())
}

/// Print the cart table and totals.
pub fn print_cart(state: &CartState, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(state);
        return;
    }

    ctx.output.header("Cart");
    if state.is_empty() {
        ctx.output.info("Your cart is empty");
        return;
    }

    let currency = state.currency;
    let widths = [20, 28, 5, 12, 12];
    ctx.output
        .table_row(&["PRODUCT", "NAME", "QTY", "PRICE", "LINE"], &widths);
    for item in &state.items {
        let line = state.item_total(item.product_id.as_str());
        ctx.output.table_row(
            &[
                truncate(item.product_id.as_str(), widths[0]),
                truncate(&item.product.name, widths[1]),
                item.quantity.to_string(),
                item.product.price.display(currency),
                line.display(currency),
            ],
            &widths,
        );
    }

    println!();
    ctx.output.kv("Subtotal", &state.subtotal.display(currency));
    ctx.output.kv(
        &format!("Tax ({:.0}%)", TAX_RATE.as_fraction() * 100.0),
        &state.tax.display(currency),
    );
    ctx.output
        .kv("Shipping", &format_shipping(state.shipping, currency));
    ctx.output.kv("Total", &state.total.display(currency));

    if !state.shipping.is_zero() {
        ctx.output.info(&format!(
            "Free shipping on orders over {}",
            FREE_SHIPPING_THRESHOLD.display(currency)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exceeds_stock() {
        assert!(!exceeds_stock(5, 2, 3));
        assert!(exceeds_stock(5, 2, 4));
        assert!(exceeds_stock(5, 1, i64::MAX));
        assert!(!exceeds_stock(i64::MAX, 0, i64::MAX));
    }
}
