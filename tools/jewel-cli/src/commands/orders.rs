//! Order administration commands.

use anyhow::{anyhow, Result};
use jewel_commerce::checkout::{Order, OrderStatus};
use jewel_db::OrderService;

use super::{OrdersArgs, OrdersCommand};
use crate::context::Context;
use crate::output::{status_badge, truncate};

/// Run the orders command.
pub async fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    let orders = OrderService::new(ctx.catalog().await?);

    match args.command {
        OrdersCommand::List { user } => {
            let list = match user {
                Some(uid) => orders.list_by_user(&uid).await?,
                None => orders.list_all().await?,
            };
            if ctx.output.is_json() {
                ctx.output.json(&list);
            } else if list.is_empty() {
                ctx.output.info("No orders");
            } else {
                print_orders(&list, ctx);
            }
            Ok(())
        }
        OrdersCommand::Status { order_id, status } => {
            let status = OrderStatus::parse(&status)
                .ok_or_else(|| anyhow!("Unknown order status: {}", status))?;
            orders.update_status(&order_id, status).await?;
            ctx.output
                .success(&format!("Order {} is now {}", order_id, status_badge(status.as_str())));
            Ok(())
        }
    }
}

/// Print orders as a table.
pub fn print_orders(orders: &[Order], ctx: &Context) {
    let widths = [20, 24, 6, 14, 10];
    ctx.output
        .table_row(&["ID", "CUSTOMER", "ITEMS", "TOTAL", "STATUS"], &widths);
    for order in orders {
        ctx.output.table_row(
            &[
                order.id.to_string(),
                truncate(&order.customer_name, widths[1]),
                order.item_count().to_string(),
                order.total.display(order.currency),
                status_badge(order.status.as_str()),
            ],
            &widths,
        );
    }
}
