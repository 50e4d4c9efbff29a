//! Order Checkout with Fault Recovery
//!
//! This example demonstrates a checkout behavior whose payment step is
//! guarded by handlers for a small fault hierarchy.
//!
//! Key concepts:
//! - Composing activities into a single chain
//! - Guarded activities with handlers per fault kind
//! - Nearest-kind dispatch (Declined falls back to Payment)
//! - Unhandled faults surfacing as a wrapped error
//! - Inspecting the composed structure as JSON
//! - Persisting the order state by name
//!
//! Run with: cargo run --example order_recovery

use std::sync::Arc;
use trellis::activity::{from_fn, Activity};
use trellis::behavior::{Behavior, BehaviorContext, Chain};
use trellis::builder::TryBuilder;
use trellis::core::{Event, Fault, State};
use trellis::inspect::GraphInspector;
use trellis::persistence::StateConverter;
use trellis::{fault_kind, state_enum};

fault_kind! {
    enum CheckoutFault {
        Any,
        Payment: Any,
        Declined: Payment,
        GatewayDown: Payment,
        Fraud: Any,
        Inventory: Any,
        Unhandled: Any,
    }
    unhandled: Unhandled
}

state_enum! {
    enum OrderState {
        Draft,
        AwaitingPayment,
        Paid,
        Cancelled,
    }
}

// Order entity
#[derive(Debug)]
struct Order {
    id: u64,
    card: &'static str,
    in_stock: bool,
    notes: Vec<String>,
    state: Arc<OrderState>,
}

type Ctx<'a> = BehaviorContext<'a, Order, CheckoutFault>;

fn reserve_stock() -> Arc<dyn Activity<Order, CheckoutFault>> {
    from_fn("reserve stock", |ctx: &mut Ctx<'_>| {
        let order = ctx.instance_mut();
        if !order.in_stock {
            return Err(Fault::new(
                CheckoutFault::Inventory,
                format!("order {} has items out of stock", order.id),
            ));
        }
        order.notes.push("stock reserved".to_string());
        Ok(())
    })
}

fn charge_card() -> Arc<dyn Activity<Order, CheckoutFault>> {
    from_fn("charge card", |ctx: &mut Ctx<'_>| {
        let order = ctx.instance_mut();
        match order.card {
            "declined" => Err(Fault::new(CheckoutFault::Declined, "card was declined")),
            "offline" => Err(Fault::new(
                CheckoutFault::GatewayDown,
                "payment gateway timed out",
            )),
            "flagged" => Err(Fault::new(CheckoutFault::Fraud, "card flagged for review")),
            _ => {
                order.notes.push("card charged".to_string());
                Ok(())
            }
        }
    })
}

fn checkout(
    states: &StateConverter<OrderState>,
) -> Result<Chain<Order, CheckoutFault>, Box<dyn std::error::Error>> {
    let paid = states
        .read(Some("Paid"))?
        .ok_or("missing Paid state")?;
    let awaiting = states
        .read(Some("AwaitingPayment"))?
        .ok_or("missing AwaitingPayment state")?;

    let payment = TryBuilder::new(Event::new("Checkout"))
        .then(charge_card())
        .then(from_fn("mark paid", move |ctx: &mut Ctx<'_>| {
            ctx.instance_mut().state = Arc::clone(&paid);
            Ok(())
        }))
        .catch_fn(CheckoutFault::Declined, "ask for another card", |ctx: &mut Ctx<'_>| {
            let reason = ctx
                .exception()
                .map(|fault| fault.message().to_string())
                .unwrap_or_default();
            ctx.instance_mut().notes.push(format!("customer notified: {reason}"));
            Ok(())
        })
        .catch_fn(CheckoutFault::Payment, "hold order", move |ctx: &mut Ctx<'_>| {
            let order = ctx.instance_mut();
            order.state = Arc::clone(&awaiting);
            order.notes.push("payment retry scheduled".to_string());
            Ok(())
        })
        .build()?;

    Ok(Chain::compose(vec![
        reserve_stock(),
        Arc::new(payment) as Arc<dyn Activity<Order, CheckoutFault>>,
    ]))
}

async fn run_order(
    behavior: &Chain<Order, CheckoutFault>,
    states: &StateConverter<OrderState>,
    draft: &Arc<OrderState>,
    id: u64,
    card: &'static str,
    in_stock: bool,
) {
    let mut order = Order {
        id,
        card,
        in_stock,
        notes: Vec::new(),
        state: Arc::clone(draft),
    };

    let mut context = Ctx::for_event(&mut order, Event::new("Checkout"));
    let result = Behavior::execute(behavior, &mut context).await;

    println!(
        "Order {} (card: {}, in stock: {})",
        order.id, order.card, order.in_stock
    );
    for note in &order.notes {
        println!("  - {}", note);
    }
    match result {
        Ok(()) => println!("  state: {}", order.state.name()),
        Err(fault) => match fault.cause() {
            Some(cause) => println!("  failed: {} ({})", fault, cause),
            None => println!("  failed: {}", fault),
        },
    }
    println!(
        "  stored as: {}",
        states.write(Some(order.state.as_ref())).unwrap_or_default()
    );
    println!();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Order Checkout with Fault Recovery ===\n");

    let draft = Arc::new(OrderState::Draft);
    let states = StateConverter::new(vec![
        Arc::clone(&draft),
        Arc::new(OrderState::AwaitingPayment),
        Arc::new(OrderState::Paid),
        Arc::new(OrderState::Cancelled),
    ])?;
    let behavior = checkout(&states)?;

    run_order(&behavior, &states, &draft, 1, "valid", true).await;
    run_order(&behavior, &states, &draft, 2, "declined", true).await;
    run_order(&behavior, &states, &draft, 3, "offline", true).await;
    run_order(&behavior, &states, &draft, 4, "flagged", true).await;
    run_order(&behavior, &states, &draft, 5, "valid", false).await;

    println!("Behavior structure:");
    let mut inspector = GraphInspector::new();
    Behavior::accept(&behavior, &mut inspector);
    println!("{}", inspector.to_json()?);

    println!("\n=== Example Complete ===");
    Ok(())
}
