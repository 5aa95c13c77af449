// storefront-core/examples/checkout_flow.rs
// End-to-end session: browse, fill a cart, check out, look up orders.

use std::sync::Arc;

use shared::models::{Product, UserIdentity};
use storefront_core::cart::MemoryStore;
use storefront_core::{CartStore, CatalogService, CheckoutWizard, InMemoryBackend, OrderService};

fn seed_products() -> Vec<Product> {
    vec![
        Product {
            id: "basmati-5kg".to_string(),
            name: "Basmati Rice 5kg".to_string(),
            price: 620.0,
            original_price: Some(700.0),
            description: None,
            image_url: None,
            category: "Staples".to_string(),
            in_stock: true,
            rating: Some(4.6),
            size: Some("5kg".to_string()),
            weight: None,
            is_loose: false,
        },
        Product {
            id: "tomatoes".to_string(),
            name: "Tomatoes".to_string(),
            price: 48.0,
            original_price: None,
            description: None,
            image_url: None,
            category: "Vegetables".to_string(),
            in_stock: true,
            rating: None,
            size: None,
            weight: Some("per kg".to_string()),
            is_loose: true,
        },
    ]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // Services are built once at session start and passed by reference.
    let backend = Arc::new(InMemoryBackend::new().with_products(seed_products()));
    let catalog = CatalogService::new(backend.clone());
    let orders = OrderService::new(backend.clone());
    let mut cart = CartStore::new(Box::new(MemoryStore::new()));
    let mut wizard = CheckoutWizard::new();

    let rice = catalog.find_product("basmati-5kg").await?;
    let tomatoes = catalog.find_product("tomatoes").await?;

    cart.add_unit(&rice)?;
    cart.add(&tomatoes, 0.75, true)?;

    let totals = storefront_core::compute_totals(cart.subtotal());
    tracing::info!(
        subtotal = totals.subtotal,
        delivery_fee = totals.delivery_fee,
        discount = totals.discount,
        total = totals.total,
        "cart summary"
    );

    wizard.start(&cart)?;
    {
        let draft = wizard.draft_mut();
        draft.name = "Asha Kulkarni".to_string();
        draft.phone = "9900112233".to_string();
        draft.address = "12 Lake Road".to_string();
        draft.city = "Pune".to_string();
        draft.state = "Maharashtra".to_string();
        draft.pincode = "411001".to_string();
    }
    wizard.next()?; // payment: cash on delivery is the only option
    wizard.next()?; // review

    let record = wizard.submit(&mut cart, &orders, None).await?;
    tracing::info!(
        order_number = %record.order_number,
        total = record.order_total,
        "order placed"
    );

    let identity = UserIdentity {
        phone: Some("9900112233".to_string()),
        ..Default::default()
    };
    for order in orders.orders_for(&identity).await {
        tracing::info!(
            order_number = %order.order_number,
            items = order.items_count(),
            status = ?order.order_status,
            "order on file"
        );
    }

    Ok(())
}
