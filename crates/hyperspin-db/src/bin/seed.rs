//! # Seed Data Generator
//!
//! Populates the database with products and sales for development.
//!
//! ## Usage
//! ```bash
//! # Generate 60 products and 150 sales (defaults)
//! cargo run -p hyperspin-db --bin seed
//!
//! # Generate custom amounts
//! cargo run -p hyperspin-db --bin seed -- --products 120 --sales 500
//!
//! # Specify database path
//! cargo run -p hyperspin-db --bin seed -- --db ./data/hyperspin.db
//! ```
//!
//! ## Generated Data
//! Products are spread across five categories (Beverages, Snacks, Dairy,
//! Bakery, Pantry) with deterministic prices, costs, and stock levels
//! derived from the product index, so repeated runs against a fresh file
//! produce the same catalog.
//!
//! Sales run through the checkout engine like real ones: stock goes
//! down, payment methods rotate, and a sale is skipped once its product
//! runs dry. The run ends with a dashboard snapshot of the seeded store.

use std::env;

use hyperspin_core::{DashboardParams, Money, NewProduct, PaymentMethod, SaleLine};
use hyperspin_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

/// Product names per category for realistic test data
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Beverages",
        &[
            "Cola",
            "Orange Juice",
            "Sparkling Water",
            "Iced Tea",
            "Lemonade",
            "Cold Brew Coffee",
            "Apple Juice",
            "Energy Drink",
        ],
    ),
    (
        "Snacks",
        &[
            "Salted Crisps",
            "Tortilla Chips",
            "Chocolate Bar",
            "Trail Mix",
            "Gummy Bears",
            "Pretzels",
            "Granola Bar",
            "Popcorn",
        ],
    ),
    (
        "Dairy",
        &[
            "Whole Milk",
            "Greek Yogurt",
            "Cheddar Cheese",
            "Butter",
            "Cream Cheese",
            "Oat Milk",
            "Mozzarella",
            "Sour Cream",
        ],
    ),
    (
        "Bakery",
        &[
            "Sourdough Loaf",
            "Bagels",
            "Croissant",
            "Banana Bread",
            "Ciabatta",
            "Blueberry Muffin",
            "Rye Bread",
            "Cinnamon Roll",
        ],
    ),
    (
        "Pantry",
        &[
            "Spaghetti",
            "Basmati Rice",
            "Canned Tomatoes",
            "Peanut Butter",
            "Olive Oil",
            "Honey",
            "Black Beans",
            "Oatmeal",
        ],
    ),
];

/// Pack variants with a price addon in cents
const VARIANTS: &[(&str, i64)] = &[("Regular", 0), ("Large", 150), ("Family Pack", 400)];

/// Payment methods rotate through the seeded sales
const METHODS: [PaymentMethod; 4] = [
    PaymentMethod::Cash,
    PaymentMethod::CreditCard,
    PaymentMethod::Paypal,
    PaymentMethod::BankTransfer,
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyperspin=debug,sqlx=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut product_count: usize = 60;
    let mut sale_count: usize = 150;
    let mut db_path = String::from("./hyperspin_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--products" | "-p" => {
                if i + 1 < args.len() {
                    product_count = args[i + 1].parse().unwrap_or(60);
                    i += 1;
                }
            }
            "--sales" | "-s" => {
                if i + 1 < args.len() {
                    sale_count = args[i + 1].parse().unwrap_or(150);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("HyperSpin Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -p, --products <N>  Number of products to generate (default: 60)");
                println!("  -s, --sales <N>     Number of sales to process (default: 150)");
                println!("  -d, --db <PATH>     Database file path (default: ./hyperspin_dev.db)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 HyperSpin Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Products: {}", product_count);
    println!("Sales:    {}", sale_count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing data
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Generate products
    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'products: for (category_idx, (category, names)) in CATEGORIES.iter().enumerate() {
        for (name_idx, name) in names.iter().enumerate() {
            for (variant_idx, (variant, price_addon)) in VARIANTS.iter().enumerate() {
                if generated >= product_count {
                    break 'products;
                }

                let product = generate_product(
                    category,
                    name,
                    variant,
                    *price_addon,
                    category_idx * 100 + name_idx * 10 + variant_idx,
                );

                if let Err(e) = db.products().add(&product).await {
                    eprintln!("Failed to insert {}: {}", product.name, e);
                    continue;
                }

                generated += 1;

                if generated % 25 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    println!("✓ Generated {} products in {:?}", generated, start.elapsed());

    // Run sales through the checkout engine so stock levels, payments,
    // and the analytics all reflect real transactions
    println!();
    println!("Processing sales...");

    let products = db.products().list().await?;
    let checkout = db.checkout();

    let mut recorded = 0;
    let mut skipped = 0;
    let start = std::time::Instant::now();

    for s in 0..sale_count {
        let line_count = 1 + s % 3;
        let mut lines = Vec::with_capacity(line_count);
        for j in 0..line_count {
            let product = &products[(s * 7 + j * 3) % products.len()];
            let quantity = 1 + ((s + j) % 3) as i64;
            lines.push(SaleLine::new(&product.id, quantity));
        }

        let method = METHODS[s % METHODS.len()];
        let tendered = if method.requires_tender() {
            // Generous tender, the engine reports change on the receipt
            Some(Money::from_cents(100_000))
        } else {
            None
        };

        match checkout.process_sale(&lines, method, tendered).await {
            Ok(_) => recorded += 1,
            // Drained stock is expected late in the run
            Err(_) => skipped += 1,
        }

        if (s + 1) % 50 == 0 {
            println!("  Processed {} sales...", s + 1);
        }
    }

    println!(
        "✓ Recorded {} sales in {:?} ({} skipped, out of stock)",
        recorded,
        start.elapsed(),
        skipped
    );

    // Summarize what the dashboard now sees
    let snapshot = db
        .analytics()
        .dashboard_snapshot(&DashboardParams::default())
        .await?;

    println!();
    println!("📊 Store snapshot");
    println!("  Inventory value: {}", snapshot.inventory_value());
    println!("  Revenue:         {}", snapshot.total_revenue());
    println!("  Profit:          {}", snapshot.total_profit());
    println!("  Margin:          {:.1}%", snapshot.margin);
    println!("  Low stock items: {}", snapshot.low_stock_count);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single product with index-derived data.
fn generate_product(
    category: &str,
    name: &str,
    variant: &str,
    price_addon: i64,
    seed: usize,
) -> NewProduct {
    // Price: $1.49 - $9.98 base plus the variant addon
    let price_cents = 149 + ((seed * 37) % 850) as i64 + price_addon;

    // Cost: 55-74% of price
    let cost_pct = 55 + (seed % 20) as i64;
    let cost_price_cents = price_cents * cost_pct / 100;

    // Stock: 0-59, so some products start sold out
    let quantity = ((seed * 13) % 60) as i64;

    NewProduct {
        name: format!("{} {}", name, variant),
        category: Some(category.to_string()),
        description: None,
        price_cents,
        cost_price_cents,
        quantity,
    }
}
