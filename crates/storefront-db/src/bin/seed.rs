//! # Seed Data Generator
//!
//! Populates the database with merchants, items, invoices and transactions
//! for development.
//!
//! ## Usage
//! ```bash
//! # 10 merchants (default)
//! cargo run -p storefront-db --bin seed
//!
//! # Custom amount
//! cargo run -p storefront-db --bin seed -- --count 50
//!
//! # Specify database path
//! cargo run -p storefront-db --bin seed -- --db ./data/storefront.db
//! ```
//!
//! ## Generated Data
//! Per merchant:
//! - One item per catalog entry, priced $1.00 - $500.00
//! - A handful of invoices, some holding a single item and some several,
//!   so both branches of the item cascade can be tried by hand
//! - One transaction per invoice, mostly successful

use std::env;
use storefront_core::search::{ItemSearch, NameQuery, PriceRange};
use storefront_core::{InvoiceStatus, ItemParams, MerchantParams, TransactionResult};
use storefront_db::{Database, DbConfig};

/// Merchant names cycled through (suffixed when exhausted).
const MERCHANTS: &[&str] = &[
    "Schroeder-Jerde",
    "Klein, Rempel and Jones",
    "Willms and Sons",
    "Cummings-Thiel",
    "Williamson Group",
    "Bernhard-Johns",
    "Osinski, Pollich and Koelpin",
    "Hand-Spencer",
    "Glover Inc",
    "Bradley",
    "Ashley",
    "Alexander",
];

/// Item catalog: (name, description)
const CATALOG: &[(&str, &str)] = &[
    ("Item Qui Esse", "Nihil autem sit odio inventore deleniti"),
    ("Item Autem Minima", "Cumque consequuntur ad"),
    ("Item Ea Voluptatum", "Sunt officia eum qui molestiae"),
    ("Item Nemo Facere", "Sunt eum id eius magni consequuntur"),
    ("Item Expedita Aliquam", "Voluptate aut labore qui illum tempore"),
    ("Item Provident At", "Numquam officiis reprehenderit eum ratione"),
    ("dog bowl", "cute bowl for a very good dog"),
    ("stuffed dog", "plush and squeaky"),
    ("cat litter", "clumping, unscented"),
];

const CARDS: &[&str] = &["4654405418249632", "4580251236515201", "4354495077693036"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 10;
    let mut db_path = String::from("./storefront_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(10);
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
                println!("Storefront Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of merchants to generate (default: 10)");
                println!("  -d, --db <PATH>    Database file path (default: ./storefront_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Storefront Seed Data Generator");
    println!("==============================");
    println!("Database:  {}", db_path);
    println!("Merchants: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.merchants().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} merchants", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating data...");

    let start = std::time::Instant::now();
    let mut items_created = 0usize;
    let mut invoices_created = 0usize;

    for m in 0..count {
        let merchant = db
            .merchants()
            .insert(&MerchantParams { name: Some(merchant_name(m)) }.validate()?)
            .await?;

        let mut item_ids = Vec::with_capacity(CATALOG.len());
        for (c, (name, description)) in CATALOG.iter().enumerate() {
            let params = ItemParams {
                name: Some(name.to_string()),
                description: Some(description.to_string()),
                unit_price: Some(unit_price(m, c).into()),
                merchant_id: Some(merchant.id.into()),
            };
            let item = db.items().insert(&params.validate()?).await?;
            item_ids.push((item.id, item.unit_price));
            items_created += 1;
        }

        // Invoice n holds items [n, n + n % 3], so sizes vary between 1 and 3
        let invoices = db.invoices();
        for n in 0..4usize {
            let status = if n % 4 == 3 {
                InvoiceStatus::Pending
            } else {
                InvoiceStatus::Shipped
            };
            let invoice = invoices.create(merchant.id, status).await?;

            for (item_id, price) in item_ids.iter().skip(n).take(1 + n % 3) {
                invoices
                    .add_item(invoice.id, *item_id, 1 + (n as i64 % 5), *price)
                    .await?;
            }

            let result = if (m + n) % 5 == 0 {
                TransactionResult::Failed
            } else {
                TransactionResult::Success
            };
            invoices
                .add_transaction(invoice.id, CARDS[(m + n) % CARDS.len()], result)
                .await?;

            invoices_created += 1;
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "✓ Generated {} merchants, {} items, {} invoices in {:?}",
        count, items_created, invoices_created, elapsed
    );

    // Verify search
    println!();
    println!("Verifying search...");
    let dog = db
        .items()
        .search(&ItemSearch::ByName(NameQuery::new("dog")?))
        .await?;
    println!(
        "  Item 'dog': {}",
        dog.map(|item| item.name).unwrap_or_else(|| "none".into())
    );

    if let Some(range) = PriceRange::new(Some(50.0), Some(150.0))? {
        let priced = db.items().search(&ItemSearch::ByPrice(range)).await?;
        println!(
            "  Item $50-$150: {}",
            priced.map(|item| item.name).unwrap_or_else(|| "none".into())
        );
    }

    let merchants = db.merchants().search_by_name(&NameQuery::new("ley")?).await?;
    println!("  Merchants 'ley': {} results", merchants.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

fn merchant_name(index: usize) -> String {
    let base = MERCHANTS[index % MERCHANTS.len()];
    match index / MERCHANTS.len() {
        0 => base.to_string(),
        round => format!("{} {}", base, round + 1),
    }
}

/// Deterministic price between $1.00 and $500.00, in whole cents.
fn unit_price(merchant: usize, item: usize) -> f64 {
    let cents = 100 + ((merchant * 7919 + item * 104_729) % 49_901);
    cents as f64 / 100.0
}
