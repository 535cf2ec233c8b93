//! # Seed Data Generator
//!
//! Populates an empty catalog with a few stationery products for
//! development.
//!
//! ## Usage
//! ```bash
//! cargo run -p caixa-db --bin seed
//!
//! # Specify database path
//! cargo run -p caixa-db --bin seed -- --db ./data/caixa.db
//! ```

use caixa_core::{Product, ProductId};
use caixa_db::{Database, DbConfig};
use std::env;

/// (name, stock, price in centavos)
const CATALOG: &[(&str, i64, i64)] = &[
    ("Lápis HB", 120, 150),
    ("Borracha", 80, 250),
    ("Caneta Azul", 200, 350),
    ("Régua 30cm", 40, 590),
    ("Caderno 96 folhas", 10, 1990),
    ("Mochila", 5, 12990),
    ("Estojo", 25, 2490),
    ("Cola Branca", 60, 475),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./caixa_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Caixa Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./caixa_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Caixa Seed Data Generator");
    println!("=========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        db.close().await;
        return Ok(());
    }

    let mut generated = 0;
    for (index, (name, stock, price_cents)) in CATALOG.iter().enumerate() {
        let product = Product {
            id: ProductId(index as i64 + 1),
            name: name.to_string(),
            quantity_on_hand: *stock,
            unit_price_cents: *price_cents,
        };

        if let Err(e) = db.products().insert(&product).await {
            eprintln!("Failed to insert {}: {}", product.name, e);
            continue;
        }

        generated += 1;
    }

    println!();
    println!("✓ Inserted {} products", generated);

    db.close().await;
    Ok(())
}
