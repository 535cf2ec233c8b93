//! # Repository Module
//!
//! Database repository implementations for the Caixa terminal.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repositories                                         │
//! │                                                                         │
//! │  Session loop                                                          │
//! │       │                                                                 │
//! │       │  db.products().get_product(ProductId(5))                       │
//! │       │  db.sales().record_sale(&intent)                               │
//! │       ▼                                                                 │
//! │  ProductRepository              SaleRepository                         │
//! │  ├── list_products()            ├── record_sale(intent)                │
//! │  ├── get_product(id)            │     └── SaleTransaction (private)    │
//! │  ├── find_product(id)           ├── get_sale(id)                       │
//! │  ├── insert(product)            ├── get_line_items(sale_id)            │
//! │  └── count()                    └── count()                            │
//! │       │                                 │                               │
//! │       ▼                                 ▼                               │
//! │  produtos                       vendas · itens_venda · produtos        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog lookup
//! - [`sale::SaleRepository`] - Atomic sale recording and read-back

pub mod product;
pub mod sale;
