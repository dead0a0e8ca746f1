//! Database layer for data persistence and access.
//!
//! This module implements the PostgreSQL data access layer using SQLx and the
//! Repository pattern.
//!
//! ```text
//! ┌──────────────┐
//! │   Services   │  (services::postgres - owns the pool)
//! └──────┬───────┘
//!        ↓
//! ┌──────────────┐
//! │ Repositories │  (db::handlers - queries over one connection)
//! └──────┬───────┘
//!        ↓
//! ┌──────────────┐
//! │    Models    │  (db::models - table rows)
//! └──────┬───────┘
//!        ↓
//!   PostgreSQL
//! ```
//!
//! - [`handlers`]: Repository implementations for CRUD operations
//! - [`models`]: Database record structures matching table schemas
//! - [`errors`]: Database-specific error types
//!
//! # Migrations
//!
//! Migrations live in the crate's `migrations/` directory and are applied on
//! startup through [`crate::migrator`]:
//!
//! ```ignore
//! catalog::migrator().run(&pool).await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod models;
