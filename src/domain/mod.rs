//! Domain layer containing click tracking models, ports and the click pipeline.
//!
//! # Architecture
//!
//! - [`entities`] - Durable data structures
//! - [`repositories`] - Persistence ports implemented by the infrastructure layer
//! - [`click_event`] - Click event produced by the redirect handler
//! - [`click_queue`] - Bounded, non-blocking click ingestion
//! - [`click_worker`] - Worker pool persisting clicks with retry
//!
//! # Click Processing Flow
//!
//! 1. HTTP handler receives a redirect request
//! 2. [`click_event::ClickEvent`] is submitted through [`click_queue::ClickIngestor`]
//! 3. A [`click_worker::ClickWorkerPool`] worker resolves the link id and retries writes
//! 4. Click data is persisted via [`repositories::ClickRepository`]

pub mod click_event;
pub mod click_queue;
pub mod click_worker;
pub mod entities;
pub mod repositories;
