//! # Core Table Logic
//!
//! Everything about the interactive table that isn't drawing.
//! It knows nothing about any specific terminal library.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • TableData (grid)     │
//!                    │  • App (state)          │
//!                    │  • Action (messages)    │
//!                    │  • update() (reducer)   │
//!                    │  • flows (background)   │
//!                    └───────────┬─────────────┘
//!                                │ Action queue
//!                                ▼
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │  Adapter   │
//!                         │ (ratatui)  │
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`table`]: the grid of cells and column lookup
//! - [`selection`]: the cursor, narrating row changes
//! - [`announce`]: the screen reader channel
//! - [`narration`]: every announcement string
//! - [`transition`]: the move menu's background flow
//! - [`detail`]: the detail view's background flow
//! - [`state`] / [`action`]: render-thread state and the reducer applying background messages

pub mod action;
pub mod announce;
pub mod config;
pub mod detail;
pub mod error;
pub mod hooks;
pub mod narration;
pub mod page;
pub mod selection;
pub mod state;
pub mod table;
pub mod transition;
