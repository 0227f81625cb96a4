//! Domain Layer
//!
//! Pure provisioning logic without I/O dependencies.
//!
//! ## Structure
//!
//! - `entities/` - Site document, transfer credential, rendered configs
//! - `value_objects/` - Site name, sync events, server layout
//! - `services/` - Structured remote operations and shell escaping
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or network directly
//! 2. **Pure Functions** - Rendering and classification are deterministic and testable
//! 3. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
