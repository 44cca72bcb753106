//! PocketFiler Core Domain Logic
//!
//! This crate contains:
//! - Configuration and error types
//! - Input snapshot and button mapping
//! - Screen layout and hit-testing
//! - Region invalidation, selection and the icon cache
//! - The command bar and the operation state machine
//! - The owned application context driven once per tick

pub mod config;
pub mod error;
pub mod input;
pub mod layout;
pub mod region;
pub mod selection;
pub mod icon_cache;
pub mod host;
pub mod command;
pub mod operation;
pub mod state;

pub use config::{AppConfig, GeneralConfig, LayoutConfig, StatusConfig};
pub use error::AppError;
pub use input::{Action, Button, ButtonSet, InputMap, InputSnapshot, TouchPoint};
pub use layout::{Layout, Rect};
pub use region::{DirtySet, Region, RegionInvalidation, RegionSet, StatusLevel, StatusMessage};
pub use selection::SelectionModel;
pub use icon_cache::{IconCache, IconKind};
pub use host::{Bitmap, ExtensionResolver, FileOpener, IconResolver, LogOpener, NoIconResolver};
pub use command::{Command, CommandButton, CommandHandler, CommandTable, PendingCommand};
pub use operation::OperationState;
pub use state::{ApplicationContext, RenderFrame, TickOutcome};
