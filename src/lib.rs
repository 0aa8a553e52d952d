//! # file-explorer
//!
//! Client side of a remote file manager. The Remote Tree Service stores a
//! hierarchy of folders and files behind `/api/files`; this crate lists it,
//! navigates it with a breadcrumb trail and issues create, rename, delete,
//! upload and download requests against it.
//!
//! - [`client::ExplorerClient`] talks HTTP and implements [`RemoteTree`].
//! - [`navigator::Navigator`] owns the view state and re-fetches the affected
//!   folder after every successful mutation.
//! - [`breadcrumb::advance`] is the truncate-or-append rule for the trail.

pub mod breadcrumb;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod navigator;
pub mod notice;
pub mod progress;

pub use breadcrumb::{Crumb, Trail};
pub use client::{ExplorerClient, RemoteTree};
pub use config::ExplorerConfig;
pub use error::{ExplorerError, Result};
pub use model::{Folder, Node};
pub use navigator::{Activation, Mutation, Navigator, ViewState};
pub use notice::{Notice, NoticeKind, Notices};
pub use progress::{ProgressFn, UploadProgress};
