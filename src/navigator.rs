//! Navigation & sync controller
//!
//! Keeps "current folder + children", the breadcrumb trail and the selection
//! consistent with the remote tree. Nothing is patched locally: every
//! successful mutation is followed by [`Navigator::refresh`], which re-fetches
//! the affected folder from the service.
//!
//! [`ViewState`] holds the state transitions as plain synchronous methods so a
//! UI event loop can issue requests itself and apply the results as they
//! settle. Results are applied in arrival order, so with several requests in
//! flight the last response to land wins.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::breadcrumb::{self, Trail};
use crate::client::RemoteTree;
use crate::error::{ExplorerError, Result};
use crate::model::{Folder, Node};
use crate::notice::Notices;
use crate::progress::UploadProgress;

/// Kinds of mutating operation, each followed by a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    CreateFolder,
    Rename,
    Delete,
    Upload,
}

impl Mutation {
    pub fn success_message(self) -> &'static str {
        match self {
            Mutation::CreateFolder => "Item created successfully",
            Mutation::Rename => "Item renamed successfully",
            Mutation::Delete => "Item deleted successfully",
            Mutation::Upload => "File uploaded successfully",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            Mutation::CreateFolder => "Failed to create item",
            Mutation::Rename => "Failed to rename item",
            Mutation::Delete => "Failed to delete item",
            Mutation::Upload => "Failed to upload file",
        }
    }
}

/// What activating a list entry led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// A folder was activated; the caller should navigate to this id.
    Navigate(String),
    /// A file was activated and is now selected.
    Selected,
    /// The id is not a child of the current folder.
    Unknown,
}

/// Rejects names that are empty once surrounding whitespace is removed.
///
/// Accepted names are sent exactly as typed.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        Err(ExplorerError::EmptyName)
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    folder: Option<Folder>,
    trail: Trail,
    selected: Option<Node>,
    loading: bool,
    pub notices: Notices,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn folder(&self) -> Option<&Folder> {
        self.folder.as_ref()
    }

    pub fn current_folder_id(&self) -> Option<&str> {
        self.folder.as_ref().map(|f| f.id.as_str())
    }

    pub fn children(&self) -> &[Node] {
        self.folder.as_ref().map_or(&[], |f| f.children.as_slice())
    }

    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    pub fn selected(&self) -> Option<&Node> {
        self.selected.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Applies the outcome of a root fetch. Returns true on success.
    pub fn apply_root<E: Display>(&mut self, result: std::result::Result<Folder, E>) -> bool {
        self.loading = false;
        match result {
            Ok(folder) => {
                self.trail = Trail::reset(folder.id.clone(), folder.name.clone());
                self.folder = Some(folder);
                self.selected = None;
                true
            }
            Err(e) => {
                warn!("loading root failed: {e}");
                self.notices.error(format!("Failed to load files: {e}"));
                false
            }
        }
    }

    /// Applies the outcome of a folder fetch. Returns true on success.
    ///
    /// On failure the folder, trail and selection stay as they were.
    pub fn apply_folder<E: Display>(&mut self, result: std::result::Result<Folder, E>) -> bool {
        self.loading = false;
        match result {
            Ok(folder) => {
                self.trail = breadcrumb::advance(&self.trail, &folder.id, &folder.name);
                self.folder = Some(folder);
                self.selected = None;
                true
            }
            Err(e) => {
                warn!("loading folder failed: {e}");
                self.notices.error(format!("Failed to open folder: {e}"));
                false
            }
        }
    }

    /// Records the outcome of a mutation as a notice. Returns true on success.
    pub fn record<T, E: Display>(
        &mut self,
        mutation: Mutation,
        result: &std::result::Result<T, E>,
    ) -> bool {
        match result {
            Ok(_) => {
                info!("{mutation:?} succeeded");
                self.notices.success(mutation.success_message());
                true
            }
            Err(e) => {
                warn!("{mutation:?} failed: {e}");
                self.notices
                    .error(format!("{}: {e}", mutation.failure_message()));
                false
            }
        }
    }

    /// Selects a child of the current folder. Returns false if `id` is not one.
    pub fn select(&mut self, id: &str) -> bool {
        match self.folder.as_ref().and_then(|f| f.child(id)) {
            Some(node) => {
                self.selected = Some(node.clone());
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Folders are entered, files are selected.
    pub fn activate(&mut self, id: &str) -> Activation {
        let Some(node) = self.folder.as_ref().and_then(|f| f.child(id)) else {
            return Activation::Unknown;
        };
        if node.is_folder {
            Activation::Navigate(node.id.clone())
        } else {
            self.selected = Some(node.clone());
            Activation::Selected
        }
    }
}

/// Drives a [`RemoteTree`] and keeps a [`ViewState`] in step with it.
pub struct Navigator<T> {
    remote: T,
    state: ViewState,
    progress: UploadProgress,
}

impl<T: RemoteTree> Navigator<T> {
    pub fn new(remote: T) -> Self {
        Self {
            remote,
            state: ViewState::new(),
            progress: UploadProgress::new(),
        }
    }

    pub fn remote(&self) -> &T {
        &self.remote
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }

    pub fn progress(&self) -> &UploadProgress {
        &self.progress
    }

    fn current_id(&self) -> Result<String> {
        self.state
            .current_folder_id()
            .map(str::to_string)
            .ok_or(ExplorerError::NoFolderLoaded)
    }

    pub async fn load_root(&mut self) -> Result<()> {
        self.state.begin_load();
        match self.remote.get_root().await {
            Ok(folder) => {
                debug!("root is '{}' ({})", folder.name, folder.id);
                self.state.apply_root::<ExplorerError>(Ok(folder));
                Ok(())
            }
            Err(e) => {
                self.state.apply_root::<&ExplorerError>(Err(&e));
                Err(e)
            }
        }
    }

    pub async fn navigate_to(&mut self, folder_id: &str) -> Result<()> {
        self.state.begin_load();
        match self.remote.get_folder(folder_id).await {
            Ok(folder) => {
                debug!("entered '{}' ({})", folder.name, folder.id);
                self.state.apply_folder::<ExplorerError>(Ok(folder));
                Ok(())
            }
            Err(e) => {
                self.state.apply_folder::<&ExplorerError>(Err(&e));
                Err(e)
            }
        }
    }

    /// Re-fetches `folder_id` so the view reflects what the service holds.
    pub async fn refresh(&mut self, folder_id: &str) -> Result<()> {
        self.navigate_to(folder_id).await
    }

    /// Refresh after a mutation; its failure is already reported as a notice
    /// and does not turn the mutation into a failure.
    async fn resync(&mut self, folder_id: &str) {
        if let Err(e) = self.refresh(folder_id).await {
            debug!("refresh after mutation failed: {e}");
        }
    }

    pub async fn create_folder(&mut self, name: &str, parent_id: &str) -> Result<Node> {
        validate_name(name)?;
        let result = self.remote.create_folder(name, parent_id).await;
        if self.state.record(Mutation::CreateFolder, &result) {
            self.resync(parent_id).await;
        }
        result
    }

    pub async fn rename(&mut self, item_id: &str, new_name: &str) -> Result<Node> {
        validate_name(new_name)?;
        let current = self.current_id()?;
        let result = self.remote.rename(item_id, new_name).await;
        if self.state.record(Mutation::Rename, &result) {
            self.resync(&current).await;
        }
        result
    }

    /// Deletes `item_id` once `confirm` agrees. Returns false if declined.
    pub async fn delete_item<F>(&mut self, item_id: &str, confirm: F) -> Result<bool>
    where
        F: FnOnce(&str) -> bool,
    {
        let current = self.current_id()?;
        if !confirm(item_id) {
            debug!("delete of {item_id} declined");
            return Ok(false);
        }
        let result = self.remote.delete(item_id).await;
        if self.state.record(Mutation::Delete, &result) {
            self.resync(&current).await;
        }
        result.map(|()| true)
    }

    /// Uploads one local file into `parent_id`.
    ///
    /// Progress is published through [`Navigator::progress`] and cleared a
    /// short delay after the upload settles.
    pub async fn upload_file(&mut self, path: &Path, parent_id: &str) -> Result<Node> {
        if !path.is_file() {
            return Err(ExplorerError::FileNotFound(path.display().to_string()));
        }
        let generation = self.progress.begin();
        let result = self
            .remote
            .upload_file(path, parent_id, self.progress.reporter())
            .await;
        self.progress.schedule_reset(generation);

        if self.state.record(Mutation::Upload, &result) {
            self.resync(parent_id).await;
        }
        result
    }

    /// Saves file `file_id` into `dest_dir`. The view state is not touched.
    pub async fn download(&self, file_id: &str, dest_dir: &Path) -> Result<PathBuf> {
        let name = self
            .state
            .folder()
            .and_then(|f| f.child(file_id))
            .map(|n| n.name.clone());
        self.remote.download(file_id, dest_dir, name.as_deref()).await
    }

    /// Enters a child folder or selects a child file.
    pub async fn activate(&mut self, id: &str) -> Result<Activation> {
        let activation = self.state.activate(id);
        if let Activation::Navigate(folder_id) = &activation {
            self.navigate_to(folder_id).await?;
        }
        Ok(activation)
    }
}
