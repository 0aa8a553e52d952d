//! Navigator behaviour against an in-memory remote tree.

use file_explorer::progress::PROGRESS_RESET_DELAY;
use file_explorer::{
    Activation, Crumb, ExplorerError, Folder, Navigator, Node, NoticeKind, ProgressFn, RemoteTree,
    Result,
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

struct Entry {
    node: Node,
    children: Vec<String>,
}

#[derive(Default)]
struct Store {
    nodes: HashMap<String, Entry>,
    root: String,
    next_id: u64,
    requests: Vec<String>,
    failing: HashSet<&'static str>,
}

impl Store {
    fn insert(&mut self, parent: Option<&str>, node: Node) -> String {
        let id = node.id.clone();
        if let Some(parent) = parent {
            if let Some(entry) = self.nodes.get_mut(parent) {
                entry.children.push(id.clone());
            }
        }
        self.nodes.insert(
            id.clone(),
            Entry {
                node,
                children: Vec::new(),
            },
        );
        id
    }

    fn fresh_id(&mut self) -> String {
        self.next_id += 1;
        format!("n{}", self.next_id)
    }

    fn check(&mut self, op: &'static str, detail: &str) -> Result<()> {
        self.requests.push(format!("{op} {detail}"));
        if self.failing.contains(op) {
            return Err(ExplorerError::ApiError {
                status: 500,
                message: format!("{op} failed"),
            });
        }
        Ok(())
    }

    fn listing(&self, id: &str) -> Result<Folder> {
        let entry = self
            .nodes
            .get(id)
            .filter(|e| e.node.is_folder)
            .ok_or_else(|| ExplorerError::NotFound("Folder not found".into()))?;
        let children = entry
            .children
            .iter()
            .filter_map(|c| self.nodes.get(c))
            .map(|e| {
                let mut node = e.node.clone();
                node.child_count = e.children.len();
                node
            })
            .collect();
        Ok(Folder::new(entry.node.id.clone(), entry.node.name.clone(), children))
    }

    fn remove(&mut self, id: &str) {
        if let Some(entry) = self.nodes.remove(id) {
            for child in entry.children {
                self.remove(&child);
            }
        }
        for entry in self.nodes.values_mut() {
            entry.children.retain(|c| c != id);
        }
    }
}

/// Root "My Files" (r1) holding folder "Docs" (d1) with "Specs" (s1) inside,
/// plus file "notes.txt" (f1).
struct MemoryTree {
    store: Mutex<Store>,
}

impl MemoryTree {
    fn new() -> Self {
        let mut store = Store::default();
        store.root = store.insert(None, Node::folder("r1", "My Files"));
        store.insert(Some("r1"), Node::folder("d1", "Docs"));
        store.insert(Some("d1"), Node::folder("s1", "Specs"));
        store.insert(Some("r1"), Node::file("f1", "notes.txt", "text/plain", 12));
        Self {
            store: Mutex::new(store),
        }
    }

    fn fail(&self, op: &'static str) {
        self.store.lock().unwrap().failing.insert(op);
    }

    fn heal(&self) {
        self.store.lock().unwrap().failing.clear();
    }

    fn requests(&self) -> Vec<String> {
        self.store.lock().unwrap().requests.clone()
    }

    fn snapshot(&self, id: &str) -> Folder {
        self.store.lock().unwrap().listing(id).unwrap()
    }
}

impl RemoteTree for MemoryTree {
    async fn get_root(&self) -> Result<Folder> {
        let mut store = self.store.lock().unwrap();
        store.check("root", "")?;
        let root = store.root.clone();
        store.listing(&root)
    }

    async fn get_folder(&self, id: &str) -> Result<Folder> {
        let mut store = self.store.lock().unwrap();
        store.check("folder", id)?;
        store.listing(id)
    }

    async fn create_folder(&self, name: &str, parent_id: &str) -> Result<Node> {
        let mut store = self.store.lock().unwrap();
        store.check("create", name)?;
        let id = store.fresh_id();
        let node = Node::folder(id, name);
        store.insert(Some(parent_id), node.clone());
        Ok(node)
    }

    async fn rename(&self, id: &str, name: &str) -> Result<Node> {
        let mut store = self.store.lock().unwrap();
        store.check("rename", id)?;
        let entry = store
            .nodes
            .get_mut(id)
            .ok_or_else(|| ExplorerError::NotFound("Item not found".into()))?;
        entry.node.name = name.to_string();
        Ok(entry.node.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        store.check("delete", id)?;
        store.remove(id);
        Ok(())
    }

    async fn upload_file(
        &self,
        path: &Path,
        parent_id: &str,
        progress: ProgressFn,
    ) -> Result<Node> {
        let total = std::fs::metadata(path)?.len();
        progress(0, total);
        progress(total / 2, total);

        let mut store = self.store.lock().unwrap();
        store.check("upload", parent_id)?;
        progress(total, total);
        let id = store.fresh_id();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        let node = Node::file(id, name, "text/plain", total);
        store.insert(Some(parent_id), node.clone());
        Ok(node)
    }

    async fn download(
        &self,
        id: &str,
        dest_dir: &Path,
        file_name: Option<&str>,
    ) -> Result<PathBuf> {
        {
            let mut store = self.store.lock().unwrap();
            store.check("download", id)?;
        }
        let path = dest_dir.join(file_name.unwrap_or(id));
        std::fs::write(&path, format!("contents of {id}"))?;
        Ok(path)
    }
}

async fn loaded() -> Navigator<MemoryTree> {
    let mut nav = Navigator::new(MemoryTree::new());
    assert_ok!(nav.load_root().await);
    nav
}

fn trail_ids<T: RemoteTree>(nav: &Navigator<T>) -> Vec<String> {
    nav.state()
        .trail()
        .crumbs()
        .iter()
        .map(|c| c.id.clone())
        .collect()
}

#[tokio::test]
async fn test_load_root_sets_single_crumb() {
    let nav = loaded().await;
    assert_eq!(nav.state().trail().crumbs(), &[Crumb::new("r1", "My Files")]);
    assert_eq!(nav.state().children().len(), 2);
    assert!(!nav.state().is_loading());
}

#[tokio::test]
async fn test_descend_and_return_to_root() {
    let mut nav = loaded().await;

    assert_ok!(nav.navigate_to("d1").await);
    assert_eq!(
        nav.state().trail().crumbs(),
        &[Crumb::new("r1", "My Files"), Crumb::new("d1", "Docs")]
    );

    assert_ok!(nav.navigate_to("r1").await);
    assert_eq!(nav.state().trail().crumbs(), &[Crumb::new("r1", "My Files")]);
}

#[tokio::test]
async fn test_breadcrumb_jump_truncates() {
    let mut nav = loaded().await;
    nav.navigate_to("d1").await.unwrap();
    nav.navigate_to("s1").await.unwrap();
    assert_eq!(trail_ids(&nav), vec!["r1", "d1", "s1"]);

    nav.navigate_to("d1").await.unwrap();
    assert_eq!(trail_ids(&nav), vec!["r1", "d1"]);
    assert_eq!(nav.state().current_folder_id(), Some("d1"));
}

#[tokio::test]
async fn test_failed_navigation_leaves_state_untouched() {
    let mut nav = loaded().await;
    nav.navigate_to("d1").await.unwrap();

    let err = assert_err!(nav.navigate_to("gone").await);
    assert!(matches!(err, ExplorerError::NotFound(_)));
    assert_eq!(trail_ids(&nav), vec!["r1", "d1"]);
    assert_eq!(nav.state().current_folder_id(), Some("d1"));
    assert!(!nav.state().is_loading());
    assert_eq!(nav.state().notices.latest().unwrap().kind, NoticeKind::Error);
}

#[tokio::test]
async fn test_failed_root_load_reports_and_clears_loading() {
    let tree = MemoryTree::new();
    tree.fail("root");
    let mut nav = Navigator::new(tree);

    assert_err!(nav.load_root().await);
    assert!(nav.state().folder().is_none());
    assert!(!nav.state().is_loading());
    assert_eq!(nav.state().notices.len(), 1);
}

#[tokio::test]
async fn test_whitespace_folder_name_sends_nothing() {
    let mut nav = loaded().await;
    let before = nav.remote().requests().len();

    let err = assert_err!(nav.create_folder("   ", "r1").await);
    assert!(matches!(err, ExplorerError::EmptyName));
    assert_eq!(nav.remote().requests().len(), before);
    assert!(nav.state().notices.is_empty());
}

#[tokio::test]
async fn test_create_folder_refreshes_parent() {
    let mut nav = loaded().await;

    let node = assert_ok!(nav.create_folder("Photos", "r1").await);
    assert_eq!(node.name, "Photos");
    assert_eq!(nav.state().folder(), Some(&nav.remote().snapshot("r1")));
    assert!(nav.state().children().iter().any(|n| n.name == "Photos"));
    assert_eq!(
        nav.state().notices.latest().unwrap().message,
        "Item created successfully"
    );
    assert_eq!(nav.remote().requests().last().unwrap(), "folder r1");
}

#[tokio::test]
async fn test_names_are_sent_as_typed() {
    let mut nav = loaded().await;

    let node = assert_ok!(nav.create_folder("  Photos ", "r1").await);
    assert_eq!(node.name, "  Photos ");
    assert!(nav.state().children().iter().any(|n| n.name == "  Photos "));

    let renamed = assert_ok!(nav.rename("d1", " Papers ").await);
    assert_eq!(renamed.name, " Papers ");
    assert_eq!(nav.remote().snapshot("r1").child("d1").unwrap().name, " Papers ");
}

#[tokio::test]
async fn test_failed_create_keeps_listing() {
    let mut nav = loaded().await;
    nav.remote().fail("create");
    let before = nav.state().folder().cloned();

    assert_err!(nav.create_folder("Photos", "r1").await);
    assert_eq!(nav.state().folder().cloned(), before);
    assert!(nav
        .state()
        .notices
        .latest()
        .unwrap()
        .message
        .starts_with("Failed to create item"));
}

#[tokio::test]
async fn test_rename_refreshes_current_folder() {
    let mut nav = loaded().await;
    nav.navigate_to("d1").await.unwrap();

    assert_err!(nav.rename("s1", " \t").await);
    let renamed = assert_ok!(nav.rename("s1", "Specifications").await);
    assert_eq!(renamed.name, "Specifications");
    assert_eq!(nav.state().folder(), Some(&nav.remote().snapshot("d1")));
    assert_eq!(nav.state().children()[0].name, "Specifications");
    assert_eq!(trail_ids(&nav), vec!["r1", "d1"]);
}

#[tokio::test]
async fn test_rename_without_folder_is_rejected() {
    let mut nav = Navigator::new(MemoryTree::new());
    let err = assert_err!(nav.rename("f1", "x").await);
    assert!(matches!(err, ExplorerError::NoFolderLoaded));
    assert!(nav.remote().requests().is_empty());
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let mut nav = loaded().await;
    let before = nav.remote().requests().len();

    let deleted = assert_ok!(nav.delete_item("f1", |_| false).await);
    assert!(!deleted);
    assert_eq!(nav.remote().requests().len(), before);
    assert!(nav.state().children().iter().any(|n| n.id == "f1"));
}

#[tokio::test]
async fn test_confirmed_delete_clears_selection() {
    let mut nav = loaded().await;
    assert!(nav.state_mut().select("f1"));

    let mut asked = None;
    let deleted = assert_ok!(
        nav.delete_item("f1", |id| {
            asked = Some(id.to_string());
            true
        })
        .await
    );
    assert!(deleted);
    assert_eq!(asked.as_deref(), Some("f1"));
    assert!(nav.state().selected().is_none());
    assert!(nav.state().children().iter().all(|n| n.id != "f1"));
    assert_eq!(nav.state().folder(), Some(&nav.remote().snapshot("r1")));
}

#[tokio::test]
async fn test_refresh_failure_after_mutation_still_succeeds() {
    let mut nav = loaded().await;
    nav.remote().fail("folder");

    assert_ok!(nav.create_folder("Photos", "r1").await);
    let kinds: Vec<_> = nav.state().notices.iter().map(|n| n.kind).collect();
    assert_eq!(kinds, vec![NoticeKind::Success, NoticeKind::Error]);

    nav.remote().heal();
    assert_ok!(nav.refresh("r1").await);
    assert!(nav.state().children().iter().any(|n| n.name == "Photos"));
}

#[tokio::test(start_paused = true)]
async fn test_upload_reports_progress_and_resets() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("hello.txt");
    std::fs::write(&path, "Hello, explorer!").expect("Failed to write test file");

    let mut nav = loaded().await;
    nav.navigate_to("d1").await.unwrap();

    let node = assert_ok!(nav.upload_file(&path, "d1").await);
    assert_eq!(node.name, "hello.txt");
    assert_eq!(nav.progress().get(), 100);
    assert!(nav.state().children().iter().any(|n| n.name == "hello.txt"));
    assert_eq!(nav.state().folder(), Some(&nav.remote().snapshot("d1")));

    tokio::time::sleep(PROGRESS_RESET_DELAY + std::time::Duration::from_millis(10)).await;
    assert_eq!(nav.progress().get(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_upload_still_resets_progress() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("big.bin");
    std::fs::write(&path, vec![0u8; 64]).expect("Failed to write test file");

    let mut nav = loaded().await;
    nav.remote().fail("upload");

    assert_err!(nav.upload_file(&path, "r1").await);
    assert_eq!(nav.progress().get(), 50);

    tokio::time::sleep(PROGRESS_RESET_DELAY * 2).await;
    assert_eq!(nav.progress().get(), 0);
}

#[tokio::test]
async fn test_upload_missing_file() {
    let mut nav = loaded().await;
    let before = nav.remote().requests().len();
    let err = assert_err!(nav.upload_file(Path::new("/nonexistent/file.txt"), "r1").await);
    assert!(matches!(err, ExplorerError::FileNotFound(_)));
    assert_eq!(nav.remote().requests().len(), before);
}

#[tokio::test]
async fn test_activate_selects_files_and_enters_folders() {
    let mut nav = loaded().await;

    assert_eq!(assert_ok!(nav.activate("f1").await), Activation::Selected);
    assert_eq!(nav.state().selected().unwrap().id, "f1");
    assert_eq!(trail_ids(&nav), vec!["r1"]);

    assert_eq!(
        assert_ok!(nav.activate("d1").await),
        Activation::Navigate("d1".into())
    );
    assert!(nav.state().selected().is_none());
    assert_eq!(trail_ids(&nav), vec!["r1", "d1"]);
}

#[tokio::test]
async fn test_download_uses_listing_name() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let nav = loaded().await;
    let before = nav.state().folder().cloned();

    let path = assert_ok!(nav.download("f1", dir.path()).await);
    assert_eq!(path, dir.path().join("notes.txt"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "contents of f1");
    assert_eq!(nav.state().folder().cloned(), before);
}

#[tokio::test]
async fn test_folder_opened_by_id_starts_its_own_trail() {
    let mut nav = Navigator::new(MemoryTree::new());
    assert_ok!(nav.navigate_to("s1").await);

    assert_eq!(trail_ids(&nav), vec!["s1"]);
    assert_eq!(nav.state().trail().render(" / "), "Specs");
    assert!(nav.remote().requests().iter().all(|r| !r.starts_with("root")));
}

#[tokio::test]
async fn test_last_crumb_tracks_current_folder() {
    let mut nav = loaded().await;
    for id in ["d1", "s1", "r1", "d1", "d1", "s1", "d1", "r1"] {
        nav.navigate_to(id).await.unwrap();
        let current = nav.state().current_folder_id().unwrap().to_string();
        assert_eq!(nav.state().trail().current().unwrap().id, current);
    }
}
