//! In-memory content service for testing
//!
//! Branches hold their own copy of the file tree. Creating a branch copies
//! the tree at that SHA; merging copies the files written on the head
//! branch onto the base. Every call is recorded in order.

#![allow(dead_code)]

use async_trait::async_trait;
use draftpress::encoding::decode_content;
use draftpress::error::{Error, Result};
use draftpress::platform::ContentService;
use draftpress::types::{
    Branch, CommitRecord, ContentEntry, FileContent, Namespace, PullRequest, RepoConfig, RepoInfo,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// One recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    GetFile { path: String, branch: String },
    ListDirectory { path: String, branch: String },
    PutFile(CommitRecord),
    ListBranches,
    CreateBranch { name: String, sha: String },
    DeleteBranch(String),
    CreatePr { head: String, base: String, title: String },
    FindOpenPr(String),
    MergePr { number: u64, message: String },
    GetRepo { owner: String, repo: String },
    CreateRepo { namespace: Namespace, name: String },
}

impl Call {
    /// Short name used for failure injection
    pub const fn op(&self) -> &'static str {
        match self {
            Self::GetFile { .. } => "get_file",
            Self::ListDirectory { .. } => "list_directory",
            Self::PutFile(_) => "put_file",
            Self::ListBranches => "list_branches",
            Self::CreateBranch { .. } => "create_branch",
            Self::DeleteBranch(_) => "delete_branch",
            Self::CreatePr { .. } => "create_pr",
            Self::FindOpenPr(_) => "find_open_pr",
            Self::MergePr { .. } => "merge_pr",
            Self::GetRepo { .. } => "get_repo",
            Self::CreateRepo { .. } => "create_repo",
        }
    }
}

#[derive(Default)]
struct State {
    /// branch name -> head SHA
    branches: BTreeMap<String, String>,
    /// branch name -> path -> file
    trees: HashMap<String, BTreeMap<String, FileContent>>,
    /// commit SHA -> tree as of that commit
    commits: HashMap<String, BTreeMap<String, FileContent>>,
    /// branch name -> paths written on it
    touched: HashMap<String, BTreeSet<String>>,
    open_prs: Vec<PullRequest>,
    repos: HashSet<String>,
}

impl State {
    /// Remember the tree at a branch's current head before it moves
    fn snapshot_head(&mut self, branch: &str) {
        if let Some(head) = self.branches.get(branch).cloned() {
            let tree = self.trees.get(branch).cloned().unwrap_or_default();
            self.commits.entry(head).or_insert(tree);
        }
    }

    fn set_head(&mut self, branch: &str, sha: String) {
        let tree = self.trees.get(branch).cloned().unwrap_or_default();
        self.commits.insert(sha.clone(), tree);
        self.branches.insert(branch.to_string(), sha);
    }

    fn tree_at(&self, sha: &str) -> Option<BTreeMap<String, FileContent>> {
        self.branches
            .iter()
            .find(|(_, head)| head.as_str() == sha)
            .and_then(|(branch, _)| self.trees.get(branch).cloned())
            .or_else(|| self.commits.get(sha).cloned())
    }
}

/// Recording mock of the GitHub content API
pub struct MockContentService {
    config: RepoConfig,
    state: Mutex<State>,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<&'static str, String>>,
    failing_paths: Mutex<HashMap<String, String>>,
    next_sha: AtomicU64,
    next_pr_number: AtomicU64,
}

impl MockContentService {
    /// Empty repository `test/site` with no branches
    pub fn new() -> Self {
        Self::with_config(RepoConfig {
            owner: "test".to_string(),
            repo: "site".to_string(),
            host: None,
        })
    }

    /// Empty repository with the given config
    pub fn with_config(config: RepoConfig) -> Self {
        Self {
            config,
            state: Mutex::new(State::default()),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
            failing_paths: Mutex::new(HashMap::new()),
            next_sha: AtomicU64::new(1),
            next_pr_number: AtomicU64::new(1),
        }
    }

    fn fresh_sha(&self, kind: &str) -> String {
        format!("{kind}{:04}", self.next_sha.fetch_add(1, Ordering::SeqCst))
    }

    // === Setup ===

    /// Add a branch at a commit SHA
    pub fn add_branch(&self, name: &str, sha: &str) {
        let mut state = self.state.lock().unwrap();
        state.branches.insert(name.to_string(), sha.to_string());
        state.trees.entry(name.to_string()).or_default();
    }

    /// Create a branch holding a copy of another branch's files
    pub fn fork_branch(&self, name: &str, from: &str) {
        let sha = self.fresh_sha("commit");
        let mut state = self.state.lock().unwrap();
        let tree = state.trees.get(from).cloned().unwrap_or_default();
        state.trees.insert(name.to_string(), tree);
        state.set_head(name, sha);
    }

    /// Put a file on a branch directly, returning its blob SHA
    pub fn add_file(&self, branch: &str, path: &str, content: &str) -> String {
        let sha = self.fresh_sha("blob");
        self.state
            .lock()
            .unwrap()
            .trees
            .entry(branch.to_string())
            .or_default()
            .insert(
                path.to_string(),
                FileContent {
                    path: path.to_string(),
                    sha: sha.clone(),
                    content: content.as_bytes().to_vec(),
                },
            );
        sha
    }

    /// Register a repository readable by `get_repo`
    pub fn add_repo(&self, full_name: &str) {
        self.state
            .lock()
            .unwrap()
            .repos
            .insert(full_name.to_string());
    }

    // === Error injection ===

    /// Make every call of `op` (e.g. `"put_file"`) fail
    pub fn fail(&self, op: &'static str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(op, message.to_string());
    }

    /// Stop failing `op`
    pub fn recover(&self, op: &'static str) {
        self.failures.lock().unwrap().remove(op);
    }

    /// Make `put_file` fail for one path only
    pub fn fail_put_for(&self, path: &str, message: &str) {
        self.failing_paths
            .lock()
            .unwrap()
            .insert(path.to_string(), message.to_string());
    }

    // === Inspection ===

    /// All calls so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Calls made after the first `skip`
    pub fn calls_since(&self, skip: usize) -> Vec<Call> {
        self.calls().into_iter().skip(skip).collect()
    }

    /// Operation names of calls made after the first `skip`
    pub fn ops_since(&self, skip: usize) -> Vec<&'static str> {
        self.calls_since(skip).iter().map(Call::op).collect()
    }

    /// Every recorded `put_file`
    pub fn puts(&self) -> Vec<CommitRecord> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::PutFile(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    /// File text on a branch
    pub fn file_text(&self, branch: &str, path: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .trees
            .get(branch)
            .and_then(|tree| tree.get(path))
            .map(|f| String::from_utf8_lossy(&f.content).into_owned())
    }

    /// Current branch names
    pub fn branch_names(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .branches
            .keys()
            .cloned()
            .collect()
    }

    /// Open pull requests
    pub fn open_prs(&self) -> Vec<PullRequest> {
        self.state.lock().unwrap().open_prs.clone()
    }

    // === Internals ===

    fn record(&self, call: Call) -> Result<()> {
        let op = call.op();
        let failing_path = match &call {
            Call::PutFile(record) => self
                .failing_paths
                .lock()
                .unwrap()
                .get(&record.path)
                .cloned(),
            _ => None,
        };
        self.calls.lock().unwrap().push(call);

        if let Some(message) = self.failures.lock().unwrap().get(op) {
            return Err(api_error(500, message));
        }
        if let Some(message) = failing_path {
            return Err(api_error(500, &message));
        }
        Ok(())
    }
}

impl Default for MockContentService {
    fn default() -> Self {
        Self::new()
    }
}

fn api_error(status: u16, message: &str) -> Error {
    Error::GitHubApi {
        status,
        message: message.to_string(),
    }
}

#[async_trait]
impl ContentService for MockContentService {
    async fn get_file(&self, path: &str, branch: &str) -> Result<Option<FileContent>> {
        self.record(Call::GetFile {
            path: path.to_string(),
            branch: branch.to_string(),
        })?;

        Ok(self
            .state
            .lock()
            .unwrap()
            .trees
            .get(branch)
            .and_then(|tree| tree.get(path))
            .cloned())
    }

    async fn list_directory(&self, path: &str, branch: &str) -> Result<Vec<ContentEntry>> {
        self.record(Call::ListDirectory {
            path: path.to_string(),
            branch: branch.to_string(),
        })?;

        let prefix = format!("{}/", path.trim_end_matches('/'));
        let state = self.state.lock().unwrap();
        let Some(tree) = state.trees.get(branch) else {
            return Ok(Vec::new());
        };

        Ok(tree
            .values()
            .filter_map(|f| {
                let name = f.path.strip_prefix(&prefix)?;
                (!name.contains('/')).then(|| ContentEntry {
                    name: name.to_string(),
                    path: f.path.clone(),
                    sha: f.sha.clone(),
                    size: f.content.len() as u64,
                    kind: "file".to_string(),
                    download_url: None,
                })
            })
            .collect())
    }

    async fn put_file(&self, record: &CommitRecord) -> Result<String> {
        self.record(Call::PutFile(record.clone()))?;

        let content = decode_content(&record.content)?;
        let blob_sha = self.fresh_sha("blob");
        let commit_sha = self.fresh_sha("commit");

        let mut state = self.state.lock().unwrap();
        if !state.branches.contains_key(&record.branch) {
            return Err(api_error(404, "Branch not found"));
        }
        state.snapshot_head(&record.branch);
        let tree = state.trees.entry(record.branch.clone()).or_default();
        let existing = tree.get(&record.path).map(|f| f.sha.clone());
        match (existing, record.sha.as_deref()) {
            (Some(current), Some(given)) if current != given => {
                return Err(api_error(409, "sha does not match"));
            }
            (Some(_), None) => {
                return Err(api_error(422, "\"sha\" wasn't supplied."));
            }
            _ => {}
        }

        tree.insert(
            record.path.clone(),
            FileContent {
                path: record.path.clone(),
                sha: blob_sha.clone(),
                content,
            },
        );
        state
            .touched
            .entry(record.branch.clone())
            .or_default()
            .insert(record.path.clone());
        state.set_head(&record.branch, commit_sha);
        Ok(blob_sha)
    }

    async fn list_branches(&self) -> Result<Vec<Branch>> {
        self.record(Call::ListBranches)?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .branches
            .iter()
            .map(|(name, sha)| Branch {
                name: name.clone(),
                sha: sha.clone(),
            })
            .collect())
    }

    async fn create_branch(&self, name: &str, sha: &str) -> Result<()> {
        self.record(Call::CreateBranch {
            name: name.to_string(),
            sha: sha.to_string(),
        })?;

        let mut state = self.state.lock().unwrap();
        if state.branches.contains_key(name) {
            return Err(api_error(422, "Reference already exists"));
        }
        let tree = state
            .tree_at(sha)
            .ok_or_else(|| api_error(422, "Object does not exist"))?;

        state.branches.insert(name.to_string(), sha.to_string());
        state.trees.insert(name.to_string(), tree);
        Ok(())
    }

    async fn delete_branch(&self, name: &str) -> Result<()> {
        self.record(Call::DeleteBranch(name.to_string()))?;

        let mut state = self.state.lock().unwrap();
        if state.branches.remove(name).is_none() {
            return Err(api_error(422, "Reference does not exist"));
        }
        state.trees.remove(name);
        state.touched.remove(name);
        Ok(())
    }

    async fn create_pr(&self, head: &str, base: &str, title: &str) -> Result<PullRequest> {
        self.record(Call::CreatePr {
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
        })?;

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        let pr = PullRequest {
            number,
            html_url: format!(
                "https://github.com/{}/{}/pull/{number}",
                self.config.owner, self.config.repo
            ),
            base_ref: base.to_string(),
            head_ref: head.to_string(),
            title: title.to_string(),
        };
        self.state.lock().unwrap().open_prs.push(pr.clone());
        Ok(pr)
    }

    async fn find_open_pr(&self, head: &str) -> Result<Option<PullRequest>> {
        self.record(Call::FindOpenPr(head.to_string()))?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .open_prs
            .iter()
            .find(|pr| pr.head_ref == head)
            .cloned())
    }

    async fn merge_pr(&self, number: u64, message: &str) -> Result<()> {
        self.record(Call::MergePr {
            number,
            message: message.to_string(),
        })?;

        let merge_sha = self.fresh_sha("merge");
        let mut state = self.state.lock().unwrap();
        let index = state
            .open_prs
            .iter()
            .position(|pr| pr.number == number)
            .ok_or_else(|| api_error(404, "Not Found"))?;
        let pr = state.open_prs.remove(index);
        state.snapshot_head(&pr.base_ref);

        let touched = state.touched.get(&pr.head_ref).cloned().unwrap_or_default();
        let changes: Vec<FileContent> = state
            .trees
            .get(&pr.head_ref)
            .map(|tree| {
                tree.values()
                    .filter(|f| touched.contains(&f.path))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        let base = state.trees.entry(pr.base_ref.clone()).or_default();
        for file in changes {
            base.insert(file.path.clone(), file);
        }
        state.set_head(&pr.base_ref, merge_sha);
        Ok(())
    }

    async fn get_repo(&self, owner: &str, repo: &str) -> Result<RepoInfo> {
        self.record(Call::GetRepo {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })?;

        let full_name = format!("{owner}/{repo}");
        if !self.state.lock().unwrap().repos.contains(&full_name) {
            return Err(api_error(404, "Not Found"));
        }
        Ok(RepoInfo {
            html_url: format!("https://github.com/{full_name}"),
            full_name,
            default_branch: "main".to_string(),
        })
    }

    async fn create_repo(&self, namespace: &Namespace, name: &str) -> Result<RepoInfo> {
        self.record(Call::CreateRepo {
            namespace: namespace.clone(),
            name: name.to_string(),
        })?;

        let owner = match namespace {
            Namespace::User => "test-user",
            Namespace::Org(org) => org.as_str(),
        };
        let full_name = format!("{owner}/{name}");
        if !self.state.lock().unwrap().repos.insert(full_name.clone()) {
            return Err(api_error(422, "name already exists on this account"));
        }
        Ok(RepoInfo {
            html_url: format!("https://github.com/{full_name}"),
            full_name,
            default_branch: "main".to_string(),
        })
    }

    fn config(&self) -> &RepoConfig {
        &self.config
    }
}
