//! Mock collaborators for workflow tests
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use mr_kickoff::error::{Error, Result};
use mr_kickoff::platform::HostingService;
use mr_kickoff::repo::Repository;
use mr_kickoff::types::{Author, HostUser, MergeRequest, NewMergeRequest};
use mr_kickoff::workflow::Prompter;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Scripted repository with call tracking and error injection
pub struct MockRepository {
    project: String,
    current: Mutex<String>,
    local_refs: Mutex<HashSet<String>>,
    remote_order: Vec<String>,
    remote_branches: Mutex<HashMap<String, HashSet<String>>>,
    failing_remotes: HashSet<String>,
    staged: Mutex<Vec<String>>,
    modified: Mutex<Vec<String>>,
    calls: Mutex<Vec<String>>,
    fail_push: Mutex<Option<String>>,
    fail_commit: Mutex<Option<String>>,
}

impl MockRepository {
    /// Repository checked out on `branch` with a single "origin" remote
    pub fn on_branch(branch: &str) -> Self {
        let mut repo = Self {
            project: "demo-project".to_string(),
            current: Mutex::new(branch.to_string()),
            local_refs: Mutex::new(HashSet::from([branch.to_string()])),
            remote_order: vec![],
            remote_branches: Mutex::new(HashMap::new()),
            failing_remotes: HashSet::new(),
            staged: Mutex::new(Vec::new()),
            modified: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            fail_push: Mutex::new(None),
            fail_commit: Mutex::new(None),
        };
        repo.add_remote("origin", &[]);
        repo
    }

    /// Add a remote with the given existing branches
    pub fn add_remote(&mut self, name: &str, branches: &[&str]) {
        self.remote_order.push(name.to_string());
        self.remote_branches.lock().unwrap().insert(
            name.to_string(),
            branches.iter().map(ToString::to_string).collect(),
        );
    }

    /// Make every lookup against `name` fail
    pub fn fail_remote(&mut self, name: &str) {
        self.failing_remotes.insert(name.to_string());
    }

    /// Register a local ref
    pub fn add_local_ref(&self, name: &str) {
        self.local_refs.lock().unwrap().insert(name.to_string());
    }

    /// Set the staged file list
    pub fn set_staged(&self, files: &[&str]) {
        *self.staged.lock().unwrap() = files.iter().map(ToString::to_string).collect();
    }

    /// Set the modified-but-unstaged file list
    pub fn set_modified(&self, files: &[&str]) {
        *self.modified.lock().unwrap() = files.iter().map(ToString::to_string).collect();
    }

    /// Make `push` fail with `msg`
    pub fn fail_push(&self, msg: &str) {
        *self.fail_push.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `commit` fail with `msg`
    pub fn fail_commit(&self, msg: &str) {
        *self.fail_commit.lock().unwrap() = Some(msg.to_string());
    }

    /// Mutating calls in invocation order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Repository for MockRepository {
    fn project_name(&self) -> String {
        self.project.clone()
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.current.lock().unwrap().clone())
    }

    fn ref_exists(&self, name: &str) -> Result<bool> {
        Ok(self.local_refs.lock().unwrap().contains(name))
    }

    fn remotes(&self) -> Result<Vec<String>> {
        Ok(self.remote_order.clone())
    }

    fn remote_has_branch(&self, remote: &str, name: &str) -> Result<bool> {
        if self.failing_remotes.contains(remote) {
            return Err(Error::Git(format!("simulated lookup failure on '{remote}'")));
        }
        Ok(self
            .remote_branches
            .lock()
            .unwrap()
            .get(remote)
            .is_some_and(|branches| branches.contains(name)))
    }

    fn staged_files(&self) -> Result<Vec<String>> {
        Ok(self.staged.lock().unwrap().clone())
    }

    fn modified_files(&self) -> Result<Vec<String>> {
        Ok(self.modified.lock().unwrap().clone())
    }

    fn stage_all(&self) -> Result<()> {
        self.record("stage_all".to_string());
        let mut modified = self.modified.lock().unwrap();
        self.staged.lock().unwrap().append(&mut modified);
        Ok(())
    }

    fn create_branch(&self, name: &str) -> Result<()> {
        self.record(format!("create_branch {name}"));
        self.local_refs.lock().unwrap().insert(name.to_string());
        Ok(())
    }

    fn checkout(&self, name: &str) -> Result<()> {
        self.record(format!("checkout {name}"));
        *self.current.lock().unwrap() = name.to_string();
        Ok(())
    }

    fn commit(&self, message: &str, _author: &Author) -> Result<()> {
        if let Some(msg) = self.fail_commit.lock().unwrap().as_ref() {
            return Err(Error::Git(msg.clone()));
        }
        self.record(format!("commit {message}"));
        Ok(())
    }

    fn push(&self, remote: &str, refspec: &str) -> Result<()> {
        if let Some(msg) = self.fail_push.lock().unwrap().as_ref() {
            return Err(Error::Git(msg.clone()));
        }
        self.record(format!("push {remote} {refspec}"));
        Ok(())
    }
}

/// Scripted hosting server with call tracking and error injection
pub struct MockHosting {
    open_mrs: Mutex<HashMap<String, MergeRequest>>,
    users: Mutex<HashMap<u64, HostUser>>,
    created: Mutex<Vec<NewMergeRequest>>,
    find_calls: Mutex<Vec<String>>,
    fail_create: Mutex<Option<String>>,
    next_iid: AtomicU64,
}

impl MockHosting {
    /// Server with no open merge requests
    pub fn empty() -> Self {
        Self {
            open_mrs: Mutex::new(HashMap::new()),
            users: Mutex::new(HashMap::new()),
            created: Mutex::new(Vec::new()),
            find_calls: Mutex::new(Vec::new()),
            fail_create: Mutex::new(None),
            next_iid: AtomicU64::new(1),
        }
    }

    /// Register an open merge request for `source_branch`
    pub fn with_open_mr(self, source_branch: &str) -> Self {
        let mr = MergeRequest {
            iid: 999,
            web_url: "https://gitlab.example.com/demo/-/merge_requests/999".to_string(),
            source_branch: source_branch.to_string(),
            target_branch: "dev".to_string(),
            title: format!("existing MR for {source_branch}"),
            description: None,
            author_id: Some(7),
            created_at: None,
        };
        self.open_mrs
            .lock()
            .unwrap()
            .insert(source_branch.to_string(), mr);
        self
    }

    /// Register a server-side user
    pub fn with_user(self, id: u64, name: &str, email: Option<&str>) -> Self {
        self.users.lock().unwrap().insert(
            id,
            HostUser {
                name: name.to_string(),
                email: email.map(ToString::to_string),
            },
        );
        self
    }

    /// Make `create_mr` fail with `msg`
    pub fn fail_create(&self, msg: &str) {
        *self.fail_create.lock().unwrap() = Some(msg.to_string());
    }

    /// All `create_mr` calls
    pub fn created(&self) -> Vec<NewMergeRequest> {
        self.created.lock().unwrap().clone()
    }

    /// All branches `find_open_mr` was called with
    pub fn find_calls(&self) -> Vec<String> {
        self.find_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostingService for MockHosting {
    async fn find_open_mr(&self, source_branch: &str) -> Result<Option<MergeRequest>> {
        self.find_calls
            .lock()
            .unwrap()
            .push(source_branch.to_string());
        Ok(self.open_mrs.lock().unwrap().get(source_branch).cloned())
    }

    async fn create_mr(&self, request: &NewMergeRequest) -> Result<MergeRequest> {
        self.created.lock().unwrap().push(request.clone());
        if let Some(msg) = self.fail_create.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        let iid = self.next_iid.fetch_add(1, Ordering::SeqCst);
        Ok(MergeRequest {
            iid,
            web_url: format!("https://gitlab.example.com/demo/-/merge_requests/{iid}"),
            source_branch: request.source_branch.clone(),
            target_branch: request.target_branch.clone(),
            title: request.title.clone(),
            description: request.description.clone(),
            author_id: Some(1),
            created_at: None,
        })
    }

    async fn get_user(&self, id: u64) -> Result<HostUser> {
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::Platform(format!("user {id} not found")))
    }
}

/// Prompter answering from a fixed script
///
/// Exhausting the script is a test bug and fails loudly.
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<bool>>,
    reports: Mutex<Vec<String>>,
    questions: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    /// Prompter answering `answers` in order
    pub fn answering(answers: &[bool]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            reports: Mutex::new(Vec::new()),
            questions: Mutex::new(Vec::new()),
        }
    }

    /// Everything reported to the operator
    pub fn reports(&self) -> Vec<String> {
        self.reports.lock().unwrap().clone()
    }

    /// Every question asked, in order
    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn report(&self, message: &str) {
        self.reports.lock().unwrap().push(message.to_string());
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        self.questions.lock().unwrap().push(prompt.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::Prompt(format!("no scripted answer for: {prompt}")))
    }
}
