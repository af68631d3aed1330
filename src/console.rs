//! The console view-model.
//!
//! Owns the project list and the current selection, keeps them consistent
//! with the backend after every mutation, and turns failures into toasts.
//! The selection invariant: `current` is always a member of the most
//! recently fetched project list, or `None`.

use crate::api::AdminApi;
use crate::error::{ApiError, Result};
use crate::models::{
    AdminUser, Binding, CreateAdmin, CreateKey, KeyStats, LicenseKey, Project, ProjectInput,
};
use crate::session::SessionStore;
use crate::ui::{Modal, Toasts};

/// Scoped contents of the bindings modal: one key and its bindings.
#[derive(Debug, Clone)]
pub struct BindingsView {
    pub key: String,
    pub bindings: Vec<Binding>,
}

pub struct Console<A> {
    api: A,
    session: SessionStore,
    projects: Vec<Project>,
    current: Option<Project>,
    stats: KeyStats,
    pub toasts: Toasts,
    pub bindings_modal: Modal<BindingsView>,
    session_expired: bool,
}

impl<A: AdminApi> Console<A> {
    pub fn new(api: A, session: SessionStore) -> Self {
        Self {
            api,
            session,
            projects: Vec::new(),
            current: None,
            stats: KeyStats::default(),
            toasts: Toasts::new(),
            bindings_modal: Modal::Closed,
            session_expired: false,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn current_project(&self) -> Option<&Project> {
        self.current.as_ref()
    }

    /// Stats for the most recently loaded key list.
    pub fn stats(&self) -> KeyStats {
        self.stats
    }

    /// Set once any request comes back 401. The binary treats this as the
    /// end of the session.
    pub fn session_expired(&self) -> bool {
        self.session_expired
    }

    /// The delete-project control is hidden for the default project.
    pub fn can_delete_project(&self) -> bool {
        self.current.as_ref().is_some_and(|p| !p.is_default)
    }

    /// Record a failure as a toast. A 401 additionally clears the stored
    /// session, which is the only cross-cutting reaction to an error.
    fn fail(&mut self, err: ApiError) -> ApiError {
        if matches!(err, ApiError::Unauthorized) {
            self.session.clear();
            self.session_expired = true;
        }
        self.toasts.show(err.to_string());
        err
    }

    // --- Session ---

    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let result = self.api.login(username, password).await;
        match result {
            Ok(token) => {
                self.session.set_token(&token);
                self.session_expired = false;
                self.toasts.show("Logged in");
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub fn logout(&mut self) {
        self.session.clear();
        self.toasts.show("Logged out");
    }

    // --- Projects ---

    /// Fetch all projects, reconcile the selection, and reload keys for
    /// the resolved selection.
    pub async fn load_projects(&mut self) -> Result<Vec<LicenseKey>> {
        let fetched = self.api.list_projects().await;
        self.projects = match fetched {
            Ok(projects) => projects,
            Err(e) => return Err(self.fail(e)),
        };

        // Preserve the selection if it survived the reload, taking the
        // fresh copy (name or description may have changed). Otherwise
        // fall back to the first project.
        self.current = match self.current.take() {
            Some(prev) => self
                .projects
                .iter()
                .find(|p| p.id == prev.id)
                .or_else(|| self.projects.first())
                .cloned(),
            None => self.projects.first().cloned(),
        };

        self.load_keys().await
    }

    /// Switch the selection to a project from the cached list.
    pub async fn select_project(&mut self, id: i64) -> Result<Vec<LicenseKey>> {
        match self.projects.iter().find(|p| p.id == id) {
            Some(project) => {
                self.current = Some(project.clone());
                self.load_keys().await
            }
            None => {
                self.toasts.show("No such project");
                Ok(Vec::new())
            }
        }
    }

    /// Create (no id) or update (id) a project, then reload the list so
    /// the selection reconciles against server state.
    pub async fn save_project(&mut self, id: Option<i64>, input: ProjectInput) -> Result<()> {
        let result = match id {
            Some(id) => self.api.update_project(id, &input).await,
            None => self.api.create_project(&input).await,
        };
        match result {
            Ok(()) => {
                self.toasts.show(if id.is_some() {
                    "Project updated"
                } else {
                    "Project created"
                });
                self.load_projects().await?;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Delete the selected project. Blocked client-side for the default
    /// project before any confirmation or request.
    pub async fn delete_current_project(
        &mut self,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<()> {
        let Some(project) = &self.current else {
            return Ok(());
        };
        if project.is_default {
            self.toasts.show("The default project cannot be deleted");
            return Ok(());
        }
        let prompt = format!("Delete project \"{}\" and all of its keys?", project.name);
        if !confirm(&prompt) {
            return Ok(());
        }

        let id = project.id;
        let result = self.api.delete_project(id).await;
        match result {
            Ok(()) => {
                self.toasts.show("Project deleted");
                self.current = None;
                self.load_projects().await?;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    // --- Keys ---

    /// Fetch keys for the current selection and recompute stats. A no-op
    /// returning an empty list when nothing is selected.
    pub async fn load_keys(&mut self) -> Result<Vec<LicenseKey>> {
        let Some(project) = &self.current else {
            self.stats = KeyStats::default();
            return Ok(Vec::new());
        };
        let result = self.api.list_keys(project.id).await;
        match result {
            Ok(keys) => {
                self.stats = KeyStats::of(&keys);
                Ok(keys)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Create a key under the current project. Returns the created key
    /// value, or `None` when no project is selected.
    pub async fn create_key(
        &mut self,
        remarks: &str,
        custom_key: Option<String>,
    ) -> Result<Option<String>> {
        let Some(project) = &self.current else {
            self.toasts.show("Select a project first");
            return Ok(None);
        };
        let input = CreateKey {
            project_id: project.id,
            remarks: remarks.to_string(),
            custom_key,
        };
        let result = self.api.create_key(&input).await;
        match result {
            Ok(key) => {
                self.toasts.show("Key created");
                self.load_keys().await?;
                Ok(Some(key))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Flip a key's active flag with a single PUT, then reload.
    pub async fn toggle_key(&mut self, key: &LicenseKey) -> Result<()> {
        let scope = self.current.as_ref().map(|p| p.id);
        let result = self
            .api
            .set_key_status(&key.license_key, !key.is_active, scope)
            .await;
        match result {
            Ok(()) => {
                self.toasts.show(if key.is_active {
                    "Key disabled"
                } else {
                    "Key enabled"
                });
                self.load_keys().await?;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn delete_key(
        &mut self,
        key: &str,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<()> {
        if !confirm("Delete this key? Its machine bindings are removed with it.") {
            return Ok(());
        }
        let scope = self.current.as_ref().map(|p| p.id);
        let result = self.api.delete_key(key, scope).await;
        match result {
            Ok(()) => {
                self.toasts.show("Key deleted");
                self.load_keys().await?;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn update_remarks(&mut self, key: &str, remarks: &str) -> Result<()> {
        let scope = self.current.as_ref().map(|p| p.id);
        let result = self.api.update_key_remarks(key, remarks, scope).await;
        match result {
            Ok(()) => {
                self.toasts.show("Remarks updated");
                self.load_keys().await?;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    // --- Bindings ---

    /// Open the bindings modal for one key.
    pub async fn open_bindings(&mut self, key: &str) -> Result<()> {
        let result = self.api.list_bindings(key).await;
        match result {
            Ok(bindings) => {
                self.bindings_modal.open(BindingsView {
                    key: key.to_string(),
                    bindings,
                });
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Remove a binding, then reload the open modal's list and the key
    /// table so binding counts stay current.
    pub async fn unbind(
        &mut self,
        binding_id: i64,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<Vec<LicenseKey>> {
        let Some(view) = self.bindings_modal.value() else {
            return Ok(Vec::new());
        };
        let key = view.key.clone();
        if !confirm("Unbind this machine?") {
            return Ok(Vec::new());
        }

        let result = self.api.delete_binding(binding_id).await;
        match result {
            Ok(()) => {
                self.toasts.show("Machine unbound");
                let reloaded = self.api.list_bindings(&key).await;
                match reloaded {
                    Ok(bindings) => self.bindings_modal.open(BindingsView { key, bindings }),
                    Err(e) => return Err(self.fail(e)),
                }
                self.load_keys().await
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    // --- Admin accounts ---

    pub async fn load_admins(&mut self) -> Result<Vec<AdminUser>> {
        let result = self.api.list_admins().await;
        result.map_err(|e| self.fail(e))
    }

    pub async fn create_admin(&mut self, username: &str, password: &str) -> Result<()> {
        let input = CreateAdmin {
            username: username.to_string(),
            password: password.to_string(),
        };
        let result = self.api.create_admin(&input).await;
        match result {
            Ok(()) => {
                self.toasts.show("Admin created");
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn rename_admin(&mut self, username: &str, new_username: &str) -> Result<()> {
        let result = self.api.rename_admin(username, new_username).await;
        match result {
            Ok(()) => {
                self.toasts.show("Username updated");
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn change_password(&mut self, username: &str, new_password: &str) -> Result<()> {
        let result = self.api.change_password(username, new_password).await;
        match result {
            Ok(()) => {
                self.toasts.show("Password updated");
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn delete_admin(
        &mut self,
        username: &str,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<()> {
        if !confirm(&format!("Delete admin \"{username}\"?")) {
            return Ok(());
        }
        let result = self.api.delete_admin(username).await;
        match result {
            Ok(()) => {
                self.toasts.show("Admin deleted");
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }
}
