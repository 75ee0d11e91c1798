//! The role editing session: the control flow around the selection engine.
//!
//!   Catalog fetch → (edit) Role fetch → Hydrate → Toggles → Serialize → Submit
//!
//! Fetch failures never abort the session. They become retryable notices and
//! block submission until a retry succeeds. A failed role fetch in edit mode
//! is kept distinct from a role that simply has no grants: the selection
//! stays empty and submitting it would wipe the role, so submit refuses.

use std::sync::Arc;

use tracing::{debug, info, warn};

use rolekit_contracts::{
    catalog::{GroupId, PermissionCatalog, PermissionId},
    error::{RolekitError, RolekitResult},
    notice::{Notice, NoticeLevel},
    role::{RoleDraft, RoleId, RolePayload, RoleRecord},
    selection::SelectionState,
};
use rolekit_selection::{
    hydrate_role, project, EngineConfig, GroupView, HydrationReport, SelectionStore,
    Serialization, Serializer,
};

use crate::notice::NoticeBoard;
use crate::traits::{CatalogSource, RoleDirectory};

/// Whether the session creates a new role or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionMode {
    Create,
    Edit(RoleId),
}

/// Outcome of the one-shot role fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleLoad {
    /// Create mode; there is nothing to fetch.
    NotRequired,
    Loaded(RoleRecord),
    Failed { reason: String },
}

/// One operator's edit of one role.
///
/// Owns its selection exclusively. Dropping or closing the session discards
/// the selection; nothing is persisted until `submit` succeeds.
pub struct EditingSession {
    mode: SessionMode,
    config: EngineConfig,
    catalog_source: Box<dyn CatalogSource>,
    directory: Box<dyn RoleDirectory>,
    store: Option<SelectionStore>,
    catalog_error: Option<String>,
    role: RoleLoad,
    hydration: Option<HydrationReport>,
    notices: NoticeBoard,
    closed: bool,
}

impl EditingSession {
    /// Open a session for a new role.
    pub fn open_create(
        config: EngineConfig,
        catalog_source: Box<dyn CatalogSource>,
        directory: Box<dyn RoleDirectory>,
    ) -> Self {
        Self::open(SessionMode::Create, config, catalog_source, directory)
    }

    /// Open a session editing `role_id`.
    pub fn open_edit(
        role_id: RoleId,
        config: EngineConfig,
        catalog_source: Box<dyn CatalogSource>,
        directory: Box<dyn RoleDirectory>,
    ) -> Self {
        Self::open(SessionMode::Edit(role_id), config, catalog_source, directory)
    }

    /// Open a session and perform its one-shot fetches.
    pub fn open(
        mode: SessionMode,
        config: EngineConfig,
        catalog_source: Box<dyn CatalogSource>,
        directory: Box<dyn RoleDirectory>,
    ) -> Self {
        let role = match mode {
            SessionMode::Create => RoleLoad::NotRequired,
            SessionMode::Edit(_) => RoleLoad::Failed {
                reason: "not fetched yet".to_string(),
            },
        };

        let mut session = Self {
            mode,
            config,
            catalog_source,
            directory,
            store: None,
            catalog_error: None,
            role,
            hydration: None,
            notices: NoticeBoard::new(),
            closed: false,
        };

        info!(mode = ?session.mode, "editing session opened");

        // Failures are kept as notices and retried through `retry_*`.
        if let Err(e) = session.load_catalog() {
            debug!(error = %e, "session opened without a catalog");
        }
        if matches!(session.mode, SessionMode::Edit(_)) {
            if let Err(e) = session.load_role() {
                debug!(error = %e, "session opened without the edited role");
            }
        }
        session
    }

    // ── Fetches ──────────────────────────────────────────────────────────────

    fn load_catalog(&mut self) -> RolekitResult<()> {
        match self.catalog_source.list_permission_groups() {
            Ok(catalog) => {
                debug!(groups = catalog.groups().len(), "permission catalog loaded");
                self.catalog_error = None;
                self.store = Some(SelectionStore::new(Arc::new(catalog), &self.config));
                self.reseed();
                Ok(())
            }
            Err(e) => {
                let reason = e.to_string();
                warn!(reason = %reason, "permission catalog fetch failed");
                self.notices.raise(
                    Notice::new(
                        NoticeLevel::Error,
                        format!("Could not load permission groups: {}", reason),
                    )
                    .retryable(),
                );
                self.catalog_error = Some(reason.clone());
                Err(RolekitError::CatalogUnavailable { reason })
            }
        }
    }

    fn load_role(&mut self) -> RolekitResult<()> {
        let SessionMode::Edit(role_id) = &self.mode else {
            return Ok(());
        };
        let role_id = role_id.clone();

        match self.directory.fetch_role(&role_id) {
            Ok(record) => {
                debug!(role_id = %role_id, "role fetched for editing");
                self.role = RoleLoad::Loaded(record);
                self.reseed();
                Ok(())
            }
            Err(e) => {
                let reason = e.to_string();
                warn!(role_id = %role_id, reason = %reason, "role fetch failed");
                self.notices.raise(
                    Notice::new(
                        NoticeLevel::Error,
                        format!(
                            "Could not load the existing permissions of role '{}'; retry before saving: {}",
                            role_id, reason
                        ),
                    )
                    .retryable(),
                );
                self.role = RoleLoad::Failed {
                    reason: reason.clone(),
                };
                Err(RolekitError::RoleUnavailable {
                    role_id: role_id.0,
                    reason,
                })
            }
        }
    }

    /// Seed the selection from the fetched role once both fetches are in.
    fn reseed(&mut self) {
        let (catalog, state, report) = match (&self.store, &self.role) {
            (Some(store), RoleLoad::Loaded(record)) => {
                let catalog = store.shared_catalog();
                let (state, report) = hydrate_role(record, &catalog);
                (catalog, state, report)
            }
            _ => return,
        };

        if !report.is_clean() {
            self.notices.warning(format!(
                "Role references {} group(s) and {} permission(s) that no longer exist",
                report.orphan_groups.len(),
                report.orphan_permissions.len()
            ));
        }
        self.store = Some(SelectionStore::with_state(catalog, state, &self.config));
        self.hydration = Some(report);
    }

    /// Retry a failed catalog fetch. A no-op if the catalog is already loaded.
    pub fn retry_catalog(&mut self) -> RolekitResult<()> {
        self.ensure_open()?;
        if self.store.is_some() {
            return Ok(());
        }
        self.load_catalog()
    }

    /// Retry a failed role fetch (edit mode).
    ///
    /// On success the selection is replaced by the hydrated role.
    pub fn retry_role(&mut self) -> RolekitResult<()> {
        self.ensure_open()?;
        if !matches!(self.role, RoleLoad::Failed { .. }) {
            return Ok(());
        }
        self.load_role()
    }

    // ── Selection ────────────────────────────────────────────────────────────

    pub fn toggle_group(&mut self, group: &GroupId, on: bool) -> RolekitResult<()> {
        self.store_mut()?.toggle_group(group, on)
    }

    pub fn toggle_permission(&mut self, permission: &PermissionId, on: bool) -> RolekitResult<()> {
        self.store_mut()?.toggle_permission(permission, on)
    }

    pub fn select_all_in_group(&mut self, group: &GroupId) -> RolekitResult<()> {
        self.store_mut()?.select_all_in_group(group)
    }

    pub fn deselect_all_in_group(&mut self, group: &GroupId) -> RolekitResult<()> {
        self.store_mut()?.deselect_all_in_group(group)
    }

    /// Group views for rendering. Empty while the catalog is unavailable.
    pub fn groups(&self) -> RolekitResult<Vec<GroupView>> {
        self.ensure_open()?;
        Ok(self.store.as_ref().map(project).unwrap_or_default())
    }

    /// Serialize the current selection without submitting it.
    pub fn preview(&self) -> RolekitResult<Serialization> {
        let store = self.store()?;
        Serializer::new(self.config.clone()).serialize(store.catalog(), store.state())
    }

    pub fn state(&self) -> Option<&SelectionState> {
        self.store.as_ref().map(SelectionStore::state)
    }

    pub fn catalog(&self) -> Option<&PermissionCatalog> {
        self.store.as_ref().map(SelectionStore::catalog)
    }

    // ── Submission ───────────────────────────────────────────────────────────

    /// Why submission is currently refused, if it is.
    pub fn submission_blocker(&self) -> Option<String> {
        if self.closed {
            return Some("session is closed".to_string());
        }
        if let Some(reason) = &self.catalog_error {
            return Some(format!("permission groups are not loaded: {}", reason));
        }
        if let RoleLoad::Failed { reason } = &self.role {
            return Some(format!("existing role permissions are not loaded: {}", reason));
        }
        None
    }

    /// Validate `draft`, serialize a snapshot of the selection, and send it
    /// to the role directory.
    ///
    /// Closes the session on success. On a directory failure the session
    /// stays open so the operator can retry.
    pub fn submit(&mut self, draft: RoleDraft) -> RolekitResult<RoleRecord> {
        self.ensure_open()?;
        if let Some(reason) = self.submission_blocker() {
            return Err(RolekitError::SubmissionBlocked { reason });
        }

        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(RolekitError::InvalidRole {
                reason: "role name must not be empty".to_string(),
            });
        }
        let draft = RoleDraft {
            name,
            description: draft.description.trim().to_string(),
            scope_level: draft.scope_level,
        };

        let store = self.store()?;
        let snapshot = store.snapshot();
        let Serialization { payload, report } =
            Serializer::new(self.config.clone()).serialize(store.catalog(), &snapshot)?;
        let payload = RolePayload::new(draft, payload);

        let result = match &self.mode {
            SessionMode::Create => self.directory.create_role(&payload),
            SessionMode::Edit(role_id) => self.directory.update_role(role_id, &payload),
        };

        match result {
            Ok(record) => {
                info!(
                    role_id = %record.id,
                    mode = ?self.mode,
                    groups = payload.selection.permission_group.as_ref().map_or(0, Vec::len),
                    permissions = payload.selection.permissions.as_ref().map_or(0, Vec::len),
                    "role submitted"
                );
                if !report.empty_groups.is_empty() {
                    self.notices.warning(format!(
                        "{} selected group(s) were saved without any permission checked",
                        report.empty_groups.len()
                    ));
                }
                self.notices.success(format!("Role '{}' saved", record.name));
                self.close();
                Ok(record)
            }
            Err(e) => {
                warn!(mode = ?self.mode, error = %e, "role submission failed");
                self.notices.error(format!("Could not save role: {}", e));
                Err(e)
            }
        }
    }

    /// Discard the selection. Every later call returns `SessionClosed`.
    pub fn close(&mut self) {
        if !self.closed {
            debug!(mode = ?self.mode, "editing session closed");
        }
        self.closed = true;
        self.store = None;
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    pub fn role(&self) -> &RoleLoad {
        &self.role
    }

    /// Orphan ids found when the role was hydrated.
    pub fn hydration(&self) -> Option<&HydrationReport> {
        self.hydration.as_ref()
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut NoticeBoard {
        &mut self.notices
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> RolekitResult<()> {
        if self.closed {
            Err(RolekitError::SessionClosed)
        } else {
            Ok(())
        }
    }

    fn store(&self) -> RolekitResult<&SelectionStore> {
        self.ensure_open()?;
        self.store.as_ref().ok_or_else(|| RolekitError::CatalogUnavailable {
            reason: self
                .catalog_error
                .clone()
                .unwrap_or_else(|| "catalog not loaded".to_string()),
        })
    }

    fn store_mut(&mut self) -> RolekitResult<&mut SelectionStore> {
        self.ensure_open()?;
        let reason = self.catalog_error.clone();
        self.store.as_mut().ok_or_else(|| RolekitError::CatalogUnavailable {
            reason: reason.unwrap_or_else(|| "catalog not loaded".to_string()),
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rolekit_contracts::{
        catalog::{GroupId, PermissionCatalog, PermissionGroup, PermissionId},
        error::{RolekitError, RolekitResult},
        notice::NoticeLevel,
        role::{GroupRef, PermissionRef, RoleDraft, RoleId, RolePayload, RoleRecord, ScopeLevel},
    };
    use rolekit_selection::{EngineConfig, TriState};

    use crate::traits::{CatalogSource, RoleDirectory};

    use super::{EditingSession, RoleLoad};

    // ── Mock helpers ─────────────────────────────────────────────────────────

    fn catalog() -> PermissionCatalog {
        PermissionCatalog::new(vec![
            PermissionGroup::new("A", "Members", "", &[("p1", "view"), ("p2", "edit")]),
            PermissionGroup::new("B", "Finance", "", &[("p3", "view")]),
        ])
        .unwrap()
    }

    /// A catalog source that fails a fixed number of times before succeeding.
    struct FlakyCatalog {
        failures_left: Mutex<u32>,
    }

    impl FlakyCatalog {
        fn failing(times: u32) -> Self {
            Self {
                failures_left: Mutex::new(times),
            }
        }
    }

    impl CatalogSource for FlakyCatalog {
        fn list_permission_groups(&self) -> RolekitResult<PermissionCatalog> {
            let mut left = self.failures_left.lock().unwrap();
            if *left > 0 {
                *left -= 1;
                return Err(RolekitError::CatalogUnavailable {
                    reason: "gateway timeout".to_string(),
                });
            }
            Ok(catalog())
        }
    }

    /// A directory holding one fetchable role and recording every write.
    #[derive(Default)]
    struct RecordingDirectory {
        role: Option<RoleRecord>,
        fetch_failures_left: Mutex<u32>,
        fail_writes: bool,
        writes: Mutex<Vec<(Option<RoleId>, RolePayload)>>,
    }

    impl RecordingDirectory {
        fn stored(&self, id: RoleId, payload: &RolePayload) -> RoleRecord {
            RoleRecord {
                id,
                name: payload.name.clone(),
                description: payload.description.clone(),
                scope_level: payload.scope_level,
                permission_groups: vec![],
                permissions: vec![],
            }
        }
    }

    impl RoleDirectory for RecordingDirectory {
        fn fetch_role(&self, id: &RoleId) -> RolekitResult<RoleRecord> {
            let mut left = self.fetch_failures_left.lock().unwrap();
            if *left > 0 {
                *left -= 1;
                return Err(RolekitError::DirectoryFailed {
                    reason: "connection reset".to_string(),
                });
            }
            self.role
                .clone()
                .filter(|r| &r.id == id)
                .ok_or_else(|| RolekitError::RoleNotFound { role_id: id.0.clone() })
        }

        fn create_role(&self, payload: &RolePayload) -> RolekitResult<RoleRecord> {
            if self.fail_writes {
                return Err(RolekitError::DirectoryFailed {
                    reason: "503".to_string(),
                });
            }
            self.writes.lock().unwrap().push((None, payload.clone()));
            Ok(self.stored(RoleId::new("new-role"), payload))
        }

        fn update_role(&self, id: &RoleId, payload: &RolePayload) -> RolekitResult<RoleRecord> {
            if self.fail_writes {
                return Err(RolekitError::DirectoryFailed {
                    reason: "503".to_string(),
                });
            }
            self.writes.lock().unwrap().push((Some(id.clone()), payload.clone()));
            Ok(self.stored(id.clone(), payload))
        }
    }

    fn existing_role() -> RoleRecord {
        let members = GroupRef {
            id: GroupId::new("A"),
            name: "Members".to_string(),
        };
        RoleRecord {
            id: RoleId::new("r-1"),
            name: "Usher".to_string(),
            description: String::new(),
            scope_level: ScopeLevel::Branch,
            permission_groups: vec![members.clone()],
            permissions: vec![PermissionRef {
                id: PermissionId::new("p2"),
                name: "edit".to_string(),
                group: members,
            }],
        }
    }

    fn draft(name: &str) -> RoleDraft {
        RoleDraft {
            name: name.to_string(),
            description: " greets visitors ".to_string(),
            scope_level: ScopeLevel::Branch,
        }
    }

    fn create_session(
        catalog_failures: u32,
        directory: Arc<RecordingDirectory>,
    ) -> EditingSession {
        EditingSession::open_create(
            EngineConfig::default(),
            Box::new(FlakyCatalog::failing(catalog_failures)),
            Box::new(directory),
        )
    }

    // ── Create flow ──────────────────────────────────────────────────────────

    #[test]
    fn create_submits_minimal_payload_and_closes() {
        let directory = Arc::new(RecordingDirectory::default());
        let mut session = create_session(0, Arc::clone(&directory));

        session.toggle_group(&GroupId::new("A"), true).unwrap();
        session.toggle_permission(&PermissionId::new("p1"), false).unwrap();

        let record = session.submit(draft("  Usher ")).unwrap();
        assert_eq!(record.name, "Usher");
        assert!(session.is_closed());

        let writes = directory.writes.lock().unwrap();
        let (id, payload) = &writes[0];
        assert!(id.is_none());
        assert_eq!(payload.description, "greets visitors");
        assert_eq!(
            payload.selection.permission_group,
            Some(vec![GroupId::new("A")])
        );
        assert_eq!(
            payload.selection.permissions,
            Some(vec![PermissionId::new("p2")])
        );
    }

    #[test]
    fn blank_name_is_rejected_before_directory_call() {
        let directory = Arc::new(RecordingDirectory::default());
        let mut session = create_session(0, Arc::clone(&directory));

        assert!(matches!(
            session.submit(draft("   ")),
            Err(RolekitError::InvalidRole { .. })
        ));
        assert!(directory.writes.lock().unwrap().is_empty());
        assert!(!session.is_closed());
    }

    #[test]
    fn directory_failure_keeps_session_open() {
        let directory = Arc::new(RecordingDirectory {
            fail_writes: true,
            ..RecordingDirectory::default()
        });
        let mut session = create_session(0, directory);
        session.toggle_group(&GroupId::new("B"), true).unwrap();

        assert!(matches!(
            session.submit(draft("Treasurer")),
            Err(RolekitError::DirectoryFailed { .. })
        ));
        assert!(!session.is_closed());
        assert_eq!(session.notices().latest().unwrap().level, NoticeLevel::Error);
        assert!(session.state().unwrap().is_selected(&GroupId::new("B")));
    }

    // ── Catalog failure ──────────────────────────────────────────────────────

    #[test]
    fn catalog_failure_renders_empty_and_blocks_submit() {
        let mut session = create_session(1, Arc::new(RecordingDirectory::default()));

        assert!(session.groups().unwrap().is_empty());
        assert!(session.notices().latest().unwrap().retryable);
        assert!(matches!(
            session.toggle_group(&GroupId::new("A"), true),
            Err(RolekitError::CatalogUnavailable { .. })
        ));
        assert!(matches!(
            session.submit(draft("Usher")),
            Err(RolekitError::SubmissionBlocked { .. })
        ));

        session.retry_catalog().unwrap();
        assert_eq!(session.groups().unwrap().len(), 2);
        assert!(session.submission_blocker().is_none());
    }

    // ── Edit flow ────────────────────────────────────────────────────────────

    #[test]
    fn edit_hydrates_and_updates_role() {
        let directory = Arc::new(RecordingDirectory {
            role: Some(existing_role()),
            ..RecordingDirectory::default()
        });
        let mut session = EditingSession::open_edit(
            RoleId::new("r-1"),
            EngineConfig::default(),
            Box::new(FlakyCatalog::failing(0)),
            Box::new(Arc::clone(&directory)),
        );

        assert!(matches!(session.role(), RoleLoad::Loaded(_)));
        let groups = session.groups().unwrap();
        assert_eq!(groups[0].display, TriState::Checked);
        assert_eq!(groups[0].checked_count, 1);

        session.toggle_permission(&PermissionId::new("p1"), true).unwrap();
        session.submit(draft("Usher")).unwrap();

        let writes = directory.writes.lock().unwrap();
        let (id, payload) = &writes[0];
        assert_eq!(id.as_ref(), Some(&RoleId::new("r-1")));
        assert_eq!(payload.selection.permissions, None);
    }

    #[test]
    fn role_fetch_failure_is_distinct_from_empty_role() {
        let directory = Arc::new(RecordingDirectory {
            role: Some(existing_role()),
            fetch_failures_left: Mutex::new(1),
            ..RecordingDirectory::default()
        });
        let mut session = EditingSession::open_edit(
            RoleId::new("r-1"),
            EngineConfig::default(),
            Box::new(FlakyCatalog::failing(0)),
            Box::new(Arc::clone(&directory)),
        );

        assert!(matches!(session.role(), RoleLoad::Failed { .. }));
        assert!(session.state().unwrap().is_empty());
        let notice = session.notices().latest().unwrap();
        assert!(notice.retryable);
        assert!(notice.message.contains("r-1"));
        assert!(matches!(
            session.submit(draft("Usher")),
            Err(RolekitError::SubmissionBlocked { .. })
        ));

        session.retry_role().unwrap();
        assert!(session
            .state()
            .unwrap()
            .is_checked(&PermissionId::new("p2")));
        assert!(session.submission_blocker().is_none());
    }

    #[test]
    fn edit_with_orphans_warns_and_reports() {
        let mut role = existing_role();
        role.permission_groups.push(GroupRef {
            id: GroupId::new("retired"),
            name: "Retired".to_string(),
        });
        let directory = Arc::new(RecordingDirectory {
            role: Some(role),
            ..RecordingDirectory::default()
        });
        let session = EditingSession::open_edit(
            RoleId::new("r-1"),
            EngineConfig::default(),
            Box::new(FlakyCatalog::failing(0)),
            Box::new(directory),
        );

        let report = session.hydration().unwrap();
        assert_eq!(report.orphan_groups, vec![GroupId::new("retired")]);
        assert_eq!(session.notices().latest().unwrap().level, NoticeLevel::Warning);
        assert!(session.groups().unwrap().last().unwrap().orphan);
    }

    // ── Close ────────────────────────────────────────────────────────────────

    #[test]
    fn closed_session_rejects_everything() {
        let mut session = create_session(0, Arc::new(RecordingDirectory::default()));
        session.toggle_group(&GroupId::new("A"), true).unwrap();
        session.close();

        assert!(session.state().is_none());
        assert!(matches!(session.groups(), Err(RolekitError::SessionClosed)));
        assert!(matches!(
            session.toggle_group(&GroupId::new("A"), false),
            Err(RolekitError::SessionClosed)
        ));
        assert!(matches!(session.retry_catalog(), Err(RolekitError::SessionClosed)));
        assert!(matches!(
            session.submit(draft("Usher")),
            Err(RolekitError::SessionClosed)
        ));
    }
}
