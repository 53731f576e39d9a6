use std::sync::Arc;

use chrono::Datelike;
use tracing::{debug, error, info, warn};

use crate::api::CatalogApi;
use crate::error::AppError;
use crate::events::{Refresh, RefreshReceiver, RefreshSender, refresh_channel};
use crate::instances::editor::InstanceEditor;
use crate::instances::filter::{FetchScope, FilterOutcome, FilterState};
use crate::models::{Course, InstanceId, InstanceView};
use crate::notice::{Notice, Notices};
use crate::validation::{self, FilterInput};

/// Instance list, its filter state machine, editor and delete flow.
pub struct InstancesPage {
    api: Arc<dyn CatalogApi>,
    instances: Vec<InstanceView>,
    courses: Vec<Course>,
    filter: FilterState,
    fields: FilterInput,
    loading: bool,
    error: Option<String>,
    details: Option<InstanceView>,
    editor: InstanceEditor,
    notices: Notices,
    refresh_tx: RefreshSender,
    refresh_rx: RefreshReceiver,
}

impl InstancesPage {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        let (refresh_tx, refresh_rx) = refresh_channel();
        Self {
            api,
            instances: Vec::new(),
            courses: Vec::new(),
            filter: FilterState::default(),
            fields: FilterInput::default(),
            loading: false,
            error: None,
            details: None,
            editor: InstanceEditor::new(refresh_tx.clone()),
            notices: Notices::default(),
            refresh_tx,
            refresh_rx,
        }
    }

    /// Fetches with the current scope. On failure the previous list is kept.
    pub async fn load(&mut self) -> Result<(), AppError> {
        let scope = self.filter.scope();
        self.loading = true;
        self.error = None;
        let result = match scope {
            FetchScope::Scoped { year, semester } => {
                self.api.list_instances_by_period(year, semester).await
            }
            FetchScope::Unscoped => self.api.list_instances().await,
        };
        self.loading = false;

        match result {
            Ok(instances) => {
                info!("loaded {} instances ({:?})", instances.len(), scope);
                self.instances = instances;
                Ok(())
            }
            Err(e) => {
                error!("failed to load instances: {}", e);
                let message = format!("Failed to load instances: {}", e);
                self.notices.push(Notice::error("Error", message.clone()));
                self.error = Some(message);
                Err(e)
            }
        }
    }

    /// Loads the course list offered by the instance form.
    pub async fn load_courses(&mut self) -> Result<(), AppError> {
        match self.api.list_courses().await {
            Ok(courses) => {
                self.courses = courses;
                Ok(())
            }
            Err(e) => {
                self.notices.push(Notice::error(
                    "Error",
                    format!("Failed to load courses for form: {}", e),
                ));
                Err(e)
            }
        }
    }

    pub fn instances(&self) -> &[InstanceView] {
        &self.instances
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn filter_state(&self) -> FilterState {
        self.filter
    }

    pub fn scope(&self) -> FetchScope {
        self.filter.scope()
    }

    /// The filter fields as the user last entered them.
    pub fn filter_fields(&self) -> &FilterInput {
        &self.fields
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Applies entered filter values. Only a complete year+semester pair changes
    /// the scope and triggers a fetch.
    pub async fn apply_filter(&mut self, input: FilterInput) -> Result<FilterOutcome, AppError> {
        let filter = validation::validate_filter(&input);
        self.fields = input;
        let filter = filter?;

        let outcome = self.filter.apply(filter);
        match outcome {
            FilterOutcome::Applied(scope) => {
                debug!("filter applied: {:?}", scope);
                self.load().await?;
            }
            FilterOutcome::Ignored => {
                debug!("incomplete filter ignored: {:?}", filter);
            }
        }
        Ok(outcome)
    }

    /// Back to the unscoped listing, with the filter fields emptied.
    pub async fn clear_filters(&mut self) -> Result<(), AppError> {
        self.filter.clear();
        self.fields = FilterInput::default();
        self.load().await
    }

    pub fn editor(&self) -> &InstanceEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut InstanceEditor {
        &mut self.editor
    }

    pub fn open_create(&mut self) -> Result<(), AppError> {
        let current_year = chrono::Local::now().year();
        let result = self
            .editor
            .open_create(self.courses.clone(), self.filter.scope(), current_year);
        if let Err(e) = &result {
            self.notices.push(Notice::error("Cannot Add Instance", e.to_string()));
        }
        result
    }

    pub fn open_edit(&mut self, id: InstanceId) -> Result<(), AppError> {
        let instance = self.find(id).cloned().ok_or(AppError::NotLoaded(id))?;
        self.editor.open_edit(instance, self.courses.clone());
        Ok(())
    }

    pub async fn submit_editor(&mut self) -> Result<InstanceView, AppError> {
        let api = Arc::clone(&self.api);
        let result = self.editor.submit(api.as_ref()).await;
        for notice in self.editor.take_notices() {
            self.notices.push(notice);
        }
        self.process_refreshes().await;
        result
    }

    pub fn find(&self, id: InstanceId) -> Option<&InstanceView> {
        self.instances.iter().find(|i| i.id == id)
    }

    pub async fn delete(&mut self, id: InstanceId) -> Result<(), AppError> {
        let instance = self.find(id).cloned().ok_or(AppError::NotLoaded(id))?;

        match self
            .api
            .delete_instance(instance.year, instance.semester, instance.id)
            .await
        {
            Ok(()) => {
                info!("instance {} deleted", id);
                self.notices.push(Notice::success("Instance deleted successfully."));
                self.refresh_tx.request(Refresh::Instances);
                self.process_refreshes().await;
                Ok(())
            }
            Err(e) => {
                warn!("failed to delete instance {}: {}", id, e);
                self.notices.push(Notice::error(
                    "Error",
                    format!("Failed to delete instance: {}", e),
                ));
                Err(e)
            }
        }
    }

    pub async fn fetch_details(
        &mut self,
        year: i32,
        semester: i32,
        id: InstanceId,
    ) -> Result<Option<&InstanceView>, AppError> {
        match self.api.get_instance(year, semester, id).await {
            Ok(instance) => {
                self.details = instance;
                Ok(self.details.as_ref())
            }
            Err(e) => {
                self.details = None;
                self.notices.push(Notice::error(
                    "Error",
                    format!("Failed to fetch instance details: {}", e),
                ));
                Err(e)
            }
        }
    }

    pub fn details(&self) -> Option<&InstanceView> {
        self.details.as_ref()
    }

    pub fn close_details(&mut self) {
        self.details = None;
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// One fetch per queued request, always with the scope active at that moment.
    pub async fn process_refreshes(&mut self) -> usize {
        let mut fetches = 0;
        while let Some(refresh) = self.refresh_rx.try_next() {
            if refresh != Refresh::Instances {
                continue;
            }
            fetches += 1;
            // load() records its own failure
            let _ = self.load().await;
        }
        fetches
    }
}
