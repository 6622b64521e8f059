use tracing::{info, instrument};

use crate::entities::project::{DESCRIPTION_MAX, ProjectFields, TITLE_MAX, URL_MAX};
use crate::entities::{Project, ProjectStatus, next_id, truncate};
use crate::error::{ContentError, StoreError};
use crate::store::Store;

#[derive(Clone, Debug)]
pub struct ProjectService {
    store: Store<Project>,
}

impl ProjectService {
    pub fn new(store: Store<Project>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store<Project> {
        &self.store
    }

    /// Storage order. Callers sort by `order` for display.
    pub async fn list(&self) -> Vec<Project> {
        self.store.load().await
    }

    pub async fn get(&self, id: u64) -> Option<Project> {
        self.store.load().await.into_iter().find(|p| p.id == id)
    }

    #[instrument(skip_all)]
    pub async fn create(&self, fields: ProjectFields) -> Result<Project, StoreError> {
        let mut projects = self.store.load().await;
        let mut project = Project {
            id: next_id(&projects),
            title: String::new(),
            description: String::new(),
            url: String::new(),
            status: ProjectStatus::default(),
            order: 0,
        };
        apply(&mut project, fields);
        projects.push(project.clone());
        self.store.save(&projects).await?;
        info!(id = project.id, "project created");
        Ok(project)
    }

    #[instrument(skip(self, fields))]
    pub async fn update(&self, id: u64, fields: ProjectFields) -> Result<Project, ContentError> {
        let mut projects = self.store.load().await;
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(ContentError::NotFound { kind: "project", id })?;
        apply(project, fields);
        let updated = project.clone();
        self.store.save(&projects).await?;
        info!("project updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<(), ContentError> {
        let mut projects = self.store.load().await;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        if projects.len() == before {
            return Err(ContentError::NotFound { kind: "project", id });
        }
        self.store.save(&projects).await?;
        info!("project deleted");
        Ok(())
    }
}

fn apply(project: &mut Project, fields: ProjectFields) {
    project.title = truncate(&fields.title, TITLE_MAX);
    project.description = truncate(&fields.description, DESCRIPTION_MAX);
    project.url = truncate(fields.url.trim(), URL_MAX);
    project.status = fields.status;
    project.order = fields.order;
}
