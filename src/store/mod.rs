//! Record store client.
//!
//! [`UserStore`] owns the ordered collection of [`UserRecord`]s and is the
//! only thing that mutates it. In remote mode every mutation is confirmed by
//! the remote collection before the local collection changes; in local-only
//! modes mutations stay in memory.
//!
//! Each operation either fully applies to the collection or leaves it as it
//! was. Operations take `&mut self`, so one store serves one caller at a time.

pub mod ids;

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::Config;
use crate::constants::DEFAULT_TIMEOUT_SECS;
use crate::error::{FetchCause, FetchError, Operation, StoreError};
use crate::models::{Gender, StoreMode, UserDraft, UserId, UserRecord};
use crate::remote::{ClientError, HttpUserApi, UserApi};

use ids::IdSource;

/// Where mutations go.
#[derive(Clone)]
pub enum Backend {
    /// Mutations are mirrored to the remote collection.
    Remote(Arc<dyn UserApi>),
    /// Mutations stay in memory. `source`, if any, is only used by `refresh`.
    Local { source: Option<Arc<dyn UserApi>> },
}

/// Tunables for a [`UserStore`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Upper bound on each remote call.
    pub timeout: Duration,
    /// Gender assumed for fetched records that carry none.
    pub default_gender: Gender,
    /// Reject drafts with blank required fields.
    pub validate: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_gender: Gender::Male,
            validate: true,
        }
    }
}

/// The owned, ordered user collection.
pub struct UserStore {
    users: Vec<UserRecord>,
    backend: Backend,
    options: StoreOptions,
    ids: IdSource,
}

impl UserStore {
    pub fn new(backend: Backend, options: StoreOptions) -> Self {
        Self {
            users: Vec::new(),
            backend,
            options,
            ids: IdSource::new(),
        }
    }

    /// Store that mirrors every mutation to `api`.
    pub fn remote(api: Arc<dyn UserApi>) -> Self {
        Self::new(Backend::Remote(api), StoreOptions::default())
    }

    /// Store that lists from `api` but keeps mutations in memory.
    pub fn local_with_source(api: Arc<dyn UserApi>) -> Self {
        Self::new(
            Backend::Local { source: Some(api) },
            StoreOptions::default(),
        )
    }

    /// Store with no remote at all.
    pub fn local() -> Self {
        Self::new(Backend::Local { source: None }, StoreOptions::default())
    }

    /// Build a store for the configured mode, talking HTTP to the configured base URL.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let options = StoreOptions {
            timeout: config.remote.timeout(),
            default_gender: config.records.default_gender,
            validate: config.records.validate,
        };

        let backend = match config.remote.mode {
            StoreMode::Offline => Backend::Local { source: None },
            mode => {
                let api: Arc<dyn UserApi> =
                    Arc::new(HttpUserApi::new(&config.remote.base_url, options.timeout)?);
                if mode == StoreMode::Remote {
                    Backend::Remote(api)
                } else {
                    Backend::Local { source: Some(api) }
                }
            }
        };

        Ok(Self::new(backend, options))
    }

    /// Replace the options, keeping the collection.
    pub fn with_options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    /// Seed the collection, e.g. from a previous listing.
    ///
    /// Later records whose id already appeared are dropped.
    pub fn with_records(mut self, records: impl IntoIterator<Item = UserRecord>) -> Self {
        let mut seen = HashSet::new();
        self.users = records
            .into_iter()
            .filter(|r| seen.insert(r.id.clone()))
            .collect();
        self
    }

    /// The operating mode implied by the backend.
    pub fn mode(&self) -> StoreMode {
        match &self.backend {
            Backend::Remote(_) => StoreMode::Remote,
            Backend::Local { source: Some(_) } => StoreMode::Local,
            Backend::Local { source: None } => StoreMode::Offline,
        }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// The collection in display order: newest creations first, otherwise
    /// the order of the last refresh.
    pub fn list(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn get(&self, id: &UserId) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.id.matches(id))
    }

    pub fn contains(&self, id: &UserId) -> bool {
        self.get(id).is_some()
    }

    /// A detached draft of the record with `id`, for editing.
    pub fn edit(&self, id: &UserId) -> Result<UserDraft, StoreError> {
        self.get(id)
            .map(UserRecord::to_draft)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Replace the collection with the remote listing.
    ///
    /// Without a remote source this returns the collection unchanged. On
    /// failure the collection is untouched.
    pub async fn refresh(&mut self) -> Result<&[UserRecord], StoreError> {
        let Some(api) = self.source() else {
            debug!("no remote source; keeping local collection");
            return Ok(&self.users);
        };

        let fetched = bounded(self.options.timeout, Operation::List, api.list()).await?;

        let fallback = self.options.default_gender;
        let users: Vec<UserRecord> = fetched
            .into_iter()
            .map(|u| u.into_record(fallback))
            .collect();

        if let Some(dup) = first_duplicate(&users) {
            return Err(FetchError::new(
                Operation::List,
                FetchCause::Decode(format!("duplicate id {dup} in listing")),
            )
            .into());
        }

        debug!(count = users.len(), "refreshed collection");
        self.users = users;
        Ok(&self.users)
    }

    /// Create a record from `draft` and prepend it.
    pub async fn create(&mut self, draft: UserDraft) -> Result<UserRecord, StoreError> {
        self.check(&draft)?;

        let record = match self.remote_api() {
            Some(api) => {
                let created =
                    bounded(self.options.timeout, Operation::Create, api.create(&draft)).await?;
                if self.contains(&created.id) {
                    return Err(
                        FetchError::new(Operation::Create, FetchCause::DuplicateId(created.id))
                            .into(),
                    );
                }
                created.into_record(draft.gender)
            }
            None => {
                let users = &self.users;
                let id = self.ids.next(|id| users.iter().any(|u| &u.id == id));
                draft.into_record(id)
            }
        };

        debug!(id = %record.id, "created user");
        self.users.insert(0, record.clone());
        Ok(record)
    }

    /// Commit `draft` as the new content of the record with `id`.
    ///
    /// The record keeps its stored id and its position.
    pub async fn update(&mut self, id: &UserId, draft: UserDraft) -> Result<UserRecord, StoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        self.check(&draft)?;
        let stored = self.users[index].id.clone();
        let id = &stored;

        let record = match self.remote_api() {
            Some(api) => {
                let outgoing = draft.clone().into_record(id.clone());
                let returned =
                    bounded(self.options.timeout, Operation::Update, api.update(&outgoing))
                        .await?;
                if !returned.id.matches(id) {
                    debug!(requested = %id, returned = %returned.id, "server echoed a different id");
                }
                let mut record = returned.into_record(draft.gender);
                record.id = id.clone();
                record
            }
            None => draft.into_record(id.clone()),
        };

        debug!(%id, "updated user");
        self.users[index] = record.clone();
        Ok(record)
    }

    /// Remove the record with `id`.
    ///
    /// In remote mode the record is removed only once the remote collection
    /// confirms; a remote 404 counts as confirmation.
    pub async fn delete(&mut self, id: &UserId) -> Result<(), StoreError> {
        let index = self
            .position(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let stored = self.users[index].id.clone();
        let id = &stored;

        if let Some(api) = self.remote_api() {
            match bounded(self.options.timeout, Operation::Delete, api.delete(id)).await {
                Ok(()) => {}
                Err(FetchError {
                    cause: FetchCause::Status { code: 404, .. },
                    ..
                }) => debug!(%id, "remote already had no such user"),
                Err(e) => return Err(e.into()),
            }
        }

        self.users.remove(index);
        debug!(%id, "deleted user");
        Ok(())
    }

    fn check(&self, draft: &UserDraft) -> Result<(), StoreError> {
        if !self.options.validate {
            return Ok(());
        }
        let fields = draft.missing_required();
        if fields.is_empty() {
            Ok(())
        } else {
            Err(StoreError::ValidationFailed { fields })
        }
    }

    fn position(&self, id: &UserId) -> Option<usize> {
        self.users.iter().position(|u| u.id.matches(id))
    }

    fn remote_api(&self) -> Option<Arc<dyn UserApi>> {
        match &self.backend {
            Backend::Remote(api) => Some(Arc::clone(api)),
            Backend::Local { .. } => None,
        }
    }

    fn source(&self) -> Option<Arc<dyn UserApi>> {
        match &self.backend {
            Backend::Remote(api) => Some(Arc::clone(api)),
            Backend::Local { source } => source.clone(),
        }
    }
}

/// Run a remote call under `timeout`.
async fn bounded<T>(
    timeout: Duration,
    operation: Operation,
    call: impl Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::new(operation, FetchCause::Timeout(timeout))),
    }
}

fn first_duplicate(users: &[UserRecord]) -> Option<&UserId> {
    let mut seen = HashSet::new();
    users.iter().map(|u| &u.id).find(|id| !seen.insert(*id))
}
