use crate::config::ImportConfig;
use crate::import::chunk::next_chunk;
use crate::import::document::Document;
use crate::import::error::ImportError;
use crate::import::retry::execute_with_retry;
use crate::store::{Collection, DocumentStore, IndexingPolicy, StoreError, StoredProcedure};

/// Well-known id of the server-side batch-insert procedure.
pub const BULK_INSERT_SPROC_ID: &str = "BulkInsertSprocV1";

/// Packaged procedure body, registered on first use of a collection.
const BULK_INSERT_SPROC_BODY: &str = include_str!("../../resources/bulk_insert_sproc.js");

/// Counters for one import run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportStats {
    pub documents: usize,
    pub chunks: usize,
    pub generated_ids: usize,
}

/// Drives one worker's documents into the store.
///
/// A single importer is sequential: one remote call in flight at a time, one
/// cursor over the input. Several importers may target the same collection
/// concurrently; resource resolution tolerates create races by treating a
/// conflict as "someone else won" and re-fetching.
pub struct BulkImporter<S> {
    store: S,
    config: ImportConfig,
}

impl<S: DocumentStore> BulkImporter<S> {
    pub fn new(store: S, config: ImportConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Run one import: resolve the collection and procedure, then push every
    /// document. Earlier chunks stay committed if a later one fails.
    pub async fn import(&self, documents: Vec<Document>) -> Result<ImportStats, ImportError> {
        let collection = self.resolve_collection().await?;
        let sproc = self.resolve_stored_procedure(&collection).await?;
        self.write_documents(&sproc, documents).await
    }

    /// Look up the target collection by name, creating it on first use with
    /// the configured indexing policy and offer tier.
    pub async fn resolve_collection(&self) -> Result<Collection, ImportError> {
        let id = self.config.collection.as_str();
        let found =
            execute_with_retry(&self.config.retry, || self.store.query_collections(id)).await?;
        if let Some(collection) = found.into_iter().next() {
            log::debug!("collection '{}' already exists", id);
            return Ok(collection);
        }

        let policy = if self.config.range_index_paths.is_empty() {
            None
        } else {
            Some(IndexingPolicy::with_range_paths(&self.config.range_index_paths))
        };

        log::info!("creating collection '{}'", id);
        let created = execute_with_retry(&self.config.retry, || {
            self.store
                .create_collection(id, policy.as_ref(), &self.config.offer_type)
        })
        .await;

        match created {
            Ok(collection) => Ok(collection),
            // Another worker created it between our query and create.
            Err(ImportError::Store(StoreError::Conflict(_))) => {
                let found =
                    execute_with_retry(&self.config.retry, || self.store.query_collections(id))
                        .await?;
                found.into_iter().next().ok_or_else(|| {
                    ImportError::Store(StoreError::NotFound(format!(
                        "collection '{id}' missing after create conflict"
                    )))
                })
            }
            Err(error) => Err(error),
        }
    }

    /// Fetch the batch-insert procedure, registering the packaged body when
    /// the collection does not carry it yet.
    pub async fn resolve_stored_procedure(
        &self,
        collection: &Collection,
    ) -> Result<StoredProcedure, ImportError> {
        let found = execute_with_retry(&self.config.retry, || {
            self.store
                .query_stored_procedures(collection, BULK_INSERT_SPROC_ID)
        })
        .await?;
        if let Some(sproc) = found.into_iter().next() {
            return Ok(sproc);
        }

        log::info!(
            "registering stored procedure '{}' on collection '{}'",
            BULK_INSERT_SPROC_ID,
            collection.id
        );
        let created = execute_with_retry(&self.config.retry, || {
            self.store
                .create_stored_procedure(collection, BULK_INSERT_SPROC_ID, BULK_INSERT_SPROC_BODY)
        })
        .await;

        match created {
            Ok(sproc) => Ok(sproc),
            Err(ImportError::Store(StoreError::Conflict(_))) => {
                let found = execute_with_retry(&self.config.retry, || {
                    self.store
                        .query_stored_procedures(collection, BULK_INSERT_SPROC_ID)
                })
                .await?;
                found.into_iter().next().ok_or_else(|| {
                    ImportError::Store(StoreError::NotFound(format!(
                        "procedure '{BULK_INSERT_SPROC_ID}' missing after create conflict"
                    )))
                })
            }
            Err(error) => Err(error),
        }
    }

    /// Submit documents in size- and count-bounded chunks.
    ///
    /// The cursor advances by exactly what the server reports committed,
    /// never by the requested chunk size: the procedure may stop early to
    /// stay inside its per-call time budget, and the remainder is resubmitted
    /// from the true position.
    async fn write_documents(
        &self,
        sproc: &StoredProcedure,
        mut documents: Vec<Document>,
    ) -> Result<ImportStats, ImportError> {
        let mut stats = ImportStats {
            documents: documents.len(),
            ..ImportStats::default()
        };

        // Ids must exist before chunking; they count against the payload
        // budget.
        for document in &mut documents {
            if document.ensure_id() {
                stats.generated_ids += 1;
            }
        }
        let serialized: Vec<String> = documents.iter().map(Document::to_json).collect();

        let mut offset = 0;
        while offset < serialized.len() {
            let chunk = next_chunk(
                &serialized,
                offset,
                self.config.max_script_size,
                self.config.max_script_docs,
            );

            let response = execute_with_retry(&self.config.retry, || {
                self.store
                    .execute_stored_procedure(sproc, chunk, self.config.upsert)
            })
            .await
            .map_err(|error| {
                log::warn!("chunk of {} at offset {} failed: {}", chunk.len(), offset, error);
                ImportError::Chunk {
                    offset,
                    source: Box::new(error),
                }
            })?;

            let committed: usize =
                response
                    .trim()
                    .parse()
                    .map_err(|_| ImportError::BadCommittedCount {
                        offset,
                        body: response.clone(),
                    })?;

            if committed == 0 {
                return Err(ImportError::NoProgress {
                    offset,
                    submitted: chunk.len(),
                });
            }
            if committed > chunk.len() {
                return Err(ImportError::CommittedOverrun {
                    offset,
                    committed,
                    submitted: chunk.len(),
                });
            }
            if committed < chunk.len() {
                log::debug!(
                    "procedure committed {} of {} documents at offset {}",
                    committed,
                    chunk.len(),
                    offset
                );
            }

            offset += committed;
            stats.chunks += 1;
        }

        log::info!(
            "import complete: {} documents in {} chunks ({} ids generated)",
            stats.documents,
            stats.chunks,
            stats.generated_ids
        );
        Ok(stats)
    }
}
