//! List lookups against the query service.

use crate::context::UserContext;
use crate::error::{RecordError, RecordResult};
use crate::lifecycle::{FetchOptions, RecordStore};
use crate::model::Model;
use crate::record::Record;
use radiks_model::{Filter, keys};
use tracing::{debug, warn};

impl RecordStore {
    /// Records of `M` matching `filter`, in the index's native order.
    ///
    /// An empty match set is an empty vector.
    pub async fn fetch_list<M: Model>(
        &self,
        ctx: &UserContext,
        filter: &Filter,
        opts: FetchOptions,
    ) -> RecordResult<Vec<Record<M>>> {
        let scoped = scope::<M>(filter);
        let docs = self.queries.query(&scoped).await?;
        debug!(model = %M::schema().model_name, matched = docs.len(), "fetched list");

        let mut records = Vec::with_capacity(docs.len());
        for doc in docs {
            records.push(self.materialize(ctx, doc, opts).await?);
        }
        Ok(records)
    }

    /// The first record of `M` matching `filter`, or `None`.
    pub async fn find_one<M: Model>(
        &self,
        ctx: &UserContext,
        filter: &Filter,
        opts: FetchOptions,
    ) -> RecordResult<Option<Record<M>>> {
        let first = filter.clone().with_limit(1);
        Ok(self.fetch_list(ctx, &first, opts).await?.into_iter().next())
    }

    /// Number of records of `M` matching `filter`, ignoring pagination.
    pub async fn count<M: Model>(&self, filter: &Filter) -> RecordResult<usize> {
        let scoped = scope::<M>(&filter.without_pagination());
        Ok(self.queries.count(&scoped).await?)
    }

    /// Records of `M` matching `filter` that were signed with the acting
    /// user's personal signing key.
    pub async fn fetch_own_list<M: Model>(
        &self,
        ctx: &UserContext,
        filter: &Filter,
        opts: FetchOptions,
    ) -> RecordResult<Vec<Record<M>>> {
        let key_id = ctx
            .signing_key_id()
            .ok_or(RecordError::NoSigningKey { group: None })?;
        let own = filter.clone().where_eq(keys::SIGNING_KEY_ID, key_id.as_str());
        self.fetch_list(ctx, &own, opts).await
    }
}

/// Restricts `filter` to documents of model `M`.
fn scope<M: Model>(filter: &Filter) -> Filter {
    let schema = M::schema();
    for field in filter.referenced_fields() {
        if schema.is_encrypted(field) {
            warn!(
                model = %schema.model_name,
                field,
                "filtering on an encrypted field never matches stored ciphertext"
            );
        }
    }
    filter.clone().where_eq(keys::MODEL_TYPE, schema.model_name.as_str())
}
