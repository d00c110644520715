use super::PokemonStore;
use crate::{NewPokemon, Pokemon, PokemonId, PokemonPatch, StoreError};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{
    FindOneAndUpdateOptions, FindOneOptions, FindOptions, IndexOptions, ReturnDocument,
};
use mongodb::{Client, Collection, IndexModel};

/// Server error code for a unique index violation.
const DUPLICATE_KEY: i32 = 11000;

const MAX_ID_ATTEMPTS: u32 = 5;

/// MongoDB-backed store. The collection keeps the driver's `_id` as its
/// internal identity; the domain `id` is a separate, uniquely indexed field.
pub struct MongoStore {
    client: Client,
    database: String,
    collection: Collection<Document>,
}

impl MongoStore {
    /// Connect, verify the deployment answers, and make sure `id` is unique.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let store = Self::with_client(client, database, collection);
        store.ping().await?;
        store.ensure_id_index().await;
        tracing::info!(database, collection, "connected to mongo");
        Ok(store)
    }

    pub fn with_client(client: Client, database: &str, collection: &str) -> Self {
        let collection = client.database(database).collection::<Document>(collection);
        Self {
            client,
            database: database.to_string(),
            collection,
        }
    }

    /// The unique index is what makes `insert_next` safe under concurrency.
    /// Collections that already hold duplicate ids cannot get it; they keep
    /// working, without that guarantee.
    async fn ensure_id_index(&self) {
        let model = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        match self.collection.create_index(model, None).await {
            Ok(result) => tracing::debug!(index = %result.index_name, "pokemon id index ready"),
            Err(err) => tracing::warn!(
                error = %err,
                "unique index on pokemon id unavailable; concurrent creates may collide"
            ),
        }
    }

    async fn max_id(&self) -> Result<Option<PokemonId>, StoreError> {
        let options = FindOneOptions::builder()
            .sort(doc! { "id": -1 })
            .projection(doc! { "id": 1, "_id": 0 })
            .build();
        let filter = doc! { "id": { "$type": "number" } };
        let Some(document) = self.collection.find_one(filter, options).await? else {
            return Ok(None);
        };
        match document.get("id") {
            Some(Bson::Int32(value)) => Ok(Some(PokemonId::new(i64::from(*value)))),
            Some(Bson::Int64(value)) => Ok(Some(PokemonId::new(*value))),
            Some(Bson::Double(value)) if value.fract() == 0.0 => {
                Ok(Some(PokemonId::new(*value as i64)))
            }
            other => Err(StoreError::Serialization(format!(
                "stored pokemon id is not an integer: {other:?}"
            ))),
        }
    }
}

fn id_filter(id: PokemonId) -> Document {
    doc! { "id": id.get() }
}

fn decode(document: Document) -> Result<Pokemon, StoreError> {
    match Bson::Document(document).into_relaxed_extjson() {
        serde_json::Value::Object(fields) => Pokemon::from_stored(fields),
        other => Err(StoreError::Serialization(format!(
            "expected a document, got {other}"
        ))),
    }
}

fn encode(pokemon: &Pokemon) -> Result<Document, StoreError> {
    bson::to_document(pokemon).map_err(|err| StoreError::Serialization(err.to_string()))
}

/// `$set` document for a patch, or `None` when there is nothing to change.
fn update_document(patch: &PokemonPatch) -> Result<Option<Document>, StoreError> {
    patch.validate()?;
    if patch.is_empty() {
        return Ok(None);
    }

    let mut set = Document::new();
    for (key, value) in patch.fields() {
        let value =
            bson::to_bson(value).map_err(|err| StoreError::Serialization(err.to_string()))?;
        set.insert(key.clone(), value);
    }
    Ok(Some(doc! { "$set": set }))
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl PokemonStore for MongoStore {
    async fn list(&self, skip: u64, limit: u64) -> Result<Vec<Pokemon>, StoreError> {
        let options = FindOptions::builder()
            .skip(skip)
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();
        let cursor = self.collection.find(None, options).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        documents.into_iter().map(decode).collect()
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.collection.count_documents(None, None).await?)
    }

    async fn get(&self, id: PokemonId) -> Result<Option<Pokemon>, StoreError> {
        self.collection
            .find_one(id_filter(id), None)
            .await?
            .map(decode)
            .transpose()
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Pokemon>, StoreError> {
        let pattern = regex::escape(fragment);
        let filter = doc! {
            "$or": [
                { "name.english": { "$regex": pattern.as_str(), "$options": "i" } },
                { "name.french": { "$regex": pattern.as_str(), "$options": "i" } },
            ]
        };
        let cursor = self.collection.find(filter, None).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        documents.into_iter().map(decode).collect()
    }

    async fn insert_next(&self, draft: NewPokemon) -> Result<Pokemon, StoreError> {
        draft.validate()?;

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let id = PokemonId::allocate(self.max_id().await?)?;
            let pokemon = draft.clone().into_pokemon(id);

            match self.collection.insert_one(encode(&pokemon)?, None).await {
                Ok(_) => return Ok(pokemon),
                Err(err) if is_duplicate_key(&err) => {
                    tracing::debug!(%id, attempt, "pokemon id taken by a concurrent insert");
                }
                Err(err) => return Err(err.into()),
            }
        }

        tracing::warn!(attempts = MAX_ID_ATTEMPTS, "pokemon id allocation exhausted");
        Err(StoreError::IdAllocation {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    async fn update(
        &self,
        id: PokemonId,
        patch: &PokemonPatch,
    ) -> Result<Option<Pokemon>, StoreError> {
        let Some(update) = update_document(patch)? else {
            return self.get(id).await;
        };

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        self.collection
            .find_one_and_update(id_filter(id), update, options)
            .await?
            .map(decode)
            .transpose()
    }

    async fn delete(&self, id: PokemonId) -> Result<Option<Pokemon>, StoreError> {
        self.collection
            .find_one_and_delete(id_filter(id), None)
            .await?
            .map(decode)
            .transpose()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client
            .database(&self.database)
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.client.clone().shutdown().await;
        tracing::info!("mongo client shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PokemonName;
    use serde_json::json;

    #[test]
    fn decode_strips_internal_identity() {
        let document = doc! {
            "_id": bson::oid::ObjectId::new(),
            "id": 25_i32,
            "name": { "english": "Pikachu", "french": "Pikachu" },
            "type": ["Electric"],
        };
        let pokemon = decode(document).unwrap();
        assert_eq!(pokemon.id, PokemonId::new(25));
        assert!(!pokemon.attributes.contains_key("_id"));
        assert_eq!(pokemon.attributes["type"], serde_json::json!(["Electric"]));
    }

    #[test]
    fn encode_keeps_domain_fields() {
        let pokemon = NewPokemon::new(PokemonName::new("Eevee", "Évoli"))
            .with_attribute("base", serde_json::json!({ "HP": 55 }))
            .into_pokemon(PokemonId::new(133));
        let document = encode(&pokemon).unwrap();
        assert_eq!(document.get_i64("id").unwrap(), 133);
        assert_eq!(
            document.get_document("name").unwrap().get_str("french").unwrap(),
            "Évoli"
        );
        assert!(document.get_document("base").is_ok());
        assert!(!document.contains_key("_id"));
    }

    #[test]
    fn update_document_sets_top_level_fields() {
        let patch = PokemonPatch::new()
            .set("hp", json!(40))
            .set("name", json!({ "english": "Raichu", "french": "Raichu" }))
            .set("id", json!(7));
        let update = update_document(&patch).unwrap().unwrap();
        let set = update.get_document("$set").unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get_i64("hp").unwrap(), 40);
        assert_eq!(set.get_document("name").unwrap().get_str("english").unwrap(), "Raichu");
        assert!(!set.contains_key("id"));
    }

    #[test]
    fn update_document_is_none_for_empty_patch() {
        assert_eq!(update_document(&PokemonPatch::new()).unwrap(), None);
        let only_reserved = PokemonPatch::new().set("_id", json!("x"));
        assert_eq!(update_document(&only_reserved).unwrap(), None);
    }

    #[test]
    fn update_document_rejects_path_and_operator_keys() {
        for key in ["name.english", "$where", "$unset"] {
            let patch = PokemonPatch::new().set(key, json!(""));
            let err = update_document(&patch).unwrap_err();
            assert!(err.is_validation(), "{key}");
        }
    }

    #[test]
    fn update_document_rejects_incomplete_name() {
        let patch = PokemonPatch::new().set("name", json!({ "english": "", "french": "Raichu" }));
        assert!(update_document(&patch).unwrap_err().is_validation());
    }
}
