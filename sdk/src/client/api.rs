//! Query client composing the schema mapper, masks, insights and transport

use super::config::ClientConfig;
use super::credentials::{ClientCredentials, Clock, CredentialCell, SystemClock, TokenSource};
use super::transport::{GraphQLRequest, HttpTransport, Transport};
use crate::error::{TiloresError, TiloresResult};
use crate::mapping::{TypeId, TypeMapper, TypeRegistry};
use crate::schema::{INTROSPECTION_QUERY, Schema, TypeRef};
use crate::selection::{
    Argument, FieldNode, MaskInstance, MaskSet, Operation, RecordInsights, Selection, Value,
};
use anyhow::{Context, Result};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

const RECORD: &str = "Record";
const RECORD_INPUT: &str = "RecordInput";
const SEARCH_PARAMS: &str = "SearchParams";

/// Everything derived from the schema, computed once per client
#[derive(Debug)]
pub struct SchemaContext {
    schema: Schema,
    registry: Arc<TypeRegistry>,
    masks: Arc<MaskSet>,
    roots: Vec<TypeId>,
    record_fields: Vec<String>,
    record_params: Vec<(String, TypeRef)>,
    search_params: Vec<(String, TypeRef)>,
    record_whitelist: Arc<HashSet<String>>,
}

impl SchemaContext {
    pub fn new(schema: Schema) -> TiloresResult<Self> {
        let registry = TypeMapper::new(&schema).generate()?;
        let masks = MaskSet::build(&registry)?;

        let roots = [RECORD, RECORD_INPUT, SEARCH_PARAMS]
            .iter()
            .map(|name| {
                registry
                    .lookup(name)
                    .ok_or_else(|| TiloresError::unknown_type(*name))
            })
            .collect::<TiloresResult<Vec<_>>>()?;

        let record_fields = field_params(&schema, RECORD)?
            .into_iter()
            .map(|(name, _)| name)
            .collect::<Vec<_>>();
        let record_whitelist = Arc::new(record_fields.iter().cloned().collect());

        info!(
            "Schema loaded: {} types mapped, {} masks derived",
            registry.len(),
            masks.len()
        );

        Ok(Self {
            record_params: field_params(&schema, RECORD_INPUT)?,
            search_params: field_params(&schema, SEARCH_PARAMS)?,
            schema,
            registry: Arc::new(registry),
            masks: Arc::new(masks),
            roots,
            record_fields,
            record_whitelist,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn masks(&self) -> Arc<MaskSet> {
        self.masks.clone()
    }

    /// `Record`, `RecordInput` and `SearchParams`, in that order
    pub fn roots(&self) -> &[TypeId] {
        &self.roots
    }

    pub fn record_field_names(&self) -> &[String] {
        &self.record_fields
    }

    pub fn record_params(&self) -> &[(String, TypeRef)] {
        &self.record_params
    }

    pub fn search_params(&self) -> &[(String, TypeRef)] {
        &self.search_params
    }

    pub fn record_mask(&self) -> TiloresResult<MaskInstance> {
        MaskInstance::new(self.masks.clone(), RECORD)
    }

    pub fn record_insights(&self) -> RecordInsights {
        RecordInsights::new().with_shared_whitelist(self.record_whitelist.clone())
    }
}

fn field_params(schema: &Schema, type_name: &str) -> TiloresResult<Vec<(String, TypeRef)>> {
    let descriptor = schema
        .get_type(type_name)
        .ok_or_else(|| TiloresError::unknown_type(type_name))?;
    Ok(descriptor
        .fields
        .iter()
        .map(|f| (f.name.clone(), f.field_type.clone()))
        .collect())
}

/// `query search($params: SearchParams!)` selecting `records` by `projection`
pub fn search_operation(projection: Vec<Selection>) -> Operation {
    let records = Selection::nested("records", projection);
    Operation::query("search")
        .with_variable("params", "SearchParams!")
        .with_selection(
            FieldNode::new("search")
                .with_argument(
                    "input",
                    Value::Object(vec![Argument::new("parameters", Value::variable("params"))]),
                )
                .with_selection(Selection::nested(
                    "entities",
                    vec![Selection::field("id"), Selection::field("hits"), records],
                )),
        )
}

/// `query <name>($id: ID!)` selecting `selections` on the entity
pub fn entity_operation(name: &str, selections: Vec<Selection>) -> Operation {
    Operation::query(name).with_variable("id", "ID!").with_selection(
        FieldNode::new("entity")
            .with_argument(
                "input",
                Value::Object(vec![Argument::new("id", Value::variable("id"))]),
            )
            .with_selection(Selection::nested("entity", selections)),
    )
}

/// Client for one Tilores instance.
///
/// The schema is introspected on first use (or seeded with
/// [`TiloresClient::with_schema`]) and everything derived from it is kept
/// for the lifetime of the client.
pub struct TiloresClient<T, S, C = SystemClock> {
    transport: T,
    credentials: CredentialCell<S, C>,
    context: OnceCell<SchemaContext>,
}

impl TiloresClient<HttpTransport, ClientCredentials> {
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("tilores-rust/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        let credentials = ClientCredentials::new(
            client.clone(),
            &config.token_url,
            &config.client_id,
            &config.client_secret,
        )
        .with_scopes(config.scopes.clone());

        Ok(Self::new(
            HttpTransport::with_client(client, &config.api_url),
            CredentialCell::new(credentials),
        ))
    }

    /// Client configured from the `TILORES_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(&ClientConfig::from_env()?)
    }
}

impl<T, S, C> TiloresClient<T, S, C>
where
    T: Transport,
    S: TokenSource,
    C: Clock,
{
    pub fn new(transport: T, credentials: CredentialCell<S, C>) -> Self {
        Self {
            transport,
            credentials,
            context: OnceCell::new(),
        }
    }

    /// Use `schema` instead of introspecting the instance
    pub fn with_schema(self, schema: Schema) -> TiloresResult<Self> {
        let context = SchemaContext::new(schema)?;
        Ok(Self {
            context: OnceCell::new_with(Some(context)),
            ..self
        })
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn credentials(&self) -> &CredentialCell<S, C> {
        &self.credentials
    }

    /// Run a raw GraphQL query and return the response body
    pub async fn gql(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let token = self.credentials.token().await?;
        let mut request = GraphQLRequest::new(query);
        request.variables = variables;
        self.transport.execute(&request, &token).await
    }

    /// The schema context, introspected on first use
    pub async fn schema(&self) -> Result<&SchemaContext> {
        self.context
            .get_or_try_init(|| async {
                info!("Introspecting Tilores schema");
                let response = self.gql(INTROSPECTION_QUERY, None).await?;
                let schema = Schema::from_introspection(response)?;
                Ok::<_, anyhow::Error>(SchemaContext::new(schema)?)
            })
            .await
    }

    /// An empty mask over `Record`
    pub async fn record_mask(&self) -> Result<MaskInstance> {
        Ok(self.schema().await?.record_mask()?)
    }

    /// Search for entities, returning the records fields selected in `mask`.
    ///
    /// See <https://docs.tilotech.io/tilores/api/#query-search>
    pub async fn search(
        &self,
        mask: &MaskInstance,
        params: serde_json::Value,
    ) -> Result<serde_json::Value> {
        let query = search_operation(mask.project()).render();
        debug!("search query:\n{}", query);
        self.gql(&query, Some(json!({ "params": params }))).await
    }

    /// Fetch one entity together with the given insights
    pub async fn fetch_entity(
        &self,
        id: &str,
        insights: RecordInsights,
    ) -> Result<serde_json::Value> {
        let mut selections = vec![Selection::field("id")];
        if !insights.is_empty() {
            selections.push(insights.into_selection());
        }
        let query = entity_operation("entity", selections).render();
        debug!("entity query:\n{}", query);
        self.gql(&query, Some(json!({ "id": id }))).await
    }

    /// Fetch the edges of one entity
    pub async fn entity_edges(&self, id: &str) -> Result<serde_json::Value> {
        let query = entity_operation("get_edges", vec![Selection::field("edges")]).render();
        self.gql(&query, Some(json!({ "id": id }))).await
    }

    /// Names and types of the `SearchParams` input fields
    pub async fn search_params(&self) -> Result<Vec<(String, TypeRef)>> {
        Ok(self.schema().await?.search_params().to_vec())
    }

    pub async fn search_param_names(&self) -> Result<Vec<String>> {
        Ok(names(self.schema().await?.search_params()))
    }

    /// Names of the `RecordInput` fields accepted on submission
    pub async fn record_param_names(&self) -> Result<Vec<String>> {
        Ok(names(self.schema().await?.record_params()))
    }

    pub async fn record_field_names(&self) -> Result<Vec<String>> {
        Ok(self.schema().await?.record_field_names().to_vec())
    }

    /// An insights builder that rejects field names `Record` does not have
    pub async fn record_insights(&self) -> Result<RecordInsights> {
        Ok(self.schema().await?.record_insights())
    }
}

fn names(params: &[(String, TypeRef)]) -> Vec<String> {
    params.iter().map(|(name, _)| name.clone()).collect()
}
