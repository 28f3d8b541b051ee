//! RPC transport for the `article.*` and `auth.*` procedures.
//!
//! ```text
//! GET  /api/trpc/article.fetchAll
//! GET  /api/trpc/article.fetchOne?input={"id":"..."}
//! POST /api/trpc/article.create {"title":"...","content":"..."}
//! ```
//!
//! Queries take their JSON input from the `input` query parameter and
//! mutations from the request body. Results are wrapped as
//! `{"result":{"data":...}}`; failures use the shared error envelope.
//! Protected procedures check the caller before their input is parsed.

use std::fmt;
use std::str::FromStr;

use actix_web::web::{self, Bytes};
use actix_web::{HttpResponse, get, post};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{CreateArticleRequest, DeleteArticleRequest, UpdateArticleRequest};
use crate::domain::{Caller, CallerIdentity, Error};

use super::ApiResult;
use super::cache_control::private_no_cache_header;
use super::caller::CallerContext;
use super::state::HttpState;
use super::validation::{parse_article_id, parse_draft, parse_user_id};

pub const SECRET_MESSAGE: &str = "You can see this secret message!";

/// Procedures served under `/api/trpc/{name}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Procedure {
    ArticleFetchAll,
    ArticleFetchOne,
    ArticleCreate,
    ArticleUpdate,
    ArticleDelete,
    AuthGetSession,
    AuthGetSecretMessage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProcedureKind {
    Query,
    Mutation,
}

impl Procedure {
    pub const ALL: [Self; 7] = [
        Self::ArticleFetchAll,
        Self::ArticleFetchOne,
        Self::ArticleCreate,
        Self::ArticleUpdate,
        Self::ArticleDelete,
        Self::AuthGetSession,
        Self::AuthGetSecretMessage,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ArticleFetchAll => "article.fetchAll",
            Self::ArticleFetchOne => "article.fetchOne",
            Self::ArticleCreate => "article.create",
            Self::ArticleUpdate => "article.update",
            Self::ArticleDelete => "article.delete",
            Self::AuthGetSession => "auth.getSession",
            Self::AuthGetSecretMessage => "auth.getSecretMessage",
        }
    }

    const fn kind(self) -> ProcedureKind {
        match self {
            Self::ArticleCreate | Self::ArticleUpdate | Self::ArticleDelete => {
                ProcedureKind::Mutation
            }
            _ => ProcedureKind::Query,
        }
    }

    fn expect_kind(self, kind: ProcedureKind) -> Result<Self, Error> {
        if self.kind() == kind {
            return Ok(self);
        }
        let method = match self.kind() {
            ProcedureKind::Query => "GET",
            ProcedureKind::Mutation => "POST",
        };
        Err(Error::invalid_request(format!("{self} must be called with {method}")))
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Procedure {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|procedure| procedure.name() == s)
            .ok_or_else(|| Error::not_found(format!("no procedure named {s}")))
    }
}

/// Input of `article.fetchOne`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct FetchOneInput {
    pub id: String,
}

/// Input of `article.create`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateArticleInput {
    #[schema(example = "Hello wide world")]
    pub title: String,
    pub content: String,
}

/// Input of `article.update`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleInput {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: String,
}

/// Input of `article.delete`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteArticleInput {
    pub id: String,
    pub author_id: String,
}

impl TryFrom<CreateArticleInput> for CreateArticleRequest {
    type Error = Error;

    fn try_from(input: CreateArticleInput) -> Result<Self, Self::Error> {
        Ok(Self {
            draft: parse_draft(input.title, input.content)?,
        })
    }
}

impl TryFrom<UpdateArticleInput> for UpdateArticleRequest {
    type Error = Error;

    fn try_from(input: UpdateArticleInput) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_article_id(input.id)?,
            author_id: parse_user_id("authorId", input.author_id)?,
            draft: parse_draft(input.title, input.content)?,
        })
    }
}

impl TryFrom<DeleteArticleInput> for DeleteArticleRequest {
    type Error = Error;

    fn try_from(input: DeleteArticleInput) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_article_id(input.id)?,
            author_id: parse_user_id("authorId", input.author_id)?,
        })
    }
}

/// Signed-in user as returned by `auth.getSession`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionUser {
    pub id: String,
    pub name: Option<String>,
    pub image: Option<String>,
    #[schema(example = "USER")]
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionView {
    pub user: SessionUser,
}

impl From<&CallerIdentity> for SessionView {
    fn from(identity: &CallerIdentity) -> Self {
        let user = identity.user();
        Self {
            user: SessionUser {
                id: user.id().to_string(),
                name: user.name().map(str::to_owned),
                image: user.image().map(str::to_owned),
                role: user.role().as_str().to_owned(),
            },
        }
    }
}

#[derive(Serialize)]
struct RpcData<T> {
    data: T,
}

#[derive(Serialize)]
struct RpcResult<T> {
    result: RpcData<T>,
}

fn ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(RpcResult {
            result: RpcData { data },
        })
}

/// Missing input decodes from `null`, so procedures without input accept it.
fn parse_input<T: DeserializeOwned>(raw: Option<&[u8]>) -> Result<T, Error> {
    serde_json::from_slice(raw.unwrap_or(b"null"))
        .map_err(|err| Error::invalid_request(format!("invalid procedure input: {err}")))
}

async fn dispatch(
    state: &HttpState,
    caller: Caller,
    procedure: Procedure,
    input: Option<&[u8]>,
) -> ApiResult<HttpResponse> {
    if procedure.kind() == ProcedureKind::Mutation {
        caller.require_authenticated()?;
    }
    match procedure {
        Procedure::ArticleFetchAll => Ok(ok(state.articles.fetch_all().await?)),
        Procedure::ArticleFetchOne => {
            let input: FetchOneInput = parse_input(input)?;
            let id = parse_article_id(input.id)?;
            Ok(ok(state.articles.fetch_one(&id).await?))
        }
        Procedure::ArticleCreate => {
            let request = parse_input::<CreateArticleInput>(input)?.try_into()?;
            Ok(ok(state.article_commands.create(&caller, request).await?))
        }
        Procedure::ArticleUpdate => {
            let request = parse_input::<UpdateArticleInput>(input)?.try_into()?;
            Ok(ok(state.article_commands.update(&caller, request).await?))
        }
        Procedure::ArticleDelete => {
            let request = parse_input::<DeleteArticleInput>(input)?.try_into()?;
            Ok(ok(state.article_commands.delete(&caller, request).await?))
        }
        Procedure::AuthGetSession => Ok(ok(caller.identity().map(SessionView::from))),
        Procedure::AuthGetSecretMessage => {
            caller.require_authenticated()?;
            Ok(ok(SECRET_MESSAGE))
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct QueryInput {
    /// JSON-encoded procedure input.
    pub input: Option<String>,
}

/// Run a query procedure.
#[utoipa::path(
    get,
    path = "/api/trpc/{procedure}",
    params(
        ("procedure" = String, Path, description = "Procedure name, e.g. article.fetchAll"),
        QueryInput
    ),
    responses(
        (status = 200, description = "Procedure result wrapped as {result:{data}}"),
        (status = 400, description = "Invalid input", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Login required", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Unknown procedure", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["rpc"]
)]
#[get("/api/trpc/{procedure}")]
pub async fn query(
    state: web::Data<HttpState>,
    caller: CallerContext,
    procedure: web::Path<String>,
    params: web::Query<QueryInput>,
) -> ApiResult<HttpResponse> {
    let procedure = procedure.parse::<Procedure>()?.expect_kind(ProcedureKind::Query)?;
    let input = params.input.as_deref().map(str::as_bytes);
    dispatch(&state, caller.into_inner(), procedure, input).await
}

/// Run a mutation procedure.
#[utoipa::path(
    post,
    path = "/api/trpc/{procedure}",
    params(("procedure" = String, Path, description = "Procedure name, e.g. article.create")),
    request_body(content = serde_json::Value, description = "Procedure input", content_type = "application/json"),
    responses(
        (status = 200, description = "Procedure result wrapped as {result:{data}}"),
        (status = 400, description = "Invalid input", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 401, description = "Login required", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 403, description = "Caller does not own the article", body = crate::inbound::http::schemas::ErrorSchema),
        (status = 404, description = "Unknown procedure or article", body = crate::inbound::http::schemas::ErrorSchema)
    ),
    tags = ["rpc"],
    security(("SessionCookie" = []))
)]
#[post("/api/trpc/{procedure}")]
pub async fn mutation(
    state: web::Data<HttpState>,
    caller: CallerContext,
    procedure: web::Path<String>,
    body: Bytes,
) -> ApiResult<HttpResponse> {
    let procedure = procedure
        .parse::<Procedure>()?
        .expect_kind(ProcedureKind::Mutation)?;
    let input = (!body.is_empty()).then_some(body.as_ref());
    dispatch(&state, caller.into_inner(), procedure, input).await
}
