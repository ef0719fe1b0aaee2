//! Routes for serving API endpoints.

use crate::{
    Api, Backend, Negotiation,
    exception::{
        self, CONNECTING_ERROR, INVALID_PARAMETER_VALUE, MISSING_PARAMETER_VALUE, NOT_FOUND,
    },
};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use mf::mime::APPLICATION_OPENAPI_3_0;
use mf_api::{GetParams, Params};
use serde_json::{Map, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Errors for our axum routes.
#[derive(Debug)]
pub enum Error {
    /// A server error, reported as a storage failure.
    Server(crate::Error),

    /// An error raised when something is not found.
    NotFound(String),

    /// An error raised when a parameter or body value is malformed.
    InvalidParameter(String),

    /// An error raised when the request body is absent.
    MissingBody,

    /// An error raised when a required MF-JSON member is absent.
    MissingMember(String),
}

type Result<T> = std::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Server(error) => match error {
                crate::Error::OverlappingSequence(_)
                | crate::Error::Mf(_)
                | crate::Error::MfApi(_) => exception::response(
                    StatusCode::BAD_REQUEST,
                    INVALID_PARAMETER_VALUE,
                    error,
                ),
                error => {
                    exception::response(StatusCode::BAD_REQUEST, CONNECTING_ERROR, error)
                }
            },
            Error::NotFound(description) => {
                exception::response(StatusCode::NOT_FOUND, NOT_FOUND, description)
            }
            Error::InvalidParameter(description) => exception::response(
                StatusCode::BAD_REQUEST,
                INVALID_PARAMETER_VALUE,
                description,
            ),
            Error::MissingBody => exception::response(
                StatusCode::BAD_REQUEST,
                MISSING_PARAMETER_VALUE,
                "request body is empty",
            ),
            Error::MissingMember(description) => exception::response(
                StatusCode::NOT_IMPLEMENTED,
                MISSING_PARAMETER_VALUE,
                description,
            ),
        }
    }
}

impl From<crate::Error> for Error {
    fn from(error: crate::Error) -> Self {
        Error::Server(error)
    }
}

/// Creates an [axum::Router] from an [Api].
///
/// # Examples
///
/// ```
/// use mf_server::{Api, MemoryBackend, routes};
///
/// let api = Api::new(MemoryBackend::new(), "http://mf.test").unwrap();
/// let router = routes::from_api(api);
/// ```
pub fn from_api<B: Backend>(api: Api<B>) -> Router {
    Router::new()
        .route("/", get(landing_page))
        .route("/api", get(openapi))
        .route("/openapi", get(openapi))
        .route("/conformance", get(conformance))
        .route("/collections", get(collections).post(create_collection))
        .route(
            "/collections/{collection_id}",
            get(collection).put(update_collection).delete(delete_collection),
        )
        .route(
            "/collections/{collection_id}/items",
            get(items).post(create_item),
        )
        .route(
            "/collections/{collection_id}/items/{mfeature_id}",
            get(item).delete(delete_item),
        )
        .route(
            "/collections/{collection_id}/items/{mfeature_id}/tgsequence",
            get(temporal_geometries).post(create_temporal_geometry),
        )
        .route(
            "/collections/{collection_id}/items/{mfeature_id}/tgsequence/{tgeometry_id}",
            delete(delete_temporal_geometry),
        )
        .route(
            "/collections/{collection_id}/items/{mfeature_id}/tProperties",
            get(temporal_properties).post(create_temporal_properties),
        )
        .route(
            "/collections/{collection_id}/items/{mfeature_id}/tProperties/{tproperty_name}",
            get(temporal_property_values)
                .post(create_temporal_value)
                .delete(delete_temporal_property),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(api)
}

/// Creates an [axum::Router] honoring the server configuration toggles.
pub fn from_api_with<B: Backend>(api: Api<B>, config: &crate::ServerConfig) -> Router {
    let router = from_api(api);
    if config.gzip {
        router.layer(tower_http::compression::CompressionLayer::new())
    } else {
        router
    }
}

/// Negotiates format and locale, rejects unknown format tokens, and
/// validates the query parameters.
fn validated<B: Backend>(
    api: &Api<B>,
    get: &GetParams,
    headers: &HeaderMap,
) -> Result<(Negotiation, Params)> {
    let negotiation = Negotiation::negotiate(
        get.f.as_deref(),
        get.lang.as_deref(),
        header_str(headers, header::ACCEPT),
        header_str(headers, header::ACCEPT_LANGUAGE),
        &api.locales,
    );
    if let Err(token) = negotiation.format() {
        return Err(Error::InvalidParameter(format!(
            "invalid format: '{}'",
            token
        )));
    }
    let params = Params::try_from(get.clone())
        .and_then(Params::valid)
        .map_err(|error| Error::InvalidParameter(format!("invalid query: {}", error)))?;
    Ok((negotiation, params))
}

fn header_str(headers: &HeaderMap, name: header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn parse_body(body: &Bytes) -> Result<Value> {
    if body.is_empty() {
        return Err(Error::MissingBody);
    }
    serde_json::from_slice(body)
        .map_err(|error| Error::InvalidParameter(format!("invalid json body: {}", error)))
}

fn parse_object(body: &Bytes) -> Result<Map<String, Value>> {
    match parse_body(body)? {
        Value::Object(object) => Ok(object),
        _ => Err(Error::InvalidParameter(
            "request body is not a json object".to_string(),
        )),
    }
}

/// Maps the schema guard's verdict: structural gaps are
/// `MissingParameterValue`, everything else is malformed input.
fn checked_schema(result: mf::Result<()>) -> Result<()> {
    result.map_err(|error| match error {
        mf::Error::MissingMember(_) => Error::MissingMember(error.to_string()),
        error => Error::InvalidParameter(error.to_string()),
    })
}

fn created<B: Backend>(api: &Api<B>, path: &str) -> Result<Response> {
    let location = api.root.join(path).map_err(crate::Error::from)?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location.to_string())],
    )
        .into_response())
}

fn no_content_or_not_found(deleted: bool, description: String) -> Result<Response> {
    if deleted {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Err(Error::NotFound(description))
    }
}

/// Returns the `/` endpoint.
async fn landing_page<B: Backend>(
    State(api): State<Api<B>>,
    Query(get): Query<GetParams>,
    headers: HeaderMap,
) -> Result<Response> {
    let _ = validated(&api, &get, &headers)?;
    api.landing_page()
        .map(|landing_page| Json(landing_page).into_response())
        .map_err(Error::from)
}

/// Returns the `/openapi` (and `/api`) endpoint.
async fn openapi() -> Response {
    (
        [(header::CONTENT_TYPE, APPLICATION_OPENAPI_3_0)],
        include_str!("openapi.json"),
    )
        .into_response()
}

/// Returns the `/conformance` endpoint.
async fn conformance<B: Backend>(State(api): State<Api<B>>) -> Response {
    Json(api.conformance()).into_response()
}

/// Returns the `/collections` endpoint.
async fn collections<B: Backend>(
    State(api): State<Api<B>>,
    Query(get): Query<GetParams>,
    headers: HeaderMap,
) -> Result<Response> {
    let (_, params) = validated(&api, &get, &headers)?;
    let collections = api.collections(&get, params).await?;
    Ok(Json(collections).into_response())
}

/// Creates a collection from the request body.
async fn create_collection<B: Backend>(
    State(mut api): State<Api<B>>,
    body: Bytes,
) -> Result<Response> {
    let property = parse_object(&body)?;
    let id = api.create_collection(property).await?;
    created(&api, &format!("/collections/{}", id))
}

/// Returns the `/collections/{collectionId}` endpoint.
async fn collection<B: Backend>(
    State(api): State<Api<B>>,
    Path(collection_id): Path<String>,
    Query(get): Query<GetParams>,
    headers: HeaderMap,
) -> Result<Response> {
    let _ = validated(&api, &get, &headers)?;
    api.collection(&collection_id)
        .await
        .map_err(Error::from)
        .and_then(|option| {
            option.ok_or_else(|| {
                Error::NotFound(format!("no collection with id='{}'", collection_id))
            })
        })
        .map(|collection| Json(collection).into_response())
}

/// Replaces a collection's descriptor document.
async fn update_collection<B: Backend>(
    State(mut api): State<Api<B>>,
    Path(collection_id): Path<String>,
    body: Bytes,
) -> Result<Response> {
    let property = parse_object(&body)?;
    let updated = api.update_collection(&collection_id, property).await?;
    no_content_or_not_found(
        updated,
        format!("no collection with id='{}'", collection_id),
    )
}

/// Deletes a collection and everything it contains.
async fn delete_collection<B: Backend>(
    State(mut api): State<Api<B>>,
    Path(collection_id): Path<String>,
) -> Result<Response> {
    let deleted = api.delete_collection(&collection_id).await?;
    no_content_or_not_found(
        deleted,
        format!("no collection with id='{}'", collection_id),
    )
}

/// Returns the `/collections/{collectionId}/items` endpoint.
async fn items<B: Backend>(
    State(api): State<Api<B>>,
    Path(collection_id): Path<String>,
    Query(get): Query<GetParams>,
    headers: HeaderMap,
) -> Result<Response> {
    tracing::debug!("GET items: {:?}", get);
    let (_, params) = validated(&api, &get, &headers)?;
    api.features(&collection_id, &get, params)
        .await
        .map_err(Error::from)
        .and_then(|option| {
            option.ok_or_else(|| {
                Error::NotFound(format!("no collection with id='{}'", collection_id))
            })
        })
        .map(|features| Json(features).into_response())
}

/// Creates a moving feature from the request body.
async fn create_item<B: Backend>(
    State(mut api): State<Api<B>>,
    Path(collection_id): Path<String>,
    body: Bytes,
) -> Result<Response> {
    let payload = parse_body(&body)?;
    checked_schema(mf::schema::validate_feature(&payload))?;
    let Some(id) = api.create_feature(&collection_id, payload).await? else {
        return Err(Error::NotFound(format!(
            "no collection with id='{}'",
            collection_id
        )));
    };
    created(&api, &format!("/collections/{}/items/{}", collection_id, id))
}

/// Returns the `/collections/{collectionId}/items/{mFeatureId}` endpoint.
async fn item<B: Backend>(
    State(api): State<Api<B>>,
    Path((collection_id, mfeature_id)): Path<(String, String)>,
    Query(get): Query<GetParams>,
    headers: HeaderMap,
) -> Result<Response> {
    let _ = validated(&api, &get, &headers)?;
    api.feature(&collection_id, &mfeature_id)
        .await
        .map_err(Error::from)
        .and_then(|option| {
            option.ok_or_else(|| {
                Error::NotFound(format!(
                    "no feature with id='{}' in collection='{}'",
                    mfeature_id, collection_id
                ))
            })
        })
        .map(|feature| Json(feature).into_response())
}

/// Deletes a moving feature.
async fn delete_item<B: Backend>(
    State(mut api): State<Api<B>>,
    Path((collection_id, mfeature_id)): Path<(String, String)>,
) -> Result<Response> {
    let deleted = api.delete_feature(&collection_id, &mfeature_id).await?;
    no_content_or_not_found(
        deleted,
        format!(
            "no feature with id='{}' in collection='{}'",
            mfeature_id, collection_id
        ),
    )
}

/// Returns the temporal geometry sequence endpoint.
async fn temporal_geometries<B: Backend>(
    State(api): State<Api<B>>,
    Path((collection_id, mfeature_id)): Path<(String, String)>,
    Query(get): Query<GetParams>,
    headers: HeaderMap,
) -> Result<Response> {
    let (_, params) = validated(&api, &get, &headers)?;
    api.temporal_geometries(&collection_id, &mfeature_id, &get, params)
        .await
        .map_err(Error::from)
        .and_then(|option| {
            option.ok_or_else(|| {
                Error::NotFound(format!(
                    "no feature with id='{}' in collection='{}'",
                    mfeature_id, collection_id
                ))
            })
        })
        .map(|sequence| Json(sequence).into_response())
}

/// Creates a temporal geometry from the request body.
async fn create_temporal_geometry<B: Backend>(
    State(mut api): State<Api<B>>,
    Path((collection_id, mfeature_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<Response> {
    let payload = parse_body(&body)?;
    checked_schema(mf::schema::validate_temporal_geometry(&payload))?;
    let Some(id) = api
        .create_temporal_geometry(&collection_id, &mfeature_id, &payload)
        .await?
    else {
        return Err(Error::NotFound(format!(
            "no feature with id='{}' in collection='{}'",
            mfeature_id, collection_id
        )));
    };
    created(
        &api,
        &format!(
            "/collections/{}/items/{}/tgsequence/{}",
            collection_id, mfeature_id, id
        ),
    )
}

/// Deletes a temporal geometry.
async fn delete_temporal_geometry<B: Backend>(
    State(mut api): State<Api<B>>,
    Path((collection_id, mfeature_id, tgeometry_id)): Path<(String, String, String)>,
) -> Result<Response> {
    let deleted = api
        .delete_temporal_geometry(&collection_id, &mfeature_id, &tgeometry_id)
        .await?;
    no_content_or_not_found(
        deleted,
        format!("no temporal geometry with id='{}'", tgeometry_id),
    )
}

/// Returns the temporal properties endpoint.
async fn temporal_properties<B: Backend>(
    State(api): State<Api<B>>,
    Path((collection_id, mfeature_id)): Path<(String, String)>,
    Query(get): Query<GetParams>,
    headers: HeaderMap,
) -> Result<Response> {
    let (_, params) = validated(&api, &get, &headers)?;
    api.temporal_properties(&collection_id, &mfeature_id, &get, params)
        .await
        .map_err(Error::from)
        .and_then(|option| {
            option.ok_or_else(|| {
                Error::NotFound(format!(
                    "no feature with id='{}' in collection='{}'",
                    mfeature_id, collection_id
                ))
            })
        })
        .map(|properties| Json(properties).into_response())
}

/// Creates temporal properties from the request body.
async fn create_temporal_properties<B: Backend>(
    State(mut api): State<Api<B>>,
    Path((collection_id, mfeature_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<Response> {
    let payload = parse_body(&body)?;
    checked_schema(mf::schema::validate_temporal_properties(&payload))?;
    let Some(names) = api
        .create_temporal_properties(&collection_id, &mfeature_id, &payload)
        .await?
    else {
        return Err(Error::NotFound(format!(
            "no feature with id='{}' in collection='{}'",
            mfeature_id, collection_id
        )));
    };
    let name = names.first().cloned().unwrap_or_default();
    created(
        &api,
        &format!(
            "/collections/{}/items/{}/tProperties/{}",
            collection_id, mfeature_id, name
        ),
    )
}

/// Returns the temporal property values endpoint.
async fn temporal_property_values<B: Backend>(
    State(api): State<Api<B>>,
    Path((collection_id, mfeature_id, tproperty_name)): Path<(String, String, String)>,
    Query(get): Query<GetParams>,
    headers: HeaderMap,
) -> Result<Response> {
    let (_, params) = validated(&api, &get, &headers)?;
    api.temporal_property_values(&collection_id, &mfeature_id, &tproperty_name, &get, params)
        .await
        .map_err(Error::from)
        .and_then(|option| {
            option.ok_or_else(|| {
                Error::NotFound(format!(
                    "no temporal property with name='{}'",
                    tproperty_name
                ))
            })
        })
        .map(|values| Json(values).into_response())
}

/// Appends a value sequence to a temporal property.
async fn create_temporal_value<B: Backend>(
    State(mut api): State<Api<B>>,
    Path((collection_id, mfeature_id, tproperty_name)): Path<(String, String, String)>,
    body: Bytes,
) -> Result<Response> {
    let payload = parse_body(&body)?;
    checked_schema(mf::schema::validate_temporal_value(&payload))?;
    let Some(id) = api
        .create_temporal_value(&collection_id, &mfeature_id, &tproperty_name, &payload)
        .await?
    else {
        return Err(Error::NotFound(format!(
            "no temporal property with name='{}'",
            tproperty_name
        )));
    };
    created(
        &api,
        &format!(
            "/collections/{}/items/{}/tProperties/{}/{}",
            collection_id, mfeature_id, tproperty_name, id
        ),
    )
}

/// Deletes a temporal property.
async fn delete_temporal_property<B: Backend>(
    State(mut api): State<Api<B>>,
    Path((collection_id, mfeature_id, tproperty_name)): Path<(String, String, String)>,
) -> Result<Response> {
    let deleted = api
        .delete_temporal_property(&collection_id, &mfeature_id, &tproperty_name)
        .await?;
    no_content_or_not_found(
        deleted,
        format!("no temporal property with name='{}'", tproperty_name),
    )
}

#[cfg(test)]
mod tests {
    use crate::{Api, MemoryBackend};
    use axum::{
        Router,
        body::Body,
        http::{Request, Response, StatusCode, header::LOCATION},
    };
    use serde_json::{Value, json};
    use tower::util::ServiceExt;

    fn router(backend: MemoryBackend) -> Router {
        super::from_api(Api::new(backend, "http://mf.test/").unwrap())
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
        let builder = Request::builder().uri(uri).method(method);
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        router.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn location(response: &Response<Body>) -> String {
        response
            .headers()
            .get(LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    fn feature_payload() -> Value {
        json!({
            "type": "Feature",
            "temporalGeometry": {
                "type": "MovingPoint",
                "datetimes": [
                    "2011-07-14T22:01:01Z",
                    "2011-07-14T23:01:01Z",
                    "2011-07-15T00:01:01Z",
                ],
                "coordinates": [[0.0, 0.0], [10.0, 10.0], [20.0, 20.0]],
                "interpolation": "Linear",
            },
            "properties": {"name": "car1"},
        })
    }

    /// Creates a collection and a feature, returning their ids.
    async fn fixtures(router: &Router) -> (String, String) {
        let response = send(router, "POST", "/collections", Some(json!({"title": "fleet"}))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let collection_id = location(&response)
            .rsplit('/')
            .next()
            .unwrap()
            .to_string();
        let response = send(
            router,
            "POST",
            &format!("/collections/{}/items", collection_id),
            Some(feature_payload()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let feature_id = location(&response).rsplit('/').next().unwrap().to_string();
        (collection_id, feature_id)
    }

    #[tokio::test]
    async fn landing_page() {
        let response = send(&router(MemoryBackend::new()), "GET", "/", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["links"].is_array());
    }

    #[tokio::test]
    async fn openapi() {
        let response = send(&router(MemoryBackend::new()), "GET", "/openapi", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/vnd.oai.openapi+json;version=3.0"
        );
    }

    #[tokio::test]
    async fn conformance() {
        let response = send(&router(MemoryBackend::new()), "GET", "/conformance", None).await;
        let body = body_json(response).await;
        assert!(
            body["conformsTo"]
                .as_array()
                .unwrap()
                .iter()
                .any(|uri| uri.as_str().unwrap().contains("movingfeatures"))
        );
    }

    #[tokio::test]
    async fn unknown_format_token_is_rejected() {
        let response = send(&router(MemoryBackend::new()), "GET", "/collections?f=csv", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "InvalidParameterValue");
    }

    #[tokio::test]
    async fn create_and_fetch_collection() {
        let router = router(MemoryBackend::new());
        let response =
            send(&router, "POST", "/collections", Some(json!({"title": "fleet"}))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let location = location(&response);
        assert!(location.starts_with("http://mf.test/collections/"));

        let path = location.strip_prefix("http://mf.test").unwrap().to_string();
        let response = send(&router, "GET", &path, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["title"], "fleet");
        assert_eq!(body["extent"]["spatial"]["bbox"], json!([]));
    }

    #[tokio::test]
    async fn empty_body_is_missing_parameter() {
        let response = send(&router(MemoryBackend::new()), "POST", "/collections", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "MissingParameterValue");
    }

    #[tokio::test]
    async fn feature_without_temporal_geometry_is_structural() {
        let router = router(MemoryBackend::new());
        let (collection_id, _) = fixtures(&router).await;
        let response = send(
            &router,
            "POST",
            &format!("/collections/{}/items", collection_id),
            Some(json!({"type": "Feature"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
        let body = body_json(response).await;
        assert_eq!(body["code"], "MissingParameterValue");
    }

    #[tokio::test]
    async fn bbox_selects_features() {
        let router = router(MemoryBackend::new());
        let (collection_id, _) = fixtures(&router).await;

        let response = send(
            &router,
            "GET",
            &format!("/collections/{}/items?bbox=9,9,11,11", collection_id),
            None,
        )
        .await;
        let body = body_json(response).await;
        assert_eq!(body["numberMatched"], 1);
        assert_eq!(body["features"][0]["properties"]["name"], "car1");

        let response = send(
            &router,
            "GET",
            &format!("/collections/{}/items?bbox=100,100,110,110", collection_id),
            None,
        )
        .await;
        let body = body_json(response).await;
        assert_eq!(body["numberMatched"], 0);
        assert_eq!(body["features"], json!([]));
    }

    #[tokio::test]
    async fn malformed_bbox_is_rejected() {
        let router = router(MemoryBackend::new());
        let (collection_id, _) = fixtures(&router).await;
        for bbox in ["0,0,10", "0,0,-1,-1", "a,b,c,d"] {
            let response = send(
                &router,
                "GET",
                &format!("/collections/{}/items?bbox={}", collection_id, bbox),
                None,
            )
            .await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "bbox={}", bbox);
            let body = body_json(response).await;
            assert_eq!(body["code"], "InvalidParameterValue");
        }
    }

    #[tokio::test]
    async fn sub_trajectory_clips_the_response() {
        let router = router(MemoryBackend::new());
        let (collection_id, _) = fixtures(&router).await;
        let response = send(
            &router,
            "GET",
            &format!(
                "/collections/{}/items?datetime=2011-07-14T22:30:00Z/2011-07-14T23:30:00Z&subTrajectory=true",
                collection_id
            ),
            None,
        )
        .await;
        let body = body_json(response).await;
        assert_eq!(body["numberReturned"], 1);
        let geometry = &body["features"][0]["temporalGeometry"];
        assert_eq!(geometry["datetimes"], json!(["2011-07-14T23:01:01Z"]));
        assert_eq!(geometry["coordinates"], json!([[10.0, 10.0]]));
    }

    #[tokio::test]
    async fn leaf_with_sub_trajectory_conflicts() {
        let router = router(MemoryBackend::new());
        let (collection_id, feature_id) = fixtures(&router).await;
        let response = send(
            &router,
            "GET",
            &format!(
                "/collections/{}/items/{}/tgsequence?leaf=2011-07-14T22:01:01Z&subTrajectory=true",
                collection_id, feature_id
            ),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn leaf_samples_the_trajectory() {
        let router = router(MemoryBackend::new());
        let (collection_id, feature_id) = fixtures(&router).await;
        let response = send(
            &router,
            "GET",
            &format!(
                "/collections/{}/items/{}/tgsequence?leaf=2011-07-14T22:01:01Z,2011-07-14T23:01:01Z",
                collection_id, feature_id
            ),
            None,
        )
        .await;
        let body = body_json(response).await;
        assert_eq!(body["numberReturned"], 1);
        assert_eq!(
            body["geometrySequence"][0]["datetimes"],
            json!(["2011-07-14T22:01:01Z", "2011-07-14T23:01:01Z"])
        );
    }

    #[tokio::test]
    async fn co_timestamped_sequences_share_a_group() {
        let router = router(MemoryBackend::new());
        let (collection_id, feature_id) = fixtures(&router).await;
        let response = send(
            &router,
            "POST",
            &format!(
                "/collections/{}/items/{}/tProperties",
                collection_id, feature_id
            ),
            Some(json!({
                "temporalProperties": [{
                    "datetimes": ["2011-07-14T22:01:01Z", "2011-07-14T23:01:01Z"],
                    "speed": {"values": [1.0, 2.0], "interpolation": "Linear"},
                    "state": {"values": ["walking", "running"], "interpolation": "Step"},
                }],
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = send(
            &router,
            "GET",
            &format!(
                "/collections/{}/items/{}/tProperties?subTemporalValue=true",
                collection_id, feature_id
            ),
            None,
        )
        .await;
        let body = body_json(response).await;
        assert_eq!(body["numberMatched"], 2);
        for summary in body["temporalProperties"].as_array().unwrap() {
            assert_eq!(summary["valueSequence"].as_array().unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn overlapping_value_sequence_is_rejected() {
        let router = router(MemoryBackend::new());
        let (collection_id, feature_id) = fixtures(&router).await;
        let base = format!(
            "/collections/{}/items/{}/tProperties",
            collection_id, feature_id
        );
        let response = send(
            &router,
            "POST",
            &base,
            Some(json!({
                "temporalProperties": [{
                    "datetimes": ["2011-07-14T22:01:01Z", "2011-07-14T23:01:01Z"],
                    "speed": {"values": [1.0, 2.0], "interpolation": "Linear"},
                }],
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = send(
            &router,
            "POST",
            &format!("{}/speed", base),
            Some(json!({
                "datetimes": ["2011-07-14T22:30:00Z", "2011-07-14T23:30:00Z"],
                "values": [3.0, 4.0],
                "interpolation": "Linear",
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = send(
            &router,
            "POST",
            &format!("{}/speed", base),
            Some(json!({
                "datetimes": ["2011-07-16T00:00:00Z", "2011-07-17T00:00:00Z"],
                "values": [5.0, 6.0],
                "interpolation": "Linear",
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn value_sequences_can_be_sampled_at_leaves() {
        let router = router(MemoryBackend::new());
        let (collection_id, feature_id) = fixtures(&router).await;
        let base = format!(
            "/collections/{}/items/{}/tProperties",
            collection_id, feature_id
        );
        let _ = send(
            &router,
            "POST",
            &base,
            Some(json!({
                "temporalProperties": [{
                    "datetimes": [
                        "2011-07-14T22:01:01Z",
                        "2011-07-14T23:01:01Z",
                        "2011-07-15T00:01:01Z",
                    ],
                    "speed": {"values": [1.0, 2.0, 3.0], "interpolation": "Linear"},
                }],
            })),
        )
        .await;
        let response = send(
            &router,
            "GET",
            &format!("{}/speed?leaf=2011-07-14T23:01:01Z", base),
            None,
        )
        .await;
        let body = body_json(response).await;
        assert_eq!(
            body["valueSequence"][0]["datetimes"],
            json!(["2011-07-14T23:01:01Z"])
        );
        assert_eq!(body["valueSequence"][0]["values"], json!([2.0]));
    }

    #[tokio::test]
    async fn pagination_covers_the_result_set() {
        let router = router(MemoryBackend::new());
        let (collection_id, _) = fixtures(&router).await;
        for _ in 0..4 {
            let response = send(
                &router,
                "POST",
                &format!("/collections/{}/items", collection_id),
                Some(feature_payload()),
            )
            .await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }
        let mut seen = Vec::new();
        let mut offset = 0;
        loop {
            let response = send(
                &router,
                "GET",
                &format!(
                    "/collections/{}/items?limit=2&offset={}",
                    collection_id, offset
                ),
                None,
            )
            .await;
            let body = body_json(response).await;
            assert_eq!(body["numberMatched"], 5);
            let returned = body["numberReturned"].as_u64().unwrap();
            assert!(returned <= 2);
            for feature in body["features"].as_array().unwrap() {
                seen.push(feature["id"].as_str().unwrap().to_string());
            }
            if returned < 2 {
                break;
            }
            offset += 2;
        }
        assert_eq!(seen.len(), 5);
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 5, "pages must not overlap");
    }

    #[tokio::test]
    async fn cascade_delete() {
        let router = router(MemoryBackend::new());
        let (collection_id, feature_id) = fixtures(&router).await;
        let response = send(
            &router,
            "DELETE",
            &format!("/collections/{}", collection_id),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(
            &router,
            "GET",
            &format!("/collections/{}/items/{}", collection_id, feature_id),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NotFound");
    }

    #[tokio::test]
    async fn update_collection_replaces_the_descriptor() {
        let router = router(MemoryBackend::new());
        let (collection_id, _) = fixtures(&router).await;
        let response = send(
            &router,
            "PUT",
            &format!("/collections/{}", collection_id),
            Some(json!({"title": "renamed"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let response = send(
            &router,
            "GET",
            &format!("/collections/{}", collection_id),
            None,
        )
        .await;
        let body = body_json(response).await;
        assert_eq!(body["title"], "renamed");
    }

    #[tokio::test]
    async fn delete_temporal_geometry() {
        let router = router(MemoryBackend::new());
        let (collection_id, feature_id) = fixtures(&router).await;
        let base = format!(
            "/collections/{}/items/{}/tgsequence",
            collection_id, feature_id
        );
        let response = send(&router, "GET", &base, None).await;
        let body = body_json(response).await;
        let tgeometry_id = body["geometrySequence"][0]["id"].as_str().unwrap().to_string();

        let response = send(
            &router,
            "DELETE",
            &format!("{}/{}", base, tgeometry_id),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&router, "GET", &base, None).await;
        let body = body_json(response).await;
        assert_eq!(body["numberMatched"], 0);
    }
}
