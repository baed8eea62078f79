//! Request dispatcher
//!
//! Maps HTTP requests onto repository calls without owning a transport. A
//! server adapter hands each request to [`Api::handle`] and writes back the
//! returned response; the body is JSON in every case.
//!
//! | Route | Operation |
//! |---|---|
//! | `POST /api/auth/register` | [`UserRepository::register`] |
//! | `POST /api/auth/login` | [`UserRepository::authenticate`] |
//! | `GET /api/tasks` | [`AuthorizationGate::require_admin`] then [`TaskRepository::list_all`] |
//! | `POST /api/tasks` | [`TaskRepository::create`] |
//! | `GET /api-docs.json` | [`openapi::document`] |

pub mod openapi;

use std::sync::Arc;

use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Method, Request, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::result::{Error, Result};
use crate::domain::{Task, User};
use crate::ports::RecordStore;
use crate::services::{AuthorizationGate, TaskRepository, UserRepository};

/// Header carrying the caller's user identifier, trusted verbatim
pub const CALLER_ID_HEADER: &str = "userid";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterPayload {
    username: Option<String>,
    password: Option<String>,
    #[serde(default)]
    is_admin: bool,
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    username: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateTaskPayload {
    title: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Register,
    Login,
    Tasks,
    ApiDocs,
}

impl Route {
    fn resolve(path: &str) -> Option<Self> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        match path {
            "/api/auth/register" => Some(Self::Register),
            "/api/auth/login" => Some(Self::Login),
            "/api/tasks" => Some(Self::Tasks),
            "/api-docs.json" => Some(Self::ApiDocs),
            _ => None,
        }
    }
}

/// Transport-free handler for the user and task routes
pub struct Api<U, T> {
    users: Arc<UserRepository<U>>,
    tasks: Arc<TaskRepository<T>>,
    gate: AuthorizationGate<U>,
}

impl<U, T> Api<U, T>
where
    U: RecordStore<User>,
    T: RecordStore<Task>,
{
    pub fn new(users: Arc<UserRepository<U>>, tasks: Arc<TaskRepository<T>>) -> Self {
        let gate = AuthorizationGate::new(Arc::clone(&users));
        Self { users, tasks, gate }
    }

    /// Handle one request
    ///
    /// Never fails: domain errors become 4xx responses and store faults
    /// become a 500 whose detail is logged, not returned.
    pub fn handle(&self, request: &Request<Vec<u8>>) -> Response<Value> {
        let method = request.method();
        let path = request.uri().path();

        let response = match Route::resolve(path) {
            None => message(StatusCode::NOT_FOUND, "Not found"),
            Some(route) => self
                .dispatch(route, request)
                .unwrap_or_else(error_response),
        };

        tracing::info!(
            method = %method,
            path,
            status = response.status().as_u16(),
            "handled request"
        );
        response
    }

    fn dispatch(&self, route: Route, request: &Request<Vec<u8>>) -> Result<Response<Value>> {
        match (route, request.method()) {
            (Route::Register, &Method::POST) => {
                let Some(payload) = parse_body::<RegisterPayload>(request.body()) else {
                    return Ok(invalid_body());
                };
                self.register(payload)
            }
            (Route::Login, &Method::POST) => {
                let Some(payload) = parse_body::<LoginPayload>(request.body()) else {
                    return Ok(invalid_body());
                };
                self.login(payload)
            }
            (Route::Tasks, &Method::GET) => self.list_tasks(caller_id(request)),
            (Route::Tasks, &Method::POST) => {
                let Some(payload) = parse_body::<CreateTaskPayload>(request.body()) else {
                    return Ok(invalid_body());
                };
                self.create_task(payload)
            }
            (Route::ApiDocs, &Method::GET) => {
                Ok(json_response(StatusCode::OK, openapi::document()))
            }
            _ => Ok(message(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")),
        }
    }

    fn register(&self, payload: RegisterPayload) -> Result<Response<Value>> {
        let (Some(username), Some(password)) = (payload.username, payload.password) else {
            return Err(Error::validation("Username and password are required"));
        };

        let user = self.users.register(&username, &password, payload.is_admin)?;
        Ok(json_response(
            StatusCode::CREATED,
            json!({
                "message": "User registered successfully",
                "user": user.profile(),
            }),
        ))
    }

    fn login(&self, payload: LoginPayload) -> Result<Response<Value>> {
        let (Some(username), Some(password)) = (payload.username, payload.password) else {
            return Err(Error::InvalidCredentials);
        };

        let user = self.users.authenticate(&username, &password)?;
        Ok(json_response(
            StatusCode::OK,
            json!({
                "message": "Login successful",
                "user": user.profile(),
            }),
        ))
    }

    fn list_tasks(&self, caller_id: Option<&str>) -> Result<Response<Value>> {
        self.gate.require_admin(caller_id)?;
        let tasks = self.tasks.list_all()?;
        Ok(json_response(StatusCode::OK, serde_json::to_value(tasks)?))
    }

    fn create_task(&self, payload: CreateTaskPayload) -> Result<Response<Value>> {
        let task = self.tasks.create(
            payload.title.as_deref().unwrap_or_default(),
            payload.description.as_deref().unwrap_or_default(),
        )?;
        Ok(json_response(
            StatusCode::CREATED,
            json!({
                "message": "Task created successfully",
                "task": task,
            }),
        ))
    }
}

fn caller_id<B>(request: &Request<B>) -> Option<&str> {
    request
        .headers()
        .get(CALLER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// Parse a JSON body; an empty body counts as `{}`
fn parse_body<P: DeserializeOwned>(body: &[u8]) -> Option<P> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_value(json!({})).ok();
    }
    serde_json::from_slice(body).ok()
}

fn json_response(status: StatusCode, body: Value) -> Response<Value> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn message(status: StatusCode, msg: &str) -> Response<Value> {
    json_response(status, json!({ "message": msg }))
}

fn invalid_body() -> Response<Value> {
    message(StatusCode::BAD_REQUEST, "Invalid JSON body")
}

fn error_response(err: Error) -> Response<Value> {
    match err {
        Error::DuplicateUsername(_) => message(StatusCode::BAD_REQUEST, "Username already exists"),
        Error::InvalidCredentials => message(StatusCode::UNAUTHORIZED, "Invalid credentials"),
        Error::AccessDenied => message(StatusCode::FORBIDDEN, "Access denied"),
        Error::Validation(msg) => message(StatusCode::BAD_REQUEST, &msg),
        other => {
            tracing::error!(error = %other, "request failed");
            message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;

    type TestApi = Api<MemoryStore<User>, MemoryStore<Task>>;

    fn api() -> TestApi {
        api_with_tasks(TaskRepository::new(Arc::new(MemoryStore::new())))
    }

    fn api_with_tasks(tasks: TaskRepository<MemoryStore<Task>>) -> TestApi {
        let users = Arc::new(UserRepository::new(Arc::new(MemoryStore::new())));
        Api::new(users, Arc::new(tasks))
    }

    fn request(method: Method, path: &str, caller: Option<&str>, body: &str) -> Request<Vec<u8>> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(id) = caller {
            builder = builder.header(CALLER_ID_HEADER, id);
        }
        builder.body(body.as_bytes().to_vec()).unwrap()
    }

    fn register(api: &TestApi, username: &str, password: &str, is_admin: bool) -> Response<Value> {
        let body = json!({"username": username, "password": password, "isAdmin": is_admin});
        api.handle(&request(
            Method::POST,
            "/api/auth/register",
            None,
            &body.to_string(),
        ))
    }

    #[test]
    fn test_register_returns_profile_without_password() {
        let api = api();
        let response = register(&api, "alice", "p1", false);

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        let body = response.body();
        assert_eq!(body["message"], "User registered successfully");
        assert_eq!(body["user"]["username"], "alice");
        assert_eq!(body["user"]["isAdmin"], false);
        assert!(body["user"]["id"].is_string());
        assert!(body["user"].get("password").is_none());
    }

    #[test]
    fn test_is_admin_defaults_to_false() {
        let api = api();
        let response = api.handle(&request(
            Method::POST,
            "/api/auth/register",
            None,
            r#"{"username":"bob","password":"pw"}"#,
        ));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.body()["user"]["isAdmin"], false);
    }

    #[test]
    fn test_register_duplicate() {
        let api = api();
        register(&api, "alice", "p1", false);
        let response = register(&api, "alice", "p2", true);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.body()["message"], "Username already exists");
    }

    #[test]
    fn test_register_requires_fields() {
        let api = api();
        let response = api.handle(&request(
            Method::POST,
            "/api/auth/register",
            None,
            r#"{"username":"alice"}"#,
        ));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.body()["message"],
            "Username and password are required"
        );
    }

    #[test]
    fn test_login() {
        let api = api();
        let id = register(&api, "alice", "p1", false).body()["user"]["id"].clone();

        let wrong = api.handle(&request(
            Method::POST,
            "/api/auth/login",
            None,
            r#"{"username":"alice","password":"wrong"}"#,
        ));
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.body()["message"], "Invalid credentials");

        let ok = api.handle(&request(
            Method::POST,
            "/api/auth/login",
            None,
            r#"{"username":"alice","password":"p1"}"#,
        ));
        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(ok.body()["message"], "Login successful");
        assert_eq!(ok.body()["user"]["id"], id);
        assert!(ok.body()["user"].get("password").is_none());
    }

    #[test]
    fn test_login_with_empty_body_is_unauthorized() {
        let api = api();
        let response = api.handle(&request(Method::POST, "/api/auth/login", None, ""));
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_list_tasks_requires_admin() {
        let api = api();
        let admin = register(&api, "root", "pw", true).body()["user"]["id"]
            .as_str()
            .unwrap()
            .to_string();
        let user = register(&api, "alice", "pw", false).body()["user"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let anonymous = api.handle(&request(Method::GET, "/api/tasks", None, ""));
        assert_eq!(anonymous.status(), StatusCode::FORBIDDEN);
        assert_eq!(anonymous.body()["message"], "Access denied");

        let unknown = api.handle(&request(Method::GET, "/api/tasks", Some("ghost"), ""));
        assert_eq!(unknown.status(), StatusCode::FORBIDDEN);

        let plain = api.handle(&request(Method::GET, "/api/tasks", Some(&user), ""));
        assert_eq!(plain.status(), StatusCode::FORBIDDEN);

        let allowed = api.handle(&request(Method::GET, "/api/tasks", Some(&admin), ""));
        assert_eq!(allowed.status(), StatusCode::OK);
        assert_eq!(allowed.body(), &json!([]));
    }

    #[test]
    fn test_create_task_then_list() {
        let api = api();
        let admin = register(&api, "root", "pw", true).body()["user"]["id"]
            .as_str()
            .unwrap()
            .to_string();

        let created = api.handle(&request(
            Method::POST,
            "/api/tasks",
            None,
            r#"{"title":"T","description":"D"}"#,
        ));
        assert_eq!(created.status(), StatusCode::CREATED);
        assert_eq!(created.body()["message"], "Task created successfully");
        let task = created.body()["task"].clone();
        assert_eq!(task["title"], "T");
        assert_eq!(task["assignedTo"], Value::Null);

        let listed = api.handle(&request(Method::GET, "/api/tasks/", Some(&admin), ""));
        assert_eq!(listed.body(), &json!([task]));
    }

    #[test]
    fn test_create_task_title_required_when_configured() {
        let api = api_with_tasks(
            TaskRepository::new(Arc::new(MemoryStore::new())).with_required_title(true),
        );
        let response = api.handle(&request(
            Method::POST,
            "/api/tasks",
            None,
            r#"{"description":"D"}"#,
        ));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.body()["message"], "Title is required");
    }

    #[test]
    fn test_malformed_body() {
        let api = api();
        let response = api.handle(&request(Method::POST, "/api/tasks", None, "{title"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.body()["message"], "Invalid JSON body");
    }

    #[test]
    fn test_unknown_route_and_method() {
        let api = api();
        assert_eq!(
            api.handle(&request(Method::GET, "/api/nope", None, "")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            api.handle(&request(Method::DELETE, "/api/tasks", None, "")).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            api.handle(&request(Method::GET, "/api/auth/login", None, "")).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn test_api_docs() {
        let api = api();
        let response = api.handle(&request(Method::GET, "/api-docs.json", None, ""));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body()["openapi"], "3.0.0");
    }

    #[test]
    fn test_route_resolution() {
        assert_eq!(Route::resolve("/api/tasks"), Some(Route::Tasks));
        assert_eq!(Route::resolve("/api/tasks/"), Some(Route::Tasks));
        assert_eq!(Route::resolve("/"), None);
        assert_eq!(Route::resolve("/api/auth"), None);
    }
}
