//! Servidor web Axum para o pipeline de anotação: HTTP para análises avulsas e
//! WebSocket para receber as sentenças uma a uma.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::JsonRejection,
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use textparse_core::{Error, ParseMode, ParseResult, ParserConfig, ResourceConfig, TextParser};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Um `TextParser` resolvido por modo, na inicialização.
struct AppState {
    parsers: HashMap<ParseMode, TextParser>,
}

impl AppState {
    fn load(resources: &ResourceConfig) -> textparse_core::Result<Self> {
        let parsers = ParseMode::all()
            .into_iter()
            .map(|mode| {
                let mut config = ParserConfig::new(mode);
                config.resources = resources.clone();
                TextParser::new(config).map(|parser| (mode, parser))
            })
            .collect::<textparse_core::Result<HashMap<_, _>>>()?;
        Ok(Self { parsers })
    }

    fn parser(&self, mode: ParseMode) -> Option<&TextParser> {
        self.parsers.get(&mode)
    }

    /// Análise síncrona: chamar dentro de `spawn_blocking`.
    fn parse(&self, text: &str, mode: ParseMode) -> textparse_core::Result<ParseResult> {
        let parser = self
            .parser(mode)
            .ok_or_else(|| Error::invalid_input(format!("modo '{mode}' não carregado")))?;
        parser.parse(text)
    }
}

#[derive(Deserialize)]
struct ParseRequest {
    text: String,
    /// Nome do modo (`parse`, `tag` ou `tokenize`); ausente usa `parse`.
    #[serde(default)]
    mode: Option<String>,
}

impl ParseRequest {
    fn mode(&self) -> textparse_core::Result<ParseMode> {
        self.mode
            .as_deref()
            .map_or(Ok(ParseMode::default()), |name| name.parse())
    }
}

/// Mensagem do WebSocket: JSON `{text, mode}` ou texto puro no modo padrão.
fn ws_request(message: String) -> textparse_core::Result<(String, ParseMode)> {
    match serde_json::from_str::<ParseRequest>(&message) {
        Ok(req) => {
            let mode = req.mode()?;
            Ok((req.text, mode))
        }
        Err(_) => Ok((message, ParseMode::default())),
    }
}

/// Mensagens enviadas pelo WebSocket.
#[derive(Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
enum WsEvent<'a> {
    Sentence {
        index: usize,
        record: &'a textparse_core::SentenceRecord,
    },
    Done {
        sentences: usize,
        tokens: usize,
    },
    Error {
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let resources = ResourceConfig::from_env();
    let state = match AppState::load(&resources) {
        Ok(state) => Arc::new(state),
        Err(err) => {
            error!("Falha ao carregar o pipeline: {}", err);
            return Err(err.into());
        }
    };

    let addr = std::env::var("TEXTPARSE_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Servidor de anotação iniciado em http://{}", addr);
    axum::serve(listener, app(state)).await?;
    Ok(())
}

fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/modes", get(modes_handler))
        .route("/parse", post(parse_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(state)
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// Modos disponíveis e os estágios do backend de cada um.
async fn modes_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let modes: Vec<serde_json::Value> = ParseMode::all()
        .into_iter()
        .filter_map(|mode| state.parser(mode).map(|p| (mode, p)))
        .map(|(mode, parser)| {
            serde_json::json!({
                "mode": mode,
                "stages": parser.aux_input().backend().capabilities().pipe_names(),
            })
        })
        .collect();
    Json(modes)
}

fn error_response(err: Error) -> Response {
    let status = match err {
        Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({"error": err.to_string()}))).into_response()
}

/// Análise via HTTP POST: devolve o array de sentenças.
async fn parse_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ParseRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return error_response(Error::invalid_input(rejection.body_text())),
    };
    let mode = match req.mode() {
        Ok(mode) => mode,
        Err(err) => return error_response(err),
    };
    if req.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "Texto vazio"})),
        )
            .into_response();
    }

    // A análise é síncrona: roda fora das threads do runtime
    let joined = tokio::task::spawn_blocking(move || state.parse(&req.text, mode)).await;
    match joined {
        Ok(Ok(result)) => Json(result).into_response(),
        Ok(Err(err)) => error_response(err),
        Err(join_err) => {
            error!("Tarefa de análise abortada: {}", join_err);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(serde_json::json!({"error": "análise abortada"})))
                .into_response()
        }
    }
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Recebe textos (JSON `{text, mode}` ou texto puro) e envia cada sentença
/// analisada numa mensagem própria, seguida de um resumo.
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                let (text, mode) = match ws_request(text) {
                    Ok(request) => request,
                    Err(err) => {
                        let event = WsEvent::Error {
                            message: err.to_string(),
                        };
                        if let Ok(json) = serde_json::to_string(&event) {
                            if socket.send(Message::Text(json)).await.is_err() {
                                return;
                            }
                        }
                        continue;
                    }
                };
                if text.trim().is_empty() {
                    continue;
                }
                info!("Analisando via WebSocket [{}]: {} chars", mode, text.len());

                let worker = Arc::clone(&state);
                let outcome = tokio::task::spawn_blocking(move || worker.parse(&text, mode)).await;
                let result = match outcome {
                    Ok(result) => result,
                    Err(join_err) => {
                        error!("Tarefa de análise abortada: {}", join_err);
                        return;
                    }
                };

                let events: Vec<String> = match &result {
                    Ok(parsed) => parsed
                        .iter()
                        .enumerate()
                        .map(|(index, record)| WsEvent::Sentence { index, record })
                        .chain(std::iter::once(WsEvent::Done {
                            sentences: parsed.len(),
                            tokens: parsed.token_count(),
                        }))
                        .filter_map(|event| serde_json::to_string(&event).ok())
                        .collect(),
                    Err(err) => serde_json::to_string(&WsEvent::Error {
                        message: err.to_string(),
                    })
                    .into_iter()
                    .collect(),
                };

                for event in events {
                    if socket.send(Message::Text(event)).await.is_err() {
                        return; // cliente desconectou
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_app() -> Router {
        app(Arc::new(AppState::load(&ResourceConfig::default()).unwrap()))
    }

    async fn post_json(body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = test_app()
            .oneshot(
                Request::post("/parse")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_parse_endpoint_tokenize_mode() {
        let (status, body) = post_json(serde_json::json!({
            "text": "Hi there. How are you?",
            "mode": "tokenize"
        }))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["toks"][0], serde_json::json!({"tok": "Hi"}));
    }

    #[tokio::test]
    async fn test_parse_endpoint_defaults_to_full_parse() {
        let (status, body) = post_json(serde_json::json!({"text": "The cat sat."})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["rt"], serde_json::json!(2));
    }

    #[tokio::test]
    async fn test_empty_text_is_bad_request() {
        let (status, body) = post_json(serde_json::json!({"text": "   "})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_unknown_mode_is_bad_request() {
        let (status, body) = post_json(serde_json::json!({"text": "Hi.", "mode": "lemmatize"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("lemmatize"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (status, body) = post_json(serde_json::json!({"mode": "tag"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[test]
    fn test_ws_request_modes() {
        let (text, mode) = ws_request(r#"{"text": "Hi.", "mode": "tokenize"}"#.to_string()).unwrap();
        assert_eq!((text.as_str(), mode), ("Hi.", ParseMode::TokenizeOnly));

        let (text, mode) = ws_request("Hi there.".to_string()).unwrap();
        assert_eq!((text.as_str(), mode), ("Hi there.", ParseMode::FullParse));

        let err = ws_request(r#"{"text": "Hi.", "mode": "lemmatize"}"#.to_string());
        assert!(matches!(err, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
