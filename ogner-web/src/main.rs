//! Servidor web Axum com WebSocket para o reconhecimento de entidades em tempo real
//!
//! ## Rotas
//! - `POST /ner`: documento anotado → entidades por categoria.
//! - `POST /keywords`: documento anotado → palavras-chave.
//! - `GET /ws`: cada mensagem é um documento anotado; a resposta é o fluxo
//!   de [`PipelineEvent`]s do pipeline.
//!
//! ## Subcomandos em lote
//! Sem subcomando o binário sobe o servidor. Os subcomandos executam as
//! etapas offline que produzem o dicionário de palavras-chave:
//! `prepare` (arquivos brutos → textos), `corpus` (documentos anotados →
//! docword/vocab) e `keywords` (tabela de tópicos → lista de palavras-chave).

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use clap::{Parser, Subcommand};
use ogner_core::batch;
use ogner_core::{
    AnnotatedDocument, EngineConfig, KeywordBatch, KeywordConfig, KeywordTokenizer, NamedEntities,
    NerPipeline, OilAndGasPreprocessor, PhraseDictionary, PipelineEvent,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Opções de linha de comando.
#[derive(Parser, Debug)]
#[command(name = "ogner-web", version, about = "Serviço de NER de equipamentos e palavras-chave")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Endereço de escuta.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Porta de escuta.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Arquivo JSON de configuração do motor.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Dicionário de palavras-chave (uma por linha); substitui o da configuração.
    #[arg(short = 'd', long)]
    keywords_dictionary: Option<PathBuf>,

    /// Não extrai sintagmas nominais como palavras-chave.
    #[arg(long, global = true)]
    no_noun_phrases: bool,

    /// Extrai os verbos raiz como palavras-chave.
    #[arg(long, global = true)]
    root_verbs: bool,

    /// Número de tópicos esperado na tabela do treinador.
    #[arg(long, global = true)]
    topics: Option<usize>,

    /// Probabilidade mínima para uma palavra virar palavra-chave.
    #[arg(long, global = true)]
    probability: Option<f64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Divide arquivos brutos em textos limpos (lista JSON) para o anotador.
    Prepare {
        /// Arquivos de origem, na ordem de leitura.
        #[arg(required = true)]
        sources: Vec<PathBuf>,
        /// Arquivo JSON de saída.
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Gera `docword.<nome>.txt` e `vocab.<nome>.txt` a partir de documentos anotados.
    Corpus {
        /// Lista JSON de documentos anotados.
        documents: PathBuf,
        /// Diretório de saída.
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
        /// Nome do corpus nos arquivos gerados.
        #[arg(short, long, default_value = "ogner")]
        name: String,
    },
    /// Seleciona as palavras-chave de uma tabela tópico × palavra (JSON).
    Keywords {
        /// Tabela produzida pelo treinador de tópicos.
        table: PathBuf,
        /// Lista de saída, uma palavra-chave por linha.
        #[arg(short, long)]
        output: PathBuf,
    },
}

impl Args {
    /// Configuração final: arquivo (ou padrões) com as opções da linha de comando por cima.
    fn engine_config(&self) -> ogner_core::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::from_file(path)?,
            None => EngineConfig::default(),
        };
        if let Some(path) = &self.keywords_dictionary {
            config.keywords_dictionary = Some(path.clone());
        }
        if self.no_noun_phrases {
            config.keywords.extract_noun_phrases = false;
        }
        if self.root_verbs {
            config.keywords.extract_root_verbs = true;
        }
        if let Some(topics) = self.topics {
            config.topics.number_of_topics = topics;
        }
        if let Some(probability) = self.probability {
            config.topics.probability_threshold = probability;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Estado compartilhado da aplicação
struct AppState {
    pipeline: NerPipeline,
    keywords: KeywordTokenizer,
}

impl AppState {
    /// Carrega o dicionário (se configurado) antes de aceitar conexões.
    fn from_config(config: &EngineConfig) -> ogner_core::Result<Self> {
        let pipeline = match &config.keywords_dictionary {
            Some(path) => NerPipeline::with_dictionary(PhraseDictionary::from_file(path)?),
            None => NerPipeline::new(),
        };
        Ok(Self {
            pipeline,
            keywords: KeywordTokenizer::new(config.keywords),
        })
    }
}

#[derive(Serialize, Deserialize)]
struct NerResponse {
    text: String,
    named_entities: NamedEntities,
}

#[derive(Deserialize)]
struct KeywordsRequest {
    #[serde(flatten)]
    document: AnnotatedDocument,
    #[serde(default)]
    extract_noun_phrases: Option<bool>,
    #[serde(default)]
    extract_root_verbs: Option<bool>,
}

#[derive(Serialize, Deserialize)]
struct KeywordsResponse {
    tokens: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = args.engine_config()?;
    if let Some(command) = &args.command {
        run_command(command, config)?;
        return Ok(());
    }
    let state = Arc::new(AppState::from_config(&config)?);

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port)).await?;
    info!("🚀 Servidor NER iniciado em http://{}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}

/// Executa um subcomando em lote. `KeywordBatch::new` valida a configuração antes de ler a entrada.
fn run_command(command: &Command, config: EngineConfig) -> ogner_core::Result<()> {
    match command {
        Command::Prepare { sources, output } => {
            let texts = batch::prepare_texts(&OilAndGasPreprocessor::new(), sources)?;
            std::fs::write(output, serde_json::to_string_pretty(&texts)?)?;
            info!("{} textos gravados em `{}`", texts.len(), output.display());
        }
        Command::Corpus { documents, output_dir, name } => {
            let job = KeywordBatch::new(config)?;
            let docs = batch::read_documents(documents)?;
            let corpus = job.build_corpus(&docs);
            job.write_corpus(&corpus, output_dir, name)?;
        }
        Command::Keywords { table, output } => {
            let job = KeywordBatch::new(config)?;
            let table = batch::read_topic_table(table)?;
            let keywords = job.select_keywords(&table)?;
            batch::write_keywords(&keywords, output)?;
        }
    }
    Ok(())
}

fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ner", post(ner_handler))
        .route("/keywords", post(keywords_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(state)
}

/// Reconhecimento via HTTP POST (sem streaming)
async fn ner_handler(
    State(state): State<Arc<AppState>>,
    Json(doc): Json<AnnotatedDocument>,
) -> impl IntoResponse {
    let named_entities = state.pipeline.recognize(&doc);
    Json(NerResponse {
        text: doc.text,
        named_entities,
    })
}

/// Palavras-chave de um documento; as flags do pedido substituem as do servidor.
async fn keywords_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<KeywordsRequest>,
) -> impl IntoResponse {
    let defaults = state.keywords.config;
    let tokenizer = KeywordTokenizer::new(KeywordConfig {
        extract_noun_phrases: req.extract_noun_phrases.unwrap_or(defaults.extract_noun_phrases),
        extract_root_verbs: req.extract_root_verbs.unwrap_or(defaults.extract_root_verbs),
    });
    Json(KeywordsResponse {
        tokens: tokenizer.tokenize(&req.document),
    })
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Lógica do WebSocket: recebe documentos, executa o pipeline e envia os eventos
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                let doc = match serde_json::from_str::<AnnotatedDocument>(&text) {
                    Ok(doc) => doc,
                    Err(e) => {
                        warn!("Documento inválido via WebSocket: {e}");
                        let error = serde_json::json!({ "error": e.to_string() }).to_string();
                        if socket.send(Message::Text(error)).await.is_err() {
                            return;
                        }
                        continue;
                    }
                };

                info!("Analisando via WebSocket: {} tokens", doc.tokens.len());

                // O pipeline é síncrono: roda fora do runtime
                let (tx, rx) = std::sync::mpsc::channel::<PipelineEvent>();
                let state_for_thread = Arc::clone(&state);
                let handle = tokio::task::spawn_blocking(move || {
                    state_for_thread.pipeline.recognize_streaming(&doc, tx);
                });
                handle.await.ok();

                let events: Vec<PipelineEvent> = rx.try_iter().collect();
                for event in &events {
                    if let Ok(json) = serde_json::to_string(event) {
                        if socket.send(Message::Text(json)).await.is_err() {
                            return; // cliente desconectou
                        }
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
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app(keywords: KeywordConfig) -> Router {
        app(Arc::new(AppState {
            pipeline: NerPipeline::new(),
            keywords: KeywordTokenizer::new(keywords),
        }))
    }

    async fn post_json(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn token(index: usize, text: &str, pos: &str, idx: usize) -> Value {
        json!({
            "index": index, "text": text, "norm": text.to_lowercase(), "pos": pos,
            "left_edge": index, "right_edge": index, "idx": idx
        })
    }

    /// "The Quick Pump runs fast", com "Quick Pump" como noun chunk.
    fn quick_pump() -> Value {
        let mut tokens = vec![
            token(0, "The", "DET", 0),
            token(1, "Quick", "ADJ", 4),
            token(2, "Pump", "NOUN", 10),
            token(3, "runs", "VERB", 15),
            token(4, "fast", "ADV", 20),
        ];
        tokens[0]["is_stop"] = json!(true);
        tokens[3]["dep"] = json!("ROOT");
        tokens[3]["norm"] = json!("run");
        json!({
            "text": "The Quick Pump runs fast",
            "tokens": tokens,
            "noun_chunks": [{"start": 1, "end": 3}]
        })
    }

    #[tokio::test]
    async fn test_ner_route() {
        let mut acme = token(0, "Acme", "PROPN", 0);
        acme["ent_iob"] = json!("B");
        acme["ent_type"] = json!("ORG");
        let mut pump = token(1, "Pump", "PROPN", 5);
        pump["ent_iob"] = json!("I");
        pump["ent_type"] = json!("ORG");
        let doc = json!({ "text": "Acme Pump", "tokens": [acme, pump] });

        let (status, body) = post_json(test_app(KeywordConfig::default()), "/ner", doc.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "Acme Pump");
        assert_eq!(body["named_entities"]["equipment"], json!([[0, 9]]));
        assert_eq!(body["named_entities"]["operations"], json!([]));
    }

    #[tokio::test]
    async fn test_ner_route_empty_document() {
        let (status, body) = post_json(test_app(KeywordConfig::default()), "/ner", r#"{"tokens": []}"#.into()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["named_entities"]["property_values"], json!([]));
    }

    #[tokio::test]
    async fn test_keywords_route_uses_server_defaults() {
        let (status, body) =
            post_json(test_app(KeywordConfig::default()), "/keywords", quick_pump().to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tokens"], json!(["quick_pump"]));
    }

    #[tokio::test]
    async fn test_keywords_route_request_overrides() {
        let mut request = quick_pump();
        request["extract_root_verbs"] = json!(true);
        let (_, body) = post_json(test_app(KeywordConfig::default()), "/keywords", request.to_string()).await;
        assert_eq!(body["tokens"], json!(["quick_pump", "run"]));
    }

    #[tokio::test]
    async fn test_malformed_document_is_rejected() {
        let (status, _) = post_json(test_app(KeywordConfig::default()), "/ner", "{".into()).await;
        assert!(status.is_client_error());
    }

    #[test]
    fn test_args_override_config() {
        let args = Args::try_parse_from([
            "ogner-web",
            "--port",
            "8080",
            "--no-noun-phrases",
            "--root-verbs",
            "-d",
            "keywords.txt",
        ])
        .unwrap();
        assert_eq!(args.port, 8080);
        let config = args.engine_config().unwrap();
        assert!(!config.keywords.extract_noun_phrases);
        assert!(config.keywords.extract_root_verbs);
        assert_eq!(config.keywords_dictionary, Some(PathBuf::from("keywords.txt")));
    }

    #[test]
    fn test_topic_overrides_are_validated() {
        let args = Args::try_parse_from(["ogner-web", "--topics", "20", "--probability", "0.05"]).unwrap();
        let config = args.engine_config().unwrap();
        assert_eq!(config.topics.number_of_topics, 20);
        assert_eq!(config.topics.probability_threshold, 0.05);

        let args = Args::try_parse_from(["ogner-web", "--probability", "1.5"]).unwrap();
        assert!(matches!(args.engine_config(), Err(ogner_core::Error::InvalidConfig(_))));
    }

    #[test]
    fn test_subcommand_parsing() {
        let args = Args::try_parse_from(["ogner-web", "corpus", "docs.json", "-o", "out", "--root-verbs"]).unwrap();
        assert!(args.root_verbs);
        match args.command {
            Some(Command::Corpus { documents, output_dir, name }) => {
                assert_eq!(documents, PathBuf::from("docs.json"));
                assert_eq!(output_dir, PathBuf::from("out"));
                assert_eq!(name, "ogner");
            }
            other => panic!("subcomando inesperado: {other:?}"),
        }
        assert!(Args::try_parse_from(["ogner-web", "prepare", "-o", "texts.json"]).is_err());
        assert!(Args::try_parse_from(["ogner-web"]).unwrap().command.is_none());
    }

    #[test]
    fn test_corpus_then_keywords_commands() {
        let dir = std::env::temp_dir().join(format!("ogner-web-batch-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let docs_path = dir.join("docs.json");
        std::fs::write(&docs_path, json!([quick_pump(), quick_pump()]).to_string()).unwrap();

        let corpus = Command::Corpus {
            documents: docs_path,
            output_dir: dir.clone(),
            name: "rigs".into(),
        };
        run_command(&corpus, EngineConfig::default()).unwrap();
        let docword = std::fs::read_to_string(dir.join("docword.rigs.txt")).unwrap();
        let vocab = std::fs::read_to_string(dir.join("vocab.rigs.txt")).unwrap();

        let table_path = dir.join("topics.json");
        let table = json!({
            "vocabulary": ["quick_pump", "rig"],
            "topics": [[0.6, 0.01], [0.2, 0.05]]
        });
        std::fs::write(&table_path, table.to_string()).unwrap();
        let keywords_path = dir.join("keywords.txt");
        let keywords = Command::Keywords { table: table_path, output: keywords_path.clone() };
        let config = Args::try_parse_from(["ogner-web", "--topics", "2", "--probability", "0.1"])
            .unwrap()
            .engine_config()
            .unwrap();
        run_command(&keywords, config).unwrap();
        let list = std::fs::read_to_string(&keywords_path).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(docword, "2\n1\n2\n1 1 1\n2 1 1\n");
        assert_eq!(vocab, "quick_pump\n");
        assert_eq!(list, "quick pump\n");
    }

    #[test]
    fn test_commands_reject_invalid_config() {
        let config = EngineConfig {
            topics: ogner_core::TopicConfig { number_of_topics: 0, ..Default::default() },
            ..EngineConfig::default()
        };
        let command = Command::Corpus {
            documents: PathBuf::from("/nonexistent/docs.json"),
            output_dir: PathBuf::from("/nonexistent"),
            name: "x".into(),
        };
        assert!(matches!(run_command(&command, config), Err(ogner_core::Error::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_dictionary_is_fatal() {
        let config = EngineConfig {
            keywords_dictionary: Some(PathBuf::from("/nonexistent/keywords.txt")),
            ..EngineConfig::default()
        };
        assert!(AppState::from_config(&config).is_err());
    }
}
