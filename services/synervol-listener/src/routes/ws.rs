use actix::{Actor, ActorContext, ActorFutureExt, AsyncContext, StreamHandler};
use actix_web::{get, web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use std::time::{Duration, Instant};
use synervol_core::SessionId;

use crate::mission::{handle_text, Reply};
use crate::state::AppState;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(15);

pub struct MissionWsSession {
    session_id: SessionId,
    state: web::Data<AppState>,
    last_heartbeat: Instant,
}

impl MissionWsSession {
    pub fn new(state: web::Data<AppState>) -> Self {
        Self {
            session_id: SessionId::new(),
            state,
            last_heartbeat: Instant::now(),
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                tracing::debug!(session_id = %actor.session_id, "websocket client timed out");
                ctx.stop();
                return;
            }
            ctx.ping(b"ping");
        });
    }
}

impl Actor for MissionWsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        tracing::debug!(session_id = %self.session_id, "websocket session opened");
        ctx.text(Reply::hello().to_text());
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        tracing::debug!(session_id = %self.session_id, "websocket session closed");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for MissionWsSession {
    fn handle(&mut self, item: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match item {
            Ok(ws::Message::Ping(message)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&message);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                let state = self.state.clone();
                let session_id = self.session_id;
                let text = text.to_string();
                let fut = async move { handle_text(&state, session_id, &text).await };
                // One mission at a time per session, so replies keep frame order.
                ctx.wait(actix::fut::wrap_future(fut).map(
                    |reply: Reply, _actor, ctx: &mut ws::WebsocketContext<MissionWsSession>| {
                        ctx.text(reply.to_text());
                    },
                ));
            }
            Ok(ws::Message::Binary(_)) => {
                let reply = Reply::error("binary_not_supported", None);
                ctx.text(reply.to_text());
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Err(err) => {
                tracing::warn!(
                    session_id = %self.session_id,
                    error = %err,
                    "websocket protocol error"
                );
                ctx.stop();
            }
            _ => {
                ctx.stop();
            }
        }
    }
}

#[get("/")]
pub async fn ws_route(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    ws::start(MissionWsSession::new(state), &req, stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::LogSink;
    use actix_web::App;
    use futures_util::{SinkExt, Stream, StreamExt};
    use std::sync::Arc;
    use synervol_config::ServiceConfig;
    use synervol_core::ScanType;
    use synervol_geo::{GeoPoint, ShapeKind, ShapeParameters};
    use synervol_mission::{MissionDispatcher, Selection};
    use tokio_tungstenite::connect_async;
    use tokio_tungstenite::tungstenite::{self, Message};

    fn start_listener() -> (actix_test::TestServer, web::Data<AppState>) {
        let config = ServiceConfig::from_env("synervol-listener");
        let state = web::Data::new(AppState::new(config, Arc::new(LogSink)));
        let app_state = state.clone();
        let server = actix_test::start(move || {
            App::new()
                .app_data(app_state.clone())
                .configure(crate::routes::configure)
        });
        (server, state)
    }

    async fn next_text<S>(socket: &mut S) -> String
    where
        S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
    {
        loop {
            match socket.next().await {
                Some(Ok(Message::Text(text))) => return text.as_str().to_string(),
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                other => panic!("expected a text frame, got {other:?}"),
            }
        }
    }

    #[actix_web::test]
    async fn dispatcher_mission_is_accepted_by_the_listener() {
        let (server, state) = start_listener();
        let endpoint = format!("ws://{}/", server.addr());
        let dispatcher = MissionDispatcher::websocket(endpoint, Duration::from_secs(5));

        let outcome = dispatcher
            .dispatch(Selection {
                center: Some(GeoPoint::new(48.8566, 2.3522).unwrap()),
                scan_type: ScanType::Square,
                shape_kind: ShapeKind::Square,
                shape_parameters: ShapeParameters::square(100.0, 15.0),
            })
            .outcome()
            .await;
        assert!(outcome.is_sent(), "{outcome:?}");

        for _ in 0..100 {
            if state.stats.accepted() == 1 {
                break;
            }
            actix_web::rt::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(state.stats.accepted(), 1);
        assert_eq!(state.stats.rejected(), 0);
        let last = state.last_mission().unwrap();
        assert_eq!(last.command.scan_type, ScanType::Square);
        assert_eq!(last.command.dimensions.value(), 100.0);
    }

    #[actix_web::test]
    async fn session_greets_rejects_binary_and_acks_missions() {
        let (server, state) = start_listener();
        let (mut socket, _response) = connect_async(format!("ws://{}/", server.addr()))
            .await
            .unwrap();

        assert_eq!(next_text(&mut socket).await, r#"{"type":"hello","version":"1.0"}"#);

        socket.send(Message::binary(vec![1, 2, 3])).await.unwrap();
        assert_eq!(
            next_text(&mut socket).await,
            r#"{"type":"error","reason":"binary_not_supported"}"#
        );

        socket
            .send(Message::text(
                r#"{"type":"mission","api_version":"1.0","coordinates":{"lat":1,"lng":2},"scan_type":"circle","dimensions":{"radius":50}}"#,
            ))
            .await
            .unwrap();
        assert_eq!(next_text(&mut socket).await, r#"{"type":"ok"}"#);

        socket.send(Message::text("{}")).await.unwrap();
        assert!(next_text(&mut socket).await.contains(r#""reason":"invalid_json""#));

        socket.close(None).await.unwrap();
        assert_eq!(state.stats.accepted(), 1);
        assert_eq!(state.stats.rejected(), 1);
    }
}
