/*!
 * 课程聊天室 WebSocket 服务
 *
 * 每门课程对应一个广播组 `chat_{course_id}`，连接建立时加入，断开时退出，
 * 组内没有订阅者时移除。
 *
 * ## 连接
 *
 * ```text
 * ws://host/ws/chat/room/{course_id}?token=<access_token>
 * ```
 *
 * ## 消息格式
 *
 * ### 客户端发送
 * ```json
 * {"message": "大家好"}
 * ```
 *
 * ### 服务端广播
 * ```json
 * {
 *     "type": "chat_message",
 *     "message": "大家好",
 *     "user": "alice",
 *     "datetime": "2026-01-24T12:00:00.000Z"
 * }
 * ```
 *
 * ### 心跳
 * ```json
 * {"type": "ping"}
 * {"type": "pong"}
 * ```
 */

use actix_ws::Message;
use chrono::{SecondsFormat, Utc};
use dashmap::DashMap;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::models::users::entities::User;
use crate::storage::Storage;

/// 服务端发出的消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    ChatMessage {
        message: String,
        user: String,
        datetime: String,
    },
    Pong,
}

/// 客户端消息，两种字段都可能缺省
#[derive(Debug, Default, Deserialize)]
struct ClientFrame {
    #[serde(rename = "type")]
    kind: Option<String>,
    message: Option<String>,
}

#[derive(Debug, PartialEq)]
enum ClientCommand {
    Ping,
    Say(String),
}

/// 解析客户端文本帧；无法识别或内容为空时返回 None
fn parse_client_frame(text: &str) -> Option<ClientCommand> {
    let frame: ClientFrame = serde_json::from_str(text).ok()?;
    if frame.kind.as_deref() == Some("ping") {
        return Some(ClientCommand::Ping);
    }
    frame
        .message
        .filter(|m| !m.trim().is_empty())
        .map(ClientCommand::Say)
}

/// 课程广播组管理器
pub struct ChatRoomManager {
    /// 课程 ID -> 广播发送器
    rooms: DashMap<i64, broadcast::Sender<String>>,
    capacity: usize,
}

impl ChatRoomManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            rooms: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn group_name(course_id: i64) -> String {
        format!("chat_{course_id}")
    }

    /// 加入课程组
    pub fn join(&self, course_id: i64) -> broadcast::Receiver<String> {
        let entry = self.rooms.entry(course_id).or_insert_with(|| {
            let (tx, _) = broadcast::channel(self.capacity);
            tx
        });
        entry.subscribe()
    }

    /// 退出课程组，调用前 Receiver 必须已释放
    pub fn leave(&self, course_id: i64) {
        self.rooms
            .remove_if(&course_id, |_, tx| tx.receiver_count() == 0);
    }

    /// 向课程组广播，返回收到消息的连接数
    pub fn broadcast(&self, course_id: i64, payload: String) -> usize {
        self.rooms
            .get(&course_id)
            .and_then(|tx| tx.send(payload).ok())
            .unwrap_or(0)
    }

    pub fn member_count(&self, course_id: i64) -> usize {
        self.rooms
            .get(&course_id)
            .map_or(0, |tx| tx.receiver_count())
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// 处理一个已通过鉴权的聊天连接，直到连接关闭
    pub async fn run_session(
        self: Arc<Self>,
        storage: Arc<dyn Storage>,
        user: User,
        course_id: i64,
        heartbeat_interval: Duration,
        mut session: actix_ws::Session,
        mut stream: actix_ws::MessageStream,
    ) {
        let group = Self::group_name(course_id);
        info!("User {} joined {}", user.username, group);

        let mut rx = self.join(course_id);
        let mut heartbeat = tokio::time::interval(heartbeat_interval);
        // interval 的第一次 tick 立即完成
        heartbeat.tick().await;

        loop {
            tokio::select! {
                msg = stream.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => match parse_client_frame(&text) {
                            Some(ClientCommand::Ping) => {
                                if send_event(&mut session, &ChatEvent::Pong).await.is_err() {
                                    break;
                                }
                            }
                            Some(ClientCommand::Say(message)) => {
                                self.relay(&storage, &user, course_id, message);
                            }
                            None => debug!("Ignoring frame from user {} in {}", user.id, group),
                        },
                        Some(Ok(Message::Ping(data))) => {
                            if session.pong(&data).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Err(e)) => {
                            warn!("WebSocket error for user {} in {}: {:?}", user.id, group, e);
                            break;
                        }
                        _ => {}
                    }
                }

                msg = rx.recv() => {
                    match msg {
                        Ok(payload) => {
                            if session.text(payload).await.is_err() {
                                break;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!("User {} lagged by {} messages in {}", user.id, n, group);
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }

                _ = heartbeat.tick() => {
                    if session.ping(b"").await.is_err() {
                        break;
                    }
                }
            }
        }

        drop(rx);
        self.leave(course_id);
        let _ = session.close(None).await;
        info!("User {} left {}", user.username, group);
    }

    /// 广播给课程组并异步保存
    fn relay(&self, storage: &Arc<dyn Storage>, user: &User, course_id: i64, message: String) {
        let now = Utc::now();
        let event = ChatEvent::ChatMessage {
            message: message.clone(),
            user: user.username.clone(),
            datetime: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        match serde_json::to_string(&event) {
            Ok(json) => {
                self.broadcast(course_id, json);
            }
            Err(e) => error!("Failed to encode chat message: {}", e),
        }

        let storage = storage.clone();
        let user_id = user.id;
        tokio::spawn(async move {
            if let Err(e) = storage
                .create_message(user_id, course_id, &message, now)
                .await
            {
                error!(
                    "Failed to persist chat message from user {} in course {}: {}",
                    user_id, course_id, e
                );
            }
        });
    }
}

async fn send_event(
    session: &mut actix_ws::Session,
    event: &ChatEvent,
) -> Result<(), actix_ws::Closed> {
    match serde_json::to_string(event) {
        Ok(json) => session.text(json).await,
        Err(e) => {
            error!("Failed to encode chat event: {}", e);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_name() {
        assert_eq!(ChatRoomManager::group_name(12), "chat_12");
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_member_of_the_course() {
        let manager = ChatRoomManager::new(8);
        let mut a = manager.join(1);
        let mut b = manager.join(1);
        let mut other = manager.join(2);

        assert_eq!(manager.broadcast(1, "hello".into()), 2);
        assert_eq!(a.recv().await.expect("a"), "hello");
        assert_eq!(b.recv().await.expect("b"), "hello");
        assert!(other.try_recv().is_err());
    }

    #[test]
    fn test_empty_group_is_removed_on_leave() {
        let manager = ChatRoomManager::new(8);
        let a = manager.join(1);
        let b = manager.join(1);
        assert_eq!(manager.member_count(1), 2);

        drop(a);
        manager.leave(1);
        assert_eq!(manager.room_count(), 1);

        drop(b);
        manager.leave(1);
        assert_eq!(manager.room_count(), 0);
        assert_eq!(manager.broadcast(1, "nobody".into()), 0);
    }

    #[tokio::test]
    async fn test_relayed_message_is_broadcast_and_saved() {
        use crate::models::{
            courses::requests::CreateCourseRequest,
            subjects::requests::CreateSubjectRequest,
            users::{entities::UserRole, requests::CreateUserRequest},
        };
        use crate::storage::sea_orm_storage::SeaOrmStorage;

        let storage: Arc<dyn Storage> = Arc::new(
            SeaOrmStorage::new_in_memory()
                .await
                .expect("in-memory storage"),
        );
        let user = storage
            .create_user(CreateUserRequest {
                username: "alice".into(),
                email: "alice@example.com".into(),
                password: "hash".into(),
                role: UserRole::Student,
                display_name: None,
            })
            .await
            .expect("user");
        let subject = storage
            .create_subject(CreateSubjectRequest {
                title: "Programming".into(),
                slug: "programming".into(),
            })
            .await
            .expect("subject");
        let course = storage
            .create_course(
                user.id,
                CreateCourseRequest {
                    subject_id: subject.id,
                    title: "Rust".into(),
                    slug: "rust".into(),
                    overview: String::new(),
                },
            )
            .await
            .expect("course");

        let manager = ChatRoomManager::new(8);
        let mut rx = manager.join(course.id);
        manager.relay(&storage, &user, course.id, "hello".into());

        let frame = rx.recv().await.expect("broadcast frame");
        let value: serde_json::Value = serde_json::from_str(&frame).expect("json");
        assert_eq!(value["type"], "chat_message");
        assert_eq!(value["message"], "hello");
        assert_eq!(value["user"], "alice");
        let datetime = value["datetime"].as_str().expect("datetime");
        assert!(datetime.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(datetime).is_ok());

        // 保存在后台任务中完成
        let mut saved = Vec::new();
        for _ in 0..50 {
            saved = storage
                .list_recent_messages(course.id, 5)
                .await
                .expect("recent messages");
            if !saved.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].content, "hello");
        assert_eq!(saved[0].user_id, user.id);
    }

    #[test]
    fn test_client_frames() {
        assert_eq!(
            parse_client_frame(r#"{"message": "hi"}"#),
            Some(ClientCommand::Say("hi".into()))
        );
        assert_eq!(
            parse_client_frame(r#"{"type": "ping"}"#),
            Some(ClientCommand::Ping)
        );
        assert_eq!(parse_client_frame(r#"{"message": "   "}"#), None);
        assert_eq!(parse_client_frame("not json"), None);
        assert_eq!(parse_client_frame("{}"), None);
    }

    #[test]
    fn test_chat_event_wire_format() {
        let event = ChatEvent::ChatMessage {
            message: "hi".into(),
            user: "alice".into(),
            datetime: "2026-01-24T12:00:00.000Z".into(),
        };
        let value = serde_json::to_value(&event).expect("json");
        assert_eq!(value["type"], "chat_message");
        assert_eq!(value["user"], "alice");
        assert_eq!(
            serde_json::to_string(&ChatEvent::Pong).expect("json"),
            r#"{"type":"pong"}"#
        );
    }
}
