use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::backend::{ChatBackend, LoginOutcome, UserCache};
use crate::conversation::{Conversation, Message, MessageRole};
use crate::error::{CrestError, Result};
use crate::knowledge::KnowledgeItem;
use crate::session::ChatController;
use crate::user::User;

fn test_user() -> User {
    User {
        id: "u-1".to_string(),
        email: Some("a@b.com".to_string()),
        display_name: None,
    }
}

fn reply_message() -> Message {
    Message {
        id: "m-reply".to_string(),
        role: MessageRole::Assistant,
        content: "sure".to_string(),
    }
}

// Mock ChatBackend with scripted responses
struct MockBackend {
    credential: Mutex<Option<String>>,
    profile_user: Mutex<Option<User>>,
    conversations: Mutex<Vec<Conversation>>,
    /// Whether create responses carry an identifier.
    create_with_id: bool,
    next_id: Mutex<u32>,
    /// Conversation id whose detail fetch fails with a server error.
    fail_get_for: Mutex<Option<String>>,
    send_response: Mutex<Result<Option<Message>>>,
    search_response: Mutex<Result<Vec<KnowledgeItem>>>,
    calls: Mutex<Vec<String>>,
}

impl MockBackend {
    fn new(conversations: Vec<Conversation>) -> Self {
        Self {
            credential: Mutex::new(None),
            profile_user: Mutex::new(Some(test_user())),
            conversations: Mutex::new(conversations),
            create_with_id: true,
            next_id: Mutex::new(0),
            fail_get_for: Mutex::new(None),
            send_response: Mutex::new(Ok(Some(reply_message()))),
            search_response: Mutex::new(Ok(Vec::new())),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn login(&self, email: &str, _password: &str) -> Result<LoginOutcome> {
        self.record("login");
        *self.credential.lock().unwrap() = Some("tok-login".to_string());
        Ok(LoginOutcome {
            access_token: "tok-login".to_string(),
            user: Some(User {
                id: "u-1".to_string(),
                email: Some(email.to_string()),
                display_name: None,
            }),
        })
    }

    async fn register(&self, _email: &str, _password: &str) -> Result<()> {
        self.record("register");
        Ok(())
    }

    async fn profile(&self) -> Result<User> {
        self.record("profile");
        if self.credential.lock().unwrap().is_none() {
            return Err(CrestError::api(401, "unauthorized"));
        }
        self.profile_user
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| CrestError::api(401, "unauthorized"))
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        self.record("list");
        Ok(self.conversations.lock().unwrap().clone())
    }

    async fn create_conversation(&self, title: &str) -> Result<Option<Conversation>> {
        self.record("create");
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        let conversation = Conversation::new(format!("c-new-{next_id}"), title);
        self.conversations
            .lock()
            .unwrap()
            .push(conversation.clone());
        Ok(self.create_with_id.then_some(conversation))
    }

    async fn get_conversation(&self, id: &str) -> Result<Conversation> {
        self.record("get");
        if self.fail_get_for.lock().unwrap().as_deref() == Some(id) {
            return Err(CrestError::api(500, "detail fetch exploded"));
        }
        self.conversations
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| CrestError::api(404, "no such conversation"))
    }

    async fn send_message(&self, _conversation_id: &str, _content: &str) -> Result<Option<Message>> {
        self.record("send");
        self.send_response.lock().unwrap().clone()
    }

    async fn search_knowledge(&self, _query: &str) -> Result<Vec<KnowledgeItem>> {
        self.record("search");
        self.search_response.lock().unwrap().clone()
    }

    async fn set_credential(&self, token: Option<String>) {
        *self.credential.lock().unwrap() = token;
    }

    async fn credential(&self) -> Option<String> {
        self.credential.lock().unwrap().clone()
    }
}

// Mock UserCache backed by a plain Mutex
#[derive(Default)]
struct MockUserCache {
    user: Mutex<Option<User>>,
}

impl MockUserCache {
    fn with_user(user: User) -> Self {
        Self {
            user: Mutex::new(Some(user)),
        }
    }

    fn cached(&self) -> Option<User> {
        self.user.lock().unwrap().clone()
    }
}

impl UserCache for MockUserCache {
    fn load(&self) -> Option<User> {
        self.cached()
    }

    fn store(&self, user: Option<&User>) {
        *self.user.lock().unwrap() = user.cloned();
    }
}

fn conversation_with_messages(id: &str, title: &str, count: usize) -> Conversation {
    let mut conversation = Conversation::new(id, title);
    for n in 0..count {
        conversation.messages.push(Message {
            id: format!("{id}-m{n}"),
            role: if n % 2 == 0 {
                MessageRole::User
            } else {
                MessageRole::Assistant
            },
            content: format!("message {n}"),
        });
    }
    conversation
}

fn controller(
    backend: MockBackend,
    cache: MockUserCache,
) -> (
    ChatController<MockBackend, MockUserCache>,
    Arc<MockBackend>,
    Arc<MockUserCache>,
) {
    let backend = Arc::new(backend);
    let cache = Arc::new(cache);
    (
        ChatController::new(backend.clone(), cache.clone()),
        backend,
        cache,
    )
}

#[tokio::test]
async fn test_bootstrap_loads_and_selects_first_conversation() {
    let backend = MockBackend::new(vec![
        conversation_with_messages("c-1", "First", 2),
        conversation_with_messages("c-2", "Second", 1),
    ]);
    let (mut controller, backend, cache) = controller(backend, MockUserCache::default());

    controller.bootstrap(Some("tok-env".to_string())).await;

    assert_eq!(backend.credential().await.as_deref(), Some("tok-env"));
    assert!(controller.state().is_authenticated());
    assert_eq!(controller.state().conversations.len(), 2);
    assert_eq!(controller.state().active_id(), Some("c-1"));
    assert_eq!(controller.state().messages.len(), 2);
    assert_eq!(cache.cached(), Some(test_user()));
}

#[tokio::test]
async fn test_bootstrap_without_credential_clears_stale_cache() {
    let backend = MockBackend::new(vec![conversation_with_messages("c-1", "First", 1)]);
    let (mut controller, _backend, cache) =
        controller(backend, MockUserCache::with_user(test_user()));

    // No token and no cookie-backed session: the cached user must not be
    // trusted for the logged-in decision.
    controller.bootstrap(None).await;

    assert!(!controller.state().is_authenticated());
    assert!(cache.cached().is_none());
    assert!(controller.state().conversations.is_empty());
}

#[tokio::test]
async fn test_logout_clears_session_state() {
    let backend = MockBackend::new(vec![conversation_with_messages("c-1", "First", 2)]);
    let (mut controller, backend, cache) = controller(backend, MockUserCache::default());

    controller.bootstrap(Some("tok".to_string())).await;
    assert!(controller.state().is_authenticated());

    controller.logout().await;

    assert!(backend.credential().await.is_none());
    assert!(cache.cached().is_none());
    assert!(controller.state().user.is_none());
    assert!(controller.state().conversations.is_empty());
    assert!(controller.state().active.is_none());
    assert!(controller.state().messages.is_empty());
}

#[tokio::test]
async fn test_send_appends_echo_then_single_reply() {
    let backend = MockBackend::new(vec![conversation_with_messages("c-1", "First", 0)]);
    let (mut controller, _backend, _cache) = controller(backend, MockUserCache::default());
    controller.bootstrap(Some("tok".to_string())).await;

    controller.send_message("hello there").await;

    let messages = &controller.state().messages;
    assert_eq!(messages.len(), 2);
    assert!(messages[0].id.starts_with("tmp-u-"));
    assert_eq!(messages[0].role, MessageRole::User);
    assert_eq!(messages[0].content, "hello there");
    assert_eq!(messages[1].role, MessageRole::Assistant);
    assert!(!controller.state().sending);
    assert!(controller.state().error.is_none());
}

#[tokio::test]
async fn test_send_failure_keeps_optimistic_echo() {
    let backend = MockBackend::new(vec![conversation_with_messages("c-1", "First", 0)]);
    *backend.send_response.lock().unwrap() = Err(CrestError::api(500, "boom"));
    let (mut controller, _backend, _cache) = controller(backend, MockUserCache::default());
    controller.bootstrap(Some("tok".to_string())).await;

    controller.send_message("do not lose me").await;

    let messages = &controller.state().messages;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "do not lose me");
    assert_eq!(controller.state().error.as_deref(), Some("boom"));
    assert!(!controller.state().sending);
}

#[tokio::test]
async fn test_send_without_active_provisions_new_chat() {
    let backend = MockBackend::new(Vec::new());
    let (mut controller, backend, _cache) = controller(backend, MockUserCache::default());
    controller.bootstrap(Some("tok".to_string())).await;
    assert!(controller.state().active.is_none());

    controller.send_message("hi").await;

    let active = controller.state().active.as_ref().expect("active");
    assert_eq!(active.title, "New chat");
    assert_eq!(controller.state().messages.len(), 2);
    assert!(backend.calls().contains(&"create".to_string()));
}

#[tokio::test]
async fn test_create_without_id_resolves_by_title_match() {
    let mut backend = MockBackend::new(vec![conversation_with_messages("c-1", "First", 0)]);
    backend.create_with_id = false;
    let (mut controller, _backend, _cache) = controller(backend, MockUserCache::default());
    controller.bootstrap(Some("tok".to_string())).await;

    controller.create_conversation("Weekly sync").await;

    let active = controller.state().active.as_ref().expect("active");
    assert_eq!(active.title, "Weekly sync");
    assert!(active.id.starts_with("c-new-"));
    assert_eq!(controller.state().conversations.len(), 2);
}

#[tokio::test]
async fn test_select_failure_keeps_previous_messages() {
    let backend = MockBackend::new(vec![
        conversation_with_messages("c-1", "First", 2),
        conversation_with_messages("c-2", "Second", 5),
    ]);
    *backend.fail_get_for.lock().unwrap() = Some("c-2".to_string());
    let (mut controller, _backend, _cache) = controller(backend, MockUserCache::default());
    controller.bootstrap(Some("tok".to_string())).await;
    assert_eq!(controller.state().messages.len(), 2);

    let second = controller.state().conversations[1].clone();
    controller.select_conversation(second).await;

    // Selection is optimistic; the stale message list survives the failure.
    assert_eq!(controller.state().active_id(), Some("c-2"));
    assert_eq!(controller.state().messages.len(), 2);
    assert!(controller.state().error.is_some());
}

#[tokio::test]
async fn test_search_blank_input_is_a_noop() {
    let backend = MockBackend::new(Vec::new());
    let (mut controller, backend, _cache) = controller(backend, MockUserCache::default());

    controller.search_related("   ").await;

    assert!(!backend.calls().contains(&"search".to_string()));
    assert!(controller.state().related.is_empty());
}

#[tokio::test]
async fn test_search_failure_is_swallowed() {
    let backend = MockBackend::new(Vec::new());
    *backend.search_response.lock().unwrap() = Err(CrestError::network("offline"));
    let (mut controller, _backend, _cache) = controller(backend, MockUserCache::default());

    controller.search_related("vacation policy").await;

    assert!(controller.state().related.is_empty());
    assert!(controller.state().error.is_none());
}
