use std::{
    collections::VecDeque,
    fs,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{SystemTime, UNIX_EPOCH},
};

use async_trait::async_trait;
use intake_access::{parse_privileged_ids, AccessControl};
use intake_flow::{
    ChatKind, ConversationController, DeliveryError, Dispatcher, InboundMessage,
    RecipientChannel, Reply, Sender, Step,
};
use tokio::sync::Mutex as AsyncMutex;

static WORKSPACE_COUNTER: AtomicU64 = AtomicU64::new(1);

const OPERATOR: i64 = 700;
const DRIVER: i64 = 555;
const RECIPIENT: i64 = -100777;

struct ScriptedRecipient {
    results: AsyncMutex<VecDeque<Result<(), DeliveryError>>>,
    delivered: AsyncMutex<Vec<(i64, String)>>,
}

impl ScriptedRecipient {
    fn new(results: Vec<Result<(), DeliveryError>>) -> Self {
        Self {
            results: AsyncMutex::new(VecDeque::from(results)),
            delivered: AsyncMutex::new(Vec::new()),
        }
    }

    async fn delivery_count(&self) -> usize {
        self.delivered.lock().await.len()
    }
}

#[async_trait]
impl RecipientChannel for ScriptedRecipient {
    async fn deliver_html(&self, chat_id: i64, html: &str) -> Result<(), DeliveryError> {
        self.delivered.lock().await.push((chat_id, html.to_string()));
        self.results.lock().await.pop_front().unwrap_or(Ok(()))
    }
}

struct IsolatedWorkspace {
    root: PathBuf,
}

impl IsolatedWorkspace {
    fn new(label: &str) -> Self {
        let tick = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        let count = WORKSPACE_COUNTER.fetch_add(1, Ordering::Relaxed);
        let root = std::env::temp_dir().join(format!(
            "intake-{label}-{}-{tick}-{count}",
            std::process::id()
        ));
        fs::create_dir_all(&root).expect("must create isolated workspace root");
        Self { root }
    }

    fn ban_list_path(&self) -> PathBuf {
        self.root.join("state").join("blocked_users.json")
    }

    fn root(&self) -> &Path {
        &self.root
    }
}

impl Drop for IsolatedWorkspace {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn controller(
    workspace: &IsolatedWorkspace,
    recipient: Arc<ScriptedRecipient>,
) -> ConversationController {
    let access = Arc::new(AccessControl::load(
        parse_privileged_ids(&format!("{OPERATOR}, not-a-number")),
        workspace.ban_list_path(),
    ));
    ConversationController::new(access, Dispatcher::new(Some(RECIPIENT), recipient))
}

fn message(user_id: i64, text: &str) -> InboundMessage {
    InboundMessage {
        chat_id: user_id,
        chat_kind: ChatKind::Private,
        sender: Sender {
            id: user_id,
            username: None,
            first_name: Some("Тарас".to_string()),
            last_name: Some("Шевчук".to_string()),
        },
        text: text.to_string(),
    }
}

async fn say(controller: &mut ConversationController, user_id: i64, text: &str) -> Vec<Reply> {
    controller.handle_message(&message(user_id, text)).await
}

#[tokio::test]
async fn integration_ban_survives_restart_and_blocks_new_sessions() {
    let workspace = IsolatedWorkspace::new("ban-restart");
    assert!(workspace.root().exists());
    let recipient = Arc::new(ScriptedRecipient::new(Vec::new()));

    {
        let mut controller = controller(&workspace, Arc::clone(&recipient));
        let replies = say(&mut controller, OPERATOR, "/ban 555").await;
        assert_eq!(replies[0].text, "Користувача 555 заблоковано.");
    }

    let raw = fs::read_to_string(workspace.ban_list_path()).expect("ban list persisted");
    let persisted = serde_json::from_str::<Vec<i64>>(&raw).expect("ban list is a json array");
    assert_eq!(persisted, vec![DRIVER]);

    let mut restarted = controller(&workspace, Arc::clone(&recipient));
    let replies = say(&mut restarted, DRIVER, "/start").await;
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].text, "Доступ до бота обмежено.");
    assert!(restarted.session(DRIVER).is_none());

    let replies = say(&mut restarted, OPERATOR, "/unban 555").await;
    assert_eq!(replies[0].text, "Користувача 555 розблоковано.");
    let replies = say(&mut restarted, DRIVER, "/start").await;
    assert_eq!(replies.len(), 2);
    assert_eq!(
        restarted.session(DRIVER).map(|session| session.step()),
        Some(Step::Number)
    );
}

#[tokio::test]
async fn integration_failed_dispatch_can_be_resent_after_recovery() {
    let workspace = IsolatedWorkspace::new("dispatch-recovery");
    let recipient = Arc::new(ScriptedRecipient::new(vec![
        Err(DeliveryError::TimedOut("read timed out".to_string())),
        Err(DeliveryError::TimedOut("read timed out".to_string())),
        Err(DeliveryError::Transport("connection reset".to_string())),
        Ok(()),
    ]));
    let mut controller = controller(&workspace, Arc::clone(&recipient));

    for text in ["/start", "BC 4521 HA", "Світло / електрика", "перегоріла ліва лампа"] {
        say(&mut controller, DRIVER, text).await;
    }
    assert_eq!(
        controller.session(DRIVER).map(|session| session.step()),
        Some(Step::Confirm)
    );

    let replies = say(&mut controller, DRIVER, "Відправити").await;
    assert!(replies[0].text.starts_with("⚠️ Не вдалося відправити заявку"));
    assert_eq!(recipient.delivery_count().await, 2);

    let replies = say(&mut controller, DRIVER, "Відправити").await;
    assert!(replies[0].text.starts_with("⚠️ Не вдалося відправити заявку"));
    assert_eq!(recipient.delivery_count().await, 3);

    let replies = say(&mut controller, DRIVER, "✅ Відправити").await;
    assert!(replies[0].text.starts_with("Готово ✅"));
    assert!(controller.session(DRIVER).is_none());

    let delivered = recipient.delivered.lock().await;
    assert_eq!(delivered.len(), 4);
    let (chat_id, html) = delivered.last().expect("last delivery");
    assert_eq!(*chat_id, RECIPIENT);
    assert!(html.contains("👤 <b>Від:</b> Тарас Шевчук (id:555)"));
    assert!(html.contains("<code>BC4521HA</code>"));
    assert!(html.contains("📝 <b>Опис:</b> перегоріла ліва лампа"));
}
