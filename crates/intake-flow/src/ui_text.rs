//! Fixed Ukrainian texts, button labels and issue categories.

pub const CANCEL_LABEL: &str = "❌ Скасувати";
pub const RESTART_LABEL: &str = "🔁 Почати заново";
pub const SEND_LABEL: &str = "✅ Відправити";
pub const EDIT_IDENTIFIER_LABEL: &str = "✏️ Змінити номер";
pub const EDIT_CATEGORY_LABEL: &str = "✏️ Змінити тип";
pub const EDIT_DESCRIPTION_LABEL: &str = "✏️ Змінити опис";

/// Issue categories in display order.
pub const CATEGORY_LABELS: [&str; 5] = [
    "Світло / електрика",
    "Рідини / оливи",
    "Колеса / ходова",
    "Салон / кузов",
    "Інше",
];

pub const GREETING: &str = "Вітаю! Я допоможу створити заявку для команди сервісу.";
pub const ASK_IDENTIFIER: &str =
    "Введіть державний номер авто.\nПриклад: <code>110987</code>.";
pub const ASK_IDENTIFIER_AGAIN: &str = "Введіть номер авто ще раз:";
pub const IDENTIFIER_WARNING: &str =
    "⚠️ Номер виглядає незвично. Якщо все ок - продовжуйте.";
pub const ASK_CATEGORY: &str = "Оберіть тип проблеми:";
pub const CATEGORY_REPROMPT: &str = "Оберіть тип кнопкою нижче 👇";
pub const ASK_DESCRIPTION: &str = "📝 Опишіть проблему.\n\n\
Приклади:\n\n\
💡 Світло / електрика\n\
• перегоріла ліва лампа\n\
• не працює стоп-сигнал\n\
• перегорів запобіжник\n\n\
🛢 Рідини / оливи\n\
• долити антифриз\n\
• долити омивач\n\
• низький рівень оливи\n\n\
🛞 Колеса / ходова\n\
• спустило колесо\n\
• потрібна підкачка колеса\n\
• стукає стійка\n\n\
🚗 Салон / кузов\n\
• брудний салон\n\
• подряпина на дверях\n\
• пошкоджений бампер";
pub const DESCRIPTION_TOO_SHORT: &str =
    "Опис надто короткий. Додайте, будь ласка, більше деталей.";
pub const CONFIRM_REPROMPT: &str = "Оберіть дію кнопкою нижче 👇";
pub const REQUEST_SENT: &str =
    "Готово ✅ Заявку відправлено. Для нової заявки натисніть /start.";
pub const REQUEST_FAILED: &str =
    "⚠️ Не вдалося відправити заявку. Спробуйте ще раз за хвилину.";
pub const CANCELLED: &str = "Скасовано. Напишіть /start, щоб почати знову.";
pub const RESTARTED: &str = "Починаємо заново.";
pub const IDLE_HINT: &str = "Щоб почати, використайте /start.";

pub const ACCESS_DENIED: &str = "Доступ до бота обмежено.";
pub const PRIVILEGED_ONLY: &str = "Команда доступна лише адміну.";
pub const BAN_USAGE: &str = "Використання: /ban <user_id>";
pub const UNBAN_USAGE: &str = "Використання: /unban <user_id>";
pub const BAN_LIST_EMPTY: &str = "Блок-лист порожній.";
pub const BAN_LIST_SAVE_FAILED: &str =
    "⚠️ Не вдалося зберегти блок-лист. Спробуйте ще раз.";

pub const HELP_TEXT: &str = "Команди:\n\
/start - почати створення заявки\n\
/restart - почати заново\n\
/cancel - скасувати поточну заявку\n\
/chatid - показати chat id\n\
/help - показати підказку";
pub const PRIVILEGED_HELP_TEXT: &str = "Адмін-команди:\n\
/ban <user_id> - заблокувати користувача\n\
/unban <user_id> - розблокувати користувача\n\
/banlist - список заблокованих";
