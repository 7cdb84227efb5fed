pub static SONGLINK_API_BASE: &str = "https://api.song.link/v1-alpha.1";
pub static DEFAULT_WEBHOOK_URL: &str =
    "https://discordapp.com/api/webhooks/xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx";
pub static DEFAULT_USERNAME: &str = "Music Man";
pub static DEFAULT_AVATAR: &str = "https://i.imgur.com/I9xBxse.jpg";
pub static AUTHOR_ICON: &str =
    "https://cdn4.iconfinder.com/data/icons/small-n-flat/24/user-alt-512.png";
pub static DEFAULT_REQUESTER: &str = "Someone";
pub static NOT_AVAILABLE: &str = "Not Available";

/// Left-to-right mark. Discord renders a field with this as its name and
/// value as an invisible row break, which forces the platform links into a
/// two-by-two grid.
pub static SPACER: &str = "\u{200e}";
