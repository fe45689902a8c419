/// Commands the bot understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BotCommand {
    Start,
    Search,
    Broadcast,
    UserList,
}

impl BotCommand {
    pub const ALL: [BotCommand; 4] = [
        BotCommand::Start,
        BotCommand::Search,
        BotCommand::Broadcast,
        BotCommand::UserList,
    ];

    /// Resolve a command name, ignoring case. Unknown names yield `None`.
    pub fn from_name(input: &str) -> Option<Self> {
        let input_lower = input.to_lowercase();
        Self::ALL.into_iter().find(|c| c.name() == input_lower)
    }

    pub fn name(&self) -> &'static str {
        match self {
            BotCommand::Start => "start",
            BotCommand::Search => "search",
            BotCommand::Broadcast => "broadcast",
            BotCommand::UserList => "userlist",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BotCommand::Start => "Start the bot",
            BotCommand::Search => "Search for a movie by name",
            BotCommand::Broadcast => "Send a message to every user (admin only)",
            BotCommand::UserList => "List known users (admin only)",
        }
    }

    pub fn usage(&self) -> &'static str {
        match self {
            BotCommand::Start => "/start",
            BotCommand::Search => "/search <movie_name>",
            BotCommand::Broadcast => "/broadcast <message>",
            BotCommand::UserList => "/userlist",
        }
    }

    pub fn is_admin_only(&self) -> bool {
        matches!(self, BotCommand::Broadcast | BotCommand::UserList)
    }

    /// Commands shown to regular users in the platform's command menu
    pub fn public() -> impl Iterator<Item = BotCommand> {
        Self::ALL.into_iter().filter(|c| !c.is_admin_only())
    }
}
