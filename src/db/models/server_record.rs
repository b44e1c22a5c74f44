/// Participation tier of a guild in global bans
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServerClass {
    OptOut,
    OptIn,
    Official,
}

impl ServerClass {
    /// Class given to guilds the bot has just joined (or has no record for)
    pub const DEFAULT: ServerClass = ServerClass::OptIn;

    pub fn as_i16(&self) -> i16 {
        match self {
            ServerClass::OptOut => 0,
            ServerClass::OptIn => 1,
            ServerClass::Official => 2,
        }
    }

    /// Unknown values are treated as opted out so they never receive bans by accident
    pub fn from_i16(value: i16) -> Self {
        match value {
            2 => ServerClass::Official,
            1 => ServerClass::OptIn,
            _ => ServerClass::OptOut,
        }
    }

    /// Whether global bans are applied in guilds of this class
    pub fn participates(&self) -> bool {
        !matches!(self, ServerClass::OptOut)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServerClass::OptOut => "opted out",
            ServerClass::OptIn => "opted in",
            ServerClass::Official => "official",
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ServerRecord {
    pub serverid: String,
    pub class: i16,
}

impl ServerRecord {
    pub fn class(&self) -> ServerClass {
        ServerClass::from_i16(self.class)
    }
}
