use log::debug;
use std::fmt;

#[derive(serde_derive::Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    #[serde(rename = "reopen")]
    Reopen,
    #[serde(rename = "close")]
    Close,
    AddLabel,
    RemoveLabel,
    Assign,
    Unassign,
    SetTitle,
}

impl CommandType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Reopen => "reopen",
            CommandType::Close => "close",
            CommandType::AddLabel => "AddLabel",
            CommandType::RemoveLabel => "RemoveLabel",
            CommandType::Assign => "Assign",
            CommandType::Unassign => "Unassign",
            CommandType::SetTitle => "SetTitle",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trigger phrase recognized at the start of a comment body.
#[derive(Debug)]
pub struct TriggerSpec {
    pub kind: CommandType,
    pub phrase: &'static str,
    pub requires_value: bool,
}

/// Triggers in matching order. The first one claiming a body wins.
///
/// Triggers taking a value end with `": "`. The argument-less ones don't, so
/// that both `Derek close` and `Derek close: ` are recognized.
pub static TRIGGERS: &[TriggerSpec] = &[
    TriggerSpec {
        kind: CommandType::AddLabel,
        phrase: "Derek add label: ",
        requires_value: true,
    },
    TriggerSpec {
        kind: CommandType::RemoveLabel,
        phrase: "Derek remove label: ",
        requires_value: true,
    },
    TriggerSpec {
        kind: CommandType::Assign,
        phrase: "Derek assign: ",
        requires_value: true,
    },
    TriggerSpec {
        kind: CommandType::Unassign,
        phrase: "Derek unassign: ",
        requires_value: true,
    },
    TriggerSpec {
        kind: CommandType::Close,
        phrase: "Derek close",
        requires_value: false,
    },
    TriggerSpec {
        kind: CommandType::Reopen,
        phrase: "Derek reopen",
        requires_value: false,
    },
    TriggerSpec {
        kind: CommandType::SetTitle,
        phrase: "Derek set title: ",
        requires_value: true,
    },
];

/// The command found in a comment body, if any.
#[derive(serde_derive::Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Command {
    #[serde(rename = "type")]
    kind: Option<CommandType>,
    value: String,
}

impl Command {
    pub fn new(kind: CommandType, value: impl Into<String>) -> Self {
        Command {
            kind: Some(kind),
            value: value.into(),
        }
    }

    pub fn kind(&self) -> Option<CommandType> {
        self.kind
    }

    /// The trimmed argument, empty for argument-less commands.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            None => f.write_str("no command"),
            Some(kind) if self.value.is_empty() => write!(f, "{kind}"),
            Some(kind) => write!(f, "{kind} {:?}", self.value),
        }
    }
}

/// Whether `body` is claimed by `trigger`.
///
/// A body exactly equal to a trigger ending in `": "` is rejected: the command
/// was written but its value was left out. The check is on length only, so a
/// single trailing space after the trigger is enough to be accepted.
pub fn is_valid_command(body: &str, trigger: &str) -> bool {
    if body.len() < trigger.len() || !body.starts_with(trigger) {
        return false;
    }
    !(body.len() == trigger.len() && trigger.ends_with(": "))
}

pub fn parse(body: &str) -> Command {
    for trigger in TRIGGERS {
        if !is_valid_command(body, trigger.phrase) {
            continue;
        }
        debug!("comment matched the `{}` trigger", trigger.kind);
        return if trigger.requires_value {
            Command::new(trigger.kind, body[trigger.phrase.len()..].trim())
        } else {
            Command::new(trigger.kind, "")
        };
    }
    Command::default()
}
