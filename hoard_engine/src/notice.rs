//! Player-facing inventory notices.
//!
//! Handlers never print directly. They push a [`Notice`] onto the shared
//! [`NoticeLog`] and the host UI drains the batch at the end of the turn to
//! render however it likes. Every push also lands in the engine log.

use std::fmt::{self, Display};

use log::info;

/// One user-visible inventory event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    PickedUp {
        actor: String,
        item: String,
        stack: u32,
    },
    Dropped {
        actor: String,
        item: String,
    },
    Received {
        actor: String,
        item: String,
        stack: u32,
    },
    Bought {
        item: String,
        stack: u32,
        cost: u64,
    },
    Sold {
        item: String,
        stack: u32,
        cost: u64,
    },
    CouldNotCarry {
        actor: String,
        item: String,
        reason: String,
    },
    TheftRefused {
        actor: String,
        item: String,
    },
}

impl Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::PickedUp { actor, item, stack } => {
                write!(f, "{actor} picked up {}", with_count(item, *stack))
            },
            Notice::Dropped { actor, item } => write!(f, "{actor} put down {item}"),
            Notice::Received { actor, item, stack } => {
                write!(f, "{actor} received {}", with_count(item, *stack))
            },
            Notice::Bought { item, stack, cost } => {
                write!(f, "bought {} for {cost} gold", with_count(item, *stack))
            },
            Notice::Sold { item, stack, cost } => {
                write!(f, "sold {} for {cost} gold", with_count(item, *stack))
            },
            Notice::CouldNotCarry { reason, .. } => write!(f, "{reason}"),
            Notice::TheftRefused { actor, item } => {
                write!(f, "{item} belongs to someone else; {actor} leaves it alone")
            },
        }
    }
}

fn with_count(item: &str, stack: u32) -> String {
    if stack > 1 {
        format!("{item} x{stack}")
    } else {
        item.to_string()
    }
}

/// Ordered queue of notices for the current turn.
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Vec<Notice>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        info!("{notice}");
        self.notices.push(notice);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Hand the batch to the renderer and start the next turn empty.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
