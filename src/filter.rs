use crate::models::Message;

/// Admin panel tabs over the message list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageFilter {
    #[default]
    Pending,
    Fulfilled,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterCounts {
    pub pending: usize,
    pub fulfilled: usize,
    pub total: usize,
}

impl MessageFilter {
    pub const TABS: [MessageFilter; 3] = [MessageFilter::Pending, MessageFilter::Fulfilled, MessageFilter::All];

    pub fn title(&self) -> &'static str {
        match self {
            MessageFilter::Pending => "Pending",
            MessageFilter::Fulfilled => "Fulfilled",
            MessageFilter::All => "All",
        }
    }

    pub fn matches(&self, message: &Message) -> bool {
        match self {
            MessageFilter::Pending => !message.fulfilled,
            MessageFilter::Fulfilled => message.fulfilled,
            MessageFilter::All => true,
        }
    }

    /// Keeps the input order, so a newest-first list stays newest-first.
    pub fn apply<'a>(&self, messages: &'a [Message]) -> Vec<&'a Message> {
        messages.iter().filter(|m| self.matches(m)).collect()
    }

    pub fn count(&self, counts: &FilterCounts) -> usize {
        match self {
            MessageFilter::Pending => counts.pending,
            MessageFilter::Fulfilled => counts.fulfilled,
            MessageFilter::All => counts.total,
        }
    }

    pub fn next(self) -> Self {
        match self {
            MessageFilter::Pending => MessageFilter::Fulfilled,
            MessageFilter::Fulfilled => MessageFilter::All,
            MessageFilter::All => MessageFilter::Pending,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            MessageFilter::Pending => MessageFilter::All,
            MessageFilter::Fulfilled => MessageFilter::Pending,
            MessageFilter::All => MessageFilter::Fulfilled,
        }
    }
}

pub fn counts(messages: &[Message]) -> FilterCounts {
    let fulfilled = messages.iter().filter(|m| m.fulfilled).count();
    FilterCounts {
        pending: messages.len() - fulfilled,
        fulfilled,
        total: messages.len(),
    }
}
