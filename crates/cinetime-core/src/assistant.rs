use cinetime_client::{ApiError, AssistantApi};
use cinetime_models::{ChatMessage, MediaFilter, Recommendation, SearchResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, warn};

pub const GREETING: &str = "Hello! I'm your movie & TV show assistant. I can help you find movies/shows, recommend similar content, or identify shows from descriptions!";
pub const FOUND_REPLY: &str = "I found some recommendations based on your query!";
pub const NOTHING_FOUND_REPLY: &str = "I couldn't find specific recommendations. Could you describe it differently?";
pub const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again!";

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("no recommendation at position {0}")]
    UnknownRecommendation(usize),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone)]
pub struct ConversationState {
    pub messages: Vec<ChatMessage>,
    pub results: Vec<SearchResult>,
    pub active_filter: MediaFilter,
}

/// One chat session with the assistant. Messages live in memory only.
pub struct Conversation<A: AssistantApi + ?Sized> {
    api: Arc<A>,
    state: Mutex<ConversationState>,
    next_id: AtomicU64,
}

impl<A: AssistantApi + ?Sized> Conversation<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: Mutex::new(ConversationState {
                messages: vec![ChatMessage::assistant(0, GREETING, Vec::new())],
                results: Vec::new(),
                active_filter: MediaFilter::All,
            }),
            next_id: AtomicU64::new(1),
        }
    }

    fn state(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn push(&self, message: ChatMessage) -> ChatMessage {
        self.state().messages.push(message.clone());
        message
    }

    pub fn snapshot(&self) -> ConversationState {
        self.state().clone()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state().messages.clone()
    }

    /// Recommendations carried by the latest assistant reply
    pub fn recommendations(&self) -> Vec<Recommendation> {
        self.state()
            .messages
            .iter()
            .rev()
            .find(|m| !m.recommendations.is_empty())
            .map(|m| m.recommendations.clone())
            .unwrap_or_default()
    }

    pub fn set_filter(&self, filter: MediaFilter) {
        self.state().active_filter = filter;
    }

    pub fn filtered_results(&self) -> Vec<SearchResult> {
        let state = self.state();
        filter_results(&state.results, state.active_filter)
    }

    /// Send a message and return the assistant's reply; blank input is ignored.
    ///
    /// When candidates come back, their keywords are concatenated (duplicates
    /// kept) into one search across all kinds.
    pub async fn send(&self, input: &str) -> Option<ChatMessage> {
        if input.trim().is_empty() {
            return None;
        }
        let id = self.next_id();
        self.push(ChatMessage::user(id, input));

        let response = match self.api.chat(input).await {
            Ok(response) => response,
            Err(e) => {
                warn!(operation = "assistant_chat", error = %e, "Assistant request failed");
                let id = self.next_id();
                return Some(self.push(ChatMessage::assistant(id, ERROR_REPLY, Vec::new())));
            }
        };

        let recommendations = response.data;
        let content = if recommendations.is_empty() { NOTHING_FOUND_REPLY } else { FOUND_REPLY };
        let keywords = combined_keywords(&recommendations);
        let reply = self.push(ChatMessage::assistant(self.next_id(), content, recommendations));

        if !keywords.is_empty() {
            match self.api.keyword_search(&keywords, MediaFilter::All).await {
                Ok(results) => {
                    debug!(operation = "assistant_search", keywords = keywords.len(), count = results.len(), "Combined search done");
                    self.state().results = results;
                }
                Err(e) => warn!(operation = "assistant_search", error = %e, "Combined search failed"),
            }
        }
        Some(reply)
    }

    /// Search by one candidate's keywords and kind; the result filter switches
    /// to that kind.
    pub async fn search_recommendation(&self, index: usize) -> Result<Vec<SearchResult>, AssistantError> {
        let recommendation = self
            .recommendations()
            .into_iter()
            .nth(index)
            .ok_or(AssistantError::UnknownRecommendation(index))?;
        let scope = MediaFilter::from(recommendation.kind);

        let results = self.api.keyword_search(&recommendation.keywords, scope).await?;
        let mut state = self.state();
        state.results = results;
        state.active_filter = scope;
        Ok(filter_results(&state.results, scope))
    }
}

/// Every candidate's keywords in order, duplicates preserved
pub fn combined_keywords(recommendations: &[Recommendation]) -> Vec<String> {
    recommendations.iter().flat_map(|r| r.keywords.iter().cloned()).collect()
}

pub fn filter_results(results: &[SearchResult], filter: MediaFilter) -> Vec<SearchResult> {
    results.iter().filter(|r| filter.matches(r.kind)).cloned().collect()
}

/// Free-text search: the query is split on spaces into keywords
pub async fn keyword_search<A: AssistantApi + ?Sized>(
    api: &A,
    query: &str,
    scope: MediaFilter,
) -> Result<Vec<SearchResult>, ApiError> {
    let keywords: Vec<String> = query.split(' ').filter(|k| !k.is_empty()).map(str::to_string).collect();
    if keywords.is_empty() {
        return Ok(Vec::new());
    }
    api.keyword_search(&keywords, scope).await
}
